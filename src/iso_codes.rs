//! Reader for the iso-codes `iso_639.xml` language database.
//!
//! The document is streamed with quick-xml and fed into
//! [`IsoCodesParser`], a small state machine that picks the
//! `iso_639_entry` elements out of `iso_639_entries` and skips any
//! element it does not know, however deeply nested.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::l10n::{add_localized, JsonCatalog, MessageCatalog, NoCatalog};
use crate::language_store::{LanguageSink, LanguageStore};
use crate::settings::Settings;

pub const DEFAULT_ISO_639_PATH: &str = "/usr/share/xml/iso-codes/iso_639.xml";

const ENTRIES_ELEMENT: &str = "iso_639_entries";
const ENTRY_ELEMENT: &str = "iso_639_entry";

/// Regional variants listed instead of the bare `zh` code, which has no
/// usable translation of its own.
const CHINESE_VARIANTS: &[&str] = &["zh_CN", "zh_TW", "zh_HK"];

#[derive(Debug, thiserror::Error)]
pub enum IsoCodesError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed iso-codes document at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },
    #[error("closing element without an open element at byte {position}")]
    UnbalancedEnd { position: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Start,
    InEntries,
    InEntry,
    InUnknown,
}

/// Marker error for an end-element seen before any start-element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnbalancedEnd;

/// State machine driven by start/end element events.
///
/// Each `iso_639_entry` is resolved as soon as its start tag is seen and
/// handed to the sink through [`add_localized`].
pub struct IsoCodesParser<'a, S: ?Sized, C: ?Sized> {
    state: ParserState,
    last_known_state: ParserState,
    unknown_depth: usize,
    sink: &'a mut S,
    catalog: &'a C,
}

impl<'a, S, C> IsoCodesParser<'a, S, C>
where
    S: LanguageSink + ?Sized,
    C: MessageCatalog + ?Sized,
{
    pub fn new(sink: &'a mut S, catalog: &'a C) -> Self {
        Self {
            state: ParserState::Start,
            last_known_state: ParserState::Start,
            unknown_depth: 0,
            sink,
            catalog,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn unknown_depth(&self) -> usize {
        self.unknown_depth
    }

    pub fn start_element(&mut self, name: &str, attributes: &[(&str, &str)]) {
        match self.state {
            ParserState::Start if name == ENTRIES_ELEMENT => {
                self.state = ParserState::InEntries;
            }
            ParserState::InEntries if name == ENTRY_ELEMENT => {
                self.state = ParserState::InEntry;
                self.entry(attributes);
            }
            _ => self.start_unknown(),
        }
    }

    pub fn end_element(&mut self) -> Result<(), UnbalancedEnd> {
        match self.state {
            ParserState::Start => {
                tracing::warn!("iso-codes parser got an end element in its start state");
                debug_assert_ne!(
                    self.state,
                    ParserState::Start,
                    "end element before any start element"
                );
                return Err(UnbalancedEnd);
            }
            ParserState::InEntries => self.state = ParserState::Start,
            ParserState::InEntry => self.state = ParserState::InEntries,
            ParserState::InUnknown => self.end_unknown(),
        }
        Ok(())
    }

    fn start_unknown(&mut self) {
        if self.unknown_depth == 0 {
            self.last_known_state = self.state;
        }
        self.state = ParserState::InUnknown;
        self.unknown_depth += 1;
    }

    fn end_unknown(&mut self) {
        debug_assert!(self.unknown_depth > 0 && self.state == ParserState::InUnknown);
        self.unknown_depth = self.unknown_depth.saturating_sub(1);
        if self.unknown_depth == 0 {
            self.state = self.last_known_state;
        }
    }

    fn entry(&mut self, attributes: &[(&str, &str)]) {
        let mut name = None;
        // (priority, code); lower priority wins
        let mut code: Option<(u8, &str)> = None;

        for &(key, value) in attributes {
            let priority = match key {
                "name" => {
                    name = Some(value);
                    continue;
                }
                "iso_639_1_code" => 0,
                "iso_639_2T_code" => 1,
                "iso_639_2B_code" => 2,
                _ => continue,
            };
            if code.map_or(true, |(best, _)| priority < best) {
                code = Some((priority, value));
            }
        }

        let code = code.map(|(_, c)| c).unwrap_or_default();
        if code == "zh" {
            for variant in CHINESE_VARIANTS {
                add_localized(&mut *self.sink, self.catalog, "Chinese", variant);
            }
        } else {
            add_localized(&mut *self.sink, self.catalog, name.unwrap_or_default(), code);
        }
    }
}

fn element_parts(e: &BytesStart<'_>) -> Result<(String, Vec<(String, String)>), quick_xml::Error> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(quick_xml::Error::from)?.into_owned();
        attributes.push((key, value));
    }
    Ok((name, attributes))
}

fn start<S, C>(
    parser: &mut IsoCodesParser<'_, S, C>,
    e: &BytesStart<'_>,
    position: u64,
) -> Result<(), IsoCodesError>
where
    S: LanguageSink + ?Sized,
    C: MessageCatalog + ?Sized,
{
    let (name, attributes) =
        element_parts(e).map_err(|source| IsoCodesError::Xml { position, source })?;
    let attributes: Vec<(&str, &str)> = attributes
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    parser.start_element(&name, &attributes);
    Ok(())
}

fn end<S, C>(parser: &mut IsoCodesParser<'_, S, C>, position: u64) -> Result<(), IsoCodesError>
where
    S: LanguageSink + ?Sized,
    C: MessageCatalog + ?Sized,
{
    parser
        .end_element()
        .map_err(|UnbalancedEnd| IsoCodesError::UnbalancedEnd { position })
}

/// Stream an iso-codes document from `source` into `sink`.
///
/// Entries reached before an error stay in the sink.
pub fn parse_iso_codes_reader<R, S, C>(
    source: R,
    sink: &mut S,
    catalog: &C,
) -> Result<(), IsoCodesError>
where
    R: BufRead,
    S: LanguageSink + ?Sized,
    C: MessageCatalog + ?Sized,
{
    let mut reader = Reader::from_reader(source);
    let mut parser = IsoCodesParser::new(sink, catalog);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                start(&mut parser, e, reader.buffer_position())?;
            }
            Ok(Event::Empty(ref e)) => {
                let position = reader.buffer_position();
                start(&mut parser, e, position)?;
                end(&mut parser, position)?;
            }
            Ok(Event::End(_)) => {
                end(&mut parser, reader.buffer_position())?;
            }
            Ok(Event::Eof) => break,
            Err(source) => {
                return Err(IsoCodesError::Xml {
                    position: reader.error_position(),
                    source,
                });
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

pub fn parse_iso_codes_str<S, C>(xml: &str, sink: &mut S, catalog: &C) -> Result<(), IsoCodesError>
where
    S: LanguageSink + ?Sized,
    C: MessageCatalog + ?Sized,
{
    parse_iso_codes_reader(xml.as_bytes(), sink, catalog)
}

pub fn parse_iso_codes_file<S, C>(
    path: &Path,
    sink: &mut S,
    catalog: &C,
) -> Result<(), IsoCodesError>
where
    S: LanguageSink + ?Sized,
    C: MessageCatalog + ?Sized,
{
    let file = File::open(path).map_err(|source| IsoCodesError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_iso_codes_reader(BufReader::new(file), sink, catalog)
}

/// Build the selectable language list from the configured database.
///
/// Failures are logged and leave whatever was parsed before them in the
/// returned store.
pub fn load_language_store(settings: &Settings) -> LanguageStore {
    let mut store = LanguageStore::new();
    let path = settings.iso_codes_path();

    let catalog = settings.iso_codes_catalog.as_ref().and_then(|p| {
        JsonCatalog::load(&p.to_string_lossy())
            .map_err(|e| tracing::warn!("failed to load language catalog {}: {e}", p.display()))
            .ok()
    });

    let result = match &catalog {
        Some(catalog) => parse_iso_codes_file(&path, &mut store, catalog),
        None => parse_iso_codes_file(&path, &mut store, &NoCatalog),
    };
    if let Err(e) = result {
        tracing::warn!(languages = store.len(), "failed to parse iso-codes: {e}");
    }
    store
}

//! Format parsers.
//!
//! Every source kind is an [`ImportType`]. A parser validates its input up
//! front and returns a [`ParserResult`]: the declared game, the provenance
//! context and a single-pass iterator of raw entries.
//!
//! - `batch_manual` - BATCH-MANUAL documents (`file/batch-manual`, `ir/batch-manual`)
//! - `arc_iidx` - ARC player bests, lazily paginated (`api/arc-iidx`)
//! - `beatoraja` - beatoraja IR score submissions (`ir/beatoraja`)

pub mod arc_iidx;
pub mod batch_manual;
pub mod beatoraja;

pub use arc_iidx::parse_arc_iidx;
pub use batch_manual::{BatchManualScore, HitMetaValue, parse_batch_manual};
pub use beatoraja::parse_beatoraja_score;

use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::error::{FatalImportError, ImportResult};
use crate::fetch::JsonFetch;
use crate::game::{Game, GameConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
pub enum ImportType {
    #[strum(serialize = "file/batch-manual")]
    FileBatchManual,
    #[strum(serialize = "ir/batch-manual")]
    IrBatchManual,
    #[strum(serialize = "api/arc-iidx")]
    ApiArcIidx,
    #[strum(serialize = "ir/beatoraja")]
    IrBeatoraja,
}

impl ImportType {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for ImportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a raw entry identifies its chart.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    EnumIter,
)]
pub enum MatchType {
    /// Internal song ID.
    #[serde(rename = "kamaitachiSongID")]
    #[strum(serialize = "kamaitachiSongID")]
    KamaitachiSongId,
    /// The game's own song ID.
    #[serde(rename = "songID")]
    #[strum(serialize = "songID")]
    SongId,
    /// Internal chart ID.
    #[serde(rename = "chartID")]
    #[strum(serialize = "chartID")]
    ChartId,
    #[serde(rename = "songTitle")]
    #[strum(serialize = "songTitle")]
    SongTitle,
    #[serde(rename = "title")]
    #[strum(serialize = "title")]
    Title,
    /// SHA-256 of a BMS chart file.
    #[serde(rename = "bmsChartHash")]
    #[strum(serialize = "bmsChartHash")]
    BmsChartHash,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Every match type name, in declaration order.
    pub fn names() -> Vec<&'static str> {
        Self::iter().map(|mt| mt.as_str()).collect()
    }

    /// Whether `playtype` and `difficulty` must accompany the identifier.
    pub fn requires_chart_details(&self) -> bool {
        matches!(self, Self::SongId | Self::KamaitachiSongId)
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Version recorded on an import context.
///
/// `Absent` (no version key at all) and `Null` (a version key explicitly
/// set to null) are kept apart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContextVersion {
    #[default]
    Absent,
    Null,
    Present(String),
}

/// Provenance shared by every entry of one parse.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportContext {
    pub service: Option<String>,
    pub game: Option<Game>,
    pub version: ContextVersion,
}

impl ImportContext {
    /// The context of API sources: serializes to `{}`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn batch(service: impl Into<String>, game: Game, version: ContextVersion) -> Self {
        Self {
            service: Some(service.into()),
            game: Some(game),
            version,
        }
    }
}

impl Serialize for ImportContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(service) = &self.service {
            map.serialize_entry("service", service)?;
        }
        if let Some(game) = &self.game {
            map.serialize_entry("game", game)?;
        }
        match &self.version {
            ContextVersion::Absent => {}
            ContextVersion::Null => map.serialize_entry("version", &Value::Null)?,
            ContextVersion::Present(v) => map.serialize_entry("version", v)?,
        }
        map.end()
    }
}

/// Entries of one parse. Consume `iterable` exactly once.
pub struct ParserResult<'a, T> {
    pub game: Game,
    pub context: ImportContext,
    pub iterable: Box<dyn Iterator<Item = ImportResult<T>> + 'a>,
}

impl<'a, T> ParserResult<'a, T> {
    pub fn new(
        game: Game,
        context: ImportContext,
        iterable: impl Iterator<Item = ImportResult<T>> + 'a,
    ) -> Self {
        Self {
            game,
            context,
            iterable: Box::new(iterable),
        }
    }

    /// Drain the iterable, stopping at the first error.
    pub fn into_items(self) -> ImportResult<Vec<T>> {
        self.iterable.collect()
    }
}

impl<T> fmt::Debug for ParserResult<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserResult")
            .field("game", &self.game)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Input handed to [`parse`].
#[derive(Clone, Copy)]
pub enum ImportSource<'a> {
    /// An already-decoded JSON document.
    Document(&'a Value),
    /// A remote account, fetched page by page.
    Remote {
        profile_id: &'a str,
        fetch: &'a dyn JsonFetch,
        base_url: &'a str,
    },
}

impl ImportSource<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Document(_) => "document",
            Self::Remote { .. } => "remote",
        }
    }
}

/// Output of [`parse`]. Document formats share the batch entry shape; remote
/// API items are passed on undecoded.
#[derive(Debug)]
pub enum ParsedImport<'a> {
    Scores(ParserResult<'a, BatchManualScore>),
    Raw(ParserResult<'a, Value>),
}

impl ParsedImport<'_> {
    pub fn game(&self) -> Game {
        match self {
            Self::Scores(res) => res.game,
            Self::Raw(res) => res.game,
        }
    }

    pub fn context(&self) -> &ImportContext {
        match self {
            Self::Scores(res) => &res.context,
            Self::Raw(res) => &res.context,
        }
    }
}

/// Run the parser for `import_type` over `source`.
///
/// A source of the wrong kind for the import type is a server fault.
pub fn parse<'a>(
    import_type: ImportType,
    source: ImportSource<'a>,
    config: &GameConfig,
) -> ImportResult<ParsedImport<'a>> {
    match (import_type, source) {
        (ImportType::FileBatchManual | ImportType::IrBatchManual, ImportSource::Document(data)) => {
            parse_batch_manual(data, config).map(ParsedImport::Scores)
        }
        (ImportType::IrBeatoraja, ImportSource::Document(data)) => {
            parse_beatoraja_score(data).map(ParsedImport::Scores)
        }
        (
            ImportType::ApiArcIidx,
            ImportSource::Remote {
                profile_id,
                fetch,
                base_url,
            },
        ) => Ok(ParsedImport::Raw(parse_arc_iidx(profile_id, fetch, base_url))),
        (import_type, source) => Err(FatalImportError::server(format!(
            "Import type {} cannot read a {} source",
            import_type,
            source.kind()
        ))),
    }
}

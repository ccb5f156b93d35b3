pub mod chart;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod game;
pub mod import;
pub mod ir;
pub mod normalize;
pub mod paginate;
pub mod retry;
pub mod settings;
pub mod store;
pub mod validate;

pub use chart::{ChartMatch, ChartRecord, ChartResolver};
pub use convert::{BeatorajaScore, ClearType, PbScore, to_beatoraja_format, to_beatoraja_many};
pub use error::{Error, FatalImportError, ImportResult, Result, StatusClass};
pub use fetch::{JsonFetch, MockJsonFetch};
pub use game::{Game, GameConfig, GamePtConfig, Playtype};
pub use import::{
    BatchManualScore, ContextVersion, ImportContext, ImportSource, ImportType, MatchType,
    ParsedImport, ParserResult, parse,
};
pub use ir::{ApiResponse, chart_scores};
pub use normalize::{CanonicalScore, ScoreNormalizer};
pub use paginate::{Page, Paginated, paginate};
pub use settings::{Environment, Settings};
pub use store::{MemoryStore, ScoreStore};
pub use validate::{Schema, ValidateOptions, ValidationError, validate};

#[cfg(feature = "http")]
pub use fetch::UreqFetch;

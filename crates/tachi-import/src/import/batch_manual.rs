//! BATCH-MANUAL parser.
//!
//! ```json
//! {
//!   "head": { "service": "foo", "game": "iidx" },
//!   "body": [{ "score": 1000, "lamp": "HARD CLEAR", "matchType": "songID",
//!              "identifier": "123", "playtype": "SP", "difficulty": "ANOTHER" }]
//! }
//! ```
//!
//! The whole document is validated before anything is returned; the first
//! violation aborts the parse with a client fault.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{ContextVersion, ImportContext, MatchType, ParserResult};
use crate::error::{FatalImportError, ImportResult};
use crate::game::{Game, GameConfig, Playtype};
use crate::validate::{
    Schema, ValidateOptions, ValidationError, display_value, format_validation_error, type_tag, validate,
    validate_at,
};

const ERROR_PREFIX: &str = "Invalid BATCH-MANUAL";

/// Smallest accepted `timeAchieved`. Anything lower is almost certainly
/// unix seconds rather than milliseconds.
pub const MIN_TIME_ACHIEVED_MS: f64 = 1e12;

const TIME_ACHIEVED_MESSAGE: &str =
    "Expected a number greater than 1 Trillion - did you pass unix seconds instead of miliseconds?";

/// One `hitMeta` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HitMetaValue {
    Number(f64),
    /// Gauge history and similar per-note sequences.
    Sequence(Vec<Option<f64>>),
    /// Named sequences, e.g. `gsm: { EASY: [...], NORMAL: [...] }`.
    GaugeSet(BTreeMap<String, Vec<Option<f64>>>),
}

impl HitMetaValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// A validated body entry, as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchManualScore {
    pub score: f64,
    pub lamp: String,
    pub match_type: MatchType,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playtype: Option<Playtype>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_achieved: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_hit_data"
    )]
    pub hit_data: Option<BTreeMap<String, Option<u32>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_meta: Option<BTreeMap<String, Option<HitMetaValue>>>,
}

/// A judgement count: a non-negative integral number that fits a `u32`.
/// Integral floats such as `1.0` are accepted.
fn to_count(n: f64) -> Option<u32> {
    (n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX)).then_some(n as u32)
}

fn hit_count() -> Schema {
    Schema::check("Expected a positive integer no greater than 4294967295.", |v| {
        v.as_f64().and_then(to_count).is_some()
    })
}

fn deserialize_hit_data<'de, D>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, Option<u32>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<f64>>> = Option::deserialize(deserializer)?;
    raw.map(|counts| {
        counts
            .into_iter()
            .map(|(key, count)| match count {
                None => Ok((key, None)),
                Some(n) => to_count(n)
                    .map(|c| (key.clone(), Some(c)))
                    .ok_or_else(|| {
                        <D::Error as serde::de::Error>::custom(format!(
                            "hitData.{} {} is not a count",
                            key, n
                        ))
                    }),
            })
            .collect::<Result<BTreeMap<_, _>, D::Error>>()
    })
    .transpose()
}

fn head_schema() -> Schema {
    Schema::object([
        ("service", Schema::string_length(3, 15)),
        ("game", Schema::String),
        ("version", Schema::String.nullable().optional()),
    ])
}

fn document_schema() -> Schema {
    Schema::object([
        ("head", Schema::Any),
        ("body", Schema::array(Schema::Any)),
    ])
}

/// Schema for one body entry of `game`.
///
/// `match_type` decides whether `playtype` and `difficulty` are required. An
/// unrecognised match type leaves them optional; the entry then fails on its
/// `matchType` field instead.
pub fn body_entry_schema(config: &GameConfig, game: Game, match_type: Option<MatchType>) -> Schema {
    let playtypes = config
        .game(game)
        .map(|info| info.playtypes.iter().map(|pt| pt.as_str()).collect::<Vec<_>>())
        .unwrap_or_default();

    let detail = |schema: Schema| {
        if match_type.is_some_and(|mt| mt.requires_chart_details()) {
            schema
        } else {
            schema.optional()
        }
    };

    let hit_meta_fields: Vec<(&str, Schema)> = config
        .hit_meta_for_game(game)
        .into_iter()
        .map(|field| (field.name, field.kind.schema().nullable().optional()))
        .collect();

    Schema::object([
        ("score", Schema::Number),
        ("lamp", Schema::one_of(config.lamps_for_game(game))),
        ("matchType", Schema::one_of(MatchType::names())),
        ("identifier", Schema::String),
        ("playtype", detail(Schema::one_of(playtypes))),
        ("difficulty", detail(Schema::String)),
        (
            "timeAchieved",
            Schema::check(TIME_ACHIEVED_MESSAGE, |v| {
                v.as_f64().is_some_and(|t| t > MIN_TIME_ACHIEVED_MS)
            })
            .nullable()
            .optional(),
        ),
        (
            "hitData",
            Schema::record(
                config.judgements_for_game(game),
                hit_count().nullable(),
            )
            .optional(),
        ),
        ("hitMeta", Schema::object(hit_meta_fields).optional()),
    ])
}

fn invalid(err: &ValidationError) -> FatalImportError {
    FatalImportError::client(format_validation_error(err, ERROR_PREFIX))
}

fn read_game(data: &Value, config: &GameConfig) -> ImportResult<Game> {
    let Some(raw_game) = data.get("head").and_then(|head| head.get("game")) else {
        return Err(FatalImportError::client(
            "Could not retrieve head.game - is this valid BATCH-MANUAL?",
        ));
    };

    raw_game
        .as_str()
        .and_then(|name| config.parse_game(name))
        .ok_or_else(|| {
            let games: Vec<&str> = config.games().map(|g| g.as_str()).collect();
            FatalImportError::client(format!(
                "Invalid game {} - expected any of {}",
                display_value(Some(raw_game)),
                games.join(", ")
            ))
        })
}

/// An absent `head.version` and an explicit `null` both become `Null`;
/// batch contexts always carry a version key.
fn read_version(head: &Value) -> ContextVersion {
    match head.get("version") {
        Some(Value::String(v)) => ContextVersion::Present(v.clone()),
        _ => ContextVersion::Null,
    }
}

/// Parse a BATCH-MANUAL document.
///
/// The body is small and fully buffered, so the returned iterable never
/// fails; every entry has already passed validation.
pub fn parse_batch_manual(
    data: &Value,
    config: &GameConfig,
) -> ImportResult<ParserResult<'static, BatchManualScore>> {
    if !data.is_object() {
        return Err(FatalImportError::client(format!(
            "{} (Not an object, recieved {}.)",
            ERROR_PREFIX,
            type_tag(Some(data))
        )));
    }

    let game = read_game(data, config)?;

    let head = &data["head"];
    if let Some(err) = validate_at(head, &head_schema(), ValidateOptions::default(), "head") {
        return Err(invalid(&err));
    }

    if let Some(err) = validate(data, &document_schema(), ValidateOptions::default()) {
        return Err(invalid(&err));
    }

    let body = data["body"].as_array().map(Vec::as_slice).unwrap_or_default();
    let mut entries = Vec::with_capacity(body.len());

    for (i, entry) in body.iter().enumerate() {
        let match_type = entry
            .get("matchType")
            .and_then(Value::as_str)
            .and_then(|mt| MatchType::from_str(mt).ok());

        let path = format!("body[{}]", i);
        let schema = body_entry_schema(config, game, match_type);
        if let Some(err) = validate_at(entry, &schema, ValidateOptions::default(), &path) {
            return Err(invalid(&err));
        }

        let score: BatchManualScore = serde_json::from_value(entry.clone()).map_err(|e| {
            FatalImportError::client(format!("{}: {} | {}", ERROR_PREFIX, path, e))
        })?;
        entries.push(score);
    }

    let service = head["service"].as_str().unwrap_or_default();
    let context = ImportContext::batch(service, game, read_version(head));

    debug!(game = %game, service, entries = entries.len(), "Parsed BATCH-MANUAL");

    Ok(ParserResult::new(game, context, entries.into_iter().map(Ok)))
}

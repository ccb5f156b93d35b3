//! beatoraja IR score submission parser.
//!
//! A submission carries one score for one chart, identified by the chart
//! file's SHA-256. It is turned into a single BATCH-MANUAL style entry that
//! matches on `bmsChartHash`.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use super::{BatchManualScore, ContextVersion, HitMetaValue, ImportContext, MatchType, ParserResult};
use crate::convert::{BeatorajaScore, ClearType};
use crate::error::{FatalImportError, ImportResult};
use crate::game::Game;
use crate::validate::{Schema, ValidateOptions, format_validation_error, validate};

pub const BEATORAJA_SERVICE: &str = "beatoraja";

const JUDGEMENT_FIELDS: [&str; 12] = [
    "epg", "lpg", "egr", "lgr", "egd", "lgd", "ebd", "lbd", "epr", "lpr", "ems", "lms",
];

/// Largest `date` (unix seconds) whose millisecond value fits an `i64`.
const MAX_DATE_SECS: i64 = i64::MAX / 1000;

fn judgement_count() -> Schema {
    Schema::integer_between(0, u32::MAX.into())
}

fn submission_schema() -> Schema {
    let mut fields = vec![
        ("sha256", Schema::String),
        ("exscore", judgement_count().optional()),
        ("clear", Schema::integer_between(0, 10)),
    ];
    fields.extend(JUDGEMENT_FIELDS.iter().map(|name| (*name, judgement_count())));
    fields.extend([
        ("combo", judgement_count()),
        ("minbp", judgement_count()),
        ("notes", judgement_count().optional()),
        ("date", Schema::integer_between(0, MAX_DATE_SECS).nullable().optional()),
        ("mode", Schema::one_of(["BEAT_7K", "BEAT_14K"]).optional()),
    ]);
    Schema::object(fields)
}

fn to_entry(sub: &BeatorajaScore) -> ImportResult<BatchManualScore> {
    let clear = sub.clear_type().ok_or_else(|| {
        FatalImportError::client(format!("Invalid beatoraja clear type {}", sub.clear))
    })?;

    let too_large =
        || FatalImportError::client("Invalid beatoraja score: judgement counts are too large");
    let sum = |early: u32, late: u32| early.checked_add(late).ok_or_else(too_large);

    let hit_data = BTreeMap::from([
        ("pgreat".to_string(), Some(sum(sub.epg, sub.lpg)?)),
        ("great".to_string(), Some(sum(sub.egr, sub.lgr)?)),
        ("good".to_string(), Some(sum(sub.egd, sub.lgd)?)),
        ("bad".to_string(), Some(sum(sub.ebd, sub.lbd)?)),
        ("poor".to_string(), Some(sum(sub.epr, sub.lpr)?)),
    ]);

    let count = |n: u32| Some(HitMetaValue::Number(f64::from(n)));
    let hit_meta = BTreeMap::from([
        ("epg".to_string(), count(sub.epg)),
        ("lpg".to_string(), count(sub.lpg)),
        ("egr".to_string(), count(sub.egr)),
        ("lgr".to_string(), count(sub.lgr)),
        ("egd".to_string(), count(sub.egd)),
        ("lgd".to_string(), count(sub.lgd)),
        ("ebd".to_string(), count(sub.ebd)),
        ("lbd".to_string(), count(sub.lbd)),
        ("epr".to_string(), count(sub.epr)),
        ("lpr".to_string(), count(sub.lpr)),
        ("maxCombo".to_string(), count(sub.combo)),
        ("bp".to_string(), count(sub.minbp)),
    ]);

    // 0 is what beatoraja sends when it has no date
    let time_achieved = match sub.date.filter(|d| *d > 0) {
        Some(secs) => Some(secs.checked_mul(1000).ok_or_else(|| {
            FatalImportError::client(format!("Invalid beatoraja score: date {} is out of range", secs))
        })? as f64),
        None => None,
    };

    Ok(BatchManualScore {
        score: f64::from(sub.ex_score().ok_or_else(too_large)?),
        lamp: clear.lamp().to_string(),
        match_type: MatchType::BmsChartHash,
        identifier: sub.sha256.clone(),
        playtype: Some(sub.mode.playtype()),
        difficulty: None,
        time_achieved,
        hit_data: Some(hit_data),
        hit_meta: Some(hit_meta),
    })
}

/// Parse one beatoraja IR score submission.
pub fn parse_beatoraja_score(data: &Value) -> ImportResult<ParserResult<'static, BatchManualScore>> {
    if let Some(err) = validate(data, &submission_schema(), ValidateOptions::allow_excess_keys()) {
        return Err(FatalImportError::client(format_validation_error(
            &err,
            "Invalid beatoraja score",
        )));
    }

    let submission: BeatorajaScore = serde_json::from_value(data.clone())
        .map_err(|e| FatalImportError::client(format!("Invalid beatoraja score: {}", e)))?;
    let entry = to_entry(&submission)?;

    debug!(sha256 = %entry.identifier, lamp = %entry.lamp, "Parsed beatoraja score");

    let context = ImportContext {
        service: Some(BEATORAJA_SERVICE.to_string()),
        game: Some(Game::Bms),
        version: ContextVersion::Absent,
    };

    Ok(ParserResult::new(Game::Bms, context, std::iter::once(Ok(entry))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Playtype;
    use serde_json::json;

    fn submission() -> Value {
        json!({
            "sha256": "f".repeat(64),
            "player": "",
            "clear": 6,
            "date": 1_620_768_609,
            "epg": 300, "lpg": 200, "egr": 100, "lgr": 50,
            "egd": 5, "lgd": 5, "ebd": 2, "lbd": 1, "epr": 3, "lpr": 4,
            "ems": 1, "lms": 0,
            "combo": 412, "minbp": 11, "notes": 1000,
            "deviceType": "KEYBOARD",
        })
    }

    #[test]
    fn test_parse_submission() {
        let res = parse_beatoraja_score(&submission()).unwrap();
        assert_eq!(res.game, Game::Bms);
        assert_eq!(
            serde_json::to_value(&res.context).unwrap(),
            json!({ "service": "beatoraja", "game": "bms" })
        );

        let entry = res.into_items().unwrap().remove(0);
        assert_eq!(entry.match_type, MatchType::BmsChartHash);
        assert_eq!(entry.identifier, "f".repeat(64));
        assert_eq!(entry.lamp, "HARD CLEAR");
        assert_eq!(entry.score, 1150.0);
        assert_eq!(entry.playtype, Some(Playtype::Keys7));
        assert_eq!(entry.time_achieved, Some(1_620_768_609_000.0));

        let hit_data = entry.hit_data.unwrap();
        assert_eq!(hit_data["pgreat"], Some(500));
        assert_eq!(hit_data["poor"], Some(7));
        assert_eq!(entry.hit_meta.unwrap()["bp"], Some(HitMetaValue::Number(11.0)));
    }

    #[test]
    fn test_exscore_is_preferred() {
        let mut data = submission();
        data["exscore"] = json!(1234);
        data["mode"] = json!("BEAT_14K");

        let entry = parse_beatoraja_score(&data).unwrap().into_items().unwrap().remove(0);
        assert_eq!(entry.score, 1234.0);
        assert_eq!(entry.playtype, Some(Playtype::Keys14));
    }

    #[test]
    fn test_invalid_clear() {
        let mut data = submission();
        data["clear"] = json!(11);

        let err = parse_beatoraja_score(&data).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.message,
            "Invalid beatoraja score: clear | Expected an integer between 0 and 10. | Received 11 [number]."
        );
    }

    #[test]
    fn test_missing_hash() {
        let mut data = submission();
        data.as_object_mut().unwrap().remove("sha256");

        let err = parse_beatoraja_score(&data).unwrap_err();
        assert!(err.message.starts_with("Invalid beatoraja score: sha256 | Expected string."));
    }

    #[test]
    fn test_zero_date_means_unknown() {
        let mut data = submission();
        data["date"] = json!(0);

        let entry = parse_beatoraja_score(&data).unwrap().into_items().unwrap().remove(0);
        assert_eq!(entry.time_achieved, None);
    }

    #[test]
    fn test_oversized_counts_rejected() {
        let mut data = submission();
        data["epg"] = json!(3_000_000_000_u64);

        let err = parse_beatoraja_score(&data).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message, "Invalid beatoraja score: judgement counts are too large");

        data["epg"] = json!(5_000_000_000_u64);
        let err = parse_beatoraja_score(&data).unwrap_err();
        assert_eq!(
            err.message,
            "Invalid beatoraja score: epg | Expected an integer between 0 and 4294967295. | Received 5000000000 [number]."
        );
    }

    #[test]
    fn test_date_out_of_range() {
        let mut data = submission();
        data["date"] = json!(10_000_000_000_000_000_i64);

        let err = parse_beatoraja_score(&data).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.message.starts_with("Invalid beatoraja score: date | Expected an integer between 0 and"));

        data["date"] = json!(MAX_DATE_SECS);
        let entry = parse_beatoraja_score(&data).unwrap().into_items().unwrap().remove(0);
        assert_eq!(entry.time_achieved, Some((MAX_DATE_SECS * 1000) as f64));
    }
}

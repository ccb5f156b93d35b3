//! Canonical records to peer-protocol wire formats.
//!
//! Conversions are pure functions of their inputs, so a batch can be mapped
//! on the rayon pool without any coordination.

mod beatoraja;

pub use beatoraja::{BeatorajaMode, BeatorajaScore, ClearType};

use std::collections::BTreeMap;

use chrono::DateTime;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::chart::ChartRecord;
use crate::game::{Game, Playtype};
use crate::import::HitMetaValue;
use crate::normalize::CanonicalScore;

/// A player's best score on one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbScore {
    #[serde(rename = "userID")]
    pub user_id: u32,
    pub username: String,
    #[serde(rename = "chartID")]
    pub chart_id: String,
    pub game: Game,
    pub playtype: Playtype,
    pub score: f64,
    pub lamp: String,
    #[serde(default)]
    pub hit_data: BTreeMap<String, u32>,
    #[serde(default)]
    pub hit_meta: BTreeMap<String, HitMetaValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_achieved: Option<i64>,
}

impl PbScore {
    pub fn from_canonical(score: &CanonicalScore, user_id: u32, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            chart_id: score.chart_id.clone(),
            game: score.game,
            playtype: score.playtype,
            score: score.score,
            lamp: score.lamp.clone(),
            hit_data: score.hit_data.clone(),
            hit_meta: score.hit_meta.clone(),
            time_achieved: score.time_achieved,
        }
    }

    fn judgement(&self, key: &str) -> u32 {
        self.hit_data.get(key).copied().unwrap_or(0)
    }

    fn meta_count(&self, key: &str) -> Option<u32> {
        self.hit_meta
            .get(key)
            .and_then(HitMetaValue::as_f64)
            .map(|n| n.max(0.0) as u32)
    }

    /// Early/late split of a judgement. Without hit-meta timing the whole
    /// count is reported as early.
    fn split(&self, judgement: &str, early: &str, late: &str) -> (u32, u32) {
        match (self.meta_count(early), self.meta_count(late)) {
            (Some(e), Some(l)) => (e, l),
            _ => (self.judgement(judgement), 0),
        }
    }
}

/// Render `pb` as beatoraja expects it from the chart-scores endpoint.
///
/// `viewer_id` is the requesting user; their own score is sent with an empty
/// player name.
pub fn to_beatoraja_format(pb: &PbScore, chart: &ChartRecord, viewer_id: u32) -> BeatorajaScore {
    let (epg, lpg) = pb.split("pgreat", "epg", "lpg");
    let (egr, lgr) = pb.split("great", "egr", "lgr");
    let (egd, lgd) = pb.split("good", "egd", "lgd");
    let (ebd, lbd) = pb.split("bad", "ebd", "lbd");
    let (epr, lpr) = pb.split("poor", "epr", "lpr");

    let notes = chart.notecount.unwrap_or(0);

    BeatorajaScore {
        sha256: chart.hash_sha256.clone().unwrap_or_default(),
        player: if pb.user_id == viewer_id {
            String::new()
        } else {
            pb.username.clone()
        },
        clear: ClearType::from_lamp(&pb.lamp).unwrap_or_default().code(),
        date: pb
            .time_achieved
            .and_then(DateTime::from_timestamp_millis)
            .map(|t| t.timestamp()),
        epg,
        lpg,
        egr,
        lgr,
        egd,
        lgd,
        ebd,
        lbd,
        epr,
        lpr,
        ems: 0,
        lms: 0,
        combo: pb.meta_count("maxCombo").unwrap_or(0),
        minbp: pb
            .meta_count("bp")
            .unwrap_or_else(|| pb.judgement("bad").saturating_add(pb.judgement("poor"))),
        notes,
        passnotes: notes,
        mode: BeatorajaMode::from_playtype(chart.playtype),
        exscore: Some(pb.score.max(0.0).round() as u32),
    }
}

/// Convert many records in parallel. Output order follows input order.
pub fn to_beatoraja_many(pbs: &[PbScore], chart: &ChartRecord, viewer_id: u32) -> Vec<BeatorajaScore> {
    pbs.par_iter()
        .map(|pb| to_beatoraja_format(pb, chart, viewer_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> ChartRecord {
        ChartRecord {
            chart_id: "bms1".to_string(),
            song_id: "10".to_string(),
            game: Game::Bms,
            playtype: Playtype::Keys7,
            difficulty: "CHART".to_string(),
            title: "Test Song".to_string(),
            in_game_id: None,
            hash_sha256: Some("a".repeat(64)),
            notecount: Some(1000),
        }
    }

    fn pb(user_id: u32) -> PbScore {
        PbScore {
            user_id,
            username: format!("user{}", user_id),
            chart_id: "bms1".to_string(),
            game: Game::Bms,
            playtype: Playtype::Keys7,
            score: 1500.0,
            lamp: "HARD CLEAR".to_string(),
            hit_data: BTreeMap::from([
                ("pgreat".to_string(), 600),
                ("great".to_string(), 300),
                ("bad".to_string(), 4),
                ("poor".to_string(), 6),
            ]),
            hit_meta: BTreeMap::new(),
            time_achieved: Some(1_620_768_609_637),
        }
    }

    #[test]
    fn test_basic_conversion() {
        let score = to_beatoraja_format(&pb(2), &chart(), 1);

        assert_eq!(score.sha256, "a".repeat(64));
        assert_eq!(score.player, "user2");
        assert_eq!(score.clear, ClearType::Hard.code());
        assert_eq!(score.date, Some(1_620_768_609));
        assert_eq!((score.epg, score.lpg), (600, 0));
        assert_eq!((score.egr, score.lgr), (300, 0));
        assert_eq!(score.minbp, 10);
        assert_eq!(score.notes, 1000);
        assert_eq!(score.mode, BeatorajaMode::Beat7K);
        assert_eq!(score.exscore, Some(1500));
    }

    #[test]
    fn test_viewer_gets_empty_player() {
        let score = to_beatoraja_format(&pb(1), &chart(), 1);
        assert_eq!(score.player, "");
    }

    #[test]
    fn test_uses_early_late_hit_meta() {
        let mut pb = pb(2);
        pb.hit_meta = BTreeMap::from([
            ("epg".to_string(), HitMetaValue::Number(350.0)),
            ("lpg".to_string(), HitMetaValue::Number(250.0)),
            ("bp".to_string(), HitMetaValue::Number(8.0)),
            ("maxCombo".to_string(), HitMetaValue::Number(412.0)),
        ]);

        let score = to_beatoraja_format(&pb, &chart(), 1);
        assert_eq!((score.epg, score.lpg), (350, 250));
        assert_eq!(score.minbp, 8);
        assert_eq!(score.combo, 412);
    }

    #[test]
    fn test_is_deterministic() {
        let a = to_beatoraja_format(&pb(2), &chart(), 1);
        let b = to_beatoraja_format(&pb(2), &chart(), 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_many_preserves_order() {
        let pbs: Vec<PbScore> = (0..64).map(pb).collect();
        let scores = to_beatoraja_many(&pbs, &chart(), 0);

        assert_eq!(scores.len(), 64);
        assert_eq!(scores[0].player, "");
        for (i, score) in scores.iter().enumerate().skip(1) {
            assert_eq!(score.player, format!("user{}", i));
        }
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(to_beatoraja_format(&pb(2), &chart(), 1)).unwrap();
        assert_eq!(value["mode"], "BEAT_7K");
        assert_eq!(value["clear"], 6);
        assert_eq!(value["exscore"], 1500);
    }

    #[test]
    fn test_minbp_fallback_saturates() {
        let mut pb = pb(2);
        pb.hit_data.insert("bad".to_string(), u32::MAX);
        pb.hit_data.insert("poor".to_string(), 1);

        let score = to_beatoraja_format(&pb, &chart(), 1);
        assert_eq!(score.minbp, u32::MAX);
    }
}

//! Raw entries to canonical scores.
//!
//! Structural validation has already happened in the parser. This pass
//! resolves the chart and re-checks every field against the configuration
//! of the chart's own (game, playtype).

mod shaper;

pub use shaper::{BeatmaniaShaper, HitMetaShaper, PassthroughShaper, shaper_for};

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::{ChartMatch, ChartResolver};
use crate::error::{FatalImportError, ImportResult};
use crate::game::{GAUGE_SET_KEYS, Game, GameConfig, GamePtConfig, HitMetaKind, Playtype};
use crate::import::{BatchManualScore, HitMetaValue, ImportContext};
use crate::import::batch_manual::MIN_TIME_ACHIEVED_MS;

/// A score bound to a concrete chart with every field checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalScore {
    pub game: Game,
    pub playtype: Playtype,
    #[serde(rename = "chartID")]
    pub chart_id: String,
    #[serde(rename = "songID")]
    pub song_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub score: f64,
    pub lamp: String,
    pub hit_data: BTreeMap<String, u32>,
    pub hit_meta: BTreeMap<String, HitMetaValue>,
    /// Milliseconds since the unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_achieved: Option<i64>,
}

impl CanonicalScore {
    pub fn achieved_at(&self) -> Option<DateTime<Utc>> {
        self.time_achieved.and_then(DateTime::from_timestamp_millis)
    }
}

pub struct ScoreNormalizer<'a> {
    config: &'a GameConfig,
    resolver: &'a dyn ChartResolver,
}

impl<'a> ScoreNormalizer<'a> {
    pub fn new(config: &'a GameConfig, resolver: &'a dyn ChartResolver) -> Self {
        Self { config, resolver }
    }

    /// Normalize one entry of a `game` import.
    ///
    /// The result depends only on the arguments: normalizing the same entry
    /// twice gives identical records.
    pub fn normalize(
        &self,
        raw: &BatchManualScore,
        game: Game,
        context: &ImportContext,
    ) -> ImportResult<CanonicalScore> {
        let info = self
            .config
            .game(game)
            .ok_or_else(|| FatalImportError::server(format!("Game {} is not configured", game)))?;

        let playtype = raw.playtype.unwrap_or(info.default_playtype);
        if !info.playtypes.contains(&playtype) {
            return Err(FatalImportError::client(format!(
                "Invalid playtype {} for {}",
                playtype, game
            )));
        }

        let descriptor = ChartMatch {
            match_type: raw.match_type,
            identifier: &raw.identifier,
            playtype,
            difficulty: raw.difficulty.as_deref(),
        };

        let Some(chart) = self.resolver.resolve(game, &descriptor) else {
            debug!(
                game = %game,
                match_type = %raw.match_type,
                identifier = %raw.identifier,
                "Chart not found"
            );
            return Err(FatalImportError::client(format!(
                "Could not find chart with {} {} for {} {}",
                raw.match_type, raw.identifier, game, playtype
            )));
        };

        let pt = self.config.pt(game, chart.playtype).ok_or_else(|| {
            FatalImportError::server(format!(
                "No configuration for {} {}",
                game, chart.playtype
            ))
        })?;

        check_score(raw.score)?;
        check_lamp(pt, &raw.lamp)?;

        if let Some(difficulty) = &raw.difficulty
            && !pt.has_difficulty(difficulty)
        {
            return Err(FatalImportError::client(format!(
                "Invalid difficulty {} for {} {}",
                difficulty, game, pt.playtype
            )));
        }

        let time_achieved = raw.time_achieved.map(check_time).transpose()?;
        let hit_data = hit_data(pt, raw)?;
        let mut hit_meta = hit_meta(pt, raw)?;
        shaper_for(game).shape(&hit_data, &mut hit_meta)?;

        Ok(CanonicalScore {
            game,
            playtype: chart.playtype,
            chart_id: chart.chart_id,
            song_id: chart.song_id,
            service: context.service.clone(),
            score: raw.score,
            lamp: raw.lamp.clone(),
            hit_data,
            hit_meta,
            time_achieved,
        })
    }
}

fn check_score(score: f64) -> ImportResult<()> {
    if score.is_finite() && score >= 0.0 {
        Ok(())
    } else {
        Err(FatalImportError::client(format!(
            "Invalid score {} - expected a non-negative number",
            score
        )))
    }
}

fn check_lamp(pt: &GamePtConfig, lamp: &str) -> ImportResult<()> {
    if pt.lamp_index(lamp).is_some() {
        return Ok(());
    }
    Err(FatalImportError::client(format!(
        "Invalid lamp {} for {} {} - expected any of {}",
        lamp,
        pt.game,
        pt.playtype,
        pt.lamps.join(", ")
    )))
}

fn check_time(time: f64) -> ImportResult<i64> {
    if time > MIN_TIME_ACHIEVED_MS && time.is_finite() {
        Ok(time as i64)
    } else {
        Err(FatalImportError::client(format!(
            "Invalid timeAchieved {} - expected unix milliseconds, not seconds",
            time
        )))
    }
}

/// Null counts are dropped.
fn hit_data(pt: &GamePtConfig, raw: &BatchManualScore) -> ImportResult<BTreeMap<String, u32>> {
    let mut out = BTreeMap::new();
    for (key, value) in raw.hit_data.iter().flatten() {
        if !pt.has_judgement(key) {
            return Err(FatalImportError::client(format!(
                "Invalid hitData key {} for {} {} - expected any of {}",
                key,
                pt.game,
                pt.playtype,
                pt.judgements.join(", ")
            )));
        }
        if let Some(count) = value {
            out.insert(key.clone(), *count);
        }
    }
    Ok(out)
}

fn kind_matches(kind: HitMetaKind, value: &HitMetaValue) -> bool {
    match (kind, value) {
        (HitMetaKind::Count, HitMetaValue::Number(n)) => *n >= 0.0 && n.fract() == 0.0,
        (HitMetaKind::Percent | HitMetaKind::Number, HitMetaValue::Number(_)) => true,
        (HitMetaKind::Gauges, HitMetaValue::Sequence(_)) => true,
        (HitMetaKind::GaugeSet, HitMetaValue::GaugeSet(set)) => {
            set.keys().all(|k| GAUGE_SET_KEYS.contains(&k.as_str()))
        }
        _ => false,
    }
}

/// Null values are dropped.
fn hit_meta(
    pt: &GamePtConfig,
    raw: &BatchManualScore,
) -> ImportResult<BTreeMap<String, HitMetaValue>> {
    let mut out = BTreeMap::new();
    for (key, value) in raw.hit_meta.iter().flatten() {
        let Some(field) = pt.hit_meta_field(key) else {
            return Err(FatalImportError::client(format!(
                "Invalid hitMeta key {} for {} {}",
                key, pt.game, pt.playtype
            )));
        };
        let Some(value) = value else {
            continue;
        };
        if !kind_matches(field.kind, value) {
            return Err(FatalImportError::client(format!(
                "Invalid hitMeta.{} for {} {}",
                key, pt.game, pt.playtype
            )));
        }
        out.insert(key.clone(), value.clone());
    }
    Ok(out)
}

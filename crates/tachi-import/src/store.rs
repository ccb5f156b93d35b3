//! Score storage seen by the IR endpoints.
//!
//! The real document store lives elsewhere; [`MemoryStore`] backs the CLI and
//! the tests, loading charts and personal bests from JSON files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::chart::{ChartMatch, ChartRecord, ChartResolver};
use crate::convert::PbScore;
use crate::error::Result;
use crate::game::Game;
use crate::import::MatchType;

pub trait ScoreStore {
    /// The BMS chart whose file hash is `sha256`.
    fn find_bms_chart(&self, sha256: &str) -> Option<ChartRecord>;

    /// Every personal best set on `chart_id`.
    fn pbs_on_chart(&self, chart_id: &str) -> Vec<PbScore>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    charts: Vec<ChartRecord>,
    pbs: Vec<PbScore>,
}

impl MemoryStore {
    pub fn new(charts: Vec<ChartRecord>, pbs: Vec<PbScore>) -> Self {
        Self { charts, pbs }
    }

    /// Load a JSON array of charts and, optionally, a JSON array of PBs.
    pub fn load<P: AsRef<Path>>(charts_path: P, pbs_path: Option<P>) -> Result<Self> {
        let charts: Vec<ChartRecord> = serde_json::from_str(&fs::read_to_string(&charts_path)?)?;
        let pbs: Vec<PbScore> = match pbs_path {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => Vec::new(),
        };

        debug!(charts = charts.len(), pbs = pbs.len(), "Loaded store");
        Ok(Self::new(charts, pbs))
    }

    pub fn charts(&self) -> &[ChartRecord] {
        &self.charts
    }

    pub fn insert_chart(&mut self, chart: ChartRecord) {
        self.charts.push(chart);
    }

    pub fn insert_pb(&mut self, pb: PbScore) {
        self.pbs.push(pb);
    }
}

impl ScoreStore for MemoryStore {
    fn find_bms_chart(&self, sha256: &str) -> Option<ChartRecord> {
        self.charts
            .iter()
            .find(|c| {
                c.game == Game::Bms
                    && c.hash_sha256
                        .as_deref()
                        .is_some_and(|h| h.eq_ignore_ascii_case(sha256))
            })
            .cloned()
    }

    fn pbs_on_chart(&self, chart_id: &str) -> Vec<PbScore> {
        self.pbs
            .iter()
            .filter(|pb| pb.chart_id == chart_id)
            .cloned()
            .collect()
    }
}

impl ChartResolver for MemoryStore {
    fn resolve(&self, game: Game, descriptor: &ChartMatch<'_>) -> Option<ChartRecord> {
        let mut found = self.charts.iter().filter(|c| c.matches(game, descriptor));
        let first = found.next()?;

        // A title without a difficulty can hit several charts of one song.
        let title_match = matches!(descriptor.match_type, MatchType::SongTitle | MatchType::Title);
        if title_match && found.next().is_some() {
            debug!(title = descriptor.identifier, "Ambiguous title match");
            return None;
        }

        Some(first.clone())
    }
}

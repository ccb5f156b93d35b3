//! Chart records and chart resolution.
//!
//! Resolution itself belongs to whatever stores charts; the pipeline only sees
//! the [`ChartResolver`] trait.

use serde::{Deserialize, Serialize};

use crate::game::{Game, Playtype};
use crate::import::MatchType;

/// One playable chart: a song at a specific playtype and difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRecord {
    #[serde(rename = "chartID")]
    pub chart_id: String,
    #[serde(rename = "songID")]
    pub song_id: String,
    pub game: Game,
    pub playtype: Playtype,
    pub difficulty: String,
    pub title: String,
    /// The game's own song ID, when it has one.
    #[serde(rename = "inGameID", default, skip_serializing_if = "Option::is_none")]
    pub in_game_id: Option<String>,
    #[serde(rename = "hashSHA256", default, skip_serializing_if = "Option::is_none")]
    pub hash_sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notecount: Option<u32>,
}

/// A raw entry's chart reference with the playtype already defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartMatch<'a> {
    pub match_type: MatchType,
    pub identifier: &'a str,
    pub playtype: Playtype,
    pub difficulty: Option<&'a str>,
}

impl ChartRecord {
    /// Whether this chart satisfies `descriptor` for `game`.
    ///
    /// A title match without a difficulty accepts every difficulty; the
    /// resolver decides what to do when that is ambiguous.
    pub fn matches(&self, game: Game, descriptor: &ChartMatch<'_>) -> bool {
        if self.game != game {
            return false;
        }

        let same_chart = |playtype: Playtype, difficulty: Option<&str>| {
            self.playtype == playtype && difficulty.is_none_or(|d| d == self.difficulty)
        };

        match descriptor.match_type {
            MatchType::ChartId => self.chart_id == descriptor.identifier,
            MatchType::BmsChartHash => self
                .hash_sha256
                .as_deref()
                .is_some_and(|h| h.eq_ignore_ascii_case(descriptor.identifier)),
            MatchType::KamaitachiSongId => {
                self.song_id == descriptor.identifier
                    && same_chart(descriptor.playtype, descriptor.difficulty)
            }
            MatchType::SongId => {
                self.in_game_id.as_deref() == Some(descriptor.identifier)
                    && same_chart(descriptor.playtype, descriptor.difficulty)
            }
            MatchType::SongTitle | MatchType::Title => {
                self.title.eq_ignore_ascii_case(descriptor.identifier)
                    && same_chart(descriptor.playtype, descriptor.difficulty)
            }
        }
    }
}

/// Looks charts up for the normalizer.
pub trait ChartResolver {
    /// The unique chart `descriptor` refers to, or `None` if there is no such
    /// chart or more than one.
    fn resolve(&self, game: Game, descriptor: &ChartMatch<'_>) -> Option<ChartRecord>;
}

impl<T: ChartResolver + ?Sized> ChartResolver for &T {
    fn resolve(&self, game: Game, descriptor: &ChartMatch<'_>) -> Option<ChartRecord> {
        (**self).resolve(game, descriptor)
    }
}

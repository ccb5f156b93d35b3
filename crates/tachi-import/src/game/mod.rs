//! Games, playtypes and their static configuration.
//!
//! - `Game` / `Playtype` - identifiers
//! - `GamePtConfig` - lamps, judgements, hit-meta keys and difficulties for one (game, playtype)
//! - `GameConfig` - the immutable registry every validator and normalizer consults

mod config;
mod standard;

pub use config::*;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Game {
    Iidx,
    Museca,
    Maimai,
    Jubeat,
    Popn,
    Sdvx,
    Ddr,
    Bms,
    Chunithm,
    Gitadora,
    Usc,
}

impl Game {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    EnumIter,
)]
pub enum Playtype {
    #[serde(rename = "SP")]
    #[strum(serialize = "SP")]
    Sp,
    #[serde(rename = "DP")]
    #[strum(serialize = "DP")]
    Dp,
    #[serde(rename = "Single")]
    #[strum(serialize = "Single")]
    Single,
    #[serde(rename = "7K")]
    #[strum(serialize = "7K")]
    Keys7,
    #[serde(rename = "14K")]
    #[strum(serialize = "14K")]
    Keys14,
    #[serde(rename = "9B")]
    #[strum(serialize = "9B")]
    Buttons9,
    #[serde(rename = "Gita")]
    #[strum(serialize = "Gita")]
    Gita,
    #[serde(rename = "Dora")]
    #[strum(serialize = "Dora")]
    Dora,
}

impl Playtype {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for Playtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_game_names_round_trip() {
        assert_eq!(Game::from_str("iidx").unwrap(), Game::Iidx);
        assert_eq!(Game::Chunithm.as_str(), "chunithm");
        assert!(Game::from_str("IIDX").is_err());
    }

    #[test]
    fn test_playtype_names() {
        assert_eq!(Playtype::from_str("7K").unwrap(), Playtype::Keys7);
        assert_eq!(Playtype::Sp.to_string(), "SP");
        assert_eq!(
            serde_json::to_value(Playtype::Keys14).unwrap(),
            serde_json::json!("14K")
        );
    }
}

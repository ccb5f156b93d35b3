//! beatoraja IR wire format.

use serde::{Deserialize, Serialize};
use strum::{FromRepr, IntoStaticStr};

use crate::game::Playtype;

/// beatoraja clear type, by its protocol code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, FromRepr, IntoStaticStr,
)]
#[repr(u8)]
pub enum ClearType {
    #[default]
    NoPlay = 0,
    Failed = 1,
    AssistEasy = 2,
    LightAssistEasy = 3,
    Easy = 4,
    Normal = 5,
    Hard = 6,
    ExHard = 7,
    FullCombo = 8,
    Perfect = 9,
    Max = 10,
}

impl ClearType {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Clear type sent for a BMS lamp.
    pub fn from_lamp(lamp: &str) -> Option<Self> {
        match lamp {
            "NO PLAY" => Some(Self::NoPlay),
            "FAILED" => Some(Self::Failed),
            "ASSIST CLEAR" => Some(Self::LightAssistEasy),
            "EASY CLEAR" => Some(Self::Easy),
            "CLEAR" => Some(Self::Normal),
            "HARD CLEAR" => Some(Self::Hard),
            "EX HARD CLEAR" => Some(Self::ExHard),
            "FULL COMBO" => Some(Self::FullCombo),
            _ => None,
        }
    }

    /// BMS lamp for this clear type. Both assist clears share a lamp, as do
    /// full combo and everything above it.
    pub fn lamp(&self) -> &'static str {
        match self {
            Self::NoPlay => "NO PLAY",
            Self::Failed => "FAILED",
            Self::AssistEasy | Self::LightAssistEasy => "ASSIST CLEAR",
            Self::Easy => "EASY CLEAR",
            Self::Normal => "CLEAR",
            Self::Hard => "HARD CLEAR",
            Self::ExHard => "EX HARD CLEAR",
            Self::FullCombo | Self::Perfect | Self::Max => "FULL COMBO",
        }
    }
}

impl std::fmt::Display for ClearType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &'static str = self.into();
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BeatorajaMode {
    #[default]
    #[serde(rename = "BEAT_7K")]
    Beat7K,
    #[serde(rename = "BEAT_14K")]
    Beat14K,
}

impl BeatorajaMode {
    pub fn from_playtype(playtype: Playtype) -> Self {
        match playtype {
            Playtype::Keys14 => Self::Beat14K,
            _ => Self::Beat7K,
        }
    }

    pub fn playtype(&self) -> Playtype {
        match self {
            Self::Beat7K => Playtype::Keys7,
            Self::Beat14K => Playtype::Keys14,
        }
    }
}

/// One score as beatoraja's IR protocol sends and receives it.
///
/// Judgement counts are split into early (`e*`) and late (`l*`) halves.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BeatorajaScore {
    pub sha256: String,
    /// Empty for the requesting player's own score.
    pub player: String,
    pub clear: u8,
    /// Unix seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,
    pub epg: u32,
    pub lpg: u32,
    pub egr: u32,
    pub lgr: u32,
    pub egd: u32,
    pub lgd: u32,
    pub ebd: u32,
    pub lbd: u32,
    pub epr: u32,
    pub lpr: u32,
    pub ems: u32,
    pub lms: u32,
    pub combo: u32,
    pub minbp: u32,
    pub notes: u32,
    pub passnotes: u32,
    pub mode: BeatorajaMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exscore: Option<u32>,
}

impl BeatorajaScore {
    pub fn clear_type(&self) -> Option<ClearType> {
        ClearType::from_u8(self.clear)
    }

    /// `exscore` if sent, otherwise 2 per PGREAT and 1 per GREAT. `None` when
    /// the computed score does not fit a `u32`.
    pub fn ex_score(&self) -> Option<u32> {
        if let Some(exscore) = self.exscore {
            return Some(exscore);
        }
        self.epg
            .checked_add(self.lpg)?
            .checked_mul(2)?
            .checked_add(self.egr)?
            .checked_add(self.lgr)
    }
}

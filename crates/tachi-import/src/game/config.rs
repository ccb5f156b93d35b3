use std::collections::HashMap;

use strum::IntoEnumIterator;

use super::{Game, Playtype};
use crate::validate::Schema;

/// Value shape of a hit-meta key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitMetaKind {
    /// Non-negative integer (bp, fast, maxCombo, ...).
    Count,
    /// Number in 0..=100.
    Percent,
    /// Any number.
    Number,
    /// Sequence of gauge values (nullable entries).
    Gauges,
    /// Named gauge histories, e.g. `{ EASY: [...], NORMAL: [...] }`.
    GaugeSet,
}

impl HitMetaKind {
    pub fn schema(&self) -> Schema {
        match self {
            Self::Count => Schema::positive_integer(),
            Self::Percent => Schema::number_between(0.0, 100.0),
            Self::Number => Schema::Number,
            Self::Gauges => Schema::array(Schema::Number.nullable()),
            Self::GaugeSet => Schema::record(GAUGE_SET_KEYS, Schema::array(Schema::Number.nullable())),
        }
    }
}

pub const GAUGE_SET_KEYS: [&str; 4] = ["EASY", "NORMAL", "HARD", "EX_HARD"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitMetaField {
    pub name: &'static str,
    pub kind: HitMetaKind,
}

/// Static configuration for one (game, playtype).
#[derive(Debug, Clone)]
pub struct GamePtConfig {
    pub game: Game,
    pub playtype: Playtype,
    /// Valid lamps, worst to best.
    pub lamps: Vec<&'static str>,
    /// Display colour per lamp, parallel to `lamps`.
    pub lamp_colours: Vec<&'static str>,
    /// Lowest lamp that counts as a clear.
    pub clear_lamp: &'static str,
    /// Valid hit-data keys.
    pub judgements: Vec<&'static str>,
    pub hit_meta: Vec<HitMetaField>,
    pub difficulties: Vec<&'static str>,
}

impl GamePtConfig {
    pub fn lamp_index(&self, lamp: &str) -> Option<usize> {
        self.lamps.iter().position(|l| *l == lamp)
    }

    pub fn lamp_colour(&self, lamp: &str) -> Option<&'static str> {
        self.lamp_index(lamp).and_then(|i| self.lamp_colours.get(i).copied())
    }

    pub fn is_clear(&self, lamp: &str) -> bool {
        match (self.lamp_index(lamp), self.lamp_index(self.clear_lamp)) {
            (Some(lamp), Some(clear)) => lamp >= clear,
            _ => false,
        }
    }

    pub fn has_judgement(&self, key: &str) -> bool {
        self.judgements.iter().any(|j| *j == key)
    }

    pub fn hit_meta_field(&self, key: &str) -> Option<&HitMetaField> {
        self.hit_meta.iter().find(|f| f.name == key)
    }

    pub fn has_difficulty(&self, difficulty: &str) -> bool {
        self.difficulties.iter().any(|d| *d == difficulty)
    }
}

/// Per-game facts that are independent of playtype.
#[derive(Debug, Clone)]
pub struct GameInfo {
    pub game: Game,
    pub name: &'static str,
    pub playtypes: Vec<Playtype>,
    pub default_playtype: Playtype,
}

/// Immutable registry of every configured game and (game, playtype).
///
/// Built once at startup and shared by reference; there is no writer after
/// construction, so concurrent readers need no locking.
#[derive(Debug, Clone)]
pub struct GameConfig {
    games: Vec<GameInfo>,
    playtypes: HashMap<(Game, Playtype), GamePtConfig>,
}

impl GameConfig {
    pub fn new(games: Vec<GameInfo>, playtypes: Vec<GamePtConfig>) -> Self {
        let playtypes = playtypes
            .into_iter()
            .map(|pt| ((pt.game, pt.playtype), pt))
            .collect();
        Self { games, playtypes }
    }

    /// The full built-in configuration.
    pub fn standard() -> Self {
        super::standard::standard_config()
    }

    /// Configured games in declaration order.
    pub fn games(&self) -> impl Iterator<Item = Game> + '_ {
        self.games.iter().map(|g| g.game)
    }

    pub fn game(&self, game: Game) -> Option<&GameInfo> {
        self.games.iter().find(|g| g.game == game)
    }

    /// Look a game up by its identifier, accepting only configured games.
    pub fn parse_game(&self, name: &str) -> Option<Game> {
        Game::iter().find(|g| g.as_str() == name && self.game(*g).is_some())
    }

    pub fn pt(&self, game: Game, playtype: Playtype) -> Option<&GamePtConfig> {
        self.playtypes.get(&(game, playtype))
    }

    /// All playtype configs of a game, in the game's playtype order.
    pub fn game_pts(&self, game: Game) -> Vec<&GamePtConfig> {
        self.game(game)
            .map(|info| {
                info.playtypes
                    .iter()
                    .filter_map(|pt| self.pt(game, *pt))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Union of lamps over every playtype of a game, order preserved.
    pub fn lamps_for_game(&self, game: Game) -> Vec<&'static str> {
        union(self.game_pts(game).iter().flat_map(|pt| pt.lamps.iter().copied()))
    }

    pub fn judgements_for_game(&self, game: Game) -> Vec<&'static str> {
        union(self.game_pts(game).iter().flat_map(|pt| pt.judgements.iter().copied()))
    }

    pub fn hit_meta_for_game(&self, game: Game) -> Vec<HitMetaField> {
        let mut fields: Vec<HitMetaField> = Vec::new();
        for field in self.game_pts(game).iter().flat_map(|pt| pt.hit_meta.iter()) {
            if !fields.iter().any(|f| f.name == field.name) {
                fields.push(*field);
            }
        }
        fields
    }
}

fn union(items: impl Iterator<Item = &'static str>) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

use super::{Game, GameConfig, GameInfo, GamePtConfig, HitMetaField, HitMetaKind, Playtype};

use HitMetaKind::*;

struct PtTable {
    lamps: &'static [(&'static str, &'static str)],
    clear_lamp: &'static str,
    judgements: &'static [&'static str],
    hit_meta: &'static [(&'static str, HitMetaKind)],
    difficulties: &'static [&'static str],
}

const BEATMANIA_LAMPS: &[(&str, &str)] = &[
    ("NO PLAY", "#cccccc"),
    ("FAILED", "#ff3333"),
    ("ASSIST CLEAR", "#cc66ff"),
    ("EASY CLEAR", "#66ff33"),
    ("CLEAR", "#3399ff"),
    ("HARD CLEAR", "#ffffff"),
    ("EX HARD CLEAR", "#ffcc00"),
    ("FULL COMBO", "#66ffff"),
];

const BEATMANIA_JUDGEMENTS: &[&str] = &["pgreat", "great", "good", "bad", "poor"];

const IIDX_HIT_META: &[(&str, HitMetaKind)] = &[
    ("fast", Count),
    ("slow", Count),
    ("maxCombo", Count),
    ("bp", Count),
    ("gauge", Percent),
    ("gaugeHistory", Gauges),
    ("comboBreak", Count),
    ("gsm", GaugeSet),
];

const BMS_HIT_META: &[(&str, HitMetaKind)] = &[
    ("fast", Count),
    ("slow", Count),
    ("maxCombo", Count),
    ("bp", Count),
    ("gauge", Percent),
    ("gaugeHistory", Gauges),
    ("epg", Count),
    ("lpg", Count),
    ("egr", Count),
    ("lgr", Count),
    ("egd", Count),
    ("lgd", Count),
    ("ebd", Count),
    ("lbd", Count),
    ("epr", Count),
    ("lpr", Count),
];

const COMMON_HIT_META: &[(&str, HitMetaKind)] =
    &[("fast", Count), ("slow", Count), ("maxCombo", Count)];

const GAUGE_HIT_META: &[(&str, HitMetaKind)] = &[
    ("fast", Count),
    ("slow", Count),
    ("maxCombo", Count),
    ("gauge", Percent),
];

const IIDX_SP: PtTable = PtTable {
    lamps: BEATMANIA_LAMPS,
    clear_lamp: "ASSIST CLEAR",
    judgements: BEATMANIA_JUDGEMENTS,
    hit_meta: IIDX_HIT_META,
    difficulties: &["BEGINNER", "NORMAL", "HYPER", "ANOTHER", "LEGGENDARIA"],
};

const IIDX_DP: PtTable = PtTable {
    difficulties: &["NORMAL", "HYPER", "ANOTHER", "LEGGENDARIA"],
    ..IIDX_SP
};

const BMS: PtTable = PtTable {
    lamps: BEATMANIA_LAMPS,
    clear_lamp: "ASSIST CLEAR",
    judgements: BEATMANIA_JUDGEMENTS,
    hit_meta: BMS_HIT_META,
    difficulties: &["CHART"],
};

const MUSECA: PtTable = PtTable {
    lamps: &[
        ("FAILED", "#ff3333"),
        ("CLEAR", "#66ff33"),
        ("CONNECT ALL", "#cc66ff"),
        ("PERFECT CONNECT ALL", "#ffcc00"),
    ],
    clear_lamp: "CLEAR",
    judgements: &["critical", "near", "miss"],
    hit_meta: COMMON_HIT_META,
    difficulties: &["Green", "Yellow", "Red"],
};

const MAIMAI: PtTable = PtTable {
    lamps: &[
        ("FAILED", "#ff3333"),
        ("CLEAR", "#66ff33"),
        ("FULL COMBO", "#66ffff"),
        ("ALL PERFECT", "#ffcc00"),
        ("ALL PERFECT+", "#ffffff"),
    ],
    clear_lamp: "CLEAR",
    judgements: &["perfect", "great", "good", "miss"],
    hit_meta: COMMON_HIT_META,
    difficulties: &["Easy", "Basic", "Advanced", "Expert", "Master", "Re:Master"],
};

const JUBEAT: PtTable = PtTable {
    lamps: &[
        ("FAILED", "#ff3333"),
        ("CLEAR", "#66ff33"),
        ("FULL COMBO", "#66ffff"),
        ("EXCELLENT", "#ffcc00"),
    ],
    clear_lamp: "CLEAR",
    judgements: &["perfect", "great", "good", "poor", "miss"],
    hit_meta: COMMON_HIT_META,
    difficulties: &["BSC", "ADV", "EXT"],
};

const POPN: PtTable = PtTable {
    lamps: &[
        ("FAILED", "#ff3333"),
        ("EASY CLEAR", "#66ff33"),
        ("CLEAR", "#3399ff"),
        ("FULL COMBO", "#66ffff"),
        ("PERFECT", "#ffcc00"),
    ],
    clear_lamp: "EASY CLEAR",
    judgements: &["cool", "great", "good", "bad"],
    hit_meta: GAUGE_HIT_META,
    difficulties: &["Easy", "Normal", "Hyper", "EX"],
};

const SDVX: PtTable = PtTable {
    lamps: &[
        ("FAILED", "#ff3333"),
        ("CLEAR", "#66ff33"),
        ("EXCESSIVE CLEAR", "#cc66ff"),
        ("ULTIMATE CHAIN", "#66ffff"),
        ("PERFECT ULTIMATE CHAIN", "#ffcc00"),
    ],
    clear_lamp: "CLEAR",
    judgements: &["critical", "near", "miss"],
    hit_meta: GAUGE_HIT_META,
    difficulties: &["NOV", "ADV", "EXH", "MXM", "INF", "GRV", "HVN", "VVD"],
};

const USC: PtTable = PtTable {
    difficulties: &["NOV", "ADV", "EXH", "INF"],
    ..SDVX
};

const DDR_SP: PtTable = PtTable {
    lamps: &[
        ("FAILED", "#ff3333"),
        ("CLEAR", "#66ff33"),
        ("LIFE4", "#ff9933"),
        ("FULL COMBO", "#3399ff"),
        ("GREAT FULL COMBO", "#66ff66"),
        ("PERFECT FULL COMBO", "#ffcc00"),
        ("MARVELOUS FULL COMBO", "#ffffff"),
    ],
    clear_lamp: "CLEAR",
    judgements: &["marvelous", "perfect", "great", "good", "boo", "miss", "ok", "ng"],
    hit_meta: COMMON_HIT_META,
    difficulties: &["BEGINNER", "BASIC", "DIFFICULT", "EXPERT", "CHALLENGE"],
};

const DDR_DP: PtTable = PtTable {
    difficulties: &["BASIC", "DIFFICULT", "EXPERT", "CHALLENGE"],
    ..DDR_SP
};

const CHUNITHM: PtTable = PtTable {
    lamps: &[
        ("FAILED", "#ff3333"),
        ("CLEAR", "#66ff33"),
        ("FULL COMBO", "#66ffff"),
        ("ALL JUSTICE", "#ffcc00"),
        ("ALL JUSTICE CRITICAL", "#ffffff"),
    ],
    clear_lamp: "CLEAR",
    judgements: &["jcrit", "justice", "attack", "miss"],
    hit_meta: COMMON_HIT_META,
    difficulties: &["BASIC", "ADVANCED", "EXPERT", "MASTER"],
};

const GITADORA: PtTable = PtTable {
    lamps: &[
        ("FAILED", "#ff3333"),
        ("CLEAR", "#66ff33"),
        ("FULL COMBO", "#66ffff"),
        ("EXCELLENT", "#ffcc00"),
    ],
    clear_lamp: "CLEAR",
    judgements: &["perfect", "great", "good", "ok", "miss"],
    hit_meta: COMMON_HIT_META,
    difficulties: &["BASIC", "ADVANCED", "EXTREME", "MASTER"],
};

const GITADORA_GITA: PtTable = PtTable {
    difficulties: &[
        "BASIC",
        "ADVANCED",
        "EXTREME",
        "MASTER",
        "BASS BASIC",
        "BASS ADVANCED",
        "BASS EXTREME",
        "BASS MASTER",
    ],
    ..GITADORA
};

fn build(game: Game, playtype: Playtype, table: &PtTable) -> GamePtConfig {
    GamePtConfig {
        game,
        playtype,
        lamps: table.lamps.iter().map(|(lamp, _)| *lamp).collect(),
        lamp_colours: table.lamps.iter().map(|(_, colour)| *colour).collect(),
        clear_lamp: table.clear_lamp,
        judgements: table.judgements.to_vec(),
        hit_meta: table
            .hit_meta
            .iter()
            .map(|&(name, kind)| HitMetaField { name, kind })
            .collect(),
        difficulties: table.difficulties.to_vec(),
    }
}

pub(super) fn standard_config() -> GameConfig {
    let table: [(Game, &'static str, &[(Playtype, &PtTable)]); 11] = [
        (Game::Iidx, "beatmania IIDX", &[(Playtype::Sp, &IIDX_SP), (Playtype::Dp, &IIDX_DP)]),
        (Game::Museca, "MÚSECA", &[(Playtype::Single, &MUSECA)]),
        (Game::Maimai, "maimai", &[(Playtype::Single, &MAIMAI)]),
        (Game::Jubeat, "jubeat", &[(Playtype::Single, &JUBEAT)]),
        (Game::Popn, "pop'n music", &[(Playtype::Buttons9, &POPN)]),
        (Game::Sdvx, "SOUND VOLTEX", &[(Playtype::Single, &SDVX)]),
        (Game::Ddr, "Dance Dance Revolution", &[(Playtype::Sp, &DDR_SP), (Playtype::Dp, &DDR_DP)]),
        (Game::Bms, "BMS", &[(Playtype::Keys7, &BMS), (Playtype::Keys14, &BMS)]),
        (Game::Chunithm, "CHUNITHM", &[(Playtype::Single, &CHUNITHM)]),
        (
            Game::Gitadora,
            "GITADORA",
            &[(Playtype::Gita, &GITADORA_GITA), (Playtype::Dora, &GITADORA)],
        ),
        (Game::Usc, "unnamed_sdvx_clone", &[(Playtype::Single, &USC)]),
    ];

    let mut games = Vec::with_capacity(table.len());
    let mut playtypes = Vec::new();

    for (game, name, pts) in table {
        games.push(GameInfo {
            game,
            name,
            playtypes: pts.iter().map(|(pt, _)| *pt).collect(),
            default_playtype: pts[0].0,
        });
        for (pt, pt_table) in pts {
            playtypes.push(build(game, *pt, pt_table));
        }
    }

    GameConfig::new(games, playtypes)
}

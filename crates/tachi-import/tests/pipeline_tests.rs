//! End-to-end tests: parse, normalize, then convert back to the beatoraja
//! wire format.

use serde_json::{Value, json};
use tachi_import::{
    CanonicalScore, ChartRecord, ClearType, Game, GameConfig, ImportContext, ImportSource,
    ImportType, MemoryStore, ParsedImport, PbScore, Playtype, ScoreNormalizer, parse,
    to_beatoraja_format,
};

fn sha256() -> String {
    "0123456789abcdef".repeat(4)
}

fn bms_chart() -> ChartRecord {
    ChartRecord {
        chart_id: "bms-chart".to_string(),
        song_id: "42".to_string(),
        game: Game::Bms,
        playtype: Playtype::Keys7,
        difficulty: "CHART".to_string(),
        title: "Test Song".to_string(),
        in_game_id: None,
        hash_sha256: Some(sha256()),
        notecount: Some(1500),
    }
}

fn iidx_chart() -> ChartRecord {
    ChartRecord {
        chart_id: "iidx-chart".to_string(),
        song_id: "1".to_string(),
        game: Game::Iidx,
        playtype: Playtype::Sp,
        difficulty: "ANOTHER".to_string(),
        title: "5.1.1.".to_string(),
        in_game_id: Some("123".to_string()),
        hash_sha256: None,
        notecount: Some(786),
    }
}

fn store() -> MemoryStore {
    MemoryStore::new(vec![bms_chart(), iidx_chart()], Vec::new())
}

/// Parse `data` as `import_type` and normalize every entry.
fn import(import_type: ImportType, data: &Value) -> Vec<CanonicalScore> {
    let config = GameConfig::standard();
    let store = store();
    let normalizer = ScoreNormalizer::new(&config, &store);

    let ParsedImport::Scores(res) = parse(import_type, ImportSource::Document(data), &config).unwrap()
    else {
        panic!("Expected score entries");
    };
    let game = res.game;
    let context: ImportContext = res.context.clone();
    res.iterable
        .map(|entry| normalizer.normalize(&entry.unwrap(), game, &context).unwrap())
        .collect()
}

fn beatoraja_submission(clear: u8) -> Value {
    json!({
        "sha256": sha256(),
        "player": "",
        "clear": clear,
        "date": 1_620_768_609,
        "epg": 700, "lpg": 500, "egr": 150, "lgr": 100,
        "egd": 10, "lgd": 5, "ebd": 3, "lbd": 2, "epr": 4, "lpr": 6,
        "ems": 0, "lms": 0,
        "combo": 640, "minbp": 15, "notes": 1500,
        "mode": "BEAT_7K",
    })
}

#[test]
fn test_beatoraja_round_trip() {
    let scores = import(ImportType::IrBeatoraja, &beatoraja_submission(6));
    assert_eq!(scores.len(), 1);

    let canonical = &scores[0];
    assert_eq!(canonical.chart_id, "bms-chart");
    assert_eq!(canonical.service.as_deref(), Some("beatoraja"));
    assert_eq!(canonical.score, 2650.0);
    assert_eq!(canonical.lamp, "HARD CLEAR");
    assert_eq!(canonical.time_achieved, Some(1_620_768_609_000));

    let pb = PbScore::from_canonical(canonical, 7, "dj");
    let wire = to_beatoraja_format(&pb, &bms_chart(), 1);

    assert_eq!(wire.exscore, Some(2650));
    assert_eq!(wire.clear, 6);
    assert_eq!(wire.sha256, sha256());
    assert_eq!(wire.date, Some(1_620_768_609));
    assert_eq!((wire.epg, wire.lpg), (700, 500));
    assert_eq!((wire.epr, wire.lpr), (4, 6));
    assert_eq!(wire.combo, 640);
    assert_eq!(wire.minbp, 15);
    assert_eq!(wire.notes, 1500);
    assert_eq!(wire.player, "dj");
}

#[test]
fn test_every_clear_code_maps_back_to_its_lamp() {
    for code in 0..=10_u8 {
        let scores = import(ImportType::IrBeatoraja, &beatoraja_submission(code));
        let pb = PbScore::from_canonical(&scores[0], 7, "dj");
        let wire = to_beatoraja_format(&pb, &bms_chart(), 7);

        let original = ClearType::from_u8(code).unwrap().lamp();
        let returned = ClearType::from_u8(wire.clear).unwrap().lamp();
        assert_eq!(returned, original, "clear code {}", code);
        assert_eq!(wire.player, "");
    }
}

#[test]
fn test_batch_manual_bms_round_trip() {
    let data = json!({
        "head": { "service": "manual", "game": "bms" },
        "body": [{
            "score": 1234,
            "lamp": "EX HARD CLEAR",
            "matchType": "bmsChartHash",
            "identifier": sha256().to_uppercase(),
            "playtype": "7K",
            "hitData": { "pgreat": 500, "great": 234, "bad": 1, "poor": 2 },
        }],
    });

    let scores = import(ImportType::FileBatchManual, &data);
    let canonical = &scores[0];
    assert_eq!(canonical.chart_id, "bms-chart");
    assert_eq!(canonical.hit_meta["bp"].as_f64(), Some(3.0));

    let wire = to_beatoraja_format(&PbScore::from_canonical(canonical, 1, "me"), &bms_chart(), 1);
    assert_eq!(wire.exscore, Some(1234));
    assert_eq!(ClearType::from_u8(wire.clear).unwrap().lamp(), "EX HARD CLEAR");
    assert_eq!(wire.minbp, 3);
    assert_eq!((wire.epg, wire.lpg), (500, 0));
}

#[test]
fn test_normalizing_twice_is_identical() {
    let data = json!({
        "head": { "service": "foo", "game": "iidx" },
        "body": [{
            "score": 1000,
            "lamp": "HARD CLEAR",
            "matchType": "songID",
            "identifier": "123",
            "playtype": "SP",
            "difficulty": "ANOTHER",
            "timeAchieved": 1_620_768_609_637_i64,
            "hitData": { "pgreat": 400, "great": 200, "bad": 5, "poor": 7 },
            "hitMeta": { "gauge": 82.4, "fast": 30, "slow": 20 },
        }],
    });

    let first = import(ImportType::FileBatchManual, &data);
    let second = import(ImportType::FileBatchManual, &data);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(first[0].chart_id, "iidx-chart");
}

#[test]
fn test_unknown_hash_is_client_fault() {
    let mut submission = beatoraja_submission(6);
    submission["sha256"] = json!("f".repeat(64));

    let config = GameConfig::standard();
    let store = store();
    let ParsedImport::Scores(res) =
        parse(ImportType::IrBeatoraja, ImportSource::Document(&submission), &config).unwrap()
    else {
        panic!("Expected score entries");
    };
    let game = res.game;
    let context = res.context.clone();
    let entry = res.into_items().unwrap().remove(0);

    let err = ScoreNormalizer::new(&config, &store)
        .normalize(&entry, game, &context)
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(err.message.starts_with("Could not find chart with bmsChartHash"));
}

#[test]
fn test_huge_judgement_counts_fail_cleanly() {
    let data = json!({
        "head": { "service": "manual", "game": "bms" },
        "body": [{
            "score": 10,
            "lamp": "FAILED",
            "matchType": "chartID",
            "identifier": "bms-chart",
            "hitData": { "bad": 4_294_967_295_u64, "poor": 1 },
        }],
    });

    let config = GameConfig::standard();
    let store = store();
    let ParsedImport::Scores(res) =
        parse(ImportType::FileBatchManual, ImportSource::Document(&data), &config).unwrap()
    else {
        panic!("Expected score entries");
    };
    let game = res.game;
    let context = res.context.clone();
    let entry = res.into_items().unwrap().remove(0);

    let err = ScoreNormalizer::new(&config, &store)
        .normalize(&entry, game, &context)
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(err.message.contains("is too large"));
}

use std::collections::BTreeMap;

use crate::error::{FatalImportError, ImportResult};
use crate::game::Game;
use crate::import::HitMetaValue;

/// Per-game fix-ups applied to hit-meta once keys have been checked.
pub trait HitMetaShaper: Send + Sync {
    fn shape(
        &self,
        hit_data: &BTreeMap<String, u32>,
        hit_meta: &mut BTreeMap<String, HitMetaValue>,
    ) -> ImportResult<()>;
}

/// IIDX and BMS.
#[derive(Debug, Clone, Copy, Default)]
pub struct BeatmaniaShaper;

impl HitMetaShaper for BeatmaniaShaper {
    fn shape(
        &self,
        hit_data: &BTreeMap<String, u32>,
        hit_meta: &mut BTreeMap<String, HitMetaValue>,
    ) -> ImportResult<()> {
        if !hit_meta.contains_key("bp")
            && let (Some(bad), Some(poor)) = (hit_data.get("bad"), hit_data.get("poor"))
        {
            let bp = bad.checked_add(*poor).ok_or_else(|| {
                FatalImportError::client(format!(
                    "Invalid hitData - bad ({}) + poor ({}) is too large",
                    bad, poor
                ))
            })?;
            hit_meta.insert("bp".to_string(), HitMetaValue::Number(f64::from(bp)));
        }

        if let Some(gauge) = hit_meta.get("gauge") {
            match gauge.as_f64() {
                Some(g) if (0.0..=100.0).contains(&g) => {}
                Some(g) => {
                    return Err(FatalImportError::client(format!(
                        "Invalid hitMeta.gauge {} - expected a number between 0 and 100",
                        g
                    )));
                }
                None => {
                    return Err(FatalImportError::client(
                        "Invalid hitMeta.gauge - expected a number",
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Leaves hit-meta untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughShaper;

impl HitMetaShaper for PassthroughShaper {
    fn shape(
        &self,
        _hit_data: &BTreeMap<String, u32>,
        _hit_meta: &mut BTreeMap<String, HitMetaValue>,
    ) -> ImportResult<()> {
        Ok(())
    }
}

pub fn shaper_for(game: Game) -> &'static dyn HitMetaShaper {
    match game {
        Game::Iidx | Game::Bms => &BeatmaniaShaper,
        _ => &PassthroughShaper,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit_data(bad: u32, poor: u32) -> BTreeMap<String, u32> {
        BTreeMap::from([("bad".to_string(), bad), ("poor".to_string(), poor)])
    }

    #[test]
    fn test_derives_bp() {
        let mut meta = BTreeMap::new();
        BeatmaniaShaper.shape(&hit_data(3, 4), &mut meta).unwrap();
        assert_eq!(meta["bp"], HitMetaValue::Number(7.0));
    }

    #[test]
    fn test_keeps_submitted_bp() {
        let mut meta = BTreeMap::from([("bp".to_string(), HitMetaValue::Number(2.0))]);
        BeatmaniaShaper.shape(&hit_data(3, 4), &mut meta).unwrap();
        assert_eq!(meta["bp"], HitMetaValue::Number(2.0));
    }

    #[test]
    fn test_incomplete_hit_data_derives_nothing() {
        let mut meta = BTreeMap::new();
        let only_bad = BTreeMap::from([("bad".to_string(), 3)]);
        BeatmaniaShaper.shape(&only_bad, &mut meta).unwrap();
        assert!(meta.is_empty());
    }

    #[test]
    fn test_bp_overflow_is_client_fault() {
        let mut meta = BTreeMap::new();
        let err = BeatmaniaShaper
            .shape(&hit_data(u32::MAX, 1), &mut meta)
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.message,
            "Invalid hitData - bad (4294967295) + poor (1) is too large"
        );
        assert!(meta.is_empty());
    }

    #[test]
    fn test_gauge_out_of_range() {
        let mut meta = BTreeMap::from([("gauge".to_string(), HitMetaValue::Number(100.5))]);
        let err = BeatmaniaShaper.shape(&BTreeMap::new(), &mut meta).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_other_games_pass_through() {
        let mut meta = BTreeMap::new();
        shaper_for(Game::Sdvx).shape(&hit_data(1, 1), &mut meta).unwrap();
        assert!(meta.is_empty());
    }
}

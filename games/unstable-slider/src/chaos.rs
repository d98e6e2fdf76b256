//! Chaos rules for the slider: mode tables, input transforms and the
//! progress-dependent resample cadence. Everything here is pure so the
//! controller can be tested draw by draw.

use rage_engine::RandomSource;
use serde::Serialize;

/// How the slider misbehaves until the next chaos tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChaosMode {
    #[default]
    Normal,
    Shaking,
    Reverse,
    Invisible,
    Slippery,
    Frozen,
}

impl ChaosMode {
    /// Frozen swallows moves entirely.
    pub fn ignores_input(self) -> bool {
        self == ChaosMode::Frozen
    }

    pub fn hides_handle(self) -> bool {
        self == ChaosMode::Invisible
    }
}

/// Drag state. A chaos mode only exists while the handle is held, so a
/// released slider can never be left frozen or invisible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grip {
    #[default]
    Released,
    Held { mode: ChaosMode },
}

impl Grip {
    pub fn mode(self) -> ChaosMode {
        match self {
            Grip::Released => ChaosMode::Normal,
            Grip::Held { mode } => mode,
        }
    }

    pub fn is_held(self) -> bool {
        matches!(self, Grip::Held { .. })
    }

    /// Switch mode if held. Released stays released.
    pub fn with_mode(self, mode: ChaosMode) -> Grip {
        match self {
            Grip::Released => Grip::Released,
            Grip::Held { .. } => Grip::Held { mode },
        }
    }
}

/// Outcome of one chaos roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChaosRoll {
    Mode(ChaosMode),
    /// Progress to zero and the drag is dropped.
    SnapToZero,
    /// Progress jumps back by 20 to 50 points.
    FakeRegression,
    /// Rare calm tick in the top band.
    Mercy,
}

/// Pick the chaos outcome for `progress` from a uniform draw `r` in `[0, 1)`.
pub fn roll_chaos(progress: f32, r: f32) -> ChaosRoll {
    if progress < 50.0 {
        if r > 0.8 {
            ChaosRoll::Mode(ChaosMode::Shaking)
        } else {
            ChaosRoll::Mode(ChaosMode::Normal)
        }
    } else if progress < 80.0 {
        if r > 0.9 {
            ChaosRoll::Mode(ChaosMode::Reverse)
        } else if r > 0.7 {
            ChaosRoll::Mode(ChaosMode::Slippery)
        } else {
            ChaosRoll::Mode(ChaosMode::Normal)
        }
    } else if r < 0.25 {
        ChaosRoll::SnapToZero
    } else if r < 0.45 {
        ChaosRoll::Mode(ChaosMode::Invisible)
    } else if r < 0.65 {
        ChaosRoll::Mode(ChaosMode::Frozen)
    } else if r < 0.85 {
        ChaosRoll::FakeRegression
    } else {
        ChaosRoll::Mercy
    }
}

/// Delay until the next chaos tick. The closer to done, the faster it churns.
pub fn chaos_interval_ms(progress: f32) -> u32 {
    if progress > 95.0 {
        100
    } else if progress > 80.0 {
        200
    } else if progress > 50.0 {
        500
    } else {
        800
    }
}

/// Handle edge length; it shrinks past 85% down to a 5 px sliver.
pub fn handle_size(progress: f32, base: f32) -> f32 {
    if progress > 85.0 {
        (base - (progress - 85.0) * 3.0).max(5.0)
    } else {
        base
    }
}

/// Perturb a raw track offset. `None` means the move is ignored.
pub fn transform_offset(
    mode: ChaosMode,
    offset: f32,
    width: f32,
    rng: &mut dyn RandomSource,
) -> Option<f32> {
    match mode {
        ChaosMode::Frozen => None,
        ChaosMode::Reverse => Some(width - offset),
        ChaosMode::Slippery => Some(offset + rng.spread(50.0)),
        ChaosMode::Shaking => Some(offset + rng.spread(20.0)),
        ChaosMode::Normal | ChaosMode::Invisible => Some(offset),
    }
}

pub const THRESHOLDS: [u8; 6] = [25, 50, 75, 90, 95, 98];

/// Thresholds passed on the way up from `last` to `now`.
pub fn crossed_thresholds(last: f32, now: f32) -> impl Iterator<Item = u8> {
    THRESHOLDS
        .into_iter()
        .filter(move |&t| last < t as f32 && now >= t as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rage_engine::ScriptedRng;

    #[test]
    fn low_band_only_shakes() {
        assert_eq!(roll_chaos(10.0, 0.81), ChaosRoll::Mode(ChaosMode::Shaking));
        assert_eq!(roll_chaos(10.0, 0.8), ChaosRoll::Mode(ChaosMode::Normal));
        assert_eq!(roll_chaos(49.9, 0.1), ChaosRoll::Mode(ChaosMode::Normal));
    }

    #[test]
    fn middle_band_checks_reverse_before_slippery() {
        assert_eq!(roll_chaos(60.0, 0.95), ChaosRoll::Mode(ChaosMode::Reverse));
        assert_eq!(roll_chaos(60.0, 0.75), ChaosRoll::Mode(ChaosMode::Slippery));
        assert_eq!(roll_chaos(60.0, 0.5), ChaosRoll::Mode(ChaosMode::Normal));
    }

    #[test]
    fn top_band_table() {
        assert_eq!(roll_chaos(80.0, 0.0), ChaosRoll::SnapToZero);
        assert_eq!(roll_chaos(90.0, 0.3), ChaosRoll::Mode(ChaosMode::Invisible));
        assert_eq!(roll_chaos(90.0, 0.5), ChaosRoll::Mode(ChaosMode::Frozen));
        assert_eq!(roll_chaos(90.0, 0.7), ChaosRoll::FakeRegression);
        assert_eq!(roll_chaos(90.0, 0.9), ChaosRoll::Mercy);
    }

    #[test]
    fn interval_shrinks_with_progress() {
        assert_eq!(chaos_interval_ms(0.0), 800);
        assert_eq!(chaos_interval_ms(50.0), 800);
        assert_eq!(chaos_interval_ms(60.0), 500);
        assert_eq!(chaos_interval_ms(85.0), 200);
        assert_eq!(chaos_interval_ms(96.0), 100);
    }

    #[test]
    fn handle_shrinks_past_85() {
        assert_eq!(handle_size(50.0, 48.0), 48.0);
        assert_eq!(handle_size(90.0, 48.0), 33.0);
        assert_eq!(handle_size(98.0, 48.0), 9.0);
        assert_eq!(handle_size(100.0, 48.0), 5.0);
    }

    #[test]
    fn transforms() {
        let mut rng = ScriptedRng::constant(1.0);
        assert_eq!(transform_offset(ChaosMode::Frozen, 10.0, 800.0, &mut rng), None);
        assert_eq!(transform_offset(ChaosMode::Reverse, 200.0, 800.0, &mut rng), Some(600.0));
        assert_eq!(transform_offset(ChaosMode::Normal, 200.0, 800.0, &mut rng), Some(200.0));

        let slipped = transform_offset(ChaosMode::Slippery, 200.0, 800.0, &mut rng).unwrap();
        assert!(slipped > 224.0 && slipped < 225.0, "slippery noise tops out near 25px");
        let shaken = transform_offset(ChaosMode::Shaking, 200.0, 800.0, &mut rng).unwrap();
        assert!(shaken > 209.0 && shaken < 210.0);
    }

    #[test]
    fn released_grip_has_no_mode() {
        let grip = Grip::Released.with_mode(ChaosMode::Frozen);
        assert_eq!(grip, Grip::Released);
        assert_eq!(grip.mode(), ChaosMode::Normal);

        let held = Grip::Held { mode: ChaosMode::Normal }.with_mode(ChaosMode::Invisible);
        assert!(held.mode().hides_handle());
    }

    #[test]
    fn thresholds_fire_once_per_upward_crossing() {
        assert_eq!(crossed_thresholds(20.0, 30.0).collect::<Vec<_>>(), vec![25]);
        assert_eq!(crossed_thresholds(30.0, 20.0).count(), 0);
        assert_eq!(crossed_thresholds(25.0, 26.0).count(), 0);
        assert_eq!(crossed_thresholds(0.0, 96.0).collect::<Vec<_>>(), vec![25, 50, 75, 90, 95]);
    }
}

//! How a released block behaves, and how fast the next one swings.

use rage_engine::{ColliderMaterial, RandomSource};

/// Material a freshly spawned (still kinematic) block carries.
pub const SPAWN_MATERIAL: ColliderMaterial = ColliderMaterial {
    restitution: 0.0,
    friction: 1.0,
    density: 0.002,
};

/// Linear damping for blocks up to the perturbation threshold.
pub const CALM_DAMPING: f32 = 0.6;

/// Physical setup applied at the moment a block is dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropProfile {
    pub material: ColliderMaterial,
    pub damping: f32,
    /// Angular velocity in rad/s.
    pub spin: f32,
}

/// Profile for a drop at `height`. Up to `threshold` blocks it is fixed and
/// draws nothing from `rng`; past it every level makes blocks slipperier,
/// bouncier, heavier and spinnier.
pub fn drop_profile(height: u32, threshold: u32, rng: &mut dyn RandomSource) -> DropProfile {
    if height <= threshold {
        return DropProfile {
            material: ColliderMaterial {
                restitution: 0.0,
                friction: 0.8,
                density: 0.002,
            },
            damping: CALM_DAMPING,
            spin: 0.0,
        };
    }

    let level = (height - threshold) as f32;
    DropProfile {
        material: ColliderMaterial {
            restitution: (0.02 * level).min(0.6),
            friction: (0.8 - 0.025 * level).max(0.1),
            density: (0.002 + 0.0001 * level).min(0.005),
        },
        damping: (CALM_DAMPING - 0.012 * level).max(0.06),
        spin: rng.spread(0.6 + 0.3 * level),
    }
}

/// Horizontal speed of the swinging block in px per tick.
pub fn oscillation_speed(height: u32, width: f32) -> f32 {
    (3.0 + 0.2 * height as f32).min(width / 8.0)
}

/// Advance a swing one tick, flipping direction past the 50 px margins.
pub fn swing(x: f32, direction: f32, speed: f32, width: f32) -> (f32, f32) {
    let x = x + speed * direction;
    let direction = if x > width - 50.0 {
        -1.0
    } else if x < 50.0 {
        1.0
    } else {
        direction
    };
    (x, direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rage_engine::ScriptedRng;

    #[test]
    fn low_stacks_are_left_alone() {
        let mut rng = ScriptedRng::constant(0.9);
        for height in 0..=10 {
            let profile = drop_profile(height, 10, &mut rng);
            assert_eq!(profile.spin, 0.0);
            assert_eq!(profile.material.friction, 0.8);
            assert_eq!(profile.material.restitution, 0.0);
            assert_eq!(profile.damping, 0.6);
        }
        assert_eq!(rng.consumed(), 0, "no random draws below the threshold");
    }

    #[test]
    fn high_stacks_degrade() {
        let mut rng = ScriptedRng::constant(1.0);
        let profile = drop_profile(15, 10, &mut rng);
        assert!((profile.material.friction - 0.675).abs() < 1e-6);
        assert!((profile.material.restitution - 0.1).abs() < 1e-6);
        assert!((profile.material.density - 0.0025).abs() < 1e-7);
        assert!((profile.damping - 0.54).abs() < 1e-6);
        assert!(profile.spin > 1.04 && profile.spin <= 1.05, "spin {}", profile.spin);
    }

    #[test]
    fn degradation_is_capped() {
        let mut rng = ScriptedRng::constant(0.5);
        let profile = drop_profile(200, 10, &mut rng);
        assert_eq!(profile.material.friction, 0.1);
        assert_eq!(profile.material.restitution, 0.6);
        assert_eq!(profile.material.density, 0.005);
        assert_eq!(profile.damping, 0.06);
    }

    #[test]
    fn speed_grows_with_height_up_to_a_cap() {
        assert_eq!(oscillation_speed(0, 800.0), 3.0);
        assert!((oscillation_speed(10, 800.0) - 5.0).abs() < 1e-6);
        assert_eq!(oscillation_speed(10_000, 800.0), 100.0);
    }

    #[test]
    fn swing_bounces_at_margins() {
        assert_eq!(swing(748.0, 1.0, 3.0, 800.0), (751.0, -1.0));
        assert_eq!(swing(52.0, -1.0, 3.0, 800.0), (49.0, 1.0));
        assert_eq!(swing(400.0, 1.0, 3.0, 800.0), (403.0, 1.0));
    }
}

//! Jar geometry, the rejection field around its mouth, and the steering
//! accelerations the star uses while free.

use glam::Vec2;
use rage_engine::PlayArea;

pub const JAR_WIDTH: f32 = 120.0;
pub const JAR_HEIGHT: f32 = 160.0;
pub const JAR_THICKNESS: f32 = 15.0;
/// Thickness of the screen-edge walls.
pub const WALL_THICKNESS: f32 = 100.0;
/// How far above the rim the rejection field starts.
pub const REJECT_MARGIN: f32 = 30.0;
/// Floor surface sits this far above the bottom edge.
pub const FLOOR_INSET: f32 = 20.0;

/// Opening lost after `attempts` resets: 2 px per two attempts, at most 20.
pub fn opening_shrink(attempts: u32) -> f32 {
    (2 * (attempts / 2)).min(20) as f32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Bouncy, frictionless screen edges and floor.
    Edge,
    Glass,
}

/// One fixed rectangle of the level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slab {
    pub center: Vec2,
    pub size: Vec2,
    pub surface: Surface,
    pub visible: bool,
}

/// Where the jar sits and how wide its opening currently is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JarLayout {
    pub center: Vec2,
    /// Effective opening width after shrinking.
    pub width: f32,
}

impl JarLayout {
    pub fn new(area: PlayArea, attempts: u32) -> Self {
        Self {
            center: Vec2::new(area.width / 2.0, area.height - 100.0),
            width: JAR_WIDTH - opening_shrink(attempts),
        }
    }

    pub fn rim_y(&self) -> f32 {
        self.center.y - JAR_HEIGHT / 2.0
    }

    /// Column above and around the mouth where the star gets thrown out.
    pub fn in_rejection_zone(&self, pos: Vec2) -> bool {
        pos.y > self.rim_y() - REJECT_MARGIN && (pos.x - self.center.x).abs() < self.width
    }

    /// Strictly inside the glass, above the bottom slab.
    pub fn interior_contains(&self, pos: Vec2) -> bool {
        let half = self.width / 2.0;
        let bottom = self.center.y + JAR_HEIGHT / 2.0 - JAR_THICKNESS;
        pos.x > self.center.x - half
            && pos.x < self.center.x + half
            && pos.y > self.rim_y()
            && pos.y < bottom
    }

    /// Screen edges, the floor split around the jar, and the jar itself.
    pub fn slabs(&self, area: PlayArea) -> Vec<Slab> {
        let PlayArea { width, height } = area;
        let t = WALL_THICKNESS;
        let edge = |center: Vec2, size: Vec2, visible: bool| Slab {
            center,
            size,
            surface: Surface::Edge,
            visible,
        };
        let glass = |center: Vec2, size: Vec2| Slab {
            center,
            size,
            surface: Surface::Glass,
            visible: true,
        };

        let floor_w = ((width - self.width) / 2.0 - JAR_THICKNESS).max(1.0);
        let floor_y = height + t / 2.0 - FLOOR_INSET;
        let side_x = self.width / 2.0 + JAR_THICKNESS / 2.0;

        vec![
            edge(Vec2::new(width / 2.0, -t / 2.0), Vec2::new(width, t), false),
            edge(Vec2::new(-t / 2.0, height / 2.0), Vec2::new(t, height * 2.0), false),
            edge(Vec2::new(width + t / 2.0, height / 2.0), Vec2::new(t, height * 2.0), false),
            edge(Vec2::new(floor_w / 2.0, floor_y), Vec2::new(floor_w, t), true),
            edge(Vec2::new(width - floor_w / 2.0, floor_y), Vec2::new(floor_w, t), true),
            glass(
                Vec2::new(self.center.x - side_x, self.center.y),
                Vec2::new(JAR_THICKNESS, JAR_HEIGHT),
            ),
            glass(
                Vec2::new(self.center.x + side_x, self.center.y),
                Vec2::new(JAR_THICKNESS, JAR_HEIGHT),
            ),
            glass(
                Vec2::new(self.center.x, self.center.y + JAR_HEIGHT / 2.0 - JAR_THICKNESS / 2.0),
                Vec2::new(self.width + JAR_THICKNESS * 2.0, JAR_THICKNESS),
            ),
        ]
    }
}

/// Multi-frequency wander, roughly within [-3, 3] x [-2, 2].
pub fn flight_noise(t: f32) -> Vec2 {
    Vec2::new(
        t.sin() + (t * 0.7).sin() + (t * 2.5).sin(),
        (t * 0.9).cos() + (t * 1.8).cos(),
    )
}

/// Push away from the pointer, fading out at `radius`.
pub fn evasion(star: Vec2, pointer: Vec2, radius: f32, strength: f32) -> Vec2 {
    let away = star - pointer;
    let dist = away.length();
    if dist >= radius || dist <= f32::EPSILON {
        return Vec2::ZERO;
    }
    away / dist * strength * (1.0 - dist / radius)
}

/// Nudge back from the left, right and top edges.
pub fn boundary_push(pos: Vec2, area: PlayArea, margin: f32, strength: f32) -> Vec2 {
    let mut push = Vec2::ZERO;
    if pos.x < margin {
        push.x += strength;
    }
    if pos.x > area.width - margin {
        push.x -= strength;
    }
    if pos.y < margin {
        push.y += strength;
    }
    push
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: PlayArea = PlayArea { width: 800.0, height: 600.0 };

    #[test]
    fn opening_shrinks_every_two_attempts() {
        assert_eq!(opening_shrink(0), 0.0);
        assert_eq!(opening_shrink(1), 0.0);
        assert_eq!(opening_shrink(2), 2.0);
        assert_eq!(opening_shrink(5), 4.0);
        assert_eq!(opening_shrink(100), 20.0);
        assert_eq!(JarLayout::new(AREA, 100).width, 100.0);
    }

    #[test]
    fn rejection_zone_covers_the_interior() {
        let jar = JarLayout::new(AREA, 0);
        assert_eq!(jar.center, Vec2::new(400.0, 500.0));
        for x in (341..460).step_by(7) {
            for y in (421..565).step_by(7) {
                let p = Vec2::new(x as f32, y as f32);
                if jar.interior_contains(p) {
                    assert!(jar.in_rejection_zone(p), "{:?}", p);
                }
            }
        }
        assert!(jar.interior_contains(Vec2::new(400.0, 500.0)));
        assert!(!jar.interior_contains(Vec2::new(400.0, 415.0)));
        assert!(jar.in_rejection_zone(Vec2::new(400.0, 395.0)));
        assert!(!jar.in_rejection_zone(Vec2::new(400.0, 385.0)));
        assert!(!jar.in_rejection_zone(Vec2::new(530.0, 500.0)));
    }

    #[test]
    fn floor_leaves_a_gap_for_the_jar() {
        let jar = JarLayout::new(AREA, 0);
        let slabs = jar.slabs(AREA);
        assert_eq!(slabs.len(), 8);
        let left_floor = slabs[3];
        let right_floor = slabs[4];
        assert_eq!(left_floor.size.x, 325.0);
        assert_eq!(left_floor.center.x + left_floor.size.x / 2.0, 325.0);
        assert_eq!(right_floor.center.x - right_floor.size.x / 2.0, 475.0);
        assert_eq!(left_floor.center.y - left_floor.size.y / 2.0, 580.0);
        assert_eq!(slabs.iter().filter(|s| s.surface == Surface::Glass).count(), 3);
    }

    #[test]
    fn evasion_fades_with_distance() {
        let near = evasion(Vec2::new(0.0, -30.0), Vec2::ZERO, 300.0, 1200.0);
        assert!((near - Vec2::new(0.0, -1080.0)).length() < 1e-2);
        assert_eq!(evasion(Vec2::new(0.0, 400.0), Vec2::ZERO, 300.0, 1200.0), Vec2::ZERO);
        assert_eq!(evasion(Vec2::ZERO, Vec2::ZERO, 300.0, 1200.0), Vec2::ZERO);
    }

    #[test]
    fn boundary_pushes_inward() {
        assert_eq!(boundary_push(Vec2::new(10.0, 10.0), AREA, 50.0, 400.0), Vec2::new(400.0, 400.0));
        assert_eq!(boundary_push(Vec2::new(790.0, 300.0), AREA, 50.0, 400.0), Vec2::new(-400.0, 0.0));
        assert_eq!(boundary_push(Vec2::new(400.0, 300.0), AREA, 50.0, 400.0), Vec2::ZERO);
    }

    #[test]
    fn noise_is_bounded() {
        for i in 0..1000 {
            let n = flight_noise(i as f32 * 0.2);
            assert!(n.x.abs() <= 3.0 && n.y.abs() <= 2.0);
        }
    }
}

//! Folds raw input events into the per-tick signals controllers consume:
//! a pointer target, a held flag, and press/release/move edges.

use glam::Vec2;

use crate::input::queue::{InputEvent, InputQueue};

/// Space bar key code; holding it counts as holding the pointer.
pub const KEY_SPACE: u32 = 32;

/// A transition observed while sampling one tick of input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEdge {
    Pressed(Vec2),
    Released(Vec2),
    Moved(Vec2),
}

/// Latest pointer position and hold state for a session.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    pub pos: Vec2,
    pointer_down: bool,
    key_down: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer button, touch or Space currently held.
    pub fn held(&self) -> bool {
        self.pointer_down || self.key_down
    }

    /// Consume this tick's events, returning hold transitions and moves in order.
    /// Key repeat and duplicate presses produce no extra edges.
    pub fn sample(&mut self, input: &InputQueue) -> Vec<PointerEdge> {
        let mut edges = Vec::new();
        for event in input.iter() {
            let was_held = self.held();
            match *event {
                InputEvent::PointerDown { x, y } => {
                    self.pos = Vec2::new(x, y);
                    self.pointer_down = true;
                }
                InputEvent::PointerUp { x, y } => {
                    self.pos = Vec2::new(x, y);
                    self.pointer_down = false;
                }
                InputEvent::PointerMove { x, y } => {
                    self.pos = Vec2::new(x, y);
                    edges.push(PointerEdge::Moved(self.pos));
                    continue;
                }
                InputEvent::KeyDown { key_code } if key_code == KEY_SPACE => {
                    self.key_down = true;
                }
                InputEvent::KeyUp { key_code } if key_code == KEY_SPACE => {
                    self.key_down = false;
                }
                _ => continue,
            }
            match (was_held, self.held()) {
                (false, true) => edges.push(PointerEdge::Pressed(self.pos)),
                (true, false) => edges.push(PointerEdge::Released(self.pos)),
                _ => {}
            }
        }
        edges
    }

    /// Drop the hold without an edge (forced release by the controller).
    pub fn force_release(&mut self) {
        self.pointer_down = false;
        self.key_down = false;
    }
}

/// Horizontal track rectangle mapping x coordinates to percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Track {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Offset from the left edge, clamped to the track.
    pub fn offset_at(&self, x: f32) -> f32 {
        (x - self.left).clamp(0.0, self.width.max(0.0))
    }

    /// Convert an offset into a percent in `[0, 100]`.
    pub fn percent_of(&self, offset: f32) -> f32 {
        if self.width <= 0.0 {
            return 0.0;
        }
        (offset / self.width * 100.0).clamp(0.0, 100.0)
    }

    pub fn percent_at(&self, x: f32) -> f32 {
        self.percent_of(self.offset_at(x))
    }

    /// World x for a given percent.
    pub fn x_at(&self, percent: f32) -> f32 {
        self.left + self.width * percent.clamp(0.0, 100.0) / 100.0
    }

    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_move_release_edges() {
        let mut pointer = PointerState::new();
        let q = InputQueue::from_events([
            InputEvent::PointerDown { x: 1.0, y: 2.0 },
            InputEvent::PointerMove { x: 5.0, y: 2.0 },
            InputEvent::PointerUp { x: 6.0, y: 2.0 },
        ]);
        let edges = pointer.sample(&q);
        assert_eq!(
            edges,
            vec![
                PointerEdge::Pressed(Vec2::new(1.0, 2.0)),
                PointerEdge::Moved(Vec2::new(5.0, 2.0)),
                PointerEdge::Released(Vec2::new(6.0, 2.0)),
            ]
        );
        assert!(!pointer.held());
    }

    #[test]
    fn space_counts_as_hold_and_ignores_repeat() {
        let mut pointer = PointerState::new();
        let q = InputQueue::from_events([
            InputEvent::KeyDown { key_code: KEY_SPACE },
            InputEvent::KeyDown { key_code: KEY_SPACE },
            InputEvent::KeyDown { key_code: 65 },
        ]);
        let edges = pointer.sample(&q);
        assert_eq!(edges.len(), 1);
        assert!(pointer.held());

        let edges = pointer.sample(&InputQueue::from_events([InputEvent::KeyUp { key_code: KEY_SPACE }]));
        assert!(matches!(edges[..], [PointerEdge::Released(_)]));
    }

    #[test]
    fn pointer_and_space_combine() {
        let mut pointer = PointerState::new();
        pointer.sample(&InputQueue::from_events([
            InputEvent::KeyDown { key_code: KEY_SPACE },
            InputEvent::PointerDown { x: 0.0, y: 0.0 },
        ]));
        let edges = pointer.sample(&InputQueue::from_events([InputEvent::PointerUp { x: 0.0, y: 0.0 }]));
        assert!(edges.is_empty(), "space still held");
        assert!(pointer.held());
    }

    #[test]
    fn track_maps_and_clamps() {
        let track = Track::new(100.0, 0.0, 800.0, 64.0);
        assert_eq!(track.percent_at(500.0), 50.0);
        assert_eq!(track.percent_at(-50.0), 0.0);
        assert_eq!(track.percent_at(5000.0), 100.0);
        assert_eq!(track.x_at(25.0), 300.0);
    }

    #[test]
    fn degenerate_track_is_zero() {
        let track = Track::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(track.percent_at(10.0), 0.0);
    }
}

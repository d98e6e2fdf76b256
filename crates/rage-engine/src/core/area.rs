use glam::Vec2;

/// Size of the play area in world units.
///
/// Geometry is computed from these dimensions (track widths, oscillation
/// bounds, jar placement), so zero or non-finite sizes are replaced with a
/// fallback before anything divides by them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    pub const FALLBACK: PlayArea = PlayArea {
        width: 800.0,
        height: 600.0,
    };

    /// Build a play area, substituting `fallback` for unusable dimensions.
    pub fn new(width: f32, height: f32, fallback: PlayArea) -> Self {
        let fallback = fallback.sanitized();
        let width = if width.is_finite() && width > 0.0 {
            width
        } else {
            log::warn!("play area width {} unusable, using {}", width, fallback.width);
            fallback.width
        };
        let height = if height.is_finite() && height > 0.0 {
            height
        } else {
            log::warn!("play area height {} unusable, using {}", height, fallback.height);
            fallback.height
        };
        Self { width, height }
    }

    fn sanitized(self) -> Self {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        Self {
            width: if ok(self.width) { self.width } else { Self::FALLBACK.width },
            height: if ok(self.height) { self.height } else { Self::FALLBACK.height },
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for PlayArea {
    fn default() -> Self {
        Self::FALLBACK
    }
}

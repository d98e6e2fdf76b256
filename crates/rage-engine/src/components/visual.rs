/// Primitive shape the host draws for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Shape {
    Rect = 0,
    Circle = 1,
    Star = 2,
}

/// Draw description attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub shape: Shape,
    /// Host-side palette index.
    pub tint: u32,
    pub alpha: f32,
}

impl Visual {
    pub fn new(shape: Shape, tint: u32) -> Self {
        Self {
            shape,
            tint,
            alpha: 1.0,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

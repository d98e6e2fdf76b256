use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::components::visual::Shape;

/// Per-instance render data read by the host renderer.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    pub x: f32,
    pub y: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// Full width in world units.
    pub width: f32,
    /// Full height in world units.
    pub height: f32,
    /// [`crate::components::visual::Shape`] discriminant.
    pub shape: f32,
    pub alpha: f32,
    /// Host palette index.
    pub tint: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    /// Unrotated, opaque instance centered at `pos`.
    pub fn new(shape: Shape, pos: Vec2, size: Vec2, tint: u32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            rotation: 0.0,
            width: size.x,
            height: size.y,
            shape: shape as u8 as f32,
            alpha: 1.0,
            tint: tint as f32,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Instances for the current frame.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
    capacity: usize,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Buffer that silently stops accepting instances past `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: RenderInstance) {
        if self.instances.len() < self.capacity {
            self.instances.push(instance);
        }
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for host reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

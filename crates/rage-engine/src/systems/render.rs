use crate::components::entity::Entity;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Build the render buffer from a set of entities.
/// Inactive entities and entities without a visual are skipped.
pub fn build_render_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut RenderBuffer) {
    buffer.clear();

    for entity in entities {
        if !entity.active {
            continue;
        }
        let Some(visual) = &entity.visual else {
            continue;
        };

        buffer.push(RenderInstance {
            x: entity.pos.x,
            y: entity.pos.y,
            rotation: entity.rotation,
            width: entity.size.x,
            height: entity.size.y,
            shape: visual.shape as u8 as f32,
            alpha: visual.alpha,
            tint: visual.tint as f32,
        });
    }
}

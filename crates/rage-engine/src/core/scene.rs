use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Flat entity storage for one session.
/// Sessions hold a handful of bodies, so a Vec with linear lookups is enough.
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(64),
        }
    }

    /// Add an entity to the scene.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove an entity by ID. Returns the removed entity if found.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.swap_remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// All entities carrying `tag`.
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(move |e| e.tag == tag)
    }

    /// Count of entities carrying `tag`.
    pub fn count_tagged(&self, tag: &str) -> usize {
        self.entities.iter().filter(|e| e.tag == tag).count()
    }

    /// IDs of every entity, in storage order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Remove every entity and hand them back (physics cleanup happens in the context).
    pub fn drain(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.entities)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id).with_pos(Vec2::new(10.0, 20.0)));
        let e = scene.get(id).unwrap();
        assert_eq!(e.pos, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn despawn_removes_entity() {
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id));
        assert!(scene.despawn(id).is_some());
        assert!(scene.despawn(id).is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn tags_filter_entities() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_tag("block"));
        scene.spawn(Entity::new(EntityId(2)).with_tag("pedestal"));
        scene.spawn(Entity::new(EntityId(3)).with_tag("block"));
        assert_eq!(scene.count_tagged("block"), 2);
        let ids: Vec<EntityId> = scene.tagged("pedestal").map(|e| e.id).collect();
        assert_eq!(ids, vec![EntityId(2)]);
    }

    #[test]
    fn drain_empties_scene() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)));
        scene.spawn(Entity::new(EntityId(2)));
        assert_eq!(scene.drain().len(), 2);
        assert!(scene.is_empty());
    }
}

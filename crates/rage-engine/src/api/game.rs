use crate::api::types::{EntityId, GameEvent};
use crate::assets::tuning::ConfigError;
use crate::core::area::PlayArea;
use crate::core::random::{RandomSource, SeededRng};
use crate::core::scene::Scene;
use crate::core::storage::{MemoryStore, ScoreStore};
use crate::input::queue::InputQueue;
use crate::renderer::instance::RenderBuffer;
use crate::systems::audio::AudioBus;
use crate::systems::toast::{ToastLayer, ToastSpec};
#[cfg(feature = "physics")]
use crate::core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, ColliderMaterial, CollisionPair,
};
use crate::components::entity::Entity;
#[cfg(feature = "physics")]
use glam::Vec2;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Maximum number of render instances (default: 256).
    pub max_instances: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Gravity vector for physics simulation. Default: zero (no gravity).
    /// Y points down, so positive Y is downward gravity.
    #[cfg(feature = "physics")]
    pub gravity: glam::Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 800.0,
            world_height: 600.0,
            max_instances: 256,
            max_events: 32,
            #[cfg(feature = "physics")]
            gravity: glam::Vec2::ZERO,
        }
    }
}

/// The core contract every game controller fulfills.
///
/// Session state lives in the implementor; everything the host observes
/// lives in the [`EngineContext`] handed to each call.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Start a fresh session: reset state, spawn entities, arm timers.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed tick. Input is delivered on the first tick of a frame only.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Apply a partial JSON tuning override. Takes effect on the next session start.
    fn configure(&mut self, _json: &str) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Human-readable state for the host HUD.
    fn hud(&self) -> serde_json::Value {
        serde_json::Value::Null
    }

    /// Cancel pending timers and release anything the game holds outside the context.
    fn teardown(&mut self, _ctx: &mut EngineContext) {}

    /// Optional read-only render pass for instances not backed by entities.
    fn render(&self, _ctx: &mut RenderContext) {}
}

/// Mutable access to engine state, passed to every [`Game`] call.
pub struct EngineContext {
    pub scene: Scene,
    pub toasts: ToastLayer,
    pub audio: AudioBus,
    pub events: Vec<GameEvent>,
    pub rng: Box<dyn RandomSource>,
    pub store: Box<dyn ScoreStore>,
    pub area: PlayArea,
    dt: f32,
    next_id: u32,
    #[cfg(feature = "physics")]
    pub physics: PhysicsWorld,
    #[cfg(feature = "physics")]
    collision_events: Vec<CollisionPair>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            toasts: ToastLayer::new(),
            audio: AudioBus::new(),
            events: Vec::new(),
            rng: Box::new(SeededRng::new(0x5eed)),
            store: Box::new(MemoryStore::new()),
            area: PlayArea::default(),
            dt: 1.0 / 60.0,
            next_id: 1,
            #[cfg(feature = "physics")]
            physics: PhysicsWorld::new(Vec2::ZERO),
            #[cfg(feature = "physics")]
            collision_events: Vec::new(),
        }
    }

    /// Create an EngineContext with a custom gravity vector.
    #[cfg(feature = "physics")]
    pub fn with_gravity(gravity: Vec2) -> Self {
        Self {
            physics: PhysicsWorld::new(gravity),
            ..Self::new()
        }
    }

    /// Context sized and timed from a game's configuration.
    pub fn from_config(config: &GameConfig) -> Self {
        #[cfg(feature = "physics")]
        let mut ctx = Self::with_gravity(config.gravity);
        #[cfg(not(feature = "physics"))]
        let mut ctx = Self::new();

        ctx.area = PlayArea::new(config.world_width, config.world_height, PlayArea::FALLBACK);
        if config.fixed_dt.is_finite() && config.fixed_dt > 0.0 {
            ctx.dt = config.fixed_dt;
        }
        #[cfg(feature = "physics")]
        ctx.physics.set_dt(ctx.dt);
        ctx
    }

    pub fn with_rng(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_store(mut self, store: Box<dyn ScoreStore>) -> Self {
        self.store = store;
        self
    }

    /// Fixed tick length in seconds.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Queue an outbound event for the host.
    pub fn emit(&mut self, kind: f32, a: f32, b: f32) {
        self.events.push(GameEvent::new(kind, a, b, 0.0));
    }

    /// Show a toast. Returns its id.
    pub fn toast(&mut self, text: impl Into<String>, spec: ToastSpec) -> u32 {
        self.toasts.push(text, spec)
    }

    /// Apply a host resize, keeping the current size for unusable values.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.area = PlayArea::new(width, height, self.area);
    }

    /// Clear per-frame transient data (cues, voice commands, events).
    /// Collision pairs live until the next physics step so the following
    /// update can react to them.
    pub fn clear_frame_data(&mut self) {
        self.audio.clear_frame();
        self.events.clear();
    }

    /// Despawn every entity along with its physics body.
    pub fn clear_entities(&mut self) {
        for entity in self.scene.drain() {
            self.release_body(&entity);
        }
    }

    /// End the session: stop voices, drop toasts, remove all bodies.
    /// Outbound events survive so the host still sees an EXIT raised this frame.
    pub fn teardown(&mut self) {
        self.audio.dispose();
        self.toasts.clear();
        self.clear_entities();
        #[cfg(feature = "physics")]
        self.collision_events.clear();
    }

    /// Despawn an entity, cleaning up its physics body if present.
    pub fn despawn(&mut self, id: EntityId) {
        if let Some(entity) = self.scene.despawn(id) {
            self.release_body(&entity);
        }
    }

    #[cfg(feature = "physics")]
    fn release_body(&mut self, entity: &Entity) {
        if let Some(body) = &entity.body {
            self.physics.remove_body(body);
        }
    }

    #[cfg(not(feature = "physics"))]
    fn release_body(&mut self, _entity: &Entity) {}

    // -- Physics convenience methods --

    /// Spawn an entity with a physics body. Returns the EntityId.
    /// The entity's position is set from the BodyDesc.
    #[cfg(feature = "physics")]
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity
            .with_pos(desc.position)
            .with_rotation(desc.rotation)
            .with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Physics handles of an entity, if it has a body.
    #[cfg(feature = "physics")]
    pub fn body_of(&self, id: EntityId) -> Option<PhysicsBody> {
        self.scene.get(id).and_then(|e| e.body)
    }

    /// Apply a force to an entity's body for the next step.
    #[cfg(feature = "physics")]
    pub fn apply_force(&mut self, id: EntityId, force: Vec2) {
        if let Some(body) = self.body_of(id) {
            self.physics.apply_force(&body, force);
        }
    }

    /// Apply an instantaneous impulse to an entity's physics body.
    #[cfg(feature = "physics")]
    pub fn apply_impulse(&mut self, id: EntityId, impulse: Vec2) {
        if let Some(body) = self.body_of(id) {
            self.physics.apply_impulse(&body, impulse);
        }
    }

    #[cfg(feature = "physics")]
    pub fn set_velocity(&mut self, id: EntityId, vel: Vec2) {
        if let Some(body) = self.body_of(id) {
            self.physics.set_velocity(&body, vel);
        }
    }

    #[cfg(feature = "physics")]
    pub fn velocity(&self, id: EntityId) -> Vec2 {
        self.body_of(id)
            .map(|body| self.physics.velocity(&body))
            .unwrap_or(Vec2::ZERO)
    }

    #[cfg(feature = "physics")]
    pub fn mass(&self, id: EntityId) -> f32 {
        self.body_of(id).map(|body| self.physics.mass(&body)).unwrap_or(0.0)
    }

    /// Current body position (falls back to the entity position).
    #[cfg(feature = "physics")]
    pub fn position(&self, id: EntityId) -> Vec2 {
        match self.body_of(id) {
            Some(body) => self.physics.body_position(&body).0,
            None => self.scene.get(id).map(|e| e.pos).unwrap_or(Vec2::ZERO),
        }
    }

    /// Get collision events from the most recent physics step.
    #[cfg(feature = "physics")]
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Step the physics simulation and sync positions back to entities.
    /// Called by the runner after `Game::update()`.
    #[cfg(feature = "physics")]
    pub fn step_physics(&mut self) {
        self.collision_events.clear();
        self.physics.step_into(&mut self.collision_events);

        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                let (pos, rot) = self.physics.body_position(body);
                entity.pos = pos;
                entity.rotation = rot;
            }
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Render context for optional custom render commands.
pub struct RenderContext<'a> {
    pub render_buffer: &'a mut RenderBuffer,
    pub area: PlayArea,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{event_kind, ToastVariant, Voice};
    use crate::core::random::ScriptedRng;

    #[test]
    fn from_config_sanitizes_area() {
        let config = GameConfig {
            world_width: 0.0,
            world_height: f32::NAN,
            ..GameConfig::default()
        };
        let ctx = EngineContext::from_config(&config);
        assert_eq!(ctx.area, PlayArea::FALLBACK);
        assert!((ctx.dt() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn resize_keeps_size_on_zero() {
        let mut ctx = EngineContext::new();
        ctx.resize(1200.0, 700.0);
        ctx.resize(0.0, 0.0);
        assert_eq!(ctx.area, PlayArea { width: 1200.0, height: 700.0 });
    }

    #[test]
    fn injected_rng_is_used() {
        let mut ctx = EngineContext::new().with_rng(Box::new(ScriptedRng::constant(0.75)));
        assert_eq!(ctx.rng.next_f32(), 0.75);
    }

    #[test]
    fn teardown_releases_session_resources() {
        let mut ctx = EngineContext::new();
        ctx.audio.start(Voice::Drag);
        ctx.toast("NOPE", ToastSpec::at(0.0, 0.0, ToastVariant::Danger));
        let id = ctx.next_id();
        ctx.scene.spawn(Entity::new(id));
        ctx.emit(event_kind::EXIT, 0.0, 0.0);

        ctx.teardown();

        assert!(!ctx.audio.is_running(Voice::Drag));
        assert!(ctx.toasts.is_empty());
        assert!(ctx.scene.is_empty());
        assert_eq!(ctx.events.len(), 1, "exit event survives teardown");
    }
}

#[cfg(test)]
#[cfg(feature = "physics")]
mod physics_tests {
    use super::*;
    use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial};

    #[test]
    fn spawn_with_body_creates_entity_and_physics() {
        let mut ctx = EngineContext::new();
        let id = ctx.next_id();
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 })
            .with_position(Vec2::new(100.0, 200.0));

        ctx.spawn_with_body(Entity::new(id), desc, ColliderMaterial::default());

        assert_eq!(ctx.scene.len(), 1);
        assert_eq!(ctx.physics.body_count(), 1);
        assert_eq!(ctx.scene.get(id).unwrap().pos, Vec2::new(100.0, 200.0));
    }

    #[test]
    fn despawn_cleans_up_physics() {
        let mut ctx = EngineContext::new();
        let id = ctx.next_id();
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 });

        ctx.spawn_with_body(Entity::new(id), desc, ColliderMaterial::default());
        assert_eq!(ctx.physics.body_count(), 1);

        ctx.despawn(id);
        assert_eq!(ctx.scene.len(), 0);
        assert_eq!(ctx.physics.body_count(), 0);
    }

    #[test]
    fn teardown_removes_every_body() {
        let mut ctx = EngineContext::with_gravity(Vec2::new(0.0, 980.0));
        for _ in 0..3 {
            let id = ctx.next_id();
            ctx.spawn_with_body(
                Entity::new(id),
                BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 }),
                ColliderMaterial::default(),
            );
        }
        ctx.teardown();
        assert_eq!(ctx.physics.body_count(), 0);
        assert!(ctx.scene.is_empty());
    }

    #[test]
    fn step_physics_syncs_positions() {
        let mut ctx = EngineContext::from_config(&GameConfig {
            gravity: Vec2::new(0.0, 100.0),
            ..GameConfig::default()
        });

        let id = ctx.next_id();
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
            .with_position(Vec2::new(100.0, 0.0));
        ctx.spawn_with_body(Entity::new(id), desc, ColliderMaterial::default());

        for _ in 0..10 {
            ctx.step_physics();
        }

        let entity = ctx.scene.get(id).unwrap();
        assert!(entity.pos.y > 0.0, "Entity should have moved down: y={}", entity.pos.y);
        assert_eq!(ctx.position(id), entity.pos);
    }
}

pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext, RenderContext};
pub use api::types::{
    event_kind, AudioCue, EntityId, GameEvent, ToastVariant, Voice, VoiceCommand,
};
pub use assets::tuning::{ensure, parse_tuning, ConfigError, Tunable};
pub use components::entity::Entity;
pub use components::visual::{Shape, Visual};
pub use core::area::PlayArea;
pub use core::random::{pick, RandomSource, ScriptedRng, SeededRng};
pub use core::scene::Scene;
pub use core::storage::{
    load_best_or_zero, parse_score, record_best, MemoryStore, ScoreStore, StorageError,
};
pub use core::time::{tick_timer, FixedTimestep, TickTimer};
pub use input::queue::{custom_kind, InputEvent, InputQueue};
pub use input::sampler::{PointerEdge, PointerState, Track, KEY_SPACE};
pub use renderer::instance::{RenderBuffer, RenderInstance};
pub use systems::audio::AudioBus;
pub use systems::render::build_render_buffer;
pub use systems::toast::{Toast, ToastLayer, ToastSpec};

#[cfg(feature = "physics")]
pub use core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, BodyType,
    ColliderDesc, ColliderMaterial, CollisionPair,
    JointHandle, JointDesc,
};

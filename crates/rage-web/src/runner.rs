use rage_engine::{
    custom_kind, event_kind, build_render_buffer, ConfigError, EngineContext, FixedTimestep,
    Game, GameConfig, InputEvent, InputQueue, PlayArea, RandomSource, RenderBuffer,
    RenderContext, ScoreStore,
};

/// Generic game runner that wires up the engine loop.
///
/// Each game crate keeps one runner in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
    /// Last size reported by the host; overrides the configured world size.
    host_size: Option<PlayArea>,
    /// Flat buffer of cue codes for host reads.
    sound_buffer: Vec<u8>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);
        let render_buffer = RenderBuffer::with_capacity(config.max_instances);

        Self {
            game,
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            render_buffer,
            timestep,
            config,
            initialized: false,
            host_size: None,
            sound_buffer: Vec::with_capacity(32),
        }
    }

    pub fn with_store(mut self, store: Box<dyn ScoreStore>) -> Self {
        self.ctx.store = store;
        self
    }

    pub fn with_rng(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.ctx.rng = rng;
        self
    }

    /// Start a fresh session. Safe to call again after [`GameRunner::shutdown`].
    pub fn init(&mut self) {
        if self.initialized {
            self.shutdown();
        }
        self.config = self.game.config();
        self.timestep = FixedTimestep::new(self.config.fixed_dt);
        self.render_buffer = RenderBuffer::with_capacity(self.config.max_instances);

        // Fresh world and scene; the random source, store and audio availability carry over.
        let previous = std::mem::replace(&mut self.ctx, EngineContext::from_config(&self.config));
        self.ctx.rng = previous.rng;
        self.ctx.store = previous.store;
        if let Some(size) = self.host_size {
            self.ctx.area = size;
        }
        self.ctx.audio.set_available(previous.audio.is_available());

        self.input.drain();
        self.game.init(&mut self.ctx);
        self.initialized = true;
    }

    /// Forward a tuning override to the game. Applies from the next session.
    pub fn configure(&mut self, json: &str) -> Result<(), ConfigError> {
        self.game.configure(json)
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        if let InputEvent::Custom { kind, a, b, .. } = event {
            if kind == custom_kind::RESIZE {
                self.ctx.resize(a, b);
                self.host_size = Some(self.ctx.area);
            }
        }
        self.input.push(event);
    }

    /// Host audio backend came up or went away.
    pub fn set_audio_available(&mut self, available: bool) {
        self.ctx.audio.set_available(available);
    }

    /// Run one frame: fixed updates, physics, toasts, render buffer, cue codes.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        if self.input.has_custom(custom_kind::BACK) {
            self.ctx.emit(event_kind::EXIT, 0.0, 0.0);
            self.shutdown();
            self.pack_sounds();
            return;
        }

        let steps = self.timestep.accumulate(dt);
        let idle = InputQueue::new();
        for step in 0..steps {
            let input = if step == 0 { &self.input } else { &idle };
            self.game.update(&mut self.ctx, input);
            #[cfg(feature = "physics")]
            self.ctx.step_physics();
            self.ctx.toasts.tick(self.timestep.dt());
        }

        // Input waits for the first step that can consume it.
        if steps > 0 {
            self.input.drain();
        }

        build_render_buffer(self.ctx.scene.iter(), &mut self.render_buffer);
        {
            let mut render_ctx = RenderContext {
                render_buffer: &mut self.render_buffer,
                area: self.ctx.area,
            };
            self.game.render(&mut render_ctx);
        }

        self.ctx.events.truncate(self.config.max_events);
        self.pack_sounds();
    }

    /// Tear the session down synchronously: game timers, voices, toasts, bodies.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        self.game.teardown(&mut self.ctx);
        self.ctx.teardown();
        self.input.drain();
        self.timestep.reset();
        self.render_buffer.clear();
        self.initialized = false;
        log::info!("session torn down");
    }

    fn pack_sounds(&mut self) {
        self.sound_buffer.clear();
        self.sound_buffer
            .extend(self.ctx.audio.cues().iter().map(|cue| cue.code()));
    }

    pub fn is_running(&self) -> bool {
        self.initialized
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    // ---- Pointer accessors for host reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn sound_codes(&self) -> &[u8] {
        &self.sound_buffer
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    // ---- JSON accessors ----

    pub fn toasts_json(&self) -> String {
        self.ctx.toasts.to_json()
    }

    pub fn hud_json(&self) -> String {
        self.game.hud().to_string()
    }

    pub fn voice_commands_json(&self) -> String {
        serde_json::to_string(self.ctx.audio.commands()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn world_width(&self) -> f32 {
        self.ctx.area.width
    }

    pub fn world_height(&self) -> f32 {
        self.ctx.area.height
    }

    pub fn max_instances(&self) -> u32 {
        self.config.max_instances as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }
}

use glam::Vec2;
use rage_engine::*;
use rage_engine::api::game::GameConfig;
use rage_engine::input::queue::{custom_kind, InputQueue};
use serde::Deserialize;
use serde_json::json;

use crate::stacking::{drop_profile, oscillation_speed, swing, SPAWN_MATERIAL, CALM_DAMPING};
use crate::taunts;

const WORLD_W: f32 = 800.0;
const WORLD_H: f32 = 600.0;
const GRAVITY: f32 = 980.0;

const PEDESTAL_SIZE: Vec2 = Vec2::new(300.0, 60.0);
const BLOCK_SIZE: Vec2 = Vec2::new(120.0, 40.0);
const SPAWN_Y: f32 = 100.0;

const BEST_KEY: &str = "zenTowerBest";
const BLOCK_TAG: &str = "block";

/// Summed vertical speed (px/s) of a fresh contact that earns a thud.
const THUD_SPEED: f32 = 60.0;

const TINT_PEDESTAL: u32 = 0;
const BLOCK_TINTS: u32 = 5;

/// Overridable constants for the tower.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TowerTuning {
    pub intro_blocks: u32,
    pub wind_min_secs: f32,
    pub wind_max_secs: f32,
    pub windy_secs: f32,
    /// Peak lateral velocity change of a gust in px/s.
    pub wind_strength: f32,
    /// Gusts double once the stack is taller than this.
    pub wind_boost_height: u32,
    /// Drops above this height get degraded materials.
    pub perturb_height: u32,
    /// Game-over taunts switch to the early list at or below this height.
    pub early_failure_height: u32,
    pub next_block_secs: f32,
    /// How far below the play area a block must fall to end the game.
    pub fall_margin: f32,
}

impl Default for TowerTuning {
    fn default() -> Self {
        Self {
            intro_blocks: 3,
            wind_min_secs: 8.0,
            wind_max_secs: 12.0,
            windy_secs: 2.0,
            wind_strength: 240.0,
            wind_boost_height: 5,
            perturb_height: 10,
            early_failure_height: 4,
            next_block_secs: 1.0,
            fall_margin: 50.0,
        }
    }
}

impl Tunable for TowerTuning {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            self.wind_min_secs > 0.0 && self.wind_max_secs >= self.wind_min_secs,
            "wind interval must be positive and ordered",
        )?;
        ensure(self.windy_secs > 0.0, "windy_secs must be positive")?;
        ensure(self.wind_strength >= 0.0, "wind_strength must not be negative")?;
        ensure(self.intro_blocks <= 10, "intro_blocks must be at most 10")?;
        ensure(
            self.next_block_secs > 0.0 && self.fall_margin >= 0.0,
            "next_block_secs must be positive",
        )
    }
}

/// Scripted opening. `held` is the centered block waiting to be released.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Intro {
    dropped: u32,
    held: Option<EntityId>,
    timer: TickTimer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Intro(Intro),
    Playing,
    GameOver,
}

/// Stack swinging blocks on a narrow pedestal until the wind wins.
pub struct ZenTower {
    tuning: TowerTuning,
    pending: Option<TowerTuning>,
    phase: Phase,
    height: u32,
    best: u32,
    message: Option<&'static str>,
    /// Swinging block, still kinematic.
    current: Option<EntityId>,
    block_x: f32,
    direction: f32,
    spawn_timer: Option<TickTimer>,
    wind_timer: Option<TickTimer>,
    windy_timer: Option<TickTimer>,
    pointer: PointerState,
}

impl ZenTower {
    pub fn new() -> Self {
        Self {
            tuning: TowerTuning::default(),
            pending: None,
            phase: Phase::GameOver,
            height: 0,
            best: 0,
            message: None,
            current: None,
            block_x: WORLD_W / 2.0,
            direction: 1.0,
            spawn_timer: None,
            wind_timer: None,
            windy_timer: None,
            pointer: PointerState::new(),
        }
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn is_windy(&self) -> bool {
        self.windy_timer.is_some()
    }

    fn secs(&self, ctx: &EngineContext, secs: f32) -> TickTimer {
        TickTimer::from_secs(secs, ctx.dt())
    }

    fn spawn_pedestal(&mut self, ctx: &mut EngineContext) {
        let id = ctx.next_id();
        let pos = Vec2::new(ctx.area.width / 2.0, ctx.area.height - 20.0);
        ctx.spawn_with_body(
            Entity::new(id)
                .with_tag("pedestal")
                .with_size(PEDESTAL_SIZE)
                .with_visual(Visual::new(Shape::Rect, TINT_PEDESTAL)),
            BodyDesc::fixed(ColliderDesc::Cuboid {
                half_width: PEDESTAL_SIZE.x / 2.0,
                half_height: PEDESTAL_SIZE.y / 2.0,
            })
            .with_position(pos),
            ColliderMaterial {
                restitution: 0.0,
                friction: 1.0,
                density: 1.0,
            },
        );
    }

    /// Kinematic block hanging at the spawn line.
    fn spawn_block(&mut self, ctx: &mut EngineContext, x: f32) -> EntityId {
        let id = ctx.next_id();
        let tint = 1 + ctx.scene.count_tagged(BLOCK_TAG) as u32 % BLOCK_TINTS;
        ctx.spawn_with_body(
            Entity::new(id)
                .with_tag(BLOCK_TAG)
                .with_size(BLOCK_SIZE)
                .with_visual(Visual::new(Shape::Rect, tint)),
            BodyDesc::kinematic(ColliderDesc::Cuboid {
                half_width: BLOCK_SIZE.x / 2.0,
                half_height: BLOCK_SIZE.y / 2.0,
            })
            .with_position(Vec2::new(x, SPAWN_Y))
            .with_linear_damping(CALM_DAMPING),
            SPAWN_MATERIAL,
        )
    }

    /// Hand a kinematic block over to gravity, at rest.
    fn release(ctx: &mut EngineContext, id: EntityId) -> Option<PhysicsBody> {
        let body = ctx.body_of(id)?;
        ctx.physics.set_body_type(&body, BodyType::Dynamic);
        ctx.physics.set_velocity(&body, Vec2::ZERO);
        Some(body)
    }

    fn advance_intro(&mut self, ctx: &mut EngineContext, mut intro: Intro) {
        if !intro.timer.tick() {
            self.phase = Phase::Intro(intro);
            return;
        }

        let center = ctx.area.width / 2.0;
        intro = match intro.held {
            Some(id) => {
                if Self::release(ctx, id).is_some() {
                    ctx.audio.play(AudioCue::SoftClick);
                }
                self.height += 1;
                let dropped = intro.dropped + 1;
                let wait = if dropped >= self.tuning.intro_blocks { 1.5 } else { 1.2 };
                Intro { dropped, held: None, timer: self.secs(ctx, wait) }
            }
            None if intro.dropped >= self.tuning.intro_blocks => {
                self.start_play(ctx);
                return;
            }
            None => {
                let id = self.spawn_block(ctx, center);
                Intro { held: Some(id), timer: self.secs(ctx, 0.6), ..intro }
            }
        };
        self.phase = Phase::Intro(intro);
    }

    fn start_play(&mut self, ctx: &mut EngineContext) {
        self.phase = Phase::Playing;
        self.spawn_player_block(ctx);
        self.arm_wind(ctx);
        log::info!("ZenTower: player control at height {}", self.height);
    }

    fn spawn_player_block(&mut self, ctx: &mut EngineContext) {
        self.block_x = ctx.area.width / 2.0;
        self.direction = if ctx.rng.chance(0.5) { 1.0 } else { -1.0 };
        self.current = Some(self.spawn_block(ctx, self.block_x));
    }

    fn arm_wind(&mut self, ctx: &mut EngineContext) {
        let secs = ctx.rng.range(self.tuning.wind_min_secs, self.tuning.wind_max_secs);
        self.wind_timer = Some(self.secs(ctx, secs));
    }

    fn drop_current(&mut self, ctx: &mut EngineContext) {
        let Some(id) = self.current.take() else {
            return;
        };
        let Some(body) = ctx.body_of(id) else {
            return;
        };
        // Release exactly where the block is drawn.
        ctx.physics.set_position(&body, Vec2::new(self.block_x, SPAWN_Y));
        Self::release(ctx, id);

        let profile = drop_profile(self.height, self.tuning.perturb_height, ctx.rng.as_mut());
        ctx.physics.set_material(&body, profile.material);
        ctx.physics.set_linear_damping(&body, profile.damping);
        if profile.spin != 0.0 {
            ctx.physics.set_angular_velocity(&body, profile.spin);
        }
        ctx.audio.play(AudioCue::SoftClick);

        self.height += 1;
        ctx.emit(event_kind::SCORE, self.height as f32, self.best.max(self.height) as f32);
        self.spawn_timer = Some(self.secs(ctx, self.tuning.next_block_secs));
    }

    fn swing_current(&mut self, ctx: &mut EngineContext) {
        let Some(body) = self.current.and_then(|id| ctx.body_of(id)) else {
            return;
        };
        let speed = oscillation_speed(self.height, ctx.area.width);
        (self.block_x, self.direction) = swing(self.block_x, self.direction, speed, ctx.area.width);
        ctx.physics.set_kinematic_position(&body, Vec2::new(self.block_x, SPAWN_Y), 0.0);
    }

    fn gust(&mut self, ctx: &mut EngineContext) {
        self.windy_timer = Some(self.secs(ctx, self.tuning.windy_secs));
        ctx.audio.play(AudioCue::WindGust);

        let boost = if self.height > self.tuning.wind_boost_height { 2.0 } else { 1.0 };
        let bodies: Vec<PhysicsBody> = ctx
            .scene
            .tagged(BLOCK_TAG)
            .filter_map(|e| e.body)
            .filter(|body| ctx.physics.body_type(body) == Some(BodyType::Dynamic))
            .collect();
        for body in bodies {
            let dv = ctx.rng.spread(self.tuning.wind_strength) * boost;
            let mass = ctx.physics.mass(&body);
            ctx.physics.apply_impulse(&body, Vec2::new(mass * dv, 0.0));
        }
        log::debug!("wind gust at height {}", self.height);
    }

    fn thud_check(&self, ctx: &mut EngineContext) {
        let loud = ctx.collisions().iter().filter(|pair| pair.started).any(|pair| {
            let vy = ctx.velocity(pair.entity_a).y.abs() + ctx.velocity(pair.entity_b).y.abs();
            vy > THUD_SPEED
        });
        if loud {
            ctx.audio.play(AudioCue::Thud);
        }
    }

    fn has_fallen(&self, ctx: &EngineContext) -> bool {
        let floor = ctx.area.height + self.tuning.fall_margin;
        ctx.scene.tagged(BLOCK_TAG).any(|e| {
            e.body
                .map(|body| ctx.physics.body_type(&body) == Some(BodyType::Dynamic))
                .unwrap_or(false)
                && e.pos.y > floor
        })
    }

    fn game_over(&mut self, ctx: &mut EngineContext) {
        self.phase = Phase::GameOver;
        self.spawn_timer = None;
        self.wind_timer = None;
        self.windy_timer = None;

        ctx.emit(event_kind::FLASH, 0.2, 0.0);
        let list = if self.height <= self.tuning.early_failure_height {
            taunts::EARLY_FAILURE
        } else {
            taunts::ZEN
        };
        self.message = Some(pick(ctx.rng.as_mut(), list));
        self.best = record_best(ctx.store.as_mut(), BEST_KEY, self.height);
        ctx.emit(event_kind::GAME_OVER, self.height as f32, self.best as f32);
        log::info!("ZenTower: game over at height {} (best {})", self.height, self.best);
    }

    /// New round without the intro.
    fn retry(&mut self, ctx: &mut EngineContext) {
        let blocks: Vec<EntityId> = ctx.scene.tagged(BLOCK_TAG).map(|e| e.id).collect();
        for id in blocks {
            ctx.despawn(id);
        }
        self.height = 0;
        self.message = None;
        self.current = None;
        self.spawn_timer = None;
        self.windy_timer = None;
        self.start_play(ctx);
    }
}

impl Game for ZenTower {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: WORLD_W,
            world_height: WORLD_H,
            gravity: Vec2::new(0.0, GRAVITY),
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        if let Some(tuning) = self.pending.take() {
            self.tuning = tuning;
        }
        self.height = 0;
        self.message = None;
        self.current = None;
        self.spawn_timer = None;
        self.wind_timer = None;
        self.windy_timer = None;
        self.pointer = PointerState::new();
        self.best = load_best_or_zero(ctx.store.as_ref(), BEST_KEY);

        self.spawn_pedestal(ctx);
        self.phase = Phase::Intro(Intro {
            dropped: 0,
            held: None,
            timer: self.secs(ctx, 0.5),
        });
        log::info!("ZenTower: session started, best {}", self.best);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        if input.has_custom(custom_kind::RESET) {
            self.retry(ctx);
        }

        for edge in self.pointer.sample(input) {
            if let PointerEdge::Pressed(_) = edge {
                match self.phase {
                    Phase::Playing => self.drop_current(ctx),
                    Phase::GameOver => self.retry(ctx),
                    Phase::Intro(_) => {}
                }
            }
        }

        match self.phase {
            Phase::Intro(intro) => self.advance_intro(ctx, intro),
            Phase::Playing => {
                self.swing_current(ctx);
                if tick_timer(&mut self.spawn_timer) {
                    self.spawn_player_block(ctx);
                }
                if tick_timer(&mut self.wind_timer) {
                    self.gust(ctx);
                    self.arm_wind(ctx);
                }
                tick_timer(&mut self.windy_timer);
            }
            Phase::GameOver => return,
        }

        self.thud_check(ctx);
        if self.has_fallen(ctx) {
            self.game_over(ctx);
        }
    }

    fn configure(&mut self, json: &str) -> Result<(), ConfigError> {
        self.pending = Some(parse_tuning(json)?);
        Ok(())
    }

    fn hud(&self) -> serde_json::Value {
        json!({
            "height": self.height,
            "best": self.best,
            "game_over": self.is_game_over(),
            "message": self.message,
            "windy": self.is_windy(),
            "intro": matches!(self.phase, Phase::Intro(_)),
        })
    }

    fn teardown(&mut self, _ctx: &mut EngineContext) {
        self.phase = Phase::GameOver;
        self.current = None;
        self.spawn_timer = None;
        self.wind_timer = None;
        self.windy_timer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ticks from session start until the player gets control.
    const INTRO_TICKS: u32 = 30 + 3 * 36 + 2 * 72 + 90;

    fn session(rng: impl RandomSource + 'static) -> (ZenTower, EngineContext) {
        let mut game = ZenTower::new();
        let mut ctx = EngineContext::from_config(&game.config()).with_rng(Box::new(rng));
        game.init(&mut ctx);
        (game, ctx)
    }

    fn step(game: &mut ZenTower, ctx: &mut EngineContext, events: Vec<InputEvent>) {
        ctx.clear_frame_data();
        game.update(ctx, &InputQueue::from_events(events));
        ctx.step_physics();
        ctx.toasts.tick(ctx.dt());
    }

    fn run(game: &mut ZenTower, ctx: &mut EngineContext, ticks: u32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            step(game, ctx, vec![]);
            events.extend(ctx.events.iter().copied());
        }
        events
    }

    fn press() -> Vec<InputEvent> {
        vec![
            InputEvent::PointerDown { x: 400.0, y: 300.0 },
            InputEvent::PointerUp { x: 400.0, y: 300.0 },
        ]
    }

    fn past_intro(rng: impl RandomSource + 'static) -> (ZenTower, EngineContext) {
        let (mut game, mut ctx) = session(rng);
        run(&mut game, &mut ctx, INTRO_TICKS);
        (game, ctx)
    }

    #[test]
    fn intro_stacks_three_blocks_then_hands_over() {
        let (mut game, mut ctx) = session(ScriptedRng::constant(0.5));
        step(&mut game, &mut ctx, press());
        assert_eq!(game.height(), 0, "presses are ignored during the intro");

        run(&mut game, &mut ctx, INTRO_TICKS - 2);
        assert!(matches!(game.phase, Phase::Intro(_)));
        step(&mut game, &mut ctx, vec![]);

        assert_eq!(game.phase, Phase::Playing);
        assert_eq!(game.height(), 3);
        assert!(game.current.is_some());
        assert_eq!(ctx.scene.count_tagged(BLOCK_TAG), 4);
        assert!(!game.is_game_over());
    }

    #[test]
    fn centered_drop_on_stable_stack_stays_supported() {
        let (mut game, mut ctx) = past_intro(ScriptedRng::constant(0.5));
        run(&mut game, &mut ctx, 60);
        game.block_x = ctx.area.width / 2.0;
        let dropped = game.current.unwrap();

        step(&mut game, &mut ctx, press());
        assert_eq!(game.height(), 4);
        assert_eq!(ctx.physics.angular_velocity(&ctx.body_of(dropped).unwrap()), 0.0);

        run(&mut game, &mut ctx, 240);
        assert!(!game.is_game_over());
        let block = ctx.scene.get(dropped).unwrap();
        let pedestal_top = ctx.area.height - 50.0;
        assert!(block.pos.y < pedestal_top, "block at y {}", block.pos.y);
        assert!((block.pos.x - ctx.area.width / 2.0).abs() < 5.0);
        assert!(block.rotation.abs() < 0.05, "rotation {}", block.rotation);
    }

    #[test]
    fn drop_emits_score_and_queues_next_block() {
        let (mut game, mut ctx) = past_intro(ScriptedRng::constant(0.5));
        step(&mut game, &mut ctx, press());
        assert!(ctx.events.iter().any(|e| e.kind == event_kind::SCORE && e.a == 4.0));
        assert!(ctx.audio.cues().contains(&AudioCue::SoftClick));
        assert!(game.current.is_none());

        run(&mut game, &mut ctx, 60);
        assert!(game.current.is_some());
    }

    #[test]
    fn swing_follows_height_speed() {
        let (mut game, mut ctx) = past_intro(ScriptedRng::constant(0.9));
        let x0 = game.block_x;
        step(&mut game, &mut ctx, vec![]);
        let expected = oscillation_speed(3, ctx.area.width);
        assert!((game.block_x - x0 - expected * game.direction).abs() < 1e-4);
    }

    #[test]
    fn block_off_the_pedestal_ends_the_game() {
        let (mut game, mut ctx) = past_intro(ScriptedRng::constant(0.5));
        game.block_x = 80.0;
        step(&mut game, &mut ctx, press());

        let events = run(&mut game, &mut ctx, 240);
        assert!(game.is_game_over());
        assert!(events.iter().any(|e| e.kind == event_kind::FLASH));
        let over = events.iter().find(|e| e.kind == event_kind::GAME_OVER).unwrap();
        assert_eq!((over.a, over.b), (4.0, 4.0));
        assert!(taunts::EARLY_FAILURE.contains(&game.message.unwrap()));
        assert_eq!(ctx.store.load_best(BEST_KEY).unwrap(), Some(4));
        assert!(game.wind_timer.is_none());
    }

    #[test]
    fn press_after_game_over_retries_without_intro() {
        let (mut game, mut ctx) = past_intro(ScriptedRng::constant(0.5));
        game.block_x = 80.0;
        step(&mut game, &mut ctx, press());
        run(&mut game, &mut ctx, 240);
        assert!(game.is_game_over());

        step(&mut game, &mut ctx, press());
        assert_eq!(game.phase, Phase::Playing);
        assert_eq!(game.height(), 0);
        assert_eq!(ctx.scene.count_tagged(BLOCK_TAG), 1);
        assert_eq!(ctx.scene.count_tagged("pedestal"), 1);
        assert!(game.message.is_none());
    }

    #[test]
    fn gust_pushes_dynamic_blocks_only() {
        let (mut game, mut ctx) = past_intro(ScriptedRng::constant(0.75));
        let resting: Vec<EntityId> = ctx
            .scene
            .tagged(BLOCK_TAG)
            .filter(|e| Some(e.id) != game.current)
            .map(|e| e.id)
            .collect();
        assert_eq!(resting.len(), 3);
        let swinging = ctx.body_of(game.current.unwrap()).unwrap();

        game.gust(&mut ctx);
        assert!(game.is_windy());
        assert!(ctx.audio.cues().contains(&AudioCue::WindGust));
        for id in resting {
            let vx = ctx.velocity(id).x;
            assert!((vx - 60.0).abs() < 1.0, "gust velocity {}", vx);
        }
        assert_eq!(ctx.physics.body_type(&swinging), Some(BodyType::KinematicPositionBased));
    }

    #[test]
    fn gusts_double_on_tall_stacks() {
        let (mut game, mut ctx) = past_intro(ScriptedRng::constant(0.75));
        game.height = 6;
        let id = ctx.scene.tagged(BLOCK_TAG).find(|e| Some(e.id) != game.current).unwrap().id;
        game.gust(&mut ctx);
        assert!((ctx.velocity(id).x - 120.0).abs() < 1.0);
    }

    #[test]
    fn wind_arrives_on_schedule() {
        let (mut game, mut ctx) = past_intro(ScriptedRng::constant(0.5));
        let events_before = game.wind_timer.map(|t| t.remaining());
        assert_eq!(events_before, Some(600));
        run(&mut game, &mut ctx, 599);
        assert!(!game.is_windy());
        step(&mut game, &mut ctx, vec![]);
        assert!(game.is_windy());
        run(&mut game, &mut ctx, 120);
        assert!(!game.is_windy());
    }

    #[test]
    fn best_score_loads_from_store() {
        let mut store = MemoryStore::new();
        store.save_best(BEST_KEY, 7).unwrap();
        let mut game = ZenTower::new();
        let mut ctx = EngineContext::from_config(&game.config())
            .with_rng(Box::new(ScriptedRng::constant(0.5)))
            .with_store(Box::new(store));
        game.init(&mut ctx);
        assert_eq!(game.hud()["best"], 7);
    }

    #[test]
    fn teardown_clears_timers_and_bodies() {
        let (mut game, mut ctx) = past_intro(ScriptedRng::constant(0.5));
        game.teardown(&mut ctx);
        ctx.teardown();
        assert!(game.wind_timer.is_none());
        assert!(game.current.is_none());
        assert_eq!(ctx.physics.body_count(), 0);
        assert!(ctx.scene.is_empty());
    }
}

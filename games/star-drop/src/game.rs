use glam::Vec2;
use rage_engine::*;
use rage_engine::api::game::GameConfig;
use rage_engine::input::queue::{custom_kind, InputQueue};
use serde::Deserialize;
use serde_json::json;

use crate::jar::{boundary_push, evasion, flight_noise, JarLayout, Slab, Surface, REJECT_MARGIN};
use crate::taunts;

const WORLD_W: f32 = 800.0;
const WORLD_H: f32 = 600.0;
const GRAVITY: f32 = 980.0;

const STAR_TAG: &str = "star";
const ANCHOR_TAG: &str = "anchor";

const STAR_MATERIAL: ColliderMaterial = ColliderMaterial {
    restitution: 0.9,
    friction: 0.0,
    density: 0.01,
};
const EDGE_MATERIAL: ColliderMaterial = ColliderMaterial {
    restitution: 0.8,
    friction: 0.0,
    density: 1.0,
};
const GLASS_MATERIAL: ColliderMaterial = ColliderMaterial {
    restitution: 0.2,
    friction: 0.1,
    density: 1.0,
};
const STAR_DAMPING: f32 = 0.3;

/// Flight noise phase advance per tick.
const FLIGHT_STEP: f32 = 0.2;
const EDGE_MARGIN: f32 = 50.0;
/// Star speed (px/s) a fresh contact needs to clink.
const CLINK_SPEED: f32 = 60.0;

const TINT_EDGE: u32 = 0;
const TINT_GLASS: u32 = 1;
const TINT_STAR: u32 = 2;

/// Overridable constants for the star.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StarTuning {
    pub star_radius: f32,
    /// Grab reach in star radii.
    pub grab_reach: f32,
    pub spring_stiffness: f32,
    pub spring_damping: f32,
    /// Furthest the grip anchor may lead the star, in px.
    pub max_stretch: f32,
    /// Speed cap applied at the start of each tick, in px/s.
    pub max_speed: f32,
    pub flight_accel: f32,
    pub evasion_radius: f32,
    pub evasion_accel: f32,
    pub edge_accel: f32,
    pub floor_lift: f32,
    /// Velocity resistance per second while held, before and after the ramp.
    pub resist_base: f32,
    pub resist_ramp: f32,
    pub jitter_base: f32,
    pub jitter_ramp: f32,
    pub ramp_secs: f32,
    pub hold_taunt_secs: f32,
    pub handled_taunt_chance: f32,
    pub handled_taunt_gap_secs: f32,
    pub reject_taunt_gap_secs: f32,
}

impl Default for StarTuning {
    fn default() -> Self {
        Self {
            star_radius: 25.0,
            grab_reach: 1.6,
            spring_stiffness: 20.0,
            spring_damping: 2.0,
            max_stretch: 200.0,
            max_speed: 1200.0,
            flight_accel: 300.0,
            evasion_radius: 300.0,
            evasion_accel: 1200.0,
            edge_accel: 400.0,
            floor_lift: 1000.0,
            resist_base: 1.2,
            resist_ramp: 4.8,
            jitter_base: 1200.0,
            jitter_ramp: 2400.0,
            ramp_secs: 3.0,
            hold_taunt_secs: 5.0,
            handled_taunt_chance: 0.15,
            handled_taunt_gap_secs: 0.6,
            reject_taunt_gap_secs: 0.5,
        }
    }
}

impl StarTuning {
    /// Largest acceleration the per-tick forces can add, held or free, in px/s².
    fn peak_accel(&self) -> f32 {
        let jitter = (self.jitter_base + self.jitter_ramp) / 2.0 * std::f32::consts::SQRT_2;
        let held = GRAVITY
            + self.spring_stiffness * self.max_stretch
            + self.spring_damping * self.max_speed
            + jitter;
        // |flight_noise| stays within sqrt(3² + 2²).
        let free = self.flight_accel * 13f32.sqrt()
            + self.evasion_accel
            + self.edge_accel * std::f32::consts::SQRT_2;
        held.max(free) + self.floor_lift
    }

    /// Worst-case travel in one 60 Hz tick, starting at the speed cap.
    fn peak_step(&self) -> f32 {
        let tick = GameConfig::default().fixed_dt;
        (self.max_speed + self.peak_accel() * tick) * tick
    }
}

impl Tunable for StarTuning {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            self.star_radius > 0.0 && self.star_radius < 50.0,
            "star_radius must be in (0, 50)",
        )?;
        ensure(self.max_speed > 0.0, "max_speed must be positive")?;
        ensure(self.max_stretch > 0.0, "max_stretch must be positive")?;
        ensure(self.grab_reach > 0.0, "grab_reach must be positive")?;
        ensure(self.ramp_secs > 0.0, "ramp_secs must be positive")?;
        let forces = [
            self.spring_stiffness,
            self.spring_damping,
            self.flight_accel,
            self.evasion_accel,
            self.edge_accel,
            self.floor_lift,
            self.resist_base,
            self.resist_ramp,
            self.jitter_base,
            self.jitter_ramp,
        ];
        ensure(
            forces.iter().all(|f| f.is_finite() && *f >= 0.0),
            "force tunables must be finite and non-negative",
        )?;
        // Resistance may stop the star in a tick but never throw it backwards.
        ensure(
            (self.resist_base + self.resist_ramp) * GameConfig::default().fixed_dt <= 1.0,
            "resist_base + resist_ramp must not exceed one tick's worth of velocity",
        )?;
        ensure(
            self.peak_step() < REJECT_MARGIN,
            "max_speed and forces could carry the star across the rejection margin in one tick",
        )?;
        ensure(
            (0.0..=1.0).contains(&self.handled_taunt_chance),
            "handled_taunt_chance must be a probability",
        )
    }
}

/// Put the sleepy star in the jar. The jar refuses.
pub struct StarDrop {
    tuning: StarTuning,
    pending: Option<StarTuning>,
    attempts: u32,
    jar: JarLayout,
    star: Option<EntityId>,
    /// Kinematic sensor the grip spring hangs from.
    anchor: Option<EntityId>,
    grip: Option<JointHandle>,
    was_grabbed: bool,
    hold_ticks: u32,
    flight_t: f32,
    since_taunt: u32,
    pointer: PointerState,
}

impl StarDrop {
    pub fn new() -> Self {
        Self {
            tuning: StarTuning::default(),
            pending: None,
            attempts: 0,
            jar: JarLayout::new(PlayArea::FALLBACK, 0),
            star: None,
            anchor: None,
            grip: None,
            was_grabbed: false,
            hold_ticks: 0,
            flight_t: 0.0,
            since_taunt: u32::MAX,
            pointer: PointerState::new(),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_grabbed(&self) -> bool {
        self.grip.is_some()
    }

    pub fn jar(&self) -> JarLayout {
        self.jar
    }

    fn ticks(ctx: &EngineContext, secs: f32) -> u32 {
        (secs / ctx.dt()).round() as u32
    }

    fn spawn_slab(ctx: &mut EngineContext, slab: Slab) {
        let id = ctx.next_id();
        let (tag, tint, material) = match slab.surface {
            Surface::Edge => ("wall", TINT_EDGE, EDGE_MATERIAL),
            Surface::Glass => ("jar", TINT_GLASS, GLASS_MATERIAL),
        };
        let mut entity = Entity::new(id).with_tag(tag).with_size(slab.size);
        if slab.visible {
            entity = entity.with_visual(Visual::new(Shape::Rect, tint));
        }
        ctx.spawn_with_body(
            entity,
            BodyDesc::fixed(ColliderDesc::Cuboid {
                half_width: slab.size.x / 2.0,
                half_height: slab.size.y / 2.0,
            })
            .with_position(slab.center),
            material,
        );
    }

    /// Lay out walls, jar, star and grip anchor for the current attempt.
    fn build_world(&mut self, ctx: &mut EngineContext) {
        self.jar = JarLayout::new(ctx.area, self.attempts);
        for slab in self.jar.slabs(ctx.area) {
            Self::spawn_slab(ctx, slab);
        }

        let radius = self.tuning.star_radius;
        let pos = Vec2::new(
            50.0 + ctx.rng.next_f32() * (ctx.area.width - 100.0),
            50.0 + ctx.rng.next_f32() * (ctx.area.height / 2.0),
        );
        let id = ctx.next_id();
        self.star = Some(ctx.spawn_with_body(
            Entity::new(id)
                .with_tag(STAR_TAG)
                .with_size(Vec2::splat(radius * 2.0))
                .with_visual(Visual::new(Shape::Star, TINT_STAR)),
            BodyDesc::dynamic(ColliderDesc::Ball { radius })
                .with_position(pos)
                .with_linear_damping(STAR_DAMPING)
                .with_ccd(true),
            STAR_MATERIAL,
        ));

        let id = ctx.next_id();
        self.anchor = Some(ctx.spawn_with_body(
            Entity::new(id).with_tag(ANCHOR_TAG),
            BodyDesc::kinematic(ColliderDesc::Ball { radius: 1.0 })
                .with_position(self.pointer.pos)
                .with_sensor(true),
            ColliderMaterial::default(),
        ));

        self.grip = None;
        self.was_grabbed = false;
        self.hold_ticks = 0;
        self.flight_t = 0.0;
        self.since_taunt = u32::MAX;
    }

    fn reset(&mut self, ctx: &mut EngineContext) {
        ctx.clear_entities();
        self.attempts += 1;
        self.build_world(ctx);
        log::info!(
            "StarDrop: reset, attempt {} with a {} px opening",
            self.attempts,
            self.jar.width
        );
    }

    fn star_toast(&self, ctx: &mut EngineContext, text: &str, at: Vec2, variant: ToastVariant) {
        let spec = ToastSpec::at(at.x, at.y, variant)
            .with_rotation(ctx.rng.spread(40.0))
            .with_scale(1.0 + 0.5 * ctx.rng.next_f32())
            .with_ttl(1.0);
        ctx.toast(text, spec);
    }

    fn taunt(&mut self, ctx: &mut EngineContext, at: Vec2) {
        let text = pick(ctx.rng.as_mut(), taunts::STAR);
        self.star_toast(ctx, text, at, ToastVariant::Danger);
        self.since_taunt = 0;
    }

    fn cap_speed(&self, ctx: &mut EngineContext, star: EntityId) {
        let vel = ctx.velocity(star);
        if vel.length() > self.tuning.max_speed {
            ctx.set_velocity(star, vel.clamp_length_max(self.tuning.max_speed));
        }
    }

    fn try_grab(&mut self, ctx: &mut EngineContext, star: EntityId, at: Vec2) {
        if self.grip.is_some() {
            return;
        }
        let reach = self.tuning.star_radius * self.tuning.grab_reach;
        if ctx.position(star).distance(at) > reach {
            return;
        }
        let (Some(anchor), Some(star_body)) = (self.anchor.and_then(|id| ctx.body_of(id)), ctx.body_of(star))
        else {
            return;
        };
        ctx.physics.set_position(&anchor, at);
        self.grip = Some(ctx.physics.create_joint(
            &anchor,
            &star_body,
            &JointDesc::Spring {
                anchor_a: Vec2::ZERO,
                anchor_b: Vec2::ZERO,
                rest_length: 0.0,
                stiffness: self.tuning.spring_stiffness,
                damping: self.tuning.spring_damping,
            },
        ));
        log::debug!("star grabbed at {:?}", at);
    }

    fn drop_grip(&mut self, ctx: &mut EngineContext) {
        if let Some(joint) = self.grip.take() {
            ctx.physics.remove_joint(joint);
        }
    }

    /// Anchor tracks the pointer, never leading a held star by more than
    /// `max_stretch`.
    fn follow_pointer(&self, ctx: &mut EngineContext, star: EntityId) {
        let Some(anchor) = self.anchor.and_then(|id| ctx.body_of(id)) else {
            return;
        };
        let mut target = self.pointer.pos;
        if self.grip.is_some() {
            let pos = ctx.position(star);
            target = pos + (target - pos).clamp_length_max(self.tuning.max_stretch);
        }
        ctx.physics.set_kinematic_position(&anchor, target, 0.0);
    }

    fn twitch(&self, ctx: &mut EngineContext, star: EntityId) {
        let Some(body) = ctx.body_of(star) else {
            return;
        };
        let mass = ctx.mass(star);
        let spin = ctx.rng.spread(48.0);
        let kick = Vec2::new(ctx.rng.spread(600.0), ctx.rng.spread(600.0));
        ctx.physics.set_angular_velocity(&body, spin);
        ctx.apply_impulse(star, kick * mass);
        ctx.audio.play(AudioCue::Snap);
        log::debug!("star twitched free");
    }

    fn fly(&self, ctx: &mut EngineContext, star: EntityId) {
        let t = &self.tuning;
        let pos = ctx.position(star);
        let accel = -ctx.physics.gravity()
            + flight_noise(self.flight_t) * t.flight_accel
            + evasion(pos, self.pointer.pos, t.evasion_radius, t.evasion_accel)
            + boundary_push(pos, ctx.area, EDGE_MARGIN, t.edge_accel);
        let mass = ctx.mass(star);
        ctx.apply_force(star, accel * mass);
    }

    fn struggle(&mut self, ctx: &mut EngineContext, star: EntityId) {
        self.hold_ticks += 1;
        let ramp_ticks = Self::ticks(ctx, self.tuning.ramp_secs).max(1);
        let ramp = (self.hold_ticks as f32 / ramp_ticks as f32).min(1.0);

        let mass = ctx.mass(star);
        let resist = -ctx.velocity(star) * (self.tuning.resist_base + self.tuning.resist_ramp * ramp);
        let span = self.tuning.jitter_base + self.tuning.jitter_ramp * ramp;
        let jitter = Vec2::new(ctx.rng.spread(span), ctx.rng.spread(span));
        ctx.apply_force(star, (resist + jitter) * mass);

        let pos = ctx.position(star);
        if self.hold_ticks == Self::ticks(ctx, self.tuning.hold_taunt_secs) {
            let text = pick(ctx.rng.as_mut(), taunts::HOLD);
            self.star_toast(ctx, text, pos - Vec2::new(0.0, 80.0), ToastVariant::Glitch);
            ctx.audio.play(AudioCue::TauntScare);
        } else if self.since_taunt >= Self::ticks(ctx, self.tuning.handled_taunt_gap_secs)
            && ctx.rng.chance(self.tuning.handled_taunt_chance)
        {
            let at = pos + Vec2::new(ctx.rng.spread(50.0), -60.0);
            self.taunt(ctx, at);
        }
    }

    /// Throw the star out of the jar's mouth, whether held or not.
    fn reject(&mut self, ctx: &mut EngineContext, star: EntityId) {
        let pos = ctx.position(star);
        if !self.jar.in_rejection_zone(pos) {
            return;
        }
        self.drop_grip(ctx);
        self.was_grabbed = false;
        let eject = Vec2::new(ctx.rng.spread(2400.0), -1800.0);
        ctx.set_velocity(star, eject);
        ctx.audio.play(AudioCue::Snap);
        if self.since_taunt >= Self::ticks(ctx, self.tuning.reject_taunt_gap_secs) {
            self.taunt(ctx, pos - Vec2::new(0.0, 50.0));
        }
        log::debug!("star rejected at {:?}", pos);
    }

    fn floor_lift(&self, ctx: &mut EngineContext, star: EntityId) {
        if ctx.position(star).y > ctx.area.height - 100.0 {
            let mass = ctx.mass(star);
            ctx.apply_force(star, Vec2::new(0.0, -self.tuning.floor_lift * mass));
        }
    }

    fn clink_check(&self, ctx: &mut EngineContext, star: EntityId) {
        let hit = ctx
            .collisions()
            .iter()
            .any(|pair| pair.started && pair.involves(star));
        if hit && ctx.velocity(star).length() > CLINK_SPEED {
            ctx.audio.play(AudioCue::GlassClink);
        }
    }
}

impl Game for StarDrop {
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
        self.attempts = 0;
        self.pointer = PointerState::new();
        self.build_world(ctx);
        log::info!("StarDrop: session started");
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        if input.has_custom(custom_kind::RESET) {
            self.reset(ctx);
        }
        let Some(star) = self.star else {
            return;
        };

        self.cap_speed(ctx, star);
        for edge in self.pointer.sample(input) {
            match edge {
                PointerEdge::Pressed(at) => self.try_grab(ctx, star, at),
                PointerEdge::Released(_) => self.drop_grip(ctx),
                PointerEdge::Moved(_) => {}
            }
        }
        self.follow_pointer(ctx, star);
        self.flight_t += FLIGHT_STEP;

        let grabbed = self.grip.is_some();
        if self.was_grabbed && !grabbed {
            self.twitch(ctx, star);
        }
        self.was_grabbed = grabbed;
        if grabbed {
            self.struggle(ctx, star);
        } else {
            self.hold_ticks = 0;
            self.fly(ctx, star);
        }

        self.reject(ctx, star);
        self.floor_lift(ctx, star);
        self.clink_check(ctx, star);
        self.since_taunt = self.since_taunt.saturating_add(1);
    }

    fn configure(&mut self, json: &str) -> Result<(), ConfigError> {
        self.pending = Some(parse_tuning(json)?);
        Ok(())
    }

    fn hud(&self) -> serde_json::Value {
        json!({
            "attempts": self.attempts,
            "grabbed": self.is_grabbed(),
            "jar_width": self.jar.width,
            "hold_secs": self.hold_ticks as f32 / 60.0,
        })
    }

    fn teardown(&mut self, _ctx: &mut EngineContext) {
        self.star = None;
        self.anchor = None;
        self.grip = None;
        self.was_grabbed = false;
        self.hold_ticks = 0;
    }
}

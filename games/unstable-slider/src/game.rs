use glam::Vec2;
use rage_engine::*;
use rage_engine::api::game::GameConfig;
use rage_engine::input::queue::InputQueue;
use serde::Deserialize;
use serde_json::json;

use crate::chaos::{
    chaos_interval_ms, crossed_thresholds, handle_size, roll_chaos, transform_offset, ChaosMode,
    ChaosRoll, Grip,
};
use crate::taunts;

const WORLD_W: f32 = 1000.0;
const WORLD_H: f32 = 600.0;

/// Delay before the first chaos tick and after every grab or drop.
const CHAOS_REARM_MS: u32 = 800;

const TINT_TRACK: u32 = 0;
const TINT_FILL: u32 = 1;
const TINT_HANDLE: u32 = 2;

/// Overridable constants for the slider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SliderTuning {
    /// Any committed percent at or above this is intercepted.
    pub hard_stop: f32,
    pub win_at: f32,
    pub handle_size: f32,
    pub track_height: f32,
    /// Extra reach around the handle when grabbing.
    pub grab_tolerance: f32,
    pub grab_jump_chance: f32,
    pub release_reset_chance: f32,
}

impl Default for SliderTuning {
    fn default() -> Self {
        Self {
            hard_stop: 98.5,
            win_at: 99.9,
            handle_size: 48.0,
            track_height: 64.0,
            grab_tolerance: 16.0,
            grab_jump_chance: 0.2,
            release_reset_chance: 0.5,
        }
    }
}

impl Tunable for SliderTuning {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            self.hard_stop > 0.0 && self.hard_stop <= 100.0,
            "hard_stop must be within (0, 100]",
        )?;
        ensure(self.win_at > 0.0, "win_at must be positive")?;
        ensure(
            self.handle_size > 0.0 && self.track_height > 0.0,
            "handle and track sizes must be positive",
        )?;
        ensure(self.grab_tolerance >= 0.0, "grab_tolerance must not be negative")?;
        let unit = 0.0..=1.0;
        ensure(
            unit.contains(&self.grab_jump_chance) && unit.contains(&self.release_reset_chance),
            "chances must be within [0, 1]",
        )
    }
}

/// A progress slider that fights every attempt to reach 100%.
pub struct UnstableSlider {
    tuning: SliderTuning,
    /// Override waiting for the next session.
    pending: Option<SliderTuning>,
    value: f32,
    /// Last committed value, for threshold crossings.
    last_value: f32,
    grip: Grip,
    handle: f32,
    chaos_timer: Option<TickTimer>,
    pointer: PointerState,
    track: Track,
    won: bool,
}

impl UnstableSlider {
    pub fn new() -> Self {
        let tuning = SliderTuning::default();
        Self {
            handle: tuning.handle_size,
            track: track_layout(PlayArea::FALLBACK, tuning.track_height),
            tuning,
            pending: None,
            value: 0.0,
            last_value: 0.0,
            grip: Grip::Released,
            chaos_timer: None,
            pointer: PointerState::new(),
            won: false,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn mode(&self) -> ChaosMode {
        self.grip.mode()
    }

    pub fn is_dragging(&self) -> bool {
        self.grip.is_held()
    }

    fn arm_chaos(&mut self, ctx: &EngineContext, ms: u32) {
        self.chaos_timer = Some(TickTimer::from_secs(ms as f32 / 1000.0, ctx.dt()));
    }

    fn set_mode(&mut self, mode: ChaosMode) {
        if self.grip.mode() != mode {
            log::debug!("chaos mode {:?} -> {:?}", self.grip.mode(), mode);
        }
        self.grip = self.grip.with_mode(mode);
    }

    fn handle_center(&self) -> Vec2 {
        Vec2::new(self.track.x_at(self.value), self.track.center_y())
    }

    fn grab(&mut self, ctx: &mut EngineContext, pos: Vec2) {
        let reach = self.handle / 2.0 + self.tuning.grab_tolerance;
        let delta = (pos - self.handle_center()).abs();
        if self.grip.is_held() || delta.x > reach || delta.y > reach {
            return;
        }

        self.grip = Grip::Held { mode: ChaosMode::Normal };
        ctx.audio.start(Voice::Drag);
        self.arm_chaos(ctx, CHAOS_REARM_MS);

        if ctx.rng.chance(self.tuning.grab_jump_chance) {
            self.value = ctx.rng.next_f32() * self.tuning.hard_stop;
            self.last_value = self.value;
            ctx.audio.play(AudioCue::Snap);
            self.scatter_toast(ctx, taunts::JUMP_START, ToastVariant::Normal);
            log::debug!("grab jump to {:.1}%", self.value);
        }
    }

    fn release(&mut self, ctx: &mut EngineContext) {
        if !self.grip.is_held() {
            return;
        }
        self.end_drag(ctx);

        if self.value > 0.0 && ctx.rng.chance(self.tuning.release_reset_chance) {
            self.value = 0.0;
            self.last_value = 0.0;
            ctx.audio.play(AudioCue::Snap);
            self.scatter_toast(ctx, taunts::BUTTERFINGERS, ToastVariant::Normal);
        }
    }

    /// Drop the drag without the release perturbation.
    fn force_drop(&mut self, ctx: &mut EngineContext) {
        self.pointer.force_release();
        self.end_drag(ctx);
    }

    fn end_drag(&mut self, ctx: &mut EngineContext) {
        self.grip = Grip::Released;
        self.handle = self.tuning.handle_size;
        ctx.audio.stop(Voice::Drag);
        self.arm_chaos(ctx, CHAOS_REARM_MS);
    }

    fn drag_to(&mut self, ctx: &mut EngineContext, pos: Vec2) {
        let mode = self.grip.mode();
        let raw = pos.x - self.track.left;
        let Some(offset) = transform_offset(mode, raw, self.track.width, ctx.rng.as_mut()) else {
            return;
        };

        let mut percent = self.track.percent_of(offset);
        if percent >= self.tuning.hard_stop {
            self.hard_stop(ctx, pos);
            return;
        }
        if percent > 95.0 {
            percent -= ctx.rng.range(0.0, 5.0);
            if ctx.rng.chance(0.1) {
                self.set_mode(ChaosMode::Invisible);
            }
        }
        self.commit(ctx, percent.clamp(0.0, 100.0));
    }

    fn commit(&mut self, ctx: &mut EngineContext, percent: f32) {
        let unstable = self.grip.mode() != ChaosMode::Normal;
        ctx.audio.update(Voice::Drag, percent, unstable);
        for threshold in crossed_thresholds(self.last_value, percent) {
            ctx.audio.play(AudioCue::Threshold(threshold));
        }
        self.last_value = percent;
        self.value = percent;

        if !self.won && self.value >= self.tuning.win_at {
            self.won = true;
            let text = pick(ctx.rng.as_mut(), taunts::VICTORY);
            let center = ctx.area.center();
            self.show(ctx, text, ToastSpec::at(center.x, center.y, ToastVariant::Normal));
            ctx.emit(event_kind::WIN, self.value, 0.0);
            log::info!("slider won at {:.2}%", self.value);
        }
    }

    /// Teleport back into `[0, 40)` instead of letting the value through.
    fn hard_stop(&mut self, ctx: &mut EngineContext, pos: Vec2) {
        ctx.emit(event_kind::SHAKE, 0.2, 0.0);
        self.value = ctx.rng.next_f32() * 40.0;
        self.last_value = self.value;

        let text = pick(ctx.rng.as_mut(), taunts::INTENSE);
        let spec = ToastSpec::at(pos.x, self.track.top - 100.0, ToastVariant::Glitch).with_ttl(0.4);
        self.show(ctx, text, spec);
        ctx.audio.play(AudioCue::Snap);
        log::debug!("hard stop, value now {:.1}%", self.value);

        if ctx.rng.chance(0.5) {
            self.force_drop(ctx);
        }
    }

    fn chaos_tick(&mut self, ctx: &mut EngineContext) {
        if self.grip.is_held() {
            let r = ctx.rng.next_f32();

            if ctx.rng.chance(self.value / 120.0) {
                let (list, variant) = if self.value > 90.0 {
                    (taunts::INTENSE, ToastVariant::Glitch)
                } else if self.value > 70.0 {
                    (taunts::TROLL, ToastVariant::Danger)
                } else {
                    (taunts::TROLL, ToastVariant::Normal)
                };
                let text = pick(ctx.rng.as_mut(), list);
                self.scatter_toast(ctx, text, variant);
            }

            match roll_chaos(self.value, r) {
                ChaosRoll::Mode(mode) => {
                    if mode == ChaosMode::Reverse {
                        self.scatter_toast(ctx, taunts::REVERSED, ToastVariant::Warning);
                    }
                    self.set_mode(mode);
                }
                ChaosRoll::SnapToZero => {
                    self.value = 0.0;
                    self.last_value = 0.0;
                    self.force_drop(ctx);
                    ctx.audio.play(AudioCue::Snap);
                    self.scatter_toast(ctx, taunts::SNAP, ToastVariant::Danger);
                    ctx.emit(event_kind::SHAKE, 0.3, 0.0);
                    log::debug!("snap to zero");
                }
                ChaosRoll::FakeRegression => {
                    self.value = (self.value - ctx.rng.range(20.0, 50.0)).max(0.0);
                    self.last_value = self.value;
                    ctx.audio.play(AudioCue::Snap);
                    self.scatter_toast(ctx, taunts::REGRESSION, ToastVariant::Normal);
                    log::debug!("fake regression to {:.1}%", self.value);
                }
                ChaosRoll::Mercy => self.set_mode(ChaosMode::Normal),
            }
        }

        self.handle = if self.grip.is_held() {
            handle_size(self.value, self.tuning.handle_size)
        } else {
            self.tuning.handle_size
        };

        if self.chaos_timer.is_none() {
            self.arm_chaos(ctx, chaos_interval_ms(self.value));
        }
    }

    /// Toast at a random spot; past 80% it may land anywhere, larger.
    fn scatter_toast(&mut self, ctx: &mut EngineContext, text: &str, variant: ToastVariant) {
        let PlayArea { width, height } = ctx.area;
        let (x, y, scale) = if self.value > 80.0 {
            let x = ctx.rng.next_f32() * (width - 100.0).max(0.0);
            let y = ctx.rng.next_f32() * (height - 50.0).max(0.0);
            (x, y, 1.0 + ctx.rng.next_f32())
        } else {
            let x = ctx.rng.next_f32() * (width - 200.0).max(0.0) + 100.0;
            let y = ctx.rng.next_f32() * (height - 100.0).max(0.0) + 50.0;
            (x, y, 1.0)
        };
        let rotation = ctx.rng.spread(60.0);
        let ttl = if variant == ToastVariant::Glitch { 0.4 } else { 1.5 };
        let spec = ToastSpec::at(x, y, variant)
            .with_rotation(rotation)
            .with_scale(scale)
            .with_ttl(ttl);
        self.show(ctx, text, spec);
    }

    fn show(&self, ctx: &mut EngineContext, text: &str, spec: ToastSpec) {
        ctx.audio.play(AudioCue::Toast(spec.variant));
        ctx.toast(text, spec);
    }
}

/// Track spans the middle 80% of the width, centered vertically.
fn track_layout(area: PlayArea, height: f32) -> Track {
    Track::new(area.width * 0.1, (area.height - height) / 2.0, area.width * 0.8, height)
}

impl Game for UnstableSlider {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: WORLD_W,
            world_height: WORLD_H,
            max_instances: 8,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        if let Some(tuning) = self.pending.take() {
            self.tuning = tuning;
        }
        self.value = 0.0;
        self.last_value = 0.0;
        self.grip = Grip::Released;
        self.handle = self.tuning.handle_size;
        self.pointer = PointerState::new();
        self.track = track_layout(ctx.area, self.tuning.track_height);
        self.won = false;
        self.arm_chaos(ctx, CHAOS_REARM_MS);
        log::info!("UnstableSlider: track {:.0}px wide", self.track.width);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        self.track = track_layout(ctx.area, self.tuning.track_height);
        if self.won {
            return;
        }

        for edge in self.pointer.sample(input) {
            match edge {
                PointerEdge::Pressed(pos) => self.grab(ctx, pos),
                PointerEdge::Released(_) => self.release(ctx),
                PointerEdge::Moved(pos) if self.grip.is_held() => self.drag_to(ctx, pos),
                PointerEdge::Moved(_) => {}
            }
        }

        if tick_timer(&mut self.chaos_timer) {
            self.chaos_tick(ctx);
        }
    }

    fn configure(&mut self, json: &str) -> Result<(), ConfigError> {
        self.pending = Some(parse_tuning(json)?);
        Ok(())
    }

    fn hud(&self) -> serde_json::Value {
        json!({
            "value": self.value,
            "mode": self.grip.mode(),
            "stable": self.grip.mode() == ChaosMode::Normal,
            "handle_size": self.handle,
            "dragging": self.grip.is_held(),
            "won": self.won,
        })
    }

    fn teardown(&mut self, _ctx: &mut EngineContext) {
        self.chaos_timer = None;
        self.grip = Grip::Released;
        self.pointer = PointerState::new();
    }

    fn render(&self, ctx: &mut RenderContext) {
        let track = self.track;
        let track_center = Vec2::new(track.left + track.width / 2.0, track.center_y());
        ctx.render_buffer.push(RenderInstance::new(
            Shape::Rect,
            track_center,
            Vec2::new(track.width, track.height),
            TINT_TRACK,
        ));

        let fill = track.width * self.value / 100.0;
        if fill > 0.0 {
            ctx.render_buffer.push(RenderInstance::new(
                Shape::Rect,
                Vec2::new(track.left + fill / 2.0, track.center_y()),
                Vec2::new(fill, track.height),
                TINT_FILL,
            ));
        }

        let alpha = if self.grip.mode().hides_handle() { 0.0 } else { 1.0 };
        ctx.render_buffer.push(
            RenderInstance::new(Shape::Rect, self.handle_center(), Vec2::splat(self.handle), TINT_HANDLE)
                .with_alpha(alpha),
        );
    }
}

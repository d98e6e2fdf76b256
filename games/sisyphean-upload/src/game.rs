use glam::Vec2;
use rage_engine::*;
use rage_engine::api::game::GameConfig;
use rage_engine::input::queue::InputQueue;
use serde::Deserialize;
use serde_json::json;

use crate::taunts;
use crate::transfer::{upload_rate, Status};

const WORLD_W: f32 = 800.0;
const WORLD_H: f32 = 600.0;

const TINT_TRACK: u32 = 0;
const TINT_PROGRESS: u32 = 1;
const TINT_HEAT: u32 = 2;
const TINT_HEAT_CRITICAL: u32 = 3;

/// Overridable constants for the upload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UploadTuning {
    pub ceiling: f32,
    pub heat_per_tick: f32,
    pub cool_per_tick: f32,
    pub lockout_secs: f32,
    /// Minimum spacing between packet losses.
    pub packet_loss_gap_secs: f32,
    pub packet_loss_chance: f32,
    pub fake_win_chance: f32,
    /// Where progress lands when a fake completion is revealed.
    pub rollback_to: f32,
}

impl Default for UploadTuning {
    fn default() -> Self {
        Self {
            ceiling: 99.99,
            heat_per_tick: 0.12,
            cool_per_tick: 0.5,
            lockout_secs: 3.0,
            packet_loss_gap_secs: 12.0,
            packet_loss_chance: 0.01,
            fake_win_chance: 0.1,
            rollback_to: 80.0,
        }
    }
}

impl Tunable for UploadTuning {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            self.ceiling > 0.0 && self.ceiling <= 100.0,
            "ceiling must be within (0, 100]",
        )?;
        ensure(self.heat_per_tick > 0.0, "heat_per_tick must be positive")?;
        ensure(self.cool_per_tick >= 0.0, "cool_per_tick must not be negative")?;
        ensure(
            self.lockout_secs > 0.0 && self.packet_loss_gap_secs >= 0.0,
            "lockout and packet loss spacing must be positive",
        )?;
        let unit = 0.0..=1.0;
        ensure(
            unit.contains(&self.packet_loss_chance) && unit.contains(&self.fake_win_chance),
            "chances must be within [0, 1]",
        )?;
        ensure(
            (0.0..=self.ceiling).contains(&self.rollback_to),
            "rollback_to must be within [0, ceiling]",
        )
    }
}

/// Where the upload is in its cycle. Heat only moves in `Idle` and `Uploading`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Uploading,
    FakeComplete,
    Overheated { lockout: TickTimer },
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Uploading => "uploading",
            Phase::FakeComplete => "complete",
            Phase::Overheated { .. } => "overheated",
        }
    }
}

/// Hold-to-upload bar that never quite finishes.
pub struct SisypheanUpload {
    tuning: UploadTuning,
    pending: Option<UploadTuning>,
    phase: Phase,
    progress: f32,
    heat: f32,
    status: Status,
    /// Ticks since session start or the last packet loss.
    since_loss: u32,
    pointer: PointerState,
}

impl SisypheanUpload {
    pub fn new() -> Self {
        Self {
            tuning: UploadTuning::default(),
            pending: None,
            phase: Phase::Idle,
            progress: 0.0,
            heat: 0.0,
            status: Status::WaitingForInput,
            since_loss: 0,
            pointer: PointerState::new(),
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn heat(&self) -> f32 {
        self.heat
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_overheated(&self) -> bool {
        matches!(self.phase, Phase::Overheated { .. })
    }

    fn set_status(&mut self, ctx: &mut EngineContext, status: Status) {
        if self.status != status {
            self.status = status;
            ctx.emit(event_kind::STATUS, status.code() as f32, 0.0);
        }
    }

    fn press(&mut self, ctx: &mut EngineContext) {
        match self.phase {
            Phase::FakeComplete | Phase::Overheated { .. } => ctx.audio.play(AudioCue::Error),
            Phase::Idle => {
                self.phase = Phase::Uploading;
                self.set_status(ctx, Status::Uploading);
                ctx.audio.start(Voice::UploadHum);
            }
            Phase::Uploading => {}
        }
    }

    fn release(&mut self, ctx: &mut EngineContext) {
        match self.phase {
            Phase::FakeComplete => {
                self.phase = Phase::Idle;
                self.progress = self.tuning.rollback_to;
                self.set_status(ctx, Status::RolledBack);
                ctx.audio.play(AudioCue::Error);
                ctx.audio.stop(Voice::UploadHum);
                log::debug!("fake completion revealed");
            }
            Phase::Uploading => {
                self.phase = Phase::Idle;
                ctx.audio.stop(Voice::UploadHum);
                ctx.audio.play(AudioCue::Shatter);
                if self.progress > 0.0 {
                    self.taunt(ctx);
                }
                self.progress = 0.0;
            }
            Phase::Idle | Phase::Overheated { .. } => {}
        }
    }

    fn taunt(&mut self, ctx: &mut EngineContext) {
        let msg = pick(ctx.rng.as_mut(), taunts::UPLOAD);
        self.set_status(ctx, Status::Error(msg));
        let center = ctx.area.center();
        ctx.toast(
            msg,
            ToastSpec::at(center.x, center.y, ToastVariant::Danger)
                .with_rotation(2.0)
                .with_scale(2.0)
                .with_ttl(2.0),
        );
        ctx.audio.play(AudioCue::TauntScare);
    }

    fn upload_tick(&mut self, ctx: &mut EngineContext) {
        let before = self.progress;
        self.progress = (before + upload_rate(before)).min(self.tuning.ceiling);
        ctx.audio.update(Voice::UploadHum, self.progress, false);

        self.heat += self.tuning.heat_per_tick;
        if self.heat >= 100.0 {
            self.overheat(ctx);
            return;
        }

        if before > 95.0 && before < 95.1 && ctx.rng.chance(self.tuning.fake_win_chance) {
            self.phase = Phase::FakeComplete;
            self.set_status(ctx, Status::Complete);
            log::debug!("fake completion at {:.3}%", before);
            return;
        }

        let gap = (self.tuning.packet_loss_gap_secs / ctx.dt()).round() as u32;
        if self.since_loss >= gap && ctx.rng.chance(self.tuning.packet_loss_chance) {
            self.packet_loss(ctx);
        }
    }

    fn packet_loss(&mut self, ctx: &mut EngineContext) {
        let loss = ctx.rng.range(5.0, 20.0);
        self.progress = (self.progress - loss).max(0.0);
        self.since_loss = 0;
        ctx.emit(event_kind::SHAKE, 0.5, 0.0);
        ctx.audio.play(AudioCue::Error);
        self.set_status(ctx, Status::PacketLoss);
        log::debug!("packet loss of {:.1}%", loss);
    }

    fn overheat(&mut self, ctx: &mut EngineContext) {
        self.pointer.force_release();
        self.phase = Phase::Overheated {
            lockout: TickTimer::from_secs(self.tuning.lockout_secs, ctx.dt()),
        };
        ctx.audio.stop(Voice::UploadHum);
        ctx.audio.play(AudioCue::Error);
        self.set_status(ctx, Status::Overheat);
        log::info!("upload overheated at {:.2}%", self.progress);
    }

    fn cool_down(&mut self, ctx: &mut EngineContext) {
        self.phase = Phase::Idle;
        self.heat = 0.0;
        self.set_status(ctx, Status::Cooled);
        log::info!("upload lockout over");
    }
}

impl Game for SisypheanUpload {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: WORLD_W,
            world_height: WORLD_H,
            max_instances: 8,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, _ctx: &mut EngineContext) {
        if let Some(tuning) = self.pending.take() {
            self.tuning = tuning;
        }
        self.phase = Phase::Idle;
        self.progress = 0.0;
        self.heat = 0.0;
        self.status = Status::WaitingForInput;
        self.since_loss = 0;
        self.pointer = PointerState::new();
        log::info!("SisypheanUpload: waiting for input");
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        self.since_loss = self.since_loss.saturating_add(1);

        for edge in self.pointer.sample(input) {
            match edge {
                PointerEdge::Pressed(_) => self.press(ctx),
                PointerEdge::Released(_) => self.release(ctx),
                PointerEdge::Moved(_) => {}
            }
        }

        match &mut self.phase {
            Phase::Uploading => self.upload_tick(ctx),
            Phase::Idle => self.heat = (self.heat - self.tuning.cool_per_tick).max(0.0),
            Phase::FakeComplete => {}
            Phase::Overheated { lockout } => {
                if lockout.tick() {
                    self.cool_down(ctx);
                }
            }
        }
    }

    fn configure(&mut self, json: &str) -> Result<(), ConfigError> {
        self.pending = Some(parse_tuning(json)?);
        Ok(())
    }

    fn hud(&self) -> serde_json::Value {
        json!({
            "progress": self.progress,
            "heat": self.heat,
            "status": self.status.to_string(),
            "phase": self.phase.name(),
            "overheated": self.is_overheated(),
            "fake_complete": self.phase == Phase::FakeComplete,
        })
    }

    fn teardown(&mut self, _ctx: &mut EngineContext) {
        self.phase = Phase::Idle;
        self.pointer = PointerState::new();
    }

    fn render(&self, ctx: &mut RenderContext) {
        let area = ctx.area;
        let width = area.width * 0.8;
        let left = area.width * 0.1;
        let bars = [
            (area.height * 0.45, 40.0, self.progress, TINT_PROGRESS),
            (
                area.height * 0.45 + 60.0,
                12.0,
                self.heat.min(100.0),
                if self.heat > 80.0 || self.is_overheated() { TINT_HEAT_CRITICAL } else { TINT_HEAT },
            ),
        ];
        for (y, height, percent, tint) in bars {
            ctx.render_buffer.push(RenderInstance::new(
                Shape::Rect,
                Vec2::new(left + width / 2.0, y),
                Vec2::new(width, height),
                TINT_TRACK,
            ));
            let fill = width * percent / 100.0;
            if fill > 0.0 {
                ctx.render_buffer.push(RenderInstance::new(
                    Shape::Rect,
                    Vec2::new(left + fill / 2.0, y),
                    Vec2::new(fill, height),
                    tint,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(rng: impl RandomSource + 'static) -> (SisypheanUpload, EngineContext) {
        let mut game = SisypheanUpload::new();
        let mut ctx = EngineContext::from_config(&game.config()).with_rng(Box::new(rng));
        game.init(&mut ctx);
        (game, ctx)
    }

    fn step(game: &mut SisypheanUpload, ctx: &mut EngineContext, events: Vec<InputEvent>) {
        ctx.clear_frame_data();
        game.update(ctx, &InputQueue::from_events(events));
        ctx.toasts.tick(ctx.dt());
    }

    fn down() -> Vec<InputEvent> {
        vec![InputEvent::PointerDown { x: 400.0, y: 300.0 }]
    }

    fn up() -> Vec<InputEvent> {
        vec![InputEvent::PointerUp { x: 400.0, y: 300.0 }]
    }

    fn statuses(ctx: &EngineContext) -> Vec<u8> {
        ctx.events
            .iter()
            .filter(|e| e.kind == event_kind::STATUS)
            .map(|e| e.a as u8)
            .collect()
    }

    #[test]
    fn holding_uploads() {
        let (mut game, mut ctx) = session(ScriptedRng::constant(0.99));
        step(&mut game, &mut ctx, down());
        assert_eq!(game.progress(), 0.4);
        assert_eq!(statuses(&ctx), vec![Status::Uploading.code()]);
        assert!(ctx.audio.is_running(Voice::UploadHum));
    }

    #[test]
    fn space_bar_also_holds() {
        let (mut game, mut ctx) = session(ScriptedRng::constant(0.99));
        step(&mut game, &mut ctx, vec![InputEvent::KeyDown { key_code: KEY_SPACE }]);
        step(&mut game, &mut ctx, vec![InputEvent::KeyDown { key_code: KEY_SPACE }]);
        assert!((game.progress() - 0.8).abs() < 1e-5);
        step(&mut game, &mut ctx, vec![InputEvent::KeyUp { key_code: KEY_SPACE }]);
        assert_eq!(game.progress(), 0.0);
    }

    #[test]
    fn release_resets_and_taunts() {
        let (mut game, mut ctx) = session(ScriptedRng::constant(0.99));
        for _ in 0..10 {
            step(&mut game, &mut ctx, down());
        }
        step(&mut game, &mut ctx, up());

        assert_eq!(game.progress(), 0.0);
        assert!(matches!(game.status(), Status::Error(_)));
        assert!(ctx.audio.cues().contains(&AudioCue::Shatter));
        assert!(ctx.audio.cues().contains(&AudioCue::TauntScare));
        assert!(!ctx.audio.is_running(Voice::UploadHum));
        let toast = ctx.toasts.iter().next().unwrap();
        assert!(taunts::UPLOAD.contains(&toast.text.as_str()));
        assert_eq!(toast.ttl, 2.0 - ctx.dt());
    }

    #[test]
    fn progress_stays_in_bounds() {
        let (mut game, mut ctx) = session(SeededRng::new(99));
        let mut rng = SeededRng::new(5);
        for _ in 0..20_000 {
            let events = if rng.chance(0.002) { up() } else { down() };
            step(&mut game, &mut ctx, events);
            assert!(
                (0.0..=99.99).contains(&game.progress()),
                "progress {}",
                game.progress()
            );
        }
    }

    #[test]
    fn heat_cools_to_zero_when_idle() {
        let (mut game, mut ctx) = session(ScriptedRng::constant(0.99));
        for _ in 0..100 {
            step(&mut game, &mut ctx, vec![]);
        }
        game.heat = 30.0;
        let mut last = game.heat();
        for _ in 0..100 {
            step(&mut game, &mut ctx, vec![]);
            assert!(game.heat() <= last);
            last = game.heat();
        }
        assert_eq!(game.heat(), 0.0);
    }

    #[test]
    fn continuous_hold_overheats_once_then_cools() {
        let (mut game, mut ctx) = session(ScriptedRng::constant(0.99));
        let mut overheat_ticks = Vec::new();

        for tick in 1..=900u32 {
            let events = if tick == 1 { down() } else { vec![] };
            step(&mut game, &mut ctx, events);
            if statuses(&ctx).contains(&Status::Overheat.code()) {
                overheat_ticks.push(tick);
            }
        }
        assert_eq!(overheat_ticks, vec![834]);
        assert!(game.is_overheated());
        assert_eq!(game.status(), Status::Overheat);
        assert!(!ctx.audio.is_running(Voice::UploadHum));

        for tick in 901..=1014u32 {
            step(&mut game, &mut ctx, vec![]);
            if tick < 1014 {
                assert!(game.heat() >= 100.0, "heat frozen during lockout");
            }
        }
        assert_eq!(game.heat(), 0.0);
        assert_eq!(game.status(), Status::Cooled);
        assert!(!game.is_overheated());
    }

    #[test]
    fn press_during_lockout_is_rejected() {
        let (mut game, mut ctx) = session(ScriptedRng::constant(0.99));
        game.heat = 99.95;
        step(&mut game, &mut ctx, down());
        assert!(game.is_overheated());

        step(&mut game, &mut ctx, up());
        step(&mut game, &mut ctx, down());
        assert_eq!(ctx.audio.cues(), &[AudioCue::Error]);
        assert!(game.is_overheated());
    }

    #[test]
    fn overheat_keeps_progress() {
        let (mut game, mut ctx) = session(ScriptedRng::constant(0.99));
        game.heat = 99.95;
        game.progress = 60.0;
        step(&mut game, &mut ctx, down());
        assert!((game.progress() - 60.2).abs() < 1e-4);
        step(&mut game, &mut ctx, up());
        assert!((game.progress() - 60.2).abs() < 1e-4, "forced release does not punish");
    }

    #[test]
    fn fake_completion_rolls_back_on_release() {
        let (mut game, mut ctx) = session(ScriptedRng::constant(0.05));
        step(&mut game, &mut ctx, down());
        game.progress = 95.05;
        step(&mut game, &mut ctx, vec![]);
        assert_eq!(game.status(), Status::Complete);
        let frozen = (game.progress(), game.heat());

        step(&mut game, &mut ctx, vec![]);
        assert_eq!((game.progress(), game.heat()), frozen, "no progress or heat while complete");

        step(&mut game, &mut ctx, up());
        assert_eq!(game.progress(), 80.0);
        assert_eq!(game.status(), Status::RolledBack);
        assert!(ctx.audio.cues().contains(&AudioCue::Error));
    }

    #[test]
    fn packet_loss_after_gap() {
        let (mut game, mut ctx) = session(ScriptedRng::constant(0.0));
        step(&mut game, &mut ctx, down());
        assert_eq!(game.progress(), 0.4, "no loss before twelve seconds");

        game.progress = 50.0;
        game.since_loss = 719;
        step(&mut game, &mut ctx, vec![]);
        assert!((game.progress() - 45.2).abs() < 1e-4);
        assert_eq!(game.status(), Status::PacketLoss);
        assert!(ctx.events.iter().any(|e| e.kind == event_kind::SHAKE && e.a == 0.5));
        assert_eq!(game.since_loss, 0);
    }

    #[test]
    fn teardown_silences_hum() {
        let (mut game, mut ctx) = session(ScriptedRng::constant(0.99));
        step(&mut game, &mut ctx, down());
        game.teardown(&mut ctx);
        ctx.teardown();
        assert!(!ctx.audio.is_running(Voice::UploadHum));
        assert_eq!(game.phase, Phase::Idle);
    }

    #[test]
    fn tuning_shortens_lockout() {
        let (mut game, mut ctx) = session(ScriptedRng::constant(0.99));
        game.configure(r#"{"lockout_secs": 1.0}"#).unwrap();
        game.init(&mut ctx);
        game.heat = 99.95;
        step(&mut game, &mut ctx, down());
        for _ in 0..60 {
            step(&mut game, &mut ctx, vec![]);
        }
        assert_eq!(game.status(), Status::Cooled);
        assert!(game.configure(r#"{"rollback_to": 150}"#).is_err());
    }
}

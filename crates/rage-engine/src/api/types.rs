use bytemuck::{Pod, Zeroable};
use serde::Serialize;

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// Visual style of a toast. Also selects the cue the host plays for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Normal,
    Warning,
    Danger,
    Glitch,
}

/// A named one-shot sound. The host maps the wire code to a synthesized voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Toast(ToastVariant),
    Snap,
    /// Upward crossing of a progress threshold (percent).
    Threshold(u8),
    Error,
    Shatter,
    TauntScare,
    SoftClick,
    Thud,
    WindGust,
    GlassClink,
}

impl AudioCue {
    /// Stable byte code written to the sound buffer.
    pub fn code(self) -> u8 {
        match self {
            AudioCue::Toast(ToastVariant::Normal) => 1,
            AudioCue::Toast(ToastVariant::Warning) => 2,
            AudioCue::Toast(ToastVariant::Danger) => 3,
            AudioCue::Toast(ToastVariant::Glitch) => 4,
            AudioCue::Snap => 5,
            AudioCue::Error => 6,
            AudioCue::Shatter => 7,
            AudioCue::TauntScare => 8,
            AudioCue::SoftClick => 9,
            AudioCue::Thud => 10,
            AudioCue::WindGust => 11,
            AudioCue::GlassClink => 12,
            // 100 + percent keeps thresholds out of the fixed range.
            AudioCue::Threshold(pct) => 100u8.saturating_add(pct),
        }
    }
}

/// A continuous voice the host keeps alive between start and stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Voice {
    Drag,
    UploadHum,
}

/// Command for a continuous voice, forwarded to the host as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum VoiceCommand {
    Start { voice: Voice },
    /// `level` is the controlling progress value (0..100); `unstable` adds wobble.
    Update { voice: Voice, level: f32, unstable: bool },
    Stop { voice: Voice },
}

/// A game event communicated from Rust to the host page.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}

/// Outbound event kinds shared by every game.
pub mod event_kind {
    pub const WIN: f32 = 1.0;
    pub const EXIT: f32 = 2.0;
    /// a = score, b = best
    pub const SCORE: f32 = 3.0;
    /// a = seconds
    pub const SHAKE: f32 = 4.0;
    /// a = seconds
    pub const FLASH: f32 = 5.0;
    /// a = score, b = best
    pub const GAME_OVER: f32 = 6.0;
    /// a = game-specific status code
    pub const STATUS: f32 = 7.0;
}

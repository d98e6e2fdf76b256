//! Audio collaborator.
//!
//! Controllers queue one-shot cues and continuous voice commands here; the
//! host drains them each frame and does the actual synthesis. The bus opens
//! lazily on first use and is closed by [`AudioBus::dispose`], which stops
//! every voice that is still running.

use crate::api::types::{AudioCue, Voice, VoiceCommand};

#[derive(Debug)]
pub struct AudioBus {
    cues: Vec<AudioCue>,
    commands: Vec<VoiceCommand>,
    active: Vec<Voice>,
    available: bool,
    open: bool,
}

impl AudioBus {
    pub fn new() -> Self {
        Self {
            cues: Vec::with_capacity(16),
            commands: Vec::new(),
            active: Vec::new(),
            available: true,
            open: false,
        }
    }

    /// Host reports whether it can produce sound at all.
    /// While unavailable every request is dropped silently.
    pub fn set_available(&mut self, available: bool) {
        if self.available && !available {
            log::warn!("audio unavailable, continuing without sound");
            self.active.clear();
            self.open = false;
        }
        self.available = available;
    }

    fn ensure_open(&mut self) -> bool {
        if !self.available {
            return false;
        }
        if !self.open {
            log::debug!("audio bus opened");
            self.open = true;
        }
        true
    }

    pub fn play(&mut self, cue: AudioCue) {
        if self.ensure_open() {
            self.cues.push(cue);
        }
    }

    /// Start a continuous voice. Starting a running voice is a no-op.
    pub fn start(&mut self, voice: Voice) {
        if !self.ensure_open() || self.active.contains(&voice) {
            return;
        }
        self.active.push(voice);
        self.commands.push(VoiceCommand::Start { voice });
    }

    /// Update a running voice. Ignored when the voice is not running.
    pub fn update(&mut self, voice: Voice, level: f32, unstable: bool) {
        if self.available && self.active.contains(&voice) {
            self.commands.push(VoiceCommand::Update { voice, level, unstable });
        }
    }

    pub fn stop(&mut self, voice: Voice) {
        if let Some(idx) = self.active.iter().position(|v| *v == voice) {
            self.active.swap_remove(idx);
            self.commands.push(VoiceCommand::Stop { voice });
        }
    }

    /// Stop every running voice and close the bus.
    pub fn dispose(&mut self) {
        for voice in std::mem::take(&mut self.active) {
            self.commands.push(VoiceCommand::Stop { voice });
        }
        if self.open {
            log::debug!("audio bus closed");
        }
        self.open = false;
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_running(&self, voice: Voice) -> bool {
        self.active.contains(&voice)
    }

    pub fn cues(&self) -> &[AudioCue] {
        &self.cues
    }

    pub fn commands(&self) -> &[VoiceCommand] {
        &self.commands
    }

    /// Drop the previous frame's cues and commands.
    pub fn clear_frame(&mut self) {
        self.cues.clear();
        self.commands.clear();
    }
}

impl Default for AudioBus {
    fn default() -> Self {
        Self::new()
    }
}

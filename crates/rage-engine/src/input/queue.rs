/// Input event types the engine understands.
/// Generic: no game-specific semantics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at world coordinates (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended at world coordinates (x, y).
    PointerUp { x: f32, y: f32 },
    /// A touch/cursor moved to world coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    KeyDown { key_code: u32 },
    KeyUp { key_code: u32 },
    /// A custom event from the host page (buttons, resize).
    /// `kind` is one of [`custom_kind`]; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// Custom event kinds shared by every game.
pub mod custom_kind {
    /// Retry / manual reset button.
    pub const RESET: u32 = 1;
    /// Leave the game and return to the menu.
    pub const BACK: u32 = 2;
    /// Play area resized: `a` = width, `b` = height.
    pub const RESIZE: u32 = 3;
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Build a queue from a list of events (handy for driving a game directly).
    pub fn from_events(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Whether any pending event is a custom event of `kind`.
    pub fn has_custom(&self, kind: u32) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, InputEvent::Custom { kind: k, .. } if *k == kind))
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::KeyDown { key_code: 32 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn custom_event_lookup() {
        let q = InputQueue::from_events([InputEvent::Custom {
            kind: custom_kind::RESIZE,
            a: 1024.0,
            b: 768.0,
            c: 0.0,
        }]);
        assert!(q.has_custom(custom_kind::RESIZE));
        assert!(!q.has_custom(custom_kind::BACK));
    }
}

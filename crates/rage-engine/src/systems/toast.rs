use serde::Serialize;

use crate::api::types::ToastVariant;
use crate::core::time::TickTimer;

/// A mocking message floating over the play area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub id: u32,
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// Degrees.
    pub rotation: f32,
    pub variant: ToastVariant,
    pub scale: f32,
    /// Seconds left before the toast is pruned.
    pub ttl: f32,
    /// Lifetime requested at push, in seconds.
    #[serde(skip)]
    life: f32,
    /// Ticks survived so far.
    #[serde(skip)]
    age: u32,
}

/// Placement and lifetime for a new toast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToastSpec {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub variant: ToastVariant,
    pub scale: f32,
    pub ttl: f32,
}

impl ToastSpec {
    pub fn at(x: f32, y: f32, variant: ToastVariant) -> Self {
        Self {
            x,
            y,
            rotation: 0.0,
            variant,
            scale: 1.0,
            ttl: 1.5,
        }
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_ttl(mut self, secs: f32) -> Self {
        self.ttl = secs;
        self
    }
}

/// Self-pruning multiset of live toasts.
#[derive(Debug, Default)]
pub struct ToastLayer {
    toasts: Vec<Toast>,
    next_id: u32,
}

impl ToastLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a toast and return its id. Ids increase monotonically per layer.
    pub fn push(&mut self, text: impl Into<String>, spec: ToastSpec) -> u32 {
        self.next_id += 1;
        let id = self.next_id;
        self.toasts.push(Toast {
            id,
            text: text.into(),
            x: spec.x,
            y: spec.y,
            rotation: spec.rotation,
            variant: spec.variant,
            scale: spec.scale,
            ttl: spec.ttl,
            life: spec.ttl,
            age: 0,
        });
        id
    }

    /// Age every toast by one tick of `dt` seconds and drop the expired ones.
    /// Lifetimes are counted in whole ticks so a 1.5 s toast lives exactly
    /// 90 ticks at 60 Hz.
    pub fn tick(&mut self, dt: f32) {
        self.toasts.retain_mut(|toast| {
            toast.age += 1;
            let lifetime = TickTimer::from_secs(toast.life, dt).remaining();
            toast.ttl = (toast.life - toast.age as f32 * dt).max(0.0);
            toast.age < lifetime
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Live toasts as a JSON array for the host renderer.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.toasts).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase() {
        let mut layer = ToastLayer::new();
        let a = layer.push("NOPE", ToastSpec::at(0.0, 0.0, ToastVariant::Danger));
        let b = layer.push("NO", ToastSpec::at(0.0, 0.0, ToastVariant::Normal));
        assert!(b > a);
        assert_eq!(layer.len(), 2);
    }

    #[test]
    fn expired_toasts_are_pruned() {
        let mut layer = ToastLayer::new();
        layer.push("short", ToastSpec::at(0.0, 0.0, ToastVariant::Glitch).with_ttl(0.4));
        layer.push("long", ToastSpec::at(0.0, 0.0, ToastVariant::Normal).with_ttl(1.5));

        for _ in 0..30 {
            layer.tick(1.0 / 60.0);
        }
        let texts: Vec<&str> = layer.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["long"]);

        for _ in 0..60 {
            layer.tick(1.0 / 60.0);
        }
        assert!(layer.is_empty());
    }

    #[test]
    fn toast_expires_on_its_last_tick() {
        let mut layer = ToastLayer::new();
        layer.push("long", ToastSpec::at(0.0, 0.0, ToastVariant::Normal).with_ttl(1.5));

        for _ in 0..89 {
            layer.tick(1.0 / 60.0);
        }
        assert_eq!(layer.len(), 1);
        let left = layer.iter().next().map(|t| t.ttl).unwrap_or_default();
        assert!(left > 0.0 && left < 0.02, "ttl left {}", left);

        layer.tick(1.0 / 60.0);
        assert!(layer.is_empty());
    }

    #[test]
    fn json_omits_tick_bookkeeping() {
        let mut layer = ToastLayer::new();
        layer.push("NO", ToastSpec::at(0.0, 0.0, ToastVariant::Normal));
        let json = layer.to_json();
        assert!(!json.contains("\"age\""), "json was {}", json);
        assert!(!json.contains("\"life\""), "json was {}", json);
    }

    #[test]
    fn json_uses_lowercase_variants() {
        let mut layer = ToastLayer::new();
        layer.push("Whoops!", ToastSpec::at(10.0, 20.0, ToastVariant::Warning).with_rotation(-12.0));
        let json = layer.to_json();
        assert!(json.contains("\"variant\":\"warning\""), "json was {}", json);
        assert!(json.contains("\"text\":\"Whoops!\""), "json was {}", json);
    }
}

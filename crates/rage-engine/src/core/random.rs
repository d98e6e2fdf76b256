//! Injectable random source.
//!
//! Every randomized decision a controller makes (mode selection, event
//! rolls, taunt choice) goes through [`RandomSource`], so tests can swap in
//! a [`ScriptedRng`] and assert exact outcomes.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform draw in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Uniform draw in `[lo, hi)`.
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }

    /// `true` with probability `p` (draw `< p`).
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Uniform draw in `[-span/2, span/2)`.
    fn spread(&mut self, span: f32) -> f32 {
        (self.next_f32() - 0.5) * span
    }

    /// Uniform index in `[0, len)`. Returns 0 for an empty range.
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f32() * len as f32) as usize).min(len - 1)
    }
}

/// Pick one message from a list.
pub fn pick<'a>(rng: &mut dyn RandomSource, items: &[&'a str]) -> &'a str {
    items.get(rng.index(items.len())).copied().unwrap_or("")
}

/// Seedable PCG32 generator used in live sessions.
#[derive(Debug, Clone)]
pub struct SeededRng {
    inner: Pcg32,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRng {
    fn next_f32(&mut self) -> f32 {
        self.inner.random::<f32>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    draws: Vec<f32>,
    cursor: usize,
}

impl ScriptedRng {
    /// Draws are clamped into `[0, 1)`. An empty list behaves like `[0.5]`.
    pub fn new(draws: impl IntoIterator<Item = f32>) -> Self {
        let mut draws: Vec<f32> = draws
            .into_iter()
            .map(|d| d.clamp(0.0, 0.999_999))
            .collect();
        if draws.is_empty() {
            draws.push(0.5);
        }
        Self { draws, cursor: 0 }
    }

    /// Always returns the same draw.
    pub fn constant(draw: f32) -> Self {
        Self::new([draw])
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRng {
    fn next_f32(&mut self) -> f32 {
        let draw = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        draw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_is_deterministic() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        for _ in 0..10 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }

    #[test]
    fn seeded_stays_in_unit_interval() {
        let mut rng = SeededRng::new(7);
        for _ in 0..1000 {
            let d = rng.next_f32();
            assert!((0.0..1.0).contains(&d), "draw out of range: {}", d);
        }
    }

    #[test]
    fn scripted_cycles() {
        let mut rng = ScriptedRng::new([0.1, 0.9]);
        assert_eq!(rng.next_f32(), 0.1);
        assert_eq!(rng.next_f32(), 0.9);
        assert_eq!(rng.next_f32(), 0.1);
        assert_eq!(rng.consumed(), 3);
    }

    #[test]
    fn helpers_map_draws() {
        let mut rng = ScriptedRng::constant(0.25);
        assert!((rng.range(10.0, 30.0) - 15.0).abs() < 1e-5);
        assert!(rng.chance(0.5));
        assert!(!rng.chance(0.2));
        assert!((rng.spread(20.0) + 5.0).abs() < 1e-5);
        assert_eq!(rng.index(4), 1);
    }

    #[test]
    fn index_never_overflows() {
        let mut rng = ScriptedRng::constant(1.0);
        assert_eq!(rng.index(3), 2);
        assert_eq!(rng.index(0), 0);
    }

    #[test]
    fn pick_from_list() {
        let mut rng = ScriptedRng::constant(0.0);
        assert_eq!(pick(&mut rng, &["NOPE", "NO"]), "NOPE");
        assert_eq!(pick(&mut rng, &[]), "");
    }
}

//! Injectable random sources.
//!
//! Every randomized behaviour in the engine (download increments, glitch
//! trials and durations) draws from a [`RandomSource`] handed in by the
//! caller. Production code uses [`SimpleRng`]; tests substitute
//! [`SequenceRng`] to replay a fixed sequence.

/// A source of uniformly distributed values in `[0.0, 1.0)`.
pub trait RandomSource {
    /// Next value in `[0.0, 1.0)`.
    fn next_f32(&mut self) -> f32;

    /// Bernoulli trial: `true` with probability `p`.
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Uniform value in `[lo, hi)`.
    fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// Uniform index in `0..n` (`0` when `n == 0`).
    fn pick(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        ((self.next_f32() * n as f32) as usize).min(n - 1)
    }
}

/// Small xorshift64 generator. Not cryptographic.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a generator from a seed (a zero seed is remapped).
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    /// Seed from the wall clock.
    pub fn from_time() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::new(nanos)
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl RandomSource for SimpleRng {
    fn next_f32(&mut self) -> f32 {
        // Top 24 bits give every representable step of an f32 mantissa.
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}

/// Replays a fixed sequence of values, cycling when exhausted.
///
/// Values are clamped into `[0.0, 1.0)`.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<f32>,
    pos: usize,
}

impl SequenceRng {
    /// Source that replays `values`, cycling when they run out.
    pub fn new(values: Vec<f32>) -> Self {
        Self {
            values,
            pos: 0,
        }
    }

    /// A source that always yields `value`.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRng {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v.clamp(0.0, 1.0 - f32::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sequence_cycles() {
        let mut rng = SequenceRng::new(vec![0.1, 0.2]);
        assert_eq!(rng.next_f32(), 0.1);
        assert_eq!(rng.next_f32(), 0.2);
        assert_eq!(rng.next_f32(), 0.1);
    }

    #[test]
    fn empty_sequence_yields_zero() {
        let mut rng = SequenceRng::new(Vec::<f32>::new());
        assert_eq!(rng.next_f32(), 0.0);
    }

    #[test]
    fn sequence_clamps_out_of_range() {
        let mut rng = SequenceRng::new(vec![-1.0, 2.0]);
        assert_eq!(rng.next_f32(), 0.0);
        assert!(rng.next_f32() < 1.0);
    }

    #[test]
    fn chance_uses_strict_less_than() {
        let mut rng = SequenceRng::constant(0.5);
        assert!(!rng.chance(0.5));
        assert!(rng.chance(0.51));
    }

    #[test]
    fn pick_never_out_of_bounds() {
        let mut rng = SequenceRng::constant(0.999_999);
        assert_eq!(rng.pick(4), 3);
        assert_eq!(rng.pick(0), 0);
    }

    #[test]
    fn zero_seed_is_remapped() {
        let mut rng = SimpleRng::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimpleRng::new(42);
        let mut b = SimpleRng::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }

    proptest! {
        #[test]
        fn simple_rng_stays_in_unit_interval(seed in any::<u64>()) {
            let mut rng = SimpleRng::new(seed);
            for _ in 0..64 {
                let v = rng.next_f32();
                prop_assert!((0.0..1.0).contains(&v));
            }
        }

        #[test]
        fn range_stays_in_bounds(seed in any::<u64>(), lo in 0.0f32..50.0, span in 0.1f32..50.0) {
            let mut rng = SimpleRng::new(seed);
            let v = rng.range_f32(lo, lo + span);
            prop_assert!(v >= lo && v < lo + span + f32::EPSILON * 64.0);
        }
    }
}

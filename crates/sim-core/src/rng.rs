//! Deterministic randomness for the weekly tick.
//!
//! One [`Mulberry32`] stream is built per simulated week from
//! `rng_seed + week`, so every draw within a week is reproducible from the
//! game history alone.

use rand::RngCore;
use rand_core::{impls, Error, SeedableRng};

/// 2^32, the divisor that maps a `u32` draw onto `[0, 1)`.
const U32_SPAN: f64 = 4_294_967_296.0;

/// Mulberry32: a 32-bit state generator with a single additive step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Generator for a given simulated week.
    pub fn for_week(rng_seed: u32, week: u32) -> Self {
        Self::new(rng_seed.wrapping_add(week))
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// Source of uniform doubles in `[0, 1)`.
///
/// Implemented for every [`RngCore`] by scaling a single `u32` draw, which
/// keeps one draw per call regardless of the backing generator.
pub trait UnitSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: RngCore + ?Sized> UnitSource for R {
    fn next_unit(&mut self) -> f64 {
        f64::from(self.next_u32()) / U32_SPAN
    }
}

/// Draw one normally distributed value via Box–Muller.
///
/// Consumes exactly two uniform draws. Both are reflected to `(0, 1]` so the
/// logarithm never sees zero.
pub fn sample_normal<R: UnitSource + ?Sized>(rng: &mut R, mean: f64, stddev: f64) -> f64 {
    let u = 1.0 - rng.next_unit();
    let v = 1.0 - rng.next_unit();
    let z = (-2.0 * u.ln()).sqrt() * (2.0 * std::f64::consts::PI * v).cos();
    mean + z * stddev
}

/// Normal draw clamped to `[lo, hi]`.
pub fn sample_normal_clamped<R: UnitSource + ?Sized>(
    rng: &mut R,
    mean: f64,
    stddev: f64,
    lo: f64,
    hi: f64,
) -> f64 {
    sample_normal(rng, mean, stddev).clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::RngCore;
    use rand_chacha::ChaCha8Rng;

    /// Counts draws so tests can check consumption.
    struct Counting<R> {
        inner: R,
        draws: usize,
    }

    impl<R: UnitSource> UnitSource for Counting<R> {
        fn next_unit(&mut self) -> f64 {
            self.draws += 1;
            self.inner.next_unit()
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Mulberry32::new(777);
        let mut b = Mulberry32::new(777);
        for _ in 0..64 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn known_first_outputs() {
        let mut r = Mulberry32::new(0);
        assert_eq!(r.next_u32(), 1_144_304_738);
        assert_eq!(r.next_u32(), 1_416_247);
        let mut r = Mulberry32::new(778);
        assert_eq!(r.next_u32(), 145_446_678);
        assert_eq!(r.next_u32(), 2_606_593_577);
    }

    #[test]
    fn week_seed_is_offset() {
        assert_eq!(Mulberry32::for_week(777, 1), Mulberry32::new(778));
        assert_eq!(Mulberry32::for_week(u32::MAX, 1), Mulberry32::new(0));
    }

    #[test]
    fn from_seed_matches_new() {
        let a = Mulberry32::from_seed(42u32.to_le_bytes());
        assert_eq!(a, Mulberry32::new(42));
    }

    #[test]
    fn normal_consumes_two_draws() {
        let mut c = Counting { inner: Mulberry32::new(9), draws: 0 };
        let _ = sample_normal(&mut c, 1.0, 0.2);
        assert_eq!(c.draws, 2);
        let _ = sample_normal_clamped(&mut c, 1.0, 0.2, 0.6, 1.6);
        assert_eq!(c.draws, 4);
    }

    #[test]
    fn zero_draw_is_safe() {
        struct Zeros;
        impl UnitSource for Zeros {
            fn next_unit(&mut self) -> f64 {
                0.0
            }
        }
        let x = sample_normal(&mut Zeros, 1.0, 0.2);
        assert!(x.is_finite());
        assert_eq!(x, 1.0);
    }

    #[test]
    fn normal_mean_is_close() {
        let mut r = ChaCha8Rng::seed_from_u64(5);
        let n = 20_000;
        let sum: f64 = (0..n).map(|_| sample_normal(&mut r, 1.0, 0.2)).sum();
        let mean = sum / n as f64;
        assert!((mean - 1.0).abs() < 0.01, "mean was {mean}");
    }

    proptest! {
        #[test]
        fn unit_in_range(seed in any::<u32>()) {
            let mut r = Mulberry32::new(seed);
            for _ in 0..16 {
                let u = r.next_unit();
                prop_assert!((0.0..1.0).contains(&u));
            }
        }

        #[test]
        fn clamped_stays_in_bounds(seed in any::<u32>()) {
            let mut r = Mulberry32::new(seed);
            let x = sample_normal_clamped(&mut r, 1.0, 0.2, 0.6, 1.6);
            prop_assert!((0.6..=1.6).contains(&x));
        }
    }
}

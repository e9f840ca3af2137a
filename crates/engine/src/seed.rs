//! Reproducible per-cell draws.
//!
//! Every cell of every run gets its own draw, derived only from the base
//! seed, the global run index, and the cell index. Which rank runs the cell,
//! and in what order, never affects the value.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use verdant_types::{CellIndex, RunIndex, SeedScheme};

/// Multiplier of the minimal-standard generator.
pub const MULTIPLIER: i64 = 16_807;

/// Modulus of the minimal-standard generator, `2^31 - 1`.
pub const MODULUS: i64 = 2_147_483_647;

/// Recurrence rounds applied per draw.
const ROUNDS: usize = 5;

/// Five rounds of `value = A*seed - M*trunc(A*seed / M)`, scaled by `1/M`.
///
/// The quotient truncates toward zero, so the remainder keeps the sign of
/// the seed: non-negative seeds draw in `[0, 1)` and negative seeds draw in
/// `(-1, 0]`.
pub fn minimal_standard(seed: i32) -> f64 {
    let mut value = i64::from(seed);
    for _ in 0..ROUNDS {
        let product = MULTIPLIER * value;
        let quotient = product / MODULUS;
        value = product - MODULUS * quotient;
    }
    value as f64 / MODULUS as f64
}

/// Integer seed of one cell: `base_seed * run + cell` in wrapping 32-bit
/// arithmetic.
///
/// Each operand is truncated to its low 32 bits first. Configurations using
/// [`SeedScheme::MinimalStandard`] only accept base seeds that fit in `i32`.
pub fn cell_seed(base_seed: i64, run: RunIndex, cell: CellIndex) -> i32 {
    (base_seed as i32)
        .wrapping_mul(run.0 as i32)
        .wrapping_add(cell.0 as i32)
}

/// Source of per-cell draws for grid initialization.
pub trait CellSampler {
    /// Draw for `cell` of `run`, below 1.
    ///
    /// Must be a pure function of its inputs and the sampler's base seed.
    fn draw(&self, run: RunIndex, cell: CellIndex) -> f64;
}

/// The historical generator: [`minimal_standard`] over [`cell_seed`].
#[derive(Debug, Clone, Copy)]
pub struct MinimalStandard {
    base_seed: i64,
}

impl MinimalStandard {
    /// Create a sampler for `base_seed`.
    pub fn new(base_seed: i64) -> Self {
        Self { base_seed }
    }
}

impl CellSampler for MinimalStandard {
    fn draw(&self, run: RunIndex, cell: CellIndex) -> f64 {
        minimal_standard(cell_seed(self.base_seed, run, cell))
    }
}

/// Counter-based draws from a ChaCha8 keystream.
///
/// The key comes from the base seed, the stream id is the run index, and the
/// word position is derived from the cell index, so any cell can be drawn
/// directly without generating the ones before it.
#[derive(Debug, Clone)]
pub struct ChaChaSampler {
    keyed: ChaCha8Rng,
}

impl ChaChaSampler {
    /// Create a sampler for `base_seed`.
    pub fn new(base_seed: i64) -> Self {
        Self {
            keyed: ChaCha8Rng::seed_from_u64(base_seed as u64),
        }
    }
}

impl CellSampler for ChaChaSampler {
    fn draw(&self, run: RunIndex, cell: CellIndex) -> f64 {
        let mut rng = self.keyed.clone();
        rng.set_stream(run.0);
        // An f64 draw consumes two 32-bit words.
        rng.set_word_pos(u128::from(cell.0) * 2);
        rng.gen::<f64>()
    }
}

/// Sampler selected by a [`SeedScheme`].
#[derive(Debug, Clone)]
pub enum Sampler {
    MinimalStandard(MinimalStandard),
    ChaCha(ChaChaSampler),
}

impl Sampler {
    /// Build the sampler a configuration asks for.
    pub fn new(scheme: SeedScheme, base_seed: i64) -> Self {
        match scheme {
            SeedScheme::MinimalStandard => Sampler::MinimalStandard(MinimalStandard::new(base_seed)),
            SeedScheme::ChaCha => Sampler::ChaCha(ChaChaSampler::new(base_seed)),
        }
    }
}

impl CellSampler for Sampler {
    fn draw(&self, run: RunIndex, cell: CellIndex) -> f64 {
        match self {
            Sampler::MinimalStandard(s) => s.draw(run, cell),
            Sampler::ChaCha(s) => s.draw(run, cell),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_answer() {
        // 16807^5 mod (2^31 - 1)
        assert_eq!(minimal_standard(1), 1_144_108_930.0 / MODULUS as f64);
    }

    #[test]
    fn test_negative_seeds_draw_negative() {
        assert_eq!(minimal_standard(0), 0.0);
        assert_eq!(minimal_standard(-1), -minimal_standard(1));

        for seed in [-1, -42, -1_000_003, i32::MIN] {
            let value = minimal_standard(seed);
            assert!(value > -1.0 && value <= 0.0, "seed {seed} gave {value}");
        }
        for seed in [1, 42, i32::MAX - 1, i32::MAX] {
            let value = minimal_standard(seed);
            assert!((0.0..1.0).contains(&value), "seed {seed} gave {value}");
        }
    }

    #[test]
    fn test_cell_seed_formula() {
        assert_eq!(cell_seed(3, RunIndex(4), CellIndex(5)), 17);
        assert_eq!(cell_seed(-3, RunIndex(4), CellIndex(5)), -7);
    }

    #[test]
    fn test_cell_seed_wraps_in_32_bits() {
        // 100000 * 30000 = 3e9 wraps past i32::MAX to 3e9 - 2^32.
        assert_eq!(
            cell_seed(100_000, RunIndex(30_000), CellIndex(0)),
            -1_294_967_296
        );
        assert_eq!(
            cell_seed(i32::MAX as i64, RunIndex(1), CellIndex(1)),
            i32::MIN
        );

        // A wrapped product lands on a negative draw.
        let sampler = MinimalStandard::new(100_000);
        assert_eq!(
            sampler.draw(RunIndex(30_000), CellIndex(7)),
            minimal_standard(-1_294_967_289)
        );
        assert!(sampler.draw(RunIndex(30_000), CellIndex(7)) < 0.0);
    }

    fn assert_sampler_contract(sampler: &impl CellSampler) {
        let forward: Vec<f64> = (1..50)
            .flat_map(|run| (0..50).map(move |cell| (RunIndex(run), CellIndex(cell))))
            .map(|(run, cell)| sampler.draw(run, cell))
            .collect();

        let mut backward: Vec<f64> = (1..50)
            .rev()
            .flat_map(|run| (0..50).rev().map(move |cell| (RunIndex(run), CellIndex(cell))))
            .map(|(run, cell)| sampler.draw(run, cell))
            .collect();
        backward.reverse();

        assert_eq!(forward, backward);
        assert!(forward.iter().all(|v| *v < 1.0));
    }

    #[test]
    fn test_minimal_standard_is_order_independent() {
        assert_sampler_contract(&MinimalStandard::new(12345));
    }

    #[test]
    fn test_chacha_is_order_independent() {
        assert_sampler_contract(&ChaChaSampler::new(12345));
    }

    #[test]
    fn test_chacha_cells_and_runs_differ() {
        let sampler = ChaChaSampler::new(9);
        let a = sampler.draw(RunIndex(1), CellIndex(10));
        assert_ne!(a, sampler.draw(RunIndex(1), CellIndex(11)));
        assert_ne!(a, sampler.draw(RunIndex(2), CellIndex(10)));
        assert_ne!(a, ChaChaSampler::new(10).draw(RunIndex(1), CellIndex(10)));
    }

    #[test]
    fn test_sampler_dispatch() {
        let sampler = Sampler::new(SeedScheme::MinimalStandard, 5);
        assert_eq!(
            sampler.draw(RunIndex(2), CellIndex(7)),
            minimal_standard(17)
        );

        let sampler = Sampler::new(SeedScheme::ChaCha, 5);
        assert_eq!(
            sampler.draw(RunIndex(2), CellIndex(7)),
            ChaChaSampler::new(5).draw(RunIndex(2), CellIndex(7))
        );
    }
}

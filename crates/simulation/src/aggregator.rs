//! Classification and order-independent folding of run results.

use std::iter::Sum;
use std::ops::Add;
use verdant_types::{ResultBatch, RunResult};

/// Category a finished run falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Final vegetation was zero.
    Died,
    /// Still changing when the step budget ran out.
    Unsettled,
    /// Settled into a repeating total with vegetation left.
    Stable,
}

/// Classify one result against the campaign's step budget.
///
/// Death takes precedence: a run that emptied the grid on its last allowed
/// step is `Died`, not `Unsettled`.
pub fn classify(result: &RunResult, max_steps: u32) -> Classification {
    if result.vegetation == 0 {
        Classification::Died
    } else if result.steps >= max_steps {
        Classification::Unsettled
    } else {
        Classification::Stable
    }
}

/// Averages over the stable runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StableAverages {
    pub steps: f64,
    pub vegetation: f64,
}

/// Running counts and integer sums over classified results.
///
/// Forms a commutative monoid under [`AggregateStats::merge`] with
/// `Default` as identity, so batches can be folded in any arrival order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AggregateStats {
    pub died: u64,
    pub unsettled: u64,
    pub stable: u64,
    /// Sum of `steps` over stable runs.
    pub stable_steps: u64,
    /// Sum of final vegetation over stable runs.
    pub stable_vegetation: u64,
}

impl AggregateStats {
    /// Add one result.
    pub fn record(&mut self, result: &RunResult, max_steps: u32) {
        match classify(result, max_steps) {
            Classification::Died => self.died += 1,
            Classification::Unsettled => self.unsettled += 1,
            Classification::Stable => {
                self.stable += 1;
                self.stable_steps += u64::from(result.steps);
                self.stable_vegetation += result.vegetation;
            }
        }
    }

    /// Combine two partial aggregates.
    pub fn merge(self, other: Self) -> Self {
        Self {
            died: self.died + other.died,
            unsettled: self.unsettled + other.unsettled,
            stable: self.stable + other.stable,
            stable_steps: self.stable_steps + other.stable_steps,
            stable_vegetation: self.stable_vegetation + other.stable_vegetation,
        }
    }

    /// Total runs recorded.
    pub fn runs(&self) -> u64 {
        self.died + self.unsettled + self.stable
    }

    /// Mean steps and vegetation of stable runs, if there were any.
    pub fn averages(&self) -> Option<StableAverages> {
        if self.stable == 0 {
            return None;
        }
        let count = self.stable as f64;
        Some(StableAverages {
            steps: self.stable_steps as f64 / count,
            vegetation: self.stable_vegetation as f64 / count,
        })
    }
}

impl Add for AggregateStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.merge(other)
    }
}

impl Sum for AggregateStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Self::merge)
    }
}

/// Folds result batches under one step budget.
#[derive(Debug, Clone, Copy)]
pub struct ResultAggregator {
    max_steps: u32,
}

impl ResultAggregator {
    pub fn new(max_steps: u32) -> Self {
        Self { max_steps }
    }

    /// Aggregate of a single batch.
    pub fn summarize(&self, batch: &ResultBatch) -> AggregateStats {
        let mut stats = AggregateStats::default();
        for result in &batch.results {
            stats.record(result, self.max_steps);
        }
        stats
    }

    /// Fold `batch` into an existing aggregate.
    pub fn fold_batch(&self, stats: AggregateStats, batch: &ResultBatch) -> AggregateStats {
        stats.merge(self.summarize(batch))
    }

    /// Aggregate any number of batches.
    pub fn fold<'a>(&self, batches: impl IntoIterator<Item = &'a ResultBatch>) -> AggregateStats {
        batches
            .into_iter()
            .map(|batch| self.summarize(batch))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use verdant_types::{Rank, RunIndex};

    #[test]
    fn test_classification_precedence() {
        assert_eq!(classify(&RunResult::new(1, 0), 200), Classification::Died);
        assert_eq!(classify(&RunResult::new(200, 0), 200), Classification::Died);
        assert_eq!(
            classify(&RunResult::new(200, 7), 200),
            Classification::Unsettled
        );
        assert_eq!(classify(&RunResult::new(199, 7), 200), Classification::Stable);
    }

    #[test]
    fn test_record_sums_only_stable_runs() {
        let mut stats = AggregateStats::default();
        for result in [
            RunResult::new(15, 120),
            RunResult::new(30, 0),
            RunResult::new(50, 900),
            RunResult::new(25, 80),
        ] {
            stats.record(&result, 50);
        }

        assert_eq!(
            stats,
            AggregateStats {
                died: 1,
                unsettled: 1,
                stable: 2,
                stable_steps: 40,
                stable_vegetation: 200,
            }
        );
        assert_eq!(stats.runs(), 4);
        assert_eq!(
            stats.averages(),
            Some(StableAverages {
                steps: 20.0,
                vegetation: 100.0,
            })
        );
    }

    #[test]
    fn test_no_averages_without_stable_runs() {
        let mut stats = AggregateStats::default();
        stats.record(&RunResult::new(3, 0), 10);
        stats.record(&RunResult::new(10, 5), 10);
        assert_eq!(stats.averages(), None);
        assert_eq!(AggregateStats::default().averages(), None);
    }

    #[test]
    fn test_merge_identity() {
        let stats = AggregateStats {
            died: 3,
            unsettled: 1,
            stable: 4,
            stable_steps: 77,
            stable_vegetation: 1234,
        };
        assert_eq!(stats.merge(AggregateStats::default()), stats);
        assert_eq!(AggregateStats::default() + stats, stats);
    }

    fn random_batches(rng: &mut ChaCha8Rng, count: u32, per_batch: u64) -> Vec<ResultBatch> {
        (0..count)
            .map(|r| {
                let mut batch =
                    ResultBatch::new(Rank(r), RunIndex(u64::from(r) * per_batch + 1));
                for _ in 0..per_batch {
                    let steps = rng.gen_range(1..=40);
                    let vegetation = if rng.gen_bool(0.3) {
                        0
                    } else {
                        rng.gen_range(1..=500)
                    };
                    batch.push(RunResult::new(steps, vegetation));
                }
                batch
            })
            .collect()
    }

    #[test]
    fn test_fold_is_order_independent() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let aggregator = ResultAggregator::new(40);
        let mut batches = random_batches(&mut rng, 8, 25);
        let expected = aggregator.fold(&batches);
        assert_eq!(expected.runs(), 200);

        for _ in 0..50 {
            batches.shuffle(&mut rng);
            assert_eq!(aggregator.fold(&batches), expected);

            let incremental = batches
                .iter()
                .rev()
                .fold(AggregateStats::default(), |stats, batch| {
                    aggregator.fold_batch(stats, batch)
                });
            assert_eq!(incremental, expected);
        }
    }

    #[test]
    fn test_fold_matches_flat_recording() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let aggregator = ResultAggregator::new(40);
        let batches = random_batches(&mut rng, 3, 10);

        let mut flat = AggregateStats::default();
        for result in batches.iter().flat_map(|b| b.results.iter()) {
            flat.record(result, 40);
        }
        assert_eq!(aggregator.fold(&batches), flat);
    }
}

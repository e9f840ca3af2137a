//! Single-run step loop with its stability policy.

use crate::grid::Grid;
use crate::seed::CellSampler;
use crate::EngineError;
use tracing::trace;
use verdant_types::{RunConfig, RunIndex, RunResult};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunOutcome {
    /// The vegetation total kept revisiting recent values for the configured
    /// number of steps.
    Converged,

    /// The step budget ran out first.
    StepLimitReached,

    /// No vegetation left.
    Died,
}

/// The last three census totals, most recent first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct VegetationHistory {
    recent: [Option<u64>; 3],
}

impl VegetationHistory {
    fn contains(&self, total: u64) -> bool {
        self.recent.contains(&Some(total))
    }

    fn push(&mut self, total: u64) {
        self.recent.rotate_right(1);
        self.recent[0] = Some(total);
    }
}

/// One run of the automaton, advanced census by census.
///
/// Each [`Simulation::tick`] takes a census of the grid and either ends the
/// run or advances one generation. A run ends when:
///
/// - the census is zero ([`RunOutcome::Died`]),
/// - the census matched one of the previous three for `max_unchanged`
///   consecutive steps ([`RunOutcome::Converged`]),
/// - advancing brought the step count to the budget
///   ([`RunOutcome::StepLimitReached`]). The reported total is then the
///   census taken before that last generation; the final grid is never
///   counted.
#[derive(Debug, Clone)]
pub struct Simulation {
    grid: Grid,
    max_steps: u32,
    max_unchanged: u32,
    steps: u32,
    unchanged: u32,
    history: VegetationHistory,
    vegetation: u64,
    outcome: Option<RunOutcome>,
}

impl Simulation {
    /// Seed the grid of `run` and prepare to step it.
    pub fn new(
        config: &RunConfig,
        run: RunIndex,
        sampler: &impl CellSampler,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let grid = Grid::seeded(config, run, sampler);
        Ok(Self::from_grid(grid, config.max_steps, config.max_unchanged))
    }

    /// Step an existing grid.
    pub fn from_grid(grid: Grid, max_steps: u32, max_unchanged: u32) -> Self {
        Self {
            grid,
            max_steps,
            max_unchanged,
            steps: 1,
            unchanged: 0,
            history: VegetationHistory::default(),
            vegetation: 0,
            outcome: None,
        }
    }

    /// Current grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Steps taken so far, counting the initial census as step 1.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Total at the most recent census.
    pub fn vegetation(&self) -> u64 {
        self.vegetation
    }

    /// Terminal outcome, once reached.
    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    /// Take a census and either finish or advance one generation.
    ///
    /// Returns the outcome once the run has ended; further calls return the
    /// same outcome without touching the grid.
    pub fn tick(&mut self) -> Option<RunOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }

        let total = self.grid.vegetation();
        self.vegetation = total;
        trace!(step = self.steps, vegetation = total, "census");

        if total == 0 {
            return self.finish(RunOutcome::Died);
        }
        // Only reachable with a budget of one step.
        if self.steps >= self.max_steps {
            return self.finish(RunOutcome::StepLimitReached);
        }

        if self.history.contains(total) {
            self.unchanged += 1;
        } else {
            self.unchanged = 0;
        }
        self.history.push(total);
        if self.unchanged >= self.max_unchanged {
            return self.finish(RunOutcome::Converged);
        }

        self.grid.advance();
        self.steps += 1;
        if self.steps >= self.max_steps {
            return self.finish(RunOutcome::StepLimitReached);
        }
        None
    }

    fn finish(&mut self, outcome: RunOutcome) -> Option<RunOutcome> {
        self.outcome = Some(outcome);
        self.outcome
    }

    /// Tick until the run ends.
    pub fn run_to_end(mut self) -> RunReport {
        let outcome = loop {
            if let Some(outcome) = self.tick() {
                break outcome;
            }
        };
        RunReport {
            outcome,
            result: RunResult::new(self.steps, self.vegetation),
        }
    }
}

/// Terminal outcome and result of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// How the run ended.
    pub outcome: RunOutcome,

    /// Steps and final vegetation.
    pub result: RunResult,
}

/// Execute `run` from a fresh grid to its end.
///
/// The result is a pure function of the configuration, the run index and
/// the sampler's seed.
pub fn run_once(
    config: &RunConfig,
    run: RunIndex,
    sampler: &impl CellSampler,
) -> Result<RunReport, EngineError> {
    Ok(Simulation::new(config, run, sampler)?.run_to_end())
}

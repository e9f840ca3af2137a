//! Human-readable campaign report.

use std::fmt;
use verdant_simulation::CampaignSummary;

/// Final report of a campaign, printed by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignReport {
    summary: CampaignSummary,
}

impl CampaignReport {
    pub fn new(summary: CampaignSummary) -> Self {
        Self { summary }
    }

    /// Underlying summary.
    pub fn summary(&self) -> &CampaignSummary {
        &self.summary
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        print!("{self}");
    }
}

impl fmt::Display for CampaignReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = &self.summary;
        let config = &summary.config;

        writeln!(
            f,
            "Grid {}x{}, probability {}, seed {} ({})",
            config.width, config.height, config.probability, config.base_seed, config.seed_scheme
        )?;
        writeln!(
            f,
            "Runs: {} requested, {} scheduled, {} skipped",
            summary.requested(),
            summary.scheduled(),
            summary.skipped()
        )?;
        if summary.skipped() > 0 {
            writeln!(
                f,
                "Warning: {} runs skipped; {} is not a multiple of {} workers",
                summary.skipped(),
                summary.requested(),
                summary.partition.workers()
            )?;
        }

        writeln!(f, "Outcomes over {} requested runs:", summary.requested())?;
        writeln!(f, "Died:      {:6.2}%", summary.died_percent())?;
        writeln!(f, "Unsettled: {:6.2}%", summary.unsettled_percent())?;
        writeln!(f, "Stable:    {:6.2}%", summary.stable_percent())?;

        match summary.stable_averages() {
            Some(averages) => {
                writeln!(f, "Average steps (stable):      {:.2}", averages.steps)?;
                writeln!(f, "Average vegetation (stable): {:.2}", averages.vegetation)
            }
            None => writeln!(f, "No stable runs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdant_simulation::AggregateStats;
    use verdant_types::{Partition, RunConfig};

    fn report(runs: u64, workers: u32, stats: AggregateStats) -> String {
        CampaignReport::new(CampaignSummary {
            config: RunConfig::new(4, 3, 0.5, runs, 9),
            partition: Partition::new(runs, workers).unwrap(),
            stats,
        })
        .to_string()
    }

    #[test]
    fn test_report_lists_percentages_and_averages() {
        let text = report(
            4,
            2,
            AggregateStats {
                died: 1,
                unsettled: 1,
                stable: 2,
                stable_steps: 25,
                stable_vegetation: 61,
            },
        );

        assert!(text.contains("Grid 4x3, probability 0.5, seed 9 (minimal-standard)"));
        assert!(text.contains("Runs: 4 requested, 4 scheduled, 0 skipped"));
        assert!(!text.contains("Warning"));
        assert!(text.contains("Died:       25.00%"));
        assert!(text.contains("Stable:     50.00%"));
        assert!(text.contains("Average steps (stable):      12.50"));
        assert!(text.contains("Average vegetation (stable): 30.50"));
    }

    #[test]
    fn test_report_warns_about_skipped_runs() {
        let text = report(
            10,
            4,
            AggregateStats {
                died: 8,
                ..Default::default()
            },
        );

        assert!(text.contains("Runs: 10 requested, 8 scheduled, 2 skipped"));
        assert!(text.contains("Warning: 2 runs skipped; 10 is not a multiple of 4 workers"));
        assert!(text.contains("Outcomes over 10 requested runs:"));
        assert!(text.contains("Died:       80.00%"));
        assert!(text.contains("Stable:      0.00%"));
        assert!(text.contains("No stable runs"));
    }
}

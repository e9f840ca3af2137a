//! Campaign driver: broadcast, partition, execute, collect.

use crate::aggregator::{AggregateStats, ResultAggregator, StableAverages};
use crate::broadcast::broadcast_config;
use crate::{CampaignError, LocalNetwork};
use std::thread;
use tracing::{debug, info, info_span, warn};
use verdant_core::{MessageTransport, Transport, TransportError};
use verdant_engine::{run_once, Sampler};
use verdant_messages::ResultBatchMessage;
use verdant_types::{Partition, PartitionError, Rank, ResultBatch, RunConfig, RunRange};

/// Everything the coordinator knows once all batches are in.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignSummary {
    /// Configuration that was broadcast.
    pub config: RunConfig,

    /// How runs were split across the group.
    pub partition: Partition,

    /// Aggregate over every scheduled run.
    pub stats: AggregateStats,
}

impl CampaignSummary {
    /// Runs the configuration asked for.
    pub fn requested(&self) -> u64 {
        self.partition.total_runs()
    }

    /// Runs actually executed.
    pub fn scheduled(&self) -> u64 {
        self.partition.scheduled()
    }

    /// Runs dropped by the even split.
    pub fn skipped(&self) -> u64 {
        self.partition.skipped()
    }

    /// Share of the requested runs. Skipped runs count in the denominator,
    /// so the three shares sum to less than 100% when any were skipped.
    fn percent(&self, count: u64) -> f64 {
        match self.requested() {
            0 => 0.0,
            requested => count as f64 * 100.0 / requested as f64,
        }
    }

    pub fn died_percent(&self) -> f64 {
        self.percent(self.stats.died)
    }

    pub fn unsettled_percent(&self) -> f64 {
        self.percent(self.stats.unsettled)
    }

    pub fn stable_percent(&self) -> f64 {
        self.percent(self.stats.stable)
    }

    /// Averages over stable runs, `None` if no run was stable.
    pub fn stable_averages(&self) -> Option<StableAverages> {
        self.stats.averages()
    }
}

/// Run every index in `range` and collect the results in order.
pub fn execute_range(
    config: &RunConfig,
    rank: Rank,
    range: RunRange,
) -> Result<ResultBatch, CampaignError> {
    let sampler = Sampler::new(config.seed_scheme, config.base_seed);
    let mut batch = ResultBatch::with_capacity(rank, range.first, range.len as usize);

    for run in range.iter() {
        let report = run_once(config, run, &sampler)?;
        info!(
            rank = %rank,
            run = run.get(),
            steps = report.result.steps,
            vegetation = report.result.vegetation,
            outcome = ?report.outcome,
            "Run finished"
        );
        batch.push(report.result);
    }
    Ok(batch)
}

fn partition_for<T: MessageTransport>(
    transport: &T,
    config: &RunConfig,
) -> Result<Partition, CampaignError> {
    let partition = Partition::new(config.total_runs, transport.size() as u32)?;
    if partition.skipped() > 0 && transport.rank().is_coordinator() {
        warn!(
            requested = partition.total_runs(),
            scheduled = partition.scheduled(),
            skipped = partition.skipped(),
            workers = partition.workers(),
            "Run count is not a multiple of the worker count; remainder is skipped"
        );
    }
    Ok(partition)
}

/// Check a received batch against the sender's partition range.
fn check_batch(
    partition: &Partition,
    seen: &[bool],
    sender: Rank,
    batch: &ResultBatch,
) -> Result<(), CampaignError> {
    if sender.is_coordinator() || sender.index() >= seen.len() {
        return Err(CampaignError::UnexpectedBatch { sender });
    }
    if seen[sender.index()] {
        return Err(CampaignError::DuplicateBatch { sender });
    }
    if batch.rank != sender {
        return Err(CampaignError::RankMismatch {
            sender,
            claimed: batch.rank,
        });
    }

    let expected = partition.range_for(sender)?;
    if batch.first_run != expected.first || batch.len() as u64 != expected.len {
        return Err(CampaignError::BatchMismatch {
            sender,
            first: batch.first_run,
            len: batch.len(),
            expected_first: expected.first,
            expected_len: expected.len,
        });
    }
    Ok(())
}

/// Coordinator side of a campaign.
///
/// Broadcasts `config`, runs the coordinator's own share, then folds one
/// batch from every other rank in whatever order they arrive.
pub fn run_coordinator<T: MessageTransport>(
    transport: &mut T,
    config: RunConfig,
) -> Result<CampaignSummary, CampaignError> {
    let config = broadcast_config(transport, Some(config))?;
    let partition = partition_for(transport, &config)?;
    let aggregator = ResultAggregator::new(config.max_steps);

    let own = execute_range(&config, transport.rank(), partition.range_for(transport.rank())?)?;
    let mut stats = aggregator.summarize(&own);

    let mut seen = vec![false; transport.size()];
    seen[transport.rank().index()] = true;
    let mut outstanding = transport.size() - 1;
    while outstanding > 0 {
        let (sender, message): (Rank, ResultBatchMessage) = match transport.recv_any_message() {
            Ok(received) => received,
            // A worker exits once its batch is sent.
            Err(TransportError::Disconnected { peer })
                if seen.get(peer.index()).copied().unwrap_or(false) =>
            {
                continue
            }
            Err(e) => return Err(e.into()),
        };
        let batch = message.into_batch();
        check_batch(&partition, &seen, sender, &batch)?;
        seen[sender.index()] = true;
        outstanding -= 1;

        debug!(sender = %sender, runs = batch.len(), "Batch received");
        stats = aggregator.fold_batch(stats, &batch);
    }

    info!(
        scheduled = stats.runs(),
        died = stats.died,
        unsettled = stats.unsettled,
        stable = stats.stable,
        "Campaign complete"
    );
    Ok(CampaignSummary {
        config,
        partition,
        stats,
    })
}

/// Worker side of a campaign: receive, run, report.
pub fn run_worker<T: MessageTransport>(transport: &mut T) -> Result<(), CampaignError> {
    let config = broadcast_config(transport, None)?;
    let partition = partition_for(transport, &config)?;
    let batch = execute_range(&config, transport.rank(), partition.range_for(transport.rank())?)?;
    transport.send_message(Rank::COORDINATOR, &ResultBatchMessage::new(batch))?;
    Ok(())
}

/// Run whichever side of the campaign this rank plays.
///
/// Returns the summary on the coordinator and `None` on workers.
pub fn run_rank<T: MessageTransport>(
    transport: &mut T,
    config: Option<RunConfig>,
) -> Result<Option<CampaignSummary>, CampaignError> {
    if transport.rank().is_coordinator() {
        let config = config.ok_or(CampaignError::MissingConfig)?;
        run_coordinator(transport, config).map(Some)
    } else {
        run_worker(transport).map(|()| None)
    }
}

/// Run a whole campaign on `workers` in-process ranks, one thread each.
///
/// Every rank, the coordinator included, owns its endpoint on its own
/// thread, so a rank that exits for any reason disconnects from its peers
/// instead of leaving them blocked.
pub fn run_local(config: RunConfig, workers: u32) -> Result<CampaignSummary, CampaignError> {
    config.validate()?;
    Partition::new(config.total_runs, workers)?;

    let mut endpoints = LocalNetwork::new(workers as usize).connect().into_iter();
    let Some(mut coordinator) = endpoints.next() else {
        return Err(PartitionError::NoWorkers.into());
    };

    thread::scope(|scope| {
        let coordinator_handle = scope.spawn(move || {
            let _span = info_span!("rank", rank = %Rank::COORDINATOR).entered();
            run_coordinator(&mut coordinator, config)
        });

        let worker_handles: Vec<_> = endpoints
            .map(|mut endpoint| {
                let rank = endpoint.rank();
                let handle = scope.spawn(move || {
                    let _span = info_span!("rank", rank = %rank).entered();
                    run_worker(&mut endpoint)
                });
                (rank, handle)
            })
            .collect();

        let coordinator = coordinator_handle.join();
        let workers: Vec<_> = worker_handles
            .into_iter()
            .map(|(rank, handle)| (rank, handle.join()))
            .collect();

        let coordinator = coordinator.map_err(|_| CampaignError::RankPanicked {
            rank: Rank::COORDINATOR,
        })?;
        let mut worker_failure = None;
        for (rank, joined) in workers {
            match joined {
                Err(_) => return Err(CampaignError::RankPanicked { rank }),
                Ok(Err(e)) if worker_failure.is_none() => worker_failure = Some(e),
                Ok(_) => {}
            }
        }

        let summary = coordinator?;
        match worker_failure {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    })
}

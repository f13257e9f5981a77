use crate::runner::{run_match, MatchMetrics, MatchSettings};
use crate::util::write_json;
use anyhow::{anyhow, Context, Result};
use fighter_core::AgentConfig;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub seeds: Vec<u64>,
    pub rounds: u32,
    pub round_frames: u32,
    pub opponent_aggression: f64,
    /// Also play every seed from the player two side.
    pub both_sides: bool,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
    pub agent: AgentConfig,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct BenchmarkAggregate {
    pub matches: usize,
    pub rounds: u32,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub avg_damage_dealt: f64,
    pub avg_damage_taken: f64,
    pub predictive_share: f64,
    pub avg_rollouts_per_match: f64,
    pub avg_observations_per_match: f64,
    pub history_resets: u32,
}

impl BenchmarkAggregate {
    pub fn from_runs(runs: &[MatchMetrics]) -> Self {
        if runs.is_empty() {
            return Self::default();
        }
        let matches = runs.len();
        let rounds: u32 = runs.iter().map(|r| r.rounds.len() as u32).sum();
        let won: u32 = runs.iter().map(|r| r.rounds_won).sum();
        let drawn: u32 = runs.iter().map(|r| r.rounds_drawn).sum();
        let commands: u32 = runs.iter().map(|r| r.decisions.commands()).sum();
        let predictive: u32 = runs.iter().map(|r| r.decisions.predictive).sum();
        let per_match = |total: f64| total / matches as f64;
        let per_round = |count: u32| {
            if rounds == 0 {
                0.0
            } else {
                f64::from(count) / f64::from(rounds)
            }
        };

        Self {
            matches,
            rounds,
            win_rate: per_round(won),
            draw_rate: per_round(drawn),
            avg_damage_dealt: per_match(runs.iter().map(|r| f64::from(r.damage_dealt)).sum()),
            avg_damage_taken: per_match(runs.iter().map(|r| f64::from(r.damage_taken)).sum()),
            predictive_share: if commands == 0 {
                0.0
            } else {
                f64::from(predictive) / f64::from(commands)
            },
            avg_rollouts_per_match: per_match(runs.iter().map(|r| r.rollouts as f64).sum()),
            avg_observations_per_match: per_match(
                runs.iter().map(|r| f64::from(r.observations)).sum(),
            ),
            history_resets: runs.iter().map(|r| r.history_resets).sum(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub rounds: u32,
    pub round_frames: u32,
    pub jobs: Option<usize>,
    pub seeds: Vec<u64>,
    pub agent: AgentConfig,
    pub aggregate: BenchmarkAggregate,
    pub runs: Vec<MatchMetrics>,
}

/// Plays every configured match in parallel and writes `summary.json` to the output directory.
pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
        }
    }
    config
        .agent
        .validate()
        .map_err(|err| anyhow!("invalid agent config: {err}"))?;
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let sides: &[bool] = if config.both_sides {
        &[true, false]
    } else {
        &[true]
    };
    let matches: Vec<MatchSettings> = config
        .seeds
        .iter()
        .flat_map(|seed| {
            sides.iter().map(move |agent_is_p1| MatchSettings {
                seed: *seed,
                rounds: config.rounds,
                round_frames: config.round_frames,
                agent_is_p1: *agent_is_p1,
                opponent_aggression: config.opponent_aggression,
                keep_trace: false,
            })
        })
        .collect();

    let run_one = |settings: &MatchSettings| -> Result<MatchMetrics> {
        run_match(settings, &config.agent)
            .map(|artifact| artifact.metrics)
            .with_context(|| {
                format!(
                    "benchmark match failed for seed={:#x} p1={}",
                    settings.seed, settings.agent_is_p1
                )
            })
    };

    let results: Vec<Result<MatchMetrics>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| matches.par_iter().map(run_one).collect())
    } else {
        matches.par_iter().map(run_one).collect()
    };
    let runs = results.into_iter().collect::<Result<Vec<_>>>()?;

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        rounds: config.rounds,
        round_frames: config.round_frames,
        jobs: config.jobs,
        seeds: config.seeds.clone(),
        agent: config.agent.clone(),
        aggregate: BenchmarkAggregate::from_runs(&runs),
        runs,
    };
    write_json(&config.out_dir.join("summary.json"), &report)?;
    tracing::info!(
        matches = report.aggregate.matches,
        win_rate = report.aggregate.win_rate,
        out_dir = %config.out_dir.display(),
        "benchmark complete"
    );
    Ok(report)
}

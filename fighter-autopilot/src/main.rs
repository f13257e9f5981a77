use anyhow::Result;
use clap::{Parser, Subcommand};
use fighter_autopilot::arena::{DEFAULT_ROUNDS, DEFAULT_ROUND_FRAMES};
use fighter_autopilot::benchmark::{run_benchmark, BenchmarkConfig};
use fighter_autopilot::runner::{run_match, write_artifact, MatchSettings};
use fighter_autopilot::util::{load_agent_config, parse_seed, parse_seed_list, seed_to_hex};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(name = "fighter-autopilot")]
#[command(about = "Headless arena for the k-NN fighting agent: single matches and seed sweeps")]
struct Cli {
    /// JSON agent config; FIGHTER_* environment variables are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one match against the scripted opponent
    Run {
        #[arg(long, default_value = "0x1")]
        seed: String,
        #[arg(long, default_value_t = DEFAULT_ROUNDS)]
        rounds: u32,
        #[arg(long, default_value_t = DEFAULT_ROUND_FRAMES)]
        round_frames: u32,
        /// Seat the agent as player two
        #[arg(long, default_value_t = false)]
        player_two: bool,
        #[arg(long, default_value_t = 0.35)]
        aggression: f64,
        /// Write the match artifact, including the decision trace, as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Play many seeded matches in parallel and write summary.json
    Benchmark {
        /// Comma separated seeds or ranges, e.g. `1,2,10..20`
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long, default_value_t = 8)]
        seed_count: u64,
        #[arg(long, default_value_t = DEFAULT_ROUNDS)]
        rounds: u32,
        #[arg(long, default_value_t = DEFAULT_ROUND_FRAMES)]
        round_frames: u32,
        #[arg(long, default_value_t = 0.35)]
        aggression: f64,
        #[arg(long, default_value_t = false)]
        both_sides: bool,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Print the effective agent config as JSON
    PrintConfig,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let Cli { config, command } = Cli::parse();
    let agent = load_agent_config(config.as_deref())?;

    match command {
        Commands::Run {
            seed,
            rounds,
            round_frames,
            player_two,
            aggression,
            output,
        } => {
            let settings = MatchSettings {
                seed: parse_seed(&seed)?,
                rounds,
                round_frames,
                agent_is_p1: !player_two,
                opponent_aggression: aggression,
                keep_trace: output.is_some(),
            };
            let artifact = run_match(&settings, &agent)?;
            let metrics = &artifact.metrics;

            println!("seed={}", metrics.seed_hex);
            println!("side={}", if metrics.agent_is_p1 { "p1" } else { "p2" });
            println!("frames={}", metrics.frame_count);
            println!(
                "rounds=won:{} lost:{} drawn:{}",
                metrics.rounds_won, metrics.rounds_lost, metrics.rounds_drawn
            );
            println!("damage_dealt={}", metrics.damage_dealt);
            println!("damage_taken={}", metrics.damage_taken);
            println!("predictive={}", metrics.decisions.predictive);
            println!("fallback={}", metrics.decisions.fallback);
            println!(
                "insufficient_evidence={}",
                metrics.decisions.insufficient_evidence
            );
            println!("rollouts={}", metrics.rollouts);
            println!("observations={}", metrics.observations);
            println!("history_resets={}", metrics.history_resets);
            if let Some(path) = output {
                write_artifact(&path, &artifact)?;
                println!("output={}", path.display());
            }
        }
        Commands::Benchmark {
            seeds,
            seed_count,
            rounds,
            round_frames,
            aggression,
            both_sides,
            out_dir,
            jobs,
        } => {
            let seeds = match seeds.as_deref() {
                Some(list) => parse_seed_list(list)?,
                None => (1..=seed_count).collect(),
            };
            let out_dir = out_dir.unwrap_or_else(|| {
                PathBuf::from(format!("benchmarks/knn-{}", timestamp_suffix()))
            });

            let report = run_benchmark(BenchmarkConfig {
                seeds,
                rounds,
                round_frames,
                opponent_aggression: aggression,
                both_sides,
                out_dir: out_dir.clone(),
                jobs,
                agent,
            })?;

            println!("matches={}", report.aggregate.matches);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("win_rate={:.3}", report.aggregate.win_rate);
            println!("draw_rate={:.3}", report.aggregate.draw_rate);
            println!("avg_damage_dealt={:.1}", report.aggregate.avg_damage_dealt);
            println!("avg_damage_taken={:.1}", report.aggregate.avg_damage_taken);
            println!("predictive_share={:.3}", report.aggregate.predictive_share);
            println!("out_dir={}", out_dir.display());
            for run in report.runs.iter().take(10) {
                println!(
                    "  {} {} won={} lost={} dealt={} taken={}",
                    seed_to_hex(run.seed),
                    if run.agent_is_p1 { "p1" } else { "p2" },
                    run.rounds_won,
                    run.rounds_lost,
                    run.damage_dealt,
                    run.damage_taken
                );
            }
        }
        Commands::PrintConfig => {
            println!("{}", serde_json::to_string_pretty(&agent)?);
        }
    }

    Ok(())
}

fn timestamp_suffix() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{now}")
}

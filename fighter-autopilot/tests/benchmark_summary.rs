use anyhow::Result;
use fighter_autopilot::benchmark::{run_benchmark, BenchmarkConfig};
use fighter_core::AgentConfig;
use std::fs;
use std::path::Path;

fn sweep(out_dir: &Path, seeds: Vec<u64>, jobs: Option<usize>) -> BenchmarkConfig {
    BenchmarkConfig {
        seeds,
        rounds: 1,
        round_frames: 240,
        opponent_aggression: 0.5,
        both_sides: true,
        out_dir: out_dir.to_path_buf(),
        jobs,
        agent: AgentConfig::default(),
    }
}

#[test]
fn benchmark_writes_summary_for_every_match() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let out_dir = dir.path().join("sweep");
    let report = run_benchmark(sweep(&out_dir, vec![1, 2], Some(2)))?;

    assert_eq!(report.aggregate.matches, 4);
    assert_eq!(report.aggregate.rounds, 4);
    assert!((0.0..=1.0).contains(&report.aggregate.win_rate));
    assert_eq!(report.runs.iter().filter(|run| run.agent_is_p1).count(), 2);

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("summary.json"))?)?;
    assert_eq!(summary["aggregate"]["matches"], 4);
    assert_eq!(summary["runs"].as_array().map(Vec::len), Some(4));
    assert_eq!(summary["jobs"], 2);
    Ok(())
}

#[test]
fn thread_count_does_not_change_results() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let serial = run_benchmark(sweep(&dir.path().join("one"), vec![3, 4], Some(1)))?;
    let parallel = run_benchmark(sweep(&dir.path().join("auto"), vec![3, 4], None))?;
    assert_eq!(
        serde_json::to_value(&serial.runs)?,
        serde_json::to_value(&parallel.runs)?
    );
    Ok(())
}

#[test]
fn benchmark_rejects_bad_input() -> Result<()> {
    let dir = tempfile::tempdir()?;
    assert!(run_benchmark(sweep(dir.path(), Vec::new(), None)).is_err());
    assert!(run_benchmark(sweep(dir.path(), vec![1], Some(0))).is_err());

    let mut config = sweep(dir.path(), vec![1], None);
    config.agent.max_k = 0;
    assert!(run_benchmark(config).is_err());
    Ok(())
}

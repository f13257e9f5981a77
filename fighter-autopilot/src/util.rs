use anyhow::{anyhow, Context, Result};
use fighter_core::AgentConfig;
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn parse_seed(seed: &str) -> Result<u64> {
    let s = seed.trim();
    if s.is_empty() {
        return Err(anyhow!("empty seed"));
    }
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).with_context(|| format!("invalid hex seed: {s}")),
        None => s
            .parse::<u64>()
            .with_context(|| format!("invalid decimal seed: {s}")),
    }
}

pub fn seed_to_hex(seed: u64) -> String {
    format!("0x{seed:016x}")
}

/// Comma separated seeds; `a..b` expands to the half-open range.
pub fn parse_seed_list(input: &str) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.split_once("..") {
            Some((start, end)) => {
                let (start, end) = (parse_seed(start)?, parse_seed(end)?);
                if start >= end {
                    return Err(anyhow!("empty seed range {token}"));
                }
                seeds.extend(start..end);
            }
            None => seeds.push(parse_seed(token)?),
        }
    }
    if seeds.is_empty() {
        return Err(anyhow!("no seeds parsed from --seeds"));
    }
    Ok(seeds)
}

/// Reads a JSON config when a path is given, otherwise defaults overlaid with
/// `FIGHTER_*` environment variables. Either way the result is validated.
pub fn load_agent_config(path: Option<&Path>) -> Result<AgentConfig> {
    let config = match path {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("failed reading config {}", path.display()))?;
            serde_json::from_str::<AgentConfig>(&data)
                .with_context(|| format!("failed parsing config {}", path.display()))?
        }
        None => AgentConfig::from_env(),
    };
    config
        .validate()
        .map_err(|err| anyhow!("invalid agent config: {err}"))?;
    Ok(config)
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value).context("failed serializing json")?;
    fs::write(path, json).with_context(|| format!("failed writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_parse_in_both_radixes() {
        assert_eq!(parse_seed("0x10").ok(), Some(16));
        assert_eq!(parse_seed(" 42 ").ok(), Some(42));
        assert!(parse_seed("").is_err());
        assert!(parse_seed("0xzz").is_err());
        assert_eq!(seed_to_hex(255), "0x00000000000000ff");
    }

    #[test]
    fn seed_lists_expand_ranges() {
        assert_eq!(parse_seed_list("1, 5..8,0x20").ok(), Some(vec![1, 5, 6, 7, 32]));
        assert!(parse_seed_list(" , ").is_err());
        assert!(parse_seed_list("4..4").is_err());
    }
}

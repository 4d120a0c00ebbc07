//! Configuration loading from loupe.toml
//!
//! LoupeBench configuration can be specified in a `loupe.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use loupebench_chain::DEFAULT_BLOCK_GAS_LIMIT;
use loupebench_core::{DEFAULT_MAX_BATCH_SIZE, Scenario};
use loupebench_report::DEFAULT_REPORT_PATH;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Name of the configuration file looked up by [`LoupeConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "loupe.toml";

/// LoupeBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoupeConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for scenario execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Registration entries per `diamondCut` call
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Loupe function measured for each candidate (e.g., "facets()")
    #[serde(default = "default_entrypoint")]
    pub entrypoint: String,
    /// Simulated chain block gas limit
    #[serde(default = "default_block_gas_limit")]
    pub block_gas_limit: u64,
    /// Simulated confirmation latency (e.g., "0ms", "1s")
    #[serde(default = "default_block_time")]
    pub block_time: String,
    /// Scenario list override; compiled-in list when absent
    #[serde(default)]
    pub scenarios: Option<Vec<Scenario>>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_batch_size: default_max_batch_size(),
            entrypoint: default_entrypoint(),
            block_gas_limit: default_block_gas_limit(),
            block_time: default_block_time(),
            scenarios: None,
        }
    }
}

fn default_max_batch_size() -> usize {
    DEFAULT_MAX_BATCH_SIZE
}
fn default_entrypoint() -> String {
    "facets()".to_string()
}
fn default_block_gas_limit() -> u64 {
    DEFAULT_BLOCK_GAS_LIMIT
}
fn default_block_time() -> String {
    "0ms".to_string()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "csv", "json", "human"
    #[serde(default = "default_format")]
    pub format: String,
    /// Report file path
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: default_path(),
        }
    }
}

fn default_format() -> String {
    "csv".to_string()
}
fn default_path() -> String {
    DEFAULT_REPORT_PATH.to_string()
}

impl LoupeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(&dir)
    }

    /// Walk up from `start` looking for `loupe.toml`
    pub fn discover_from(start: &Path) -> Option<Self> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), "ignoring config: {e}");
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Configured block time
    pub fn block_time(&self) -> anyhow::Result<Duration> {
        Self::parse_duration(&self.runner.block_time).map(Duration::from_nanos)
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# LoupeBench Configuration

[runner]
# Registration entries per diamondCut call
max_batch_size = 50
# Loupe function measured for each candidate
entrypoint = "facets()"
# Simulated chain block gas limit
block_gas_limit = 30000000
# Simulated confirmation latency
block_time = "0ms"
# Scenario list override, "<selectors>x<facets>" (uncomment to enable)
# scenarios = ["40x20", "64x16", "64x32", "64x64", "504x42", "1000x84"]

[output]
# Default output format: csv, json, human
format = "csv"
# Report file path
path = "loupe_benchmark_results.csv"
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m") to nanoseconds
    pub fn parse_duration(s: &str) -> anyhow::Result<u64> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if value < 0.0 {
            return Err(anyhow::anyhow!("Negative duration: {}", s));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok((value * multiplier as f64) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoupeConfig::default();
        assert_eq!(config.runner.max_batch_size, 50);
        assert_eq!(config.runner.entrypoint, "facets()");
        assert_eq!(config.runner.block_gas_limit, 30_000_000);
        assert!(config.runner.scenarios.is_none());
        assert_eq!(config.output.path, "loupe_benchmark_results.csv");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(LoupeConfig::parse_duration("3s").unwrap(), 3_000_000_000);
        assert_eq!(LoupeConfig::parse_duration("500ms").unwrap(), 500_000_000);
        assert_eq!(LoupeConfig::parse_duration("100us").unwrap(), 100_000);
        assert_eq!(LoupeConfig::parse_duration("0ms").unwrap(), 0);
        assert_eq!(LoupeConfig::parse_duration("2m").unwrap(), 120_000_000_000);
        assert!(LoupeConfig::parse_duration("").is_err());
        assert!(LoupeConfig::parse_duration("5 parsecs").is_err());
        assert!(LoupeConfig::parse_duration("-1s").is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [runner]
            max_batch_size = 10
            scenarios = ["40x20", "1000x20"]
        "#;

        let config: LoupeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.runner.max_batch_size, 10);
        assert_eq!(
            config.runner.scenarios,
            Some(vec![Scenario::new(40, 20), Scenario::new(1000, 20)])
        );
        // Defaults should still apply
        assert_eq!(config.runner.entrypoint, "facets()");
        assert_eq!(config.output.format, "csv");
    }

    #[test]
    fn test_invalid_scenario_rejected() {
        let toml_str = r#"
            [runner]
            scenarios = ["40x0"]
        "#;
        assert!(toml::from_str::<LoupeConfig>(toml_str).is_err());
    }

    #[test]
    fn test_default_toml_parses() {
        let config: LoupeConfig = toml::from_str(&LoupeConfig::default_toml()).unwrap();
        assert_eq!(config.runner.max_batch_size, 50);
        assert_eq!(config.block_time().unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_discover_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[runner]\nmax_batch_size = 7\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = LoupeConfig::discover_from(&nested).unwrap();
        assert_eq!(config.runner.max_batch_size, 7);
    }
}

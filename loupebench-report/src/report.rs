//! Report Data Structures

use chrono::{DateTime, Utc};
use loupebench_core::{Scenario, Selector};
use serde::{Deserialize, Serialize};

/// Complete benchmark report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub results: Vec<BenchmarkResult>,
    pub failures: Vec<ScenarioFailure>,
    pub divergences: Vec<ScenarioDivergence>,
    pub summary: ReportSummary,
}

/// One (scenario, candidate) measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Content selectors registered in the scenario
    pub total_selectors: u32,
    /// Content facets deployed in the scenario
    pub facet_count: u32,
    /// Candidate label (`OldFacet` / `NewFacet`)
    pub candidate_label: String,
    /// Size of the introspection surface the candidate exposes
    pub selector_count_found: usize,
    /// Gas of the measured entrypoint for this candidate
    pub gas_used: u64,
    /// Gas of the same entrypoint for the baseline candidate
    pub baseline_gas: u64,
    /// `baseline_gas - gas_used`, negative when the candidate costs more
    pub gas_saved: i64,
    /// `gas_saved / baseline_gas * 100`, zero when the baseline is zero
    pub percent_saved: f64,
}

impl BenchmarkResult {
    /// Build a result for `candidate`, comparing `gas_used` against the baseline.
    pub fn compare(
        scenario: Scenario,
        candidate: impl Into<String>,
        selector_count_found: usize,
        gas_used: u64,
        baseline_gas: u64,
    ) -> Self {
        let gas_saved = baseline_gas as i64 - gas_used as i64;
        let percent_saved = if baseline_gas > 0 {
            gas_saved as f64 / baseline_gas as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_selectors: scenario.total_selectors,
            facet_count: scenario.facet_count,
            candidate_label: candidate.into(),
            selector_count_found,
            gas_used,
            baseline_gas,
            gas_saved,
            percent_saved,
        }
    }

    /// Scenario this result belongs to
    pub fn scenario(&self) -> Scenario {
        Scenario::new(self.total_selectors, self.facet_count)
    }
}

/// Scenario that aborted before producing results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioFailure {
    pub scenario: Scenario,
    /// Pipeline step that failed (e.g. `register`)
    pub step: String,
    pub message: String,
}

/// Selectors declared by only one of the two candidates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceDivergence {
    pub only_old: Vec<Selector>,
    pub only_new: Vec<Selector>,
}

impl SurfaceDivergence {
    /// Compare two declared surfaces, preserving declaration order.
    pub fn between(old: &[Selector], new: &[Selector]) -> Self {
        Self {
            only_old: old.iter().filter(|s| !new.contains(s)).copied().collect(),
            only_new: new.iter().filter(|s| !old.contains(s)).copied().collect(),
        }
    }

    /// True when both candidates declare the same selector set
    pub fn is_empty(&self) -> bool {
        self.only_old.is_empty() && self.only_new.is_empty()
    }
}

/// Divergence observed in a particular scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDivergence {
    pub scenario: Scenario,
    #[serde(flatten)]
    pub divergence: SurfaceDivergence,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub git_commit: Option<String>,
    pub git_branch: Option<String>,
    pub system: SystemInfo,
    pub config: ReportConfig,
}

/// Run configuration captured in report metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub max_batch_size: usize,
    pub entrypoint: String,
    pub block_gas_limit: u64,
    pub scenarios: Vec<Scenario>,
}

/// System information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub os_version: String,
    pub cpu: String,
    pub cpu_cores: u32,
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_scenarios: usize,
    pub passed: usize,
    pub failed: usize,
    pub divergent: usize,
    pub total_duration_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_against_baseline() {
        let s = Scenario::new(64, 64);
        let r = BenchmarkResult::compare(s, "NewFacet", 5, 80_000, 100_000);
        assert_eq!(r.gas_saved, 20_000);
        assert!((r.percent_saved - 20.0).abs() < 1e-9);
        assert_eq!(r.scenario(), s);
    }

    #[test]
    fn test_compare_regression_and_zero_baseline() {
        let s = Scenario::new(40, 20);
        let worse = BenchmarkResult::compare(s, "NewFacet", 5, 110, 100);
        assert_eq!(worse.gas_saved, -10);
        assert!(worse.percent_saved < 0.0);

        let zero = BenchmarkResult::compare(s, "NewFacet", 5, 10, 0);
        assert_eq!(zero.percent_saved, 0.0);
    }

    #[test]
    fn test_surface_divergence() {
        let a = Selector::repeat_byte(1);
        let b = Selector::repeat_byte(2);
        let c = Selector::repeat_byte(3);

        let same = SurfaceDivergence::between(&[a, b], &[b, a]);
        assert!(same.is_empty());

        let diff = SurfaceDivergence::between(&[a, b], &[b, c]);
        assert_eq!(diff.only_old, vec![a]);
        assert_eq!(diff.only_new, vec![c]);
        assert!(!diff.is_empty());
    }
}

//! Output Formatting
//!
//! Human-readable output: one gas table per scenario, then failures,
//! surface divergences and a summary.

use loupebench_core::Selector;
use loupebench_report::{BenchmarkResult, Report};
use std::collections::BTreeMap;

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("LoupeBench Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    // Results grouped by scenario, in run order
    let mut order = Vec::new();
    let mut groups: BTreeMap<(u32, u32), Vec<&BenchmarkResult>> = BTreeMap::new();
    for result in &report.results {
        let key = (result.total_selectors, result.facet_count);
        if !groups.contains_key(&key) {
            order.push(key);
        }
        groups.entry(key).or_default().push(result);
    }

    for key in order {
        let Some(results) = groups.get(&key) else {
            continue;
        };
        output.push_str(&format!(
            "Scenario: {} selectors / {} facets\n",
            key.0, key.1
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "  {:<10}  {:>9}  {:>12}  {:>12}  {:>8}\n",
            "Function", "Selectors", "Gas", "Saved", "Saved %"
        ));

        for r in results {
            output.push_str(&format!(
                "  {:<10}  {:>9}  {:>12}  {:>12}  {:>7.2}%\n",
                r.candidate_label, r.selector_count_found, r.gas_used, r.gas_saved, r.percent_saved
            ));
        }
        output.push('\n');
    }

    if !report.failures.is_empty() {
        output.push_str("Failed Scenarios\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for failure in &report.failures {
            output.push_str(&format!(
                "  ✗ {} at {}: {}\n",
                failure.scenario, failure.step, failure.message
            ));
        }
        output.push('\n');
    }

    if !report.divergences.is_empty() {
        output.push_str("Surface Divergences\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for d in &report.divergences {
            output.push_str(&format!(
                "  ! {}: only Old [{}], only New [{}]\n",
                d.scenario,
                join_selectors(&d.divergence.only_old),
                join_selectors(&d.divergence.only_new)
            ));
        }
        output.push('\n');
    }

    output.push_str("Summary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  {} scenarios: {} passed, {} failed ({:.0} ms)\n",
        report.summary.total_scenarios,
        report.summary.passed,
        report.summary.failed,
        report.summary.total_duration_ms
    ));

    output
}

fn join_selectors(selectors: &[Selector]) -> String {
    selectors
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::metadata::build_report_meta;
    use loupebench_core::Scenario;
    use loupebench_report::{ReportConfig, ResultAggregator, ScenarioFailure};

    fn config() -> ReportConfig {
        ReportConfig {
            max_batch_size: 50,
            entrypoint: "facets()".to_string(),
            block_gas_limit: 30_000_000,
            scenarios: vec![Scenario::new(64, 16), Scenario::new(40, 20)],
        }
    }

    #[test]
    fn test_human_output() {
        let mut aggregator = ResultAggregator::new();
        let s = Scenario::new(64, 16);
        aggregator.record(BenchmarkResult::compare(s, "OldFacet", 5, 200_000, 200_000));
        aggregator.record(BenchmarkResult::compare(s, "NewFacet", 5, 150_000, 200_000));
        aggregator.record_failure(ScenarioFailure {
            scenario: Scenario::new(40, 20),
            step: "register".to_string(),
            message: "registration batch 0 failed".to_string(),
        });

        let report = aggregator.to_report(build_report_meta(config()), 3.0);
        let text = format_human_output(&report);

        assert!(text.contains("Scenario: 64 selectors / 16 facets"));
        assert!(text.contains("NewFacet"));
        assert!(text.contains("25.00%"));
        assert!(text.contains("40x20 at register"));
        assert!(text.contains("2 scenarios: 1 passed, 1 failed"));
    }
}

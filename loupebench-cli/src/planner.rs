//! Scenario Planner
//!
//! Builds the execution plan by filtering the scenario list.
//!
//! Filtering: regex pattern matching on the scenario id (`"40x20"`).
//!
//! Ordering: scenarios keep their list order; a scenario listed twice runs once.

use loupebench_core::Scenario;
use std::collections::HashSet;

/// Execution plan for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// Ordered list of scenarios to run
    pub scenarios: Vec<Scenario>,
}

/// Build execution plan from the configured scenario list
pub fn build_plan(
    scenarios: impl IntoIterator<Item = Scenario>,
    filter: Option<&regex::Regex>,
) -> ExecutionPlan {
    let mut seen = HashSet::new();
    let scenarios = scenarios
        .into_iter()
        .filter(|s| filter.is_none_or(|re| re.is_match(&s.id())))
        .filter(|s| seen.insert(*s))
        .collect();

    ExecutionPlan { scenarios }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loupebench_core::DEFAULT_SCENARIOS;
    use regex::Regex;

    #[test]
    fn test_no_filter_keeps_order() {
        let plan = build_plan(DEFAULT_SCENARIOS, None);
        assert_eq!(plan.scenarios, DEFAULT_SCENARIOS.to_vec());
    }

    #[test]
    fn test_regex_filter() {
        let re = Regex::new("^64x").unwrap();
        let plan = build_plan(DEFAULT_SCENARIOS, Some(&re));
        assert_eq!(
            plan.scenarios,
            vec![
                Scenario::new(64, 16),
                Scenario::new(64, 32),
                Scenario::new(64, 64)
            ]
        );
    }

    #[test]
    fn test_duplicates_run_once() {
        let s = Scenario::new(40, 20);
        let plan = build_plan([s, Scenario::new(64, 16), s], None);
        assert_eq!(plan.scenarios.len(), 2);
        assert_eq!(plan.scenarios[0], s);
    }
}

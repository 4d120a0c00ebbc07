//! Benchmark Scenarios
//!
//! A scenario fixes how many content selectors are spread over how many
//! content facets. Scenarios print and parse as `"{selectors}x{facets}"`.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One (total selectors, facet count) benchmark configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Scenario {
    /// Number of content selectors registered in the dispatcher
    pub total_selectors: u32,
    /// Number of content facets the selectors are spread over
    pub facet_count: u32,
}

/// Compiled-in scenario list used when neither config nor CLI override it.
pub const DEFAULT_SCENARIOS: [Scenario; 6] = [
    Scenario::new(40, 20),
    Scenario::new(64, 16),
    Scenario::new(64, 32),
    Scenario::new(64, 64),
    Scenario::new(504, 42),
    Scenario::new(1000, 84),
];

impl Scenario {
    /// Create a scenario (not validated; see [`Scenario::validate`])
    pub const fn new(total_selectors: u32, facet_count: u32) -> Self {
        Self {
            total_selectors,
            facet_count,
        }
    }

    /// Reject scenarios that cannot be partitioned.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.facet_count == 0 {
            return Err(CoreError::InvalidScenario(format!(
                "{} has zero facets",
                self
            )));
        }
        Ok(())
    }

    /// Stable identifier used in logs, filters and reports
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.total_selectors, self.facet_count)
    }
}

impl FromStr for Scenario {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (selectors, facets) = s
            .trim()
            .split_once(['x', 'X', '/'])
            .ok_or_else(|| {
                CoreError::InvalidScenario(format!("expected SELECTORSxFACETS, got '{}'", s))
            })?;

        let parse = |part: &str, what: &str| {
            part.trim().parse::<u32>().map_err(|_| {
                CoreError::InvalidScenario(format!("invalid {} count '{}' in '{}'", what, part, s))
            })
        };

        let scenario = Scenario::new(parse(selectors, "selector")?, parse(facets, "facet")?);
        scenario.validate()?;
        Ok(scenario)
    }
}

impl TryFrom<String> for Scenario {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Scenario> for String {
    fn from(scenario: Scenario) -> Self {
        scenario.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let s: Scenario = "504x42".parse().unwrap();
        assert_eq!(s, Scenario::new(504, 42));
        assert_eq!(s.to_string(), "504x42");
        assert_eq!("64/16".parse::<Scenario>().unwrap(), Scenario::new(64, 16));
        assert_eq!(" 10 X 3 ".parse::<Scenario>().unwrap(), Scenario::new(10, 3));
    }

    #[test]
    fn test_parse_rejects_zero_facets() {
        let err = "10x0".parse::<Scenario>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidScenario(_)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("forty".parse::<Scenario>().is_err());
        assert!("40x".parse::<Scenario>().is_err());
        assert!("-1x2".parse::<Scenario>().is_err());
    }

    #[test]
    fn test_default_scenarios_are_valid() {
        for s in DEFAULT_SCENARIOS {
            s.validate().unwrap();
        }
        assert_eq!(DEFAULT_SCENARIOS[5], Scenario::new(1000, 84));
    }

    #[test]
    fn test_serde_uses_display_form() {
        #[derive(Deserialize)]
        struct Wrapper {
            scenarios: Vec<Scenario>,
        }
        let w: Wrapper = serde_json::from_str(r#"{"scenarios": ["40x20", "64x64"]}"#).unwrap();
        assert_eq!(w.scenarios, vec![Scenario::new(40, 20), Scenario::new(64, 64)]);
    }
}

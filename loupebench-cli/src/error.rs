//! Benchmark Errors

use loupebench_chain::{ChainError, ContractKind};
use loupebench_core::{CoreError, Scenario};
use std::fmt;
use thiserror::Error;

/// Pipeline step a scenario failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Registrar, dispatcher and content facet deployment
    Deploy,
    /// Selector partitioning and batch scheduling
    Partition,
    /// Content selector registration
    Register,
    /// Candidate loupe deployment
    DeployCandidates,
    /// Candidate registration against the dispatcher
    RegisterCandidate,
    /// Dispatcher mapping check
    Verify,
    /// Gas and selector-count measurement
    Measure,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Deploy => "deploy",
            Step::Partition => "partition",
            Step::Register => "register",
            Step::DeployCandidates => "deploy-candidates",
            Step::RegisterCandidate => "register-candidate",
            Step::Verify => "verify",
            Step::Measure => "measure",
        })
    }
}

/// Errors raised while running a scenario
#[derive(Debug, Error)]
pub enum BenchError {
    /// Scenario cannot be run (e.g. zero facets)
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    /// Runner parameter is unusable (e.g. zero batch size)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A registration batch failed to submit or confirm
    #[error("registration batch {batch_index} failed: {source}")]
    RegistrationFailed {
        /// 0-based index of the failing batch
        batch_index: usize,
        /// Chain error
        #[source]
        source: ChainError,
    },

    /// A contract deployment failed to submit or confirm
    #[error("deployment of {contract} failed: {source}")]
    DeploymentFailed {
        /// Contract being deployed
        contract: ContractKind,
        /// Chain error
        #[source]
        source: ChainError,
    },

    /// A read call on a candidate failed or returned unexpected data
    #[error("{candidate} {function} failed: {message}")]
    IntrospectionCallFailed {
        /// Candidate label
        candidate: String,
        /// Function signature
        function: String,
        /// Failure description
        message: String,
    },

    /// A scenario aborted; wraps the step error
    #[error("scenario {scenario} failed at {step}: {source}")]
    ScenarioFailed {
        /// Scenario that aborted
        scenario: Scenario,
        /// Step that failed
        step: Step,
        /// Step error
        #[source]
        source: Box<BenchError>,
    },
}

impl BenchError {
    /// Wrap `self` as a failure of `scenario` at `step`
    pub fn at(self, scenario: Scenario, step: Step) -> Self {
        BenchError::ScenarioFailed {
            scenario,
            step,
            source: Box::new(self),
        }
    }
}

impl From<CoreError> for BenchError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidScenario(msg) => BenchError::InvalidScenario(msg),
            CoreError::InvalidConfiguration(msg) => BenchError::InvalidConfiguration(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_failure_message() {
        let err = BenchError::RegistrationFailed {
            batch_index: 2,
            source: ChainError::Reverted {
                reason: "boom".to_string(),
            },
        }
        .at(Scenario::new(504, 42), Step::Register);

        assert_eq!(
            err.to_string(),
            "scenario 504x42 failed at register: registration batch 2 failed: execution reverted: boom"
        );
    }

    #[test]
    fn test_from_core_error() {
        let err: BenchError = CoreError::InvalidConfiguration("zero".to_string()).into();
        assert!(matches!(err, BenchError::InvalidConfiguration(_)));
    }
}

#![warn(missing_docs)]
//! # LoupeBench
//!
//! Gas benchmark comparing two implementations of the EIP-2535 diamond loupe.
//!
//! For each scenario (N content selectors spread over F content facets) the
//! harness:
//! - **Partitions** selectors across facets with a reproducible remainder rule
//! - **Registers** them through batched `diamondCut` calls, one confirmed batch at a time
//! - **Measures** the Old and New loupe candidates against the identical mapping
//! - **Reports** one CSV row per (scenario, candidate)
//!
//! ## Quick Start
//!
//! ```ignore
//! use loupebench::prelude::*;
//!
//! # async fn demo() -> Result<(), BenchError> {
//! let chain = SimulatedChain::default();
//! let runner = ComparativeRunner::new(&chain, BenchSettings::default());
//! let outcome = runner.run_scenario(Scenario::new(40, 20)).await?;
//! for result in &outcome.results {
//!     println!("{} {} gas", result.candidate_label, result.gas_used);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Chains
//!
//! Implement [`ChainBackend`] to drive a different execution environment;
//! everything above the trait is backend-agnostic.

// Re-export core types
pub use loupebench_core::{
    Address, CONTENT_FACET_TEMPLATES, CoreError, DEFAULT_MAX_BATCH_SIZE, DEFAULT_SCENARIOS,
    FacetCut, FacetCutAction, FacetSelectors, Scenario, Selector, SelectorAssignment,
    SelectorPartitioner, facet_share, partition, schedule, selector_of, selectors_of,
};

// Re-export the chain seam
pub use loupebench_chain::{
    Call, CallOutput, ChainBackend, ChainError, ContractKind, DEFAULT_BLOCK_GAS_LIMIT,
    DiamondStorage, FacetInfo, GasSchedule, LoupeVariant, PendingDeployment, Receipt,
    SimulatedChain, SimulatedChainConfig, TxHash,
};

// Re-export reporting
pub use loupebench_report::{
    BenchmarkResult, CSV_HEADER, CsvFileSink, DEFAULT_REPORT_PATH, MemorySink, OutputFormat,
    Report, ReportError, ReportSink, ResultAggregator, ScenarioDivergence, ScenarioFailure,
    SurfaceDivergence, generate_csv_report, generate_json_report,
};

// Re-export the executor
pub use loupebench_cli::{
    BenchError, BenchSettings, ComparativeRunner, DeploymentDriver, LoupeConfig,
    RegistrationOrchestrator, RunSummary, ScenarioOutcome, Step,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BenchError, BenchSettings, BenchmarkResult, ChainBackend, ComparativeRunner,
        ResultAggregator, Scenario, SimulatedChain,
    };
}

/// Run the LoupeBench CLI.
///
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     loupebench::run()
/// }
/// ```
pub use loupebench_cli::run;

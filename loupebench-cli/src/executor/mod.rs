//! Scenario Executor
//!
//! Deploys contracts, registers selectors and measures both loupe
//! candidates for each scenario, against any [`loupebench_chain::ChainBackend`].
//!
//! ## Pipeline Overview
//!
//! ```text
//! Scenario list (compiled-in, loupe.toml or --scenario)
//!       │
//!       ▼
//! ┌──────────────┐
//! │  deployment  │  Registrar, dispatcher, content facets, candidates
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │ registration │  Batched diamondCut, sequential confirmation
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │    runner    │  Old vs New measurement, failure isolation
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │  formatting  │  Human-readable output
//! └──────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`deployment`] - Contract deployment with confirmation
//! - [`registration`] - Batched selector registration
//! - [`runner`] - Per-scenario comparison and the scenario loop
//! - [`formatting`] - Human-readable output formatting
//! - [`metadata`] - System metadata collection

mod deployment;
mod formatting;
mod metadata;
mod registration;
mod runner;

pub use deployment::{CandidateDeployment, DeploymentDriver, DiamondDeployment};
pub use formatting::format_human_output;
pub use metadata::build_report_meta;
pub use registration::RegistrationOrchestrator;
pub use runner::{BenchSettings, ComparativeRunner, RunSummary, ScenarioOutcome};

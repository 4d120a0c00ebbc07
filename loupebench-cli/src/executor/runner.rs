//! Comparative Runner
//!
//! Runs one scenario end to end and turns it into a pair of results.
//!
//! ## Scenario Pipeline
//!
//! ```text
//! Scenario (e.g. 40x20)
//!       │
//!       ▼
//! ┌──────────────┐
//! │   deploy     │  registrar → dispatcher → N content facets
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │  partition   │  selectors per facet, Add entries, batches
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │   register   │  one diamondCut per batch, each confirmed
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │  candidates  │  Old: Add surface → verify → measure
//! │              │  New: Replace/Add/Remove → verify → measure
//! └──────┬───────┘
//!        ▼
//!  [BenchmarkResult; 2]  (OldFacet, NewFacet)
//! ```
//!
//! Only one candidate is routed at a time, and both are measured against the
//! same content selector mapping.

use super::deployment::{CandidateDeployment, DeploymentDriver, DiamondDeployment};
use super::registration::RegistrationOrchestrator;
use crate::error::{BenchError, Step};
use alloy_primitives::{Address, Selector};
use indicatif::{ProgressBar, ProgressStyle};
use loupebench_chain::{Call, CallOutput, ChainBackend, ContractKind, LoupeVariant};
use loupebench_core::{DEFAULT_MAX_BATCH_SIZE, FacetCut, Scenario, SelectorPartitioner, schedule};
use loupebench_report::{
    BenchmarkResult, ResultAggregator, ScenarioDivergence, ScenarioFailure, SurfaceDivergence,
};
use std::collections::HashMap;

/// Runner parameters shared by every scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchSettings {
    /// Registration entries per `diamondCut` call
    pub max_batch_size: usize,
    /// Loupe call measured for each candidate
    pub entrypoint: Call,
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            entrypoint: Call::Facets,
        }
    }
}

impl BenchSettings {
    /// Validated settings; `entrypoint` is a loupe function signature.
    pub fn new(max_batch_size: usize, entrypoint: &str) -> Result<Self, BenchError> {
        if max_batch_size == 0 {
            return Err(BenchError::InvalidConfiguration(
                "max batch size must be at least 1".to_string(),
            ));
        }
        let entrypoint = Call::from_signature(entrypoint).ok_or_else(|| {
            BenchError::InvalidConfiguration(format!(
                "'{}' is not a loupe function",
                entrypoint.trim()
            ))
        })?;
        Ok(Self {
            max_batch_size,
            entrypoint,
        })
    }
}

/// Everything one successful scenario produced
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    /// Scenario that ran
    pub scenario: Scenario,
    /// Old result first, then New
    pub results: Vec<BenchmarkResult>,
    /// Difference between the candidates' declared surfaces
    pub divergence: SurfaceDivergence,
    /// Number of content registration batches submitted
    pub registration_batches: usize,
    /// Dispatcher the scenario deployed
    pub dispatcher: Address,
}

/// Scenario counts of a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Scenarios that produced results
    pub passed: usize,
    /// Scenarios that aborted
    pub failed: usize,
}

struct Measurement {
    variant: LoupeVariant,
    gas_used: u64,
    selector_count: usize,
}

/// Drives Old and New candidates through identical scenarios
pub struct ComparativeRunner<'a, B: ChainBackend + ?Sized> {
    backend: &'a B,
    settings: BenchSettings,
}

impl<'a, B: ChainBackend + ?Sized> ComparativeRunner<'a, B> {
    /// Runner over `backend`
    pub fn new(backend: &'a B, settings: BenchSettings) -> Self {
        Self { backend, settings }
    }

    /// Runner parameters
    pub fn settings(&self) -> &BenchSettings {
        &self.settings
    }

    /// Run every scenario in order, recording into `aggregator`.
    ///
    /// A failing scenario is logged and recorded as a failure; the remaining
    /// scenarios still run.
    pub async fn run_all(
        &self,
        scenarios: &[Scenario],
        aggregator: &mut ResultAggregator,
    ) -> RunSummary {
        let pb = ProgressBar::new(scenarios.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut summary = RunSummary::default();
        for &scenario in scenarios {
            pb.set_message(scenario.id());
            match self.run_scenario(scenario).await {
                Ok(outcome) => {
                    summary.passed += 1;
                    record_divergence(aggregator, scenario, outcome.divergence);
                    for result in outcome.results {
                        aggregator.record(result);
                    }
                }
                Err(err) => {
                    summary.failed += 1;
                    if reached_candidates(&err) {
                        record_divergence(aggregator, scenario, self.surface_divergence());
                    }
                    let failure = failure_of(scenario, &err);
                    tracing::error!(
                        scenario = %scenario,
                        selectors = scenario.total_selectors,
                        facets = scenario.facet_count,
                        step = %failure.step,
                        "scenario failed: {}",
                        failure.message
                    );
                    aggregator.record_failure(failure);
                }
            }
            pb.inc(1);
        }

        pb.finish_with_message("Complete");
        summary
    }

    /// Run one scenario on fresh contracts
    pub async fn run_scenario(&self, scenario: Scenario) -> Result<ScenarioOutcome, BenchError> {
        scenario
            .validate()
            .map_err(|e| BenchError::from(e).at(scenario, Step::Partition))?;
        tracing::info!(scenario = %scenario, "running scenario");

        let driver = DeploymentDriver::new(self.backend);
        let diamond = driver
            .deploy_diamond()
            .await
            .map_err(|e| e.at(scenario, Step::Deploy))?;
        let facets = driver
            .deploy_content_facets(scenario.facet_count)
            .await
            .map_err(|e| e.at(scenario, Step::Deploy))?;

        let (old_surface, new_surface) = self.candidate_surfaces();

        let entries = self
            .content_entries(scenario, &facets, &old_surface, &new_surface)
            .map_err(|e| e.at(scenario, Step::Partition))?;
        let expected: HashMap<Selector, Address> = entries
            .iter()
            .flat_map(|e| e.function_selectors.iter().map(|s| (*s, e.facet_address)))
            .collect();
        let batches = schedule(entries, self.settings.max_batch_size)
            .map_err(|e| BenchError::from(e).at(scenario, Step::Partition))?;
        let registration_batches = batches.len();

        let orchestrator = RegistrationOrchestrator::new(self.backend, diamond.dispatcher);
        orchestrator
            .apply(batches)
            .await
            .map_err(|e| e.at(scenario, Step::Register))?;

        let candidates = driver
            .deploy_candidates()
            .await
            .map_err(|e| e.at(scenario, Step::DeployCandidates))?;
        let divergence = SurfaceDivergence::between(&old_surface, &new_surface);
        if !divergence.is_empty() {
            tracing::warn!(
                scenario = %scenario,
                only_old = ?divergence.only_old,
                only_new = ?divergence.only_new,
                "candidate loupe surfaces differ"
            );
        }

        let mut measurements = Vec::with_capacity(LoupeVariant::ALL.len());
        for variant in LoupeVariant::ALL {
            let cut = candidate_cut(variant, &candidates, &old_surface, &new_surface);
            orchestrator
                .register(cut, self.settings.max_batch_size)
                .await
                .map_err(|e| e.at(scenario, Step::RegisterCandidate))?;

            let surface = match variant {
                LoupeVariant::Old => &old_surface,
                LoupeVariant::New => &new_surface,
            };
            self.verify_mapping(diamond, &candidates, variant, surface, &expected)
                .await
                .map_err(|e| e.at(scenario, Step::Verify))?;

            let measurement = self
                .measure(diamond.dispatcher, candidates.address(variant), variant)
                .await
                .map_err(|e| e.at(scenario, Step::Measure))?;
            measurements.push(measurement);
        }

        let baseline_gas = measurements
            .iter()
            .find(|m| m.variant == LoupeVariant::Old)
            .map(|m| m.gas_used)
            .unwrap_or_default();
        let results: Vec<BenchmarkResult> = measurements
            .iter()
            .map(|m| {
                BenchmarkResult::compare(
                    scenario,
                    m.variant.label(),
                    m.selector_count,
                    m.gas_used,
                    baseline_gas,
                )
            })
            .collect();

        let new_label = LoupeVariant::New.label();
        if let Some(new) = results.iter().find(|r| r.candidate_label == new_label) {
            tracing::info!(
                scenario = %scenario,
                old_gas = baseline_gas,
                new_gas = new.gas_used,
                saved = new.gas_saved,
                "scenario complete ({:.2}% saved)",
                new.percent_saved
            );
        }

        Ok(ScenarioOutcome {
            scenario,
            results,
            divergence,
            registration_batches,
            dispatcher: diamond.dispatcher,
        })
    }

    /// Declared selectors of the Old and New candidates
    fn candidate_surfaces(&self) -> (Vec<Selector>, Vec<Selector>) {
        (
            self.backend.function_selectors(ContractKind::Loupe(LoupeVariant::Old)),
            self.backend.function_selectors(ContractKind::Loupe(LoupeVariant::New)),
        )
    }

    fn surface_divergence(&self) -> SurfaceDivergence {
        let (old_surface, new_surface) = self.candidate_surfaces();
        SurfaceDivergence::between(&old_surface, &new_surface)
    }

    /// Content `Add` entries; never issues a registrar or loupe selector.
    fn content_entries(
        &self,
        scenario: Scenario,
        facets: &[Address],
        old_surface: &[Selector],
        new_surface: &[Selector],
    ) -> Result<Vec<FacetCut>, BenchError> {
        let reserved = self
            .backend
            .function_selectors(ContractKind::Registrar)
            .into_iter()
            .chain(old_surface.iter().copied())
            .chain(new_surface.iter().copied());

        let assignment = SelectorPartitioner::default()
            .with_reserved(reserved)
            .partition(scenario.total_selectors, scenario.facet_count)?;
        Ok(assignment.registration_entries(facets)?)
    }

    /// Check the dispatcher's content mapping against what was registered.
    async fn verify_mapping(
        &self,
        diamond: DiamondDeployment,
        candidates: &CandidateDeployment,
        variant: LoupeVariant,
        surface: &[Selector],
        expected: &HashMap<Selector, Address>,
    ) -> Result<(), BenchError> {
        let call = Call::Facets;
        if !surface.contains(&call.selector()) {
            tracing::warn!(
                candidate = variant.label(),
                "candidate does not expose facets(); mapping check skipped"
            );
            return Ok(());
        }

        let failed = |message: String| BenchError::IntrospectionCallFailed {
            candidate: variant.label().to_string(),
            function: "facets()".to_string(),
            message,
        };

        let output = self
            .backend
            .call_view(diamond.dispatcher, &call)
            .await
            .map_err(|e| failed(e.to_string()))?;
        let facets = match output {
            CallOutput::Facets(facets) => facets,
            other => return Err(failed(format!("unexpected output {:?}", other))),
        };

        let candidate = candidates.address(variant);
        let observed: HashMap<Selector, Address> = facets
            .iter()
            .filter(|f| f.facet_address != diamond.registrar && f.facet_address != candidate)
            .flat_map(|f| f.function_selectors.iter().map(|s| (*s, f.facet_address)))
            .collect();

        if observed != *expected {
            let missing = expected
                .iter()
                .filter(|(s, a)| observed.get(*s) != Some(*a))
                .count();
            return Err(failed(format!(
                "dispatcher routes {} content selectors, {} registered, {} missing or misrouted",
                observed.len(),
                expected.len(),
                missing
            )));
        }
        Ok(())
    }

    /// Gas of the entrypoint plus the selector count the candidate exposes
    async fn measure(
        &self,
        dispatcher: Address,
        candidate: Address,
        variant: LoupeVariant,
    ) -> Result<Measurement, BenchError> {
        let entrypoint = &self.settings.entrypoint;
        let failed = |function: &str, message: String| BenchError::IntrospectionCallFailed {
            candidate: variant.label().to_string(),
            function: function.to_string(),
            message,
        };

        let function = entrypoint.signature().unwrap_or("entrypoint");
        let gas_used = self
            .backend
            .measure_gas(dispatcher, entrypoint)
            .await
            .map_err(|e| failed(function, e.to_string()))?;

        let selector_call = Call::FacetFunctionSelectors(candidate);
        let selector_count = self
            .backend
            .call_view(dispatcher, &selector_call)
            .await
            .map_err(|e| failed("facetFunctionSelectors(address)", e.to_string()))?
            .selector_count();

        tracing::debug!(candidate = variant.label(), gas_used, selector_count, "measured");
        Ok(Measurement {
            variant,
            gas_used,
            selector_count,
        })
    }
}

/// Cut that makes `variant` the routed candidate.
///
/// Old is added outright. New replaces the selectors both declare, adds its
/// own extras and removes the ones only Old declares.
fn candidate_cut(
    variant: LoupeVariant,
    candidates: &CandidateDeployment,
    old_surface: &[Selector],
    new_surface: &[Selector],
) -> Vec<FacetCut> {
    let cuts = match variant {
        LoupeVariant::Old => vec![FacetCut::add(candidates.old, old_surface.to_vec())],
        LoupeVariant::New => {
            let (shared, only_new): (Vec<Selector>, Vec<Selector>) =
                new_surface.iter().partition(|s| old_surface.contains(s));
            let only_old = old_surface
                .iter()
                .filter(|s| !new_surface.contains(s))
                .copied()
                .collect();
            vec![
                FacetCut::replace(candidates.new, shared),
                FacetCut::add(candidates.new, only_new),
                FacetCut::remove(only_old),
            ]
        }
    };
    cuts.into_iter()
        .filter(|c| !c.function_selectors.is_empty())
        .collect()
}

fn record_divergence(
    aggregator: &mut ResultAggregator,
    scenario: Scenario,
    divergence: SurfaceDivergence,
) {
    if !divergence.is_empty() {
        aggregator.record_divergence(ScenarioDivergence {
            scenario,
            divergence,
        });
    }
}

/// Whether the scenario failed after its candidate surfaces were compared
fn reached_candidates(err: &BenchError) -> bool {
    matches!(
        err,
        BenchError::ScenarioFailed {
            step: Step::RegisterCandidate | Step::Verify | Step::Measure,
            ..
        }
    )
}

fn failure_of(scenario: Scenario, err: &BenchError) -> ScenarioFailure {
    let (step, message) = match err {
        BenchError::ScenarioFailed { step, source, .. } => (step.to_string(), source.to_string()),
        other => ("run".to_string(), other.to_string()),
    };
    ScenarioFailure {
        scenario,
        step,
        message,
    }
}

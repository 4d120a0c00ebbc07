//! Integration tests for LoupeBench

use alloy_primitives::{Address, Selector};
use async_trait::async_trait;
use loupebench::{
    BenchSettings, CSV_HEADER, Call, CallOutput, ChainBackend, ChainError, ComparativeRunner,
    ContractKind, CsvFileSink, DEFAULT_SCENARIOS, LoupeVariant, PendingDeployment, Receipt,
    ResultAggregator, Scenario, SimulatedChain, TxHash, selector_of,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Simulated chain whose cuts start failing once a given dispatcher is deployed
struct FailingCuts {
    inner: SimulatedChain,
    dispatchers: AtomicUsize,
    fail_on: usize,
}

#[async_trait]
impl ChainBackend for FailingCuts {
    async fn deploy(
        &self,
        kind: ContractKind,
        constructor_args: &[Address],
    ) -> Result<PendingDeployment, ChainError> {
        if kind == ContractKind::Dispatcher {
            self.dispatchers.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.deploy(kind, constructor_args).await
    }

    async fn submit_call(&self, to: Address, call: Call) -> Result<TxHash, ChainError> {
        if self.dispatchers.load(Ordering::SeqCst) == self.fail_on {
            return Err(ChainError::Reverted {
                reason: "node rejected transaction".to_string(),
            });
        }
        self.inner.submit_call(to, call).await
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Receipt, ChainError> {
        self.inner.wait_for_receipt(tx_hash).await
    }

    async fn measure_gas(&self, to: Address, call: &Call) -> Result<u64, ChainError> {
        self.inner.measure_gas(to, call).await
    }

    async fn call_view(&self, to: Address, call: &Call) -> Result<CallOutput, ChainError> {
        self.inner.call_view(to, call).await
    }
}

/// Simulated chain where the New loupe does not declare one loupe function
struct NarrowNewLoupe {
    inner: SimulatedChain,
    dropped: &'static str,
}

impl NarrowNewLoupe {
    fn without(dropped: &'static str) -> Self {
        Self {
            inner: SimulatedChain::default(),
            dropped,
        }
    }
}

#[async_trait]
impl ChainBackend for NarrowNewLoupe {
    async fn deploy(
        &self,
        kind: ContractKind,
        constructor_args: &[Address],
    ) -> Result<PendingDeployment, ChainError> {
        self.inner.deploy(kind, constructor_args).await
    }

    async fn submit_call(&self, to: Address, call: Call) -> Result<TxHash, ChainError> {
        self.inner.submit_call(to, call).await
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Receipt, ChainError> {
        self.inner.wait_for_receipt(tx_hash).await
    }

    async fn measure_gas(&self, to: Address, call: &Call) -> Result<u64, ChainError> {
        self.inner.measure_gas(to, call).await
    }

    async fn call_view(&self, to: Address, call: &Call) -> Result<CallOutput, ChainError> {
        self.inner.call_view(to, call).await
    }

    fn function_selectors(&self, kind: ContractKind) -> Vec<Selector> {
        let selectors = kind.function_selectors();
        match kind {
            ContractKind::Loupe(LoupeVariant::New) => {
                let dropped = selector_of(self.dropped);
                selectors.into_iter().filter(|s| *s != dropped).collect()
            }
            _ => selectors,
        }
    }
}

/// 40 selectors over 20 facets: two each, one registration batch, full loupe surface
#[tokio::test]
async fn test_small_scenario_end_to_end() {
    let chain = SimulatedChain::default();
    let runner = ComparativeRunner::new(&chain, BenchSettings::default());
    let outcome = runner.run_scenario(Scenario::new(40, 20)).await.unwrap();

    assert_eq!(outcome.registration_batches, 1);
    let storage = chain.dispatcher_storage(&outcome.dispatcher).unwrap();
    let content_facets: Vec<_> = storage
        .facets()
        .into_iter()
        .filter(|f| chain.contract_kind(&f.facet_address) == Some(ContractKind::ContentFacet))
        .collect();
    assert_eq!(content_facets.len(), 20);
    assert!(content_facets.iter().all(|f| f.function_selectors.len() == 2));

    let labels: Vec<_> = outcome.results.iter().map(|r| r.candidate_label.as_str()).collect();
    assert_eq!(labels, ["OldFacet", "NewFacet"]);
    assert!(outcome.results.iter().all(|r| r.selector_count_found == 5));
}

/// Savings columns are derived from the Old row of the same scenario
#[tokio::test]
async fn test_savings_against_baseline() {
    let chain = SimulatedChain::default();
    let runner = ComparativeRunner::new(&chain, BenchSettings::default());
    let outcome = runner.run_scenario(Scenario::new(64, 64)).await.unwrap();

    let storage = chain.dispatcher_storage(&outcome.dispatcher).unwrap();
    let shares: Vec<usize> = storage
        .facets()
        .into_iter()
        .filter(|f| chain.contract_kind(&f.facet_address) == Some(ContractKind::ContentFacet))
        .map(|f| f.function_selectors.len())
        .collect();
    assert_eq!(shares, vec![1; 64]);

    let old = &outcome.results[0];
    let new = &outcome.results[1];
    assert_eq!(old.gas_saved, 0);
    assert_eq!(old.percent_saved, 0.0);
    assert_eq!(new.gas_saved, old.gas_used as i64 - new.gas_used as i64);
    let pct = new.gas_saved as f64 / old.gas_used as f64 * 100.0;
    assert!((new.percent_saved - pct).abs() < 1e-9);
}

/// A scenario failing mid-registration does not stop the others
#[tokio::test]
async fn test_failed_scenario_is_isolated() {
    let backend = FailingCuts {
        inner: SimulatedChain::default(),
        dispatchers: AtomicUsize::new(0),
        fail_on: 3,
    };
    let runner = ComparativeRunner::new(&backend, BenchSettings::default());
    let mut aggregator = ResultAggregator::new();
    let summary = runner.run_all(&DEFAULT_SCENARIOS, &mut aggregator).await;

    assert_eq!(summary.passed, 5);
    assert_eq!(summary.failed, 1);

    let failure = &aggregator.failures()[0];
    assert_eq!(failure.scenario, DEFAULT_SCENARIOS[2]);
    assert_eq!(failure.step, "register");

    let mut seen = Vec::new();
    for result in aggregator.results() {
        let scenario = result.scenario();
        if !seen.contains(&scenario) {
            seen.push(scenario);
        }
    }
    let expected: Vec<Scenario> = [0, 1, 3, 4, 5].iter().map(|&i| DEFAULT_SCENARIOS[i]).collect();
    assert_eq!(seen, expected);
    assert_eq!(aggregator.results().len(), 10);
}

/// The registered mapping does not depend on how entries are batched
#[tokio::test]
async fn test_mapping_independent_of_batch_size() {
    let scenario = Scenario::new(504, 42);
    let mut mappings = Vec::new();

    for batch_size in [1, 7, 50, 1000] {
        let chain = SimulatedChain::default();
        let settings = BenchSettings::new(batch_size, "facets()").unwrap();
        let outcome = ComparativeRunner::new(&chain, settings)
            .run_scenario(scenario)
            .await
            .unwrap();
        assert_eq!(outcome.registration_batches, 42_usize.div_ceil(batch_size));

        let storage = chain.dispatcher_storage(&outcome.dispatcher).unwrap();
        let content: HashSet<Selector> = storage
            .facets()
            .into_iter()
            .filter(|f| chain.contract_kind(&f.facet_address) == Some(ContractKind::ContentFacet))
            .flat_map(|f| f.function_selectors)
            .collect();
        assert_eq!(content.len(), 504);
        mappings.push(content);
    }

    assert!(mappings.windows(2).all(|w| w[0] == w[1]));
}

/// Flushing a run with no results leaves only the header
#[test]
fn test_empty_run_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loupe_benchmark_results.csv");

    ResultAggregator::new()
        .flush(&mut CsvFileSink::new(&path))
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.trim_end(), CSV_HEADER);
}

/// Differing candidate surfaces are reported and each count reflects its own surface
#[tokio::test]
async fn test_surface_divergence_reported() {
    let backend = NarrowNewLoupe::without("supportsInterface(bytes4)");
    let runner = ComparativeRunner::new(&backend, BenchSettings::default());
    let outcome = runner.run_scenario(Scenario::new(64, 16)).await.unwrap();

    assert_eq!(
        outcome.divergence.only_old,
        vec![selector_of("supportsInterface(bytes4)")]
    );
    assert!(outcome.divergence.only_new.is_empty());
    assert_eq!(outcome.results[0].selector_count_found, 5);
    assert_eq!(outcome.results[1].selector_count_found, 4);

    let storage = backend.inner.dispatcher_storage(&outcome.dispatcher).unwrap();
    assert!(storage.facet_of(&selector_of("supportsInterface(bytes4)")).is_none());
}

/// A divergence that breaks the New measurement is still reported with the failure
#[tokio::test]
async fn test_divergence_kept_when_scenario_fails() {
    let backend = NarrowNewLoupe::without("facets()");
    let runner = ComparativeRunner::new(&backend, BenchSettings::default());
    let mut aggregator = ResultAggregator::new();
    let summary = runner
        .run_all(&[Scenario::new(40, 20)], &mut aggregator)
        .await;

    assert_eq!(summary.failed, 1);
    assert!(aggregator.results().is_empty());
    assert_eq!(aggregator.failures()[0].step, "measure");

    let divergences = aggregator.divergences();
    assert_eq!(divergences.len(), 1);
    assert_eq!(divergences[0].scenario, Scenario::new(40, 20));
    assert_eq!(divergences[0].divergence.only_old, vec![selector_of("facets()")]);
}

//! Batched Registration
//!
//! Submits `diamondCut` batches to a dispatcher one at a time. Batch `i + 1`
//! is only submitted after batch `i` has a confirmed receipt, so a failure
//! leaves every earlier batch applied and every later batch unsent.

use crate::error::BenchError;
use alloy_primitives::Address;
use loupebench_chain::{Call, ChainBackend, Receipt};
use loupebench_core::{FacetCut, schedule};

/// Applies registration batches to one dispatcher
pub struct RegistrationOrchestrator<'a, B: ChainBackend + ?Sized> {
    backend: &'a B,
    dispatcher: Address,
}

impl<'a, B: ChainBackend + ?Sized> RegistrationOrchestrator<'a, B> {
    /// Orchestrator targeting `dispatcher`
    pub fn new(backend: &'a B, dispatcher: Address) -> Self {
        Self {
            backend,
            dispatcher,
        }
    }

    /// Apply pre-scheduled batches in order; no retry.
    pub async fn apply(&self, batches: Vec<Vec<FacetCut>>) -> Result<Vec<Receipt>, BenchError> {
        let mut receipts = Vec::with_capacity(batches.len());

        for (batch_index, batch) in batches.into_iter().enumerate() {
            let entries = batch.len();
            let failed = |source| BenchError::RegistrationFailed {
                batch_index,
                source,
            };

            let tx_hash = self
                .backend
                .submit_call(self.dispatcher, Call::diamond_cut(batch))
                .await
                .map_err(failed)?;
            let receipt = self
                .backend
                .wait_for_receipt(tx_hash)
                .await
                .map_err(failed)?;

            tracing::debug!(
                batch = batch_index,
                entries,
                gas = receipt.gas_used,
                block = receipt.block_number,
                "registration batch confirmed"
            );
            receipts.push(receipt);
        }

        Ok(receipts)
    }

    /// Schedule `entries` into batches of at most `max_batch_size` and apply them
    pub async fn register(
        &self,
        entries: Vec<FacetCut>,
        max_batch_size: usize,
    ) -> Result<Vec<Receipt>, BenchError> {
        let batches = schedule(entries, max_batch_size)?;
        self.apply(batches).await
    }
}

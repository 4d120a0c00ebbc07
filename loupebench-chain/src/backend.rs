//! Chain Backend Trait

use crate::call::{Call, CallOutput, PendingDeployment, Receipt, TxHash};
use crate::error::ChainError;
use crate::interface::ContractKind;
use alloy_primitives::{Address, Selector};
use async_trait::async_trait;

/// Blockchain collaborator used by the benchmark.
///
/// Deployment and submission return as soon as the transaction is accepted;
/// callers confirm through [`ChainBackend::wait_for_receipt`], which returns
/// [`ChainError::Reverted`] for transactions that executed and failed.
#[async_trait]
pub trait ChainBackend: Send + Sync {
    /// Submit a contract creation
    async fn deploy(
        &self,
        kind: ContractKind,
        constructor_args: &[Address],
    ) -> Result<PendingDeployment, ChainError>;

    /// Submit a state-changing call to `to`
    async fn submit_call(&self, to: Address, call: Call) -> Result<TxHash, ChainError>;

    /// Wait until `tx_hash` is mined
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Receipt, ChainError>;

    /// Estimate the gas of a read call, including the intrinsic cost
    async fn measure_gas(&self, to: Address, call: &Call) -> Result<u64, ChainError>;

    /// Execute a read call and decode its output
    async fn call_view(&self, to: Address, call: &Call) -> Result<CallOutput, ChainError>;

    /// Declared selectors of a contract kind
    fn function_selectors(&self, kind: ContractKind) -> Vec<Selector> {
        kind.function_selectors()
    }
}

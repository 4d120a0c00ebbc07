//! Chain Errors

use crate::call::TxHash;
use alloy_primitives::{Address, Selector};
use thiserror::Error;

/// Errors surfaced by a [`crate::ChainBackend`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// Transaction or call executed and reverted
    #[error("execution reverted: {reason}")]
    Reverted {
        /// Revert reason string
        reason: String,
    },

    /// Execution needed more gas than the block allows
    #[error("out of gas: needs {required}, block limit {limit}")]
    OutOfGas {
        /// Gas the operation would consume
        required: u64,
        /// Block gas limit
        limit: u64,
    },

    /// No contract is deployed at the target address
    #[error("no contract at {0}")]
    UnknownAddress(Address),

    /// Receipt requested for a transaction that was never submitted
    #[error("unknown transaction {0}")]
    UnknownTransaction(TxHash),

    /// Dispatcher has no facet registered for the selector
    #[error("function {selector} not found on {dispatcher}")]
    FunctionNotFound {
        /// Dispatcher that received the call
        dispatcher: Address,
        /// Selector that failed to route
        selector: Selector,
    },

    /// Call targeted a contract that cannot execute it
    #[error("unroutable call: {0}")]
    Unroutable(String),
}

#![warn(missing_docs)]
//! LoupeBench Chain - Collaborator Seam
//!
//! The benchmark core never talks to a node directly. It goes through the
//! [`ChainBackend`] trait, whose four capabilities mirror what a deployment
//! script needs:
//! - deploy a contract and wait for its confirmation
//! - submit a state-changing call and wait for its receipt
//! - estimate the gas of a read call routed through a dispatcher
//! - list a contract kind's declared function selectors
//!
//! [`SimulatedChain`] implements the trait in memory with a deterministic gas
//! schedule, so runs are reproducible and need no external node.

mod backend;
mod call;
mod diamond;
mod error;
mod gas;
mod interface;
mod simulated;

pub use backend::ChainBackend;
pub use call::{Call, CallOutput, FacetInfo, PendingDeployment, Receipt, TxHash};
pub use diamond::DiamondStorage;
pub use error::ChainError;
pub use gas::{DEFAULT_BLOCK_GAS_LIMIT, GasSchedule};
pub use interface::{ContractKind, LoupeVariant};
pub use simulated::{SimulatedChain, SimulatedChainConfig};

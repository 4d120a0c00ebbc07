#![warn(missing_docs)]
//! LoupeBench Core - Scenario Model and Selector Planning
//!
//! This crate holds the pure, chain-independent half of the benchmark:
//! - `Scenario` definitions and the compiled-in scenario list
//! - Selector derivation and the `SelectorPartitioner`
//! - `FacetCut` registration entries and the `schedule` batcher
//!
//! Nothing here performs I/O; the chain and report crates build on these types.

mod cut;
mod error;
mod partition;
mod scenario;
mod schedule;
mod selector;

pub use alloy_primitives::{Address, Selector};
pub use cut::{FacetCut, FacetCutAction};
pub use error::CoreError;
pub use partition::{
    CONTENT_FACET_TEMPLATES, FacetSelectors, SelectorAssignment, SelectorPartitioner, facet_share,
    partition,
};
pub use scenario::{DEFAULT_SCENARIOS, Scenario};
pub use schedule::{DEFAULT_MAX_BATCH_SIZE, schedule};
pub use selector::{selector_of, selectors_of};

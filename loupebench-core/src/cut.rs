//! Registration Entries
//!
//! One `FacetCut` is one element of the `diamondCut` argument array: a facet
//! address, the action to apply, and the selectors it applies to.

use alloy_primitives::{Address, Selector};
use serde::{Deserialize, Serialize};

/// Action applied by a single cut entry (matches the on-chain enum values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum FacetCutAction {
    /// Register new selectors for the facet
    Add = 0,
    /// Re-point existing selectors to the facet
    Replace = 1,
    /// Unregister selectors (facet address must be zero)
    Remove = 2,
}

/// One registration entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCut {
    /// Facet the selectors route to (zero for `Remove`)
    pub facet_address: Address,
    /// Action to apply
    pub action: FacetCutAction,
    /// Selectors affected by this entry
    pub function_selectors: Vec<Selector>,
}

impl FacetCut {
    /// Entry that adds `selectors` for `facet`
    pub fn add(facet: Address, selectors: Vec<Selector>) -> Self {
        Self {
            facet_address: facet,
            action: FacetCutAction::Add,
            function_selectors: selectors,
        }
    }

    /// Entry that re-points `selectors` to `facet`
    pub fn replace(facet: Address, selectors: Vec<Selector>) -> Self {
        Self {
            facet_address: facet,
            action: FacetCutAction::Replace,
            function_selectors: selectors,
        }
    }

    /// Entry that removes `selectors` from the dispatcher
    pub fn remove(selectors: Vec<Selector>) -> Self {
        Self {
            facet_address: Address::ZERO,
            action: FacetCutAction::Remove,
            function_selectors: selectors,
        }
    }
}

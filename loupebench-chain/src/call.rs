//! Calls, Outputs and Receipts

use crate::interface::{
    DIAMOND_CUT, FACET_ADDRESS, FACET_ADDRESSES, FACET_FUNCTION_SELECTORS, FACETS,
    SUPPORTS_INTERFACE,
};
use alloy_primitives::{Address, B256, Bytes, Selector};
use loupebench_core::{FacetCut, selector_of};
use serde::{Deserialize, Serialize};

/// Transaction identifier
pub type TxHash = B256;

/// A typed call routed by its selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `diamondCut(cut, init, calldata)`
    DiamondCut {
        /// Registration entries, applied atomically
        cut: Vec<FacetCut>,
        /// Initializer contract (zero for none)
        init: Address,
        /// Initializer calldata
        calldata: Bytes,
    },
    /// `facets()`
    Facets,
    /// `facetFunctionSelectors(address)`
    FacetFunctionSelectors(Address),
    /// `facetAddresses()`
    FacetAddresses,
    /// `facetAddress(bytes4)`
    FacetAddress(Selector),
    /// `supportsInterface(bytes4)`
    SupportsInterface(Selector),
    /// Any other function, identified by selector only
    Invoke(Selector),
}

impl Call {
    /// `diamondCut` with no initializer
    pub fn diamond_cut(cut: Vec<FacetCut>) -> Self {
        Call::DiamondCut {
            cut,
            init: Address::ZERO,
            calldata: Bytes::new(),
        }
    }

    /// Build a zero-argument loupe call from its signature.
    ///
    /// Parameterized loupe functions get a fixed probe argument: the first
    /// content facet address is unknown here, so `facetFunctionSelectors`
    /// and `facetAddress` probe the zero value.
    pub fn from_signature(signature: &str) -> Option<Self> {
        let call = match signature.trim() {
            FACETS => Call::Facets,
            FACET_ADDRESSES => Call::FacetAddresses,
            FACET_FUNCTION_SELECTORS => Call::FacetFunctionSelectors(Address::ZERO),
            FACET_ADDRESS => Call::FacetAddress(Selector::ZERO),
            SUPPORTS_INTERFACE => Call::SupportsInterface(Selector::ZERO),
            _ => return None,
        };
        Some(call)
    }

    /// Function signature, if the call is a known typed function
    pub fn signature(&self) -> Option<&'static str> {
        match self {
            Call::DiamondCut { .. } => Some(DIAMOND_CUT),
            Call::Facets => Some(FACETS),
            Call::FacetFunctionSelectors(_) => Some(FACET_FUNCTION_SELECTORS),
            Call::FacetAddresses => Some(FACET_ADDRESSES),
            Call::FacetAddress(_) => Some(FACET_ADDRESS),
            Call::SupportsInterface(_) => Some(SUPPORTS_INTERFACE),
            Call::Invoke(_) => None,
        }
    }

    /// Routing key
    pub fn selector(&self) -> Selector {
        match (self, self.signature()) {
            (Call::Invoke(selector), _) => *selector,
            (_, Some(sig)) => selector_of(sig),
            (_, None) => Selector::ZERO,
        }
    }

    /// ABI-encoded calldata length in bytes
    pub(crate) fn calldata_len(&self) -> u64 {
        match self {
            Call::DiamondCut { cut, calldata, .. } => {
                // selector + 3 head words + array length + per-entry tuple heads
                let mut len = 4 + 32 * 4;
                for entry in cut {
                    len += 32 * 5 + 32 * entry.function_selectors.len() as u64;
                }
                len + 32 + calldata.len().div_ceil(32) as u64 * 32
            }
            Call::Facets | Call::FacetAddresses | Call::Invoke(_) => 4,
            Call::FacetFunctionSelectors(_)
            | Call::FacetAddress(_)
            | Call::SupportsInterface(_) => 4 + 32,
        }
    }
}

/// One element of a `facets()` result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetInfo {
    /// Facet address
    pub facet_address: Address,
    /// Selectors routed to the facet, in registration order
    pub function_selectors: Vec<Selector>,
}

/// Decoded output of a read call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutput {
    /// `facets()`
    Facets(Vec<FacetInfo>),
    /// `facetFunctionSelectors(address)`
    Selectors(Vec<Selector>),
    /// `facetAddresses()`
    Addresses(Vec<Address>),
    /// `facetAddress(bytes4)`
    Address(Address),
    /// `supportsInterface(bytes4)`
    Bool(bool),
    /// Functions without return data
    Empty,
}

impl CallOutput {
    /// Number of selectors visible in the output, where meaningful
    pub fn selector_count(&self) -> usize {
        match self {
            CallOutput::Facets(facets) => facets.iter().map(|f| f.function_selectors.len()).sum(),
            CallOutput::Selectors(selectors) => selectors.len(),
            CallOutput::Addresses(_)
            | CallOutput::Address(_)
            | CallOutput::Bool(_)
            | CallOutput::Empty => 0,
        }
    }
}

/// Contract deployment that has been submitted but not yet confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDeployment {
    /// Address the contract will live at
    pub address: Address,
    /// Creation transaction
    pub tx_hash: TxHash,
}

/// Confirmed transaction receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Transaction identifier
    pub tx_hash: TxHash,
    /// Block the transaction was mined in
    pub block_number: u64,
    /// Gas consumed
    pub gas_used: u64,
    /// Created contract, for deployments
    pub contract_address: Option<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_signature() {
        assert_eq!(Call::from_signature("facets()"), Some(Call::Facets));
        assert_eq!(
            Call::from_signature(" facetAddresses() "),
            Some(Call::FacetAddresses)
        );
        assert_eq!(Call::from_signature("owner()"), None);
    }

    #[test]
    fn test_selectors() {
        assert_eq!(Call::Facets.selector(), selector_of("facets()"));
        assert_eq!(Call::diamond_cut(vec![]).selector(), selector_of(DIAMOND_CUT));
        let raw = selector_of("func1_0_0");
        assert_eq!(Call::Invoke(raw).selector(), raw);
    }

    #[test]
    fn test_cut_calldata_grows_with_selectors() {
        let small = Call::diamond_cut(vec![FacetCut::add(Address::ZERO, vec![Selector::ZERO])]);
        let large = Call::diamond_cut(vec![FacetCut::add(
            Address::ZERO,
            vec![Selector::ZERO; 10],
        )]);
        assert_eq!(large.calldata_len() - small.calldata_len(), 9 * 32);
    }

    #[test]
    fn test_selector_count() {
        let out = CallOutput::Facets(vec![
            FacetInfo {
                facet_address: Address::ZERO,
                function_selectors: vec![Selector::ZERO; 3],
            },
            FacetInfo {
                facet_address: Address::ZERO,
                function_selectors: vec![Selector::ZERO; 2],
            },
        ]);
        assert_eq!(out.selector_count(), 5);
        assert_eq!(CallOutput::Bool(true).selector_count(), 0);
    }
}

//! Contract Interfaces
//!
//! Each contract kind carries its declared function surface as a static
//! signature table. Selectors are derived from these tables at run time
//! without inspecting deployed code.

use alloy_primitives::Selector;
use loupebench_core::selector_of;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `IDiamondCut.diamondCut` signature
pub(crate) const DIAMOND_CUT: &str = "diamondCut((address,uint8,bytes4[])[],address,bytes)";

pub(crate) const FACETS: &str = "facets()";
pub(crate) const FACET_FUNCTION_SELECTORS: &str = "facetFunctionSelectors(address)";
pub(crate) const FACET_ADDRESSES: &str = "facetAddresses()";
pub(crate) const FACET_ADDRESS: &str = "facetAddress(bytes4)";
pub(crate) const SUPPORTS_INTERFACE: &str = "supportsInterface(bytes4)";

const REGISTRAR_SURFACE: &[&str] = &[DIAMOND_CUT];

const LOUPE_SURFACE: &[&str] = &[
    FACETS,
    FACET_FUNCTION_SELECTORS,
    FACET_ADDRESSES,
    FACET_ADDRESS,
    SUPPORTS_INTERFACE,
];

const CONTENT_SURFACE: &[&str] = &["func1()", "func2()", "func3()", "func4()", "func5()"];

/// Which of the two competing introspection implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoupeVariant {
    /// Reference implementation, used as the gas baseline
    Old,
    /// Candidate implementation being evaluated
    New,
}

impl LoupeVariant {
    /// Both variants, baseline first
    pub const ALL: [LoupeVariant; 2] = [LoupeVariant::Old, LoupeVariant::New];

    /// Label used in the report's `Function` column
    pub fn label(self) -> &'static str {
        match self {
            LoupeVariant::Old => "OldFacet",
            LoupeVariant::New => "NewFacet",
        }
    }
}

impl fmt::Display for LoupeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kinds of contract the benchmark deploys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    /// Central dispatcher routing calls by selector
    Dispatcher,
    /// Facet exposing the cut-registration entrypoint
    Registrar,
    /// Content facet carrying benchmark selectors
    ContentFacet,
    /// Introspection facet
    Loupe(LoupeVariant),
}

impl ContractKind {
    /// Contract name as it appears in build artifacts
    pub fn name(self) -> &'static str {
        match self {
            ContractKind::Dispatcher => "Diamond",
            ContractKind::Registrar => "DiamondCutFacet",
            ContractKind::ContentFacet => "DummyFacet",
            ContractKind::Loupe(LoupeVariant::Old) => "DiamondLoupeFacet_Old",
            ContractKind::Loupe(LoupeVariant::New) => "DiamondLoupeFacet_New",
        }
    }

    /// Declared external function signatures, in interface order
    pub fn signatures(self) -> &'static [&'static str] {
        match self {
            ContractKind::Dispatcher => &[],
            ContractKind::Registrar => REGISTRAR_SURFACE,
            ContractKind::ContentFacet => CONTENT_SURFACE,
            ContractKind::Loupe(_) => LOUPE_SURFACE,
        }
    }

    /// Declared selectors, in interface order
    pub fn function_selectors(self) -> Vec<Selector> {
        self.signatures().iter().map(|sig| selector_of(sig)).collect()
    }

    /// Runtime code size in bytes, used for deployment gas
    pub(crate) fn code_size(self) -> u64 {
        match self {
            ContractKind::Dispatcher => 1_450,
            ContractKind::Registrar => 3_900,
            ContractKind::ContentFacet => 420,
            ContractKind::Loupe(LoupeVariant::Old) => 2_750,
            ContractKind::Loupe(LoupeVariant::New) => 3_100,
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//! Gas Schedule
//!
//! Deterministic cost model for the simulated chain. Constants follow the
//! post-Berlin schedule (cold/warm access split); execution cost of the two
//! loupe variants is modeled from their loop and allocation structure:
//!
//! - **Old** allocates every per-facet selector array at full selector-count
//!   size and finds a selector's facet by scanning the facets seen so far,
//!   so memory and compute both grow with `selectors × facets`.
//! - **New** counts per-facet selectors first and allocates exact sizes, and
//!   looks up a selector's facet position through an index mapping.

use crate::call::Call;
use crate::diamond::DiamondStorage;
use crate::interface::{ContractKind, LoupeVariant};
use loupebench_core::FacetCutAction;

/// Default block gas limit (matches a local development node)
pub const DEFAULT_BLOCK_GAS_LIMIT: u64 = 30_000_000;

/// Gas constants used by the simulated chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasSchedule {
    /// Intrinsic cost of any transaction
    pub tx_base: u64,
    /// Additional intrinsic cost of contract creation
    pub create_base: u64,
    /// Cost per byte of deployed code
    pub code_deposit_per_byte: u64,
    /// Cost per (non-zero) calldata byte
    pub calldata_per_byte: u64,
    /// Cold storage read
    pub sload_cold: u64,
    /// Warm storage read
    pub sload_warm: u64,
    /// Storage write, zero to non-zero, cold
    pub sstore_set: u64,
    /// Storage write, non-zero to non-zero
    pub sstore_reset: u64,
    /// Cold account access for the delegatecall hop
    pub delegatecall_cold: u64,
    /// Linear memory cost per 32-byte word
    pub memory_word: u64,
    /// Quadratic memory divisor
    pub memory_quad_divisor: u64,
    /// One iteration of a comparison loop
    pub loop_step: u64,
}

impl Default for GasSchedule {
    fn default() -> Self {
        Self {
            tx_base: 21_000,
            create_base: 32_000,
            code_deposit_per_byte: 200,
            calldata_per_byte: 16,
            sload_cold: 2_100,
            sload_warm: 100,
            sstore_set: 22_100,
            sstore_reset: 5_000,
            delegatecall_cold: 2_600,
            memory_word: 3,
            memory_quad_divisor: 512,
            loop_step: 45,
        }
    }
}

impl GasSchedule {
    /// Memory expansion cost for `words` 32-byte words, saturating at `u64::MAX`
    pub fn memory_cost(&self, words: u64) -> u64 {
        let quadratic =
            u128::from(words) * u128::from(words) / u128::from(self.memory_quad_divisor.max(1));
        let linear = u128::from(self.memory_word) * u128::from(words);
        u64::try_from(linear + quadratic).unwrap_or(u64::MAX)
    }

    /// Total gas for deploying `kind`
    pub fn deployment(&self, kind: ContractKind) -> u64 {
        let init = match kind {
            // constructor registers the registrar's selector
            ContractKind::Dispatcher => 2 * self.sstore_set,
            _ => 0,
        };
        self.tx_base + self.create_base + kind.code_size() * self.code_deposit_per_byte + init
    }

    /// Intrinsic cost of sending `call`
    pub fn intrinsic(&self, call: &Call) -> u64 {
        self.tx_base
            .saturating_add(call.calldata_len().saturating_mul(self.calldata_per_byte))
    }

    /// Dispatcher fallback: selector lookup plus delegatecall hop
    pub fn dispatch(&self) -> u64 {
        self.sload_cold + self.delegatecall_cold
    }

    /// Execution cost of a `diamondCut` against the current storage.
    ///
    /// Adds write a route slot and, every eighth selector, a packed selector
    /// slot; a facet's first selector also pushes the facet address.
    pub fn cut_execution(&self, storage: &DiamondStorage, call: &Call) -> u64 {
        let Call::DiamondCut { cut, .. } = call else {
            return 0;
        };

        let mut gas = 0u64;
        for entry in cut {
            let selectors = entry.function_selectors.len() as u64;
            let entry_gas = match entry.action {
                FacetCutAction::Add => {
                    let new_facet = storage
                        .facet_function_selectors(&entry.facet_address)
                        .is_empty();
                    let push = if new_facet { self.sstore_set } else { 0 };
                    saturating_total(&[
                        push,
                        selectors.saturating_mul(self.sload_cold + self.sstore_set),
                        selectors.div_ceil(8).saturating_mul(self.sstore_reset),
                    ])
                }
                FacetCutAction::Replace => {
                    selectors.saturating_mul(self.sload_cold + self.sstore_reset)
                }
                FacetCutAction::Remove => {
                    selectors.saturating_mul(self.sload_cold + 2 * self.sstore_reset)
                }
            };
            gas = gas
                .saturating_add(self.sload_cold)
                .saturating_add(entry_gas);
        }
        gas
    }

    /// Execution cost of a loupe call served by `variant` over `storage`
    pub fn loupe_execution(
        &self,
        variant: LoupeVariant,
        storage: &DiamondStorage,
        call: &Call,
    ) -> u64 {
        let s = storage.selector_count() as u64;
        let f = storage.facet_count() as u64;
        // packed selector slots (8 selectors per slot) plus the count slot
        let selector_slots = s.div_ceil(8) + 1;
        let slot_reads = selector_slots.saturating_mul(self.sload_cold);

        let parts: [u64; 3] = match (variant, call) {
            (LoupeVariant::Old, Call::Facets) => {
                // facets_[selectorCount], per-facet bytes4[selectorCount], counters
                let words = f
                    .saturating_mul(s.saturating_add(1))
                    .saturating_add(s.saturating_mul(4))
                    .saturating_add(2);
                [
                    slot_reads.saturating_add(s.saturating_mul(self.sload_cold)),
                    self.facet_scan(s, f),
                    self.memory_cost(words),
                ]
            }
            (LoupeVariant::New, Call::Facets) => {
                let words = f.saturating_mul(4).saturating_add(s).saturating_add(2);
                [
                    slot_reads.saturating_add(s.saturating_mul(self.sload_cold + self.sload_warm)),
                    // count pass and fill pass
                    s.saturating_mul(2 * self.loop_step),
                    self.memory_cost(words),
                ]
            }
            (LoupeVariant::Old, Call::FacetAddresses) => [
                slot_reads.saturating_add(s.saturating_mul(self.sload_cold)),
                self.facet_scan(s, f),
                self.memory_cost(s.saturating_add(2)),
            ],
            (LoupeVariant::New, Call::FacetAddresses) => [
                f.saturating_add(1).saturating_mul(self.sload_cold),
                f.saturating_mul(self.loop_step),
                self.memory_cost(f.saturating_add(2)),
            ],
            (LoupeVariant::Old, Call::FacetFunctionSelectors(_)) => [
                slot_reads.saturating_add(s.saturating_mul(self.sload_cold)),
                s.saturating_mul(self.loop_step),
                self.memory_cost(s.saturating_add(2)),
            ],
            (LoupeVariant::New, Call::FacetFunctionSelectors(facet)) => {
                let n = storage.facet_function_selectors(facet).len() as u64;
                [
                    (n.div_ceil(8) + 2).saturating_mul(self.sload_cold),
                    n.saturating_mul(self.loop_step),
                    self.memory_cost(n.saturating_add(2)),
                ]
            }
            (_, Call::FacetAddress(_)) | (_, Call::SupportsInterface(_)) => {
                [self.sload_cold, self.memory_cost(1), 0]
            }
            _ => [0; 3],
        };
        saturating_total(&parts)
    }

    /// Old's linear search over the facets collected so far, once per selector
    fn facet_scan(&self, selectors: u64, facets: u64) -> u64 {
        selectors
            .saturating_mul(facets.div_ceil(2).max(1))
            .saturating_mul(self.loop_step)
    }
}

/// Sum of gas components, saturating at `u64::MAX` so oversized work is
/// rejected by the block gas limit instead of wrapping.
pub(crate) fn saturating_total(parts: &[u64]) -> u64 {
    parts.iter().copied().fold(0, u64::saturating_add)
}

//! Selector Derivation
//!
//! A selector is the first four bytes of the keccak-256 hash of a function
//! signature (or, for synthetic content selectors, of a unique name).

use alloy_primitives::{Selector, keccak256};

/// Derive the 4-byte selector for a signature or synthetic name.
pub fn selector_of(text: &str) -> Selector {
    let hash = keccak256(text.as_bytes());
    Selector::from_slice(&hash[..4])
}

/// Derive selectors for a list of signatures, preserving order.
pub fn selectors_of(signatures: &[&str]) -> Vec<Selector> {
    signatures.iter().map(|sig| selector_of(sig)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_selectors() {
        // Well-known ERC-20 and EIP-2535 selectors
        assert_eq!(selector_of("transfer(address,uint256)").0, [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector_of("facets()").0, [0x7a, 0x0e, 0xd6, 0x27]);
        assert_eq!(
            selector_of("diamondCut((address,uint8,bytes4[])[],address,bytes)").0,
            [0x1f, 0x93, 0x1c, 0x1c]
        );
    }

    #[test]
    fn test_selectors_of_preserves_order() {
        let sels = selectors_of(&["facets()", "facetAddresses()"]);
        assert_eq!(sels.len(), 2);
        assert_eq!(sels[0], selector_of("facets()"));
        assert_eq!(sels[1], selector_of("facetAddresses()"));
    }
}

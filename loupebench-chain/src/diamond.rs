//! Dispatcher Storage
//!
//! Selector-to-facet bookkeeping of a simulated dispatcher. Cut validation
//! follows the usual `LibDiamond` rules: adds must be new, replaces must
//! exist and change the facet, removes must exist and carry a zero facet
//! address, and no entry may be empty. A cut is all-or-nothing.

use crate::call::FacetInfo;
use alloy_primitives::{Address, Selector};
use loupebench_core::{FacetCut, FacetCutAction};
use std::collections::HashMap;

/// Selector routing table of one dispatcher
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiamondStorage {
    /// selector -> facet
    routes: HashMap<Selector, Address>,
    /// Facets in first-registration order, each with its selectors in order
    facets: Vec<(Address, Vec<Selector>)>,
}

impl DiamondStorage {
    /// Facet currently serving `selector`
    pub fn facet_of(&self, selector: &Selector) -> Option<Address> {
        self.routes.get(selector).copied()
    }

    /// Number of routed selectors
    pub fn selector_count(&self) -> usize {
        self.routes.len()
    }

    /// Number of facets with at least one routed selector
    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    /// Full selector-to-facet mapping
    pub fn routes(&self) -> &HashMap<Selector, Address> {
        &self.routes
    }

    /// `facets()` view
    pub fn facets(&self) -> Vec<FacetInfo> {
        self.facets
            .iter()
            .map(|(address, selectors)| FacetInfo {
                facet_address: *address,
                function_selectors: selectors.clone(),
            })
            .collect()
    }

    /// `facetFunctionSelectors(address)` view
    pub fn facet_function_selectors(&self, facet: &Address) -> Vec<Selector> {
        self.facets
            .iter()
            .find(|(address, _)| address == facet)
            .map(|(_, selectors)| selectors.clone())
            .unwrap_or_default()
    }

    /// `facetAddresses()` view
    pub fn facet_addresses(&self) -> Vec<Address> {
        self.facets.iter().map(|(address, _)| *address).collect()
    }

    /// Apply a cut atomically.
    ///
    /// `has_code` reports whether an address holds a deployed contract.
    pub(crate) fn apply_cut(
        &mut self,
        cut: &[FacetCut],
        has_code: impl Fn(&Address) -> bool,
    ) -> Result<(), String> {
        let mut next = self.clone();
        for entry in cut {
            next.apply_entry(entry, &has_code)?;
        }
        *self = next;
        Ok(())
    }

    fn apply_entry(
        &mut self,
        entry: &FacetCut,
        has_code: &impl Fn(&Address) -> bool,
    ) -> Result<(), String> {
        if entry.function_selectors.is_empty() {
            return Err("LibDiamondCut: No selectors in facet to cut".to_string());
        }

        match entry.action {
            FacetCutAction::Add => {
                self.require_facet(&entry.facet_address, "Add", has_code)?;
                for selector in &entry.function_selectors {
                    if self.routes.contains_key(selector) {
                        return Err(format!(
                            "LibDiamondCut: Can't add function that already exists ({})",
                            selector
                        ));
                    }
                    self.route(*selector, entry.facet_address);
                }
            }
            FacetCutAction::Replace => {
                self.require_facet(&entry.facet_address, "Replace", has_code)?;
                for selector in &entry.function_selectors {
                    match self.routes.get(selector) {
                        None => {
                            return Err(format!(
                                "LibDiamondCut: Can't replace function that doesn't exist ({})",
                                selector
                            ));
                        }
                        Some(current) if *current == entry.facet_address => {
                            return Err(format!(
                                "LibDiamondCut: Can't replace function with same function ({})",
                                selector
                            ));
                        }
                        Some(_) => {}
                    }
                    self.unroute(selector);
                    self.route(*selector, entry.facet_address);
                }
            }
            FacetCutAction::Remove => {
                if entry.facet_address != Address::ZERO {
                    return Err(
                        "LibDiamondCut: Remove facet address must be address(0)".to_string(),
                    );
                }
                for selector in &entry.function_selectors {
                    if !self.routes.contains_key(selector) {
                        return Err(format!(
                            "LibDiamondCut: Can't remove function that doesn't exist ({})",
                            selector
                        ));
                    }
                    self.unroute(selector);
                }
            }
        }
        Ok(())
    }

    fn require_facet(
        &self,
        facet: &Address,
        action: &str,
        has_code: &impl Fn(&Address) -> bool,
    ) -> Result<(), String> {
        if *facet == Address::ZERO {
            return Err(format!("LibDiamondCut: {} facet can't be address(0)", action));
        }
        if !has_code(facet) {
            return Err(format!("LibDiamondCut: {} facet has no code", action));
        }
        Ok(())
    }

    fn route(&mut self, selector: Selector, facet: Address) {
        self.routes.insert(selector, facet);
        match self.facets.iter_mut().find(|(address, _)| *address == facet) {
            Some((_, selectors)) => selectors.push(selector),
            None => self.facets.push((facet, vec![selector])),
        }
    }

    fn unroute(&mut self, selector: &Selector) {
        let Some(facet) = self.routes.remove(selector) else {
            return;
        };
        if let Some(pos) = self.facets.iter().position(|(address, _)| *address == facet) {
            let selectors = &mut self.facets[pos].1;
            selectors.retain(|s| s != selector);
            if selectors.is_empty() {
                self.facets.remove(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(n: u8) -> Selector {
        Selector::repeat_byte(n)
    }

    fn facet(n: u8) -> Address {
        Address::repeat_byte(n)
    }

    fn any_code(_: &Address) -> bool {
        true
    }

    #[test]
    fn test_add_and_views() {
        let mut ds = DiamondStorage::default();
        ds.apply_cut(
            &[
                FacetCut::add(facet(1), vec![sel(1), sel(2)]),
                FacetCut::add(facet(2), vec![sel(3)]),
            ],
            any_code,
        )
        .unwrap();

        assert_eq!(ds.selector_count(), 3);
        assert_eq!(ds.facet_addresses(), vec![facet(1), facet(2)]);
        assert_eq!(ds.facet_function_selectors(&facet(1)), vec![sel(1), sel(2)]);
        assert_eq!(ds.facet_of(&sel(3)), Some(facet(2)));
        assert!(ds.facet_function_selectors(&facet(9)).is_empty());
    }

    #[test]
    fn test_duplicate_add_reverts_whole_cut() {
        let mut ds = DiamondStorage::default();
        let err = ds
            .apply_cut(
                &[
                    FacetCut::add(facet(1), vec![sel(1)]),
                    FacetCut::add(facet(2), vec![sel(1)]),
                ],
                any_code,
            )
            .unwrap_err();
        assert!(err.contains("already exists"));
        assert_eq!(ds.selector_count(), 0, "cut must be atomic");
    }

    #[test]
    fn test_replace_and_remove() {
        let mut ds = DiamondStorage::default();
        ds.apply_cut(&[FacetCut::add(facet(1), vec![sel(1), sel(2)])], any_code)
            .unwrap();
        ds.apply_cut(&[FacetCut::replace(facet(2), vec![sel(1)])], any_code)
            .unwrap();
        assert_eq!(ds.facet_of(&sel(1)), Some(facet(2)));
        assert_eq!(ds.facet_addresses(), vec![facet(1), facet(2)]);

        ds.apply_cut(&[FacetCut::remove(vec![sel(2)])], any_code)
            .unwrap();
        assert_eq!(ds.facet_addresses(), vec![facet(2)]);
        assert_eq!(ds.selector_count(), 1);
    }

    #[test]
    fn test_invalid_entries() {
        let mut ds = DiamondStorage::default();
        assert!(ds.apply_cut(&[FacetCut::add(facet(1), vec![])], any_code).is_err());
        assert!(ds.apply_cut(&[FacetCut::add(Address::ZERO, vec![sel(1)])], any_code).is_err());
        assert!(ds.apply_cut(&[FacetCut::add(facet(1), vec![sel(1)])], |_| false).is_err());
        assert!(ds.apply_cut(&[FacetCut::replace(facet(1), vec![sel(1)])], any_code).is_err());
        assert!(ds.apply_cut(&[FacetCut::remove(vec![sel(1)])], any_code).is_err());

        ds.apply_cut(&[FacetCut::add(facet(1), vec![sel(1)])], any_code)
            .unwrap();
        let same = ds.apply_cut(&[FacetCut::replace(facet(1), vec![sel(1)])], any_code);
        assert!(same.unwrap_err().contains("same function"));
        let mut bad_remove = FacetCut::remove(vec![sel(1)]);
        bad_remove.facet_address = facet(1);
        assert!(ds.apply_cut(&[bad_remove], any_code).is_err());
    }
}

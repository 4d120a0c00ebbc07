//! Selector Partitioning
//!
//! Spreads `total` content selectors over `facets` content facets:
//!
//! ```text
//! base      = total / facets
//! remainder = total % facets
//! facet i  -> base + 1 selectors   if i < remainder
//!          -> base     selectors   otherwise
//! ```
//!
//! Every selector is derived from the composite key `(facet, index)` through
//! the name `"{template}_{facet}_{index}"`, so the template pool may be much
//! smaller than the facet count without producing repeats. Truncated hashes
//! that still collide (with an earlier selector or a reserved one) are
//! re-salted until unique; the salt sequence is fixed, so output is
//! reproducible.

use crate::cut::FacetCut;
use crate::error::CoreError;
use crate::selector::selector_of;
use alloy_primitives::{Address, Selector};
use std::collections::HashSet;

/// Function names of the content facet's declared interface, used as name
/// templates for synthetic selectors.
pub const CONTENT_FACET_TEMPLATES: &[&str] = &["func1", "func2", "func3", "func4", "func5"];

/// Fallback template when the partitioner is built with an empty list
const FALLBACK_TEMPLATE: &str = "func";

/// Upper bound on eager allocation for caller-supplied facet counts
const PRESIZE_LIMIT: usize = 1024;

/// Selectors assigned to one facet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetSelectors {
    /// 0-based facet position
    pub facet_index: u32,
    /// Selectors in derivation order
    pub selectors: Vec<Selector>,
}

/// Complete assignment for one scenario, ordered by facet index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorAssignment {
    /// One entry per facet, including facets with no selectors
    pub facets: Vec<FacetSelectors>,
}

impl SelectorAssignment {
    /// Total number of selectors across all facets
    pub fn total_selectors(&self) -> usize {
        self.facets.iter().map(|f| f.selectors.len()).sum()
    }

    /// All selectors in facet order
    pub fn all_selectors(&self) -> impl Iterator<Item = &Selector> {
        self.facets.iter().flat_map(|f| f.selectors.iter())
    }

    /// Pair each facet's selectors with its deployed address as `Add` entries.
    ///
    /// Facets that received no selectors produce no entry: an empty cut entry
    /// registers nothing and the registrar rejects it.
    pub fn registration_entries(
        &self,
        facet_addresses: &[Address],
    ) -> Result<Vec<FacetCut>, CoreError> {
        if facet_addresses.len() != self.facets.len() {
            return Err(CoreError::InvalidConfiguration(format!(
                "{} facet addresses for {} assigned facets",
                facet_addresses.len(),
                self.facets.len()
            )));
        }

        Ok(self
            .facets
            .iter()
            .zip(facet_addresses)
            .filter(|(facet, _)| !facet.selectors.is_empty())
            .map(|(facet, address)| FacetCut::add(*address, facet.selectors.clone()))
            .collect())
    }
}

/// Number of selectors facet `index` receives under the remainder rule.
pub fn facet_share(total: u32, facets: u32, index: u32) -> u32 {
    if facets == 0 {
        return 0;
    }
    let base = total / facets;
    if index < total % facets { base + 1 } else { base }
}

/// Deterministic selector partitioner
#[derive(Debug, Clone)]
pub struct SelectorPartitioner {
    templates: Vec<String>,
    reserved: HashSet<Selector>,
}

impl Default for SelectorPartitioner {
    fn default() -> Self {
        Self::new(CONTENT_FACET_TEMPLATES.iter().copied())
    }
}

impl SelectorPartitioner {
    /// Create a partitioner over the given name templates
    pub fn new<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut templates: Vec<String> = templates.into_iter().map(Into::into).collect();
        if templates.is_empty() {
            templates.push(FALLBACK_TEMPLATE.to_string());
        }
        Self {
            templates,
            reserved: HashSet::new(),
        }
    }

    /// Selectors that must never be issued (registrar and loupe surfaces)
    pub fn with_reserved(mut self, reserved: impl IntoIterator<Item = Selector>) -> Self {
        self.reserved.extend(reserved);
        self
    }

    /// Partition `total_selectors` across `facet_count` facets.
    pub fn partition(
        &self,
        total_selectors: u32,
        facet_count: u32,
    ) -> Result<SelectorAssignment, CoreError> {
        if facet_count == 0 {
            return Err(CoreError::InvalidScenario(format!(
                "cannot partition {} selectors across zero facets",
                total_selectors
            )));
        }

        let mut issued: HashSet<Selector> = self.reserved.clone();
        let mut facets = Vec::with_capacity((facet_count as usize).min(PRESIZE_LIMIT));
        for facet_index in 0..facet_count {
            let share = facet_share(total_selectors, facet_count, facet_index);
            let selectors = (0..share)
                .map(|j| self.unique_selector(facet_index, j, &mut issued))
                .collect();
            facets.push(FacetSelectors {
                facet_index,
                selectors,
            });
        }

        Ok(SelectorAssignment { facets })
    }

    fn unique_selector(&self, facet: u32, index: u32, issued: &mut HashSet<Selector>) -> Selector {
        let template = &self.templates[index as usize % self.templates.len()];
        let name = format!("{}_{}_{}", template, facet, index);

        let mut selector = selector_of(&name);
        let mut salt = 0u32;
        while !issued.insert(selector) {
            salt += 1;
            selector = selector_of(&format!("{}#{}", name, salt));
        }
        selector
    }
}

/// Partition with the default content templates and no reserved selectors.
pub fn partition(total_selectors: u32, facet_count: u32) -> Result<SelectorAssignment, CoreError> {
    SelectorPartitioner::default().partition(total_selectors, facet_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(assignment: &SelectorAssignment, total: u32, facets: u32) {
        assert_eq!(assignment.facets.len(), facets as usize);
        assert_eq!(assignment.total_selectors(), total as usize);
        for (i, f) in assignment.facets.iter().enumerate() {
            assert_eq!(f.facet_index as usize, i);
        }
        let unique: HashSet<_> = assignment.all_selectors().collect();
        assert_eq!(unique.len(), total as usize, "duplicate selector issued");
    }

    #[test]
    fn test_even_split() {
        let a = partition(40, 20).unwrap();
        assert_well_formed(&a, 40, 20);
        assert!(a.facets.iter().all(|f| f.selectors.len() == 2));
    }

    #[test]
    fn test_remainder_goes_to_lowest_indices() {
        let a = partition(10, 4).unwrap();
        assert_well_formed(&a, 10, 4);
        let sizes: Vec<_> = a.facets.iter().map(|f| f.selectors.len()).collect();
        assert_eq!(sizes, vec![3, 3, 2, 2]);
    }

    #[test]
    fn test_remainder_property_grid() {
        for facets in 1..=17u32 {
            for total in [0u32, 1, 7, 16, 33, 64, 101] {
                let a = partition(total, facets).unwrap();
                assert_well_formed(&a, total, facets);

                let base = (total / facets) as usize;
                let bigger: Vec<_> = a
                    .facets
                    .iter()
                    .filter(|f| f.selectors.len() == base + 1)
                    .map(|f| f.facet_index)
                    .collect();
                let expected: Vec<u32> = (0..total % facets).collect();
                assert_eq!(bigger, expected, "total={total} facets={facets}");
            }
        }
    }

    #[test]
    fn test_more_facets_than_selectors() {
        let a = partition(3, 8).unwrap();
        assert_well_formed(&a, 3, 8);
        assert_eq!(a.facets[2].selectors.len(), 1);
        assert!(a.facets[3..].iter().all(|f| f.selectors.is_empty()));
    }

    #[test]
    fn test_facet_count_beyond_presize_limit() {
        let facets = PRESIZE_LIMIT as u32 * 5;
        let a = partition(3, facets).unwrap();
        assert_well_formed(&a, 3, facets);
        assert_eq!(a.facets.iter().filter(|f| !f.selectors.is_empty()).count(), 3);
    }

    #[test]
    fn test_zero_facets_is_invalid_scenario() {
        let err = partition(10, 0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidScenario(_)));
    }

    #[test]
    fn test_more_facets_than_templates_stays_unique() {
        let p = SelectorPartitioner::new(["only"]);
        let a = p.partition(1000, 84).unwrap();
        assert_well_formed(&a, 1000, 84);
    }

    #[test]
    fn test_empty_templates_fall_back() {
        let p = SelectorPartitioner::new(Vec::<String>::new());
        let a = p.partition(5, 2).unwrap();
        assert_well_formed(&a, 5, 2);
        assert_eq!(a.facets[0].selectors[0], selector_of("func_0_0"));
    }

    #[test]
    fn test_is_reproducible() {
        assert_eq!(partition(504, 42).unwrap(), partition(504, 42).unwrap());
    }

    #[test]
    fn test_derives_from_composite_key() {
        let a = partition(4, 2).unwrap();
        assert_eq!(a.facets[0].selectors[0], selector_of("func1_0_0"));
        assert_eq!(a.facets[0].selectors[1], selector_of("func2_0_1"));
        assert_eq!(a.facets[1].selectors[0], selector_of("func1_1_0"));
    }

    #[test]
    fn test_reserved_selectors_are_skipped() {
        let clash = selector_of("func1_0_0");
        let a = SelectorPartitioner::default()
            .with_reserved([clash])
            .partition(1, 1)
            .unwrap();
        assert_ne!(a.facets[0].selectors[0], clash);
        assert_eq!(a.facets[0].selectors[0], selector_of("func1_0_0#1"));
    }

    #[test]
    fn test_registration_entries_skip_empty_facets() {
        let a = partition(3, 5).unwrap();
        let addrs: Vec<Address> = (1..=5u8).map(|b| Address::repeat_byte(b)).collect();
        let cuts = a.registration_entries(&addrs).unwrap();
        assert_eq!(cuts.len(), 3);
        assert_eq!(cuts[2].facet_address, Address::repeat_byte(3));

        let err = a.registration_entries(&addrs[..2]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_facet_share() {
        assert_eq!(facet_share(10, 4, 0), 3);
        assert_eq!(facet_share(10, 4, 3), 2);
        assert_eq!(facet_share(10, 0, 0), 0);
    }
}

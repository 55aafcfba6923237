//! Which generated combinations the user wants turned into ads.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::identity::CombinationId;
use crate::types::{AdCombination, CombinationSet};

/// Included vs. total count for UI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    pub included: usize,
    pub total: usize,
}

impl SelectionSummary {
    pub fn all_included(&self) -> bool {
        self.included == self.total
    }

    pub fn none_included(&self) -> bool {
        self.included == 0
    }
}

/// The included-combination set, bound to the generation it was built for.
///
/// Every included id is a member of the bound generation.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    generation: Arc<CombinationSet>,
    included: HashSet<CombinationId>,
}

impl SelectionState {
    /// Start with every combination of `generation` included.
    pub fn new(generation: Arc<CombinationSet>) -> Self {
        let included = generation.ids().cloned().collect();
        Self {
            generation,
            included,
        }
    }

    /// Rebind to a freshly generated set; everything in it becomes included.
    /// Exclusions made against the previous generation are dropped.
    pub fn reset(&mut self, generation: Arc<CombinationSet>) {
        *self = Self::new(generation);
    }

    pub fn generation(&self) -> &Arc<CombinationSet> {
        &self.generation
    }

    /// Flip one combination in or out. Ids outside the current generation are
    /// ignored. Returns whether anything changed.
    pub fn toggle(&mut self, id: &CombinationId) -> bool {
        let Some(combo) = self.generation.get(id) else {
            debug!(%id, "ignoring toggle of combination outside current generation");
            return false;
        };
        let included = !self.included.remove(&combo.id);
        if included {
            self.included.insert(combo.id.clone());
        }
        debug!(
            creative_id = %combo.creative_id,
            headline_id = %combo.headline_id,
            primary_id = %combo.primary_id,
            description_id = %combo.description_id,
            included,
            "toggled combination"
        );
        true
    }

    pub fn select_all(&mut self) {
        self.included = self.generation.ids().cloned().collect();
    }

    pub fn deselect_all(&mut self) {
        self.included.clear();
    }

    pub fn is_included(&self, id: &CombinationId) -> bool {
        self.included.contains(id)
    }

    pub fn included_ids(&self) -> &HashSet<CombinationId> {
        &self.included
    }

    /// Included combinations in generation order.
    pub fn included_combinations(&self) -> impl Iterator<Item = &AdCombination> {
        self.generation
            .iter()
            .filter(move |combo| self.included.contains(&combo.id))
    }

    pub fn summary(&self) -> SelectionSummary {
        SelectionSummary {
            included: self.included.len(),
            total: self.generation.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_combinations;
    use adcraft_core::types::ItemId;

    fn generation(creatives: usize, descriptions: usize) -> Arc<CombinationSet> {
        let c: Vec<ItemId> = (1..=creatives).map(|i| ItemId::new(format!("c{i}"))).collect();
        let d: Vec<ItemId> = (1..=descriptions).map(|i| ItemId::new(format!("d{i}"))).collect();
        Arc::new(CombinationSet::new(generate_combinations(
            &c,
            &[ItemId::from("h1")],
            &[ItemId::from("p1")],
            &d,
        )))
    }

    #[test]
    fn test_new_generation_is_fully_included() {
        let state = SelectionState::new(generation(2, 3));
        assert_eq!(state.summary(), SelectionSummary { included: 6, total: 6 });
        assert!(state.summary().all_included());
    }

    #[test]
    fn test_toggle_flips_membership() {
        let g = generation(2, 2);
        let target = g.as_slice()[1].id.clone();
        let mut state = SelectionState::new(g);

        assert!(state.toggle(&target));
        assert!(!state.is_included(&target));
        assert_eq!(state.summary().included, 3);

        assert!(state.toggle(&target));
        assert!(state.is_included(&target));
        assert_eq!(state.summary().included, 4);
    }

    #[test]
    fn test_reset_replaces_stale_subset() {
        let g1 = generation(2, 2);
        let mut state = SelectionState::new(g1.clone());
        state.toggle(&g1.as_slice()[0].id.clone());
        state.toggle(&g1.as_slice()[3].id.clone());
        assert_eq!(state.summary().included, 2);

        let g2 = generation(3, 2);
        state.reset(g2.clone());
        let expected: HashSet<_> = g2.ids().cloned().collect();
        assert_eq!(state.included_ids(), &expected);
        assert_eq!(state.summary(), SelectionSummary { included: 6, total: 6 });
    }

    #[test]
    fn test_stale_toggle_is_noop() {
        let g1 = generation(3, 1);
        let stale = g1.as_slice()[2].id.clone();
        let mut state = SelectionState::new(g1);

        state.reset(generation(2, 1));
        let before = state.included_ids().clone();
        assert!(!state.toggle(&stale));
        assert_eq!(state.included_ids(), &before);
        assert!(!state.is_included(&stale));
        assert_eq!(state.summary(), SelectionSummary { included: 2, total: 2 });
    }

    #[test]
    fn test_select_and_deselect_all() {
        let mut state = SelectionState::new(generation(2, 2));
        state.deselect_all();
        assert!(state.summary().none_included());
        assert_eq!(state.included_combinations().count(), 0);

        state.select_all();
        assert!(state.summary().all_included());
    }

    #[test]
    fn test_included_combinations_keep_generation_order() {
        let g = generation(1, 4);
        let mut state = SelectionState::new(g.clone());
        state.toggle(&g.as_slice()[1].id.clone());

        let order: Vec<_> = state
            .included_combinations()
            .map(|c| c.description_id.as_str())
            .collect();
        assert_eq!(order, vec!["d1", "d3", "d4"]);
    }

    #[test]
    fn test_toggle_accepts_independently_derived_id() {
        let g = generation(2, 2);
        let mut state = SelectionState::new(g);
        let id = CombinationId::derive(
            &ItemId::from("c2"),
            &ItemId::from("h1"),
            &ItemId::from("p1"),
            &ItemId::from("d1"),
        );

        assert!(state.toggle(&id));
        assert!(!state.is_included(&id));
        assert_eq!(state.summary(), SelectionSummary { included: 3, total: 4 });

        let foreign = CombinationId::derive(
            &ItemId::from("c3"),
            &ItemId::from("h1"),
            &ItemId::from("p1"),
            &ItemId::from("d1"),
        );
        assert!(!state.toggle(&foreign));
        assert_eq!(state.summary().included, 3);
    }

    #[test]
    fn test_empty_generation() {
        let state = SelectionState::default();
        assert_eq!(state.summary(), SelectionSummary { included: 0, total: 0 });
    }
}

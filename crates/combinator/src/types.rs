use std::collections::HashMap;

use adcraft_core::types::ItemId;
use serde::{Deserialize, Serialize};

use crate::identity::CombinationId;

/// One creative paired with one headline, one primary text and one description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdCombination {
    pub id: CombinationId,
    pub creative_id: ItemId,
    pub headline_id: ItemId,
    pub primary_id: ItemId,
    pub description_id: ItemId,
}

impl AdCombination {
    pub fn new(
        creative_id: ItemId,
        headline_id: ItemId,
        primary_id: ItemId,
        description_id: ItemId,
    ) -> Self {
        let id = CombinationId::derive(&creative_id, &headline_id, &primary_id, &description_id);
        Self {
            id,
            creative_id,
            headline_id,
            primary_id,
            description_id,
        }
    }
}

/// The full, ordered output of one generation plus an id index.
///
/// Never mutated after construction; a changed selection produces a new set.
#[derive(Debug, Clone, Default)]
pub struct CombinationSet {
    combinations: Vec<AdCombination>,
    index: HashMap<CombinationId, usize>,
}

impl CombinationSet {
    pub fn new(combinations: Vec<AdCombination>) -> Self {
        let index = combinations
            .iter()
            .enumerate()
            .map(|(pos, combo)| (combo.id.clone(), pos))
            .collect();
        Self {
            combinations,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    pub fn as_slice(&self) -> &[AdCombination] {
        &self.combinations
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdCombination> {
        self.combinations.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &CombinationId> {
        self.combinations.iter().map(|c| &c.id)
    }

    pub fn get(&self, id: &CombinationId) -> Option<&AdCombination> {
        self.index.get(id).map(|&pos| &self.combinations[pos])
    }

    /// The first `count` combinations in generation order, clamped to the set size.
    pub fn prefix(&self, count: usize) -> &[AdCombination] {
        &self.combinations[..count.min(self.combinations.len())]
    }
}

impl PartialEq for CombinationSet {
    fn eq(&self, other: &Self) -> bool {
        self.combinations == other.combinations
    }
}

impl Eq for CombinationSet {}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo(c: &str, d: &str) -> AdCombination {
        AdCombination::new(c.into(), "h".into(), "p".into(), d.into())
    }

    #[test]
    fn test_lookup_and_prefix() {
        let set = CombinationSet::new(vec![
            combo("c1", "d1"),
            combo("c1", "d2"),
            combo("c2", "d1"),
        ]);
        assert_eq!(set.len(), 3);

        let second = set.as_slice()[1].id.clone();
        assert!(set.get(&second).is_some());
        assert_eq!(set.get(&second).unwrap().description_id.as_str(), "d2");

        assert_eq!(set.prefix(2).len(), 2);
        assert_eq!(set.prefix(10).len(), 3);
        assert!(set.prefix(0).is_empty());
    }

    #[test]
    fn test_unknown_id_is_absent() {
        let set = CombinationSet::new(vec![combo("c1", "d1")]);
        let other = combo("c9", "d9").id;
        assert!(set.get(&other).is_none());
    }
}

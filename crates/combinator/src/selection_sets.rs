//! The four per-flavor pools of chosen item ids.

use std::collections::HashSet;

use adcraft_core::types::{ItemFlavor, ItemId};

use crate::generator::generate_combinations;
use crate::types::CombinationSet;

/// Insertion-ordered set of item ids chosen within one flavor.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    ids: Vec<ItemId>,
    members: HashSet<ItemId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` at the end. Returns `false` if it was already selected.
    pub fn add(&mut self, id: ItemId) -> bool {
        if !self.members.insert(id.clone()) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Returns `false` if `id` was not selected.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        if !self.members.remove(id) {
            return false;
        }
        self.ids.retain(|existing| existing != id);
        true
    }

    /// Replace the whole set, keeping the first occurrence of any repeated id.
    pub fn replace<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ItemId>,
    {
        self.clear();
        for id in ids {
            self.add(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.members.clear();
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.members.contains(id)
    }

    pub fn as_slice(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl PartialEq for SelectionSet {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids
    }
}

impl Eq for SelectionSet {}

impl FromIterator<ItemId> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = ItemId>>(iter: T) -> Self {
        let mut set = SelectionSet::new();
        set.replace(iter);
        set
    }
}

/// One selection set per flavor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSets {
    pub creatives: SelectionSet,
    pub headlines: SelectionSet,
    pub primary_texts: SelectionSet,
    pub descriptions: SelectionSet,
}

impl SelectionSets {
    pub fn get(&self, flavor: ItemFlavor) -> &SelectionSet {
        match flavor {
            ItemFlavor::Creative => &self.creatives,
            ItemFlavor::Headline => &self.headlines,
            ItemFlavor::PrimaryText => &self.primary_texts,
            ItemFlavor::Description => &self.descriptions,
        }
    }

    pub fn get_mut(&mut self, flavor: ItemFlavor) -> &mut SelectionSet {
        match flavor {
            ItemFlavor::Creative => &mut self.creatives,
            ItemFlavor::Headline => &mut self.headlines,
            ItemFlavor::PrimaryText => &mut self.primary_texts,
            ItemFlavor::Description => &mut self.descriptions,
        }
    }

    /// Flavors with nothing selected yet.
    pub fn missing(&self) -> Vec<ItemFlavor> {
        ItemFlavor::ALL
            .into_iter()
            .filter(|flavor| self.get(*flavor).is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Run the generator over the current sets.
    pub fn generate(&self) -> CombinationSet {
        CombinationSet::new(generate_combinations(
            self.creatives.as_slice(),
            self.headlines.as_slice(),
            self.primary_texts.as_slice(),
            self.descriptions.as_slice(),
        ))
    }
}

//! Ad builder session: owns the selection sets and keeps the combination set,
//! included set, preview state and visible window in step with them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use adcraft_core::config::PreviewConfig;
use adcraft_core::error::{AdcraftError, AdcraftResult};
use adcraft_core::types::{CommitContext, ItemFlavor, ItemId};
use tracing::{debug, info, warn};

use crate::catalog::{CatalogSnapshot, PublicUrlResolver};
use crate::commit::{commit, AdRecordSink, CommitOutcome};
use crate::disclosure::{DisclosureController, PreviewState};
use crate::identity::CombinationId;
use crate::preview::{build_preview_cards, PreviewCard};
use crate::selection::{SelectionState, SelectionSummary};
use crate::selection_sets::{SelectionSet, SelectionSets};
use crate::types::{AdCombination, CombinationSet};
use crate::window::VisibleWindow;

#[derive(Debug)]
pub struct AdBuilderSession {
    selections: SelectionSets,
    combinations: Arc<CombinationSet>,
    selection: SelectionState,
    disclosure: DisclosureController,
    window: VisibleWindow,
    commit_in_flight: AtomicBool,
}

impl AdBuilderSession {
    pub fn new(config: &PreviewConfig) -> Self {
        let mut window = VisibleWindow::new(config.page_size);
        window.reset(0);
        Self {
            selections: SelectionSets::default(),
            combinations: Arc::new(CombinationSet::default()),
            selection: SelectionState::default(),
            disclosure: DisclosureController::new(config.auto_preview_limit),
            window,
            commit_in_flight: AtomicBool::new(false),
        }
    }

    // ─── Selection sets ────────────────────────────────────────────────────

    pub fn selections(&self) -> &SelectionSets {
        &self.selections
    }

    pub fn selection_set(&self, flavor: ItemFlavor) -> &SelectionSet {
        self.selections.get(flavor)
    }

    pub fn add_item(&mut self, flavor: ItemFlavor, id: ItemId) -> bool {
        let changed = self.selections.get_mut(flavor).add(id);
        if changed {
            self.regenerate();
        }
        changed
    }

    pub fn remove_item(&mut self, flavor: ItemFlavor, id: &ItemId) -> bool {
        let changed = self.selections.get_mut(flavor).remove(id);
        if changed {
            self.regenerate();
        }
        changed
    }

    pub fn replace_items<I>(&mut self, flavor: ItemFlavor, ids: I)
    where
        I: IntoIterator<Item = ItemId>,
    {
        self.selections.get_mut(flavor).replace(ids);
        self.regenerate();
    }

    pub fn clear_items(&mut self, flavor: ItemFlavor) {
        self.selections.get_mut(flavor).clear();
        self.regenerate();
    }

    /// Recompute the combination set from the current selection sets.
    ///
    /// When the output differs from the current generation it replaces it,
    /// every combination becomes included, the window restarts at one page and
    /// the preview policy is re-evaluated. Returns whether that happened.
    pub fn regenerate(&mut self) -> bool {
        let next = self.selections.generate();
        if next == *self.combinations {
            debug!(count = next.len(), "regenerated combinations unchanged");
            return false;
        }

        let next = Arc::new(next);
        let total = next.len();
        self.selection.reset(next.clone());
        self.window.reset(total);
        let state = self.disclosure.observe(total);
        self.combinations = next;

        info!(
            total,
            missing = ?self.selections.missing(),
            preview = ?state,
            "combination set replaced"
        );
        true
    }

    // ─── Combinations & inclusion ──────────────────────────────────────────

    pub fn combinations(&self) -> &Arc<CombinationSet> {
        &self.combinations
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn toggle(&mut self, id: &CombinationId) -> bool {
        self.selection.toggle(id)
    }

    pub fn select_all(&mut self) {
        self.selection.select_all();
    }

    pub fn deselect_all(&mut self) {
        self.selection.deselect_all();
    }

    pub fn summary(&self) -> SelectionSummary {
        self.selection.summary()
    }

    // ─── Preview ───────────────────────────────────────────────────────────

    pub fn preview_state(&self) -> PreviewState {
        self.disclosure.state()
    }

    pub fn request_preview(&mut self) -> PreviewState {
        self.disclosure.request_preview()
    }

    pub fn dismiss_preview(&mut self) -> PreviewState {
        self.disclosure.dismiss()
    }

    /// The end-of-list sentinel came near the viewport. Ignored while the
    /// preview is hidden, since nothing is rendered then.
    pub fn on_proximity_signal(&mut self) -> usize {
        if !self.preview_state().is_visible() {
            return self.window.visible_count();
        }
        self.window.on_proximity_signal()
    }

    pub fn window(&self) -> &VisibleWindow {
        &self.window
    }

    /// The combinations to render right now: the visible prefix, or nothing
    /// while the preview is hidden.
    pub fn visible_combinations(&self) -> &[AdCombination] {
        if !self.preview_state().is_visible() {
            return &[];
        }
        self.combinations.prefix(self.window.visible_count())
    }

    pub fn preview_cards(
        &self,
        snapshot: &CatalogSnapshot,
        resolver: &dyn PublicUrlResolver,
    ) -> Vec<PreviewCard> {
        build_preview_cards(self.visible_combinations(), &self.selection, snapshot, resolver)
    }

    // ─── Commit ────────────────────────────────────────────────────────────

    /// Persist the included combinations. A second call while one is still
    /// pending fails with [`AdcraftError::CommitInProgress`]. The included set
    /// is left untouched whatever the outcome.
    pub async fn commit<S>(&self, sink: &S, context: &CommitContext) -> AdcraftResult<CommitOutcome>
    where
        S: AdRecordSink + ?Sized,
    {
        let _guard = InFlightGuard::acquire(&self.commit_in_flight).ok_or_else(|| {
            warn!("commit requested while another is in flight");
            AdcraftError::CommitInProgress
        })?;

        commit(
            sink,
            self.combinations.as_slice(),
            self.selection.included_ids(),
            context,
        )
        .await
    }

    pub fn is_committing(&self) -> bool {
        self.commit_in_flight.load(Ordering::Acquire)
    }
}

/// Holds the in-flight flag; released on drop, including when the commit
/// future is cancelled.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> AdBuilderSession {
        AdBuilderSession::new(&PreviewConfig::default())
    }

    fn fill(session: &mut AdBuilderSession, flavor: ItemFlavor, prefix: &str, n: usize) {
        session.replace_items(flavor, (1..=n).map(|i| ItemId::new(format!("{prefix}{i}"))));
    }

    fn fill_all(session: &mut AdBuilderSession, c: usize, h: usize, p: usize, d: usize) {
        fill(session, ItemFlavor::Creative, "c", c);
        fill(session, ItemFlavor::Headline, "h", h);
        fill(session, ItemFlavor::PrimaryText, "p", p);
        fill(session, ItemFlavor::Description, "d", d);
    }

    #[test]
    fn test_incomplete_selection_state() {
        let mut s = session();
        fill(&mut s, ItemFlavor::Creative, "c", 3);
        fill(&mut s, ItemFlavor::Headline, "h", 2);
        assert!(s.combinations().is_empty());
        assert_eq!(s.preview_state(), PreviewState::IncompleteSelection);
        assert!(s.visible_combinations().is_empty());
    }

    #[test]
    fn test_small_generation_auto_previews_first_page() {
        let mut s = session();
        fill_all(&mut s, 2, 2, 2, 6);
        assert_eq!(s.combinations().len(), 48);
        assert_eq!(s.preview_state(), PreviewState::AutoShown);
        assert_eq!(s.visible_combinations().len(), 20);
        assert_eq!(s.summary(), SelectionSummary { included: 48, total: 48 });

        assert_eq!(s.on_proximity_signal(), 40);
        assert_eq!(s.on_proximity_signal(), 48);
        assert_eq!(s.on_proximity_signal(), 48);
    }

    #[test]
    fn test_large_generation_waits_for_trigger() {
        let mut s = session();
        fill_all(&mut s, 3, 3, 3, 4);
        assert_eq!(s.combinations().len(), 108);
        assert_eq!(s.preview_state(), PreviewState::AwaitingTrigger);
        assert!(s.visible_combinations().is_empty());
        assert_eq!(s.on_proximity_signal(), 20);
        assert_eq!(s.window().visible_count(), 20);

        assert_eq!(s.request_preview(), PreviewState::ManuallyShown);
        assert_eq!(s.visible_combinations().len(), 20);
        assert_eq!(s.on_proximity_signal(), 40);
    }

    #[test]
    fn test_shrinking_back_under_limit_auto_shows_again() {
        let mut s = session();
        fill_all(&mut s, 3, 3, 3, 4);
        s.request_preview();
        s.on_proximity_signal();

        s.remove_item(ItemFlavor::Creative, &"c3".into());
        assert_eq!(s.combinations().len(), 72);
        assert_eq!(s.preview_state(), PreviewState::AutoShown);
        assert_eq!(s.window().visible_count(), 20);

        s.add_item(ItemFlavor::Creative, "c3".into());
        assert_eq!(s.preview_state(), PreviewState::AwaitingTrigger);
    }

    #[test]
    fn test_regeneration_resets_inclusion() {
        let mut s = session();
        fill_all(&mut s, 2, 1, 1, 2);
        let first = s.combinations().as_slice()[0].id.clone();
        assert!(s.toggle(&first));
        assert_eq!(s.summary().included, 3);

        s.add_item(ItemFlavor::Headline, "h2".into());
        assert_eq!(s.summary(), SelectionSummary { included: 8, total: 8 });
        assert!(s.selection().is_included(&first));
    }

    #[test]
    fn test_stale_toggle_after_regeneration() {
        let mut s = session();
        fill_all(&mut s, 2, 1, 1, 1);
        let stale = s.combinations().as_slice()[1].id.clone();

        s.remove_item(ItemFlavor::Creative, &"c2".into());
        let before = s.selection().included_ids().clone();
        assert!(!s.toggle(&stale));
        assert_eq!(s.selection().included_ids(), &before);
        assert_eq!(s.summary(), SelectionSummary { included: 1, total: 1 });
    }

    #[test]
    fn test_unchanged_output_keeps_state() {
        let mut s = session();
        fill_all(&mut s, 3, 2, 2, 3);
        let first = s.combinations().as_slice()[0].id.clone();
        s.toggle(&first);
        s.on_proximity_signal();

        fill(&mut s, ItemFlavor::Creative, "c", 3);
        assert!(!s.selection().is_included(&first));
        assert_eq!(s.window().visible_count(), 36);
        assert!(!s.regenerate());
    }

    #[test]
    fn test_new_generation_replaces_arc() {
        let mut s = session();
        fill_all(&mut s, 1, 1, 1, 1);
        let held = s.combinations().clone();
        s.add_item(ItemFlavor::Description, "d2".into());
        assert_eq!(held.len(), 1);
        assert_eq!(s.combinations().len(), 2);
    }
}

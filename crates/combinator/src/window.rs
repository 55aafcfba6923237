//! Incrementally revealed prefix of the combination list.
//!
//! The host pushes a proximity signal whenever its end-of-list sentinel comes
//! near the viewport; each signal reveals one more page.

use tracing::debug;

/// Visible count right after a new generation.
pub fn initial_visible(total: usize, page_size: usize) -> usize {
    page_size.min(total)
}

/// Visible count after one proximity signal.
pub fn grow(visible: usize, total: usize, page_size: usize) -> usize {
    visible.saturating_add(page_size).min(total)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleWindow {
    page_size: usize,
    total: usize,
    visible: usize,
}

impl VisibleWindow {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            total: 0,
            visible: 0,
        }
    }

    /// Start over for a generation of `total` combinations.
    pub fn reset(&mut self, total: usize) {
        self.total = total;
        self.visible = initial_visible(total, self.page_size);
    }

    /// Reveal the next page. Once everything is visible further signals are no-ops.
    pub fn on_proximity_signal(&mut self) -> usize {
        let next = grow(self.visible, self.total, self.page_size);
        if next != self.visible {
            debug!(from = self.visible, to = next, total = self.total, "growing visible window");
            self.visible = next;
        }
        self.visible
    }

    pub fn visible_count(&self) -> usize {
        self.visible
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.visible < self.total
    }
}

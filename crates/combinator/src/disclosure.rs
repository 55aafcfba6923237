//! Whether the combination preview is shown, based on how many combinations exist.

use serde::Serialize;
use tracing::info;

/// Size bucket of a combination set relative to the auto-preview limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    /// At least one selection set is empty.
    Empty,
    /// Small enough to preview right away.
    Auto,
    /// Too large to preview until the user asks.
    Manual,
}

impl SizeClass {
    pub fn of(total: usize, auto_preview_limit: usize) -> Self {
        match total {
            0 => SizeClass::Empty,
            n if n <= auto_preview_limit => SizeClass::Auto,
            _ => SizeClass::Manual,
        }
    }
}

/// What the preview area should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewState {
    /// Nothing to preview because a selection set is empty.
    IncompleteSelection,
    AutoShown,
    /// Combinations exist but the user must ask for the preview.
    AwaitingTrigger,
    ManuallyShown,
    /// Small set the user has collapsed.
    Dismissed,
}

impl PreviewState {
    pub fn is_visible(self) -> bool {
        matches!(self, PreviewState::AutoShown | PreviewState::ManuallyShown)
    }
}

/// Preview state with no user input taken into account.
pub fn decide(total: usize, auto_preview_limit: usize) -> PreviewState {
    match SizeClass::of(total, auto_preview_limit) {
        SizeClass::Empty => PreviewState::IncompleteSelection,
        SizeClass::Auto => PreviewState::AutoShown,
        SizeClass::Manual => PreviewState::AwaitingTrigger,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserOverride {
    Requested,
    Dismissed,
}

/// Tracks the size class of the current generation plus any explicit
/// show/hide request, which lasts only until the size class changes.
#[derive(Debug, Clone)]
pub struct DisclosureController {
    auto_preview_limit: usize,
    size_class: SizeClass,
    user_override: Option<UserOverride>,
}

impl DisclosureController {
    pub fn new(auto_preview_limit: usize) -> Self {
        Self {
            auto_preview_limit,
            size_class: SizeClass::Empty,
            user_override: None,
        }
    }

    pub fn auto_preview_limit(&self) -> usize {
        self.auto_preview_limit
    }

    pub fn size_class(&self) -> SizeClass {
        self.size_class
    }

    /// Re-evaluate after a new generation of `total` combinations.
    pub fn observe(&mut self, total: usize) -> PreviewState {
        let class = SizeClass::of(total, self.auto_preview_limit);
        if class != self.size_class {
            self.size_class = class;
            self.user_override = None;
            info!(
                total,
                limit = self.auto_preview_limit,
                size_class = ?class,
                state = ?self.state(),
                "preview size class changed"
            );
        }
        self.state()
    }

    /// The explicit "generate preview" action. Has no effect without combinations.
    pub fn request_preview(&mut self) -> PreviewState {
        match self.size_class {
            SizeClass::Empty => {}
            SizeClass::Auto => self.user_override = None,
            SizeClass::Manual => self.user_override = Some(UserOverride::Requested),
        }
        self.state()
    }

    pub fn dismiss(&mut self) -> PreviewState {
        match self.size_class {
            SizeClass::Empty => {}
            SizeClass::Auto => self.user_override = Some(UserOverride::Dismissed),
            SizeClass::Manual => self.user_override = None,
        }
        self.state()
    }

    pub fn state(&self) -> PreviewState {
        match (self.size_class, self.user_override) {
            (SizeClass::Empty, _) => PreviewState::IncompleteSelection,
            (SizeClass::Auto, Some(UserOverride::Dismissed)) => PreviewState::Dismissed,
            (SizeClass::Auto, _) => PreviewState::AutoShown,
            (SizeClass::Manual, Some(UserOverride::Requested)) => PreviewState::ManuallyShown,
            (SizeClass::Manual, _) => PreviewState::AwaitingTrigger,
        }
    }
}

//! Ad combination builder: expands four selection pools into every
//! creative × headline × primary text × description combination, tracks which
//! ones the user keeps, pages them into a preview and bulk-creates the ads.

pub mod catalog;
pub mod commit;
pub mod disclosure;
pub mod generator;
pub mod identity;
pub mod preview;
pub mod selection;
pub mod selection_sets;
pub mod session;
pub mod types;
pub mod window;

pub use catalog::{load_snapshot, CatalogSnapshot, ItemCatalog, PublicUrlResolver};
pub use commit::{commit, AdRecordSink, CommitOutcome};
pub use disclosure::{DisclosureController, PreviewState, SizeClass};
pub use generator::generate_combinations;
pub use identity::CombinationId;
pub use selection::{SelectionState, SelectionSummary};
pub use session::AdBuilderSession;
pub use types::{AdCombination, CombinationSet};
pub use window::VisibleWindow;

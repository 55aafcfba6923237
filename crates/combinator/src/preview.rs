use adcraft_core::types::{MediaType, TextKind};
use serde::Serialize;

use crate::catalog::{CatalogSnapshot, PublicUrlResolver};
use crate::identity::CombinationId;
use crate::selection::SelectionState;
use crate::types::AdCombination;

/// Display data for one combination in the preview grid.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewCard {
    pub combination_id: CombinationId,
    pub creative: Option<CreativePreview>,
    pub headline: Option<String>,
    pub primary_text: Option<String>,
    pub description: Option<String>,
    pub included: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreativePreview {
    pub name: String,
    pub media_type: MediaType,
    pub url: String,
}

/// Resolve the rendered prefix into cards. Items that have vanished from the
/// catalog show up as `None` instead of dropping the card.
pub fn build_preview_cards(
    visible: &[AdCombination],
    selection: &SelectionState,
    snapshot: &CatalogSnapshot,
    resolver: &dyn PublicUrlResolver,
) -> Vec<PreviewCard> {
    visible
        .iter()
        .map(|combo| PreviewCard {
            combination_id: combo.id.clone(),
            creative: snapshot.creative(&combo.creative_id).map(|c| CreativePreview {
                name: c.name.clone(),
                media_type: c.media_type,
                url: resolver.public_url(&c.storage_path),
            }),
            headline: text(snapshot, TextKind::Headline, combo),
            primary_text: text(snapshot, TextKind::PrimaryText, combo),
            description: text(snapshot, TextKind::Description, combo),
            included: selection.is_included(&combo.id),
        })
        .collect()
}

fn text(snapshot: &CatalogSnapshot, kind: TextKind, combo: &AdCombination) -> Option<String> {
    let id = match kind {
        TextKind::Headline => &combo.headline_id,
        TextKind::PrimaryText => &combo.primary_id,
        TextKind::Description => &combo.description_id,
    };
    snapshot.text(kind, id).map(|t| t.text.clone())
}

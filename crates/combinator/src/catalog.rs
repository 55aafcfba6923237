//! Read side of the backing data layer: item lists and public media URLs.

use std::collections::HashMap;

use adcraft_core::error::{AdcraftError, AdcraftResult};
use adcraft_core::types::{validate_items, Creative, ItemFlavor, ItemId, TextItem, TextKind};
use async_trait::async_trait;
use tracing::info;

/// Source of the selectable item lists.
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    async fn list_creatives(&self) -> anyhow::Result<Vec<Creative>>;

    async fn list_text_items(&self, kind: TextKind) -> anyhow::Result<Vec<TextItem>>;
}

/// Turns an opaque storage path into a displayable URL.
pub trait PublicUrlResolver: Send + Sync {
    fn public_url(&self, storage_path: &str) -> String;
}

/// Validated item lists, kept in catalog order, with id lookups.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    creatives: Vec<Creative>,
    headlines: Vec<TextItem>,
    primary_texts: Vec<TextItem>,
    descriptions: Vec<TextItem>,
    creative_index: HashMap<ItemId, usize>,
    text_index: HashMap<(TextKind, ItemId), TextItem>,
}

impl CatalogSnapshot {
    pub fn new(
        creatives: Vec<Creative>,
        headlines: Vec<TextItem>,
        primary_texts: Vec<TextItem>,
        descriptions: Vec<TextItem>,
    ) -> AdcraftResult<Self> {
        validate_items(&creatives, ItemFlavor::Creative)?;
        validate_items(&headlines, ItemFlavor::Headline)?;
        validate_items(&primary_texts, ItemFlavor::PrimaryText)?;
        validate_items(&descriptions, ItemFlavor::Description)?;

        let creative_index = creatives
            .iter()
            .enumerate()
            .map(|(pos, c)| (c.id.clone(), pos))
            .collect();
        let text_index = headlines
            .iter()
            .chain(&primary_texts)
            .chain(&descriptions)
            .map(|t| ((t.kind, t.id.clone()), t.clone()))
            .collect();

        Ok(Self {
            creatives,
            headlines,
            primary_texts,
            descriptions,
            creative_index,
            text_index,
        })
    }

    pub fn creatives(&self) -> &[Creative] {
        &self.creatives
    }

    pub fn text_items(&self, kind: TextKind) -> &[TextItem] {
        match kind {
            TextKind::Headline => &self.headlines,
            TextKind::PrimaryText => &self.primary_texts,
            TextKind::Description => &self.descriptions,
        }
    }

    /// Ids of one flavor in catalog order.
    pub fn ids(&self, flavor: ItemFlavor) -> Vec<ItemId> {
        match flavor {
            ItemFlavor::Creative => self.creatives.iter().map(|c| c.id.clone()).collect(),
            ItemFlavor::Headline => ids_of(&self.headlines),
            ItemFlavor::PrimaryText => ids_of(&self.primary_texts),
            ItemFlavor::Description => ids_of(&self.descriptions),
        }
    }

    pub fn creative(&self, id: &ItemId) -> Option<&Creative> {
        self.creative_index.get(id).map(|&pos| &self.creatives[pos])
    }

    pub fn text(&self, kind: TextKind, id: &ItemId) -> Option<&TextItem> {
        self.text_index.get(&(kind, id.clone()))
    }
}

fn ids_of(items: &[TextItem]) -> Vec<ItemId> {
    items.iter().map(|t| t.id.clone()).collect()
}

/// Fetch and validate all four item lists.
pub async fn load_snapshot<C>(catalog: &C) -> AdcraftResult<CatalogSnapshot>
where
    C: ItemCatalog + ?Sized,
{
    let creatives = catalog.list_creatives().await.map_err(catalog_err)?;
    let headlines = catalog
        .list_text_items(TextKind::Headline)
        .await
        .map_err(catalog_err)?;
    let primary_texts = catalog
        .list_text_items(TextKind::PrimaryText)
        .await
        .map_err(catalog_err)?;
    let descriptions = catalog
        .list_text_items(TextKind::Description)
        .await
        .map_err(catalog_err)?;

    let snapshot = CatalogSnapshot::new(creatives, headlines, primary_texts, descriptions)?;
    info!(
        creatives = snapshot.creatives.len(),
        headlines = snapshot.headlines.len(),
        primary_texts = snapshot.primary_texts.len(),
        descriptions = snapshot.descriptions.len(),
        "catalog snapshot loaded"
    );
    Ok(snapshot)
}

fn catalog_err(e: anyhow::Error) -> AdcraftError {
    AdcraftError::Catalog(format!("{e:#}"))
}

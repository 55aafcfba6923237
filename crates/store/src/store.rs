//! In-memory ad store backed by DashMap.
//!
//! Production: replace with the hosted database and object storage.
//! This provides the same API surface for development and testing.

use std::sync::atomic::{AtomicBool, Ordering};

use adcraft_combinator::{AdRecordSink, ItemCatalog, PublicUrlResolver};
use adcraft_core::config::StorageConfig;
use adcraft_core::types::{AdRecord, Creative, ItemId, MediaType, NewAdRecord, TextItem, TextKind};
use anyhow::{anyhow, bail};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

/// Thread-safe in-memory store for creatives, text items and ads.
pub struct InMemoryAdStore {
    creatives: DashMap<ItemId, Creative>,
    text_items: DashMap<ItemId, TextItem>,
    ads: DashMap<Uuid, AdRecord>,
    public_base_url: String,
    fail_next_commit: AtomicBool,
}

impl InMemoryAdStore {
    /// Empty store.
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            creatives: DashMap::new(),
            text_items: DashMap::new(),
            ads: DashMap::new(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            fail_next_commit: AtomicBool::new(false),
        }
    }

    /// Store pre-populated with demo creatives and copy.
    pub fn with_demo_data(config: &StorageConfig) -> Self {
        let store = Self::new(config);
        store.seed_demo_data();
        info!("Ad store initialized (in-memory, development mode)");
        store
    }

    // ─── Creatives ─────────────────────────────────────────────────────────

    /// Newest first.
    pub fn list_creatives(&self) -> Vec<Creative> {
        let mut creatives: Vec<Creative> = self.creatives.iter().map(|r| r.value().clone()).collect();
        creatives.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        creatives
    }

    pub fn create_creative(&self, name: &str, storage_path: &str, media_type: MediaType) -> Creative {
        let creative = Creative {
            id: ItemId::new(Uuid::new_v4().to_string()),
            name: name.to_string(),
            storage_path: storage_path.to_string(),
            media_type,
            created_at: Utc::now(),
        };
        self.creatives.insert(creative.id.clone(), creative.clone());
        creative
    }

    pub fn delete_creative(&self, id: &ItemId) -> bool {
        self.creatives.remove(id).is_some()
    }

    // ─── Text items ────────────────────────────────────────────────────────

    /// Newest first.
    pub fn list_text_items(&self, kind: TextKind) -> Vec<TextItem> {
        let mut items: Vec<TextItem> = self
            .text_items
            .iter()
            .filter(|r| r.value().kind == kind)
            .map(|r| r.value().clone())
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        items
    }

    pub fn create_text_item(&self, kind: TextKind, text: &str) -> TextItem {
        let item = TextItem {
            id: ItemId::new(Uuid::new_v4().to_string()),
            text: text.to_string(),
            kind,
            created_at: Utc::now(),
        };
        self.text_items.insert(item.id.clone(), item.clone());
        item
    }

    pub fn delete_text_item(&self, id: &ItemId) -> bool {
        self.text_items.remove(id).is_some()
    }

    // ─── Ads ───────────────────────────────────────────────────────────────

    /// Oldest first, i.e. in insertion order for a single batch.
    pub fn list_ads(&self) -> Vec<AdRecord> {
        let mut ads: Vec<AdRecord> = self.ads.iter().map(|r| r.value().clone()).collect();
        ads.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        ads
    }

    pub fn ad_count(&self) -> usize {
        self.ads.len()
    }

    /// Make the next bulk insert fail without writing anything.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    fn insert_ads(&self, records: Vec<NewAdRecord>) -> anyhow::Result<usize> {
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            bail!("bulk insert of {} ads rejected", records.len());
        }

        for fields in &records {
            if !self.creatives.contains_key(&fields.creative_id) {
                return Err(anyhow!("unknown creative {}", fields.creative_id));
            }
        }

        // Spread timestamps so the batch keeps its order when listed.
        let base = Utc::now();
        let count = records.len();
        for (offset, fields) in records.into_iter().enumerate() {
            let record = AdRecord {
                id: Uuid::new_v4(),
                fields,
                created_at: base + Duration::microseconds(offset as i64),
            };
            self.ads.insert(record.id, record);
        }
        Ok(count)
    }

    // ─── Seed ──────────────────────────────────────────────────────────────

    fn seed_demo_data(&self) {
        let now = Utc::now();

        let creatives = [
            ("Summer lifestyle", "uploads/summer-lifestyle.jpg", MediaType::Image),
            ("Product close-up", "uploads/product-closeup.jpg", MediaType::Image),
            ("Unboxing clip", "uploads/unboxing.mp4", MediaType::Video),
            ("Customer testimonial", "uploads/testimonial.mp4", MediaType::Video),
        ];
        for (i, (name, path, media_type)) in creatives.into_iter().enumerate() {
            let creative = Creative {
                id: ItemId::new(Uuid::new_v4().to_string()),
                name: name.to_string(),
                storage_path: path.to_string(),
                media_type,
                created_at: now - Duration::seconds(i as i64),
            };
            self.creatives.insert(creative.id.clone(), creative);
        }

        let copy: [(TextKind, &[&str]); 3] = [
            (
                TextKind::Headline,
                &["Save Big This Summer", "Ready for an Upgrade?", "Limited Time Offer"],
            ),
            (
                TextKind::PrimaryText,
                &[
                    "Everything you need for the season, delivered to your door.",
                    "Join thousands of happy customers who made the switch.",
                ],
            ),
            (
                TextKind::Description,
                &["Free shipping on all orders", "30-day money-back guarantee"],
            ),
        ];
        for (kind, texts) in copy {
            for (i, text) in texts.iter().enumerate() {
                let item = TextItem {
                    id: ItemId::new(Uuid::new_v4().to_string()),
                    text: text.to_string(),
                    kind,
                    created_at: now - Duration::seconds(i as i64),
                };
                self.text_items.insert(item.id.clone(), item);
            }
        }

        info!(
            creatives = self.creatives.len(),
            text_items = self.text_items.len(),
            "seeded demo ad inventory"
        );
    }
}

#[async_trait]
impl ItemCatalog for InMemoryAdStore {
    async fn list_creatives(&self) -> anyhow::Result<Vec<Creative>> {
        Ok(InMemoryAdStore::list_creatives(self))
    }

    async fn list_text_items(&self, kind: TextKind) -> anyhow::Result<Vec<TextItem>> {
        Ok(InMemoryAdStore::list_text_items(self, kind))
    }
}

#[async_trait]
impl AdRecordSink for InMemoryAdStore {
    async fn create_ads(&self, records: Vec<NewAdRecord>) -> anyhow::Result<()> {
        let count = self.insert_ads(records)?;
        info!(count, "inserted ad records");
        Ok(())
    }
}

impl PublicUrlResolver for InMemoryAdStore {
    fn public_url(&self, storage_path: &str) -> String {
        format!("{}/{}", self.public_base_url, storage_path.trim_start_matches('/'))
    }
}

//! End-to-end session flow against the in-memory store.

use std::sync::Arc;

use adcraft_combinator::{load_snapshot, AdBuilderSession, AdRecordSink, PreviewState};
use adcraft_core::config::{PreviewConfig, StorageConfig};
use adcraft_core::types::{CommitContext, ItemFlavor, NewAdRecord};
use adcraft_core::AdcraftError;
use adcraft_store::InMemoryAdStore;
use async_trait::async_trait;
use tokio::sync::Notify;

fn context() -> CommitContext {
    CommitContext {
        user_id: "user-42".to_string(),
        project_id: Some("spring-launch".to_string()),
        subproject_id: Some("instagram".to_string()),
    }
}

async fn session_over_demo(store: &InMemoryAdStore) -> AdBuilderSession {
    let snapshot = load_snapshot(store).await.unwrap();
    let mut session = AdBuilderSession::new(&PreviewConfig::default());
    for flavor in ItemFlavor::ALL {
        session.replace_items(flavor, snapshot.ids(flavor));
    }
    session
}

#[tokio::test]
async fn test_full_flow_commits_included_subset() {
    let store = InMemoryAdStore::with_demo_data(&StorageConfig::default());
    let mut session = session_over_demo(&store).await;

    // 4 creatives × 3 headlines × 2 primary texts × 2 descriptions
    assert_eq!(session.combinations().len(), 48);
    assert_eq!(session.preview_state(), PreviewState::AutoShown);

    let snapshot = load_snapshot(&store).await.unwrap();
    let cards = session.preview_cards(&snapshot, &store);
    assert_eq!(cards.len(), 20);
    assert!(cards.iter().all(|c| c.creative.is_some() && c.headline.is_some()));
    assert!(cards[0]
        .creative
        .as_ref()
        .unwrap()
        .url
        .starts_with("https://storage.local/creatives/uploads/"));

    let excluded: Vec<_> = session.combinations().as_slice()[..3]
        .iter()
        .map(|c| c.id.clone())
        .collect();
    for id in &excluded {
        session.toggle(id);
    }

    let outcome = session.commit(&store, &context()).await.unwrap();
    assert_eq!(outcome.created, 45);

    let ads = store.list_ads();
    assert_eq!(ads.len(), 45);
    let expected_first = &session.combinations().as_slice()[3];
    assert_eq!(ads[0].fields.creative_id, expected_first.creative_id);
    assert_eq!(ads[0].fields.description_id, expected_first.description_id);
    assert!(ads
        .iter()
        .all(|ad| ad.fields.subproject_id.as_deref() == Some("instagram")));
}

#[tokio::test]
async fn test_failed_commit_keeps_selection_for_retry() {
    let store = InMemoryAdStore::with_demo_data(&StorageConfig::default());
    let mut session = session_over_demo(&store).await;
    let first = session.combinations().as_slice()[0].id.clone();
    session.toggle(&first);
    let before = session.selection().included_ids().clone();

    store.fail_next_commit();
    let err = session.commit(&store, &context()).await.unwrap_err();
    assert!(matches!(err, AdcraftError::CommitFailed { attempted: 47, .. }));
    assert_eq!(session.selection().included_ids(), &before);
    assert!(!session.is_committing());

    let outcome = session.commit(&store, &context()).await.unwrap();
    assert_eq!(outcome.created, 47);
}

#[tokio::test]
async fn test_deselect_all_commits_nothing() {
    let store = InMemoryAdStore::with_demo_data(&StorageConfig::default());
    let mut session = session_over_demo(&store).await;
    session.deselect_all();

    let outcome = session.commit(&store, &context()).await.unwrap();
    assert_eq!(outcome.created, 0);
    assert_eq!(store.ad_count(), 0);
}

/// Sink that parks every insert until released.
struct GatedSink {
    inner: Arc<InMemoryAdStore>,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl AdRecordSink for GatedSink {
    async fn create_ads(&self, records: Vec<NewAdRecord>) -> anyhow::Result<()> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.create_ads(records).await
    }
}

#[tokio::test]
async fn test_overlapping_commit_is_rejected() {
    let store = Arc::new(InMemoryAdStore::with_demo_data(&StorageConfig::default()));
    let session = session_over_demo(&store).await;
    let sink = GatedSink {
        inner: store.clone(),
        entered: Notify::new(),
        release: Notify::new(),
    };
    let ctx = context();

    let first = session.commit(&sink, &ctx);
    let second = async {
        sink.entered.notified().await;
        assert!(session.is_committing());
        let result = session.commit(&sink, &ctx).await;
        sink.release.notify_one();
        result
    };

    let (first, second) = tokio::join!(first, second);
    assert_eq!(first.unwrap().created, 48);
    assert!(matches!(second, Err(AdcraftError::CommitInProgress)));
    assert_eq!(store.ad_count(), 48);
    assert!(!session.is_committing());
}

#[tokio::test]
async fn test_shrinking_selection_regenerates() {
    let store = InMemoryAdStore::with_demo_data(&StorageConfig::default());
    let mut session = session_over_demo(&store).await;

    let headline = session.selection_set(ItemFlavor::Headline).as_slice()[0].clone();
    session.remove_item(ItemFlavor::Headline, &headline);
    assert_eq!(session.combinations().len(), 32);
    assert_eq!(session.summary().included, 32);

    session.clear_items(ItemFlavor::Description);
    assert_eq!(session.preview_state(), PreviewState::IncompleteSelection);
    assert!(session.combinations().is_empty());

    let outcome = session.commit(&store, &context()).await.unwrap();
    assert_eq!(outcome.created, 0);
}

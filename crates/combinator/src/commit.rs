//! Turning the included combinations into persisted ad records.

use std::collections::HashSet;

use adcraft_core::error::{AdcraftError, AdcraftResult};
use adcraft_core::types::{CommitContext, NewAdRecord};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info};

use crate::identity::CombinationId;
use crate::types::AdCombination;

/// Destination for bulk-created ad records.
#[async_trait]
pub trait AdRecordSink: Send + Sync {
    /// Insert every record in one request.
    async fn create_ads(&self, records: Vec<NewAdRecord>) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommitOutcome {
    pub created: usize,
}

/// Map the included combinations, in generation order, to insert payloads.
pub fn build_payload(
    combinations: &[AdCombination],
    included: &HashSet<CombinationId>,
    context: &CommitContext,
) -> Vec<NewAdRecord> {
    combinations
        .iter()
        .filter(|combo| included.contains(&combo.id))
        .map(|combo| NewAdRecord {
            creative_id: combo.creative_id.clone(),
            headline_id: combo.headline_id.clone(),
            primary_id: combo.primary_id.clone(),
            description_id: combo.description_id.clone(),
            user_id: context.user_id.clone(),
            project_id: context.project_id.clone(),
            subproject_id: context.subproject_id.clone(),
        })
        .collect()
}

/// Create one ad per included combination with a single bulk call.
///
/// Nothing is sent when no combination is included. A failed call is reported
/// as one error for the whole batch.
pub async fn commit<S>(
    sink: &S,
    combinations: &[AdCombination],
    included: &HashSet<CombinationId>,
    context: &CommitContext,
) -> AdcraftResult<CommitOutcome>
where
    S: AdRecordSink + ?Sized,
{
    let records = build_payload(combinations, included, context);
    if records.is_empty() {
        info!("no combinations included, skipping bulk create");
        return Ok(CommitOutcome { created: 0 });
    }

    let attempted = records.len();
    info!(
        count = attempted,
        user_id = %context.user_id,
        project_id = ?context.project_id,
        "creating ad records"
    );

    match sink.create_ads(records).await {
        Ok(()) => {
            info!(created = attempted, "ad records created");
            Ok(CommitOutcome { created: attempted })
        }
        Err(source) => {
            error!(attempted, error = %source, "bulk ad creation failed");
            Err(AdcraftError::CommitFailed { attempted, source })
        }
    }
}

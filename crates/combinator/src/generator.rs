use adcraft_core::types::ItemId;
use tracing::{debug, info};

use crate::identity::{encode_component, CombinationId};
use crate::types::AdCombination;

/// Generate every creative × headline × primary text × description combination.
///
/// Output order is nested-loop order over the arguments: creatives outermost,
/// descriptions innermost. If any input is empty the result is empty.
///
/// Callers must pass ids that are unique within each slice; duplicates are
/// not detected here and would yield duplicate combination ids.
pub fn generate_combinations(
    creative_ids: &[ItemId],
    headline_ids: &[ItemId],
    primary_ids: &[ItemId],
    description_ids: &[ItemId],
) -> Vec<AdCombination> {
    if creative_ids.is_empty()
        || headline_ids.is_empty()
        || primary_ids.is_empty()
        || description_ids.is_empty()
    {
        debug!(
            creatives = creative_ids.len(),
            headlines = headline_ids.len(),
            primary_texts = primary_ids.len(),
            descriptions = description_ids.len(),
            "selection incomplete, no combinations"
        );
        return Vec::new();
    }

    // Encode each id once; keys are built by extending the outer prefixes.
    let creative_keys = encode_all(creative_ids);
    let headline_keys = encode_all(headline_ids);
    let primary_keys = encode_all(primary_ids);
    let description_keys = encode_all(description_ids);

    let total = creative_ids
        .len()
        .saturating_mul(headline_ids.len())
        .saturating_mul(primary_ids.len())
        .saturating_mul(description_ids.len());
    let mut combinations = Vec::with_capacity(total);

    for (creative_id, creative_key) in creative_ids.iter().zip(&creative_keys) {
        for (headline_id, headline_key) in headline_ids.iter().zip(&headline_keys) {
            let ch = concat(creative_key, headline_key);
            for (primary_id, primary_key) in primary_ids.iter().zip(&primary_keys) {
                let chp = concat(&ch, primary_key);
                for (description_id, description_key) in
                    description_ids.iter().zip(&description_keys)
                {
                    combinations.push(AdCombination {
                        id: CombinationId::from_encoded(concat(&chp, description_key)),
                        creative_id: creative_id.clone(),
                        headline_id: headline_id.clone(),
                        primary_id: primary_id.clone(),
                        description_id: description_id.clone(),
                    });
                }
            }
        }
    }

    info!(
        count = combinations.len(),
        creatives = creative_ids.len(),
        headlines = headline_ids.len(),
        primary_texts = primary_ids.len(),
        descriptions = description_ids.len(),
        "generated ad combinations"
    );
    combinations
}

fn encode_all(ids: &[ItemId]) -> Vec<String> {
    ids.iter().map(encode_component).collect()
}

fn concat(prefix: &str, suffix: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + suffix.len());
    out.push_str(prefix);
    out.push_str(suffix);
    out
}

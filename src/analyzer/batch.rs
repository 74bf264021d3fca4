use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::analyzer::item_processor::ItemProcessor;
use crate::errors::Result;
use crate::models::ItemDetails;

/// Processes every listing on the blocking pool and returns the records in
/// input order. A listing whose task panics still gets a record; a
/// cancelled task fails the batch.
pub async fn process_batch(
    processor: Arc<ItemProcessor>,
    listings: Vec<Value>,
) -> Result<Vec<ItemDetails>> {
    let total = listings.len();
    let mut handles = Vec::with_capacity(total);

    for listing in listings {
        let id = listing
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let processor = Arc::clone(&processor);
        let handle = tokio::task::spawn_blocking(move || processor.process_value(listing));
        handles.push((id, handle));
    }

    let mut results = Vec::with_capacity(total);
    for (id, handle) in handles {
        match handle.await {
            Ok(details) => results.push(details),
            Err(e) if e.is_panic() => {
                warn!(id = %id, "analysis task panicked");
                results.push(ItemDetails::unanalyzable(
                    id,
                    "analysis task panicked".to_string(),
                    processor.config().pricing.reroll_cost,
                ));
            }
            Err(e) => return Err(e.into()),
        }
    }

    let worth = results.iter().filter(|d| d.is_worth_rerolling()).count();
    info!(total, worth, "batch analyzed");

    Ok(results)
}

/// Accepts a trade fetch response (`{"result": [...]}`) or a bare array of
/// listings.
pub fn listings_from_response(response: Value) -> Vec<Value> {
    match response {
        Value::Array(listings) => listings,
        Value::Object(mut map) => match map.remove("result") {
            Some(Value::Array(listings)) => listings,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
    .into_iter()
    .filter(|listing| !listing.is_null())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::data::WeaponBaseDatabase;
    use serde_json::json;

    fn processor() -> Arc<ItemProcessor> {
        Arc::new(ItemProcessor::new(
            AnalysisConfig::default(),
            WeaponBaseDatabase::builtin().unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let listings: Vec<Value> = (0..20)
            .map(|i| json!({ "id": format!("item-{}", i), "item": { "typeLine": "Gemini Bow" } }))
            .collect();

        let results = process_batch(processor(), listings).await.unwrap();
        assert_eq!(results.len(), 20);
        for (i, details) in results.iter().enumerate() {
            assert_eq!(details.id, format!("item-{}", i));
        }
    }

    #[tokio::test]
    async fn test_bad_listing_does_not_abort_batch() {
        let listings = vec![
            json!({ "id": "good", "item": { "typeLine": "Gemini Bow" } }),
            json!({ "id": "bad", "item": "not an item" }),
            json!({ "item": {} }),
        ];

        let results = process_batch(processor(), listings).await.unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[0].verdict.is_some());
        assert!(results[1].verdict.is_none());
        assert_eq!(results[2].id, "unknown");
        assert!(results[2].error.is_some());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let results = process_batch(processor(), Vec::new()).await.unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_listings_from_response() {
        let wrapped = json!({ "result": [{ "id": "a" }, null, { "id": "b" }] });
        assert_eq!(listings_from_response(wrapped).len(), 2);

        let bare = json!([{ "id": "a" }]);
        assert_eq!(listings_from_response(bare).len(), 1);

        assert!(listings_from_response(json!({ "total": 0 })).is_empty());
        assert!(listings_from_response(json!("nope")).is_empty());
    }
}

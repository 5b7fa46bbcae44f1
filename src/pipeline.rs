//! `BatchPipeline` — validate-chunk-insert-publish, §4.6.
//!
//! Shaped after the teacher's `pipeline_mt.rs` ("drain work, aggregate
//! per-stage stats, return a summary struct"), simplified to the spec's
//! required strictly sequential, single-threaded chunk loop — parallel
//! chunking is an explicit non-requirement (§4.6), unlike the teacher's
//! multi-thread fan-out.

use serde::Serialize;
use utoipa::ToSchema;

use crate::events::EventBus;
use crate::order::Order;
use crate::store::OrderStore;
use crate::validation::{OrderInput, validate_order};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChunkResult {
    /// Wire field is `batchIndex`, matching `spec.md` §8's invariant #4 and
    /// scenario S1, even though §4.6 calls the concept `chunkIndex`
    /// internally.
    #[serde(rename = "batchIndex")]
    pub chunk_index: usize,
    pub processed: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchOutcome {
    #[serde(rename = "totalProcessed")]
    pub total_processed: usize,
    #[serde(rename = "totalFailed")]
    pub total_failed: usize,
    #[serde(rename = "batchResults")]
    pub batch_results: Vec<ChunkResult>,
}

/// Processes chunks strictly sequentially in input order; within a chunk,
/// orders are processed in input order. A per-order validation failure is
/// recorded and iteration continues — it never fails the surrounding
/// request (§7's `PipelineItemFailure`).
///
/// Note: unlike a dynamically-typed runtime, an in-memory `DashMap` insert
/// here cannot itself raise, so the "unexpected exception from insert" path
/// `spec.md` §4.6c names has no reachable trigger in this implementation;
/// the per-order failure path it would otherwise feed is still modeled by
/// the validation branch above.
pub fn run_batch(
    store: &OrderStore,
    events: &EventBus,
    inputs: Vec<OrderInput>,
    chunk_size: usize,
) -> BatchOutcome {
    let mut batch_results = Vec::new();
    let mut total_processed = 0usize;
    let mut total_failed = 0usize;

    for (chunk_index, chunk) in inputs.chunks(chunk_size.max(1)).enumerate() {
        let mut processed = 0usize;
        let mut failed = 0usize;
        let mut errors = Vec::new();

        for input in chunk {
            if !validate_order(input) {
                failed += 1;
                errors.push(format!("Order {}: Invalid order data", input.id));
                continue;
            }

            let status = crate::order::OrderStatus::parse(&input.status)
                .expect("validate_order guarantees a parseable status");
            let order = Order {
                id: input.id.clone(),
                status,
                amount: input.amount,
                created_at: input.created_at.expect("validate_order guarantees Some"),
                updated_at: input.updated_at.expect("validate_order guarantees Some"),
            };

            store.bulk_insert(std::iter::once(order.clone()));
            events.publish_created(order);
            processed += 1;
        }

        total_processed += processed;
        total_failed += failed;
        batch_results.push(ChunkResult {
            chunk_index,
            processed,
            failed,
            errors: if errors.is_empty() { None } else { Some(errors) },
        });
    }

    BatchOutcome { total_processed, total_failed, batch_results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(id: &str, amount: f64) -> OrderInput {
        crate::validation::validate_orders_input(&json!([
            {"id": id, "status": "PENDING", "amount": amount, "createdAt": 1, "updatedAt": 1}
        ]))
        .unwrap()
        .remove(0)
    }

    #[test]
    fn happy_batch_produces_one_chunk() {
        let store = OrderStore::new();
        let events = EventBus::new();
        let outcome = run_batch(&store, &events, vec![input("O1", 10.0), input("O2", 20.0)], 10);
        assert_eq!(outcome.total_processed, 2);
        assert_eq!(outcome.total_failed, 0);
        assert_eq!(outcome.batch_results.len(), 1);
        assert_eq!(outcome.batch_results[0].chunk_index, 0);
        assert!(outcome.batch_results[0].errors.is_none());
    }

    #[test]
    fn mixed_batch_isolates_failure_to_its_chunk() {
        let store = OrderStore::new();
        let events = EventBus::new();
        let inputs = vec![input("A", 1.0), input("B", -1.0), input("C", 2.0)];
        let outcome = run_batch(&store, &events, inputs, 2);
        assert_eq!(outcome.total_processed, 2);
        assert_eq!(outcome.total_failed, 1);
        assert_eq!(outcome.batch_results.len(), 2);
        let errors = outcome.batch_results[0].errors.as_ref().unwrap();
        assert!(errors.iter().any(|e| e.contains("Order B")));
    }

    #[test]
    fn chunk_count_matches_ceil_division() {
        let store = OrderStore::new();
        let events = EventBus::new();
        let inputs: Vec<_> = (0..7).map(|i| input(&format!("O{i}"), 1.0)).collect();
        let outcome = run_batch(&store, &events, inputs, 3);
        assert_eq!(outcome.batch_results.len(), 3);
        let indices: Vec<_> = outcome.batch_results.iter().map(|c| c.chunk_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn successful_inserts_each_publish_one_created_event() {
        let store = OrderStore::new();
        let events = EventBus::new();
        let (_id, mut rx) = events.subscribe();
        run_batch(&store, &events, vec![input("O1", 1.0), input("O2", 2.0)], 10);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}

//! `#[derive(OpenApi)]` document, adapted from the teacher's
//! `gateway/openapi.rs` (`info(...)`, `paths(...)`, `components(schemas(...))`
//! shape). Pure ambient tooling — `SPEC_FULL.md` §6 notes it carries no
//! behavioral semantics of its own.

use utoipa::OpenApi;

use crate::gateway::handlers::{orders, system};

#[derive(OpenApi)]
#[openapi(
    info(title = "Order Gateway API", version = "0.1.0", description = "Batch order ingestion, read-through caching, and SSE event fan-out."),
    paths(
        orders::post_batch,
        orders::get_order,
        orders::update_status,
        orders::stress_test,
        system::health,
        system::memory,
        system::performance,
    ),
    components(schemas(
        crate::order::Order,
        crate::order::OrderStatus,
        crate::validation::OrderInput,
        crate::pipeline::ChunkResult,
        crate::pipeline::BatchOutcome,
        crate::stress::StressResult,
        crate::memory::MemoryUsage,
        crate::memory::MemoryUsageMb,
        orders::UpdateStatusBody,
    )),
    tags(
        (name = "Orders", description = "Batch ingest, read, and status mutation"),
        (name = "Stress", description = "Load-test harness"),
        (name = "System", description = "Health, memory, and performance introspection"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "Order Gateway API");
    }
}

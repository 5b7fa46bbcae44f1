//! Router construction and the server bootstrap, adapted from the
//! teacher's `gateway/mod.rs` (`Router::new().route(...).nest(...)
//! .layer(from_fn_with_state(...)).with_state(state).merge(SwaggerUi::new(...))`
//! and its `run_server` entry point).

pub mod handlers;
pub mod openapi;
pub mod state;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{Next, from_fn, from_fn_with_state};
use axum::response::Response;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::middleware as mw;
use state::AppState;

/// Wraps every route: stamps elapsed time into `MetricsCounter`, following
/// the teacher's atomic-counter hook style (§4.10).
async fn metrics_middleware(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let response = next.run(req).await;
    state.metrics.record(start.elapsed());
    response
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let orders_batch = Router::new()
        .route("/orders/batch", post(handlers::orders::post_batch))
        .layer(from_fn(mw::batch_validate_middleware))
        .layer(from_fn_with_state(state.clone(), mw::idempotency_middleware));

    let stress_test = Router::new()
        .route("/orders/stress-test", post(handlers::orders::stress_test))
        .layer(from_fn(mw::stress_validate_middleware));

    let api_routes = Router::new()
        .merge(orders_batch)
        .merge(stress_test)
        .route("/orders/{id}", get(handlers::orders::get_order))
        .route("/orders/{id}/status", put(handlers::orders::update_status))
        .route("/orders/stream", get(handlers::stream::orders_stream))
        .route("/system/health", get(handlers::system::health))
        .route("/system/memory", get(handlers::system::memory))
        .route("/system/performance", get(handlers::system::performance));

    Router::new()
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(from_fn_with_state(state.clone(), metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Spawns the two background sweepers (§4.2/§4.3), following the teacher's
/// pattern of spawning long-lived services (`websocket/service.rs`'s
/// `WsService::run` polling loop).
fn spawn_sweepers(state: Arc<AppState>) {
    let order_cache_state = state.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(60));
        loop {
            ticker.tick().await;
            let removed = order_cache_state.order_cache.sweep();
            if removed > 0 {
                tracing::debug!(removed, "order cache sweep");
            }
        }
    });

    let idem_state = state;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(3600));
        loop {
            ticker.tick().await;
            let removed = idem_state.idempotency_cache.sweep();
            if removed > 0 {
                tracing::debug!(removed, "idempotency cache sweep");
            }
        }
    });
}

pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config));

    spawn_sweepers(state.clone());

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, "order gateway listening");
    axum::serve(listener, router).await?;

    Ok(())
}

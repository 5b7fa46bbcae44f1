//! `GET /api/orders/stream` — SSE transport for `EventBus`, §4.8/§6.
//!
//! Axum's own `sse` module needs no extra Cargo feature (unlike the
//! teacher's raw-WebSocket "ws" feature in `websocket/connection.rs`), so
//! this is hand-written against `axum::response::sse` directly rather than
//! against any corpus WebSocket idiom, while reusing `EventBus::subscribe`
//! for the fan-out plumbing itself.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream, StreamExt};
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::gateway::state::AppState;

/// Registers a subscriber and turns its channel into an SSE byte stream.
/// The initial `: connected` comment is the first frame written, matching
/// §4.8. A client disconnect drops this stream (and the receiver it owns);
/// the next `EventBus::publish` attempt on the now-closed sender prunes the
/// subscriber (§4.4's "drop on error" contract) — detection happens lazily,
/// which the spec explicitly allows (§5, "acceptable" within a heartbeat
/// interval).
pub async fn orders_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (_id, rx) = state.events.subscribe();

    let connected =
        stream::once(async { Ok::<_, Infallible>(Event::default().comment("connected")) });

    let events = UnboundedReceiverStream::new(rx).map(|event| {
        let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
        Ok(Event::default().event(event.sse_event_name()).data(data))
    });

    Sse::new(connected.chain(events))
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(30)).text("heartbeat"))
}

//! SSE streaming endpoint.
//!
//! GET /api/streams/:topic
//!
//! Subscribes to the push hub by topic string and forwards JSON values as
//! SSE events. Members may subscribe to their own `member:<uuid>` topic;
//! admins may subscribe to any topic.

use std::convert::Infallible;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, StreamExt};
use tokio_stream::wrappers::BroadcastStream;

use crate::common::{AppState, Role};
use crate::kernel::PushHub;
use crate::server::app::AxumAppState;

/// SSE stream handler.
///
/// Topic authorization: a caller's own member topic is always allowed;
/// everything else requires the admin role.
pub async fn stream_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
    Path(topic): Path<String>,
) -> Result<Sse<impl futures::Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    let member_id = caller.require_auth().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let own_topic = PushHub::member_topic(member_id);
    if topic != own_topic && caller.role != Some(Role::Admin) {
        return Err(StatusCode::FORBIDDEN);
    }

    let rx = state.deps.push_hub.subscribe(&topic).await;

    // Stream with connected event and lag handling
    let connected =
        stream::once(async { Ok::<_, Infallible>(Event::default().event("connected").data("ok")) });

    let events = BroadcastStream::new(rx).filter_map(|result| async {
        match result {
            Ok(value) => {
                let event_name = value
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or("message");
                Event::default()
                    .event(event_name)
                    .json_data(&value)
                    .ok()
                    .map(Ok)
            }
            Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(n)) => {
                Event::default()
                    .event("lagged")
                    .json_data(&serde_json::json!({"missed": n}))
                    .ok()
                    .map(Ok)
            }
        }
    });

    Ok(Sse::new(connected.chain(events)).keep_alive(KeepAlive::default()))
}

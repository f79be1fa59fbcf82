//! Browser-facing notification stream.
//!
//! Each browser connection gets its own backend subscription. The
//! [`Subscription`](crate::notifications::Subscription) guard lives inside
//! the response stream, so closing the tab drops the stream, which drops
//! the guard, which closes the backend connection.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use bazaar_core::Notification;
use futures::Stream;
use tokio::sync::mpsc;
use tracing::instrument;

use crate::middleware::RequireUser;
use crate::state::AppState;

/// Interval between keep-alive comments on an idle stream.
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

fn to_event(notification: &Notification) -> Option<Event> {
    Event::default()
        .event("notification")
        .json_data(notification)
        .inspect_err(|e| tracing::debug!(error = %e, "Skipping unserializable notification"))
        .ok()
}

/// `GET /api/notifications/stream`
#[instrument(skip_all, fields(user_id = %current.user.id))]
pub async fn stream(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();
    let subscription = state
        .notifications()
        .subscribe(Some(current.token), move |notification: Notification| {
            // The receiver is gone once the browser disconnects.
            let _ = tx.send(notification);
        });

    let events = async_stream::stream! {
        let _subscription = subscription;
        while let Some(notification) = rx.recv().await {
            if let Some(event) = to_event(&notification) {
                yield Ok(event);
            }
        }
    };

    Sse::new(events).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_becomes_named_event() {
        let notification = Notification {
            kind: "order.created".to_string(),
            message: "New order".to_string(),
            ..Notification::default()
        };
        assert!(to_event(&notification).is_some());
    }
}

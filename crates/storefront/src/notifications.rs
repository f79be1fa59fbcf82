//! Realtime notification subscriber.
//!
//! Holds one streaming connection to the backend's notification endpoint
//! per [`Subscription`]. The stream is newline-delimited JSON; SSE framing
//! (`data:` prefixes, comments, `event:`/`id:`/`retry:` fields) is
//! tolerated and stripped. Lines that do not parse are dropped.
//!
//! Dropped connections are reopened after a fixed delay, the way a browser
//! `EventSource` reconnects. A credential rejection (401/403) ends the
//! subscription instead, since retrying cannot succeed.

use std::time::Duration;

use bazaar_core::view::normalize_ids;
use futures::StreamExt;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::api::ApiClient;

/// Backend path of the notification stream.
pub const NOTIFICATION_STREAM_PATH: &str = "notifications/stream";

/// SSE field names that carry no payload.
const CONTROL_FIELDS: &[&str] = &["event:", "id:", "retry:"];

/// Opens notification streams against the backend.
#[derive(Debug, Clone)]
pub struct NotificationSubscriber {
    client: ApiClient,
    retry: Duration,
}

/// Guard owning one live notification connection.
///
/// Dropping it aborts the background task, which closes the connection.
#[derive(Debug)]
#[must_use = "dropping the subscription closes the connection"]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    /// Whether the background task has stopped (credential rejected).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl NotificationSubscriber {
    /// Create a subscriber that reconnects after `retry`.
    #[must_use]
    pub const fn new(client: ApiClient, retry: Duration) -> Self {
        Self { client, retry }
    }

    /// Open a connection and call `on_message` for every decoded payload.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn subscribe<T, F>(&self, token: Option<SecretString>, mut on_message: F) -> Subscription
    where
        T: DeserializeOwned + Send + 'static,
        F: FnMut(T) + Send + 'static,
    {
        let client = self.client.clone();
        let retry = self.retry;
        let span = tracing::info_span!("notification_subscription");

        let task = tokio::spawn(
            async move {
                loop {
                    match client
                        .open_stream(NOTIFICATION_STREAM_PATH, token.as_ref())
                        .await
                    {
                        Ok(response) => {
                            tracing::debug!("Notification stream connected");
                            let mut lines = LineBuffer::default();
                            let mut bytes = std::pin::pin!(response.bytes_stream());

                            while let Some(chunk) = bytes.next().await {
                                match chunk {
                                    Ok(chunk) => {
                                        for line in lines.push(&chunk) {
                                            if let Some(message) = parse_line::<T>(&line) {
                                                on_message(message);
                                            }
                                        }
                                    }
                                    Err(e) => {
                                        tracing::debug!(error = %e, "Notification stream interrupted");
                                        break;
                                    }
                                }
                            }
                        }
                        Err(e) if e.is_auth_rejection() => {
                            tracing::warn!(error = %e, "Notification stream rejected credential");
                            return;
                        }
                        Err(e) => {
                            tracing::debug!(error = %e, "Notification stream unavailable");
                        }
                    }

                    tokio::time::sleep(retry).await;
                }
            }
            .instrument(span),
        );

        Subscription { task }
    }
}

/// Longest line the stream reader will hold before giving up on it.
pub(crate) const MAX_LINE_BYTES: usize = 64 * 1024;

/// Accumulates raw bytes and yields complete lines.
///
/// Works on bytes so a multi-byte character split across chunks is
/// reassembled before decoding. A line longer than [`MAX_LINE_BYTES`] is
/// dropped, up to and including its terminating newline.
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    pending: Vec<u8>,
    discarding: bool,
}

impl LineBuffer {
    /// Append a chunk and drain every complete line.
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let rest = self.pending.split_off(pos + 1);
            let mut line = std::mem::replace(&mut self.pending, rest);
            if std::mem::take(&mut self.discarding) || line.len() > MAX_LINE_BYTES {
                continue;
            }
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }

        if self.pending.len() > MAX_LINE_BYTES {
            tracing::warn!(bytes = self.pending.len(), "Dropping oversized notification line");
            self.pending.clear();
            self.discarding = true;
        }
        lines
    }
}

/// Decode one stream line.
///
/// Returns `None` for blank lines, SSE comments and control fields, and
/// anything that is not valid JSON for `T`.
pub(crate) fn parse_line<T: DeserializeOwned>(line: &str) -> Option<T> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return None;
    }
    if CONTROL_FIELDS.iter().any(|field| line.starts_with(field)) {
        return None;
    }

    let payload = line.strip_prefix("data:").map_or(line, str::trim_start);
    let value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "Dropping malformed notification payload");
            return None;
        }
    };

    match serde_json::from_value(normalize_ids(value)) {
        Ok(message) => Some(message),
        Err(e) => {
            tracing::debug!(error = %e, "Dropping notification with unexpected shape");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::Notification;
    use serde_json::Value;

    use super::*;

    #[test]
    fn test_parse_plain_and_prefixed_lines() {
        let plain: Value = parse_line(r#"{"type": "order.created"}"#).unwrap();
        assert_eq!(plain["type"], "order.created");

        let prefixed: Notification =
            parse_line(r#"data: {"_id": "n1", "type": "store.approved", "message": "Approved"}"#)
                .unwrap();
        assert_eq!(prefixed.id.as_str(), "n1");
        assert_eq!(prefixed.kind, "store.approved");

        let tight: Value = parse_line(r#"data:{"a":1}"#).unwrap();
        assert_eq!(tight["a"], 1);
    }

    #[test]
    fn test_parse_skips_control_and_malformed_lines() {
        assert!(parse_line::<Value>("").is_none());
        assert!(parse_line::<Value>(": keep-alive").is_none());
        assert!(parse_line::<Value>("event: notification").is_none());
        assert!(parse_line::<Value>("retry: 3000").is_none());
        assert!(parse_line::<Value>("data: {not json").is_none());
        assert!(parse_line::<Notification>("data: 42").is_none());
    }

    #[test]
    fn test_line_buffer_joins_split_chunks() {
        let mut buffer = LineBuffer::default();
        assert!(buffer.push(b"{\"a\":").is_empty());
        assert_eq!(buffer.push(b"1}\r\n{\"b\""), vec!["{\"a\":1}".to_string()]);
        assert_eq!(
            buffer.push(b":2}\n\n"),
            vec!["{\"b\":2}".to_string(), String::new()]
        );
    }

    #[test]
    fn test_line_buffer_reassembles_multibyte_chars() {
        let mut buffer = LineBuffer::default();
        let text = "สวัสดี\n".as_bytes();
        let (head, tail) = text.split_at(4);
        assert!(buffer.push(head).is_empty());
        assert_eq!(buffer.push(tail), vec!["สวัสดี".to_string()]);
    }

    #[test]
    fn test_line_buffer_drops_oversized_line() {
        let mut buffer = LineBuffer::default();
        let junk = vec![b'x'; MAX_LINE_BYTES / 2 + 1];
        assert!(buffer.push(&junk).is_empty());
        assert!(buffer.push(&junk).is_empty());
        assert!(buffer.pending.is_empty());

        assert!(buffer.push(&junk).is_empty());
        assert_eq!(
            buffer.push(b"tail\n{\"ok\":true}\n"),
            vec!["{\"ok\":true}".to_string()]
        );
        assert!(!buffer.discarding);

        let mut long = vec![b'y'; MAX_LINE_BYTES + 1];
        long.extend_from_slice(b"\nnext\n");
        assert_eq!(buffer.push(&long), vec!["next".to_string()]);
    }
}

//! In-process connection directory and real-time push transport.
//!
//! Topic-keyed broadcast channels feeding the SSE endpoints. A member's live
//! connections subscribe to their `member:<uuid>` topic; the notification
//! dispatcher publishes there when the member is connected. The hub is
//! constructed once at process start and injected through `ServerDeps` -
//! never reached for as ambient state.
//!
//! # Usage
//!
//! Producers (dispatcher):
//!   hub.publish(&PushHub::member_topic(member_id), json!({"type": "notification", ...})).await;
//!
//! Consumers (SSE endpoints):
//!   let rx = hub.subscribe(&topic).await;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::common::MemberId;

/// In-process pub/sub hub for push delivery.
///
/// Thread-safe, cloneable. Keyed by string topics.
/// Payloads are `serde_json::Value` - domains serialize their own types.
#[derive(Clone)]
pub struct PushHub {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<serde_json::Value>>>>,
    capacity: usize,
}

impl PushHub {
    /// Create a new PushHub with default capacity (256 messages per channel).
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a new PushHub with the given channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Topic carrying a member's personal push stream.
    pub fn member_topic(member_id: MemberId) -> String {
        format!("member:{}", member_id)
    }

    /// Publish a JSON value to a topic. No-op if no subscribers.
    pub async fn publish(&self, topic: &str, value: serde_json::Value) {
        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(topic) {
            // Ignore send errors (no active receivers)
            let _ = tx.send(value);
        }
    }

    /// Subscribe to a topic. Creates the channel if it doesn't exist.
    pub async fn subscribe(&self, topic: &str) -> broadcast::Receiver<serde_json::Value> {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        tx.subscribe()
    }

    /// Whether any live connection is subscribed to a topic.
    ///
    /// The dispatcher uses this to skip offline members: they pick the
    /// notification up from their list on the next poll instead.
    pub async fn is_connected(&self, topic: &str) -> bool {
        let channels = self.channels.read().await;
        channels
            .get(topic)
            .map(|tx| tx.receiver_count() > 0)
            .unwrap_or(false)
    }

    /// Remove channels with zero subscribers (housekeeping).
    pub async fn cleanup(&self) {
        let mut channels = self.channels.write().await;
        channels.retain(|_, tx| tx.receiver_count() > 0);
    }
}

impl Default for PushHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_subscribe_roundtrip() {
        let hub = PushHub::new();
        let topic = PushHub::member_topic(MemberId::new());
        let mut rx = hub.subscribe(&topic).await;

        let value = serde_json::json!({"type": "notification", "title": "hello"});
        hub.publish(&topic, value.clone()).await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received, value);
    }

    #[tokio::test]
    async fn test_publish_no_subscribers_is_noop() {
        let hub = PushHub::new();
        // Should not panic
        hub.publish("nobody:listening", serde_json::json!({"data": "dropped"}))
            .await;
    }

    #[tokio::test]
    async fn test_is_connected_tracks_subscriptions() {
        let hub = PushHub::new();
        let topic = PushHub::member_topic(MemberId::new());

        assert!(!hub.is_connected(&topic).await);

        let rx = hub.subscribe(&topic).await;
        assert!(hub.is_connected(&topic).await);

        drop(rx);
        assert!(!hub.is_connected(&topic).await);
    }

    #[tokio::test]
    async fn test_cleanup_removes_empty_channels() {
        let hub = PushHub::new();
        let rx = hub.subscribe("ephemeral:topic").await;

        assert_eq!(hub.channels.read().await.len(), 1);

        drop(rx);
        hub.cleanup().await;

        assert_eq!(hub.channels.read().await.len(), 0);
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let hub = PushHub::new();
        let mut rx1 = hub.subscribe("multi:topic").await;
        let mut rx2 = hub.subscribe("multi:topic").await;

        let value = serde_json::json!({"type": "broadcast"});
        hub.publish("multi:topic", value.clone()).await;

        assert_eq!(rx1.recv().await.unwrap(), value);
        assert_eq!(rx2.recv().await.unwrap(), value);
    }
}

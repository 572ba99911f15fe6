//! Notification dispatcher: persist messages and push them to connected
//! members in real time.
//!
//! Fire-and-forget with respect to callers: every failure here is logged and
//! swallowed. Registering a mating must never fail because the alerting
//! subsystem is unhealthy, so the public methods are infallible by signature.

use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::common::{MemberId, Role};
use crate::domains::member::Member;
use crate::domains::notifications::models::notification::Notification;
use crate::kernel::push_hub::PushHub;
use crate::kernel::BaseClock;

/// Calendar marker prepended to the date footer; its presence in a body
/// means the body already carries a date.
const DATE_MARKER: &str = "\u{1F4C5}";

/// Append a creation-date footer unless the body already carries one.
fn with_date_footer(body: &str, today: NaiveDate) -> String {
    if body.contains(DATE_MARKER) {
        return body.to_string();
    }
    format!("{}\n\n{} {}", body, DATE_MARKER, today.format("%d/%m/%Y"))
}

/// Persists notifications and pushes them over the hub.
#[derive(Clone)]
pub struct Dispatcher {
    pool: PgPool,
    hub: PushHub,
    clock: Arc<dyn BaseClock>,
}

impl Dispatcher {
    pub fn new(pool: PgPool, hub: PushHub, clock: Arc<dyn BaseClock>) -> Self {
        Self { pool, hub, clock }
    }

    fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    /// Notify all active members holding any of `roles`.
    ///
    /// One row per recipient, single bulk insert; currently connected
    /// recipients additionally get an immediate push. Returns the number of
    /// rows created (0 when no member matched or on failure).
    pub async fn broadcast_to_roles(
        &self,
        title: &str,
        body: &str,
        severity: &str,
        category: &str,
        roles: &[Role],
    ) -> usize {
        let members = match Member::find_active_with_roles(roles, &self.pool).await {
            Ok(members) => members,
            Err(e) => {
                tracing::error!(error = %e, "notification broadcast: recipient lookup failed");
                return 0;
            }
        };
        if members.is_empty() {
            tracing::info!(?roles, title, "notification broadcast matched no members");
            return 0;
        }

        let body = with_date_footer(body, self.today());
        let member_ids: Vec<MemberId> = members.iter().map(|m| m.id).collect();

        let created =
            match Notification::insert_many(&member_ids, title, &body, severity, category, &self.pool)
                .await
            {
                Ok(created) => created,
                Err(e) => {
                    tracing::error!(error = %e, title, "notification broadcast: insert failed");
                    return 0;
                }
            };

        for notification in &created {
            self.push_if_connected(notification).await;
        }

        created.len()
    }

    /// Notify a single member. Returns whether a row was created.
    pub async fn send_to_member(
        &self,
        member_id: MemberId,
        title: &str,
        body: &str,
        severity: &str,
        category: &str,
    ) -> bool {
        let body = with_date_footer(body, self.today());
        match Notification::insert(member_id, title, &body, severity, category, &self.pool).await {
            Ok(notification) => {
                self.push_if_connected(&notification).await;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, %member_id, title, "notification send failed");
                false
            }
        }
    }

    /// Best-effort push; offline members pick the row up from their list.
    async fn push_if_connected(&self, notification: &Notification) {
        let topic = PushHub::member_topic(notification.member_id);
        if !self.hub.is_connected(&topic).await {
            return;
        }
        self.hub
            .publish(
                &topic,
                serde_json::json!({
                    "type": "notification",
                    "id": notification.id,
                    "title": notification.title,
                    "body": notification.body,
                    "severity": notification.severity,
                    "category": notification.category,
                    "created_at": notification.created_at,
                }),
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_footer_appended_when_body_has_no_date() {
        let body = with_date_footer("Mating MONTA-3 registered", day());
        assert!(body.ends_with("\u{1F4C5} 14/03/2025"));
        assert!(body.starts_with("Mating MONTA-3 registered"));
    }

    #[test]
    fn test_footer_skipped_when_marker_present() {
        let original = "Visit due \u{1F4C5} 01/01/2025";
        assert_eq!(with_date_footer(original, day()), original);
    }

    struct FixedClock(chrono::DateTime<chrono::Utc>);

    impl BaseClock for FixedClock {
        fn now(&self) -> chrono::DateTime<chrono::Utc> {
            self.0
        }
    }

    #[tokio::test]
    async fn test_footer_date_comes_from_injected_clock() {
        let instant = "2025-03-14T23:59:00Z".parse().unwrap();
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let dispatcher = Dispatcher::new(pool, PushHub::new(), Arc::new(FixedClock(instant)));
        assert_eq!(dispatcher.today(), day());
    }
}

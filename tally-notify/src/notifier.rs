//! Broadcast notifier.
//!
//! Fans one change notification out to every registered endpoint
//! except the originator. Deliveries run as independent futures and
//! are joined without short-circuiting: one bounced recipient never
//! blocks or fails the rest. A bounced recipient is evicted from the
//! registry (self-healing against endpoints that stopped existing).

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, warn};

use tally_domain::{format_date, EndpointId, LedgerRecord};

use crate::messenger::MessengerPort;
use crate::registry::SubscriberRegistry;

/// Fans out add-notifications to subscribers.
pub struct Notifier<M: MessengerPort> {
    registry: Arc<SubscriberRegistry>,
    messenger: Arc<M>,
}

impl<M: MessengerPort> Notifier<M> {
    /// Create a notifier over the shared registry and transport
    pub fn new(registry: Arc<SubscriberRegistry>, messenger: Arc<M>) -> Self {
        Self { registry, messenger }
    }

    /// Announce a freshly added record to everyone except `origin`.
    ///
    /// Returns the number of successful deliveries. Failures are
    /// handled internally (eviction + log) and never surface to the
    /// caller: the sender's command already succeeded.
    pub async fn announce_add(
        &self,
        origin: EndpointId,
        actor_name: &str,
        record: &LedgerRecord,
    ) -> usize {
        let targets: Vec<EndpointId> = self
            .registry
            .snapshot()
            .into_iter()
            .filter(|endpoint| *endpoint != origin)
            .collect();

        if targets.is_empty() {
            return 0;
        }

        let text = notification_text(actor_name, record);

        let deliveries = targets.into_iter().map(|endpoint| {
            let messenger = Arc::clone(&self.messenger);
            let text = text.clone();
            async move { (endpoint, messenger.send_text(endpoint, &text).await) }
        });

        let mut delivered = 0;
        for (endpoint, result) in join_all(deliveries).await {
            match result {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(%endpoint, error = %e, "Delivery bounced, evicting endpoint");
                    self.registry.evict(endpoint);
                }
            }
        }

        debug!(seq = record.seq, delivered, "Broadcast complete");
        delivered
    }
}

fn notification_text(actor_name: &str, record: &LedgerRecord) -> String {
    format!(
        "🔔 {} mencatat #{}\n{}\n{} | {} | {}",
        actor_name,
        record.seq,
        format_date(record.date),
        record.application,
        record.plan_type,
        record.profit
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messenger::StubMessenger;
    use chrono::NaiveDate;
    use tally_domain::Profit;
    use tempfile::tempdir;

    fn create_test_record() -> LedgerRecord {
        LedgerRecord::new(
            4,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            "Canva",
            "lifetime",
            Profit::new(15000).unwrap(),
        )
        .unwrap()
    }

    fn create_test_notifier(
        dir: &tempfile::TempDir,
    ) -> (Notifier<StubMessenger>, Arc<SubscriberRegistry>, Arc<StubMessenger>) {
        let registry = Arc::new(SubscriberRegistry::load(dir.path().join("roster.json")));
        let messenger = Arc::new(StubMessenger::new());
        let notifier = Notifier::new(Arc::clone(&registry), Arc::clone(&messenger));
        (notifier, registry, messenger)
    }

    #[tokio::test]
    async fn test_broadcast_skips_originator() {
        let dir = tempdir().unwrap();
        let (notifier, registry, messenger) = create_test_notifier(&dir);

        registry.register(EndpointId(1));
        registry.register(EndpointId(2));
        registry.register(EndpointId(3));

        let delivered = notifier
            .announce_add(EndpointId(1), "Budi", &create_test_record())
            .await;

        assert_eq!(delivered, 2);
        assert_eq!(messenger.recipients(), vec![EndpointId(2), EndpointId(3)]);
    }

    #[tokio::test]
    async fn test_broadcast_text_contents() {
        let dir = tempdir().unwrap();
        let (notifier, registry, messenger) = create_test_notifier(&dir);

        registry.register(EndpointId(1));
        registry.register(EndpointId(2));

        notifier
            .announce_add(EndpointId(1), "Budi", &create_test_record())
            .await;

        let sent = messenger.sent();
        assert_eq!(sent.len(), 1);
        let text = &sent[0].1;
        assert!(text.contains("Budi"));
        assert!(text.contains("#4"));
        assert!(text.contains("15/03/2024"));
        assert!(text.contains("Canva | lifetime | Rp 15.000"));
    }

    #[tokio::test]
    async fn test_failed_delivery_evicts_without_blocking_others() {
        let dir = tempdir().unwrap();
        let (notifier, registry, messenger) = create_test_notifier(&dir);

        registry.register(EndpointId(1));
        registry.register(EndpointId(2));
        registry.register(EndpointId(3));
        messenger.fail_endpoint(EndpointId(3));

        let delivered = notifier
            .announce_add(EndpointId(1), "Budi", &create_test_record())
            .await;

        assert_eq!(delivered, 1, "E2 still reached");
        assert!(!registry.contains(EndpointId(3)), "E3 evicted");
        assert!(registry.contains(EndpointId(2)));

        // Next broadcast only reaches E2
        let delivered = notifier
            .announce_add(EndpointId(1), "Budi", &create_test_record())
            .await;
        assert_eq!(delivered, 1);
        assert_eq!(registry.snapshot(), vec![EndpointId(1), EndpointId(2)]);
    }

    #[tokio::test]
    async fn test_broadcast_with_empty_roster() {
        let dir = tempdir().unwrap();
        let (notifier, _registry, messenger) = create_test_notifier(&dir);

        let delivered = notifier
            .announce_add(EndpointId(1), "Budi", &create_test_record())
            .await;

        assert_eq!(delivered, 0);
        assert!(messenger.sent().is_empty());
    }

    #[tokio::test]
    async fn test_originator_only_roster_sends_nothing() {
        let dir = tempdir().unwrap();
        let (notifier, registry, messenger) = create_test_notifier(&dir);
        registry.register(EndpointId(1));

        let delivered = notifier
            .announce_add(EndpointId(1), "Budi", &create_test_record())
            .await;

        assert_eq!(delivered, 0);
        assert!(messenger.sent().is_empty());
    }
}

use super::{CheckAvailabilityError, CheckOutcome, StateWrite};
use crate::contracts::{NotificationTransport, StateGateway, StateKey};
use crate::data_transfer::{Dose, Location};
use crate::fingerprint::Fingerprint;
use crate::render::render;
use std::sync::Arc;

/// Sends the rendered availability only when it differs from what was last sent.
///
/// The stored fingerprint is written after the transport accepted the notification, so a
/// failed send leaves the previous fingerprint in place and the next run sends again.
pub struct ChangeDetector {
    state: Arc<dyn StateGateway>,
    transport: Arc<dyn NotificationTransport>,
}

impl ChangeDetector {
    pub fn new(state: Arc<dyn StateGateway>, transport: Arc<dyn NotificationTransport>) -> Self {
        Self { state, transport }
    }

    #[tracing::instrument(err, skip(self, locations), level = "info")]
    pub async fn notify_if_changed(
        &self,
        key: &StateKey,
        locations: &[Location],
        dose: Dose,
    ) -> Result<CheckOutcome, CheckAvailabilityError> {
        if locations.is_empty() {
            tracing::info!("Everything booked");
            return Ok(CheckOutcome::NothingAvailable);
        }

        let text = render(locations, dose);
        let fingerprint = Fingerprint::of(&text);
        let previous = self
            .state
            .get(key)
            .await
            .map_err(CheckAvailabilityError::StateRead)?;

        if previous.as_ref() == Some(&fingerprint) {
            tracing::info!(%fingerprint, "No new availability added since last sent email");
            return Ok(CheckOutcome::Unchanged { fingerprint });
        }

        self.transport
            .send(&text)
            .await
            .map_err(CheckAvailabilityError::Notification)?;

        let stored = self
            .state
            .compare_and_put(key, previous, &fingerprint)
            .await
            .map_err(CheckAvailabilityError::StateWrite)?;

        let state = if stored {
            StateWrite::Advanced
        } else {
            tracing::warn!(
                %fingerprint,
                "The stored fingerprint changed while this run was sending, leaving it as is"
            );
            StateWrite::Conflicted
        };
        tracing::info!(%fingerprint, locations = locations.len(), "Notification sent");

        Ok(CheckOutcome::Notified { fingerprint, state })
    }
}

#[cfg(test)]
mod tests {
    use super::ChangeDetector;
    use crate::contracts::check_availability::{CheckAvailabilityError, CheckOutcome, StateWrite};
    use crate::contracts::{
        MockNotificationTransport, MockStateGateway, NotificationTransport, StateGateway,
        StateKey,
    };
    use crate::data_transfer::{
        AgeEligibility, Dose, FeeType, Location, LocationId, Pincode, Session,
    };
    use crate::fingerprint::Fingerprint;
    use crate::render::render;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct InMemoryState {
        values: Mutex<HashMap<StateKey, Fingerprint>>,
    }

    #[async_trait]
    impl StateGateway for InMemoryState {
        async fn get(&self, key: &StateKey) -> anyhow::Result<Option<Fingerprint>> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn put(&self, key: &StateKey, fingerprint: &Fingerprint) -> anyhow::Result<()> {
            self.values
                .lock()
                .unwrap()
                .insert(key.clone(), fingerprint.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl NotificationTransport for RecordingTransport {
        async fn send(&self, text: &str) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn key() -> StateKey {
        StateKey::from("last-email-hash")
    }

    fn locations(capacity: u32) -> Vec<Location> {
        vec![Location {
            id: LocationId::from(7),
            name: "Cooper Hospital".to_string(),
            address: "Juhu".to_string(),
            pincode: Pincode::from(400056),
            fee_type: FeeType::Free,
            sessions: vec![Session {
                date: "03-05-2021".to_string(),
                dose_one_capacity: capacity,
                dose_two_capacity: 0,
                vaccine: Some("COVISHIELD".to_string()),
                age_eligibility: AgeEligibility::AllAges,
            }],
        }]
    }

    #[tokio::test]
    async fn test_consecutive_runs_with_same_availability_send_once() {
        let state = Arc::new(InMemoryState::default());
        let transport = Arc::new(RecordingTransport::default());
        let detector = ChangeDetector::new(state.clone(), transport.clone());

        let first = detector
            .notify_if_changed(&key(), &locations(3), Dose::First)
            .await
            .unwrap();
        let second = detector
            .notify_if_changed(&key(), &locations(3), Dose::First)
            .await
            .unwrap();

        let expected = Fingerprint::of(&render(&locations(3), Dose::First));
        assert_eq!(
            first,
            CheckOutcome::Notified {
                fingerprint: expected.clone(),
                state: StateWrite::Advanced
            }
        );
        assert_eq!(
            second,
            CheckOutcome::Unchanged {
                fingerprint: expected.clone()
            }
        );
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
        assert_eq!(state.get(&key()).await.unwrap(), Some(expected));
    }

    #[tokio::test]
    async fn test_changed_availability_is_sent_again() {
        let state = Arc::new(InMemoryState::default());
        let transport = Arc::new(RecordingTransport::default());
        let detector = ChangeDetector::new(state.clone(), transport.clone());

        detector
            .notify_if_changed(&key(), &locations(3), Dose::First)
            .await
            .unwrap();
        detector
            .notify_if_changed(&key(), &locations(1), Dose::First)
            .await
            .unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            state.get(&key()).await.unwrap(),
            Some(Fingerprint::of(&sent[1]))
        );
    }

    #[tokio::test]
    async fn test_empty_result_skips_state_and_transport() {
        let mut state = MockStateGateway::new();
        state.expect_get().times(0);
        state.expect_compare_and_put().times(0);
        let mut transport = MockNotificationTransport::new();
        transport.expect_send().times(0);
        let detector = ChangeDetector::new(Arc::new(state), Arc::new(transport));

        let outcome = detector
            .notify_if_changed(&key(), &[], Dose::First)
            .await
            .unwrap();

        assert_eq!(outcome, CheckOutcome::NothingAvailable);
    }

    #[tokio::test]
    async fn test_failed_send_leaves_state_unchanged() {
        let mut state = MockStateGateway::new();
        state.expect_get().times(1).returning(|_| Ok(None));
        state.expect_compare_and_put().times(0);
        state.expect_put().times(0);
        let mut transport = MockNotificationTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("mail server unavailable")));
        let detector = ChangeDetector::new(Arc::new(state), Arc::new(transport));

        let result = detector
            .notify_if_changed(&key(), &locations(3), Dose::First)
            .await;

        assert!(matches!(
            result,
            Err(CheckAvailabilityError::Notification(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_state_read_sends_nothing() {
        let mut state = MockStateGateway::new();
        state
            .expect_get()
            .returning(|_| Err(anyhow::anyhow!("parameter store unavailable")));
        let mut transport = MockNotificationTransport::new();
        transport.expect_send().times(0);
        let detector = ChangeDetector::new(Arc::new(state), Arc::new(transport));

        let result = detector
            .notify_if_changed(&key(), &locations(3), Dose::First)
            .await;

        assert!(matches!(result, Err(CheckAvailabilityError::StateRead(_))));
    }

    #[tokio::test]
    async fn test_state_written_by_another_run_is_reported_as_conflict() {
        let previous = Fingerprint::from("0cc175b9c0f1b6a831c399e269772661");
        let mut state = MockStateGateway::new();
        let stored = previous.clone();
        state
            .expect_get()
            .returning(move |_| Ok(Some(stored.clone())));
        state
            .expect_compare_and_put()
            .withf(move |_, expected, _| expected.as_ref() == Some(&previous))
            .times(1)
            .returning(|_, _, _| Ok(false));
        let mut transport = MockNotificationTransport::new();
        transport.expect_send().times(1).returning(|_| Ok(()));
        let detector = ChangeDetector::new(Arc::new(state), Arc::new(transport));

        let outcome = detector
            .notify_if_changed(&key(), &locations(3), Dose::First)
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            CheckOutcome::Notified {
                state: StateWrite::Conflicted,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_default_compare_and_put_rejects_stale_expectation() {
        let state = InMemoryState::default();
        state
            .put(&key(), &Fingerprint::from("written-by-another-run"))
            .await
            .unwrap();

        let stored = state
            .compare_and_put(&key(), None, &Fingerprint::from("mine"))
            .await
            .unwrap();

        assert!(!stored);
        assert_eq!(
            state.get(&key()).await.unwrap(),
            Some(Fingerprint::from("written-by-another-run"))
        );
    }
}

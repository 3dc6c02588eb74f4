mod change_detector;
mod collector;

pub use change_detector::ChangeDetector;
pub use collector::AvailabilityCollector;

use crate::contracts::{DistrictId, FeedSource, NotificationTransport, StateGateway, StateKey};
use crate::criteria::SubscriberCriteria;
use crate::fingerprint::Fingerprint;
use crate::normalize::InvalidFeedData;
use shared_kernel::date_time::kolkata_date::KolkataDate;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckAvailabilityError {
    #[error(transparent)]
    InvalidFeedData(#[from] InvalidFeedData),
    #[error("Failed to fetch availability for the period starting {window_start}")]
    Feed {
        window_start: KolkataDate,
        #[source]
        source: anyhow::Error,
    },
    #[error("Failed to read the fingerprint of the last notification")]
    StateRead(#[source] anyhow::Error),
    #[error("Failed to store the fingerprint of the sent notification")]
    StateWrite(#[source] anyhow::Error),
    #[error("Failed to send the notification")]
    Notification(#[source] anyhow::Error),
}

/// The date windows to query: `periods` consecutive windows of `days_per_period` days
/// starting on `start`.
#[derive(Clone, Debug)]
pub struct Lookahead {
    pub start: KolkataDate,
    pub district: DistrictId,
    pub periods: u32,
    pub days_per_period: u32,
}

impl Lookahead {
    pub fn window_starts(&self) -> Vec<KolkataDate> {
        (0..self.periods)
            .map(|period| {
                self.start
                    .add_days(i64::from(period) * i64::from(self.days_per_period))
            })
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct CheckRequest {
    pub criteria: SubscriberCriteria,
    pub lookahead: Lookahead,
    pub state_key: StateKey,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StateWrite {
    Advanced,
    /// Another run changed the stored fingerprint after this run read it. The stored
    /// value is left alone and the next run compares against it.
    Conflicted,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CheckOutcome {
    NothingAvailable,
    Unchanged {
        fingerprint: Fingerprint,
    },
    Notified {
        fingerprint: Fingerprint,
        state: StateWrite,
    },
}

pub struct CheckAvailabilityInteractor {
    collector: AvailabilityCollector,
    detector: ChangeDetector,
}

impl CheckAvailabilityInteractor {
    pub fn new(
        feed: Arc<dyn FeedSource>,
        state: Arc<dyn StateGateway>,
        transport: Arc<dyn NotificationTransport>,
    ) -> Self {
        Self {
            collector: AvailabilityCollector::new(feed),
            detector: ChangeDetector::new(state, transport),
        }
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    pub async fn check(&self, request: &CheckRequest) -> Result<CheckOutcome, CheckAvailabilityError> {
        let locations = self
            .collector
            .matching_locations(&request.criteria, &request.lookahead)
            .await?;
        self.detector
            .notify_if_changed(&request.state_key, &locations, request.criteria.dose)
            .await
    }
}

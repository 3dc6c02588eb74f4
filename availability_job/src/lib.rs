use availability::contracts::check_availability::{
    AvailabilityCollector, CheckAvailabilityInteractor, CheckRequest, Lookahead,
};
use availability::contracts::{DistrictId, StateKey};
use availability::criteria::{SubscriberCriteria, SubscriberPreferences};
use feed::{CowinFeed, FeedConfig};
use notifications::config::{EmailConfig, RecipientEmail};
use notifications::contracts::send_notification::email::EmailNotifier;
use redis_client::client::{Client, RedisConfig};
use serde::Deserialize;
use shared_kernel::date_time::kolkata_date::KolkataDate;
use std::sync::Arc;

fn default_district_id() -> DistrictId {
    DistrictId::from(395)
}

#[derive(Debug, Deserialize, Clone)]
pub struct SubscriberSettings {
    pub email: RecipientEmail,
    #[serde(default = "default_district_id")]
    pub district_id: DistrictId,
    pub preferences: SubscriberPreferences,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StateSettings {
    pub fingerprint_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub subscriber: SubscriberSettings,
    pub feed: FeedConfig,
    pub email: EmailConfig,
    pub redis: RedisConfig,
    pub state: StateSettings,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        shared_kernel::configuration::config::<Settings>()
    }

    pub fn lookahead(&self, start: KolkataDate) -> Lookahead {
        Lookahead {
            start,
            district: self.subscriber.district_id,
            periods: self.feed.periods,
            days_per_period: self.feed.days_per_period,
        }
    }

    pub fn criteria(&self) -> SubscriberCriteria {
        SubscriberCriteria::from(self.subscriber.preferences.clone())
    }

    /// The request for a run starting today in India Standard Time.
    pub fn check_request(&self) -> CheckRequest {
        CheckRequest {
            criteria: self.criteria(),
            lookahead: self.lookahead(KolkataDate::today()),
            state_key: StateKey::from(self.state.fingerprint_key.clone()),
        }
    }

    pub fn collector(&self) -> AvailabilityCollector {
        AvailabilityCollector::new(Arc::new(CowinFeed::new(&self.feed)))
    }

    pub async fn interactor(&self) -> anyhow::Result<CheckAvailabilityInteractor> {
        let state = Client::connect(&self.redis).await?;
        let transport = EmailNotifier::new(self.email.clone(), self.subscriber.email.clone());
        Ok(CheckAvailabilityInteractor::new(
            Arc::new(CowinFeed::new(&self.feed)),
            Arc::new(state),
            Arc::new(transport),
        ))
    }
}

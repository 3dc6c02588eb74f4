pub mod check_availability;

use crate::fingerprint::Fingerprint;
use crate::normalize::RawPeriodResponse;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use shared_kernel::date_time::kolkata_date::KolkataDate;
use shared_kernel::string_key;

string_key!(StateKey);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DistrictId(u32);

impl DistrictId {
    pub fn inner(&self) -> u32 {
        self.0
    }
}

impl From<u32> for DistrictId {
    fn from(id: u32) -> Self {
        DistrictId(id)
    }
}

impl std::fmt::Display for DistrictId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Source of availability for a single date window. Must be callable concurrently
/// for distinct windows.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_period(
        &self,
        window_start: KolkataDate,
        district: DistrictId,
    ) -> anyhow::Result<RawPeriodResponse>;
}

/// Remembers the fingerprint of the last notification that was sent.
/// `Ok(None)` means nothing was stored, which is different from an empty fingerprint.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StateGateway: Send + Sync {
    async fn get(&self, key: &StateKey) -> anyhow::Result<Option<Fingerprint>>;

    async fn put(&self, key: &StateKey, fingerprint: &Fingerprint) -> anyhow::Result<()>;

    /// Stores `fingerprint` only if the stored value still equals `expected`, and reports
    /// whether it did. Stores that can do this atomically should override the default.
    async fn compare_and_put(
        &self,
        key: &StateKey,
        expected: Option<Fingerprint>,
        fingerprint: &Fingerprint,
    ) -> anyhow::Result<bool> {
        let current = self.get(key).await?;
        if current != expected {
            return Ok(false);
        }
        self.put(key, fingerprint).await?;
        Ok(true)
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Returns once the notification has been accepted for delivery.
    async fn send(&self, text: &str) -> anyhow::Result<()>;
}

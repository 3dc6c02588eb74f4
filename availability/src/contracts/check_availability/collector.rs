use super::{CheckAvailabilityError, Lookahead};
use crate::contracts::FeedSource;
use crate::criteria::SubscriberCriteria;
use crate::data_transfer::Location;
use crate::merge::merge_periods;
use crate::normalize::{normalize, PeriodResponse};
use futures::future::try_join_all;
use std::sync::Arc;

/// Fetches every window of the lookahead concurrently and reduces the responses to
/// one record per matching location.
pub struct AvailabilityCollector {
    feed: Arc<dyn FeedSource>,
}

impl AvailabilityCollector {
    pub fn new(feed: Arc<dyn FeedSource>) -> Self {
        Self { feed }
    }

    #[tracing::instrument(err, skip(self, criteria), level = "info")]
    pub async fn matching_locations(
        &self,
        criteria: &SubscriberCriteria,
        lookahead: &Lookahead,
    ) -> Result<Vec<Location>, CheckAvailabilityError> {
        let periods = self.fetch_periods(lookahead).await?;
        let locations = normalize(periods)?;
        let fetched = locations.len();
        let matching = merge_periods(criteria.filter(locations));
        tracing::debug!(fetched, matching = matching.len(), "Filtered availability");
        Ok(matching)
    }

    async fn fetch_periods(
        &self,
        lookahead: &Lookahead,
    ) -> Result<Vec<PeriodResponse>, CheckAvailabilityError> {
        let district = lookahead.district;
        let fetches = lookahead
            .window_starts()
            .into_iter()
            .map(|window_start| async move {
                self.feed
                    .fetch_period(window_start, district)
                    .await
                    .map(|body| PeriodResponse { window_start, body })
                    .map_err(|source| CheckAvailabilityError::Feed {
                        window_start,
                        source,
                    })
            });
        try_join_all(fetches).await
    }
}

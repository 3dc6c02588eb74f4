use anyhow::Context;
use async_trait::async_trait;
use availability::contracts::{DistrictId, FeedSource};
use availability::normalize::RawPeriodResponse;
use serde::Deserialize;
use shared_kernel::date_time::kolkata_date::KolkataDate;
use shared_kernel::http_client::HttpClient;
use std::collections::HashMap;
use url::Url;

// The public endpoint rejects requests without a browser user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.93 Safari/537.36";

fn default_periods() -> u32 {
    4
}

fn default_days_per_period() -> u32 {
    7
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    pub host: Url,
    #[serde(default = "default_periods")]
    pub periods: u32,
    #[serde(default = "default_days_per_period")]
    pub days_per_period: u32,
}

/// Reads the public CoWIN `calendarByDistrict` endpoint, which returns up to seven days
/// of sessions starting at the requested date.
pub struct CowinFeed {
    calendar_url: Url,
}

impl CowinFeed {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            calendar_url: config.host.clone(),
        }
    }

    fn period_url(&self, window_start: KolkataDate, district: DistrictId) -> Url {
        let mut url = self.calendar_url.clone();
        url.query_pairs_mut()
            .append_pair("district_id", &district.to_string())
            .append_pair("date", &window_start.date().format("%d-%m-%Y").to_string());
        url
    }
}

#[async_trait]
impl FeedSource for CowinFeed {
    #[tracing::instrument(err, skip(self), level = "info")]
    async fn fetch_period(
        &self,
        window_start: KolkataDate,
        district: DistrictId,
    ) -> anyhow::Result<RawPeriodResponse> {
        let url = self.period_url(window_start, district);
        let headers = HashMap::from([
            ("user-agent", USER_AGENT.to_string()),
            ("content-type", "application/json".to_string()),
        ]);
        HttpClient::get_with_headers::<RawPeriodResponse>(url, headers)
            .await
            .with_context(|| format!("Failed to get availability for the week of {window_start}"))
    }
}

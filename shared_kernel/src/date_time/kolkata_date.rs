use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::Asia::Kolkata;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
/// KolkataDate is a calendar date as observed in the `Asia/Kolkata` timezone,
/// which is the timezone the availability feed uses for its date windows.
pub struct KolkataDate(NaiveDate);

impl KolkataDate {
    pub fn today() -> Self {
        KolkataDate(Utc::now().with_timezone(&Kolkata).date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn add_days(&self, days: i64) -> Self {
        KolkataDate(self.0 + Duration::days(days))
    }
}

impl From<NaiveDate> for KolkataDate {
    fn from(date: NaiveDate) -> Self {
        KolkataDate(date)
    }
}

impl std::fmt::Display for KolkataDate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

use crate::data_transfer::{AgeEligibility, FeeType, Location, LocationId, Pincode, Session};
use itertools::Itertools;
use serde::Deserialize;
use shared_kernel::date_time::kolkata_date::KolkataDate;
use thiserror::Error;

/// Age limit assumed for sessions that do not state one.
const DEFAULT_MIN_AGE_LIMIT: u32 = 18;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawSession {
    pub date: Option<String>,
    pub available_capacity: Option<u32>,
    pub available_capacity_dose1: Option<u32>,
    pub available_capacity_dose2: Option<u32>,
    pub min_age_limit: Option<u32>,
    pub max_age_limit: Option<u32>,
    pub allow_all_age: Option<bool>,
    pub vaccine: Option<String>,
}

/// Every field is optional so that a body with missing fields still deserializes and
/// `normalize` can report it as `InvalidFeedData`. A field of the wrong type fails in the
/// feed adapter while the body is parsed.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawCenter {
    pub center_id: Option<u64>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<u32>,
    pub fee_type: Option<String>,
    pub sessions: Option<Vec<RawSession>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawPeriodResponse {
    pub centers: Option<Vec<RawCenter>>,
}

/// A feed response together with the start of the window it was fetched for.
#[derive(Clone, Debug)]
pub struct PeriodResponse {
    pub window_start: KolkataDate,
    pub body: RawPeriodResponse,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidFeedData {
    #[error("Invalid feed data: the period starting {window_start} has no centers")]
    MissingCenters { window_start: KolkataDate },
    #[error("Invalid feed data: center #{position} of the period starting {window_start} has no center_id")]
    MissingIdentifier {
        window_start: KolkataDate,
        position: usize,
    },
    #[error("Invalid feed data: center {center_id} of the period starting {window_start} has no sessions")]
    MissingSessions {
        window_start: KolkataDate,
        center_id: u64,
    },
}

/// Flattens the period responses into location records, in period order and then in
/// feed order. Records of the same location in different periods are kept apart.
pub fn normalize(periods: Vec<PeriodResponse>) -> Result<Vec<Location>, InvalidFeedData> {
    let mut locations = vec![];
    for period in periods {
        let window_start = period.window_start;
        let centers = period
            .body
            .centers
            .ok_or(InvalidFeedData::MissingCenters { window_start })?;

        for (position, center) in centers.into_iter().enumerate() {
            locations.push(normalize_center(window_start, position, center)?);
        }
    }
    Ok(locations)
}

fn normalize_center(
    window_start: KolkataDate,
    position: usize,
    center: RawCenter,
) -> Result<Location, InvalidFeedData> {
    let center_id = center.center_id.ok_or(InvalidFeedData::MissingIdentifier {
        window_start,
        position,
    })?;
    let sessions = center.sessions.ok_or(InvalidFeedData::MissingSessions {
        window_start,
        center_id,
    })?;

    let fee_type = match center.fee_type.as_deref() {
        Some("Paid") => FeeType::Paid,
        _ => FeeType::Free,
    };

    Ok(Location {
        id: LocationId::from(center_id),
        name: center.name.unwrap_or_default(),
        address: center.address.unwrap_or_default(),
        pincode: center.pincode.map(Pincode::from).unwrap_or_default(),
        fee_type,
        sessions: sessions.into_iter().map(normalize_session).collect_vec(),
    })
}

fn normalize_session(session: RawSession) -> Session {
    // Older responses only carry the combined capacity.
    let combined = session.available_capacity.unwrap_or_default();
    let age_eligibility = if session.allow_all_age == Some(true) {
        AgeEligibility::AllAges
    } else {
        AgeEligibility::Band {
            min: session.min_age_limit.unwrap_or(DEFAULT_MIN_AGE_LIMIT),
            max: session.max_age_limit,
        }
    };

    Session {
        date: session.date.unwrap_or_default(),
        dose_one_capacity: session.available_capacity_dose1.unwrap_or(combined),
        dose_two_capacity: session.available_capacity_dose2.unwrap_or(combined),
        vaccine: session.vaccine.filter(|vaccine| !vaccine.trim().is_empty()),
        age_eligibility,
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize, InvalidFeedData, PeriodResponse, RawPeriodResponse};
    use crate::data_transfer::{AgeEligibility, FeeType, LocationId, Pincode};
    use chrono::NaiveDate;
    use shared_kernel::date_time::kolkata_date::KolkataDate;

    fn week(day: u32) -> KolkataDate {
        KolkataDate::from(NaiveDate::from_ymd_opt(2021, 5, day).unwrap())
    }

    fn period(day: u32, body: serde_json::Value) -> PeriodResponse {
        PeriodResponse {
            window_start: week(day),
            body: serde_json::from_value::<RawPeriodResponse>(body).unwrap(),
        }
    }

    #[test]
    fn test_locations_keep_period_then_feed_order() {
        let first = period(
            3,
            serde_json::json!({
                "centers": [
                    { "center_id": 1, "name": "A", "fee_type": "Free", "sessions": [] },
                    { "center_id": 2, "name": "B", "fee_type": "Paid", "sessions": [] }
                ]
            }),
        );
        let second = period(
            10,
            serde_json::json!({
                "centers": [{ "center_id": 1, "name": "A", "sessions": [] }]
            }),
        );

        let locations = normalize(vec![first, second]).unwrap();

        let ids = locations.iter().map(|l| l.id.inner()).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 1]);
        assert_eq!(locations[1].fee_type, FeeType::Paid);
        assert_eq!(locations[2].fee_type, FeeType::Free);
    }

    #[test]
    fn test_session_shapes_are_normalized() {
        let body = serde_json::json!({
            "centers": [{
                "center_id": 7,
                "name": "Cooper Hospital",
                "address": "Juhu",
                "pincode": 400056,
                "fee_type": "Free",
                "sessions": [
                    {
                        "date": "03-05-2021",
                        "available_capacity": 9,
                        "available_capacity_dose1": 4,
                        "available_capacity_dose2": 5,
                        "min_age_limit": 45,
                        "vaccine": "COVISHIELD"
                    },
                    { "date": "04-05-2021", "available_capacity": 3, "min_age_limit": 18, "vaccine": "" },
                    { "date": "05-05-2021", "allow_all_age": true, "min_age_limit": 18 }
                ]
            }]
        });

        let locations = normalize(vec![period(3, body)]).unwrap();

        let location = &locations[0];
        assert_eq!(location.id, LocationId::from(7));
        assert_eq!(location.pincode, Pincode::from(400056));

        let sessions = &location.sessions;
        assert_eq!(sessions[0].dose_one_capacity, 4);
        assert_eq!(sessions[0].dose_two_capacity, 5);
        assert_eq!(sessions[0].vaccine.as_deref(), Some("COVISHIELD"));
        assert_eq!(
            sessions[0].age_eligibility,
            AgeEligibility::Band {
                min: 45,
                max: None
            }
        );
        assert_eq!(sessions[1].dose_one_capacity, 3);
        assert_eq!(sessions[1].dose_two_capacity, 3);
        assert_eq!(sessions[1].vaccine, None);
        assert_eq!(sessions[2].dose_one_capacity, 0);
        assert_eq!(sessions[2].age_eligibility, AgeEligibility::AllAges);
    }

    #[test]
    fn test_empty_period_yields_no_locations() {
        let locations = normalize(vec![period(3, serde_json::json!({ "centers": [] }))]).unwrap();
        assert!(locations.is_empty());
    }

    #[test]
    fn test_period_without_centers_is_invalid() {
        let result = normalize(vec![period(3, serde_json::json!({}))]);
        assert_eq!(
            result,
            Err(InvalidFeedData::MissingCenters {
                window_start: week(3)
            })
        );
    }

    #[test]
    fn test_center_without_identifier_is_invalid() {
        let body = serde_json::json!({
            "centers": [
                { "center_id": 1, "sessions": [] },
                { "name": "No id", "sessions": [] }
            ]
        });

        let result = normalize(vec![period(3, body)]);

        assert_eq!(
            result,
            Err(InvalidFeedData::MissingIdentifier {
                window_start: week(3),
                position: 1
            })
        );
    }

    #[test]
    fn test_center_without_sessions_is_invalid() {
        let body = serde_json::json!({ "centers": [{ "center_id": 4 }] });

        let result = normalize(vec![period(3, body)]);

        assert_eq!(
            result,
            Err(InvalidFeedData::MissingSessions {
                window_start: week(3),
                center_id: 4
            })
        );
    }
}

use crate::data_transfer::{AgeEligibility, Dose, FeeType, Location, LocationId, Pincode, Session};
use itertools::Itertools;
use serde::Deserialize;
use std::collections::HashSet;
use std::hash::Hash;

/// A single subscriber criterion. `Unconstrained` matches everything.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Constraint<T> {
    Unconstrained,
    Constrained(T),
}

impl<T> Constraint<T> {
    pub fn allows(&self, predicate: impl FnOnce(&T) -> bool) -> bool {
        match self {
            Constraint::Unconstrained => true,
            Constraint::Constrained(value) => predicate(value),
        }
    }
}

impl<T> From<Option<T>> for Constraint<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Constraint::Unconstrained, Constraint::Constrained)
    }
}

impl<T: Eq + Hash> Constraint<HashSet<T>> {
    /// An empty allow-list places no restriction.
    pub fn any_of(values: Option<Vec<T>>) -> Self {
        match values {
            Some(values) if !values.is_empty() => {
                Constraint::Constrained(values.into_iter().collect())
            }
            _ => Constraint::Unconstrained,
        }
    }

    /// True when `value` is in the allow-list or there is no allow-list.
    pub fn admits(&self, value: &T) -> bool {
        self.allows(|values| values.contains(value))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AgeBand {
    AboveFortyFive,
    EighteenToFortyFour,
}

impl AgeBand {
    fn minimum_age(&self) -> u32 {
        match self {
            AgeBand::AboveFortyFive => 45,
            AgeBand::EighteenToFortyFour => 18,
        }
    }

    pub fn admits(&self, eligibility: &AgeEligibility) -> bool {
        match eligibility {
            AgeEligibility::AllAges => true,
            AgeEligibility::Band { min, .. } => *min == self.minimum_age(),
        }
    }
}

/// Subscriber preferences as they are written in configuration. Absent or empty
/// fields mean "no preference".
#[derive(Clone, Debug, Deserialize)]
pub struct SubscriberPreferences {
    pub dose: Dose,
    #[serde(default)]
    pub preferred_center_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub preferred_pincodes: Option<Vec<u32>>,
    #[serde(default)]
    pub free: Option<bool>,
    #[serde(default)]
    pub vaccine_types: Option<Vec<String>>,
    #[serde(default)]
    pub above_45: Option<bool>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscriberCriteria {
    pub locations: Constraint<HashSet<LocationId>>,
    pub pincodes: Constraint<HashSet<Pincode>>,
    pub fee_type: Constraint<FeeType>,
    pub vaccines: Constraint<HashSet<String>>,
    pub age_band: Constraint<AgeBand>,
    pub dose: Dose,
}

impl SubscriberCriteria {
    pub fn for_dose(dose: Dose) -> Self {
        Self {
            locations: Constraint::Unconstrained,
            pincodes: Constraint::Unconstrained,
            fee_type: Constraint::Unconstrained,
            vaccines: Constraint::Unconstrained,
            age_band: Constraint::Unconstrained,
            dose,
        }
    }

    /// Keeps the locations that pass the location gates and still have at least one
    /// matching session. Surviving locations only carry their matching sessions.
    pub fn filter(&self, locations: Vec<Location>) -> Vec<Location> {
        locations
            .into_iter()
            .filter(|location| self.accepts_location(location))
            .filter_map(|location| {
                let sessions = location
                    .sessions
                    .into_iter()
                    .filter(|session| self.accepts_session(session))
                    .collect_vec();
                if sessions.is_empty() {
                    return None;
                }
                Some(Location {
                    sessions,
                    ..location
                })
            })
            .collect()
    }

    fn accepts_location(&self, location: &Location) -> bool {
        self.locations.admits(&location.id)
            && self.pincodes.admits(&location.pincode)
            && self
                .fee_type
                .allows(|fee_type| *fee_type == location.fee_type)
    }

    fn accepts_session(&self, session: &Session) -> bool {
        let vaccine_accepted = match &session.vaccine {
            None => true,
            Some(vaccine) => self.vaccines.admits(vaccine),
        };

        session.is_available_for(self.dose)
            && vaccine_accepted
            && self
                .age_band
                .allows(|band| band.admits(&session.age_eligibility))
    }
}

impl From<SubscriberPreferences> for SubscriberCriteria {
    fn from(preferences: SubscriberPreferences) -> Self {
        let locations = preferences
            .preferred_center_ids
            .map(|ids| ids.into_iter().map(LocationId::from).collect_vec());
        let pincodes = preferences
            .preferred_pincodes
            .map(|pincodes| pincodes.into_iter().map(Pincode::from).collect_vec());
        let fee_type = preferences
            .free
            .map(|free| if free { FeeType::Free } else { FeeType::Paid });
        let age_band = preferences.above_45.map(|above_45| {
            if above_45 {
                AgeBand::AboveFortyFive
            } else {
                AgeBand::EighteenToFortyFour
            }
        });

        Self {
            locations: Constraint::any_of(locations),
            pincodes: Constraint::any_of(pincodes),
            fee_type: fee_type.into(),
            vaccines: Constraint::any_of(preferences.vaccine_types),
            age_band: age_band.into(),
            dose: preferences.dose,
        }
    }
}

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(u64);

impl LocationId {
    pub fn inner(&self) -> u64 {
        self.0
    }
}

impl From<u64> for LocationId {
    fn from(id: u64) -> Self {
        LocationId(id)
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pincode(u32);

impl From<u32> for Pincode {
    fn from(pincode: u32) -> Self {
        Pincode(pincode)
    }
}

impl std::fmt::Display for Pincode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FeeType {
    Free,
    Paid,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AgeEligibility {
    AllAges,
    Band { min: u32, max: Option<u32> },
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Dose {
    First,
    Second,
}

impl Dose {
    pub fn number(&self) -> u8 {
        match self {
            Dose::First => 1,
            Dose::Second => 2,
        }
    }
}

impl TryFrom<u8> for Dose {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Dose::First),
            2 => Ok(Dose::Second),
            other => Err(format!("dose must be 1 or 2, got {other}")),
        }
    }
}

impl From<Dose> for u8 {
    fn from(dose: Dose) -> Self {
        dose.number()
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Session {
    pub date: String,
    pub dose_one_capacity: u32,
    pub dose_two_capacity: u32,
    pub vaccine: Option<String>,
    pub age_eligibility: AgeEligibility,
}

impl Session {
    pub fn capacity_for(&self, dose: Dose) -> u32 {
        match dose {
            Dose::First => self.dose_one_capacity,
            Dose::Second => self.dose_two_capacity,
        }
    }

    pub fn is_available_for(&self, dose: Dose) -> bool {
        self.capacity_for(dose) > 0
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub address: String,
    pub pincode: Pincode,
    pub fee_type: FeeType,
    pub sessions: Vec<Session>,
}

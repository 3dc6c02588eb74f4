use crate::data_transfer::{AgeEligibility, Dose, FeeType, Location, Session};
use itertools::Itertools;

fn free_label(fee_type: FeeType) -> &'static str {
    match fee_type {
        FeeType::Free => "Yes",
        FeeType::Paid => "No",
    }
}

fn age_limit_label(eligibility: &AgeEligibility) -> &'static str {
    match eligibility {
        AgeEligibility::AllAges => "all ages",
        AgeEligibility::Band { min: 45, .. } => "45+",
        AgeEligibility::Band { .. } => "18–44 only",
    }
}

fn render_session(session: &Session, dose: Dose) -> String {
    let vaccine = session
        .vaccine
        .as_ref()
        .map(|vaccine| format!("  Vaccine: {vaccine}"))
        .unwrap_or_default();
    format!(
        "Date: {date}{vaccine}\nAvailable Capacity (Dose {dose}): {capacity}  Age Limit: {age_limit}\n",
        date = session.date,
        dose = dose.number(),
        capacity = session.capacity_for(dose),
        age_limit = age_limit_label(&session.age_eligibility),
    )
}

fn render_location(location: &Location, dose: Dose) -> String {
    let header = format!(
        "Center Name: {}  Center Id: {}  Pincode: {}  Free: {}\nAddress: {}\n",
        location.name,
        location.id,
        location.pincode,
        free_label(location.fee_type),
        location.address,
    );
    let sessions = location
        .sessions
        .iter()
        .map(|session| render_session(session, dose))
        .join("\n");
    header + &sessions
}

/// Renders the notification body. Sessions are separated by a blank line and locations
/// by two. Callers are expected to skip rendering when nothing matched.
pub fn render(locations: &[Location], dose: Dose) -> String {
    locations
        .iter()
        .map(|location| render_location(location, dose))
        .join("\n\n")
}

use crate::data_transfer::{Location, LocationId};
use indexmap::map::Entry;
use indexmap::IndexMap;

/// Folds records of the same location coming from different periods into the record
/// seen first. Sessions are appended in arrival order and are not deduplicated; the
/// result keeps first-occurrence order.
pub fn merge_periods(locations: Vec<Location>) -> Vec<Location> {
    let mut merged: IndexMap<LocationId, Location> = IndexMap::with_capacity(locations.len());
    for location in locations {
        match merged.entry(location.id) {
            Entry::Occupied(mut existing) => existing.get_mut().sessions.extend(location.sessions),
            Entry::Vacant(slot) => {
                slot.insert(location);
            }
        }
    }
    merged.into_values().collect()
}

use tracing::{debug, warn};

use crate::listings::Listing;

pub mod field_map;
pub mod predicate;
pub mod profile;

pub use field_map::FieldMap;
pub use predicate::matches;
pub use profile::{Criterion, FilterError, FilterProfile};

/// Selection Pass: the listings that match `profile`, in their original order.
pub fn select<'a>(
    listings: &'a [Listing],
    profile: &FilterProfile,
    field_map: &FieldMap,
) -> Vec<&'a Listing> {
    for criterion in profile.active_criteria() {
        if field_map.get(criterion.name()).is_none() {
            warn!(
                criterion = criterion.name(),
                "Criterion has no field mapping and will not be evaluated."
            );
        }
    }

    let selected: Vec<&Listing> = listings
        .iter()
        .filter(|listing| matches(listing, profile, field_map))
        .collect();

    debug!(total = listings.len(), matched = selected.len(), "Selection pass finished.");
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listings() -> Vec<Listing> {
        [
            json!({"id": "A", "cpu": "Xeon E5-1650", "price": 40}),
            json!({"id": "B", "cpu": "Core i7-6700", "price": 35}),
            json!({"id": "C", "cpu": "Xeon E5-2620", "price": 55}),
        ]
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
    }

    fn ids(selected: &[&Listing]) -> Vec<String> {
        selected.iter().map(|l| l.display_id()).collect()
    }

    #[test]
    fn test_select_preserves_source_order() {
        let all = listings();
        let map = FieldMap::new().with("CPU", "cpu");
        let profile = FilterProfile::new().with("CPU", "E5").unwrap();

        assert_eq!(ids(&select(&all, &profile, &map)), vec!["A", "C"]);
    }

    #[test]
    fn test_select_without_criteria_returns_everything() {
        let all = listings();
        let selected = select(&all, &FilterProfile::new(), &FieldMap::new());
        assert_eq!(ids(&selected), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_select_on_empty_input() {
        let profile = FilterProfile::new().with("CPU", "E5").unwrap();
        assert!(select(&[], &profile, &FieldMap::new().with("CPU", "cpu")).is_empty());
    }
}

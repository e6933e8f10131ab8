use tracing::{debug, warn};

use super::{Criterion, FieldMap, FilterProfile};
use crate::listings::{FieldValue, Listing};

/// Predicate Engine: true when `listing` satisfies every active criterion.
///
/// Criteria without a field-map entry cannot be evaluated and are skipped.
/// A non-numeric price under an active PRICE criterion rejects the listing
/// and is logged as a data-quality problem; nothing is propagated.
pub fn matches(listing: &Listing, profile: &FilterProfile, field_map: &FieldMap) -> bool {
    profile.active_criteria().all(|criterion| {
        let Some(key) = field_map.get(criterion.name()) else {
            debug!(criterion = criterion.name(), "No field mapping for criterion, skipping.");
            return true;
        };
        let value = listing.resolve(key);

        match criterion {
            Criterion::Price { ceiling } => match value.as_f64() {
                Some(price) => price < *ceiling,
                None => {
                    warn!(
                        listing = %listing.display_id(),
                        field = key,
                        value = ?value,
                        ceiling,
                        "Listing price is not numeric, rejecting."
                    );
                    false
                }
            },
            Criterion::Ram(needle) | Criterion::Cpu(needle) => any_element_contains(&value, needle),
            Criterion::Field { value: expected, .. } => field_matches(&value, expected),
        }
    })
}

/// Substring containment against a scalar or any element of a sequence.
fn any_element_contains(value: &FieldValue, needle: &str) -> bool {
    match value {
        FieldValue::Missing => false,
        FieldValue::Sequence(items) => items
            .iter()
            .filter(|item| !item.is_missing())
            .any(|item| item.inline_text().contains(needle)),
        other => other.inline_text().contains(needle),
    }
}

/// Exact membership for sequences, substring containment for everything else.
fn field_matches(value: &FieldValue, expected: &str) -> bool {
    match value {
        FieldValue::Missing => false,
        FieldValue::Sequence(items) => items
            .iter()
            .any(|item| item.scalar_text().is_some_and(|text| text == expected)),
        other => other.inline_text().contains(expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn listing(value: Value) -> Listing {
        serde_json::from_value(value).unwrap()
    }

    fn auction_map() -> FieldMap {
        FieldMap::new()
            .with("PRICE", "price")
            .with("CPU", "cpu")
            .with("RAM", "ram")
            .with("LOCATION", "datacenter")
            .with("TRAFFIC", "traffic")
    }

    fn sample() -> Listing {
        listing(json!({
            "id": 1,
            "price": 49.0,
            "cpu": "Intel Xeon E5-1650V3",
            "ram": ["16GB DDR3", "32GB DDR4"],
            "datacenter": "FSN1-DC14",
            "traffic": "unlimited",
        }))
    }

    #[test]
    fn test_empty_profile_accepts_everything() {
        assert!(matches(&sample(), &FilterProfile::new(), &auction_map()));
        assert!(matches(&listing(json!({})), &FilterProfile::new(), &FieldMap::new()));
    }

    #[test]
    fn test_price_ceiling_is_exclusive() {
        let map = auction_map();
        let at = FilterProfile::new().with_price_ceiling(49.0);
        let above = FilterProfile::new().with_price_ceiling(49.01);
        let below = FilterProfile::new().with_price_ceiling(30.0);

        assert!(!matches(&sample(), &at, &map));
        assert!(matches(&sample(), &above, &map));
        assert!(!matches(&sample(), &below, &map));
    }

    #[test]
    fn test_price_as_numeric_string_is_accepted() {
        let l = listing(json!({"price": "39.90"}));
        let profile = FilterProfile::new().with_price_ceiling(40.0);
        assert!(matches(&l, &profile, &auction_map()));
    }

    #[test]
    fn test_non_numeric_or_missing_price_is_rejected() {
        let profile = FilterProfile::new().with_price_ceiling(100.0);
        assert!(!matches(&listing(json!({"price": "call us"})), &profile, &auction_map()));
        assert!(!matches(&listing(json!({"cpu": "E5"})), &profile, &auction_map()));
    }

    #[test]
    fn test_ram_substring_in_any_module() {
        let map = auction_map();
        let hit = FilterProfile::new().with("RAM", "32GB").unwrap();
        let miss = FilterProfile::new().with("RAM", "64GB").unwrap();
        assert!(matches(&sample(), &hit, &map));
        assert!(!matches(&sample(), &miss, &map));

        let scalar = listing(json!({"ram": "128 GB ECC"}));
        assert!(matches(&scalar, &FilterProfile::new().with("RAM", "128").unwrap(), &map));
        assert!(!matches(&listing(json!({})), &hit, &map));
    }

    #[test]
    fn test_cpu_substring() {
        let map = auction_map();
        assert!(matches(&sample(), &FilterProfile::new().with("CPU", "E5").unwrap(), &map));
        assert!(!matches(&sample(), &FilterProfile::new().with("CPU", "Ryzen").unwrap(), &map));

        let multi = listing(json!({"cpu": ["Intel Core i7-6700", "Intel Xeon E3-1275"]}));
        assert!(matches(&multi, &FilterProfile::new().with("CPU", "E3").unwrap(), &map));
    }

    #[test]
    fn test_generic_membership_and_substring() {
        let map = auction_map();
        let fsn = FilterProfile::new().with("LOCATION", "FSN1").unwrap();
        assert!(matches(&sample(), &fsn, &map));

        let multi_dc = listing(json!({"datacenter": ["FSN1-DC14", "NBG1-DC3"]}));
        assert!(!matches(&multi_dc, &fsn, &map), "sequences require exact membership");
        let exact = FilterProfile::new().with("LOCATION", "NBG1-DC3").unwrap();
        assert!(matches(&multi_dc, &exact, &map));

        let traffic = FilterProfile::new().with("TRAFFIC", "unlimited").unwrap();
        assert!(matches(&sample(), &traffic, &map));
        assert!(!matches(&listing(json!({"traffic": "20 TB"})), &traffic, &map));
    }

    #[test]
    fn test_any_failing_criterion_rejects() {
        let profile = FilterProfile::new()
            .with("CPU", "E5")
            .unwrap()
            .with("LOCATION", "HEL1")
            .unwrap()
            .with_price_ceiling(60.0);
        assert!(!matches(&sample(), &profile, &auction_map()));
    }

    #[test]
    fn test_unmapped_criterion_is_skipped() {
        let map = FieldMap::new().with("PRICE", "price");
        let profile = FilterProfile::new()
            .with("TRAFFIC", "unlimited")
            .unwrap()
            .with_price_ceiling(50.0);
        // TRAFFIC has no mapping.
        assert!(matches(&listing(json!({"price": 45})), &profile, &map));
        assert!(!matches(&listing(json!({"price": 55})), &profile, &map));
    }

    #[test]
    fn test_criterion_names_are_matched_exactly() {
        let map = FieldMap::new().with("Price", "price").with("Location", "datacenter");
        let profile = FilterProfile::new()
            .with("LOCATION", "HEL1")
            .unwrap()
            .with_price_ceiling(50.0);
        assert!(matches(&listing(json!({"price": 75, "datacenter": "FSN1"})), &profile, &map));
    }
}

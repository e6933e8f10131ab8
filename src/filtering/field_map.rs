use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;

/// Ordered mapping from a display/criterion name to the listing key it reads.
///
/// Order is significant: the description formatter emits one line per entry
/// in insertion order. Deserialises from a TOML/JSON table, keeping the
/// document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name -> key`. Re-inserting an existing name replaces its key in place.
    pub fn insert(&mut self, name: impl Into<String>, key: impl Into<String>) {
        let name = name.into();
        let key = key.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = key,
            None => self.entries.push((name, key)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, key: impl Into<String>) -> Self {
        self.insert(name, key);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, key)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, k)| (n.as_str(), k.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, K: Into<String>> FromIterator<(N, K)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (N, K)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (name, key) in iter {
            map.insert(name, key);
        }
        map
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldMapVisitor;

        impl<'de> Visitor<'de> for FieldMapVisitor {
            type Value = FieldMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a table of display names to listing keys")
            }

            fn visit_map<A>(self, mut access: A) -> Result<FieldMap, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = FieldMap::new();
                while let Some((name, key)) = access.next_entry::<String, String>()? {
                    map.insert(name, key);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(FieldMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_and_replace() {
        let map = FieldMap::new()
            .with("Price", "price")
            .with("CPU", "cpu")
            .with("RAM", "ram")
            .with("CPU", "cpu_fullname");

        let names: Vec<_> = map.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Price", "CPU", "RAM"]);
        assert_eq!(map.get("CPU"), Some("cpu_fullname"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_lookup_is_exact() {
        let map = FieldMap::new().with("Price", "price").with("PRICE", "price_net");
        assert_eq!(map.get("PRICE"), Some("price_net"));
        assert_eq!(map.get("Price"), Some("price"));
        assert_eq!(map.get("price"), None);
        assert_eq!(map.get("TRAFFIC"), None);
    }

    #[test]
    fn test_deserialize_keeps_document_order() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            field_map: FieldMap,
        }

        let parsed: Wrapper = toml::from_str(
            r#"
            [field_map]
            Location = "datacenter"
            Price = "price"
            Drives = "hdd_arr"
            "#,
        )
        .unwrap();

        let names: Vec<_> = parsed.field_map.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Location", "Price", "Drives"]);
        assert_eq!(parsed.field_map.get("Drives"), Some("hdd_arr"));
    }
}

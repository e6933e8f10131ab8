use serde::Deserialize;
use std::collections::HashMap;

use crate::filtering::FieldMap;
use crate::listings::{FieldValue, Listing, NOT_AVAILABLE, compact_json};

/// Separator between a label and its value.
pub const LABEL_SEPARATOR: char = '：';

/// Separator between the description blocks of consecutive listings.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Display-label overrides keyed by field-map name. Names without an
/// override are shown as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LabelMap {
    labels: HashMap<String, String>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(name.into(), label.into());
        self
    }

    pub fn label_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.labels.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<N: Into<String>, L: Into<String>> FromIterator<(N, L)> for LabelMap {
    fn from_iter<I: IntoIterator<Item = (N, L)>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().map(|(n, l)| (n.into(), l.into())).collect(),
        }
    }
}

/// Description Formatter: one `Label：Value` line per field-map entry, in map order.
pub fn describe(listing: &Listing, field_map: &FieldMap, labels: &LabelMap) -> String {
    field_map
        .iter()
        .map(|(name, key)| {
            let value = render_value(&listing.resolve(key));
            format!("{}{LABEL_SEPARATOR}{value}", labels.label_for(name))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Joins the descriptions of all `listings` into one notification body.
pub fn compose_message<'a, I>(listings: I, field_map: &FieldMap, labels: &LabelMap) -> String
where
    I: IntoIterator<Item = &'a Listing>,
{
    listings
        .into_iter()
        .map(|listing| describe(listing, field_map, labels))
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

fn render_value(value: &FieldValue) -> String {
    match value {
        // Drive lists: show each drive's name rather than the whole object.
        FieldValue::Sequence(items) if items.iter().all(|i| matches!(i, FieldValue::Record(_))) => items
            .iter()
            .map(|item| match item {
                FieldValue::Record(record) => match record.get("name") {
                    Some(name) => FieldValue::from_json(name).inline_text(),
                    None => compact_json(record),
                },
                other => other.inline_text(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        FieldValue::Missing => NOT_AVAILABLE.to_string(),
        other => other.inline_text(),
    }
}

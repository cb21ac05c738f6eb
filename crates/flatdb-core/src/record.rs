use crate::canon;
use serde::Serialize;
use std::collections::BTreeMap;

///
/// Record
///
/// One fully-constructed row: an ordered mapping from canonical attribute
/// name to an optional trimmed value. Immutable once built. When the class
/// configures a primary key, the key value is captured at build time and
/// defines equality; records without keys compare structurally.
///

#[derive(Clone, Debug, Serialize)]
pub struct Record {
    fields: Vec<(String, Option<String>)>,
    key: Option<String>,
}

impl Record {
    /// Build a record from canonical (name, value) pairs.
    ///
    /// A duplicate canonical name replaces the earlier entry in place, so
    /// names stay unique within one record and the newest value wins.
    pub(crate) fn new(pairs: Vec<(String, Option<String>)>, key: Option<String>) -> Self {
        let mut fields: Vec<(String, Option<String>)> = Vec::with_capacity(pairs.len());
        for (name, value) in pairs {
            if let Some(slot) = fields.iter_mut().find(|(existing, _)| *existing == name) {
                slot.1 = value;
            } else {
                fields.push((name, value));
            }
        }

        Self { fields, key }
    }

    /// Look up a value by attribute name.
    ///
    /// Exact canonical names hit directly; anything else is pushed through
    /// the canonicalizer first, so `get("Product ID")` and
    /// `get("product_id")` resolve the same slot. Class-level rename
    /// overrides are not visible here; use the class accessor when they
    /// matter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.value_of(name) {
            return Some(value);
        }
        self.value_of(&canon::canonical(name, &BTreeMap::new()))
    }

    /// Exact-match lookup by canonical name. `None` for both absent
    /// attributes and present-but-null values.
    #[must_use]
    pub(crate) fn value_of(&self, canonical: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == canonical)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Whether the record carries the attribute at all, null or not.
    #[must_use]
    pub(crate) fn has_attribute(&self, canonical: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == canonical)
    }

    /// Primary-key value captured at build time.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Canonical attribute names in field order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        match (&self.key, &other.key) {
            (Some(a), Some(b)) => a == b,
            _ => self.fields == other.fields,
        }
    }
}

impl Eq for Record {}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, Option<&str>)]) -> Vec<(String, Option<String>)> {
        items
            .iter()
            .map(|(n, v)| ((*n).to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn get_resolves_raw_and_canonical_names() {
        let record = Record::new(pairs(&[("_product_id", Some("12"))]), None);
        assert_eq!(record.get("_product_id"), Some("12"));
        assert_eq!(record.get("product_id"), Some("12"));
        assert_eq!(record.get("Product ID"), Some("12"));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn duplicate_canonical_names_keep_newest_value() {
        let record = Record::new(
            pairs(&[("_name", Some("first")), ("_name", Some("second"))]),
            None,
        );
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("name"), Some("second"));
    }

    #[test]
    fn keyed_records_compare_by_key() {
        let a = Record::new(pairs(&[("_id", Some("1")), ("_note", Some("x"))]), Some("1".into()));
        let b = Record::new(pairs(&[("_id", Some("1")), ("_note", Some("y"))]), Some("1".into()));
        let c = Record::new(pairs(&[("_id", Some("2"))]), Some("2".into()));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn unkeyed_records_compare_structurally() {
        let a = Record::new(pairs(&[("_note", Some("x"))]), None);
        let b = Record::new(pairs(&[("_note", Some("x"))]), None);
        let c = Record::new(pairs(&[("_note", None)]), None);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn null_and_absent_both_read_as_none() {
        let record = Record::new(pairs(&[("_a", None)]), None);
        assert_eq!(record.get("a"), None);
        assert_eq!(record.get("b"), None);
        assert!(record.has_attribute("_a"));
        assert!(!record.has_attribute("_b"));
    }
}

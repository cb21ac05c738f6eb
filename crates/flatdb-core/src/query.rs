//! Query resolution against a built store.
//!
//! Lookups prefer indices: a single predicate over an indexed attribute is
//! a direct map hit; a single predicate without an index falls back to a
//! linear scan and reports a `MissingIndexScan` advisory; multiple
//! predicates always scan, even when every attribute happens to carry its
//! own index.

use crate::{
    class::RecordClass,
    error::{Error, ErrorOrigin},
    obs::{self, AdvisoryEvent},
    record::Record,
    store::Store,
};
use std::sync::Arc;

impl RecordClass {
    /// All records matching every predicate, in parse order.
    ///
    /// Predicates map attribute names (raw or canonical) to required
    /// values. Empty predicates resolve to an empty list.
    pub fn find_all_by(&self, predicates: &[(&str, &str)]) -> Result<Vec<Arc<Record>>, Error> {
        if predicates.is_empty() {
            return Ok(Vec::new());
        }

        let store = self.store()?;
        let canonical = self.canonical_predicates(predicates);

        if let [(attribute, value)] = canonical.as_slice() {
            if let Some(index) = store.index(attribute) {
                return Ok(index.get_all(value));
            }

            obs::record(AdvisoryEvent::MissingIndexScan {
                class: self.name().to_string(),
                attribute: attribute.clone(),
            });
        }

        Ok(scan(&store, &canonical))
    }

    /// First record matching every predicate, or `None`.
    pub fn find_by(&self, predicates: &[(&str, &str)]) -> Result<Option<Arc<Record>>, Error> {
        if predicates.is_empty() {
            return Ok(None);
        }

        let store = self.store()?;
        let canonical = self.canonical_predicates(predicates);

        if let [(attribute, value)] = canonical.as_slice() {
            if let Some(index) = store.index(attribute) {
                return Ok(index.get_first(value));
            }

            obs::record(AdvisoryEvent::MissingIndexScan {
                class: self.name().to_string(),
                attribute: attribute.clone(),
            });
        }

        Ok(scan_first(&store, &canonical))
    }

    /// Look up a record by primary-key value.
    pub fn find(&self, key: &str) -> Result<Option<Arc<Record>>, Error> {
        let Some(primary_key) = self.model().primary_key.clone() else {
            return Err(Error::config(
                ErrorOrigin::Query,
                format!(
                    "find requires a primary key, none configured on record class '{}'",
                    self.name()
                ),
            ));
        };

        self.find_by(&[(primary_key.as_str(), key)])
    }

    /// First record in parse order.
    pub fn first(&self) -> Result<Option<Arc<Record>>, Error> {
        Ok(self.store()?.first())
    }

    /// All records in parse order.
    pub fn all(&self) -> Result<Vec<Arc<Record>>, Error> {
        Ok(self.store()?.records().to_vec())
    }

    /// Direct index access for one attribute.
    ///
    /// Unlike `find_all_by` this never falls back to a scan; asking for an
    /// unindexed attribute is a configuration error.
    pub fn index_lookup(&self, attribute: &str, key: &str) -> Result<Vec<Arc<Record>>, Error> {
        let store = self.store()?;
        let canonical = self.model().canonical(attribute);

        store.index(&canonical).map_or_else(
            || {
                Err(Error::config(
                    ErrorOrigin::Query,
                    format!(
                        "no index configured on attribute '{canonical}' of record class '{}'",
                        self.name()
                    ),
                ))
            },
            |index| Ok(index.get_all(key)),
        )
    }

    fn canonical_predicates(&self, predicates: &[(&str, &str)]) -> Vec<(String, String)> {
        predicates
            .iter()
            .map(|(name, value)| (self.model().canonical(name), (*value).to_string()))
            .collect()
    }
}

/// Linear scan requiring every predicate to match.
fn scan(store: &Store, predicates: &[(String, String)]) -> Vec<Arc<Record>> {
    store
        .records()
        .iter()
        .filter(|record| matches(record, predicates))
        .cloned()
        .collect()
}

fn scan_first(store: &Store, predicates: &[(String, String)]) -> Option<Arc<Record>> {
    store
        .records()
        .iter()
        .find(|record| matches(record, predicates))
        .cloned()
}

fn matches(record: &Record, predicates: &[(String, String)]) -> bool {
    predicates
        .iter()
        .all(|(attribute, value)| record.value_of(attribute) == Some(value.as_str()))
}

/// Brute-force equivalence oracle for index-backed lookups.
#[cfg(test)]
pub(crate) fn scan_all_by(
    store: &Store,
    attribute: &str,
    value: &str,
) -> Vec<Arc<Record>> {
    scan(
        store,
        &[(attribute.to_string(), value.to_string())],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorClass,
        model::ClassModel,
        obs::{AdvisorySink, with_advisory_sink},
        test_fixtures::{FixtureFile, ORDERS_CSV, orders_model},
    };
    use std::cell::RefCell;

    struct CapturingSink(RefCell<Vec<AdvisoryEvent>>);

    impl AdvisorySink for CapturingSink {
        fn record(&self, event: &AdvisoryEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    fn orders_class() -> (FixtureFile, RecordClass) {
        let fixture = FixtureFile::new("query-orders", ORDERS_CSV);
        let class = RecordClass::new(orders_model(fixture.path()));
        (fixture, class)
    }

    #[test]
    fn empty_predicates_resolve_empty_without_error() {
        let (_fixture, class) = orders_class();
        assert!(class.find_all_by(&[]).expect("empty query should succeed").is_empty());
        assert!(class.find_by(&[]).expect("empty query should succeed").is_none());
    }

    #[test]
    fn single_predicate_uses_the_unique_index() {
        let (_fixture, class) = orders_class();
        let hit = class
            .find_by(&[("Order #", "2")])
            .expect("query should succeed")
            .expect("order 2 should exist");
        assert_eq!(hit.get("customer_id"), Some("c1"));
        assert_eq!(hit.get("total"), Some("5.50"));
    }

    #[test]
    fn single_predicate_uses_the_multi_index_in_parse_order() {
        let (_fixture, class) = orders_class();
        let hits = class
            .find_all_by(&[("Customer ID", "c1")])
            .expect("query should succeed");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].get("order_number"), Some("1"));
        assert_eq!(hits[1].get("order_number"), Some("2"));
    }

    #[test]
    fn unindexed_predicate_scans_and_reports_advisory() {
        let (_fixture, class) = orders_class();

        let sink = CapturingSink(RefCell::new(Vec::new()));
        let hits = with_advisory_sink(&sink, || {
            class
                .find_all_by(&[("Total", "7.25")])
                .expect("query should succeed")
        });

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].get("order_number"), Some("3"));
        assert_eq!(
            sink.0.borrow().clone(),
            vec![AdvisoryEvent::MissingIndexScan {
                class: "orders".to_string(),
                attribute: "_total".to_string(),
            }]
        );
    }

    #[test]
    fn indexed_lookup_matches_brute_force_scan() {
        let (_fixture, class) = orders_class();
        let store = class.store().expect("store should build");

        for customer in ["c1", "c2", "c9"] {
            let indexed = class
                .find_all_by(&[("Customer ID", customer)])
                .expect("query should succeed");
            let scanned = scan_all_by(&store, "_customer_id", customer);
            assert_eq!(indexed, scanned, "index and scan disagree for '{customer}'");
        }
    }

    #[test]
    fn multiple_predicates_scan_with_logical_and() {
        let (_fixture, class) = orders_class();

        let hits = class
            .find_all_by(&[("Customer ID", "c1"), ("Total", "5.50")])
            .expect("query should succeed");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].get("order_number"), Some("2"));

        let none = class
            .find_all_by(&[("Customer ID", "c2"), ("Total", "5.50")])
            .expect("query should succeed");
        assert!(none.is_empty());
    }

    #[test]
    fn find_requires_a_configured_primary_key() {
        let fixture = FixtureFile::new("query-no-pk", ORDERS_CSV);
        let class = RecordClass::new(ClassModel::new("orders", fixture.path()));

        let err = class.find("1").expect_err("find without pk should fail");
        assert_eq!(err.class, ErrorClass::Config);
        assert_eq!(err.origin, ErrorOrigin::Query);
    }

    #[test]
    fn find_resolves_by_primary_key() {
        let (_fixture, class) = orders_class();
        let hit = class
            .find("3")
            .expect("find should succeed")
            .expect("order 3 should exist");
        assert_eq!(hit.get("customer_id"), Some("c2"));
        assert!(class.find("99").expect("find should succeed").is_none());
    }

    #[test]
    fn first_and_all_follow_parse_order() {
        let (_fixture, class) = orders_class();
        let first = class
            .first()
            .expect("first should succeed")
            .expect("store should not be empty");
        assert_eq!(first.get("order_number"), Some("1"));
        assert_eq!(class.all().expect("all should succeed").len(), 3);
    }

    #[test]
    fn index_lookup_rejects_unindexed_attributes() {
        let (_fixture, class) = orders_class();

        let hits = class
            .index_lookup("Customer ID", "c2")
            .expect("indexed attribute should resolve");
        assert_eq!(hits.len(), 1);

        let err = class
            .index_lookup("Total", "7.25")
            .expect_err("unindexed attribute should fail");
        assert_eq!(err.class, ErrorClass::Config);
    }

    #[test]
    fn empty_store_queries_resolve_empty() {
        let fixture = FixtureFile::new("query-empty", b"Order #,Customer ID,Total\n");
        let class = RecordClass::new(orders_model(fixture.path()));

        assert!(class.first().expect("first should succeed").is_none());
        assert!(class.all().expect("all should succeed").is_empty());
        assert!(
            class
                .find("1")
                .expect("find should succeed")
                .is_none()
        );
    }

    // Store::from_rows is exercised heavily in store::tests; keep one
    // tokenizer-to-query smoke path here so the module boundary stays honest.
    #[test]
    fn quoted_fields_survive_to_query_results() {
        let fixture = FixtureFile::new(
            "query-quoted",
            b"Order #,Note\n1,\"fragile, handle with care\"\n",
        );
        let class = RecordClass::new(
            ClassModel::new("orders", fixture.path()).with_primary_key("Order #"),
        );

        let hit = class
            .find("1")
            .expect("find should succeed")
            .expect("order should exist");
        assert_eq!(hit.get("note"), Some("fragile, handle with care"));
    }
}

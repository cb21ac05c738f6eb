//! Shared fixtures for store, query, and association tests.

use crate::model::{ClassModel, IndexSpec};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

static FIXTURE_SEQ: AtomicUsize = AtomicUsize::new(0);

///
/// FixtureFile
/// Temp-file fixture removed on drop.
///

pub(crate) struct FixtureFile {
    path: PathBuf,
}

impl FixtureFile {
    pub(crate) fn new(label: &str, contents: &[u8]) -> Self {
        let seq = FIXTURE_SEQ.fetch_add(1, Ordering::SeqCst);
        let path = env::temp_dir().join(format!(
            "flatdb-fixture-{}-{label}-{seq}.csv",
            std::process::id()
        ));
        fs::write(&path, contents).expect("fixture file should be writable");
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FixtureFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

pub(crate) const ORDERS_CSV: &[u8] =
    b"Order #,Customer ID,Total\n1,c1,10.00\n2,c1,5.50\n3,c2,7.25\n";

/// Orders class: unique pk index plus a multi index on the customer key.
pub(crate) fn orders_model(path: &Path) -> ClassModel {
    ClassModel::new("orders", path)
        .with_primary_key("Order #")
        .with_index(IndexSpec::unique("Order #"))
        .with_index(IndexSpec::multi("Customer ID"))
}

use crate::{
    error::Error,
    model::ClassModel,
    record::Record,
    store::Store,
};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

///
/// RecordClass
///
/// One configured class plus its lazily-built store. The store is built at
/// most once: the first reader parses the source under the build lock and
/// publishes the finished snapshot; every later reader observes the same
/// immutable store without locking. A failed build publishes nothing, so
/// the error surfaces to the caller and a later call may retry.
///

#[derive(Debug)]
pub struct RecordClass {
    model: ClassModel,
    store: OnceLock<Arc<Store>>,
    build_lock: Mutex<()>,
}

impl RecordClass {
    #[must_use]
    pub fn new(model: ClassModel) -> Self {
        Self {
            model,
            store: OnceLock::new(),
            build_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn model(&self) -> &ClassModel {
        &self.model
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.model.name
    }

    /// The memoized store, building it on first use.
    pub fn store(&self) -> Result<Arc<Store>, Error> {
        if let Some(store) = self.store.get() {
            return Ok(Arc::clone(store));
        }

        // single-flight: one builder, late arrivals re-check under the lock
        let _guard = self
            .build_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = self.store.get() {
            return Ok(Arc::clone(store));
        }

        let store = Arc::new(Store::build(&self.model)?);
        let _ = self.store.set(Arc::clone(&store));
        Ok(store)
    }

    /// Class-level attribute access.
    ///
    /// Distinguishes an attribute no record of the class ever produced
    /// (`UnknownAttribute`) from one that is present but null (`Ok(None)`).
    pub fn attribute<'a>(&self, record: &'a Record, name: &str) -> Result<Option<&'a str>, Error> {
        let canonical = self.model.canonical(name);
        let store = self.store()?;

        if !store.has_attribute(&canonical) {
            return Err(Error::unknown_attribute(&self.model.name, &canonical));
        }

        Ok(record.value_of(&canonical))
    }

    /// Accumulated canonical attribute names for the class.
    pub fn attribute_names(&self) -> Result<Vec<String>, Error> {
        Ok(self.store()?.attributes().to_vec())
    }
}

use crate::{
    class::RecordClass,
    error::{Error, ErrorClass, ErrorOrigin},
    model::ClassModel,
};
use std::{collections::HashMap, sync::Arc};
use thiserror::Error as ThisError;

///
/// RegistryError
///

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("record class '{0}' not found")]
    ClassNotFound(String),

    #[error("record class '{0}' already registered")]
    ClassAlreadyRegistered(String),
}

impl RegistryError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::ClassNotFound(_) => ErrorClass::Config,
            Self::ClassAlreadyRegistered(_) => ErrorClass::Conflict,
        }
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Self::new(err.class(), ErrorOrigin::Registry, err.to_string())
    }
}

///
/// Registry
///
/// Explicit table mapping class names to record classes. Populated during
/// configuration and queried by value when associations resolve their
/// target classes, so mutually-referencing classes never depend on
/// definition order.
///

#[derive(Debug, Default)]
pub struct Registry {
    classes: HashMap<String, Arc<RecordClass>>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class model under its configured name.
    pub fn register(&mut self, model: ClassModel) -> Result<Arc<RecordClass>, Error> {
        if self.classes.contains_key(&model.name) {
            return Err(RegistryError::ClassAlreadyRegistered(model.name).into());
        }

        let name = model.name.clone();
        let class = Arc::new(RecordClass::new(model));
        self.classes.insert(name, Arc::clone(&class));
        Ok(class)
    }

    /// Look up a class by name.
    pub fn try_get(&self, name: &str) -> Result<Arc<RecordClass>, Error> {
        self.classes
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::ClassNotFound(name.to_string()).into())
    }

    /// Iterate registered classes.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<RecordClass>)> {
        self.classes.iter().map(|(name, class)| (name.as_str(), class))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

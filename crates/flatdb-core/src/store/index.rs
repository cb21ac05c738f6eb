use crate::{model::IndexKind, record::Record};
use std::{collections::BTreeMap, sync::Arc};

///
/// Index
///
/// Derived lookup structure from attribute value to record(s). Built while
/// the store is built, never mutated afterwards. Null keys are never
/// inserted; the store skips them before calling in.
///

#[derive(Clone, Debug)]
pub enum Index {
    /// One record per key, last write wins.
    Unique(BTreeMap<String, Arc<Record>>),
    /// Parse-ordered record list per key.
    Multi(BTreeMap<String, Vec<Arc<Record>>>),
}

impl Index {
    #[must_use]
    pub(crate) fn new(kind: IndexKind) -> Self {
        match kind {
            IndexKind::Unique => Self::Unique(BTreeMap::new()),
            IndexKind::Multi => Self::Multi(BTreeMap::new()),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> IndexKind {
        match self {
            Self::Unique(_) => IndexKind::Unique,
            Self::Multi(_) => IndexKind::Multi,
        }
    }

    /// Insert a record under a key.
    ///
    /// Returns `true` when a unique entry was displaced, so the caller can
    /// report the collision. Multi entries append and never collide.
    pub(crate) fn insert(&mut self, key: String, record: Arc<Record>) -> bool {
        match self {
            Self::Unique(map) => map.insert(key, record).is_some(),
            Self::Multi(map) => {
                map.entry(key).or_default().push(record);
                false
            }
        }
    }

    /// All records under a key, normalized to a list.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<Arc<Record>> {
        match self {
            Self::Unique(map) => map.get(key).cloned().into_iter().collect(),
            Self::Multi(map) => map.get(key).cloned().unwrap_or_default(),
        }
    }

    /// First record under a key. For unique indices this is the single
    /// entry; for multi indices the earliest in parse order.
    #[must_use]
    pub fn get_first(&self, key: &str) -> Option<Arc<Record>> {
        match self {
            Self::Unique(map) => map.get(key).cloned(),
            Self::Multi(map) => map.get(key).and_then(|records| records.first().cloned()),
        }
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Unique(map) => map.len(),
            Self::Multi(map) => map.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

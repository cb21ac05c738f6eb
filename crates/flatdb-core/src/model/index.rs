use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// IndexKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// One record per key; a colliding insert replaces the previous record.
    Unique,
    /// Ordered record list per key, preserving parse order.
    Multi,
}

///
/// IndexSpec
///
/// Configured index over one attribute. The attribute name is stored raw
/// and canonicalized when the store is built.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexSpec {
    pub attribute: String,
    pub kind: IndexKind,
}

impl IndexSpec {
    #[must_use]
    pub fn new(attribute: impl Into<String>, kind: IndexKind) -> Self {
        Self {
            attribute: attribute.into(),
            kind,
        }
    }

    #[must_use]
    pub fn unique(attribute: impl Into<String>) -> Self {
        Self::new(attribute, IndexKind::Unique)
    }

    #[must_use]
    pub fn multi(attribute: impl Into<String>) -> Self {
        Self::new(attribute, IndexKind::Multi)
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        matches!(self.kind, IndexKind::Unique)
    }
}

impl Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unique() {
            write!(f, "UNIQUE({})", self.attribute)
        } else {
            write!(f, "MULTI({})", self.attribute)
        }
    }
}

use serde::{Deserialize, Serialize};

///
/// AssociationKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    BelongsTo,
    HasOne,
    HasMany,
    HasManyThrough,
}

///
/// AssociationSpec
///
/// Configured relation from an owning record class to a target class.
/// Targets are referenced by registry name and resolved at call time, so
/// classes that refer to each other can be configured in any order.
///
/// Key defaults are applied during resolution, per kind:
/// - belongs-to: `foreign_key` defaults to `{name}_id`, `association_key`
///   to the target's primary key.
/// - has-one / has-many: both default to the owner's primary key.
/// - has-many-through: `source` defaults to the singular of `name`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AssociationSpec {
    pub name: String,
    pub kind: AssociationKind,

    /// Registry name of the target class. Unset for has-many-through,
    /// where the target comes from the source association.
    #[serde(default)]
    pub target: Option<String>,

    /// Foreign-key attribute, raw form.
    #[serde(default)]
    pub foreign_key: Option<String>,

    /// Key attribute on the other side of the relation, raw form.
    #[serde(default)]
    pub association_key: Option<String>,

    /// Intermediate association name (has-many-through only).
    #[serde(default)]
    pub through: Option<String>,

    /// Source association on the intermediate class (has-many-through only).
    #[serde(default)]
    pub source: Option<String>,
}

impl AssociationSpec {
    #[must_use]
    pub fn belongs_to(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, AssociationKind::BelongsTo, Some(target.into()))
    }

    #[must_use]
    pub fn has_one(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, AssociationKind::HasOne, Some(target.into()))
    }

    #[must_use]
    pub fn has_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, AssociationKind::HasMany, Some(target.into()))
    }

    #[must_use]
    pub fn has_many_through(name: impl Into<String>, through: impl Into<String>) -> Self {
        let mut spec = Self::new(name, AssociationKind::HasManyThrough, None);
        spec.through = Some(through.into());
        spec
    }

    fn new(name: impl Into<String>, kind: AssociationKind, target: Option<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            target,
            foreign_key: None,
            association_key: None,
            through: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }

    #[must_use]
    pub fn with_association_key(mut self, association_key: impl Into<String>) -> Self {
        self.association_key = Some(association_key.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Singularize an association name for the has-many-through source default.
///
/// Deliberately small: the common plural shapes only. Anything irregular
/// should configure an explicit `source`.
#[must_use]
pub(crate) fn singularize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for suffix in ["ches", "shes", "sses", "xes", "zes"] {
        if let Some(stem) = name.strip_suffix(suffix) {
            return format!("{}{}", stem, &suffix[..suffix.len() - 2]);
        }
    }
    if name.ends_with('s') && !name.ends_with("ss") {
        return name[..name.len() - 1].to_string();
    }
    name.to_string()
}

//! Association resolution between record classes.
//!
//! Every resolution happens at call time against the registry: target
//! classes may not have built their stores yet when the owner is
//! configured, and a target's first use triggers its own build. Nothing
//! here mutates a store; resolution only reads built records and indices.

use crate::{
    class::RecordClass,
    error::{Error, ErrorOrigin},
    model::{AssociationKind, AssociationSpec, association::singularize},
    record::Record,
    registry::Registry,
};
use std::sync::Arc;

///
/// Related
///
/// Result of resolving one association: singular kinds produce `One`,
/// plural kinds produce `Many`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Related {
    One(Option<Arc<Record>>),
    Many(Vec<Arc<Record>>),
}

impl Related {
    /// Collapse to a single record, taking the first of a plural result.
    #[must_use]
    pub fn one(self) -> Option<Arc<Record>> {
        match self {
            Self::One(record) => record,
            Self::Many(records) => records.into_iter().next(),
        }
    }

    /// Normalize to a list.
    #[must_use]
    pub fn many(self) -> Vec<Arc<Record>> {
        match self {
            Self::One(record) => record.into_iter().collect(),
            Self::Many(records) => records,
        }
    }
}

impl RecordClass {
    /// Resolve a configured association for one record of this class.
    pub fn related(
        &self,
        registry: &Registry,
        record: &Record,
        name: &str,
    ) -> Result<Related, Error> {
        let spec = self.model().association(name).ok_or_else(|| {
            Error::config(
                ErrorOrigin::Association,
                format!(
                    "no association '{name}' configured on record class '{}'",
                    self.name()
                ),
            )
        })?;

        match spec.kind {
            AssociationKind::BelongsTo => self.resolve_belongs_to(registry, record, spec),
            AssociationKind::HasOne => {
                let hit = self
                    .resolve_owner_keyed(registry, record, spec)?
                    .map_or(Ok(None), |(target, fk, value)| {
                        target.find_by(&[(fk.as_str(), value.as_str())])
                    })?;
                Ok(Related::One(hit))
            }
            AssociationKind::HasMany => {
                let hits = self
                    .resolve_owner_keyed(registry, record, spec)?
                    .map_or(Ok(Vec::new()), |(target, fk, value)| {
                        target.find_all_by(&[(fk.as_str(), value.as_str())])
                    })?;
                Ok(Related::Many(hits))
            }
            AssociationKind::HasManyThrough => self.resolve_through(registry, record, spec),
        }
    }

    /// belongs-to: the owner carries the foreign key; the target is looked
    /// up by its association primary key (default: the target's own pk).
    fn resolve_belongs_to(
        &self,
        registry: &Registry,
        record: &Record,
        spec: &AssociationSpec,
    ) -> Result<Related, Error> {
        let foreign_key = spec
            .foreign_key
            .clone()
            .unwrap_or_else(|| format!("{}_id", spec.name));

        let Some(value) = record.value_of(&self.model().canonical(&foreign_key)) else {
            return Ok(Related::One(None));
        };

        let target = self.target_class(registry, spec)?;
        let association_key = match &spec.association_key {
            Some(key) => key.clone(),
            None => target.model().primary_key.clone().ok_or_else(|| {
                Error::config(
                    ErrorOrigin::Association,
                    format!(
                        "belongs-to '{}' on '{}' needs an association key: target class '{}' has no primary key",
                        spec.name,
                        self.name(),
                        target.name()
                    ),
                )
            })?,
        };

        let hit = target.find_by(&[(association_key.as_str(), value)])?;
        Ok(Related::One(hit))
    }

    /// has-one / has-many: the target carries the foreign key; both key
    /// names default to the owner's primary key.
    ///
    /// Returns `None` when the owner's key value is null, which resolves
    /// to an empty result without touching the target store.
    fn resolve_owner_keyed(
        &self,
        registry: &Registry,
        record: &Record,
        spec: &AssociationSpec,
    ) -> Result<Option<(Arc<RecordClass>, String, String)>, Error> {
        let owner_pk = self.model().primary_key.as_deref();
        let missing_pk = || {
            Error::config(
                ErrorOrigin::Association,
                format!(
                    "association '{}' on '{}' needs a key, but the class has no primary key",
                    spec.name,
                    self.name()
                ),
            )
        };

        let association_key = spec
            .association_key
            .as_deref()
            .or(owner_pk)
            .ok_or_else(missing_pk)?;
        let Some(value) = record.value_of(&self.model().canonical(association_key)) else {
            return Ok(None);
        };

        let foreign_key = spec
            .foreign_key
            .as_deref()
            .or(owner_pk)
            .ok_or_else(missing_pk)?
            .to_string();

        let target = self.target_class(registry, spec)?;
        Ok(Some((target, foreign_key, value.to_string())))
    }

    /// has-many-through: walk the intermediate has-many, then resolve the
    /// source association on every intermediate record, flattening and
    /// discarding nulls.
    fn resolve_through(
        &self,
        registry: &Registry,
        record: &Record,
        spec: &AssociationSpec,
    ) -> Result<Related, Error> {
        let through = spec.through.as_deref().ok_or_else(|| {
            Error::config(
                ErrorOrigin::Association,
                format!(
                    "has-many-through '{}' on '{}' has no intermediate association configured",
                    spec.name,
                    self.name()
                ),
            )
        })?;

        let intermediate_spec = self.model().association(through).ok_or_else(|| {
            Error::config(
                ErrorOrigin::Association,
                format!(
                    "has-many-through '{}' on '{}' names unknown association '{through}'",
                    spec.name,
                    self.name()
                ),
            )
        })?;
        if intermediate_spec.kind != AssociationKind::HasMany {
            return Err(Error::config(
                ErrorOrigin::Association,
                format!(
                    "has-many-through '{}' on '{}' requires has-many intermediate, '{through}' is not",
                    spec.name,
                    self.name()
                ),
            ));
        }

        let intermediate_class = self.target_class(registry, intermediate_spec)?;
        let intermediates = self.related(registry, record, through)?.many();

        let source = spec
            .source
            .clone()
            .unwrap_or_else(|| singularize(&spec.name));

        let mut out = Vec::new();
        for intermediate in intermediates {
            match intermediate_class.related(registry, &intermediate, &source)? {
                Related::One(Some(hit)) => out.push(hit),
                Related::One(None) => {}
                Related::Many(hits) => out.extend(hits),
            }
        }

        Ok(Related::Many(out))
    }

    fn target_class(
        &self,
        registry: &Registry,
        spec: &AssociationSpec,
    ) -> Result<Arc<RecordClass>, Error> {
        let target = spec.target.as_deref().ok_or_else(|| {
            Error::config(
                ErrorOrigin::Association,
                format!(
                    "association '{}' on '{}' has no target class configured",
                    spec.name,
                    self.name()
                ),
            )
        })?;

        registry.try_get(target)
    }
}

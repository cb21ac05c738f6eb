//! Record store construction.
//!
//! A store is built from one source file in a single pass: tokenize, discover
//! or declare the attribute schema, construct records, populate indices.
//! The result is pure immutable data with no remaining file dependency.

pub mod index;


use crate::{
    error::Error,
    model::{ClassModel, RowLayout, SchemaMode},
    obs::{self, AdvisoryEvent},
    record::Record,
    tokenize::{Row, tokenize},
};
use std::{collections::BTreeMap, fs, sync::Arc};

pub use index::Index;

///
/// Store
///
/// The full ordered record list for one class plus its derived indices and
/// the accumulated canonical attribute set. Immutable once built; safely
/// shared by any number of readers.
///

#[derive(Clone, Debug)]
pub struct Store {
    records: Vec<Arc<Record>>,
    indexes: BTreeMap<String, Index>,
    attributes: Vec<String>,
}

impl Store {
    /// Read and parse the class's source file.
    ///
    /// An unreadable source is fatal; no partial store is produced.
    pub(crate) fn build(model: &ClassModel) -> Result<Self, Error> {
        let raw = fs::read(&model.source).map_err(|err| {
            Error::store_io(format!(
                "failed to read '{}': {err}",
                model.source.display()
            ))
        })?;

        Ok(Self::from_rows(model, tokenize(&raw)))
    }

    /// Build a store from already-tokenized rows.
    pub(crate) fn from_rows(model: &ClassModel, rows: Vec<Row>) -> Self {
        let mut schema: Vec<String> = model
            .attributes
            .iter()
            .map(|raw| model.canonical(raw))
            .collect();
        let mut attributes = Vec::new();
        for name in &schema {
            push_attribute(&mut attributes, name);
        }

        let primary_key = model.primary_key_canonical();
        let mut indexes: BTreeMap<String, Index> = model
            .indexes
            .iter()
            .map(|spec| (model.canonical(&spec.attribute), Index::new(spec.kind)))
            .collect();
        let mut records: Vec<Arc<Record>> = Vec::new();

        let mut rows = rows.into_iter();

        // the first emitted row carries the schema; no record is built from it
        if model.schema == SchemaMode::FirstRowHeader {
            if let Some(header) = rows.next() {
                schema = header
                    .into_fields()
                    .into_iter()
                    .map(|field| model.canonical(field.as_deref().unwrap_or_default()))
                    .collect();
                attributes.clear();
                for name in &schema {
                    push_attribute(&mut attributes, name);
                }
            }
        }

        for row in rows {
            let pairs = row_pairs(model, &schema, row);
            for (name, _) in &pairs {
                push_attribute(&mut attributes, name);
            }

            let key = primary_key.as_deref().and_then(|pk| {
                pairs
                    .iter()
                    .find(|(name, _)| name == pk)
                    .and_then(|(_, value)| value.clone())
            });

            let record = Arc::new(Record::new(pairs, key));
            records.push(Arc::clone(&record));

            for (attribute, idx) in &mut indexes {
                // null keys are never indexed
                let Some(key) = record.value_of(attribute) else {
                    continue;
                };
                let key = key.to_string();
                let displaced = idx.insert(key.clone(), Arc::clone(&record));
                if displaced {
                    obs::record(AdvisoryEvent::UniqueKeyCollision {
                        class: model.name.clone(),
                        attribute: attribute.clone(),
                        key,
                    });
                }
            }
        }

        Self {
            records,
            indexes,
            attributes,
        }
    }

    /// Records in parse order.
    #[must_use]
    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    /// Index for a canonical attribute name, when one is configured.
    #[must_use]
    pub fn index(&self, canonical_attribute: &str) -> Option<&Index> {
        self.indexes.get(canonical_attribute)
    }

    /// Accumulated canonical attribute names, in first-seen order.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Whether any record of the class ever produced this attribute.
    #[must_use]
    pub fn has_attribute(&self, canonical_attribute: &str) -> bool {
        self.attributes
            .iter()
            .any(|name| name == canonical_attribute)
    }

    #[must_use]
    pub fn first(&self) -> Option<Arc<Record>> {
        self.records.first().cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Map one row onto canonical (name, value) pairs per the class layout.
///
/// Positional layouts are driven by the schema list: extra row fields are
/// dropped, missing ones read as null. Name-value layouts consume fields
/// pairwise and skip pairs whose name slot is blank.
fn row_pairs(model: &ClassModel, schema: &[String], row: Row) -> Vec<(String, Option<String>)> {
    let fields = row.into_fields();

    let pairs: Vec<(String, Option<String>)> = match model.layout {
        RowLayout::Positional => schema
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), fields.get(i).cloned().flatten()))
            .collect(),
        RowLayout::NameValuePairs => fields
            .chunks(2)
            .filter_map(|pair| {
                let name = pair.first().cloned().flatten()?;
                let value = pair.get(1).cloned().flatten();
                Some((model.canonical(name.trim()), value))
            })
            .collect(),
    };

    pairs
        .into_iter()
        .map(|(name, value)| (name, trim_value(value)))
        .collect()
}

/// Trim surrounding whitespace; trimmed-to-empty becomes null.
fn trim_value(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn push_attribute(attributes: &mut Vec<String>, name: &str) {
    if !attributes.iter().any(|existing| existing == name) {
        attributes.push(name.to_string());
    }
}

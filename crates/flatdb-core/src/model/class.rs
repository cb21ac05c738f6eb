use crate::{
    canon,
    model::{AssociationSpec, IndexKind, IndexSpec},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf};

///
/// SchemaMode
///
/// How attribute names are discovered for a source file.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaMode {
    /// The first emitted row carries the attribute names; no record is
    /// built from it.
    #[default]
    FirstRowHeader,
    /// No in-file schema; positional layouts use the declared attribute
    /// list instead.
    None,
}

///
/// RowLayout
///
/// How one row maps onto record attributes.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowLayout {
    /// Fields are zipped against the attribute-name list.
    #[default]
    Positional,
    /// Fields are consumed pairwise as (raw name, value); attribute names
    /// may differ per record.
    NameValuePairs,
}

///
/// ClassModel
///
/// Immutable-after-configuration descriptor for one record class: where
/// the source lives, how rows become records, which indices to build, and
/// which associations the class participates in. Built once by the host
/// configuration layer (or the fluent builder here) and handed to the
/// store builder by value.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ClassModel {
    /// Registry name of the class.
    pub name: String,

    /// Source file location.
    pub source: PathBuf,

    #[serde(default)]
    pub schema: SchemaMode,

    #[serde(default)]
    pub layout: RowLayout,

    /// Declared attribute names, raw form. Required for positional layouts
    /// under `SchemaMode::None`; ignored when a header row is present.
    #[serde(default)]
    pub attributes: Vec<String>,

    #[serde(default)]
    pub indexes: Vec<IndexSpec>,

    /// Rename overrides consulted by the canonicalizer, keyed by raw or
    /// intermediate name.
    #[serde(default)]
    pub renames: BTreeMap<String, String>,

    /// Primary-key attribute, raw form.
    #[serde(default)]
    pub primary_key: Option<String>,

    #[serde(default)]
    pub associations: Vec<AssociationSpec>,
}

impl ClassModel {
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            schema: SchemaMode::default(),
            layout: RowLayout::default(),
            attributes: Vec::new(),
            indexes: Vec::new(),
            renames: BTreeMap::new(),
            primary_key: None,
            associations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: SchemaMode) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: RowLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_index(mut self, spec: IndexSpec) -> Self {
        self.indexes.push(spec);
        self
    }

    #[must_use]
    pub fn with_rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.insert(from.into(), to.into());
        self
    }

    #[must_use]
    pub fn with_primary_key(mut self, attribute: impl Into<String>) -> Self {
        self.primary_key = Some(attribute.into());
        self
    }

    #[must_use]
    pub fn with_association(mut self, spec: AssociationSpec) -> Self {
        self.associations.push(spec);
        self
    }

    /// Canonicalize a raw name under this class's rename overrides.
    #[must_use]
    pub fn canonical(&self, raw: &str) -> String {
        canon::canonical(raw, &self.renames)
    }

    /// Canonical primary-key attribute name, when one is configured.
    #[must_use]
    pub fn primary_key_canonical(&self) -> Option<String> {
        self.primary_key.as_deref().map(|pk| self.canonical(pk))
    }

    /// Configured index kind for a canonical attribute name.
    #[must_use]
    pub fn index_kind(&self, canonical_attribute: &str) -> Option<IndexKind> {
        self.indexes
            .iter()
            .find(|spec| self.canonical(&spec.attribute) == canonical_attribute)
            .map(|spec| spec.kind)
    }

    /// Look up an association spec by name.
    #[must_use]
    pub fn association(&self, name: &str) -> Option<&AssociationSpec> {
        self.associations.iter().find(|spec| spec.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_configuration() {
        let model = ClassModel::new("orders", "orders.csv")
            .with_layout(RowLayout::Positional)
            .with_index(IndexSpec::unique("Order #"))
            .with_index(IndexSpec::multi("Customer ID"))
            .with_rename("Order #", "order_id")
            .with_primary_key("Order #");

        assert_eq!(model.indexes.len(), 2);
        assert_eq!(model.primary_key_canonical().as_deref(), Some("_order_id"));
        assert_eq!(model.index_kind("_order_id"), Some(IndexKind::Unique));
        assert_eq!(model.index_kind("_customer_id"), Some(IndexKind::Multi));
        assert_eq!(model.index_kind("_shipped_at"), None);
    }

    #[test]
    fn model_deserializes_from_configuration_data() {
        let raw = r#"{
            "name": "orders",
            "source": "data/orders.csv",
            "layout": "name_value_pairs",
            "schema": "none",
            "indexes": [{ "attribute": "Order #", "kind": "unique" }],
            "primary_key": "Order #",
            "associations": [
                { "name": "customer", "kind": "belongs_to", "target": "customers" }
            ]
        }"#;

        let model: ClassModel = serde_json::from_str(raw).expect("model should deserialize");
        assert_eq!(model.schema, SchemaMode::None);
        assert_eq!(model.layout, RowLayout::NameValuePairs);
        assert!(model.association("customer").is_some());
        assert_eq!(model.primary_key_canonical().as_deref(), Some("_order_number"));
    }
}

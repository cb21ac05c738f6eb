//! Core runtime for FlatDB: the CSV tokenizer, attribute canonicalizer,
//! memoized record stores, query resolution, and association walking, plus
//! the ergonomics exported via the `prelude`.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod association;
pub mod canon;
pub mod class;
pub mod error;
pub mod model;
pub mod obs;
mod query;
pub mod record;
pub mod registry;
pub mod store;
pub mod tokenize;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::Error;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No stores, counters, or tokenizer internals are re-exported here.
///

pub mod prelude {
    pub use crate::{
        association::Related,
        class::RecordClass,
        error::Error,
        model::{AssociationSpec, ClassModel, IndexSpec, RowLayout, SchemaMode},
        record::Record,
        registry::Registry,
    };
}

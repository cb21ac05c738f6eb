//! FlatDB: a typed query and association layer over delimited flat files.
//!
//! ## Crate layout
//! - `core`: tokenizer, canonicalizer, stores, queries, and observability.
//!
//! The `prelude` module mirrors the runtime surface used by application
//! code; everything else is reachable through `flatdb::core`.

pub use flatdb_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::Error;

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        association::Related,
        class::RecordClass,
        error::Error,
        model::{AssociationSpec, ClassModel, IndexSpec, RowLayout, SchemaMode},
        obs::{AdvisoryReport, advisory_report, advisory_reset_all},
        record::Record,
        registry::Registry,
    };
    pub use serde::{Deserialize, Serialize};
}

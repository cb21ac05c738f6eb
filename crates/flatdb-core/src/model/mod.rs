//! Configuration model for record classes.
//!
//! Types in `model` are the declarative side of the runtime: the host
//! configuration layer hands us a fully-built, immutable `ClassModel` and
//! the store builder executes it. Nothing in this module touches the
//! filesystem or mutates after construction.

pub mod association;
pub mod class;
pub mod index;

pub use association::{AssociationKind, AssociationSpec};
pub use class::{ClassModel, RowLayout, SchemaMode};
pub use index::{IndexKind, IndexSpec};

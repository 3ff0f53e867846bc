//! Builds GraphQL documents for the API generated from a database's introspection.
//!
//! The metadata of a table decides which columns exist and how they are represented on the
//! wire, the introspected operation definitions decide which root fields, arguments and payload
//! fields exist. A document only references what both describe.

pub mod ast;
mod builder;
pub mod custom_ast;
mod error;
mod order_by;
mod printer;
pub mod selection;

pub use ast::{Document, PrintedDocument};
pub use builder::{canonical_input_type, EntityQuery, OperationKind, QueryBuilder};
pub use error::BuildError;
pub use order_by::{filter_order_by_tokens, order_by_tokens, OrderBy, SortDirection};
pub use selection::{
    ExplicitSelection, FieldSelection, IncludeSpec, Preset, SelectionError, SelectionResolver, SelectionSpec,
};

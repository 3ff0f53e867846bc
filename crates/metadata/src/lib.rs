//! Normalized description of an introspected database, as seen by the query engine.
//!
//! Two payloads come out of schema introspection: the table metadata ([`MetaObject`]) and the
//! map of GraphQL operations the API exposes for those tables ([`IntrospectionSchema`]). Both are
//! read-only from the engine's perspective. A schema refresh replaces them wholesale, nothing in
//! this crate mutates a definition after it has been loaded.

mod field;
mod introspection;
mod table;

pub use field::{FieldType, MetaField};
pub use introspection::{IntrospectionSchema, MutationType, OperationDefinition, PropertyDefinition, QueryType};
pub use table::{
    BelongsTo, ForeignConstraint, HasMany, MetaTable, PrimaryConstraint, Relation, Relations, UniqueConstraint,
};

use serde::Deserialize;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid introspection payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Every table of an introspected database, in the order the introspection returned them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaObject {
    #[serde(default)]
    tables: Vec<MetaTable>,
}

impl MetaObject {
    pub fn new(tables: Vec<MetaTable>) -> Self {
        Self { tables }
    }

    /// Loads the `_meta` payload of the introspection layer.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn tables(&self) -> &[MetaTable] {
        &self.tables
    }

    /// Find a table by its GraphQL type name.
    pub fn find_table(&self, name: &str) -> Option<&MetaTable> {
        self.tables.iter().find(|table| table.name() == name)
    }
}

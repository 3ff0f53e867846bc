use indexmap::IndexMap;
use serde::Deserialize;

use crate::Result;

/// Every operation the generated GraphQL API exposes, keyed by root field name
/// (`users`, `user`, `createUser`, `deleteUserByEmail`...).
///
/// Insertion order is the introspection order, which keeps lookups deterministic when several
/// definitions share a model.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct IntrospectionSchema {
    operations: IndexMap<String, OperationDefinition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryType {
    GetMany,
    GetOne,
    Mutation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationType {
    Create,
    Patch,
    Delete,
}

impl MutationType {
    /// The verb used in the canonical input type name: `Create`, `Update`, `Delete`.
    pub fn input_verb(self) -> &'static str {
        match self {
            MutationType::Create => "Create",
            MutationType::Patch => "Update",
            MutationType::Delete => "Delete",
        }
    }
}

/// Shape of one queryable or mutable root field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDefinition {
    /// GraphQL type name of the table the operation works on.
    pub model: String,
    pub qtype: QueryType,
    #[serde(default)]
    pub mutation_type: Option<MutationType>,
    /// Fields available on the returned type: connection fields for `getMany`, payload fields
    /// for mutations.
    #[serde(default)]
    pub selection: Vec<String>,
    /// Arguments of the root field.
    #[serde(default)]
    pub properties: IndexMap<String, PropertyDefinition>,
}

/// An argument, or a field of an input object argument.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
    /// Non-null on the named type, or on the list items for list types.
    #[serde(default)]
    pub is_not_null: bool,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default)]
    pub is_array_not_null: bool,
    /// Fields of an input object type.
    #[serde(default)]
    pub properties: Option<IndexMap<String, PropertyDefinition>>,
}

impl PropertyDefinition {
    pub fn named(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn non_null(mut self) -> Self {
        self.is_not_null = true;
        self
    }

    #[must_use]
    pub fn list(mut self) -> Self {
        self.is_array = true;
        self
    }
}

impl IntrospectionSchema {
    pub fn new(operations: IndexMap<String, OperationDefinition>) -> Self {
        Self { operations }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, key: &str) -> Option<&OperationDefinition> {
        self.operations.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OperationDefinition)> + '_ {
        self.operations
            .iter()
            .map(|(key, definition)| (key.as_str(), definition))
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// All operations of a model with the given query type, in introspection order.
    pub fn operations_for<'a>(
        &'a self,
        model: &'a str,
        qtype: QueryType,
    ) -> impl Iterator<Item = (&'a str, &'a OperationDefinition)> + 'a {
        self.iter()
            .filter(move |(_, definition)| definition.model == model && definition.qtype == qtype)
    }
}

impl OperationDefinition {
    /// The type name of the `input` argument of a mutation, e.g. `DeleteUserByEmailInput`.
    pub fn input_type_name(&self) -> Option<&str> {
        self.properties
            .get("input")
            .map(|property| property.type_name.as_str())
    }

    pub fn has_argument(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn selects(&self, field: &str) -> bool {
        self.selection.iter().any(|selected| selected == field)
    }
}

use std::sync::Arc;

use dbdash_config::PaginationConfig;
use dbdash_metadata::MetaTable;
use dbdash_query_builder::{order_by_tokens, OrderBy, PrintedDocument};
use serde_json::{json, Map, Value};

use crate::{plan::PagingArguments, PageRequest};

/// Everything a paginated view fetches with. Changing any of it starts over from the first page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequestOptions {
    pub entity: String,
    /// A `list` document of `entity`.
    pub document: Arc<PrintedDocument>,
    pub page_size: usize,
    /// `FIELD_DIRECTION` tokens, already restricted to the columns of `entity`.
    pub order_by: Vec<String>,
    pub filter: Option<Value>,
}

impl PageRequestOptions {
    pub fn new(entity: impl Into<String>, document: impl Into<Arc<PrintedDocument>>, page_size: usize) -> Self {
        Self {
            entity: entity.into(),
            document: document.into(),
            page_size,
            order_by: Vec::new(),
            filter: None,
        }
    }

    /// Options paging `document` by the configured page size.
    pub fn from_config(
        entity: impl Into<String>,
        document: impl Into<Arc<PrintedDocument>>,
        config: &PaginationConfig,
    ) -> Self {
        Self::new(entity, document, config.page_size)
    }

    /// Orders by columns of `table`, ignoring the ones it does not have.
    #[must_use]
    pub fn with_order_by(mut self, table: &MetaTable, order_by: &[OrderBy]) -> Self {
        self.order_by = order_by_tokens(table, order_by);
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Which of `$after` and `$offset` the document declares.
    pub fn paging_arguments(&self) -> PagingArguments {
        let declares = |name: &str| {
            self.document
                .ast
                .operation
                .variables
                .iter()
                .any(|variable| variable.name == name)
        };

        PagingArguments {
            after: declares("after"),
            offset: declares("offset"),
        }
    }

    /// `{ first, after | offset, orderBy, filter }` for one page request.
    pub fn variables(&self, request: &PageRequest) -> Value {
        let mut variables = Map::new();
        variables.insert("first".into(), json!(self.page_size));

        match request {
            PageRequest::First => {}
            PageRequest::After(cursor) => {
                variables.insert("after".into(), json!(cursor));
            }
            PageRequest::Offset(offset) => {
                variables.insert("offset".into(), json!(offset));
            }
        }

        if !self.order_by.is_empty() {
            variables.insert("orderBy".into(), json!(self.order_by));
        }

        if let Some(filter) = &self.filter {
            variables.insert("filter".into(), filter.clone());
        }

        Value::Object(variables)
    }
}

#[cfg(test)]
mod tests {
    use dbdash_metadata::{FieldType, MetaField};
    use dbdash_query_builder::{
        ast::{Field, Operation, OperationType, Type, VariableDefinition},
        Document,
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Cursor;

    fn users() -> MetaTable {
        MetaTable::new(
            "User",
            vec![
                MetaField::new("id", FieldType::scalar("Int", "int4")),
                MetaField::new("createdAt", FieldType::scalar("Datetime", "timestamptz")),
            ],
        )
        .with_primary_key(&["id"])
    }

    fn document() -> PrintedDocument {
        document_with(&[])
    }

    fn document_with(variables: &[(&str, &str)]) -> PrintedDocument {
        Document {
            operation: Operation {
                ty: OperationType::Query,
                name: "getUsersQuery".into(),
                variables: variables
                    .iter()
                    .map(|(name, ty)| VariableDefinition {
                        name: name.to_string(),
                        ty: Type::Named(ty.to_string()),
                    })
                    .collect(),
                selection_set: vec![Field::new("users").into()],
            },
        }
        .print()
    }

    #[test]
    fn variables_per_request() {
        let options = PageRequestOptions::new("User", document(), 50)
            .with_order_by(&users(), &[OrderBy::desc("createdAt"), OrderBy::asc("age")])
            .with_filter(json!({ "id": { "greaterThan": 3 } }));

        assert_eq!(
            options.variables(&PageRequest::First),
            json!({ "first": 50, "orderBy": ["CREATED_AT_DESC"], "filter": { "id": { "greaterThan": 3 } } })
        );
        assert_eq!(
            options.variables(&PageRequest::After(Cursor::new("abc"))),
            json!({ "first": 50, "after": "abc", "orderBy": ["CREATED_AT_DESC"], "filter": { "id": { "greaterThan": 3 } } })
        );
    }

    #[test]
    fn optional_variables_are_omitted() {
        let options = PageRequestOptions::new("User", document(), 100);

        assert_eq!(
            options.variables(&PageRequest::Offset(300)),
            json!({ "first": 100, "offset": 300 })
        );
    }

    #[test]
    fn paging_arguments_follow_the_declared_variables() {
        let cursors_only = PageRequestOptions::new("User", document_with(&[("first", "Int"), ("after", "Cursor")]), 100);
        assert_eq!(
            cursors_only.paging_arguments(),
            PagingArguments {
                after: true,
                offset: false
            }
        );

        let both = PageRequestOptions::new(
            "User",
            document_with(&[("first", "Int"), ("offset", "Int"), ("after", "Cursor")]),
            100,
        );
        assert_eq!(both.paging_arguments(), PagingArguments::ALL);
    }

    #[test]
    fn page_size_comes_from_the_configuration() {
        let config = PaginationConfig {
            page_size: 25,
            ..Default::default()
        };

        let options = PageRequestOptions::from_config("User", document(), &config);
        assert_eq!(options.page_size, 25);
        assert_eq!(options.variables(&PageRequest::First), json!({ "first": 25 }));
    }
}

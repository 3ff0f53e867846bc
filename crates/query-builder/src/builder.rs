//! Document construction as a pipeline of values:
//! [`QueryBuilder::entity`] → [`EntityQuery::select`] → [`EntityQuery::build`] → [`Document::print`].
//!
//! Every stage returns a new value, so a builder can be shared between documents and a
//! selection never leaks from one document into the next.

mod mutation;
mod naming;
mod read;
mod selection_set;

use dbdash_config::SelectionConfig;
use dbdash_metadata::{IntrospectionSchema, MetaObject, MetaTable, MutationType, OperationDefinition, QueryType};

use crate::{
    ast::Document,
    selection::{FieldSelection, SelectionError, SelectionResolver, SelectionSpec},
    BuildError,
};

pub use naming::canonical_input_type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    List,
    Single,
    Count,
    Create,
    Update,
    Delete,
}

/// Builds documents against one schema version.
#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    meta: &'a MetaObject,
    schema: &'a IntrospectionSchema,
    config: SelectionConfig,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(meta: &'a MetaObject, schema: &'a IntrospectionSchema) -> Self {
        Self {
            meta,
            schema,
            config: SelectionConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: &SelectionConfig) -> Self {
        self.config = config.clone();
        self
    }

    pub fn resolver(&self) -> SelectionResolver<'a> {
        SelectionResolver::new(self.meta).with_config(&self.config)
    }

    /// Starts a document on `model`, with its scalar columns selected.
    pub fn entity(&self, model: &str) -> Result<EntityQuery<'a>, BuildError> {
        let table = self
            .meta
            .find_table(model)
            .ok_or_else(|| BuildError::UnknownModel(model.to_string()))?;

        let selection = self.resolver().resolve(table, &SelectionSpec::default());

        Ok(EntityQuery {
            builder: self.clone(),
            table,
            selection,
        })
    }
}

/// A model with a resolved selection, ready to be turned into any document.
#[derive(Debug, Clone)]
pub struct EntityQuery<'a> {
    builder: QueryBuilder<'a>,
    table: &'a MetaTable,
    selection: Vec<FieldSelection>,
}

impl<'a> EntityQuery<'a> {
    pub fn table(&self) -> &'a MetaTable {
        self.table
    }

    pub fn selection(&self) -> &[FieldSelection] {
        &self.selection
    }

    /// Replaces the selection. Unknown names are dropped, see [`EntityQuery::validate`].
    #[must_use]
    pub fn select(self, spec: &SelectionSpec) -> Self {
        let selection = self.builder.resolver().resolve(self.table, spec);

        Self { selection, ..self }
    }

    /// Reports the names of `spec` that do not exist on the model.
    pub fn validate(&self, spec: &SelectionSpec) -> Vec<SelectionError> {
        self.builder.resolver().validate(self.table, spec)
    }

    pub fn build(&self, kind: OperationKind) -> Result<Document, BuildError> {
        match kind {
            OperationKind::List => self.list(),
            OperationKind::Single => self.single(),
            OperationKind::Count => self.count(),
            OperationKind::Create => self.mutation(MutationType::Create),
            OperationKind::Update => self.mutation(MutationType::Patch),
            OperationKind::Delete => self.mutation(MutationType::Delete),
        }
    }

    /// A paginated connection query: `get<Key>Query`.
    pub fn list(&self) -> Result<Document, BuildError> {
        let (key, definition) = self.find_query(QueryType::GetMany)?;
        Ok(read::list(key, definition, self.selection_set()?))
    }

    /// A single row by its key arguments: `get<Key>Query`.
    pub fn single(&self) -> Result<Document, BuildError> {
        let (key, definition) = self.find_query(QueryType::GetOne)?;
        Ok(read::single(key, definition, self.selection_set()?))
    }

    /// The total count of a connection: `get<Key>CountQuery`.
    pub fn count(&self) -> Result<Document, BuildError> {
        let (key, definition) = self.find_query(QueryType::GetMany)?;
        Ok(read::count(key, definition))
    }

    pub fn mutation(&self, mutation_type: MutationType) -> Result<Document, BuildError> {
        let model = self.table.name();
        let input_type = canonical_input_type(mutation_type, model);

        let candidates = self
            .builder
            .schema
            .operations_for(model, QueryType::Mutation)
            .filter(|(_, definition)| definition.mutation_type == Some(mutation_type))
            .filter(|(_, definition)| definition.input_type_name() == Some(input_type.as_str()))
            .collect::<Vec<_>>();

        let [(key, definition)] = candidates.as_slice() else {
            return Err(BuildError::NoMutationFound {
                model: model.to_string(),
                input_type,
                found: candidates.len(),
            });
        };

        let selection_set = match mutation_type {
            MutationType::Delete => Vec::new(),
            MutationType::Create | MutationType::Patch => self.selection_set()?,
        };

        Ok(mutation::build(key, definition, model, selection_set))
    }

    fn find_query(&self, qtype: QueryType) -> Result<(&'a str, &'a OperationDefinition), BuildError> {
        let model = self.table.name();
        let mut operations = self.builder.schema.operations_for(model, qtype);

        let found = operations.next().ok_or_else(|| BuildError::NoQueryFound {
            model: model.to_string(),
        })?;

        if let Some((other, _)) = operations.next() {
            tracing::warn!(
                "Several {qtype:?} operations found for {model}, using `{}` and ignoring `{other}`",
                found.0
            );
        }

        Ok(found)
    }

    fn selection_set(&self) -> Result<Vec<crate::ast::Selection>, BuildError> {
        if self.selection.is_empty() {
            return Err(BuildError::EmptySelection {
                model: self.table.name().to_string(),
            });
        }

        Ok(selection_set::render(&self.selection))
    }
}

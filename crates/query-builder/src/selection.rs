//! Resolution of a selection request into the concrete fields of a table.
//!
//! Resolution is lenient: names that do not exist are left out of the result. Configuration
//! mistakes are reported by [`SelectionResolver::validate`], which callers run explicitly before
//! building a document.

use dbdash_config::SelectionConfig;
use dbdash_metadata::{MetaField, MetaObject, MetaTable, Relation};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::custom_ast;

/// What a caller asks for: a named preset, or an explicit list of fields and relations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SelectionSpec {
    Preset(Preset),
    Explicit(ExplicitSelection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// The first few scalar columns.
    Minimal,
    /// Scalar columns cheap enough to show in a list, timestamps included.
    Display,
    /// Every non-relational column.
    All,
    /// Every column and every relation.
    Full,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplicitSelection {
    pub select: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Relations to embed, keyed by relation field name.
    #[serde(default)]
    pub include: IndexMap<String, IncludeSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IncludeSpec {
    /// `true` embeds every scalar column of the related table, `false` nothing.
    All(bool),
    Select { select: Vec<String> },
}

impl SelectionSpec {
    pub fn select<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        SelectionSpec::Explicit(ExplicitSelection::new(fields))
    }
}

impl Default for SelectionSpec {
    /// Scalar columns only, relations are never embedded unless asked for.
    fn default() -> Self {
        SelectionSpec::Preset(Preset::All)
    }
}

impl From<Preset> for SelectionSpec {
    fn from(preset: Preset) -> Self {
        SelectionSpec::Preset(preset)
    }
}

impl From<ExplicitSelection> for SelectionSpec {
    fn from(selection: ExplicitSelection) -> Self {
        SelectionSpec::Explicit(selection)
    }
}

impl ExplicitSelection {
    pub fn new<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            select: fields.into_iter().map(str::to_string).collect(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn exclude<'a>(mut self, fields: impl IntoIterator<Item = &'a str>) -> Self {
        self.exclude.extend(fields.into_iter().map(str::to_string));
        self
    }

    #[must_use]
    pub fn include(mut self, relation: &str, spec: IncludeSpec) -> Self {
        self.include.insert(relation.to_string(), spec);
        self
    }
}

impl IncludeSpec {
    pub fn select<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        IncludeSpec::Select {
            select: fields.into_iter().map(str::to_string).collect(),
        }
    }
}

/// A resolved selection node.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSelection {
    Field {
        name: String,
        /// The column definition, used to expand structured values.
        definition: Option<MetaField>,
    },
    Object {
        name: String,
        is_belongs_to: bool,
        selection: Vec<FieldSelection>,
        variables: Option<RelationArguments>,
    },
}

/// Arguments of an embedded has-many connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationArguments {
    pub first: u32,
}

impl FieldSelection {
    fn column(field: &MetaField) -> Self {
        FieldSelection::Field {
            name: field.name().to_string(),
            definition: Some(field.clone()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FieldSelection::Field { name, .. } | FieldSelection::Object { name, .. } => name,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, FieldSelection::Object { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Field '{field}' does not exist in table '{table}'")]
    UnknownField { field: String, table: String },
    #[error("Relation '{relation}' does not exist in table '{table}'")]
    UnknownRelation { relation: String, table: String },
    #[error("Table '{table}' referenced by relation '{relation}' does not exist")]
    UnknownTable { table: String, relation: String },
}

/// Resolves selections against the tables of one schema version.
#[derive(Debug, Clone)]
pub struct SelectionResolver<'a> {
    tables: &'a MetaObject,
    config: SelectionConfig,
}

impl<'a> SelectionResolver<'a> {
    pub fn new(tables: &'a MetaObject) -> Self {
        Self {
            tables,
            config: SelectionConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: &SelectionConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// The concrete fields selected on `table`. Unknown names are dropped.
    pub fn resolve(&self, table: &MetaTable, spec: &SelectionSpec) -> Vec<FieldSelection> {
        match spec {
            SelectionSpec::Preset(preset) => self.resolve_preset(table, *preset),
            SelectionSpec::Explicit(explicit) => self.resolve_explicit(table, explicit),
        }
    }

    /// Every unknown name in an explicit selection. Presets are always valid.
    pub fn validate(&self, table: &MetaTable, spec: &SelectionSpec) -> Vec<SelectionError> {
        let SelectionSpec::Explicit(explicit) = spec else {
            return Vec::new();
        };

        let mut errors = Vec::new();

        for field in explicit.select.iter().chain(&explicit.exclude) {
            if !table.has_field(field) {
                errors.push(SelectionError::UnknownField {
                    field: field.clone(),
                    table: table.name().to_string(),
                });
            }
        }

        for (relation_name, include) in &explicit.include {
            let Some(relation) = table.find_relation(relation_name) else {
                errors.push(SelectionError::UnknownRelation {
                    relation: relation_name.clone(),
                    table: table.name().to_string(),
                });
                continue;
            };

            let Some(related) = self.tables.find_table(relation.references()) else {
                errors.push(SelectionError::UnknownTable {
                    table: relation.references().to_string(),
                    relation: relation_name.clone(),
                });
                continue;
            };

            if let IncludeSpec::Select { select } = include {
                for field in select.iter().filter(|field| !related.has_field(field)) {
                    errors.push(SelectionError::UnknownField {
                        field: field.clone(),
                        table: related.name().to_string(),
                    });
                }
            }
        }

        errors
    }

    fn resolve_preset(&self, table: &MetaTable, preset: Preset) -> Vec<FieldSelection> {
        match preset {
            Preset::Minimal => table
                .scalar_fields()
                .take(self.config.minimal_field_count)
                .map(FieldSelection::column)
                .collect(),
            Preset::Display => table
                .scalar_fields()
                .filter(|field| {
                    field.is_timestamp() || (!field.is_large_payload() && custom_ast::structured_kind(field).is_none())
                })
                .map(FieldSelection::column)
                .collect(),
            Preset::All => table.scalar_fields().map(FieldSelection::column).collect(),
            Preset::Full => {
                let mut selection = table.fields().iter().map(FieldSelection::column).collect::<Vec<_>>();

                selection.extend(
                    table
                        .all_relations()
                        .filter_map(|relation| self.embed_relation(relation, None)),
                );

                selection
            }
        }
    }

    fn resolve_explicit(&self, table: &MetaTable, explicit: &ExplicitSelection) -> Vec<FieldSelection> {
        for field in explicit.select.iter().filter(|field| !table.has_field(field)) {
            tracing::debug!("Dropping unknown field '{field}' from the selection on '{}'", table.name());
        }

        for field in explicit.select.iter().filter(|field| table.is_relational(field)) {
            tracing::debug!(
                "Dropping relational column '{field}' from the selection on '{}', include its relation instead",
                table.name()
            );
        }

        let mut selection = table
            .scalar_fields()
            .filter(|field| explicit.select.iter().any(|name| name == field.name()))
            .filter(|field| !explicit.exclude.iter().any(|name| name == field.name()))
            .map(FieldSelection::column)
            .collect::<Vec<_>>();

        for (relation_name, include) in &explicit.include {
            let fields = match include {
                IncludeSpec::All(false) => continue,
                IncludeSpec::All(true) => None,
                IncludeSpec::Select { select } => Some(select.as_slice()),
            };

            let Some(relation) = table.find_relation(relation_name) else {
                tracing::debug!(
                    "Dropping unknown relation '{relation_name}' from the selection on '{}'",
                    table.name()
                );
                continue;
            };

            selection.extend(self.embed_relation(relation, fields));
        }

        selection
    }

    /// Expands a relation one level deep with the scalar columns of the related table.
    fn embed_relation(&self, relation: Relation<'_>, fields: Option<&[String]>) -> Option<FieldSelection> {
        let Some(related) = self.tables.find_table(relation.references()) else {
            tracing::warn!(
                "Relation '{}' references the unknown table '{}'",
                relation.field_name(),
                relation.references()
            );
            return None;
        };

        let selection = self
            .resolve_preset(related, Preset::All)
            .into_iter()
            .filter(|field| fields.map_or(true, |fields| fields.iter().any(|name| name == field.name())))
            .collect::<Vec<_>>();

        if selection.is_empty() {
            return None;
        }

        let is_belongs_to = relation.is_belongs_to();

        Some(FieldSelection::Object {
            name: relation.field_name().to_string(),
            is_belongs_to,
            selection,
            variables: (!is_belongs_to).then_some(RelationArguments {
                first: self.config.has_many_first,
            }),
        })
    }
}

/// Resolves `spec` on `table` with the default configuration.
pub fn resolve(table: &MetaTable, tables: &MetaObject, spec: &SelectionSpec) -> Vec<FieldSelection> {
    SelectionResolver::new(tables).resolve(table, spec)
}

/// Validates `spec` on `table` with the default configuration.
pub fn validate(table: &MetaTable, tables: &MetaObject, spec: &SelectionSpec) -> Vec<SelectionError> {
    SelectionResolver::new(tables).validate(table, spec)
}

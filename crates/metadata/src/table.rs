use serde::Deserialize;

use crate::MetaField;

/// Definition of an introspected table: its columns, constraints and the relations the API
/// exposes on its GraphQL type.
///
/// `name` is the GraphQL type name of the table (`User`, `BlogPost`), which is also the `model`
/// operation definitions refer to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTable {
    name: String,
    /// Ordered by column position.
    #[serde(default)]
    fields: Vec<MetaField>,
    #[serde(default)]
    primary_constraints: Vec<PrimaryConstraint>,
    #[serde(default)]
    unique_constraints: Vec<UniqueConstraint>,
    #[serde(default)]
    foreign_constraints: Vec<ForeignConstraint>,
    #[serde(default)]
    relations: Relations,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryConstraint {
    #[serde(default)]
    pub name: Option<String>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueConstraint {
    #[serde(default)]
    pub name: Option<String>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignConstraint {
    #[serde(default)]
    pub name: Option<String>,
    /// Constrained columns of this table.
    pub fields: Vec<String>,
    /// GraphQL type name of the referenced table.
    pub ref_table: String,
    #[serde(default)]
    pub ref_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relations {
    #[serde(default)]
    pub belongs_to: Vec<BelongsTo>,
    #[serde(default)]
    pub has_many: Vec<HasMany>,
}

/// A foreign key from this table to exactly one row of `references`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BelongsTo {
    pub field_name: String,
    #[serde(default)]
    pub keys: Vec<String>,
    pub references: String,
}

/// The back side of a foreign key: rows of `references` pointing at this table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasMany {
    pub field_name: String,
    #[serde(default)]
    pub keys: Vec<String>,
    pub references: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Relation<'a> {
    BelongsTo(&'a BelongsTo),
    HasMany(&'a HasMany),
}

impl Relation<'_> {
    pub fn field_name(&self) -> &str {
        match self {
            Relation::BelongsTo(relation) => &relation.field_name,
            Relation::HasMany(relation) => &relation.field_name,
        }
    }

    /// GraphQL type name of the related table.
    pub fn references(&self) -> &str {
        match self {
            Relation::BelongsTo(relation) => &relation.references,
            Relation::HasMany(relation) => &relation.references,
        }
    }

    pub fn is_belongs_to(&self) -> bool {
        matches!(self, Relation::BelongsTo(_))
    }
}

impl MetaTable {
    pub fn new(name: impl Into<String>, fields: Vec<MetaField>) -> Self {
        Self {
            name: name.into(),
            fields,
            primary_constraints: Vec::new(),
            unique_constraints: Vec::new(),
            foreign_constraints: Vec::new(),
            relations: Relations::default(),
        }
    }

    #[must_use]
    pub fn with_primary_key(mut self, fields: &[&str]) -> Self {
        self.primary_constraints.push(PrimaryConstraint {
            name: None,
            fields: fields.iter().map(|field| field.to_string()).collect(),
        });
        self
    }

    #[must_use]
    pub fn with_foreign_key(mut self, fields: &[&str], ref_table: &str) -> Self {
        self.foreign_constraints.push(ForeignConstraint {
            name: None,
            fields: fields.iter().map(|field| field.to_string()).collect(),
            ref_table: ref_table.to_string(),
            ref_fields: Vec::new(),
        });
        self
    }

    #[must_use]
    pub fn with_relations(mut self, relations: Relations) -> Self {
        self.relations = relations;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All columns, in declaration order.
    pub fn fields(&self) -> &[MetaField] {
        &self.fields
    }

    pub fn primary_constraints(&self) -> &[PrimaryConstraint] {
        &self.primary_constraints
    }

    pub fn unique_constraints(&self) -> &[UniqueConstraint] {
        &self.unique_constraints
    }

    pub fn foreign_constraints(&self) -> &[ForeignConstraint] {
        &self.foreign_constraints
    }

    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    pub fn belongs_to(&self) -> &[BelongsTo] {
        &self.relations.belongs_to
    }

    pub fn has_many(&self) -> &[HasMany] {
        &self.relations.has_many
    }

    pub fn find_field(&self, name: &str) -> Option<&MetaField> {
        self.fields.iter().find(|field| field.name() == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.find_field(name).is_some()
    }

    pub fn is_primary_key(&self, field_name: &str) -> bool {
        self.primary_constraints
            .iter()
            .any(|constraint| constraint.fields.iter().any(|field| field == field_name))
    }

    pub fn is_foreign_key(&self, field_name: &str) -> bool {
        self.foreign_constraints
            .iter()
            .any(|constraint| constraint.fields.iter().any(|field| field == field_name))
    }

    /// A column is relational when it references another table without being part of the
    /// primary key. Columns that are both are treated as plain scalars.
    pub fn is_relational(&self, field_name: &str) -> bool {
        self.is_foreign_key(field_name) && !self.is_primary_key(field_name)
    }

    /// Non-relational columns, in declaration order.
    pub fn scalar_fields(&self) -> impl Iterator<Item = &MetaField> + '_ {
        self.fields.iter().filter(|field| !self.is_relational(field.name()))
    }

    /// Columns of the first primary key constraint.
    pub fn primary_key_fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.primary_constraints
            .first()
            .into_iter()
            .flat_map(|constraint| constraint.fields.iter().map(String::as_str))
    }

    /// Find a belongs-to or has-many relation by the field name the API exposes it under.
    pub fn find_relation(&self, field_name: &str) -> Option<Relation<'_>> {
        self.relations
            .belongs_to
            .iter()
            .find(|relation| relation.field_name == field_name)
            .map(Relation::BelongsTo)
            .or_else(|| {
                self.relations
                    .has_many
                    .iter()
                    .find(|relation| relation.field_name == field_name)
                    .map(Relation::HasMany)
            })
    }

    /// Every declared relation, belongs-to first.
    pub fn all_relations(&self) -> impl Iterator<Item = Relation<'_>> + '_ {
        self.relations
            .belongs_to
            .iter()
            .map(Relation::BelongsTo)
            .chain(self.relations.has_many.iter().map(Relation::HasMany))
    }
}

#[cfg(test)]
mod tests {
    use crate::FieldType;

    use super::*;

    fn posts() -> MetaTable {
        MetaTable::new(
            "Post",
            vec![
                MetaField::new("id", FieldType::scalar("UUID", "uuid")),
                MetaField::new("title", FieldType::scalar("String", "text")),
                MetaField::new("authorId", FieldType::scalar("UUID", "uuid")),
                MetaField::new("parentId", FieldType::scalar("UUID", "uuid")),
            ],
        )
        .with_primary_key(&["id", "parentId"])
        .with_foreign_key(&["authorId"], "User")
        .with_foreign_key(&["parentId"], "Post")
        .with_relations(Relations {
            belongs_to: vec![BelongsTo {
                field_name: "author".into(),
                keys: vec!["authorId".into()],
                references: "User".into(),
            }],
            has_many: vec![HasMany {
                field_name: "comments".into(),
                keys: vec!["postId".into()],
                references: "Comment".into(),
            }],
        })
    }

    #[test]
    fn foreign_keys_outside_the_primary_key_are_relational() {
        let table = posts();

        assert!(table.is_relational("authorId"));
        assert!(!table.is_relational("parentId"));
        assert!(!table.is_relational("title"));
    }

    #[test]
    fn scalar_fields_skip_relational_columns() {
        let table = posts();
        let names = table.scalar_fields().map(|field| field.name()).collect::<Vec<_>>();

        assert_eq!(names, vec!["id", "title", "parentId"]);
    }

    #[test]
    fn relations_are_found_by_field_name() {
        let table = posts();

        let author = table.find_relation("author").unwrap();
        assert!(author.is_belongs_to());
        assert_eq!(author.references(), "User");

        let comments = table.find_relation("comments").unwrap();
        assert!(!comments.is_belongs_to());
        assert_eq!(comments.references(), "Comment");

        assert!(table.find_relation("title").is_none());
    }
}

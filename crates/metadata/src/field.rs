use serde::Deserialize;

/// A column of an introspected table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaField {
    name: String,
    #[serde(rename = "type")]
    field_type: FieldType,
}

impl MetaField {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Date and time columns. These are kept in the `display` preset.
    pub fn is_timestamp(&self) -> bool {
        const TIMESTAMP_TYPES: &[&str] = &["timestamp", "timestamptz", "date", "time", "timetz"];

        self.field_type
            .pg_type()
            .is_some_and(|pg_type| TIMESTAMP_TYPES.contains(&pg_type))
            || matches!(self.field_type.gql_type.as_str(), "Datetime" | "Date" | "Time")
    }

    /// Columns whose values can grow arbitrarily large: documents, binary blobs, search vectors.
    pub fn is_large_payload(&self) -> bool {
        const LARGE_TYPES: &[&str] = &["json", "jsonb", "bytea", "tsvector", "xml"];

        self.field_type
            .pg_type()
            .is_some_and(|pg_type| LARGE_TYPES.contains(&pg_type))
            || self.field_type.gql_type == "JSON"
    }
}

/// The wire and storage types of a column.
///
/// `gql_type` is the GraphQL type the API exposes. `pg_type` and `subtype` carry the database
/// type the value comes from. They decide whether the value needs a structured sub-selection
/// (geometries, intervals) instead of a plain scalar reference.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldType {
    pub gql_type: String,
    #[serde(default)]
    pub pg_alias: Option<String>,
    #[serde(default)]
    pub pg_type: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default)]
    pub typmod: Option<serde_json::Value>,
}

impl FieldType {
    pub fn scalar(gql_type: impl Into<String>, pg_type: impl Into<String>) -> Self {
        Self {
            gql_type: gql_type.into(),
            pg_type: Some(pg_type.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    #[must_use]
    pub fn into_array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// The database type, preferring the alias the introspection resolved domains to.
    pub fn pg_type(&self) -> Option<&str> {
        self.pg_alias.as_deref().or(self.pg_type.as_deref())
    }
}

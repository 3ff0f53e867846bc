//! `orderBy` arguments, rendered as `FIELD_DIRECTION` enum tokens.

use dbdash_metadata::MetaTable;
use heck::ToShoutySnakeCase;

const ALWAYS_ALLOWED: &[&str] = &["NATURAL", "PRIMARY_KEY_ASC", "PRIMARY_KEY_DESC"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn suffix(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// `createdAt` descending renders as `CREATED_AT_DESC`.
    pub fn token(&self) -> String {
        format!("{}_{}", self.field.to_shouty_snake_case(), self.direction.suffix())
    }
}

/// Tokens for the orderings that refer to columns of `table`, in the given order.
pub fn order_by_tokens(table: &MetaTable, order_by: &[OrderBy]) -> Vec<String> {
    order_by
        .iter()
        .filter(|order| {
            let known = table.has_field(&order.field);
            if !known {
                tracing::warn!("Ignoring ordering on unknown field '{}' of '{}'", order.field, table.name());
            }
            known
        })
        .map(OrderBy::token)
        .collect()
}

/// Keeps the raw `FIELD_DIRECTION` tokens naming a column of `table`, plus `NATURAL` and the
/// primary key orderings.
pub fn filter_order_by_tokens<'a>(table: &MetaTable, tokens: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    tokens
        .into_iter()
        .filter(|token| is_known_token(table, token))
        .map(str::to_string)
        .collect()
}

fn is_known_token(table: &MetaTable, token: &str) -> bool {
    if ALWAYS_ALLOWED.contains(&token) {
        return true;
    }

    let Some(field) = token
        .strip_suffix("_ASC")
        .or_else(|| token.strip_suffix("_DESC"))
    else {
        return false;
    };

    table
        .fields()
        .iter()
        .any(|column| column.name().to_shouty_snake_case() == field)
}

#[cfg(test)]
mod tests {
    use dbdash_metadata::{FieldType, MetaField};

    use super::*;

    fn users() -> MetaTable {
        MetaTable::new(
            "User",
            vec![
                MetaField::new("id", FieldType::scalar("UUID", "uuid")),
                MetaField::new("createdAt", FieldType::scalar("Datetime", "timestamptz")),
            ],
        )
    }

    #[test]
    fn tokens_are_shouty_snake_case() {
        assert_eq!(OrderBy::desc("createdAt").token(), "CREATED_AT_DESC");
        assert_eq!(OrderBy::asc("id").token(), "ID_ASC");
    }

    #[test]
    fn unknown_fields_are_filtered_out() {
        let tokens = order_by_tokens(
            &users(),
            &[OrderBy::desc("createdAt"), OrderBy::asc("age"), OrderBy::asc("id")],
        );

        assert_eq!(tokens, vec!["CREATED_AT_DESC", "ID_ASC"]);
    }

    #[test]
    fn raw_tokens_are_filtered_out() {
        let tokens = filter_order_by_tokens(
            &users(),
            ["NATURAL", "AGE_ASC", "CREATED_AT_ASC", "CREATED_AT", "PRIMARY_KEY_DESC"],
        );

        assert_eq!(tokens, vec!["NATURAL", "CREATED_AT_ASC", "PRIMARY_KEY_DESC"]);
    }
}

use dbdash_metadata::OperationDefinition;

use super::naming;
use crate::ast::{
    leaves, Argument, Document, Field, Operation, OperationType, Selection, Type, VariableDefinition,
};

const PAGE_INFO_FIELDS: [&str; 4] = ["hasNextPage", "hasPreviousPage", "startCursor", "endCursor"];
const COUNT_ARGUMENTS: [&str; 2] = ["condition", "filter"];

pub(super) fn list(key: &str, definition: &OperationDefinition, selection_set: Vec<Selection>) -> Document {
    let mut connection = Vec::new();

    if definition.selects("totalCount") {
        connection.push(Field::new("totalCount").into());
    }

    if definition.selects("pageInfo") {
        connection.push(Field::new("pageInfo").with_selection_set(leaves(PAGE_INFO_FIELDS)).into());
    }

    // Connections without `nodes` only expose rows through their edges.
    if definition.selects("edges") && !definition.selects("nodes") {
        let mut edge = leaves(["cursor"]);
        edge.push(Field::new("node").with_selection_set(selection_set).into());

        connection.push(Field::new("edges").with_selection_set(edge).into());
    } else {
        connection.push(Field::new("nodes").with_selection_set(selection_set).into());
    }

    query(
        naming::read_query_name(key),
        key,
        definition.properties.keys().map(String::as_str),
        definition,
        connection,
    )
}

pub(super) fn single(key: &str, definition: &OperationDefinition, selection_set: Vec<Selection>) -> Document {
    query(
        naming::read_query_name(key),
        key,
        definition.properties.keys().map(String::as_str),
        definition,
        selection_set,
    )
}

pub(super) fn count(key: &str, definition: &OperationDefinition) -> Document {
    query(
        naming::count_query_name(key),
        key,
        COUNT_ARGUMENTS.into_iter(),
        definition,
        leaves(["totalCount"]),
    )
}

/// A query on the root field `key`, forwarding every named argument the definition declares
/// as a variable of the same name.
fn query<'a>(
    name: String,
    key: &str,
    arguments: impl Iterator<Item = &'a str>,
    definition: &OperationDefinition,
    selection_set: Vec<Selection>,
) -> Document {
    let (variables, arguments): (Vec<_>, Vec<_>) = arguments
        .filter_map(|argument| {
            let property = definition.properties.get(argument)?;

            let variable = VariableDefinition {
                name: argument.to_string(),
                ty: Type::from(property),
            };

            Some((variable, Argument::variable(argument)))
        })
        .unzip();

    Document {
        operation: Operation {
            ty: OperationType::Query,
            name,
            variables,
            selection_set: vec![Field::new(key)
                .with_arguments(arguments)
                .with_selection_set(selection_set)
                .into()],
        },
    }
}

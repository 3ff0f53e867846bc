use crate::{
    ast::{leaves, Argument, Field, Selection, Value},
    custom_ast,
    selection::FieldSelection,
};

pub(super) fn render(selection: &[FieldSelection]) -> Vec<Selection> {
    selection.iter().map(|field| render_field(field).into()).collect()
}

fn render_field(field: &FieldSelection) -> Field {
    match field {
        FieldSelection::Field {
            definition: Some(definition),
            ..
        } => custom_ast::expand(definition),
        FieldSelection::Field { name, definition: None } => Field::new(name.as_str()),
        FieldSelection::Object {
            name,
            is_belongs_to: true,
            selection,
            ..
        } => Field::new(name.as_str()).with_selection_set(render(selection)),
        FieldSelection::Object {
            name,
            is_belongs_to: false,
            selection,
            variables,
        } => {
            let arguments = variables
                .iter()
                .map(|variables| Argument {
                    name: "first".into(),
                    value: Value::Int(i64::from(variables.first)),
                })
                .collect();

            let mut connection = leaves(["totalCount"]);
            connection.push(Field::new("nodes").with_selection_set(render(selection)).into());

            Field::new(name.as_str())
                .with_arguments(arguments)
                .with_selection_set(connection)
        }
    }
}

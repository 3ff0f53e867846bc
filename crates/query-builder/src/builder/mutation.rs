use dbdash_metadata::OperationDefinition;

use super::naming;
use crate::ast::{
    leaves, Argument, Document, Field, Operation, OperationType, Selection, Type, Value, VariableDefinition,
};

const CLIENT_MUTATION_ID: &str = "clientMutationId";

/// `<key>(input: {...})` with one variable per field of the input object. Introspections that
/// do not describe the input fields get a single `$input` variable instead.
pub(super) fn build(
    key: &str,
    definition: &OperationDefinition,
    model: &str,
    selection_set: Vec<Selection>,
) -> Document {
    let input = definition.properties.get("input");

    let (variables, input_value) = match input.and_then(|input| input.properties.as_ref()) {
        Some(fields) => {
            let (variables, values): (Vec<_>, Vec<_>) = fields
                .iter()
                .filter(|(name, _)| name.as_str() != CLIENT_MUTATION_ID)
                .map(|(name, property)| {
                    let variable = VariableDefinition {
                        name: name.clone(),
                        ty: Type::from(property),
                    };

                    (variable, (name.clone(), Value::Variable(name.clone())))
                })
                .unzip();

            (variables, Value::Object(values))
        }
        None => {
            let variables = input
                .map(|property| VariableDefinition {
                    name: "input".into(),
                    ty: Type::from(property),
                })
                .into_iter()
                .collect();

            (variables, Value::Variable("input".into()))
        }
    };

    let payload = naming::payload_field(model);

    let selects_payload = definition.selection.is_empty() || definition.selects(&payload);

    let payload_selection = if selects_payload && !selection_set.is_empty() {
        vec![Field::new(payload).with_selection_set(selection_set).into()]
    } else {
        leaves([CLIENT_MUTATION_ID])
    };

    Document {
        operation: Operation {
            ty: OperationType::Mutation,
            name: naming::mutation_name(key),
            variables,
            selection_set: vec![Field::new(key)
                .with_arguments(vec![Argument {
                    name: "input".into(),
                    value: input_value,
                }])
                .with_selection_set(payload_selection)
                .into()],
        },
    }
}

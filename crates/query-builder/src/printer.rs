use std::fmt::{self, Write};

use crate::ast::{Argument, Document, Selection, Type, Value, VariableDefinition};

const INDENT: &str = "  ";

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer {
            buffer: String::with_capacity(256),
            indent: 0,
        };
        printer.write_document(self)?;

        f.write_str(&printer.buffer)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Named(name) => f.write_str(name),
            Type::List(inner) => write!(f, "[{inner}]"),
            Type::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Variable(name) => write!(f, "${name}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Object(fields) => {
                f.write_char('{')?;

                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }

                f.write_char('}')
            }
        }
    }
}

struct Printer {
    buffer: String,
    indent: usize,
}

impl Printer {
    fn write_document(&mut self, document: &Document) -> fmt::Result {
        let operation = &document.operation;

        write!(self.buffer, "{} {}", operation.ty.as_str(), operation.name)?;
        self.write_variable_definitions(&operation.variables)?;
        self.write_selection_set(&operation.selection_set)?;

        Ok(())
    }

    fn write_variable_definitions(&mut self, variables: &[VariableDefinition]) -> fmt::Result {
        if variables.is_empty() {
            return Ok(());
        }

        self.buffer.push('(');

        for (i, variable) in variables.iter().enumerate() {
            if i > 0 {
                self.buffer.push_str(", ");
            }
            write!(self.buffer, "${}: {}", variable.name, variable.ty)?;
        }

        self.buffer.push(')');

        Ok(())
    }

    fn write_arguments(&mut self, arguments: &[Argument]) -> fmt::Result {
        if arguments.is_empty() {
            return Ok(());
        }

        self.buffer.push('(');

        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                self.buffer.push_str(", ");
            }
            write!(self.buffer, "{}: {}", argument.name, argument.value)?;
        }

        self.buffer.push(')');

        Ok(())
    }

    fn write_selection_set(&mut self, selection_set: &[Selection]) -> fmt::Result {
        if selection_set.is_empty() {
            return Ok(());
        }

        self.buffer.push_str(" {\n");
        self.indent += 1;

        for selection in selection_set {
            self.write_selection(selection)?;
        }

        self.indent -= 1;
        self.write_indent();
        self.buffer.push('}');

        Ok(())
    }

    fn write_selection(&mut self, selection: &Selection) -> fmt::Result {
        self.write_indent();

        match selection {
            Selection::Field(field) => {
                self.buffer.push_str(&field.name);
                self.write_arguments(&field.arguments)?;
                self.write_selection_set(&field.selection_set)?;
            }
            Selection::InlineFragment(fragment) => {
                write!(self.buffer, "... on {}", fragment.type_condition)?;
                self.write_selection_set(&fragment.selection_set)?;
            }
        }

        self.buffer.push('\n');

        Ok(())
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.buffer.push_str(INDENT);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Field, InlineFragment, Operation, OperationType};

    use super::*;

    #[test]
    fn prints_nested_selections() {
        let document = Document {
            operation: Operation {
                ty: OperationType::Mutation,
                name: "createUserMutation".into(),
                variables: vec![VariableDefinition {
                    name: "user".into(),
                    ty: Type::NonNull(Box::new(Type::Named("UserInput".into()))),
                }],
                selection_set: vec![Field::new("createUser")
                    .with_arguments(vec![Argument {
                        name: "input".into(),
                        value: Value::Object(vec![("user".into(), Value::Variable("user".into()))]),
                    }])
                    .with_selection_set(vec![Field::new("user")
                        .with_selection_set(vec![
                            Field::new("id").into(),
                            Field::new("shape")
                                .with_selection_set(vec![InlineFragment {
                                    type_condition: "GeometryPoint".into(),
                                    selection_set: vec![Field::new("x").into()],
                                }
                                .into()])
                                .into(),
                        ])
                        .into()])
                    .into()],
            },
        };

        insta::assert_snapshot!(document, @r###"
        mutation createUserMutation($user: UserInput!) {
          createUser(input: {user: $user}) {
            user {
              id
              shape {
                ... on GeometryPoint {
                  x
                }
              }
            }
          }
        }
        "###);
    }

    #[test]
    fn operations_without_variables() {
        let document = Document {
            operation: Operation {
                ty: OperationType::Query,
                name: "getCommentsCountQuery".into(),
                variables: Vec::new(),
                selection_set: vec![Field::new("comments")
                    .with_arguments(vec![Argument {
                        name: "first".into(),
                        value: Value::Int(20),
                    }])
                    .with_selection_set(vec![Field::new("totalCount").into()])
                    .into()],
            },
        };

        assert_eq!(
            document.to_string(),
            "query getCommentsCountQuery {\n  comments(first: 20) {\n    totalCount\n  }\n}"
        );
    }
}

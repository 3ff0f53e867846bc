//! The subset of the GraphQL executable document grammar the builder emits: a single named
//! operation with variable definitions, fields with arguments, and inline fragments.

use dbdash_metadata::PropertyDefinition;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub operation: Operation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Query,
    Mutation,
}

impl OperationType {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub ty: OperationType,
    pub name: String,
    pub variables: Vec<VariableDefinition>,
    pub selection_set: Vec<Selection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Named(String),
    List(Box<Type>),
    NonNull(Box<Type>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field(Field),
    InlineFragment(InlineFragment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub selection_set: Vec<Selection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineFragment {
    pub type_condition: String,
    pub selection_set: Vec<Selection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Variable(String),
    Int(i64),
    Object(Vec<(String, Value)>),
}

impl Document {
    pub fn name(&self) -> &str {
        &self.operation.name
    }

    /// Name of the first root field, which is also its key in the response `data` object.
    pub fn root_field(&self) -> Option<&str> {
        self.operation.selection_set.iter().find_map(|selection| match selection {
            Selection::Field(field) => Some(field.name.as_str()),
            Selection::InlineFragment(_) => None,
        })
    }

    /// Serializes the document and keeps the AST alongside the text.
    pub fn print(self) -> PrintedDocument {
        let query = self.to_string();

        PrintedDocument {
            query_name: self.operation.name.clone(),
            ast: self,
            query,
        }
    }
}

/// A document ready to be handed to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintedDocument {
    pub ast: Document,
    pub query_name: String,
    pub query: String,
}

impl PrintedDocument {
    pub fn root_field(&self) -> Option<&str> {
        self.ast.root_field()
    }
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            selection_set: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_arguments(mut self, arguments: Vec<Argument>) -> Self {
        self.arguments = arguments;
        self
    }

    #[must_use]
    pub fn with_selection_set(mut self, selection_set: Vec<Selection>) -> Self {
        self.selection_set = selection_set;
        self
    }
}

impl From<Field> for Selection {
    fn from(field: Field) -> Self {
        Selection::Field(field)
    }
}

impl From<InlineFragment> for Selection {
    fn from(fragment: InlineFragment) -> Self {
        Selection::InlineFragment(fragment)
    }
}

impl Argument {
    pub fn variable(name: impl Into<String>) -> Self {
        let name = name.into();

        Self {
            value: Value::Variable(name.clone()),
            name,
        }
    }
}

impl From<&PropertyDefinition> for Type {
    fn from(property: &PropertyDefinition) -> Self {
        let named = Type::Named(property.type_name.clone());
        let inner = if property.is_not_null {
            Type::NonNull(Box::new(named))
        } else {
            named
        };

        if !property.is_array {
            return inner;
        }

        let list = Type::List(Box::new(inner));

        if property.is_array_not_null {
            Type::NonNull(Box::new(list))
        } else {
            list
        }
    }
}

/// Leaf fields selected by name only.
pub(crate) fn leaves<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<Selection> {
    names.into_iter().map(|name| Field::new(name).into()).collect()
}

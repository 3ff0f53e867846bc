use dbdash_metadata::MutationType;
use heck::{ToLowerCamelCase, ToUpperCamelCase};

/// `users` reads are named `getUsersQuery`.
pub(super) fn read_query_name(key: &str) -> String {
    format!("get{}Query", key.to_upper_camel_case())
}

/// `users` counts are named `getUsersCountQuery`.
pub(super) fn count_query_name(key: &str) -> String {
    format!("get{}CountQuery", key.to_upper_camel_case())
}

/// `createUser` is named `createUserMutation`.
pub(super) fn mutation_name(key: &str) -> String {
    format!("{key}Mutation")
}

/// The field of a mutation payload holding the affected row: `BlogPost` → `blogPost`.
pub(super) fn payload_field(model: &str) -> String {
    model.to_lower_camel_case()
}

/// The input type of the mutation a model is expected to expose: `CreateUserInput`,
/// `UpdateUserInput`, `DeleteUserInput`.
pub fn canonical_input_type(mutation_type: MutationType, model: &str) -> String {
    format!("{}{model}Input", mutation_type.input_verb())
}

/// Configuration errors: the metadata or the introspected operations do not describe what the
/// caller asked for. These are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Table '{0}' does not exist in the metadata")]
    UnknownModel(String),
    #[error("No queries found for {model}")]
    NoQueryFound { model: String },
    #[error("No mutation found for {model}: expected exactly one mutation taking `{input_type}`, found {found}")]
    NoMutationFound {
        model: String,
        input_type: String,
        found: usize,
    },
    #[error("The selection on {model} is empty")]
    EmptySelection { model: String },
}

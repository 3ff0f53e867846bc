#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Number of leading scalar columns selected by the `minimal` preset.
    pub minimal_field_count: usize,
    /// Page size of has-many relations embedded in a selection.
    pub has_many_first: u32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            minimal_field_count: 3,
            has_many_first: 20,
        }
    }
}

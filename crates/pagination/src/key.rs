//! Structural cache keys.
//!
//! Filters are arbitrary JSON objects, so they are fingerprinted from a canonical encoding with
//! object keys sorted: two filters that only differ in key order share their pages. The order of
//! `orderBy` tokens is kept as given since it changes the row order.

use std::fmt;

use serde_json::Value;

use crate::PageRequestOptions;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(blake3::Hash);

impl Fingerprint {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes))
    }

    pub fn of_json(value: &Value) -> Self {
        let mut hasher = blake3::Hasher::new();
        write_canonical(&mut hasher, value);

        Self(hasher.finalize())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Fingerprint").field(&self.to_string()).finish()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex()[..16])
    }
}

/// Everything that decides which rows a page holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionsKey {
    pub entity: String,
    pub page_size: usize,
    pub order_by: Vec<String>,
    pub filter: Fingerprint,
    pub selection: Fingerprint,
}

impl From<&PageRequestOptions> for OptionsKey {
    fn from(options: &PageRequestOptions) -> Self {
        Self {
            entity: options.entity.clone(),
            page_size: options.page_size,
            order_by: options.order_by.clone(),
            filter: Fingerprint::of_json(options.filter.as_ref().unwrap_or(&Value::Null)),
            selection: Fingerprint::of_bytes(options.document.query.as_bytes()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub options: OptionsKey,
    pub page_index: usize,
}

impl OptionsKey {
    pub fn page(&self, page_index: usize) -> PageKey {
        PageKey {
            options: self.clone(),
            page_index,
        }
    }
}

fn write_canonical(hasher: &mut blake3::Hasher, value: &Value) {
    // Every value is prefixed by a tag so that distinct shapes never share an encoding.
    match value {
        Value::Null => {
            hasher.update(b"n");
        }
        Value::Bool(value) => {
            hasher.update(if *value { b"t" } else { b"f" });
        }
        Value::Number(number) => {
            hasher.update(b"#");
            write_str(hasher, &number.to_string());
        }
        Value::String(string) => {
            hasher.update(b"s");
            write_str(hasher, string);
        }
        Value::Array(items) => {
            hasher.update(b"[");
            hasher.update(&(items.len() as u64).to_le_bytes());
            for item in items {
                write_canonical(hasher, item);
            }
        }
        Value::Object(object) => {
            let mut entries = object.iter().collect::<Vec<_>>();
            entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

            hasher.update(b"{");
            hasher.update(&(entries.len() as u64).to_le_bytes());
            for (key, value) in entries {
                write_str(hasher, key);
                write_canonical(hasher, value);
            }
        }
    }
}

fn write_str(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

//! Hybrid cursor/offset pagination over the connections of a generated GraphQL API.
//!
//! Pages are fetched with the end cursor of the previous page whenever it is known, and with an
//! offset when a view jumps ahead of what was loaded so far. Fetched pages live in a [`PageCache`]
//! shared between views, keyed by the entity and every option that changes which rows a page
//! holds.

mod cache;
mod cursor_chain;
mod engine;
mod key;
mod options;
mod page;
pub mod plan;
pub mod response;
mod row_cache;
mod snapshot;
mod transport;

pub use cache::PageCache;
pub use cursor_chain::CursorChain;
pub use engine::{PaginationEngine, Row};
pub use key::{Fingerprint, OptionsKey, PageKey};
pub use options::PageRequestOptions;
pub use page::{Cursor, PageData, PageInfo};
pub use plan::PageRequest;
pub use row_cache::{MergePatch, RowCacheAccessor};
pub use snapshot::PaginationSnapshot;
pub use transport::{FetchError, FetchResult, GraphqlRequest, HttpTransport, Transport};

#[cfg(test)]
mod tests {
    use wiremock as _;
}

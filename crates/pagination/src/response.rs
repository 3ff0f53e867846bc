//! Reading pages out of connection responses.

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::{FetchError, FetchResult, PageData, PageInfo};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection<R> {
    total_count: Option<usize>,
    #[serde(default)]
    page_info: PageInfo,
    nodes: Option<Vec<R>>,
    edges: Option<Vec<Edge<R>>>,
}

#[derive(Deserialize)]
struct Edge<R> {
    node: R,
}

/// Reads the connection under `root_field` of a response's `data` object. Rows come from
/// `nodes`, or from `edges[].node` for connections that only expose edges.
pub fn parse_page<R: DeserializeOwned>(mut data: Value, root_field: &str, page_index: usize) -> FetchResult<PageData<R>> {
    let connection = data
        .get_mut(root_field)
        .map(Value::take)
        .ok_or_else(|| FetchError::invalid_response(format!("missing `{root_field}` in the response")))?;

    let connection: Connection<R> = serde_json::from_value(connection).map_err(FetchError::invalid_response)?;

    let rows = match (connection.nodes, connection.edges) {
        (Some(nodes), _) => nodes,
        (None, Some(edges)) => edges.into_iter().map(|edge| edge.node).collect(),
        (None, None) => {
            return Err(FetchError::invalid_response(format!(
                "`{root_field}` has neither nodes nor edges"
            )));
        }
    };

    Ok(PageData {
        rows,
        page_info: connection.page_info,
        page_index,
        total_count: connection.total_count,
    })
}

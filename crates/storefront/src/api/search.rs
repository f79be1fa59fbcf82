//! Combined product and store search.

use bazaar_core::SearchResults;
use serde_json::Value;
use tracing::instrument;

use super::{ApiClient, ApiError, decode, with_query};

/// `GET /search?q=`
///
/// A blank query returns empty results without calling the backend.
///
/// # Errors
///
/// Returns `ApiError` if the backend call fails.
#[instrument(skip(client))]
pub async fn query(client: &ApiClient, q: &str) -> Result<SearchResults, ApiError> {
    let q = q.trim();
    if q.is_empty() {
        return Ok(SearchResults::default());
    }
    let path = with_query("search", &[("q", Some(q))]);
    decode(client.get::<Value>(&path, None).await?)
}

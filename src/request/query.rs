use axum::{extract::Query, http::Uri};

/// First value for `key` in the query string, form-decoded.
///
/// Returns `None` when the key is absent, its first value is empty, or the
/// query string cannot be parsed.
pub fn query_param(uri: &Uri, key: &str) -> Option<String> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri).ok()?;

    pairs
        .into_iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

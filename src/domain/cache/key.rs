//! Query key normalization

/// Normalizes a raw search query into its cache key.
///
/// Keys are trimmed and lowercased so "Arsenicum " and "arsenicum" share an entry.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Prefixes a key with a namespace, as used by backends sharing one keyspace
pub fn namespaced(namespace: &str, key: &str) -> String {
    if namespace.is_empty() {
        key.to_string()
    } else {
        format!("{}:{}", namespace, key)
    }
}

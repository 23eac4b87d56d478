use serde::{Deserialize, Serialize};

/// One page of a paginated Docker Hub listing.
///
/// Only `results` is required; `count` and `next` are read so callers can
/// tell when later pages were left behind.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    pub results: Vec<T>,
}

// `deserialize_with = "Option::deserialize"` keeps nullable fields mandatory:
// a `null` is copied through, a missing key fails the decode.

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct RepositorySummary {
    pub name: String,
    #[serde(deserialize_with = "Option::deserialize")]
    pub description: Option<String>,
    pub star_count: u64,
    pub pull_count: u64,
    #[serde(deserialize_with = "Option::deserialize")]
    pub last_updated: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct TagSummary {
    pub name: String,
    #[serde(deserialize_with = "Option::deserialize")]
    pub full_size: Option<u64>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub last_updated: Option<String>,
}

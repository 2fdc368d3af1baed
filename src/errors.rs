use thiserror::Error;

/// Failures while loading the entity catalog. The client has no usable
/// state without a catalog, so these are fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to fetch catalog from {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to read catalog file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog payload is not an id -> entry mapping: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog is empty")]
    Empty,
}

/// Failures talking to the instance API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Unauthorized: Invalid password")]
    Unauthorized,
    #[error("HTTP error: {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("instance data has no pokemon_ids list")]
    MissingPokemonIds,
    #[error("not logged in")]
    NoCredential,
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}

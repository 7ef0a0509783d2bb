//! Error taxonomy for inventory lookups

use thiserror::Error;

/// Errors produced while talking to the inventory API or correlating its data
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The base URL or endpoint path could not be turned into a request URL
    #[error("invalid url for {path}: {source}")]
    InvalidUrl {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// Network failure after exhausting retries
    #[error("transport error calling {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-200, non-429 response; never retried
    #[error("api error calling {url}: status code {status}")]
    Api { url: String, status: u16 },

    /// 429 responses kept coming until the retry budget ran out
    #[error("rate limited calling {url}: gave up after {attempts} attempts")]
    RateLimited { url: String, attempts: u32 },

    /// Body of a 200 response was not the expected JSON shape
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A single resource's configuration payload could not be decoded
    #[error("failed to resolve configuration for resource {hash}: {source}")]
    PartialResolution {
        hash: String,
        #[source]
        source: serde_json::Error,
    },

    /// An agent or runtime lookup for one cluster failed
    #[error("{lookup} lookup failed for cluster {cluster}: {source}")]
    ClusterLookup {
        cluster: String,
        lookup: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// A per-cluster worker panicked or was cancelled
    #[error("cluster worker failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an error with the cluster and lookup it belongs to
    pub fn cluster_lookup(cluster: impl Into<String>, lookup: &'static str, source: Error) -> Self {
        Self::ClusterLookup {
            cluster: cluster.into(),
            lookup,
            source: Box::new(source),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::ClusterLookup { source, .. } => source.status(),
            _ => None,
        }
    }
}

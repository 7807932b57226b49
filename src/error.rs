use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

/// All different error types this crate uses.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Received a non success Http response.
    #[error("Expected a 2xx Success but got: {status} for {url}")]
    NoHttpSuccess {
        /// Statuscode of the response.
        status: StatusCode,
        /// The requested url.
        url: Url,
    },
    /// Failed to get a response.
    #[error("Request to {url} failed: {error}")]
    RequestFailure {
        /// The requested url.
        url: Url,
        /// The reqwest error.
        error: reqwest::Error,
    },
    /// Received a success response but failed to parse the body into a
    /// [`select::document::Document`].
    #[error("Failed to read {url} as html document")]
    ReadDocument {
        /// The requested url.
        url: Url,
        /// Payload of the response.
        body: Bytes,
    },
    /// The catalog listing could not be decoded.
    #[error("Catalog listing at {url} is malformed: {error}")]
    MalformedCatalog {
        /// The requested url.
        url: Url,
        /// The decode error.
        error: reqwest::Error,
    },
    /// A reference carries a relative path that does not resolve against the
    /// base url.
    #[error("Invalid article path {path:?}: {error}")]
    InvalidArticlePath {
        /// The relative path from the catalog.
        path: String,
        /// The parse error.
        error: url::ParseError,
    },
}

//! Error types for the animal spotter client.
//!
//! # Design
//! `ApiError` is the single discriminated failure every JSON operation
//! resolves to, sign-up and sign-in included. Image downloads report through
//! `ImageError`, which `ApiController::fetch_image` collapses to `None`
//! after logging it.

use thiserror::Error;

/// Failures of the JSON API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An authenticated call was attempted before a successful sign-in.
    #[error("no bearer token; sign in first")]
    NoBearer,

    /// The request never produced an HTTP response.
    #[error("server error: {0}")]
    Server(#[from] TransportError),

    /// The server answered with something other than 200.
    #[error("unexpected status code {status}")]
    UnexpectedStatusCode { status: u16 },

    /// The server answered 200 with an empty body.
    #[error("no data returned")]
    NoData,

    /// The body did not parse into the expected shape.
    #[error("bad decode: {0}")]
    BadDecode(String),

    /// The animal name cannot be expressed as a single path segment.
    #[error("invalid animal name {0:?}")]
    InvalidName(String),

    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encode(String),
}

/// Failures while executing a request.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// Everything that can go wrong fetching an image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("malformed image url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("image transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("unexpected status code {status} for image")]
    UnexpectedStatusCode { status: u16 },

    #[error("image response had no data")]
    NoData,

    #[error("image decode failed: {0}")]
    Decode(String),
}

/// Invalid client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url {value:?}: {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

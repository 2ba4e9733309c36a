//! Error types for the HubSpot client core.
//!
//! # Design
//! `BuildError` covers everything that can go wrong while rendering a URL and
//! is a pure function of the inputs. `ApiError` wraps it together with the
//! response-side failures. `NotFound` gets a dedicated variant because
//! callers routinely treat "no such record" differently from other non-2xx
//! statuses.

use thiserror::Error;

/// Errors raised while rendering a path template into a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A `:name` placeholder had no value in the parameters or configuration.
    #[error("interpolation not resolved: :{0}")]
    MissingInterpolation(String),

    /// The configuration lacks a value the call needs (API key or portal id).
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// A list or range was supplied for a path placeholder.
    #[error("parameter :{0} cannot be used as a path segment")]
    InvalidPathValue(String),
}

/// Errors returned by `HubSpotClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The caller passed arguments the endpoint cannot accept.
    #[error("invalid params: {0}")]
    InvalidParams(String),
}

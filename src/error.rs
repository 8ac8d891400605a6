//! Error types for the ean-search client.

use thiserror::Error;

/// Errors returned by the API client and its transport.
#[derive(Debug, Error)]
pub enum EanSearchError {
    /// HTTP request failed (DNS, connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] wreq::Error),

    /// Transport failure not originating from the HTTP stack
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Response body is not well-formed XML
    #[error("Failed to parse XML response: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Barcode image payload is not valid base64
    #[error("Failed to decode barcode image: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The API answered with an `<error>` element
    #[error("API error: {0}")]
    Api(String),

    /// The response did not contain the expected field
    #[error("Response is missing the <{0}> field")]
    MissingField(&'static str),

    /// No access token was configured
    #[error("No access token configured. Set EAN_SEARCH_TOKEN or pass --token")]
    MissingToken,
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, EanSearchError>;

//! ean-search.org API: HTTP transport, XML parsing, data models and client.

pub mod client;
pub mod languages;
pub mod models;
pub mod parser;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::EanSearch;
pub use languages::Language;
pub use models::{ApiResponse, Operation, Product};
pub use transport::{HttpTransport, RawResponse, Transport};

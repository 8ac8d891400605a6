//! ean-search - client for the ean-search.org barcode database API
//!
//! Looks up products by EAN/GTIN/UPC or ISBN, searches by name, prefix or
//! category, verifies checksums and fetches barcode images. Rate-limited
//! requests are retried and the remaining API credits are tracked per client.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;

pub use api::{EanSearch, Language, Product};
pub use config::Config;
pub use error::{EanSearchError, Result};

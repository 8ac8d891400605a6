//! Single-barcode lookup commands.

use crate::api::{EanSearch, Transport};
use crate::commands::{normalize_barcode, normalize_isbn};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{Context, Result};

/// Executes lookups that resolve one code to one answer.
pub struct LookupCommand {
    config: Config,
}

impl LookupCommand {
    /// Creates a new lookup command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Looks up a barcode and returns the product name.
    pub async fn name<T: Transport>(&self, client: &EanSearch<T>, ean: &str) -> Result<String> {
        let ean = normalize_barcode(ean)?;

        let name = client.barcode_lookup(&ean, self.config.language).await;
        if name.is_empty() {
            anyhow::bail!("No product found for barcode {}", ean);
        }
        Ok(name)
    }

    /// Looks up a barcode and returns the formatted product record.
    pub async fn record<T: Transport>(&self, client: &EanSearch<T>, ean: &str) -> Result<String> {
        let ean = normalize_barcode(ean)?;

        let product = client
            .barcode_search(&ean, self.config.language)
            .await
            .with_context(|| format!("No product found for barcode {}", ean))?;

        Ok(Formatter::new(self.config.format).format_product(&product))
    }

    /// Looks up an ISBN-10 and returns the book title.
    pub async fn isbn<T: Transport>(&self, client: &EanSearch<T>, isbn: &str) -> Result<String> {
        let isbn = normalize_isbn(isbn)?;

        let title = client.isbn_lookup(&isbn).await;
        if title.is_empty() {
            anyhow::bail!("No book found for ISBN {}", isbn);
        }
        Ok(title)
    }

    /// Verifies the checksum digit of a barcode.
    pub async fn verify<T: Transport>(&self, client: &EanSearch<T>, ean: &str) -> Result<String> {
        let ean = normalize_barcode(ean)?;

        let valid = client
            .verify_checksum(&ean)
            .await
            .with_context(|| format!("Failed to verify checksum of {}", ean))?;

        Ok(format!("{}: checksum {}", ean, if valid { "valid" } else { "invalid" }))
    }

    /// Returns the issuing country of a barcode.
    pub async fn country<T: Transport>(&self, client: &EanSearch<T>, ean: &str) -> Result<String> {
        let ean = normalize_barcode(ean)?;

        client
            .issuing_country_lookup(&ean)
            .await
            .with_context(|| format!("Failed to look up issuing country of {}", ean))
    }
}

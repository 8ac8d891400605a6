//! Barcode image download command.

use crate::api::{EanSearch, Transport};
use crate::commands::normalize_barcode;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Fetches a rendered barcode and writes it to disk.
pub struct ImageCommand {
    width: u32,
    height: u32,
}

impl ImageCommand {
    /// Creates a new image command for the given pixel size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Downloads the image for `ean` into `output`.
    pub async fn execute<T: Transport>(
        &self,
        client: &EanSearch<T>,
        ean: &str,
        output: &Path,
    ) -> Result<String> {
        if self.width == 0 || self.height == 0 {
            anyhow::bail!("Image size must be positive, got {}x{}", self.width, self.height);
        }
        let ean = normalize_barcode(ean)?;

        let bytes = client
            .barcode_image(&ean, self.width, self.height)
            .await
            .with_context(|| format!("Failed to fetch barcode image for {}", ean))?;

        std::fs::write(output, &bytes)
            .with_context(|| format!("Failed to write image: {}", output.display()))?;

        info!("Saved barcode image for {} to {}", ean, output.display());
        Ok(format!("Wrote {} bytes to {}", bytes.len(), output.display()))
    }
}

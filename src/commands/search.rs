//! Search command implementation.

use crate::api::{EanSearch, Product, Transport};
use crate::commands::normalize_prefix;
use crate::config::Config;
use crate::format::Formatter;
use anyhow::Result;
use tracing::info;

/// The kinds of multi-result searches the API offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Products whose name matches
    Name { name: String, page: u32 },
    /// Products with similar names
    Similar { name: String, page: u32 },
    /// Products whose barcode starts with a prefix
    Prefix { prefix: String, page: u32 },
    /// Products in a category, optionally filtered by name
    Category { category: u32, name: String, page: u32 },
}

/// Executes a product search.
pub struct SearchCommand {
    config: Config,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the search and returns formatted output.
    pub async fn execute<T: Transport>(
        &self,
        client: &EanSearch<T>,
        query: &SearchQuery,
    ) -> Result<String> {
        let products: Vec<Product> = match query {
            SearchQuery::Name { name, page } => {
                ensure_not_blank(name)?;
                client.product_search(name.trim(), *page).await
            }
            SearchQuery::Similar { name, page } => {
                ensure_not_blank(name)?;
                client.similar_product_search(name.trim(), *page).await
            }
            SearchQuery::Prefix { prefix, page } => {
                let prefix = normalize_prefix(prefix)?;
                client.barcode_prefix_search(&prefix, *page).await
            }
            SearchQuery::Category { category, name, page } => {
                client.category_search(*category, name.trim(), *page).await
            }
        };

        info!("Found {} products", products.len());

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_products(&products))
    }
}

fn ensure_not_blank(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Search text must not be empty");
    }
    Ok(())
}

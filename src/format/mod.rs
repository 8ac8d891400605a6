//! Output formatting for products (table, JSON, markdown, CSV).

use crate::api::Product;
use crate::config::OutputFormat;

const NAME_WIDTH: usize = 60;

/// Formats products for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single product.
    pub fn format_product(&self, product: &Product) -> String {
        match self.format {
            OutputFormat::Json => self.json_single(product),
            OutputFormat::Table => self.table_single(product),
            OutputFormat::Markdown => self.markdown_single(product),
            OutputFormat::Csv => self.csv_products(std::slice::from_ref(product)),
        }
    }

    /// Formats multiple products.
    pub fn format_products(&self, products: &[Product]) -> String {
        if products.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No products found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_products(products),
            OutputFormat::Table => self.table_products(products),
            OutputFormat::Markdown => self.markdown_products(products),
            OutputFormat::Csv => self.csv_products(products),
        }
    }

    // JSON formatting

    fn json_single(&self, product: &Product) -> String {
        serde_json::to_string_pretty(product).unwrap_or_else(|_| "{}".to_string())
    }

    fn json_products(&self, products: &[Product]) -> String {
        serde_json::to_string_pretty(products).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_single(&self, product: &Product) -> String {
        let mut lines = Vec::new();

        lines.push(format!("EAN:      {}", or_na(product.ean.as_deref())));
        lines.push(format!("Name:     {}", or_na(product.name.as_deref())));
        lines.push(format!("Category: {}", category(product)));
        lines.push(format!("Country:  {}", or_na(product.issuing_country.as_deref())));

        if let Some(valid) = product.valid {
            lines.push(format!("Checksum: {}", if valid { "valid" } else { "invalid" }));
        }

        lines.join("\n")
    }

    fn table_products(&self, products: &[Product]) -> String {
        let ean_width = 14;
        let country_width = 7;
        let category_width = 20;
        let name_width = NAME_WIDTH;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<ean_width$}  {:<country_width$}  {:<category_width$}  {}",
            "EAN", "Country", "Category", "Name"
        ));
        lines.push(format!(
            "{:-<ean_width$}  {:-<country_width$}  {:-<category_width$}  {:-<name_width$}",
            "", "", "", ""
        ));

        for product in products {
            lines.push(format!(
                "{:<ean_width$}  {:<country_width$}  {:<category_width$}  {}",
                or_na(product.ean.as_deref()),
                or_na(product.issuing_country.as_deref()),
                truncate(&category(product), category_width),
                truncate(product.name_or_empty(), name_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", products.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_single(&self, product: &Product) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", or_na(product.name.as_deref())));
        lines.push(String::new());
        lines.push(format!("- **EAN:** {}", or_na(product.ean.as_deref())));
        lines.push(format!("- **Category:** {}", category(product)));
        lines.push(format!("- **Issuing country:** {}", or_na(product.issuing_country.as_deref())));

        if let Some(valid) = product.valid {
            lines.push(format!("- **Checksum:** {}", if valid { "✓ valid" } else { "✗ invalid" }));
        }

        lines.join("\n")
    }

    fn markdown_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();

        lines.push("| EAN | Country | Category | Name |".to_string());
        lines.push("|-----|---------|----------|------|".to_string());

        for product in products {
            lines.push(format!(
                "| {} | {} | {} | {} |",
                or_na(product.ean.as_deref()),
                or_na(product.issuing_country.as_deref()),
                category(product).replace('|', "\\|"),
                truncate(product.name_or_empty(), NAME_WIDTH).replace('|', "\\|")
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} products found*", products.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "ean,name,category_id,category_name,issuing_country,valid".to_string()
    }

    fn csv_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for product in products {
            lines.push(format!(
                "{},{},{},{},{},{}",
                product.ean.as_deref().unwrap_or_default(),
                Self::csv_escape(product.name_or_empty()),
                product.category_id.map(|c| c.to_string()).unwrap_or_default(),
                Self::csv_escape(product.category_name.as_deref().unwrap_or_default()),
                product.issuing_country.as_deref().unwrap_or_default(),
                product.valid.map(|v| v.to_string()).unwrap_or_default()
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

fn category(product: &Product) -> String {
    match (&product.category_name, product.category_id) {
        (Some(name), _) => name.clone(),
        (None, Some(id)) => id.to_string(),
        (None, None) => "N/A".to_string(),
    }
}

/// Truncates to `width` characters, marking the cut with "...".
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let head: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

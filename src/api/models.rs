//! Data models for API operations, products and response envelopes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote operations understood by the API (`op` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    BarcodeLookup,
    BarcodePrefixSearch,
    ProductSearch,
    SimilarProductSearch,
    CategorySearch,
    BarcodeImage,
    VerifyChecksum,
    IssuingCountry,
}

impl Operation {
    /// Returns the wire value sent as `op=`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::BarcodeLookup => "barcode-lookup",
            Operation::BarcodePrefixSearch => "barcode-prefix-search",
            Operation::ProductSearch => "product-search",
            Operation::SimilarProductSearch => "similar-product-search",
            Operation::CategorySearch => "category-search",
            Operation::BarcodeImage => "barcode-image",
            Operation::VerifyChecksum => "verify-checksum",
            Operation::IssuingCountry => "issuing-country",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product record as returned by the API.
///
/// Every field is optional: the API only includes what the operation
/// produces, and an empty element is treated the same as an absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// EAN/GTIN/UPC code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ean: Option<String>,
    /// Product name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Numeric category id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u32>,
    /// Human-readable category name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// Two-letter code of the country that issued the barcode prefix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_country: Option<String>,
    /// Checksum validity (verify-checksum only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    /// Base64 encoded PNG (barcode-image only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
}

impl Product {
    /// Returns the name, or an empty string when absent.
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Stores the text of an XML leaf element. Returns false for unknown elements.
    pub(crate) fn set_field(&mut self, element: &str, value: &str) -> bool {
        let value = value.trim();
        let text = if value.is_empty() { None } else { Some(value.to_string()) };

        match element {
            "ean" => self.ean = text,
            "name" => self.name = text,
            "categoryId" => self.category_id = text.and_then(|t| t.parse().ok()),
            "categoryName" => self.category_name = text,
            "issuingCountry" => self.issuing_country = text,
            "valid" => self.valid = text.and_then(|t| parse_flag(&t)),
            "barcode" => self.barcode = text,
            _ => return false,
        }
        true
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Parsed response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiResponse {
    /// Every `<product>` element in document order
    pub products: Vec<Product>,
    /// Text of an `<error>` element outside any product
    pub error: Option<String>,
}

impl ApiResponse {
    #[cfg(test)]
    pub(crate) fn first(&self) -> Option<&Product> {
        self.products.first()
    }

    /// Consumes the response and returns the first product, if any.
    pub fn into_first(self) -> Option<Product> {
        self.products.into_iter().next()
    }

    /// Returns true if the response carried no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

//! CLI command implementations.

pub mod image;
pub mod lookup;
pub mod search;

pub use image::ImageCommand;
pub use lookup::LookupCommand;
pub use search::{SearchCommand, SearchQuery};

use anyhow::Result;

/// Longest numeric code the API accepts (GTIN-14).
const MAX_BARCODE_LEN: usize = 14;

/// Trims a barcode and checks it is 1-14 ASCII digits.
pub fn normalize_barcode(input: &str) -> Result<String> {
    let code = input.trim();
    if code.is_empty() || code.len() > MAX_BARCODE_LEN || !code.chars().all(|c| c.is_ascii_digit())
    {
        anyhow::bail!("Invalid barcode: '{}'. Expected up to 14 digits.", code);
    }
    Ok(code.to_string())
}

/// Strips hyphens and spaces from an ISBN-10 and validates its shape.
pub fn normalize_isbn(input: &str) -> Result<String> {
    let isbn: String = input
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    let chars: Vec<char> = isbn.chars().collect();
    let valid = chars.len() == 10
        && chars[..9].iter().all(|c| c.is_ascii_digit())
        && (chars[9].is_ascii_digit() || chars[9] == 'X');

    if !valid {
        anyhow::bail!("Invalid ISBN-10: '{}'. Expected 9 digits followed by a digit or X.", input);
    }
    Ok(isbn)
}

/// Trims a barcode prefix and checks it is all digits.
pub fn normalize_prefix(input: &str) -> Result<String> {
    let prefix = input.trim();
    if prefix.is_empty()
        || prefix.len() >= MAX_BARCODE_LEN
        || !prefix.chars().all(|c| c.is_ascii_digit())
    {
        anyhow::bail!("Invalid barcode prefix: '{}'. Expected 1-13 digits.", prefix);
    }
    Ok(prefix.to_string())
}

//! XML parser for API responses.

use crate::api::models::{ApiResponse, Product};
use crate::error::Result;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, trace};

const PRODUCT: &str = "product";
const ERROR: &str = "error";

/// Parses an XML response body.
///
/// Collects every `<product>` element wherever it appears in the document,
/// reading its direct children into [`Product`] fields. Elements nested
/// deeper inside a product are skipped. An `<error>` element
/// outside a product is captured as [`ApiResponse::error`]. Bodies without
/// any markup (e.g. an empty body) yield an empty response.
pub fn parse_response(xml: &str) -> Result<ApiResponse> {
    // Text is kept untrimmed so whitespace around CDATA sections survives;
    // field values are trimmed once joined.
    let mut reader = Reader::from_str(xml);

    let mut response = ApiResponse::default();
    let mut current: Option<Product> = None;
    let mut field: Option<String> = None;
    // Element depth below the open <product>
    let mut depth = 0usize;
    let mut in_error = false;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();

                if current.is_some() {
                    depth += 1;
                    if depth == 1 {
                        field = Some(name);
                        text.clear();
                    }
                } else if name == PRODUCT {
                    current = Some(Product::default());
                    field = None;
                    depth = 0;
                } else if name == ERROR {
                    in_error = true;
                    text.clear();
                }
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() == PRODUCT.as_bytes() && current.is_none() {
                    response.products.push(Product::default());
                }
            }
            Event::Text(e) => {
                if (field.is_some() && depth == 1) || in_error {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if (field.is_some() && depth == 1) || in_error {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();

                if current.is_some() && depth == 0 {
                    if let Some(product) = current.take() {
                        trace!("Parsed product: {:?}", product.ean);
                        response.products.push(product);
                    }
                    field = None;
                } else if let Some(product) = current.as_mut() {
                    if depth == 1 {
                        if let Some(field) = field.take() {
                            if !product.set_field(&field, &text) {
                                trace!("Ignoring unknown product field <{}>", field);
                            }
                        }
                    }
                    depth -= 1;
                } else if in_error && name == ERROR {
                    let message = text.trim();
                    if !message.is_empty() {
                        response.error = Some(message.to_string());
                    }
                    in_error = false;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    debug!(
        "Parsed {} products (error: {})",
        response.products.len(),
        response.error.as_deref().unwrap_or("none")
    );

    Ok(response)
}

//! API client for ean-search.org with rate-limit retry and credit tracking.

use crate::api::languages::Language;
use crate::api::models::{ApiResponse, Operation, Product};
use crate::api::parser;
use crate::api::transport::{HttpTransport, Transport};
use crate::config::Config;
use crate::error::{EanSearchError, Result};
use base64::Engine;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Production API endpoint.
pub const API_URL: &str = "https://api.ean-search.org/api";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Default barcode image size in pixels.
pub const DEFAULT_IMAGE_WIDTH: u32 = 102;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 50;

/// Total attempts for a rate-limited (HTTP 429) request.
pub const MAX_ATTEMPTS: u32 = 3;

const RATE_LIMIT_DELAY: Duration = Duration::from_secs(1);
const RATE_LIMITED: u16 = 429;
const UNKNOWN_CREDITS: i64 = -1;

/// Client for the ean-search.org API.
///
/// Methods returning plain values (`String`, `Vec`, `Option`) degrade to an
/// empty value when the request or the XML parse fails; the failure is
/// logged at WARN. [`barcode_image`](Self::barcode_image),
/// [`verify_checksum`](Self::verify_checksum) and
/// [`issuing_country_lookup`](Self::issuing_country_lookup) return the error
/// instead.
pub struct EanSearch<T: Transport = HttpTransport> {
    transport: T,
    access_token: String,
    base_url: String,
    timeout: Duration,
    retry_delay: Duration,
    remaining_credits: AtomicI64,
}

impl EanSearch<HttpTransport> {
    /// Creates a client with the default timeout.
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(access_token, DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a client with a custom timeout in seconds.
    pub fn with_timeout(access_token: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let mut client = Self::with_transport(HttpTransport::new(None)?, access_token);
        client.set_timeout(timeout_secs);
        Ok(client)
    }

    /// Creates a client from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = config.token.as_deref().filter(|t| !t.is_empty());
        let token = token.ok_or(EanSearchError::MissingToken)?;

        let transport = HttpTransport::new(config.proxy.as_deref())?;
        let mut client = Self::with_transport(transport, token);
        client.set_timeout(config.timeout_secs);

        if let Some(api_url) = &config.api_url {
            client = client.with_base_url(api_url.clone());
        }

        Ok(client)
    }
}

impl<T: Transport> EanSearch<T> {
    /// Creates a client over an arbitrary transport.
    pub fn with_transport(transport: T, access_token: impl Into<String>) -> Self {
        Self {
            transport,
            access_token: access_token.into(),
            base_url: API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry_delay: RATE_LIMIT_DELAY,
            remaining_credits: AtomicI64::new(UNKNOWN_CREDITS),
        }
    }

    /// Overrides the API endpoint (for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the pause between rate-limited attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Sets the timeout applied to every subsequent request.
    ///
    /// A zero timeout would fail every request, so it is ignored.
    pub fn set_timeout(&mut self, seconds: u64) {
        if seconds == 0 {
            warn!("Ignoring zero timeout, keeping {:?}", self.timeout);
            return;
        }
        self.timeout = Duration::from_secs(seconds);
    }

    /// Returns the current request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the last credit balance reported by the API, or -1 before
    /// any response carried one.
    pub fn credits_remaining(&self) -> i64 {
        self.remaining_credits.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// Looks up a barcode and returns the product name.
    pub async fn barcode_lookup(&self, ean: &str, language: Language) -> String {
        self.barcode_search(ean, language).await.and_then(|p| p.name).unwrap_or_default()
    }

    /// Looks up a barcode and returns the full product record.
    pub async fn barcode_search(&self, ean: &str, language: Language) -> Option<Product> {
        info!("Looking up barcode: {}", ean);
        let params = [("ean", ean.to_string()), ("language", language.code().to_string())];

        self.guarded(Operation::BarcodeLookup, &params).await?.into_first()
    }

    /// Looks up an ISBN-10 and returns the book title.
    pub async fn isbn_lookup(&self, isbn: &str) -> String {
        info!("Looking up ISBN: {}", isbn);
        let params = [("isbn", isbn.to_string())];

        self.guarded(Operation::BarcodeLookup, &params)
            .await
            .and_then(ApiResponse::into_first)
            .and_then(|p| p.name)
            .unwrap_or_default()
    }

    /// Lists products whose barcode starts with `prefix`.
    pub async fn barcode_prefix_search(&self, prefix: &str, page: u32) -> Vec<Product> {
        info!("Searching barcode prefix: {} (page {})", prefix, page);
        let params = [("prefix", prefix.to_string()), ("page", page.to_string())];

        self.guarded_products(Operation::BarcodePrefixSearch, &params).await
    }

    /// Searches products by name.
    pub async fn product_search(&self, name: &str, page: u32) -> Vec<Product> {
        info!("Searching products: {} (page {})", name, page);
        let params = [("name", name.to_string()), ("page", page.to_string())];

        self.guarded_products(Operation::ProductSearch, &params).await
    }

    /// Searches products with names similar to `name`.
    pub async fn similar_product_search(&self, name: &str, page: u32) -> Vec<Product> {
        info!("Searching similar products: {} (page {})", name, page);
        let params = [("name", name.to_string()), ("page", page.to_string())];

        self.guarded_products(Operation::SimilarProductSearch, &params).await
    }

    /// Searches a category, optionally narrowed by name.
    pub async fn category_search(&self, category: u32, name: &str, page: u32) -> Vec<Product> {
        info!("Searching category {}: '{}' (page {})", category, name, page);
        let params = [
            ("category", category.to_string()),
            ("name", name.to_string()),
            ("page", page.to_string()),
        ];

        self.guarded_products(Operation::CategorySearch, &params).await
    }

    /// Fetches a rendered barcode and returns the decoded PNG bytes.
    pub async fn barcode_image(&self, ean: &str, width: u32, height: u32) -> Result<Vec<u8>> {
        info!("Fetching barcode image: {} ({}x{})", ean, width, height);
        let params = [
            ("ean", ean.to_string()),
            ("width", width.to_string()),
            ("height", height.to_string()),
        ];

        let product = self.first_product(Operation::BarcodeImage, &params).await?;
        let encoded = product.barcode.ok_or(EanSearchError::MissingField("barcode"))?;

        // Long payloads may arrive line-wrapped
        let encoded: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();

        Ok(base64::engine::general_purpose::STANDARD.decode(encoded)?)
    }

    /// Checks the barcode checksum.
    pub async fn verify_checksum(&self, ean: &str) -> Result<bool> {
        info!("Verifying checksum: {}", ean);
        let params = [("ean", ean.to_string())];

        let product = self.first_product(Operation::VerifyChecksum, &params).await?;
        product.valid.ok_or(EanSearchError::MissingField("valid"))
    }

    /// Returns the code of the country that issued the barcode.
    pub async fn issuing_country_lookup(&self, ean: &str) -> Result<String> {
        info!("Looking up issuing country: {}", ean);
        let params = [("ean", ean.to_string())];

        let product = self.first_product(Operation::IssuingCountry, &params).await?;
        product.issuing_country.ok_or(EanSearchError::MissingField("issuingCountry"))
    }

    /// Runs a request and parses the body, mapping any failure to `None`.
    async fn guarded(&self, op: Operation, params: &[(&str, String)]) -> Option<ApiResponse> {
        match self.query(op, params).await {
            Ok(response) => Some(response),
            Err(e) => {
                warn!("{} failed, returning empty result: {}", op, e);
                None
            }
        }
    }

    async fn guarded_products(&self, op: Operation, params: &[(&str, String)]) -> Vec<Product> {
        self.guarded(op, params).await.map(|r| r.products).unwrap_or_default()
    }

    /// Runs a request and returns the first product, treating an API error
    /// or an empty response as a failure.
    async fn first_product(&self, op: Operation, params: &[(&str, String)]) -> Result<Product> {
        let response = self.query(op, params).await?;

        match response.error {
            Some(message) if response.products.is_empty() => Err(EanSearchError::Api(message)),
            _ => response.products.into_iter().next().ok_or(EanSearchError::MissingField("product")),
        }
    }

    async fn query(&self, op: Operation, params: &[(&str, String)]) -> Result<ApiResponse> {
        let body = self.request(op, params).await?;
        let response = parser::parse_response(&body)?;

        if let Some(message) = &response.error {
            warn!("API returned an error for {}: {}", op, message);
        }

        Ok(response)
    }

    /// Performs the GET, retrying on HTTP 429 up to [`MAX_ATTEMPTS`] times.
    ///
    /// Returns the body of the last response, whatever its status.
    async fn request(&self, op: Operation, params: &[(&str, String)]) -> Result<String> {
        let url = self.build_url(op, params);
        let mut attempt = 1;

        loop {
            debug!("GET {} (attempt {}/{})", self.redact(&url), attempt, MAX_ATTEMPTS);

            let response = self.transport.get(&url, self.timeout).await?;

            if let Some(credits) = response.credits_remaining {
                self.remaining_credits.store(credits, Ordering::Relaxed);
            }

            if response.status != RATE_LIMITED {
                return Ok(response.body);
            }

            if attempt >= MAX_ATTEMPTS {
                warn!("Still rate limited after {} attempts, giving up", MAX_ATTEMPTS);
                return Ok(response.body);
            }

            warn!("Rate limited (429). Retrying in {:?}", self.retry_delay);
            tokio::time::sleep(self.retry_delay).await;
            attempt += 1;
        }
    }

    fn build_url(&self, op: Operation, params: &[(&str, String)]) -> String {
        let mut url = format!("{}?format=xml&op={}", self.base_url, op);

        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        url.push_str("&token=");
        url.push_str(&urlencoding::encode(&self.access_token));
        url
    }

    /// Masks the token, which is always the last query parameter.
    fn redact(&self, url: &str) -> String {
        match url.rfind("&token=") {
            Some(pos) => format!("{}&token=***", &url[..pos]),
            None => url.to_string(),
        }
    }
}

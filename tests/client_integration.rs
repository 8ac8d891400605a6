//! End-to-end tests of the API client over HTTP against a mock server.

use base64::Engine;
use ean_search::api::client::MAX_ATTEMPTS;
use ean_search::{EanSearch, EanSearchError, Language};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BARCODE_FIXTURE: &str = include_str!("fixtures/barcode_lookup.xml");
const SEARCH_FIXTURE: &str = include_str!("fixtures/product_search.xml");
const TOKEN: &str = "test-token";

fn client(server: &MockServer) -> EanSearch {
    EanSearch::new(TOKEN)
        .unwrap()
        .with_base_url(format!("{}/api", server.uri()))
        .with_retry_delay(Duration::from_millis(10))
}

fn xml(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.to_string(), "application/xml")
}

#[tokio::test]
async fn test_barcode_lookup_sends_expected_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("format", "xml"))
        .and(query_param("op", "barcode-lookup"))
        .and(query_param("ean", "5099750442227"))
        .and(query_param("language", "1"))
        .and(query_param("token", TOKEN))
        .respond_with(xml(200, BARCODE_FIXTURE).insert_header("X-Credits-Remaining", "9876"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(client.credits_remaining(), -1);

    let name = client.barcode_lookup("5099750442227", Language::English).await;
    assert_eq!(name, "Michael Jackson, Thriller");
    assert_eq!(client.credits_remaining(), 9876);
}

#[tokio::test]
async fn test_barcode_search_full_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("op", "barcode-lookup"))
        .respond_with(xml(200, BARCODE_FIXTURE))
        .mount(&server)
        .await;

    let product = client(&server).barcode_search("5099750442227", Language::English).await.unwrap();

    assert_eq!(product.ean.as_deref(), Some("5099750442227"));
    assert_eq!(product.category_id, Some(45));
    assert_eq!(product.category_name.as_deref(), Some("Music & Movies"));
    assert_eq!(product.issuing_country.as_deref(), Some("UK"));
}

#[tokio::test]
async fn test_product_search_parses_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("op", "product-search"))
        .and(query_param("name", "coca cola"))
        .and(query_param("page", "0"))
        .respond_with(xml(200, SEARCH_FIXTURE))
        .mount(&server)
        .await;

    let products = client(&server).product_search("coca cola", 0).await;

    assert_eq!(products.len(), 3);
    assert_eq!(products[0].ean.as_deref(), Some("5449000000996"));
    assert_eq!(products[2].name.as_deref(), Some("Coca-Cola \"Cherry\" 12oz"));
    assert_eq!(products[2].category_id, None);
}

#[tokio::test]
async fn test_rate_limit_retries_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(xml(429, "Too many requests"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .respond_with(xml(200, SEARCH_FIXTURE))
        .expect(1)
        .mount(&server)
        .await;

    let products = client(&server).similar_product_search("cola", 0).await;
    assert_eq!(products.len(), 3);
}

#[tokio::test]
async fn test_rate_limit_gives_up_after_max_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(xml(429, "Too many requests").insert_header("X-Credits-Remaining", "0"))
        .expect(u64::from(MAX_ATTEMPTS))
        .mount(&server)
        .await;

    let client = client(&server);
    let products = client.barcode_prefix_search("4006381", 0).await;

    assert!(products.is_empty());
    assert_eq!(client.credits_remaining(), 0);
}

#[tokio::test]
async fn test_transport_failure_degrades_to_empty() {
    let client = EanSearch::new(TOKEN).unwrap().with_base_url("http://127.0.0.1:1/api");

    assert!(client.product_search("anything", 0).await.is_empty());
    assert_eq!(client.barcode_lookup("1", Language::English).await, "");
    assert_eq!(client.isbn_lookup("0441172717").await, "");
    assert!(client.barcode_search("1", Language::English).await.is_none());
    assert!(client.category_search(1, "", 0).await.is_empty());
    assert_eq!(client.credits_remaining(), -1);
}

#[tokio::test]
async fn test_transport_failure_surfaces_for_strict_operations() {
    let client = EanSearch::new(TOKEN).unwrap().with_base_url("http://127.0.0.1:1/api");

    assert!(matches!(client.barcode_image("1", 102, 50).await, Err(EanSearchError::Http(_))));
    assert!(matches!(client.verify_checksum("1").await, Err(EanSearchError::Http(_))));
    assert!(matches!(client.issuing_country_lookup("1").await, Err(EanSearchError::Http(_))));
}

#[tokio::test]
async fn test_timeout_applies_to_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(xml(200, BARCODE_FIXTURE).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let mut client = client(&server);
    client.set_timeout(1);

    let started = std::time::Instant::now();
    let name = client.barcode_lookup("5099750442227", Language::English).await;

    assert_eq!(name, "");
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_barcode_image_roundtrip() {
    let server = MockServer::start().await;
    let png: Vec<u8> = (0u8..=255).collect();
    let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
    let body = format!("<xmlresult><product><ean>1</ean><barcode>{}</barcode></product></xmlresult>", encoded);

    Mock::given(method("GET"))
        .and(query_param("op", "barcode-image"))
        .and(query_param("width", "102"))
        .and(query_param("height", "50"))
        .respond_with(xml(200, &body))
        .mount(&server)
        .await;

    let bytes = client(&server).barcode_image("1", 102, 50).await.unwrap();
    assert_eq!(base64::engine::general_purpose::STANDARD.encode(&bytes), encoded);
}

#[tokio::test]
async fn test_verify_checksum_and_country() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("op", "verify-checksum"))
        .respond_with(xml(200, "<xmlresult><product><ean>4006381333932</ean><valid>0</valid></product></xmlresult>"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("op", "issuing-country"))
        .respond_with(xml(200, "<xmlresult><product><issuingCountry>DE</issuingCountry></product></xmlresult>"))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(!client.verify_checksum("4006381333932").await.unwrap());
    assert_eq!(client.issuing_country_lookup("4006381333932").await.unwrap(), "DE");
}

#[tokio::test]
async fn test_api_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(xml(200, "<xmlresult><error>Invalid token</error></xmlresult>"))
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(client.barcode_lookup("1", Language::English).await, "");

    match client.verify_checksum("1").await {
        Err(EanSearchError::Api(message)) => assert_eq!(message, "Invalid token"),
        other => panic!("expected API error, got {:?}", other),
    }
}

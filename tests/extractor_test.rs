//! Integration tests for the web extractor
//!
//! Serves fixed HTML pages from wiremock in place of KEGG and WikiPathways.

use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use pathway_explorer::config::{RequestConfig, SourceConfig};
use pathway_explorer::error::ScrapeError;
use pathway_explorer::extractor::{PathwayExtractor, ScrapeQuery, WebScraper};
use pathway_explorer::models::Pathway;
use pathway_explorer::validation::PathwayValidator;

fn create_scraper(base_url: &str) -> WebScraper {
    let sources = SourceConfig {
        kegg_base_url: base_url.to_string(),
        wikipathways_base_url: base_url.to_string(),
    };
    let request = RequestConfig {
        timeout_ms: 5000,
        max_retries: 0,
        retry_delay_ms: 10,
    };
    WebScraper::new(&sources, &request).expect("Failed to create scraper")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("Content-Type", "text/html")
        .set_body_string(format!("<html><body>{}</body></html>", body))
}

#[tokio::test]
async fn test_kegg_page_to_validated_pathway() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/entry/map00010"))
        .respond_with(html(
            r#"<h1>Glycolysis / Gluconeogenesis</h1>
               <div class="compound" id="C00031">D-Glucose</div>
               <div class="compound" id="C00022">Pyruvate</div>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scraper = create_scraper(&mock_server.uri());
    let draft = scraper
        .extract(&ScrapeQuery::parse("KEGG:map00010").unwrap())
        .await
        .unwrap();

    let validated = PathwayValidator::new().validate(draft).unwrap();
    let pathway = Pathway::try_from(validated).unwrap();

    assert_eq!(pathway.id, "map00010");
    assert_eq!(pathway.name, "Glycolysis / Gluconeogenesis");
    assert_eq!(pathway.compounds.len(), 2);
    assert_eq!(pathway.metadata.source, "KEGG");
    assert_eq!(pathway.metadata.verification_status.as_str(), "validated");
}

#[tokio::test]
async fn test_wikipathways_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pathways/WP534"))
        .respond_with(html(
            r#"<h2 class="pathway-title">Glycolysis and gluconeogenesis</h2>
               <span class="metabolite" id="a1">Glucose</span>"#,
        ))
        .mount(&mock_server)
        .await;

    let scraper = create_scraper(&mock_server.uri());
    let draft = scraper
        .extract(&ScrapeQuery::parse("WP:WP534").unwrap())
        .await
        .unwrap();

    assert_eq!(draft.name.as_deref(), Some("Glycolysis and gluconeogenesis"));
    assert_eq!(draft.metadata.unwrap().source.as_deref(), Some("WikiPathways"));
}

#[tokio::test]
async fn test_not_found_is_unreachable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/entry/map99999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let scraper = create_scraper(&mock_server.uri());
    let result = scraper
        .extract(&ScrapeQuery::parse("KEGG:map99999").unwrap())
        .await;

    assert!(matches!(result, Err(ScrapeError::Unreachable { .. })));
}

#[tokio::test]
async fn test_missing_title_is_content_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pathways/WP1"))
        .respond_with(html("<p>Loading...</p>"))
        .mount(&mock_server)
        .await;

    let scraper = create_scraper(&mock_server.uri());
    let result = scraper.extract(&ScrapeQuery::parse("WP:WP1").unwrap()).await;

    assert!(matches!(result, Err(ScrapeError::ContentNotFound { .. })));
}

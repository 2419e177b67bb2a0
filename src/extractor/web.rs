use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{PathwayExtractor, PathwaySource, ScrapeQuery};
use crate::config::{RequestConfig, SourceConfig};
use crate::error::{ScrapeError, ScrapeResult};
use crate::models::{CompoundDraft, MetadataDraft, PathwayDraft, VerificationStatus};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP scraper for KEGG and WikiPathways entry pages
#[derive(Clone)]
pub struct WebScraper {
    client: reqwest::Client,
    sources: SourceConfig,
}

impl WebScraper {
    /// Create a scraper for the configured source URLs
    pub fn new(sources: &SourceConfig, request_config: &RequestConfig) -> ScrapeResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| ScrapeError::Unreachable {
                url: sources.kegg_base_url.clone(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            sources: sources.clone(),
        })
    }

    /// Entry page URL for a query
    pub fn entry_url(&self, query: &ScrapeQuery) -> String {
        match query.source {
            PathwaySource::Kegg => format!(
                "{}/entry/{}",
                self.sources.kegg_base_url.trim_end_matches('/'),
                query.pathway_id
            ),
            PathwaySource::WikiPathways => format!(
                "{}/pathways/{}",
                self.sources.wikipathways_base_url.trim_end_matches('/'),
                query.pathway_id
            ),
        }
    }

    /// Fetch raw HTML from a URL
    async fn fetch_html(&self, url: &str) -> ScrapeResult<String> {
        let unreachable = |message: String| ScrapeError::Unreachable {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| unreachable(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unreachable(format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| unreachable(format!("Failed to read response body: {}", e)))
    }
}

#[async_trait]
impl PathwayExtractor for WebScraper {
    async fn extract(&self, query: &ScrapeQuery) -> ScrapeResult<PathwayDraft> {
        let url = self.entry_url(query);
        debug!(%query, %url, "Scraping pathway");

        let html = match self.fetch_html(&url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(%query, error = %e, "Error scraping pathway");
                return Err(e);
            }
        };

        let draft = match query.source {
            PathwaySource::Kegg => extract_kegg(&html, &query.pathway_id),
            PathwaySource::WikiPathways => extract_wikipathways(&html, &query.pathway_id, &url)?,
        };

        info!(
            %query,
            name = draft.name.as_deref().unwrap_or_default(),
            compounds = draft.compounds.as_ref().map_or(0, Vec::len),
            "Scraped pathway"
        );
        Ok(draft)
    }
}

/// Extract a KEGG entry page. The name is the first `h1` (empty if the page
/// has none); compounds are the `div.compound` elements.
pub fn extract_kegg(html: &str, pathway_id: &str) -> PathwayDraft {
    let document = Html::parse_document(html);

    let name = select_all(&document, "h1")
        .first()
        .map(element_text)
        .unwrap_or_default();

    let compounds = select_all(&document, "div.compound")
        .iter()
        .map(|el| CompoundDraft {
            id: Some(el.value().attr("id").unwrap_or_default().to_string()),
            name: Some(element_text(el)),
            formula: Some(String::new()),
        })
        .collect();

    PathwayDraft {
        id: Some(pathway_id.to_string()),
        name: Some(name),
        description: Some(String::new()),
        compounds: Some(compounds),
        reactions: Some(Vec::new()),
        metadata: Some(source_metadata(PathwaySource::Kegg)),
        related_pathways: None,
    }
}

/// Extract a WikiPathways page. The `.pathway-title` element is required;
/// compounds are the `.metabolite` elements.
pub fn extract_wikipathways(html: &str, pathway_id: &str, url: &str) -> ScrapeResult<PathwayDraft> {
    let document = Html::parse_document(html);

    let name = select_all(&document, ".pathway-title")
        .first()
        .map(element_text)
        .ok_or_else(|| ScrapeError::ContentNotFound {
            url: url.to_string(),
            what: "pathway title".to_string(),
        })?;

    let compounds = select_all(&document, ".metabolite")
        .iter()
        .map(|el| CompoundDraft {
            id: Some(el.value().attr("id").unwrap_or_default().to_string()),
            name: Some(element_text(el)),
            formula: Some(String::new()),
        })
        .collect();

    Ok(PathwayDraft {
        id: Some(pathway_id.to_string()),
        name: Some(name),
        description: Some(String::new()),
        compounds: Some(compounds),
        reactions: None,
        metadata: Some(source_metadata(PathwaySource::WikiPathways)),
        related_pathways: None,
    })
}

fn source_metadata(source: PathwaySource) -> MetadataDraft {
    MetadataDraft {
        source: Some(source.label().to_string()),
        confidence: Some(source.confidence()),
        verification_status: Some(VerificationStatus::Unverified),
        ..MetadataDraft::default()
    }
}

fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

//! Pathway extraction from web databases.
//!
//! Queries take the form `KEGG:<id>` or `WP:<id>`. Extractors return an
//! unvalidated [`PathwayDraft`]; they never touch the store.

mod web;

pub use web::{extract_kegg, extract_wikipathways, WebScraper};

use async_trait::async_trait;

use crate::error::{ScrapeError, ScrapeResult};
use crate::models::PathwayDraft;

/// A scrapable pathway database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathwaySource {
    Kegg,
    WikiPathways,
}

impl PathwaySource {
    /// Query prefix, without the colon.
    pub fn prefix(&self) -> &'static str {
        match self {
            PathwaySource::Kegg => "KEGG",
            PathwaySource::WikiPathways => "WP",
        }
    }

    /// Source label recorded in pathway metadata.
    pub fn label(&self) -> &'static str {
        match self {
            PathwaySource::Kegg => "KEGG",
            PathwaySource::WikiPathways => "WikiPathways",
        }
    }

    /// Default confidence for records scraped from this source.
    pub fn confidence(&self) -> f64 {
        match self {
            PathwaySource::Kegg => 0.9,
            PathwaySource::WikiPathways => 0.85,
        }
    }
}

impl std::fmt::Display for PathwaySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

impl std::str::FromStr for PathwaySource {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "KEGG" => Ok(PathwaySource::Kegg),
            "WP" | "WIKIPATHWAYS" => Ok(PathwaySource::WikiPathways),
            _ => Err(ScrapeError::InvalidQuery {
                query: s.to_string(),
            }),
        }
    }
}

/// A parsed extraction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeQuery {
    pub source: PathwaySource,
    pub pathway_id: String,
}

impl ScrapeQuery {
    /// Build a query directly.
    pub fn new(source: PathwaySource, pathway_id: impl Into<String>) -> Self {
        Self {
            source,
            pathway_id: pathway_id.into(),
        }
    }

    /// Parse `KEGG:<id>` or `WP:<id>`. The marker may appear anywhere in the
    /// text; everything after it, trimmed, is the id.
    pub fn parse(query: &str) -> ScrapeResult<Self> {
        let invalid = || ScrapeError::InvalidQuery {
            query: query.to_string(),
        };

        for source in [PathwaySource::Kegg, PathwaySource::WikiPathways] {
            let marker = format!("{}:", source.prefix());
            if let Some((_, rest)) = query.split_once(&marker) {
                let id = rest.trim();
                if id.is_empty() {
                    return Err(invalid());
                }
                return Ok(Self::new(source, id));
            }
        }

        Err(invalid())
    }
}

impl std::fmt::Display for ScrapeQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.source, self.pathway_id)
    }
}

/// Something that can turn a query into a pathway draft.
#[async_trait]
pub trait PathwayExtractor: Send + Sync {
    /// Fetch and extract one pathway.
    async fn extract(&self, query: &ScrapeQuery) -> ScrapeResult<PathwayDraft>;
}

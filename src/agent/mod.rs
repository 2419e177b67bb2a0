//! Scripted pathway exploration.
//!
//! The agent runs a fixed pipeline per pathway: extract, validate, construct
//! the record, keep it in the session collection, add it to the store, save.
//! It is the only caller of [`PathwayStore::add`] and [`PathwayStore::save`]
//! outside discovery.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::discovery::{DiscoveryReport, DiscoveryTool};
use crate::error::{AppError, AppResult, StoreError};
use crate::extractor::{PathwayExtractor, PathwaySource, ScrapeQuery, WebScraper};
use crate::llm::LlmClient;
use crate::models::Pathway;
use crate::store::PathwayStore;
use crate::validation::PathwayValidator;

/// How many links away from an explored pathway related exploration reaches
/// unless told otherwise.
pub const DEFAULT_RELATED_DEPTH: usize = 2;

/// Orchestrates extraction, validation, discovery, and persistence.
pub struct PathwayExplorerAgent {
    store: PathwayStore,
    extractor: Arc<dyn PathwayExtractor>,
    validator: PathwayValidator,
    discovery: Option<DiscoveryTool>,
    /// Pathways touched in this session, keyed by id.
    collected: BTreeMap<String, Pathway>,
}

impl PathwayExplorerAgent {
    /// Create an agent without LLM discovery.
    pub fn new(store: PathwayStore, extractor: Arc<dyn PathwayExtractor>) -> Self {
        Self {
            store,
            extractor,
            validator: PathwayValidator::new(),
            discovery: None,
            collected: BTreeMap::new(),
        }
    }

    /// Enable LLM discovery.
    pub fn with_discovery(mut self, discovery: DiscoveryTool) -> Self {
        self.discovery = Some(discovery);
        self
    }

    /// Build the agent from configuration: load the store, create the web
    /// scraper, and enable discovery when an API key is configured.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let store = PathwayStore::load(&config.store);
        let scraper = WebScraper::new(&config.sources, &config.request)?;
        let mut agent = Self::new(store, Arc::new(scraper));

        if config.require_api_key().is_ok() {
            let client = LlmClient::new(&config.llm, config.request.clone())?;
            agent = agent.with_discovery(DiscoveryTool::new(
                Arc::new(client),
                config.discovery.clone(),
            ));
        } else {
            info!("No API key configured, LLM discovery disabled");
        }

        Ok(agent)
    }

    pub fn store(&self) -> &PathwayStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PathwayStore {
        &mut self.store
    }

    /// Pathways collected this session, keyed by id.
    pub fn collected(&self) -> &BTreeMap<String, Pathway> {
        &self.collected
    }

    /// Extract, validate, and store one pathway.
    pub async fn explore_pathway(&mut self, query: &ScrapeQuery) -> AppResult<Pathway> {
        let draft = self.extractor.extract(query).await?;
        let validated = self.validator.validate(draft)?;
        let pathway = Pathway::try_from(validated)?;

        self.collected.insert(pathway.id.clone(), pathway.clone());
        self.store.add(pathway.clone());
        self.store.save()?;

        info!(%query, name = %pathway.name, "Explored pathway");
        Ok(pathway)
    }

    /// Explore the related pathways of `pathway`, depth-first, up to
    /// `max_depth` links away. Ids not in `SOURCE:id` form are looked up on
    /// KEGG. Failures are logged and skipped.
    pub async fn explore_related(&mut self, pathway: &Pathway, max_depth: usize) -> Vec<Pathway> {
        let mut discovered = Vec::new();
        let mut pending: Vec<(String, usize)> = pathway
            .related_pathways
            .iter()
            .rev()
            .map(|id| (id.clone(), max_depth))
            .collect();

        while let Some((related_id, depth)) = pending.pop() {
            if depth == 0 || self.collected.contains_key(&related_id) {
                continue;
            }

            let query = ScrapeQuery::parse(&related_id)
                .unwrap_or_else(|_| ScrapeQuery::new(PathwaySource::Kegg, related_id.as_str()));
            if self.collected.contains_key(&query.pathway_id) {
                continue;
            }

            match self.explore_pathway(&query).await {
                Ok(found) => {
                    pending.extend(
                        found
                            .related_pathways
                            .iter()
                            .rev()
                            .map(|id| (id.clone(), depth - 1)),
                    );
                    discovered.push(found);
                }
                Err(e) => {
                    warn!(%query, error = %e, "Error exploring related pathway");
                }
            }
        }

        discovered
    }

    /// Ask the LLM for `count` new pathways.
    pub async fn discover_with_llm(&mut self, count: usize) -> AppResult<DiscoveryReport> {
        let discovery = self.discovery.as_ref().ok_or_else(|| AppError::Config {
            message: "LLM discovery is not configured (set OPENAI_API_KEY)".to_string(),
        })?;

        let report = discovery.discover(&mut self.store, count).await?;
        for name in &report.added {
            if let Some(pathway) = self.store.get(name) {
                self.collected.insert(pathway.id.clone(), pathway.clone());
            }
        }
        Ok(report)
    }

    /// Write the session collection to `path` as a JSON object keyed by id.
    pub fn export_session(&self, path: &Path) -> AppResult<()> {
        let json = serde_json::to_string_pretty(&self.collected).map_err(StoreError::from)?;
        fs::write(path, json).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), count = self.collected.len(), "Exported session pathways");
        Ok(())
    }

    /// Replace the session collection with the contents of `path`.
    pub fn import_session(&mut self, path: &Path) -> AppResult<usize> {
        let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let collected: BTreeMap<String, Pathway> =
            serde_json::from_str(&contents).map_err(StoreError::from)?;

        self.collected = collected;
        info!(path = %path.display(), count = self.collected.len(), "Imported session pathways");
        Ok(self.collected.len())
    }
}

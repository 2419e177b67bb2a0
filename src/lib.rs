//! # Pathway Explorer
//!
//! An agent that discovers, scrapes, validates, and stores metabolic pathway
//! records in a single JSON file.
//!
//! ## Architecture
//!
//! ```text
//! KEGG / WikiPathways (HTTP) ─┐
//!                             ├→ PathwayDraft → Validator → Pathway → PathwayStore → JSON file
//! LLM chat completions ───────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use pathway_explorer::{Config, PathwayExplorerAgent};
//! use pathway_explorer::extractor::ScrapeQuery;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let mut agent = PathwayExplorerAgent::from_config(&config)?;
//!     let pathway = agent.explore_pathway(&ScrapeQuery::parse("KEGG:map00010")?).await?;
//!     println!("stored {}", pathway.name);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Scripted exploration pipeline.
pub mod agent;
/// Command-line subcommands.
pub mod cli;
/// Configuration management.
pub mod config;
/// LLM-driven pathway discovery.
pub mod discovery;
/// Error types and result aliases for the application.
pub mod error;
/// Web extraction of pathway drafts.
pub mod extractor;
/// Chat-completions client.
pub mod llm;
/// Pathway record model.
pub mod models;
/// Prompt text for discovery.
pub mod prompts;
/// JSON-file pathway store.
pub mod store;
/// Required-field validation.
pub mod validation;

pub use agent::PathwayExplorerAgent;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::Pathway;
pub use store::{AddOutcome, PathwayStore};

//! Command-line subcommands.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::agent::{PathwayExplorerAgent, DEFAULT_RELATED_DEPTH};
use crate::extractor::ScrapeQuery;

/// Pathway explorer subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List stored pathway names
    List,

    /// Scrape, validate, and store a pathway
    Explore {
        /// Query of the form KEGG:<id> or WP:<id>
        query: String,

        /// Follow related pathways up to this many links away (0 disables)
        #[arg(long, default_value_t = DEFAULT_RELATED_DEPTH)]
        depth: usize,

        /// Write the pathways collected by this run to a JSON file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Ask the LLM for pathways not yet stored
    Discover {
        /// Number of pathways to request
        #[arg(long, default_value = "1")]
        count: usize,

        /// Write the pathways added by this run to a JSON file
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

/// Result of CLI command execution.
pub struct CliResult {
    /// Exit code (0 = success)
    pub exit_code: i32,
    /// Output message
    pub message: String,
}

impl CliResult {
    /// Create a success result with the given message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            message: message.into(),
        }
    }

    /// Create an error result with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            message: message.into(),
        }
    }
}

/// Execute a command against the agent.
pub async fn execute_command(command: Commands, agent: &mut PathwayExplorerAgent) -> CliResult {
    match command {
        Commands::List => execute_list(agent),
        Commands::Explore {
            query,
            depth,
            export,
        } => {
            let result = execute_explore(agent, &query, depth).await;
            finish_with_export(agent, result, export.as_deref())
        }
        Commands::Discover { count, export } => {
            let result = execute_discover(agent, count).await;
            finish_with_export(agent, result, export.as_deref())
        }
    }
}

fn finish_with_export(
    agent: &PathwayExplorerAgent,
    mut result: CliResult,
    export: Option<&Path>,
) -> CliResult {
    let Some(path) = export else {
        return result;
    };
    if result.exit_code != 0 {
        return result;
    }

    match agent.export_session(path) {
        Ok(()) => {
            result.message.push_str(&format!(
                "Exported {} pathways to {}\n",
                agent.collected().len(),
                path.display()
            ));
            result
        }
        Err(e) => CliResult::error(format!("{}Export failed: {}", result.message, e)),
    }
}

fn execute_list(agent: &PathwayExplorerAgent) -> CliResult {
    let names = agent.store().names();
    if names.is_empty() {
        return CliResult::success("No pathways stored.");
    }

    let mut output = format!("{} pathways in {}:\n", names.len(), agent.store().path().display());
    for name in names {
        output.push_str(&format!("- {}\n", name));
    }
    CliResult::success(output)
}

async fn execute_explore(agent: &mut PathwayExplorerAgent, query: &str, depth: usize) -> CliResult {
    let query = match ScrapeQuery::parse(query) {
        Ok(q) => q,
        Err(e) => return CliResult::error(e.to_string()),
    };

    let pathway = match agent.explore_pathway(&query).await {
        Ok(p) => p,
        Err(e) => return CliResult::error(format!("Error exploring pathway: {}", e)),
    };

    let mut output = format!(
        "Stored {} ({}) with {} compounds\n",
        pathway.name,
        pathway.id,
        pathway.compounds.len()
    );

    if depth > 0 {
        let related = agent.explore_related(&pathway, depth).await;
        output.push_str(&format!("Explored {} related pathways\n", related.len()));
        for p in related {
            output.push_str(&format!("- {} ({})\n", p.name, p.id));
        }
    }

    CliResult::success(output)
}

async fn execute_discover(agent: &mut PathwayExplorerAgent, count: usize) -> CliResult {
    match agent.discover_with_llm(count).await {
        Ok(report) => {
            let mut output = format!(
                "Added {} new pathways ({} total)\n",
                report.added.len(),
                report.final_count
            );
            for name in &report.added {
                output.push_str(&format!("- {}\n", name));
            }
            for name in &report.skipped {
                output.push_str(&format!("- {} (already stored)\n", name));
            }
            output.push_str(&format!("Transcript: {}\n", report.transcript_path.display()));
            CliResult::success(output)
        }
        Err(e) => CliResult::error(format!("Error during LLM pathway discovery: {}", e)),
    }
}

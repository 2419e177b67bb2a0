//! LLM-driven discovery of pathways missing from the store.
//!
//! The model is shown the names already stored and asked for new ones. Each
//! suggestion becomes a draft with a generated id, is added to the store, and
//! the run is written out as a markdown transcript.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::config::DiscoveryConfig;
use crate::error::{AppResult, DiscoveryError};
use crate::llm::{CompletionProvider, Message};
use crate::models::{CompoundDraft, MetadataDraft, PathwayDraft, VerificationStatus};
use crate::prompts::{discovery_user_prompt, DISCOVERY_SYSTEM_PROMPT};
use crate::store::{AddOutcome, PathwayStore};

/// Source label for LLM-suggested pathways.
pub const LLM_SOURCE: &str = "LLM";

/// A compound as the model reports it: a bare name or an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuggestedCompound {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        formula: Option<String>,
    },
}

impl SuggestedCompound {
    pub fn name(&self) -> &str {
        match self {
            SuggestedCompound::Name(name) => name,
            SuggestedCompound::Detailed { name, .. } => name,
        }
    }
}

/// One pathway suggested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwaySuggestion {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub compounds: Vec<SuggestedCompound>,
    #[serde(default)]
    pub enzymes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SuggestionList {
    pathways: Vec<PathwaySuggestion>,
}

/// Outcome of one discovery run.
#[derive(Debug, Clone)]
pub struct DiscoveryReport {
    pub run_id: Uuid,
    pub known_before: Vec<String>,
    pub suggestions: Vec<PathwaySuggestion>,
    /// Names that were new to the store.
    pub added: Vec<String>,
    /// Names the store already held.
    pub skipped: Vec<String>,
    pub initial_count: usize,
    pub final_count: usize,
    pub transcript_path: PathBuf,
    pub raw_response: String,
}

/// Asks a completion provider for new pathways and records them.
pub struct DiscoveryTool {
    provider: Arc<dyn CompletionProvider>,
    config: DiscoveryConfig,
}

impl DiscoveryTool {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: DiscoveryConfig) -> Self {
        Self { provider, config }
    }

    /// Request `count` new pathways, add them to `store`, save, and write a transcript.
    pub async fn discover(&self, store: &mut PathwayStore, count: usize) -> AppResult<DiscoveryReport> {
        let run_id = Uuid::new_v4();
        let known = store.known_names_lowercase();
        info!(%run_id, known = known.len(), count, "Requesting pathways from LLM");

        let messages = vec![
            Message::system(DISCOVERY_SYSTEM_PROMPT),
            Message::user(discovery_user_prompt(&known, count)),
        ];
        let raw_response = self.provider.complete(messages).await?;
        info!(%run_id, "Received LLM response");

        let suggestions = match parse_suggestions(&raw_response) {
            Ok(s) => s,
            Err(e) => {
                error!(%run_id, error = %e, raw = %raw_response, "Error parsing response");
                return Err(e.into());
            }
        };

        let initial_count = store.len();
        let mut added = Vec::new();
        let mut skipped = Vec::new();

        for suggestion in &suggestions {
            let id = format!("LLM_PATH_{}", store.len());
            let draft = suggestion_to_draft(suggestion, &id, self.config.confidence);
            match store.add_draft(draft)? {
                AddOutcome::Added => added.push(suggestion.name.clone()),
                AddOutcome::Duplicate => skipped.push(suggestion.name.clone()),
            }
        }
        store.save()?;

        let final_count = store.len();
        info!(
            %run_id,
            added = final_count - initial_count,
            total = final_count,
            "Discovery run complete"
        );

        let mut report = DiscoveryReport {
            run_id,
            known_before: known,
            suggestions,
            added,
            skipped,
            initial_count,
            final_count,
            transcript_path: PathBuf::new(),
            raw_response,
        };
        report.transcript_path = write_transcript(&self.config.responses_dir, &report, Local::now())?;

        Ok(report)
    }
}

/// Parse the model's reply. A surrounding markdown code fence or prose is
/// tolerated; the outermost `{...}` must hold a `pathways` array.
pub fn parse_suggestions(completion: &str) -> Result<Vec<PathwaySuggestion>, DiscoveryError> {
    let start = completion.find('{');
    let end = completion.rfind('}');
    let body = match (start, end) {
        (Some(s), Some(e)) if s < e => &completion[s..=e],
        _ => {
            return Err(DiscoveryError::Parse {
                message: "response contains no JSON object".to_string(),
            })
        }
    };

    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| DiscoveryError::Parse {
        message: e.to_string(),
    })?;

    if !value.get("pathways").is_some_and(serde_json::Value::is_array) {
        return Err(DiscoveryError::Parse {
            message: "parsed JSON missing 'pathways' array".to_string(),
        });
    }

    let list: SuggestionList = serde_json::from_value(value).map_err(|e| DiscoveryError::Parse {
        message: e.to_string(),
    })?;
    Ok(list.pathways)
}

/// Convert a suggestion into a draft with id `id`.
///
/// Compounds get ids `<id>_C<k>` (1-based). Enzymes have no slot in the
/// record model without reactions, so they are kept in the validation notes.
pub fn suggestion_to_draft(suggestion: &PathwaySuggestion, id: &str, confidence: f64) -> PathwayDraft {
    let compounds = suggestion
        .compounds
        .iter()
        .enumerate()
        .map(|(k, compound)| CompoundDraft {
            id: Some(format!("{}_C{}", id, k + 1)),
            name: Some(compound.name().to_string()),
            formula: match compound {
                SuggestedCompound::Detailed { formula, .. } => formula.clone().filter(|f| !f.is_empty()),
                SuggestedCompound::Name(_) => None,
            },
        })
        .collect();

    let notes = if suggestion.enzymes.is_empty() {
        None
    } else {
        Some(format!("Enzymes reported: {}", suggestion.enzymes.join(", ")))
    };

    PathwayDraft {
        id: Some(id.to_string()),
        name: Some(suggestion.name.clone()),
        description: Some(suggestion.description.clone()).filter(|d| !d.is_empty()),
        compounds: Some(compounds),
        reactions: None,
        metadata: Some(MetadataDraft {
            source: Some(LLM_SOURCE.to_string()),
            confidence: Some(confidence),
            verification_status: Some(VerificationStatus::Unverified),
            llm_validation_notes: notes,
            ..MetadataDraft::default()
        }),
        related_pathways: None,
    }
}

/// Write `metabolic_pathways_<timestamp>.md` under `dir` and return its path.
fn write_transcript(dir: &Path, report: &DiscoveryReport, now: DateTime<Local>) -> Result<PathBuf, DiscoveryError> {
    let path = dir.join(format!("metabolic_pathways_{}.md", now.format("%Y%m%d_%H%M%S")));
    let io_err = |source| DiscoveryError::Transcript {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(dir).map_err(io_err)?;
    fs::write(&path, render_transcript(report, now)).map_err(io_err)?;

    info!(path = %path.display(), "Wrote discovery transcript");
    Ok(path)
}

fn render_transcript(report: &DiscoveryReport, now: DateTime<Local>) -> String {
    let known = if report.known_before.is_empty() {
        "none".to_string()
    } else {
        report.known_before.join(", ")
    };
    let parsed = serde_json::to_string_pretty(&SuggestionList {
        pathways: report.suggestions.clone(),
    })
    .unwrap_or_default();

    format!(
        "# New Metabolic Pathways\n\
         Generated: {generated}\n\
         Run: {run_id}\n\n\
         ## Known Pathways\n\
         {known}\n\n\
         ## LLM Response\n\
         {raw}\n\n\
         ## Parsed and Saved Pathways\n\
         ```json\n{parsed}\n```\n\n\
         ## Database Update Summary\n\
         - Initial pathway count: {initial}\n\
         - New pathways added: {added}\n\
         - Final pathway count: {final_count}\n",
        generated = now.format("%Y-%m-%d %H:%M:%S"),
        run_id = report.run_id,
        raw = report.raw_response,
        initial = report.initial_count,
        added = report.final_count - report.initial_count,
        final_count = report.final_count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let suggestions = parse_suggestions(
            r#"{"pathways": [{"name": "Flavonoid biosynthesis", "description": "d", "compounds": ["Naringenin"], "enzymes": ["CHS"]}]}"#,
        )
        .unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].name, "Flavonoid biosynthesis");
        assert_eq!(suggestions[0].compounds[0].name(), "Naringenin");
    }

    #[test]
    fn test_parse_fenced_json_with_object_compounds() {
        let text = "Here you go:\n```json\n{\"pathways\": [{\"name\": \"Lignin biosynthesis\", \"compounds\": [{\"name\": \"Coniferyl alcohol\", \"formula\": \"C10H12O3\"}]}]}\n```";
        let suggestions = parse_suggestions(text).unwrap();
        assert_eq!(
            suggestions[0].compounds[0],
            SuggestedCompound::Detailed {
                name: "Coniferyl alcohol".to_string(),
                formula: Some("C10H12O3".to_string())
            }
        );
        assert!(suggestions[0].enzymes.is_empty());
    }

    #[test]
    fn test_parse_requires_pathways_array() {
        assert!(matches!(
            parse_suggestions(r#"{"results": []}"#),
            Err(DiscoveryError::Parse { .. })
        ));
        assert!(parse_suggestions("no json here").is_err());
        assert!(parse_suggestions("{broken").is_err());
    }

    #[test]
    fn test_suggestion_to_draft() {
        let suggestion = PathwaySuggestion {
            name: "Terpenoid backbone biosynthesis".to_string(),
            description: "MVA and MEP pathways".to_string(),
            compounds: vec![
                SuggestedCompound::Name("Mevalonate".to_string()),
                SuggestedCompound::Detailed {
                    name: "IPP".to_string(),
                    formula: Some(String::new()),
                },
            ],
            enzymes: vec!["HMGR".to_string(), "DXS".to_string()],
        };

        let draft = suggestion_to_draft(&suggestion, "LLM_PATH_4", 0.7);
        assert_eq!(draft.id.as_deref(), Some("LLM_PATH_4"));

        let compounds = draft.compounds.as_ref().unwrap();
        assert_eq!(compounds[0].id.as_deref(), Some("LLM_PATH_4_C1"));
        assert_eq!(compounds[1].id.as_deref(), Some("LLM_PATH_4_C2"));
        assert!(compounds[1].formula.is_none());

        let metadata = draft.metadata.as_ref().unwrap();
        assert_eq!(metadata.source.as_deref(), Some(LLM_SOURCE));
        assert_eq!(
            metadata.llm_validation_notes.as_deref(),
            Some("Enzymes reported: HMGR, DXS")
        );
    }
}

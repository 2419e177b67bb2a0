use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    check_confidence, lenient_timestamp, Compound, Pathway, PathwayMetadata, Reaction,
    VerificationStatus,
};
use crate::error::ValidationError;

/// Partially-filled compound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompoundDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

/// Partially-filled reaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReactionDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactants: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enzymes: Option<Vec<String>>,
}

/// Partially-filled pathway metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<VerificationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_validation_notes: Option<String>,
}

/// Pathway as produced by an extraction adapter: every field may be absent.
///
/// Unknown keys in the source JSON are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathwayDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compounds: Option<Vec<CompoundDraft>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactions: Option<Vec<ReactionDraft>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataDraft>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_pathways: Option<Vec<String>>,
}

impl PathwayDraft {
    /// Required top-level fields that are absent, in declaration order.
    pub fn missing_fields(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|field| match **field {
                "id" => self.id.is_none(),
                "name" => self.name.is_none(),
                "description" => self.description.is_none(),
                "compounds" => self.compounds.is_none(),
                "reactions" => self.reactions.is_none(),
                "metadata" => self.metadata.is_none(),
                "related_pathways" => self.related_pathways.is_none(),
                _ => false,
            })
            .map(|field| field.to_string())
            .collect()
    }
}

fn required<T>(value: Option<T>, field: impl Into<String>) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::MissingField {
        field: field.into(),
    })
}

/// Prefix the field path of a nested missing-field error.
fn nested(prefix: &str, err: ValidationError) -> ValidationError {
    match err {
        ValidationError::MissingField { field } => ValidationError::MissingField {
            field: format!("{}.{}", prefix, field),
        },
        other => other,
    }
}

impl TryFrom<CompoundDraft> for Compound {
    type Error = ValidationError;

    fn try_from(draft: CompoundDraft) -> Result<Self, Self::Error> {
        Ok(Compound {
            id: required(draft.id, "id")?,
            name: required(draft.name, "name")?,
            formula: draft.formula,
        })
    }
}

impl TryFrom<ReactionDraft> for Reaction {
    type Error = ValidationError;

    fn try_from(draft: ReactionDraft) -> Result<Self, Self::Error> {
        Ok(Reaction {
            reactants: required(draft.reactants, "reactants")?,
            products: required(draft.products, "products")?,
            enzymes: draft.enzymes.unwrap_or_default(),
        })
    }
}

impl TryFrom<MetadataDraft> for PathwayMetadata {
    type Error = ValidationError;

    fn try_from(draft: MetadataDraft) -> Result<Self, Self::Error> {
        let source = required(draft.source, "source")?;
        let confidence = check_confidence(required(draft.confidence, "confidence")?)?;

        Ok(PathwayMetadata {
            source,
            confidence,
            last_updated: draft.last_updated.unwrap_or_else(Utc::now),
            verification_status: draft.verification_status.unwrap_or_default(),
            llm_validation_notes: draft.llm_validation_notes,
        })
    }
}

impl TryFrom<PathwayDraft> for Pathway {
    type Error = ValidationError;

    fn try_from(draft: PathwayDraft) -> Result<Self, Self::Error> {
        let id = required(draft.id, "id")?;
        let name = required(draft.name, "name")?;
        let metadata = PathwayMetadata::try_from(required(draft.metadata, "metadata")?)
            .map_err(|e| nested("metadata", e))?;

        let compounds = draft
            .compounds
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, c)| Compound::try_from(c).map_err(|e| nested(&format!("compounds[{}]", i), e)))
            .collect::<Result<Vec<_>, _>>()?;

        let reactions = draft
            .reactions
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, r)| Reaction::try_from(r).map_err(|e| nested(&format!("reactions[{}]", i), e)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Pathway {
            id,
            name,
            description: draft.description,
            compounds,
            reactions,
            metadata,
            related_pathways: draft.related_pathways.unwrap_or_default(),
        })
    }
}

impl From<Compound> for CompoundDraft {
    fn from(compound: Compound) -> Self {
        Self {
            id: Some(compound.id),
            name: Some(compound.name),
            formula: compound.formula,
        }
    }
}

impl From<Reaction> for ReactionDraft {
    fn from(reaction: Reaction) -> Self {
        Self {
            reactants: Some(reaction.reactants),
            products: Some(reaction.products),
            enzymes: Some(reaction.enzymes),
        }
    }
}

impl From<PathwayMetadata> for MetadataDraft {
    fn from(metadata: PathwayMetadata) -> Self {
        Self {
            source: Some(metadata.source),
            confidence: Some(metadata.confidence),
            last_updated: Some(metadata.last_updated),
            verification_status: Some(metadata.verification_status),
            llm_validation_notes: metadata.llm_validation_notes,
        }
    }
}

impl From<Pathway> for PathwayDraft {
    fn from(pathway: Pathway) -> Self {
        Self {
            id: Some(pathway.id),
            name: Some(pathway.name),
            description: pathway.description,
            compounds: Some(pathway.compounds.into_iter().map(Into::into).collect()),
            reactions: Some(pathway.reactions.into_iter().map(Into::into).collect()),
            metadata: Some(pathway.metadata.into()),
            related_pathways: Some(pathway.related_pathways),
        }
    }
}

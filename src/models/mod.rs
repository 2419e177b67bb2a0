//! Pathway record model.
//!
//! Validated records ([`Pathway`], [`Compound`], [`Reaction`],
//! [`PathwayMetadata`]) and the partially-filled [`PathwayDraft`] that
//! extraction adapters produce. Drafts become records only through
//! `Pathway::try_from`, which is also the path serde takes when a stored
//! pathway is deserialized.

mod draft;


pub use draft::{CompoundDraft, MetadataDraft, PathwayDraft, ReactionDraft};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// A chemical species referenced by identifier within a pathway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CompoundDraft")]
pub struct Compound {
    /// Identifier, unique within the owning pathway.
    pub id: String,
    /// Common name.
    pub name: String,
    /// Chemical formula, when known.
    pub formula: Option<String>,
}

/// A transformation from reactant compounds to product compounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReactionDraft")]
pub struct Reaction {
    /// Reactant compound ids, in order.
    pub reactants: Vec<String>,
    /// Product compound ids, in order.
    pub products: Vec<String>,
    /// Catalyzing enzyme ids (EC numbers or names).
    pub enzymes: Vec<String>,
}

/// How much checking a pathway record has undergone.
///
/// The set is open: labels other than the known ones round-trip verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VerificationStatus {
    /// Nothing has checked the record yet.
    #[default]
    Unverified,
    /// Required fields were checked by the validation step.
    Validated,
    /// Cross-checked against an authoritative source.
    Verified,
    /// Any other label.
    Other(String),
}

impl VerificationStatus {
    /// The serialized label.
    pub fn as_str(&self) -> &str {
        match self {
            VerificationStatus::Unverified => "unverified",
            VerificationStatus::Validated => "validated",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Other(label) => label,
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for VerificationStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "unverified" => VerificationStatus::Unverified,
            "validated" => VerificationStatus::Validated,
            "verified" => VerificationStatus::Verified,
            _ => VerificationStatus::Other(label),
        }
    }
}

impl From<&str> for VerificationStatus {
    fn from(label: &str) -> Self {
        VerificationStatus::from(label.to_string())
    }
}

impl From<VerificationStatus> for String {
    fn from(status: VerificationStatus) -> Self {
        match status {
            VerificationStatus::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// Provenance and confidence of a pathway record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MetadataDraft")]
pub struct PathwayMetadata {
    /// Where the record came from (e.g. "KEGG").
    pub source: String,
    /// Confidence score (0.0-1.0).
    pub confidence: f64,
    /// When the record was last touched.
    pub last_updated: DateTime<Utc>,
    /// Verification status label.
    pub verification_status: VerificationStatus,
    /// Notes left by the validation step.
    pub llm_validation_notes: Option<String>,
}

/// A named metabolic pathway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PathwayDraft")]
pub struct Pathway {
    /// Unique pathway identifier.
    pub id: String,
    /// Pathway name; the store's deduplication key.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Compounds taking part in the pathway.
    pub compounds: Vec<Compound>,
    /// Reactions in the pathway.
    pub reactions: Vec<Reaction>,
    /// Provenance metadata.
    pub metadata: PathwayMetadata,
    /// Ids of related pathways. These may not be stored yet.
    pub related_pathways: Vec<String>,
}

impl Compound {
    /// Create a compound without a formula.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            formula: None,
        }
    }

    /// Set the chemical formula.
    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }
}

impl Reaction {
    /// Create an uncatalyzed reaction.
    pub fn new(reactants: Vec<String>, products: Vec<String>) -> Self {
        Self {
            reactants,
            products,
            enzymes: Vec::new(),
        }
    }

    /// Set the catalyzing enzymes.
    pub fn with_enzymes(mut self, enzymes: Vec<String>) -> Self {
        self.enzymes = enzymes;
        self
    }
}

impl PathwayMetadata {
    /// Create unverified metadata stamped with the current time.
    pub fn new(source: impl Into<String>, confidence: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            source: source.into(),
            confidence: check_confidence(confidence)?,
            last_updated: Utc::now(),
            verification_status: VerificationStatus::Unverified,
            llm_validation_notes: None,
        })
    }

    /// Change the verification status in place and refresh `last_updated`.
    pub fn set_status(&mut self, status: VerificationStatus, notes: Option<String>) {
        self.verification_status = status;
        self.llm_validation_notes = notes;
        self.last_updated = Utc::now();
    }
}

impl Pathway {
    /// Create a pathway with no compounds, reactions, or relations.
    pub fn new(id: impl Into<String>, name: impl Into<String>, metadata: PathwayMetadata) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            compounds: Vec::new(),
            reactions: Vec::new(),
            metadata,
            related_pathways: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a compound.
    pub fn with_compound(mut self, compound: Compound) -> Self {
        self.compounds.push(compound);
        self
    }

    /// Append a reaction.
    pub fn with_reaction(mut self, reaction: Reaction) -> Self {
        self.reactions.push(reaction);
        self
    }

    /// Append a related pathway id.
    pub fn with_related(mut self, pathway_id: impl Into<String>) -> Self {
        self.related_pathways.push(pathway_id.into());
        self
    }
}

/// Accept confidence only within [0.0, 1.0]. NaN fails the range check.
pub(crate) fn check_confidence(value: f64) -> Result<f64, ValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::ConfidenceOutOfRange { value })
    }
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339, and naive ISO-8601 date-times with either a `T` or a
/// space separator, or a bare date. Naive values are read as UTC; a bare
/// date is midnight.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Deserialize an optional timestamp in any form [`parse_timestamp`] accepts.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };

    parse_timestamp(&raw)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {:?}", raw)))
}

//! Core types for schedule extraction.
//!
//! Lifecycle: Document text → Rule / Oracle producers → Merge → ScheduleCandidate list.
//! Candidates carry no identity; the caller assigns one when persisting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ScheduleError;

// ═══════════════════════════════════════════
// Category Enum
// ═══════════════════════════════════════════

/// The closed set of schedule categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleCategory {
    Deadline,
    Submit,
    Trip,
    Meeting,
    Other,
}

impl ScheduleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deadline => "deadline",
            Self::Submit => "submit",
            Self::Trip => "trip",
            Self::Meeting => "meeting",
            Self::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "deadline" => Some(Self::Deadline),
            "submit" => Some(Self::Submit),
            "trip" => Some(Self::Trip),
            "meeting" => Some(Self::Meeting),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn all() -> &'static [ScheduleCategory] {
        &[
            Self::Deadline,
            Self::Submit,
            Self::Trip,
            Self::Meeting,
            Self::Other,
        ]
    }

    /// Display prefix prepended to generated titles.
    pub fn title_label(&self) -> &'static str {
        match self {
            Self::Deadline => "📅 마감: ",
            Self::Submit => "📤 제출: ",
            Self::Trip => "🚗 출장: ",
            Self::Meeting => "👥 회의: ",
            Self::Other => "📋 ",
        }
    }
}

impl std::fmt::Display for ScheduleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which producer emitted a candidate. External candidates win merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOrigin {
    Rule,
    External,
}

impl CandidateOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rule => "rule",
            Self::External => "external",
        }
    }
}

// ═══════════════════════════════════════════
// Schedule Candidate (pipeline output)
// ═══════════════════════════════════════════

/// A proposed calendar entry extracted from document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCandidate {
    pub title: String,
    pub task_description: String,
    pub due_date: NaiveDate,
    pub category: ScheduleCategory,
    /// Not shown to users. Maps onto the persisted `is_ai_generated` flag.
    pub origin: CandidateOrigin,
}

impl ScheduleCandidate {
    pub fn is_ai_generated(&self) -> bool {
        self.origin == CandidateOrigin::External
    }
}

// ═══════════════════════════════════════════
// Extraction Config
// ═══════════════════════════════════════════

/// Tunables for the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Sentence units shorter than this (in chars, after trimming) are skipped.
    pub min_unit_chars: usize,
    /// Descriptions longer than this are cut and suffixed with "...".
    pub description_max_chars: usize,
    /// Title bodies longer than this are cut and suffixed with "...".
    pub title_max_chars: usize,
    /// Two same-day candidates are duplicates when word-set Jaccard
    /// similarity is strictly above this value.
    pub similarity_threshold: f64,
    /// Only this many leading chars of the document are sent to the oracle.
    pub external_input_max_chars: usize,
    /// Captured years below this are treated as placeholders for the current year.
    pub min_literal_year: i32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_unit_chars: 5,
            description_max_chars: 200,
            title_max_chars: 50,
            similarity_threshold: 0.7,
            external_input_max_chars: 2000,
            min_literal_year: 2000,
        }
    }
}

impl ExtractionConfig {
    /// Reject values that would make the pipeline emit nothing or everything.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.description_max_chars == 0 {
            return Err(ScheduleError::Config(
                "description_max_chars must be positive".into(),
            ));
        }
        if self.title_max_chars == 0 {
            return Err(ScheduleError::Config("title_max_chars must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ScheduleError::Config(format!(
                "similarity_threshold {} outside [0, 1]",
                self.similarity_threshold
            )));
        }
        if self.external_input_max_chars == 0 {
            return Err(ScheduleError::Config(
                "external_input_max_chars must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Parse a JSON config document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ScheduleError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

// ═══════════════════════════════════════════
// Extraction Report
// ═══════════════════════════════════════════

/// Candidates plus per-producer counts for a single extraction call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionReport {
    pub candidates: Vec<ScheduleCandidate>,
    /// Whether the oracle was consulted at all (it reported ready).
    pub external_attempted: bool,
    pub external_found: usize,
    pub rule_found: usize,
    /// Rule candidates that survived the merge against external output.
    pub rule_merged: usize,
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

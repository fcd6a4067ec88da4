//! Rule-based schedule extraction.
//!
//! Splits text into sentence units on '.' and '\n', resolves the first date
//! in each unit, classifies it by keyword, and keeps the first of any
//! same-day near-duplicates. Deterministic for a given (text, today).

use chrono::NaiveDate;

use super::builder::CandidateBuilder;
use super::classify::classify_fragment;
use super::date_resolver::DateResolver;
use super::duplicate::DuplicateDetector;
use super::types::{ExtractionConfig, ScheduleCandidate};

const UNIT_TERMINATORS: &[char] = &['.', '\n'];

pub struct RuleExtractor {
    resolver: DateResolver,
    builder: CandidateBuilder,
    detector: DuplicateDetector,
    min_unit_chars: usize,
}

impl Default for RuleExtractor {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

impl RuleExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            resolver: DateResolver::new(config.min_literal_year),
            builder: CandidateBuilder::from_config(config),
            detector: DuplicateDetector::new(config.similarity_threshold),
            min_unit_chars: config.min_unit_chars,
        }
    }

    /// Extract candidates from `text` in text order.
    pub fn extract(&self, text: &str, today: NaiveDate) -> Vec<ScheduleCandidate> {
        let mut candidates = Vec::new();

        for unit in text.split(UNIT_TERMINATORS) {
            let unit = unit.trim();
            if unit.chars().count() < self.min_unit_chars {
                continue;
            }

            let Some(due_date) = self.resolver.resolve(unit, today) else {
                continue;
            };

            // Explicit-year dates are never rolled forward; drop the stale ones.
            if due_date < today {
                tracing::trace!(%due_date, "Skipping past-dated unit");
                continue;
            }

            let category = classify_fragment(unit);
            let candidate = self.builder.from_fragment(due_date, unit, category);
            self.detector.push_unique(&mut candidates, candidate);
        }

        candidates
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

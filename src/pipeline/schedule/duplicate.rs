//! Duplicate detection between schedule candidates.
//!
//! Two candidates are duplicates when they fall on the same day and their
//! descriptions share enough words. Used both inside the rule extractor and
//! when merging rule output into oracle output.

use std::collections::HashSet;

use super::types::ScheduleCandidate;

/// Word-set Jaccard similarity of two texts (lower-cased, whitespace-split).
///
/// Returns 0.0 when either side has no words.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();

    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();

    intersection as f64 / union as f64
}

/// Duplicate checker with a configurable similarity threshold.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateDetector {
    threshold: f64,
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self::new(0.7)
    }
}

impl DuplicateDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn is_duplicate_pair(&self, a: &ScheduleCandidate, b: &ScheduleCandidate) -> bool {
        a.due_date == b.due_date
            && text_similarity(&a.task_description, &b.task_description) > self.threshold
    }

    /// True if `candidate` duplicates any entry in `existing`.
    pub fn is_duplicate(
        &self,
        candidate: &ScheduleCandidate,
        existing: &[ScheduleCandidate],
    ) -> bool {
        existing.iter().any(|e| self.is_duplicate_pair(e, candidate))
    }

    /// Append `candidate` unless it duplicates something already present.
    /// Returns whether it was appended.
    pub fn push_unique(
        &self,
        list: &mut Vec<ScheduleCandidate>,
        candidate: ScheduleCandidate,
    ) -> bool {
        if self.is_duplicate(&candidate, list) {
            tracing::trace!(
                due_date = %candidate.due_date,
                origin = candidate.origin.as_str(),
                "Dropping duplicate schedule candidate"
            );
            return false;
        }
        list.push(candidate);
        true
    }
}

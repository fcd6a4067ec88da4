//! Candidate construction: title generation and description cleanup.

use chrono::NaiveDate;

use super::types::{CandidateOrigin, ExtractionConfig, ScheduleCandidate, ScheduleCategory};

/// Cut `text` to `max_chars` Unicode scalar values, appending "..." if cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Builds `ScheduleCandidate`s with consistent titles and length limits.
#[derive(Debug, Clone, Copy)]
pub struct CandidateBuilder {
    title_max_chars: usize,
    description_max_chars: usize,
}

impl Default for CandidateBuilder {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

impl CandidateBuilder {
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            title_max_chars: config.title_max_chars,
            description_max_chars: config.description_max_chars,
        }
    }

    /// Category label followed by the (possibly truncated) description.
    pub fn title(&self, description: &str, category: ScheduleCategory) -> String {
        format!(
            "{}{}",
            category.title_label(),
            truncate_with_ellipsis(description, self.title_max_chars)
        )
    }

    /// Whitespace-normalized, length-capped description for rule output.
    pub fn clean_description(&self, fragment: &str) -> String {
        truncate_with_ellipsis(&collapse_whitespace(fragment), self.description_max_chars)
    }

    /// Build a candidate from a sentence unit found by the rule extractor.
    pub fn from_fragment(
        &self,
        due_date: NaiveDate,
        fragment: &str,
        category: ScheduleCategory,
    ) -> ScheduleCandidate {
        let task_description = self.clean_description(fragment);
        ScheduleCandidate {
            title: self.title(&task_description, category),
            task_description,
            due_date,
            category,
            origin: CandidateOrigin::Rule,
        }
    }

    /// Build a candidate from oracle-provided fields.
    ///
    /// `title_hint` is the oracle's own title, used as the title body when
    /// present. The description falls back to the title body so it is never
    /// empty.
    pub fn from_external(
        &self,
        due_date: NaiveDate,
        title_hint: Option<&str>,
        description: Option<&str>,
        category: ScheduleCategory,
    ) -> ScheduleCandidate {
        let title_hint = title_hint.map(str::trim).filter(|s| !s.is_empty());
        let description = description.map(str::trim).filter(|s| !s.is_empty());

        let title_body = match (title_hint, description) {
            (Some(t), _) => t.to_string(),
            (None, Some(d)) => d.chars().take(self.title_max_chars).collect(),
            (None, None) => "일정".to_string(),
        };

        let task_description = match description {
            Some(d) => truncate_with_ellipsis(d, self.description_max_chars),
            None => truncate_with_ellipsis(&title_body, self.description_max_chars),
        };

        ScheduleCandidate {
            title: self.title(&title_body, category),
            task_description,
            due_date,
            category,
            origin: CandidateOrigin::External,
        }
    }
}

//! ScheduleExtractor: runs both producers and merges their output.
//!
//! Rule extraction always runs. The oracle runs only when it reports ready;
//! when it contributes anything, its candidates come first and rule
//! candidates fill in whatever it missed.

use std::time::Instant;

use chrono::{Local, NaiveDate};

use super::duplicate::DuplicateDetector;
use super::error::ScheduleError;
use super::external::ExternalExtractor;
use super::rules::RuleExtractor;
use super::traits::ScheduleOracle;
use super::types::{ExtractionConfig, ExtractionReport, ScheduleCandidate};

pub struct ScheduleExtractor {
    rules: RuleExtractor,
    external: ExternalExtractor,
    detector: DuplicateDetector,
    oracle: Option<Box<dyn ScheduleOracle>>,
}

impl ScheduleExtractor {
    /// Rule-only extractor. Fails if `config` does not validate.
    pub fn new(config: ExtractionConfig) -> Result<Self, ScheduleError> {
        config.validate()?;
        Ok(Self::from_valid_config(&config))
    }

    fn from_valid_config(config: &ExtractionConfig) -> Self {
        Self {
            rules: RuleExtractor::new(config),
            external: ExternalExtractor::new(config),
            detector: DuplicateDetector::new(config.similarity_threshold),
            oracle: None,
        }
    }

    pub fn with_oracle(mut self, oracle: Box<dyn ScheduleOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    /// Extract candidates relative to the local calendar date.
    pub fn extract_now(&self, text: &str) -> Vec<ScheduleCandidate> {
        self.extract(text, Local::now().date_naive())
    }

    /// Extract candidates, all dated on or after `today`.
    pub fn extract(&self, text: &str, today: NaiveDate) -> Vec<ScheduleCandidate> {
        self.extract_with_report(text, today).candidates
    }

    /// Extract and report per-producer counts.
    pub fn extract_with_report(&self, text: &str, today: NaiveDate) -> ExtractionReport {
        if text.trim().is_empty() {
            return ExtractionReport::default();
        }

        let start = Instant::now();

        let (external_attempted, external_candidates) = match &self.oracle {
            Some(oracle) if oracle.ready() => {
                (true, self.external.extract(&**oracle, text, today))
            }
            Some(_) => {
                tracing::debug!("Schedule oracle not ready, skipping external extraction");
                (false, vec![])
            }
            None => (false, vec![]),
        };

        let rule_candidates = self.rules.extract(text, today);
        let external_found = external_candidates.len();
        let rule_found = rule_candidates.len();

        let (candidates, rule_merged) = self.merge(external_candidates, rule_candidates);

        tracing::debug!(
            external_attempted,
            external_found,
            rule_found,
            rule_merged,
            total = candidates.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Schedule extraction complete"
        );

        ExtractionReport {
            candidates,
            external_attempted,
            external_found,
            rule_found,
            rule_merged,
        }
    }

    /// External first, then each rule candidate unless it duplicates
    /// something already kept. Returns the list and how many rule
    /// candidates made it in.
    fn merge(
        &self,
        external: Vec<ScheduleCandidate>,
        rules: Vec<ScheduleCandidate>,
    ) -> (Vec<ScheduleCandidate>, usize) {
        if external.is_empty() {
            let count = rules.len();
            return (rules, count);
        }

        let mut merged = external;
        let mut kept = 0;
        for candidate in rules {
            if self.detector.push_unique(&mut merged, candidate) {
                kept += 1;
            }
        }
        (merged, kept)
    }
}

impl Default for ScheduleExtractor {
    fn default() -> Self {
        Self::from_valid_config(&ExtractionConfig::default())
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::pipeline::schedule::oracle::{LazyOracle, MockOracle};
    use crate::pipeline::schedule::types::{CandidateOrigin, ScheduleCategory};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 3, 1)
    }

    fn with_reply(reply: &str) -> ScheduleExtractor {
        ScheduleExtractor::default().with_oracle(Box::new(MockOracle::new(reply)))
    }

    #[test]
    fn extractor_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScheduleExtractor>();
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let config = ExtractionConfig {
            similarity_threshold: -1.0,
            ..ExtractionConfig::default()
        };
        assert!(matches!(
            ScheduleExtractor::new(config),
            Err(ScheduleError::Config(_))
        ));
    }

    #[test]
    fn threshold_of_one_never_merges_distinct_same_day_items() {
        let config = ExtractionConfig {
            similarity_threshold: 1.0,
            ..ExtractionConfig::default()
        };
        let extractor = ScheduleExtractor::new(config).unwrap();
        let text = "5월 1일 분기 보고서 제출\n5월 1일 본사 회의 참석";
        assert_eq!(extractor.extract(text, today()).len(), 2);
    }

    #[test]
    fn empty_input_short_circuits() {
        let oracle = Arc::new(MockOracle::new(r#"[{"date": "2025-05-01"}]"#));
        let extractor =
            ScheduleExtractor::default().with_oracle(Box::new(Arc::clone(&oracle)));

        assert!(extractor.extract("", today()).is_empty());
        assert!(extractor.extract("  \n\t ", today()).is_empty());
        assert!(oracle.requests().is_empty());
    }

    #[test]
    fn rule_only_without_oracle() {
        let extractor = ScheduleExtractor::default();
        assert!(!extractor.has_oracle());
        let report =
            extractor.extract_with_report("3월 15일까지 보고서 제출. 4월 2일 회의 예정.", today());
        assert!(!report.external_attempted);
        assert_eq!(report.rule_found, 2);
        assert_eq!(report.rule_merged, 2);
        assert_eq!(report.candidates.len(), 2);
        assert_eq!(report.candidates[0].category, ScheduleCategory::Deadline);
        assert_eq!(report.candidates[1].category, ScheduleCategory::Meeting);
    }

    #[test]
    fn not_ready_oracle_is_never_called() {
        let oracle = Arc::new(MockOracle::not_ready());
        let extractor =
            ScheduleExtractor::default().with_oracle(Box::new(Arc::clone(&oracle)));
        let report = extractor.extract_with_report("5월 1일 회의 참석", today());
        assert!(!report.external_attempted);
        assert_eq!(report.candidates.len(), 1);
        assert!(oracle.requests().is_empty());
    }

    #[test]
    fn failing_oracle_falls_back_to_rules() {
        let extractor =
            ScheduleExtractor::default().with_oracle(Box::new(MockOracle::failing("timeout")));
        let report = extractor.extract_with_report("5월 1일 회의 참석", today());
        assert!(report.external_attempted);
        assert_eq!(report.external_found, 0);
        assert_eq!(report.candidates.len(), 1);
        assert_eq!(report.candidates[0].origin, CandidateOrigin::Rule);
    }

    #[test]
    fn empty_external_reply_falls_back_to_rules() {
        let extractor = with_reply("[]");
        let result = extractor.extract("5월 1일 회의 참석", today());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].origin, CandidateOrigin::Rule);
    }

    #[test]
    fn external_wins_over_similar_rule_candidate() {
        let extractor = with_reply(
            r#"[{"title": "보고서", "date": "2025-05-01", "type": "submit",
                 "description": "5월 1일 분기 보고서 팀장 에게 제출"}]"#,
        );
        let result = extractor.extract("5월 1일 분기 보고서 팀장 에게 제출 요망", today());

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].origin, CandidateOrigin::External);
        assert_eq!(result[0].due_date, date(2025, 5, 1));
    }

    #[test]
    fn external_first_then_missing_rule_candidates() {
        let extractor = with_reply(
            r#"{"schedules": [
                {"title": "출장", "date": "2025-06-10", "type": "trip", "description": "부산 지사 출장"},
                {"title": "회의", "date": "2025-04-02", "type": "meeting", "description": "4월 2일 회의 예정"}
            ]}"#,
        );
        let report = extractor.extract_with_report(
            "3월 15일까지 보고서 제출. 4월 2일 회의 예정.",
            today(),
        );

        assert!(report.external_attempted);
        assert_eq!(report.external_found, 2);
        assert_eq!(report.rule_found, 2);
        assert_eq!(report.rule_merged, 1);

        let result = report.candidates;
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].due_date, date(2025, 6, 10));
        assert_eq!(result[0].origin, CandidateOrigin::External);
        assert_eq!(result[1].due_date, date(2025, 4, 2));
        assert_eq!(result[1].origin, CandidateOrigin::External);
        assert_eq!(result[2].due_date, date(2025, 3, 15));
        assert_eq!(result[2].origin, CandidateOrigin::Rule);
        assert_eq!(result[2].category, ScheduleCategory::Deadline);
    }

    #[test]
    fn external_duplicates_are_kept_as_is() {
        let extractor = with_reply(
            r#"[{"date": "2025-05-01", "description": "같은 일정"},
                {"date": "2025-05-01", "description": "같은 일정"}]"#,
        );
        let result = extractor.extract("문서에 날짜 없음", today());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn no_candidate_dated_before_today() {
        let extractor = with_reply(
            r#"[{"date": "2025-02-01", "title": "지난 일정"},
                {"date": "2025-03-01", "title": "오늘 일정"}]"#,
        );
        let result = extractor.extract("2024년 12월 1일 마감\n1월 5일 보고 예정", today());
        assert!(result.iter().all(|c| c.due_date >= today()));
        assert!(result
            .iter()
            .all(|c| ScheduleCategory::all().contains(&c.category)));
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].due_date, date(2026, 1, 5));
    }

    #[test]
    fn lazy_oracle_failure_downgrades_to_rules() {
        let lazy: LazyOracle<MockOracle> =
            LazyOracle::new(|| Err(ScheduleError::Config("GROQ_API_KEY not set".into())));
        let extractor = ScheduleExtractor::default().with_oracle(Box::new(lazy));
        let report = extractor.extract_with_report("5월 1일 회의 참석", today());
        assert!(!report.external_attempted);
        assert_eq!(report.candidates.len(), 1);
    }

    #[test]
    fn today_snapshot_passed_to_oracle() {
        let oracle = Arc::new(MockOracle::new("[]"));
        let extractor =
            ScheduleExtractor::default().with_oracle(Box::new(Arc::clone(&oracle)));
        extractor.extract("5월 1일 회의 참석", today());
        assert_eq!(oracle.requests()[0].1, "2025-03-01");
    }
}

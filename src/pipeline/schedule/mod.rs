//! Document-to-schedule extraction.
//!
//! Turns free-form document text into dated schedule candidates.
//!
//! ```text
//! text ─┬─> RuleExtractor ─────────────────────┐
//!       └─> ExternalExtractor (oracle, optional) ┴─> merge ─> Vec<ScheduleCandidate>
//! ```
//!
//! - Rule extraction always runs and is deterministic for (text, today).
//! - The oracle is injected, consulted only when ready, and may fail without
//!   affecting the result beyond contributing nothing.
//! - Oracle candidates take precedence; rule candidates are added when they
//!   are not same-day near-duplicates of anything already kept.
//! - No candidate is ever dated before `today`.

pub mod error;
pub mod types;
pub mod traits;
pub mod date_resolver;
pub mod classify;
pub mod builder;
pub mod duplicate;
pub mod rules;
pub mod prompt;
pub mod parser;
pub mod external;
pub mod oracle;
pub mod merger;

pub use error::ScheduleError;
pub use types::*;
pub use traits::ScheduleOracle;
pub use date_resolver::{DateResolver, ResolvedDate};
pub use classify::{classify_fragment, normalize_category_label};
pub use builder::CandidateBuilder;
pub use duplicate::{text_similarity, DuplicateDetector};
pub use rules::RuleExtractor;
pub use prompt::build_schedule_prompt;
pub use parser::ReplyShape;
pub use external::{parse_flexible_date, ExternalExtractor};
pub use oracle::{LazyOracle, MockOracle};
pub use merger::ScheduleExtractor;

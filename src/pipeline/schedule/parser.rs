//! Oracle reply parsing.
//!
//! Models return JSON in several shapes and often wrap it in markdown fences
//! or reasoning blocks. Parsing never fails outright: an unusable reply is
//! `ReplyShape::Unrecognized`, which yields no items.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static REASONING_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));

static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*").expect("valid regex"));

/// A flat `{...}` object with no nested braces.
static FLAT_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]+\}").expect("valid regex"));

/// Recognized shapes of an oracle reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyShape {
    /// Top-level JSON array of records.
    Records(Vec<Value>),
    /// Object holding a `schedules` array.
    Wrapped(Vec<Value>),
    /// A single record object.
    Single(Map<String, Value>),
    /// Whole-payload parse failed; flat objects recovered by scanning.
    Fragments(Vec<Value>),
    Unrecognized,
}

impl ReplyShape {
    /// Classify a raw oracle reply.
    pub fn parse(raw: &str) -> Self {
        let cleaned = strip_code_fences(&strip_reasoning(raw));
        if cleaned.is_empty() {
            return Self::Unrecognized;
        }

        match serde_json::from_str::<Value>(&cleaned) {
            Ok(Value::Array(items)) => Self::Records(items),
            Ok(Value::Object(mut obj)) => match obj.remove("schedules") {
                Some(Value::Array(items)) => Self::Wrapped(items),
                Some(other) => {
                    obj.insert("schedules".to_string(), other);
                    Self::Single(obj)
                }
                None => Self::Single(obj),
            },
            Ok(_) => Self::Unrecognized,
            Err(e) => {
                tracing::debug!(error = %e, "Oracle reply is not valid JSON, scanning for objects");
                let fragments = scan_flat_objects(&cleaned);
                if fragments.is_empty() {
                    Self::Unrecognized
                } else {
                    Self::Fragments(fragments)
                }
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Records(_) => "records",
            Self::Wrapped(_) => "wrapped",
            Self::Single(_) => "single",
            Self::Fragments(_) => "fragments",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Flatten into candidate items, in reply order.
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::Records(items) | Self::Wrapped(items) | Self::Fragments(items) => items,
            Self::Single(obj) => vec![Value::Object(obj)],
            Self::Unrecognized => vec![],
        }
    }
}

/// Remove `<think>...</think>` blocks emitted by reasoning models.
pub fn strip_reasoning(text: &str) -> String {
    REASONING_BLOCK_RE.replace_all(text, "").into_owned()
}

/// Remove markdown code fence markers, keeping their contents.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE_RE.replace_all(text, "").trim().to_string()
}

/// Parse every flat `{...}` substring independently, skipping failures.
fn scan_flat_objects(text: &str) -> Vec<Value> {
    FLAT_OBJECT_RE
        .find_iter(text)
        .filter_map(|m| serde_json::from_str::<Value>(m.as_str()).ok())
        .filter(Value::is_object)
        .collect()
}

//! Artifact extraction from free-form model output.
//!
//! Models wrap answers in prose and markdown fences no matter how firmly the
//! prompt asks them not to. Extraction is an ordered list of pure strategies,
//! most specific first; each returns `None` instead of failing, and the first
//! one that yields structured data wins.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Message stored in the sentinel returned when nothing parses.
pub const PARSE_FAILURE: &str = "Failed to parse";

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("valid regex"));

/// Any fence; a leading info-string word (language tag) is skipped.
static ANY_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z0-9_+-]*\s*(.*?)\s*```").expect("valid regex"));

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:tsx?|jsx?|typescript|javascript)?\s*(.*?)\s*```").expect("valid regex")
});

type Strategy = fn(&str) -> Option<Value>;

/// Strategies in priority order.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("json-fence", from_json_fence),
    ("any-fence", from_any_fence),
    ("brace-span", from_brace_span),
    ("whole-text", from_whole_text),
];

/// Extract a JSON object (or array) from model output.
///
/// Never fails: when no strategy succeeds, returns the sentinel
/// `{"error": "Failed to parse", "raw": <text>}` so the caller decides whether
/// that is fatal.
pub fn extract_structured(text: &str) -> Value {
    try_extract_structured(text).unwrap_or_else(|| {
        warn!(len = text.len(), "no structured data found in model output");
        json!({ "error": PARSE_FAILURE, "raw": text })
    })
}

/// Same cascade as [`extract_structured`], without the sentinel.
pub fn try_extract_structured(text: &str) -> Option<Value> {
    for (name, strategy) in STRATEGIES {
        match strategy(text) {
            Some(value) => {
                debug!(strategy = name, "extracted structured data");
                return Some(value);
            }
            None => debug!(strategy = name, "strategy found nothing"),
        }
    }
    None
}

/// True only for the exact sentinel shape produced by [`extract_structured`].
///
/// A plan that merely has a top-level `error` key alongside other fields is
/// not a sentinel.
pub fn is_parse_sentinel(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    obj.len() == 2
        && obj.get("error").and_then(Value::as_str) == Some(PARSE_FAILURE)
        && obj.get("raw").is_some_and(Value::is_string)
}

/// Extract source code from model output.
///
/// Returns the trimmed interior of the first fence (optionally tagged
/// ts/tsx/js/jsx/typescript/javascript), or the trimmed text when there is
/// no fence. The result is not checked for syntax.
pub fn extract_code(text: &str) -> String {
    match CODE_FENCE.captures(text).and_then(|c| c.get(1)) {
        Some(m) => m.as_str().trim().to_string(),
        None => text.trim().to_string(),
    }
}

// ── Strategies ──

fn from_json_fence(text: &str) -> Option<Value> {
    JSON_FENCE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .find_map(|m| parse_structured(m.as_str()))
}

fn from_any_fence(text: &str) -> Option<Value> {
    ANY_FENCE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .find_map(|m| parse_structured(m.as_str()))
}

/// Greedy first-`{` to last-`}` span, then each balanced `{...}` span in order.
fn from_brace_span(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        if let Some(value) = parse_structured(&text[start..=end]) {
            return Some(value);
        }
    }

    balanced_spans(text).find_map(parse_structured)
}

fn from_whole_text(text: &str) -> Option<Value> {
    parse_structured(text)
}

/// Parse as JSON, accepting only objects and arrays.
fn parse_structured(candidate: &str) -> Option<Value> {
    serde_json::from_str::<Value>(candidate.trim())
        .ok()
        .filter(|v| v.is_object() || v.is_array())
}

/// Every brace-balanced span, by start position. One pass over the text;
/// quotes only open a string literal inside an open brace, so braces in
/// JSON strings do not count but stray quotes in prose do not either.
fn balanced_spans(text: &str) -> impl Iterator<Item = &str> {
    let mut open = Vec::new();
    let mut spans = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in text.as_bytes().iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' if !open.is_empty() => in_string = true,
            b'{' => open.push(i),
            b'}' => {
                if let Some(start) = open.pop() {
                    spans.push((start, i));
                }
            }
            _ => {}
        }
    }

    spans.sort_unstable_by_key(|&(start, _)| start);
    spans.into_iter().map(move |(start, end)| &text[start..=end])
}

//! Query Well-Formedness Gate
//!
//! Decides whether a query text buffer is acceptable as a structured-data payload.
//! The gate answers with a boolean: malformed text is ordinary input while the user is
//! typing, so it is never reported as an error and never logged.
//!
//! # Grammar
//! - RFC 8259 JSON: object, array, string, number, `true`, `false`, `null`
//! - One value per buffer, surrounded only by JSON whitespace
//! - Object keys may also be bare identifiers (`[A-Za-z_$][A-Za-z0-9_$]*`), as written in
//!   shell aggregation pipelines such as `[{$project: {"hostname": 1}}]`
//! - Nesting is limited to `serde_json`'s recursion limit of 128 levels
//!
//! # Decoding
//! A single linear pass quotes bare keys, then `serde_json` decodes the result. The gate,
//! [`normalize`] and the backend's pipeline parsing all share [`decode`], so the gate never
//! accepts text the backend cannot decode (out-of-range numbers, lone surrogate escapes,
//! excessive nesting).

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message shown next to the query field when the text is rejected
pub const INVALID_QUERY_MESSAGE: &str = "Query must be a valid JSON";

/// Text used for display validity when the query text is empty
pub const EMPTY_QUERY_FALLBACK: &str = "{}";

/// Check whether `text` is one well-formed structured-data literal
///
/// Returns `false` for the empty string and for whitespace-only text.
#[must_use]
pub fn is_well_formed(text: &str) -> bool {
    decode(text).is_ok()
}

/// Re-encode a well-formed literal as compact strict JSON
///
/// Bare identifier keys come out quoted, escapes are decoded and object keys are sorted.
/// Returns `None` exactly when [`is_well_formed`] returns `false`.
#[must_use]
pub fn normalize(text: &str) -> Option<String> {
    decode(text).and_then(|value| serde_json::to_string(&value)).ok()
}

/// Validity of the query text as the user sees it after a keystroke
///
/// Recomputed from the current text alone; there is no memory of earlier states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryTextState {
    /// Text is exactly the empty string
    Empty,
    /// Text is non-empty and rejected by the gate
    InvalidNonEmpty,
    /// Text is accepted by the gate
    Valid,
}

impl QueryTextState {
    /// Classify the current query text
    #[must_use]
    pub fn of(text: &str) -> Self {
        if text.is_empty() {
            Self::Empty
        } else if is_well_formed(text) {
            Self::Valid
        } else {
            Self::InvalidNonEmpty
        }
    }

    /// Get the state name as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::InvalidNonEmpty => "invalid_non_empty",
            Self::Valid => "valid",
        }
    }
}

impl std::fmt::Display for QueryTextState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inline validity indicator rendered next to the query field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryIndicator {
    /// Whether the field is marked invalid
    pub invalid: bool,

    /// Fixed message shown while invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl QueryIndicator {
    /// Compute the indicator for the current query text
    ///
    /// Empty text is judged as [`EMPTY_QUERY_FALLBACK`], so a fresh query shows as valid
    /// even though the gate itself rejects `""`.
    #[must_use]
    pub fn for_text(text: &str) -> Self {
        let effective = if text.is_empty() {
            EMPTY_QUERY_FALLBACK
        } else {
            text
        };
        let invalid = !is_well_formed(effective);
        Self {
            invalid,
            error: invalid.then_some(INVALID_QUERY_MESSAGE),
        }
    }
}

/// Decode query text into a value, accepting bare identifier keys
///
/// The gate and the backend both decode through here, so text the gate accepts always
/// decodes into a pipeline. Nesting deeper than `serde_json`'s recursion limit (128) is an
/// error on both sides.
pub fn decode(text: &str) -> serde_json::Result<Value> {
    // a full Value, since IgnoredAny skips surrogate checks
    serde_json::from_str(&quote_bare_keys(text))
}

/// Quote identifiers that sit in object-key position and are followed by `:`
///
/// Everything else is copied untouched and left for `serde_json` to judge.
fn quote_bare_keys(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let mut out = String::new();
    let mut copied = 0;
    let mut in_string = false;
    let mut escaped = false;
    let mut key_position = false;
    let mut pos = 0;

    while pos < bytes.len() {
        let b = bytes[pos];
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            pos += 1;
            continue;
        }

        match b {
            b'"' => {
                in_string = true;
                key_position = false;
            }
            b'{' | b',' => key_position = true,
            b' ' | b'\t' | b'\n' | b'\r' => {}
            _ if key_position && is_ident_start(b) => {
                let end = pos + bytes[pos..].iter().take_while(|&&c| is_ident_char(c)).count();
                let rest = text[end..].trim_start_matches(is_json_whitespace);
                if rest.starts_with(':') {
                    out.push_str(&text[copied..pos]);
                    out.push('"');
                    out.push_str(&text[pos..end]);
                    out.push('"');
                    copied = end;
                }
                key_position = false;
                pos = end;
                continue;
            }
            _ => key_position = false,
        }
        pos += 1;
    }

    if copied == 0 {
        Cow::Borrowed(text)
    } else {
        out.push_str(&text[copied..]);
        Cow::Owned(out)
    }
}

const fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

const fn is_ident_char(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

const fn is_json_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_every_literal_kind() {
        for text in [
            "{}",
            "[]",
            "\"text\"",
            "0",
            "-12.5e+3",
            "true",
            "false",
            "null",
            r#"{"a": [1, 2, {"b": null}], "c": "\u00e9\n"}"#,
            "  [ 1 , 2 ]\n",
        ] {
            assert!(is_well_formed(text), "expected well-formed: {text:?}");
        }
    }

    #[test]
    fn test_rejects_empty_and_whitespace() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("   "));
        assert!(!is_well_formed("\n\t"));
    }

    #[test]
    fn test_rejects_malformed_text() {
        for text in [
            "[{",
            "{",
            "]",
            "[1,]",
            "{\"a\":1,}",
            "{\"a\" 1}",
            "{\"a\":}",
            "[1 2]",
            "01",
            "1.",
            ".5",
            "1e",
            "+1",
            "tru",
            "nul",
            "'single'",
            "\"unterminated",
            "\"bad \\x escape\"",
            "\"\\u12G4\"",
            "\"raw\ttab\"",
            "{} {}",
            "[] x",
            "[}",
            "{]",
            "{1: 2}",
            "[$project]",
        ] {
            assert!(!is_well_formed(text), "expected malformed: {text:?}");
        }
    }

    #[test]
    fn test_bare_identifier_keys() {
        assert!(is_well_formed(r#"[{$project:{"hostname":1}}]"#));
        assert!(is_well_formed("{_id: 0, type: 1, r: 1}"));
        assert!(is_well_formed("{$group: {_id: \"$type\", total: {$avg: \"$r\"}}}"));
        assert!(!is_well_formed("{9lives: 1}"));
        assert!(!is_well_formed("{my-key: 1}"));
    }

    #[test]
    fn test_nesting_within_limit() {
        let depth = 100;
        let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        assert!(is_well_formed(&text));

        let unbalanced = "[".repeat(100_000);
        assert!(!is_well_formed(&unbalanced));
    }

    #[test]
    fn test_rejects_what_the_backend_cannot_decode() {
        let deep = format!("{}{}", "[".repeat(200), "]".repeat(200));
        for text in [
            deep.as_str(),
            "[1e999]",
            r#"["\ud800"]"#,
            "{$match: {n: -1e400}}",
        ] {
            assert!(!is_well_formed(text), "expected rejected: {text:?}");
            assert!(decode(text).is_err());
            assert_eq!(normalize(text), None);
        }
        assert!(is_well_formed(r#"["\ud83d\ude00"]"#));
    }

    #[test]
    fn test_quote_bare_keys_leaves_strings_and_values_alone() {
        assert_eq!(quote_bare_keys(r#"{"a": "{b: 1}"}"#), r#"{"a": "{b: 1}"}"#);
        assert_eq!(quote_bare_keys("[true, null]"), "[true, null]");
        assert_eq!(quote_bare_keys("{ $match :{n:1}}"), r#"{ "$match" :{"n":1}}"#);
        assert_eq!(quote_bare_keys(r#"{"x\"": 1, y: 2}"#), r#"{"x\"": 1, "y": 2}"#);
        assert!(matches!(quote_bare_keys("[1, 2]"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_normalize_quotes_bare_keys() {
        assert_eq!(
            normalize(r#"[ {$project: { "hostname" : 1, version: "$buildinfo.version" } } ]"#)
                .as_deref(),
            Some(r#"[{"$project":{"hostname":1,"version":"$buildinfo.version"}}]"#)
        );
        assert_eq!(normalize("[{"), None);
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn test_normalize_decodes_escapes() {
        assert_eq!(
            normalize(r#"  "a \"b\" \u0041"  "#).as_deref(),
            Some(r#""a \"b\" A""#)
        );
    }

    #[test]
    fn test_text_state() {
        assert_eq!(QueryTextState::of(""), QueryTextState::Empty);
        assert_eq!(QueryTextState::of(" "), QueryTextState::InvalidNonEmpty);
        assert_eq!(QueryTextState::of("[{"), QueryTextState::InvalidNonEmpty);
        assert_eq!(QueryTextState::of("[]"), QueryTextState::Valid);
        assert_eq!(QueryTextState::InvalidNonEmpty.to_string(), "invalid_non_empty");
    }

    #[test]
    fn test_indicator_uses_fallback_for_empty_text() {
        assert!(!is_well_formed(""));
        let indicator = QueryIndicator::for_text("");
        assert_eq!(indicator.invalid, !is_well_formed(EMPTY_QUERY_FALLBACK));
        assert!(!indicator.invalid);
        assert_eq!(indicator.error, None);
    }

    #[test]
    fn test_indicator_invalid_message() {
        let indicator = QueryIndicator::for_text("[{");
        assert!(indicator.invalid);
        assert_eq!(indicator.error, Some("Query must be a valid JSON"));
    }
}

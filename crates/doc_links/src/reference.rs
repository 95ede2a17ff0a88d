//! Attribute value normalization and plausibility checks.
//!
//! Both checks here are best-effort filters: they throw out values that can
//! never be navigable references, and let anything URL-shaped through.

use markup::Span;
use regex::Regex;
use std::sync::OnceLock;

/// Compile a fixed pattern; only called from `OnceLock` initializers.
pub(crate) fn regex(pattern: &'static str, desc: &'static str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid {desc} regex: {err}"))
}

fn script_protocol() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?i)^\s*javascript:", "script protocol"))
}

fn template_expression() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"\{\{|\}\}", "template expression"))
}

fn url_shaped() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(
            r"\b([A-Za-z][\w+.-]*://)?[^\s()<>]+(?:\(\w+\)|[^[:punct:]\s]|/?)",
            "url shape",
        )
    })
}

/// Strip one pair of matching `'` or `"` delimiters.
pub fn normalize_ref(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

/// Why a normalized value was refused as a reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    ScriptProtocol,
    Anchor,
    LineBreak,
    TemplateExpression,
    NotUrlShaped,
}

/// Check a normalized value against the structural rejection rules.
///
/// `templated` enables the `{{ ... }}` placeholder rule for mustache-style
/// document languages.
pub fn validate_ref(text: &str, templated: bool) -> Result<(), Rejection> {
    if text.is_empty() {
        return Err(Rejection::Empty);
    }
    if script_protocol().is_match(text) {
        return Err(Rejection::ScriptProtocol);
    }
    if text.trim_start().starts_with('#') {
        return Err(Rejection::Anchor);
    }
    if text.contains(['\n', '\r']) {
        return Err(Rejection::LineBreak);
    }
    if templated && template_expression().is_match(text) {
        return Err(Rejection::TemplateExpression);
    }
    if !url_shaped().is_match(text) {
        return Err(Rejection::NotUrlShaped);
    }
    Ok(())
}

/// An attribute value that passed normalization and validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateReference<'a> {
    /// The attribute value as written, quotes included.
    pub raw: &'a str,
    pub text: &'a str,
    /// Span of `text` in the document; excludes stripped quotes.
    pub span: Span,
}

impl<'a> CandidateReference<'a> {
    /// Normalize and validate the raw attribute value found at `span`.
    pub fn from_attribute_value(
        raw: &'a str,
        span: Span,
        templated: bool,
    ) -> Result<Self, Rejection> {
        let text = normalize_ref(raw);
        validate_ref(text, templated)?;
        let span = if text.len() < raw.len() {
            span.shrink(1)
        } else {
            span
        };
        Ok(Self { raw, text, span })
    }
}

//! Turning candidate references into link targets.

use crate::reference::regex;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use url::Url;

/// Host-supplied policy for relative references.
///
/// `anchor` is the established base reference when the document has one,
/// otherwise the document's own URI. Returning `None` means the reference
/// cannot be resolved and no link is produced for it.
pub trait ReferenceResolver {
    fn resolve(&self, reference: &str, anchor: &str) -> Option<String>;
}

impl<F> ReferenceResolver for F
where
    F: Fn(&str, &str) -> Option<String>,
{
    fn resolve(&self, reference: &str, anchor: &str) -> Option<String> {
        self(reference, anchor)
    }
}

/// Resolves references with RFC 3986 joining against the anchor.
///
/// Anchors that are not absolute URLs leave the reference untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct UrlJoinResolver;

impl ReferenceResolver for UrlJoinResolver {
    fn resolve(&self, reference: &str, anchor: &str) -> Option<String> {
        // If no usable anchor, just pass through.
        let Ok(base) = Url::parse(anchor) else {
            return Some(reference.to_string());
        };
        base.join(reference).ok().map(|u| u.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UriSyntaxError {
    /// The candidate could not be parsed as a URI reference.
    Invalid { candidate: String, reason: String },
}

impl fmt::Display for UriSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { candidate, reason } => {
                write!(f, "invalid URI reference {candidate:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for UriSyntaxError {}

/// Final syntactic gate for resolved targets.
pub trait UriSyntax {
    fn check(&self, candidate: &str) -> Result<(), UriSyntaxError>;
}

/// Syntax check backed by the `url` crate.
///
/// Absolute URLs must parse; relative references must join cleanly onto a
/// placeholder base.
#[derive(Clone, Copy, Debug, Default)]
pub struct UrlSyntax;

const PLACEHOLDER_BASE: &str = "file:///";

impl UriSyntax for UrlSyntax {
    fn check(&self, candidate: &str) -> Result<(), UriSyntaxError> {
        let invalid = |err: url::ParseError| UriSyntaxError::Invalid {
            candidate: candidate.to_string(),
            reason: err.to_string(),
        };
        match Url::parse(candidate) {
            Ok(_) => Ok(()),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = Url::parse(PLACEHOLDER_BASE).map_err(invalid)?;
                base.join(candidate).map(|_| ()).map_err(invalid)
            }
            Err(err) => Err(invalid(err)),
        }
    }
}

fn absolute_scheme() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?i)^(?:https?|file)://", "absolute scheme"))
}

/// Map a validated reference to a target string, before the syntax check.
///
/// Leading whitespace is ignored. Absolute `http`, `https` and `file`
/// references are kept verbatim;
/// protocol-relative ones inherit the document's scheme; everything else goes
/// to the resolver, or passes through when there is none.
pub fn resolve_reference(
    text: &str,
    document_uri: &str,
    base: Option<&str>,
    resolver: Option<&dyn ReferenceResolver>,
) -> Option<String> {
    let text = text.trim_start();
    if absolute_scheme().is_match(text) {
        return Some(text.to_string());
    }
    if text.starts_with("//") {
        let scheme = if document_uri.starts_with("https://") {
            "https:"
        } else {
            "http:"
        };
        return Some(format!("{scheme}{text}"));
    }
    match resolver {
        Some(resolver) => resolver.resolve(text, base.unwrap_or(document_uri)),
        None => Some(text.to_string()),
    }
}

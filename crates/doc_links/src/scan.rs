//! Single-pass link extraction over a markup token stream.
//!
//! The only state carried between tokens is [`ScanState`]: which attribute
//! is being read, whether the current tag is `base`, and the document's base
//! reference once it has been settled.

use crate::document::{Range, TextDocument};
use crate::options::LinkOptions;
use crate::reference::CandidateReference;
use crate::resolve::resolve_reference;
use markup::{Span, TokenKind, TokenSource};

/// A navigable reference found in the document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResolvedLink {
    /// Source range of the unquoted attribute value.
    pub range: Range,
    pub target: String,
}

/// Lifecycle of the document's base reference.
///
/// `Resolved` and `Unresolvable` are terminal: only the first `base` tag
/// carrying an `href`/`src` value gets a say.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BasePhase {
    #[default]
    Idle,
    /// Inside the first `base` tag, waiting for its `href`/`src` value.
    AwaitingValue,
    Resolved(String),
    Unresolvable,
}

impl BasePhase {
    fn is_settled(&self) -> bool {
        matches!(self, Self::Resolved(_) | Self::Unresolvable)
    }
}

/// What the tracker decided about an attribute value token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueRole {
    /// Not a link-bearing attribute, or a `base` tag's value that no longer
    /// configures anything.
    Ignore,
    Link,
    /// The value configures the document's base reference.
    Base,
}

/// Mutable tracker state for one pass over one document.
#[derive(Clone, Debug, Default)]
pub struct ScanState {
    after_href_or_src: bool,
    in_base_tag: bool,
    base: BasePhase,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(&self) -> Option<&str> {
        match &self.base {
            BasePhase::Resolved(base) => Some(base),
            _ => None,
        }
    }

    pub fn base_phase(&self) -> &BasePhase {
        &self.base
    }

    pub fn on_start_tag(&mut self, name: &str) {
        self.in_base_tag = name.eq_ignore_ascii_case("base");
        if !self.base.is_settled() {
            self.base = if self.in_base_tag {
                BasePhase::AwaitingValue
            } else {
                BasePhase::Idle
            };
        }
    }

    pub fn on_attribute_name(&mut self, name: &str) {
        self.after_href_or_src = name.eq_ignore_ascii_case("href") || name.eq_ignore_ascii_case("src");
    }

    /// Classify the attribute value that follows the last attribute name.
    pub fn on_attribute_value(&mut self) -> ValueRole {
        let role = if !self.after_href_or_src {
            ValueRole::Ignore
        } else if !self.in_base_tag {
            ValueRole::Link
        } else if self.base == BasePhase::AwaitingValue {
            ValueRole::Base
        } else {
            // A `base` tag's own reference is never a link.
            ValueRole::Ignore
        };
        self.after_href_or_src = false;
        role
    }

    /// Record the outcome of base resolution. Ignored once settled.
    pub fn settle_base(&mut self, resolved: Option<String>) {
        if self.base.is_settled() {
            return;
        }
        self.base = match resolved {
            Some(base) => BasePhase::Resolved(base),
            None => BasePhase::Unresolvable,
        };
    }
}

/// Drive `source` to end of stream and collect links in document order.
///
/// `source` must scan `document.text()` from offset 0; its spans are mapped
/// through the document to produce ranges.
pub fn collect_links<S>(
    source: &mut S,
    document: &TextDocument,
    options: &LinkOptions<'_>,
) -> Vec<ResolvedLink>
where
    S: TokenSource + ?Sized,
{
    let templated = options.is_templated(document.language_id());
    let mut state = ScanState::new();
    let mut links = Vec::new();
    loop {
        match source.next_token() {
            TokenKind::Eos => break,
            TokenKind::StartTag => state.on_start_tag(source.token_text()),
            TokenKind::AttributeName => state.on_attribute_name(source.token_text()),
            TokenKind::AttributeValue => match state.on_attribute_value() {
                ValueRole::Link => {
                    let link = create_link(
                        document,
                        source.token_text(),
                        source.token_span(),
                        state.base(),
                        options,
                        templated,
                    );
                    links.extend(link);
                }
                ValueRole::Base => {
                    let base = resolve_base(document, source.token_text(), options, templated);
                    log::debug!(target: "doc_links", "document base: {base:?}");
                    state.settle_base(base);
                }
                ValueRole::Ignore => {}
            },
            _ => {}
        }
    }
    links
}

fn create_link(
    document: &TextDocument,
    raw: &str,
    span: Span,
    base: Option<&str>,
    options: &LinkOptions<'_>,
    templated: bool,
) -> Option<ResolvedLink> {
    let candidate = match CandidateReference::from_attribute_value(raw, span, templated) {
        Ok(candidate) => candidate,
        Err(rejection) => {
            log::trace!(target: "doc_links", "skip {raw:?}: {rejection:?}");
            return None;
        }
    };
    let target = resolve_target(document, candidate.text, base, options)?;
    log::trace!(target: "doc_links", "link {:?} -> {target}", candidate.raw);
    Some(ResolvedLink {
        range: document.range_at(candidate.span.start, candidate.span.end),
        target,
    })
}

fn resolve_base(
    document: &TextDocument,
    raw: &str,
    options: &LinkOptions<'_>,
    templated: bool,
) -> Option<String> {
    // The span is irrelevant here; only the text matters.
    let candidate =
        CandidateReference::from_attribute_value(raw, Span::default(), templated).ok()?;
    resolve_target(document, candidate.text, None, options)
}

fn resolve_target(
    document: &TextDocument,
    text: &str,
    base: Option<&str>,
    options: &LinkOptions<'_>,
) -> Option<String> {
    let target = resolve_reference(text, document.uri(), base, options.resolver)?;
    match options.syntax.check(&target) {
        Ok(()) => Some(target),
        Err(err) => {
            log::trace!(target: "doc_links", "drop target: {err}");
            None
        }
    }
}

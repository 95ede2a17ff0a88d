//! Document links for markup: every `href`/`src` attribute value that names a
//! navigable resource, resolved and mapped back to its source range.
//!
//! ```
//! use doc_links::{LinkOptions, TextDocument, UrlJoinResolver, find_document_links};
//!
//! let doc = TextDocument::new(
//!     "https://host/index.html",
//!     "html",
//!     r#"<base href="https://cdn.example.com/assets/"><img src="logo.png">"#,
//! );
//! let resolver = UrlJoinResolver;
//! let links = find_document_links(&doc, &LinkOptions::with_resolver(&resolver));
//! assert_eq!(links.len(), 1);
//! assert_eq!(links[0].target, "https://cdn.example.com/assets/logo.png");
//! ```

mod document;
mod options;
mod reference;
mod resolve;
mod scan;

pub use crate::document::{Position, Range, TextDocument};
pub use crate::options::{DEFAULT_TEMPLATE_LANGUAGES, LinkOptions};
pub use crate::reference::{CandidateReference, Rejection, normalize_ref, validate_ref};
pub use crate::resolve::{
    ReferenceResolver, UriSyntax, UriSyntaxError, UrlJoinResolver, UrlSyntax, resolve_reference,
};
pub use crate::scan::{BasePhase, ResolvedLink, ScanState, ValueRole, collect_links};

use markup::Scanner;

/// Scan `document` from the start and return its links in document order.
pub fn find_document_links(document: &TextDocument, options: &LinkOptions<'_>) -> Vec<ResolvedLink> {
    let mut scanner = Scanner::new(document.text(), 0);
    let links = collect_links(&mut scanner, document, options);
    let stats = scanner.stats();
    log::debug!(
        target: "doc_links",
        "{}: {} links from {} tokens ({} state transitions, {} forced advances)",
        document.uri(),
        links.len(),
        stats.tokens_emitted,
        stats.state_transitions,
        stats.forced_advances
    );
    links
}

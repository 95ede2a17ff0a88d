//! Per-call configuration for link extraction.

use crate::resolve::{ReferenceResolver, UriSyntax, UrlSyntax};

/// Languages whose documents treat `{{ ... }}` as unresolved placeholders.
pub const DEFAULT_TEMPLATE_LANGUAGES: &[&str] = &["handlebars", "mustache"];

/// Configuration for [`crate::find_document_links`].
pub struct LinkOptions<'r> {
    /// Resolver for relative references; `None` passes them through unchanged.
    pub resolver: Option<&'r dyn ReferenceResolver>,
    /// Final syntax gate applied to every target.
    pub syntax: &'r dyn UriSyntax,
    /// Language ids whose `{{ ... }}` placeholders disqualify a reference.
    pub template_languages: Vec<String>,
}

impl<'r> LinkOptions<'r> {
    pub fn with_resolver(resolver: &'r dyn ReferenceResolver) -> Self {
        Self {
            resolver: Some(resolver),
            ..Self::default()
        }
    }

    pub fn is_templated(&self, language_id: &str) -> bool {
        self.template_languages
            .iter()
            .any(|lang| lang.eq_ignore_ascii_case(language_id))
    }
}

impl Default for LinkOptions<'_> {
    fn default() -> Self {
        Self {
            resolver: None,
            syntax: &UrlSyntax,
            template_languages: DEFAULT_TEMPLATE_LANGUAGES
                .iter()
                .map(|lang| (*lang).to_string())
                .collect(),
        }
    }
}

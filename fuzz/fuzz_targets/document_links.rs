#![no_main]

use doc_links::{LinkOptions, TextDocument, UrlJoinResolver, find_document_links};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let doc = TextDocument::new("https://host/dir/doc.html", "handlebars", input);
    let resolver = UrlJoinResolver;
    let links = find_document_links(&doc, &LinkOptions::with_resolver(&resolver));
    for pair in links.windows(2) {
        assert!(pair[0].range.start < pair[1].range.start);
    }
    for link in &links {
        assert!(link.range.start <= link.range.end);
        assert!(!link.target.is_empty());
    }
});

use doc_links::{
    LinkOptions, Position, Range, ResolvedLink, TextDocument, UrlJoinResolver,
    find_document_links,
};

fn links_in(uri: &str, text: &str) -> Vec<ResolvedLink> {
    let resolver = UrlJoinResolver;
    let doc = TextDocument::new(uri, "html", text);
    find_document_links(&doc, &LinkOptions::with_resolver(&resolver))
}

fn targets(links: &[ResolvedLink]) -> Vec<&str> {
    links.iter().map(|l| l.target.as_str()).collect()
}

fn covered_text<'a>(doc: &'a TextDocument, range: Range) -> &'a str {
    &doc.text()[doc.offset_at(range.start)..doc.offset_at(range.end)]
}

#[test]
fn ranges_cover_exactly_the_unquoted_value() {
    let text = "<p>\n  <a href=\"one.html\">1</a>\n  <img src='two.png'>\n  <script src=three.js></script>\n</p>";
    let doc = TextDocument::new("file:///site/index.html", "html", text);
    let links = find_document_links(&doc, &LinkOptions::default());
    let covered: Vec<_> = links.iter().map(|l| covered_text(&doc, l.range)).collect();
    assert_eq!(covered, vec!["one.html", "two.png", "three.js"]);
    assert_eq!(
        links[0].range,
        Range::new(Position::new(1, 11), Position::new(1, 19))
    );
}

#[test]
fn rejected_values_produce_no_links() {
    let links = links_in(
        "https://host/doc.html",
        r##"<a href="#section">a</a><a href="javascript:alert(1)">b</a><a href="">c</a>"##,
    );
    assert!(links.is_empty(), "{links:?}");
}

#[test]
fn absolute_values_pass_through_verbatim() {
    for uri in ["https://host/doc.html", "file:///tmp/doc.html", "untitled:1"] {
        let links = links_in(uri, r#"<a href="https://example.com/x">x</a>"#);
        assert_eq!(targets(&links), vec!["https://example.com/x"], "{uri}");
    }
}

#[test]
fn protocol_relative_inherits_document_scheme() {
    let html = r#"<script src="//cdn.example.com/a.js"></script>"#;
    assert_eq!(
        targets(&links_in("https://host/doc.html", html)),
        vec!["https://cdn.example.com/a.js"]
    );
    assert_eq!(
        targets(&links_in("http://host/doc.html", html)),
        vec!["http://cdn.example.com/a.js"]
    );
}

#[test]
fn leading_whitespace_before_scheme_is_ignored() {
    let script = r#"<script src=" //cdn.example.com/a.js"></script>"#;
    let doc = TextDocument::new("https://host/doc.html", "html", script);
    let links = find_document_links(&doc, &LinkOptions::default());
    assert_eq!(targets(&links), vec!["https://cdn.example.com/a.js"]);

    assert_eq!(
        targets(&links_in("file:///p/doc.html", script)),
        vec!["http://cdn.example.com/a.js"]
    );

    let anchor = r#"<a href=" https://example.com/x">x</a>"#;
    let doc = TextDocument::new("https://host/doc.html", "html", anchor);
    let links = find_document_links(&doc, &LinkOptions::default());
    assert_eq!(targets(&links), vec!["https://example.com/x"]);
    assert_eq!(
        targets(&links_in("https://host/doc.html", r#"<a href=" https://example.com">"#)),
        vec!["https://example.com"]
    );
}

#[test]
fn base_tag_anchors_relative_references() {
    let links = links_in(
        "https://host/doc.html",
        r#"<base href="https://cdn.example.com/assets/"><img src="logo.png">"#,
    );
    assert_eq!(targets(&links), vec!["https://cdn.example.com/assets/logo.png"]);
}

#[test]
fn base_href_after_other_attributes_still_sets_base() {
    let links = links_in(
        "https://host/doc.html",
        r#"<base target=_self href="https://cdn/a/"><img src="x.png">"#,
    );
    assert_eq!(targets(&links), vec!["https://cdn/a/x.png"]);
}

#[test]
fn only_the_first_base_is_honored() {
    let links = links_in(
        "https://host/doc.html",
        concat!(
            r#"<base href="https://first.example/"><img src="a.png">"#,
            r#"<base href="https://second.example/"><img src="b.png">"#,
        ),
    );
    assert_eq!(
        targets(&links),
        vec!["https://first.example/a.png", "https://first.example/b.png"]
    );
}

#[test]
fn relative_base_resolves_against_document() {
    let links = links_in(
        "file:///project/pages/index.html",
        r#"<base href="../static/"><link rel="stylesheet" href="site.css">"#,
    );
    assert_eq!(targets(&links), vec!["file:///project/static/site.css"]);
}

#[test]
fn without_base_relative_resolves_against_document() {
    let links = links_in(
        "file:///project/pages/index.html",
        r#"<a href="./about.html">about</a><img src=../img/x.png>"#,
    );
    assert_eq!(
        targets(&links),
        vec![
            "file:///project/pages/about.html",
            "file:///project/img/x.png"
        ]
    );
}

#[test]
fn links_appear_in_source_order() {
    let links = links_in(
        "https://host/",
        r#"<img src="c.png"><a href="a.html"></a><script src="b.js"></script>"#,
    );
    assert_eq!(
        targets(&links),
        vec!["https://host/c.png", "https://host/a.html", "https://host/b.js"]
    );
    assert!(links.windows(2).all(|w| w[0].range.start < w[1].range.start));
}

#[test]
fn attribute_names_are_case_insensitive() {
    let links = links_in("https://host/", r#"<IMG SRC="a.png"><A Href='b.html'>"#);
    assert_eq!(
        targets(&links),
        vec!["https://host/a.png", "https://host/b.html"]
    );
}

#[test]
fn multiline_values_are_rejected() {
    let links = links_in("https://host/", "<a href=\"a\nb.html\">x</a>");
    assert!(links.is_empty(), "{links:?}");
}

#[test]
fn handlebars_placeholders_are_rejected_only_for_templates() {
    let text = r#"<img src="{{asset}}/logo.png"><a href="plain.html">"#;
    let handlebars = TextDocument::new("file:///t.hbs", "handlebars", text);
    let links = find_document_links(&handlebars, &LinkOptions::default());
    assert_eq!(targets(&links), vec!["plain.html"]);

    let html = TextDocument::new("file:///t.html", "html", text);
    let links = find_document_links(&html, &LinkOptions::default());
    assert_eq!(targets(&links), vec!["{{asset}}/logo.png", "plain.html"]);
}

#[test]
fn links_inside_comments_and_scripts_are_ignored() {
    let links = links_in(
        "https://host/",
        "<!-- <a href=\"c.html\"> --><script>document.write('<a href=\"s.html\">')</script><a href=\"real.html\">",
    );
    assert_eq!(targets(&links), vec!["https://host/real.html"]);
}

#[test]
fn unresolvable_targets_are_dropped() {
    let links = links_in("https://host/", r#"<a href="http://exa mple.com/">x</a><a href="ok.html">"#);
    assert_eq!(targets(&links), vec!["https://host/ok.html"]);
}

#[test]
fn no_resolver_passes_relative_references_through() {
    let doc = TextDocument::new(
        "https://host/doc.html",
        "html",
        r#"<base href="https://cdn/"><img src="img/logo.png">"#,
    );
    let links = find_document_links(&doc, &LinkOptions::default());
    assert_eq!(targets(&links), vec!["img/logo.png"]);
}

#[test]
fn declining_resolver_drops_relative_links() {
    let decline = |_: &str, _: &str| -> Option<String> { None };
    let doc = TextDocument::new(
        "https://host/doc.html",
        "html",
        r#"<a href="rel.html"></a><a href="https://abs.example/"></a>"#,
    );
    let links = find_document_links(&doc, &LinkOptions::with_resolver(&decline));
    assert_eq!(targets(&links), vec!["https://abs.example/"]);
}

#[test]
fn utf16_columns_after_multibyte_text() {
    let text = "😊 <a href=\"x.html\">";
    let doc = TextDocument::new("file:///d.html", "html", text);
    let links = find_document_links(&doc, &LinkOptions::default());
    // '😊' counts as two UTF-16 units.
    assert_eq!(
        links[0].range,
        Range::new(Position::new(0, 12), Position::new(0, 18))
    );
}

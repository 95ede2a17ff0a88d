//! Token model emitted by the markup scanner.

use crate::Span;

/// Kind of a scanned token.
///
/// Structural kinds (`StartTagOpen`, `DelimiterAssign`, ...) cover the
/// delimiter glyphs themselves; name and value kinds cover the raw source text
/// exactly as written, quotes included for `AttributeValue`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `<` opening a start tag.
    StartTagOpen,
    /// Start tag name, as written.
    StartTag,
    /// `>` closing a start tag.
    StartTagClose,
    /// `/>` closing a start tag.
    StartTagSelfClose,
    /// `</` opening an end tag.
    EndTagOpen,
    /// End tag name, as written.
    EndTag,
    /// `>` closing an end tag.
    EndTagClose,
    AttributeName,
    /// `=` between an attribute name and its value.
    DelimiterAssign,
    /// Raw attribute value, including any surrounding quotes.
    AttributeValue,
    Whitespace,
    Content,
    /// `<!-- ... -->`, or a bogus `<!`/`<?` declaration.
    Comment,
    Doctype,
    /// Raw body of a `script` element.
    Script,
    /// Raw body of a `style` element.
    Styles,
    /// Anything the scanner could not classify inside a tag.
    Unknown,
    Eos,
}

/// One scanned token: its kind and where it sits in the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Pull-based source of markup tokens.
///
/// Consumers drive the source with [`TokenSource::next_token`] until it yields
/// [`TokenKind::Eos`]; the accessors describe the most recent token.
pub trait TokenSource {
    fn next_token(&mut self) -> TokenKind;
    fn token_span(&self) -> Span;
    fn token_text(&self) -> &str;
}

//! Pull-based markup scanner with byte-accurate spans.
//!
//! The scanner walks the input once and reports every token it passes over,
//! including whitespace and delimiter glyphs, so consumers can attribute
//! source ranges precisely. It never builds a tree and never decodes entities:
//! token text is always a verbatim slice of the input.
//!
//! Known limitations (intentional):
//! - Not an HTML5 state machine (no WHATWG parse-error recovery).
//! - Tag names are restricted to ASCII `[A-Za-z0-9:_-]`.
//! - Rawtext close-tag scanning accepts only ASCII whitespace before `>` (see
//!   `find_rawtext_close_tag`).
use crate::Span;
use crate::token::{Token, TokenKind, TokenSource};
use memchr::memchr;

const COMMENT_START: &[u8] = b"<!--";
const COMMENT_END: &str = "-->";
const DOCTYPE_START: &[u8] = b"<!doctype";

// it only attempts matches starting at ASCII <
// < cannot appear in UTF-8 continuation bytes
const SCRIPT_CLOSE_TAG: &[u8] = b"</script";
const STYLE_CLOSE_TAG: &[u8] = b"</style";

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

fn find_rawtext_close_tag(haystack: &[u8], close_tag: &[u8]) -> Option<usize> {
    let len = haystack.len();
    let n = close_tag.len();
    debug_assert!(n >= 2);
    debug_assert!(close_tag[0] == b'<' && close_tag[1] == b'/');
    if len < n {
        return None;
    }
    let mut i = 0;
    while i + n <= len {
        let rel = memchr(b'<', &haystack[i..])?;
        i += rel;
        if i + n > len {
            return None;
        }
        if haystack[i + 1] == b'/' && starts_with_ignore_ascii_case_at(haystack, i, close_tag) {
            let mut k = i + n;
            // Only ASCII whitespace may sit between the name and `>`.
            while k < len && haystack[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && haystack[k] == b'>' {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn is_attribute_name_byte(b: u8) -> bool {
    !(b.is_ascii_whitespace()
        || b.is_ascii_control()
        || matches!(b, b'"' | b'\'' | b'<' | b'>' | b'/' | b'='))
}

fn is_unquoted_value_byte(b: u8) -> bool {
    !(b.is_ascii_whitespace() || matches!(b, b'"' | b'\'' | b'`' | b'=' | b'<' | b'>'))
}

/// Rawtext elements whose bodies are scanned without looking for markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RawText {
    Script,
    Style,
}

impl RawText {
    fn from_tag_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("script") {
            Some(Self::Script)
        } else if name.eq_ignore_ascii_case("style") {
            Some(Self::Style)
        } else {
            None
        }
    }

    fn close_tag(self) -> &'static [u8] {
        match self {
            Self::Script => SCRIPT_CLOSE_TAG,
            Self::Style => STYLE_CLOSE_TAG,
        }
    }

    fn token_kind(self) -> TokenKind {
        match self {
            Self::Script => TokenKind::Script,
            Self::Style => TokenKind::Styles,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScannerState {
    WithinContent,
    AfterOpeningStartTag,
    WithinTag,
    AfterAttributeName,
    BeforeAttributeValue,
    AfterOpeningEndTag,
    WithinEndTag,
    WithinRawText(RawText),
}

/// Configuration for the scanner.
#[derive(Clone, Debug, Default)]
pub struct ScannerConfig {
    /// Stop with `Eos` after this many tokens; `0` means unbounded.
    pub max_tokens: usize,
}

/// Minimal scanner instrumentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScannerStats {
    pub tokens_emitted: u64,
    pub state_transitions: u64,
    pub forced_advances: u64,
}

/// Streaming markup scanner over a borrowed input.
pub struct Scanner<'a> {
    input: &'a str,
    config: ScannerConfig,
    state: ScannerState,
    cursor: usize,
    token_start: usize,
    token_kind: TokenKind,
    pending_raw_text: Option<RawText>,
    stats: ScannerStats,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str, initial_offset: usize) -> Self {
        Self::with_config(input, initial_offset, ScannerConfig::default())
    }

    pub fn with_config(input: &'a str, initial_offset: usize, config: ScannerConfig) -> Self {
        let mut cursor = initial_offset.min(input.len());
        while !input.is_char_boundary(cursor) {
            cursor -= 1;
        }
        Self {
            input,
            config,
            state: ScannerState::WithinContent,
            cursor,
            token_start: cursor,
            token_kind: TokenKind::Unknown,
            pending_raw_text: None,
            stats: ScannerStats::default(),
        }
    }

    /// Advance to the next token and return its kind.
    ///
    /// Every call either consumes at least one byte or returns `Eos`; once
    /// `Eos` is returned, every later call returns `Eos` again.
    pub fn scan_token(&mut self) -> TokenKind {
        let start = self.cursor;
        let limit_hit = self.config.max_tokens != 0
            && self.stats.tokens_emitted >= self.config.max_tokens as u64;
        let kind = if limit_hit {
            self.cursor = self.input.len();
            TokenKind::Eos
        } else {
            self.lex_token()
        };
        let kind = if kind != TokenKind::Eos && self.cursor == start {
            // Forward progress: swallow one char rather than spin.
            self.stats.forced_advances = self.stats.forced_advances.saturating_add(1);
            self.cursor += self.char_len_at(start);
            self.state = ScannerState::WithinContent;
            TokenKind::Unknown
        } else {
            kind
        };
        self.token_start = if kind == TokenKind::Eos {
            self.cursor
        } else {
            start
        };
        self.token_kind = kind;
        if kind != TokenKind::Eos {
            self.stats.tokens_emitted = self.stats.tokens_emitted.saturating_add(1);
        }
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "markup.scanner",
            "token {:?} [{}, {}) state={:?}",
            kind,
            self.token_start,
            self.cursor,
            self.state
        );
        kind
    }

    pub fn token_kind(&self) -> TokenKind {
        self.token_kind
    }

    pub fn token_offset(&self) -> usize {
        self.token_start
    }

    pub fn token_end(&self) -> usize {
        self.cursor
    }

    pub fn token_length(&self) -> usize {
        self.cursor - self.token_start
    }

    pub fn token_text(&self) -> &'a str {
        &self.input[self.token_start..self.cursor]
    }

    pub fn stats(&self) -> ScannerStats {
        self.stats
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn char_len_at(&self, pos: usize) -> usize {
        self.input[pos..].chars().next().map_or(1, char::len_utf8)
    }

    fn transition(&mut self, next: ScannerState) {
        if self.state != next {
            self.stats.state_transitions = self.stats.state_transitions.saturating_add(1);
            self.state = next;
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let bytes = self.bytes();
        let start = self.cursor;
        while self.cursor < bytes.len() && bytes[self.cursor].is_ascii_whitespace() {
            self.cursor += 1;
        }
        self.cursor > start
    }

    fn advance_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let bytes = self.bytes();
        let start = self.cursor;
        while self.cursor < bytes.len() && pred(bytes[self.cursor]) {
            self.cursor += 1;
        }
        self.cursor - start
    }

    /// Move past the next `b`, or to end of input when there is none.
    fn advance_past_byte(&mut self, b: u8) {
        match memchr(b, &self.bytes()[self.cursor..]) {
            Some(rel) => self.cursor += rel + 1,
            None => self.cursor = self.input.len(),
        }
    }

    fn lex_token(&mut self) -> TokenKind {
        loop {
            let bytes = self.bytes();
            let len = bytes.len();
            if self.cursor >= len {
                return TokenKind::Eos;
            }
            let i = self.cursor;
            match self.state {
                ScannerState::WithinContent => {
                    if bytes[i] != b'<' {
                        match memchr(b'<', &bytes[i..]) {
                            Some(rel) => self.cursor = i + rel,
                            None => self.cursor = len,
                        }
                        return TokenKind::Content;
                    }
                    if starts_with_ignore_ascii_case_at(bytes, i, COMMENT_START) {
                        let body = i + COMMENT_START.len();
                        match self.input[body..].find(COMMENT_END) {
                            Some(end) => self.cursor = body + end + COMMENT_END.len(),
                            None => self.cursor = len,
                        }
                        return TokenKind::Comment;
                    }
                    if starts_with_ignore_ascii_case_at(bytes, i, DOCTYPE_START) {
                        self.advance_past_byte(b'>');
                        return TokenKind::Doctype;
                    }
                    if i + 1 < len && matches!(bytes[i + 1], b'!' | b'?') {
                        self.advance_past_byte(b'>');
                        return TokenKind::Comment;
                    }
                    if i + 1 < len && bytes[i + 1] == b'/' {
                        self.cursor = i + 2;
                        self.transition(ScannerState::AfterOpeningEndTag);
                        return TokenKind::EndTagOpen;
                    }
                    if i + 1 < len && is_tag_name_byte(bytes[i + 1]) {
                        self.cursor = i + 1;
                        self.transition(ScannerState::AfterOpeningStartTag);
                        return TokenKind::StartTagOpen;
                    }
                    // A lone `<` is plain text up to the next candidate.
                    self.cursor = i + 1;
                    if let Some(rel) = memchr(b'<', &bytes[i + 1..]) {
                        self.cursor = i + 1 + rel;
                    } else {
                        self.cursor = len;
                    }
                    return TokenKind::Content;
                }
                ScannerState::AfterOpeningStartTag => {
                    if self.advance_while(is_tag_name_byte) > 0 {
                        self.pending_raw_text = RawText::from_tag_name(&self.input[i..self.cursor]);
                        self.transition(ScannerState::WithinTag);
                        return TokenKind::StartTag;
                    }
                    self.transition(ScannerState::WithinTag);
                }
                ScannerState::WithinTag => {
                    if self.skip_whitespace() {
                        return TokenKind::Whitespace;
                    }
                    match bytes[i] {
                        b'/' if i + 1 < len && bytes[i + 1] == b'>' => {
                            self.cursor = i + 2;
                            self.pending_raw_text = None;
                            self.transition(ScannerState::WithinContent);
                            return TokenKind::StartTagSelfClose;
                        }
                        b'>' => {
                            self.cursor = i + 1;
                            let next = match self.pending_raw_text.take() {
                                Some(raw) => ScannerState::WithinRawText(raw),
                                None => ScannerState::WithinContent,
                            };
                            self.transition(next);
                            return TokenKind::StartTagClose;
                        }
                        b'<' => {
                            // Unclosed tag: resume as content without consuming.
                            self.pending_raw_text = None;
                            self.transition(ScannerState::WithinContent);
                        }
                        b if is_attribute_name_byte(b) => {
                            self.advance_while(is_attribute_name_byte);
                            self.transition(ScannerState::AfterAttributeName);
                            return TokenKind::AttributeName;
                        }
                        _ => {
                            self.cursor = i + self.char_len_at(i);
                            return TokenKind::Unknown;
                        }
                    }
                }
                ScannerState::AfterAttributeName => {
                    if self.skip_whitespace() {
                        return TokenKind::Whitespace;
                    }
                    if bytes[i] == b'=' {
                        self.cursor = i + 1;
                        self.transition(ScannerState::BeforeAttributeValue);
                        return TokenKind::DelimiterAssign;
                    }
                    self.transition(ScannerState::WithinTag);
                }
                ScannerState::BeforeAttributeValue => {
                    if self.skip_whitespace() {
                        return TokenKind::Whitespace;
                    }
                    if self.advance_while(is_unquoted_value_byte) > 0 {
                        // `<a href=http://foo/>` keeps the `/>` for the tag.
                        if self.cursor < len
                            && bytes[self.cursor] == b'>'
                            && bytes[self.cursor - 1] == b'/'
                        {
                            self.cursor -= 1;
                        }
                        if self.cursor > i {
                            self.transition(ScannerState::WithinTag);
                            return TokenKind::AttributeValue;
                        }
                    }
                    let quote = bytes[i];
                    if quote == b'"' || quote == b'\'' {
                        self.cursor = i + 1;
                        self.advance_past_byte(quote);
                        self.transition(ScannerState::WithinTag);
                        return TokenKind::AttributeValue;
                    }
                    self.transition(ScannerState::WithinTag);
                }
                ScannerState::AfterOpeningEndTag => {
                    self.transition(ScannerState::WithinEndTag);
                    if self.advance_while(is_tag_name_byte) > 0 {
                        return TokenKind::EndTag;
                    }
                }
                ScannerState::WithinEndTag => {
                    if self.skip_whitespace() {
                        return TokenKind::Whitespace;
                    }
                    if bytes[i] == b'>' {
                        self.cursor = i + 1;
                        self.transition(ScannerState::WithinContent);
                        return TokenKind::EndTagClose;
                    }
                    match memchr(b'>', &bytes[i..]) {
                        Some(rel) => self.cursor = i + rel,
                        None => self.cursor = len,
                    }
                    return TokenKind::Unknown;
                }
                ScannerState::WithinRawText(raw) => {
                    match find_rawtext_close_tag(&bytes[i..], raw.close_tag()) {
                        Some(0) => {
                            self.transition(ScannerState::WithinContent);
                        }
                        Some(rel) => {
                            self.cursor = i + rel;
                            self.transition(ScannerState::WithinContent);
                            return raw.token_kind();
                        }
                        None => {
                            // Missing close tag: the rest of the input is rawtext.
                            self.cursor = len;
                            self.transition(ScannerState::WithinContent);
                            return raw.token_kind();
                        }
                    }
                }
            }
        }
    }
}

impl TokenSource for Scanner<'_> {
    fn next_token(&mut self) -> TokenKind {
        self.scan_token()
    }

    fn token_span(&self) -> Span {
        Span::new(self.token_start, self.cursor)
    }

    fn token_text(&self) -> &str {
        Scanner::token_text(self)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        match self.scan_token() {
            TokenKind::Eos => None,
            kind => Some(Token {
                kind,
                span: Span::new(self.token_start, self.cursor),
            }),
        }
    }
}

/// Scan `input` from the start and collect every token before `Eos`.
pub fn scan_all(input: &str) -> Vec<Token> {
    Scanner::new(input, 0).collect()
}

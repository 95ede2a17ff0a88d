//! Markup scanning for link-bearing attributes.
//!
//! The scanner reports raw tokens with byte spans; it does not build a tree.

mod scanner;
mod span;
mod token;

pub use crate::scanner::{Scanner, ScannerConfig, ScannerStats, scan_all};
pub use crate::span::Span;
pub use crate::token::{Token, TokenKind, TokenSource};

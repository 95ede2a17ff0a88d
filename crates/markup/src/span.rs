//! Byte spans into the scanned input.

/// Half-open byte span `[start, end)` into the scanner input.
///
/// Invariant: both ends sit on UTF-8 char boundaries of the input the span was
/// produced from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must be <= end");
        Self { start, end }
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Shrink by `n` bytes on each side, collapsing to the midpoint when too short.
    pub fn shrink(self, n: usize) -> Self {
        if self.len() < n * 2 {
            let mid = self.start + self.len() / 2;
            return Self::new(mid, mid);
        }
        Self::new(self.start + n, self.end - n)
    }
}

#[cfg(test)]
mod tests {
    use super::Span;

    #[test]
    fn shrink_trims_both_sides() {
        assert_eq!(Span::new(4, 13).shrink(1), Span::new(5, 12));
    }

    #[test]
    fn shrink_collapses_short_spans() {
        let span = Span::new(2, 3).shrink(1);
        assert!(span.is_empty());
        assert_eq!(span.start, 2);
    }
}

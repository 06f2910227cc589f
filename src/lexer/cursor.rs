use super::{Position, Span};

/// Immutable read position over a source string.
///
/// A cursor is `Copy`: moving forward produces a new cursor and leaves the
/// original untouched, so any cursor can be kept as a checkpoint for free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'src> {
    source: &'src str,
    byte: usize,
    position: Position,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            byte: 0,
            position: Position::start(),
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// The unconsumed suffix of the source.
    pub fn remaining(&self) -> &'src str {
        &self.source[self.byte..]
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Characters consumed so far.
    pub fn offset(&self) -> usize {
        self.position.offset
    }

    pub fn byte_offset(&self) -> usize {
        self.byte
    }

    pub fn is_at_end(&self) -> bool {
        self.byte >= self.source.len()
    }

    /// Character `k` places ahead, without moving.
    pub fn peek(&self, k: usize) -> Option<char> {
        self.remaining().chars().nth(k)
    }

    /// Cursor after the next `len` bytes of [`Cursor::remaining`].
    ///
    /// Stops early at the end of input, and never splits a character: a
    /// partially covered character is consumed whole.
    pub fn advance_bytes(&self, len: usize) -> Cursor<'src> {
        let mut byte = self.byte;
        let mut position = self.position;

        for ch in self.remaining().chars() {
            if byte - self.byte >= len {
                break;
            }
            byte += ch.len_utf8();
            position.offset += 1;
            if ch == '\n' {
                position.line += 1;
                position.column = 1;
            } else {
                position.column += 1;
            }
        }

        Cursor {
            source: self.source,
            byte,
            position,
        }
    }

    /// Cursor after the next `count` characters.
    pub fn advance_chars(&self, count: usize) -> Cursor<'src> {
        let len = self
            .remaining()
            .char_indices()
            .nth(count)
            .map(|(idx, _)| idx)
            .unwrap_or(self.remaining().len());
        self.advance_bytes(len)
    }

    /// Source text between `self` and a later cursor over the same input.
    pub fn slice_to(&self, end: &Cursor<'src>) -> &'src str {
        &self.source[self.byte..end.byte.max(self.byte)]
    }

    pub fn span_to(&self, end: &Cursor<'src>) -> Span {
        Span::new(self.position, end.position)
    }
}

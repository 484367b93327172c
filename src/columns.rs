//! Column cursor used to pick a `LIST` line apart.
//!
//! Listing lines mix fixed-width columns (the permission block) with
//! whitespace separated ones (link count, owner, group, size) and a date
//! group that itself contains spaces. `Columns` walks a line left to right
//! with a handful of primitives so that each step of the line grammar is one
//! call.

/// Character offset at which the separator search for the date group starts.
///
/// A date group is `Mmm dd  yyyy` or `Mmm dd hh:mm`: month, day and
/// year-or-time, with the day possibly space padded. Its first eight columns
/// always hold the month, the day and the separators around it, so the first
/// space found at or after this offset is the one ending the group and the
/// spaces inside it are skipped.
pub const DATE_COLUMN_OFFSET: usize = 8;

/// A cursor over the unread part of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns<'a> {
    rest: &'a str,
}

impl<'a> Columns<'a> {
    pub fn new(line: &'a str) -> Columns<'a> {
        Columns { rest: line }
    }

    /// Takes exactly `width` characters, or `None` if fewer are left.
    /// The cursor is not moved on failure.
    pub fn take_width(&mut self, width: usize) -> Option<&'a str> {
        let end = char_boundary(self.rest, width)?;
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        Some(head)
    }

    /// Drops exactly `width` characters, or returns `None` if fewer are left.
    pub fn skip(&mut self, width: usize) -> Option<()> {
        self.take_width(width).map(|_| ())
    }

    /// Strips whitespace from both ends of the unread part.
    pub fn trim(&mut self) {
        self.rest = self.rest.trim();
    }

    /// Cuts the next token off the line.
    ///
    /// The first `delim` at character offset `from` or later ends the token.
    /// Without such a delimiter the whole unread part is the token. The
    /// remainder after the delimiter is trimmed.
    pub fn cut(&mut self, delim: char, from: usize) -> &'a str {
        let pos = self.rest
            .char_indices()
            .skip(from)
            .find(|&(_, c)| c == delim)
            .map_or(self.rest.len(), |(i, _)| i);
        let (token, tail) = self.rest.split_at(pos);
        self.rest = tail.trim();
        token
    }

    /// Everything not consumed yet.
    pub fn rest(&self) -> &'a str {
        self.rest
    }

    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }
}

// Byte index just after the first `count` characters of `s`.
fn char_boundary(s: &str, count: usize) -> Option<usize> {
    if count == 0 {
        return Some(0);
    }
    s.char_indices().nth(count - 1).map(|(i, c)| i + c.len_utf8())
}

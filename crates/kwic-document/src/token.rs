//! Whitespace tokenization with position mapping.
//!
//! Matching works on two coordinate systems at once: byte offsets into the
//! original content (for substring scans) and word indices (for token scans
//! and context windows). [`TokenizedText`] records the byte range of every
//! token so either coordinate can be derived from the other without
//! re-splitting. A document is tokenized once and the result is shared by
//! every keyword configuration that scans it.

use std::ops::Range;

/// Byte range of one token in its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

/// A document's content split on whitespace runs, with byte offsets.
///
/// Tokens are maximal runs of non-whitespace characters. No punctuation
/// handling or case folding happens here; the optional preprocessing stage
/// owns that.
#[derive(Debug, Clone)]
pub struct TokenizedText<'a> {
    /// The source text the spans index into.
    content: &'a str,
    /// Token byte ranges, in order.
    spans: Vec<Span>,
}

impl<'a> TokenizedText<'a> {
    /// Tokenizes the given content.
    pub fn new(content: &'a str) -> Self {
        let mut spans = Vec::new();
        let mut start = None;

        for (offset, c) in content.char_indices() {
            if c.is_whitespace() {
                if let Some(begin) = start.take() {
                    spans.push(Span {
                        start: begin,
                        end: offset,
                    });
                }
            } else if start.is_none() {
                start = Some(offset);
            }
        }
        if let Some(begin) = start {
            spans.push(Span {
                start: begin,
                end: content.len(),
            });
        }

        Self { content, spans }
    }

    /// Returns the source text.
    pub fn content(&self) -> &'a str {
        self.content
    }

    /// Returns the number of tokens.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns true if the content has no tokens.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Returns the token at `index`.
    ///
    /// Panics if `index` is out of bounds.
    pub fn token(&self, index: usize) -> &'a str {
        let span = self.spans[index];
        &self.content[span.start..span.end]
    }

    /// Returns the byte range of the token at `index`.
    ///
    /// Panics if `index` is out of bounds.
    pub fn span(&self, index: usize) -> Span {
        self.spans[index]
    }

    /// Iterates over all tokens in order.
    pub fn tokens(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.spans
            .iter()
            .map(|span| &self.content[span.start..span.end])
    }

    /// Maps a byte position to the index of the containing token, or the
    /// nearest preceding token when the position falls on whitespace.
    ///
    /// Returns 0 when there are no tokens or the position precedes them all.
    pub fn word_index_at(&self, byte_pos: usize) -> usize {
        self.spans
            .partition_point(|span| span.start <= byte_pos)
            .saturating_sub(1)
    }

    /// Joins the tokens in `range` with single spaces.
    ///
    /// The range is clamped to the token count. Original token text is used;
    /// runs of whitespace between tokens collapse to one space.
    pub fn window_text(&self, range: Range<usize>) -> String {
        let start = range.start.min(self.spans.len());
        let end = range.end.min(self.spans.len());
        let mut out = String::new();
        for index in start..end {
            if index > start {
                out.push(' ');
            }
            out.push_str(self.token(index));
        }
        out
    }

    /// Returns the original content slice from the start of `first_token`
    /// through the end of `last_token`, inter-token whitespace included.
    ///
    /// Panics if either index is out of bounds or the order is reversed.
    pub fn text_between(&self, first_token: usize, last_token: usize) -> &'a str {
        let start = self.spans[first_token].start;
        let end = self.spans[last_token].end;
        &self.content[start..end]
    }
}

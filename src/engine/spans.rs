//! Char/line position bookkeeping.
//!
//! When a span is split, each produced segment needs an absolute char span
//! and line span consistent with the whole document: monotonically
//! increasing, contiguous, no gaps. [`SpanCursor`] walks segments in order
//! and hands out those positions.
//!
//! Line accounting: a segment ending in `'\n'` ends on the line that newline
//! terminates, and the next segment starts on the following line. A segment
//! ending mid-line shares its last line with the next segment's first line.

use crate::{CharSpan, LineSpan};

pub(crate) struct SpanCursor {
    char_pos: usize,
    line_pos: usize,
}

impl SpanCursor {
    pub(crate) fn new(char_start: usize, line_start: usize) -> Self {
        SpanCursor { char_pos: char_start, line_pos: line_start }
    }

    /// Consume `text` (non-empty) and return its absolute spans.
    pub(crate) fn take(&mut self, text: &str) -> (CharSpan, LineSpan) {
        debug_assert!(!text.is_empty());
        let char_span = CharSpan::new(self.char_pos, self.char_pos + text.len() - 1);

        let newlines = text.bytes().filter(|&b| b == b'\n').count();
        let ends_with_newline = text.ends_with('\n');
        let line_end = self.line_pos + newlines - usize::from(ends_with_newline);
        let line_span = LineSpan::new(self.line_pos, line_end);

        self.char_pos = char_span.end + 1;
        self.line_pos = line_end + usize::from(ends_with_newline);
        (char_span, line_span)
    }
}

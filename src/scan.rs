//! Batch scanner: recognizes separator lines while tracking quote and
//! comment state.

use log::debug;
use memchr::{memchr, memchr2};
use std::fmt;

use crate::cont::flatten_continuations;


/// Quote/comment state at the current scan position. Exactly one holds;
/// rebuilt fresh for each scan, nothing persists across calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Code,
    SingleQuote,
    LineComment,
    BlockComment,
}

/// ASCII case-insensitive prefix match: each letter pair is compared
/// ignoring case, any other byte must match exactly. No locale, no Unicode
/// folding.
pub fn has_prefix_fold(data: &[u8], prefix: &[u8]) -> bool {
    data.len() >= prefix.len() && data[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Split `sql` into executable batches on `separator` lines.
///
/// The separator (conventionally `"go"`, matched case-insensitively) ends a
/// batch only when it starts a line in plain code, outside any string
/// literal or comment, and is not a prefix of a longer identifier. A repeat
/// count after the word emits the preceding batch that many times. Backslash
/// line-continuations are removed before scanning.
///
/// An empty `separator` disables splitting: the whole (normalized) text is
/// returned as a single batch, or no batch at all when it is empty. Empty
/// batch bodies are never returned. This function is total; malformed input
/// (unterminated literals or comments) ends up verbatim in the last batch.
pub fn split(sql: &str, separator: &str) -> Vec<String> {
    let text = flatten_continuations(sql);
    Scanner::new(&text, separator).map(str::to_owned).collect()
}

/// Streaming batch scanner over continuation-normalized text.
///
/// Steps through the batches of `text`, yielding each body in source order;
/// a batch with a repeat count is yielded that many times. Input must
/// already be free of line continuations (see
/// [`flatten_continuations`](crate::flatten_continuations)); [`split`] does
/// both passes in one call.
pub struct Scanner<'input> {
    text: &'input str,
    separator: &'input str,
    state: State,
    /// byte offset of the scan position
    pos: usize,
    /// byte offset where the current batch began
    batch_start: usize,
    /// whether `pos` is at the start of a line
    line_start: bool,
    /// remaining repeats of the last yielded body
    repeat: usize,
    repeat_body: &'input str,
    done: bool,
}

impl<'input> Scanner<'input> {
    /// Create a scanner over `text`, splitting on `separator`.
    /// An empty `separator` disables splitting.
    pub fn new(text: &'input str, separator: &'input str) -> Scanner<'input> {
        Scanner {
            text,
            separator,
            state: State::Code,
            pos: 0,
            batch_start: 0,
            line_start: true,
            repeat: 0,
            repeat_body: "",
            done: false,
        }
    }

    /// The separator this scanner splits on.
    pub fn separator(&self) -> &str {
        self.separator
    }

    /// Reset the scanner such that it behaves as if it had never been used.
    pub fn reset(&mut self, text: &'input str) {
        self.text = text;
        self.state = State::Code;
        self.pos = 0;
        self.batch_start = 0;
        self.line_start = true;
        self.repeat = 0;
        self.repeat_body = "";
        self.done = false;
    }

    /// Close the current batch at `pos`, which sits on a separator line
    /// start. Returns the body and positions the scanner on the line
    /// terminator of the separator line (the terminator opens the next
    /// batch).
    fn end_batch(&mut self) -> (&'input str, usize) {
        let data = self.text.as_bytes();
        let body = &self.text[self.batch_start..self.pos];
        let (count, next) = separator_line(data, self.pos + self.separator.len());
        debug!(target: "scanner", "separator at {} (count: {})", self.pos, count);
        self.pos = next;
        self.batch_start = next;
        (body, count)
    }
}

impl<'input> Iterator for Scanner<'input> {
    type Item = &'input str;

    fn next(&mut self) -> Option<&'input str> {
        if self.repeat > 0 {
            self.repeat -= 1;
            return Some(self.repeat_body);
        }
        let data = self.text.as_bytes();
        loop {
            if self.pos >= data.len() {
                if self.done {
                    return None;
                }
                // close the final batch whatever state we are left in
                self.done = true;
                let body = &self.text[self.batch_start..];
                return if body.is_empty() { None } else { Some(body) };
            }
            match self.state {
                State::Code => {
                    if self.line_start
                        && !self.separator.is_empty()
                        && has_prefix_fold(&data[self.pos..], self.separator.as_bytes())
                        && ends_word(data.get(self.pos + self.separator.len()).copied())
                    {
                        let (body, count) = self.end_batch();
                        if body.is_empty() {
                            continue;
                        }
                        self.repeat = count - 1;
                        self.repeat_body = body;
                        return Some(body);
                    }
                    match data[self.pos] {
                        b'\'' => {
                            self.state = State::SingleQuote;
                            self.pos += 1;
                            self.line_start = false;
                        }
                        b'-' if data.get(self.pos + 1) == Some(&b'-') => {
                            self.state = State::LineComment;
                            self.pos += 2;
                            self.line_start = false;
                        }
                        b'/' if data.get(self.pos + 1) == Some(&b'*') => {
                            self.state = State::BlockComment;
                            self.pos += 2;
                            self.line_start = false;
                        }
                        b'\n' | b'\r' => {
                            self.pos += 1;
                            self.line_start = true;
                        }
                        _ => {
                            self.pos += 1;
                            self.line_start = false;
                        }
                    }
                }
                State::SingleQuote => match memchr(b'\'', &data[self.pos..]) {
                    Some(off) => {
                        let quote = self.pos + off;
                        if data.get(quote + 1) == Some(&b'\'') {
                            // escaped quote, still inside the literal
                            self.pos = quote + 2;
                        } else {
                            self.pos = quote + 1;
                            self.state = State::Code;
                            self.line_start = false;
                        }
                    }
                    // unterminated literal: the rest belongs to the last batch
                    None => self.pos = data.len(),
                },
                State::LineComment => match memchr2(b'\n', b'\r', &data[self.pos..]) {
                    // leave the terminator to `Code` so it still marks a line start
                    Some(off) => {
                        self.pos += off;
                        self.state = State::Code;
                    }
                    None => self.pos = data.len(),
                },
                State::BlockComment => match comment_end(&data[self.pos..]) {
                    Some(off) => {
                        self.pos += off;
                        self.state = State::Code;
                        self.line_start = false;
                    }
                    None => self.pos = data.len(),
                },
            }
        }
    }
}

impl fmt::Debug for Scanner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("separator", &self.separator)
            .field("state", &self.state)
            .field("pos", &self.pos)
            .field("batch_start", &self.batch_start)
            .finish()
    }
}

/// A separator is a word, not a prefix of a longer identifier: it must be
/// followed by whitespace, a digit (the repeat count) or the end of input.
fn ends_word(b: Option<u8>) -> bool {
    match b {
        None => true,
        Some(b) => b.is_ascii_whitespace() || b.is_ascii_digit(),
    }
}

/// Parse the tail of a separator line, starting just past the separator
/// word: optional whitespace, an optional decimal repeat count, then
/// everything up to (but not including) the line terminator. Returns the
/// count and the offset of the terminator (or end of input). A count that
/// is absent, zero or does not fit in `usize` falls back to 1.
fn separator_line(data: &[u8], mut i: usize) -> (usize, usize) {
    while data.get(i) == Some(&b' ') || data.get(i) == Some(&b'\t') {
        i += 1;
    }
    let digits = i;
    while data.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let count = if i > digits {
        std::str::from_utf8(&data[digits..i])
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(1)
    } else {
        1
    };
    let next = match memchr2(b'\n', b'\r', &data[i..]) {
        Some(off) => i + off,
        None => data.len(),
    };
    (count, next)
}

/// Offset just past the closing `*/`, or `None` when the comment never ends.
fn comment_end(data: &[u8]) -> Option<usize> {
    let mut i = 0;
    while let Some(off) = memchr(b'*', &data[i..]) {
        let star = i + off;
        match data.get(star + 1) {
            Some(b'/') => return Some(star + 2),
            Some(_) => i = star + 1,
            None => return None,
        }
    }
    None
}

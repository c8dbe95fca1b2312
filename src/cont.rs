//! Backslash line-continuation removal.

use memchr::memchr;
use std::borrow::Cow;

/// Remove every backslash directly followed by a line terminator, joining
/// the escaped line break. A line terminator is `\r\n`, `\n` or `\r`, with
/// the two-byte form matched first so no stray `\n` is left behind.
///
/// Borrows the input when it contains no continuation.
pub fn flatten_continuations(text: &str) -> Cow<'_, str> {
    let data = text.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0; // bytes of `text` already pushed into `out`
    let mut i = 0;
    while let Some(off) = memchr(b'\\', &data[i..]) {
        let bs = i + off;
        let skip = match data.get(bs + 1) {
            Some(b'\r') if data.get(bs + 2) == Some(&b'\n') => 3,
            Some(b'\r') | Some(b'\n') => 2,
            _ => 0,
        };
        if skip == 0 {
            // ordinary backslash
            i = bs + 1;
            continue;
        }
        let buf = out.get_or_insert_with(|| String::with_capacity(text.len()));
        buf.push_str(&text[copied..bs]);
        i = bs + skip;
        copied = i;
    }
    match out {
        Some(mut buf) => {
            buf.push_str(&text[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(text),
    }
}

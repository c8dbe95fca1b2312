//! SQL batch splitter.
//!
//! Splits a block of SQL source text into executable batches, delimited by a
//! separator word (conventionally `GO`) standing alone on its own line,
//! optionally followed by a repeat count. The scanner tracks quote and
//! comment state so that a separator word inside a string literal or a
//! comment never ends a batch, and backslash line-continuations are removed
//! before scanning.
//!
//! ```
//! let batches = sql_batch::split("use DB\ngo\nselect 1\n", "go");
//! assert_eq!(batches, vec!["use DB\n", "\nselect 1\n"]);
//! ```
#![warn(missing_docs)]

mod cont;
mod scan;

pub use cont::flatten_continuations;
pub use scan::{has_prefix_fold, split, Scanner};

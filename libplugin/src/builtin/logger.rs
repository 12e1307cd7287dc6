use std::borrow::Cow;
use std::io::{self, Write};

use crate::{Transform, TransformError, END_OF_STREAM};

/// Logs every item that passes through, unchanged.
///
/// Writes `[logger] <item>` followed by a newline to stdout, flushed,
/// including for the empty item. The input always passes through without
/// allocation; the sentinel produces no output at all.
pub struct Logger;

impl Transform for Logger {
    fn apply<'a>(&self, input: &'a str) -> Result<Cow<'a, str>, TransformError> {
        if input == END_OF_STREAM {
            return Ok(Cow::Borrowed(input));
        }

        let mut out = io::stdout().lock();
        let _ = writeln!(out, "[logger] {input}");
        let _ = out.flush();

        Ok(Cow::Borrowed(input))
    }
}

use std::borrow::Cow;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crate::{Transform, TransformError, END_OF_STREAM};

/// The pause between emitted characters.
const KEY_DELAY: Duration = Duration::from_millis(100);

/// Prints every item with a typewriter effect, unchanged.
///
/// Emits `[typewriter] ` and then the item to stdout one character at a
/// time, flushing and sleeping 100 ms after each character; the trailing
/// newline is written without a delay. The input always passes through
/// without allocation; the sentinel produces no output at all.
pub struct Typewriter;

impl Transform for Typewriter {
    fn apply<'a>(&self, input: &'a str) -> Result<Cow<'a, str>, TransformError> {
        if input == END_OF_STREAM {
            return Ok(Cow::Borrowed(input));
        }

        for ch in "[typewriter] ".chars().chain(input.chars()) {
            let _ = write!(io::stdout(), "{ch}");
            let _ = io::stdout().flush();
            thread::sleep(KEY_DELAY);
        }
        let _ = writeln!(io::stdout());
        let _ = io::stdout().flush();

        Ok(Cow::Borrowed(input))
    }
}

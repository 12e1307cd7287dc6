use std::borrow::Cow;

use crate::{Transform, TransformError, END_OF_STREAM};

/// Rotates the input right by one: the last character moves to the front.
///
/// Empty and single-character inputs are no-ops and pass through.
pub struct Rotator;

impl Transform for Rotator {
    fn apply<'a>(&self, input: &'a str) -> Result<Cow<'a, str>, TransformError> {
        if input == END_OF_STREAM || input.chars().nth(1).is_none() {
            return Ok(Cow::Borrowed(input));
        }
        match input.char_indices().last() {
            Some((index, last)) => {
                let mut out = String::with_capacity(input.len());
                out.push(last);
                out.push_str(&input[..index]);
                Ok(Cow::Owned(out))
            }
            None => Ok(Cow::Borrowed(input)),
        }
    }
}

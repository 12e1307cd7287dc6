use std::borrow::Cow;

use crate::{Transform, TransformError, END_OF_STREAM};

/// Reverses the order of the input's characters.
///
/// Empty and single-character inputs are no-ops and pass through.
pub struct Flipper;

impl Transform for Flipper {
    fn apply<'a>(&self, input: &'a str) -> Result<Cow<'a, str>, TransformError> {
        if input == END_OF_STREAM || input.chars().nth(1).is_none() {
            return Ok(Cow::Borrowed(input));
        }
        Ok(Cow::Owned(input.chars().rev().collect()))
    }
}

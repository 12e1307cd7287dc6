use std::borrow::Cow;

use crate::{Transform, TransformError, END_OF_STREAM};

/// Maps every ASCII letter of the input to its uppercase form.
///
/// The empty string is a no-op and passes through unallocated; any other
/// input yields a fresh copy, even when it is already uppercase.
pub struct Uppercaser;

impl Transform for Uppercaser {
    fn apply<'a>(&self, input: &'a str) -> Result<Cow<'a, str>, TransformError> {
        if input == END_OF_STREAM || input.is_empty() {
            return Ok(Cow::Borrowed(input));
        }
        Ok(Cow::Owned(input.to_ascii_uppercase()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn uppercases_ascii() {
        let out = Uppercaser.apply("hello").unwrap();
        assert_eq!(out, "HELLO");
        assert!(matches!(out, Cow::Owned(_)));
    }

    #[test]
    fn allocates_even_when_already_uppercase() {
        let out = Uppercaser.apply("HELLO").unwrap();
        assert_eq!(out, "HELLO");
        assert!(matches!(out, Cow::Owned(_)));
    }

    #[test]
    fn idempotent() {
        let once = Uppercaser.apply("mIxEd 123!").unwrap().into_owned();
        let twice = Uppercaser.apply(&once).unwrap();
        assert_eq!(once, *twice);
    }

    #[test]
    fn empty_passes_through() {
        assert!(matches!(
            Uppercaser.apply("").unwrap(),
            Cow::Borrowed("")
        ));
    }

    #[test]
    fn sentinel_untouched() {
        assert!(matches!(
            Uppercaser.apply(END_OF_STREAM).unwrap(),
            Cow::Borrowed(END_OF_STREAM)
        ));
    }

    #[test]
    fn non_ascii_left_alone() {
        assert_eq!(Uppercaser.apply("año").unwrap(), "AñO");
    }
}

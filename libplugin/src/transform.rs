use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::{self, Display};

/// A pure transformation applied by a plugin to each non-sentinel item.
///
/// The return value distinguishes the two ownership outcomes the consumer
/// relies on:
///
/// - [`Cow::Borrowed`] is a *passthrough*: the output is the input, no new
///   allocation was made. No-op cases (empty input, single character where
///   the operation is idempotent) and the [`END_OF_STREAM`](crate::END_OF_STREAM)
///   sentinel must take this path.
/// - [`Cow::Owned`] is a *mutation*: a freshly allocated string owned by
///   the caller.
///
/// A failed transform returns [`TransformError`]; the consumer logs it and
/// drops the item without forwarding anything downstream.
///
/// Transforms must not perform any observable side effect for the sentinel.
pub trait Transform: Send + Sync {
    /// Applies the transformation to `input`.
    fn apply<'a>(&self, input: &'a str) -> Result<Cow<'a, str>, TransformError>;
}

/// The failure of a single transform application.
#[derive(Debug)]
pub struct TransformError(String);

impl TransformError {
    /// Creates an error carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for TransformError {}

//! The built-in reference plugins.
//!
//! Each type here implements [`Transform`] with the passthrough rules the
//! consumer relies on: the sentinel and no-op inputs come back
//! [`Borrowed`](std::borrow::Cow::Borrowed), everything else is a fresh
//! allocation.

mod expander;
mod flipper;
mod logger;
mod rotator;
mod typewriter;
mod uppercaser;

pub use expander::Expander;
pub use flipper::Flipper;
pub use logger::Logger;
pub use rotator::Rotator;
pub use typewriter::Typewriter;
pub use uppercaser::Uppercaser;

use crate::Transform;
use std::sync::Arc;

/// Looks a built-in plugin up by the name the command line uses.
pub fn by_name(name: &str) -> Option<Arc<dyn Transform>> {
    match name {
        "uppercaser" => Some(Arc::new(Uppercaser)),
        "rotator" => Some(Arc::new(Rotator)),
        "flipper" => Some(Arc::new(Flipper)),
        "expander" => Some(Arc::new(Expander)),
        "logger" => Some(Arc::new(Logger)),
        "typewriter" => Some(Arc::new(Typewriter)),
        _ => None,
    }
}

/// The built-in plugin names, in the order the usage text lists them.
pub const NAMES: [&str; 6] = [
    "logger",
    "typewriter",
    "uppercaser",
    "rotator",
    "flipper",
    "expander",
];

//! Byte streams used as message bodies.
//!
//! A [`Stream`] wraps an in-memory buffer, a file, or a write only sink behind
//! a shared handle. Which operations are allowed is decided by its
//! [`OpenMode`], parsed from an fopen style mode string.

mod mode;
#[allow(clippy::module_inception, reason = "the handle type lives next to its mode parser")]
mod stream;

pub use mode::OpenMode;
pub use stream::{Resource, Stream, StreamMetadata};

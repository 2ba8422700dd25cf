//! Immutable URI value and its collaborators.
//!
//! - [`Uri`]: parsed, normalized URI with copy-producing `with_*` updates
//! - [`SchemeRegistry`]: the standard-port table deciding supported schemes and port folding
//! - [`is_valid_hostname`]: hostname syntax check used by [`Uri::with_host`]
//!
//! Parsing follows the generic syntax of [RFC 3986]. Values are never partially
//! built: `parse` and every `with_*` either return a complete valid `Uri` or an error.
//!
//! [RFC 3986]: <https://www.rfc-editor.org/rfc/rfc3986>

mod host;
mod parser;
mod scheme;
#[allow(clippy::module_inception, reason = "the value type lives in its own file next to its collaborators")]
mod uri;

pub use host::is_valid_hostname;
pub use scheme::SchemeRegistry;
pub use uri::Uri;

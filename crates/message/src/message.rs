//! State and behavior shared by requests and responses.
//!
//! Every message carries a [`MessageHead`]: the protocol version, the
//! [`Headers`] and the body [`Stream`]. The [`HttpMessage`] trait exposes it
//! through getters and copy-producing `with_*` methods, so each message type
//! only has to say where its head lives.

use http::Version;

use crate::error::InvalidArgument;
use crate::header::Headers;
use crate::stream::Stream;

/// Parses a protocol version as written after `HTTP/`.
///
/// Only `1.0`, `1.1` and `2` are accepted.
pub fn parse_protocol_version(version: &str) -> Result<Version, InvalidArgument> {
    match version {
        "1.0" => Ok(Version::HTTP_10),
        "1.1" => Ok(Version::HTTP_11),
        "2" => Ok(Version::HTTP_2),
        _ => Err(InvalidArgument::invalid_protocol_version(version)),
    }
}

/// Returns the textual form of a version produced by [`parse_protocol_version`].
pub fn protocol_version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

/// The parts common to every HTTP message.
#[derive(Debug, Clone, Default)]
pub struct MessageHead {
    pub(crate) version: Version,
    pub(crate) headers: Headers,
    pub(crate) body: Stream,
}

impl MessageHead {
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &Stream {
        &self.body
    }
}

/// An immutable HTTP message.
///
/// Implementors provide access to their [`MessageHead`]; every other method is
/// derived from it. The `with_*` methods never modify `self`, they return an
/// updated copy. The copy shares the body stream with the original.
pub trait HttpMessage: Clone {
    fn head(&self) -> &MessageHead;

    fn head_mut(&mut self) -> &mut MessageHead;

    /// Returns the protocol version as an [`http::Version`].
    fn version(&self) -> Version {
        self.head().version
    }

    /// Returns the protocol version as a string, such as `"1.1"`.
    fn protocol_version(&self) -> &'static str {
        protocol_version_str(self.head().version)
    }

    fn headers(&self) -> &Headers {
        &self.head().headers
    }

    /// Checks if a header exists by the given case-insensitive name.
    fn has_header(&self, name: &str) -> bool {
        self.head().headers.contains(name)
    }

    /// Returns all values of a header, or an empty slice if it does not exist.
    fn header(&self, name: &str) -> &[String] {
        self.head().headers.get(name)
    }

    /// Returns the comma separated values of a header, or an empty string if it does not exist.
    fn header_line(&self, name: &str) -> String {
        self.head().headers.get_line(name)
    }

    fn body(&self) -> &Stream {
        &self.head().body
    }

    /// Returns a copy with the given protocol version (`1.0`, `1.1` or `2`).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::InvalidProtocolVersion`] for any other version.
    fn with_protocol_version(&self, version: &str) -> Result<Self, InvalidArgument> {
        let version = parse_protocol_version(version)?;
        let mut new = self.clone();
        new.head_mut().version = version;
        Ok(new)
    }

    /// Returns a copy where the header is replaced by `values`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::InvalidHeaderName`] or [`InvalidArgument::InvalidHeaderValue`].
    fn with_header<I, V>(&self, name: &str, values: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let headers = self.head().headers.with(name, values)?;
        let mut new = self.clone();
        new.head_mut().headers = headers;
        Ok(new)
    }

    /// Returns a copy where `values` are appended to the header.
    ///
    /// # Errors
    ///
    /// Same as [`HttpMessage::with_header`].
    fn with_added_header<I, V>(&self, name: &str, values: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let headers = self.head().headers.with_added(name, values)?;
        let mut new = self.clone();
        new.head_mut().headers = headers;
        Ok(new)
    }

    /// Returns a copy without the header.
    fn without_header(&self, name: &str) -> Self {
        let mut new = self.clone();
        new.head_mut().headers = self.head().headers.without(name);
        new
    }

    /// Returns a copy with a new body.
    fn with_body(&self, body: impl Into<Stream>) -> Self {
        let mut new = self.clone();
        new.head_mut().body = body.into();
        new
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Message {
        head: MessageHead,
    }

    impl HttpMessage for Message {
        fn head(&self) -> &MessageHead {
            &self.head
        }

        fn head_mut(&mut self) -> &mut MessageHead {
            &mut self.head
        }
    }

    #[test]
    fn defaults() {
        let message = Message::default();
        assert_eq!(message.protocol_version(), "1.1");
        assert_eq!(message.version(), Version::HTTP_11);
        assert!(message.headers().is_empty());
        assert_eq!(message.body().size(), 0);
    }

    #[test]
    fn protocol_versions() {
        let message = Message::default();
        for version in ["1.0", "1.1", "2"] {
            assert_eq!(message.with_protocol_version(version).unwrap().protocol_version(), version);
        }
        assert_eq!(message.with_protocol_version("2").unwrap().version(), Version::HTTP_2);

        for version in ["1.2", "2.0", "HTTP/1.1", ""] {
            let err = message.with_protocol_version(version).unwrap_err();
            assert_eq!(err, InvalidArgument::InvalidProtocolVersion { version: version.into() });
        }
        assert_eq!(message.protocol_version(), "1.1");
    }

    #[test]
    fn header_updates_are_copies() {
        let message = Message::default();
        let with = message.with_header("x-foo", ["Foo"]).unwrap();
        let added = with.with_added_header("X-FOO", ["Bar"]).unwrap();
        let without = added.without_header("x-Foo");

        assert!(!message.has_header("X-Foo"));
        assert_eq!(with.header("X-Foo"), ["Foo"]);
        assert_eq!(added.header_line("x-foo"), "Foo, Bar");
        assert!(!without.has_header("X-Foo"));
        assert!(added.has_header("X-Foo"));
    }

    #[test]
    fn reject_invalid_header() {
        let message = Message::default();
        assert!(matches!(message.with_header("bad name", ["x"]).unwrap_err(), InvalidArgument::InvalidHeaderName { .. }));
        assert!(matches!(message.with_added_header("X-Ok", ["bad\nvalue"]).unwrap_err(), InvalidArgument::InvalidHeaderValue { .. }));
    }

    #[test]
    fn with_body_keeps_original() {
        let message = Message::default();
        let other = message.with_body("hello");
        assert_eq!(other.body().to_string(), "hello");
        assert_eq!(message.body().size(), 0);
    }

    #[test]
    fn copies_share_body() {
        let message = Message::default().with_body("");
        let copy = message.with_header("X-Foo", ["Foo"]).unwrap();
        copy.body().write(b"shared").unwrap();
        assert_eq!(message.body().to_string(), "shared");
    }
}

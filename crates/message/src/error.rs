use std::io;
use thiserror::Error;

/// Top-level error of the crate, wrapping every failure kind a message
/// operation can produce.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("parse error: {source}")]
    Parse {
        #[from]
        source: ParseError,
    },

    #[error("invalid argument: {source}")]
    InvalidArgument {
        #[from]
        source: InvalidArgument,
    },

    #[error("stream error: {source}")]
    Stream {
        #[from]
        source: StreamError,
    },
}

/// Raised only while constructing a value from its textual form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("bad uri provided: {uri:?}")]
    BadUri { uri: String },
}

impl ParseError {
    pub fn bad_uri<S: ToString>(uri: S) -> Self {
        Self::BadUri { uri: uri.to_string() }
    }
}

/// Raised by a `with_*` call (or a constructor) whose argument violates the
/// constraint of the field it targets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidArgument {
    #[error("invalid or unsupported scheme: {scheme:?}")]
    UnsupportedScheme { scheme: String },

    #[error("invalid host: {host:?}")]
    InvalidHostname { host: String },

    #[error("invalid port {port}, must be in 0..=65535")]
    PortOutOfRange { port: u32 },

    #[error("invalid path {path:?}; must not contain a query string")]
    PathContainsQuery { path: String },

    #[error("invalid path {path:?}; must not contain a uri fragment")]
    PathContainsFragment { path: String },

    #[error("query string {query:?} must not include a uri fragment")]
    QueryContainsFragment { query: String },

    #[error("invalid http protocol version {version:?}, must be 1.0, 1.1 or 2")]
    InvalidProtocolVersion { version: String },

    #[error("invalid http method: {method:?}")]
    InvalidMethod { method: String },

    #[error("invalid status code: {code}")]
    InvalidStatusCode { code: u16 },

    #[error("invalid reason phrase: {reason:?}")]
    InvalidReasonPhrase { reason: String },

    #[error("invalid header name: {name:?}")]
    InvalidHeaderName { name: String },

    #[error("invalid value for header {name:?}")]
    InvalidHeaderValue { name: String },

    #[error("invalid query params: {reason}")]
    InvalidQueryParams { reason: String },

    #[error("invalid scheme registry: {reason}")]
    InvalidSchemeRegistry { reason: String },
}

impl InvalidArgument {
    pub fn unsupported_scheme<S: ToString>(scheme: S) -> Self {
        Self::UnsupportedScheme { scheme: scheme.to_string() }
    }

    pub fn invalid_hostname<S: ToString>(host: S) -> Self {
        Self::InvalidHostname { host: host.to_string() }
    }

    pub fn invalid_method<S: ToString>(method: S) -> Self {
        Self::InvalidMethod { method: method.to_string() }
    }

    pub fn invalid_protocol_version<S: ToString>(version: S) -> Self {
        Self::InvalidProtocolVersion { version: version.to_string() }
    }

    pub fn invalid_reason_phrase<S: ToString>(reason: S) -> Self {
        Self::InvalidReasonPhrase { reason: reason.to_string() }
    }

    pub fn invalid_header_name<S: ToString>(name: S) -> Self {
        Self::InvalidHeaderName { name: name.to_string() }
    }

    pub fn invalid_header_value<S: ToString>(name: S) -> Self {
        Self::InvalidHeaderValue { name: name.to_string() }
    }

    pub fn invalid_query_params<S: ToString>(reason: S) -> Self {
        Self::InvalidQueryParams { reason: reason.to_string() }
    }

    pub fn invalid_scheme_registry<S: ToString>(reason: S) -> Self {
        Self::InvalidSchemeRegistry { reason: reason.to_string() }
    }
}

/// Failures of [`Stream`](crate::stream::Stream) operations.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("invalid stream identifier provided: {identifier:?}")]
    InvalidIdentifier { identifier: String },

    #[error("invalid stream mode: {mode:?}")]
    InvalidMode { mode: String },

    #[error("resource not available")]
    ResourceNotAvailable,

    #[error("can not {action} the stream")]
    NotSeekable { action: &'static str },

    #[error("stream is not readable")]
    NotReadable,

    #[error("stream is not writable")]
    NotWritable,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl StreamError {
    pub fn invalid_identifier<S: ToString>(identifier: S) -> Self {
        Self::InvalidIdentifier { identifier: identifier.to_string() }
    }

    pub fn invalid_mode<S: ToString>(mode: S) -> Self {
        Self::InvalidMode { mode: mode.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::Stream;
    use crate::uri::Uri;

    fn rewrite_host(uri: &str, host: &str) -> Result<String, MessageError> {
        let uri = Uri::parse(uri)?.with_host(host)?;
        let body = Stream::from_bytes(uri.to_string());
        Ok(String::from_utf8_lossy(&body.contents()?).into_owned())
    }

    #[test]
    fn converts_into_message_error() {
        assert_eq!(rewrite_host("http://a.com/x", "b.com").unwrap(), "http://b.com/x");

        let err = rewrite_host("http:///x", "b.com").unwrap_err();
        assert!(matches!(err, MessageError::Parse { source: ParseError::BadUri { .. } }));

        let err = rewrite_host("http://a.com/x", "bad?host").unwrap_err();
        assert!(matches!(err, MessageError::InvalidArgument { source: InvalidArgument::InvalidHostname { .. } }));
        assert_eq!(err.to_string(), r#"invalid argument: invalid host: "bad?host""#);
    }

    #[test]
    fn stream_errors_display() {
        assert_eq!(StreamError::NotSeekable { action: "rewind" }.to_string(), "can not rewind the stream");
        assert_eq!(StreamError::invalid_mode("q").to_string(), r#"invalid stream mode: "q""#);

        let err = MessageError::from(StreamError::ResourceNotAvailable);
        assert_eq!(err.to_string(), "stream error: resource not available");
    }
}

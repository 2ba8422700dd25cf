//! Outgoing, client side HTTP request.
//!
//! A [`Request`] is made of a method, a [`Uri`] and the common [`MessageHead`].
//! Like every value in this crate it is immutable: the `with_*` methods return
//! an updated copy.
//!
//! The `Host` header follows the URI: it is seeded from the URI host on
//! construction, and replaced by [`Request::with_uri`] unless the caller asks to
//! preserve an existing one.

use http::Method;
use tracing::debug;

use crate::error::InvalidArgument;
use crate::message::{HttpMessage, MessageHead, parse_protocol_version};
use crate::stream::Stream;
use crate::uri::Uri;

/// Methods a request may carry. Anything else is rejected.
const ALLOWED_METHODS: [&str; 10] = ["GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "PURGE", "OPTIONS", "TRACE", "CONNECT"];

/// Uppercases and validates a method name.
pub fn parse_method(method: &str) -> Result<Method, InvalidArgument> {
    let upper = method.to_ascii_uppercase();
    if !ALLOWED_METHODS.contains(&upper.as_str()) {
        debug!(method, "rejected http method");
        return Err(InvalidArgument::invalid_method(method));
    }
    Method::from_bytes(upper.as_bytes()).map_err(|e| {
        debug!(method, error = %e, "rejected http method");
        InvalidArgument::invalid_method(method)
    })
}

/// Builds the `Host` header value for a URI: `host[:port]`, the port omitted when
/// absent or one of the web standard ports.
fn host_header(uri: &Uri) -> String {
    match uri.port() {
        Some(port) if port != 80 && port != 443 => format!("{}:{port}", uri.host()),
        _ => uri.host().to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) head: MessageHead,
    method: Method,
    uri: Uri,
    target: Option<String>,
}

impl Default for Request {
    /// A `GET` request for the empty URI.
    fn default() -> Self {
        Self { head: MessageHead::default(), method: Method::GET, uri: Uri::default(), target: None }
    }
}

impl Request {
    /// Creates a request, seeding the `Host` header from `uri` when it has a host.
    ///
    /// ```
    /// use micro_message::message::HttpMessage;
    /// use micro_message::request::Request;
    /// use micro_message::uri::Uri;
    ///
    /// let uri = Uri::parse("http://example.com:8080/path?q=1").unwrap();
    /// let request = Request::new("get", uri).unwrap();
    /// assert_eq!(request.method(), "GET");
    /// assert_eq!(request.header_line("host"), "example.com:8080");
    /// assert_eq!(request.request_target(), "/path?q=1");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::InvalidMethod`] if the method is not allowed.
    pub fn new(method: &str, uri: Uri) -> Result<Self, InvalidArgument> {
        let method = parse_method(method)?;
        let mut head = MessageHead::default();
        if !uri.host().is_empty() {
            head.headers = head.headers.with("Host", [host_header(&uri)])?;
        }
        Ok(Self { head, method, uri, target: None })
    }

    /// Starts building a `GET` request for the empty URI.
    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns a copy with another method; the name is uppercased before validation.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::InvalidMethod`] if the method is not allowed.
    pub fn with_method(&self, method: &str) -> Result<Self, InvalidArgument> {
        let method = parse_method(method)?;
        Ok(Self { method, ..self.clone() })
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns a copy targeting `uri`.
    ///
    /// The `Host` header is replaced by the host of the new URI, unless
    /// `preserve_host` is set and a `Host` header already exists, or the new
    /// URI has no host.
    pub fn with_uri(&self, uri: Uri, preserve_host: bool) -> Self {
        let mut new = self.clone();
        if !(preserve_host && self.has_header("Host")) && !uri.host().is_empty() {
            // a host and a port of a parsed uri are always valid header text
            if let Ok(headers) = new.head.headers.with("Host", [host_header(&uri)]) {
                new.head.headers = headers;
            }
        }
        new.uri = uri;
        new
    }

    /// Returns the request target: the explicit one if set, else the origin
    /// form `path[?query]` of the URI, else `/`.
    pub fn request_target(&self) -> String {
        if let Some(target) = self.target.as_deref().filter(|target| !target.is_empty()) {
            return target.to_string();
        }

        let mut target = self.uri.path().to_string();
        if !self.uri.query().is_empty() {
            target.push('?');
            target.push_str(self.uri.query());
        }
        if target.is_empty() {
            target.push('/');
        }
        target
    }

    /// Returns a copy with an explicit request target, such as `*` or an absolute form.
    pub fn with_request_target(&self, target: &str) -> Self {
        Self { target: Some(target.to_string()), ..self.clone() }
    }
}

impl HttpMessage for Request {
    fn head(&self) -> &MessageHead {
        &self.head
    }

    fn head_mut(&mut self) -> &mut MessageHead {
        &mut self.head
    }
}

/// Builder for [`Request`], collecting the first error and reporting it from [`RequestBuilder::build`].
///
/// ```
/// use micro_message::message::HttpMessage;
/// use micro_message::request::Request;
/// use micro_message::uri::Uri;
///
/// let request = Request::builder()
///     .method("post")
///     .uri(Uri::parse("https://example.com/api").unwrap())
///     .header("Content-Type", "application/json")
///     .body(r#"{"id":1}"#)
///     .build()
///     .unwrap();
/// assert_eq!(request.method(), "POST");
/// assert_eq!(request.header_line("host"), "example.com");
/// assert_eq!(request.body().to_string(), r#"{"id":1}"#);
/// ```
#[derive(Debug)]
pub struct RequestBuilder {
    inner: Result<Request, InvalidArgument>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self { inner: Ok(Request::default()) }
    }

    fn and_then<F>(self, f: F) -> Self
    where
        F: FnOnce(Request) -> Result<Request, InvalidArgument>,
    {
        Self { inner: self.inner.and_then(f) }
    }

    pub fn method(self, method: &str) -> Self {
        self.and_then(|request| request.with_method(method))
    }

    /// Sets the URI, seeding the `Host` header from it.
    pub fn uri(self, uri: Uri) -> Self {
        self.and_then(|request| Ok(request.with_uri(uri, false)))
    }

    /// Sets the protocol version: `1.0`, `1.1` or `2`.
    pub fn version(self, version: &str) -> Self {
        self.and_then(|mut request| {
            request.head.version = parse_protocol_version(version)?;
            Ok(request)
        })
    }

    /// Appends a value to a header.
    pub fn header(self, name: &str, value: impl Into<String>) -> Self {
        self.and_then(|request| request.with_added_header(name, [value]))
    }

    pub fn body(self, body: impl Into<Stream>) -> Self {
        self.and_then(|request| Ok(request.with_body(body)))
    }

    /// Returns the built request, or the first error met while building it.
    pub fn build(self) -> Result<Request, InvalidArgument> {
        self.inner
    }
}

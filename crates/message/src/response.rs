//! Outgoing, server side HTTP response.

use http::{HeaderValue, StatusCode};
use tracing::debug;

use crate::error::InvalidArgument;
use crate::message::{HttpMessage, MessageHead, parse_protocol_version};
use crate::status::registered_status;
use crate::stream::Stream;

/// An immutable response: a registered status code, its reason phrase and the
/// common [`MessageHead`].
#[derive(Debug, Clone)]
pub struct Response {
    head: MessageHead,
    status: StatusCode,
    reason: String,
}

impl Default for Response {
    /// An empty `200 OK` response.
    fn default() -> Self {
        Self { head: MessageHead::default(), status: StatusCode::OK, reason: "OK".into() }
    }
}

impl Response {
    /// Creates a response with the default reason phrase of `code`.
    ///
    /// ```
    /// use micro_message::response::Response;
    ///
    /// let response = Response::new(404).unwrap();
    /// assert_eq!(response.status_code(), 404);
    /// assert_eq!(response.reason_phrase(), "Not Found");
    /// assert!(Response::new(499).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::InvalidStatusCode`] if the code is not registered.
    pub fn new(code: u16) -> Result<Self, InvalidArgument> {
        Self::default().with_status(code, "")
    }

    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn reason_phrase(&self) -> &str {
        &self.reason
    }

    /// Returns a copy with another status. An empty `reason` selects the default phrase of the code.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::InvalidStatusCode`] if the code is not registered, or
    /// [`InvalidArgument::InvalidReasonPhrase`] if `reason` holds a control character
    /// other than a tab.
    pub fn with_status(&self, code: u16, reason: &str) -> Result<Self, InvalidArgument> {
        let (status, default_reason) = registered_status(code)?;
        let reason = if reason.is_empty() {
            default_reason
        } else {
            // a status line obeys the same character rules as a header value
            HeaderValue::from_str(reason).map_err(|e| {
                debug!(code, reason, error = %e, "rejected reason phrase");
                InvalidArgument::invalid_reason_phrase(reason)
            })?;
            reason
        };
        Ok(Self { status, reason: reason.to_string(), ..self.clone() })
    }
}

impl HttpMessage for Response {
    fn head(&self) -> &MessageHead {
        &self.head
    }

    fn head_mut(&mut self) -> &mut MessageHead {
        &mut self.head
    }
}

/// Builder for [`Response`], collecting the first error and reporting it from [`ResponseBuilder::build`].
#[derive(Debug)]
pub struct ResponseBuilder {
    inner: Result<Response, InvalidArgument>,
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self { inner: Ok(Response::default()) }
    }

    fn and_then<F>(self, f: F) -> Self
    where
        F: FnOnce(Response) -> Result<Response, InvalidArgument>,
    {
        Self { inner: self.inner.and_then(f) }
    }

    /// Sets the status code with its default reason phrase.
    pub fn status(self, code: u16) -> Self {
        self.and_then(|response| response.with_status(code, ""))
    }

    /// Sets the status code with a custom reason phrase.
    pub fn status_with_reason(self, code: u16, reason: &str) -> Self {
        self.and_then(|response| response.with_status(code, reason))
    }

    pub fn version(self, version: &str) -> Self {
        self.and_then(|mut response| {
            response.head.version = parse_protocol_version(version)?;
            Ok(response)
        })
    }

    /// Appends a value to a header.
    pub fn header(self, name: &str, value: impl Into<String>) -> Self {
        self.and_then(|response| response.with_added_header(name, [value]))
    }

    pub fn body(self, body: impl Into<Stream>) -> Self {
        self.and_then(|response| Ok(response.with_body(body)))
    }

    pub fn build(self) -> Result<Response, InvalidArgument> {
        self.inner
    }
}

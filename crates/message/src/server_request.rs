//! Incoming, server side HTTP request.
//!
//! A [`ServerRequest`] is a [`Request`] plus what a server derives from its
//! environment: server params, cookies, decoded query params, a parsed body and
//! free-form attributes that handlers attach while routing.

use std::collections::BTreeMap;

use http::Method;
use serde_json::Value;
use tracing::debug;

use crate::error::InvalidArgument;
use crate::message::{HttpMessage, MessageHead};
use crate::request::Request;
use crate::uri::Uri;

/// String keyed parameters such as server params, cookies or the query.
pub type Params = BTreeMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct ServerRequest {
    request: Request,
    server_params: Params,
    cookie_params: Params,
    query_params: Params,
    parsed_body: Option<Value>,
    attributes: BTreeMap<String, Value>,
}

impl From<Request> for ServerRequest {
    fn from(request: Request) -> Self {
        Self { request, ..Self::default() }
    }
}

impl ServerRequest {
    /// Creates a server request; see [`Request::new`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::InvalidMethod`] if the method is not allowed.
    pub fn new(method: &str, uri: Uri) -> Result<Self, InvalidArgument> {
        Request::new(method, uri).map(Self::from)
    }

    /// Returns the underlying request.
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn into_request(self) -> Request {
        self.request
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    pub fn request_target(&self) -> String {
        self.request.request_target()
    }

    /// # Errors
    ///
    /// Returns [`InvalidArgument::InvalidMethod`] if the method is not allowed.
    pub fn with_method(&self, method: &str) -> Result<Self, InvalidArgument> {
        let request = self.request.with_method(method)?;
        Ok(Self { request, ..self.clone() })
    }

    /// See [`Request::with_uri`]. Query params are left untouched.
    pub fn with_uri(&self, uri: Uri, preserve_host: bool) -> Self {
        Self { request: self.request.with_uri(uri, preserve_host), ..self.clone() }
    }

    pub fn with_request_target(&self, target: &str) -> Self {
        Self { request: self.request.with_request_target(target), ..self.clone() }
    }

    pub fn server_params(&self) -> &Params {
        &self.server_params
    }

    pub fn with_server_params(&self, params: Params) -> Self {
        Self { server_params: params, ..self.clone() }
    }

    pub fn cookie_params(&self) -> &Params {
        &self.cookie_params
    }

    pub fn with_cookie_params(&self, cookies: Params) -> Self {
        Self { cookie_params: cookies, ..self.clone() }
    }

    pub fn query_params(&self) -> &Params {
        &self.query_params
    }

    /// Returns a copy with the given query params. The URI is not updated.
    pub fn with_query_params(&self, query: Params) -> Self {
        Self { query_params: query, ..self.clone() }
    }

    /// Returns a copy whose query params are decoded from the query of the URI.
    ///
    /// Keys and values are percent-decoded, `+` decodes to a space, and the last
    /// of several values for one key wins.
    ///
    /// ```
    /// use micro_message::server_request::ServerRequest;
    /// use micro_message::uri::Uri;
    ///
    /// let uri = Uri::parse("http://example.com/search?q=rust+lang&page=2").unwrap();
    /// let request = ServerRequest::new("GET", uri).unwrap().with_query_params_from_uri().unwrap();
    /// assert_eq!(request.query_params()["q"], "rust lang");
    /// assert_eq!(request.query_params()["page"], "2");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::InvalidQueryParams`] if the query can not be decoded.
    pub fn with_query_params_from_uri(&self) -> Result<Self, InvalidArgument> {
        let query = self.request.uri().query();
        let params = serde_urlencoded::from_str::<Params>(query).map_err(|e| {
            debug!(query, error = %e, "unable to decode query params");
            InvalidArgument::invalid_query_params(e)
        })?;
        Ok(self.with_query_params(params))
    }

    /// Returns the deserialized body, if a parser provided one.
    pub fn parsed_body(&self) -> Option<&Value> {
        self.parsed_body.as_ref()
    }

    /// Returns a copy carrying `data` as the parsed body; `None` clears it.
    pub fn with_parsed_body(&self, data: Option<Value>) -> Self {
        Self { parsed_body: data, ..self.clone() }
    }

    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns the attribute, or `default` if it is not set.
    pub fn attribute_or(&self, name: &str, default: Value) -> Value {
        self.attributes.get(name).cloned().unwrap_or(default)
    }

    pub fn with_attribute(&self, name: &str, value: impl Into<Value>) -> Self {
        let mut new = self.clone();
        new.attributes.insert(name.to_string(), value.into());
        new
    }

    pub fn without_attribute(&self, name: &str) -> Self {
        let mut new = self.clone();
        new.attributes.remove(name);
        new
    }
}

impl HttpMessage for ServerRequest {
    fn head(&self) -> &MessageHead {
        &self.request.head
    }

    fn head_mut(&mut self) -> &mut MessageHead {
        &mut self.request.head
    }
}

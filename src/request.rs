//! The request sent to a token endpoint.
use std::collections::BTreeMap;
use std::fmt;

use http::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use url::Url;

/// Additional parameters appended to the body of a token request.
///
/// A sorted map keeps the body identical for identical inputs.
pub type ExtraParams = BTreeMap<String, String>;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";
pub const JSON_ACCEPT: &str = "application/json";

/// A fully built token request.
///
/// Once built the request can not be altered. It is consumed by the
/// `Transport` that sends it.
#[derive(Clone, PartialEq)]
pub struct TokenRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: String,
}

impl TokenRequest {
    /// Creates a `POST` request to `url` with a form encoded `body`.
    ///
    /// `Content-Type` and `Accept` are always set. `authorization`
    /// becomes the `Authorization` header if given. Requests for a grant
    /// are usually built with `GrantStrategy::build_request`. This is
    /// for everything else, e.g. testing a `Transport`.
    pub fn new(url: Url, authorization: Option<HeaderValue>, body: String) -> TokenRequest {
        let mut headers = HeaderMap::with_capacity(3);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_ACCEPT));
        if let Some(authorization) = authorization {
            headers.insert(AUTHORIZATION, authorization);
        }
        TokenRequest {
            method: Method::POST,
            url,
            headers,
            body,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The value of the header `name` if it is present and visible ASCII.
    pub fn header<K>(&self, name: K) -> Option<&str>
    where
        K: Into<HeaderName>,
    {
        self.headers
            .get(name.into())
            .and_then(|v| v.to_str().ok())
    }

    /// The `application/x-www-form-urlencoded` body.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_parts(self) -> (Method, Url, HeaderMap, String) {
        (self.method, self.url, self.headers, self.body)
    }
}

// The body holds the password and the headers may hold the client secret.
impl fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.keys().map(HeaderName::as_str).collect();
        f.debug_struct("TokenRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &header_names)
            .field("body_len", &self.body.len())
            .finish()
    }
}

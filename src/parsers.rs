//! Parsing of token endpoint responses.
use std::fmt;
use std::str;
use std::time::Duration;

use json::object::{Iter, Object};
use json::JsonValue;

use crate::error::{AuthorizationRequestError, AuthorizationServerErrorCode};

/// A parser that turns the raw body of a token endpoint response
/// into a `TokenPayload`.
pub trait ResponseParser {
    fn parse(&self, bytes: &[u8]) -> ::std::result::Result<TokenPayload, String>;
}

impl<F> ResponseParser for F
where
    F: Fn(&[u8]) -> ::std::result::Result<TokenPayload, String>,
{
    fn parse(&self, bytes: &[u8]) -> ::std::result::Result<TokenPayload, String> {
        self(bytes)
    }
}

/// Parses the body as a JSON object.
///
/// Any JSON object is accepted, including an empty one. Checking for
/// an `access_token` is left to the consumer of the payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTokenResponseParser;

impl ResponseParser for JsonTokenResponseParser {
    fn parse(&self, bytes: &[u8]) -> ::std::result::Result<TokenPayload, String> {
        TokenPayload::parse(bytes)
    }
}

/// The JSON object an authorization server returned from its
/// token endpoint.
///
/// See [RFC6749 sec. 5.1](https://tools.ietf.org/html/rfc6749#section-5.1)
#[derive(Clone, PartialEq)]
pub struct TokenPayload(Object);

impl TokenPayload {
    pub fn new(object: Object) -> TokenPayload {
        TokenPayload(object)
    }

    pub fn parse(bytes: &[u8]) -> ::std::result::Result<TokenPayload, String> {
        let json_utf8 = str::from_utf8(bytes).map_err(|err| err.to_string())?;
        match json::parse(json_utf8).map_err(|err| err.to_string())? {
            JsonValue::Object(data) => Ok(TokenPayload(data)),
            other => Err(format!(
                "Token response is not a JSON object but {}",
                json_kind(&other)
            )),
        }
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(JsonValue::as_str)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.get_str("access_token")
    }

    pub fn token_type(&self) -> Option<&str> {
        self.get_str("token_type")
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.get_str("refresh_token")
    }

    pub fn scope(&self) -> Option<&str> {
        self.get_str("scope")
    }

    /// Some servers send `expires_in` as a string, so both forms are read.
    pub fn expires_in(&self) -> Option<Duration> {
        match self.0.get("expires_in") {
            Some(v @ &JsonValue::Number(_)) => v.as_u64().map(Duration::from_secs),
            Some(v) => v
                .as_str()
                .and_then(|s| s.trim().parse().ok())
                .map(Duration::from_secs),
            None => None,
        }
    }

    /// The error described in
    /// [RFC6749 sec. 5.2](https://tools.ietf.org/html/rfc6749#section-5.2)
    /// if the payload carries one.
    pub fn oauth_error(&self) -> Option<AuthorizationRequestError> {
        let error = self.get_str("error")?;
        Some(AuthorizationRequestError {
            error: AuthorizationServerErrorCode::from(error),
            error_description: self.get_str("error_description").map(Into::into),
            error_uri: self.get_str("error_uri").map(Into::into),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> Iter<'_> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Object {
        self.0
    }
}

impl Default for TokenPayload {
    fn default() -> TokenPayload {
        TokenPayload(Object::new())
    }
}

impl From<Object> for TokenPayload {
    fn from(object: Object) -> TokenPayload {
        TokenPayload(object)
    }
}

// Tokens must not end up in logs through `{:?}`.
impl fmt::Debug for TokenPayload {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let keys: Vec<&str> = self.0.iter().map(|(k, _)| k).collect();
        f.debug_struct("TokenPayload").field("keys", &keys).finish()
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match *value {
        JsonValue::Null => "null",
        JsonValue::Short(_) | JsonValue::String(_) => "a string",
        JsonValue::Number(_) => "a number",
        JsonValue::Boolean(_) => "a boolean",
        JsonValue::Object(_) => "an object",
        JsonValue::Array(_) => "an array",
    }
}

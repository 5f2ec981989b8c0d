//! Form encoding and HTTP Basic credentials.
use base64::prelude::*;
use http::header::HeaderValue;
use url::form_urlencoded::byte_serialize;

use crate::error::{GrantErrorKind, GrantResult};

/// Encodes `s` as `application/x-www-form-urlencoded`.
///
/// Spaces become `+`, everything except alphanumerics and `*-._` is
/// percent encoded.
pub fn form_encode(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}

/// Creates the value of an `Authorization` header for HTTP Basic
/// authentication of a client.
///
/// Client id and secret are form encoded before being joined by a colon
/// as required by [RFC6749 sec. 2.3.1](https://tools.ietf.org/html/rfc6749#section-2.3.1).
pub fn basic_authorization(client_id: &str, client_secret: &str) -> GrantResult<HeaderValue> {
    let credentials = format!("{}:{}", form_encode(client_id), form_encode(client_secret));
    let header = format!("Basic {}", BASE64_STANDARD.encode(credentials.as_bytes()));
    let mut value = HeaderValue::from_str(&header)
        .map_err(|err| GrantErrorKind::Encoding(err.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

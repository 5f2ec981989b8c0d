//! The resource owner password credentials grant.
//!
//! See [RFC6749 sec. 4.3](https://tools.ietf.org/html/rfc6749#section-4.3)
use crate::config::{AuthConfig, ClientIdentity, EndpointConfig};
use crate::credentials::Credentials;
use crate::error::{GrantErrorKind, GrantResult};
use crate::request::{ExtraParams, TokenRequest};

use super::{build_token_request, GrantStrategy};

pub const GRANT_TYPE: &str = "password";

/// Obtains an access token in exchange for the username and
/// password of the resource owner.
#[derive(Debug, Clone)]
pub struct PasswordGrant {
    credentials: Credentials,
}

impl PasswordGrant {
    pub fn new(credentials: Credentials) -> PasswordGrant {
        PasswordGrant { credentials }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl GrantStrategy for PasswordGrant {
    fn grant_type(&self) -> &'static str {
        GRANT_TYPE
    }

    fn grant_parameters(&self) -> GrantResult<Vec<(&'static str, &str)>> {
        password_parameters(&self.credentials)
    }
}

/// Builds a password grant token request.
///
/// Username, password and client id are checked in this order before
/// anything else happens.
pub fn build(
    credentials: &Credentials,
    client: &ClientIdentity,
    auth: &AuthConfig,
    endpoint: &EndpointConfig,
    extra: Option<&ExtraParams>,
) -> GrantResult<TokenRequest> {
    let parameters = password_parameters(credentials)?;
    build_token_request(GRANT_TYPE, &parameters, client, auth, endpoint, extra)
}

fn password_parameters(credentials: &Credentials) -> GrantResult<Vec<(&'static str, &str)>> {
    if credentials.username.is_empty() {
        return Err(GrantErrorKind::MissingUsername.into());
    }
    if credentials.password.is_empty() {
        return Err(GrantErrorKind::MissingPassword.into());
    }
    Ok(vec![
        ("username", credentials.username.as_str()),
        ("password", credentials.password.as_str()),
    ])
}

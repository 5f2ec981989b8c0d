//! See [RFC6749 sec. 4.1.3](https://tools.ietf.org/html/rfc6749#section-4.1.3)
use crate::error::GrantResult;

use super::{required, GrantStrategy};

/// Exchanges an authorization code received via redirect for an access token.
#[derive(Debug, Clone)]
pub struct AuthorizationCodeGrant {
    code: String,
    redirect_uri: Option<String>,
}

impl AuthorizationCodeGrant {
    pub fn new<T: Into<String>>(code: T) -> AuthorizationCodeGrant {
        AuthorizationCodeGrant {
            code: code.into(),
            redirect_uri: None,
        }
    }

    /// Must be identical to the redirect URI of the authorization request.
    pub fn with_redirect_uri<T: Into<String>>(mut self, redirect_uri: T) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }
}

impl GrantStrategy for AuthorizationCodeGrant {
    fn grant_type(&self) -> &'static str {
        "authorization_code"
    }

    fn grant_parameters(&self) -> GrantResult<Vec<(&'static str, &str)>> {
        let mut parameters = vec![required("code", &self.code)?];
        if let Some(ref redirect_uri) = self.redirect_uri {
            parameters.push(("redirect_uri", redirect_uri.as_str()));
        }
        Ok(parameters)
    }
}

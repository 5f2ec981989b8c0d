//! See [RFC6749 sec. 4.4](https://tools.ietf.org/html/rfc6749#section-4.4)
use crate::error::GrantResult;

use super::GrantStrategy;

/// Obtains an access token for the client itself.
///
/// Only the client authenticates, so the client should have a secret.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientCredentialsGrant;

impl GrantStrategy for ClientCredentialsGrant {
    fn grant_type(&self) -> &'static str {
        "client_credentials"
    }

    fn grant_parameters(&self) -> GrantResult<Vec<(&'static str, &str)>> {
        Ok(Vec::new())
    }
}

//! Building token requests for the different grant types.
//!
//! Every grant type contributes its own fields to the request body while
//! scope, extra parameters and client authentication are handled the
//! same way for all of them.
//!
//! See [RFC6749 sec. 4](https://tools.ietf.org/html/rfc6749#section-4)
use http::header::HeaderValue;
use url::form_urlencoded;

use crate::config::{AuthConfig, ClientIdentity, EndpointConfig};
use crate::encoding::basic_authorization;
use crate::error::{GrantErrorKind, GrantResult};
use crate::request::{ExtraParams, TokenRequest};

mod authorization_code;
mod client_credentials;
pub mod password;
mod refresh_token;

pub use self::authorization_code::AuthorizationCodeGrant;
pub use self::client_credentials::ClientCredentialsGrant;
pub use self::password::PasswordGrant;
pub use self::refresh_token::RefreshTokenGrant;

/// A way of obtaining an access token from a token endpoint.
pub trait GrantStrategy {
    /// The value of the `grant_type` body field.
    fn grant_type(&self) -> &'static str;

    /// The validated grant specific body fields in the order they are sent.
    ///
    /// Fails if a field the grant requires is missing. No request may
    /// be built in that case.
    fn grant_parameters(&self) -> GrantResult<Vec<(&'static str, &str)>>;

    /// Builds the token request for this grant.
    fn build_request(
        &self,
        client: &ClientIdentity,
        auth: &AuthConfig,
        endpoint: &EndpointConfig,
        extra: Option<&ExtraParams>,
    ) -> GrantResult<TokenRequest> {
        let parameters = self.grant_parameters()?;
        build_token_request(
            self.grant_type(),
            &parameters,
            client,
            auth,
            endpoint,
            extra,
        )
    }
}

impl<'a, G: GrantStrategy + ?Sized> GrantStrategy for &'a G {
    fn grant_type(&self) -> &'static str {
        (**self).grant_type()
    }

    fn grant_parameters(&self) -> GrantResult<Vec<(&'static str, &str)>> {
        (**self).grant_parameters()
    }
}

impl<G: GrantStrategy + ?Sized> GrantStrategy for Box<G> {
    fn grant_type(&self) -> &'static str {
        (**self).grant_type()
    }

    fn grant_parameters(&self) -> GrantResult<Vec<(&'static str, &str)>> {
        (**self).grant_parameters()
    }
}

/// How the client proves its identity to the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientAuthMethod<'a> {
    /// `client_id` and `client_secret` are sent in the body.
    ClientSecretPost(&'a str),
    /// `client_id` and `client_secret` are sent in an
    /// `Authorization: Basic` header.
    ClientSecretBasic(&'a str),
    /// A public client without a secret. Nothing is added.
    Public,
}

impl<'a> ClientAuthMethod<'a> {
    pub fn select(client: &'a ClientIdentity, auth: &AuthConfig) -> ClientAuthMethod<'a> {
        match client.client_secret {
            Some(ref secret) if auth.secret_in_body => ClientAuthMethod::ClientSecretPost(secret),
            Some(ref secret) => ClientAuthMethod::ClientSecretBasic(secret),
            None => ClientAuthMethod::Public,
        }
    }
}

/// Builds a token request from already validated grant parameters.
///
/// The body contains `grant_type`, the grant parameters, `scope`,
/// the extra parameters and finally the client credentials if they
/// go into the body. All values are form encoded.
pub fn build_token_request(
    grant_type: &str,
    grant_parameters: &[(&str, &str)],
    client: &ClientIdentity,
    auth: &AuthConfig,
    endpoint: &EndpointConfig,
    extra: Option<&ExtraParams>,
) -> GrantResult<TokenRequest> {
    if client.client_id.is_empty() {
        return Err(GrantErrorKind::MissingClientId.into());
    }

    let mut body = form_urlencoded::Serializer::new(String::new());
    body.append_pair("grant_type", grant_type);
    body.extend_pairs(grant_parameters);
    if let Some(ref scope) = endpoint.scope {
        body.append_pair("scope", scope);
    }
    if let Some(extra) = extra {
        body.extend_pairs(extra.iter());
    }

    let authorization: Option<HeaderValue> = match ClientAuthMethod::select(client, auth) {
        ClientAuthMethod::ClientSecretPost(secret) => {
            debug!("Adding 'client_id' and 'client_secret' to request body");
            body.append_pair("client_id", &client.client_id);
            body.append_pair("client_secret", secret);
            None
        }
        ClientAuthMethod::ClientSecretBasic(secret) => {
            debug!("Adding 'Authorization' header as 'Basic client-key:client-secret'");
            Some(basic_authorization(&client.client_id, secret)?)
        }
        ClientAuthMethod::Public => {
            debug!("Public client, no client authentication added");
            None
        }
    };

    Ok(TokenRequest::new(
        endpoint.token_endpoint().clone(),
        authorization,
        body.finish(),
    ))
}

/// Fails with `MissingGrantParameter` if `value` is empty.
pub(crate) fn required<'a>(
    name: &'static str,
    value: &'a str,
) -> GrantResult<(&'static str, &'a str)> {
    if value.is_empty() {
        Err(GrantErrorKind::MissingGrantParameter(name).into())
    } else {
        Ok((name, value))
    }
}

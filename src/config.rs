//! Read-only client configuration consumed when building token requests.
use std::fmt;

use url::Url;

use crate::shared::{optional_env_var, required_env_var};
use crate::{InitializationError, InitializationResult};

/// The identity of the registered client.
///
/// A client without a secret is a public client and is only
/// identified by its id.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub client_id: String,
    pub client_secret: Option<String>,
}

impl ClientIdentity {
    pub fn new<T: Into<String>>(client_id: T) -> ClientIdentity {
        ClientIdentity {
            client_id: client_id.into(),
            client_secret: None,
        }
    }

    pub fn with_secret<T: Into<String>, S: Into<String>>(
        client_id: T,
        client_secret: S,
    ) -> ClientIdentity {
        ClientIdentity {
            client_id: client_id.into(),
            client_secret: Some(client_secret.into()),
        }
    }

    /// Creates a new instance from environment variables.
    ///
    /// * '`PWGRANT_CLIENT_ID`'(mandatory): The id of the client
    /// * '`PWGRANT_CLIENT_SECRET`'(optional): The secret of the client.
    /// Omit for public clients.
    pub fn from_env() -> InitializationResult<ClientIdentity> {
        let client_id = required_env_var("PWGRANT_CLIENT_ID")?;
        let client_secret = optional_env_var("PWGRANT_CLIENT_SECRET")?;
        Ok(ClientIdentity {
            client_id,
            client_secret,
        })
    }

    pub fn is_public(&self) -> bool {
        self.client_secret.is_none()
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Selects how a client with a secret authenticates itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthConfig {
    /// If `true` client id and secret are sent as `client_id` and
    /// `client_secret` in the request body. Otherwise they are sent
    /// in an `Authorization: Basic` header.
    pub secret_in_body: bool,
}

impl AuthConfig {
    pub fn new(secret_in_body: bool) -> AuthConfig {
        AuthConfig { secret_in_body }
    }

    /// Creates a new instance from environment variables.
    ///
    /// * '`PWGRANT_SECRET_IN_BODY`'(optional): `true`, `false`, `1` or `0`.
    /// Defaults to `false`.
    pub fn from_env() -> InitializationResult<AuthConfig> {
        let secret_in_body = match optional_env_var("PWGRANT_SECRET_IN_BODY")? {
            Some(v) => parse_flag(&v).map_err(|err| {
                InitializationError(format!("'PWGRANT_SECRET_IN_BODY': {}", err))
            })?,
            None => false,
        };
        Ok(AuthConfig { secret_in_body })
    }
}

pub(crate) fn parse_flag(v: &str) -> InitializationResult<bool> {
    match v.trim() {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Ok(other.to_lowercase().parse()?),
    }
}

/// The endpoints of the authorization server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub authorize_url: Url,
    pub token_url: Option<Url>,
    /// Sent as `scope` if present.
    pub scope: Option<String>,
}

impl EndpointConfig {
    pub fn new(authorize_url: Url) -> EndpointConfig {
        EndpointConfig {
            authorize_url,
            token_url: None,
            scope: None,
        }
    }

    /// Parses the given URLs.
    pub fn parse(authorize_url: &str, token_url: Option<&str>) -> InitializationResult<Self> {
        let authorize_url = Url::parse(authorize_url)?;
        let token_url = match token_url {
            Some(url) => Some(Url::parse(url)?),
            None => None,
        };
        Ok(EndpointConfig {
            authorize_url,
            token_url,
            scope: None,
        })
    }

    pub fn with_token_url(mut self, token_url: Url) -> Self {
        self.token_url = Some(token_url);
        self
    }

    pub fn with_scope<T: Into<String>>(mut self, scope: T) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Creates a new instance from environment variables.
    ///
    /// * '`PWGRANT_AUTHORIZE_URL`'(mandatory): The authorize endpoint. Used
    /// as the token endpoint if no token endpoint is configured
    /// * '`PWGRANT_TOKEN_URL`'(optional): The token endpoint
    /// * '`PWGRANT_SCOPE`'(optional): The scope to request
    pub fn from_env() -> InitializationResult<EndpointConfig> {
        let authorize_url = required_env_var("PWGRANT_AUTHORIZE_URL")?;
        let token_url = optional_env_var("PWGRANT_TOKEN_URL")?;
        let scope = optional_env_var("PWGRANT_SCOPE")?;

        let mut config = EndpointConfig::parse(&authorize_url, token_url.as_ref().map(|s| &**s))?;
        config.scope = scope;
        Ok(config)
    }

    /// The URL token requests are sent to.
    ///
    /// Falls back to the authorize URL if no token URL is configured.
    pub fn token_endpoint(&self) -> &Url {
        self.token_url.as_ref().unwrap_or(&self.authorize_url)
    }
}

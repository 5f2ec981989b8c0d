//! All configuration of a password grant in one place.
use std::str;

use json::object::Object;
use json::JsonValue;
use url::Url;

use crate::config::{parse_flag, AuthConfig, ClientIdentity, EndpointConfig};
use crate::credentials::Credentials;
use crate::{InitializationError, InitializationResult};

/// Client identity, endpoints and resource owner credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantSettings {
    pub client: ClientIdentity,
    pub auth: AuthConfig,
    pub endpoint: EndpointConfig,
    pub credentials: Credentials,
}

impl GrantSettings {
    /// Reads the settings from a JSON object:
    ///
    /// ```javascript
    /// {
    ///    "client_id": "<id>",
    ///    "client_secret": "<secret>",
    ///    "authorize_uri": "https://auth.example.com/authorize",
    ///    "token_uri": "https://auth.example.com/token",
    ///    "scope": "profile email",
    ///    "secret_in_body": false,
    ///    "username": "<username>",
    ///    "password": "<password>"
    /// }
    /// ```
    ///
    /// `client_id` and `authorize_uri` are mandatory. Unknown fields are
    /// ignored. A missing `username` or `password` is left empty and
    /// reported when a request is built.
    pub fn from_json(bytes: &[u8]) -> InitializationResult<GrantSettings> {
        let json_utf8 = str::from_utf8(bytes).map_err(|err| InitializationError(err.to_string()))?;
        let data = match json::parse(json_utf8).map_err(|err| InitializationError(err.to_string()))? {
            JsonValue::Object(data) => data,
            _ => return Err(InitializationError::new("Settings are not a JSON object")),
        };

        let client_id = string_field(&data, "client_id")?
            .ok_or_else(|| InitializationError::new("'client_id' is missing"))?;
        let authorize_uri = string_field(&data, "authorize_uri")?
            .ok_or_else(|| InitializationError::new("'authorize_uri' is missing"))?;

        let token_url = match string_field(&data, "token_uri")? {
            Some(uri) => Some(Url::parse(&uri)?),
            None => None,
        };

        let secret_in_body = match data.get("secret_in_body") {
            None | Some(&JsonValue::Null) => false,
            Some(&JsonValue::Boolean(flag)) => flag,
            Some(value) => match value.as_str() {
                Some(flag) => parse_flag(flag)?,
                None => {
                    return Err(InitializationError::new(
                        "'secret_in_body' must be a boolean",
                    ))
                }
            },
        };

        Ok(GrantSettings {
            client: ClientIdentity {
                client_id,
                client_secret: string_field(&data, "client_secret")?,
            },
            auth: AuthConfig::new(secret_in_body),
            endpoint: EndpointConfig {
                authorize_url: Url::parse(&authorize_uri)?,
                token_url,
                scope: string_field(&data, "scope")?,
            },
            credentials: Credentials {
                username: string_field(&data, "username")?.unwrap_or_default(),
                password: string_field(&data, "password")?.unwrap_or_default(),
            },
        })
    }

    /// Reads the settings from environment variables.
    ///
    /// See `ClientIdentity::from_env`, `AuthConfig::from_env`,
    /// `EndpointConfig::from_env` and `Credentials::from_env`.
    pub fn from_env() -> InitializationResult<GrantSettings> {
        Ok(GrantSettings {
            client: ClientIdentity::from_env()?,
            auth: AuthConfig::from_env()?,
            endpoint: EndpointConfig::from_env()?,
            credentials: Credentials::from_env()?,
        })
    }
}

fn string_field(data: &Object, name: &str) -> InitializationResult<Option<String>> {
    match data.get(name) {
        None | Some(&JsonValue::Null) => Ok(None),
        Some(value) => match value.as_str() {
            Some(s) => Ok(Some(s.to_string())),
            None => Err(InitializationError(format!("'{}' must be a string", name))),
        },
    }
}

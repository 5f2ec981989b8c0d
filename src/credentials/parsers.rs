//! Parsers for credentials files, most likely JSON
use std::str;

use json::object::Object;
use json::JsonValue;

use super::*;

/// A parser for `ClientIdentity`
pub trait ClientIdentityParser {
    fn parse(&self, bytes: &[u8]) -> CredentialsResult<ClientIdentity>;
}

/// The default parser for `ClientIdentity`.
///
/// It parses the following JSON where `client_secret` is optional:
///
/// ```javascript
/// {
///    "client_id" : "<id>",
///    "client_secret" : "<secret>"
/// }
/// ```
pub struct DefaultClientIdentityParser;

impl ClientIdentityParser for DefaultClientIdentityParser {
    fn parse(&self, bytes: &[u8]) -> CredentialsResult<ClientIdentity> {
        parse_client_identity(bytes, "client_id", "client_secret")
    }
}

/// A parser for the `Credentials` of a resource owner
pub trait CredentialsParser {
    fn parse(&self, bytes: &[u8]) -> CredentialsResult<Credentials>;
}

/// The default parser for `Credentials`.
///
/// It parses the following JSON:
///
/// ```javascript
/// {
///    "username" : "<username>",
///    "password" : "<password>"
/// }
/// ```
pub struct DefaultCredentialsParser;

impl CredentialsParser for DefaultCredentialsParser {
    fn parse(&self, bytes: &[u8]) -> CredentialsResult<Credentials> {
        parse_credentials(bytes, "username", "password")
    }
}

/// A parser for `Credentials` where the resource owner is an application.
///
/// It parses the following JSON:
///
/// ```javascript
/// {
///    "application_username" : "<username>",
///    "application_password" : "<password>"
/// }
/// ```
pub struct ApplicationCredentialsParser;

impl CredentialsParser for ApplicationCredentialsParser {
    fn parse(&self, bytes: &[u8]) -> CredentialsResult<Credentials> {
        parse_credentials(bytes, "application_username", "application_password")
    }
}

pub fn parse_client_identity(
    bytes: &[u8],
    client_id_field_name: &str,
    client_secret_field_name: &str,
) -> CredentialsResult<ClientIdentity> {
    let data = parse_object(bytes)?;
    let client_id = required_string(&data, client_id_field_name)?;
    let client_secret = match data.get(client_secret_field_name) {
        None | Some(&JsonValue::Null) => None,
        Some(value) => Some(string_value(value, client_secret_field_name)?),
    };
    Ok(ClientIdentity {
        client_id,
        client_secret,
    })
}

pub fn parse_credentials(
    bytes: &[u8],
    username_field_name: &str,
    password_field_name: &str,
) -> CredentialsResult<Credentials> {
    let data = parse_object(bytes)?;
    let username = required_string(&data, username_field_name)?;
    let password = required_string(&data, password_field_name)?;
    Ok(Credentials { username, password })
}

fn parse_object(bytes: &[u8]) -> CredentialsResult<Object> {
    let json_utf8 = str::from_utf8(bytes).map_err(|err| CredentialsError::Parse(err.to_string()))?;
    match json::parse(json_utf8).map_err(|err| CredentialsError::Parse(err.to_string()))? {
        JsonValue::Object(data) => Ok(data),
        _ => Err(CredentialsError::Parse("Not a JSON object".to_string())),
    }
}

fn required_string(data: &Object, field_name: &str) -> CredentialsResult<String> {
    match data.get(field_name) {
        Some(value) => string_value(value, field_name),
        None => Err(CredentialsError::Parse(format!(
            "Field '{}' is missing",
            field_name
        ))),
    }
}

fn string_value(value: &JsonValue, field_name: &str) -> CredentialsResult<String> {
    match value.as_str() {
        Some(s) => Ok(s.to_string()),
        None => Err(CredentialsError::Parse(format!(
            "Expected a string in field '{}' but found something else",
            field_name
        ))),
    }
}

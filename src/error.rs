use std::fmt;
use std::str;

use failure::*;

use crate::parsers::TokenPayload;
use crate::transport::TransportError;

pub type GrantResult<T> = ::std::result::Result<T, GrantError>;

/// The outcome of a single token request.
///
/// `Ok` carries the payload the authorization server returned,
/// `Err` one of the failures described by `GrantErrorKind`.
pub type TokenResult = GrantResult<TokenPayload>;

/// The message used for every rejection with a status of 400 or above.
pub const REJECTED_MESSAGE: &str = "The username or password is incorrect";

#[derive(Debug)]
pub struct GrantError {
    inner: Context<GrantErrorKind>,
}

impl GrantError {
    pub fn kind(&self) -> &GrantErrorKind {
        self.inner.get_context()
    }

    /// Returns `true` if the error was raised by local validation
    /// before any request was sent.
    pub fn is_validation_error(&self) -> bool {
        use self::GrantErrorKind::*;
        match *self.kind() {
            MissingUsername | MissingPassword | MissingClientId | MissingGrantParameter(_) => {
                true
            }
            Encoding(_) | NoDataInResponse | ResponseParse(_) | Response { .. } | Transport(_) => {
                false
            }
        }
    }

    /// The payload the authorization server sent along with a rejection.
    pub fn payload(&self) -> Option<&TokenPayload> {
        match *self.kind() {
            GrantErrorKind::Response { ref payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    /// The RFC 6749 error the authorization server sent along with a rejection.
    pub fn oauth_error(&self) -> Option<&AuthorizationRequestError> {
        match *self.kind() {
            GrantErrorKind::Response {
                ref oauth_error, ..
            } => oauth_error.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn rejected(payload: TokenPayload) -> GrantError {
        let oauth_error = payload.oauth_error();
        GrantErrorKind::Response {
            message: REJECTED_MESSAGE.to_string(),
            payload: Some(payload),
            oauth_error,
        }
        .into()
    }
}

impl Fail for GrantError {
    fn cause(&self) -> Option<&dyn Fail> {
        self.inner.cause()
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        self.inner.backtrace()
    }
}

impl From<GrantErrorKind> for GrantError {
    fn from(kind: GrantErrorKind) -> GrantError {
        GrantError {
            inner: Context::new(kind),
        }
    }
}

impl From<Context<GrantErrorKind>> for GrantError {
    fn from(inner: Context<GrantErrorKind>) -> GrantError {
        GrantError { inner }
    }
}

impl From<TransportError> for GrantError {
    fn from(err: TransportError) -> GrantError {
        GrantErrorKind::Transport(err).into()
    }
}

impl fmt::Display for GrantError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

#[derive(Debug, Clone, PartialEq, Fail)]
pub enum GrantErrorKind {
    #[fail(display = "No username given")]
    MissingUsername,
    #[fail(display = "No password given")]
    MissingPassword,
    #[fail(display = "No client id given")]
    MissingClientId,
    /// A field a grant needs in its request body is missing or empty.
    #[fail(display = "Missing grant parameter '{}'", _0)]
    MissingGrantParameter(&'static str),
    /// The client credentials could not be turned into a `Basic`
    /// authorization header.
    #[fail(display = "Encoding error: {}", _0)]
    Encoding(String),
    /// The transport succeeded but delivered neither data nor an error.
    #[fail(display = "No data in response")]
    NoDataInResponse,
    #[fail(display = "Could not parse the token response: {}", _0)]
    ResponseParse(String),
    /// The authorization server answered with a status of 400 or above.
    #[fail(display = "{}", message)]
    Response {
        message: String,
        payload: Option<TokenPayload>,
        oauth_error: Option<AuthorizationRequestError>,
    },
    /// The error the transport reported, unmodified.
    #[fail(display = "{}", _0)]
    Transport(TransportError),
}

/// An error in detail returned by the authorization server.
///
/// See [RFC6749 sec. 5.2](https://tools.ietf.org/html/rfc6749#section-5.2)
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationRequestError {
    /// The error code returned from the authorization server
    pub error: AuthorizationServerErrorCode,
    /// Human-readable ASCII text providing additional information,
    /// used to assist the client developer in understanding the
    /// error that occurred.
    pub error_description: Option<String>,
    /// A URI identifying a human-readable web page with
    /// information about the error.
    pub error_uri: Option<String>,
}

impl fmt::Display for AuthorizationRequestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "The authorization server rejected the request with \"{}\".",
            self.error
        )?;
        if let Some(ref msg) = self.error_description {
            write!(f, " The message from the server is \"{}\".", msg)?;
        }
        if let Some(ref uri) = self.error_uri {
            write!(f, " You can find more information at \"{}\".", uri)?;
        }
        Ok(())
    }
}

/// The error code returned from the authorization server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationServerErrorCode {
    /// The request is missing a required parameter, includes an
    /// unsupported parameter value (other than grant type),
    /// repeats a parameter, includes multiple credentials,
    /// utilizes more than one mechanism for authenticating the
    /// client, or is otherwise malformed.
    InvalidRequest,
    /// Client authentication failed (e.g., unknown client, no
    /// client authentication included, or unsupported
    /// authentication method).
    InvalidClient,
    /// The provided authorization grant (e.g., authorization
    /// code, resource owner credentials) or refresh token is
    /// invalid, expired, revoked, does not match the redirection
    /// URI used in the authorization request, or was issued to
    /// another client.
    InvalidGrant,
    /// The authenticated client is not authorized to use this
    /// authorization grant type.
    UnauthorizedClient,
    /// The authorization grant type is not supported by the
    /// authorization server.
    UnsupportedGrantType,
    /// The requested scope is invalid, unknown, malformed, or
    /// exceeds the scope granted by the resource owner.
    InvalidScope,
    /// An extension error code.
    Other(String),
}

impl AuthorizationServerErrorCode {
    pub fn as_str(&self) -> &str {
        match *self {
            AuthorizationServerErrorCode::InvalidRequest => "invalid_request",
            AuthorizationServerErrorCode::InvalidClient => "invalid_client",
            AuthorizationServerErrorCode::InvalidGrant => "invalid_grant",
            AuthorizationServerErrorCode::UnauthorizedClient => "unauthorized_client",
            AuthorizationServerErrorCode::UnsupportedGrantType => "unsupported_grant_type",
            AuthorizationServerErrorCode::InvalidScope => "invalid_scope",
            AuthorizationServerErrorCode::Other(ref code) => code,
        }
    }
}

impl From<&str> for AuthorizationServerErrorCode {
    fn from(s: &str) -> Self {
        match s {
            "invalid_request" => AuthorizationServerErrorCode::InvalidRequest,
            "invalid_client" => AuthorizationServerErrorCode::InvalidClient,
            "invalid_grant" => AuthorizationServerErrorCode::InvalidGrant,
            "unauthorized_client" => AuthorizationServerErrorCode::UnauthorizedClient,
            "unsupported_grant_type" => AuthorizationServerErrorCode::UnsupportedGrantType,
            "invalid_scope" => AuthorizationServerErrorCode::InvalidScope,
            other => AuthorizationServerErrorCode::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AuthorizationServerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

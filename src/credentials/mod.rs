//! Credentials of the resource owner and where to get them from.
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::config::ClientIdentity;
use crate::shared::optional_env_var;
use crate::{InitializationError, InitializationResult};

mod errors;
pub mod parsers;

pub use self::errors::*;

use self::parsers::*;

/// Credentials of the resource owner
/// required for the access token request.
///
/// # [RFC6749 Sec. 1.3.3](https://tools.ietf.org/html/rfc6749#section-1.3.3)
///
/// The resource owner password credentials (i.e., username and password)
/// can be used directly as an authorization grant to obtain an access
/// token. The credentials should only be used when there is a high
/// degree of trust between the resource owner and the client.
///
/// Both fields must be non-empty for a request to be built. Emptiness is
/// not checked here but when the request is built.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    /// The resource owner username
    pub username: String,
    /// The resource owner password
    pub password: String,
}

impl Credentials {
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Credentials {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates new credentials from environment variables.
    ///
    /// * '`PWGRANT_USERNAME`': The username of the resource owner
    /// * '`PWGRANT_PASSWORD`': The password of the resource owner
    ///
    /// Missing variables result in empty fields.
    pub fn from_env() -> InitializationResult<Credentials> {
        Ok(Credentials {
            username: optional_env_var("PWGRANT_USERNAME")?.unwrap_or_default(),
            password: optional_env_var("PWGRANT_PASSWORD")?.unwrap_or_default(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything needed to authenticate both the client and
/// the resource owner.
#[derive(Debug, Clone)]
pub struct RequestTokenCredentials {
    pub client_identity: ClientIdentity,
    pub owner_credentials: Credentials,
}

pub trait CredentialsProvider {
    fn client_identity(&self) -> CredentialsResult<ClientIdentity>;
    fn owner_credentials(&self) -> CredentialsResult<Credentials>;

    fn credentials(&self) -> CredentialsResult<RequestTokenCredentials> {
        let client_identity = self.client_identity()?;
        let owner_credentials = self.owner_credentials()?;
        Ok(RequestTokenCredentials {
            client_identity,
            owner_credentials,
        })
    }
}

/// Provides credentials that are known upfront.
#[derive(Debug, Clone)]
pub struct StaticCredentialsProvider {
    client_identity: ClientIdentity,
    owner_credentials: Credentials,
}

impl StaticCredentialsProvider {
    pub fn new(client_identity: ClientIdentity, owner_credentials: Credentials) -> Self {
        StaticCredentialsProvider {
            client_identity,
            owner_credentials,
        }
    }
}

impl CredentialsProvider for StaticCredentialsProvider {
    fn client_identity(&self) -> CredentialsResult<ClientIdentity> {
        Ok(self.client_identity.clone())
    }

    fn owner_credentials(&self) -> CredentialsResult<Credentials> {
        Ok(self.owner_credentials.clone())
    }
}

/// Reads the credentials for the resource owner and the client
/// from two separate JSON files.
///
/// The files are read on every call so rotated credentials are picked up.
pub struct SplitFileCredentialsProvider {
    client_file_path: PathBuf,
    owner_file_path: PathBuf,
    client_parser: Box<dyn ClientIdentityParser + Send + Sync + 'static>,
    owner_parser: Box<dyn CredentialsParser + Send + Sync + 'static>,
}

impl SplitFileCredentialsProvider {
    pub fn new<C, O, CP, OP>(
        client_file_path: C,
        owner_file_path: O,
        client_parser: CP,
        owner_parser: OP,
    ) -> Self
    where
        C: Into<PathBuf>,
        O: Into<PathBuf>,
        CP: ClientIdentityParser + Send + Sync + 'static,
        OP: CredentialsParser + Send + Sync + 'static,
    {
        SplitFileCredentialsProvider {
            client_file_path: client_file_path.into(),
            owner_file_path: owner_file_path.into(),
            client_parser: Box::new(client_parser),
            owner_parser: Box::new(owner_parser),
        }
    }

    /// Creates a new instance for the given paths with default parsers.
    ///
    /// # Example files
    ///
    /// ## Client file:
    ///
    /// ```javascript
    /// {
    ///    "client_id" : "<id>",
    ///    "client_secret" : "<secret>"
    /// }
    /// ```
    ///
    /// `client_secret` may be omitted for public clients.
    ///
    /// ## Resource owner file:
    ///
    /// ```javascript
    /// {
    ///    "username" : "<username>",
    ///    "password" : "<password>"
    /// }
    /// ```
    pub fn with_default_parsers<C, O>(client_file_path: C, owner_file_path: O) -> Self
    where
        C: Into<PathBuf>,
        O: Into<PathBuf>,
    {
        SplitFileCredentialsProvider::new(
            client_file_path,
            owner_file_path,
            DefaultClientIdentityParser,
            DefaultCredentialsParser,
        )
    }

    /// Configures the instance with default parsers from environment variables.
    ///
    /// * '`PWGRANT_CREDENTIALS_DIR`': The first place to look for the
    /// credentials files.
    /// * '`CREDENTIALS_DIR`': The fallback for '`PWGRANT_CREDENTIALS_DIR`'
    /// * '`PWGRANT_CREDENTIALS_OWNER_FILENAME`': The file name for the resource
    /// owner credentials. Defaults to `user.json`.
    /// * '`PWGRANT_CREDENTIALS_CLIENT_FILENAME`': The file name for the client
    /// identity. Defaults to `client.json`.
    pub fn with_default_parsers_from_env() -> InitializationResult<Self> {
        let credentials_dir = credentials_dir_from_env()?;

        let owner_file_name = match optional_env_var("PWGRANT_CREDENTIALS_OWNER_FILENAME")? {
            Some(name) => name,
            None => {
                warn!("No owner file name. Assuming 'user.json'");
                "user.json".to_string()
            }
        };

        let client_file_name = match optional_env_var("PWGRANT_CREDENTIALS_CLIENT_FILENAME")? {
            Some(name) => name,
            None => {
                warn!("No client file name. Assuming 'client.json'");
                "client.json".to_string()
            }
        };

        let owner_file_path = credentials_dir.join(owner_file_name);
        let client_file_path = credentials_dir.join(client_file_name);

        info!(
            "Client file path is '{}', owner file path is '{}'.",
            client_file_path.display(),
            owner_file_path.display()
        );

        Ok(SplitFileCredentialsProvider::with_default_parsers(
            client_file_path,
            owner_file_path,
        ))
    }
}

fn credentials_dir_from_env() -> InitializationResult<PathBuf> {
    if let Some(dir) = optional_env_var("PWGRANT_CREDENTIALS_DIR")? {
        return Ok(dir.into());
    }
    info!("'PWGRANT_CREDENTIALS_DIR' not found. Looking for 'CREDENTIALS_DIR'");
    match optional_env_var("CREDENTIALS_DIR")? {
        Some(dir) => Ok(dir.into()),
        None => Err(InitializationError::new(
            "Path for credentials files not found. Please \
             set 'PWGRANT_CREDENTIALS_DIR' or 'CREDENTIALS_DIR'.",
        )),
    }
}

impl CredentialsProvider for SplitFileCredentialsProvider {
    fn client_identity(&self) -> CredentialsResult<ClientIdentity> {
        let contents = fs::read(&self.client_file_path)?;
        self.client_parser.parse(&contents)
    }

    fn owner_credentials(&self) -> CredentialsResult<Credentials> {
        let contents = fs::read(&self.owner_file_path)?;
        self.owner_parser.parse(&contents)
    }
}

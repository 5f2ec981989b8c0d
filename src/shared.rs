use std::env::VarError;
use std::error::Error;
use std::fmt;
use std::str::ParseBoolError;

pub type InitializationResult<T> = ::std::result::Result<T, InitializationError>;

/// An error to be returned if the initialization of a component fails.
#[derive(Debug)]
pub struct InitializationError(pub String);

impl InitializationError {
    /// Creates a new InitializationError therby allocating a String.
    pub fn new<T: Into<String>>(message: T) -> InitializationError {
        InitializationError(message.into())
    }
}

impl fmt::Display for InitializationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Initialization failed: {}", self.0)
    }
}

impl Error for InitializationError {}

impl From<VarError> for InitializationError {
    fn from(err: VarError) -> Self {
        InitializationError(format!("{}", err))
    }
}

impl From<ParseBoolError> for InitializationError {
    fn from(err: ParseBoolError) -> Self {
        InitializationError(format!("{}", err))
    }
}

impl From<::url::ParseError> for InitializationError {
    fn from(err: ::url::ParseError) -> Self {
        InitializationError(format!("Invalid URL: {}", err))
    }
}

/// Reads an optional environment variable.
///
/// An absent variable is `None`, anything unreadable is an error
/// naming the variable.
pub(crate) fn optional_env_var(name: &str) -> InitializationResult<Option<String>> {
    match ::std::env::var(name) {
        Ok(v) => Ok(Some(v)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err) => Err(InitializationError(format!("'{}': {}", name, err))),
    }
}

/// Reads a mandatory environment variable.
pub(crate) fn required_env_var(name: &str) -> InitializationResult<String> {
    match optional_env_var(name)? {
        Some(v) => Ok(v),
        None => Err(InitializationError(format!("'{}' not found.", name))),
    }
}

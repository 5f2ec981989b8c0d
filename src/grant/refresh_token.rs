//! See [RFC6749 sec. 6](https://tools.ietf.org/html/rfc6749#section-6)
use crate::error::GrantResult;

use super::{required, GrantStrategy};

/// Exchanges a refresh token for a new access token.
#[derive(Clone)]
pub struct RefreshTokenGrant {
    refresh_token: String,
}

impl RefreshTokenGrant {
    pub fn new<T: Into<String>>(refresh_token: T) -> RefreshTokenGrant {
        RefreshTokenGrant {
            refresh_token: refresh_token.into(),
        }
    }
}

impl ::std::fmt::Debug for RefreshTokenGrant {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        f.write_str("RefreshTokenGrant")
    }
}

impl GrantStrategy for RefreshTokenGrant {
    fn grant_type(&self) -> &'static str {
        "refresh_token"
    }

    fn grant_parameters(&self) -> GrantResult<Vec<(&'static str, &str)>> {
        Ok(vec![required("refresh_token", &self.refresh_token)?])
    }
}

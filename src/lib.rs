//! # pwgrant
//!
//! Obtains OAuth2 access tokens with the
//! [resource owner password credentials grant](https://tools.ietf.org/html/rfc6749#section-4.3).
//!
//! A `GrantController` validates the credentials, builds a form encoded
//! token request, sends it through a `Transport` and classifies the
//! response. Every authorization completes exactly once.
//!
//! ```rust,no_run
//! use futures::executor::block_on;
//! use pwgrant::{GrantController, GrantSettings, ReqwestTransport};
//!
//! let settings = GrantSettings::from_env().unwrap();
//! let controller = GrantController::password_grant(settings, ReqwestTransport::new());
//!
//! block_on(controller.authorize(None, |payload, error| match error {
//!     None => println!("Got a token: {:?}", payload),
//!     Some(err) => println!("Failed: {}", err),
//! }));
//! ```
//!
//! ## Environment variables
//!
//! `GrantSettings::from_env` reads:
//!
//! * `PWGRANT_CLIENT_ID` (mandatory)
//! * `PWGRANT_CLIENT_SECRET`
//! * `PWGRANT_AUTHORIZE_URL` (mandatory)
//! * `PWGRANT_TOKEN_URL`, defaults to the authorize URL
//! * `PWGRANT_SCOPE`
//! * `PWGRANT_SECRET_IN_BODY`, `true` or `1` to send the client secret
//! in the body instead of a `Basic` header
//! * `PWGRANT_USERNAME`
//! * `PWGRANT_PASSWORD`
#[macro_use]
extern crate log;

mod shared;
pub use crate::shared::{InitializationError, InitializationResult};

pub mod config;
pub mod controller;
pub mod credentials;
pub mod encoding;
pub mod error;
pub mod exchange;
pub mod grant;
pub mod metrics;
pub mod parsers;
pub mod request;
pub mod settings;
pub mod transport;

pub use crate::config::{AuthConfig, ClientIdentity, EndpointConfig};
pub use crate::controller::{AuthorizationFlow, GrantController};
pub use crate::credentials::Credentials;
pub use crate::error::{
    AuthorizationRequestError, AuthorizationServerErrorCode, GrantError, GrantErrorKind,
    GrantResult, TokenResult,
};
pub use crate::exchange::TokenExchanger;
pub use crate::grant::{ClientAuthMethod, GrantStrategy, PasswordGrant};
pub use crate::parsers::{JsonTokenResponseParser, ResponseParser, TokenPayload};
pub use crate::request::{ExtraParams, TokenRequest};
pub use crate::settings::GrantSettings;
pub use crate::transport::{
    CallbackTransport, ReqwestTransport, Responder, Transport, TransportError, TransportResponse,
};

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Credential resolution for the Nimbus SDK
//!
//! Every provider implements [`AuthProvider`] and yields a complete
//! `Authorization` header value:
//! - [`StaticTokenProvider`]: a fixed bearer token
//! - [`StaticKeyCredentialProvider`]: an access key / secret key pair
//! - [`EnvironmentCredentialProvider`]: a key pair read from `NIMBUS_*`
//!   variables, optionally scoped by `NIMBUS_PROFILE`
//! - [`AuthProviderChain`]: ordered fallback over several providers

mod chain;
mod credentials;
mod env;
mod error;
mod provider;
mod scope;
mod static_key;
mod static_token;

pub use chain::{AuthProviderChain, DefaultAuthChain};
pub use credentials::MAX_SESSION_TOKEN_LEN;
pub use env::{EnvSource, EnvironmentCredentialProvider, ProcessEnv, ResolvedCredentials};
pub use error::AuthError;
pub use provider::AuthProvider;
pub use scope::{CredentialScope, PROFILE_VAR};
pub use static_key::{StaticKeyConfig, StaticKeyCredentialProvider, StaticKeyCredentials};
pub use static_token::StaticTokenProvider;

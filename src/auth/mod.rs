//! HTTP Basic authentication against the institutional directory.
//!
//! Write endpoints identify their caller through the [`AuthUser`]
//! extractor, which decodes the `Authorization` header and delegates the
//! password check to the configured [`Authenticator`].

mod basic;
mod extractor;
mod ldap;
mod local;

pub use basic::{encode_basic, parse_basic, BasicCredentials};
pub use extractor::AuthUser;
pub use ldap::LdapAuthenticator;
pub use local::{DisabledAuthenticator, StaticAuthenticator, ANONYMOUS_USER};

use crate::config::{AuthBackend, AuthConfig};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identity of an authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,

    /// Display name
    #[serde(rename = "nome")]
    pub name: String,

    pub email: String,

    #[serde(rename = "setor")]
    pub department: String,
}

/// Verifies a username/password pair
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> Result<UserInfo>;

    /// Whether requests without credentials are let through as
    /// [`ANONYMOUS_USER`]
    fn allows_anonymous(&self) -> bool {
        false
    }
}

/// Create the authenticator selected by configuration
pub fn create_authenticator(config: &AuthConfig) -> Arc<dyn Authenticator> {
    match config.backend {
        AuthBackend::Ldap => {
            tracing::info!(url = %config.ldap_url, base_dn = %config.base_dn, "Using directory authentication");
            Arc::new(LdapAuthenticator::new(config.clone()))
        }
        AuthBackend::Static => {
            tracing::info!(users = config.users.len(), "Using static user list authentication");
            Arc::new(StaticAuthenticator::new(
                config.users.clone(),
                config.user_domain.clone(),
                config.default_department.clone(),
            ))
        }
        AuthBackend::Disabled => {
            tracing::warn!("Authentication disabled; any username is accepted");
            Arc::new(DisabledAuthenticator::new(
                config.user_domain.clone(),
                config.default_department.clone(),
            ))
        }
    }
}

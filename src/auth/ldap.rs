use super::{Authenticator, UserInfo};
use crate::config::AuthConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use ldap3::{ldap_escape, Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry};
use std::collections::HashMap;
use std::time::Duration;

const USER_ATTRIBUTES: [&str; 6] = ["displayName", "mail", "department", "cn", "givenName", "sn"];

/// Authenticates by binding to Active Directory as `user@domain`, then
/// reads the user's profile attributes.
pub struct LdapAuthenticator {
    config: AuthConfig,
}

impl LdapAuthenticator {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    fn settings(&self) -> LdapConnSettings {
        LdapConnSettings::new()
            .set_conn_timeout(Duration::from_secs(self.config.timeout_secs))
            .set_no_tls_verify(!self.config.verify_tls)
    }

    async fn bind_and_lookup(&self, ldap: &mut Ldap, username: &str, password: &str) -> Result<UserInfo> {
        let bind_dn = format!("{}@{}", username, self.config.user_domain);
        ldap.simple_bind(&bind_dn, password).await?.success()?;

        tracing::info!(username = %username, "Directory bind succeeded");

        let filter = format!("(sAMAccountName={})", ldap_escape(username));
        let (results, _) = ldap
            .search(
                &self.config.base_dn,
                Scope::Subtree,
                &filter,
                USER_ATTRIBUTES.to_vec(),
            )
            .await?
            .success()?;

        let entry = results.into_iter().next().ok_or_else(|| {
            tracing::warn!(username = %username, "Authenticated user not found in directory");
            AppError::NotFound("Usuário não encontrado no diretório".to_string())
        })?;

        Ok(user_from_attrs(
            username,
            &SearchEntry::construct(entry).attrs,
            &self.config.user_domain,
            &self.config.default_department,
        ))
    }
}

#[async_trait]
impl Authenticator for LdapAuthenticator {
    async fn authenticate(&self, username: &str, password: &str) -> Result<UserInfo> {
        // An empty password would be accepted as an unauthenticated bind.
        if password.is_empty() {
            return Err(AppError::Authentication("Credenciais inválidas".to_string()));
        }

        let (conn, mut ldap) = LdapConnAsync::with_settings(self.settings(), &self.config.ldap_url)
            .await
            .map_err(|e| {
                tracing::error!(url = %self.config.ldap_url, error = %e, "Directory server unavailable");
                AppError::from(e)
            })?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                tracing::warn!(error = %e, "Directory connection closed with error");
            }
        });

        let outcome = self.bind_and_lookup(&mut ldap, username, password).await;

        if let Err(e) = ldap.unbind().await {
            tracing::debug!(error = %e, "Directory unbind failed");
        }

        if let Err(AppError::Authentication(_)) = &outcome {
            tracing::warn!(username = %username, "Invalid credentials");
        }
        outcome
    }
}

fn first_attr<'a>(attrs: &'a HashMap<String, Vec<String>>, name: &str) -> Option<&'a str> {
    attrs
        .get(name)
        .and_then(|values| values.first())
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

/// Build the user profile; the name falls back displayName, cn, then
/// "givenName sn".
fn user_from_attrs(
    username: &str,
    attrs: &HashMap<String, Vec<String>>,
    user_domain: &str,
    default_department: &str,
) -> UserInfo {
    let name = first_attr(attrs, "displayName")
        .or_else(|| first_attr(attrs, "cn"))
        .map(str::to_string)
        .unwrap_or_else(|| {
            format!(
                "{} {}",
                first_attr(attrs, "givenName").unwrap_or_default(),
                first_attr(attrs, "sn").unwrap_or_default()
            )
            .trim()
            .to_string()
        });

    UserInfo {
        username: username.to_string(),
        name,
        email: first_attr(attrs, "mail")
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}@{}", username, user_domain)),
        department: first_attr(attrs, "department")
            .unwrap_or(default_department)
            .to_string(),
    }
}

use super::{Authenticator, UserInfo};
use crate::config::StaticUser;
use crate::error::{AppError, Result};
use async_trait::async_trait;

/// Username recorded for unauthenticated requests when authentication is
/// disabled
pub const ANONYMOUS_USER: &str = "anonimo";

/// Users and passwords listed in the configuration file
pub struct StaticAuthenticator {
    users: Vec<StaticUser>,
    user_domain: String,
    default_department: String,
}

impl StaticAuthenticator {
    pub fn new(users: Vec<StaticUser>, user_domain: String, default_department: String) -> Self {
        Self {
            users,
            user_domain,
            default_department,
        }
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, username: &str, password: &str) -> Result<UserInfo> {
        let user = self
            .users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .ok_or_else(|| {
                tracing::warn!(username = %username, "Invalid credentials");
                AppError::Authentication("Credenciais inválidas".to_string())
            })?;

        Ok(UserInfo {
            username: user.username.clone(),
            name: user.name.clone().unwrap_or_else(|| user.username.clone()),
            email: user
                .email
                .clone()
                .unwrap_or_else(|| format!("{}@{}", user.username, self.user_domain)),
            department: user
                .department
                .clone()
                .unwrap_or_else(|| self.default_department.clone()),
        })
    }
}

/// Accepts any username without checking the password (development only)
pub struct DisabledAuthenticator {
    user_domain: String,
    default_department: String,
}

impl DisabledAuthenticator {
    pub fn new(user_domain: String, default_department: String) -> Self {
        Self {
            user_domain,
            default_department,
        }
    }
}

#[async_trait]
impl Authenticator for DisabledAuthenticator {
    async fn authenticate(&self, username: &str, _password: &str) -> Result<UserInfo> {
        Ok(UserInfo {
            username: username.to_string(),
            name: username.to_string(),
            email: format!("{}@{}", username, self.user_domain),
            department: self.default_department.clone(),
        })
    }

    fn allows_anonymous(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Vec<StaticUser> {
        vec![
            StaticUser {
                username: "joao.silva".to_string(),
                password: "segredo".to_string(),
                name: Some("João Silva".to_string()),
                email: None,
                department: Some("Coordenadoria de Licitações".to_string()),
            },
            StaticUser {
                username: "pedro".to_string(),
                password: "123".to_string(),
                name: None,
                email: None,
                department: None,
            },
        ]
    }

    #[tokio::test]
    async fn test_static_user_fields() {
        let auth = StaticAuthenticator::new(users(), "ifsp.edu.br".to_string(), "IFSP".to_string());

        let joao = auth.authenticate("joao.silva", "segredo").await.unwrap();
        assert_eq!(joao.name, "João Silva");
        assert_eq!(joao.email, "joao.silva@ifsp.edu.br");
        assert_eq!(joao.department, "Coordenadoria de Licitações");

        let pedro = auth.authenticate("pedro", "123").await.unwrap();
        assert_eq!(pedro.name, "pedro");
        assert_eq!(pedro.department, "IFSP");
    }

    #[tokio::test]
    async fn test_static_wrong_password() {
        let auth = StaticAuthenticator::new(users(), "ifsp.edu.br".to_string(), "IFSP".to_string());
        let result = auth.authenticate("joao.silva", "errada").await;
        assert!(matches!(result, Err(AppError::Authentication(_))));
        assert!(!auth.allows_anonymous());
    }

    #[tokio::test]
    async fn test_disabled_accepts_anyone() {
        let auth = DisabledAuthenticator::new("ifsp.edu.br".to_string(), "IFSP".to_string());
        let user = auth.authenticate("qualquer", "").await.unwrap();
        assert_eq!(user.username, "qualquer");
        assert_eq!(user.email, "qualquer@ifsp.edu.br");
        assert!(auth.allows_anonymous());
    }
}

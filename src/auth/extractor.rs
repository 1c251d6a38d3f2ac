use super::{parse_basic, Authenticator, UserInfo, ANONYMOUS_USER};
use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use std::sync::Arc;

/// The caller of a request, resolved from HTTP Basic credentials
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserInfo);

impl AuthUser {
    pub fn username(&self) -> &str {
        &self.0.username
    }

    /// Display name, used where the original author is recorded
    pub fn name(&self) -> &str {
        &self.0.name
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<dyn Authenticator>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = Arc::<dyn Authenticator>::from_ref(state);

        let header = match parts.headers.get(header::AUTHORIZATION) {
            Some(value) => value
                .to_str()
                .map_err(|_| AppError::Authentication("Invalid Authorization header".to_string()))?,
            None if authenticator.allows_anonymous() => {
                return Ok(AuthUser(UserInfo {
                    username: ANONYMOUS_USER.to_string(),
                    name: ANONYMOUS_USER.to_string(),
                    email: String::new(),
                    department: String::new(),
                }));
            }
            None => {
                return Err(AppError::Authentication(
                    "Missing Authorization header".to_string(),
                ))
            }
        };

        let credentials = parse_basic(header)?;
        let user = authenticator
            .authenticate(&credentials.username, &credentials.password)
            .await?;

        tracing::debug!(username = %user.username, "Request authenticated");
        Ok(AuthUser(user))
    }
}

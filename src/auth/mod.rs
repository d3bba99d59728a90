//! Operator identity.
//!
//! Tokens are issued elsewhere; this service only verifies the HS256
//! signature, issuer, audience and expiry, then reads the subject.

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::{config::AppConfig, errors::ServiceError};

/// JWT claims accepted by the intake service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,          // Subject (user ID)
    pub name: Option<String>, // Display name
    pub iat: i64,             // Issued at time
    pub exp: i64,             // Expiration time
    pub iss: String,          // Issuer
    pub aud: String,          // Audience
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("No authentication token provided")]
    MissingToken,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        ServiceError::Unauthorized(err.to_string())
    }
}

/// Verifies bearer tokens against the configured secret.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str, issuer: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            &config.auth_issuer,
            &config.auth_audience,
        )
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    debug!(error = %e, "Rejected bearer token");
                    AuthError::InvalidToken
                }
            })
    }
}

/// Authenticated operator extracted from the bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
    pub name: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            name: claims.name,
        }
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidToken)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<TokenVerifier>: FromRef<S>,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = Arc::<TokenVerifier>::from_ref(state);
        let token = bearer_token(parts)?;
        let claims = verifier.verify(token)?;
        if claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidToken.into());
        }
        Ok(claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "k3Jd9_qLx2Vn8ZpR4tWm7YcB1sHf6GuE0aNiOjTkQrPlMvXwDyAzSbCeFgIhJ5oU";

    fn token(iss: &str, exp_offset: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "user-42".into(),
            name: Some("Receiving 1".into()),
            iat: now,
            exp: now + exp_offset,
            iss: iss.into(),
            aud: "stateset-intake".into(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(SECRET, "stateset-auth", "stateset-intake")
    }

    #[test]
    fn valid_token_yields_user() {
        let claims = verifier().verify(&token("stateset-auth", 600)).unwrap();
        let user = AuthUser::from(claims);
        assert_eq!(user.user_id, "user-42");
        assert_eq!(user.name.as_deref(), Some("Receiving 1"));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        assert_eq!(
            verifier().verify(&token("someone-else", 600)).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        assert_eq!(
            verifier().verify(&token("stateset-auth", -3600)).unwrap_err(),
            AuthError::TokenExpired
        );
    }

    #[test]
    fn auth_errors_map_to_unauthorized() {
        let err: ServiceError = AuthError::MissingToken.into();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }
}

// ABOUTME: Bearer token verification for requests signed by the identity provider
// ABOUTME: Validates HS256 JWTs and yields the acting user id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! # Authentication
//!
//! Identity is delegated to a hosted provider. Every `/api` request carries
//! `Authorization: Bearer <jwt>`; the token's `sub` claim is the user id that store
//! access rules are evaluated against.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use flowstate_core::errors::{AppError, AppResult};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

/// JWT claims issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Why a token was refused
#[derive(Debug, Clone, thiserror::Error)]
pub enum JwtValidationError {
    /// Token has expired
    #[error("JWT token expired at {}", expired_at.format("%Y-%m-%d %H:%M:%S UTC"))]
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Signature, issuer or audience did not check out
    #[error("JWT token is invalid: {reason}")]
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is not a well-formed JWT
    #[error("JWT token is malformed: {details}")]
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        match error {
            JwtValidationError::TokenExpired { .. } => Self::auth_expired(),
            JwtValidationError::TokenInvalid { .. } => Self::auth_invalid(error.to_string()),
            JwtValidationError::TokenMalformed { .. } => Self::new(
                flowstate_core::errors::ErrorCode::AuthMalformed,
                error.to_string(),
            ),
        }
    }
}

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    /// User id from the token subject
    pub user_id: String,
}

/// Verifies (and, for tests and tooling, issues) bearer tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: Option<String>,
    audience: Option<String>,
}

impl fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthManager")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl AuthManager {
    /// Create a manager from the auth configuration
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    /// Sign a token for the given user
    ///
    /// # Errors
    ///
    /// Returns an internal error if encoding fails
    pub fn generate_token(&self, user_id: &str, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_owned(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns the reason the token was refused
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below so the error can carry the expiry time
        validation.validate_exp = false;
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Self::convert_jwt_error(&e))?;

        if Utc::now().timestamp() > claims.exp {
            let expired_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);
            tracing::warn!(user.id = %claims.sub, "JWT token expired at {}", expired_at.to_rfc3339());
            return Err(JwtValidationError::TokenExpired { expired_at });
        }

        if claims.sub.is_empty() {
            return Err(JwtValidationError::TokenInvalid {
                reason: "Token subject is empty".into(),
            });
        }

        Ok(claims)
    }

    fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;
        tracing::warn!("JWT token validation failed: {:?}", e);

        match e.kind() {
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidIssuer => JwtValidationError::TokenInvalid {
                reason: "Token issuer is not accepted".into(),
            },
            ErrorKind::InvalidAudience => JwtValidationError::TokenInvalid {
                reason: "Token audience is not accepted".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            ErrorKind::Utf8(utf8_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid UTF-8: {utf8_err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }

    /// Authenticate an `Authorization` header value
    ///
    /// # Errors
    ///
    /// Returns `AUTH_REQUIRED` when the header is absent or not a bearer token, or the
    /// mapped token error otherwise
    pub fn authenticate(&self, authorization: Option<&str>) -> AppResult<AuthResult> {
        let token = authorization
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(AppError::auth_required)?;

        let claims = self.validate_token(token)?;
        Ok(AuthResult {
            user_id: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowstate_core::errors::ErrorCode;

    fn manager(issuer: Option<&str>) -> AuthManager {
        AuthManager::new(&AuthConfig {
            jwt_secret: "test-secret-that-is-at-least-32-bytes-long".into(),
            issuer: issuer.map(ToOwned::to_owned),
            audience: None,
        })
    }

    #[test]
    fn test_round_trip_token_yields_user() {
        let auth = manager(Some("flowstate-idp"));
        let token = auth.generate_token("user-1", Duration::hours(1));
        let header = token.map(|t| format!("Bearer {t}")).unwrap_or_default();

        let result = auth.authenticate(Some(&header));
        assert_eq!(result.ok().map(|r| r.user_id), Some("user-1".to_owned()));
    }

    #[test]
    fn test_expired_token_is_refused() {
        let auth = manager(None);
        let token = auth
            .generate_token("user-1", Duration::hours(-2))
            .unwrap_or_default();

        assert!(matches!(
            auth.validate_token(&token),
            Err(JwtValidationError::TokenExpired { .. })
        ));
    }

    #[test]
    fn test_foreign_signature_is_refused() {
        let other = AuthManager::new(&AuthConfig {
            jwt_secret: "another-secret-that-is-at-least-32-bytes".into(),
            issuer: None,
            audience: None,
        });
        let token = other
            .generate_token("user-1", Duration::hours(1))
            .unwrap_or_default();

        let error = manager(None)
            .authenticate(Some(&format!("Bearer {token}")))
            .err()
            .map(|e| e.code);
        assert_eq!(error, Some(ErrorCode::AuthInvalid));
    }

    #[test]
    fn test_missing_header_requires_auth() {
        let error = manager(None).authenticate(None).err().map(|e| e.code);
        assert_eq!(error, Some(ErrorCode::AuthRequired));

        let error = manager(None).authenticate(Some("Basic abc")).err().map(|e| e.code);
        assert_eq!(error, Some(ErrorCode::AuthRequired));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let error = manager(None)
            .authenticate(Some("Bearer not-a-jwt"))
            .err()
            .map(|e| e.code);
        assert_eq!(error, Some(ErrorCode::AuthMalformed));
    }
}

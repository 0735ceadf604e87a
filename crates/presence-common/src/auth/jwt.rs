//! JWT identity tokens
//!
//! Caller tokens are HS256 JWTs issued by the identity provider. The stable
//! identity key is `"{iss}|{sub}"`.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use presence_core::{DomainError, Identity, IdentityResolver};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AppError;

/// Identity token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Subject (provider user ID)
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl Claims {
    /// Claims for `iss`/`sub` valid for `ttl_seconds` from now
    #[must_use]
    pub fn new(iss: impl Into<String>, sub: impl Into<String>, ttl_seconds: i64) -> Self {
        let now = Utc::now();
        Self {
            iss: iss.into(),
            sub: sub.into(),
            aud: None,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            name: None,
            email: None,
            picture: None,
        }
    }

    /// Stable identity key
    #[must_use]
    pub fn token_identifier(&self) -> String {
        Identity::token_identifier_for(&self.iss, &self.sub)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    #[must_use]
    pub fn into_identity(self) -> Identity {
        Identity {
            token_identifier: self.token_identifier(),
            name: self.name,
            email: self.email,
            picture: self.picture,
        }
    }
}

/// Encodes and verifies identity tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Create a service that verifies with `secret` and checks `iss`/`aud` when given
    #[must_use]
    pub fn new(secret: &str, issuer: Option<&str>, audience: Option<&str>) -> Self {
        let mut validation = Validation::default();
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            config.issuer.as_deref(),
            config.audience.as_deref(),
        )
    }

    /// Sign a token
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to encode JWT: {e}")))
    }

    /// Decode and validate a token
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                    _ => AppError::InvalidToken,
                }
            })?;

        Ok(token_data.claims)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.validation.iss)
            .field("audience", &self.validation.aud)
            .finish_non_exhaustive()
    }
}

/// Identity resolver backed by JWT verification
///
/// A missing, malformed, or expired token resolves to no identity.
#[derive(Debug, Clone)]
pub struct JwtIdentityResolver {
    jwt: JwtService,
}

impl JwtIdentityResolver {
    #[must_use]
    pub fn new(jwt: JwtService) -> Self {
        Self { jwt }
    }
}

#[async_trait]
impl IdentityResolver for JwtIdentityResolver {
    async fn resolve(&self, token: Option<&str>) -> Result<Option<Identity>, DomainError> {
        let Some(token) = token else {
            return Ok(None);
        };

        match self.jwt.decode(token) {
            Ok(claims) => Ok(Some(claims.into_identity())),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected caller token");
                Ok(None)
            }
        }
    }
}

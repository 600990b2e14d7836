//! JWT bearer credentials
//!
//! Tokens are issued by the marketplace's user service; this side only
//! verifies them. `create_token` exists for tooling and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{Caller, DomainError, DomainResult, IdentityVerifier, Role};

/// Placeholder secret shipped in the defaults; never valid for production
pub const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret
    pub secret: String,
    /// Lifetime of tokens produced by `create_token`
    pub expiration_hours: i64,
    /// Required `iss` claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_JWT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "cottage-rental".to_string(),
        }
    }
}

impl JwtConfig {
    /// True while the placeholder secret is in use, so anyone can mint tokens.
    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// User ID
    pub sub: String,
    #[serde(default)]
    pub username: String,
    /// `tourist`, `owner` or `administrator`
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl TokenClaims {
    pub fn new(user_id: &str, username: &str, role: Role, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }
}

/// Create a signed token for a user
pub fn create_token(
    user_id: &str,
    username: &str,
    role: Role,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = TokenClaims::new(user_id, username, role, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature, expiry and issuer, then decode the claims
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// [`IdentityVerifier`] backed by HMAC-signed JWTs
pub struct JwtIdentityVerifier {
    config: JwtConfig,
}

impl JwtIdentityVerifier {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }
}

impl IdentityVerifier for JwtIdentityVerifier {
    fn verify(&self, credential: &str) -> DomainResult<Caller> {
        let claims = verify_token(credential, &self.config)
            .map_err(|e| DomainError::Unauthorized(format!("invalid token: {}", e)))?;
        if claims.sub.is_empty() {
            return Err(DomainError::Unauthorized(
                "token has no subject".to_string(),
            ));
        }
        let role = claims.role.parse::<Role>()?;
        Ok(Caller::new(claims.sub, role))
    }
}

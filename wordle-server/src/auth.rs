use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::Engine;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wordle_types::UserId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,          // User id
    pub name: Option<String>, // Display name
    pub exp: u64,             // Expiry
}

/// Dev tokens carry no signature and need no expiry
#[derive(Debug, Deserialize)]
struct DevClaims {
    sub: String,
    name: Option<String>,
}

/// Who is making the request
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

pub struct AuthService {
    keys: Option<SigningKeys>,
    dev_mode: bool,
}

impl AuthService {
    pub fn new(secret: &str) -> Self {
        Self {
            keys: Some(SigningKeys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            dev_mode: false,
        }
    }

    pub fn new_dev_mode() -> Self {
        Self {
            keys: None,
            dev_mode: true,
        }
    }

    /// The token from an `Authorization: Bearer ...` header value
    pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
        let header = header.ok_or(AuthError::MissingToken)?;
        let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        Ok(token)
    }

    pub fn validate_token(&self, token: &str) -> Result<Identity, AuthError> {
        if self.dev_mode {
            return Self::validate_dev_token(token);
        }

        let keys = self.keys.as_ref().ok_or(AuthError::InvalidKey)?;
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(token, &keys.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    tracing::warn!("JWT token validation failed: {:?}", e);
                    AuthError::InvalidToken
                }
            }
        })?;

        let claims = token_data.claims;
        identity_from(&claims.sub, claims.name)
    }

    /// Sign a token for `identity`, valid for `ttl`
    pub fn issue_token(&self, identity: &Identity, ttl: Duration) -> Result<String, AuthError> {
        let keys = self.keys.as_ref().ok_or(AuthError::InvalidKey)?;
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::InvalidKey)?;

        let claims = Claims {
            sub: identity.user_id.to_string(),
            name: Some(identity.username.clone()),
            exp: (now + ttl).as_secs(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding).map_err(|e| {
            tracing::warn!("Failed to sign token: {:?}", e);
            AuthError::InvalidKey
        })
    }

    fn validate_dev_token(token: &str) -> Result<Identity, AuthError> {
        // Unsigned JWT: only the payload section matters
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() == 3 {
            let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
                .decode(parts[1].trim_end_matches('='))
                .map_err(|e| {
                    tracing::warn!("Failed to decode JWT payload in dev mode: {:?}", e);
                    AuthError::InvalidToken
                })?;

            let claims: DevClaims = serde_json::from_slice(&payload).map_err(|e| {
                tracing::warn!("Failed to parse JWT claims in dev mode: {:?}", e);
                AuthError::InvalidToken
            })?;

            return identity_from(&claims.sub, claims.name);
        }

        // Simple string format: "user_id:username"
        match token.split_once(':') {
            Some((user_id, username)) => identity_from(user_id, Some(username.to_string())),
            None => Err(AuthError::InvalidToken),
        }
    }
}

fn identity_from(sub: &str, name: Option<String>) -> Result<Identity, AuthError> {
    let user_id = Uuid::parse_str(sub.trim()).map_err(|_| AuthError::InvalidSubject)?;
    let username = name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("player-{}", &user_id.simple().to_string()[..8]));

    Ok(Identity { user_id, username })
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AuthError {
    #[error("Authentication required")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token subject is not a user id")]
    InvalidSubject,
    #[error("Invalid key")]
    InvalidKey,
}

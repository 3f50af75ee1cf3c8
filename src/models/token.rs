use std::fmt;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JWTConfig;
use crate::models::user::User;

/// Claims carried by a session token: identity fields plus issue/expiry
/// timestamps in Unix seconds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Errors surfaced by the codec.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// The token is not three valid segments of base64-encoded JSON.
    Malformed(String),
    /// The segments parsed but the signature does not match the secret.
    InvalidSignature,
    /// Signing failed while minting a token.
    Signing(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Malformed(msg) => write!(f, "malformed token: {}", msg),
            CodecError::InvalidSignature => write!(f, "token signature mismatch"),
            CodecError::Signing(msg) => write!(f, "failed to sign token: {}", msg),
        }
    }
}

impl std::error::Error for CodecError {}

/// Encodes and decodes session tokens as HS256-signed JWTs.
///
/// Decoding verifies structure and signature only. Expiry policy lives with
/// the session validator and the auth service, so `decode` deliberately does
/// not reject expired tokens.
#[derive(Clone)]
pub struct TokenCodec {
    issuer: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    pub fn new(config: &JWTConfig) -> Self {
        TokenCodec {
            issuer: config.iss.clone(),
            encoding_key: EncodingKey::from_secret(config.secret.as_ref()),
            decoding_key: DecodingKey::from_secret(config.secret.as_ref()),
        }
    }

    /// Mint a signed token for `user`, stamping `iat = now` and
    /// `exp = now + ttl`.
    pub fn encode(&self, user: &User, ttl: i64) -> Result<String, CodecError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            name: Some(user.name.clone()),
            roles: user.roles.clone(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + ttl,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| CodecError::Signing(e.to_string()))
    }

    /// Decode a token, verifying segment structure and signature.
    pub fn decode(&self, token: &str) -> Result<Claims, CodecError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => CodecError::InvalidSignature,
                _ => CodecError::Malformed(e.to_string()),
            })
    }
}

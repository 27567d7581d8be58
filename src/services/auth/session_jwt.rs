use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::{error::Error as StdError, fmt};

use crate::services::object_id::ObjectId;

// Errors returned by session-token issuance / verification.
//
// The authentication stage collapses every variant into one 401, so the
// distinction only ever reaches the log.
#[derive(Debug)]
pub enum SessionTokenError {
    EmptySecret,
    Jwt(jsonwebtoken::errors::Error),
    InvalidSubject,
}

impl fmt::Display for SessionTokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySecret => write!(f, "session secret must not be empty"),
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::InvalidSubject => write!(f, "invalid 'sub' (expected record id)"),
        }
    }
}

impl StdError for SessionTokenError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for SessionTokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// Session token claims. `sub` is the user's record id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 session-token signer and verifier (server-held secret).
///
/// - Key material is not printable via Debug.
#[derive(Clone)]
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl fmt::Debug for SessionTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("SessionTokenService")
            .field("validation", &self.validation)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl SessionTokenService {
    pub fn new(secret: &str, ttl_seconds: u64) -> Result<Self, SessionTokenError> {
        if secret.is_empty() {
            return Err(SessionTokenError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        })
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Sign a session token for `user_id`, valid for the configured TTL.
    pub fn issue(&self, user_id: ObjectId) -> Result<String, SessionTokenError> {
        let now = chrono::Utc::now().timestamp();
        self.sign(&SessionClaims {
            sub: user_id.to_hex(),
            iat: now,
            exp: now + self.ttl_seconds as i64,
        })
    }

    fn sign(&self, claims: &SessionClaims) -> Result<String, SessionTokenError> {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        Ok(jsonwebtoken::encode(&header, claims, &self.encoding_key)?)
    }

    /// Verify signature + expiry and return the subject.
    ///
    /// This is the entry-point for the authentication stage.
    pub fn verify(&self, token: &str) -> Result<ObjectId, SessionTokenError> {
        let data =
            jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;

        ObjectId::parse(&data.claims.sub).map_err(|_| SessionTokenError::InvalidSubject)
    }
}

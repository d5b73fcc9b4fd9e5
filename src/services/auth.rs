use std::sync::{Arc, RwLock};

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::error::ClientError;
use crate::models::auth::{Claims, SessionUser};
use crate::models::user::UserRole;
use crate::services::storage::{LocalStorage, TOKEN_KEY};

/// Credential threaded into every component that issues authenticated requests.
///
/// Clones share the token, so signing out through one handle is seen by every
/// panel holding another.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(token.filter(|t| !t.trim().is_empty()))),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(Some(token.into()))
    }

    /// Reads the token stored under `"token"`.
    pub fn from_storage(storage: &LocalStorage) -> anyhow::Result<Self> {
        Ok(Self::new(storage.get(TOKEN_KEY)?))
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The bearer token, or `AuthMissing` when not logged in.
    pub fn bearer(&self) -> Result<String, ClientError> {
        self.token().ok_or(ClientError::AuthMissing)
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    pub fn sign_in(&self, token: impl Into<String>) {
        let token = Some(token.into()).filter(|t| !t.trim().is_empty());
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    pub fn sign_out(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Identity carried by the token; `None` if absent, malformed or expired.
    pub fn user(&self) -> Option<SessionUser> {
        let token = self.token()?;
        match decode_unverified(&token) {
            Ok(claims) => Some(claims.into()),
            Err(e) => {
                tracing::debug!("Ignoring unusable session token: {}", e);
                None
            }
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|u| u.role == Some(UserRole::Admin))
    }
}

/// Decode the claims of an HS256 token without checking its signature.
///
/// The client does not hold the signing secret; the backend verifies every
/// authenticated request. Expiry is still enforced.
pub fn decode_unverified(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(b""), &validation)?;
    Ok(data.claims)
}

use serde::{Deserialize, Serialize};

use super::user::UserRole;

/// Claims embedded in the JWT issued by the backend login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    /// Kept as text so an unknown role still decodes (and is simply not admin).
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// Identity read from the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: String,
    pub role: Option<UserRole>,
}

impl From<Claims> for SessionUser {
    fn from(c: Claims) -> Self {
        Self {
            user_id: c.sub,
            role: c.role.parse().ok(),
        }
    }
}

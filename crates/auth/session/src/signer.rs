//! HMAC session token generation and verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{SessionError, SessionResult};

type HmacSha256 = Hmac<Sha256>;

/// Fixed message the session token signs.
pub const SESSION_MESSAGE: &[u8] = b"dashboard-session-v1";

/// Issues and checks the dashboard session token.
///
/// The token is `hex(HMAC-SHA256(secret, "dashboard-session-v1"))`: it proves
/// knowledge of the secret and carries no expiry of its own. Rotating the
/// secret invalidates every issued cookie.
#[derive(Clone)]
pub struct SessionSigner {
    secret: String,
    token: String,
}

impl SessionSigner {
    /// Creates a signer; an empty secret is refused.
    pub fn new(secret: impl Into<String>) -> SessionResult<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(SessionError::NotConfigured);
        }
        let token = sign(&secret, SESSION_MESSAGE)?;
        Ok(Self { secret, token })
    }

    /// The session token for this secret.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Checks a presented token in constant time.
    pub fn verify(&self, token: &str) -> bool {
        constant_time_compare(&self.token, token)
    }

    /// Checks a submitted password against the secret in constant time.
    pub fn check_password(&self, password: &str) -> bool {
        constant_time_compare(&self.secret, password)
    }

    /// Exchanges a correct password for the session token.
    pub fn login(&self, password: &str) -> SessionResult<&str> {
        if password.is_empty() || !self.check_password(password) {
            return Err(SessionError::InvalidPassword);
        }
        Ok(&self.token)
    }
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSigner").finish_non_exhaustive()
    }
}

fn sign(secret: &str, message: &[u8]) -> SessionResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| SessionError::InvalidKey(e.to_string()))?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time string comparison to prevent timing attacks.
///
/// Only the length leaks.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

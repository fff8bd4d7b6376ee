//! Subsonic token authentication.
//!
//! Each request carries a fresh random salt and
//! `token = md5(password + salt)`, so the password never travels in clear.

use md5::{Digest, Md5};
use rand::Rng;

/// Length of the generated salt in hex characters.
pub const SALT_LEN: usize = 16;

/// Compute MD5 hash of a string and return as lowercase hex string.
pub fn md5_hex(data: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate a random hex salt of [`SALT_LEN`] characters.
pub fn random_salt() -> String {
    let bytes: [u8; SALT_LEN / 2] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// Salt and token pair for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub salt: String,
    pub token: String,
}

impl AuthToken {
    /// Derive a token for `password` with a new random salt.
    pub fn generate(password: &str) -> Self {
        Self::with_salt(password, random_salt())
    }

    /// Derive a token for `password` with a given salt.
    pub fn with_salt<S: Into<String>>(password: &str, salt: S) -> Self {
        let salt = salt.into();
        let token = md5_hex(&format!("{}{}", password, salt));
        Self { salt, token }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_hex() {
        assert_eq!(md5_hex("test"), "098f6bcd4621d373cade4e832627b4f6");
    }

    #[test]
    fn test_subsonic_reference_token() {
        // Example from the Subsonic API documentation.
        let auth = AuthToken::with_salt("sesame", "c19b2d");
        assert_eq!(auth.token, "26719a1196d2a940705a59634eb18eab");
    }

    #[test]
    fn test_random_salt_shape() {
        let salt = random_salt();
        assert_eq!(salt.len(), SALT_LEN);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(AuthToken::generate("pw").salt, AuthToken::generate("pw").salt);
    }
}

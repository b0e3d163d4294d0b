//! How a password is turned into its stored form and checked again at login.

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use configs::PasswordSchemeKind;
use rand::rngs::OsRng;
use tracing::warn;

use super::errors::AuthError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordScheme {
    /// Stored verbatim, compared with `==`.
    #[default]
    Plain,
    /// Salted argon2 PHC string.
    Argon2,
}

impl PasswordScheme {
    pub fn name(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Argon2 => "argon2",
        }
    }

    /// Produce the value a store should persist for `password`.
    pub fn seal(self, password: &str) -> Result<String, AuthError> {
        match self {
            Self::Plain => Ok(password.to_string()),
            Self::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map(|h| h.to_string())
                    .map_err(|e| AuthError::Hash(e.to_string()))
            }
        }
    }

    /// Check a supplied password against a stored value.
    ///
    /// A stored value that is not a PHC string (e.g. a record written under
    /// `Plain`) never matches under `Argon2`.
    pub fn verify(self, stored: &str, supplied: &str) -> bool {
        match self {
            Self::Plain => stored == supplied,
            Self::Argon2 => match PasswordHash::new(stored) {
                Ok(parsed) => Argon2::default().verify_password(supplied.as_bytes(), &parsed).is_ok(),
                Err(e) => {
                    warn!(error = %e, "stored password is not an argon2 hash; treating as mismatch");
                    false
                }
            },
        }
    }
}

impl From<PasswordSchemeKind> for PasswordScheme {
    fn from(kind: PasswordSchemeKind) -> Self {
        match kind {
            PasswordSchemeKind::Plain => Self::Plain,
            PasswordSchemeKind::Argon2 => Self::Argon2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_is_verbatim() {
        let s = PasswordScheme::Plain;
        assert_eq!(s.seal("pw1").unwrap(), "pw1");
        assert!(s.verify("pw1", "pw1"));
        assert!(!s.verify("pw1", "PW1"));
        assert!(!s.verify("pw1", "pw1 "));
    }

    #[test]
    fn argon2_salts_and_verifies() {
        let s = PasswordScheme::Argon2;
        let a = s.seal("correct horse").unwrap();
        let b = s.seal("correct horse").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2"));
        assert!(s.verify(&a, "correct horse"));
        assert!(!s.verify(&a, "battery staple"));
    }

    #[test]
    fn argon2_treats_plain_record_as_mismatch() {
        assert!(!PasswordScheme::Argon2.verify("plaintext", "plaintext"));
        assert!(!PasswordScheme::Argon2.verify("plaintext", "other"));
    }
}

//! User Password Value Object
//!
//! Delegates the cryptography to `platform::password` and adds
//! domain-facing error mapping.

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicyError};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input.
///
/// Wrapper around `ClearTextPassword`; memory is zeroized on drop.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a new raw password with policy validation.
    ///
    /// Policy: 8..=128 characters, at least one digit, no control
    /// characters.
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::TooShort { min, actual } => AppError::bad_request(format!(
                "Password must be at least {} characters (got {})",
                min, actual
            )),
            PasswordPolicyError::TooLong { max, actual } => AppError::bad_request(format!(
                "Password must be at most {} characters (got {})",
                max, actual
            )),
            PasswordPolicyError::EmptyOrWhitespace => {
                AppError::bad_request("Password cannot be empty")
            }
            PasswordPolicyError::InvalidCharacter => {
                AppError::bad_request("Password contains invalid characters")
            }
            PasswordPolicyError::MissingDigit => {
                AppError::bad_request("Password must contain at least one number")
            }
        })?;

        Ok(Self(clear_text))
    }

    /// Create without policy validation.
    ///
    /// For verifying presented passwords against stored hashes; the
    /// policy of the day must not lock out accounts created under an
    /// older policy.
    pub fn presented(raw: String) -> Self {
        Self(ClearTextPassword::new_unchecked(raw))
    }

    fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Stored Hash)
// ============================================================================

/// Stored Argon2id password hash
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password for storage
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AppResult<Self> {
        let hashed = raw
            .inner()
            .hash(pepper)
            .map_err(|e| AppError::internal(e.to_string()))?;
        Ok(Self(hashed))
    }

    /// Restore from a PHC string loaded from the database
    pub fn from_db(phc: impl Into<String>) -> AppResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc)
            .map_err(|e| AppError::internal(e.to_string()))?;
        Ok(Self(hashed))
    }

    /// Verify a presented password against this hash
    pub fn verify(&self, presented: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(presented.inner(), pepper)
    }

    /// PHC string for storage
    pub fn as_str(&self) -> &str {
        self.0.as_phc_string()
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserPassword").field(&"[HASH]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_enforced_on_new() {
        assert!(RawPassword::new("short1".to_string()).is_err());
        assert!(RawPassword::new("nodigitshere".to_string()).is_err());
        assert!(RawPassword::new("goodpassword1".to_string()).is_ok());
    }

    #[test]
    fn test_presented_skips_policy() {
        // Legacy five-char password still verifies against its hash
        let raw = RawPassword::presented("old!1".to_string());
        let hashed = UserPassword::from_raw(&raw, None).unwrap();
        assert!(hashed.verify(&raw, None));
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("correcthorse1".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, None).unwrap();

        assert!(hashed.verify(&raw, None));

        let wrong = RawPassword::presented("wronghorse1".to_string());
        assert!(!hashed.verify(&wrong, None));
    }

    #[test]
    fn test_from_db_roundtrip() {
        let raw = RawPassword::new("correcthorse1".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, None).unwrap();

        let restored = UserPassword::from_db(hashed.as_str().to_string()).unwrap();
        assert!(restored.verify(&raw, None));
    }

    #[test]
    fn test_from_db_rejects_garbage() {
        assert!(UserPassword::from_db("not-a-phc-string").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("correcthorse1".to_string()).unwrap();
        assert!(format!("{:?}", raw).contains("REDACTED"));

        let hashed = UserPassword::from_raw(&raw, None).unwrap();
        assert!(!format!("{:?}", hashed).contains(hashed.as_str()));
    }
}

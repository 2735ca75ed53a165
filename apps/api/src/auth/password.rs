// Password hashing with bcrypt

use bcrypt::{hash, verify, DEFAULT_COST};

/// Shortest password accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// bcrypt hasher with a configurable work factor
///
/// # Example
/// ```
/// use talentverify_api::auth::PasswordHasher;
///
/// let hasher = PasswordHasher::new(4);
/// let hash = hasher.hash("my_password").unwrap();
/// assert!(hasher.verify("my_password", &hash).unwrap());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn validate(password: &str) -> Result<(), String> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ));
        }
        Ok(())
    }

    pub fn hash(&self, password: &str) -> Result<String, String> {
        hash(password, self.cost).map_err(|e| e.to_string())
    }

    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, String> {
        verify(password, hash).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lowest cost bcrypt accepts, keeps the tests fast
    const TEST_COST: u32 = 4;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(TEST_COST)
    }

    #[test]
    fn hash_and_verify_password() {
        let hash = hasher().hash("test_password_123").unwrap();

        assert!(hasher().verify("test_password_123", &hash).unwrap());
        assert!(!hasher().verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let first = hasher().hash("test_password_123").unwrap();
        let second = hasher().hash("test_password_123").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(PasswordHasher::validate("short").is_err());
        assert!(PasswordHasher::validate("long enough").is_ok());
    }
}

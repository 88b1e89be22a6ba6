use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use anyhow::anyhow;

/// Minimum password length, enforced before any database work.
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn is_acceptable(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("Failed to hash password: {e}"))
}

/// Constant answer on a malformed stored hash: treat it as a mismatch rather
/// than an error, so login never leaks which accounts have corrupt rows.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_min_length_policy() {
        assert!(!is_acceptable("12345"));
        assert!(is_acceptable("123456"));
    }
}

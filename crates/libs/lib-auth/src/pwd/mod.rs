//! # Password Hashing
//!
//! Password hashing and verification using Argon2. Only the PHC-formatted
//! hash (algorithm, parameters, salt, digest) is ever stored.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password with Argon2 and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, String> {
    if password.is_empty() {
        return Err("Password must not be empty".to_string());
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| format!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verify a plaintext password against an Argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| format!("Failed to parse hash: {}", e))?;

    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let password = "password";
        let hash = hash_password(password)
            .expect("Password hashing should succeed for valid password");

        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains(password));
        assert!(verify_password(password, &hash)
            .expect("Password verification should succeed for correct password"));
        assert!(!verify_password("WrongPassword", &hash)
            .expect("Password verification should fail for incorrect password"));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let first = hash_password("password").expect("hash");
        let second = hash_password("password").expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn test_empty_password_rejected() {
        assert_eq!(
            hash_password("").expect_err("Hash should fail for empty password"),
            "Password must not be empty"
        );
    }

    #[test]
    fn test_verify_with_malformed_hash() {
        assert!(verify_password("password", "not-a-phc-string").is_err());
    }
}

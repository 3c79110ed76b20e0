use bcrypt::BcryptError;

/// Hash a password for storage with the given bcrypt work factor
pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(password, cost)
}

/// A malformed stored hash never verifies
pub fn verify_password(password: &str, stored: &str) -> bool {
    match bcrypt::verify(password, stored) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("Unusable password hash: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Lowest cost bcrypt accepts; keeps the tests fast
    const COST: u32 = 4;

    #[test]
    fn verifies_correct_password_only() {
        let stored = hash_password("correct horse", COST).unwrap();
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("correct horse ", &stored));
        assert!(!verify_password("", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_password("same", COST).unwrap(), hash_password("same", COST).unwrap());
    }

    #[test]
    fn stored_hash_is_bcrypt_with_requested_cost() {
        let stored = hash_password("correct horse", COST).unwrap();
        assert!(stored.starts_with("$2b$04$"));
        assert!(!stored.contains("correct horse"));

        let slower = hash_password("correct horse", 5).unwrap();
        assert!(slower.starts_with("$2b$05$"));
    }

    #[test]
    fn cost_outside_bcrypt_range_is_an_error() {
        assert!(hash_password("anything", 3).is_err());
        assert!(hash_password("anything", 32).is_err());
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "no-separator"));
        assert!(!verify_password("anything", ""));
        // legacy salted sha256 format
        assert!(!verify_password("anything", "0123abcd$deadbeef"));
    }
}

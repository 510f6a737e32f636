//! Hash redaction - salted SHA-256 prefix

use super::RedactionStrategy;
use crate::config::secret::SecretString;
use crate::sanitization::models::PhiCategory;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};

/// Deterministic pseudonym: the first `length` hex digits of
/// SHA-256(salt ‖ matched)
#[derive(Debug, Clone)]
pub struct HashRedaction {
    salt: SecretString,
    length: usize,
}

impl HashRedaction {
    pub fn new(salt: SecretString, length: usize) -> Self {
        Self { salt, length }
    }
}

impl RedactionStrategy for HashRedaction {
    fn redact(&self, matched: &str, _category: PhiCategory, _label: Option<&str>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.salt.expose_secret().as_ref().as_bytes());
        hasher.update(matched.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest.chars().take(self.length).collect()
    }
}

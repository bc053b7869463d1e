use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use crate::errors::InternalError;

type HmacSha256 = Hmac<Sha256>;

const PASSWORD_LENGTH: usize = 20;
const PASSWORD_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                                  abcdefghijklmnopqrstuvwxyz\
                                  0123456789\
                                  !@#$%^&*()_+-=[]{}|;:,.<>?";

/// Cryptographic operations provider
///
/// Keyed hashing of session token ids and generation of one-time passwords
/// for operator-created identities.
pub struct CryptoProvider;

impl CryptoProvider {
    pub fn new() -> Self {
        Self
    }

    /// HMAC-SHA256 of `value` under `key`, as lowercase hex
    pub fn hmac_sha256_hex(&self, key: &str, value: &str) -> Result<String, InternalError> {
        let mut mac = HmacSha256::new_from_slice(key.as_bytes())
            .map_err(|e| InternalError::crypto("hmac_init", e.to_string()))?;
        mac.update(value.as_bytes());
        Ok(format!("{:x}", mac.finalize().into_bytes()))
    }

    /// Generate a 20-character password from letters, digits and symbols
    pub fn generate_secure_password(&self) -> String {
        let mut rng = rand::rng();
        (0..PASSWORD_LENGTH)
            .map(|_| PASSWORD_CHARSET[rng.random_range(0..PASSWORD_CHARSET.len())] as char)
            .collect()
    }
}

impl Default for CryptoProvider {
    fn default() -> Self {
        Self::new()
    }
}

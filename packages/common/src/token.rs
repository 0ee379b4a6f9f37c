use sha2::{Digest, Sha256};

/// Length in bytes of a freshly generated plaintext token.
pub const TOKEN_BYTES: usize = 32;

/// Generate a random plaintext token, hex-encoded (64 characters).
///
/// The plaintext is handed to the user; only its [`TokenDigest`] is persisted.
pub fn generate_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    hex::encode(bytes)
}

/// Error returned when a stored digest cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid token digest: {0}")]
pub struct InvalidDigest(String);

/// A SHA-256 digest of a secret token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenDigest([u8; 32]);

impl TokenDigest {
    /// Compute the digest of a plaintext token.
    pub fn compute(token: &str) -> Self {
        let hash = Sha256::digest(token.as_bytes());
        Self(hash.into())
    }

    /// Parse a hex-encoded digest as stored in the database.
    pub fn from_hex(s: &str) -> Result<Self, InvalidDigest> {
        if s.len() != 64 {
            return Err(InvalidDigest(format!(
                "expected 64 hex characters, got {}",
                s.len()
            )));
        }

        let bytes = hex::decode(s).map_err(|e| InvalidDigest(format!("invalid hex: {e}")))?;

        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| InvalidDigest("decoded to wrong length".into()))?;

        Ok(Self(arr))
    }

    /// Return the digest as a 64-character lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Check a plaintext token against this digest.
    ///
    /// Compares every byte so the running time does not depend on where
    /// the first mismatch is.
    pub fn matches(&self, token: &str) -> bool {
        let other = Self::compute(token);
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

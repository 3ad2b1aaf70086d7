//! Password digests and remember-token hashing.

use std::fmt;

use anyhow::anyhow;
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use rand::RngExt;
use sha2::Sha256;

use crate::error::MicroblogError;

/// Random bytes behind a remember token (128 bits).
pub const REMEMBER_TOKEN_BYTES: usize = 16;

/// Generate a fresh URL-safe remember token for a "remember me" cookie.
pub fn new_remember_token() -> String {
    let bytes: [u8; REMEMBER_TOKEN_BYTES] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Keyed one-way digest for remember tokens (HMAC-SHA256, hex).
///
/// Only the digest is stored; the plaintext token lives in the client cookie.
#[derive(Clone)]
pub struct RememberTokenHasher {
    mac: Hmac<Sha256>,
}

impl RememberTokenHasher {
    pub fn new(secret: &[u8]) -> Result<Self, MicroblogError> {
        if secret.is_empty() {
            return Err(MicroblogError::internal(
                anyhow!("remember token secret must not be empty"),
                "init remember token hmac",
            ));
        }
        let mac = Hmac::<Sha256>::new_from_slice(secret)
            .map_err(|e| MicroblogError::internal(anyhow!("{e}"), "init remember token hmac"))?;
        Ok(Self { mac })
    }

    /// Digest `token` for storage. Deterministic for a given secret.
    pub fn encrypt(&self, token: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl fmt::Debug for RememberTokenHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RememberTokenHasher").finish_non_exhaustive()
    }
}

/// Hash a plaintext password into an argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, MicroblogError> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| MicroblogError::internal(anyhow!("{e}"), "encode password salt"))?;
    let digest = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| MicroblogError::internal(anyhow!("{e}"), "hash password"))?;
    Ok(digest.to_string())
}

/// Well-formed argon2id digest with the default parameters that no password
/// matches. Verifying against it costs the same as verifying a real digest.
const UNMATCHABLE_DIGEST: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$bWljcm9ibG9nLWR1bW15IQ$CzBVep/E6Q4zWH2ix+wRNluApcrvFDleg6jN8hc8YYY";

/// Run a full password verification for an account that does not exist.
pub fn verify_unknown_password(password: &str) {
    let _ = verify_password(password, UNMATCHABLE_DIGEST);
}

/// Check `password` against a stored digest. A malformed digest never matches.
pub fn verify_password(password: &str, digest: &str) -> bool {
    match PasswordHash::new(digest) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password digest is malformed");
            false
        }
    }
}

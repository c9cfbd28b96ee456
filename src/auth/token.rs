// src/auth/token.rs
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// 32 random bytes, 43 characters once encoded.
pub const SESSION_TOKEN_BYTES: usize = 32;

pub type TokenHash = [u8; 32];

/// Fresh session token for the `session` cookie.
pub fn new_session_token() -> String {
    random_token(&mut OsRng, SESSION_TOKEN_BYTES)
}

/// Base64 URL-safe, unpadded, so it can sit in a cookie unescaped.
pub fn random_token<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&buf)
}

/// Session tokens are only ever held as hashes.
pub fn hash_token(token: &str) -> TokenHash {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(token.as_bytes()));
    out
}

/// Shared password and webhook secret check. Both sides are hashed first so
/// the comparison runs over equal-length input and never exits early.
pub fn secrets_match(presented: &str, expected: &str) -> bool {
    let (a, b) = (hash_token(presented), hash_token(expected));
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

//! PKCE (RFC 7636) parameter generation
//!
//! The passport service uses the S256 method. The verifier doubles as the
//! OAuth `state` value.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of random bytes behind the verifier (hex-encoded to 64 chars)
const VERIFIER_BYTES: usize = 32;

/// A PKCE verifier/challenge pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PkceParams {
    pub state: String,
    pub code_verifier: String,
    pub code_challenge: String,
}

impl PkceParams {
    /// Generate a fresh random pair
    pub fn generate() -> Self {
        let bytes: [u8; VERIFIER_BYTES] = rand::thread_rng().gen();
        Self::from_verifier(hex::encode(bytes))
    }

    /// Build the pair for a known verifier
    pub fn from_verifier(code_verifier: impl Into<String>) -> Self {
        let code_verifier = code_verifier.into();
        Self {
            state: code_verifier.clone(),
            code_challenge: Self::challenge_for(&code_verifier),
            code_verifier,
        }
    }

    /// `BASE64URL-NOPAD(SHA256(verifier))`
    pub fn challenge_for(code_verifier: &str) -> String {
        let digest = Sha256::digest(code_verifier.as_bytes());
        URL_SAFE_NO_PAD.encode(digest)
    }
}

//! # Ed25519 Ledger Keys
//!
//! Key generation, signer-address derivation, and detached signatures.
//!
//! ## Address Derivation
//!
//! The signer address is derived deterministically from the verifying
//! key: `0x` + hex of the last 20 bytes of `SHA-256(verifying_key)`.
//! The same signing key therefore always resolves to the same on-ledger
//! signer, and the evidence layer can match emitted events against the
//! address it derived locally.
//!
//! ## Serde
//!
//! Signatures travel as lowercase hex strings. The key pair itself is
//! deliberately not serializable.

use ed25519_dalek::{Signer, Verifier};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use tessera_core::SignerAddress;

/// Errors from key handling and signature operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Key parsing or generation failed.
    #[error("key error: {0}")]
    Key(String),

    /// A signature string could not be decoded.
    #[error("signature error: {0}")]
    Signature(String),
}

/// An Ed25519 key pair used to sign evidence transactions.
///
/// Does not implement `Serialize` or `Clone::into` raw bytes accessors;
/// the seed is reachable only through the signing operations.
pub struct LedgerKeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

impl LedgerKeyPair {
    /// Generate a fresh random key pair from the OS RNG.
    pub fn generate() -> Self {
        let mut rng = rand::rngs::OsRng;
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut rng),
        }
    }

    /// Reconstruct a key pair from a 64-character hex seed.
    pub fn from_seed_hex(seed_hex: &str) -> Result<Self, CryptoError> {
        let trimmed = seed_hex.trim();
        let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if stripped.len() != 64 || !stripped.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CryptoError::Key(format!(
                "seed must be 64 hex chars, got {} chars",
                stripped.len()
            )));
        }
        let mut seed = [0u8; 32];
        for (i, slot) in seed.iter_mut().enumerate() {
            let byte = u8::from_str_radix(&stripped[i * 2..i * 2 + 2], 16)
                .map_err(|e| CryptoError::Key(e.to_string()))?;
            *slot = byte;
        }
        let key = ed25519_dalek::SigningKey::from_bytes(&seed);
        seed.zeroize();
        Ok(Self { signing_key: key })
    }

    /// Derive the on-ledger signer address for this key.
    pub fn signer_address(&self) -> SignerAddress {
        let vk = self.signing_key.verifying_key();
        let digest = Sha256::digest(vk.as_bytes());
        let tail = &digest[digest.len() - 20..];
        let mut hex = String::with_capacity(42);
        hex.push_str("0x");
        for b in tail {
            hex.push_str(&format!("{b:02x}"));
        }
        // 20 bytes of hex always satisfy the address format.
        SignerAddress::new(&hex).unwrap_or_else(|_| unreachable!("derived address is well-formed"))
    }

    /// Produce a detached signature over `message`, hex-encoded.
    pub fn sign_hex(&self, message: &[u8]) -> String {
        let sig = self.signing_key.sign(message);
        sig.to_bytes().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// The verifying key, hex-encoded.
    pub fn verifying_key_hex(&self) -> String {
        self.signing_key
            .verifying_key()
            .as_bytes()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    /// Verify a hex-encoded detached signature produced by this key pair's
    /// verifying key.
    pub fn verify_hex(&self, message: &[u8], sig_hex: &str) -> Result<bool, CryptoError> {
        if sig_hex.len() != 128 || !sig_hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CryptoError::Signature(format!(
                "signature must be 128 hex chars, got {}",
                sig_hex.len()
            )));
        }
        let mut bytes = [0u8; 64];
        for (i, slot) in bytes.iter_mut().enumerate() {
            *slot = u8::from_str_radix(&sig_hex[i * 2..i * 2 + 2], 16)
                .map_err(|e| CryptoError::Signature(e.to_string()))?;
        }
        let sig = ed25519_dalek::Signature::from_bytes(&bytes);
        Ok(self
            .signing_key
            .verifying_key()
            .verify(message, &sig)
            .is_ok())
    }
}

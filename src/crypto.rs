//! Password encryption for stored UCS credentials
//!
//! Passwords are sealed with AES-256-GCM under a key derived from a static
//! passphrase compiled into the binary. This keeps plain-text passwords out
//! of the config file; it is not a defence against someone who has both the
//! file and the binary.
//!
//! Stored format: `base64(nonce[12] || ciphertext || tag[16])`

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroizing;

/// Passphrase the AES key is derived from
const STATIC_PASSPHRASE: &[u8] = b"random123456";

/// AES-GCM nonce length (96-bit)
const NONCE_LEN: usize = 12;

/// AES-GCM tag length (128-bit)
const TAG_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Encryption failed")]
    Encrypt,

    #[error("Decryption failed: stored password was not produced by this key")]
    Decrypt,

    #[error("Stored password is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Stored password is too short ({0} bytes)")]
    TooShort(usize),

    #[error("Decrypted password is not valid UTF-8")]
    InvalidUtf8,
}

/// Symmetric cipher for credentials at rest
#[derive(Clone)]
pub struct PasswordCipher {
    key: [u8; 32],
}

impl std::fmt::Debug for PasswordCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCipher").finish_non_exhaustive()
    }
}

impl Default for PasswordCipher {
    fn default() -> Self {
        Self::from_passphrase(STATIC_PASSPHRASE)
    }
}

impl PasswordCipher {
    /// Derives the AES-256 key as SHA-256 of `passphrase`
    pub fn from_passphrase(passphrase: &[u8]) -> Self {
        let digest = Sha256::digest(passphrase);
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self { key }
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key))
    }

    /// Encrypts a plain-text password with a fresh random nonce
    pub fn encrypt(&self, password: &str) -> Result<String, CryptoError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher()
            .encrypt(&nonce, password.as_bytes())
            .map_err(|_| CryptoError::Encrypt)?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&ciphertext);

        Ok(STANDARD.encode(payload))
    }

    /// Decrypts a password produced by [`PasswordCipher::encrypt`]
    pub fn decrypt(&self, stored: &str) -> Result<Zeroizing<String>, CryptoError> {
        let payload = Zeroizing::new(STANDARD.decode(stored.trim().as_bytes())?);
        if payload.len() < NONCE_LEN + TAG_LEN {
            return Err(CryptoError::TooShort(payload.len()));
        }

        let (nonce, ciphertext) = payload.split_at(NONCE_LEN);
        let plaintext = self
            .cipher()
            .decrypt(Nonce::<U12>::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::Decrypt)?;

        String::from_utf8(plaintext)
            .map(Zeroizing::new)
            .map_err(|_| CryptoError::InvalidUtf8)
    }
}

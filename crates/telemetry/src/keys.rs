//! Public-key material for encrypting usage reports.

use once_cell::sync::OnceCell;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};

use crate::error::{Result, TelemetryError};

/// Hex-encoded DER (SubjectPublicKeyInfo) image of the stats service's
/// public key. Only the service holds the matching private key.
pub const DEFAULT_KEY_IMAGE: &str = "30819f300d06092a864886f70d010101050003818d0030818902818100c14970473bd90fd1f2d20e4fa6e36ea21f7d46db2f4104a3a8f2eb097d6e26278dfadf3fe9ed05bbbb00a4433f4b7151e6683a169182e6ff2f6b4f2bb6490b2cddef73148c37a2a7421fc75f99fb0fadab46f191806599a208652f4829fd6f76e13195fb81ff3f2fce15a8e9a85ebe15c07c90b34ebdb416bd119f0d74105f3b0203010001";

/// PKCS#1 v1.5 padding overhead per encrypted block, in bytes.
const PKCS1_PADDING_OVERHEAD: usize = 11;

/// An encryption key image plus its lazily decoded public key.
///
/// Decoding happens at most once per instance; every caller after the first
/// sees the same cached key. A decode failure means the image itself is
/// malformed, which for the compiled-in default is a configuration defect,
/// not a runtime condition.
pub struct ReportKey {
    key_image: String,
    decoded: OnceCell<RsaPublicKey>,
}

impl ReportKey {
    /// Key material for the default stats-service key.
    pub fn new() -> Self {
        Self::with_key_image(DEFAULT_KEY_IMAGE)
    }

    /// Key material for a specific key image (used by tests).
    pub fn with_key_image(key_image: impl Into<String>) -> Self {
        Self {
            key_image: key_image.into(),
            decoded: OnceCell::new(),
        }
    }

    /// Decode the key image, caching the result for all subsequent calls.
    pub fn public_key(&self) -> Result<&RsaPublicKey> {
        self.decoded.get_or_try_init(|| {
            let der = hex::decode(&self.key_image)
                .map_err(|e| TelemetryError::KeyDecode(format!("invalid hex in key image: {e}")))?;
            RsaPublicKey::from_public_key_der(&der)
                .map_err(|e| TelemetryError::KeyDecode(format!("invalid public key: {e}")))
        })
    }

    /// Build a fresh cipher handle over the cached key.
    pub fn cipher(&self) -> Result<ReportCipher<'_>> {
        Ok(ReportCipher {
            key: self.public_key()?,
        })
    }
}

impl Default for ReportKey {
    fn default() -> Self {
        Self::new()
    }
}

/// RSA encryption handle for a single payload.
///
/// Contract with the decrypting party: plaintext is split into chunks of at
/// most `key size - 11` bytes (the PKCS#1 v1.5 overhead), each chunk is
/// encrypted on its own, and the ciphertext is the concatenation of the
/// resulting key-size blocks.
pub struct ReportCipher<'a> {
    key: &'a RsaPublicKey,
}

impl ReportCipher<'_> {
    /// Ciphertext block size in bytes, fixed by the key.
    pub fn block_len(&self) -> usize {
        self.key.size()
    }

    /// Largest plaintext chunk a single block can carry.
    pub fn max_chunk_len(&self) -> usize {
        self.key.size() - PKCS1_PADDING_OVERHEAD
    }

    /// Encrypt a byte stream of arbitrary length.
    pub fn encrypt_stream(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut rng = rand::thread_rng();
        let blocks = plaintext.len().div_ceil(self.max_chunk_len());
        let mut ciphertext = Vec::with_capacity(blocks * self.block_len());
        for chunk in plaintext.chunks(self.max_chunk_len()) {
            let block = self
                .key
                .encrypt(&mut rng, Pkcs1v15Encrypt, chunk)
                .map_err(|e| TelemetryError::Crypto(format!("encryption failed: {e}")))?;
            ciphertext.extend_from_slice(&block);
        }
        Ok(ciphertext)
    }
}

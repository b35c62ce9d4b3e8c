//! Transport encoding for usage snapshots: JSON → gzip → RSA → base64.

use std::io::{Read, Write};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey};

use crate::error::{Result, TelemetryError};
use crate::keys::ReportCipher;
use crate::snapshot::UsageSnapshot;

/// Encode a snapshot for embedding in a plain-text channel, e.g. a URL
/// parameter or form field in a rendered page.
///
/// Stages, in order: serialize to UTF-8 JSON bytes, gzip, RSA-encrypt
/// (block-chunked, see [`ReportCipher`]), base64. The result is a single
/// line with no surrounding whitespace. Any stage failure surfaces as an
/// error; no partial output is produced.
pub fn encode_snapshot(snapshot: &UsageSnapshot, cipher: &ReportCipher<'_>) -> Result<String> {
    let json = serde_json::to_vec(snapshot)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;

    let ciphertext = cipher.encrypt_stream(&compressed)?;
    Ok(BASE64.encode(ciphertext))
}

/// Decode a payload produced by [`encode_snapshot`], returning the UTF-8
/// JSON bytes.
///
/// Used in tests and as a reference implementation for the receiving
/// service: base64-decode, split the ciphertext every key-size bytes,
/// decrypt each block, concatenate, gunzip.
pub fn decode_snapshot(key: &RsaPrivateKey, encoded: &str) -> Result<Vec<u8>> {
    let ciphertext = BASE64
        .decode(encoded)
        .map_err(|e| TelemetryError::Encoding(format!("invalid base64: {e}")))?;

    let block_len = key.size();
    if ciphertext.len() % block_len != 0 {
        return Err(TelemetryError::Crypto(format!(
            "ciphertext length {} is not a multiple of the {block_len}-byte block size",
            ciphertext.len()
        )));
    }

    let mut compressed = Vec::new();
    for block in ciphertext.chunks(block_len) {
        let chunk = key
            .decrypt(Pkcs1v15Encrypt, block)
            .map_err(|e| TelemetryError::Crypto(format!("decryption failed: {e}")))?;
        compressed.extend_from_slice(&chunk);
    }

    let mut json = Vec::new();
    GzDecoder::new(compressed.as_slice()).read_to_end(&mut json)?;
    Ok(json)
}

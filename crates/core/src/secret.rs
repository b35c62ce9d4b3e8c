//! Installation secret management.
//!
//! Each installation holds a random secret used to derive a stable,
//! non-reversible installation identity. The secret is generated on first
//! use and persisted as a hex file under the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use rand::RngCore;

use crate::error::{GantryError, Result};

/// Length of the installation secret in bytes.
pub const SECRET_LEN: usize = 32;

/// Location of the secret file within a data directory.
pub fn secret_path(data_dir: &str) -> PathBuf {
    Path::new(data_dir).join("install.secret")
}

/// Load the installation secret, generating and persisting it on first use.
///
/// The file holds the secret hex-encoded on a single line. A file of the
/// wrong length or with non-hex content is rejected rather than silently
/// regenerated, since regeneration would change the installation identity.
pub fn load_or_create(path: &Path) -> Result<Vec<u8>> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let secret = hex::decode(content.trim())
            .map_err(|e| GantryError::Secret(format!("corrupt secret file: {e}")))?;
        if secret.len() != SECRET_LEN {
            return Err(GantryError::Secret(format!(
                "secret file holds {} bytes, expected {SECRET_LEN}",
                secret.len()
            )));
        }
        return Ok(secret);
    }

    let mut secret = vec![0u8; SECRET_LEN];
    rand::thread_rng().fill_bytes(&mut secret);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, hex::encode(&secret))?;
    Ok(secret)
}

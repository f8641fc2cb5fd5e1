//! Secret Key Manager
//!
//! One symmetric key per agent, kept in its own file next to the configuration
//! document. The key is created on first use and never regenerated afterwards.

use crate::error::ConfigError;
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Key length in bytes (128-bit)
pub const SECRET_KEY_LEN: usize = 16;

/// Symmetric key material
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey([u8; SECRET_KEY_LEN]);

impl SecretKey {
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.0
    }

    fn generate() -> Self {
        let mut bytes = [0u8; SECRET_KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        SecretKey(bytes)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Lazily creates or loads the key file
pub struct SecretKeyManager {
    path: PathBuf,
    key: OnceLock<SecretKey>,
    init_lock: Mutex<()>,
}

impl SecretKeyManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The key, loading or generating it on first call
    ///
    /// Concurrent first calls generate at most one key; later calls never touch disk.
    pub fn secret_key(&self) -> Result<SecretKey, ConfigError> {
        if let Some(key) = self.key.get() {
            return Ok(key.clone());
        }

        let _guard = self.init_lock.lock();
        if let Some(key) = self.key.get() {
            return Ok(key.clone());
        }

        let key = if self.path.exists() {
            self.load()?
        } else {
            let key = SecretKey::generate();
            self.persist(&key)?;
            tracing::info!(path = %self.path.display(), "Generated new secret key");
            key
        };
        Ok(self.key.get_or_init(|| key).clone())
    }

    fn load(&self) -> Result<SecretKey, ConfigError> {
        let bytes = fs::read(&self.path).map_err(|e| ConfigError::persistence(&self.path, e))?;
        let bytes: [u8; SECRET_KEY_LEN] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| ConfigError::InvalidSecretKey {
                    path: self.path.clone(),
                    reason: format!("expected {} bytes, found {}", SECRET_KEY_LEN, bytes.len()),
                })?;
        Ok(SecretKey(bytes))
    }

    fn persist(&self, key: &SecretKey) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::persistence(parent, e))?;
            }
        }

        // the key file only ever appears complete
        let tmp_path = self.tmp_path();
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&tmp_path)
            .map_err(|e| ConfigError::persistence(&tmp_path, e))?;
        file.write_all(key.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| ConfigError::persistence(&tmp_path, e))?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(|e| ConfigError::persistence(&self.path, e))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::crypto::{KdfParams, decrypt_to_string, encrypt_with_password};
use crate::error::{Result, VaultError};
use crate::models::{AppData, EncryptedPayload};

pub const VAULT_FILE_NAME: &str = "clipboard-manager-data.enc";
const TEMP_SUFFIX: &str = ".tmp";

/// Handle on the encrypted vault file at a fixed path.
#[derive(Debug, Clone)]
pub struct VaultFile {
    path: PathBuf,
    params: KdfParams,
}

impl VaultFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_params(path, KdfParams::default())
    }

    pub fn with_params(path: impl Into<PathBuf>, params: KdfParams) -> Self {
        Self {
            path: path.into(),
            params,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn params(&self) -> KdfParams {
        self.params
    }

    /// Sibling file the next save is staged in.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(TEMP_SUFFIX);
        PathBuf::from(name)
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Encrypts `data` under fresh salt and IV, stages it in the temp file and
    /// renames it over the vault.
    pub fn save(&self, data: &AppData, password: &str) -> Result<()> {
        let plaintext = Zeroizing::new(serde_json::to_string(data)?);
        let payload = encrypt_with_password(&plaintext, password, self.params)?;
        let envelope = serde_json::to_string(&payload)?;

        ensure_parent_dir(&self.path)?;
        let tmp = self.temp_path();
        if let Err(e) = write_synced(&tmp, envelope.as_bytes()) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        fs::rename(&tmp, &self.path)?;
        info!(path = %self.path.display(), "Vault saved");
        Ok(())
    }

    pub fn read_payload(&self) -> Result<EncryptedPayload> {
        let raw = fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw)
            .map_err(|e| VaultError::CorruptVault(format!("invalid envelope: {e}")))
    }

    pub fn load(&self, password: &str) -> Result<AppData> {
        let payload = self.read_payload()?;
        let plaintext = decrypt_to_string(&payload, password, self.params)?;
        let data: AppData = serde_json::from_str(&plaintext)
            .map_err(|e| VaultError::CorruptVault(format!("invalid vault contents: {e}")))?;
        debug!(path = %self.path.display(), nodes = data.node_ids().len(), "Vault loaded");
        Ok(data)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    restrict_file(path)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.sync_all()
}

pub(crate) fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent)?;
            restrict_dir(parent)
        }
        _ => Ok(()),
    }
}

pub(crate) fn restrict_file(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if path.exists() {
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
    }
    Ok(())
}

pub(crate) fn restrict_dir(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if path.exists() {
            fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
        }
    }
    Ok(())
}

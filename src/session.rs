use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};
use crate::models::{AppData, Direction, NodeUpdate};
use crate::storage::VaultFile;
use crate::store::TreeStore;

/// Holds the unlocked password for the lifetime of a session.
///
/// Locked until [`setup`](Self::setup) or [`unlock`](Self::unlock) succeeds;
/// [`lock`](Self::lock) drops the password, zeroizing it.
pub struct Session {
    vault: VaultFile,
    password: Option<Zeroizing<String>>,
}

impl Session {
    pub fn new(vault: VaultFile) -> Self {
        Self {
            vault,
            password: None,
        }
    }

    pub fn vault(&self) -> &VaultFile {
        &self.vault
    }

    pub fn vault_exists(&self) -> bool {
        self.vault.exists()
    }

    pub fn is_unlocked(&self) -> bool {
        self.password.is_some()
    }

    /// Creates the vault with an empty tree and unlocks it.
    pub fn setup(&mut self, password: &str) -> Result<AppData> {
        if self.vault.exists() {
            return Err(VaultError::AlreadyInitialized);
        }
        let data = AppData::default();
        self.vault.save(&data, password)?;
        self.password = Some(Zeroizing::new(password.to_owned()));
        info!(path = %self.vault.path().display(), "Vault created");
        Ok(data)
    }

    /// On failure the session state is left exactly as it was.
    pub fn unlock(&mut self, password: &str) -> Result<AppData> {
        match self.vault.load(password) {
            Ok(data) => {
                self.password = Some(Zeroizing::new(password.to_owned()));
                info!("Vault unlocked");
                Ok(data)
            }
            Err(e) => {
                warn!(error = %e, "Unlock failed");
                Err(e)
            }
        }
    }

    pub fn lock(&mut self) {
        if self.password.take().is_some() {
            info!("Vault locked");
        }
    }

    /// Tree for display. Falls back to the empty tree when locked or when the
    /// vault cannot be read.
    pub fn load(&self) -> AppData {
        let Some(password) = &self.password else {
            return AppData::default();
        };
        if !self.vault.exists() {
            return AppData::default();
        }
        match self.vault.load(password) {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "Failed to load vault; showing empty tree");
                AppData::default()
            }
        }
    }

    pub fn store(&self) -> Result<TreeStore<'_>> {
        match &self.password {
            Some(password) => Ok(TreeStore::new(&self.vault, password)),
            None => Err(VaultError::NotAuthenticated),
        }
    }

    pub fn create_group(&self, parent_id: Option<&str>, name: &str) -> Result<AppData> {
        self.store()?.create_group(parent_id, name)
    }

    pub fn create_item(
        &self,
        parent_id: Option<&str>,
        name: &str,
        description: &str,
        content: &str,
    ) -> Result<AppData> {
        self.store()?
            .create_item(parent_id, name, description, content)
    }

    pub fn update_node(&self, id: &str, update: &NodeUpdate) -> Result<AppData> {
        self.store()?.update_node(id, update)
    }

    pub fn delete_node(&self, id: &str) -> Result<AppData> {
        self.store()?.delete_node(id)
    }

    pub fn reorder_node(&self, id: &str, direction: Direction) -> Result<AppData> {
        self.store()?.reorder_node(id, direction)
    }
}

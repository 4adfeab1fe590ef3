use thiserror::Error;

pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(Error, Debug)]
pub enum VaultError {
    /// Tag verification failed. Wrong password and tampering are deliberately
    /// reported the same way.
    #[error("Decryption failed - wrong password or corrupted vault")]
    Authentication,

    #[error("Vault file is corrupt: {0}")]
    CorruptVault(String),

    /// A mutation was attempted while the session is locked.
    #[error("Vault is locked")]
    NotAuthenticated,

    #[error("A vault already exists at this location")]
    AlreadyInitialized,

    /// The OS randomness source failed. Never retried with a weaker source.
    #[error("System randomness unavailable: {0}")]
    Randomness(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl VaultError {
    /// Message safe to show at the UI boundary.
    pub fn user_message(&self) -> &'static str {
        match self {
            VaultError::Authentication => "Wrong password",
            VaultError::CorruptVault(_) => "Vault file is damaged",
            VaultError::NotAuthenticated => "Vault is locked",
            VaultError::AlreadyInitialized => "A vault already exists",
            _ => "Operation failed",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, VaultError::Randomness(_))
    }
}

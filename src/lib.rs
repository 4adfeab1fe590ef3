//! Password-protected vault holding a tree of groups and clipboard items.
//!
//! The tree is stored as one AES-256-GCM encrypted file whose key is derived
//! from the master password with PBKDF2-HMAC-SHA512. A [`Session`] holds the
//! password once unlocked and hands out a [`TreeStore`] for mutations.

pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod navigation;
pub mod search;
pub mod session;
pub mod storage;
pub mod store;
pub mod tree;

pub use crypto::KdfParams;
pub use error::{Result, VaultError};
pub use models::{AppData, Direction, GroupNode, ItemNode, Node, NodeId, NodeUpdate};
pub use search::{SearchHit, search};
pub use session::Session;
pub use storage::VaultFile;
pub use store::TreeStore;

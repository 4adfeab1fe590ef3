use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{AppData, Direction, NodeUpdate};
use crate::storage::VaultFile;
use crate::tree;

/// Tree mutations against the vault file. Only obtainable from an unlocked
/// [`Session`](crate::session::Session), so holding one proves the password is
/// present.
///
/// Every operation loads the current tree, mutates that fresh copy, persists it
/// and returns exactly what was written. An unknown id leaves the tree as it was
/// but it is still written back.
pub struct TreeStore<'a> {
    vault: &'a VaultFile,
    password: &'a str,
}

impl<'a> TreeStore<'a> {
    pub(crate) fn new(vault: &'a VaultFile, password: &'a str) -> Self {
        Self { vault, password }
    }

    /// Current tree, strictly: decrypt and parse failures propagate. A vault
    /// that was never written is the empty tree.
    pub fn tree(&self) -> Result<AppData> {
        if !self.vault.exists() {
            return Ok(AppData::default());
        }
        self.vault.load(self.password)
    }

    fn commit(&self, mutate: impl FnOnce(&mut AppData) -> bool) -> Result<AppData> {
        let mut data = self.tree()?;
        let changed = mutate(&mut data);
        self.vault.save(&data, self.password)?;
        debug!(changed, "Tree committed");
        Ok(data)
    }

    pub fn create_group(&self, parent_id: Option<&str>, name: &str) -> Result<AppData> {
        self.commit(|data| {
            let node = tree::new_group(name);
            debug!(id = node.id(), parent_id, "Creating group");
            let inserted = tree::insert_node(data, parent_id, node);
            if !inserted {
                warn!(parent_id, "Parent is not an existing group; group not created");
            }
            inserted
        })
    }

    pub fn create_item(
        &self,
        parent_id: Option<&str>,
        name: &str,
        description: &str,
        content: &str,
    ) -> Result<AppData> {
        self.commit(|data| {
            let node = tree::new_item(name, description, content);
            debug!(id = node.id(), parent_id, "Creating item");
            let inserted = tree::insert_node(data, parent_id, node);
            if !inserted {
                warn!(parent_id, "Parent is not an existing group; item not created");
            }
            inserted
        })
    }

    pub fn update_node(&self, id: &str, update: &NodeUpdate) -> Result<AppData> {
        self.commit(|data| {
            let updated = tree::apply_update(data, id, update);
            if !updated {
                warn!(id, "Update target not found");
            }
            updated
        })
    }

    pub fn delete_node(&self, id: &str) -> Result<AppData> {
        self.commit(|data| match tree::remove_node(data, id) {
            Some(_) => {
                debug!(id, "Node deleted");
                true
            }
            None => {
                warn!(id, "Delete target not found");
                false
            }
        })
    }

    pub fn reorder_node(&self, id: &str, direction: Direction) -> Result<AppData> {
        self.commit(|data| {
            let moved = tree::reorder_node(data, id, direction);
            if !moved {
                debug!(id, ?direction, "Reorder had no effect");
            }
            moved
        })
    }
}

//! In-memory demo item store.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Maximum length of an item name.
pub const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
}

/// Volatile item store keyed by sequential integer id.
pub struct ItemStore {
    items: Mutex<Vec<Item>>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    pub fn create(&self, name: String) -> Item {
        let mut items = self.items.lock().expect("item store poisoned");
        let item = Item {
            id: items.len() as u64 + 1,
            name,
        };
        items.push(item.clone());
        item
    }

    pub fn get(&self, id: u64) -> Option<Item> {
        self.items
            .lock()
            .expect("item store poisoned")
            .iter()
            .find(|item| item.id == id)
            .cloned()
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

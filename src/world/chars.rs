//! Playable characters, their inventories, and the active party roster.
//! Only the fields the scripted layer touches are modeled; stats, classes
//! and abilities live in the full data model outside this crate.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value;

use super::path;

pub type CharRef = Rc<RefCell<MainChar>>;

/// One inventory slot of a character.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemSlot {
    pub key_name: String,
    pub index: usize,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub equipped: bool,
    #[serde(default)]
    pub broken: bool,
}

fn default_quantity() -> u32 {
    1
}

pub struct MainChar {
    pub key_name: String,
    pub name: String,
    pub items: Vec<ItemSlot>,
    /// Free-form property bag addressed by dotted paths from scripted events.
    pub props: Value,
}

impl MainChar {
    pub fn new(key_name: &str, name: &str) -> Self {
        Self {
            key_name: key_name.to_owned(),
            name: name.to_owned(),
            items: Vec::new(),
            props: Value::Null,
        }
    }

    pub fn with_items(mut self, items: Vec<ItemSlot>) -> Self {
        self.items = items;
        self
    }

    pub fn slot_by_index(&self, index: usize) -> Option<&ItemSlot> {
        self.items.iter().find(|slot| slot.index == index)
    }

    pub fn slot_by_item_key(&self, item_key: &str) -> Option<&ItemSlot> {
        self.items.iter().find(|slot| slot.key_name == item_key)
    }

    pub fn set_property(&mut self, property: &str, value: Value) {
        path::set(&mut self.props, property, value);
    }
}

/// The active party roster. Capacity rules (front/back line, size limits)
/// belong to the battle system; this layer only tracks membership order.
#[derive(Default)]
pub struct PartyData {
    members: Vec<CharRef>,
}

impl PartyData {
    pub fn add_member(&mut self, member: &CharRef) {
        let key = member.borrow().key_name.clone();
        if self.contains(&key) {
            return;
        }
        self.members.push(member.clone());
    }

    pub fn remove_member(&mut self, key_name: &str) {
        self.members.retain(|m| m.borrow().key_name != key_name);
    }

    pub fn contains(&self, key_name: &str) -> bool {
        self.members.iter().any(|m| m.borrow().key_name == key_name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

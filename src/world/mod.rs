// ── World model ─────────────────────────────────────────────────────────────
//
// The party/world collaborator the event system mutates: playable characters
// and the party roster, field characters (the hero plus labeled NPCs),
// interactable objects, and tile events. Everything is looked up by key,
// label, or index and mutated through dotted property paths — a failed
// lookup is scripted-content territory, so callers warn and skip rather
// than error.

pub mod chars;
pub mod path;
pub mod storage;
pub mod tile_event;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use serde_json::Value;
use tracing::warn;

pub use chars::{CharRef, ItemSlot, MainChar, PartyData};
pub use storage::Storage;
pub use tile_event::{Direction, TileEvent};

pub type FieldCharRef = Rc<RefCell<FieldChar>>;
pub type InteractableRef = Rc<RefCell<InteractableObject>>;
pub type TileEventRef = Rc<RefCell<TileEvent>>;

/// A character standing on the map: the hero or a labeled NPC.
pub struct FieldChar {
    pub label: String,
    pub active: bool,
    pub visible: bool,
    pub position: Vec2,
    /// Optional `property → storage key` bindings; `check_storage_keys`
    /// re-syncs the bound properties from storage after scripted writes.
    pub storage_keys: HashMap<String, String>,
    pub props: Value,
}

impl FieldChar {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            active: true,
            visible: true,
            position: Vec2::ZERO,
            storage_keys: HashMap::new(),
            props: Value::Null,
        }
    }

    /// Activate or deactivate this character (presence and visibility move
    /// together for scripted toggles).
    pub fn toggle_active(&mut self, activate: bool) {
        self.active = activate;
        self.visible = activate;
    }

    /// Re-read every storage-bound property from `storage`.
    pub fn check_storage_keys(&mut self, storage: &Storage) {
        let bindings: Vec<(String, String)> =
            self.storage_keys.iter().map(|(p, k)| (p.clone(), k.clone())).collect();
        for (property, key) in bindings {
            let Some(value) = storage.get(&key) else { continue };
            self.set_property(&property, value);
        }
    }

    pub fn set_property(&mut self, property: &str, value: Value) {
        match property {
            "active" => {
                if let Some(active) = value.as_bool() {
                    self.active = active;
                }
            }
            "visible" => {
                if let Some(visible) = value.as_bool() {
                    self.visible = visible;
                }
            }
            _ => path::set(&mut self.props, property, value),
        }
    }
}

/// A map object the hero can interact with (pushable pillar, lever, chest).
pub struct InteractableObject {
    pub label: String,
    pub collision_active: bool,
    /// Set once the physics body is permanently removed; collision toggles
    /// on a removed body are skipped.
    pub body_removed: bool,
    pub props: Value,
}

impl InteractableObject {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            collision_active: true,
            body_removed: false,
            props: Value::Null,
        }
    }

    pub fn toggle_collision(&mut self, enable: bool) {
        if self.body_removed {
            warn!(target: "world", "collision toggle on removed body of \"{}\"", self.label);
            return;
        }
        self.collision_active = enable;
    }

    /// Permanently remove the collision body.
    pub fn destroy_body(&mut self) {
        self.body_removed = true;
        self.collision_active = false;
    }

    pub fn set_property(&mut self, property: &str, value: Value) {
        path::set(&mut self.props, property, value);
    }
}

struct WorldState {
    hero: FieldCharRef,
    main_chars: HashMap<String, CharRef>,
    npcs: Vec<FieldCharRef>,
    npc_labels: HashMap<String, usize>,
    interactables: Vec<InteractableRef>,
    interactable_labels: HashMap<String, usize>,
    tile_events: Vec<TileEventRef>,
    tile_event_labels: HashMap<String, usize>,
    party: PartyData,
}

/// Clonable handle to the shared world state.
#[derive(Clone)]
pub struct World {
    state: Rc<RefCell<WorldState>>,
}

impl World {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(WorldState {
                hero: Rc::new(RefCell::new(FieldChar::new("hero"))),
                main_chars: HashMap::new(),
                npcs: Vec::new(),
                npc_labels: HashMap::new(),
                interactables: Vec::new(),
                interactable_labels: HashMap::new(),
                tile_events: Vec::new(),
                tile_event_labels: HashMap::new(),
                party: PartyData::default(),
            })),
        }
    }

    pub fn hero(&self) -> FieldCharRef {
        self.state.borrow().hero.clone()
    }

    // ── Main characters & party ────────────────────────────────────────────

    pub fn add_main_char(&self, main_char: MainChar) -> CharRef {
        let key = main_char.key_name.clone();
        let char_ref = Rc::new(RefCell::new(main_char));
        self.state.borrow_mut().main_chars.insert(key, char_ref.clone());
        char_ref
    }

    pub fn get_char(&self, key_name: &str) -> Option<CharRef> {
        self.state.borrow().main_chars.get(key_name).cloned()
    }

    pub fn add_to_party(&self, member: &CharRef) {
        self.state.borrow_mut().party.add_member(member);
    }

    pub fn remove_from_party(&self, key_name: &str) {
        self.state.borrow_mut().party.remove_member(key_name);
    }

    pub fn party_contains(&self, key_name: &str) -> bool {
        self.state.borrow().party.contains(key_name)
    }

    pub fn party_len(&self) -> usize {
        self.state.borrow().party.len()
    }

    // ── NPCs ───────────────────────────────────────────────────────────────

    pub fn add_npc(&self, npc: FieldChar) -> FieldCharRef {
        let label = npc.label.clone();
        let npc_ref = Rc::new(RefCell::new(npc));
        let mut state = self.state.borrow_mut();
        let index = state.npcs.len();
        state.npcs.push(npc_ref.clone());
        state.npc_labels.insert(label, index);
        npc_ref
    }

    pub fn npc_by_label(&self, label: &str) -> Option<FieldCharRef> {
        let state = self.state.borrow();
        state.npc_labels.get(label).and_then(|&i| state.npcs.get(i)).cloned()
    }

    pub fn npc_by_index(&self, index: usize) -> Option<FieldCharRef> {
        self.state.borrow().npcs.get(index).cloned()
    }

    // ── Interactable objects ───────────────────────────────────────────────

    pub fn add_interactable(&self, interactable: InteractableObject) -> InteractableRef {
        let label = interactable.label.clone();
        let io_ref = Rc::new(RefCell::new(interactable));
        let mut state = self.state.borrow_mut();
        let index = state.interactables.len();
        state.interactables.push(io_ref.clone());
        state.interactable_labels.insert(label, index);
        io_ref
    }

    pub fn interactable_by_label(&self, label: &str) -> Option<InteractableRef> {
        let state = self.state.borrow();
        state.interactable_labels.get(label).and_then(|&i| state.interactables.get(i)).cloned()
    }

    pub fn interactable_by_index(&self, index: usize) -> Option<InteractableRef> {
        self.state.borrow().interactables.get(index).cloned()
    }

    // ── Tile events ────────────────────────────────────────────────────────

    /// Register a tile event; its `index` is assigned here.
    pub fn add_tile_event(&self, mut tile_event: TileEvent) -> TileEventRef {
        let mut state = self.state.borrow_mut();
        let index = state.tile_events.len();
        tile_event.index = index;
        if let Some(label) = tile_event.label.clone() {
            state.tile_event_labels.insert(label, index);
        }
        let event_ref = Rc::new(RefCell::new(tile_event));
        state.tile_events.push(event_ref.clone());
        event_ref
    }

    pub fn tile_event_by_label(&self, label: &str) -> Option<TileEventRef> {
        let state = self.state.borrow();
        state.tile_event_labels.get(label).and_then(|&i| state.tile_events.get(i)).cloned()
    }

    pub fn tile_event_by_index(&self, index: usize) -> Option<TileEventRef> {
        self.state.borrow().tile_events.get(index).cloned()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

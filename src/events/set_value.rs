//! Value-Set: writes a value into persistent storage or into a dotted
//! property path of a world entity.

use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::GameEvent;

/// Which world entity a game-info write addresses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameInfoTarget {
    Char,
    Hero,
    Npc,
    InteractableObject,
    TileEvent,
}

/// The write a Value-Set event performs.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventValue {
    /// Persistent key-value storage write.
    Storage { key_name: String, value: Value },
    /// Dotted-path write on a world entity, addressed by key, label, or index.
    GameInfo {
        target: GameInfoTarget,
        #[serde(default)]
        key_name: Option<String>,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        index: Option<usize>,
        property: String,
        value: Value,
    },
}

pub struct SetValueEvent {
    pub(crate) value: EventValue,
    /// After a storage write, re-sync the origin NPC's storage-bound flags.
    pub(crate) check_npc_storage_values: bool,
}

impl SetValueEvent {
    pub(crate) fn fire(&self, event: &Rc<GameEvent>) {
        let ctx = event.context();
        match &self.value {
            EventValue::Storage { key_name, value } => {
                ctx.storage.set(key_name, value.clone());
                if self.check_npc_storage_values {
                    if let Some(origin) = event.origin() {
                        origin.borrow_mut().check_storage_keys(&ctx.storage);
                    }
                }
            }
            EventValue::GameInfo { target, key_name, label, index, property, value } => {
                match target {
                    GameInfoTarget::Char => {
                        let Some(char_ref) =
                            key_name.as_deref().and_then(|k| ctx.world.get_char(k))
                        else {
                            warn!(target: "events", "set_value: unknown char {key_name:?}");
                            return;
                        };
                        char_ref.borrow_mut().set_property(property, value.clone());
                    }
                    GameInfoTarget::Hero => {
                        ctx.world.hero().borrow_mut().set_property(property, value.clone());
                    }
                    GameInfoTarget::Npc => {
                        let npc = label
                            .as_deref()
                            .and_then(|l| ctx.world.npc_by_label(l))
                            .or_else(|| index.and_then(|i| ctx.world.npc_by_index(i)));
                        let Some(npc) = npc else {
                            warn!(target: "events", "set_value: unknown npc {label:?}/{index:?}");
                            return;
                        };
                        npc.borrow_mut().set_property(property, value.clone());
                    }
                    GameInfoTarget::InteractableObject => {
                        let io = label
                            .as_deref()
                            .and_then(|l| ctx.world.interactable_by_label(l))
                            .or_else(|| index.and_then(|i| ctx.world.interactable_by_index(i)));
                        let Some(io) = io else {
                            warn!(target: "events", "set_value: unknown interactable {label:?}/{index:?}");
                            return;
                        };
                        io.borrow_mut().set_property(property, value.clone());
                    }
                    GameInfoTarget::TileEvent => {
                        let te = label
                            .as_deref()
                            .and_then(|l| ctx.world.tile_event_by_label(l))
                            .or_else(|| index.and_then(|i| ctx.world.tile_event_by_index(i)));
                        let Some(te) = te else {
                            warn!(target: "events", "set_value: unknown tile event {label:?}/{index:?}");
                            return;
                        };
                        te.borrow_mut().set_property(property, value.clone());
                    }
                }
            }
        }
    }
}

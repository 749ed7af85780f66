//! Item-Check: resolves a character's inventory slot and branches the event
//! graph on the outcome. Scripted content errors fail open into the failure
//! branch (or skip entirely when the character itself is missing).

use std::rc::Rc;

use serde::Deserialize;
use tracing::warn;

use super::{fire_all, GameEvent};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCheckType {
    HasItem,
    IsBroken,
    Equipped,
    QuantityCheck,
}

pub struct ItemCheckEvent {
    pub(crate) char_key_name: String,
    pub(crate) check_type: ItemCheckType,
    /// Slot resolution: explicit index wins over item key.
    pub(crate) slot_index: Option<usize>,
    pub(crate) item_key_name: Option<String>,
    pub(crate) quantity: Option<u32>,
    pub(crate) check_ok_events: Vec<Rc<GameEvent>>,
    pub(crate) check_fail_events: Vec<Rc<GameEvent>>,
}

impl ItemCheckEvent {
    pub(crate) fn fire(&self, event: &Rc<GameEvent>) {
        let ctx = event.context();
        let Some(char_ref) = ctx.world.get_char(&self.char_key_name) else {
            warn!(target: "events", "item_check: unknown char \"{}\"", self.char_key_name);
            return;
        };

        let ok = {
            let character = char_ref.borrow();
            let slot = match self.slot_index {
                Some(index) => character.slot_by_index(index),
                None => self
                    .item_key_name
                    .as_deref()
                    .and_then(|key| character.slot_by_item_key(key)),
            };
            match (self.check_type, slot) {
                (ItemCheckType::HasItem, slot) => slot.is_some(),
                (ItemCheckType::IsBroken, Some(slot)) => slot.broken,
                (ItemCheckType::Equipped, Some(slot)) => slot.equipped,
                (ItemCheckType::QuantityCheck, Some(slot)) => match self.quantity {
                    Some(quantity) => slot.quantity == quantity,
                    None => {
                        warn!(target: "events", "item_check: quantity_check without a quantity");
                        false
                    }
                },
                // Slot-dependent check against an unresolved slot: fail open.
                (check, None) => {
                    warn!(
                        target: "events",
                        "item_check: {check:?} on unresolved slot of \"{}\"", self.char_key_name
                    );
                    false
                }
            }
        };

        let origin = event.origin();
        let branch = if ok { &self.check_ok_events } else { &self.check_fail_events };
        fire_all(branch, origin.as_ref());
    }

    pub(super) fn children(&self) -> Vec<Rc<GameEvent>> {
        self.check_ok_events.iter().chain(&self.check_fail_events).cloned().collect()
    }
}

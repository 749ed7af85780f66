//! Char/NPC Activation-Toggle: resolves the hero or a labeled NPC, falling
//! back to the firing event's origin actor, and toggles active/visible.

use std::rc::Rc;

use serde::Deserialize;
use tracing::warn;

use super::GameEvent;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharTarget {
    Hero,
    Npc,
}

pub struct CharActivationEvent {
    pub(crate) target: CharTarget,
    pub(crate) npc_label: Option<String>,
    pub(crate) activate: bool,
}

impl CharActivationEvent {
    pub(crate) fn fire(&self, event: &Rc<GameEvent>) {
        let ctx = event.context();
        let resolved = match self.target {
            CharTarget::Hero => Some(ctx.world.hero()),
            CharTarget::Npc => {
                self.npc_label.as_deref().and_then(|label| ctx.world.npc_by_label(label))
            }
        };
        let Some(target) = resolved.or_else(|| event.origin()) else {
            warn!(target: "events", "char_activation: no target and no origin");
            return;
        };
        target.borrow_mut().toggle_active(self.activate);
    }
}

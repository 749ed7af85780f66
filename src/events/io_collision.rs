//! Collision-Toggle: enables, disables, or permanently removes collision on
//! a named interactable object.

use std::rc::Rc;

use serde::Deserialize;
use tracing::warn;

use super::GameEvent;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionControl {
    Enable,
    Disable,
    Remove,
}

pub struct IoCollisionEvent {
    pub(crate) io_label: String,
    pub(crate) control: CollisionControl,
}

impl IoCollisionEvent {
    pub(crate) fn fire(&self, event: &Rc<GameEvent>) {
        let ctx = event.context();
        let Some(io) = ctx.world.interactable_by_label(&self.io_label) else {
            warn!(target: "events", "io_collision: unknown interactable \"{}\"", self.io_label);
            return;
        };
        let mut io = io.borrow_mut();
        match self.control {
            CollisionControl::Enable => io.toggle_collision(true),
            CollisionControl::Disable => io.toggle_collision(false),
            CollisionControl::Remove => io.destroy_body(),
        }
    }
}

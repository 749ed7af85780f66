//! Party-Join/Leave: mutates the active party roster. Joining with a dialog
//! opens an avatar-bearing message box gated on confirmation input and plays
//! the join stinger (pausing the BGM around it); leaving, or joining without
//! a dialog, fires the finish events immediately.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::warn;

use crate::controls::BindingId;
use crate::dialog::{DialogManager, DialogOptions};

use super::{fire_all, EventKind, GameEvent};

/// Dialog width for the join message box.
const JOIN_DIALOG_WIDTH: f32 = 165.0;
/// Stinger played when a character joins.
const JOIN_SE: &str = "misc/party_join";

pub struct PartyJoinEvent {
    pub(crate) char_key_name: String,
    /// Join when true, leave when false.
    pub(crate) join: bool,
    pub(crate) show_dialog: bool,
    pub(crate) finish_events: Vec<Rc<GameEvent>>,
    pub(crate) dialog: RefCell<Option<DialogManager>>,
    pub(crate) control_binding: Cell<Option<BindingId>>,
    /// Gates confirm presses while a page is advancing.
    pub(crate) control_enabled: Cell<bool>,
}

impl PartyJoinEvent {
    pub(crate) fn fire(&self, event: &Rc<GameEvent>) {
        let ctx = event.context();
        let Some(char_ref) = ctx.world.get_char(&self.char_key_name) else {
            warn!(target: "events", "party_join: unknown char \"{}\"", self.char_key_name);
            return;
        };

        if !self.join {
            ctx.world.remove_from_party(&self.char_key_name);
            self.fire_finish(event);
            return;
        }

        ctx.world.add_to_party(&char_ref);
        if !self.show_dialog {
            self.fire_finish(event);
            return;
        }

        ctx.events.increment_running();

        let dialog = DialogManager::new(&ctx.stage, &ctx.tweens, &ctx.scheduler);
        let name = char_ref.borrow().name.clone();
        dialog.set_dialog(
            &format!("{name} joined your party."),
            DialogOptions {
                avatar: Some(self.char_key_name.clone()),
                width: Some(JOIN_DIALOG_WIDTH),
            },
        );
        *self.dialog.borrow_mut() = Some(dialog);

        // The binding outlives this call, so it holds the event weakly; a
        // destroyed event simply stops responding to confirm presses.
        let weak = Rc::downgrade(event);
        let binding = ctx.controls.add_confirm(move || {
            if let Some(event) = weak.upgrade() {
                if let EventKind::PartyJoin(ev) = event.kind() {
                    ev.next(&event);
                }
            }
        });
        self.control_binding.set(Some(binding));

        ctx.audio.pause_bgm();
        let audio = ctx.audio.clone();
        ctx.audio.play_se(JOIN_SE, Some(Box::new(move || audio.resume_bgm())));

        self.control_enabled.set(true);
        self.next(event);
    }

    /// Advance the join dialog by one page.
    fn next(&self, event: &Rc<GameEvent>) {
        if !self.control_enabled.get() {
            return;
        }
        let dialog = self.dialog.borrow().clone();
        let Some(dialog) = dialog else { return };
        self.control_enabled.set(false);
        let weak = Rc::downgrade(event);
        dialog.next(Box::new(move |finished| {
            let Some(event) = weak.upgrade() else { return };
            let EventKind::PartyJoin(ev) = event.kind() else { return };
            if finished {
                ev.finish(&event);
            } else {
                ev.control_enabled.set(true);
            }
        }));
    }

    /// Dialog closed: release input and UI, balance the counter, and fire the
    /// finish chain.
    fn finish(&self, event: &Rc<GameEvent>) {
        self.teardown(event);
        event.context().events.decrement_running();
        self.fire_finish(event);
    }

    fn fire_finish(&self, event: &Rc<GameEvent>) {
        let origin = event.origin();
        fire_all(&self.finish_events, origin.as_ref());
    }

    /// Detach the confirm binding and tear the dialog down, if present.
    pub(super) fn teardown(&self, event: &Rc<GameEvent>) {
        if let Some(binding) = self.control_binding.take() {
            event.context().controls.detach(binding);
        }
        if let Some(dialog) = self.dialog.borrow_mut().take() {
            dialog.destroy();
        }
        self.control_enabled.set(false);
    }

    pub(super) fn children(&self) -> Vec<Rc<GameEvent>> {
        self.finish_events.clone()
    }
}

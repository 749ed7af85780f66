// ── Event manager ───────────────────────────────────────────────────────────
//
// Process-wide bookkeeping for the event system: the labeled-event registry,
// the running-event busy counter, per-frame render callbacks, and id
// allocation. Held by the game context; one instance per process (or per
// test).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::error;

use super::{EventId, GameEvent};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

struct ManagerState {
    /// `key_name → (owner id, event)`. Last writer wins; the id lets a stale
    /// owner's destroy leave a newer registration in place.
    labeled: HashMap<String, (EventId, Weak<GameEvent>)>,
    running: u32,
    callbacks: Vec<(CallbackId, Rc<dyn Fn()>)>,
    next_event_id: u64,
    next_callback_id: u64,
}

/// Clonable handle to the shared event bookkeeping.
#[derive(Clone)]
pub struct GameEventManager {
    state: Rc<RefCell<ManagerState>>,
}

impl GameEventManager {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ManagerState {
                labeled: HashMap::new(),
                running: 0,
                callbacks: Vec::new(),
                next_event_id: 1,
                next_callback_id: 1,
            })),
        }
    }

    pub(crate) fn allocate_id(&self) -> EventId {
        let mut state = self.state.borrow_mut();
        let id = EventId(state.next_event_id);
        state.next_event_id += 1;
        id
    }

    /// Register `event` under `key_name`, replacing any prior registration.
    pub(crate) fn register(&self, key_name: &str, event: &Rc<GameEvent>) {
        self.state
            .borrow_mut()
            .labeled
            .insert(key_name.to_owned(), (event.id(), Rc::downgrade(event)));
    }

    /// Remove the registration for `key_name` only while `id` still owns it.
    pub(crate) fn unregister(&self, key_name: &str, id: EventId) {
        let mut state = self.state.borrow_mut();
        if state.labeled.get(key_name).is_some_and(|(owner, _)| *owner == id) {
            state.labeled.remove(key_name);
        }
    }

    /// Look up a live event by label.
    pub fn get_labeled_event(&self, key_name: &str) -> Option<Rc<GameEvent>> {
        self.state.borrow().labeled.get(key_name).and_then(|(_, weak)| weak.upgrade())
    }

    // ── Running-event counter ──────────────────────────────────────────────

    pub fn increment_running(&self) {
        self.state.borrow_mut().running += 1;
    }

    pub fn decrement_running(&self) {
        let mut state = self.state.borrow_mut();
        debug_assert!(state.running > 0, "running-event counter underflow");
        if state.running == 0 {
            error!(target: "events", "running-event counter underflow");
            return;
        }
        state.running -= 1;
    }

    pub fn events_running_count(&self) -> u32 {
        self.state.borrow().running
    }

    // ── Per-frame render callbacks ─────────────────────────────────────────

    pub fn add_callback(&self, callback: impl Fn() + 'static) -> CallbackId {
        let mut state = self.state.borrow_mut();
        let id = CallbackId(state.next_callback_id);
        state.next_callback_id += 1;
        state.callbacks.push((id, Rc::new(callback)));
        id
    }

    /// Removing an unknown id is a no-op.
    pub fn remove_callback(&self, id: CallbackId) {
        self.state.borrow_mut().callbacks.retain(|(cid, _)| *cid != id);
    }

    pub fn callback_count(&self) -> usize {
        self.state.borrow().callbacks.len()
    }

    /// Run every registered callback. The list is snapshotted first so a
    /// callback may remove itself or add new ones.
    pub fn run_callbacks(&self) {
        let callbacks: Vec<Rc<dyn Fn()>> =
            self.state.borrow().callbacks.iter().map(|(_, cb)| cb.clone()).collect();
        for callback in callbacks {
            callback();
        }
    }

    /// Drop every registration, callback, and the counter. Test teardown.
    pub fn reset(&self) {
        let mut state = self.state.borrow_mut();
        state.labeled.clear();
        state.callbacks.clear();
        state.running = 0;
    }
}

impl Default for GameEventManager {
    fn default() -> Self {
        Self::new()
    }
}

// ── Confirmation input bindings ─────────────────────────────────────────────
//
// Stand-in for the input layer: dialogs register a callback for the confirm
// button and detach it when they finish. The surrounding game forwards its
// real button-down edge into `press_confirm`.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BindingId(u64);

struct ControlState {
    bindings: Vec<(BindingId, Rc<dyn Fn()>)>,
    next_id: u64,
}

#[derive(Clone)]
pub struct ControlManager {
    state: Rc<RefCell<ControlState>>,
}

impl ControlManager {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ControlState { bindings: Vec::new(), next_id: 1 })),
        }
    }

    /// Register a callback for the confirm button; persists until detached.
    pub fn add_confirm(&self, callback: impl Fn() + 'static) -> BindingId {
        let mut state = self.state.borrow_mut();
        let id = BindingId(state.next_id);
        state.next_id += 1;
        state.bindings.push((id, Rc::new(callback)));
        id
    }

    /// Detach a binding. Detaching an unknown id is a no-op.
    pub fn detach(&self, id: BindingId) {
        self.state.borrow_mut().bindings.retain(|(bid, _)| *bid != id);
    }

    pub fn binding_count(&self) -> usize {
        self.state.borrow().bindings.len()
    }

    /// Deliver a confirm press to every attached binding. The binding list is
    /// snapshotted first so callbacks may attach or detach bindings freely.
    pub fn press_confirm(&self) {
        let callbacks: Vec<Rc<dyn Fn()>> =
            self.state.borrow().bindings.iter().map(|(_, cb)| cb.clone()).collect();
        for callback in callbacks {
            callback();
        }
    }
}

impl Default for ControlManager {
    fn default() -> Self {
        Self::new()
    }
}

// ── Completion signals ───────────────────────────────────────────────────────
//
// Every asynchronous operation in this crate (tween, timed reveal, window
// transition, nested event chain) reports completion through a `Signal`:
// a single-resolve, clonable handle that runs its registered callbacks
// exactly once. Callbacks registered after resolution run immediately.

use std::cell::RefCell;
use std::rc::Rc;

struct SignalState {
    resolved: bool,
    callbacks: Vec<Box<dyn FnOnce()>>,
}

/// Clonable completion handle with a single resolve path.
#[derive(Clone)]
pub struct Signal {
    state: Rc<RefCell<SignalState>>,
}

impl Signal {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(SignalState { resolved: false, callbacks: Vec::new() })),
        }
    }

    /// A signal that is already resolved; `on_resolve` callbacks run immediately.
    pub fn resolved() -> Self {
        let signal = Self::new();
        signal.state.borrow_mut().resolved = true;
        signal
    }

    pub fn is_resolved(&self) -> bool {
        self.state.borrow().resolved
    }

    /// Resolve the signal and run all pending callbacks. Resolving twice is a
    /// no-op: there is exactly one resolve path per operation.
    pub fn resolve(&self) {
        let callbacks = {
            let mut state = self.state.borrow_mut();
            if state.resolved {
                return;
            }
            state.resolved = true;
            std::mem::take(&mut state.callbacks)
        };
        for callback in callbacks {
            callback();
        }
    }

    /// Register a callback to run on resolution. If the signal is already
    /// resolved the callback runs synchronously before this returns.
    pub fn on_resolve(&self, callback: impl FnOnce() + 'static) {
        {
            let mut state = self.state.borrow_mut();
            if !state.resolved {
                state.callbacks.push(Box::new(callback));
                return;
            }
        }
        callback();
    }

    /// Join: resolves once every input signal has resolved.
    /// An empty slice yields an already-resolved signal.
    pub fn all(signals: &[Signal]) -> Signal {
        if signals.is_empty() {
            return Signal::resolved();
        }
        let joined = Signal::new();
        let remaining = Rc::new(std::cell::Cell::new(signals.len()));
        for signal in signals {
            let joined = joined.clone();
            let remaining = remaining.clone();
            signal.on_resolve(move || {
                remaining.set(remaining.get() - 1);
                if remaining.get() == 0 {
                    joined.resolve();
                }
            });
        }
        joined
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────

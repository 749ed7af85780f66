// ── Cooperative timer scheduler ─────────────────────────────────────────────
//
// Single-threaded timer facility driven by the frame loop: the owner calls
// `update(dt_ms)` once per tick and due callbacks run inside that call.
// Supports one-shot delayed callbacks, repeating callbacks with a fixed fire
// count, and pause/resume of an in-flight timer (the dialog reveal suspends
// its word repeater this way while a scripted pause elapses).

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

enum TimerKind {
    /// Consumed on fire.
    Once(Option<Box<dyn FnOnce()>>),
    Repeating(Rc<dyn Fn()>),
}

struct Timer {
    id: TimerId,
    interval_ms: f32,
    /// Time until the next fire; decremented while the timer is running.
    remaining_ms: f32,
    fires_left: u32,
    paused: bool,
    cancelled: bool,
    kind: TimerKind,
}

struct SchedulerState {
    timers: Vec<Timer>,
    next_id: u64,
}

/// Clonable handle to the shared timer list.
#[derive(Clone)]
pub struct Scheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(SchedulerState { timers: Vec::new(), next_id: 1 })),
        }
    }

    /// Schedule `callback` to run once after `delay_ms`.
    pub fn once(&self, delay_ms: u32, callback: impl FnOnce() + 'static) -> TimerId {
        self.add(delay_ms, 1, TimerKind::Once(Some(Box::new(callback))))
    }

    /// Schedule `callback` to run every `interval_ms`, exactly `count` times.
    pub fn repeat(&self, interval_ms: u32, count: u32, callback: impl Fn() + 'static) -> TimerId {
        self.add(interval_ms, count, TimerKind::Repeating(Rc::new(callback)))
    }

    fn add(&self, interval_ms: u32, count: u32, kind: TimerKind) -> TimerId {
        let mut state = self.state.borrow_mut();
        let id = TimerId(state.next_id);
        state.next_id += 1;
        state.timers.push(Timer {
            id,
            interval_ms: interval_ms as f32,
            remaining_ms: interval_ms as f32,
            fires_left: count,
            paused: false,
            cancelled: false,
            kind,
        });
        id
    }

    /// Suspend a timer; its clock stops until `resume`. Returns `false` if the
    /// timer no longer exists.
    pub fn pause(&self, id: TimerId) -> bool {
        self.set_paused(id, true)
    }

    pub fn resume(&self, id: TimerId) -> bool {
        self.set_paused(id, false)
    }

    fn set_paused(&self, id: TimerId, paused: bool) -> bool {
        let mut state = self.state.borrow_mut();
        match state.timers.iter_mut().find(|t| t.id == id) {
            Some(timer) => {
                timer.paused = paused;
                true
            }
            None => false,
        }
    }

    pub fn cancel(&self, id: TimerId) -> bool {
        let mut state = self.state.borrow_mut();
        match state.timers.iter_mut().find(|t| t.id == id) {
            Some(timer) => {
                timer.cancelled = true;
                true
            }
            None => false,
        }
    }

    /// True while the timer exists and has fires left.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.state.borrow().timers.iter().any(|t| t.id == id && !t.cancelled)
    }

    /// Advance all running timers by `dt_ms` and fire the due ones.
    ///
    /// Callbacks run with no internal borrow held, so they may freely add,
    /// pause, resume, or cancel timers — including the one that is firing.
    /// A timer that falls several intervals behind catches up one fire at a
    /// time, re-checking its paused/cancelled state between fires.
    pub fn update(&self, dt_ms: f32) {
        {
            let mut state = self.state.borrow_mut();
            for timer in state.timers.iter_mut() {
                if !timer.paused && !timer.cancelled && timer.fires_left > 0 {
                    timer.remaining_ms -= dt_ms;
                }
            }
        }

        loop {
            let due = {
                let mut state = self.state.borrow_mut();
                let Some(timer) = state.timers.iter_mut().find(|t| {
                    !t.paused && !t.cancelled && t.fires_left > 0 && t.remaining_ms <= 0.0
                }) else {
                    break;
                };
                timer.fires_left -= 1;
                timer.remaining_ms += timer.interval_ms;
                match &mut timer.kind {
                    TimerKind::Once(callback) => callback.take().map(DueCallback::Once),
                    TimerKind::Repeating(callback) => Some(DueCallback::Repeating(callback.clone())),
                }
            };
            match due {
                Some(DueCallback::Once(callback)) => callback(),
                Some(DueCallback::Repeating(callback)) => callback(),
                None => {}
            }
        }

        let mut state = self.state.borrow_mut();
        state.timers.retain(|t| !t.cancelled && t.fires_left > 0);
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

enum DueCallback {
    Once(Box<dyn FnOnce()>),
    Repeating(Rc<dyn Fn()>),
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn once_fires_after_delay() {
        let scheduler = Scheduler::new();
        let hit = Rc::new(Cell::new(false));
        let h = hit.clone();
        scheduler.once(100, move || h.set(true));
        scheduler.update(99.0);
        assert!(!hit.get());
        scheduler.update(1.0);
        assert!(hit.get());
    }

    #[test]
    fn repeat_fires_exactly_count_times() {
        let scheduler = Scheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        scheduler.repeat(10, 3, move || h.set(h.get() + 1));
        for _ in 0..10 {
            scheduler.update(10.0);
        }
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn repeat_catches_up_within_one_update() {
        let scheduler = Scheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        scheduler.repeat(10, 5, move || h.set(h.get() + 1));
        scheduler.update(30.0);
        assert_eq!(hits.get(), 3, "three intervals elapsed in one update");
    }

    #[test]
    fn paused_timer_does_not_advance() {
        let scheduler = Scheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let id = scheduler.repeat(10, 2, move || h.set(h.get() + 1));
        assert!(scheduler.pause(id));
        scheduler.update(100.0);
        assert_eq!(hits.get(), 0);
        assert!(scheduler.resume(id));
        scheduler.update(10.0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn callback_can_pause_its_own_timer() {
        let scheduler = Scheduler::new();
        let hits = Rc::new(Cell::new(0));
        let id_slot: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));
        let h = hits.clone();
        let s = scheduler.clone();
        let slot = id_slot.clone();
        let id = scheduler.repeat(10, 5, move || {
            h.set(h.get() + 1);
            if let Some(id) = slot.get() {
                s.pause(id);
            }
        });
        id_slot.set(Some(id));
        scheduler.update(50.0);
        assert_eq!(hits.get(), 1, "self-pause must stop catch-up fires");
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let scheduler = Scheduler::new();
        let hit = Rc::new(Cell::new(false));
        let h = hit.clone();
        let id = scheduler.once(10, move || h.set(true));
        assert!(scheduler.cancel(id));
        scheduler.update(100.0);
        assert!(!hit.get());
        assert!(!scheduler.is_active(id));
    }
}

// ── Property tweens ─────────────────────────────────────────────────────────
//
// Animates one numeric property of a stage object from its current value to a
// target value over a duration, invoking a completion callback on the final
// frame. Linear easing only — that is all the dialog/log chrome uses.

use std::cell::RefCell;
use std::rc::Rc;

/// The animatable properties of a stage object.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TweenProp {
    X,
    Y,
    ScaleX,
    ScaleY,
    /// Uniform scale: writes both axes.
    Scale,
    Width,
    Height,
}

/// Implemented by stage objects whose numeric properties can be tweened.
pub trait Tweenable {
    fn get(&self, prop: TweenProp) -> f32;
    fn set(&mut self, prop: TweenProp, value: f32);
}

pub type TweenTarget = Rc<RefCell<dyn Tweenable>>;

struct ActiveTween {
    target: TweenTarget,
    prop: TweenProp,
    from: f32,
    to: f32,
    duration_ms: f32,
    elapsed_ms: f32,
    on_complete: Option<Box<dyn FnOnce()>>,
}

/// Clonable handle to the active tween list; advanced by `update(dt_ms)`.
#[derive(Clone)]
pub struct TweenRunner {
    state: Rc<RefCell<Vec<ActiveTween>>>,
}

impl TweenRunner {
    pub fn new() -> Self {
        Self { state: Rc::new(RefCell::new(Vec::new())) }
    }

    /// Animate `prop` of `target` from its current value to `to` over
    /// `duration_ms`. A zero duration writes the value and completes
    /// synchronously.
    pub fn to(
        &self,
        target: TweenTarget,
        prop: TweenProp,
        to: f32,
        duration_ms: u32,
        on_complete: Option<Box<dyn FnOnce()>>,
    ) {
        if duration_ms == 0 {
            target.borrow_mut().set(prop, to);
            if let Some(callback) = on_complete {
                callback();
            }
            return;
        }
        let from = target.borrow().get(prop);
        self.state.borrow_mut().push(ActiveTween {
            target,
            prop,
            from,
            to,
            duration_ms: duration_ms as f32,
            elapsed_ms: 0.0,
            on_complete,
        });
    }

    pub fn active_count(&self) -> usize {
        self.state.borrow().len()
    }

    /// Advance all tweens by `dt_ms`. Completed tweens snap to their target
    /// value and run their callbacks after the internal borrow is released,
    /// so a callback may start new tweens.
    pub fn update(&self, dt_ms: f32) {
        let mut finished: Vec<Box<dyn FnOnce()>> = Vec::new();
        {
            let mut tweens = self.state.borrow_mut();
            for tween in tweens.iter_mut() {
                tween.elapsed_ms += dt_ms;
                let progress = (tween.elapsed_ms / tween.duration_ms).clamp(0.0, 1.0);
                let value = tween.from + (tween.to - tween.from) * progress;
                tween.target.borrow_mut().set(tween.prop, value);
            }
            for tween in tweens.iter_mut().filter(|t| t.elapsed_ms >= t.duration_ms) {
                if let Some(callback) = tween.on_complete.take() {
                    finished.push(callback);
                }
            }
            tweens.retain(|t| t.elapsed_ms < t.duration_ms);
        }
        for callback in finished {
            callback();
        }
    }
}

impl Default for TweenRunner {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────

// ── Battle log ──────────────────────────────────────────────────────────────
//
// Two-slot scrolling message log. The slots are fixed display positions; a
// third message slides the older line out of view, shifts the newer line up,
// and reuses the vacated text object for the incoming message. Callers await
// the returned signal before the next `add`; overlapping adds are not queued.

use std::cell::RefCell;
use std::rc::Rc;

use crate::signal::Signal;
use crate::stage::{Stage, TextRef};
use crate::tween::{TweenProp, TweenRunner};

/// Left edge of both log lines.
pub const LOG_X: f32 = 3.0;
/// Resting position a line slides to when evicted (off the visible panel).
pub const LOG_OUT_Y: f32 = 127.0;
/// Resting position of the top (older) line.
pub const LOG_1_Y: f32 = 139.0;
/// Resting position of the bottom (newer) line.
pub const LOG_2_Y: f32 = 151.0;
/// Duration of the slide/shift animation.
pub const ANIM_DURATION_MS: u32 = 50;

/// Clonable handle to the 2-slot log view.
#[derive(Clone)]
pub struct BattleLog {
    stage: Stage,
    tweens: TweenRunner,
    /// `slots[0]` is the top (older) line, `slots[1]` the bottom (newer).
    slots: Rc<RefCell<[TextRef; 2]>>,
}

impl BattleLog {
    pub fn new(stage: &Stage, tweens: &TweenRunner) -> Self {
        let top = stage.add_text(LOG_X, LOG_1_Y, true);
        let bottom = stage.add_text(LOG_X, LOG_2_Y, true);
        Self {
            stage: stage.clone(),
            tweens: tweens.clone(),
            slots: Rc::new(RefCell::new([top, bottom])),
        }
    }

    /// Append a message. Empty slots are filled instantly; with both slots
    /// full the older line slides out and the newer shifts up before the
    /// message lands in the bottom slot. Resolves once the message is placed.
    pub fn add(&self, text: &str) -> Signal {
        let signal = Signal::new();
        let slots = self.slots.borrow();
        let [top, bottom] = &*slots;

        if top.borrow().text().is_empty() {
            top.borrow_mut().set_text(text);
            bottom.borrow_mut().set_text("");
            signal.resolve();
            return signal;
        }
        if bottom.borrow().text().is_empty() {
            bottom.borrow_mut().set_text(text);
            signal.resolve();
            return signal;
        }

        // Both slots full: slide top out, shift bottom up, then reuse the
        // evicted text object as the new bottom slot.
        let top = top.clone();
        let bottom = bottom.clone();
        drop(slots);

        let shift = Signal::new();
        let slide = Signal::new();
        let shift_done = shift.clone();
        let slide_done = slide.clone();
        self.tweens.to(
            bottom.clone(),
            TweenProp::Y,
            LOG_1_Y,
            ANIM_DURATION_MS,
            Some(Box::new(move || shift_done.resolve())),
        );
        self.tweens.to(
            top.clone(),
            TweenProp::Y,
            LOG_OUT_Y,
            ANIM_DURATION_MS,
            Some(Box::new(move || slide_done.resolve())),
        );

        let slots = self.slots.clone();
        let incoming = text.to_owned();
        let placed = signal.clone();
        Signal::all(&[shift, slide]).on_resolve(move || {
            {
                let mut slot = top.borrow_mut();
                slot.y = LOG_2_Y;
                slot.set_text(&incoming);
            }
            *slots.borrow_mut() = [bottom, top];
            placed.resolve();
        });
        signal
    }

    /// Clear both slots in place.
    pub fn clear(&self) {
        let slots = self.slots.borrow();
        for (slot, y) in slots.iter().zip([LOG_1_Y, LOG_2_Y]) {
            let mut slot = slot.borrow_mut();
            slot.set_text("");
            slot.y = y;
        }
    }

    /// Remove both text objects from the stage.
    pub fn destroy(&self) {
        for slot in self.slots.borrow().iter() {
            self.stage.remove_text(slot);
        }
    }

    pub fn top_y(&self) -> f32 {
        self.slots.borrow()[0].borrow().y
    }

    pub fn bottom_y(&self) -> f32 {
        self.slots.borrow()[1].borrow().y
    }

    pub fn top_text(&self) -> String {
        self.slots.borrow()[0].borrow().text().to_owned()
    }

    pub fn bottom_text(&self) -> String {
        self.slots.borrow()[1].borrow().text().to_owned()
    }
}

// ── Window chrome ───────────────────────────────────────────────────────────
//
// The bordered dialog box everything textual lives in. Opening and closing
// animate the frame's vertical scale; text is laid out inside the padded
// content area and revealed through the typewriter.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::warn;

use crate::scheduler::Scheduler;
use crate::signal::Signal;
use crate::stage::{GraphicRef, Stage, TextRef};
use crate::tween::{TweenProp, TweenRunner};
use crate::typewriter::{self, LineJob, WordCallback};
use crate::{FONT_SIZE, SPACE_BETWEEN_LINES};

/// Duration of the open and close scale animations.
pub const TRANSITION_TIME_MS: u32 = 250;
/// Horizontal inset of the text area from the frame edge.
pub const WINDOW_PADDING_H: f32 = 4.0;
/// Vertical inset of the first text line from the frame top.
pub const WINDOW_PADDING_TOP: f32 = 5.0;
/// Extra vertical gap applied below each rendered line.
pub const WINDOW_PADDING_BOTTOM: f32 = 3.0;
/// Frame background color.
pub const WINDOW_BG_COLOR: u32 = 0x006080;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum WindowState {
    Closed,
    Opening,
    Open,
    Closing,
    Destroyed,
}

/// Options for laying out and revealing dialog text inside a window.
pub struct TextOptions {
    pub padding_x: Option<f32>,
    pub padding_y: Option<f32>,
    /// Reveal word by word when true; set instantly when false.
    pub animate: bool,
    /// Pause map applied to the first line (`character offset → delay ms`).
    pub pauses: BTreeMap<usize, u32>,
    pub word_callback: Option<WordCallback>,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            padding_x: None,
            padding_y: None,
            animate: true,
            pauses: BTreeMap::new(),
            word_callback: None,
        }
    }
}

struct WindowInner {
    stage: Stage,
    tweens: TweenRunner,
    scheduler: Scheduler,
    x: f32,
    y: f32,
    width: Cell<f32>,
    height: Cell<f32>,
    frame: GraphicRef,
    lines: RefCell<Vec<TextRef>>,
    state: Cell<WindowState>,
    close_callback: RefCell<Option<Box<dyn FnOnce()>>>,
}

/// Clonable handle to one dialog window.
#[derive(Clone)]
pub struct Window {
    inner: Rc<WindowInner>,
}

impl Window {
    /// Create a window frame at `(x, y)` sized `width × height`. The frame is
    /// added to the stage invisible and vertically collapsed.
    pub fn new(
        stage: &Stage,
        tweens: &TweenRunner,
        scheduler: &Scheduler,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Self {
        let frame = stage.add_graphic(x, y, width, height);
        {
            let mut f = frame.borrow_mut();
            f.scale_y = 0.0;
            f.color = WINDOW_BG_COLOR;
            f.visible = false;
        }
        Self {
            inner: Rc::new(WindowInner {
                stage: stage.clone(),
                tweens: tweens.clone(),
                scheduler: scheduler.clone(),
                x,
                y,
                width: Cell::new(width),
                height: Cell::new(height),
                frame,
                lines: RefCell::new(Vec::new()),
                state: Cell::new(WindowState::Closed),
                close_callback: RefCell::new(None),
            }),
        }
    }

    pub fn is_open(&self) -> bool {
        self.inner.state.get() == WindowState::Open
    }

    /// Open the window. With `animate` the frame scales up over
    /// [`TRANSITION_TIME_MS`]; otherwise it appears fully sized at once.
    /// `show_callback` fires when the frame is fully open; `close_callback`
    /// is stored and fires after the matching [`Window::close`] finishes.
    pub fn show(
        &self,
        animate: bool,
        show_callback: Option<Box<dyn FnOnce()>>,
        close_callback: Option<Box<dyn FnOnce()>>,
    ) {
        let inner = &self.inner;
        match inner.state.get() {
            WindowState::Closed => {}
            state => {
                warn!(target: "window", "show ignored in state {state:?}");
                return;
            }
        }
        *inner.close_callback.borrow_mut() = close_callback;
        {
            let mut frame = inner.frame.borrow_mut();
            frame.visible = true;
        }
        if !animate {
            inner.frame.borrow_mut().scale_y = 1.0;
            inner.state.set(WindowState::Open);
            if let Some(cb) = show_callback {
                cb();
            }
            return;
        }
        inner.state.set(WindowState::Opening);
        let opened = self.clone();
        inner.tweens.to(
            inner.frame.clone(),
            TweenProp::ScaleY,
            1.0,
            TRANSITION_TIME_MS,
            Some(Box::new(move || {
                if opened.inner.state.get() == WindowState::Opening {
                    opened.inner.state.set(WindowState::Open);
                }
                if let Some(cb) = show_callback {
                    cb();
                }
            })),
        );
    }

    /// Close the window: text is removed immediately, the frame scales down,
    /// and the stored close callback (then `callback`) runs once collapsed.
    pub fn close(&self, callback: Option<Box<dyn FnOnce()>>) {
        let inner = &self.inner;
        match inner.state.get() {
            WindowState::Open | WindowState::Opening => {}
            state => {
                warn!(target: "window", "close ignored in state {state:?}");
                return;
            }
        }
        self.clear_text();
        inner.state.set(WindowState::Closing);
        let closed = self.clone();
        inner.tweens.to(
            inner.frame.clone(),
            TweenProp::ScaleY,
            0.0,
            TRANSITION_TIME_MS,
            Some(Box::new(move || {
                let inner = &closed.inner;
                if inner.state.get() != WindowState::Closing {
                    return;
                }
                inner.frame.borrow_mut().visible = false;
                inner.state.set(WindowState::Closed);
                if let Some(cb) = inner.close_callback.borrow_mut().take() {
                    cb();
                }
                if let Some(cb) = callback {
                    cb();
                }
            })),
        );
    }

    /// Resize the frame in place. Open windows keep their text; callers are
    /// expected to re-set it if the new size changes the layout.
    pub fn resize(&self, width: f32, height: f32) {
        self.inner.width.set(width);
        self.inner.height.set(height);
        let mut frame = self.inner.frame.borrow_mut();
        frame.width = width;
        frame.height = height;
    }

    /// Remove the frame and any text from the stage, in any state. A
    /// destroyed window ignores further calls.
    pub fn destroy(&self) {
        let inner = &self.inner;
        if inner.state.get() == WindowState::Destroyed {
            return;
        }
        self.clear_text();
        inner.stage.remove_graphic(&inner.frame);
        inner.state.set(WindowState::Destroyed);
        inner.close_callback.borrow_mut().take();
    }

    fn clear_text(&self) {
        let inner = &self.inner;
        for line in inner.lines.borrow_mut().drain(..) {
            inner.stage.remove_text(&line);
        }
    }

    /// Lay out `lines` inside the content area and reveal them. Returns a
    /// signal resolved when the last line has fully revealed (immediately for
    /// `animate: false`).
    pub fn set_dialog_text(&self, lines: &[String], options: TextOptions) -> Signal {
        let inner = &self.inner;
        if inner.state.get() == WindowState::Destroyed {
            warn!(target: "window", "set_dialog_text on destroyed window");
            return Signal::resolved();
        }
        self.clear_text();

        let padding_x = options.padding_x.unwrap_or(WINDOW_PADDING_H + 4.0);
        let padding_y = options.padding_y.unwrap_or(WINDOW_PADDING_TOP);
        let line_step = FONT_SIZE + SPACE_BETWEEN_LINES;

        let mut jobs = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let text = inner.stage.add_text(
                inner.x + padding_x,
                inner.y + padding_y + i as f32 * line_step,
                true,
            );
            inner.lines.borrow_mut().push(text.clone());
            if options.animate {
                let mut job = LineJob::new(text, line);
                if i == 0 {
                    job.pauses = options.pauses.clone();
                }
                jobs.push(job);
            } else {
                text.borrow_mut().set_text(line);
            }
        }

        if options.animate {
            typewriter::reveal(&inner.scheduler, jobs, options.word_callback)
        } else {
            Signal::resolved()
        }
    }

    pub fn width(&self) -> f32 {
        self.inner.width.get()
    }

    pub fn height(&self) -> f32 {
        self.inner.height.get()
    }

    pub fn x(&self) -> f32 {
        self.inner.x
    }

    pub fn y(&self) -> f32 {
        self.inner.y
    }

    /// Text objects currently laid out in the window, top to bottom.
    pub fn text_lines(&self) -> Vec<TextRef> {
        self.inner.lines.borrow().clone()
    }
}

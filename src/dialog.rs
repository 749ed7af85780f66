// ── Dialog sequencer ────────────────────────────────────────────────────────
//
// Presents one message at a time inside a chrome window: `set_dialog` wraps
// and paginates the text, `next` advances page by page on confirmation input.
// Advancing is only accepted once the current page's reveal has completed;
// the final `next` closes the window and reports the dialog as finished.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::debug;

use crate::scheduler::Scheduler;
use crate::stage::{GraphicRef, Stage};
use crate::tween::TweenRunner;
use crate::typewriter::word_wrap;
use crate::window::{TextOptions, Window, WINDOW_PADDING_BOTTOM, WINDOW_PADDING_H, WINDOW_PADDING_TOP};
use crate::{FONT_SIZE, GAME_HEIGHT, GAME_WIDTH, SPACE_BETWEEN_LINES};

/// Default dialog window width in pixels.
pub const DIALOG_WIDTH: f32 = 200.0;
/// Lines shown per dialog page.
pub const LINES_PER_PAGE: usize = 3;
/// Side length of the avatar box rendered beside the window.
pub const AVATAR_SIZE: f32 = 32.0;

/// Per-dialog presentation options.
#[derive(Default)]
pub struct DialogOptions {
    /// Avatar key to display beside the window.
    pub avatar: Option<String>,
    /// Window width override.
    pub width: Option<f32>,
}

struct DialogState {
    window: Option<Window>,
    pages: VecDeque<Vec<String>>,
    avatar: Option<GraphicRef>,
    avatar_key: Option<String>,
}

/// Clonable handle to one dialog flow.
#[derive(Clone)]
pub struct DialogManager {
    stage: Stage,
    tweens: TweenRunner,
    scheduler: Scheduler,
    state: Rc<RefCell<DialogState>>,
    revealing: Rc<Cell<bool>>,
}

impl DialogManager {
    pub fn new(stage: &Stage, tweens: &TweenRunner, scheduler: &Scheduler) -> Self {
        Self {
            stage: stage.clone(),
            tweens: tweens.clone(),
            scheduler: scheduler.clone(),
            state: Rc::new(RefCell::new(DialogState {
                window: None,
                pages: VecDeque::new(),
                avatar: None,
                avatar_key: None,
            })),
            revealing: Rc::new(Cell::new(false)),
        }
    }

    /// Wrap and paginate `text`, replacing any dialog currently in flight.
    /// The first page appears on the first call to [`DialogManager::next`].
    pub fn set_dialog(&self, text: &str, options: DialogOptions) {
        self.teardown();

        let width = options.width.unwrap_or(DIALOG_WIDTH);
        let text_padding = WINDOW_PADDING_H + 4.0;
        let max_cols = ((width - 2.0 * text_padding) / FONT_SIZE).floor() as usize;
        let lines = word_wrap(text, max_cols.max(1));
        let pages: VecDeque<Vec<String>> =
            lines.chunks(LINES_PER_PAGE).map(<[String]>::to_vec).collect();

        let page_lines = pages.front().map_or(1, Vec::len).max(1);
        let height = WINDOW_PADDING_TOP
            + page_lines as f32 * (FONT_SIZE + SPACE_BETWEEN_LINES)
            + WINDOW_PADDING_BOTTOM;
        let x = (GAME_WIDTH - width) / 2.0;
        let y = GAME_HEIGHT - height - 8.0;
        let window = Window::new(&self.stage, &self.tweens, &self.scheduler, x, y, width, height);

        let avatar = options.avatar.as_ref().map(|_| {
            let graphic = self.stage.add_graphic(x - AVATAR_SIZE - 2.0, y, AVATAR_SIZE, AVATAR_SIZE);
            graphic.borrow_mut().visible = false;
            graphic
        });

        let mut state = self.state.borrow_mut();
        state.window = Some(window);
        state.pages = pages;
        state.avatar = avatar;
        state.avatar_key = options.avatar;
    }

    /// Advance the dialog. While a page is still revealing the call is
    /// ignored. Each completed page invokes `callback(false)`; once all pages
    /// are spent the window closes and `callback(true)` fires.
    pub fn next(&self, callback: Box<dyn FnOnce(bool)>) {
        if self.revealing.get() {
            debug!(target: "dialog", "next ignored while revealing");
            return;
        }
        let (window, page) = {
            let mut state = self.state.borrow_mut();
            let Some(window) = state.window.clone() else {
                debug!(target: "dialog", "next without an active dialog");
                return;
            };
            (window, state.pages.pop_front())
        };

        let Some(page) = page else {
            let manager = self.clone();
            window.close(Some(Box::new(move || {
                manager.teardown();
                callback(true);
            })));
            return;
        };

        // Block further advances from here through reveal completion, so a
        // press during the open animation cannot drop a page.
        self.revealing.set(true);

        if window.is_open() {
            self.reveal_page(&window, page, callback);
        } else {
            {
                let state = self.state.borrow();
                if let Some(avatar) = &state.avatar {
                    avatar.borrow_mut().visible = true;
                }
            }
            let manager = self.clone();
            let open_window = window.clone();
            window.show(
                true,
                Some(Box::new(move || manager.reveal_page(&open_window, page, callback))),
                None,
            );
        }
    }

    fn reveal_page(&self, window: &Window, page: Vec<String>, callback: Box<dyn FnOnce(bool)>) {
        self.revealing.set(true);
        let revealing = self.revealing.clone();
        let done = window.set_dialog_text(&page, TextOptions::default());
        done.on_resolve(move || {
            revealing.set(false);
            callback(false);
        });
    }

    /// True while the current page is still typing out.
    pub fn is_revealing(&self) -> bool {
        self.revealing.get()
    }

    pub fn pages_remaining(&self) -> usize {
        self.state.borrow().pages.len()
    }

    /// Current page's rendered lines, top to bottom.
    pub fn current_text_lines(&self) -> Vec<String> {
        self.state.borrow().window.as_ref().map_or_else(Vec::new, |window| {
            window.text_lines().iter().map(|t| t.borrow().text().to_owned()).collect()
        })
    }

    pub fn avatar_key(&self) -> Option<String> {
        self.state.borrow().avatar_key.clone()
    }

    /// Tear down the window and avatar immediately, in any state.
    pub fn destroy(&self) {
        self.teardown();
    }

    fn teardown(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(window) = state.window.take() {
            window.destroy();
        }
        if let Some(avatar) = state.avatar.take() {
            self.stage.remove_graphic(&avatar);
        }
        state.pages.clear();
        state.avatar_key = None;
        self.revealing.set(false);
    }
}

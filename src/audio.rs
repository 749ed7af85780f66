// ── Audio collaborator ──────────────────────────────────────────────────────
//
// Narrow interface over the game's audio layer: sound-effect playback with a
// completion callback, plus background-music pause/resume. Decoding and
// mixing live outside this crate, so playback here is bookkeeping only — the
// effect is recorded and the completion callback runs synchronously. The
// activity log lets tests assert the scripted contracts (e.g. that a
// party-join stinger paused and resumed the BGM).

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

#[derive(Default)]
struct AudioState {
    bgm_paused: bool,
    bgm_pause_count: u32,
    bgm_resume_count: u32,
    se_log: Vec<String>,
}

/// Clonable handle to the shared audio state.
#[derive(Clone, Default)]
pub struct Audio {
    state: Rc<RefCell<AudioState>>,
}

impl Audio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Play a sound effect. `on_complete` runs when the effect finishes —
    /// with no real mixer attached that is immediately.
    pub fn play_se(&self, name: &str, on_complete: Option<Box<dyn FnOnce()>>) {
        debug!(target: "audio", "play_se: {name}");
        self.state.borrow_mut().se_log.push(name.to_owned());
        if let Some(callback) = on_complete {
            callback();
        }
    }

    pub fn pause_bgm(&self) {
        let mut state = self.state.borrow_mut();
        state.bgm_paused = true;
        state.bgm_pause_count += 1;
    }

    pub fn resume_bgm(&self) {
        let mut state = self.state.borrow_mut();
        state.bgm_paused = false;
        state.bgm_resume_count += 1;
    }

    pub fn is_bgm_paused(&self) -> bool {
        self.state.borrow().bgm_paused
    }

    pub fn bgm_pause_count(&self) -> u32 {
        self.state.borrow().bgm_pause_count
    }

    pub fn bgm_resume_count(&self) -> u32 {
        self.state.borrow().bgm_resume_count
    }

    /// Names of every effect played so far, in order.
    pub fn se_log(&self) -> Vec<String> {
        self.state.borrow().se_log.clone()
    }
}

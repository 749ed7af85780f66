// ── Typewriter text reveal ──────────────────────────────────────────────────
//
// Reveals a line of text word by word on a fixed repeating timer, honoring
// scripted mid-word pauses: before the chunk that would cross a registered
// character offset is appended, only the prefix up to that offset is written,
// the word repeater is suspended for the configured delay, and the remainder
// of the word follows on resume. Multiple pause points inside one word are
// honored in ascending offset order.
//
// Lines queued together are strictly sequential — line N+1 does not start
// until line N has fully revealed — and the whole batch resolves one signal
// after the last word of the last line.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use crate::scheduler::{Scheduler, TimerId};
use crate::signal::Signal;
use crate::stage::TextRef;

/// Interval between word ticks during an animated reveal.
pub const WORD_TICK_MS: u32 = 30;

/// Called synchronously after each word lands: `(word, text_so_far)`.
pub type WordCallback = Rc<dyn Fn(&str, &str)>;

/// One line to reveal: the target text object, the full line, and the pause
/// map (`character offset → delay in ms`).
pub struct LineJob {
    pub target: TextRef,
    pub line: String,
    pub pauses: BTreeMap<usize, u32>,
}

impl LineJob {
    pub fn new(target: TextRef, line: &str) -> Self {
        Self { target, line: line.to_owned(), pauses: BTreeMap::new() }
    }

    pub fn with_pauses(mut self, pauses: BTreeMap<usize, u32>) -> Self {
        self.pauses = pauses;
        self
    }
}

/// Reveal a batch of lines sequentially. Returns a signal resolved after the
/// last line completes; an empty batch (or batch of empty lines) resolves
/// without any ticks.
pub fn reveal(scheduler: &Scheduler, jobs: Vec<LineJob>, word_callback: Option<WordCallback>) -> Signal {
    let done = Signal::new();
    let queue = Rc::new(RefCell::new(VecDeque::from(jobs)));
    pump(scheduler.clone(), queue, word_callback, done.clone());
    done
}

fn pump(
    scheduler: Scheduler,
    queue: Rc<RefCell<VecDeque<LineJob>>>,
    word_callback: Option<WordCallback>,
    done: Signal,
) {
    let job = queue.borrow_mut().pop_front();
    let Some(job) = job else {
        done.resolve();
        return;
    };
    let line_done = reveal_line(&scheduler, job, word_callback.clone());
    line_done.on_resolve(move || pump(scheduler, queue, word_callback, done));
}

struct LineReveal {
    scheduler: Scheduler,
    target: TextRef,
    words: Vec<String>,
    /// Pause points sorted ascending by character offset.
    pauses: Vec<(usize, u32)>,
    pause_idx: usize,
    word_index: usize,
    /// Characters revealed so far; jumps to each pause offset as it is taken.
    line_length: usize,
    /// Character length of the line once the current word (with separator)
    /// has fully landed.
    word_final: usize,
    /// The current word plus its trailing separator, as characters.
    word_chars: Vec<char>,
    /// Characters of `word_chars` already appended.
    word_slice: usize,
    timer: Option<TimerId>,
    word_callback: Option<WordCallback>,
    signal: Signal,
}

/// Reveal a single line; resolves after its last word.
fn reveal_line(scheduler: &Scheduler, job: LineJob, word_callback: Option<WordCallback>) -> Signal {
    let signal = Signal::new();
    if job.line.is_empty() {
        // Blank lines are valid dialog content; nothing to animate.
        signal.resolve();
        return signal;
    }
    let words: Vec<String> = job.line.split(' ').map(str::to_owned).collect();
    let word_count = words.len() as u32;
    let state = Rc::new(RefCell::new(LineReveal {
        scheduler: scheduler.clone(),
        target: job.target,
        words,
        pauses: job.pauses.into_iter().collect(),
        pause_idx: 0,
        word_index: 0,
        line_length: 0,
        word_final: 0,
        word_chars: Vec::new(),
        word_slice: 0,
        timer: None,
        word_callback,
        signal: signal.clone(),
    }));
    let tick_state = state.clone();
    let timer = scheduler.repeat(WORD_TICK_MS, word_count, move || begin_word(&tick_state));
    state.borrow_mut().timer = Some(timer);
    signal
}

/// One repeater tick: stage the next word and run it to the first suspension
/// point (or to completion).
fn begin_word(state: &Rc<RefCell<LineReveal>>) {
    {
        let mut s = state.borrow_mut();
        let index = s.word_index;
        if index >= s.words.len() {
            return;
        }
        let last = index + 1 == s.words.len();
        let mut chunk: Vec<char> = s.words[index].chars().collect();
        // Every word carries its separator except the final one, so the fully
        // revealed text equals the source line exactly.
        if !last {
            chunk.push(' ');
        }
        s.word_final = s.line_length + chunk.len();
        s.word_chars = chunk;
        s.word_slice = 0;
    }
    continue_word(state);
}

enum WordStep {
    /// Suspend the repeater for this many milliseconds.
    Pause(u32),
    /// The word fully landed.
    Finished { word: String, text_so_far: String, line_done: bool },
}

/// Append chunks of the current word until a pause point suspends the reveal
/// or the word completes. Re-entered by the pause resume callback.
fn continue_word(state: &Rc<RefCell<LineReveal>>) {
    let step = {
        let mut s = state.borrow_mut();

        // Pause offsets below what is already revealed can no longer apply.
        while s.pause_idx < s.pauses.len() && s.pauses[s.pause_idx].0 < s.line_length {
            s.pause_idx += 1;
        }

        let next_pause = s.pauses.get(s.pause_idx).copied();
        match next_pause {
            Some((offset, delay)) if offset < s.word_final => {
                let take = offset - s.line_length;
                let prefix: String =
                    s.word_chars[s.word_slice..s.word_slice + take].iter().collect();
                s.word_slice += take;
                s.line_length = offset;
                s.pause_idx += 1;
                s.target.borrow_mut().append_text(&prefix);
                WordStep::Pause(delay)
            }
            _ => {
                if s.line_length < s.word_final {
                    let take = s.word_final - s.line_length;
                    let rest: String =
                        s.word_chars[s.word_slice..s.word_slice + take].iter().collect();
                    s.word_slice += take;
                    s.line_length = s.word_final;
                    s.target.borrow_mut().append_text(&rest);
                }
                let word = s.words[s.word_index].clone();
                s.word_index += 1;
                let line_done = s.word_index == s.words.len();
                let text_so_far = s.target.borrow().text().to_owned();
                WordStep::Finished { word, text_so_far, line_done }
            }
        }
    };

    match step {
        WordStep::Pause(delay) => {
            let (scheduler, timer) = {
                let s = state.borrow();
                (s.scheduler.clone(), s.timer)
            };
            if let Some(timer) = timer {
                scheduler.pause(timer);
            }
            let resume_state = state.clone();
            scheduler.once(delay, move || {
                let (scheduler, timer) = {
                    let s = resume_state.borrow();
                    (s.scheduler.clone(), s.timer)
                };
                if let Some(timer) = timer {
                    scheduler.resume(timer);
                }
                continue_word(&resume_state);
            });
        }
        WordStep::Finished { word, text_so_far, line_done } => {
            let callback = state.borrow().word_callback.clone();
            if let Some(callback) = callback {
                callback(&word, &text_so_far);
            }
            if line_done {
                let signal = state.borrow().signal.clone();
                signal.resolve();
            }
        }
    }
}

// ── Word wrapping ───────────────────────────────────────────────────────────

/// Word-wrap `text` so every returned line is at most `max_cols` characters.
/// Words are split on ASCII whitespace; a word longer than `max_cols` is
/// force-wrapped at the column limit.
pub fn word_wrap(text: &str, max_cols: usize) -> Vec<String> {
    if max_cols == 0 {
        return vec![];
    }
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let space = if current.is_empty() { 0 } else { 1 };
        if !current.is_empty() && current.len() + space + word.len() > max_cols {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
        // Force-wrap a single word that exceeds max_cols.
        while current.len() > max_cols {
            lines.push(current[..max_cols].to_string());
            let rest = current[max_cols..].to_string();
            current = rest;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// ── Particle bursts ─────────────────────────────────────────────────────────
//
// Minimal emitter wrapper for scripted effects. `start` arms one timer per
// emitter and hands back one completion signal each; `render` is called once
// per frame while any emitter lives and draws the current burst into the
// stage's immediate-mode particle layer. Deterministic jitter, no RNG state.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;

use crate::scheduler::Scheduler;
use crate::signal::Signal;
use crate::stage::{ParticleLayer, Stage};

fn default_count() -> u32 {
    12
}

fn default_lifetime_ms() -> u32 {
    600
}

fn default_spread() -> f32 {
    16.0
}

fn default_size() -> f32 {
    2.0
}

/// One emitter of a scripted particle burst.
#[derive(Clone, Debug, Deserialize)]
pub struct EmitterInfo {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default = "default_lifetime_ms")]
    pub lifetime_ms: u32,
    #[serde(default = "default_spread")]
    pub spread: f32,
    #[serde(default = "default_size")]
    pub size: f32,
}

struct ActiveEmitter {
    id: u64,
    info: EmitterInfo,
    layer: ParticleLayer,
}

struct WrapperState {
    emitters: Vec<ActiveEmitter>,
    next_id: u64,
    tick: u64,
}

/// Clonable handle to the active emitter set.
#[derive(Clone)]
pub struct ParticlesWrapper {
    stage: Stage,
    scheduler: Scheduler,
    state: Rc<RefCell<WrapperState>>,
}

impl ParticlesWrapper {
    pub fn new(stage: &Stage, scheduler: &Scheduler) -> Self {
        Self {
            stage: stage.clone(),
            scheduler: scheduler.clone(),
            state: Rc::new(RefCell::new(WrapperState { emitters: Vec::new(), next_id: 0, tick: 0 })),
        }
    }

    /// Arm every emitter on `layer`. Each returned signal resolves when that
    /// emitter's lifetime elapses and it stops drawing.
    pub fn start(&self, infos: &[EmitterInfo], layer: ParticleLayer) -> Vec<Signal> {
        infos
            .iter()
            .map(|info| {
                let id = {
                    let mut state = self.state.borrow_mut();
                    let id = state.next_id;
                    state.next_id += 1;
                    state.emitters.push(ActiveEmitter { id, info: info.clone(), layer });
                    id
                };
                let signal = Signal::new();
                let done = signal.clone();
                let state = self.state.clone();
                self.scheduler.once(info.lifetime_ms, move || {
                    state.borrow_mut().emitters.retain(|e| e.id != id);
                    done.resolve();
                });
                signal
            })
            .collect()
    }

    /// Draw every live emitter's current burst. Call once per frame.
    pub fn render(&self) {
        let mut state = self.state.borrow_mut();
        state.tick += 1;
        let tick = state.tick;
        for emitter in &state.emitters {
            let info = &emitter.info;
            for i in 0..info.count as u64 {
                let seed = tick.wrapping_mul(73).wrapping_add(emitter.id.wrapping_mul(31)).wrapping_add(i.wrapping_mul(17));
                let dx = (pseudo_rand(seed) - 0.5) * info.spread;
                let dy = (pseudo_rand(seed.wrapping_add(7)) - 0.5) * info.spread;
                self.stage.draw_particle(emitter.layer, info.x + dx, info.y + dy, info.size);
            }
        }
    }

    pub fn active_count(&self) -> usize {
        self.state.borrow().emitters.len()
    }
}

fn pseudo_rand(seed: u64) -> f32 {
    let x = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    (x >> 33) as f32 / u32::MAX as f32
}

//! Particle-Burst: starts a particle effect and holds the running counter for
//! its full lifecycle, with a per-frame render callback that draws the burst
//! and is removed on completion.

use std::rc::Rc;

use crate::particles::EmitterInfo;
use crate::signal::Signal;
use crate::stage::ParticleLayer;

use super::GameEvent;

pub struct ParticlesEvent {
    pub(crate) emitters: Vec<EmitterInfo>,
    pub(crate) layer: ParticleLayer,
}

impl ParticlesEvent {
    pub(crate) fn fire(&self, event: &Rc<GameEvent>) {
        let ctx = event.context();
        ctx.events.increment_running();
        let signals = ctx.particles.start(&self.emitters, self.layer);
        let particles = ctx.particles.clone();
        let callback = ctx.events.add_callback(move || particles.render());
        let events = ctx.events.clone();
        // With no emitters the join resolves here synchronously, so the
        // increment/decrement pair still balances.
        Signal::all(&signals).on_resolve(move || {
            events.remove_callback(callback);
            events.decrement_running();
        });
    }
}

//! Camera-Shake: switches the continuous camera shake oscillator on or off.

use std::rc::Rc;

use super::GameEvent;

pub struct CameraShakeEvent {
    pub(crate) enable: bool,
}

impl CameraShakeEvent {
    pub(crate) fn fire(&self, event: &Rc<GameEvent>) {
        let mut camera = event.context().camera.borrow_mut();
        if self.enable {
            camera.enable_shake();
        } else {
            camera.disable_shake();
        }
    }
}

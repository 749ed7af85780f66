use glam::Vec2;

/// 2D camera: a world-space position plus a continuous screen-shake
/// oscillator that scripted events can switch on and off.
///
/// Unlike a one-shot impact shake, the scripted variant runs until an event
/// disables it (earthquake scenes), so there is no decay envelope — the
/// offset oscillates at full intensity while enabled and snaps back to zero
/// when disabled.
pub struct Camera {
    /// World-space pixel position the camera is centered on.
    pub position: Vec2,
    /// Peak shake displacement in pixels.
    pub shake_intensity: f32,
    /// Current shake displacement offset (recomputed every tick).
    pub shake_offset: Vec2,
    shake_enabled: bool,
    /// Accumulated time driving the oscillator.
    time: f32,
}

impl Camera {
    pub fn new(center_x: f32, center_y: f32) -> Self {
        Self {
            position: Vec2::new(center_x, center_y),
            shake_intensity: 2.0,
            shake_offset: Vec2::ZERO,
            shake_enabled: false,
            time: 0.0,
        }
    }

    pub fn enable_shake(&mut self) {
        self.shake_enabled = true;
    }

    pub fn disable_shake(&mut self) {
        self.shake_enabled = false;
        self.shake_offset = Vec2::ZERO;
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_enabled
    }

    /// Advance the shake oscillator by `dt` seconds.
    /// High-frequency sinusoids with incommensurate frequencies per axis so
    /// the offset never settles into a visible loop.
    pub fn tick(&mut self, dt: f32) {
        if !self.shake_enabled {
            return;
        }
        self.time += dt;
        use std::f32::consts::TAU;
        let t = self.time;
        self.shake_offset = Vec2::new(
            (t * 47.0 * TAU).sin() * self.shake_intensity,
            (t * 37.0 * TAU + 1.1).sin() * self.shake_intensity,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_camera_stays_still() {
        let mut camera = Camera::new(120.0, 80.0);
        camera.tick(0.5);
        assert_eq!(camera.shake_offset, Vec2::ZERO);
    }

    #[test]
    fn shake_offset_bounded_by_intensity() {
        let mut camera = Camera::new(0.0, 0.0);
        camera.shake_intensity = 3.0;
        camera.enable_shake();
        for _ in 0..60 {
            camera.tick(1.0 / 60.0);
            assert!(camera.shake_offset.x.abs() <= 3.0 + 1e-4);
            assert!(camera.shake_offset.y.abs() <= 3.0 + 1e-4);
        }
    }

    #[test]
    fn disable_zeroes_offset() {
        let mut camera = Camera::new(0.0, 0.0);
        camera.enable_shake();
        camera.tick(0.123);
        camera.disable_shake();
        assert_eq!(camera.shake_offset, Vec2::ZERO);
        assert!(!camera.is_shaking());
    }
}

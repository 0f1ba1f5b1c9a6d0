//! HUD fields and the once-per-second FPS sampler.

use crate::state::GamePhase;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub lives: u32,
    pub fps: u32,
    pub phase: GamePhase,
    pub enemy_count: usize,
    pub bullet_count: usize,
    pub debug: bool,
}

#[derive(Clone, Debug, Default)]
pub struct FpsCounter {
    frames: u32,
    last_sample: f64,
    fps: u32,
}

impl FpsCounter {
    pub fn new(now: f64) -> Self {
        Self {
            frames: 0,
            last_sample: now,
            fps: 0,
        }
    }

    /// Count one frame; publish the tally once a second has passed.
    pub fn frame(&mut self, now: f64) {
        self.frames += 1;
        if now - self.last_sample >= 1000.0 {
            self.fps = self.frames;
            self.frames = 0;
            self.last_sample = now;
            tracing::debug!(fps = self.fps, "fps sample");
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Frames counted since the last sample.
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publishes_after_one_second() {
        let mut c = FpsCounter::new(0.0);
        for i in 0..60 {
            c.frame(i as f64 * 16.0);
        }
        assert_eq!(c.fps(), 0);
        c.frame(1000.0);
        assert_eq!(c.fps(), 61);
    }

    #[test]
    fn resets_after_sample() {
        let mut c = FpsCounter::new(0.0);
        c.frame(1000.0);
        assert_eq!(c.fps(), 1);
        c.frame(1500.0);
        c.frame(2000.0);
        assert_eq!(c.fps(), 2);
    }
}

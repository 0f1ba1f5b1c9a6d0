//! Time-gated enemy creation.

use rand::Rng;

use crate::config::EnemyConfig;
use crate::entities::Enemy;

#[derive(Clone, Debug)]
pub struct Spawner {
    cfg: EnemyConfig,
    field_width: f64,
    last_spawn_time: f64,
}

impl Spawner {
    pub fn new(cfg: EnemyConfig, field_width: f64, now: f64) -> Self {
        Self {
            cfg,
            field_width,
            last_spawn_time: now,
        }
    }

    /// Re-arm the gate so the next spawn is one full interval away.
    pub fn reset(&mut self, now: f64) {
        self.last_spawn_time = now;
    }

    pub fn last_spawn_time(&self) -> f64 {
        self.last_spawn_time
    }

    pub fn ready(&self, now: f64) -> bool {
        now - self.last_spawn_time >= self.cfg.spawn_interval_ms
    }

    /// At most one enemy per call, however long the gap since the last one.
    pub fn poll(&mut self, now: f64, rng: &mut impl Rng) -> Option<Enemy> {
        if !self.ready(now) {
            return None;
        }
        self.last_spawn_time = now;
        Some(self.spawn(rng))
    }

    /// Fully above the field, at a random column and speed.
    pub fn spawn(&self, rng: &mut impl Rng) -> Enemy {
        let c = &self.cfg;
        let x = rng.gen_range(0.0..self.field_width - c.width);
        let jitter = if c.speed_jitter > 0.0 {
            rng.gen_range(0.0..c.speed_jitter)
        } else {
            0.0
        };
        Enemy::new(x, -c.height, c.width, c.height, c.base_speed + jitter)
    }
}

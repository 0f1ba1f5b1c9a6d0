//! All game entity types, with their per-tick update rules.
//!
//! Positions are the top-left corner of each entity's box in field units.
//! Motion is per tick, not per second.

use crate::config::{BulletConfig, PlayerConfig};
use crate::input::InputSnapshot;

// ── Bounds ────────────────────────────────────────────────────────────────────

/// Axis-aligned box derived from an entity's current position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub fire_cooldown: f64,
    /// Timestamp (ms) of the last accepted shot.
    pub last_fire_time: f64,
    pub lives: u32,
    pub score: u32,
}

impl Player {
    /// Centred horizontally, resting `bottom_margin` above the field floor.
    pub fn new(cfg: &PlayerConfig, field_width: f64, field_height: f64) -> Self {
        Self {
            x: field_width / 2.0 - cfg.width / 2.0,
            y: field_height - cfg.height - cfg.bottom_margin,
            width: cfg.width,
            height: cfg.height,
            speed: cfg.speed,
            fire_cooldown: cfg.fire_cooldown_ms,
            last_fire_time: 0.0,
            lives: cfg.lives,
            score: 0,
        }
    }

    /// Apply left/right intent.  Both directions held cancel out.
    pub fn update(&mut self, input: &InputSnapshot, field_width: f64) {
        let mut dx = 0.0;
        if input.left() {
            dx -= self.speed;
        }
        if input.right() {
            dx += self.speed;
        }
        self.x = (self.x + dx).clamp(0.0, field_width - self.width);
    }

    pub fn can_fire(&self, now: f64) -> bool {
        now - self.last_fire_time >= self.fire_cooldown
    }

    /// Records the shot time only; the caller spawns the bullet.
    pub fn fire(&mut self, now: f64) {
        self.last_fire_time = now;
    }

    /// Lose one life.  Returns `true` when none are left.
    pub fn hit(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub to_remove: bool,
}

impl Enemy {
    pub fn new(x: f64, y: f64, width: f64, height: f64, speed: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            speed,
            to_remove: false,
        }
    }

    /// Fall straight down.  Culled once the top edge is below the field.
    pub fn update(&mut self, field_height: f64) {
        self.y += self.speed;
        if self.y > field_height {
            self.to_remove = true;
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }
}

// ── Bullet ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Signed vertical step: negative travels up.
    pub speed: f64,
    pub is_player_bullet: bool,
    pub to_remove: bool,
    bottom_slack: f64,
}

impl Bullet {
    /// `origin_x` is the horizontal centre, `origin_y` the top edge.
    pub fn new(cfg: &BulletConfig, origin_x: f64, origin_y: f64, is_player_bullet: bool) -> Self {
        let speed = if is_player_bullet {
            -cfg.player_speed
        } else {
            cfg.enemy_speed
        };
        Self {
            x: origin_x - cfg.width / 2.0,
            y: origin_y,
            width: cfg.width,
            height: cfg.height,
            speed,
            is_player_bullet,
            to_remove: false,
            bottom_slack: cfg.bottom_slack,
        }
    }

    pub fn update(&mut self, field_height: f64) {
        self.y += self.speed;
        if self.y < -self.height || self.y > field_height + self.bottom_slack {
            self.to_remove = true;
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }
}

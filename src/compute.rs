//! Per-frame simulation.
//!
//! `Simulation` owns every entity and the lifecycle state.  The host feeds it
//! an input snapshot and a timestamp once per frame and reads back a
//! `FrameView` to draw.  Randomness comes only from the owned RNG, so a seeded
//! simulation replays identically.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collision::intersects;
use crate::config::GameConfig;
use crate::entities::{Bullet, Enemy, Player};
use crate::hud::{FpsCounter, Hud};
use crate::input::{InputSnapshot, Key};
use crate::spawner::Spawner;
use crate::state::{GamePhase, GameState};

/// Points for each enemy destroyed by a bullet.
pub const SCORE_PER_ENEMY: u32 = 10;

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug)]
pub struct FrameView<'a> {
    pub player: Option<&'a Player>,
    pub enemies: &'a [Enemy],
    pub bullets: &'a [Bullet],
    pub hud: Hud,
    pub field_width: f64,
    pub field_height: f64,
    /// Frames counted toward the current FPS sample; drives the star drift.
    pub star_phase: u32,
}

pub struct Simulation {
    cfg: GameConfig,
    state: GameState,
    player: Option<Player>,
    enemies: Vec<Enemy>,
    bullets: Vec<Bullet>,
    spawner: Spawner,
    fps: FpsCounter,
    rng: StdRng,
}

impl Simulation {
    pub fn new(cfg: GameConfig, rng: StdRng) -> Self {
        let spawner = Spawner::new(cfg.enemy.clone(), cfg.screen.width, 0.0);
        Self {
            cfg,
            state: GameState::new(),
            player: None,
            enemies: Vec::new(),
            bullets: Vec::new(),
            spawner,
            fps: FpsCounter::new(0.0),
            rng,
        }
    }

    pub fn with_seed(cfg: GameConfig, seed: u64) -> Self {
        Self::new(cfg, StdRng::seed_from_u64(seed))
    }

    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.current()
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    /// Loading → StartScreen.
    pub fn on_assets_loaded(&mut self) {
        self.state.set(GamePhase::StartScreen);
    }

    /// Fresh player, empty field, re-armed spawn gate, then Playing.
    pub fn start_game(&mut self, now: f64) {
        let screen = &self.cfg.screen;
        self.player = Some(Player::new(&self.cfg.player, screen.width, screen.height));
        self.enemies.clear();
        self.bullets.clear();
        self.spawner.reset(now);
        self.fps = FpsCounter::new(now);
        self.state.set(GamePhase::Playing);
        tracing::info!("game started");
    }

    /// Advance one frame.  Does nothing unless the game is playing.
    pub fn tick(&mut self, input: &InputSnapshot, now: f64) {
        if !self.state.is_playing() {
            return;
        }
        self.fps.frame(now);

        if input.is_pressed(Key::Escape) {
            self.state.set(GamePhase::Paused);
            return;
        }

        let Some(player) = self.player.as_mut() else {
            tracing::warn!("tick while playing without a player");
            return;
        };
        let (field_width, field_height) = (self.cfg.screen.width, self.cfg.screen.height);

        // ── 1. Player ────────────────────────────────────────────────────────
        player.update(input, field_width);

        // ── 2. Fire ──────────────────────────────────────────────────────────
        if input.fire() && player.can_fire(now) {
            let (cx, _) = player.center();
            self.bullets.push(Bullet::new(&self.cfg.bullet, cx, player.y, true));
            player.fire(now);
        }

        // ── 3. Spawn ─────────────────────────────────────────────────────────
        if let Some(enemy) = self.spawner.poll(now, &mut self.rng) {
            self.enemies.push(enemy);
        }

        // ── 4. Move enemies, then bullets ────────────────────────────────────
        for enemy in &mut self.enemies {
            enemy.update(field_height);
        }
        for bullet in &mut self.bullets {
            bullet.update(field_height);
        }

        // ── 5. Collisions ────────────────────────────────────────────────────
        resolve_collisions(player, &mut self.enemies, &mut self.bullets);

        // ── 6. Cull ──────────────────────────────────────────────────────────
        self.enemies.retain(|e| !e.to_remove);
        self.bullets.retain(|b| !b.to_remove);

        // ── 7. Terminal check ────────────────────────────────────────────────
        if player.lives == 0 {
            tracing::info!(score = player.score, "game over");
            self.state.set(GamePhase::GameOver);
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.player.as_ref().map_or(0, |p| p.score),
            lives: self.player.as_ref().map_or(0, |p| p.lives),
            fps: self.fps.fps(),
            phase: self.state.current(),
            enemy_count: self.enemies.len(),
            bullet_count: self.bullets.len(),
            debug: self.cfg.debug,
        }
    }

    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            player: self.player.as_ref(),
            enemies: &self.enemies,
            bullets: &self.bullets,
            hud: self.hud(),
            field_width: self.cfg.screen.width,
            field_height: self.cfg.screen.height,
            star_phase: self.fps.frames(),
        }
    }
}

/// Mark colliding entities and apply score and damage.
///
/// Bullets check enemies newest-first and credit at most one kill each.
/// The enemy/player pass then runs over every enemy, including ones a bullet
/// just marked, so a kill on top of the ship still costs a life.
pub fn resolve_collisions(player: &mut Player, enemies: &mut [Enemy], bullets: &mut [Bullet]) {
    for bullet in bullets.iter_mut().filter(|b| b.is_player_bullet) {
        let bb = bullet.bounds();
        if let Some(enemy) = enemies.iter_mut().rev().find(|e| intersects(&bb, &e.bounds())) {
            bullet.to_remove = true;
            enemy.to_remove = true;
            player.score += SCORE_PER_ENEMY;
        }
    }

    let pb = player.bounds();
    for enemy in enemies.iter_mut() {
        if intersects(&enemy.bounds(), &pb) {
            enemy.to_remove = true;
            if player.hit() {
                tracing::debug!("last life lost");
            }
        }
    }
}

use starfall::clock::{Clock, ManualClock};
use starfall::compute::*;
use starfall::config::GameConfig;
use starfall::entities::*;
use starfall::input::{InputSnapshot, Key};
use starfall::GamePhase;

fn started() -> Simulation {
    let mut sim = Simulation::with_seed(GameConfig::default(), 42);
    sim.on_assets_loaded();
    sim.start_game(0.0);
    sim
}

fn keys(pressed: &[Key]) -> InputSnapshot {
    InputSnapshot::with_keys(pressed)
}

fn idle() -> InputSnapshot {
    InputSnapshot::new()
}

fn player(sim: &Simulation) -> &Player {
    sim.player().expect("player exists after start_game")
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn new_simulation_is_loading_without_player() {
    let sim = Simulation::with_seed(GameConfig::default(), 1);
    assert_eq!(sim.phase(), GamePhase::Loading);
    assert!(sim.player().is_none());
    assert!(sim.view().player.is_none());
}

#[test]
fn assets_loaded_moves_to_start_screen() {
    let mut sim = Simulation::with_seed(GameConfig::default(), 1);
    sim.on_assets_loaded();
    assert_eq!(sim.phase(), GamePhase::StartScreen);
    assert_eq!(sim.state().previous(), Some(GamePhase::Loading));
}

#[test]
fn start_game_creates_player_and_plays() {
    let sim = started();
    assert_eq!(sim.phase(), GamePhase::Playing);
    assert_eq!(sim.state().previous(), Some(GamePhase::StartScreen));
    assert_eq!(player(&sim).lives, 3);
    assert_eq!(player(&sim).score, 0);
    assert!(sim.enemies().is_empty());
    assert!(sim.bullets().is_empty());
    assert_eq!(sim.spawner().last_spawn_time(), 0.0);
}

#[test]
fn tick_is_noop_before_start() {
    let mut sim = Simulation::with_seed(GameConfig::default(), 1);
    sim.on_assets_loaded();
    sim.tick(&keys(&[Key::Space]), 10_000.0);
    assert_eq!(sim.phase(), GamePhase::StartScreen);
    assert!(sim.enemies().is_empty());
    assert!(sim.bullets().is_empty());
}

// ── Pause ─────────────────────────────────────────────────────────────────────

#[test]
fn escape_pauses_before_any_other_work() {
    let mut sim = started();
    sim.tick(&keys(&[Key::Escape, Key::Right, Key::Space]), 2000.0);
    assert_eq!(sim.phase(), GamePhase::Paused);
    assert_eq!(player(&sim).x, 380.0);
    assert!(sim.bullets().is_empty());
    assert!(sim.enemies().is_empty());
}

#[test]
fn paused_never_resumes() {
    let mut sim = started();
    sim.tick(&keys(&[Key::Escape]), 16.0);
    for i in 0..10 {
        sim.tick(&keys(&[Key::Right]), 32.0 + i as f64 * 16.0);
    }
    assert_eq!(sim.phase(), GamePhase::Paused);
    assert_eq!(player(&sim).x, 380.0);
}

// ── Movement & firing ─────────────────────────────────────────────────────────

#[test]
fn player_clamped_after_many_frames() {
    let mut sim = started();
    for _ in 0..200 {
        sim.tick(&keys(&[Key::Right]), 16.0);
    }
    assert_eq!(player(&sim).x, 760.0);
    for _ in 0..400 {
        sim.tick(&keys(&[Key::A]), 16.0);
    }
    assert_eq!(player(&sim).x, 0.0);
}

#[test]
fn fire_spawns_bullet_from_player_nose() {
    let mut sim = started();
    sim.tick(&keys(&[Key::Space]), 300.0);
    assert_eq!(sim.bullets().len(), 1);
    let b = &sim.bullets()[0];
    assert!(b.is_player_bullet);
    assert_eq!(b.x, 398.0); // centre 400 - width/2
    assert_eq!(b.y, 543.0); // spawned at 550, moved once this frame
    assert_eq!(player(&sim).last_fire_time, 300.0);
}

#[test]
fn w_key_also_fires() {
    let mut sim = started();
    sim.tick(&keys(&[Key::W]), 300.0);
    assert_eq!(sim.bullets().len(), 1);
}

#[test]
fn fire_respects_cooldown() {
    let mut sim = started();
    sim.tick(&keys(&[Key::Space]), 300.0);
    sim.tick(&keys(&[Key::Space]), 549.0);
    assert_eq!(sim.bullets().len(), 1);
    sim.tick(&keys(&[Key::Space]), 550.0);
    assert_eq!(sim.bullets().len(), 2);
}

#[test]
fn first_shot_waits_for_cooldown_from_zero() {
    let mut sim = started();
    sim.tick(&keys(&[Key::Space]), 100.0);
    assert!(sim.bullets().is_empty());
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn enemy_spawns_after_interval() {
    let mut sim = started();
    sim.tick(&idle(), 1499.0);
    assert!(sim.enemies().is_empty());
    sim.tick(&idle(), 1500.0);
    assert_eq!(sim.enemies().len(), 1);
    // spawned at -height, then moved once this frame
    assert!(sim.enemies()[0].y > -30.0 && sim.enemies()[0].y < -26.0);
}

#[test]
fn frame_gap_spawns_single_enemy() {
    let mut sim = started();
    sim.tick(&idle(), 10_000.0);
    assert_eq!(sim.enemies().len(), 1);
}

// ── Culling ───────────────────────────────────────────────────────────────────

#[test]
fn no_tombstones_survive_a_tick() {
    let mut sim = started();
    for i in 0..600 {
        let input = if i % 2 == 0 { keys(&[Key::Space]) } else { idle() };
        sim.tick(&input, i as f64 * 16.0);
        assert!(sim.enemies().iter().all(|e| !e.to_remove));
        assert!(sim.bullets().iter().all(|b| !b.to_remove));
    }
}

// ── View / HUD ────────────────────────────────────────────────────────────────

#[test]
fn fps_published_after_one_second_of_frames() {
    let mut sim = started();
    for i in 1..=60 {
        sim.tick(&idle(), i as f64 * 1000.0 / 60.0);
    }
    assert_eq!(sim.hud().fps, 60);
}

#[test]
fn same_seed_replays_identically() {
    let run = || {
        let mut sim = started();
        for i in 0..400 {
            let input = match i % 3 {
                0 => keys(&[Key::Left, Key::Space]),
                1 => keys(&[Key::Right]),
                _ => idle(),
            };
            sim.tick(&input, i as f64 * 25.0);
        }
        (sim.enemies().to_vec(), sim.hud().score, sim.hud().lives)
    };
    assert_eq!(run(), run());
}

#[test]
fn manual_clock_drives_spawn_cadence() {
    let clock = ManualClock::new(0.0);
    let mut sim = Simulation::with_seed(GameConfig::default(), 7);
    sim.on_assets_loaded();
    sim.start_game(clock.now_ms());
    let mut spawned = 0;
    for _ in 0..300 {
        clock.advance(20.0);
        let before = sim.spawner().last_spawn_time();
        sim.tick(&idle(), clock.now_ms());
        if sim.spawner().last_spawn_time() != before {
            spawned += 1;
        }
    }
    assert_eq!(spawned, 4); // 6000 ms of play
}

use starfall::config::EnemyConfig;
use starfall::spawner::Spawner;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_spawner() -> Spawner {
    Spawner::new(EnemyConfig::default(), 800.0, 0.0)
}

#[test]
fn nothing_before_interval() {
    let mut s = make_spawner();
    assert!(s.poll(1499.0, &mut seeded_rng()).is_none());
}

#[test]
fn spawns_at_exact_interval() {
    let mut s = make_spawner();
    let mut rng = seeded_rng();
    assert!(s.poll(1500.0, &mut rng).is_some());
    assert_eq!(s.last_spawn_time(), 1500.0);
    assert!(s.poll(1500.0, &mut rng).is_none());
}

#[test]
fn long_stall_spawns_only_once() {
    let mut s = make_spawner();
    let mut rng = seeded_rng();
    assert!(s.poll(10_000.0, &mut rng).is_some());
    assert!(s.poll(10_000.0, &mut rng).is_none());
    // next one is a full interval after the stall, not backfilled
    assert!(s.poll(11_499.0, &mut rng).is_none());
    assert!(s.poll(11_500.0, &mut rng).is_some());
}

#[test]
fn one_enemy_per_interval_at_steady_frames() {
    let mut s = make_spawner();
    let mut rng = seeded_rng();
    let spawned = (1..=750)
        .filter(|k| s.poll(*k as f64 * 20.0, &mut rng).is_some())
        .count();
    assert_eq!(spawned, 10); // 15 000 ms / 1500 ms
}

#[test]
fn reset_rearms_gate() {
    let mut s = make_spawner();
    s.reset(5000.0);
    assert!(!s.ready(6499.0));
    assert!(s.ready(6500.0));
}

#[test]
fn spawned_enemies_start_above_field_within_ranges() {
    let s = make_spawner();
    let mut rng = seeded_rng();
    for _ in 0..500 {
        let e = s.spawn(&mut rng);
        assert!(e.x >= 0.0 && e.x < 770.0, "x={}", e.x);
        assert_eq!(e.y, -30.0);
        assert!(e.speed >= 2.0 && e.speed < 4.0, "speed={}", e.speed);
        assert_eq!((e.width, e.height), (30.0, 30.0));
        assert!(!e.to_remove);
    }
}

#[test]
fn zero_jitter_gives_base_speed() {
    let cfg = EnemyConfig {
        speed_jitter: 0.0,
        ..EnemyConfig::default()
    };
    let s = Spawner::new(cfg, 800.0, 0.0);
    assert_eq!(s.spawn(&mut seeded_rng()).speed, 2.0);
}

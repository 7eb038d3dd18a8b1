use catch_game::compute::*;
use catch_game::entities::*;

use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

// Hero square: centre (200, 595), side 80.
fn make_state() -> SessionState {
    init_state(Playfield { width: 400.0, height: 700.0 })
}

/// An RNG whose spawn roll always fails, so only hand-placed villains exist.
fn no_spawn_rng() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn villain(x: f32, y: f32, size: f32, speed: f32) -> Villain {
    Villain {
        x,
        y,
        size,
        speed,
        kind: VillainKind::Spacecraft,
        eaten: false,
    }
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_defaults() {
    let s = make_state();
    assert_eq!(s.score, 0);
    assert_eq!(s.level, 1);
    assert_eq!(s.lives, 3);
    assert_eq!(s.eaten, 0);
    assert_eq!(s.hero.x, 0.5);
    assert_eq!(s.frame, 0);
    assert!(s.villains.is_empty());
}

// ── eats_needed ───────────────────────────────────────────────────────────────

#[test]
fn eats_needed_grows_by_two_per_level() {
    assert_eq!(eats_needed(1), 10);
    assert_eq!(eats_needed(2), 12);
    assert_eq!(eats_needed(5), 18);
    for level in 1..50 {
        assert_eq!(eats_needed(level), 10 + (level - 1) * 2);
    }
}

// ── set_hero_x ────────────────────────────────────────────────────────────────

#[test]
fn set_hero_x_inside_band() {
    let s = set_hero_x(&make_state(), 0.3);
    assert_eq!(s.hero.x, 0.3);
}

#[test]
fn set_hero_x_clamps_any_input() {
    let s = make_state();
    for (input, expected) in [
        (-5.0, HERO_MIN_X),
        (0.0, HERO_MIN_X),
        (0.92, HERO_MAX_X),
        (1.0, HERO_MAX_X),
        (1e9, HERO_MAX_X),
        (f32::INFINITY, HERO_MAX_X),
        (f32::NEG_INFINITY, HERO_MIN_X),
    ] {
        assert_eq!(set_hero_x(&s, input).hero.x, expected, "input {input}");
    }
}

#[test]
fn set_hero_x_ignores_nan() {
    let s = set_hero_x(&make_state(), 0.2);
    assert_eq!(set_hero_x(&s, f32::NAN).hero.x, 0.2);
}

#[test]
fn set_hero_x_does_not_mutate_original() {
    let s = make_state();
    let _ = set_hero_x(&s, 0.1);
    assert_eq!(s.hero.x, 0.5);
}

// ── Square::overlaps ──────────────────────────────────────────────────────────

#[test]
fn overlap_is_symmetric() {
    let h = Square { cx: 200.0, cy: 595.0, side: 80.0 };
    let cases = [
        Square { cx: 200.0, cy: 595.0, side: 50.0 },
        Square { cx: 250.0, cy: 560.0, side: 60.0 },
        Square { cx: 300.0, cy: 595.0, side: 45.0 },
        Square { cx: 100.0, cy: 100.0, side: 75.0 },
    ];
    for v in cases {
        assert_eq!(h.overlaps(&v), v.overlaps(&h));
    }
}

#[test]
fn touching_edges_do_not_overlap() {
    let h = Square { cx: 200.0, cy: 595.0, side: 80.0 };
    // reach = (80 + 50) / 2 = 65
    let side_touch = Square { cx: 265.0, cy: 595.0, side: 50.0 };
    let corner_touch = Square { cx: 265.0, cy: 660.0, side: 50.0 };
    let barely_in = Square { cx: 264.5, cy: 595.0, side: 50.0 };
    assert!(!h.overlaps(&side_touch));
    assert!(!h.overlaps(&corner_touch));
    assert!(h.overlaps(&barely_in));
}

#[test]
fn hero_square_follows_hero_x() {
    let s = set_hero_x(&make_state(), 0.25);
    let sq = hero_square(&s);
    assert_eq!(sq.cx, 100.0);
    assert_eq!(sq.cy, 595.0);
    assert_eq!(sq.side, HERO_SIZE);
}

// ── tick — movement & spawning ────────────────────────────────────────────────

#[test]
fn tick_increments_frame() {
    let mut s = make_state();
    s.frame = 5;
    let out = tick(&s, &mut no_spawn_rng());
    assert_eq!(out.state.frame, 6);
}

#[test]
fn tick_moves_villains_down_by_speed() {
    let mut s = make_state();
    s.villains.push(villain(50.0, 100.0, 50.0, 4.5));
    let out = tick(&s, &mut no_spawn_rng());
    assert_eq!(out.state.villains.len(), 1);
    assert_eq!(out.state.villains[0].y, 104.5);
    assert_eq!(out.state.villains[0].x, 50.0);
}

#[test]
fn tick_spawns_on_successful_roll() {
    let s = make_state();
    let out = tick(&s, &mut StepRng::new(0, 0));
    assert_eq!(out.state.villains.len(), 1);
    let v = &out.state.villains[0];
    // spawned above the top edge, then advanced once
    assert!((v.y - (-v.size / 2.0 + v.speed)).abs() < 1e-4);
}

#[test]
fn tick_does_not_mutate_original() {
    let mut s = make_state();
    s.villains.push(villain(200.0, 595.0, 50.0, 0.0));
    let _ = tick(&s, &mut no_spawn_rng());
    assert_eq!(s.score, 0);
    assert_eq!(s.villains.len(), 1);
    assert!(!s.villains[0].eaten);
}

// ── tick — catching ───────────────────────────────────────────────────────────

#[test]
fn tick_eats_villain_on_hero() {
    let mut s = make_state();
    s.villains.push(villain(200.0, 593.0, 50.0, 2.0));
    let out = tick(&s, &mut no_spawn_rng());
    assert_eq!(out.eaten, 1);
    assert_eq!(out.state.score, 10);
    assert_eq!(out.state.eaten, 1);
    assert_eq!(out.state.lives, 3);
    assert!(out.state.villains.is_empty());
}

#[test]
fn tick_eat_with_seeded_spawner_still_scores_once() {
    // A random spawn near the top never reaches the hero on the same tick.
    let mut s = make_state();
    s.villains.push(villain(200.0, 595.0, 50.0, 0.0));
    let out = tick(&s, &mut seeded_rng());
    assert_eq!(out.state.score, 10);
    assert_eq!(out.state.eaten, 1);
    assert_eq!(out.state.lives, 3);
}

#[test]
fn tick_score_scales_with_level() {
    let mut s = make_state();
    s.level = 4;
    s.villains.push(villain(200.0, 595.0, 60.0, 0.0));
    let out = tick(&s, &mut no_spawn_rng());
    assert_eq!(out.state.score, 40);
}

#[test]
fn tick_touching_villain_is_not_eaten() {
    let mut s = make_state();
    s.villains.push(villain(265.0, 595.0, 50.0, 0.0));
    let out = tick(&s, &mut no_spawn_rng());
    assert_eq!(out.eaten, 0);
    assert_eq!(out.state.villains.len(), 1);
}

#[test]
fn tick_resolves_every_simultaneous_catch() {
    let mut s = make_state();
    s.villains.push(villain(180.0, 595.0, 50.0, 0.0));
    s.villains.push(villain(200.0, 580.0, 50.0, 0.0));
    s.villains.push(villain(220.0, 610.0, 50.0, 0.0));
    let out = tick(&s, &mut no_spawn_rng());
    assert_eq!(out.eaten, 3);
    assert_eq!(out.state.score, 30);
    assert_eq!(out.state.eaten, 3);
    assert!(out.state.villains.is_empty());
}

#[test]
fn tick_already_eaten_villain_is_ignored() {
    let mut s = make_state();
    let mut v = villain(200.0, 595.0, 50.0, 0.0);
    v.eaten = true;
    s.villains.push(v);
    let out = tick(&s, &mut no_spawn_rng());
    assert_eq!(out.eaten, 0);
    assert_eq!(out.state.score, 0);
    assert!(out.state.villains.is_empty()); // swept on this tick
}

// ── tick — level progression ──────────────────────────────────────────────────

#[test]
fn tick_levels_up_on_tenth_eat() {
    let mut s = make_state();
    s.eaten = 9;
    s.villains.push(villain(200.0, 595.0, 50.0, 0.0));
    let out = tick(&s, &mut no_spawn_rng());
    assert!(out.leveled_up);
    assert_eq!(out.state.level, 2);
    assert_eq!(out.state.eaten, 0);
    assert_eq!(eats_needed(out.state.level), 12);
    assert_eq!(out.state.score, 10);
}

#[test]
fn tick_level_up_mid_batch_scores_rest_at_new_level() {
    let mut s = make_state();
    s.eaten = 9;
    for dx in [-20.0, 0.0, 20.0] {
        s.villains.push(villain(200.0 + dx, 595.0, 50.0, 0.0));
    }
    let out = tick(&s, &mut no_spawn_rng());
    assert_eq!(out.state.level, 2);
    assert_eq!(out.state.eaten, 2);
    assert_eq!(out.state.score, 10 + 20 + 20);
}

#[test]
fn tick_never_levels_twice() {
    let mut s = make_state();
    s.eaten = 9;
    for i in 0..16 {
        s.villains.push(villain(170.0 + i as f32 * 4.0, 595.0, 50.0, 0.0));
    }
    let out = tick(&s, &mut no_spawn_rng());
    assert_eq!(out.eaten, 16);
    assert_eq!(out.state.level, 2);
    // surplus carries, capped one below the new threshold of 12
    assert_eq!(out.state.eaten, 11);
    assert!(out.state.eaten < eats_needed(out.state.level));

    let mut next = out.state;
    next.villains.push(villain(200.0, 595.0, 50.0, 0.0));
    let out = tick(&next, &mut no_spawn_rng());
    assert_eq!(out.state.level, 3);
    assert_eq!(out.state.eaten, 0);
}

// ── tick — misses & game over ─────────────────────────────────────────────────

#[test]
fn tick_miss_costs_a_life() {
    let mut s = make_state();
    s.villains.push(villain(50.0, 720.0, 50.0, 10.0)); // top edge 705 > 700
    let out = tick(&s, &mut no_spawn_rng());
    assert_eq!(out.missed, 1);
    assert_eq!(out.state.lives, 2);
    assert!(!out.game_over);
    assert!(out.state.villains.is_empty());
}

#[test]
fn tick_centre_below_edge_is_not_yet_a_miss() {
    let mut s = make_state();
    s.villains.push(villain(50.0, 700.0, 50.0, 10.0)); // top edge 685
    let out = tick(&s, &mut no_spawn_rng());
    assert_eq!(out.missed, 0);
    assert_eq!(out.state.lives, 3);
    assert_eq!(out.state.villains.len(), 1);
}

#[test]
fn tick_last_life_ends_game() {
    let mut s = make_state();
    s.lives = 1;
    s.villains.push(villain(50.0, 720.0, 50.0, 10.0));
    let out = tick(&s, &mut no_spawn_rng());
    assert_eq!(out.state.lives, 0);
    assert!(out.game_over);
    assert!(out.state.villains.is_empty());
}

#[test]
fn tick_game_over_stops_counting_misses() {
    let mut s = make_state();
    s.lives = 1;
    s.villains.push(villain(50.0, 720.0, 50.0, 10.0));
    s.villains.push(villain(350.0, 720.0, 50.0, 10.0));
    let out = tick(&s, &mut no_spawn_rng());
    assert_eq!(out.missed, 1);
    assert_eq!(out.state.lives, 0);
}

#[test]
fn tick_catch_beats_miss_on_same_tick() {
    // Short playfield: hero square spans y 45..125, bottom edge at 100.
    let mut s = init_state(Playfield { width: 400.0, height: 100.0 });
    s.villains.push(villain(200.0, 140.0, 50.0, 0.0)); // top edge 115 > 100
    let out = tick(&s, &mut no_spawn_rng());
    assert_eq!(out.eaten, 1);
    assert_eq!(out.missed, 0);
    assert_eq!(out.state.lives, 3);
    assert_eq!(out.state.score, 10);
}

// ── tick — long run properties ────────────────────────────────────────────────

#[test]
fn lives_never_increase_and_game_over_is_exact() {
    let mut rng = seeded_rng();
    let mut s = set_hero_x(&make_state(), HERO_MIN_X);
    let mut ended = false;
    for _ in 0..200_000 {
        let out = tick(&s, &mut rng);
        assert!(out.state.lives <= s.lives);
        assert_eq!(out.game_over, out.state.lives == 0);
        assert!(out.state.villains.iter().all(|v| !v.eaten));
        assert!(out.state.level >= s.level);
        assert!(out.state.score >= s.score);
        s = out.state;
        if out.game_over {
            ended = true;
            break;
        }
    }
    assert!(ended, "game never ended");
}

use wave_shooter::config::Rules;
use wave_shooter::entities::*;
use wave_shooter::session::{Control, Session, GAME_OVER_BANNER};
use wave_shooter::stage::{Canvas, Stage, TextField};

use rand::rngs::StdRng;
use rand::SeedableRng;

const TICK: f64 = 1.0 / 30.0;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn confirm() -> InputState {
    InputState {
        confirm: true,
        ..InputState::default()
    }
}

fn cancel() -> InputState {
    InputState {
        cancel: true,
        ..InputState::default()
    }
}

fn fire() -> InputState {
    InputState {
        fire: true,
        ..InputState::default()
    }
}

fn idle() -> InputState {
    InputState::default()
}

/// Opens a session and starts a run at t = 0.
fn running(canvas: &mut Canvas, rng: &mut StdRng) -> Session {
    let mut session = Session::open(Rules::default(), canvas);
    session.update(canvas, &confirm(), 0.0, rng);
    assert_eq!(session.phase(), Phase::Running);
    session
}

/// Puts a normal enemy one step above the bottom edge.
fn doom_enemy(session: &mut Session, canvas: &mut Canvas) {
    let world = session.world_mut().unwrap();
    world
        .store
        .spawn_enemy(canvas, EnemyKind::Normal, Position::new(100.0, 639.0), 1, 0.0)
        .unwrap();
}

/// Drives a running session into game over at time `now`.
fn finish_run(session: &mut Session, canvas: &mut Canvas, rng: &mut StdRng, score: u32, now: f64) {
    {
        let world = session.world_mut().unwrap();
        world.player.hp = 1;
        world.score = score;
    }
    doom_enemy(session, canvas);
    session.update(canvas, &idle(), now, rng);
    assert_eq!(session.phase(), Phase::GameOver);
}

// ── Idle ──────────────────────────────────────────────────────────────────────

#[test]
fn open_shows_start_screen() {
    let mut canvas = Canvas::new();
    let session = Session::open(Rules::default(), &mut canvas);
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.high_score(), 0);
    assert!(session.world().is_none());
    assert_eq!(canvas.text(TextField::Title), Some("Shooting"));
    assert!(canvas.text(TextField::Controls).is_some());
    assert_eq!(canvas.text(TextField::HighScore), None);
    assert!(canvas.buttons_visible());
    assert_eq!(canvas.sprite_count(), 0);
}

#[test]
fn idle_without_input_stays_idle() {
    let mut canvas = Canvas::new();
    let mut rng = seeded_rng();
    let mut session = Session::open(Rules::default(), &mut canvas);
    let control = session.update(&mut canvas, &fire(), TICK, &mut rng);
    assert_eq!(control, Control::Continue);
    assert_eq!(session.phase(), Phase::Idle);
}

#[test]
fn cancel_on_start_screen_exits() {
    let mut canvas = Canvas::new();
    let mut session = Session::open(Rules::default(), &mut canvas);
    let control = session.update(&mut canvas, &cancel(), TICK, &mut seeded_rng());
    assert_eq!(control, Control::Exit);
}

// ── Idle → Running ────────────────────────────────────────────────────────────

#[test]
fn confirm_starts_wave_one() {
    let mut canvas = Canvas::new();
    let session = running(&mut canvas, &mut seeded_rng());
    let world = session.world().unwrap();
    assert_eq!(world.wave, 1);
    assert_eq!(world.difficulty, 1);
    assert_eq!(world.score, 0);
    assert_eq!(world.player.hp, 3);
    assert_eq!(world.store.enemies().len(), 3);
    assert!(world.store.bullets().is_empty());

    assert!(!canvas.buttons_visible());
    assert_eq!(canvas.text(TextField::Title), None);
    assert_eq!(canvas.text(TextField::Hp), Some("HP : 3"));
    assert_eq!(canvas.text(TextField::Score), Some("Score : 0"));
    assert_eq!(canvas.text(TextField::Wave), Some("Wave : 1"));
    // player + three enemies
    assert_eq!(canvas.sprite_count(), 4);
}

#[test]
fn start_is_ignored_while_running() {
    let mut canvas = Canvas::new();
    let mut rng = seeded_rng();
    let mut session = running(&mut canvas, &mut rng);
    session.world_mut().unwrap().score = 50;
    session.start(&mut canvas, 1.0, &mut rng);
    assert_eq!(session.world().unwrap().score, 50);
}

#[test]
fn firing_right_after_start_leaves_one_bullet() {
    let mut canvas = Canvas::new();
    let mut rng = seeded_rng();
    let mut session = running(&mut canvas, &mut rng);
    session.update(&mut canvas, &fire(), TICK, &mut rng);

    let world = session.world().unwrap();
    let bullets = world.store.bullets();
    assert_eq!(bullets.len(), 1);
    assert_eq!(bullets[0].pos.y, world.player.pos.y - 20.0 - 12.0);
    assert_eq!(canvas.position(bullets[0].handle).unwrap().y, 548.0);
}

#[test]
fn cancel_while_running_exits() {
    let mut canvas = Canvas::new();
    let mut rng = seeded_rng();
    let mut session = running(&mut canvas, &mut rng);
    let control = session.update(&mut canvas, &cancel(), TICK, &mut rng);
    assert_eq!(control, Control::Exit);
}

#[test]
fn cleared_wave_advances_and_refreshes_hud() {
    let mut canvas = Canvas::new();
    let mut rng = seeded_rng();
    let mut session = running(&mut canvas, &mut rng);
    session.world_mut().unwrap().store.clear(&mut canvas);

    let report = session.step(&mut canvas, &idle(), TICK, &mut rng).unwrap();
    assert!(report.wave_advanced);
    let world = session.world().unwrap();
    assert_eq!(world.wave, 2);
    assert_eq!(world.store.enemies().len(), 4);
    assert_eq!(canvas.text(TextField::Wave), Some("Wave : 2"));
}

#[test]
fn escaped_enemy_updates_hp_text() {
    let mut canvas = Canvas::new();
    let mut rng = seeded_rng();
    let mut session = running(&mut canvas, &mut rng);
    doom_enemy(&mut session, &mut canvas);
    session.update(&mut canvas, &idle(), TICK, &mut rng);
    assert_eq!(session.phase(), Phase::Running);
    assert_eq!(session.world().unwrap().player.hp, 2);
    assert_eq!(canvas.text(TextField::Hp), Some("HP : 2"));
}

// ── Running → GameOver ────────────────────────────────────────────────────────

#[test]
fn last_hp_lost_ends_run_in_same_tick() {
    let mut canvas = Canvas::new();
    let mut rng = seeded_rng();
    let mut session = running(&mut canvas, &mut rng);
    session.world_mut().unwrap().player.hp = 1;
    doom_enemy(&mut session, &mut canvas);

    let report = session.step(&mut canvas, &idle(), TICK, &mut rng).unwrap();
    assert!(report.player_down);
    assert_eq!(session.phase(), Phase::GameOver);
    assert_eq!(session.world().unwrap().player.hp, 0);
    assert_eq!(canvas.text(TextField::Hp), Some("HP : 0"));
    assert_eq!(canvas.text(TextField::Banner), Some(GAME_OVER_BANNER));
    assert_eq!(session.pending_timers(), 1);
}

#[test]
fn game_over_keeps_best_score() {
    let mut canvas = Canvas::new();
    let mut rng = seeded_rng();

    let mut session = running(&mut canvas, &mut rng);
    finish_run(&mut session, &mut canvas, &mut rng, 120, TICK);
    assert_eq!(session.high_score(), 120);

    // Back to the start screen, then a worse run.
    session.update(&mut canvas, &idle(), 3.0, &mut rng);
    session.update(&mut canvas, &confirm(), 3.0 + TICK, &mut rng);
    finish_run(&mut session, &mut canvas, &mut rng, 40, 3.0 + 2.0 * TICK);
    assert_eq!(session.high_score(), 120);

    session.update(&mut canvas, &idle(), 6.0, &mut rng);
    session.update(&mut canvas, &confirm(), 6.0 + TICK, &mut rng);
    finish_run(&mut session, &mut canvas, &mut rng, 300, 6.0 + 2.0 * TICK);
    assert_eq!(session.high_score(), 300);
}

#[test]
fn game_over_ignores_input() {
    let mut canvas = Canvas::new();
    let mut rng = seeded_rng();
    let mut session = running(&mut canvas, &mut rng);
    finish_run(&mut session, &mut canvas, &mut rng, 10, TICK);

    let left = InputState {
        left: true,
        fire: true,
        confirm: true,
        cancel: true,
        ..InputState::default()
    };
    let x_before = session.world().unwrap().player.pos.x;
    let control = session.update(&mut canvas, &left, 2.0 * TICK, &mut rng);
    assert_eq!(control, Control::Continue);
    assert_eq!(session.phase(), Phase::GameOver);
    let world = session.world().unwrap();
    assert_eq!(world.player.pos.x, x_before);
    assert!(world.store.bullets().is_empty());
    assert!(session.step(&mut canvas, &left, 3.0 * TICK, &mut rng).is_none());
}

// ── GameOver → Idle ───────────────────────────────────────────────────────────

#[test]
fn returns_to_start_screen_after_delay() {
    let mut canvas = Canvas::new();
    let mut rng = seeded_rng();
    let mut session = running(&mut canvas, &mut rng);
    finish_run(&mut session, &mut canvas, &mut rng, 90, 1.0);

    session.update(&mut canvas, &idle(), 2.9, &mut rng);
    assert_eq!(session.phase(), Phase::GameOver);

    session.update(&mut canvas, &idle(), 3.0, &mut rng);
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.world().is_none());
    assert_eq!(session.pending_timers(), 0);
    assert_eq!(canvas.sprite_count(), 0);
    assert!(canvas.buttons_visible());
    assert_eq!(canvas.text(TextField::HighScore), Some("High score: 90"));
    assert_eq!(canvas.text(TextField::Banner), None);
}

#[test]
fn new_run_after_game_over_starts_fresh() {
    let mut canvas = Canvas::new();
    let mut rng = seeded_rng();
    let mut session = running(&mut canvas, &mut rng);
    finish_run(&mut session, &mut canvas, &mut rng, 70, TICK);
    session.update(&mut canvas, &idle(), 5.0, &mut rng);
    session.update(&mut canvas, &confirm(), 5.0 + TICK, &mut rng);

    assert_eq!(session.phase(), Phase::Running);
    let world = session.world().unwrap();
    assert_eq!(world.score, 0);
    assert_eq!(world.wave, 1);
    assert_eq!(world.player.hp, 3);
    assert_eq!(world.enemy_speed, 2.0);
    assert_eq!(canvas.text(TextField::Score), Some("Score : 0"));
}

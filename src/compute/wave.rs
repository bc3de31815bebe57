//! Wave Director: wave progression, difficulty and enemy placement.

use rand::Rng;

use crate::compute::World;
use crate::config::Rules;
use crate::entities::{EnemyKind, Position};
use crate::stage::Stage;

/// Moves to the next wave and fills it. Called once the live enemy set is
/// empty. Returns the number of enemies spawned.
pub fn advance(world: &mut World, stage: &mut impl Stage, rules: &Rules, rng: &mut impl Rng, now: f64) -> usize {
    world.wave += 1;
    if rules.raises_difficulty(world.wave) {
        world.difficulty += 1;
        world.enemy_speed += rules.enemy_speed_step;
    }
    populate(world, stage, rules, rng, now)
}

/// Spawns the enemies of the current wave: a lone boss on boss waves,
/// otherwise `wave + 2` regular enemies of random kinds along the top.
///
/// A kind without sprite frames is skipped without affecting the rest of
/// the wave, so fewer enemies than planned may appear.
pub fn populate(world: &mut World, stage: &mut impl Stage, rules: &Rules, rng: &mut impl Rng, now: f64) -> usize {
    let spawned = if rules.is_boss_wave(world.wave) {
        let hp = rules.boss_hp(world.difficulty);
        world
            .store
            .spawn_enemy(stage, EnemyKind::Boss, rules.boss_spawn, hp, now)
            .map_or(0, |_| 1)
    } else {
        let hp = rules.regular_hp(world.difficulty);
        let margin = rules.spawn_margin as i32;
        let max_x = rules.width as i32 - margin;
        let planned = world.wave + 2;
        let mut spawned = 0;
        for _ in 0..planned {
            let x = rng.gen_range(margin..=max_x);
            let kind = EnemyKind::REGULAR[rng.gen_range(0..EnemyKind::REGULAR.len())];
            let at = Position::new(x as f32, rules.spawn_y);
            if world.store.spawn_enemy(stage, kind, at, hp, now).is_some() {
                spawned += 1;
            }
        }
        spawned
    };

    tracing::info!(
        wave = world.wave,
        difficulty = world.difficulty,
        spawned,
        "wave started"
    );
    spawned
}

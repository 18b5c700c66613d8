//! Pool reuse and the activate/deactivate lifecycle

mod common;

use asteroids::entity::AsteroidSize;
use asteroids::pool::{EntityPool, PoolKey};
use asteroids::prelude::*;
use common::{assert_inactive_entities_are_idle, park, running_context};
use rust_engine::foundation::math::Vec2;

fn asteroid_pool() -> EntityPool {
    let config = GameConfig::default();
    let mut pool = EntityPool::new();
    for size in AsteroidSize::ALL {
        pool.register_prototype(FlyingObject::asteroid(config.asteroid(size).unwrap()));
    }
    pool
}

#[test]
fn test_acquiring_past_idle_instances_creates_exactly_one() {
    let key = PoolKey::Asteroid(AsteroidSize::Middle);
    let mut pool = asteroid_pool();

    let first: Vec<_> = (0..3)
        .map(|_| {
            let acquired = pool.acquire(key).unwrap();
            pool.get_mut(acquired.id).unwrap().active = true;
            acquired.id
        })
        .collect();
    for id in &first {
        pool.get_mut(*id).unwrap().active = false;
    }
    let created_before = pool.stats().created;

    let mut reacquired = Vec::new();
    for _ in 0..4 {
        let acquired = pool.acquire(key).unwrap();
        pool.get_mut(acquired.id).unwrap().active = true;
        reacquired.push(acquired);
    }

    assert_eq!(pool.stats().created, created_before + 1);
    assert_eq!(reacquired.iter().filter(|a| a.created).count(), 1);
    assert!(reacquired[..3].iter().all(|a| first.contains(&a.id)));
    assert_eq!(pool.instance_count(key), 4);
    assert_eq!(pool.active_count(key), 4);
}

#[test]
fn test_pools_are_kept_apart_by_size() {
    let mut pool = asteroid_pool();
    let small = pool.acquire(PoolKey::Asteroid(AsteroidSize::Small)).unwrap();
    let big = pool.acquire(PoolKey::Asteroid(AsteroidSize::Big)).unwrap();

    assert_ne!(small.id, big.id);
    assert_eq!(pool.ids(PoolKey::Asteroid(AsteroidSize::Small)), &[small.id]);
    assert_eq!(pool.ids(PoolKey::Asteroid(AsteroidSize::Big)), &[big.id]);
    assert!(pool.ids(PoolKey::Asteroid(AsteroidSize::Middle)).is_empty());
}

#[test]
fn test_deactivation_zeroes_velocity_and_drops_tasks() {
    let (mut ctx, _) = running_context(3);
    let asteroid = ctx
        .spawn_asteroid(AsteroidSize::Big, Some(Vec2::new(100.0, 50.0)), None)
        .unwrap();
    let alien = ctx
        .spawn_alien(Vec2::new(-200.0, 0.0), Vec2::new(1.0, 0.0))
        .unwrap()
        .unwrap();

    assert_eq!(ctx.pending_tasks_for(asteroid), 1);
    assert_eq!(ctx.pending_tasks_for(alien), 2);

    ctx.deactivate(asteroid);
    ctx.deactivate(alien);

    assert_inactive_entities_are_idle(&ctx);
    assert!(!ctx.entity(asteroid).unwrap().active);
    assert!(!ctx.alien_active());
}

#[test]
fn test_reactivation_does_not_inherit_old_tasks() {
    let (mut ctx, _) = running_context(4);
    let alien = ctx
        .spawn_alien(Vec2::new(-200.0, 0.0), Vec2::new(1.0, 0.0))
        .unwrap()
        .unwrap();
    ctx.deactivate(alien);

    let again = ctx
        .spawn_alien(Vec2::new(200.0, 0.0), Vec2::new(-1.0, 0.0))
        .unwrap()
        .unwrap();
    assert_eq!(again, alien);
    assert_eq!(ctx.pending_tasks_for(alien), 2);

    // The first activation's course change falls due at t=5 and must not
    // run twice for the new activation
    park(&mut ctx, alien, Vec2::new(200.0, 0.0));
    ctx.advance_time(5.0);
    let velocity = ctx.entity(alien).unwrap().velocity;
    assert_ne!(velocity, Vec2::zeros());
    assert_eq!(ctx.pending_tasks_for(alien), 2);
}

#[test]
fn test_long_run_keeps_inactive_entities_idle() {
    let mut config = common::config(21);
    config.session.alien_spawn_interval = 4.0;
    let (ctx, _) = common::context(config);
    let mut game = Game::new(ctx);
    game.start().unwrap();

    for tick in 0..1200_u32 {
        let input = PlayerInput {
            thrust: tick % 90 < 20,
            aim: Some(Vec2::new((tick as f32 * 0.05).cos(), (tick as f32 * 0.05).sin()) * 100.0),
            fire: true,
        };
        game.step(&input);
        assert_inactive_entities_are_idle(game.context());

        let ctx = game.context();
        let player = ctx.entity(ctx.player_id()).unwrap().player_state().unwrap();
        assert!(player.life <= player.max_life);
        if ctx.session().phase() == SessionPhase::GameOver {
            break;
        }
    }
}

//! Spawn point selection and spawn rules

mod common;

use asteroids::entity::AsteroidSize;
use asteroids::prelude::*;
use common::{stub_context, StubPhysics};
use rust_engine::foundation::math::{Rect, Vec2};

const HALF_WIDTH: f32 = 640.0;
const HALF_HEIGHT: f32 = 360.0;

fn visible(p: Vec2) -> bool {
    p.x.abs() <= HALF_WIDTH && p.y.abs() <= HALF_HEIGHT
}

/// Viewport probe with a solid wall over the left half of the world
fn walled_probe(p: Vec2) -> Option<ColliderTag> {
    if p.x < 0.0 {
        Some(ColliderTag::Obstacle)
    } else if visible(p) {
        Some(ColliderTag::Viewport)
    } else {
        None
    }
}

#[test]
fn test_outside_points_satisfy_probe() {
    let mut ctx = stub_context(common::config(1), StubPhysics::new(walled_probe));
    for _ in 0..200 {
        let point = ctx.find_valid_spawn_point_outside_viewport();
        assert_eq!(walled_probe(point), None, "rejected point {point:?} returned");
        assert!(ctx.viewport().outside_rect().contains(point));
    }
}

#[test]
fn test_inside_points_satisfy_probe() {
    let mut ctx = stub_context(common::config(2), StubPhysics::new(walled_probe));
    for _ in 0..200 {
        let point = ctx.find_valid_spawn_point_inside_viewport();
        assert_eq!(walled_probe(point), Some(ColliderTag::Viewport));
    }
}

#[test]
fn test_sampling_gives_up_after_retry_limit() {
    let mut config = common::config(3);
    config.session.spawn_retry_limit = 5;
    let physics = StubPhysics::new(|_| Some(ColliderTag::Obstacle));
    let queries = physics.query_counter();
    let mut ctx = stub_context(config, physics);

    let point = ctx.find_valid_spawn_point_outside_viewport();
    assert_eq!(queries.get(), 5);
    assert!(ctx.viewport().outside_rect().contains(point));

    queries.set(0);
    let point = ctx.find_valid_spawn_point_inside_viewport();
    assert_eq!(queries.get(), 5);
    assert!(ctx.viewport().contains(point));
}

#[test]
fn test_inside_points_avoid_obstacles_in_the_world() {
    let obstacle = Rect::from_min_max(Vec2::new(-HALF_WIDTH, -HALF_HEIGHT), Vec2::new(0.0, HALF_HEIGHT));
    let mut ctx = GameContext::builder(common::config(4))
        .obstacle(obstacle)
        .build()
        .unwrap();

    for _ in 0..200 {
        let point = ctx.find_valid_spawn_point_inside_viewport();
        assert!(point.x >= 0.0, "spawned inside the obstacle at {point:?}");
        assert!(ctx.viewport().contains(point));
    }
}

#[test]
fn test_inside_points_avoid_flying_objects() {
    let (mut ctx, _) = common::running_context(5);
    let big = ctx
        .spawn_asteroid(AsteroidSize::Big, Some(Vec2::new(200.0, 100.0)), None)
        .unwrap();
    common::park(&mut ctx, big, Vec2::new(200.0, 100.0));
    ctx.sync_bodies();
    let player = ctx.entity(ctx.player_id()).unwrap().clone();
    let radius = ctx.entity(big).unwrap().radius;

    for _ in 0..300 {
        let point = ctx.find_valid_spawn_point_inside_viewport();
        assert!((point - Vec2::new(200.0, 100.0)).norm() >= radius - 1e-3);
        assert!((point - player.position).norm() >= player.radius - 1e-3);
    }
}

#[test]
fn test_asteroid_without_position_heads_for_player() {
    let mut ctx = stub_context(common::empty_field_config(6), StubPhysics::new(|_| None));
    let player = ctx.player_id();
    ctx.entity_mut(player).unwrap().position = Vec2::new(40.0, -30.0);

    let id = ctx.spawn_asteroid(AsteroidSize::Middle, None, None).unwrap();
    let asteroid = ctx.entity(id).unwrap();

    let expected = (Vec2::new(40.0, -30.0) - asteroid.position).normalize();
    let heading = asteroid.velocity.normalize();
    assert!(heading.dot(&expected) > 0.999);

    let speed = asteroid.velocity.norm();
    let config = ctx.config().asteroid(AsteroidSize::Middle).unwrap();
    assert!(speed >= config.min_speed - 1e-3 && speed <= config.max_speed + 1e-3);
}

#[test]
fn test_asteroid_with_velocity_keeps_direction() {
    let mut ctx = stub_context(common::empty_field_config(7), StubPhysics::new(walled_probe));
    let id = ctx
        .spawn_asteroid(AsteroidSize::Small, None, Some(Vec2::new(0.0, -3.0)))
        .unwrap();

    let asteroid = ctx.entity(id).unwrap();
    assert!(asteroid.velocity.normalize().dot(&Vec2::new(0.0, -1.0)) > 0.999);
    assert!(!visible(asteroid.position));
}

#[test]
fn test_only_one_alien_at_a_time() {
    let (mut ctx, presentation) = common::running_context(8);
    let first = ctx.spawn_alien(Vec2::new(-700.0, 0.0), Vec2::new(1.0, 0.0)).unwrap();
    let second = ctx.spawn_alien(Vec2::new(700.0, 0.0), Vec2::new(-1.0, 0.0)).unwrap();

    assert!(first.is_some());
    assert_eq!(second, None);
    assert_eq!(ctx.pool().active_count(PoolKey::Alien), 1);
    assert_eq!(
        presentation.count(|e| *e == common::Shown::Sound(SoundCue::AlienSpawned)),
        1
    );
}

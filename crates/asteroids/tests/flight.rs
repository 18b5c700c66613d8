//! Movement, input handling, edge wrapping and alien fire through `Game::step`

mod common;

use approx::assert_relative_eq;
use asteroids::entity::AsteroidSize;
use asteroids::prelude::*;
use common::{park, running_context};
use rust_engine::foundation::math::Vec2;

fn game(seed: u64) -> Game {
    let (ctx, _) = running_context(seed);
    Game::new(ctx)
}

fn player(game: &Game) -> &FlyingObject {
    let ctx = game.context();
    ctx.entity(ctx.player_id()).unwrap()
}

#[test]
fn test_player_wraps_to_opposite_edge() {
    let mut game = game(1);
    let ctx = game.context_mut();
    let id = ctx.player_id();
    {
        let object = ctx.entity_mut(id).unwrap();
        object.position = Vec2::new(630.0, 0.0);
        object.velocity = Vec2::new(600.0, 0.0);
    }

    game.step(&PlayerInput::default());
    assert!(player(&game).position.x > 630.0);
    assert!(player(&game).position.x < 640.0);

    game.step(&PlayerInput::default());
    let position = player(&game).position;
    assert!(position.x < -640.0 && position.x > -660.0, "{position:?}");
    assert_relative_eq!(position.y, 0.0);

    game.step(&PlayerInput::default());
    let position = player(&game).position;
    assert!(position.x > -641.0 && position.x < -620.0, "{position:?}");
}

#[test]
fn test_player_just_past_the_edge_still_wraps() {
    let mut game = game(8);
    let ctx = game.context_mut();
    let id = ctx.player_id();
    {
        let object = ctx.entity_mut(id).unwrap();
        object.position = Vec2::new(f32::from_bits(640f32.to_bits() + 1), 0.0);
        object.velocity = Vec2::new(300.0, 0.0);
        object.inside_viewport = true;
    }

    for _ in 0..120 {
        game.step(&PlayerInput::default());
        let position = player(&game).position;
        assert!(position.x.abs() < 650.0, "left the viewport at {position:?}");
    }
    let object = player(&game);
    assert!(object.active && object.inside_viewport);
    assert!(game.context().viewport().contains(object.position));
}

#[test]
fn test_alien_changes_course_on_its_own_timer() {
    let mut game = game(9);
    let ctx = game.context_mut();
    let alien = ctx
        .spawn_alien(Vec2::new(0.0, 200.0), Vec2::new(1.0, 0.0))
        .unwrap()
        .unwrap();
    assert_eq!(ctx.pending_task_count(alien, EntityTask::ChangeVelocityRandomly), 1);
    let interval = ctx.config().alien.velocity_change_interval;
    let max_speed = ctx.config().alien.max_speed;
    let initial = ctx.entity(alien).unwrap().velocity;

    ctx.advance_time(interval - 0.5);
    assert_eq!(ctx.entity(alien).unwrap().velocity, initial);

    ctx.advance_time(1.0);
    let velocity = ctx.entity(alien).unwrap().velocity;
    assert_ne!(velocity, initial);
    // Each component is a factor in [-1, 1] times a speed in range
    assert!(velocity.x.abs() <= max_speed + 1e-3, "{velocity:?}");
    assert!(velocity.y.abs() <= max_speed + 1e-3, "{velocity:?}");
    assert_eq!(ctx.pending_task_count(alien, EntityTask::ChangeVelocityRandomly), 1);

    ctx.deactivate(alien);
    assert_eq!(ctx.pending_tasks_for(alien), 0);
    assert_eq!(ctx.pending_task_count(alien, EntityTask::ChangeVelocityRandomly), 0);
    ctx.advance_time(interval * 2.0);
    assert_eq!(ctx.entity(alien).unwrap().velocity, Vec2::zeros());
}

#[test]
fn test_entering_objects_are_not_wrapped() {
    let mut game = game(2);
    let asteroid = game
        .context_mut()
        .spawn_asteroid(AsteroidSize::Small, Some(Vec2::new(-700.0, 0.0)), Some(Vec2::new(1.0, 0.0)))
        .unwrap();

    for _ in 0..10 {
        game.step(&PlayerInput::default());
    }

    let position = game.context().entity(asteroid).unwrap().position;
    assert!(position.x > -700.0 && position.x < -640.0, "{position:?}");
}

#[test]
fn test_thrust_is_capped_and_decays() {
    let mut game = game(3);
    let thrust = PlayerInput { thrust: true, ..PlayerInput::default() };
    let max_speed = game.context().config().player.max_speed;
    let step_gain = game.context().config().player.thrust * game.context().config().session.fixed_timestep;

    for _ in 0..120 {
        game.step(&thrust);
        let speed = player(&game).velocity.norm();
        assert!(speed <= max_speed + step_gain + 1e-3, "speed {speed}");
    }
    let cruising = player(&game).velocity.norm();
    assert!(cruising > max_speed - step_gain);
    assert!(player(&game).velocity.y > 0.0);
    assert!(player(&game).player_state().unwrap().has_thrust);

    for _ in 0..60 {
        game.step(&PlayerInput::default());
    }
    assert!(player(&game).velocity.norm() < cruising * 0.35);
    assert!(!player(&game).player_state().unwrap().has_thrust);
}

#[test]
fn test_aim_turns_the_ship() {
    let mut game = game(4);
    game.step(&PlayerInput {
        aim: Some(Vec2::new(100.0, 0.0)),
        ..PlayerInput::default()
    });
    assert_relative_eq!(player(&game).rotation, 0.0, epsilon = 1e-5);

    game.step(&PlayerInput {
        aim: Some(Vec2::new(0.0, -50.0)),
        fire: true,
        ..PlayerInput::default()
    });
    let forward = player(&game).forward();
    assert_relative_eq!(forward.y, -1.0, epsilon = 1e-5);

    let ctx = game.context();
    let missiles = ctx.active_ids(PoolKey::Missile(FlyingObjectKind::Player));
    assert_eq!(missiles.len(), 1);
    assert!(ctx.entity(missiles[0]).unwrap().velocity.y < 0.0);
}

#[test]
fn test_weapon_cooldown_limits_fire_rate() {
    let mut game = game(5);
    let fire = PlayerInput { fire: true, ..PlayerInput::default() };
    let mut fired = 0;
    // One second of held fire with a tenth of a second between missiles
    for _ in 0..60 {
        fired += game.step(&fire).missiles_fired;
    }
    assert!((9..=11).contains(&fired), "fired {fired}");
}

#[test]
fn test_alien_shoots_at_player() {
    let mut game = game(6);
    let ctx = game.context_mut();
    let alien = ctx
        .spawn_alien(Vec2::new(300.0, 0.0), Vec2::new(-1.0, 0.0))
        .unwrap()
        .unwrap();
    park(ctx, alien, Vec2::new(300.0, 0.0));

    let mut alien_missiles = 0;
    for _ in 0..150 {
        alien_missiles += game.step(&PlayerInput::default()).missiles_fired;
    }

    let ctx = game.context();
    assert!(alien_missiles >= 1);
    assert_eq!(player(&game).player_state().unwrap().life, 2);
    assert_eq!(ctx.session().score(), 0);
    assert!(ctx.entity(alien).unwrap().active);
}

#[test]
fn test_alien_holds_fire_without_target() {
    let mut game = game(7);
    let ctx = game.context_mut();
    let player_id = ctx.player_id();
    ctx.deactivate(player_id);
    let alien = ctx
        .spawn_alien(Vec2::new(300.0, 0.0), Vec2::new(-1.0, 0.0))
        .unwrap()
        .unwrap();
    park(ctx, alien, Vec2::new(300.0, 0.0));

    let mut fired = 0;
    for _ in 0..120 {
        fired += game.step(&PlayerInput { fire: true, ..PlayerInput::default() }).missiles_fired;
    }
    assert_eq!(fired, 0);
}

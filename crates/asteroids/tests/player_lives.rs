//! Player lives, the indestructible window and game over

mod common;

use asteroids::prelude::*;
use common::{running_context, Shown};
use rust_engine::foundation::math::Vec2;

fn set_life(ctx: &mut GameContext, life: u32) {
    let player = ctx.player_id();
    ctx.entity_mut(player)
        .unwrap()
        .player_state_mut()
        .unwrap()
        .life = life;
}

fn life(ctx: &GameContext) -> u32 {
    ctx.entity(ctx.player_id())
        .unwrap()
        .player_state()
        .unwrap()
        .life
}

#[test]
fn test_last_life_lost_ends_session_once() {
    let (mut ctx, presentation) = running_context(1);
    let player = ctx.player_id();
    ctx.add_score(120);
    set_life(&mut ctx, 1);

    ctx.destroy(player, false);

    assert_eq!(life(&ctx), 0);
    assert!(!ctx.entity(player).unwrap().active);
    assert_eq!(ctx.session().phase(), SessionPhase::GameOver);
    assert_eq!(ctx.session().final_score(), Some(120));
    assert_eq!(ctx.session().game_over_count(), 1);
    assert!(!ctx.session().alien_timer_armed());
    assert_eq!(presentation.game_overs(), 1);
    assert!(presentation.events().contains(&Shown::GameOver(120)));

    ctx.destroy(player, false);
    ctx.on_game_over();
    assert_eq!(ctx.session().game_over_count(), 1);
    assert_eq!(presentation.game_overs(), 1);
}

#[test]
fn test_hit_grants_indestructible_window() {
    let (mut ctx, presentation) = running_context(2);
    let player = ctx.player_id();
    ctx.advance_time(2.0);
    {
        let object = ctx.entity_mut(player).unwrap();
        object.position = Vec2::new(150.0, -40.0);
        object.velocity = Vec2::new(30.0, 30.0);
    }
    set_life(&mut ctx, 2);

    ctx.destroy(player, false);

    let object = ctx.entity(player).unwrap();
    assert!(object.active);
    assert_eq!(object.position, Vec2::zeros());
    assert_eq!(object.velocity, Vec2::zeros());
    assert_eq!(life(&ctx), 1);
    assert!(ctx.is_indestructible(player));
    let until = object.player_state().unwrap().indestructible_until;
    assert!((until - 5.0).abs() < 1e-6);
    assert_eq!(ctx.session().phase(), SessionPhase::Running);
    assert!(presentation.events().contains(&Shown::Indestructible(true)));

    // Hits inside the window do nothing
    ctx.destroy(player, false);
    assert_eq!(life(&ctx), 1);
    assert_eq!(presentation.game_overs(), 0);
}

#[test]
fn test_indestructible_window_expires() {
    let (mut ctx, presentation) = running_context(3);
    let player = ctx.player_id();
    set_life(&mut ctx, 2);
    ctx.destroy(player, false);
    assert!(ctx.is_indestructible(player));

    ctx.advance_time(1.5);
    assert!(ctx.is_indestructible(player));
    ctx.advance_time(1.5);
    assert!(!ctx.is_indestructible(player));
    assert_eq!(
        presentation.events().last(),
        Some(&Shown::Indestructible(false))
    );

    ctx.destroy(player, false);
    assert_eq!(life(&ctx), 0);
    assert_eq!(ctx.session().phase(), SessionPhase::GameOver);
    assert_eq!(presentation.game_overs(), 1);
}

#[test]
fn test_score_frozen_after_game_over() {
    let (mut ctx, _) = running_context(4);
    let player = ctx.player_id();
    ctx.add_score(50);
    set_life(&mut ctx, 1);
    ctx.destroy(player, false);

    ctx.add_score(500);
    assert_eq!(ctx.session().score(), 50);
    assert_eq!(ctx.session().final_score(), Some(50));
}

#[test]
fn test_game_over_through_the_loop() {
    let (ctx, presentation) = running_context(5);
    let mut game = Game::new(ctx);
    set_life(game.context_mut(), 1);
    let ctx = game.context_mut();
    let asteroid = ctx
        .spawn_asteroid(asteroids::entity::AsteroidSize::Big, Some(Vec2::new(0.0, 30.0)), None)
        .unwrap();
    common::park(ctx, asteroid, Vec2::new(0.0, 30.0));

    for _ in 0..5 {
        game.step(&PlayerInput::default());
    }

    let ctx = game.context();
    assert_eq!(ctx.session().phase(), SessionPhase::GameOver);
    assert_eq!(ctx.session().game_over_count(), 1);
    assert_eq!(presentation.game_overs(), 1);
    assert!(!ctx.entity(ctx.player_id()).unwrap().active);
    // The big asteroid broke up on the ship
    assert_eq!(ctx.active_asteroid_count(), 2);
}

//! Fixed timestep simulation tick
//!
//! Advances the world deterministically: physics, scoring, death, level
//! extension, effects and the memory sweep, in that order.

use std::f32::consts::PI;

use super::collision::lands_on;
use super::effects::SpawnContext;
use super::level;
use super::state::{GameEvent, GamePhase, GameState, Player};
use super::sweep::sweep;
use crate::consts::*;
use crate::highscores;
use crate::settings::Knob;

/// Why the player is being killed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Overlap with the spike at this index
    Spike(usize),
    /// Fell below the world
    Fall,
    /// Developer console `/die`
    Console,
}

/// Rebuild the world for a new run and leave the state in the menu
pub fn reset_world(state: &mut GameState) {
    let horiz_multiplier = state.player.horiz_multiplier;
    state.phase = GamePhase::Menu;
    state.tick_count = 0;
    state.time = 0.0;
    state.score = 0.0;
    state.player = Player::new(state.viewport);
    state.player.horiz_multiplier = horiz_multiplier;
    state.colors = Default::default();
    state.effects.clear();
    level::build_initial(state);
    state.camera.snap_to(&state.player, state.viewport);
    state
        .effects
        .reset_parallax(state.viewport, &state.quality, &mut state.rng);
    log::debug!(
        "world reset: {} platforms, {} spikes, {} gems",
        state.platforms.len(),
        state.spikes.len(),
        state.gems.len()
    );
}

/// Reset everything and arm the simulation
pub fn start_run(state: &mut GameState) {
    reset_world(state);
    state.phase = GamePhase::Running;
    state.events.push(GameEvent::RunStarted);
    state.events.push(GameEvent::ScoreChanged(0.0));
    log::info!("Run started (best {})", state.best_score);
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState) {
    match state.phase {
        GamePhase::Menu | GamePhase::GameOver => return,
        GamePhase::Dying { ticks_left } => {
            state.tick_count += 1;
            state.time += SIM_DT;
            advance_effects(state);
            sweep(state);
            if ticks_left <= 1 {
                finish_run(state);
            } else {
                state.phase = GamePhase::Dying {
                    ticks_left: ticks_left - 1,
                };
            }
            return;
        }
        GamePhase::Running => {}
    }

    state.tick_count += 1;
    state.time += SIM_DT;

    state.player.speed += PLAYER_ACCELERATION;
    state.colors.advance();
    let pulse = 0.1 * state.quality.get(Knob::PlatformPulse);
    if pulse > 0.0 {
        for platform in &mut state.platforms {
            platform.pulse_phase += pulse;
        }
    }

    integrate_player(state);
    resolve_landing(state);
    score_platforms(state);

    if state.player.pos.y > state.viewport.height + FALL_DEATH_MARGIN {
        try_die(state, DeathCause::Fall);
    }

    check_spikes(state);
    collect_gems(state);

    level::extend(state);

    if state.player.visible {
        let ctx = SpawnContext::of(state);
        let trail = state.quality.trail;
        state
            .effects
            .ambient(&ctx, trail, &state.quality, &mut state.rng);
    }
    advance_effects(state);
    sweep(state);
}

fn integrate_player(state: &mut GameState) {
    let float = state.cheats.float;
    let p = &mut state.player;
    p.pos.y += p.vy * p.vert_multiplier;
    if float && p.vy > 0.0 {
        p.vy *= 0.5;
    }
    p.vy += GRAVITY * p.vert_multiplier;
    p.pos.x += p.speed * p.horiz_multiplier;
}

fn resolve_landing(state: &mut GameState) {
    let p = &mut state.player;
    p.grounded = false;
    let body = p.bounds();
    let mut incoming = None;
    for platform in &state.platforms {
        if lands_on(&body, p.vy, &platform.bounds()) {
            incoming = Some(p.vy);
            p.pos.y = platform.pos.y - p.height;
            p.vy = 0.0;
            p.grounded = true;
            p.jumps_left = MAX_JUMPS;
        }
    }

    if let Some(incoming_vy) = incoming {
        let ctx = SpawnContext::of(state);
        state
            .effects
            .on_land(&ctx, incoming_vy, &state.quality, &mut state.rng);
    }
}

fn score_platforms(state: &mut GameState) {
    let lead = state.player.pos.x + state.player.width;
    let mut cleared = 0;
    for platform in &mut state.platforms {
        if !platform.passed && lead > platform.right() {
            platform.passed = true;
            platform.pulse_phase += PI;
            cleared += 1;
        }
    }
    state.add_score(cleared as f64 * PLATFORM_CLEAR_SCORE);
}

fn check_spikes(state: &mut GameState) {
    let hitbox = state.player.hitbox();
    if let Some(index) = state
        .spikes
        .iter()
        .position(|s| s.hit && hitbox.overlaps(&s.bounds()))
    {
        try_die(state, DeathCause::Spike(index));
    }

    if !state.player.visible {
        return;
    }
    let lead = state.player.pos.x + state.player.width;
    let mut cleared = 0;
    for spike in &mut state.spikes {
        if !spike.passed && lead > spike.right() {
            spike.passed = true;
            cleared += 1;
        }
    }
    state.add_score(cleared as f64 * SPIKE_CLEAR_SCORE);
}

fn collect_gems(state: &mut GameState) {
    if !state.player.visible {
        return;
    }
    let bounds = state.player.bounds();
    for i in 0..state.gems.len() {
        let gem = &mut state.gems[i];
        if gem.collected || !bounds.overlaps(&gem.bounds()) {
            continue;
        }
        gem.collected = true;
        let center = gem.center();
        state.add_score(GEM_SCORE);
        let ctx = SpawnContext::of(state);
        state
            .effects
            .on_gem(&ctx, center, &state.quality, &mut state.rng);
        log::debug!("gem collected at ({:.0}, {:.0})", center.x, center.y);
    }
}

fn advance_effects(state: &mut GameState) {
    let ctx = SpawnContext::of(state);
    state.effects.tick(&ctx);
    state.effects.settle();
}

fn finish_run(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::GameOver {
        score: state.score,
        best: state.best_score,
    });
    log::info!("Game over: score {:.0}, best {}", state.score, state.best_score);
}

/// Apply a jump. Returns false when rejected (dead, not running, or out of
/// jumps).
pub fn jump(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Running || !state.player.visible {
        return false;
    }
    let infinite = state.cheats.infinite_jump;
    let p = &mut state.player;
    if !infinite && p.jumps_left == 0 {
        return false;
    }
    let first = p.jumps_left == MAX_JUMPS;
    p.vy = JUMP_SPEED;
    if !infinite {
        p.jumps_left -= 1;
    }

    let ctx = SpawnContext::of(state);
    state
        .effects
        .on_jump(&ctx, first, &state.quality, &mut state.rng);
    true
}

/// Kill the player if the cause allows it. Returns true when the player died.
///
/// Invincibility blocks every cause except the console. Spikes only kill a
/// player who is grounded or falling.
pub fn try_die(state: &mut GameState, cause: DeathCause) -> bool {
    if state.phase != GamePhase::Running || !state.player.visible {
        return false;
    }
    if state.cheats.invincible && cause != DeathCause::Console {
        return false;
    }
    if let DeathCause::Spike(index) = cause {
        let p = &state.player;
        if !(p.grounded || p.vy > 0.0) {
            return false;
        }
        if let Some(spike) = state.spikes.get_mut(index) {
            spike.hit = false;
        }
    }

    let ctx = SpawnContext::of(state);
    state.player.visible = false;
    state
        .effects
        .on_death(&ctx, &state.quality, &mut state.rng);

    if let Some(best) = highscores::beats(state.score, state.best_score) {
        state.best_score = best;
        state.events.push(GameEvent::NewBestScore(best));
    }
    state.events.push(GameEvent::Died);
    state.phase = GamePhase::Dying {
        ticks_left: DEATH_DELAY_TICKS,
    };
    log::info!("Player died ({cause:?}) with score {:.0}", state.score);
    true
}

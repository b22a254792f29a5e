//! Per-frame simulation step
//!
//! One call advances the arcade by one animation frame. Work happens in a
//! fixed order because later steps read what earlier ones wrote:
//! flash, player, score, difficulty, entity motion, collisions, hazard
//! spawn, shooting.

use glam::Vec2;
use rand::Rng;

use super::collision::circle_rect_overlap;
use super::flash::{FlashSequence, FlashStep};
use super::state::{DeathMotion, GameEvent, GamePhase, GameState, PlayerLife};

/// Advance the game state by one frame at clock reading `now_ms`
pub fn tick(state: &mut GameState, now_ms: f64) {
    update_flash(state);
    update_player(state, now_ms);

    if !state.is_running() {
        return;
    }

    let elapsed_ms = (now_ms - state.start_ms).max(0.0);
    state.score = (elapsed_ms / 1000.0).floor() as u64;
    state.spawn_rate = state.tuning.spawn_rate_at(state.score);

    update_projectiles(state);
    update_hazards(state);
    update_particles(state);

    resolve_player_hits(state);
    if !state.is_running() {
        // Last life lost this frame
        return;
    }
    resolve_projectile_hits(state);

    if elapsed_ms >= state.tuning.hazard_grace_ms && state.rng.random::<f32>() < state.spawn_rate {
        state.spawn_hazard();
    }

    try_shoot(state, now_ms);
}

fn update_flash(state: &mut GameState) {
    let step = match &mut state.phase {
        GamePhase::Running { flash: Some(flash) } => flash.advance(&state.tuning),
        GamePhase::Dying { flash } => flash.advance(&state.tuning),
        _ => return,
    };

    match step {
        FlashStep::PulseStarted => state.events.push(GameEvent::Flash),
        FlashStep::Finished if matches!(state.phase, GamePhase::Dying { .. }) => {
            state.phase = GamePhase::GameOver {
                final_score: state.score,
            };
            state.events.push(GameEvent::GameOver { score: state.score });
            log::info!("Game over, final score {}", state.score);
        }
        FlashStep::Finished => state.phase = GamePhase::Running { flash: None },
        FlashStep::Pulsing | FlashStep::Gap => {}
    }
}

fn update_player(state: &mut GameState, now_ms: f64) {
    let running = state.is_running();
    let tuning = &state.tuning;
    let surface = state.surface;
    let player = &mut state.player;

    match player.life {
        PlayerLife::Gone => {}
        PlayerLife::Dying(mut motion) => {
            motion.vel.y += tuning.death_gravity;
            player.pos += motion.vel;
            motion.rotation += motion.rotation_speed;

            let floor = surface.y - player.size.y;
            if player.pos.y >= floor && motion.bounces < tuning.death_max_bounces {
                player.pos.y = floor;
                motion.vel.y *= -tuning.death_bounce_restitution;
                motion.bounces += 1;
                motion.vel.x += (state.rng.random::<f32>() - 0.5) * 2.0;
            }
            if motion.bounces >= tuning.death_max_bounces {
                // Out of bounces: drop straight through the floor
                motion.vel.y = motion.vel.y.abs();
                motion.vel.x = 0.0;
            }

            if player.pos.y > surface.y + tuning.death_fade_depth {
                player.opacity = (player.opacity - tuning.death_fade_step).max(0.0);
            }
            player.life = if player.opacity <= 0.0 {
                PlayerLife::Gone
            } else {
                PlayerLife::Dying(motion)
            };
        }
        PlayerLife::Alive => {
            if !running {
                return;
            }
            let elapsed = now_ms - state.start_ms;
            player.opacity = if elapsed < tuning.player_fade_in_ms {
                (elapsed / tuning.player_fade_in_ms).clamp(0.0, 1.0) as f32
            } else {
                1.0
            };

            if player.bump_frames > 0 {
                player.bump_frames -= 1;
                let progress = 1.0 - player.bump_frames as f32 / tuning.bump_frames.max(1) as f32;
                player.bump_scale = 1.0 + (progress * std::f32::consts::PI).sin() * tuning.bump_amount;
            } else {
                player.bump_scale = 1.0;
            }

            player.pos.x += player.direction * player.speed;
            let max_x = surface.x - player.size.x;
            if player.pos.x <= 0.0 || player.pos.x >= max_x {
                player.direction = -player.direction;
                player.pos.x = player.pos.x.min(max_x).max(0.0);
            }

            if state.rng.random::<f64>() < tuning.direction_flip_chance {
                player.direction = -player.direction;
            }
        }
    }
}

fn update_projectiles(state: &mut GameState) {
    let surface = state.surface;
    for projectile in &mut state.projectiles {
        projectile.pos += projectile.vel;
        projectile.rotation += projectile.rotation_speed;
    }
    state.projectiles.retain(|p| {
        p.pos.x >= 0.0 && p.pos.x <= surface.x && p.pos.y >= 0.0 && p.pos.y <= surface.y
    });
}

fn update_hazards(state: &mut GameState) {
    let bottom = state.surface.y;
    for hazard in &mut state.hazards {
        hazard.pos.y += hazard.speed;
        hazard.rotation += hazard.rotation_speed;
    }
    state.hazards.retain(|h| h.pos.y <= bottom);
}

fn update_particles(state: &mut GameState) {
    for particle in &mut state.particles {
        particle.pos += particle.vel;
        particle.life = particle.life.saturating_sub(1);
    }
    state.particles.retain(|p| p.life > 0);
}

/// Hazards landing on the player cost a life each
fn resolve_player_hits(state: &mut GameState) {
    if !state.player.is_alive() {
        return;
    }
    let bounds = state.player.bounds();

    let mut i = state.hazards.len();
    while i > 0 {
        i -= 1;
        let hazard = &state.hazards[i];
        if !circle_rect_overlap(hazard.pos, hazard.radius, &bounds) {
            continue;
        }

        let hazard = state.hazards.remove(i);
        state.lives = state.lives.saturating_sub(1);
        state.spawn_particles(hazard.pos, hazard.tier);
        state.events.push(GameEvent::PlayerHit {
            lives_left: state.lives,
        });
        state.events.push(GameEvent::Flash);
        log::debug!("Player hit, {} lives left", state.lives);

        if state.lives == 0 {
            start_death(state);
            return;
        }
        state.phase = GamePhase::Running {
            flash: Some(FlashSequence::single()),
        };
    }
}

/// Switch the player to ballistic motion and play the terminal flash
fn start_death(state: &mut GameState) {
    let vel = Vec2::new(
        (state.rng.random::<f32>() - 0.5) * 4.0,
        -state.tuning.death_launch_speed,
    );
    let rotation_speed = (state.rng.random::<f32>() - 0.5) * 0.2;
    state.player.life = PlayerLife::Dying(DeathMotion {
        vel,
        rotation: 0.0,
        rotation_speed,
        bounces: 0,
    });
    state.player.bump_scale = 1.0;
    state.shoot.held = false;
    state.phase = GamePhase::Dying {
        flash: FlashSequence::repeated(state.tuning.terminal_flashes),
    };
    log::info!("Out of lives at score {}", state.score);
}

/// Each projectile damages at most one hazard and is consumed by it
fn resolve_projectile_hits(state: &mut GameState) {
    let mut i = state.projectiles.len();
    while i > 0 {
        i -= 1;
        let bounds = state.projectiles[i].bounds();
        let Some(j) = state
            .hazards
            .iter()
            .rposition(|h| circle_rect_overlap(h.pos, h.radius, &bounds))
        else {
            continue;
        };

        state.projectiles.remove(i);
        let destroyed = state.hazards[j].take_hit(&state.tuning);
        let (at, tier) = (state.hazards[j].pos, state.hazards[j].tier);
        state.spawn_particles(at, tier);
        if destroyed {
            state.hazards.remove(j);
        }
        state.events.push(GameEvent::HazardHit { destroyed });
    }
}

/// At most one throw per press, and never faster than the minimum interval
fn try_shoot(state: &mut GameState, now_ms: f64) {
    let shoot = &state.shoot;
    if !shoot.held || shoot.fired_this_press || !state.player.is_alive() {
        return;
    }
    if let Some(last) = shoot.last_shot_ms {
        if now_ms - last < state.tuning.min_shot_interval_ms {
            return;
        }
    }

    state.player.bump(&state.tuning);
    state.spawn_projectile();
    state.shoot.last_shot_ms = Some(now_ms);
    state.shoot.fired_this_press = true;
    state.events.push(GameEvent::Shot);
}

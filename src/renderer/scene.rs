//! Scene building: game state to draw list
//!
//! Painter's order: background, player, projectiles, hazards, particles,
//! crosshair, flash overlay.

use glam::Vec2;

use super::colors;
use crate::sim::{GameState, PlayerLife};

/// Particle squares are this many pixels on a side
const PARTICLE_SIZE: f32 = 4.0;
/// Half-length of each crosshair arm
const CROSSHAIR_ARM: f32 = 10.0;
const CROSSHAIR_LINE_WIDTH: f32 = 2.0;

/// Bitmaps the scene may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Player,
    Projectile,
}

/// Which sprites have finished decoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetStatus {
    pub player_ready: bool,
    pub projectile_ready: bool,
}

impl AssetStatus {
    pub fn all_ready() -> Self {
        Self {
            player_ready: true,
            projectile_ready: true,
        }
    }

    pub fn is_ready(&self, sprite: Sprite) -> bool {
        match sprite {
            Sprite::Player => self.player_ready,
            Sprite::Projectile => self.projectile_ready,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface
    Clear { color: &'static str },
    /// Bitmap centred on `center`, rotated about it
    Sprite {
        sprite: Sprite,
        center: Vec2,
        size: Vec2,
        rotation: f32,
        alpha: f32,
    },
    /// Stand-in box for a sprite that has not decoded yet
    Placeholder {
        color: &'static str,
        center: Vec2,
        size: Vec2,
        rotation: f32,
        alpha: f32,
    },
    /// Filled disc with a centred text label, rotated about its centre
    Circle {
        center: Vec2,
        radius: f32,
        rotation: f32,
        color: String,
        label: String,
    },
    /// Axis-aligned filled rectangle
    Rect {
        pos: Vec2,
        size: Vec2,
        color: String,
        alpha: f32,
    },
    Crosshair {
        at: Vec2,
        arm: f32,
        line_width: f32,
        color: &'static str,
    },
    /// Translucent fill over the whole surface
    Overlay { color: &'static str, alpha: f32 },
}

/// Build the draw list for one frame
pub fn build_scene(state: &GameState, assets: AssetStatus) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(
        4 + state.projectiles.len() + state.hazards.len() + state.particles.len(),
    );
    commands.push(DrawCommand::Clear {
        color: colors::BACKGROUND,
    });

    let player = &state.player;
    if player.life != PlayerLife::Gone {
        let rotation = match player.life {
            PlayerLife::Dying(motion) => motion.rotation,
            _ => 0.0,
        };
        commands.push(sprite_or_placeholder(
            Sprite::Player,
            assets,
            player.pos + player.size / 2.0,
            player.size * player.bump_scale,
            rotation,
            player.opacity,
        ));
    }

    for projectile in &state.projectiles {
        commands.push(sprite_or_placeholder(
            Sprite::Projectile,
            assets,
            projectile.pos + projectile.size / 2.0,
            projectile.size,
            projectile.rotation,
            1.0,
        ));
    }

    for hazard in &state.hazards {
        let (color, label) = state
            .tuning
            .hazard_tiers
            .get(hazard.tier)
            .map(|tier| (tier.color.clone(), tier.label.clone()))
            .unwrap_or_else(|| (colors::INK.to_string(), String::new()));
        commands.push(DrawCommand::Circle {
            center: hazard.pos,
            radius: hazard.radius,
            rotation: hazard.rotation,
            color,
            label,
        });
    }

    let life = state.tuning.particle_life.max(1) as f32;
    for particle in &state.particles {
        let color = state
            .tuning
            .hazard_tiers
            .get(particle.tier)
            .map(|tier| tier.color.clone())
            .unwrap_or_else(|| colors::INK.to_string());
        commands.push(DrawCommand::Rect {
            pos: particle.pos,
            size: Vec2::splat(PARTICLE_SIZE),
            color,
            alpha: particle.life as f32 / life,
        });
    }

    if state.shoot.held && player.is_alive() {
        commands.push(DrawCommand::Crosshair {
            at: state.shoot.aim_point,
            arm: CROSSHAIR_ARM,
            line_width: CROSSHAIR_LINE_WIDTH,
            color: colors::INK,
        });
    }

    if let Some(flash) = state.flash() {
        let alpha = flash.alpha(&state.tuning);
        if alpha > 0.0 {
            commands.push(DrawCommand::Overlay {
                color: colors::FLASH,
                alpha,
            });
        }
    }

    commands
}

fn sprite_or_placeholder(
    sprite: Sprite,
    assets: AssetStatus,
    center: Vec2,
    size: Vec2,
    rotation: f32,
    alpha: f32,
) -> DrawCommand {
    if assets.is_ready(sprite) {
        return DrawCommand::Sprite {
            sprite,
            center,
            size,
            rotation,
            alpha,
        };
    }
    let color = match sprite {
        Sprite::Player => colors::INK,
        Sprite::Projectile => colors::PROJECTILE_PLACEHOLDER,
    };
    DrawCommand::Placeholder {
        color,
        center,
        size,
        rotation,
        alpha,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick;
    use crate::tuning::Tuning;

    fn running() -> GameState {
        let mut state = GameState::new(3, Tuning::default(), Vec2::new(800.0, 600.0));
        state.begin_running(0.0);
        state
    }

    #[test]
    fn test_background_first() {
        let scene = build_scene(&running(), AssetStatus::all_ready());
        assert_eq!(
            scene[0],
            DrawCommand::Clear {
                color: colors::BACKGROUND
            }
        );
    }

    #[test]
    fn test_placeholders_for_undecoded_sprites() {
        let mut state = running();
        state.press_shoot(Vec2::new(400.0, 0.0));
        tick(&mut state, 16.0);
        assert_eq!(state.projectiles.len(), 1);

        let scene = build_scene(&state, AssetStatus::default());
        let placeholders: Vec<_> = scene
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Placeholder { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(placeholders, vec![colors::INK, colors::PROJECTILE_PLACEHOLDER]);
        assert!(!scene.iter().any(|c| matches!(c, DrawCommand::Sprite { .. })));

        let scene = build_scene(&state, AssetStatus::all_ready());
        assert!(!scene.iter().any(|c| matches!(c, DrawCommand::Placeholder { .. })));
    }

    #[test]
    fn test_partial_asset_readiness() {
        let state = running();
        let assets = AssetStatus {
            player_ready: true,
            projectile_ready: false,
        };
        let scene = build_scene(&state, assets);
        assert!(matches!(
            scene[1],
            DrawCommand::Sprite {
                sprite: Sprite::Player,
                ..
            }
        ));
    }

    #[test]
    fn test_player_bump_scales_about_center() {
        let mut state = running();
        state.player.bump_scale = 1.05;
        let center = state.player.pos + state.player.size / 2.0;
        let scene = build_scene(&state, AssetStatus::all_ready());
        let DrawCommand::Sprite {
            center: drawn_center,
            size,
            ..
        } = &scene[1]
        else {
            panic!("expected player sprite");
        };
        assert_eq!(*drawn_center, center);
        assert!((size.x - 84.0).abs() < 1e-4);
    }

    #[test]
    fn test_hazard_uses_tier_color_and_label() {
        let mut state = running();
        state.spawn_hazard();
        let tier = state.tuning.hazard_tiers[state.hazards[0].tier].clone();
        let scene = build_scene(&state, AssetStatus::all_ready());
        let circle = scene
            .iter()
            .find(|c| matches!(c, DrawCommand::Circle { .. }))
            .expect("hazard drawn");
        let DrawCommand::Circle { color, label, .. } = circle else {
            unreachable!()
        };
        assert_eq!(*color, tier.color);
        assert_eq!(*label, tier.label);
    }

    #[test]
    fn test_particle_alpha_fades_with_life() {
        let mut state = running();
        state.spawn_particles(Vec2::new(10.0, 10.0), 0);
        state.particles[0].life = 15;
        let scene = build_scene(&state, AssetStatus::all_ready());
        let alphas: Vec<f32> = scene
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { alpha, .. } => Some(*alpha),
                _ => None,
            })
            .collect();
        assert_eq!(alphas.len(), 8);
        assert!((alphas[0] - 0.5).abs() < 1e-6);
        assert!((alphas[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_crosshair_only_while_held() {
        let mut state = running();
        let scene = build_scene(&state, AssetStatus::all_ready());
        assert!(!scene.iter().any(|c| matches!(c, DrawCommand::Crosshair { .. })));

        state.press_shoot(Vec2::new(200.0, 100.0));
        let scene = build_scene(&state, AssetStatus::all_ready());
        assert!(scene.iter().any(|c| matches!(
            c,
            DrawCommand::Crosshair { at, .. } if *at == Vec2::new(200.0, 100.0)
        )));
    }

    #[test]
    fn test_flash_overlay_last() {
        let mut state = running();
        state.phase = crate::sim::GamePhase::Running {
            flash: Some(crate::sim::FlashSequence::single()),
        };
        tick(&mut state, 16.0);
        let scene = build_scene(&state, AssetStatus::all_ready());
        assert!(matches!(
            scene.last(),
            Some(DrawCommand::Overlay { alpha, .. }) if *alpha > 0.0
        ));
    }

    #[test]
    fn test_gone_player_not_drawn() {
        let mut state = running();
        state.player.life = PlayerLife::Gone;
        let scene = build_scene(&state, AssetStatus::default());
        assert_eq!(scene.len(), 1);
    }
}

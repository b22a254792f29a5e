//! Score and lives readout shown over the canvas

use crate::sim::{GamePhase, GameState};

/// What the DOM HUD should display after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudView {
    pub score: u64,
    pub lives: u32,
    pub max_lives: u32,
}

impl HudView {
    /// HUD values once play has begun. Dying and GameOver still report, so the
    /// frame that takes the last life shows an empty lives row.
    pub fn of(state: &GameState) -> Option<Self> {
        match state.phase {
            GamePhase::Running { .. } | GamePhase::Dying { .. } | GamePhase::GameOver { .. } => {
                Some(Self {
                    score: state.score,
                    lives: state.lives,
                    max_lives: state.tuning.max_lives,
                })
            }
            GamePhase::Idle | GamePhase::Countdown { .. } => None,
        }
    }

    /// Whether the life icon at `index` is shown as lost
    pub fn is_life_lost(&self, index: u32) -> bool {
        index >= self.lives
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Hazard, tick};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn running() -> GameState {
        let tuning = Tuning {
            hazard_grace_ms: f64::MAX,
            ..Default::default()
        };
        let mut state = GameState::new(3, tuning, Vec2::new(800.0, 600.0));
        state.begin_running(0.0);
        state
    }

    #[test]
    fn test_no_hud_before_play() {
        let mut state = GameState::new(3, Tuning::default(), Vec2::new(800.0, 600.0));
        assert_eq!(HudView::of(&state), None);
        state.start_countdown();
        assert_eq!(HudView::of(&state), None);
    }

    #[test]
    fn test_lethal_tick_shows_zero_lives() {
        let mut state = running();
        state.lives = 1;
        state.hazards.push(Hazard {
            pos: state.player.bounds().center(),
            speed: 0.0,
            radius: 20.0,
            original_radius: 20.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            tier: 0,
            hits_required: 1,
            hits_taken: 0,
        });

        tick(&mut state, 3000.0);
        assert!(!state.is_running());

        let hud = HudView::of(&state).unwrap();
        assert_eq!(hud.lives, 0);
        assert_eq!(hud.score, 3);
        assert!((0..hud.max_lives).all(|i| hud.is_life_lost(i)));
    }

    #[test]
    fn test_lost_icons_follow_lives() {
        let mut state = running();
        state.lives = 3;
        let hud = HudView::of(&state).unwrap();
        assert!(!hud.is_life_lost(2));
        assert!(hud.is_life_lost(3));
        assert!(hud.is_life_lost(4));

        state.halt();
        assert_eq!(HudView::of(&state), None);
    }
}

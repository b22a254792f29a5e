//! Game state and core simulation types
//!
//! `GameState` is the whole simulation context for one arcade instance. It is
//! owned by whoever drives it (a `Session` in the browser, tests directly) and
//! passed explicitly to `tick` and the renderer.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, aim_direction};
use super::flash::FlashSequence;
use crate::tuning::Tuning;

/// Lifecycle of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing scheduled, nothing drawn
    Idle,
    /// Counting down before play; `remaining == 0` is the "go" beat
    Countdown { remaining: u8 },
    /// Active gameplay, optionally under a hit flash
    Running { flash: Option<FlashSequence> },
    /// Lives ran out: the player is falling and the terminal flash is playing
    Dying { flash: FlashSequence },
    /// Terminal flash finished; the score is final
    GameOver { final_score: u64 },
}

/// Something the host should react to (sound, DOM updates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    CountdownStarted,
    CountdownTick { remaining: u8 },
    Go,
    /// A projectile was thrown
    Shot,
    /// A projectile hit a hazard
    HazardHit { destroyed: bool },
    /// A hazard hit the player
    PlayerHit { lives_left: u32 },
    /// A flash pulse started
    Flash,
    GameOver { score: u64 },
}

/// Ballistic state of the player after the last life is lost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeathMotion {
    pub vel: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub bounces: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerLife {
    Alive,
    Dying(DeathMotion),
    /// Fell off screen and faded out
    Gone,
}

/// The toaster patrolling the bottom of the surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// +1 right, -1 left
    pub direction: f32,
    pub speed: f32,
    pub opacity: f32,
    pub bump_scale: f32,
    /// Frames left in the current bump
    pub bump_frames: u32,
    pub life: PlayerLife,
}

impl Player {
    /// A fresh, invisible player centred near the bottom of the surface
    pub fn spawn(surface: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos: Self::home_position(surface, tuning),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            direction: 1.0,
            speed: tuning.player_speed,
            opacity: 0.0,
            bump_scale: 1.0,
            bump_frames: 0,
            life: PlayerLife::Alive,
        }
    }

    pub fn home_position(surface: Vec2, tuning: &Tuning) -> Vec2 {
        Vec2::new(surface.x / 2.0, surface.y - tuning.player_bottom_offset)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.life, PlayerLife::Alive)
    }

    pub fn is_dying(&self) -> bool {
        matches!(self.life, PlayerLife::Dying(_))
    }

    /// Start the squash-and-stretch bump played on each throw
    pub fn bump(&mut self, tuning: &Tuning) {
        self.bump_frames = tuning.bump_frames;
    }
}

/// A thrown toast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
}

impl Projectile {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// A falling "rain ball"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    /// Centre
    pub pos: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub original_radius: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Index into `Tuning::hazard_tiers`
    pub tier: usize,
    pub hits_required: u32,
    pub hits_taken: u32,
}

impl Hazard {
    /// Register one projectile hit. Returns true when the hazard is destroyed;
    /// otherwise its radius shrinks to show the remaining health.
    pub fn take_hit(&mut self, tuning: &Tuning) -> bool {
        self.hits_taken += 1;
        if self.hits_taken >= self.hits_required {
            return true;
        }
        let reduction = self.original_radius * tuning.hazard_shrink_per_hit;
        let floor = self.original_radius * tuning.hazard_min_radius_ratio;
        self.radius = (self.original_radius - self.hits_taken as f32 * reduction).max(floor);
        false
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Hazard tier whose color tints the particle
    pub tier: usize,
    /// Remaining frames
    pub life: u32,
}

/// Continuous shoot action and its rate limiter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShootControl {
    /// Pointer/touch is held down
    pub held: bool,
    /// A projectile was already thrown for the current press
    pub fired_this_press: bool,
    pub last_shot_ms: Option<f64>,
    /// Latest pointer position in surface pixels
    pub aim_point: Vec2,
    /// Unit throw direction computed when the press began
    pub direction: Vec2,
}

/// Complete game state (deterministic given seed, inputs and clock readings)
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub seed: u64,
    pub rng: Pcg32,
    /// Drawing surface size in pixels
    pub surface: Vec2,
    pub phase: GamePhase,
    pub lives: u32,
    /// Whole seconds survived
    pub score: u64,
    /// Clock reading when Running began
    pub start_ms: f64,
    /// Current hazard spawn probability per tick
    pub spawn_rate: f32,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub hazards: Vec<Hazard>,
    pub particles: Vec<Particle>,
    pub shoot: ShootControl,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning, surface: Vec2) -> Self {
        let tuning = tuning.validated();
        let player = Player::spawn(surface, &tuning);
        Self {
            lives: tuning.max_lives,
            spawn_rate: tuning.base_spawn_rate,
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            surface,
            phase: GamePhase::Idle,
            score: 0,
            start_ms: 0.0,
            player,
            projectiles: Vec::new(),
            hazards: Vec::new(),
            particles: Vec::new(),
            shoot: ShootControl::default(),
            events: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Running { .. })
    }

    /// The active flash, if any
    pub fn flash(&self) -> Option<&FlashSequence> {
        match &self.phase {
            GamePhase::Running { flash } => flash.as_ref(),
            GamePhase::Dying { flash } => Some(flash),
            _ => None,
        }
    }

    /// Whether another animation frame is needed.
    ///
    /// The loop keeps going while the session runs, while a flash plays, or
    /// while the player is still mid death-fall, and stops otherwise.
    pub fn wants_frame(&self) -> bool {
        match self.phase {
            GamePhase::Running { .. } | GamePhase::Dying { .. } => true,
            _ => self.player.is_dying(),
        }
    }

    /// Surface was resized; keep the player on screen
    pub fn resize(&mut self, surface: Vec2) {
        self.surface = surface;
        if self.player.is_alive() {
            self.player.pos = Player::home_position(surface, &self.tuning);
        }
    }

    pub fn start_countdown(&mut self) {
        self.phase = GamePhase::Countdown {
            remaining: self.tuning.countdown_ticks,
        };
        self.events.push(GameEvent::CountdownStarted);
    }

    /// One countdown beat elapsed. Returns true once the "go" beat is reached.
    pub fn countdown_tick(&mut self) -> bool {
        let GamePhase::Countdown { remaining } = self.phase else {
            return false;
        };
        let remaining = remaining.saturating_sub(1);
        self.phase = GamePhase::Countdown { remaining };
        self.events.push(GameEvent::CountdownTick { remaining });
        remaining == 0
    }

    /// Countdown finished: reset the session and start play at `now_ms`
    pub fn begin_running(&mut self, now_ms: f64) {
        self.phase = GamePhase::Running { flash: None };
        self.start_ms = now_ms;
        self.score = 0;
        self.lives = self.tuning.max_lives;
        self.spawn_rate = self.tuning.base_spawn_rate;
        self.player = Player::spawn(self.surface, &self.tuning);
        self.clear_entities();
        self.shoot = ShootControl::default();
        self.events.push(GameEvent::Go);
        log::info!("Session running (seed {})", self.seed);
    }

    /// Stop play and drop every transient effect and entity
    pub fn halt(&mut self) {
        self.phase = GamePhase::Idle;
        if self.player.is_dying() {
            self.player.life = PlayerLife::Alive;
        }
        self.shoot.held = false;
        self.clear_entities();
    }

    /// Put the player back at home, alive and transparent (it fades in again)
    pub fn reset_player(&mut self) {
        self.player = Player::spawn(self.surface, &self.tuning);
    }

    pub fn clear_entities(&mut self) {
        self.projectiles.clear();
        self.hazards.clear();
        self.particles.clear();
    }

    pub fn entity_count(&self) -> usize {
        self.projectiles.len() + self.hazards.len() + self.particles.len()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Input ===

    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.shoot.aim_point = pos;
    }

    /// Pointer/touch pressed at `pos`. Only begins a shoot action while running.
    pub fn press_shoot(&mut self, pos: Vec2) {
        self.shoot.aim_point = pos;
        if !self.is_running() {
            return;
        }
        self.shoot.held = true;
        self.shoot.fired_this_press = false;
        self.shoot.direction = aim_direction(self.player.pos, pos);
    }

    pub fn release_shoot(&mut self) {
        self.shoot.held = false;
    }

    // === Spawning ===

    pub fn spawn_hazard(&mut self) {
        let tier = self.rng.random_range(0..self.tuning.hazard_tiers.len());
        let hits_required = self.tuning.hazard_tiers[tier].hits_required;
        let radius = self.tuning.hazard_radius;
        let x = self.rng.random::<f32>() * self.surface.x;
        let speed = self.rng.random::<f32>() * self.tuning.hazard_speed_jitter + self.tuning.hazard_base_speed;
        let rotation_speed = (self.rng.random::<f32>() - 0.5) * 0.2;
        self.hazards.push(Hazard {
            pos: Vec2::new(x, -radius),
            speed,
            radius,
            original_radius: radius,
            rotation: 0.0,
            rotation_speed,
            tier,
            hits_required,
            hits_taken: 0,
        });
    }

    /// Throw a toast from the top of the player along the aim direction
    pub fn spawn_projectile(&mut self) {
        let size = self.tuning.projectile_size;
        let origin = Vec2::new(
            self.player.pos.x + self.player.size.x / 2.0 - size / 2.0,
            self.player.pos.y - size * 0.75,
        );
        let rotation_speed = (self.rng.random::<f32>() - 0.5) * 0.3 + 0.1;
        self.projectiles.push(Projectile {
            pos: origin,
            size: Vec2::splat(size),
            vel: self.shoot.direction * self.tuning.projectile_speed,
            rotation: 0.0,
            rotation_speed,
        });
    }

    /// Burst of particles tinted with a hazard tier color
    pub fn spawn_particles(&mut self, at: Vec2, tier: usize) {
        let speed = self.tuning.particle_speed;
        for _ in 0..self.tuning.particle_burst {
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * speed,
                (self.rng.random::<f32>() - 0.5) * speed,
            );
            self.particles.push(Particle {
                pos: at,
                vel,
                tier,
                life: self.tuning.particle_life,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(7, Tuning::default(), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.lives, 5);
        assert!(!state.wants_frame());
        assert_eq!(state.player.pos, Vec2::new(400.0, 530.0));
    }

    #[test]
    fn test_countdown_reaches_go() {
        let mut state = state();
        state.start_countdown();
        assert!(!state.countdown_tick());
        assert!(!state.countdown_tick());
        assert!(state.countdown_tick());
        assert_eq!(state.phase, GamePhase::Countdown { remaining: 0 });
    }

    #[test]
    fn test_hazard_two_hits() {
        let tuning = Tuning::default();
        let mut hazard = Hazard {
            pos: Vec2::ZERO,
            speed: 3.0,
            radius: 20.0,
            original_radius: 20.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            tier: 1,
            hits_required: 2,
            hits_taken: 0,
        };
        assert!(!hazard.take_hit(&tuning));
        assert!((hazard.radius - 14.0).abs() < 1e-4);
        assert!(hazard.take_hit(&tuning));
        assert_eq!(hazard.hits_taken, hazard.hits_required);
    }

    #[test]
    fn test_hazard_radius_floor() {
        let tuning = Tuning::default();
        let mut hazard = Hazard {
            pos: Vec2::ZERO,
            speed: 3.0,
            radius: 20.0,
            original_radius: 20.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            tier: 0,
            hits_required: 10,
            hits_taken: 0,
        };
        for _ in 0..5 {
            assert!(!hazard.take_hit(&tuning));
        }
        // 20 - 5 * 6 would be negative; floor is 20% of the original
        assert!((hazard.radius - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_press_ignored_unless_running() {
        let mut state = state();
        state.press_shoot(Vec2::new(10.0, 10.0));
        assert!(!state.shoot.held);
        assert_eq!(state.shoot.aim_point, Vec2::new(10.0, 10.0));

        state.begin_running(0.0);
        state.press_shoot(Vec2::new(440.0, 100.0));
        assert!(state.shoot.held);
        assert!(!state.shoot.fired_this_press);
        assert!((state.shoot.direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_spawn_hazard_uses_tier_table() {
        let mut state = state();
        for _ in 0..50 {
            state.spawn_hazard();
        }
        for hazard in &state.hazards {
            let tier = &state.tuning.hazard_tiers[hazard.tier];
            assert_eq!(hazard.hits_required, tier.hits_required);
            assert!(hazard.pos.x >= 0.0 && hazard.pos.x <= 800.0);
            assert!(hazard.speed >= 3.0 && hazard.speed < 6.0);
        }
    }

    #[test]
    fn test_particle_burst() {
        let mut state = state();
        state.spawn_particles(Vec2::new(5.0, 5.0), 2);
        assert_eq!(state.particles.len(), 8);
        assert!(state.particles.iter().all(|p| p.life == 30 && p.tier == 2));
        assert!(state.particles.iter().all(|p| p.vel.abs().max_element() <= 5.0));
    }

    #[test]
    fn test_resize_recenters_player() {
        let mut state = state();
        state.resize(Vec2::new(400.0, 300.0));
        assert_eq!(state.player.pos, Vec2::new(200.0, 230.0));
    }
}

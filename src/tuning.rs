//! Data-driven game balance
//!
//! Every number the arcade loop depends on lives here so that a page can
//! override balance with a JSON blob without rebuilding the wasm module.
//! Speeds are in pixels per frame, durations in milliseconds unless noted.

use serde::{Deserialize, Serialize};

/// A hazard tier: color, label and how many projectile hits destroy it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardTier {
    pub color: String,
    pub label: String,
    pub hits_required: u32,
}

impl HazardTier {
    fn new(color: &str, label: &str, hits_required: u32) -> Self {
        Self {
            color: color.to_string(),
            label: label.to_string(),
            hits_required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Session ===
    pub max_lives: u32,
    /// Countdown ticks shown before play (3, 2, 1)
    pub countdown_ticks: u8,
    pub countdown_tick_ms: u32,
    /// Delay after the last countdown tick ("POLO!") before Running
    pub go_delay_ms: u32,
    /// No hazards spawn before this much of the session has elapsed
    pub hazard_grace_ms: f64,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Distance of the player's top edge above the bottom of the surface
    pub player_bottom_offset: f32,
    pub player_speed: f32,
    pub player_fade_in_ms: f64,
    /// Per-tick chance of reversing patrol direction
    pub direction_flip_chance: f64,
    pub bump_frames: u32,
    pub bump_amount: f32,

    // === Death animation ===
    pub death_gravity: f32,
    pub death_launch_speed: f32,
    pub death_bounce_restitution: f32,
    pub death_max_bounces: u32,
    /// Distance below the surface at which the falling player starts fading
    pub death_fade_depth: f32,
    pub death_fade_step: f32,

    // === Projectiles ===
    pub projectile_size: f32,
    pub projectile_speed: f32,
    pub min_shot_interval_ms: f64,

    // === Hazards ===
    pub hazard_radius: f32,
    pub hazard_base_speed: f32,
    pub hazard_speed_jitter: f32,
    /// Radius lost per hit, as a fraction of the original radius
    pub hazard_shrink_per_hit: f32,
    /// Floor for the shrunken radius, as a fraction of the original radius
    pub hazard_min_radius_ratio: f32,
    pub hazard_tiers: Vec<HazardTier>,

    // === Difficulty ===
    pub base_spawn_rate: f32,
    /// Spawn probability added per elapsed second
    pub difficulty_increase_rate: f32,
    /// Optional ceiling on the spawn probability (None = unbounded)
    pub max_spawn_rate: Option<f32>,

    // === Particles ===
    pub particle_burst: usize,
    pub particle_life: u32,
    pub particle_speed: f32,

    // === Screen flash ===
    pub flash_duration_ms: f32,
    pub flash_gap_ms: f32,
    /// Simulated time a flash advances per frame
    pub flash_frame_ms: f32,
    pub flash_max_alpha: f32,
    pub terminal_flashes: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_lives: 5,
            countdown_ticks: 3,
            countdown_tick_ms: 1000,
            go_delay_ms: 800,
            hazard_grace_ms: 2000.0,

            player_width: 80.0,
            player_height: 50.0,
            player_bottom_offset: 70.0,
            player_speed: 2.0,
            player_fade_in_ms: 1000.0,
            direction_flip_chance: 0.005,
            bump_frames: 10,
            bump_amount: 0.05,

            death_gravity: 0.3,
            death_launch_speed: 8.0,
            death_bounce_restitution: 0.6,
            death_max_bounces: 3,
            death_fade_depth: 100.0,
            death_fade_step: 0.02,

            projectile_size: 24.0,
            projectile_speed: 8.0,
            min_shot_interval_ms: 200.0,

            hazard_radius: 20.0,
            hazard_base_speed: 3.0,
            hazard_speed_jitter: 3.0,
            hazard_shrink_per_hit: 0.3,
            hazard_min_radius_ratio: 0.2,
            hazard_tiers: vec![
                HazardTier::new("#ff6600", "HOT", 1),
                HazardTier::new("#ff1493", "COOL", 2),
                HazardTier::new("#ffff00", "COLD", 3),
            ],

            base_spawn_rate: 0.02,
            difficulty_increase_rate: 0.001,
            max_spawn_rate: None,

            particle_burst: 8,
            particle_life: 30,
            particle_speed: 10.0,

            flash_duration_ms: 120.0,
            flash_gap_ms: 150.0,
            flash_frame_ms: 16.0,
            flash_max_alpha: 0.95,
            terminal_flashes: 5,
        }
    }
}

impl Tuning {
    /// Parse a JSON override; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.validated())
    }

    /// Clamp values that would break the loop (zero-sized flashes, empty tier table, ...)
    pub fn validated(mut self) -> Self {
        if self.hazard_tiers.is_empty() {
            log::warn!("Tuning has no hazard tiers, restoring defaults");
            self.hazard_tiers = Tuning::default().hazard_tiers;
        }
        for tier in &mut self.hazard_tiers {
            tier.hits_required = tier.hits_required.max(1);
        }
        if self.flash_frame_ms <= 0.0 || self.flash_duration_ms <= 0.0 {
            log::warn!("Tuning flash timing must be positive, restoring defaults");
            let defaults = Tuning::default();
            self.flash_frame_ms = defaults.flash_frame_ms;
            self.flash_duration_ms = defaults.flash_duration_ms;
        }
        self.max_lives = self.max_lives.max(1);
        self.terminal_flashes = self.terminal_flashes.max(1);
        self.hazard_min_radius_ratio = self.hazard_min_radius_ratio.clamp(0.0, 1.0);
        self
    }

    /// Hazard spawn probability per tick after `elapsed_secs` of play
    pub fn spawn_rate_at(&self, elapsed_secs: u64) -> f32 {
        let rate = self.base_spawn_rate + elapsed_secs as f32 * self.difficulty_increase_rate;
        match self.max_spawn_rate {
            Some(cap) => rate.min(cap),
            None => rate,
        }
    }

    /// Full countdown length from start to Running
    pub fn countdown_total_ms(&self) -> u32 {
        self.countdown_ticks as u32 * self.countdown_tick_ms + self.go_delay_ms
    }
}

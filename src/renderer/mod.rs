//! 2D canvas rendering module
//!
//! `scene` turns a `GameState` into a flat draw list without touching the
//! browser; `canvas` (wasm32 only) replays that list onto a
//! `CanvasRenderingContext2d`. `hud` derives the DOM score/lives readout.

pub mod hud;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use hud::HudView;
pub use scene::{AssetStatus, DrawCommand, Sprite, build_scene};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: &str = "#efca52";
    /// Ink used for labels, the crosshair and the player placeholder
    pub const INK: &str = "#2D2218";
    pub const PROJECTILE_PLACEHOLDER: &str = "#D4A574";
    pub const FLASH: &str = "#FFFFFF";
}

//! Toasté arcade - the hidden toaster shooter behind the site logo
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player, toasts, hazards, flashes)
//! - `session`: Countdown and frame-loop lifecycle on top of a scheduler
//! - `platform`: Browser/native clocks, timers and pointer mapping
//! - `renderer`: Scene description and the Canvas 2D backend
//! - `audio`: Sound effect selection and playback
//! - `settings`: Persisted preferences (mute)
//! - `mascot`: Logo activator and decorative mascot effects
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod mascot;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::Session;
pub use settings::Settings;
pub use sim::GameState;
pub use tuning::Tuning;

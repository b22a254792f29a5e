//! Sound effects
//!
//! Clips are short mp3 files played fire-and-forget through
//! `HtmlAudioElement`. Choosing the clip, volume and pitch is plain Rust
//! (`Mixer`) so it can be tested off the browser; `AudioPlayer` does the
//! playback on wasm32.

use rand::Rng;

use crate::sim::GameEvent;

pub const SOUND_DIR: &str = "/assets/sounds";

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// A toast was thrown
    Throw,
    /// A toast hit a hazard
    Bang,
    /// A hazard hit the toaster
    Punch,
    /// Countdown jingle
    Ready,
    GameOver,
}

impl SoundEffect {
    /// Clip names, one picked at random per play
    pub fn variants(&self) -> &'static [&'static str] {
        match self {
            SoundEffect::Throw => &["hit-01", "hit-02", "hit-03"],
            SoundEffect::Bang => &["bang-01", "bang-02"],
            SoundEffect::Punch => &["punch-01", "punch-02"],
            SoundEffect::Ready => &["ready"],
            SoundEffect::GameOver => &["awww"],
        }
    }

    pub fn volume(&self) -> f64 {
        match self {
            SoundEffect::Throw => 0.45,
            SoundEffect::Bang => 0.4,
            SoundEffect::Punch => 0.35,
            SoundEffect::Ready => 0.25,
            SoundEffect::GameOver => 0.35,
        }
    }

    /// Whether playback rate is randomised so repeats don't sound identical
    pub fn pitch_jitter(&self) -> bool {
        matches!(self, SoundEffect::Throw | SoundEffect::Bang | SoundEffect::Punch)
    }

    /// Seconds skipped at the start of the clip
    pub fn start_offset_s(&self) -> f64 {
        match self {
            SoundEffect::Ready => 2.6,
            _ => 0.0,
        }
    }

    /// The sound a game event plays, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shot => Some(SoundEffect::Throw),
            GameEvent::HazardHit { .. } => Some(SoundEffect::Bang),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::Punch),
            GameEvent::CountdownStarted => Some(SoundEffect::Ready),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            _ => None,
        }
    }
}

/// Fully resolved playback parameters for one clip
#[derive(Debug, Clone, PartialEq)]
pub struct SoundRequest {
    pub effect: SoundEffect,
    pub path: String,
    pub volume: f64,
    pub playback_rate: f64,
    pub start_offset_s: f64,
}

impl SoundRequest {
    pub fn new(effect: SoundEffect, rng: &mut impl Rng) -> Self {
        let variants = effect.variants();
        let name = variants[rng.random_range(0..variants.len())];
        let playback_rate = if effect.pitch_jitter() {
            0.95 + rng.random::<f64>() * 0.1
        } else {
            1.0
        };
        Self {
            effect,
            path: format!("{}/{}.mp3", SOUND_DIR, name),
            volume: effect.volume(),
            playback_rate,
            start_offset_s: effect.start_offset_s(),
        }
    }
}

/// Mute gate and clip picker
#[derive(Debug, Clone)]
pub struct Mixer<R: Rng> {
    muted: bool,
    rng: R,
}

impl<R: Rng> Mixer<R> {
    pub fn new(muted: bool, rng: R) -> Self {
        Self { muted, rng }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Resolve a request, or `None` while muted
    pub fn request(&mut self, effect: SoundEffect) -> Option<SoundRequest> {
        if self.muted {
            return None;
        }
        Some(SoundRequest::new(effect, &mut self.rng))
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioPlayer;

#[cfg(target_arch = "wasm32")]
mod web {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlAudioElement;

    use super::{Mixer, SoundEffect, SoundRequest};

    /// Audio manager for the game
    pub struct AudioPlayer {
        mixer: Mixer<Pcg32>,
        /// Only one countdown jingle plays at a time
        ready: Option<HtmlAudioElement>,
    }

    impl AudioPlayer {
        pub fn new(muted: bool) -> Self {
            let seed = js_sys::Date::now() as u64;
            Self {
                mixer: Mixer::new(muted, Pcg32::seed_from_u64(seed)),
                ready: None,
            }
        }

        pub fn is_muted(&self) -> bool {
            self.mixer.is_muted()
        }

        /// Muting also silences a jingle that is already playing
        pub fn set_muted(&mut self, muted: bool) {
            self.mixer.set_muted(muted);
            if muted {
                if let Some(ready) = self.ready.take() {
                    let _ = ready.pause();
                }
            }
        }

        pub fn play(&mut self, effect: SoundEffect) {
            let Some(request) = self.mixer.request(effect) else {
                return;
            };
            if effect == SoundEffect::Ready {
                if let Some(previous) = self.ready.take() {
                    let _ = previous.pause();
                }
            }
            let Some(audio) = start(&request) else {
                log::warn!("Could not play {}", request.path);
                return;
            };
            if effect == SoundEffect::Ready {
                self.ready = Some(audio);
            }
        }
    }

    fn start(request: &SoundRequest) -> Option<HtmlAudioElement> {
        let audio = HtmlAudioElement::new_with_src(&request.path).ok()?;
        audio.set_volume(request.volume);
        audio.set_playback_rate(request.playback_rate);
        if request.start_offset_s > 0.0 {
            audio.set_current_time(request.start_offset_s);
        }
        let promise = audio.play().ok()?;
        // Autoplay rejections are expected before the first user gesture
        wasm_bindgen_futures::spawn_local(async move {
            let _ = JsFuture::from(promise).await;
        });
        Some(audio)
    }
}

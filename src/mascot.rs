//! Logo mascot: the hidden-game activator and decorative effects
//!
//! The mascot is a DOM/SVG element, not part of the canvas game. This module
//! decides *what* it should do (poses, offsets, flight curves); the browser
//! host applies the results as CSS transforms.

use glam::Vec2;
use rand::Rng;

/// Consecutive logo presses needed to open the game
pub const ACTIVATION_CLICKS: u32 = 10;
/// Longest pause between two presses that still counts as consecutive
pub const CLICK_WINDOW_MS: f64 = 1000.0;
/// Full inflation at the last click
pub const MAX_INFLATION: f32 = 0.15;
/// Upward shift at full inflation, keeps the mascot inside its frame
pub const MAX_LIFT_PX: f32 = 8.0;
pub const LOGO_PULSE_SCALE: f32 = 1.05;
/// Half of the logo pulse: grow, then shrink back for the same time
pub const LOGO_PULSE_HALF_MS: f64 = 100.0;
pub const BLINK_MS: u32 = 150;

/// Eased transition from the current mascot transform to this one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MascotPose {
    pub scale: f32,
    pub lift_px: f32,
    pub duration_ms: u32,
    /// CSS timing function
    pub easing: &'static str,
}

const EASE_BOUNCY: &str = "cubic-bezier(0.68, -0.25, 0.265, 1.25)";
const EASE_SOFT: &str = "cubic-bezier(0.25, 0.46, 0.45, 0.94)";

impl MascotPose {
    /// Back to natural size and position
    pub fn rest() -> Self {
        Self {
            scale: 1.0,
            lift_px: 0.0,
            duration_ms: 500,
            easing: EASE_SOFT,
        }
    }

    pub fn css_transform(&self) -> String {
        format!("translateY(-{}px) scale({})", self.lift_px, self.scale)
    }

    pub fn css_transition(&self) -> String {
        format!("transform {}ms {}", self.duration_ms, self.easing)
    }
}

/// Overshoot, undershoot, settle: the bouncy inflation played on each press
pub fn inflation_keyframes(count: u32) -> [MascotPose; 3] {
    let progress = count.min(ACTIVATION_CLICKS) as f32 / ACTIVATION_CLICKS as f32;
    let scale = 1.0 + progress * MAX_INFLATION;
    let lift = progress * MAX_LIFT_PX;
    [
        MascotPose {
            scale: scale + 0.04,
            lift_px: lift + 1.0,
            duration_ms: 180,
            easing: EASE_BOUNCY,
        },
        MascotPose {
            scale: scale - 0.015,
            lift_px: lift - 0.3,
            duration_ms: 120,
            easing: EASE_SOFT,
        },
        MascotPose {
            scale,
            lift_px: lift,
            duration_ms: 80,
            easing: EASE_SOFT,
        },
    ]
}

/// What one logo press should trigger
#[derive(Debug, Clone, PartialEq)]
pub struct ClickOutcome {
    /// Presses counted so far, including this one
    pub count: u32,
    pub keyframes: [MascotPose; 3],
    /// Start a logo pulse (false while one is still playing)
    pub pulse_logo: bool,
    /// This press opened the game; the count has been reset
    pub activated: bool,
    /// First press of a streak: the click window has just opened
    pub opened_window: bool,
}

/// Counts rapid logo presses and opens the game on the tenth
#[derive(Debug, Clone, Default)]
pub struct Activator {
    count: u32,
    last_click_ms: Option<f64>,
    pulse_until_ms: Option<f64>,
}

impl Activator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn click(&mut self, now_ms: f64) -> ClickOutcome {
        self.expire(now_ms);
        let opened_window = self.count == 0;
        self.count += 1;
        self.last_click_ms = Some(now_ms);
        log::debug!("Logo clicked {}/{}", self.count, ACTIVATION_CLICKS);

        let pulse_logo = self.pulse_until_ms.is_none_or(|until| now_ms >= until);
        if pulse_logo {
            self.pulse_until_ms = Some(now_ms + 2.0 * LOGO_PULSE_HALF_MS);
        }

        let count = self.count;
        let keyframes = inflation_keyframes(count);
        let activated = count >= ACTIVATION_CLICKS;
        if activated {
            log::info!("Hidden game activated");
            self.count = 0;
            self.last_click_ms = None;
        }
        ClickOutcome {
            count,
            keyframes,
            pulse_logo,
            activated,
            opened_window,
        }
    }

    /// A streak is in progress and the next press would extend it
    pub fn in_click_window(&self) -> bool {
        self.last_click_ms.is_some()
    }

    /// Drop a stale streak. Returns true if a streak was reset, in which case
    /// the mascot should return to `MascotPose::rest`.
    pub fn expire(&mut self, now_ms: f64) -> bool {
        match self.last_click_ms {
            Some(last) if now_ms - last > CLICK_WINDOW_MS => {
                log::debug!("Click streak of {} expired", self.count);
                self.count = 0;
                self.last_click_ms = None;
                true
            }
            _ => false,
        }
    }
}

/// First idle movement starts this long after the page loads
pub const IDLE_START_DELAY_MS: f64 = 2000.0;
/// Pause between idle movements: a base plus up to `IDLE_GAP_JITTER_MS`
pub const IDLE_MIN_GAP_MS: f64 = 2000.0;
pub const IDLE_GAP_JITTER_MS: f64 = 4000.0;
/// Time reserved for one movement before the next is scheduled
pub const IDLE_SETTLE_MS: f64 = 1000.0;
/// CSS transition used while idling
pub const IDLE_TRANSITION: &str = "transform 0.3s cubic-bezier(0.25, 0.46, 0.45, 0.94)";

/// Small fidget the mascot plays on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleMovement {
    /// Quick horizontal jitter
    Shake,
    /// Many tiny movements in every direction
    Vibrate,
    /// Slower rocking with alternating tilt
    Wiggle,
}

impl IdleMovement {
    pub const ALL: [IdleMovement; 3] = [IdleMovement::Shake, IdleMovement::Vibrate, IdleMovement::Wiggle];

    pub fn pick(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Frames of the movement, ending with a return to rest
    pub fn keyframes(&self, rng: &mut impl Rng) -> Vec<IdleKeyframe> {
        let mut frames = match self {
            IdleMovement::Shake => {
                let intensity = 2.0 + rng.random::<f32>() * 2.0;
                let count = rng.random_range(4..=6);
                (0..count)
                    .map(|_| IdleKeyframe {
                        offset: Vec2::new(
                            (rng.random::<f32>() - 0.5) * intensity,
                            (rng.random::<f32>() - 0.5) * intensity * 0.3,
                        ),
                        rotation_deg: rng.random::<f32>() - 0.5,
                        hold_ms: 80.0 + rng.random::<f64>() * 40.0,
                    })
                    .collect::<Vec<_>>()
            }
            IdleMovement::Vibrate => {
                let intensity = 1.0 + rng.random::<f32>() * 1.5;
                let count = rng.random_range(6..=9);
                (0..count)
                    .map(|_| IdleKeyframe {
                        offset: Vec2::new(
                            (rng.random::<f32>() - 0.5) * intensity,
                            (rng.random::<f32>() - 0.5) * intensity,
                        ),
                        rotation_deg: (rng.random::<f32>() - 0.5) * 0.5,
                        hold_ms: 60.0 + rng.random::<f64>() * 30.0,
                    })
                    .collect()
            }
            IdleMovement::Wiggle => {
                let intensity = 1.5 + rng.random::<f32>();
                let tilt = (rng.random::<f32>() - 0.5) * 4.0;
                let count = rng.random_range(3..=4);
                (0..count)
                    .map(|i| IdleKeyframe {
                        offset: Vec2::new(
                            (rng.random::<f32>() - 0.5) * intensity,
                            (rng.random::<f32>() - 0.5) * intensity * 0.5,
                        ),
                        rotation_deg: if i % 2 == 0 { tilt } else { -tilt },
                        hold_ms: 120.0 + rng.random::<f64>() * 60.0,
                    })
                    .collect()
            }
        };
        frames.push(IdleKeyframe::rest());
        frames
    }
}

/// One pose of an idle movement, held for `hold_ms` before the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleKeyframe {
    pub offset: Vec2,
    pub rotation_deg: f32,
    pub hold_ms: f64,
}

impl IdleKeyframe {
    pub fn rest() -> Self {
        Self {
            offset: Vec2::ZERO,
            rotation_deg: 0.0,
            hold_ms: 0.0,
        }
    }

    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) rotate({}deg)",
            self.offset.x, self.offset.y, self.rotation_deg
        )
    }
}

/// Gate for the mascot's idle movements.
///
/// Movements pause while the pointer hovers the logo and while a click streak
/// is open. Each scheduled movement carries a ticket; only the newest ticket
/// may start, so resuming twice never doubles up the timers.
#[derive(Debug, Clone, Default)]
pub struct IdleMotion {
    hovered: bool,
    in_click_window: bool,
    animating: bool,
    ticket: u64,
}

impl IdleMotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn is_paused(&self) -> bool {
        self.hovered || self.in_click_window
    }

    /// Returns true when leaving should resume the movement cycle
    pub fn set_hovered(&mut self, hovered: bool) -> bool {
        self.hovered = hovered;
        !hovered && !self.animating && !self.in_click_window
    }

    pub fn start_click_window(&mut self) {
        log::debug!("Click window started, pausing idle movements");
        self.in_click_window = true;
    }

    /// Returns true when the movement cycle should resume
    pub fn end_click_window(&mut self) -> bool {
        self.in_click_window = false;
        !self.animating && !self.hovered
    }

    /// Book the next movement: its ticket and the delay before it starts.
    /// `None` while paused or mid-movement.
    pub fn schedule(&mut self, rng: &mut impl Rng) -> Option<(u64, f64)> {
        if self.is_paused() || self.animating {
            return None;
        }
        self.ticket += 1;
        Some((self.ticket, IDLE_MIN_GAP_MS + rng.random::<f64>() * IDLE_GAP_JITTER_MS))
    }

    /// The delay for `ticket` elapsed. Returns the movement to play, unless
    /// the ticket was superseded or the mascot got paused meanwhile.
    pub fn begin(&mut self, ticket: u64, rng: &mut impl Rng) -> Option<(IdleMovement, Vec<IdleKeyframe>)> {
        if ticket != self.ticket || self.is_paused() || self.animating {
            return None;
        }
        self.animating = true;
        let movement = IdleMovement::pick(rng);
        Some((movement, movement.keyframes(rng)))
    }

    /// The movement's settle time is over. Returns true to schedule the next.
    pub fn finish(&mut self) -> bool {
        self.animating = false;
        !self.is_paused()
    }
}

/// Pupil offset from the centre of its socket toward the pointer, capped at
/// 35% of the socket's smaller side.
pub fn eye_offset(pointer: Vec2, socket_center: Vec2, socket_size: Vec2) -> Vec2 {
    let max_radius = socket_size.min_element() * 0.35;
    (pointer - socket_center).clamp_length_max(max_radius.max(0.0))
}

/// Position, spin and fade of a flying toast at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightFrame {
    pub pos: Vec2,
    pub rotation_deg: f32,
    pub scale: f32,
    pub opacity: f32,
}

/// A decorative toast tossed from the logo on each press, following a
/// quadratic Bézier arc that ends below the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastFlight {
    start: Vec2,
    control: Vec2,
    end: Vec2,
    start_ms: f64,
    duration_ms: f64,
    spin_deg: f32,
}

impl ToastFlight {
    pub fn launch(start: Vec2, viewport_height: f32, now_ms: f64, rng: &mut impl Rng) -> Self {
        let dir = if rng.random::<f32>() < 0.5 { -1.0 } else { 1.0 };
        let distance_x = 260.0 + rng.random::<f32>() * 240.0;
        let end = Vec2::new(
            start.x + dir * distance_x,
            viewport_height + 160.0 + rng.random::<f32>() * 160.0,
        );
        let arc_boost = ((end.x - start.x).abs() * 0.8).max(420.0);
        let lateral = (rng.random::<f32>() * 2.0 - 1.0) * 60.0;
        let control = Vec2::new(
            (start.x + end.x) / 2.0 + lateral,
            start.y.min(end.y) - arc_boost,
        );
        Self {
            start,
            control,
            end,
            start_ms: now_ms,
            duration_ms: 1600.0 + rng.random::<f64>() * 800.0,
            spin_deg: (rng.random::<f32>() * 2.0 - 1.0) * 360.0,
        }
    }

    pub fn end(&self) -> Vec2 {
        self.end
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms >= self.duration_ms
    }

    pub fn frame(&self, now_ms: f64) -> FlightFrame {
        let raw = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32;
        let t = ease_out_cubic(raw);
        FlightFrame {
            pos: quad_bezier(self.start, self.control, self.end, t),
            rotation_deg: self.spin_deg * t,
            scale: 1.0 + 0.05 * (t * std::f32::consts::PI).sin(),
            opacity: 1.0 - t * 0.1,
        }
    }
}

fn quad_bezier(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let inv = 1.0 - t;
    p0 * (inv * inv) + p1 * (2.0 * inv * t) + p2 * (t * t)
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_ten_quick_clicks_activate() {
        let mut activator = Activator::new();
        let mut now = 0.0;
        for i in 1..ACTIVATION_CLICKS {
            let outcome = activator.click(now);
            assert_eq!(outcome.count, i);
            assert!(!outcome.activated);
            now += 900.0;
        }
        let outcome = activator.click(now);
        assert!(outcome.activated);
        assert_eq!(outcome.count, 10);
        assert_eq!(activator.count(), 0);
    }

    #[test]
    fn test_slow_click_restarts_count() {
        let mut activator = Activator::new();
        for i in 0..5 {
            activator.click(i as f64 * 100.0);
        }
        assert_eq!(activator.count(), 5);
        let outcome = activator.click(400.0 + 1001.0);
        assert_eq!(outcome.count, 1);
    }

    #[test]
    fn test_expire_reports_reset_once() {
        let mut activator = Activator::new();
        activator.click(0.0);
        assert!(!activator.expire(1000.0));
        assert!(activator.expire(1000.5));
        assert!(!activator.expire(5000.0));
        assert_eq!(activator.count(), 0);
    }

    #[test]
    fn test_logo_pulse_not_retriggered() {
        let mut activator = Activator::new();
        assert!(activator.click(0.0).pulse_logo);
        assert!(!activator.click(150.0).pulse_logo);
        assert!(activator.click(200.0).pulse_logo);
    }

    #[test]
    fn test_inflation_keyframes() {
        let [over, under, settle] = inflation_keyframes(5);
        assert!((settle.scale - 1.075).abs() < 1e-6);
        assert!((settle.lift_px - 4.0).abs() < 1e-6);
        assert!((over.scale - 1.115).abs() < 1e-6);
        assert!((over.lift_px - 5.0).abs() < 1e-6);
        assert!((under.scale - 1.06).abs() < 1e-6);
        assert!((under.lift_px - 3.7).abs() < 1e-6);
        assert_eq!(over.duration_ms + under.duration_ms + settle.duration_ms, 380);

        let [.., full] = inflation_keyframes(10);
        assert!((full.scale - 1.15).abs() < 1e-6);
    }

    #[test]
    fn test_pose_css() {
        let pose = MascotPose::rest();
        assert_eq!(pose.css_transform(), "translateY(-0px) scale(1)");
        assert!(pose.css_transition().starts_with("transform 500ms cubic-bezier"));
    }

    #[test]
    fn test_eye_offset_capped() {
        let center = Vec2::new(100.0, 100.0);
        let size = Vec2::new(20.0, 40.0);
        let near = eye_offset(Vec2::new(103.0, 104.0), center, size);
        assert_eq!(near, Vec2::new(3.0, 4.0));

        let far = eye_offset(Vec2::new(1000.0, 100.0), center, size);
        assert!((far - Vec2::new(7.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_toast_flight_endpoints() {
        let mut rng = Pcg32::seed_from_u64(5);
        let start = Vec2::new(500.0, 120.0);
        let flight = ToastFlight::launch(start, 800.0, 1000.0, &mut rng);

        let first = flight.frame(1000.0);
        assert_eq!(first.pos, start);
        assert_eq!(first.rotation_deg, 0.0);
        assert_eq!(first.opacity, 1.0);

        assert!(!flight.is_finished(2500.0));
        assert!(flight.is_finished(1000.0 + 2400.0));
        let last = flight.frame(10_000.0);
        assert!((last.pos - flight.end()).length() < 1e-3);
        assert!(flight.end().y >= 960.0);
        assert!((last.opacity - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_click_window_opens_on_first_press() {
        let mut activator = Activator::new();
        assert!(!activator.in_click_window());
        assert!(activator.click(0.0).opened_window);
        assert!(!activator.click(300.0).opened_window);
        assert!(activator.in_click_window());
        assert!(activator.expire(1400.0));
        assert!(!activator.in_click_window());
        assert!(activator.click(2000.0).opened_window);
    }

    #[test]
    fn test_idle_keyframes_shapes() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..50 {
            let movement = IdleMovement::pick(&mut rng);
            let frames = movement.keyframes(&mut rng);
            let (lo, hi, max_offset, hold) = match movement {
                IdleMovement::Shake => (4, 6, 2.0, 80.0..120.0),
                IdleMovement::Vibrate => (6, 9, 1.25, 60.0..90.0),
                IdleMovement::Wiggle => (3, 4, 1.25, 120.0..180.0),
            };
            let (last, moves) = frames.split_last().unwrap();
            assert_eq!(*last, IdleKeyframe::rest());
            assert!((lo..=hi).contains(&moves.len()), "{movement:?} {}", moves.len());
            for frame in moves {
                assert!(frame.offset.abs().max_element() <= max_offset);
                assert!(hold.contains(&frame.hold_ms));
            }
        }
    }

    #[test]
    fn test_wiggle_alternates_tilt() {
        let mut rng = Pcg32::seed_from_u64(2);
        let frames = IdleMovement::Wiggle.keyframes(&mut rng);
        assert_eq!(frames[0].rotation_deg, -frames[1].rotation_deg);
        assert_eq!(frames[0].rotation_deg, frames[2].rotation_deg);
        assert_eq!(IdleKeyframe::rest().css_transform(), "translate(0px, 0px) rotate(0deg)");
    }

    #[test]
    fn test_idle_cycle() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut idle = IdleMotion::new();
        let (ticket, delay) = idle.schedule(&mut rng).unwrap();
        assert!((IDLE_MIN_GAP_MS..IDLE_MIN_GAP_MS + IDLE_GAP_JITTER_MS).contains(&delay));

        assert!(idle.begin(ticket, &mut rng).is_some());
        assert!(idle.is_animating());
        // No overlapping movements
        assert!(idle.schedule(&mut rng).is_none());
        assert!(idle.finish());
        assert!(idle.schedule(&mut rng).is_some());
    }

    #[test]
    fn test_idle_paused_by_hover_and_clicks() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut idle = IdleMotion::new();
        let (ticket, _) = idle.schedule(&mut rng).unwrap();

        assert!(!idle.set_hovered(true));
        assert!(idle.begin(ticket, &mut rng).is_none());
        assert!(idle.schedule(&mut rng).is_none());

        idle.start_click_window();
        assert!(!idle.set_hovered(false));
        assert!(idle.is_paused());
        assert!(idle.end_click_window());
        assert!(idle.schedule(&mut rng).is_some());
    }

    #[test]
    fn test_superseded_ticket_does_not_start() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut idle = IdleMotion::new();
        let (first, _) = idle.schedule(&mut rng).unwrap();
        let (second, _) = idle.schedule(&mut rng).unwrap();
        assert!(idle.begin(first, &mut rng).is_none());
        assert!(idle.begin(second, &mut rng).is_some());
    }

    #[test]
    fn test_ease_out_cubic() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }
}

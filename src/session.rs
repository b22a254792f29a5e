//! Session lifecycle
//!
//! A `Session` owns one `GameState` plus the frame request and countdown
//! timers that drive it. It is the only place that talks to the scheduler,
//! so teardown can cancel everything in one go.

use crate::platform::{FrameHandle, ManualScheduler, Scheduler, TimerHandle, TimerKind, Wakeup};
use crate::sim::{Clock, GameState, ManualClock, tick};

pub struct Session<S: Scheduler> {
    game: GameState,
    scheduler: S,
    frame: Option<FrameHandle>,
    countdown_interval: Option<TimerHandle>,
    countdown_timeout: Option<TimerHandle>,
}

impl<S: Scheduler> Session<S> {
    pub fn new(game: GameState, scheduler: S) -> Self {
        Self {
            game,
            scheduler,
            frame: None,
            countdown_interval: None,
            countdown_timeout: None,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut GameState {
        &mut self.game
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Whether a frame request or a countdown timer is outstanding
    pub fn has_pending_work(&self) -> bool {
        self.frame.is_some() || self.countdown_interval.is_some() || self.countdown_timeout.is_some()
    }

    /// Begin a countdown, tearing down whatever was running before
    pub fn start(&mut self) {
        self.full_stop();
        self.game.start_countdown();
        self.countdown_interval = self
            .scheduler
            .set_interval(TimerKind::CountdownStep, self.game.tuning.countdown_tick_ms);
        log::info!("Countdown started");
    }

    /// Back to a fresh countdown with the player reset
    pub fn restart(&mut self) {
        self.full_stop();
        self.game.reset_player();
        self.start();
    }

    pub fn exit(&mut self) {
        self.full_stop();
        log::info!("Session exited");
    }

    /// Cancel every frame request and timer and clear transient state.
    /// Safe to call any number of times.
    pub fn full_stop(&mut self) {
        self.game.halt();
        if let Some(frame) = self.frame.take() {
            self.scheduler.cancel_frame(frame);
        }
        self.clear_countdown();
    }

    fn clear_countdown(&mut self) {
        if let Some(interval) = self.countdown_interval.take() {
            self.scheduler.clear_timer(interval);
        }
        if let Some(timeout) = self.countdown_timeout.take() {
            self.scheduler.clear_timer(timeout);
        }
    }

    /// Dispatch a scheduler callback. Returns true when a frame was simulated
    /// and should be drawn.
    pub fn on_wake(&mut self, wakeup: Wakeup, now_ms: f64) -> bool {
        match wakeup {
            Wakeup::Frame(handle) => self.on_frame(handle, now_ms),
            Wakeup::Timer(handle, kind) => {
                self.on_timer(handle, kind, now_ms);
                false
            }
        }
    }

    fn on_timer(&mut self, handle: TimerHandle, kind: TimerKind, now_ms: f64) {
        match kind {
            TimerKind::CountdownStep => {
                if self.countdown_interval != Some(handle) {
                    log::debug!("Ignoring stale countdown beat {:?}", handle);
                    return;
                }
                if self.game.countdown_tick() {
                    self.clear_countdown();
                    self.countdown_timeout = self
                        .scheduler
                        .set_timeout(TimerKind::CountdownGo, self.game.tuning.go_delay_ms);
                }
            }
            TimerKind::CountdownGo => {
                if self.countdown_timeout != Some(handle) {
                    log::debug!("Ignoring stale go timer {:?}", handle);
                    return;
                }
                self.countdown_timeout = None;
                self.game.begin_running(now_ms);
                self.ensure_frame();
            }
        }
    }

    fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) -> bool {
        if self.frame != Some(handle) {
            return false;
        }
        self.frame = None;
        if !self.game.wants_frame() {
            return false;
        }

        tick(&mut self.game, now_ms);

        if self.game.wants_frame() {
            self.ensure_frame();
        } else {
            log::info!("Frame loop stopped");
        }
        true
    }

    fn ensure_frame(&mut self) {
        if self.frame.is_none() {
            self.frame = self.scheduler.request_frame();
        }
    }
}

impl Session<ManualScheduler> {
    /// Drive the session with simulated time, one frame every `frame_ms`,
    /// until `clock` reads `until_ms`.
    pub fn run_until(&mut self, clock: &ManualClock, until_ms: f64, frame_ms: f64) {
        while clock.now_ms() < until_ms {
            clock.advance(frame_ms);
            let now = clock.now_ms();
            while let Some((at, wakeup)) = self.scheduler.pop_timer(now) {
                self.on_wake(wakeup, at);
            }
            if let Some(frame) = self.scheduler.take_frame(now) {
                self.on_wake(frame, now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameEvent, GamePhase, Hazard};
    use crate::tuning::Tuning;
    use glam::Vec2;

    const FRAME_MS: f64 = 16.0;

    fn session() -> Session<ManualScheduler> {
        let game = GameState::new(42, Tuning::default(), Vec2::new(800.0, 600.0));
        Session::new(game, ManualScheduler::new())
    }

    /// Quiet game: no random hazards
    fn calm_session() -> Session<ManualScheduler> {
        let tuning = Tuning {
            hazard_grace_ms: f64::MAX,
            ..Default::default()
        };
        let game = GameState::new(42, tuning, Vec2::new(800.0, 600.0));
        Session::new(game, ManualScheduler::new())
    }

    #[test]
    fn test_countdown_then_running() {
        let clock = ManualClock::new(0.0);
        let mut session = session();
        session.start();
        assert_eq!(session.game().phase, GamePhase::Countdown { remaining: 3 });

        session.run_until(&clock, 3000.0, FRAME_MS);
        assert_eq!(session.game().phase, GamePhase::Countdown { remaining: 0 });
        assert!(session.scheduler().pending_frame().is_none());

        session.run_until(&clock, 3900.0, FRAME_MS);
        assert!(session.game().is_running());
        // Go timer is timed from the last beat, not from the frame that saw it
        assert_eq!(session.game().start_ms, 3800.0);
        assert!(session.scheduler().pending_frame().is_some());
        assert_eq!(session.scheduler().active_timers(), 0);
    }

    #[test]
    fn test_countdown_events() {
        let clock = ManualClock::new(0.0);
        let mut session = session();
        session.start();
        session.run_until(&clock, 3850.0, FRAME_MS);
        let events = session.game_mut().drain_events();
        assert_eq!(
            &events[..5],
            &[
                GameEvent::CountdownStarted,
                GameEvent::CountdownTick { remaining: 2 },
                GameEvent::CountdownTick { remaining: 1 },
                GameEvent::CountdownTick { remaining: 0 },
                GameEvent::Go,
            ]
        );
    }

    #[test]
    fn test_full_stop_twice_is_quiet() {
        let clock = ManualClock::new(0.0);
        let mut session = session();
        session.start();
        session.run_until(&clock, 6000.0, FRAME_MS);
        session.game_mut().spawn_hazard();

        session.full_stop();
        session.full_stop();
        assert!(!session.has_pending_work());
        assert!(session.scheduler().is_quiet());
        assert_eq!(session.game().entity_count(), 0);
        assert_eq!(session.game().phase, GamePhase::Idle);
        assert!(session.game().flash().is_none());
        assert!(!session.game().shoot.held);
    }

    #[test]
    fn test_stop_during_countdown_cancels_timers() {
        let clock = ManualClock::new(0.0);
        let mut session = session();
        session.start();
        session.run_until(&clock, 1500.0, FRAME_MS);
        session.exit();
        assert!(session.scheduler().is_quiet());

        session.run_until(&clock, 6000.0, FRAME_MS);
        assert_eq!(session.game().phase, GamePhase::Idle);
    }

    #[test]
    fn test_restart_replaces_countdown() {
        let clock = ManualClock::new(0.0);
        let mut session = session();
        session.start();
        session.run_until(&clock, 1500.0, FRAME_MS);
        session.restart();
        assert_eq!(session.scheduler().active_timers(), 1);

        // The first countdown would have finished at 3800
        session.run_until(&clock, 4000.0, FRAME_MS);
        assert!(!session.game().is_running());
        session.run_until(&clock, 5400.0, FRAME_MS);
        assert!(session.game().is_running());
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut session = session();
        session.start();
        session.full_stop();
        session.on_wake(Wakeup::Timer(TimerHandle(1), TimerKind::CountdownStep), 1000.0);
        session.on_wake(Wakeup::Timer(TimerHandle(1), TimerKind::CountdownGo), 1000.0);
        assert_eq!(session.game().phase, GamePhase::Idle);
        assert!(!session.has_pending_work());
    }

    #[test]
    fn test_stale_frame_does_not_tick() {
        let clock = ManualClock::new(0.0);
        let mut session = session();
        session.start();
        session.run_until(&clock, 4000.0, FRAME_MS);
        let score_before = session.game().score;
        assert!(!session.on_wake(Wakeup::Frame(FrameHandle(-7)), 60_000.0));
        assert_eq!(session.game().score, score_before);
    }

    #[test]
    fn test_game_over_stops_loop() {
        let clock = ManualClock::new(0.0);
        let mut session = calm_session();
        session.start();
        session.run_until(&clock, 4000.0, FRAME_MS);
        assert!(session.game().is_running());

        let game = session.game_mut();
        game.lives = 1;
        let hazard = Hazard {
            pos: game.player.bounds().center(),
            speed: 0.0,
            radius: 20.0,
            original_radius: 20.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            tier: 0,
            hits_required: 1,
            hits_taken: 0,
        };
        game.hazards.push(hazard);

        session.run_until(&clock, 20_000.0, FRAME_MS);
        assert!(matches!(session.game().phase, GamePhase::GameOver { .. }));
        assert!(!session.game().wants_frame());
        assert!(session.scheduler().is_quiet());
    }

    #[test]
    fn test_exit_while_dying_is_quiet() {
        let clock = ManualClock::new(0.0);
        let mut session = calm_session();
        session.start();
        session.run_until(&clock, 4000.0, FRAME_MS);

        let game = session.game_mut();
        game.lives = 1;
        let hazard = Hazard {
            pos: game.player.bounds().center(),
            speed: 0.0,
            radius: 20.0,
            original_radius: 20.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            tier: 0,
            hits_required: 1,
            hits_taken: 0,
        };
        game.hazards.push(hazard);

        // Mid terminal flash, player still falling
        session.run_until(&clock, 4100.0, FRAME_MS);
        assert!(matches!(session.game().phase, GamePhase::Dying { .. }));
        assert!(session.game().player.is_dying());
        assert!(session.scheduler().pending_frame().is_some());

        session.exit();
        assert!(session.scheduler().is_quiet());
        assert!(!session.has_pending_work());
        assert_eq!(session.game().phase, GamePhase::Idle);
        assert!(session.game().flash().is_none());
        assert!(!session.game().player.is_dying());
        assert!(!session.game().wants_frame());
        assert_eq!(session.game().entity_count(), 0);

        session.run_until(&clock, 10_000.0, FRAME_MS);
        assert_eq!(session.game().phase, GamePhase::Idle);
        let events = session.game_mut().drain_events();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_restart_resets_lives() {
        let clock = ManualClock::new(0.0);
        let mut session = calm_session();
        session.start();
        session.run_until(&clock, 4000.0, FRAME_MS);
        session.game_mut().lives = 2;

        session.restart();
        session.run_until(&clock, 8000.0, FRAME_MS);
        assert!(session.game().is_running());
        assert_eq!(session.game().lives, 5);
    }

    #[test]
    fn test_same_seed_same_session() {
        let run = || {
            let clock = ManualClock::new(0.0);
            let mut session = session();
            session.start();
            session.run_until(&clock, 4000.0, FRAME_MS);
            session.game_mut().press_shoot(Vec2::new(100.0, 50.0));
            session.run_until(&clock, 30_000.0, FRAME_MS);
            session
        };
        let a = run();
        let b = run();
        assert_eq!(a.game().hazards, b.game().hazards);
        assert_eq!(a.game().lives, b.game().lives);
        assert_eq!(a.game().phase, b.game().phase);
        assert_eq!(a.game().player, b.game().player);
    }
}

//! Frame requests and countdown timers
//!
//! The session never talks to `requestAnimationFrame` or `setInterval`
//! directly. It asks a `Scheduler` for a handle and later receives a
//! `Wakeup` carrying that handle back; a wakeup whose handle was cancelled
//! in the meantime is stale and gets dropped by the session.

/// Pending animation-frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Pending interval or timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub i32);

/// What a timer is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Repeating countdown beat
    CountdownStep,
    /// One-shot delay between the last beat and play
    CountdownGo,
}

/// A scheduled callback coming due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    Frame(FrameHandle),
    Timer(TimerHandle, TimerKind),
}

pub trait Scheduler {
    /// Ask for one animation frame. `None` if the platform refused.
    fn request_frame(&mut self) -> Option<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
    fn set_interval(&mut self, kind: TimerKind, period_ms: u32) -> Option<TimerHandle>;
    fn set_timeout(&mut self, kind: TimerKind, delay_ms: u32) -> Option<TimerHandle>;
    /// Cancel an interval or a timeout
    fn clear_timer(&mut self, handle: TimerHandle);
}

#[derive(Debug, Clone)]
struct ManualTimer {
    handle: TimerHandle,
    kind: TimerKind,
    due_ms: f64,
    period_ms: Option<f64>,
}

/// Scheduler driven by explicit time steps, for tests and headless runs
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: f64,
    next_id: i32,
    frame: Option<FrameHandle>,
    timers: Vec<ManualTimer>,
    frames_requested: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    /// Total frames requested so far
    pub fn frames_requested(&self) -> u64 {
        self.frames_requested
    }

    /// Nothing pending at all
    pub fn is_quiet(&self) -> bool {
        self.frame.is_none() && self.timers.is_empty()
    }

    /// Move time forward to `now_ms` and collect everything that came due,
    /// in due order, each with the time it fired at. A pending frame fires
    /// last, at `now_ms`.
    ///
    /// Timers set while the returned wakeups are dispatched are timed from
    /// `now_ms`; use `pop_timer` to dispatch one at a time instead.
    pub fn advance_to(&mut self, now_ms: f64) -> Vec<(f64, Wakeup)> {
        let mut fired = Vec::new();
        while let Some(due) = self.pop_timer(now_ms) {
            fired.push(due);
        }
        if let Some(frame) = self.take_frame(now_ms) {
            fired.push((now_ms, frame));
        }
        fired
    }

    /// Fire the earliest timer due by `until_ms`, moving the scheduler's time
    /// to its due time so timers set by its callback are timed from there.
    pub fn pop_timer(&mut self, until_ms: f64) -> Option<(f64, Wakeup)> {
        let i = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms))
            .map(|(i, _)| i)?;

        let timer = &mut self.timers[i];
        let due_ms = timer.due_ms;
        let wakeup = Wakeup::Timer(timer.handle, timer.kind);
        let period = timer.period_ms;
        match period {
            Some(period) => timer.due_ms += period,
            None => {
                self.timers.remove(i);
            }
        }
        self.now_ms = self.now_ms.max(due_ms);
        Some((due_ms, wakeup))
    }

    /// Move time to `now_ms` and hand out the pending frame, if any
    pub fn take_frame(&mut self, now_ms: f64) -> Option<Wakeup> {
        self.now_ms = self.now_ms.max(now_ms);
        self.frame.take().map(Wakeup::Frame)
    }

    fn next_handle(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn add_timer(&mut self, kind: TimerKind, delay_ms: u32, repeat: bool) -> TimerHandle {
        let handle = TimerHandle(self.next_handle());
        // Zero-period intervals would fire forever within one step
        let delay = f64::from(delay_ms.max(1));
        self.timers.push(ManualTimer {
            handle,
            kind,
            due_ms: self.now_ms + delay,
            period_ms: repeat.then_some(delay),
        });
        handle
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let handle = FrameHandle(self.next_handle());
        self.frame = Some(handle);
        self.frames_requested += 1;
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.frame == Some(handle) {
            self.frame = None;
        }
    }

    fn set_interval(&mut self, kind: TimerKind, period_ms: u32) -> Option<TimerHandle> {
        Some(self.add_timer(kind, period_ms, true))
    }

    fn set_timeout(&mut self, kind: TimerKind, delay_ms: u32) -> Option<TimerHandle> {
        Some(self.add_timer(kind, delay_ms, false))
    }

    fn clear_timer(&mut self, handle: TimerHandle) {
        self.timers.retain(|t| t.handle != handle);
    }
}

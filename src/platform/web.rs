//! Browser scheduler: `requestAnimationFrame`, `setInterval`, `setTimeout`
//!
//! Every callback is routed back through one `on_wake` sink with the handle it
//! was created under, so the owner can tell live callbacks from stale ones.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::scheduler::{FrameHandle, Scheduler, TimerHandle, TimerKind, Wakeup};

pub type WakeSink = Rc<dyn Fn(Wakeup)>;

pub struct BrowserScheduler {
    window: web_sys::Window,
    on_wake: WakeSink,
    /// Interval closures must outlive their registration; dropped on clear
    intervals: HashMap<i32, Closure<dyn FnMut()>>,
}

impl BrowserScheduler {
    pub fn new(window: web_sys::Window, on_wake: WakeSink) -> Self {
        Self {
            window,
            on_wake,
            intervals: HashMap::new(),
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let id = Rc::new(Cell::new(0));
        let on_wake = self.on_wake.clone();
        let callback_id = id.clone();
        let closure = Closure::once_into_js(move |_time: f64| {
            on_wake(Wakeup::Frame(FrameHandle(callback_id.get())));
        });
        match self.window.request_animation_frame(closure.unchecked_ref()) {
            Ok(handle) => {
                id.set(handle);
                Some(FrameHandle(handle))
            }
            Err(err) => {
                log::warn!("requestAnimationFrame failed: {:?}", err);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
    }

    fn set_interval(&mut self, kind: TimerKind, period_ms: u32) -> Option<TimerHandle> {
        let id = Rc::new(Cell::new(0));
        let on_wake = self.on_wake.clone();
        let callback_id = id.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            on_wake(Wakeup::Timer(TimerHandle(callback_id.get()), kind));
        });
        let handle = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period_ms as i32,
            )
            .ok()?;
        id.set(handle);
        self.intervals.insert(handle, closure);
        Some(TimerHandle(handle))
    }

    fn set_timeout(&mut self, kind: TimerKind, delay_ms: u32) -> Option<TimerHandle> {
        let id = Rc::new(Cell::new(0));
        let on_wake = self.on_wake.clone();
        let callback_id = id.clone();
        let closure = Closure::once_into_js(move || {
            on_wake(Wakeup::Timer(TimerHandle(callback_id.get()), kind));
        });
        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.unchecked_ref(),
                delay_ms as i32,
            )
            .ok()?;
        id.set(handle);
        Some(TimerHandle(handle))
    }

    fn clear_timer(&mut self, handle: TimerHandle) {
        if self.intervals.remove(&handle.0).is_some() {
            self.window.clear_interval_with_handle(handle.0);
        } else {
            self.window.clear_timeout_with_handle(handle.0);
        }
    }
}

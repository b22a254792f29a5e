//! Toasté arcade entry point
//!
//! On wasm32 this wires the arcade into the product page: logo activator,
//! canvas, input, HUD and sound. Natively it plays a seeded headless session
//! and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent, Window};

    use toaste_arcade::audio::{AudioPlayer, SoundEffect};
    use toaste_arcade::mascot::{self, Activator, FlightFrame, IdleKeyframe, IdleMotion, MascotPose, ToastFlight};
    use toaste_arcade::platform::web::{BrowserScheduler, WakeSink};
    use toaste_arcade::platform::{PerformanceClock, Wakeup, surface_point, surface_size};
    use toaste_arcade::renderer::{CanvasRenderer, HudView, build_scene};
    use toaste_arcade::session::Session;
    use toaste_arcade::settings::Settings;
    use toaste_arcade::sim::{Clock, GameEvent, GameState};
    use toaste_arcade::tuning::Tuning;

    const PLAYER_SPRITE: &str = "/assets/graphics/toaster.svg";
    const TOAST_SPRITE: &str = "/assets/graphics/toast.svg";
    /// Main content fades out for this long before the overlay appears
    const OVERLAY_DELAY_MS: i32 = 1000;

    /// Game instance: session plus everything it draws to or plays through
    struct Game {
        session: Session<BrowserScheduler>,
        renderer: CanvasRenderer,
        clock: PerformanceClock,
        audio: AudioPlayer,
        settings: Settings,
        window: Window,
        document: Document,
    }

    impl Game {
        fn create(window: &Window, document: &Document) -> Option<Rc<RefCell<Game>>> {
            let canvas: HtmlCanvasElement = document.get_element_by_id("game-canvas")?.dyn_into().ok()?;
            let renderer = CanvasRenderer::new(canvas, PLAYER_SPRITE, TOAST_SPRITE)?;
            let settings = Settings::load();
            let tuning = load_tuning(document);
            let seed = js_sys::Date::now() as u64;
            log::info!("Game initialized with seed: {}", seed);

            let game = Rc::new_cyclic(|weak: &std::rc::Weak<RefCell<Game>>| {
                let weak = weak.clone();
                let sink: WakeSink = Rc::new(move |wakeup| {
                    if let Some(game) = weak.upgrade() {
                        Game::wake(&game, wakeup);
                    }
                });
                let state = GameState::new(seed, tuning, Vec2::ONE);
                RefCell::new(Game {
                    session: Session::new(state, BrowserScheduler::new(window.clone(), sink)),
                    renderer,
                    clock: PerformanceClock::new(),
                    audio: AudioPlayer::new(settings.muted),
                    settings,
                    window: window.clone(),
                    document: document.clone(),
                })
            });

            {
                let mut g = game.borrow_mut();
                g.resize();
                g.update_sound_toggle();
                g.update_hud();
            }
            Some(game)
        }

        /// Scheduler callback: advance the session, react to what happened
        fn wake(game: &Rc<RefCell<Game>>, wakeup: Wakeup) {
            let mut g = game.borrow_mut();
            let now = g.clock.now_ms();
            let simulated = g.session.on_wake(wakeup, now);
            g.handle_events();
            if simulated {
                g.render();
                g.update_hud();
            }
        }

        fn handle_events(&mut self) {
            let events = self.session.game_mut().drain_events();
            for event in events {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
                match event {
                    GameEvent::CountdownStarted => {
                        set_display(&self.document, "countdown-screen", "flex");
                        let ticks = self.session.game().tuning.countdown_ticks;
                        set_text(&self.document, "countdown-number", &ticks.to_string());
                    }
                    GameEvent::CountdownTick { remaining } => {
                        let label = if remaining > 0 {
                            remaining.to_string()
                        } else {
                            "POLO!".to_string()
                        };
                        set_text(&self.document, "countdown-number", &label);
                    }
                    GameEvent::Go => {
                        set_display(&self.document, "countdown-screen", "none");
                        self.resize();
                        if let Some(ui) = self.document.get_element_by_id("game-ui") {
                            let _ = ui.class_list().add_1("fade-in");
                        }
                    }
                    GameEvent::GameOver { score } => {
                        set_text(&self.document, "final-score", &score.to_string());
                        set_hidden(&self.document, "game-over-screen", false);
                    }
                    _ => {}
                }
            }
        }

        fn render(&self) {
            let scene = build_scene(self.session.game(), self.renderer.assets());
            self.renderer.draw(&scene);
        }

        /// Score and remaining lives, from the first frame of play on
        fn update_hud(&self) {
            let Some(hud) = HudView::of(self.session.game()) else {
                return;
            };
            set_text(&self.document, "score-value", &hud.score.to_string());

            let Ok(icons) = self.document.query_selector_all(".toast-live-icon") else {
                return;
            };
            for index in 0..icons.length() {
                let Some(icon) = icons.get(index).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                let classes = icon.class_list();
                if hud.is_life_lost(index) {
                    let _ = classes.add_1("lost");
                } else {
                    let _ = classes.remove_1("lost");
                }
            }
        }

        fn resize(&mut self) {
            let Some(container) = self.document.get_element_by_id("game-container") else {
                return;
            };
            let viewport = Vec2::new(
                self.window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32,
                self.window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32,
            );
            let container_size = Vec2::new(container.client_width() as f32, container.client_height() as f32);
            let size = surface_size(container_size, viewport);
            self.renderer.resize(size.x as u32, size.y as u32);
            self.session.game_mut().resize(size);
        }

        fn start(&mut self) {
            self.session.start();
            self.handle_events();
        }

        fn restart(&mut self) {
            set_hidden(&self.document, "game-over-screen", true);
            self.session.restart();
            self.handle_events();
        }

        fn exit(&mut self) {
            self.session.exit();
            set_hidden(&self.document, "game-over-screen", true);
            set_hidden(&self.document, "game-overlay", true);
            if let Ok(Some(main)) = self.document.query_selector(".main-content") {
                let _ = main.class_list().remove_1("fade-out");
            }
            if let Some(body) = self.document.body() {
                let _ = body.class_list().remove_1("game-active");
            }
        }

        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.settings.save();
            self.audio.set_muted(muted);
            self.update_sound_toggle();
        }

        fn update_sound_toggle(&self) {
            let Some(button) = self
                .document
                .get_element_by_id("sound-toggle")
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            else {
                return;
            };
            let label = if self.settings.muted { "Sound off" } else { "Sound on" };
            let classes = button.class_list();
            if self.settings.muted {
                let _ = classes.add_1("muted");
            } else {
                let _ = classes.remove_1("muted");
            }
            let _ = button.set_attribute("aria-label", label);
            button.set_title(label);
        }

        /// Pointer position in canvas pixels
        fn to_surface(&self, client_x: i32, client_y: i32) -> Vec2 {
            let rect = self.renderer.canvas().get_bounding_client_rect();
            surface_point(
                Vec2::new(client_x as f32, client_y as f32),
                Vec2::new(rect.left() as f32, rect.top() as f32),
            )
        }
    }

    /// Optional balance override embedded in the page as JSON
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("game-tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning override");
                tuning
            }
            Err(err) => {
                log::warn!("Invalid tuning override, using defaults: {}", err);
                Tuning::default()
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    fn set_display(document: &Document, id: &str, display: &str) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property("display", display);
        }
    }

    /// Inline style for SVG and HTML elements alike
    fn set_style(el: &Element, css: &str) {
        let _ = el.set_attribute("style", css);
    }

    fn after(window: &Window, delay_ms: i32, f: impl FnOnce() + 'static) {
        let closure = Closure::once_into_js(f);
        let _ = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(closure.unchecked_ref(), delay_ms);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Toasté arcade starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        setup_eye_tracking(&document);

        let Some(game) = Game::create(&window, &document) else {
            log::warn!("No game canvas on this page, arcade disabled");
            return;
        };

        setup_input_handlers(&game);
        setup_buttons(&document, &game);
        setup_resize(&window, &game);
        setup_logo(&window, &document, &game);

        log::info!("Toasté arcade ready");
    }

    fn setup_input_handlers(game: &Rc<RefCell<Game>>) {
        let canvas = game.borrow().renderer.canvas().clone();

        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = g.to_surface(event.client_x(), event.client_y());
                g.session.game_mut().pointer_moved(pos);
            });
            let _ = canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down starts a throw
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = g.to_surface(event.client_x(), event.client_y());
                g.session.game_mut().press_shoot(pos);
            });
            let _ = canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.game_mut().release_shoot();
            });
            let _ = canvas.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if !g.session.game().is_running() {
                    return;
                }
                if let Some(touch) = event.touches().get(0) {
                    let pos = g.to_surface(touch.client_x(), touch.client_y());
                    g.session.game_mut().press_shoot(pos);
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if !g.session.game().is_running() {
                    return;
                }
                if let Some(touch) = event.touches().get(0) {
                    let pos = g.to_surface(touch.client_x(), touch.client_y());
                    g.session.game_mut().pointer_moved(pos);
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().session.game_mut().release_shoot();
            });
            let _ = canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: &Rc<RefCell<Game>>) {
        let buttons: [(&str, fn(&mut Game)); 3] = [
            ("restart-game", Game::restart),
            ("exit-game", Game::exit),
            ("sound-toggle", Game::toggle_mute),
        ];
        for (id, action) in buttons {
            let Some(button) = document.get_element_by_id(id) else {
                log::warn!("Missing #{} button", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                action(&mut game.borrow_mut());
            });
            let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(window: &Window, game: &Rc<RefCell<Game>>) {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.resize();
            if g.session.game().wants_frame() {
                g.render();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // === Logo mascot ===

    struct Logo {
        activator: Activator,
        idle: IdleMotion,
        rng: Pcg32,
        clock: PerformanceClock,
    }

    fn setup_logo(window: &Window, document: &Document, game: &Rc<RefCell<Game>>) {
        let Ok(Some(container)) = document.query_selector(".logo-container") else {
            return;
        };
        let logo = Rc::new(RefCell::new(Logo {
            activator: Activator::new(),
            idle: IdleMotion::new(),
            rng: Pcg32::seed_from_u64(js_sys::Date::now() as u64 ^ 0x70a57e),
            clock: PerformanceClock::new(),
        }));

        for event_name in ["mousedown", "touchstart"] {
            let logo = logo.clone();
            let game = game.clone();
            let window = window.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                on_logo_press(&window, &document, &logo, &game);
            });
            let _ = container.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Hovering the mascot or the logo holds the idle movements
        let hover_targets = [document.get_element_by_id("toaster"), Some(container.clone())];
        for target in hover_targets.into_iter().flatten() {
            for (event_name, hovered) in [("mouseenter", true), ("mouseleave", false)] {
                let logo = logo.clone();
                let window = window.clone();
                let document = document.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let resume = logo.borrow_mut().idle.set_hovered(hovered);
                    if resume {
                        resume_idle(&window, &document, &logo);
                    }
                });
                let _ = target.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        let start_window = window.clone();
        let document = document.clone();
        after(window, mascot::IDLE_START_DELAY_MS as i32, move || {
            resume_idle(&start_window, &document, &logo);
        });
    }

    fn on_logo_press(window: &Window, document: &Document, logo: &Rc<RefCell<Logo>>, game: &Rc<RefCell<Game>>) {
        let (outcome, flight) = {
            let mut l = logo.borrow_mut();
            let now = l.clock.now_ms();
            let outcome = l.activator.click(now);
            if outcome.opened_window {
                l.idle.start_click_window();
            }
            let start = document
                .query_selector(".logo-container")
                .ok()
                .flatten()
                .map(|el| {
                    let rect = el.get_bounding_client_rect();
                    Vec2::new(
                        (rect.left() + rect.width() / 2.0) as f32,
                        (rect.top() + rect.height() / 2.0) as f32,
                    )
                })
                .unwrap_or_default();
            let viewport_height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
            let Logo { rng, .. } = &mut *l;
            let flight = ToastFlight::launch(start, viewport_height, now, rng);
            (outcome, flight)
        };

        if let Some(mascot) = document.get_element_by_id("toaster") {
            play_keyframes(window, mascot, outcome.keyframes);
        }
        if outcome.pulse_logo {
            pulse_logo(window, document);
        }
        blink(window, document);
        launch_flight(document, flight, logo.borrow().clock.clone());
        game.borrow_mut().audio.play(SoundEffect::Throw);

        if outcome.activated {
            let resume = logo.borrow_mut().idle.end_click_window();
            if resume {
                resume_idle(window, document, logo);
            }
            activate_game(window, document, game);
            return;
        }

        // Deflate the mascot if the streak lapses
        let logo = logo.clone();
        let document = document.clone();
        let expiry_window = window.clone();
        after(window, mascot::CLICK_WINDOW_MS as i32 + 1, move || {
            let (expired, resume) = {
                let mut l = logo.borrow_mut();
                let now = l.clock.now_ms();
                if l.activator.expire(now) {
                    (true, l.idle.end_click_window())
                } else {
                    (false, false)
                }
            };
            if expired {
                if let Some(mascot) = document.get_element_by_id("toaster") {
                    apply_pose(&mascot, &MascotPose::rest());
                }
            }
            if resume {
                resume_idle(&expiry_window, &document, &logo);
            }
        });
    }

    /// Book the next idle movement, if the mascot is free to move
    fn resume_idle(window: &Window, document: &Document, logo: &Rc<RefCell<Logo>>) {
        let booked = {
            let mut l = logo.borrow_mut();
            let Logo { idle, rng, .. } = &mut *l;
            idle.schedule(rng)
        };
        let Some((ticket, delay_ms)) = booked else {
            return;
        };
        let inner_window = window.clone();
        let document = document.clone();
        let logo = logo.clone();
        after(window, delay_ms as i32, move || {
            play_idle(&inner_window, &document, &logo, ticket);
        });
    }

    fn play_idle(window: &Window, document: &Document, logo: &Rc<RefCell<Logo>>, ticket: u64) {
        let started = {
            let mut l = logo.borrow_mut();
            let Logo { idle, rng, .. } = &mut *l;
            idle.begin(ticket, rng)
        };
        let Some((movement, frames)) = started else {
            return;
        };
        log::debug!("Mascot idle movement: {:?}", movement);
        if let Some(mascot) = document.get_element_by_id("toaster") {
            play_idle_frames(window, mascot, logo.clone(), frames, 0);
        }

        let inner_window = window.clone();
        let document = document.clone();
        let logo = logo.clone();
        after(window, mascot::IDLE_SETTLE_MS as i32, move || {
            let next = logo.borrow_mut().idle.finish();
            if next {
                resume_idle(&inner_window, &document, &logo);
            }
        });
    }

    /// Step through an idle movement; a hover freezes it where it is
    fn play_idle_frames(window: &Window, el: Element, logo: Rc<RefCell<Logo>>, frames: Vec<IdleKeyframe>, index: usize) {
        if logo.borrow().idle.is_hovered() {
            return;
        }
        let Some(frame) = frames.get(index) else {
            return;
        };
        set_style(
            &el,
            &format!(
                "transform-origin: center center; transition: {}; transform: {}",
                mascot::IDLE_TRANSITION,
                frame.css_transform()
            ),
        );
        if index + 1 >= frames.len() {
            return;
        }
        let hold_ms = frame.hold_ms as i32;
        let inner_window = window.clone();
        after(window, hold_ms, move || {
            play_idle_frames(&inner_window, el, logo, frames, index + 1);
        });
    }

    fn activate_game(window: &Window, document: &Document, game: &Rc<RefCell<Game>>) {
        if let Ok(Some(main)) = document.query_selector(".main-content") {
            let _ = main.class_list().add_1("fade-out");
        }
        if let Some(mascot) = document.get_element_by_id("toaster") {
            apply_pose(&mascot, &MascotPose::rest());
        }

        let game = game.clone();
        let document = document.clone();
        after(window, OVERLAY_DELAY_MS, move || {
            set_hidden(&document, "game-overlay", false);
            if let Some(body) = document.body() {
                let _ = body.class_list().add_1("game-active");
            }
            // start() tears down any previous session first
            game.borrow_mut().start();
        });
    }

    fn apply_pose(el: &Element, pose: &MascotPose) {
        set_style(
            el,
            &format!(
                "transform-origin: center center; transition: {}; transform: {}",
                pose.css_transition(),
                pose.css_transform()
            ),
        );
    }

    fn play_keyframes(window: &Window, el: Element, keyframes: [MascotPose; 3]) {
        let [overshoot, undershoot, settle] = keyframes;
        apply_pose(&el, &overshoot);
        let inner_window = window.clone();
        after(window, overshoot.duration_ms as i32, move || {
            apply_pose(&el, &undershoot);
            after(&inner_window, undershoot.duration_ms as i32, move || {
                apply_pose(&el, &settle);
            });
        });
    }

    fn pulse_logo(window: &Window, document: &Document) {
        let Some(logo) = document
            .query_selector(".logo-container")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let half = mascot::LOGO_PULSE_HALF_MS as i32;
        let style = logo.style();
        let _ = style.set_property("transition", &format!("transform {}ms ease-in-out", 2 * half));
        let _ = style.set_property("transform", &format!("scale({})", mascot::LOGO_PULSE_SCALE));

        let shrink = logo.clone();
        after(window, half, move || {
            let _ = shrink.style().set_property("transform", "scale(1.0)");
        });
        after(window, 2 * half, move || {
            let _ = logo.style().set_property("transition", "");
        });
    }

    fn blink(window: &Window, document: &Document) {
        let (Some(opened), Some(closed)) = (
            document.get_element_by_id("eyes-opened"),
            document.get_element_by_id("eyes-closed"),
        ) else {
            return;
        };
        set_style(&opened, "display: none");
        set_style(&closed, "display: block");
        after(window, mascot::BLINK_MS as i32, move || {
            set_style(&opened, "display: block");
            set_style(&closed, "display: none");
        });
    }

    fn flight_css(frame: &FlightFrame) -> String {
        format!(
            "position: fixed; left: -28px; top: -43px; width: 56px; height: 56px; \
             pointer-events: none; z-index: 10; will-change: transform, opacity; \
             transform: translate3d({}px, {}px, 0) rotate({}deg) scale({}); opacity: {}",
            frame.pos.x, frame.pos.y, frame.rotation_deg, frame.scale, frame.opacity
        )
    }

    fn launch_flight(document: &Document, flight: ToastFlight, clock: PerformanceClock) {
        let Ok(img) = document.create_element("img") else {
            return;
        };
        let _ = img.set_attribute("src", TOAST_SPRITE);
        let _ = img.set_attribute("alt", "toast");
        set_style(&img, &flight_css(&flight.frame(clock.now_ms())));
        let Some(body) = document.body() else {
            return;
        };
        let _ = body.append_child(&img);
        animate_flight(flight, img, clock);
    }

    fn animate_flight(flight: ToastFlight, img: Element, clock: PerformanceClock) {
        let Some(window) = web_sys::window() else {
            img.remove();
            return;
        };
        let closure = Closure::once_into_js(move |_time: f64| {
            let now = clock.now_ms();
            set_style(&img, &flight_css(&flight.frame(now)));
            if flight.is_finished(now) {
                img.remove();
            } else {
                animate_flight(flight, img, clock);
            }
        });
        let _ = window.request_animation_frame(closure.unchecked_ref());
    }

    /// Pupils follow the pointer anywhere on the page
    fn setup_eye_tracking(document: &Document) {
        fn move_eyes(document: &Document, pointer: Vec2) {
            for (eye, socket) in [
                ("eye-left", "eye-container-left"),
                ("eye-right", "eye-container-right"),
            ] {
                let (Some(eye), Some(socket)) =
                    (document.get_element_by_id(eye), document.get_element_by_id(socket))
                else {
                    continue;
                };
                let rect = socket.get_bounding_client_rect();
                let center = Vec2::new(
                    (rect.left() + rect.width() / 2.0) as f32,
                    (rect.top() + rect.height() / 2.0) as f32,
                );
                let size = Vec2::new(rect.width() as f32, rect.height() as f32);
                let offset = mascot::eye_offset(pointer, center, size);
                set_style(
                    &eye,
                    &format!("will-change: transform; transform: translate3d({}px, {}px, 0)", offset.x, offset.y),
                );
            }
        }

        {
            let doc = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                move_eyes(&doc, Vec2::new(event.client_x() as f32, event.client_y() as f32));
            });
            let _ = document.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for event_name in ["touchstart", "touchmove"] {
            let doc = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    move_eyes(&doc, Vec2::new(touch.client_x() as f32, touch.client_y() as f32));
                }
            });
            let _ = document.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Toasté arcade (native) starting...");
    log::info!("The playable build targets wasm32; running a headless session instead");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(7);
    headless_session(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one session with simulated time and a simple aim-at-the-lowest-hazard
/// autopilot.
#[cfg(not(target_arch = "wasm32"))]
fn headless_session(seed: u64) {
    use glam::Vec2;
    use toaste_arcade::platform::ManualScheduler;
    use toaste_arcade::session::Session;
    use toaste_arcade::sim::{Clock, GameEvent, GamePhase, GameState, ManualClock};
    use toaste_arcade::tuning::Tuning;

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const LIMIT_MS: f64 = 180_000.0;

    let clock = ManualClock::new(0.0);
    let game = GameState::new(seed, Tuning::default(), Vec2::new(800.0, 600.0));
    let mut session = Session::new(game, ManualScheduler::new());
    session.start();

    let mut shots = 0;
    let mut destroyed = 0;
    while clock.now_ms() < LIMIT_MS && !matches!(session.game().phase, GamePhase::GameOver { .. }) {
        let target = session
            .game()
            .hazards
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|h| h.pos);
        let game = session.game_mut();
        match target {
            Some(target) if !game.shoot.held => game.press_shoot(target),
            _ => game.release_shoot(),
        }

        let until = clock.now_ms() + FRAME_MS;
        session.run_until(&clock, until, FRAME_MS);

        for event in session.game_mut().drain_events() {
            match event {
                GameEvent::Shot => shots += 1,
                GameEvent::HazardHit { destroyed: true } => destroyed += 1,
                _ => {}
            }
        }
    }

    let game = session.game();
    log::info!(
        "Seed {}: score {} with {} lives left, {} throws, {} hazards destroyed",
        seed,
        game.score,
        game.lives,
        shots,
        destroyed
    );
    println!("✓ Headless session finished: score {}", game.score);
}

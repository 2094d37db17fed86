//! Shooting the Star entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, HtmlSelectElement};

    use shooting_star::audio::{AudioManager, SoundEffect};
    use shooting_star::consts::*;
    use shooting_star::facts;
    use shooting_star::leaderboard::{Leaderboard, LeaderboardEntry, SortKey};
    use shooting_star::renderer::SdfRenderState;
    use shooting_star::session;
    use shooting_star::settings::{QualityPreset, Settings};
    use shooting_star::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<SdfRenderState>,
        settings: Settings,
        leaderboard: Leaderboard,
        audio: AudioManager,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Track phase for end-of-level handling
        last_phase: GamePhase,
    }

    impl Game {
        fn new(seed: u64, width: f32, height: f32) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);

            Self {
                state: GameState::new(seed, width, height),
                render_state: None,
                settings,
                leaderboard: Leaderboard::load(),
                audio,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Ready,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.fire = false;
                self.input.pause = false;
            }

            self.drain_events();

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = time - oldest;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            // End-of-level handling on phase transitions
            let current_phase = self.state.phase;
            if current_phase != self.last_phase {
                if let GamePhase::Ended { winner } = current_phase {
                    self.on_level_end(winner);
                }
                self.last_phase = current_phase;
            }
        }

        /// Play queued sim events
        fn drain_events(&mut self) {
            for event in self.state.events.drain(..) {
                let effect = match event {
                    GameEvent::Fired => SoundEffect::Fire,
                    GameEvent::StarHit { .. } => SoundEffect::StarHit,
                    GameEvent::LevelWon => SoundEffect::LevelWin,
                    GameEvent::LevelLost => SoundEffect::LevelLose,
                };
                self.audio.play(effect);
            }
        }

        /// Fill the fact modal and submit the run to the leaderboard
        fn on_level_end(&mut self, winner: bool) {
            let state = &self.state;
            log::info!(
                "Level {} ended: winner={} score={} accuracy={}%",
                state.level,
                winner,
                state.score,
                state.accuracy()
            );

            let fact = facts::fact_for_level(state.level);
            let document = web_sys::window().unwrap().document().unwrap();

            set_text(&document, "fact-emoji", fact.emoji);
            set_text(&document, "fact-constellation", fact.constellation);
            set_text(&document, "fact-text", fact.fact);
            set_text(&document, "final-score", &state.score.to_string());
            set_text(
                &document,
                "final-accuracy",
                &format!("{}%", state.accuracy()),
            );
            set_text(
                &document,
                "final-target",
                &format!(
                    "Target: {} points | Required: {}% accuracy",
                    state.required_score(),
                    shooting_star::sim::MIN_ACCURACY_PCT
                ),
            );
            if winner {
                set_text(&document, "result-title", "Level Complete!");
                set_text(&document, "result-sub", "You're a Star Shooter!");
            } else {
                set_text(&document, "result-title", "Level Failed");
                set_text(&document, "result-sub", "Keep practicing!");
            }
            // Next Level only for winners
            if let Some(btn) = document.get_element_by_id("next-level-btn") {
                let _ = btn.set_attribute("class", if winner { "btn" } else { "btn hidden" });
            }

            // Submit the run
            let player_name = session::current_user()
                .map(|u| u.username)
                .unwrap_or_else(|| "Anonymous".to_string());
            let now = js_sys::Date::new_0();
            let date = format!(
                "{:04}-{:02}-{:02}",
                now.get_full_year(),
                now.get_month() + 1,
                now.get_date()
            );
            let entry = LeaderboardEntry {
                player_name,
                score: state.score,
                accuracy: state.accuracy(),
                level: state.level,
                constellation: fact.constellation.to_string(),
                date,
            };
            if let Some(rank) = self.leaderboard.add_entry(entry) {
                log::info!("New leaderboard entry at rank {}", rank);
                self.leaderboard.save();
                self.audio.play(SoundEffect::HighScore);
            }
            render_leaderboard(&self.leaderboard);
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state, &self.settings, time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            let snapshot = self.state.level_state();
            set_text(&document, "hud-level", &snapshot.level.to_string());
            set_text(&document, "hud-score", &snapshot.score.to_string());
            set_text(&document, "hud-accuracy", &format!("{}%", snapshot.accuracy));
            set_text(
                &document,
                "hud-target",
                &self.state.required_score().to_string(),
            );
            set_text(
                &document,
                "hud-time",
                &(self.state.level_ticks / TICK_RATE).to_string(),
            );

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                } else {
                    el.set_text_content(Some(""));
                }
            }

            // Panels follow the phase
            show_panel(
                &document,
                "start-panel",
                self.state.phase == GamePhase::Ready,
            );
            show_panel(
                &document,
                "pause-menu",
                self.state.phase == GamePhase::Paused,
            );
            show_panel(
                &document,
                "fact-modal",
                matches!(self.state.phase, GamePhase::Ended { .. }),
            );

            if self.state.phase == GamePhase::Ready {
                set_text(
                    &document,
                    "start-level-label",
                    &format!("Start Level {}", self.state.level),
                );
            }
        }
    }

    /// Set text content of an element by id
    fn set_text(document: &web_sys::Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Toggle a panel's visibility
    fn show_panel(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "panel" } else { "panel hidden" });
        }
    }

    /// Rebuild the leaderboard table body from the current filter/sort
    fn render_leaderboard(board: &Leaderboard) {
        let document = web_sys::window().unwrap().document().unwrap();

        let filter = document
            .get_element_by_id("leaderboard-filter")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
            .map(|sel| sel.value())
            .unwrap_or_else(|| "All".to_string());
        let sort = document
            .get_element_by_id("leaderboard-sort")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
            .and_then(|sel| SortKey::from_str(&sel.value()))
            .unwrap_or_default();

        let constellation = if filter == "All" {
            None
        } else {
            Some(filter.as_str())
        };

        let mut rows: Vec<&LeaderboardEntry> = board.sorted_by(sort);
        rows.retain(|e| constellation.is_none_or(|c| e.constellation == c));

        let mut html = String::new();
        for (i, entry) in rows.iter().enumerate() {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}%</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                i + 1,
                entry.player_name,
                entry.score,
                entry.accuracy,
                entry.level,
                entry.constellation,
                entry.date
            ));
        }

        if let Some(body) = document.get_element_by_id("leaderboard-body") {
            body.set_inner_html(&html);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Shooting the Star starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            client_w as f32,
            client_h as f32,
        )));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = SdfRenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        // Session gate: show login panel until a session exists
        show_session_state(&document);
        render_leaderboard(&game.borrow().leaderboard);

        setup_input_handlers(&canvas, game.clone());
        setup_panel_buttons(game.clone());
        setup_login_panel(game.clone());
        setup_leaderboard_controls(game.clone());
        setup_settings_controls(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame_loop(game);

        log::info!("Shooting the Star running!");
    }

    /// Reflect the stored session in the DOM
    fn show_session_state(document: &web_sys::Document) {
        let signed_in = session::is_authenticated();
        show_panel(document, "login-panel", !signed_in);
        if let Some(user) = session::current_user() {
            set_text(document, "player-name", &user.username);
        } else {
            set_text(document, "player-name", "");
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard held/one-shot state
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    "ArrowUp" => {
                        g.input.fire = true;
                        g.audio.resume();
                    }
                    "Escape" | "p" | "P" => g.input.pause = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer fires through the same path as the keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PointerEvent| {
                let mut g = game.borrow_mut();
                g.input.fire = true;
                g.audio.resume();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_panel_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Start level
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.state.start_level();
                g.last_phase = g.state.phase;
                g.audio.resume();
                log::info!("Level {} started", g.state.level);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Next level (winner only)
        if let Some(btn) = document.get_element_by_id("next-level-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.state.advance_level();
                g.last_phase = g.state.phase;
                log::info!("Advanced to level {}", g.state.level);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Back to the start screen
        if let Some(btn) = document.get_element_by_id("main-menu-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.state.return_to_menu();
                g.last_phase = g.state.phase;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resume from pause
        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.pause = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_login_panel(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        fn input_value(document: &web_sys::Document, id: &str) -> String {
            document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value())
                .unwrap_or_default()
        }

        fn finish_auth(document: &web_sys::Document, user: &session::User) {
            session::set_auth(user);
            show_session_state(document);
        }

        // Login with the demo account
        if let Some(btn) = document.get_element_by_id("login-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                let email = input_value(&document, "login-email");
                let password = input_value(&document, "login-password");
                match session::login(&email, &password) {
                    Ok(user) => finish_auth(&document, &user),
                    Err(err) => set_text(&document, "login-error", &err.to_string()),
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Register a new (local) account
        if let Some(btn) = document.get_element_by_id("register-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                let username = input_value(&document, "login-username");
                let email = input_value(&document, "login-email");
                let password = input_value(&document, "login-password");
                match session::register(&username, &email, &password) {
                    Ok(user) => finish_auth(&document, &user),
                    Err(err) => set_text(&document, "login-error", &err.to_string()),
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // One-click demo login
        if let Some(btn) = document.get_element_by_id("demo-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                match session::login(session::DEMO_EMAIL, session::DEMO_PASSWORD) {
                    Ok(user) => finish_auth(&document, &user),
                    Err(err) => set_text(&document, "login-error", &err.to_string()),
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Sign out, back to the login panel
        if let Some(btn) = document.get_element_by_id("logout-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                session::clear_auth();
                let mut g = game.borrow_mut();
                g.state.return_to_menu();
                g.last_phase = g.state.phase;
                let document = web_sys::window().unwrap().document().unwrap();
                show_session_state(&document);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_leaderboard_controls(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        for id in ["leaderboard-filter", "leaderboard-sort"] {
            if let Some(sel) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    render_leaderboard(&game.borrow().leaderboard);
                });
                let _ =
                    sel.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_settings_controls(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Quality preset selector
        if let Some(sel) = document.get_element_by_id("settings-quality") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(sel) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
                else {
                    return;
                };
                if let Some(preset) = QualityPreset::from_str(&sel.value()) {
                    let mut g = game.borrow_mut();
                    g.settings.quality = preset;
                    g.settings.save();
                }
            });
            let _ =
                sel.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Reduced motion checkbox
        if let Some(el) = document.get_element_by_id("settings-reduced-motion") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                let mut g = game.borrow_mut();
                g.settings.reduced_motion = input.checked();
                g.settings.save();
            });
            let _ = el.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Unmute on focus
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame_loop(game: Rc<RefCell<Game>>) {
        let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let starter = callback.clone();

        *starter.borrow_mut() = Some(Closure::new(move |time: f64| {
            {
                let mut g = game.borrow_mut();
                let dt = if g.last_time > 0.0 {
                    ((time - g.last_time) / 1000.0) as f32
                } else {
                    0.0
                };
                g.last_time = time;
                g.update(dt, time);
                g.render(time);
                g.update_hud();
            }
            let window = web_sys::window().unwrap();
            let _ = window.request_animation_frame(
                callback.borrow().as_ref().unwrap().as_ref().unchecked_ref(),
            );
        }));

        let window = web_sys::window().unwrap();
        let _ = window
            .request_animation_frame(starter.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Shooting the Star (native) starting...");
    log::info!("Native mode has no renderer - run with `trunk serve` for the web version");

    println!("\nRunning scoring smoke test...");
    smoke_test_scoring();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_test_scoring() {
    use shooting_star::sim::{compute_accuracy, is_winner, required_score};

    assert_eq!(required_score(1), 10);
    assert_eq!(required_score(5), 50);
    assert_eq!(compute_accuracy(3, 4), 75);
    assert_eq!(compute_accuracy(0, 0), 100);
    assert!(is_winner(10, 60, 1));
    assert!(!is_winner(10, 59, 1));
    println!("✓ Scoring rules check out!");
}

//! Escapae entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, HtmlInputElement};

    use escapae::audio::{AudioManager, SoundEffect};
    use escapae::highscores::{self, DEFAULT_ENDPOINT, HighScoreBoard};
    use escapae::renderer::CanvasRenderer;
    use escapae::settings::Settings;
    use escapae::sim::{Arena, Direction, GameEvent, GamePhase, GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        audio: AudioManager,
        settings: Settings,
        scores: HighScoreBoard,
        input: TickInput,
        idle_mode: bool,
        last_time: f64,
    }

    impl Game {
        /// Run one simulation tick; returns a score to submit if the game just ended
        fn update(&mut self, dt_ms: f64) -> Option<u64> {
            let mut input = std::mem::take(&mut self.input);
            input.idle_mode = self.idle_mode;
            tick(&mut self.state, &input, dt_ms);

            let mut submit = None;
            for event in self.state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
                match event {
                    GameEvent::GameStarted => {
                        self.scores.reset_for_new_game();
                        self.audio.start_music();
                    }
                    GameEvent::GameOver { score } => {
                        self.audio.stop_music();
                        if self.scores.begin_submission() {
                            submit = Some(score);
                        }
                    }
                    _ => {}
                }
            }
            submit
        }

        fn render(&self) {
            self.renderer
                .render(&self.state, &self.settings, &self.scores);
        }

        /// Show on-screen controls only while they do something
        fn update_controls(&self, document: &Document) {
            let playing = self.state.phase == GamePhase::Playing;
            let active = self.state.is_running();
            set_display(document, "startBtn", self.state.phase == GamePhase::Start, "block");
            set_display(document, "pauseButton", active, "block");
            set_display(document, "settingsMenu", playing && self.state.paused, "flex");
            if let Some(controls) = document
                .query_selector(".controls")
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let _ = controls
                    .style()
                    .set_property("display", if active { "grid" } else { "none" });
            }
        }
    }

    fn set_display(document: &Document, id: &str, visible: bool, shown: &str) {
        let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let _ = el
            .style()
            .set_property("display", if visible { shown } else { "none" });
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Escapae starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let arena = Arena::new(canvas.width() as f32, canvas.height() as f32);
        let seed = js_sys::Date::now() as u64;
        let renderer = CanvasRenderer::new(&canvas)?;

        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(seed, arena),
            renderer,
            audio: AudioManager::new(),
            settings: Settings::default(),
            scores: HighScoreBoard::new(),
            input: TickInput::default(),
            idle_mode: false,
            last_time: 0.0,
        }));
        log::info!(
            "Game initialized with seed {} on a {}x{} canvas",
            seed,
            arena.width,
            arena.height
        );

        fetch_global_high_score(game.clone());

        setup_keyboard(game.clone());
        setup_buttons(game.clone());
        setup_settings_menu(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Escapae running!");
        Ok(())
    }

    fn fetch_global_high_score(game: Rc<RefCell<Game>>) {
        wasm_bindgen_futures::spawn_local(async move {
            let result = highscores::fetch_high_score(DEFAULT_ENDPOINT).await;
            let best = game
                .borrow_mut()
                .scores
                .resolve_fetch(result.map_err(|e| format!("{e:?}")));
            log::info!("Global high score: {best}");
        });
    }

    fn submit_score(game: Rc<RefCell<Game>>, score: u64) {
        wasm_bindgen_futures::spawn_local(async move {
            let result = highscores::submit_high_score(DEFAULT_ENDPOINT, score).await;
            game.borrow_mut()
                .scores
                .resolve_submit(result.map_err(|e| format!("{e:?}")), score);
        });
    }

    fn direction_for_key(key: &str) -> Option<Direction> {
        match key {
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            _ => None,
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut g = game.borrow_mut();
            if event.code() == "Space" {
                event.prevent_default();
                match g.state.phase {
                    GamePhase::Start => {
                        g.audio.resume();
                        g.input.start = true;
                    }
                    GamePhase::Playing => g.input.pause = true,
                    GamePhase::GameOver => {}
                }
                return;
            }
            let key = event.key();
            if let Some(dir) = direction_for_key(&key) {
                event.prevent_default();
                g.input.direction = Some(dir);
                return;
            }
            match key.as_str() {
                "i" | "I" => {
                    g.idle_mode = !g.idle_mode;
                    log::info!("Idle mode: {}", g.idle_mode);
                }
                "m" | "M" => {
                    g.settings.toggle_mute();
                    let settings = g.settings.clone();
                    g.audio.apply_settings(&settings);
                }
                "t" | "T" => log::info!("Current high score: {}", g.scores.global),
                _ => {}
            }
        });
        let _ = document
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(document: &Document, id: &str, game: Rc<RefCell<Game>>, f: fn(&mut Game)) {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("Missing #{id}, button disabled");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            f(&mut game.borrow_mut());
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        on_click(&document, "leftBtn", game.clone(), |g| {
            g.input.direction = Some(Direction::Left)
        });
        on_click(&document, "rightBtn", game.clone(), |g| {
            g.input.direction = Some(Direction::Right)
        });
        on_click(&document, "upBtn", game.clone(), |g| {
            g.input.direction = Some(Direction::Up)
        });
        on_click(&document, "downBtn", game.clone(), |g| {
            g.input.direction = Some(Direction::Down)
        });
        on_click(&document, "startBtn", game.clone(), |g| {
            g.audio.resume();
            g.input.start = true;
        });
        on_click(&document, "pauseButton", game.clone(), |g| g.input.pause = true);
        on_click(&document, "resumeBtn", game, |g| g.input.pause = true);
    }

    /// Volume sliders and the debug label checkbox
    fn setup_settings_menu(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let inputs: [(&str, &str, fn(&mut Settings, &HtmlInputElement)); 3] = [
            ("sfxSlider", "input", |s, el| {
                s.sfx_volume = el.value().parse().unwrap_or(s.sfx_volume)
            }),
            ("volumeSlider", "input", |s, el| {
                s.music_volume = el.value().parse().unwrap_or(s.music_volume)
            }),
            ("debugToggle", "change", |s, el| s.show_ai_labels = el.checked()),
        ];
        for (id, event_name, apply) in inputs {
            let Some(el) = document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                log::warn!("Missing #{id}, setting unavailable");
                continue;
            };
            let game = game.clone();
            let target = el.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                apply(&mut g.settings, &target);
                let settings = g.settings.clone();
                g.audio.apply_settings(&settings);
            });
            let _ =
                el.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Visibility change (tab switch, minimize)
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing && !g.state.paused {
                    g.input.pause = true;
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let submit = {
            let mut g = game.borrow_mut();

            let dt_ms = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                0.0
            };
            g.last_time = time;

            let submit = g.update(dt_ms);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_controls(&document);
            }
            submit
        };

        if let Some(score) = submit {
            submit_score(game.clone(), score);
        }
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

/// Headless demo: let the autopilot play one seeded game and log the result
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use escapae::Tuning;
    use escapae::sim::{Arena, GameEvent, GamePhase, GameState, TickInput, tick};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Escapae (native) starting headless autopilot run...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let tuning = match args.next().map(std::fs::read_to_string) {
        Some(Ok(json)) => match Tuning::from_json(&json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring bad tuning file: {e}");
                Tuning::default()
            }
        },
        Some(Err(e)) => {
            log::warn!("Could not read tuning file: {e}");
            Tuning::default()
        }
        None => Tuning::default(),
    };

    let mut state = GameState::with_tuning(seed, Arena::default(), tuning);
    let start = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut state, &start, 0.0);

    let idle = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    const FRAME_MS: f64 = 1000.0 / 60.0;
    // Ten minutes of play at most
    let max_frames = 60 * 60 * 10;
    let mut splits = 0u32;
    let mut merges = 0u32;
    for _ in 0..max_frames {
        tick(&mut state, &idle, FRAME_MS);
        for event in state.drain_events() {
            match event {
                GameEvent::ChaserSplit => splits += 1,
                GameEvent::ChaserMerged => merges += 1,
                _ => {}
            }
        }
        if state.phase != GamePhase::Playing {
            break;
        }
    }

    log::info!(
        "Seed {}: score {} after {:.1}s, {} lives left, {} chasers ({} splits, {} merges), {} mud patches",
        seed,
        state.score,
        state.clock_ms / 1000.0,
        state.player.lives,
        state.chasers.len(),
        splits,
        merges,
        state.mud.len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

//! Neon Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent};

    use neon_runner::consts::SIM_DT;
    use neon_runner::persistence::{KeyValueStore, LocalStore, MemoryStore};
    use neon_runner::platform::InputEvent;
    use neon_runner::renderer::{RenderState, Scene};
    use neon_runner::sim::{GameEvent, Viewport};
    use neon_runner::Game;

    /// Browser-side wrapper: session, renderer and frame timing
    struct App {
        game: Game,
        scene: Scene,
        render_state: Option<RenderState>,
        last_time: f64,
    }

    impl App {
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = self.scene.build(&self.game.state);
            match render_state.render(vertices) {
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

        /// Forward simulation events to the DOM
        fn update_hud(&mut self, document: &Document) {
            for event in self.game.drain_events() {
                match event {
                    GameEvent::RunStarted => set_visible(document, "menu", false),
                    GameEvent::ScoreChanged(score) => {
                        set_text(document, "hud-score", &format!("Score: {}", score.floor()));
                    }
                    GameEvent::NewBestScore(best) => {
                        set_text(document, "hud-best", &format!("Best: {best}"));
                    }
                    GameEvent::Died => {}
                    GameEvent::GameOver { score, best } => {
                        set_text(document, "final-score", &score.floor().to_string());
                        set_text(document, "hud-best", &format!("Best: {best}"));
                        set_visible(document, "menu", true);
                    }
                }
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Size the backing store in device pixels; the world maps 1:1 onto it
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    fn open_store() -> Box<dyn KeyValueStore> {
        match LocalStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("localStorage unavailable ({e}); progress will not be saved");
                Box::new(MemoryStore::new())
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger init failed: {e}").into());
        }

        log::info!("Neon Runner starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::error!("no document");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("no #canvas element");
            return;
        };

        let (width, height) = fit_canvas(&window, &canvas);

        let seed = js_sys::Date::now() as u64;
        let viewport = Viewport::new(width as f32, height as f32);
        let app = Rc::new(RefCell::new(App {
            game: Game::new(seed, viewport, open_store()),
            scene: Scene::new(seed),
            render_state: None,
            last_time: 0.0,
        }));
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {e}");
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {e}");
                return;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {e}");
                return;
            }
        }

        {
            let best = app.borrow().game.state.best_score;
            set_text(&document, "hud-best", &format!("Best: {best}"));
            set_text(&document, "hud-score", "Score: 0");
        }
        set_visible(&document, "menu", true);
        set_visible(&document, "hud", true);

        setup_input_handlers(&canvas, app.clone());
        setup_resize(&canvas, app.clone());
        setup_console(&document, app.clone());

        request_animation_frame(app);

        log::info!("Neon Runner running!");
    }

    /// Whether a key event comes from a text field (the console)
    fn from_text_input(event: &web_sys::Event) -> bool {
        event
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            .is_some()
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if from_text_input(&event) {
                    return;
                }
                if event.code() == "Space" {
                    event.prevent_default();
                }
                app.borrow_mut().game.push_input(InputEvent::KeyDown(event.code()));
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.push_input(InputEvent::KeyUp(event.code()));
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().game.push_input(InputEvent::PointerDown);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                event.prevent_default();
                app.borrow_mut().game.push_input(InputEvent::TouchStart);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus loss releases held keys
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().game.push_input(InputEvent::Blur);
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = fit_canvas(&window, &canvas);
            let mut a = app.borrow_mut();
            a.game.resize(Viewport::new(width as f32, height as f32));
            if let Some(render_state) = a.render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Developer console: Enter in `#console-input` runs the line
    fn setup_console(document: &Document, app: Rc<RefCell<App>>) {
        let Some(input) = document
            .get_element_by_id("console-input")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };

        let field = input.clone();
        let document = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if event.key() != "Enter" {
                return;
            }
            let line = field.value();
            field.set_value("");
            let message = match app.borrow_mut().game.run_command(&line) {
                Ok(message) => message,
                Err(e) => e.to_string(),
            };
            set_text(&document, "console-output", &message);
        });
        let _ = input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            // rAF time is in milliseconds
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            if a.game.frame(dt).is_some() {
                a.render();
            }
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.update_hud(&document);
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless run: simulates with a simple auto-jumper and logs the result.
///
/// Usage: `neon-runner [seconds] [store.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_runner::consts::SIM_DT;
    use neon_runner::persistence::{FileStore, KeyValueStore, MemoryStore};
    use neon_runner::platform::InputEvent;
    use neon_runner::sim::{GameEvent, GameState, Viewport};
    use neon_runner::Game;

    env_logger::init();
    log::info!("Neon Runner (native, headless) starting...");

    let mut args = std::env::args().skip(1);
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60.0);
    let store: Box<dyn KeyValueStore> = match args.next() {
        Some(path) => match FileStore::open(&path) {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("cannot open {path} ({e}); using a volatile store");
                Box::new(MemoryStore::new())
            }
        },
        None => Box::new(MemoryStore::new()),
    };

    /// Jump when the ground ends or a spike comes up ahead
    fn should_jump(state: &GameState) -> bool {
        let player = &state.player;
        if !player.grounded {
            return false;
        }
        let ahead = player.pos.x + player.width + player.speed * 4.0;
        let supported = state
            .platforms
            .iter()
            .any(|p| p.pos.x <= ahead && p.pos.x + p.width >= ahead);
        let spike_ahead = state.spikes.iter().any(|s| {
            let gap = s.pos.x - (player.pos.x + player.width);
            (0.0..player.speed * 6.0).contains(&gap)
        });
        !supported || spike_ahead
    }

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut game = Game::new(seed, Viewport::default(), store);
    game.start_run();

    let frames = (seconds / SIM_DT).max(0.0) as u32;
    let mut holding = false;
    for _ in 0..frames {
        if holding {
            game.push_input(InputEvent::KeyUp("Space".into()));
            holding = false;
        } else if should_jump(&game.state) {
            game.push_input(InputEvent::KeyDown("Space".into()));
            holding = true;
        }
        game.frame(SIM_DT);

        for event in game.drain_events() {
            match event {
                GameEvent::Died => log::info!("died at x = {:.0}", game.state.player.pos.x),
                GameEvent::NewBestScore(best) => log::info!("new best: {best}"),
                GameEvent::GameOver { score, best } => {
                    log::info!("game over: score {score:.0}, best {best}");
                    game.start_run();
                }
                _ => {}
            }
        }
    }

    log::info!(
        "simulated {:.0}s: score {:.0}, best {}, live particles {}",
        seconds,
        game.state.score,
        game.state.best_score,
        game.state.effects.live_count()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

//! Paratrooper entry point
//!
//! Mounts the game onto the page's canvas on web, or runs a short headless
//! autoplay session on native.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent, Window};

    use paratrooper::audio::{AudioManager, Cue};
    use paratrooper::persistence::{KeyValueStore, LocalStorage, MemoryStore};
    use paratrooper::renderer::CanvasSurface;
    use paratrooper::{Engine, Settings, Tuning, Viewport};

    /// Game instance holding the engine and its browser resources
    struct Game {
        engine: Engine,
        canvas: HtmlCanvasElement,
        surface: CanvasSurface,
        /// Created on the first user gesture (autoplay policy)
        audio: Option<AudioManager>,
    }

    impl Game {
        fn ensure_audio(&mut self) {
            if self.audio.is_none() {
                self.audio = Some(AudioManager::new(self.engine.settings().effective_volume()));
            }
        }

        fn play(&mut self, cues: Vec<Cue>) {
            let Some(audio) = &mut self.audio else { return };
            audio.set_volume(self.engine.settings().effective_volume());
            for cue in cues {
                audio.play(cue);
            }
        }

        /// Fit the 4:3 playfield into the window and size the canvas to match
        fn fit_canvas(&mut self, window: &Window) {
            let available = |v: Result<JsValue, JsValue>, fallback: f64| {
                v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback) as f32
            };
            let width = available(window.inner_width(), 800.0);
            let height = available(window.inner_height(), 600.0);
            self.engine.resize(width, height);

            let vp = self.engine.state().viewport;
            self.canvas.set_width(vp.width as u32);
            self.canvas.set_height(vp.height as u32);
        }

        /// Client coordinates to canvas pixels
        fn canvas_point(&self, client_x: i32, client_y: i32) -> (f32, f32) {
            let rect = self.canvas.get_bounding_client_rect();
            (
                (client_x as f64 - rect.left()) as f32,
                (client_y as f64 - rect.top()) as f32,
            )
        }
    }

    /// A registered DOM listener, kept so it can be removed on unmount
    struct Listener {
        target: EventTarget,
        event: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    }

    impl Listener {
        fn attach(target: &EventTarget, event: &'static str, closure: Closure<dyn FnMut(Event)>) -> Self {
            if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
                log::warn!("Failed to listen for {}: {:?}", event, e);
            }
            Self {
                target: target.clone(),
                event,
                closure,
            }
        }

        fn detach(&self) {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
        }
    }

    /// Everything needed to stop the game again
    struct Mounted {
        listeners: Vec<Listener>,
        running: Rc<Cell<bool>>,
        frame_id: Rc<Cell<i32>>,
    }

    impl Mounted {
        fn teardown(self) {
            self.running.set(false);
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(self.frame_id.get());
            }
            for listener in &self.listeners {
                listener.detach();
            }
            log::info!("Paratrooper unmounted");
        }
    }

    thread_local! {
        static MOUNTED: RefCell<Option<Mounted>> = const { RefCell::new(None) };
    }

    pub fn mount() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        // Already initialised when remounting
        let _ = console_log::init_with_level(log::Level::Info);
        unmount();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let surface = CanvasSurface::new(&canvas).ok_or("no 2d context")?;

        let settings = window
            .location()
            .search()
            .map(|query| Settings::from_query(&query))
            .unwrap_or_default();
        log::info!("Quality preset: {}", settings.quality.as_str());

        let store: Box<dyn KeyValueStore> = match LocalStorage::open() {
            Some(storage) => Box::new(storage),
            None => {
                log::warn!("LocalStorage unavailable, high score will not persist");
                Box::new(MemoryStore::new())
            }
        };

        let seed = js_sys::Date::now() as u64;
        let engine = Engine::new(
            Viewport::default(),
            Tuning::default(),
            settings,
            Pcg32::seed_from_u64(seed),
            store,
        );
        let game = Rc::new(RefCell::new(Game {
            engine,
            canvas: canvas.clone(),
            surface,
            audio: None,
        }));
        game.borrow_mut().fit_canvas(&window);

        let listeners = setup_input_handlers(&window, &canvas, &game);

        let running = Rc::new(Cell::new(true));
        let frame_id = Rc::new(Cell::new(0));
        request_animation_frame(game, running.clone(), frame_id.clone());

        MOUNTED.with(|mounted| {
            *mounted.borrow_mut() = Some(Mounted {
                listeners,
                running,
                frame_id,
            });
        });
        log::info!("Paratrooper mounted (seed {})", seed);
        Ok(())
    }

    /// Stop the frame loop and detach every listener
    pub fn unmount() {
        let mounted = MOUNTED.with(|mounted| mounted.borrow_mut().take());
        if let Some(mounted) = mounted {
            mounted.teardown();
        }
    }

    fn setup_input_handlers(
        window: &Window,
        canvas: &HtmlCanvasElement,
        game: &Rc<RefCell<Game>>,
    ) -> Vec<Listener> {
        let mut listeners = Vec::new();

        // Window resize
        {
            let game = game.clone();
            let win = window.clone();
            listeners.push(Listener::attach(
                window,
                "resize",
                Closure::new(move |_event: Event| game.borrow_mut().fit_canvas(&win)),
            ));
        }

        // Keyboard
        {
            let game = game.clone();
            listeners.push(Listener::attach(
                window,
                "keydown",
                Closure::new(move |event: Event| {
                    let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    if event.repeat() {
                        // Held keys are already down; only keep the page from scrolling
                        if paratrooper::input::Key::from_code(&event.code())
                            .is_some_and(|key| key.prevents_default())
                        {
                            event.prevent_default();
                        }
                        return;
                    }
                    let mut g = game.borrow_mut();
                    if let Some(key) = g.engine.key_down(&event.code()) {
                        if key.prevents_default() {
                            event.prevent_default();
                        }
                        g.ensure_audio();
                    }
                }),
            ));
        }
        {
            let game = game.clone();
            listeners.push(Listener::attach(
                window,
                "keyup",
                Closure::new(move |event: Event| {
                    if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                        game.borrow_mut().engine.key_up(&event.code());
                    }
                }),
            ));
        }

        // Focus loss releases held keys
        {
            let game = game.clone();
            listeners.push(Listener::attach(
                window,
                "blur",
                Closure::new(move |_event: Event| game.borrow_mut().engine.blur()),
            ));
        }

        // Mouse click / touch: aim and fire, or start
        for event_name in ["mousedown", "touchstart"] {
            let game = game.clone();
            listeners.push(Listener::attach(
                canvas,
                event_name,
                Closure::new(move |event: Event| {
                    event.prevent_default();
                    let client = if let Some(touch_event) = event.dyn_ref::<TouchEvent>() {
                        touch_event
                            .touches()
                            .get(0)
                            .map(|touch| (touch.client_x(), touch.client_y()))
                    } else {
                        event
                            .dyn_ref::<MouseEvent>()
                            .map(|mouse| (mouse.client_x(), mouse.client_y()))
                    };
                    let Some((client_x, client_y)) = client else {
                        return;
                    };
                    let mut g = game.borrow_mut();
                    g.ensure_audio();
                    let (x, y) = g.canvas_point(client_x, client_y);
                    g.engine.pointer_down(x, y);
                }),
            ));
        }

        listeners
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, running: Rc<Cell<bool>>, frame_id: Rc<Cell<i32>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let id = frame_id.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, running, id, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => frame_id.set(handle),
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, running: Rc<Cell<bool>>, frame_id: Rc<Cell<i32>>, time: f64) {
        if !running.get() {
            return;
        }
        {
            let mut g = game.borrow_mut();
            let cues = g.engine.frame(time);
            g.play(cues);
            let frame = g.engine.render();
            frame.draw(&mut g.surface);
        }
        request_animation_frame(game, running, frame_id);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::mount()
}

/// Tear the game down: cancels the frame loop and removes all listeners
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn unmount() {
    wasm_game::unmount();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Simulated time the native demo runs for, in ticks (two minutes)
#[cfg(not(target_arch = "wasm32"))]
const AUTOPLAY_TICKS: u32 = 60 * 120;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use paratrooper::consts::TICK_MS;
    use paratrooper::persistence::MemoryStore;
    use paratrooper::sim::{Enemy, GameMode};
    use paratrooper::{Engine, Settings, Viewport};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    env_logger::init();
    log::info!("Paratrooper (native) starting...");
    log::info!("The playable build targets the browser - run with `trunk serve` for the web version");

    let seed = std::env::var("PARATROOPER_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);
    let mut engine = Engine::new(
        Viewport::default(),
        load_tuning(),
        Settings::default(),
        Pcg32::seed_from_u64(seed),
        Box::new(MemoryStore::new()),
    );

    // Tap to start, then keep shooting at whatever is lowest in the sky
    engine.pointer_down(0.0, 0.0);
    let mut ticks = 0;
    while ticks < AUTOPLAY_TICKS {
        let target = engine
            .state()
            .enemies
            .iter()
            .map(Enemy::center)
            .max_by(|a, b| a.y.total_cmp(&b.y));
        if let Some(target) = target {
            engine.pointer_down(target.x, target.y);
        }
        engine.step(TICK_MS);
        ticks += 1;
        if engine.mode() == GameMode::GameOver {
            break;
        }
    }

    let state = engine.state();
    log::info!(
        "Autoplay finished after {} ticks: {:?}, score {}, {} troopers landed",
        ticks,
        state.mode,
        state.score,
        state.landed.len()
    );
}

/// Balance overrides from the JSON file named by `PARATROOPER_TUNING`
#[cfg(not(target_arch = "wasm32"))]
fn load_tuning() -> paratrooper::Tuning {
    use paratrooper::Tuning;

    let Ok(path) = std::env::var("PARATROOPER_TUNING") else {
        return Tuning::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Invalid tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        Err(e) => {
            log::warn!("Could not read tuning file {}: {}", path, e);
            Tuning::default()
        }
    }
}

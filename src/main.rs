//! Dodge Chase entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent};

    use dodge_chase::platform::{Joystick, KeyValueStore, LocalStore, MemoryStore, StickBase};
    use dodge_chase::renderer::{CanvasRenderer, PortraitImage, scene};
    use dodge_chase::sim::{GamePhase, TickInput, Viewport};
    use dodge_chase::{Session, Tuning};

    const PORTRAIT_SRC: &str = "pursuer.png";

    /// Game instance holding all state
    struct Game {
        session: Session<Box<dyn KeyValueStore>>,
        renderer: CanvasRenderer,
        joystick: Joystick,
        /// Whether an animation frame is currently scheduled
        loop_active: bool,
        autopilot: bool,
    }

    impl Game {
        fn input(&self) -> TickInput {
            TickInput {
                stick: self.joystick.vector(),
                autopilot: self.autopilot,
            }
        }

        fn render(&self) {
            self.renderer.draw(&scene(self.session.state()));
        }

        fn update_hud(&self) {
            let Some(document) = document() else {
                return;
            };
            set_text(&document, "score", &self.session.score().to_string());
            set_text(&document, "high-score", &self.session.high_score().to_string());
        }

        fn show_game_over(&self) {
            let Some(document) = document() else {
                return;
            };
            set_text(&document, "final-score", &self.session.score().to_string());
            set_text(
                &document,
                "final-high-score",
                &self.session.high_score().to_string(),
            );
            set_hidden(&document, "game-over-screen", false);
        }

        fn start(&mut self, seed: u64) {
            self.session.start(seed);
            self.joystick.release();
            if let Some(document) = document() {
                set_hidden(&document, "start-screen", true);
                set_hidden(&document, "game-over-screen", true);
                update_knob(&document, Vec2::ZERO);
            }
            self.update_hud();
        }

        fn fit_to_window(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let viewport = window_viewport(&window);
            self.renderer
                .resize(viewport.width as u32, viewport.height as u32);
            self.session.resize(viewport);
        }
    }

    fn window_viewport(window: &web_sys::Window) -> Viewport {
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        Viewport::new(width as f32, height as f32)
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
        document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{}", id)))
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

    fn update_knob(document: &Document, offset: Vec2) {
        let Some(knob) = document
            .get_element_by_id("stick-knob")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let _ = knob.style().set_property(
            "transform",
            &format!("translate({}px, {}px)", offset.x, offset.y),
        );
    }

    fn stick_base(document: &Document) -> Option<StickBase> {
        let rect = document.get_element_by_id("stick-base")?.get_bounding_client_rect();
        Some(StickBase::from_rect(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ))
    }

    fn open_store() -> Box<dyn KeyValueStore> {
        match LocalStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("LocalStorage unavailable, scores won't persist: {}", e);
                Box::new(MemoryStore::default())
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
        }

        log::info!("Dodge Chase starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = element(&document, "game-canvas")?.dyn_into()?;

        let portrait = match PortraitImage::load(PORTRAIT_SRC) {
            Ok(image) => Some(image),
            Err(e) => {
                log::warn!("Could not create portrait image: {:?}", e);
                None
            }
        };
        let renderer = CanvasRenderer::new(canvas, portrait)?;

        let store = open_store();
        let tuning = Tuning::load(&store);
        let viewport = window_viewport(&window);
        log::info!(
            "Viewport {}x{} ({} profile)",
            viewport.width,
            viewport.height,
            viewport.profile().as_str()
        );
        let session = Session::new(store, tuning, viewport);

        let game = Rc::new(RefCell::new(Game {
            session,
            renderer,
            joystick: Joystick::new(),
            loop_active: false,
            autopilot: false,
        }));

        {
            let mut g = game.borrow_mut();
            g.fit_to_window();
            g.update_hud();
            g.render();
        }

        setup_resize_handler(game.clone())?;
        setup_stick_handlers(&document, game.clone())?;
        setup_keyboard(game.clone())?;
        setup_start_button("start-btn", game.clone())?;
        setup_start_button("restart-btn", game)?;

        log::info!("Dodge Chase ready");
        Ok(())
    }

    fn setup_resize_handler(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.fit_to_window();
            if !g.loop_active {
                g.render();
            }
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_stick_handlers(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let zone = element(document, "stick-zone")?;

        // Press on the stick zone
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                press(&game, Vec2::new(event.client_x() as f32, event.client_y() as f32));
            });
            zone.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    press(&game, Vec2::new(touch.client_x() as f32, touch.client_y() as f32));
                }
            });
            zone.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Drags may leave the widget, so move/release go on the window
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                drag(&game, Vec2::new(event.client_x() as f32, event.client_y() as f32));
            });
            window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    if drag(&game, Vec2::new(touch.client_x() as f32, touch.client_y() as f32)) {
                        event.prevent_default();
                    }
                }
            });
            window.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        for kind in ["mouseup", "touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                release(&game);
            });
            window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn press(game: &Rc<RefCell<Game>>, pointer: Vec2) {
        let Some(document) = document() else {
            return;
        };
        let Some(base) = stick_base(&document) else {
            return;
        };
        let mut g = game.borrow_mut();
        g.joystick.press(&base, pointer);
        update_knob(&document, g.joystick.knob_offset());
    }

    fn drag(game: &Rc<RefCell<Game>>, pointer: Vec2) -> bool {
        let Some(document) = document() else {
            return false;
        };
        let Some(base) = stick_base(&document) else {
            return false;
        };
        let mut g = game.borrow_mut();
        if !g.joystick.drag(&base, pointer) {
            return false;
        }
        update_knob(&document, g.joystick.knob_offset());
        true
    }

    fn release(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        if !g.joystick.is_dragging() {
            return;
        }
        g.joystick.release();
        if let Some(document) = document() {
            update_knob(&document, Vec2::ZERO);
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if event.key() == "i" {
                let mut g = game.borrow_mut();
                g.autopilot = !g.autopilot;
                log::info!(
                    "Autopilot {}",
                    if g.autopilot { "enabled" } else { "disabled" }
                );
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_start_button(id: &str, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = document().ok_or_else(|| JsValue::from_str("no document"))?;
        let btn = element(&document, id)?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let seed = js_sys::Date::now() as u64;
            let schedule = {
                let mut g = game.borrow_mut();
                g.start(seed);
                !std::mem::replace(&mut g.loop_active, true)
            };
            if schedule {
                request_animation_frame(game.clone());
            }
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let keep_going = {
            let mut g = game.borrow_mut();
            let input = g.input();
            g.session.frame(&input);
            g.render();
            g.update_hud();

            if g.session.phase() == GamePhase::GameOver {
                g.show_game_over();
            }
            g.loop_active = g.session.is_running();
            g.loop_active
        };

        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Dodge Chase failed to start: {:?}", e);
        web_sys::console::error_1(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Seeded autopilot session without a browser
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use dodge_chase::platform::MemoryStore;
    use dodge_chase::sim::{GameEvent, TickInput, Viewport};
    use dodge_chase::{Session, Tuning};

    const DEFAULT_SEED: u64 = 42;
    const FRAME_CAP: u64 = 60 * 60 * 10;

    pub fn run() {
        let seed = std::env::args()
            .nth(1)
            .and_then(|arg| match arg.parse() {
                Ok(seed) => Some(seed),
                Err(e) => {
                    log::warn!("Ignoring seed {:?}: {}", arg, e);
                    None
                }
            })
            .unwrap_or(DEFAULT_SEED);

        log::info!("Dodge Chase (native) headless run, seed {}", seed);

        let mut session = Session::new(
            MemoryStore::default(),
            Tuning::default(),
            Viewport::new(1280.0, 720.0),
        );
        session.start(seed);

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let (mut hits, mut coins, mut passed) = (0u32, 0u32, 0u32);
        while session.is_running() && session.state().frame_count < FRAME_CAP {
            for event in session.frame(&input) {
                match event {
                    GameEvent::ObstacleHit { .. } => hits += 1,
                    GameEvent::CoinCollected { .. } => coins += 1,
                    GameEvent::ObstaclePassed { .. } => passed += 1,
                    _ => {}
                }
            }
        }

        let state = session.state();
        log::info!(
            "Finished after {} frames: score {}, speed {:.1}, {} passed, {} coins, {} hits ({})",
            state.frame_count,
            state.score,
            state.game_speed,
            passed,
            coins,
            hits,
            if session.is_running() { "frame cap" } else { "caught" }
        );

        match serde_json::to_string_pretty(state) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Could not serialize final state: {}", e),
        }
    }
}

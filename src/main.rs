//! Moto Dash entry point
//!
//! The browser build wires a session to `requestAnimationFrame`, interval
//! timers, DOM input and a WebGPU canvas. The native build runs a headless
//! session on a virtual clock and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::{Rc, Weak};

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use moto_dash::consts::FIELD_WIDTH;
    use moto_dash::platform::{CallbackHandle, CallbackKind, Scheduler, TimerKind};
    use moto_dash::renderer::{GpuSurface, RenderState, TextAlign, TextRun, TextSink};
    use moto_dash::sim::{
        SeededRandom, Session, SessionEvent, SessionPhase, SessionResult, TickReport,
    };
    use moto_dash::{RunConfig, Tuning};

    /// Scheduler on `requestAnimationFrame` and `setInterval`
    struct BrowserScheduler {
        window: web_sys::Window,
        shell: Weak<RefCell<Shell>>,
        /// Interval closures must outlive their registration
        intervals: HashMap<i32, Closure<dyn FnMut()>>,
    }

    impl BrowserScheduler {
        fn new(window: web_sys::Window, shell: Weak<RefCell<Shell>>) -> Self {
            Self {
                window,
                shell,
                intervals: HashMap::new(),
            }
        }
    }

    impl Scheduler for BrowserScheduler {
        fn request_frame(&mut self) -> CallbackHandle {
            let shell = self.shell.clone();
            // JS owns the closure; it is freed when it runs
            let callback = Closure::once_into_js(move |time: f64| {
                if let Some(shell) = shell.upgrade() {
                    shell.borrow_mut().on_frame(time);
                }
            });
            let id = self
                .window
                .request_animation_frame(callback.unchecked_ref())
                .unwrap_or_else(|e| {
                    log::error!("requestAnimationFrame failed: {:?}", e);
                    0
                });
            CallbackHandle {
                kind: CallbackKind::Frame,
                id,
            }
        }

        fn start_interval(&mut self, timer: TimerKind, period_ms: f64) -> CallbackHandle {
            let shell = self.shell.clone();
            let callback = Closure::<dyn FnMut()>::new(move || {
                if let Some(shell) = shell.upgrade() {
                    shell.borrow_mut().on_timer(timer);
                }
            });
            let id = self
                .window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    callback.as_ref().unchecked_ref(),
                    period_ms as i32,
                )
                .unwrap_or_else(|e| {
                    log::error!("setInterval failed: {:?}", e);
                    0
                });
            self.intervals.insert(id, callback);
            CallbackHandle {
                kind: CallbackKind::Interval(timer),
                id,
            }
        }

        fn cancel(&mut self, handle: CallbackHandle) {
            match handle.kind {
                CallbackKind::Frame => {
                    let _ = self.window.cancel_animation_frame(handle.id);
                }
                CallbackKind::Interval(_) => {
                    self.window.clear_interval_with_handle(handle.id);
                    self.intervals.remove(&handle.id);
                }
            }
        }
    }

    /// Page-level state around the session
    struct Shell {
        session: Session,
        document: Document,
        config: RunConfig,
    }

    impl Shell {
        fn on_frame(&mut self, time: f64) {
            self.session.tick(time);
            self.flush_events();
        }

        fn on_timer(&mut self, timer: TimerKind) {
            self.session.on_timer(timer);
        }

        fn start(&mut self) {
            match self.session.start(self.config.clone()) {
                Ok(()) => {
                    set_hidden(&self.document, "game-over", true);
                    set_hidden(&self.document, "pause-menu", true);
                    set_hidden(&self.document, "hud", false);
                }
                Err(e) => log::warn!("Cannot start: {}", e),
            }
        }

        fn toggle_pause(&mut self) {
            if self.session.toggle_pause().is_ok() {
                let paused = self.session.phase() == SessionPhase::Paused;
                set_hidden(&self.document, "pause-menu", !paused);
            }
        }

        fn auto_pause(&mut self, reason: &str) {
            if self.session.phase() == SessionPhase::Playing && self.session.pause().is_ok() {
                set_hidden(&self.document, "pause-menu", false);
                log::info!("Auto-paused ({})", reason);
            }
        }

        fn abort(&mut self) {
            if self.session.abort().is_ok() {
                self.flush_events();
                self.show_menu();
            }
        }

        fn show_menu(&self) {
            set_hidden(&self.document, "pause-menu", true);
            set_hidden(&self.document, "game-over", true);
            set_hidden(&self.document, "hud", true);
            set_hidden(&self.document, "menu", false);
        }

        fn flush_events(&mut self) {
            for event in self.session.drain_events() {
                match event {
                    SessionEvent::Tick(report) => self.update_hud(&report),
                    SessionEvent::Ended(result) => self.show_game_over(&result),
                    SessionEvent::Aborted => log::info!("Run aborted"),
                }
            }
        }

        /// Mirror live counters into the DOM HUD
        fn update_hud(&self, report: &TickReport) {
            let fields = [
                ("#hud-score .hud-value", report.score.to_string()),
                ("#hud-distance .hud-value", format!("{}m", report.distance.floor() as u64)),
                ("#hud-coins .hud-value", report.collected_coins.to_string()),
                ("#hud-lives .hud-value", report.lives.to_string()),
            ];
            for (selector, value) in fields {
                if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(&value));
                }
            }
        }

        fn show_game_over(&self, result: &SessionResult) {
            let stars = result.stars.min(3) as usize;
            let fields = [
                ("final-stars", format!("{}{}", "★".repeat(stars), "☆".repeat(3 - stars))),
                ("final-score", result.score.to_string()),
                ("final-distance", format!("{}m", result.distance.floor() as u64)),
                ("final-coins", result.collected_coins.to_string()),
            ];
            for (id, value) in fields {
                if let Some(el) = self.document.get_element_by_id(id) {
                    el.set_text_content(Some(&value));
                }
            }
            set_hidden(&self.document, "game-over", false);
            if let Ok(json) = serde_json::to_string(result) {
                log::info!("Run result: {}", json);
            }
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    /// Text runs become absolutely positioned spans over the canvas
    fn text_overlay(document: Document) -> TextSink {
        Box::new(move |runs: &[TextRun]| {
            let Some(overlay) = document.get_element_by_id("text-overlay") else {
                return;
            };
            let scale = overlay.client_width() as f32 / FIELD_WIDTH;
            overlay.set_inner_html("");
            for run in runs {
                let Ok(span) = document.create_element("span") else {
                    continue;
                };
                let [r, g, b, a] = run.color;
                let shift = match run.align {
                    TextAlign::Left => "0",
                    TextAlign::Center => "-50%",
                };
                let style = format!(
                    "position:absolute;left:{:.1}px;top:{:.1}px;font-size:{:.1}px;\
                     color:rgba({},{},{},{:.2});transform:translate({},-50%);white-space:nowrap",
                    run.pos.x * scale,
                    run.pos.y * scale,
                    run.size * scale,
                    (r * 255.0) as u8,
                    (g * 255.0) as u8,
                    (b * 255.0) as u8,
                    a,
                    shift
                );
                let _ = span.set_attribute("style", &style);
                span.set_text_content(Some(&run.text));
                let _ = overlay.append_child(&span);
            }
        })
    }

    /// Optional JSON carried on the canvas element
    fn canvas_json<T: serde::de::DeserializeOwned + Default>(
        canvas: &HtmlCanvasElement,
        attribute: &str,
    ) -> T {
        canvas
            .get_attribute(attribute)
            .and_then(|json| {
                serde_json::from_str(&json)
                    .map_err(|e| log::warn!("Ignoring {}: {}", attribute, e))
                    .ok()
            })
            .unwrap_or_default()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Moto Dash starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let tuning = match canvas.get_attribute("data-tuning") {
            Some(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Invalid tuning, using defaults: {}", e);
                Tuning::default()
            }),
            None => Tuning::default(),
        };
        let config: RunConfig = canvas_json(&canvas, "data-run-config");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
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
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = match RenderState::new(surface, &adapter, width, height).await {
            Ok(state) => state,
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        };

        let seed = js_sys::Date::now() as u64;
        let shell = Rc::new_cyclic(|weak: &Weak<RefCell<Shell>>| {
            let scheduler = BrowserScheduler::new(window.clone(), weak.clone());
            let mut session =
                Session::new(tuning, Box::new(SeededRandom::new(seed)), Box::new(scheduler));
            session.attach_surface(Box::new(GpuSurface::new(
                render_state,
                text_overlay(document.clone()),
            )));
            RefCell::new(Shell {
                session,
                document: document.clone(),
                config,
            })
        });

        log::info!("Session ready with seed: {}", seed);

        setup_input_handlers(&canvas, shell.clone());
        setup_buttons(&document, shell.clone());
        setup_auto_pause(shell.clone());

        shell.borrow_mut().start();

        log::info!("Moto Dash running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, shell: Rc<RefCell<Shell>>) {
        // Pointer click jumps
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                shell.borrow_mut().session.jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut shell = shell.borrow_mut();
                match event.key().as_str() {
                    " " | "ArrowUp" => {
                        event.prevent_default();
                        shell.session.jump();
                    }
                    "Escape" => shell.toggle_pause(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, shell: Rc<RefCell<Shell>>) {
        let actions: [(&str, fn(&mut Shell)); 4] = [
            ("restart-btn", Shell::start),
            ("start-btn", Shell::start),
            ("resume-btn", Shell::toggle_pause),
            ("quit-btn", Shell::abort),
        ];
        for (id, action) in actions {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                action(&mut shell.borrow_mut());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(shell: Rc<RefCell<Shell>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let shell = shell.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    shell.borrow_mut().auto_pause("tab hidden");
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
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                shell.borrow_mut().auto_pause("window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    web::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use moto_dash::consts::{VEHICLE_SIZE, VEHICLE_X};
    use moto_dash::platform::ManualScheduler;
    use moto_dash::renderer::CommandList;
    use moto_dash::sim::{SeededRandom, Session, SessionError, SessionEvent, SessionPhase};
    use moto_dash::{RunConfig, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after five simulated minutes
    const MAX_FRAMES: u64 = 60 * 60 * 5;
    /// Jump when an obstacle's leading edge is this close
    const JUMP_LOOKAHEAD: f32 = 30.0;

    /// Run one session on a virtual clock with a simple autopilot
    pub fn run(seed: u64) -> Result<(), SessionError> {
        let tuning = Tuning::load();
        let clock = ManualScheduler::new();
        let canvas = CommandList::new();

        let mut session = Session::new(tuning, Box::new(SeededRandom::new(seed)), Box::new(clock.clone()));
        session.attach_surface(Box::new(canvas.clone()));
        session.start(RunConfig::default())?;

        let mut frames = 0;
        while session.phase() == SessionPhase::Playing && frames < MAX_FRAMES {
            let front = VEHICLE_X + VEHICLE_SIZE;
            let threat = session
                .state()
                .obstacles
                .iter()
                .any(|o| o.x >= front && o.x - front < JUMP_LOOKAHEAD);
            if threat {
                session.jump();
            }
            for due in clock.advance(FRAME_MS) {
                session.dispatch(due);
            }
            frames += 1;
        }

        if session.phase() == SessionPhase::Playing {
            log::info!("Stopping after {} frames", frames);
            session.abort()?;
        }

        for event in session.drain_events() {
            match event {
                SessionEvent::Ended(result) => log::info!(
                    "Run over: score {} distance {:.0}m coins {} jumps {} stars {}",
                    result.score,
                    result.distance,
                    result.collected_coins,
                    result.jump_count,
                    result.stars
                ),
                SessionEvent::Aborted => log::info!("Run aborted"),
                SessionEvent::Tick(_) => {}
            }
        }
        log::info!("Rendered {} frames", canvas.frames());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), moto_dash::sim::SessionError> {
    env_logger::init();
    log::info!("Moto Dash (native) starting...");
    log::info!("Native mode runs a headless session - run with `trunk serve` for the web version");

    let seed = std::env::var("MOTO_DASH_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    headless::run(seed)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

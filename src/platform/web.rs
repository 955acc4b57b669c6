//! Browser handle
//!
//! [`DinoRunner`] is the JS-facing object. It owns the frame driver behind
//! `Rc<RefCell<..>>` so animation-frame, timer and input closures can reach
//! it. JS callbacks are always invoked after the borrow is released.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, KeyboardEvent, Window};

use super::{JUMP_POINTER_EVENTS, is_jump_key};
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::driver::{DriverError, FrameDriver, FrameOutcome, GameHost};
use crate::renderer::{DrawContext, canvas};
use crate::settings::Settings;
use crate::tuning::{Tuning, TuningError};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already initialised");
    }
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

impl From<DriverError> for JsValue {
    fn from(e: DriverError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

impl From<TuningError> for JsValue {
    fn from(e: TuningError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

/// Forwards notifications to the page's callbacks
#[derive(Clone)]
struct JsHost {
    on_game_over: js_sys::Function,
    on_score_update: Option<js_sys::Function>,
}

impl GameHost for JsHost {
    fn on_score_update(&mut self, score: u64) {
        if let Some(callback) = &self.on_score_update {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_f64(score as f64)) {
                log::warn!("onScoreUpdate threw: {:?}", e);
            }
        }
    }

    fn on_game_over(&mut self, final_score: u64) {
        let score = JsValue::from_f64(final_score as f64);
        if let Err(e) = self.on_game_over.call1(&JsValue::NULL, &score) {
            log::warn!("onGameOver threw: {:?}", e);
        }
    }
}

/// Registered jump listeners, removed on stop or game over
struct InputListeners {
    keydown: Closure<dyn FnMut(KeyboardEvent)>,
    pointer: Closure<dyn FnMut(Event)>,
}

struct Inner {
    driver: FrameDriver,
    canvas: HtmlCanvasElement,
    surface: Option<CanvasRenderingContext2d>,
    host: JsHost,
    frame_id: Option<i32>,
    frame_cb: Option<Closure<dyn FnMut(f64)>>,
    notice_cb: Option<Closure<dyn FnMut()>>,
    listeners: Option<InputListeners>,
}

/// The game, bound to one canvas element
#[wasm_bindgen]
pub struct DinoRunner {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl DinoRunner {
    /// Attach to `<canvas id={canvas_id}>` and show the idle preview
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        on_game_over: js_sys::Function,
        on_score_update: Option<js_sys::Function>,
    ) -> Result<DinoRunner, JsValue> {
        let document = window()?
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{}", canvas_id)))?
            .dyn_into()
            .map_err(|_| JsValue::from_str(&format!("#{} is not a canvas", canvas_id)))?;
        canvas.set_width(WORLD_WIDTH as u32);
        canvas.set_height(WORLD_HEIGHT as u32);

        let surface = match canvas::context_2d(&canvas) {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                log::warn!("No 2d context yet: {:?}", e);
                None
            }
        };

        let driver = FrameDriver::new(Tuning::default(), Settings::load())?;
        let inner = Rc::new(RefCell::new(Inner {
            driver,
            canvas,
            surface,
            host: JsHost {
                on_game_over,
                on_score_update,
            },
            frame_id: None,
            frame_cb: None,
            notice_cb: None,
            listeners: None,
        }));

        let weak = Rc::downgrade(&inner);
        let frame_cb = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            if let Some(inner) = weak.upgrade() {
                on_frame(&inner, time);
            }
        });
        let weak = Rc::downgrade(&inner);
        let notice_cb = Closure::<dyn FnMut()>::new(move || {
            if let Some(inner) = weak.upgrade() {
                on_notice_timer(&inner);
            }
        });
        {
            let mut this = inner.borrow_mut();
            this.frame_cb = Some(frame_cb);
            this.notice_cb = Some(notice_cb);
        }

        paint_idle(&inner);
        log::info!("Dino runner attached to #{}", canvas_id);
        Ok(DinoRunner { inner })
    }

    /// Begin a new session. Returns false if one is already running.
    pub fn start(&self) -> Result<bool, JsValue> {
        {
            let mut this = self.inner.borrow_mut();
            if this.surface.is_none() {
                return Err(DriverError::SurfaceUnavailable.into());
            }
            let seed = js_sys::Date::now() as u64;
            if !this.driver.start(seed) {
                return Ok(false);
            }
        }
        attach_listeners(&self.inner)?;
        request_frame(&self.inner)?;
        Ok(true)
    }

    /// End the session without a game-over; safe to call repeatedly
    pub fn stop(&self) {
        self.inner.borrow_mut().driver.stop();
        teardown(&self.inner);
        paint_idle(&self.inner);
    }

    /// Jump, if running and grounded
    pub fn jump(&self) -> bool {
        self.inner.borrow_mut().driver.request_jump()
    }

    /// Apply settings JSON (missing fields take defaults) and persist them
    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json)
            .map_err(|e| JsValue::from_str(&format!("invalid settings: {}", e)))?;
        settings.save();
        let running = {
            let mut this = self.inner.borrow_mut();
            this.driver.set_settings(settings);
            this.driver.is_running()
        };
        if !running {
            paint_idle(&self.inner);
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = setAutopilot)]
    pub fn set_autopilot(&self, on: bool) {
        self.inner.borrow_mut().driver.set_autopilot(on);
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> f64 {
        self.inner.borrow().driver.state().score as f64
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.borrow().driver.is_running()
    }

    /// JSON statistics of the current or most recent session
    pub fn summary(&self) -> Result<String, JsValue> {
        let this = self.inner.borrow();
        let summary = this
            .driver
            .last_run()
            .filter(|_| !this.driver.is_running())
            .cloned()
            .unwrap_or_else(|| this.driver.summary());
        serde_json::to_string(&summary).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Drop for DinoRunner {
    fn drop(&mut self) {
        teardown(&self.inner);
    }
}

fn on_frame(inner: &Rc<RefCell<Inner>>, time: f64) {
    let (outcome, notifications, mut host) = {
        let mut guard = inner.borrow_mut();
        let this = &mut *guard;
        this.frame_id = None;
        let surface = this.surface.as_mut().map(|ctx| ctx as &mut dyn DrawContext);
        let outcome = this.driver.frame(surface, time);
        (
            outcome,
            this.driver.take_notifications(),
            this.host.clone(),
        )
    };
    for notification in notifications {
        notification.dispatch(&mut host);
    }

    match outcome {
        Ok(FrameOutcome::Continue) => {
            if let Err(e) = request_frame(inner) {
                log::error!("requestAnimationFrame failed: {:?}", e);
            }
        }
        Ok(FrameOutcome::Halt) => {
            detach_listeners(inner);
            schedule_notice(inner, time);
        }
        Err(e) => log::error!("Frame aborted: {}", e),
    }
}

fn on_notice_timer(inner: &Rc<RefCell<Inner>>) {
    let (notifications, mut host) = {
        let mut this = inner.borrow_mut();
        this.driver.poll_notifications(now_ms());
        (this.driver.take_notifications(), this.host.clone())
    };
    for notification in notifications {
        notification.dispatch(&mut host);
    }
    // Anything still waiting belongs to a later session
    schedule_notice(inner, now_ms());
}

fn schedule_notice(inner: &Rc<RefCell<Inner>>, now: f64) {
    let this = inner.borrow();
    let (Some(due), Some(cb)) = (this.driver.next_notice_due(), this.notice_cb.as_ref()) else {
        return;
    };
    let delay = (due - now).max(0.0).ceil() as i32;
    let scheduled = window().and_then(|w| {
        w.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), delay)
    });
    if let Err(e) = scheduled {
        log::error!("setTimeout failed: {:?}", e);
    }
}

fn request_frame(inner: &Rc<RefCell<Inner>>) -> Result<(), JsValue> {
    let mut this = inner.borrow_mut();
    if this.frame_id.is_some() {
        return Ok(());
    }
    let Some(cb) = this.frame_cb.as_ref() else {
        return Ok(());
    };
    let id = window()?.request_animation_frame(cb.as_ref().unchecked_ref())?;
    this.frame_id = Some(id);
    Ok(())
}

fn paint_idle(inner: &Rc<RefCell<Inner>>) {
    let mut guard = inner.borrow_mut();
    let this = &mut *guard;
    let surface = this.surface.as_mut().map(|ctx| ctx as &mut dyn DrawContext);
    if let Err(e) = this.driver.render_idle(surface) {
        log::warn!("Idle preview skipped: {}", e);
    }
}

fn attach_listeners(inner: &Rc<RefCell<Inner>>) -> Result<(), JsValue> {
    if inner.borrow().listeners.is_some() {
        return Ok(());
    }

    let weak = Rc::downgrade(inner);
    let keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        if is_jump_key(&event.code()) {
            event.prevent_default();
            jump_from_input(&weak);
        }
    });
    let weak = Rc::downgrade(inner);
    let pointer = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        jump_from_input(&weak);
    });

    let canvas = inner.borrow().canvas.clone();
    window()?.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
    for name in JUMP_POINTER_EVENTS {
        canvas.add_event_listener_with_callback(name, pointer.as_ref().unchecked_ref())?;
    }

    inner.borrow_mut().listeners = Some(InputListeners { keydown, pointer });
    Ok(())
}

fn jump_from_input(weak: &Weak<RefCell<Inner>>) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    match inner.try_borrow_mut() {
        Ok(mut this) => {
            this.driver.request_jump();
        }
        Err(_) => log::warn!("Jump dropped, game busy"),
    };
}

/// Cancel the pending frame and remove input listeners
fn teardown(inner: &Rc<RefCell<Inner>>) {
    let frame_id = inner.borrow_mut().frame_id.take();
    if let Some(id) = frame_id {
        if let Ok(w) = window() {
            if let Err(e) = w.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
    }
    detach_listeners(inner);
}

/// Remove the jump listeners, if attached
fn detach_listeners(inner: &Rc<RefCell<Inner>>) {
    let (listeners, canvas) = {
        let mut this = inner.borrow_mut();
        (this.listeners.take(), this.canvas.clone())
    };
    let Some(listeners) = listeners else {
        return;
    };

    match window() {
        Ok(w) => {
            if let Err(e) = w.remove_event_listener_with_callback(
                "keydown",
                listeners.keydown.as_ref().unchecked_ref(),
            ) {
                log::warn!("removeEventListener(keydown) failed: {:?}", e);
            }
        }
        Err(e) => log::warn!("keydown listener not removed: {:?}", e),
    }
    for name in JUMP_POINTER_EVENTS {
        if let Err(e) = canvas
            .remove_event_listener_with_callback(name, listeners.pointer.as_ref().unchecked_ref())
        {
            log::warn!("removeEventListener({}) failed: {:?}", name, e);
        }
    }
    log::debug!("Input listeners removed");
}

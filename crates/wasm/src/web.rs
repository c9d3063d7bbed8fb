//! DOM wiring: canvas, WebGL context, resize listener, buttons.

use crate::logger;
use std::cell::RefCell;
use std::rc::Rc;
use swatch_core::render::GpuContext;
use swatch_core::{report_failure, App, AppConfig, Control, Surface, SwatchError, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlCanvasElement, WebGlRenderingContext, Window};

/// The canvas element as a [`Surface`].
struct CanvasSurface(HtmlCanvasElement);

impl Surface for CanvasSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.0.set_width(width);
        self.0.set_height(height);
    }
}

type SharedApp = Rc<RefCell<App<GpuContext>>>;

/// Starts with the default configuration.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    run(AppConfig::default())
}

/// Starts with a JSON configuration, e.g.
/// `{"canvas_id": "glCanvas", "redraw_on_resize": false}`.
#[wasm_bindgen(js_name = startWithConfig)]
pub fn start_with_config(json: &str) -> Result<(), JsValue> {
    match AppConfig::from_json(json) {
        Ok(config) => run(config),
        Err(e) => {
            logger::init(log::LevelFilter::Info);
            report_failure::<(), _>(Err(e), &mut alert).map_err(JsValue::from)
        }
    }
}

fn run(config: AppConfig) -> Result<(), JsValue> {
    logger::init(config.log_level_filter().unwrap_or(log::LevelFilter::Info));

    let window = web_sys::window().ok_or("no global window")?;
    let document = window.document().ok_or("no document on window")?;
    let canvas = document
        .get_element_by_id(&config.canvas_id)
        .ok_or_else(|| format!("no element with id '{}'", config.canvas_id))?
        .dyn_into::<HtmlCanvasElement>()?;

    let mut surface = CanvasSurface(canvas.clone());
    let size = window_size(&window)?;
    let started =
        webgl_context(&canvas).and_then(|gpu| App::start(gpu, &mut surface, size, &config));
    let app = report_failure(started, &mut alert)?;

    let app: SharedApp = Rc::new(RefCell::new(app));
    listen_for_resize(&window, app.clone(), surface)?;
    wire_buttons(&document, &app)?;
    Ok(())
}

fn webgl_context(canvas: &HtmlCanvasElement) -> Result<GpuContext, SwatchError> {
    let context = canvas
        .get_context("webgl")
        .map_err(|e| SwatchError::ContextUnavailable(format!("{e:?}")))?
        .ok_or_else(|| SwatchError::ContextUnavailable("getContext returned null".into()))?
        .dyn_into::<WebGlRenderingContext>()
        .map_err(|_| SwatchError::ContextUnavailable("not a WebGL context".into()))?;
    Ok(GpuContext::new(glow::Context::from_webgl1_context(context)))
}

fn window_size(window: &Window) -> Result<Viewport, JsValue> {
    let dimension = |v: JsValue| {
        v.as_f64()
            .map(|f| f.max(0.0) as u32)
            .ok_or_else(|| JsValue::from_str("window size is not a number"))
    };
    Ok(Viewport::new(
        dimension(window.inner_width()?)?,
        dimension(window.inner_height()?)?,
    ))
}

fn listen_for_resize(
    window: &Window,
    app: SharedApp,
    mut surface: CanvasSurface,
) -> Result<(), JsValue> {
    let win = window.clone();
    let on_resize = Closure::wrap(Box::new(move || match window_size(&win) {
        Ok(size) => app.borrow_mut().resize(&mut surface, size),
        Err(e) => log::warn!("resize ignored: {e:?}"),
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();
    Ok(())
}

/// One delegated click listener; the clicked element's id picks the control.
fn wire_buttons(document: &Document, app: &SharedApp) -> Result<(), JsValue> {
    for control in Control::all() {
        if document.get_element_by_id(control.id()).is_none() {
            log::warn!("no button with id '{}'", control.id());
        }
    }

    let app = app.clone();
    let on_click = Closure::wrap(Box::new(move |event: Event| {
        let control = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|element| Control::from_id(&element.id()));
        if let Some(control) = control {
            app.borrow_mut().press(control);
        }
    }) as Box<dyn FnMut(Event)>);
    document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

#![cfg(target_arch = "wasm32")]
use grove_core::{
    seeded_rng, ControlState, GestureFsm, InstanceMorphEngine, ParticleField, PerformanceMode,
    PhotoFocusSystem,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod camera;
mod dom;
mod events;
mod frame;
mod overlay;
mod render;
mod video;

use frame::{FrameContext, GROVE_SEED};
use render::PhotoImage;

// Discrete instance-set population (the particle field scales separately)
const INSTANCE_COUNT: usize = 160;

struct App {
    ctx: Rc<RefCell<FrameContext>>,
    control: Rc<RefCell<ControlState>>,
    pending_mode: Rc<RefCell<Option<PerformanceMode>>>,
    running: Rc<RefCell<bool>>,
    capture: Rc<RefCell<Option<video::VideoCapture>>>,
    pending_photos: Vec<PhotoImage>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("grove-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("grove-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #grove-canvas"))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    dom::wire_canvas_resize(&canvas);

    let control = Rc::new(RefCell::new(ControlState::new()));
    let fsm = Rc::new(RefCell::new(GestureFsm::new()));
    let running = Rc::new(RefCell::new(true));
    let pending_mode = Rc::new(RefCell::new(None));
    let capture = Rc::new(RefCell::new(None));

    let mode = PerformanceMode::High;
    let mut rng = seeded_rng(GROVE_SEED, 0);
    let instances = InstanceMorphEngine::new(INSTANCE_COUNT, &mut rng);
    let particles = ParticleField::new(mode, GROVE_SEED);
    let photos = PhotoFocusSystem::default();

    let gpu = frame::init_gpu(&canvas, INSTANCE_COUNT).await;

    let ctx = Rc::new(RefCell::new(FrameContext::new(
        canvas.clone(),
        control.clone(),
        fsm.clone(),
        instances,
        particles,
        photos,
        gpu,
        pending_mode.clone(),
        running.clone(),
    )));

    events::keyboard::wire_global_keydown(control.clone(), pending_mode.clone());
    events::pointer::wire_pointer_orbit(&canvas, control.clone());

    // Hand tracking is best effort; the render loop never waits on it.
    spawn_local(video::setup_tracking(
        document,
        control.clone(),
        fsm.clone(),
        capture.clone(),
        running.clone(),
    ));

    frame::start_loop(ctx.clone());

    APP.with(|app| {
        *app.borrow_mut() = Some(App {
            ctx,
            control,
            pending_mode,
            running,
            capture,
            pending_photos: Vec::new(),
        });
    });
    Ok(())
}

/// External morph control (UI slider etc.), equivalent to the gesture path.
#[wasm_bindgen]
pub fn set_morph_target(value: f32) {
    APP.with(|app| {
        if let Some(app) = app.borrow().as_ref() {
            app.control.borrow_mut().morph.set_target(value);
        }
    });
}

/// Select a quality tier: 0 high, 1 medium, 2 low.
#[wasm_bindgen]
pub fn set_performance_mode(level: u32) {
    let mode = match level {
        0 => PerformanceMode::High,
        1 => PerformanceMode::Medium,
        _ => PerformanceMode::Low,
    };
    APP.with(|app| {
        if let Some(app) = app.borrow().as_ref() {
            *app.pending_mode.borrow_mut() = Some(mode);
        }
    });
}

/// Stage one decoded RGBA image for the next photo-set commit.
#[wasm_bindgen]
pub fn push_photo(width: u32, height: u32, rgba: &[u8]) -> Result<(), JsValue> {
    if rgba.len() != (width as usize) * (height as usize) * 4 {
        return Err(JsValue::from_str("rgba length does not match dimensions"));
    }
    APP.with(|app| {
        let mut app = app.borrow_mut();
        let app = app
            .as_mut()
            .ok_or_else(|| JsValue::from_str("not initialized"))?;
        if app.pending_photos.len() >= grove_core::constants::PHOTO_MAX_COUNT {
            return Err(JsValue::from_str("photo set is full"));
        }
        app.pending_photos.push(PhotoImage {
            width,
            height,
            rgba: rgba.to_vec(),
        });
        Ok(())
    })
}

/// Swap in the staged photo set, disposing the previous slots first.
#[wasm_bindgen]
pub fn commit_photos() -> Result<(), JsValue> {
    APP.with(|app| {
        let mut app = app.borrow_mut();
        let app = app
            .as_mut()
            .ok_or_else(|| JsValue::from_str("not initialized"))?;
        let images = std::mem::take(&mut app.pending_photos);
        let mut ctx = app.ctx.borrow_mut();
        let mut rng = seeded_rng(GROVE_SEED, images.len() as u64 + 1);
        ctx.photos
            .replace(images.len(), &mut rng)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        if let Some(gpu) = &mut ctx.gpu {
            gpu.set_photos(&images);
        }
        Ok(())
    })
}

/// Tear the view down: stop both loops, release the camera, and drop every
/// GPU-resident resource. Producers stop before the resources they write to.
#[wasm_bindgen]
pub fn shutdown() {
    APP.with(|app| {
        if let Some(app) = app.borrow_mut().take() {
            *app.running.borrow_mut() = false;
            if let Some(capture) = app.capture.borrow_mut().take() {
                capture.stop();
            }
            // release GPU buffers and offscreen targets now; the stopped
            // loops check `running` before touching the context again
            app.ctx.borrow_mut().gpu = None;
            log::info!("grove-web shut down");
        }
    });
}

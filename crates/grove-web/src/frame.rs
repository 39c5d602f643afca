use crate::camera::camera_frame;
use crate::overlay;
use crate::render::{self, FrameInputs};
use grove_core::{
    ControlState, GestureFsm, InstanceMorphEngine, ParticleField, PerformanceMode,
    PhotoFocusSystem,
};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Base seed for all procedural generation; rebuilds mix in their own stream.
pub const GROVE_SEED: u64 = 42;

/// Everything the render tick touches, owned in one place and driven by
/// requestAnimationFrame.
pub struct FrameContext {
    pub canvas: web::HtmlCanvasElement,
    pub control: Rc<RefCell<ControlState>>,
    pub fsm: Rc<RefCell<GestureFsm>>,
    pub instances: InstanceMorphEngine,
    pub particles: ParticleField,
    pub photos: PhotoFocusSystem,
    pub gpu: Option<render::GpuState<'static>>,
    pub pending_mode: Rc<RefCell<Option<PerformanceMode>>>,
    pub running: Rc<RefCell<bool>>,

    pub last_instant: Instant,
    pub time_accum: f32,
    uploaded_generation: Option<u64>,
    last_status_line: String,
}

impl FrameContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        canvas: web::HtmlCanvasElement,
        control: Rc<RefCell<ControlState>>,
        fsm: Rc<RefCell<GestureFsm>>,
        instances: InstanceMorphEngine,
        particles: ParticleField,
        photos: PhotoFocusSystem,
        gpu: Option<render::GpuState<'static>>,
        pending_mode: Rc<RefCell<Option<PerformanceMode>>>,
        running: Rc<RefCell<bool>>,
    ) -> Self {
        Self {
            canvas,
            control,
            fsm,
            instances,
            particles,
            photos,
            gpu,
            pending_mode,
            running,
            last_instant: Instant::now(),
            time_accum: 0.0,
            uploaded_generation: None,
            last_status_line: String::new(),
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        self.time_accum += dt.as_secs_f32();
        let time = self.time_accum;

        if let Some(mode) = self.pending_mode.borrow_mut().take() {
            self.particles.rebuild(mode, GROVE_SEED);
        }

        self.control.borrow_mut().advance();
        let (morph, orbit, focus_active) = {
            let control = self.control.borrow();
            (control.morph, control.orbit, control.focus_active)
        };

        self.instances.update(&morph, time);

        let width = self.canvas.width();
        let height = self.canvas.height();
        let aspect = width as f32 / height.max(1) as f32;
        let cam = camera_frame(&orbit, aspect);

        self.photos.set_active(focus_active, cam.eye);
        self.photos.update(&morph, time, cam.eye, cam.forward);

        if let Some(gpu) = &mut self.gpu {
            gpu.resize_if_needed(width, height);
            if self.uploaded_generation != Some(self.particles.generation()) {
                gpu.set_particles(self.particles.attrs());
                self.uploaded_generation = Some(self.particles.generation());
            }
            if self.instances.take_dirty() {
                let seeds: Vec<f32> = self.instances.points().iter().map(|p| p.seed).collect();
                gpu.upload_instances(self.instances.transforms(), &seeds);
            }
            let inputs = FrameInputs {
                view_proj: cam.view_proj,
                cam_right: cam.right,
                cam_up: cam.up,
                time,
                morph_value: morph.current(),
                bloom_strength: self.particles.mode().bloom_strength(),
                photo_slots: self.photos.slots(),
            };
            if let Err(e) = gpu.render(&inputs) {
                log::error!("render error: {:?}", e);
            }
        }

        self.refresh_status();
    }

    fn refresh_status(&mut self) {
        let (tracking, stable) = {
            let control = self.control.borrow();
            (control.tracking, self.fsm.borrow().stable())
        };
        let line = format!(
            "{}/{}/{}",
            tracking.as_str(),
            stable.as_str(),
            self.particles.mode().label()
        );
        if line != self.last_status_line {
            if let Some(document) = web::window().and_then(|w| w.document()) {
                overlay::update_status(&document, tracking, stable, self.particles.mode());
            }
            self.last_status_line = line;
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    marker_capacity: usize,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy the 'static surface lifetime
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, marker_capacity).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Drive the context from requestAnimationFrame until `running` goes false.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !*frame_ctx_tick.borrow().running.borrow() {
            log::info!("[frame] render loop stopped");
            return;
        }
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            let _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

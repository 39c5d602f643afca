use glam::Vec2;
use grove_core::ControlState;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

// Orbit radians per CSS pixel of drag
const DRAG_ORBIT_SENSITIVITY: f32 = 0.005;

#[derive(Default, Clone, Copy)]
pub struct DragState {
    pub active: bool,
    pub last: Vec2,
}

/// Pointer-drag orbit fallback: dragging moves the same yaw/pitch targets
/// the wrist-motion signal drives.
pub fn wire_pointer_orbit(canvas: &web::HtmlCanvasElement, control: Rc<RefCell<ControlState>>) {
    let drag = Rc::new(RefCell::new(DragState::default()));

    {
        let drag = drag.clone();
        let canvas_down = canvas.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let mut d = drag.borrow_mut();
            d.active = true;
            d.last = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
            _ = canvas_down.set_pointer_capture(ev.pointer_id());
            ev.prevent_default();
        }) as Box<dyn FnMut(_)>);
        _ = canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    {
        let drag = drag.clone();
        let control = control.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let mut d = drag.borrow_mut();
            if !d.active {
                return;
            }
            let pos = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
            let delta = pos - d.last;
            d.last = pos;
            control.borrow_mut().orbit.apply_delta(
                delta.x * DRAG_ORBIT_SENSITIVITY,
                delta.y * DRAG_ORBIT_SENSITIVITY,
            );
        }) as Box<dyn FnMut(_)>);
        if let Some(window) = web::window() {
            _ = window
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
        }
        closure.forget();
    }

    {
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
            drag.borrow_mut().active = false;
        }) as Box<dyn FnMut(_)>);
        if let Some(window) = web::window() {
            _ = window
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
        }
        closure.forget();
    }
}

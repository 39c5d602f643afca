use crate::overlay;
use grove_core::{ControlState, PerformanceMode};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn mode_for_digit(key: &str) -> Option<PerformanceMode> {
    match key {
        "1" => Some(PerformanceMode::High),
        "2" => Some(PerformanceMode::Medium),
        "3" => Some(PerformanceMode::Low),
        _ => None,
    }
}

/// Manual fallbacks for every gesture action, active whether or not the
/// hand tracker came up.
pub fn handle_global_keydown(
    ev: &web::KeyboardEvent,
    control: &Rc<RefCell<ControlState>>,
    pending_mode: &Rc<RefCell<Option<PerformanceMode>>>,
) {
    let key = ev.key();
    if let Some(mode) = mode_for_digit(&key) {
        *pending_mode.borrow_mut() = Some(mode);
        log::info!("[keys] performance mode {}", mode.label());
        return;
    }
    match key.as_str() {
        "a" | "A" => {
            control.borrow_mut().morph.set_target(0.0);
            log::info!("[keys] assemble");
        }
        "s" | "S" => {
            control.borrow_mut().morph.set_target(1.0);
            log::info!("[keys] scatter");
        }
        "f" | "F" => {
            let mut c = control.borrow_mut();
            c.focus_active = !c.focus_active;
            log::info!("[keys] focus {}", c.focus_active);
        }
        "d" | "D" => {
            let mut c = control.borrow_mut();
            c.display_cycle = c.display_cycle.wrapping_add(1);
            log::info!("[keys] cycle display");
        }
        "h" | "H" => {
            if let Some(doc) = web::window().and_then(|w| w.document()) {
                overlay::toggle_help(&doc);
            }
            ev.prevent_default();
        }
        _ => {}
    }
}

pub fn wire_global_keydown(
    control: Rc<RefCell<ControlState>>,
    pending_mode: Rc<RefCell<Option<PerformanceMode>>>,
) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &control, &pending_mode);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

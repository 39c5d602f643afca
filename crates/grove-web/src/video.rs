use grove_core::{ControlState, GestureFsm, HandFrame, TrackingStatus};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[wasm_bindgen]
extern "C" {
    /// Provided by the embedding page: wraps the hand-landmark model.
    /// Returns a Float32Array of 63 floats (21 normalized keypoints) for one
    /// hand, or null/undefined when no hand is present.
    #[wasm_bindgen(js_namespace = window, js_name = detectHandLandmarks, catch)]
    fn detect_hand_landmarks(
        video: &web::HtmlVideoElement,
        timestamp_ms: f64,
    ) -> Result<JsValue, JsValue>;
}

/// True when the embedding page exposes a detector to bridge to.
pub fn detector_available() -> bool {
    web::window()
        .map(|w| js_sys::Reflect::has(&w, &JsValue::from_str("detectHandLandmarks")).unwrap_or(false))
        .unwrap_or(false)
}

/// Live camera capture feeding the gesture loop. Stopping releases the
/// device tracks before the element is dropped.
pub struct VideoCapture {
    video: web::HtmlVideoElement,
    stream: web::MediaStream,
}

impl VideoCapture {
    pub fn video(&self) -> &web::HtmlVideoElement {
        &self.video
    }

    pub fn stop(&self) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<web::MediaStreamTrack>() {
                track.stop();
            }
        }
        self.video.set_src_object(None);
        log::info!("[tracking] camera released");
    }
}

pub async fn open_camera(document: &web::Document) -> anyhow::Result<VideoCapture> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|e| anyhow::anyhow!("media devices unavailable: {:?}", e))?;
    let constraints = web::MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| anyhow::anyhow!("getUserMedia rejected: {:?}", e))?;
    let stream: web::MediaStream = JsFuture::from(promise)
        .await
        .map_err(|e| anyhow::anyhow!("camera permission denied: {:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("unexpected stream type: {:?}", e))?;

    let video: web::HtmlVideoElement = document
        .create_element("video")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    video.set_autoplay(true);
    video.set_muted(true);
    video.set_src_object(Some(&stream));
    let play = video.play().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    JsFuture::from(play)
        .await
        .map_err(|e| anyhow::anyhow!("video play failed: {:?}", e))?;
    Ok(VideoCapture { video, stream })
}

/// Per-video-frame loop, decoupled from the render tick: the detector runs
/// only when the video has decoded a new frame, and its output is folded
/// into the shared control state.
pub fn start_tracking_loop(
    control: Rc<RefCell<ControlState>>,
    fsm: Rc<RefCell<GestureFsm>>,
    capture: Rc<RefCell<Option<VideoCapture>>>,
    running: Rc<RefCell<bool>>,
) {
    let last_media_time = Rc::new(Cell::new(-1.0f64));
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !*running.borrow() {
            log::info!("[tracking] loop stopped");
            return;
        }
        if let Some(cap) = capture.borrow().as_ref() {
            let media_time = cap.video().current_time();
            if media_time != last_media_time.get() {
                last_media_time.set(media_time);
                let now_ms = js_sys::Date::now();
                let frame = sample_hand(cap.video(), now_ms);
                let out = fsm.borrow_mut().update(frame.as_ref(), now_ms);
                control.borrow_mut().apply_gesture(&out);
            }
        }
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

fn sample_hand(video: &web::HtmlVideoElement, now_ms: f64) -> Option<HandFrame> {
    match detect_hand_landmarks(video, now_ms) {
        Ok(value) if !value.is_null() && !value.is_undefined() => {
            let array: js_sys::Float32Array = value.dyn_into().ok()?;
            let data = array.to_vec();
            match HandFrame::from_slice(&data) {
                Ok(frame) => Some(frame),
                Err(e) => {
                    log::warn!("[tracking] dropped malformed frame: {}", e);
                    None
                }
            }
        }
        Ok(_) => None,
        Err(e) => {
            log::warn!("[tracking] detector error: {:?}", e);
            None
        }
    }
}

/// Best-effort async tracking setup: `Loading -> On` or `Loading -> Error`,
/// never retried. Failure leaves morph/orbit control purely manual.
pub async fn setup_tracking(
    document: web::Document,
    control: Rc<RefCell<ControlState>>,
    fsm: Rc<RefCell<GestureFsm>>,
    capture: Rc<RefCell<Option<VideoCapture>>>,
    running: Rc<RefCell<bool>>,
) {
    control.borrow_mut().tracking = TrackingStatus::Loading;
    if !detector_available() {
        log::warn!("[tracking] no detector bridge on the page");
        control.borrow_mut().tracking = TrackingStatus::Error;
        return;
    }
    match open_camera(&document).await {
        Ok(cap) => {
            *capture.borrow_mut() = Some(cap);
            control.borrow_mut().tracking = TrackingStatus::On;
            log::info!("[tracking] camera on");
            start_tracking_loop(control, fsm, capture, running);
        }
        Err(e) => {
            log::warn!("[tracking] init failed: {:?}", e);
            control.borrow_mut().tracking = TrackingStatus::Error;
        }
    }
}

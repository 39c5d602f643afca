use grove_core::{GestureClass, PerformanceMode, TrackingStatus};
use web_sys as web;

#[inline]
pub fn show_help(document: &web::Document) {
    if let Some(el) = document.get_element_by_id("help-overlay") {
        let cl = el.class_list();
        _ = cl.remove_1("hidden");
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide_help(document: &web::Document) {
    if let Some(el) = document.get_element_by_id("help-overlay") {
        let cl = el.class_list();
        _ = cl.add_1("hidden");
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

#[inline]
pub fn is_help_hidden(document: &web::Document) -> bool {
    if let Some(el) = document.get_element_by_id("help-overlay") {
        if el.class_list().contains("hidden") {
            return true;
        }
        return el
            .get_attribute("style")
            .map(|s| s.contains("display:none"))
            .unwrap_or(false);
    }
    false
}

#[inline]
pub fn toggle_help(document: &web::Document) {
    if is_help_hidden(document) {
        show_help(document);
    } else {
        hide_help(document);
    }
}

/// Update the status line with the tracking lifecycle and current controls.
pub fn update_status(
    document: &web::Document,
    tracking: TrackingStatus,
    stable: GestureClass,
    mode: PerformanceMode,
) {
    if let Some(el) = document.get_element_by_id("status-overlay") {
        let html = format!(
            "<div style='color: #cfe7ff; font: 13px system-ui; background: rgba(10, 14, 24, 0.8); padding: 8px 12px; border-radius: 6px; border: 1px solid rgba(80, 110, 150, 0.35);'>tracking: {} • gesture: {} • quality: {}</div>",
            tracking.as_str(),
            stable.as_str(),
            mode.label()
        );
        el.set_inner_html(&html);
    }
}

use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions};

use crate::effects::StylePatch;

pub fn document() -> Option<Document> {
    window()?.document()
}

pub fn body() -> Option<HtmlElement> {
    document()?.body()
}

pub fn query(selector: &str) -> Option<Element> {
    document()?.query_selector(selector).ok().flatten()
}

/// Every element matching `selector`; an invalid selector yields nothing.
pub fn query_all(selector: &str) -> Vec<Element> {
    let Some(list) = document().and_then(|d| d.query_selector_all(selector).ok()) else {
        return Vec::new();
    };

    (0..list.length())
        .filter_map(|index| list.get(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn apply_patch(element: &Element, patch: &StylePatch) {
    let Some(element) = element.dyn_ref::<HtmlElement>() else {
        return;
    };

    let style = element.style();
    for (property, value) in patch.iter() {
        let _ = style.set_property(property, value);
    }
}

pub fn offset_height(selector: &str) -> Option<f64> {
    query(selector)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        .map(|element| f64::from(element.offset_height()))
}

pub fn offset_top(element: &Element) -> f64 {
    element
        .dyn_ref::<HtmlElement>()
        .map(|element| f64::from(element.offset_top()))
        .unwrap_or(0.0)
}

pub fn scroll_y() -> f64 {
    window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0)
}

pub fn inner_height() -> f64 {
    window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0)
}

pub fn document_height() -> f64 {
    document()
        .and_then(|d| d.document_element())
        .map(|root| f64::from(root.scroll_height()))
        .unwrap_or(0.0)
}

pub fn smooth_scroll_to(top: f64) {
    let Some(win) = window() else {
        return;
    };

    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    win.scroll_to_with_scroll_to_options(&options);
}

pub fn set_body_style(property: &str, value: &str) {
    if let Some(body) = body() {
        let _ = body.style().set_property(property, value);
    }
}

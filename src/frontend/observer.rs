use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use serde_json::json;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::coordinator::{Intersection, ObserverBackend, RevealOptions, VisibilityCoordinator};
use crate::effects::StylePatch;
use crate::log::{log_event, LogLevel};

use super::dom;

/// Elements are keyed by their position in the registered list.
pub struct DomObserver {
    observer: IntersectionObserver,
    elements: Rc<Vec<Element>>,
}

impl ObserverBackend<usize> for DomObserver {
    fn observe(&mut self, key: &usize) {
        if let Some(element) = self.elements.get(*key) {
            self.observer.observe(element);
        }
    }

    fn unobserve(&mut self, key: &usize) {
        if let Some(element) = self.elements.get(*key) {
            self.observer.unobserve(element);
        }
    }
}

type Coordinator = VisibilityCoordinator<usize, DomObserver>;

/// Owns one observer and its pending effects. Dropping it disconnects the
/// observer; effects that already fired are not undone.
pub struct RevealBinding {
    coordinator: Rc<RefCell<Option<Coordinator>>>,
    _callback: Closure<dyn FnMut(Array)>,
}

impl RevealBinding {
    /// Returns `None` when nothing matches or the browser lacks
    /// `IntersectionObserver`.
    pub fn install<F>(
        name: &'static str,
        elements: Vec<Element>,
        options: RevealOptions,
        initial: StylePatch,
        log_level: LogLevel,
        effect: F,
    ) -> Option<Self>
    where
        F: Fn(&Element) + Clone + 'static,
    {
        if elements.is_empty() {
            return None;
        }

        let elements = Rc::new(elements);
        let slot: Rc<RefCell<Option<Coordinator>>> = Rc::new(RefCell::new(None));

        let callback = {
            let slot = slot.clone();
            let elements = elements.clone();
            Closure::<dyn FnMut(Array)>::new(move |entries: Array| {
                let batch: Vec<Intersection<usize>> = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .filter_map(|entry| {
                        let target = entry.target();
                        let key = elements.iter().position(|element| *element == target)?;
                        Some(Intersection {
                            key,
                            ratio: entry.intersection_ratio(),
                            is_intersecting: entry.is_intersecting(),
                        })
                    })
                    .collect();

                let mut slot = slot.borrow_mut();
                let Some(coordinator) = slot.as_mut() else {
                    return;
                };

                let fired = coordinator.handle_batch(batch);
                if !fired.is_empty() {
                    log_event(
                        log_level,
                        LogLevel::Debug,
                        "effect_fired",
                        json!({
                            "preset": name,
                            "fired": fired.len(),
                            "pending": coordinator.pending(),
                        }),
                    );
                }
            })
        };

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin.to_css());

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init).ok()?;

        let mut coordinator = VisibilityCoordinator::new(
            options,
            DomObserver {
                observer,
                elements: elements.clone(),
            },
        );

        let effect_targets = elements.clone();
        let added = coordinator.register(
            0..elements.len(),
            |key| {
                if let Some(element) = elements.get(*key) {
                    dom::apply_patch(element, &initial);
                }
            },
            move |key| {
                if let Some(element) = effect_targets.get(*key) {
                    effect(element);
                }
            },
        );

        log_event(
            log_level,
            LogLevel::Debug,
            "effect_registered",
            json!({
                "preset": name,
                "elements": added,
                "threshold": options.threshold,
                "root_margin": options.root_margin.to_css(),
            }),
        );

        *slot.borrow_mut() = Some(coordinator);

        Some(Self {
            coordinator: slot,
            _callback: callback,
        })
    }
}

impl Drop for RevealBinding {
    fn drop(&mut self) {
        if let Some(mut coordinator) = self.coordinator.borrow_mut().take() {
            coordinator.disconnect();
            coordinator.backend().observer.disconnect();
        }
    }
}

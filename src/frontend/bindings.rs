use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_render::{request_animation_frame, AnimationFrame};
use gloo_timers::{callback::Timeout, future::TimeoutFuture};
use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    window, CanvasRenderingContext2d, Element, Event, HtmlCanvasElement, HtmlElement,
};

use crate::config::SiteConfig;
use crate::counter::{parse_target, CounterStrategy};
use crate::effects::{self, RevealPreset, StylePatch};
use crate::log::{log_event, LogLevel};
use crate::nav::{page_transition_for, PageTransition, PAGE_FADE_IN_DELAY_MS, PAGE_FADE_OUT_MS};
use crate::particles::{ParticleField, DEFAULT_PARTICLE_COUNT};
use crate::scroll::{
    anchor_scroll_target, internal_anchor, section_scroll_target, FRAGMENT_SCROLL_DELAY_MS,
};

use super::dom;
use super::observer::RevealBinding;

const NAVBAR: &str = ".navbar";
const SERVICES_NAV: &str = ".services-nav";

/// Every document-level behavior wired against the rendered markup.
///
/// Dropping the value tears down observers, listeners and timers and removes
/// the nodes it injected. Counter and typing runs already in flight are not
/// cancelled.
pub struct Bindings {
    reveals: Vec<RevealBinding>,
    listeners: Vec<EventListener>,
    timeouts: Vec<Timeout>,
    fragment_timeout: Rc<RefCell<Option<Timeout>>>,
    injected: Vec<Element>,
    particles: Option<ParticleLoop>,
}

impl Bindings {
    pub fn install(config: &SiteConfig) -> Self {
        let mut bindings = Self {
            reveals: Vec::new(),
            listeners: Vec::new(),
            timeouts: Vec::new(),
            fragment_timeout: Rc::new(RefCell::new(None)),
            injected: Vec::new(),
            particles: None,
        };

        bindings.install_reveals(config.log_level);
        bindings.install_stat_counters(config.counter, config.log_level);
        bindings.install_scroll_effects();
        bindings.install_hero();
        bindings.install_card_hover();
        bindings.install_loops();
        bindings.install_section_navigation();
        bindings.install_page_transitions();

        if config.particles {
            bindings.particles = dom::query(".hero").and_then(ParticleLoop::start);
        }

        log_event(
            config.log_level,
            LogLevel::Info,
            "bindings_installed",
            json!({
                "reveals": bindings.reveals.len(),
                "listeners": bindings.listeners.len(),
                "timers": bindings.timeouts.len(),
                "particles": bindings.particles.is_some(),
                "counter": config.counter.as_str(),
            }),
        );

        bindings
    }

    fn install_reveals(&mut self, log_level: LogLevel) {
        for preset in [RevealPreset::FadeUp, RevealPreset::TextReveal] {
            let revealed = preset.revealed();
            let binding = RevealBinding::install(
                preset.as_str(),
                dom::query_all(preset.selector()),
                preset.options(),
                preset.initial(),
                log_level,
                move |element| dom::apply_patch(element, &revealed),
            );
            self.reveals.extend(binding);
        }
    }

    fn install_stat_counters(&mut self, strategy: CounterStrategy, log_level: LogLevel) {
        let counters: Vec<Element> = dom::query_all(".stat-number")
            .into_iter()
            .filter(|element| read_count(element).is_some())
            .collect();

        let binding = RevealBinding::install(
            "stat_counter",
            counters,
            effects::stat_counter_options(),
            StylePatch::new(),
            log_level,
            move |element| {
                if let Some(target) = read_count(element) {
                    spawn_local(run_counter(element.clone(), strategy, target));
                }
            },
        );
        self.reveals.extend(binding);
    }

    fn install_scroll_effects(&mut self) {
        let Some(win) = window() else {
            return;
        };

        if let Some(navbar) = dom::query(NAVBAR) {
            self.listeners.push(EventListener::new(&win, "scroll", move |_| {
                dom::apply_patch(&navbar, &effects::navbar_patch(dom::scroll_y()));
            }));
        }

        if let Some(background) = dom::query(".hero-background") {
            self.listeners.push(EventListener::new(&win, "scroll", move |_| {
                dom::apply_patch(&background, &effects::parallax_patch(dom::scroll_y()));
            }));
        }

        let Some(bar) = dom::document().and_then(|d| d.create_element("div").ok()) else {
            return;
        };
        dom::apply_patch(&bar, &effects::progress_bar_base());
        let Some(body) = dom::body() else {
            return;
        };
        if body.append_child(&bar).is_err() {
            return;
        }
        self.injected.push(bar.clone());
        self.listeners.push(EventListener::new(&win, "scroll", move |_| {
            let percent = effects::scroll_progress(
                dom::scroll_y(),
                dom::document_height(),
                dom::inner_height(),
            );
            dom::apply_patch(&bar, &effects::progress_bar_patch(percent));
        }));
    }

    fn install_hero(&mut self) {
        let heroes = dom::query_all(".hero-title, .hero-subtitle, .hero-buttons");
        for (index, element) in heroes.iter().enumerate() {
            dom::apply_patch(element, &effects::hero_initial(index));
        }
        if !heroes.is_empty() {
            self.timeouts
                .push(Timeout::new(effects::HERO_REVEAL_DELAY_MS, move || {
                    for element in &heroes {
                        dom::apply_patch(element, &effects::hero_revealed());
                    }
                }));
        }

        if let Some(title) = dom::query(".hero-title") {
            let text = title.text_content().unwrap_or_default();
            title.set_text_content(Some(""));
            dom::apply_patch(&title, &effects::typing_caret(true));
            spawn_local(run_typing(title, text));
        }
    }

    fn install_card_hover(&mut self) {
        for card in dom::query_all(".service-card, .value-card, .team-member, .faq-item") {
            let target = card.clone();
            self.listeners
                .push(EventListener::new(&card, "mouseenter", move |_| {
                    dom::apply_patch(&target, &effects::card_hover(true));
                }));
            let target = card.clone();
            self.listeners
                .push(EventListener::new(&card, "mouseleave", move |_| {
                    dom::apply_patch(&target, &effects::card_hover(false));
                }));
        }
    }

    fn install_loops(&mut self) {
        for section in dom::query_all(".cta") {
            dom::apply_patch(&section, &effects::gradient_patch());
        }
        for icon in dom::query_all(".service-icon, .value-icon, .method-icon") {
            dom::apply_patch(&icon, &effects::float_patch());
        }

        let Some(document) = dom::document() else {
            return;
        };
        let (Some(head), Ok(style)) = (document.head(), document.create_element("style")) else {
            return;
        };
        style.set_text_content(Some(effects::KEYFRAMES_CSS));
        if head.append_child(&style).is_ok() {
            self.injected.push(style);
        }
    }

    fn install_section_navigation(&mut self) {
        for item in dom::query_all(".service-nav-item") {
            let link = item.clone();
            self.listeners.push(EventListener::new_with_options(
                &item,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event: &Event| {
                    event.prevent_default();
                    let Some(href) = link.get_attribute("href") else {
                        return;
                    };
                    if !scroll_to_section(&href) {
                        return;
                    }
                    if let Some(history) = window().and_then(|w| w.history().ok()) {
                        let _ = history.push_state_with_url(
                            &wasm_bindgen::JsValue::NULL,
                            "",
                            Some(&href),
                        );
                    }
                },
            ));
        }

        for anchor in dom::query_all("a[href^=\"#\"]:not(.service-nav-item)") {
            let link = anchor.clone();
            self.listeners.push(EventListener::new_with_options(
                &anchor,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event: &Event| {
                    let href = link.get_attribute("href").unwrap_or_default();
                    let Some(selector) = internal_anchor(&href) else {
                        return;
                    };
                    let Some(target) = dom::query(selector) else {
                        return;
                    };
                    event.prevent_default();
                    let header = dom::offset_height(NAVBAR).unwrap_or(0.0);
                    dom::smooth_scroll_to(anchor_scroll_target(dom::offset_top(&target), header));
                },
            ));
        }

        schedule_fragment_scroll(&self.fragment_timeout);
        if let Some(win) = window() {
            let slot = self.fragment_timeout.clone();
            self.listeners.push(EventListener::new(&win, "hashchange", move |_| {
                schedule_fragment_scroll(&slot);
            }));
        }
    }

    fn install_page_transitions(&mut self) {
        for link in dom::query_all("a[href^=\"/\"], a[href^=\"..\"], a[href^=\"pages/\"]") {
            let anchor = link.clone();
            self.listeners.push(EventListener::new_with_options(
                &link,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event: &Event| {
                    let href = anchor.get_attribute("href").unwrap_or_default();
                    let target = anchor.get_attribute("target").unwrap_or_default();
                    if page_transition_for(&href, &target) != PageTransition::FadeOut {
                        return;
                    }
                    event.prevent_default();
                    dom::set_body_style("transition", "opacity 0.3s ease");
                    dom::set_body_style("opacity", "0");
                    // Navigation leaves the page, so nothing owns this timer.
                    Timeout::new(PAGE_FADE_OUT_MS, move || {
                        if let Some(win) = window() {
                            let _ = win.location().set_href(&href);
                        }
                    })
                    .forget();
                },
            ));
        }

        dom::set_body_style("opacity", "0");
        dom::set_body_style("transition", "opacity 0.5s ease");
        self.timeouts.push(Timeout::new(PAGE_FADE_IN_DELAY_MS, || {
            dom::set_body_style("opacity", "1");
        }));
    }
}

impl Drop for Bindings {
    fn drop(&mut self) {
        for node in self.injected.drain(..) {
            node.remove();
        }
        self.fragment_timeout.borrow_mut().take();
    }
}

fn read_count(element: &Element) -> Option<u64> {
    element
        .get_attribute("data-count")
        .as_deref()
        .and_then(parse_target)
}

async fn run_counter(element: Element, strategy: CounterStrategy, target: u64) {
    let step_ms = strategy.step_ms();
    for value in strategy.frames(target) {
        TimeoutFuture::new(step_ms).await;
        element.set_text_content(Some(&value.to_string()));
    }
}

async fn run_typing(title: Element, text: String) {
    TimeoutFuture::new(effects::TYPING_START_DELAY_MS).await;
    let total = text.chars().count();
    for count in 1..=total {
        title.set_text_content(Some(effects::typed_prefix(&text, count)));
        TimeoutFuture::new(effects::TYPING_CHAR_DELAY_MS).await;
    }
    dom::apply_patch(&title, &effects::typing_caret(false));
}

/// Scrolls below the fixed header and services bar. Returns `false` when
/// the section does not exist.
fn scroll_to_section(selector: &str) -> bool {
    let Some(target) = dom::query(selector) else {
        return false;
    };
    let header = dom::offset_height(NAVBAR).unwrap_or(0.0);
    let secondary = dom::offset_height(SERVICES_NAV);
    dom::smooth_scroll_to(section_scroll_target(
        dom::offset_top(&target),
        header,
        secondary,
    ));
    true
}

fn schedule_fragment_scroll(slot: &Rc<RefCell<Option<Timeout>>>) {
    let Some(hash) = window().and_then(|w| w.location().hash().ok()) else {
        return;
    };
    let Some(selector) = internal_anchor(&hash).map(str::to_string) else {
        return;
    };
    if dom::query(&selector).is_none() {
        return;
    }

    let timeout = Timeout::new(FRAGMENT_SCROLL_DELAY_MS, move || {
        scroll_to_section(&selector);
    });
    *slot.borrow_mut() = Some(timeout);
}

struct ParticleLoop {
    frame: Rc<RefCell<Option<AnimationFrame>>>,
    canvas: HtmlCanvasElement,
    _resize: EventListener,
}

impl ParticleLoop {
    fn start(hero: Element) -> Option<Self> {
        let hero = hero.dyn_into::<HtmlElement>().ok()?;
        let canvas = dom::document()?
            .create_element("canvas")
            .ok()?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        dom::apply_patch(
            &canvas,
            &StylePatch::new()
                .set("position", "absolute")
                .set("top", "0")
                .set("left", "0")
                .set("width", "100%")
                .set("height", "100%")
                .set("z-index", "-1"),
        );
        hero.append_child(&canvas).ok()?;

        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;

        let (width, height) = (hero.offset_width().max(0), hero.offset_height().max(0));
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let field = Rc::new(RefCell::new(ParticleField::new(
            f64::from(width),
            f64::from(height),
            DEFAULT_PARTICLE_COUNT,
            js_sys::Math::random,
        )));

        let resize = {
            let field = field.clone();
            let canvas = canvas.clone();
            let win = window()?;
            EventListener::new(&win, "resize", move |_| {
                let (width, height) = (hero.offset_width().max(0), hero.offset_height().max(0));
                canvas.set_width(width as u32);
                canvas.set_height(height as u32);
                field
                    .borrow_mut()
                    .resize(f64::from(width), f64::from(height));
            })
        };

        let frame = Rc::new(RefCell::new(None));
        schedule_particle_frame(frame.clone(), field, context);

        Some(Self {
            frame,
            canvas,
            _resize: resize,
        })
    }
}

impl Drop for ParticleLoop {
    fn drop(&mut self) {
        self.frame.borrow_mut().take();
        self.canvas.remove();
    }
}

fn schedule_particle_frame(
    frame: Rc<RefCell<Option<AnimationFrame>>>,
    field: Rc<RefCell<ParticleField>>,
    context: CanvasRenderingContext2d,
) {
    let next = frame.clone();
    let handle = request_animation_frame(move |_| {
        next.borrow_mut().take();
        draw_particles(&context, &mut field.borrow_mut());
        schedule_particle_frame(next, field, context);
    });
    *frame.borrow_mut() = Some(handle);
}

fn draw_particles(context: &CanvasRenderingContext2d, field: &mut ParticleField) {
    let (width, height) = field.size();
    context.clear_rect(0.0, 0.0, width, height);
    field.tick();
    for particle in field.particles() {
        context.set_fill_style_str(&particle.fill_style());
        context.begin_path();
        let _ = context.arc(particle.x, particle.y, particle.size, 0.0, PI * 2.0);
        context.fill();
    }
}

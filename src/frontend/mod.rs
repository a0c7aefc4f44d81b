mod bindings;
mod contact;
mod dom;
mod observer;

use gloo_events::EventListener;
use serde_json::json;
use wasm_bindgen::JsCast;
use web_sys::{window, Element, Event, Node};
use yew::prelude::*;

use crate::config::SiteConfig;
use crate::log::{log_event, LogLevel, DEFAULT_LOG_LEVEL};
use crate::nav::MenuState;

use bindings::Bindings;
use contact::ContactForm;

struct Service {
    id: &'static str,
    icon: &'static str,
    title: &'static str,
    summary: &'static str,
}

const SERVICES: [Service; 3] = [
    Service {
        id: "web-design",
        icon: "fas fa-laptop-code",
        title: "Web Design",
        summary: "Fast, accessible sites built around the way your customers actually browse.",
    },
    Service {
        id: "seo",
        icon: "fas fa-chart-line",
        title: "Search Optimization",
        summary: "Technical audits and content plans that move you up for the searches that matter.",
    },
    Service {
        id: "branding",
        icon: "fas fa-palette",
        title: "Brand Strategy",
        summary: "Positioning, naming and visual systems that stay consistent on every channel.",
    },
];

const STATS: [(&str, &str); 4] = [
    ("150", "Projects delivered"),
    ("98", "Client retention %"),
    ("12", "Years in business"),
    ("24", "Hour response time"),
];

const FAQS: [(&str, &str); 3] = [
    (
        "How long does a typical project take?",
        "Most sites launch within six to ten weeks of kickoff.",
    ),
    (
        "Do you work with small businesses?",
        "Yes. Most of our clients have fewer than fifty employees.",
    ),
    (
        "Can you maintain the site after launch?",
        "We offer monthly care plans covering updates, backups and reporting.",
    ),
];

fn is_inside(container: &NodeRef, event: &Event) -> bool {
    let Some(container) = container.cast::<Element>() else {
        return false;
    };
    let target = event
        .target()
        .and_then(|target| target.dyn_into::<Node>().ok());
    container.contains(target.as_ref())
}

#[function_component(NavBar)]
fn nav_bar() -> Html {
    let menu = use_state(MenuState::default);
    let hamburger_ref = use_node_ref();
    let menu_ref = use_node_ref();

    {
        let menu = menu.clone();
        let hamburger_ref = hamburger_ref.clone();
        let menu_ref = menu_ref.clone();
        let current = *menu;
        use_effect_with(current, move |current| {
            dom::set_body_style("overflow", current.body_overflow());

            let current = *current;
            let listener = dom::document().map(|document| {
                EventListener::new(&document, "click", move |event| {
                    let inside_hamburger = is_inside(&hamburger_ref, event);
                    let inside_menu = is_inside(&menu_ref, event);
                    if current.should_close_on_outside_click(inside_hamburger, inside_menu) {
                        menu.set(current.closed());
                    }
                })
            });

            move || drop(listener)
        });
    }

    let on_toggle = {
        let menu = menu.clone();
        Callback::from(move |_: MouseEvent| menu.set((*menu).toggled()))
    };

    let on_link = {
        let menu = menu.clone();
        Callback::from(move |_: MouseEvent| menu.set((*menu).closed()))
    };

    let active = menu.is_open().then_some("active");
    let links = [
        ("#services", "Services"),
        ("#about", "About"),
        ("#faq", "FAQ"),
        ("#contact", "Contact"),
    ];

    html! {
        <nav class="navbar">
            <div class="nav-container">
                <a class="nav-logo" href="/">{"Brightline Studio"}</a>
                <ul id="nav-menu" class={classes!("nav-menu", active)} ref={menu_ref}>
                    { for links.iter().map(|(href, label)| html! {
                        <li class="nav-item">
                            <a class="nav-link" href={*href} onclick={on_link.clone()}>{*label}</a>
                        </li>
                    }) }
                </ul>
                <button
                    id="hamburger"
                    class={classes!("hamburger", active)}
                    type="button"
                    aria-label="Toggle navigation"
                    aria-expanded={menu.is_open().to_string()}
                    aria-controls="nav-menu"
                    onclick={on_toggle}
                    ref={hamburger_ref}
                >
                    <span class="bar"></span>
                    <span class="bar"></span>
                    <span class="bar"></span>
                </button>
            </div>
        </nav>
    }
}

#[derive(Properties, PartialEq)]
struct AppProps {
    config: SiteConfig,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    {
        let config = props.config.clone();
        use_effect_with((), move |_| {
            let bindings = Bindings::install(&config);
            move || drop(bindings)
        });
    }

    html! {
        <>
            <NavBar />
            <header class="hero">
                <div class="hero-background"></div>
                <div class="hero-content">
                    <h1 class="hero-title">{"Websites that earn their keep"}</h1>
                    <p class="hero-subtitle">
                        {"Design, search and brand work for teams that measure results."}
                    </p>
                    <div class="hero-buttons">
                        <a class="btn btn-primary" href="#contact">{"Start a project"}</a>
                        <a class="btn btn-secondary" href="#services">{"See services"}</a>
                    </div>
                </div>
            </header>

            <main id="content">
                <section id="services" class="services">
                    <h2 class="section-title">{"Services"}</h2>
                    <p class="section-subtitle">{"Pick one or combine them into a single engagement."}</p>
                    <div class="services-nav">
                        { for SERVICES.iter().map(|service| html! {
                            <a class="service-nav-item" href={format!("#{}", service.id)}>{service.title}</a>
                        }) }
                    </div>
                    <div class="services-grid">
                        { for SERVICES.iter().map(|service| html! {
                            <article id={service.id} class="service-card">
                                <div class="service-icon"><i class={service.icon}></i></div>
                                <h3>{service.title}</h3>
                                <p>{service.summary}</p>
                            </article>
                        }) }
                    </div>
                </section>

                <section id="stats" class="stats">
                    <div class="stats-grid">
                        { for STATS.iter().map(|(count, label)| html! {
                            <div class="stat-item">
                                <span class="stat-number" data-count={*count}>{"0"}</span>
                                <span class="stat-label">{*label}</span>
                            </div>
                        }) }
                    </div>
                </section>

                <section id="about" class="about">
                    <h2 class="section-title">{"Why teams pick us"}</h2>
                    <div class="values-grid">
                        <div class="value-card">
                            <div class="value-icon"><i class="fas fa-bolt"></i></div>
                            <h3>{"Speed"}</h3>
                            <p>{"Weekly releases you can click through, not monthly status decks."}</p>
                        </div>
                        <div class="value-card">
                            <div class="value-icon"><i class="fas fa-eye"></i></div>
                            <h3>{"Clarity"}</h3>
                            <p>{"Fixed scopes, plain-language reports and one point of contact."}</p>
                        </div>
                        <div class="value-card">
                            <div class="value-icon"><i class="fas fa-handshake"></i></div>
                            <h3>{"Partnership"}</h3>
                            <p>{"We stay on after launch and measure what the work is worth."}</p>
                        </div>
                    </div>
                </section>

                <section id="faq" class="faq">
                    <h2 class="section-title">{"Questions"}</h2>
                    { for FAQS.iter().map(|(question, answer)| html! {
                        <div class="faq-item">
                            <h3>{*question}</h3>
                            <p>{*answer}</p>
                        </div>
                    }) }
                </section>

                <section class="cta">
                    <h2>{"Ready when you are"}</h2>
                    <a class="btn btn-light" href="#contact">{"Get a quote"}</a>
                </section>

                <section id="contact" class="contact">
                    <h2 class="section-title">{"Contact"}</h2>
                    <p class="section-subtitle">{"Tell us about the project and we will reply within a day."}</p>
                    <ContactForm
                        action={AttrValue::from(props.config.form_action.clone())}
                        log_level={props.config.log_level}
                    />
                </section>
            </main>

            <footer class="footer">
                <p>{"© Brightline Studio"}</p>
                <a href="pages/privacy.html">{"Privacy"}</a>
            </footer>
        </>
    }
}

pub fn run() {
    let Some(root) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("app"))
    else {
        log_event(
            DEFAULT_LOG_LEVEL,
            LogLevel::Warn,
            "mount_point_missing",
            json!({ "id": "app" }),
        );
        return;
    };

    let config = SiteConfig::from_attributes(|name| root.get_attribute(name));
    log_event(
        config.log_level,
        LogLevel::Debug,
        "site_config_loaded",
        json!({
            "particles": config.particles,
            "counter": config.counter.as_str(),
        }),
    );

    yew::Renderer::<App>::with_root_and_props(root, AppProps { config }).render();
}

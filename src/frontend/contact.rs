use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Event, FocusEvent, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, InputEvent,
    SubmitEvent,
};
use yew::prelude::*;

use crate::form::{
    contact_fields, interpret_response, Banner, FieldKind, FieldSpec, FormState, SubmitOutcome,
    SubmitRequest, ACCEPT_JSON, FORM_CONTENT_TYPE, SENDING_LABEL,
};
use crate::log::{log_event, LogLevel};

const SUBMIT_LABEL: &str = "Send Message";
const FIELD_ERROR_STYLE: &str = "color: #dc3545; font-size: 0.875rem; margin-top: 0.25rem;";
const SERVICE_OPTIONS: [(&str, &str); 4] = [
    ("web-design", "Web design"),
    ("seo", "Search optimization"),
    ("branding", "Brand strategy"),
    ("consulting", "Consulting"),
];

fn event_value(event: &Event) -> String {
    let Some(target) = event.target() else {
        return String::new();
    };

    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    if let Some(area) = target.dyn_ref::<HtmlTextAreaElement>() {
        return area.value();
    }
    if let Some(select) = target.dyn_ref::<HtmlSelectElement>() {
        return select.value();
    }
    String::new()
}

async fn submit(request: SubmitRequest) -> SubmitOutcome {
    let Ok(prepared) = Request::post(request.action.as_str())
        .header("Accept", ACCEPT_JSON)
        .header("Content-Type", FORM_CONTENT_TYPE)
        .body(request.body)
    else {
        return SubmitOutcome::network_failure();
    };

    let Ok(response) = prepared.send().await else {
        return SubmitOutcome::network_failure();
    };

    if response.ok() {
        return interpret_response(true, "");
    }

    let body = response.text().await.unwrap_or_default();
    interpret_response(false, &body)
}

#[derive(Properties, PartialEq)]
pub struct ContactFormProps {
    pub action: AttrValue,
    pub log_level: LogLevel,
}

#[function_component(ContactForm)]
pub fn contact_form(props: &ContactFormProps) -> Html {
    let form = use_state(|| FormState::new(contact_fields()));
    let submitting = use_state(|| false);
    let banner = use_state(|| None::<Banner>);
    let hide_timer = use_mut_ref(|| None::<Timeout>);

    let onsubmit = {
        let form = form.clone();
        let submitting = submitting.clone();
        let banner = banner.clone();
        let hide_timer = hide_timer.clone();
        let action = props.action.clone();
        let log_level = props.log_level;

        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();

            if *submitting {
                return;
            }

            let mut next = (*form).clone();
            let valid = next.validate_all();
            form.set(next.clone());
            if !valid {
                return;
            }

            let request = match SubmitRequest::new(&action, &next) {
                Ok(request) => request,
                Err(error) => {
                    log_event(
                        log_level,
                        LogLevel::Warn,
                        "form_submit_failed",
                        json!({ "reason": error.to_string() }),
                    );
                    banner.set(Some(interpret_response(false, "").banner()));
                    return;
                }
            };

            log_event(
                log_level,
                LogLevel::Info,
                "form_submit_started",
                json!({ "host": request.action.host_str().unwrap_or("unknown") }),
            );

            hide_timer.borrow_mut().take();
            banner.set(None);
            submitting.set(true);

            let form = form.clone();
            let submitting = submitting.clone();
            let banner = banner.clone();
            let hide_timer = hide_timer.clone();
            spawn_local(async move {
                let outcome = submit(request).await;
                log_event(
                    log_level,
                    LogLevel::Info,
                    "form_submit_finished",
                    json!({ "ok": outcome.ok, "messages": outcome.messages.len() }),
                );

                // `form` is the pre-submit snapshot; only a reset is written back.
                let mut settled = (*form).clone();
                let shown = settled.apply(&outcome);
                if outcome.ok {
                    form.set(settled);
                }

                if let Some(delay) = shown.auto_hide_ms {
                    let banner = banner.clone();
                    *hide_timer.borrow_mut() = Some(Timeout::new(delay, move || banner.set(None)));
                }
                banner.set(Some(shown));
                submitting.set(false);
            });
        })
    };

    let field_view = |spec: &FieldSpec| -> Html {
        let name = spec.name;
        let error = form.error(name);
        let value = form.value(name).to_string();

        let oninput = {
            let form = form.clone();
            Callback::from(move |event: InputEvent| {
                let mut next = (*form).clone();
                next.input(name, event_value(&event));
                form.set(next);
            })
        };
        let onchange = {
            let form = form.clone();
            Callback::from(move |event: Event| {
                let mut next = (*form).clone();
                next.input(name, event_value(&event));
                form.set(next);
            })
        };
        let onblur = {
            let form = form.clone();
            Callback::from(move |_event: FocusEvent| {
                let mut next = (*form).clone();
                next.blur(name);
                form.set(next);
            })
        };

        let class = classes!("form-control", error.is_some().then_some("error"));
        let control = match spec.kind {
            FieldKind::Select => html! {
                <select id={name} name={name} class={class} required={spec.required} {onchange} {onblur}>
                    <option value="" selected={value.is_empty()}>{"Select a service"}</option>
                    { for SERVICE_OPTIONS.iter().map(|(option, label)| html! {
                        <option value={*option} selected={value == *option}>{*label}</option>
                    }) }
                </select>
            },
            FieldKind::TextArea => html! {
                <textarea id={name} name={name} class={class} rows="5" required={spec.required} value={value} {oninput} {onblur} />
            },
            kind => html! {
                <input id={name} name={name} type={kind.input_type()} class={class} required={spec.required} value={value} {oninput} {onblur} />
            },
        };

        html! {
            <div class="form-group">
                <label for={name}>{spec.label}</label>
                {control}
                if let Some(error) = error {
                    <div class="field-error" style={FIELD_ERROR_STYLE}>{error.to_string()}</div>
                }
            </div>
        }
    };

    html! {
        <>
            <form
                id="contact-form"
                class={classes!("contact-form", (*submitting).then_some("form-loading"))}
                action={props.action.clone()}
                method="POST"
                novalidate={true}
                {onsubmit}
            >
                { for form.fields().iter().map(field_view) }
                <button type="submit" class="btn btn-primary" disabled={*submitting}>
                    { if *submitting { SENDING_LABEL } else { SUBMIT_LABEL } }
                </button>
            </form>
            if let Some(shown) = (*banner).clone() {
                <div id="formspree-messages" class={shown.kind.class()} style={shown.kind.inline_style()} role="status">
                    <i class={shown.kind.icon()}></i>
                    {" "}{shown.message}
                </div>
            }
        </>
    }
}

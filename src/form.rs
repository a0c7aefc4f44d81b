use std::{collections::HashMap, fmt, sync::LazyLock};

use regex::Regex;
use serde::Deserialize;
use url::{form_urlencoded, Url};

pub const ACCEPT_JSON: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const SUCCESS_BANNER_HIDE_MS: u32 = 5_000;
pub const SENDING_LABEL: &str = "Sending...";

const SUCCESS_MESSAGE: &str =
    "Thank you! Your message has been sent successfully. We will get back to you within 24 hours.";
const ERROR_LIST_PREFIX: &str = "There was an error with your submission: ";
const GENERIC_FAILURE_MESSAGE: &str = "There was a problem sending your message. Please try again.";
const NETWORK_FAILURE_MESSAGE: &str =
    "There was a network error. Please check your connection and try again.";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9\s\-()]{10,}$").expect("phone pattern compiles")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Select,
    TextArea,
}

impl FieldKind {
    pub fn input_type(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Select => "select",
            Self::TextArea => "textarea",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

pub fn contact_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec {
            name: "name",
            label: "Full name",
            kind: FieldKind::Text,
            required: true,
        },
        FieldSpec {
            name: "email",
            label: "Email address",
            kind: FieldKind::Email,
            required: true,
        },
        FieldSpec {
            name: "phone",
            label: "Phone number",
            kind: FieldKind::Tel,
            required: false,
        },
        FieldSpec {
            name: "service",
            label: "Service of interest",
            kind: FieldKind::Select,
            required: true,
        },
        FieldSpec {
            name: "message",
            label: "How can we help?",
            kind: FieldKind::TextArea,
            required: true,
        },
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldError {
    Required,
    InvalidEmail,
    InvalidPhone,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::Required => "This field is required",
            Self::InvalidEmail => "Please enter a valid email address",
            Self::InvalidPhone => "Please enter a valid phone number",
        };
        f.write_str(message)
    }
}

impl std::error::Error for FieldError {}

/// Checks one value. Shape checks only run on non-empty values, so an
/// optional email or phone may be left blank.
pub fn validate(kind: FieldKind, required: bool, value: &str) -> Result<(), FieldError> {
    let value = value.trim();

    if value.is_empty() {
        return if required {
            Err(FieldError::Required)
        } else {
            Ok(())
        };
    }

    match kind {
        FieldKind::Email if !EMAIL_PATTERN.is_match(value) => Err(FieldError::InvalidEmail),
        FieldKind::Tel if !PHONE_PATTERN.is_match(value) => Err(FieldError::InvalidPhone),
        _ => Ok(()),
    }
}

/// Field values plus the errors currently shown next to them.
#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    fields: Vec<FieldSpec>,
    values: HashMap<&'static str, String>,
    errors: HashMap<&'static str, FieldError>,
}

impl FormState {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self {
            fields,
            values: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn error(&self, name: &str) -> Option<FieldError> {
        self.errors.get(name).copied()
    }

    #[cfg(test)]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Typing stores the value and clears only this field's error.
    pub fn input(&mut self, name: &str, value: impl Into<String>) {
        let Some(spec) = self.spec(name) else {
            return;
        };
        let key = spec.name;
        self.values.insert(key, value.into());
        self.errors.remove(key);
    }

    /// Leaving a field validates it and shows the result.
    pub fn blur(&mut self, name: &str) -> bool {
        let Some(spec) = self.spec(name).cloned() else {
            return true;
        };
        self.check(&spec)
    }

    /// Validates every required field, showing each error. Optional
    /// fields keep whatever a previous blur showed.
    pub fn validate_all(&mut self) -> bool {
        let required: Vec<FieldSpec> = self
            .fields
            .iter()
            .filter(|spec| spec.required)
            .cloned()
            .collect();

        let mut valid = true;
        for spec in &required {
            if !self.check(spec) {
                valid = false;
            }
        }
        valid
    }

    pub fn reset(&mut self) {
        self.values.clear();
        self.errors.clear();
    }

    /// Settles a finished submission: a delivered message clears the form,
    /// a rejected one keeps what the visitor typed.
    pub fn apply(&mut self, outcome: &SubmitOutcome) -> Banner {
        if outcome.ok {
            self.reset();
        }
        outcome.banner()
    }

    /// Field values in declaration order, ready for encoding.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        self.fields
            .iter()
            .map(|spec| (spec.name, self.value(spec.name)))
            .collect()
    }

    fn spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    fn check(&mut self, spec: &FieldSpec) -> bool {
        self.errors.remove(spec.name);
        match validate(spec.kind, spec.required, self.value(spec.name)) {
            Ok(()) => true,
            Err(error) => {
                self.errors.insert(spec.name, error);
                false
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SubmitError {
    InvalidAction(String),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAction(action) => write!(f, "form action is not an http(s) URL: {action}"),
        }
    }
}

impl std::error::Error for SubmitError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitRequest {
    pub action: Url,
    pub body: String,
}

impl SubmitRequest {
    pub fn new(action: &str, form: &FormState) -> Result<Self, SubmitError> {
        let action = parse_action(action)?;
        Ok(Self {
            action,
            body: encode_body(form.pairs()),
        })
    }
}

pub fn parse_action(action: &str) -> Result<Url, SubmitError> {
    let invalid = || SubmitError::InvalidAction(action.to_string());
    let parsed = Url::parse(action.trim()).map_err(|_| invalid())?;

    if parsed.scheme() == "http" || parsed.scheme() == "https" {
        Ok(parsed)
    } else {
        Err(invalid())
    }
}

pub fn encode_body<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in pairs {
        serializer.append_pair(name.as_ref(), value.as_ref());
    }
    serializer.finish()
}

#[derive(Deserialize)]
struct ErrorListResponse {
    #[serde(default)]
    errors: Option<Vec<ErrorEntry>>,
}

#[derive(Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub ok: bool,
    pub messages: Vec<String>,
}

impl SubmitOutcome {
    pub fn network_failure() -> Self {
        Self {
            ok: false,
            messages: vec![NETWORK_FAILURE_MESSAGE.to_string()],
        }
    }

    pub fn banner(&self) -> Banner {
        if self.ok {
            return Banner {
                kind: BannerKind::Success,
                message: self.messages.join(", "),
                auto_hide_ms: Some(SUCCESS_BANNER_HIDE_MS),
            };
        }

        Banner {
            kind: BannerKind::Error,
            message: self.messages.join(", "),
            auto_hide_ms: None,
        }
    }
}

/// Maps an HTTP outcome to the messages shown to the visitor. A non-OK
/// response is read as `{"errors": [{"message": ...}]}` when it parses.
pub fn interpret_response(ok: bool, body: &str) -> SubmitOutcome {
    if ok {
        return SubmitOutcome {
            ok: true,
            messages: vec![SUCCESS_MESSAGE.to_string()],
        };
    }

    let listed = serde_json::from_str::<ErrorListResponse>(body)
        .ok()
        .and_then(|payload| payload.errors)
        .map(|errors| {
            errors
                .into_iter()
                .map(|entry| entry.message)
                .collect::<Vec<_>>()
        });

    let message = match listed {
        Some(messages) => format!("{ERROR_LIST_PREFIX}{}", messages.join(", ")),
        None => GENERIC_FAILURE_MESSAGE.to_string(),
    };

    SubmitOutcome {
        ok: false,
        messages: vec![message],
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

impl BannerKind {
    pub fn class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "fas fa-check-circle",
            Self::Error => "fas fa-exclamation-circle",
        }
    }

    pub fn inline_style(self) -> &'static str {
        match self {
            Self::Success => {
                "display: block; background: #d4edda; color: #155724; border: 1px solid #c3e6cb;"
            }
            Self::Error => {
                "display: block; background: #f8d7da; color: #721c24; border: 1px solid #f5c6cb;"
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    pub auto_hide_ms: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact_form() -> FormState {
        FormState::new(contact_fields())
    }

    #[test]
    fn required_field_rejects_blank_and_whitespace() {
        assert_eq!(validate(FieldKind::Text, true, ""), Err(FieldError::Required));
        assert_eq!(validate(FieldKind::Text, true, "   "), Err(FieldError::Required));
        assert_eq!(validate(FieldKind::Text, false, ""), Ok(()));
        assert_eq!(validate(FieldKind::Select, true, "seo"), Ok(()));
    }

    #[test]
    fn email_shape_needs_local_domain_and_tld() {
        for valid in ["a@b.co", " jane.doe@mail.example.org ", "x@y..z"] {
            assert_eq!(validate(FieldKind::Email, true, valid), Ok(()), "{valid}");
        }
        for invalid in ["plain", "@b.co", "a@b", "a@.co", "a@b.", "a b@c.de", "a@b@c.de"] {
            assert_eq!(
                validate(FieldKind::Email, true, invalid),
                Err(FieldError::InvalidEmail),
                "{invalid}"
            );
        }
    }

    #[test]
    fn phone_shape_is_loose_but_needs_ten_chars() {
        for valid in ["+1 (555) 123-4567", "5551234567", "555-123-4567"] {
            assert_eq!(validate(FieldKind::Tel, false, valid), Ok(()), "{valid}");
        }
        for invalid in ["555-1234", "555.123.4567", "+1 555 CALL NOW"] {
            assert_eq!(
                validate(FieldKind::Tel, false, invalid),
                Err(FieldError::InvalidPhone),
                "{invalid}"
            );
        }
    }

    #[test]
    fn shape_checks_follow_the_patterns_at_the_edges() {
        for valid in ["a@b..c", "x@y.z."] {
            assert_eq!(validate(FieldKind::Email, true, valid), Ok(()), "{valid}");
        }
        assert_eq!(
            validate(FieldKind::Email, true, "a\u{3000}b@c.de"),
            Err(FieldError::InvalidEmail)
        );
        for invalid in ["++1234567890", "\u{0660}\u{0661}\u{0662}\u{0663}\u{0664}\u{0665}\u{0666}\u{0667}\u{0668}\u{0669}"] {
            assert_eq!(
                validate(FieldKind::Tel, false, invalid),
                Err(FieldError::InvalidPhone),
                "{invalid}"
            );
        }
    }

    #[test]
    fn field_error_messages_match_inline_copy() {
        assert_eq!(FieldError::Required.to_string(), "This field is required");
        assert_eq!(
            FieldError::InvalidEmail.to_string(),
            "Please enter a valid email address"
        );
    }

    #[test]
    fn blur_shows_and_typing_clears_only_that_field() {
        let mut form = contact_form();

        assert!(!form.blur("name"));
        form.input("email", "not-an-email");
        assert!(!form.blur("email"));
        assert_eq!(form.error("name"), Some(FieldError::Required));
        assert_eq!(form.error("email"), Some(FieldError::InvalidEmail));

        form.input("email", "fixed@example.com");

        assert_eq!(form.error("email"), None);
        assert_eq!(form.error("name"), Some(FieldError::Required));
        assert!(form.blur("email"));
    }

    #[test]
    fn validate_all_checks_required_fields_only() {
        let mut form = contact_form();
        form.input("phone", "123");

        assert!(!form.validate_all());
        assert_eq!(form.error("message"), Some(FieldError::Required));
        assert_eq!(form.error("phone"), None);

        form.input("name", "Jane");
        form.input("email", "jane@example.com");
        form.input("service", "consulting");
        form.input("message", "Hello");

        assert!(form.validate_all());
        assert!(!form.has_errors());
    }

    #[test]
    fn unknown_field_names_are_ignored() {
        let mut form = contact_form();

        form.input("fax", "123");

        assert!(form.blur("fax"));
        assert_eq!(form.value("fax"), "");
    }

    #[test]
    fn reset_clears_values_and_errors() {
        let mut form = contact_form();
        form.input("name", "Jane");
        form.validate_all();

        form.reset();

        assert_eq!(form.value("name"), "");
        assert!(!form.has_errors());
    }

    #[test]
    fn request_encodes_fields_in_order() {
        let mut form = contact_form();
        form.input("name", "Jane Doe");
        form.input("email", "jane@example.com");
        form.input("message", "Hi & bye");

        let request =
            SubmitRequest::new("https://formspree.io/f/abc123", &form).expect("valid action");

        assert_eq!(request.action.host_str(), Some("formspree.io"));
        assert_eq!(
            request.body,
            "name=Jane+Doe&email=jane%40example.com&phone=&service=&message=Hi+%26+bye"
        );
    }

    #[test]
    fn non_http_actions_are_rejected() {
        assert!(parse_action("javascript:alert(1)").is_err());
        assert!(parse_action("/relative").is_err());
        assert!(parse_action("http://localhost:8080/submit").is_ok());
    }

    #[test]
    fn ok_response_shows_auto_hiding_success_banner() {
        let banner = interpret_response(true, "").banner();

        assert_eq!(banner.kind, BannerKind::Success);
        assert_eq!(banner.auto_hide_ms, Some(5_000));
        assert!(banner.message.starts_with("Thank you!"));
    }

    #[test]
    fn delivered_submission_clears_form_and_hides_banner_later() {
        let mut form = contact_form();
        form.input("name", "Jane");
        form.input("email", "jane@example.com");
        form.input("message", "Hello");

        let banner = form.apply(&interpret_response(true, "{}"));

        assert_eq!(banner.kind, BannerKind::Success);
        assert_eq!(banner.auto_hide_ms, Some(SUCCESS_BANNER_HIDE_MS));
        assert!(form.pairs().iter().all(|(_, value)| value.is_empty()));
    }

    #[test]
    fn rejected_submission_keeps_what_was_typed() {
        let mut form = contact_form();
        form.input("name", "Jane");
        form.input("email", "jane@example.com");

        let banner = form.apply(&interpret_response(false, "<html>502</html>"));
        assert_eq!(banner.kind, BannerKind::Error);
        assert_eq!(banner.auto_hide_ms, None);

        form.apply(&SubmitOutcome::network_failure());
        assert_eq!(form.value("name"), "Jane");
        assert_eq!(form.value("email"), "jane@example.com");
    }

    #[test]
    fn error_list_is_joined_into_persistent_banner() {
        let body = r#"{"errors":[{"message":"email should be an email"},{"message":"message is required"}]}"#;

        let outcome = interpret_response(false, body);
        let banner = outcome.banner();

        assert!(!outcome.ok);
        assert_eq!(banner.kind, BannerKind::Error);
        assert_eq!(banner.auto_hide_ms, None);
        assert_eq!(
            banner.message,
            "There was an error with your submission: email should be an email, message is required"
        );
    }

    #[test]
    fn unparseable_or_listless_error_falls_back_to_generic_message() {
        for body in ["", "<html>502</html>", r#"{"error":"nope"}"#] {
            assert_eq!(
                interpret_response(false, body).messages,
                vec![GENERIC_FAILURE_MESSAGE.to_string()]
            );
        }
    }

    #[test]
    fn network_failure_is_an_error_banner() {
        let banner = SubmitOutcome::network_failure().banner();

        assert_eq!(banner.kind, BannerKind::Error);
        assert!(banner.message.contains("network error"));
    }
}

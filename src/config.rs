use crate::counter::{CounterStrategy, DEFAULT_DURATION_MS, DEFAULT_STEP_MS};
use crate::log::{LogLevel, DEFAULT_LOG_LEVEL};

pub const DEFAULT_FORM_ACTION: &str = "https://formspree.io/f/contact";
const COUNTER_DURATION_MS_BOUNDS: (u64, u64) = (100, 10_000);

pub fn parse_u64_with_bounds(raw: Option<&str>, default: u64, bounds: (u64, u64)) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

pub fn parse_non_empty_string(raw: Option<&str>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn parse_flag(raw: Option<&str>, default: bool) -> bool {
    match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        Some("on" | "true" | "1" | "yes") => true,
        Some("off" | "false" | "0" | "no") => false,
        _ => default,
    }
}

pub fn parse_log_level(raw: Option<&str>, default: LogLevel) -> LogLevel {
    raw.and_then(LogLevel::parse).unwrap_or(default)
}

/// Client settings read from `data-*` attributes on the mount element.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteConfig {
    pub form_action: String,
    pub particles: bool,
    pub counter: CounterStrategy,
    pub log_level: LogLevel,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            form_action: DEFAULT_FORM_ACTION.to_string(),
            particles: false,
            counter: CounterStrategy::default(),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl SiteConfig {
    /// `attribute` looks up a `data-*` name such as `data-form-action`.
    pub fn from_attributes(attribute: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let form_action = parse_non_empty_string(attribute("data-form-action").as_deref())
            .unwrap_or(defaults.form_action);
        let particles = parse_flag(attribute("data-particles").as_deref(), defaults.particles);
        let log_level = parse_log_level(attribute("data-log-level").as_deref(), defaults.log_level);

        let counter = match attribute("data-counter")
            .as_deref()
            .and_then(CounterStrategy::parse)
        {
            Some(CounterStrategy::FixedDuration { .. }) | None => {
                let duration_ms = parse_u64_with_bounds(
                    attribute("data-counter-duration-ms").as_deref(),
                    u64::from(DEFAULT_DURATION_MS),
                    COUNTER_DURATION_MS_BOUNDS,
                );
                CounterStrategy::FixedDuration {
                    duration_ms: duration_ms as u32,
                    step_ms: DEFAULT_STEP_MS,
                }
            }
            Some(ratio) => ratio,
        };

        Self {
            form_action,
            particles,
            counter,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_attributes_fall_back_to_defaults() {
        assert_eq!(SiteConfig::from_attributes(lookup(&[])), SiteConfig::default());
    }

    #[test]
    fn attributes_override_defaults() {
        let config = SiteConfig::from_attributes(lookup(&[
            ("data-form-action", " https://formspree.io/f/xyz "),
            ("data-particles", "on"),
            ("data-counter", "ratio"),
            ("data-log-level", "debug"),
        ]));

        assert_eq!(config.form_action, "https://formspree.io/f/xyz");
        assert!(config.particles);
        assert_eq!(config.counter, CounterStrategy::ratio());
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn out_of_bounds_duration_is_ignored() {
        let config = SiteConfig::from_attributes(lookup(&[("data-counter-duration-ms", "50")]));
        assert_eq!(config.counter, CounterStrategy::default());

        let config = SiteConfig::from_attributes(lookup(&[("data-counter-duration-ms", "3000")]));
        assert_eq!(
            config.counter,
            CounterStrategy::FixedDuration {
                duration_ms: 3_000,
                step_ms: DEFAULT_STEP_MS,
            }
        );
    }

    #[test]
    fn unknown_flag_values_keep_default() {
        assert!(!parse_flag(Some("maybe"), false));
        assert!(parse_flag(Some(" YES "), false));
        assert!(!parse_flag(None, false));
        assert_eq!(parse_non_empty_string(Some("   ")), None);
    }
}

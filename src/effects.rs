use crate::coordinator::{RevealOptions, RootMargin};

pub const NAVBAR_SCROLLED_AFTER_PX: f64 = 50.0;
pub const PARALLAX_RATE: f64 = -0.5;
pub const HERO_REVEAL_DELAY_MS: u32 = 100;
pub const TYPING_START_DELAY_MS: u32 = 1_000;
pub const TYPING_CHAR_DELAY_MS: u32 = 100;

pub const KEYFRAMES_CSS: &str = "\
@keyframes gradientShift {
    0% { background-position: 0% 50% }
    50% { background-position: 100% 50% }
    100% { background-position: 0% 50% }
}
@keyframes float {
    0% { transform: translateY(0px); }
    50% { transform: translateY(-10px); }
    100% { transform: translateY(0px); }
}";

/// Ordered CSS property assignments, computed without touching the document.
/// Later writes to the same property replace earlier ones in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StylePatch {
    entries: Vec<(&'static str, String)>,
}

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, property: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
        self
    }

    #[cfg(test)]
    pub fn merge(mut self, other: StylePatch) -> Self {
        for (property, value) in other.entries {
            self = self.set(property, value);
        }
        self
    }

    #[cfg(test)]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(name, value)| (*name, value.as_str()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealPreset {
    FadeUp,
    TextReveal,
}

impl RevealPreset {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FadeUp => "fade_up",
            Self::TextReveal => "text_reveal",
        }
    }

    pub fn selector(self) -> &'static str {
        match self {
            Self::FadeUp => {
                ".service-card, .feature-item, .stat-item, .value-card, .team-member, .advantage, .faq-item"
            }
            Self::TextReveal => ".section-title, .section-subtitle",
        }
    }

    pub fn options(self) -> RevealOptions {
        match self {
            Self::FadeUp => RevealOptions::new(0.1, RootMargin::bottom(-50.0)),
            Self::TextReveal => RevealOptions::default(),
        }
    }

    pub fn initial(self) -> StylePatch {
        match self {
            Self::FadeUp => StylePatch::new()
                .set("opacity", "0")
                .set("transform", "translateY(20px)")
                .set("transition", "opacity 0.5s ease, transform 0.5s ease"),
            Self::TextReveal => StylePatch::new()
                .set("opacity", "0")
                .set("transform", "translateX(-50px)")
                .set("transition", "all 0.8s ease"),
        }
    }

    pub fn revealed(self) -> StylePatch {
        let transform = match self {
            Self::FadeUp => "translateY(0)",
            Self::TextReveal => "translateX(0)",
        };
        StylePatch::new()
            .set("opacity", "1")
            .set("transform", transform)
    }
}

pub fn stat_counter_options() -> RevealOptions {
    RevealOptions::new(0.5, RootMargin::bottom(-50.0))
}

pub fn hero_initial(index: usize) -> StylePatch {
    let delay = index as f64 * 0.2;
    StylePatch::new()
        .set("opacity", "0")
        .set("transform", "translateY(30px)")
        .set("transition", format!("all 0.6s ease {}s", round_to(delay, 2)))
}

pub fn hero_revealed() -> StylePatch {
    StylePatch::new()
        .set("opacity", "1")
        .set("transform", "translateY(0)")
}

pub fn navbar_patch(scroll_y: f64) -> StylePatch {
    if scroll_y > NAVBAR_SCROLLED_AFTER_PX {
        StylePatch::new()
            .set("background", "rgba(255, 255, 255, 0.98)")
            .set("box-shadow", "0 2px 10px rgba(0,0,0,0.1)")
    } else {
        StylePatch::new()
            .set("background", "rgba(255, 255, 255, 0.95)")
            .set(
                "box-shadow",
                "0 1px 3px rgba(0,0,0,0.12), 0 1px 2px rgba(0,0,0,0.24)",
            )
    }
}

pub fn parallax_offset(scroll_y: f64) -> f64 {
    scroll_y * PARALLAX_RATE
}

pub fn parallax_patch(scroll_y: f64) -> StylePatch {
    StylePatch::new().set(
        "transform",
        format!("translate3d(0px, {}px, 0px)", parallax_offset(scroll_y)),
    )
}

/// Percent of the scrollable height already scrolled, in `0..=100`.
pub fn scroll_progress(scroll_top: f64, doc_height: f64, win_height: f64) -> f64 {
    let scrollable = doc_height - win_height;
    if scrollable <= 0.0 {
        return 0.0;
    }

    (scroll_top / scrollable * 100.0).clamp(0.0, 100.0)
}

pub fn progress_bar_patch(percent: f64) -> StylePatch {
    StylePatch::new().set("width", format!("{}%", round_to(percent, 2)))
}

pub fn progress_bar_base() -> StylePatch {
    StylePatch::new()
        .set("position", "fixed")
        .set("top", "0")
        .set("left", "0")
        .set("width", "0%")
        .set("height", "3px")
        .set("background", "var(--secondary)")
        .set("z-index", "1001")
        .set("transition", "width 0.1s ease")
}

pub fn card_hover(hovered: bool) -> StylePatch {
    if hovered {
        StylePatch::new()
            .set("transform", "translateY(-10px) scale(1.02)")
            .set("box-shadow", "0 20px 40px rgba(0,0,0,0.15)")
    } else {
        StylePatch::new()
            .set("transform", "translateY(0) scale(1)")
            .set("box-shadow", "")
    }
}

pub fn gradient_patch() -> StylePatch {
    StylePatch::new()
        .set(
            "background",
            "linear-gradient(135deg, var(--secondary) 0%, var(--secondary-dark) 50%, var(--secondary) 100%)",
        )
        .set("background-size", "200% 200%")
        .set("animation", "gradientShift 6s ease infinite")
}

pub fn float_patch() -> StylePatch {
    StylePatch::new().set("animation", "float 3s ease-in-out infinite")
}

pub fn typing_caret(visible: bool) -> StylePatch {
    let border = if visible {
        "2px solid var(--white)"
    } else {
        "none"
    };
    StylePatch::new().set("border-right", border)
}

/// First `count` characters of `text`, never splitting a code point.
pub fn typed_prefix(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_set_replaces_in_place() {
        let patch = StylePatch::new()
            .set("opacity", "0")
            .set("transform", "none")
            .set("opacity", "1");

        let names: Vec<&str> = patch.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["opacity", "transform"]);
        assert_eq!(patch.get("opacity"), Some("1"));
    }

    #[test]
    fn reveal_presets_start_hidden_and_end_visible() {
        for preset in [RevealPreset::FadeUp, RevealPreset::TextReveal] {
            let state = preset.initial().merge(preset.revealed());
            assert_eq!(preset.initial().get("opacity"), Some("0"));
            assert_eq!(state.get("opacity"), Some("1"));
            assert!(state.get("transition").is_some());
        }
        assert_eq!(
            RevealPreset::FadeUp.initial().get("transform"),
            Some("translateY(20px)")
        );
        assert_eq!(
            RevealPreset::TextReveal.revealed().get("transform"),
            Some("translateX(0)")
        );
    }

    #[test]
    fn hero_elements_are_staggered_by_index() {
        assert_eq!(hero_initial(0).get("transition"), Some("all 0.6s ease 0s"));
        assert_eq!(hero_initial(2).get("transition"), Some("all 0.6s ease 0.4s"));
        assert_eq!(hero_initial(3).get("transition"), Some("all 0.6s ease 0.6s"));
    }

    #[test]
    fn navbar_switches_past_fifty_pixels() {
        assert_eq!(
            navbar_patch(50.0).get("background"),
            Some("rgba(255, 255, 255, 0.95)")
        );
        assert_eq!(
            navbar_patch(51.0).get("background"),
            Some("rgba(255, 255, 255, 0.98)")
        );
    }

    #[test]
    fn parallax_moves_at_half_speed_upwards() {
        assert_eq!(parallax_offset(200.0), -100.0);
        assert_eq!(
            parallax_patch(10.0).get("transform"),
            Some("translate3d(0px, -5px, 0px)")
        );
    }

    #[test]
    fn scroll_progress_is_bounded() {
        assert_eq!(scroll_progress(0.0, 2_000.0, 1_000.0), 0.0);
        assert_eq!(scroll_progress(500.0, 2_000.0, 1_000.0), 50.0);
        assert_eq!(scroll_progress(1_200.0, 2_000.0, 1_000.0), 100.0);
        assert_eq!(scroll_progress(30.0, 800.0, 1_000.0), 0.0);
        assert_eq!(progress_bar_patch(33.3333).get("width"), Some("33.33%"));
    }

    #[test]
    fn card_hover_resets_shadow_on_leave() {
        assert_eq!(card_hover(false).get("box-shadow"), Some(""));
        assert_eq!(
            card_hover(true).get("transform"),
            Some("translateY(-10px) scale(1.02)")
        );
    }

    #[test]
    fn typed_prefix_respects_char_boundaries() {
        assert_eq!(typed_prefix("Grow", 0), "");
        assert_eq!(typed_prefix("Grow", 2), "Gr");
        assert_eq!(typed_prefix("Grow", 10), "Grow");
        assert_eq!(typed_prefix("café au lait", 4), "café");
    }

    #[test]
    fn keyframes_cover_both_loops() {
        assert!(KEYFRAMES_CSS.contains("@keyframes gradientShift"));
        assert!(KEYFRAMES_CSS.contains("@keyframes float"));
        assert_eq!(
            gradient_patch().get("animation"),
            Some("gradientShift 6s ease infinite")
        );
    }
}

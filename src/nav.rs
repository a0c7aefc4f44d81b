pub const PAGE_FADE_OUT_MS: u32 = 300;
pub const PAGE_FADE_IN_DELAY_MS: u32 = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn toggled(self) -> Self {
        Self { open: !self.open }
    }

    pub fn closed(self) -> Self {
        Self { open: false }
    }

    /// Body scroll is locked while the mobile menu covers the page.
    pub fn body_overflow(self) -> &'static str {
        if self.open {
            "hidden"
        } else {
            "auto"
        }
    }

    pub fn should_close_on_outside_click(self, inside_hamburger: bool, inside_menu: bool) -> bool {
        self.open && !inside_hamburger && !inside_menu
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageTransition {
    /// Let the browser follow the link as usual.
    Native,
    /// Fade the body out, then navigate.
    FadeOut,
}

pub fn page_transition_for(href: &str, target: &str) -> PageTransition {
    let href = href.trim();

    if target == "_blank" || href.contains("mailto:") || href.contains("tel:") {
        return PageTransition::Native;
    }

    if href.starts_with('/') || href.starts_with("..") || href.starts_with("pages/") {
        PageTransition::FadeOut
    } else {
        PageTransition::Native
    }
}

pub const SECTION_SCROLL_GAP_PX: f64 = 20.0;
pub const FRAGMENT_SCROLL_DELAY_MS: u32 = 100;

/// Scroll position that lands a section just below the fixed header and
/// the optional secondary nav bar.
pub fn section_scroll_target(offset_top: f64, header_height: f64, secondary_nav: Option<f64>) -> f64 {
    offset_top - (header_height + secondary_nav.unwrap_or(0.0) + SECTION_SCROLL_GAP_PX)
}

/// Plain in-page anchors only clear the header.
pub fn anchor_scroll_target(offset_top: f64, header_height: f64) -> f64 {
    offset_top - header_height
}

/// The fragment selector of an in-page anchor, or `None` for a bare `#`
/// and for links that leave the page.
pub fn internal_anchor(href: &str) -> Option<&str> {
    let href = href.trim();
    if href.len() > 1 && href.starts_with('#') {
        Some(href)
    } else {
        None
    }
}

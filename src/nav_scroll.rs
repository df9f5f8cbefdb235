use crate::config::SiteConfig;
use crate::dom::Node;

/// Drops a shadow under the nav bar once the page has scrolled.
pub struct NavScroll<E> {
    nav: E,
    offset: f64,
    shadow: String,
}

impl<E: Node> NavScroll<E> {
    pub fn new(nav: E, config: &SiteConfig) -> Self {
        Self {
            nav,
            offset: config.nav_shadow_offset,
            shadow: config.nav_shadow.clone(),
        }
    }

    /// Returns whether the shadow is shown.
    pub fn handle_scroll(&self, scroll_y: f64) -> bool {
        let raised = scroll_y > self.offset;
        self.nav
            .set_style("box-shadow", if raised { self.shadow.as_str() } else { "none" });
        raised
    }
}

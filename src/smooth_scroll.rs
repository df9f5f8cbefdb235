use crate::dom::{Node, Viewport};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnchorClick {
    /// Bare `#`: nothing happens.
    Ignored,
    /// No element carries the fragment id; the browser navigates as usual.
    Navigate,
    /// Default navigation must be prevented; the viewport scrolled here.
    Scrolled(f64),
}

impl AnchorClick {
    pub fn prevents_default(self) -> bool {
        matches!(self, Self::Scrolled(_))
    }
}

/// Animated scrolling to in-page anchors, clearing the fixed nav bar.
pub struct SmoothScroll<E, V> {
    nav: E,
    viewport: V,
}

impl<E: Node, V: Viewport> SmoothScroll<E, V> {
    pub fn new(nav: E, viewport: V) -> Self {
        Self { nav, viewport }
    }

    pub fn target_top(&self, target: &E) -> f64 {
        target.bounding_top() + self.viewport.scroll_y() - self.nav.offset_height()
    }

    /// `find` resolves an element id to its node.
    pub fn on_click(&self, href: &str, find: impl FnOnce(&str) -> Option<E>) -> AnchorClick {
        if href == "#" {
            return AnchorClick::Ignored;
        }

        let Some(target) = href.strip_prefix('#').and_then(find) else {
            return AnchorClick::Navigate;
        };

        let top = self.target_top(&target);
        self.viewport.smooth_scroll_to(top);
        AnchorClick::Scrolled(top)
    }
}

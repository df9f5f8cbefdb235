use crate::config::SiteConfig;
use crate::dom::Node;

const SCROLL_LOCK: &str = "hidden";

/// Slide-out menu whose toggle and panel share one `open` class.
pub struct MobileNav<E> {
    toggle: E,
    menu: E,
    body: E,
    open_class: String,
}

impl<E: Node> MobileNav<E> {
    pub fn new(toggle: E, menu: E, body: E, config: &SiteConfig) -> Self {
        Self {
            toggle,
            menu,
            body,
            open_class: config.open_class.clone(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.menu.has_class(&self.open_class)
    }

    pub fn toggle_menu(&self) -> bool {
        self.toggle.toggle_class(&self.open_class);
        let open = self.menu.toggle_class(&self.open_class);
        self.body
            .set_style("overflow", if open { SCROLL_LOCK } else { "" });
        log::debug!("mobile nav {}", if open { "opened" } else { "closed" });
        open
    }

    pub fn close_menu(&self) {
        self.toggle.remove_class(&self.open_class);
        self.menu.remove_class(&self.open_class);
        self.body.set_style("overflow", "");
    }

    /// Closes the menu for clicks that land outside both toggle and panel.
    pub fn on_document_click(&self, target: &E) {
        if !self.toggle.contains(target) && !self.menu.contains(target) {
            self.close_menu();
        }
    }
}

use std::cell::Cell;

use crate::dom::{Intersection, Node, Observer};

/// Starts loading the demo iframe once it comes within range of the viewport.
pub struct LazyIframe<E> {
    iframe: E,
    triggered: Cell<bool>,
}

impl<E: Node> LazyIframe<E> {
    pub fn new(iframe: E) -> Self {
        Self {
            iframe,
            triggered: Cell::new(false),
        }
    }

    pub fn iframe(&self) -> &E {
        &self.iframe
    }

    /// Returns whether this batch of entries triggered the load.
    pub fn handle_intersect(&self, entries: &[Intersection<E>], observer: &impl Observer<E>) -> bool {
        if self.triggered.get() || !entries.iter().any(|entry| entry.is_intersecting) {
            return false;
        }
        self.triggered.set(true);

        if let Some(src) = self.iframe.attribute("src") {
            self.iframe.set_attribute("src", &src);
            log::debug!("lazy iframe load started");
        }
        observer.unobserve(&self.iframe);
        true
    }
}

//! The slice of the browser the components talk to.
//!
//! Components are generic over these traits so they can be driven by real
//! `web_sys` handles in the page and by in-memory fakes in tests.

use std::future::Future;

use crate::error::Result;

pub trait Node: Clone + PartialEq {
    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);

    /// Flips `class` and reports whether it is now present.
    fn toggle_class(&self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);

    /// Sets an inline style property; an empty value clears it.
    fn set_style(&self, property: &str, value: &str);

    /// True when `other` is this node or one of its descendants.
    fn contains(&self, other: &Self) -> bool;

    fn offset_top(&self) -> f64;
    fn offset_height(&self) -> f64;
    /// Top edge relative to the viewport.
    fn bounding_top(&self) -> f64;
}

pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

pub trait Viewport {
    fn scroll_y(&self) -> f64;
    fn smooth_scroll_to(&self, top: f64);
}

pub trait Timers {
    /// Dropping the handle cancels the callback if it has not run yet.
    type Handle;

    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Self::Handle;
}

pub trait Clipboard {
    fn write_text(&self, text: &str) -> impl Future<Output = Result<()>>;

    /// Selection-based copy for browsers without the async clipboard.
    fn fallback_copy(&self, text: &str) -> Result<()>;
}

pub trait Observer<E> {
    fn observe(&self, target: &E);
    fn unobserve(&self, target: &E);
}

#[derive(Clone, Debug)]
pub struct Intersection<E> {
    pub target: E,
    pub is_intersecting: bool,
}

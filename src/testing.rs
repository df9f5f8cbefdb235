//! In-memory host used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::dom::{Clipboard, Node, Observer, Storage, Timers, Viewport};
use crate::error::{Result, SiteError};

#[derive(Default)]
struct NodeData {
    classes: Vec<String>,
    attributes: HashMap<String, String>,
    styles: HashMap<String, String>,
    parent: Option<Weak<RefCell<NodeData>>>,
    offset_top: f64,
    offset_height: f64,
    bounding_top: f64,
    attribute_writes: usize,
}

#[derive(Clone, Default)]
pub struct FakeNode(Rc<RefCell<NodeData>>);

impl FakeNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_geometry(self, offset_top: f64, offset_height: f64) -> Self {
        {
            let mut data = self.0.borrow_mut();
            data.offset_top = offset_top;
            data.offset_height = offset_height;
        }
        self
    }

    pub fn with_bounding_top(self, top: f64) -> Self {
        self.0.borrow_mut().bounding_top = top;
        self
    }

    pub fn append(&self, child: &FakeNode) {
        child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.borrow().styles.get(property).cloned()
    }

    pub fn attribute_writes(&self) -> usize {
        self.0.borrow().attribute_writes
    }
}

impl PartialEq for FakeNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for FakeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeNode")
            .field("classes", &self.0.borrow().classes)
            .finish_non_exhaustive()
    }
}

impl Node for FakeNode {
    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|value| value == class)
    }

    fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.0.borrow_mut().classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|value| value != class);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let mut data = self.0.borrow_mut();
        data.attributes.insert(name.to_string(), value.to_string());
        data.attribute_writes += 1;
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut data = self.0.borrow_mut();
        if value.is_empty() {
            data.styles.remove(property);
        } else {
            data.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn contains(&self, other: &Self) -> bool {
        let mut current = Some(Rc::clone(&other.0));
        while let Some(node) = current {
            if Rc::ptr_eq(&node, &self.0) {
                return true;
            }
            current = node.borrow().parent.as_ref().and_then(Weak::upgrade);
        }
        false
    }

    fn offset_top(&self) -> f64 {
        self.0.borrow().offset_top
    }

    fn offset_height(&self) -> f64 {
        self.0.borrow().offset_height
    }

    fn bounding_top(&self) -> f64 {
        self.0.borrow().bounding_top
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

#[derive(Default)]
pub struct FakeViewport {
    scroll_y: Cell<f64>,
    scrolls: RefCell<Vec<f64>>,
}

impl FakeViewport {
    pub fn at(scroll_y: f64) -> Self {
        let viewport = Self::default();
        viewport.scroll_y.set(scroll_y);
        viewport
    }

    pub fn scrolls(&self) -> Vec<f64> {
        self.scrolls.borrow().clone()
    }
}

impl Viewport for FakeViewport {
    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn smooth_scroll_to(&self, top: f64) {
        self.scrolls.borrow_mut().push(top);
    }
}

struct PendingTimer {
    due: u64,
    cancelled: Rc<Cell<bool>>,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Clock {
    now: u64,
    pending: Vec<PendingTimer>,
}

/// Virtual clock; callbacks only run inside [`ManualTimers::advance`].
#[derive(Clone, Default)]
pub struct ManualTimers(Rc<RefCell<Clock>>);

pub struct ManualHandle(Rc<Cell<bool>>);

impl Drop for ManualHandle {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

impl ManualTimers {
    pub fn advance(&self, ms: u64) {
        let due = {
            let mut clock = self.0.borrow_mut();
            clock.now += ms;
            let now = clock.now;
            let (mut due, rest): (Vec<_>, Vec<_>) =
                clock.pending.drain(..).partition(|timer| timer.due <= now);
            clock.pending = rest;
            due.sort_by_key(|timer| timer.due);
            due
        };

        for timer in due {
            if !timer.cancelled.get() {
                (timer.callback)();
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.0
            .borrow()
            .pending
            .iter()
            .filter(|timer| !timer.cancelled.get())
            .count()
    }
}

impl Timers for ManualTimers {
    type Handle = ManualHandle;

    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> ManualHandle {
        let cancelled = Rc::new(Cell::new(false));
        let mut clock = self.0.borrow_mut();
        let due = clock.now + u64::from(delay_ms);
        clock.pending.push(PendingTimer {
            due,
            cancelled: Rc::clone(&cancelled),
            callback,
        });
        ManualHandle(cancelled)
    }
}

#[derive(Default)]
pub struct FakeClipboard {
    pub reject_writes: Cell<bool>,
    pub reject_fallback: Cell<bool>,
    pub written: RefCell<Vec<String>>,
    pub fallback_written: RefCell<Vec<String>>,
}

impl FakeClipboard {
    pub fn rejecting() -> Self {
        let clipboard = Self::default();
        clipboard.reject_writes.set(true);
        clipboard
    }
}

impl Clipboard for FakeClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        if self.reject_writes.get() {
            return Err(SiteError::js("clipboard.writeText", "NotAllowedError"));
        }
        self.written.borrow_mut().push(text.to_string());
        Ok(())
    }

    fn fallback_copy(&self, text: &str) -> Result<()> {
        if self.reject_fallback.get() {
            return Err(SiteError::js("execCommand(copy)", "unsupported"));
        }
        self.fallback_written.borrow_mut().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    observed: RefCell<Vec<FakeNode>>,
    unobserve_calls: Cell<usize>,
}

impl RecordingObserver {
    pub fn is_observed(&self, node: &FakeNode) -> bool {
        self.observed.borrow().iter().any(|observed| observed == node)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.borrow().len()
    }

    pub fn unobserve_calls(&self) -> usize {
        self.unobserve_calls.get()
    }
}

impl Observer<FakeNode> for RecordingObserver {
    fn observe(&self, target: &FakeNode) {
        if !self.is_observed(target) {
            self.observed.borrow_mut().push(target.clone());
        }
    }

    fn unobserve(&self, target: &FakeNode) {
        self.unobserve_calls.set(self.unobserve_calls.get() + 1);
        self.observed.borrow_mut().retain(|observed| observed != target);
    }
}

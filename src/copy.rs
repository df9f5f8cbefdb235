use std::cell::RefCell;

use crate::config::SiteConfig;
use crate::dom::{Clipboard, Node, Timers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    Clipboard,
    Fallback,
}

/// Copy-to-clipboard buttons with a timed `copied` marker.
pub struct CopyButtons<E, C, T: Timers> {
    clipboard: C,
    timers: T,
    /// At most one clear timer per button; a fired handle stays until that
    /// button is copied again.
    pending: RefCell<Vec<(E, T::Handle)>>,
    attribute: String,
    copied_class: String,
    feedback_ms: u32,
}

impl<E, C, T> CopyButtons<E, C, T>
where
    E: Node + 'static,
    C: Clipboard,
    T: Timers,
{
    pub fn new(clipboard: C, timers: T, config: &SiteConfig) -> Self {
        Self {
            clipboard,
            timers,
            pending: RefCell::new(Vec::new()),
            attribute: config.copy_attribute.clone(),
            copied_class: config.copied_class.clone(),
            feedback_ms: config.copy_feedback_ms,
        }
    }

    /// Copies the button's payload. Feedback is shown whichever path ran,
    /// including when the fallback itself fails.
    pub async fn handle_copy(&self, button: &E) -> CopyOutcome {
        let text = button.attribute(&self.attribute).unwrap_or_else(|| {
            log::warn!("copy button without {} attribute", self.attribute);
            String::new()
        });

        let outcome = match self.clipboard.write_text(&text).await {
            Ok(()) => CopyOutcome::Clipboard,
            Err(err) => {
                log::debug!("{err}; using selection fallback");
                if let Err(err) = self.clipboard.fallback_copy(&text) {
                    log::warn!("{err}");
                }
                CopyOutcome::Fallback
            }
        };

        self.show_success(button);
        outcome
    }

    /// Marks the button copied and (re)starts its clear timer.
    pub fn show_success(&self, button: &E) {
        button.add_class(&self.copied_class);

        let target = button.clone();
        let class = self.copied_class.clone();
        let handle = self.timers.schedule(
            self.feedback_ms,
            Box::new(move || target.remove_class(&class)),
        );

        let mut pending = self.pending.borrow_mut();
        pending.retain(|(pending_button, _)| pending_button != button);
        pending.push((button.clone(), handle));
    }
}

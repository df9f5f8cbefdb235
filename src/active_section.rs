use std::ops::Range;

use crate::config::SiteConfig;
use crate::dom::Node;

/// Highlights the nav link of the section currently under the nav bar.
pub struct ActiveSection<E> {
    sections: Vec<E>,
    links: Vec<E>,
    offset: f64,
    active_class: String,
}

impl<E: Node> ActiveSection<E> {
    /// `None` when there is nothing to highlight.
    pub fn new(sections: Vec<E>, links: Vec<E>, config: &SiteConfig) -> Option<Self> {
        if sections.is_empty() || links.is_empty() {
            return None;
        }
        Some(Self {
            sections,
            links,
            offset: config.section_offset,
            active_class: config.active_class.clone(),
        })
    }

    pub fn band(&self, section: &E, nav_height: f64) -> Range<f64> {
        let top = section.offset_top() - nav_height - self.offset;
        top..top + section.offset_height()
    }

    /// Returns the index of the section whose band holds `scroll_y`.
    /// Nested sections overlap; the last one in document order wins.
    pub fn handle_scroll(&self, scroll_y: f64, nav_height: f64) -> Option<usize> {
        let current = self
            .sections
            .iter()
            .rposition(|section| self.band(section, nav_height).contains(&scroll_y));

        let href = current
            .and_then(|index| self.sections[index].attribute("id"))
            .map(|id| format!("#{id}"));

        for link in &self.links {
            if href.is_some() && link.attribute("href") == href {
                link.add_class(&self.active_class);
            } else {
                link.remove_class(&self.active_class);
            }
        }

        if let Some(href) = href.as_deref() {
            log::trace!("active section {href}");
        }
        current
    }
}

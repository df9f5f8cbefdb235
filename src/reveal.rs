//! Scroll-reveal: elements fade in once, the first time they enter view.

use crate::config::SiteConfig;
use crate::dom::{Intersection, Node, Observer};

pub struct ScrollAnimations<E> {
    elements: Vec<E>,
    visible_class: String,
}

impl<E: Node> ScrollAnimations<E> {
    pub fn new(elements: Vec<E>, config: &SiteConfig) -> Self {
        Self {
            elements,
            visible_class: config.visible_class.clone(),
        }
    }

    pub fn observe_all(&self, observer: &impl Observer<E>) {
        for element in &self.elements {
            observer.observe(element);
        }
    }

    /// Used when the browser has no intersection observer.
    pub fn reveal_all(&self) {
        for element in &self.elements {
            element.add_class(&self.visible_class);
        }
    }

    /// Returns how many elements were newly revealed.
    pub fn handle_intersect(&self, entries: &[Intersection<E>], observer: &impl Observer<E>) -> usize {
        let mut revealed = 0;
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            observer.unobserve(&entry.target);
            if entry.target.has_class(&self.visible_class) {
                continue;
            }
            entry.target.add_class(&self.visible_class);
            revealed += 1;
        }
        revealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeNode, RecordingObserver};

    fn entry(target: &FakeNode, is_intersecting: bool) -> Intersection<FakeNode> {
        Intersection {
            target: target.clone(),
            is_intersecting,
        }
    }

    #[test]
    fn intersecting_elements_are_revealed_and_unobserved() {
        let cards = vec![FakeNode::new(), FakeNode::new()];
        let reveal = ScrollAnimations::new(cards.clone(), &SiteConfig::default());
        let observer = RecordingObserver::default();
        reveal.observe_all(&observer);
        assert_eq!(observer.observed_count(), 2);

        let revealed = reveal.handle_intersect(&[entry(&cards[0], true), entry(&cards[1], false)], &observer);

        assert_eq!(revealed, 1);
        assert!(cards[0].has_class("visible"));
        assert!(!cards[1].has_class("visible"));
        assert!(!observer.is_observed(&cards[0]));
        assert!(observer.is_observed(&cards[1]));
    }

    #[test]
    fn repeated_intersections_reveal_at_most_once() {
        let card = FakeNode::new();
        let reveal = ScrollAnimations::new(vec![card.clone()], &SiteConfig::default());
        let observer = RecordingObserver::default();
        reveal.observe_all(&observer);

        let first = reveal.handle_intersect(&[entry(&card, true), entry(&card, true)], &observer);
        let second = reveal.handle_intersect(&[entry(&card, true)], &observer);

        assert_eq!(first + second, 1);
        assert!(card.has_class("visible"));
        assert_eq!(observer.observed_count(), 0);
    }

    #[test]
    fn reveal_all_marks_everything_visible() {
        let cards = vec![FakeNode::new(), FakeNode::new(), FakeNode::new()];
        let reveal = ScrollAnimations::new(cards.clone(), &SiteConfig::default());

        reveal.reveal_all();

        assert!(cards.iter().all(|card| card.has_class("visible")));
    }
}

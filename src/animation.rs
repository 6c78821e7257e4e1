use crate::dom::{Document, NodeId};
use std::time::Duration;

pub const COUNTER_SELECTOR: &str = ".stat-item h3";
pub const ANIMATION_STEPS: u32 = 50;
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Running,
    Done,
}

#[derive(Debug, Clone)]
pub struct NumberAnimation {
    element: NodeId,
    target: i128,
    current: f64,
    increment: f64,
    state: AnimationState,
}

impl NumberAnimation {
    pub fn new(element: NodeId, target: i128) -> Self {
        Self {
            element,
            target,
            current: 0.0,
            increment: target as f64 / f64::from(ANIMATION_STEPS),
            state: AnimationState::Running,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Advances one step. The last step always shows the exact target.
    pub fn tick(&mut self, document: &mut Document) -> AnimationState {
        if self.state == AnimationState::Done {
            return self.state;
        }
        self.current += self.increment;
        if self.current >= self.target as f64 {
            document.set_text_content(self.element, &self.target.to_string());
            self.state = AnimationState::Done;
        } else {
            let shown = self.current.floor() as i128;
            document.set_text_content(self.element, &shown.to_string());
        }
        self.state
    }
}

/// Leading integer of `text` the way a browser's `parseInt` reads it:
/// surrounding whitespace, an optional sign, then digits up to the first
/// non-digit.
pub fn parse_leading_int(text: &str) -> Option<i128> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i128 = digits[..end].parse().unwrap_or(i128::MAX);
    Some(if negative { -value } else { value })
}

#[derive(Debug, Default)]
pub struct Animator {
    running: Vec<NumberAnimation>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn animate_numbers(&mut self, document: &Document) -> usize {
        let mut started = 0;
        for node in document.query_selector_all(COUNTER_SELECTOR) {
            let Some(target) = parse_leading_int(&document.text_content(node)) else {
                continue;
            };
            self.running.push(NumberAnimation::new(node, target));
            started += 1;
        }
        started
    }

    pub fn is_running(&self) -> bool {
        !self.running.is_empty()
    }

    pub fn tick(&mut self, document: &mut Document) -> bool {
        self.running
            .retain_mut(|animation| animation.tick(document) == AnimationState::Running);
        self.is_running()
    }
}

#[derive(Debug, Default)]
pub struct RevealObserver {
    target: Option<NodeId>,
}

impl RevealObserver {
    pub fn observe(&mut self, target: NodeId) {
        self.target = Some(target);
    }

    pub fn is_observing(&self) -> bool {
        self.target.is_some()
    }

    pub fn on_intersection(&mut self, node: NodeId, visible: bool) -> bool {
        if visible && self.target == Some(node) {
            self.target = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    fn counter(text: &str) -> (Document, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let item = doc.append(body, Element::new("div").with_class("stat-item"));
        let h3 = doc.append(item, Element::new("h3").with_text(text));
        (doc, h3)
    }

    #[test]
    fn parses_like_parse_int() {
        assert_eq!(parse_leading_int("120"), Some(120));
        assert_eq!(parse_leading_int("  98%"), Some(98));
        assert_eq!(parse_leading_int("24/7"), Some(24));
        assert_eq!(parse_leading_int("-15"), Some(-15));
        assert_eq!(parse_leading_int("+3k"), Some(3));
        assert_eq!(parse_leading_int("N/A"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
    }

    #[test]
    fn oversized_targets_still_animate() {
        assert_eq!(
            parse_leading_int("99999999999999999999"),
            Some(99_999_999_999_999_999_999)
        );
        assert_eq!(parse_leading_int(&"9".repeat(60)), Some(i128::MAX));

        let (mut doc, h3) = counter("99999999999999999999 acessos");
        let mut animator = Animator::new();
        assert_eq!(animator.animate_numbers(&doc), 1);
        while animator.tick(&mut doc) {}
        assert_eq!(doc.text_content(h3), "99999999999999999999");
    }

    #[test]
    fn counts_up_to_exact_target() {
        let (mut doc, h3) = counter("120");
        let mut animator = Animator::new();
        assert_eq!(animator.animate_numbers(&doc), 1);

        let mut frames = 0u32;
        let mut previous = 0;
        while animator.tick(&mut doc) {
            frames += 1;
            let shown: i128 = doc.text_content(h3).parse().unwrap();
            assert!(shown >= previous && shown < 120);
            previous = shown;
        }
        assert_eq!(doc.text_content(h3), "120");
        let ticks = frames + 1;
        assert!(ticks == ANIMATION_STEPS || ticks == ANIMATION_STEPS + 1);
    }

    #[test]
    fn drift_prone_targets_still_land_exactly() {
        for target in ["7", "1", "333", "99999"] {
            let (mut doc, h3) = counter(target);
            let mut animator = Animator::new();
            animator.animate_numbers(&doc);
            while animator.tick(&mut doc) {}
            assert_eq!(doc.text_content(h3), target);
        }
    }

    #[test]
    fn zero_and_negative_targets_finish_on_first_tick() {
        for (text, expected) in [("0", "0"), ("-40", "-40")] {
            let (mut doc, h3) = counter(text);
            let mut animation = NumberAnimation::new(h3, parse_leading_int(text).unwrap());
            assert_eq!(animation.tick(&mut doc), AnimationState::Done);
            assert_eq!(doc.text_content(h3), expected);
        }
    }

    #[test]
    fn non_numeric_counters_are_skipped() {
        let (doc, _) = counter("Sempre");
        let mut animator = Animator::new();
        assert_eq!(animator.animate_numbers(&doc), 0);
        assert!(!animator.is_running());
    }

    #[test]
    fn reveal_fires_once() {
        let (doc, h3) = counter("1");
        let section = doc.body();
        let mut observer = RevealObserver::default();
        observer.observe(section);
        assert!(!observer.on_intersection(section, false));
        assert!(!observer.on_intersection(h3, true));
        assert!(observer.on_intersection(section, true));
        assert!(!observer.on_intersection(section, true));
        assert!(!observer.is_observing());
    }
}

use crate::dom::{Document, NodeId};
use std::time::Duration;

pub const SEARCH_INPUT_ID: &str = "faq-search";
pub const ITEM_SELECTOR: &str = ".accordion-item";
pub const BUTTON_SELECTOR: &str = ".accordion-button";
pub const TARGET_ATTR: &str = "data-bs-target";
pub const FADE_IN: &str = "fadeIn 0.3s ease-in";

pub const ACCORDION_SCROLL_DELAY: Duration = Duration::from_millis(300);

/// Shows items whose text contains `search_term` (case-insensitive) and
/// hides the rest. An empty term shows everything. Returns the visible count.
pub fn filter_items(document: &mut Document, search_term: &str) -> usize {
    let needle = search_term.to_lowercase();
    let mut visible = 0;
    for item in document.query_selector_all(ITEM_SELECTOR) {
        let text = document.text_content(item).to_lowercase();
        if text.contains(&needle) {
            document.set_style(item, "display", "block");
            document.set_style(item, "animation", FADE_IN);
            visible += 1;
        } else {
            document.set_style(item, "display", "none");
        }
    }
    visible
}

pub fn is_hidden(document: &Document, item: NodeId) -> bool {
    document
        .get(item)
        .and_then(|element| element.style("display"))
        == Some("none")
}

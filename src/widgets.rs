use crate::dom::{Document, NodeId};
use tracing::debug;

pub const TOOLTIP_SELECTOR: &str = r#"[data-bs-toggle="tooltip"]"#;
pub const POPOVER_SELECTOR: &str = r#"[data-bs-toggle="popover"]"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Tooltip,
    Popover,
}

/// Builds the UI toolkit's widgets on trigger elements. The widgets
/// themselves belong to the toolkit; the page only says where they go.
pub trait WidgetFactory {
    fn create(&mut self, kind: WidgetKind, element: NodeId, document: &Document);
}

#[derive(Debug, Default)]
pub struct LoggingWidgets {
    pub created: Vec<(WidgetKind, NodeId)>,
}

impl WidgetFactory for LoggingWidgets {
    fn create(&mut self, kind: WidgetKind, element: NodeId, document: &Document) {
        let title = document
            .get(element)
            .and_then(|el| el.attr("title").or_else(|| el.attr("data-bs-content")))
            .unwrap_or_default();
        debug!(?kind, ?element, %title, "widget initialized");
        self.created.push((kind, element));
    }
}

pub fn initialize_widgets(document: &Document, factory: &mut impl WidgetFactory) -> usize {
    let mut created = 0;
    for (kind, selector) in [
        (WidgetKind::Tooltip, TOOLTIP_SELECTOR),
        (WidgetKind::Popover, POPOVER_SELECTOR),
    ] {
        for element in document.query_selector_all(selector) {
            factory.create(kind, element, document);
            created += 1;
        }
    }
    created
}

use crate::dom::{Content, Document, Element, NodeId, SavedContent};
use crate::models::Severity;
use crate::state::Page;
use crate::timers::Task;
use std::time::Duration;

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);
pub const LOADING_HTML: &str = r#"<span class="loading"></span> Carregando..."#;

const ALERT_STYLE: &str = "top: 20px; right: 20px; z-index: 9999; min-width: 300px;";

/// Appends a dismissible banner to the body and schedules its removal.
/// Banners stack; each expires on its own. Dismissed banners are reused, so
/// the document only grows to the most banners shown at once.
pub fn notify(page: &mut Page, message: &str, severity: Severity) -> NodeId {
    let body = page.document.body();
    let classes = format!(
        "alert alert-{} alert-dismissible fade show position-fixed",
        severity.as_str()
    );
    let banner = match page.spare_banners.pop() {
        Some(banner) => {
            page.document.reattach(body, banner);
            page.document.set_class_name(banner, &classes);
            page.document.set_own_text(banner, message);
            banner
        }
        None => {
            let banner = page.document.append(
                body,
                Element::new("div")
                    .with_class(&classes)
                    .with_attr("style", ALERT_STYLE)
                    .with_text(message),
            );
            page.document.append(
                banner,
                Element::new("button")
                    .with_class("btn-close")
                    .with_attr("type", "button")
                    .with_attr("data-bs-dismiss", "alert"),
            );
            banner
        }
    };
    let timer = page
        .timers
        .schedule(NOTIFICATION_TTL, Task::RemoveNotification(banner));
    page.banner_timers.insert(banner, timer);
    banner
}

pub fn dismiss(page: &mut Page, banner: NodeId) -> bool {
    let Some(timer) = page.banner_timers.remove(&banner) else {
        return false;
    };
    page.timers.cancel(timer);
    page.document.remove(banner);
    page.spare_banners.push(banner);
    true
}

pub fn dismiss_from(page: &mut Page, clicked: NodeId) -> bool {
    let is_close = page.document.get(clicked).is_some_and(|element| {
        element.has_class("btn-close") && element.attr("data-bs-dismiss").as_deref() == Some("alert")
    });
    if !is_close {
        return false;
    }
    match page.document.closest_with_class(clicked, "alert") {
        Some(banner) => dismiss(page, banner),
        None => false,
    }
}

pub fn active_notifications(document: &Document) -> Vec<NodeId> {
    document.query_selector_all(".alert.alert-dismissible")
}

/// Loading state held on an element until [`LoadingGuard::restore`] is called.
#[must_use = "the element stays disabled until restore is called"]
#[derive(Debug)]
pub struct LoadingGuard {
    element: NodeId,
    saved: SavedContent,
    was_disabled: bool,
}

impl LoadingGuard {
    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn restore(self, document: &mut Document) {
        document.restore_content(self.element, self.saved);
        document.set_disabled(self.element, self.was_disabled);
    }
}

pub fn with_loading_state(document: &mut Document, element: NodeId) -> Option<LoadingGuard> {
    let was_disabled = document.get(element)?.is_disabled();
    let saved = document.replace_content(element, Content::Html(LOADING_HTML.to_string()))?;
    document.set_disabled(element, true);
    Some(LoadingGuard {
        element,
        saved,
        was_disabled,
    })
}

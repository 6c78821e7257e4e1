//! Page lifecycle: classification, navigation state, per-page setup and
//! event routing.

use crate::animation::{Animator, RevealObserver, TICK_INTERVAL};
use crate::api;
use crate::collaborators::{Collaborator, CollaboratorRegistry};
use crate::connection::{update_connection_status, ConnectionStatus};
use crate::dom::{Document, NodeId, ScrollBlock};
use crate::errors::AppError;
use crate::faq::{self, ACCORDION_SCROLL_DELAY, BUTTON_SELECTOR, SEARCH_INPUT_ID, TARGET_ATTR};
use crate::http::{RequestOptions, Transport};
use crate::models::{PageKind, Severity, StatsSnapshot};
use crate::notify::{self, LoadingGuard};
use crate::state::Page;
use crate::stats;
use crate::timers::Task;
use crate::widgets::{initialize_widgets, WidgetFactory};
use serde_json::Value;
use tracing::{debug, info};

pub const NAV_LINK_SELECTOR: &str = ".navbar-nav .nav-link";
pub const STATS_SECTION_SELECTOR: &str = ".bg-light";
pub const FEATURE_CARD_SELECTOR: &str = ".card";
pub const ANCHOR_SELECTOR: &str = r##"a[href^="#"]"##;
pub const CARD_HOVER_TRANSFORM: &str = "translateY(-10px) scale(1.02)";
pub const CARD_REST_TRANSFORM: &str = "translateY(0) scale(1)";

/// Checked in this order; the first segment found in the path wins.
const PAGE_SEGMENTS: [(&str, PageKind); 4] = [
    ("/chat", PageKind::Chat),
    ("/status", PageKind::Status),
    ("/faq", PageKind::Faq),
    ("/admin", PageKind::Admin),
];

pub fn classify_page(path: &str) -> PageKind {
    PAGE_SEGMENTS
        .iter()
        .find(|(segment, _)| path.contains(segment))
        .map(|(_, kind)| *kind)
        .unwrap_or(PageKind::Home)
}

/// Marks each navbar link active when its href, minus a leading `/`, occurs
/// in `path`, and clears it otherwise. Returns the number of active links.
pub fn highlight_active_nav(document: &mut Document, path: &str) -> usize {
    let mut active = 0;
    for link in document.query_selector_all(NAV_LINK_SELECTOR) {
        let href = document.get(link).and_then(|element| element.attr("href"));
        let matches = href.is_some_and(|href| {
            !href.is_empty() && path.contains(href.strip_prefix('/').unwrap_or(&href))
        });
        if matches {
            document.add_class(link, "active");
            active += 1;
        } else {
            document.remove_class(link, "active");
        }
    }
    active
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Click(NodeId),
    Input { target: NodeId, value: String },
    MouseEnter(NodeId),
    MouseLeave(NodeId),
    Intersection { target: NodeId, visible: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Listener {
    AnchorScroll(String),
    AccordionScroll(String),
    FaqSearch,
    CardHover,
}

pub struct PageController<T> {
    page: Page,
    transport: T,
    path: String,
    kind: PageKind,
    collaborators: CollaboratorRegistry,
    collaborator: Option<Box<dyn Collaborator>>,
    listeners: Vec<(NodeId, Listener)>,
    animator: Animator,
    reveal: RevealObserver,
    connection: ConnectionStatus,
}

impl<T: Transport> PageController<T> {
    pub fn init(
        document: Document,
        path: &str,
        transport: T,
        widgets: &mut impl WidgetFactory,
        collaborators: CollaboratorRegistry,
    ) -> Self {
        let kind = classify_page(path);
        info!(%path, %kind, "initializing page");

        let mut controller = Self {
            page: Page::new(document),
            transport,
            path: path.to_string(),
            kind,
            collaborators,
            collaborator: None,
            listeners: Vec::new(),
            animator: Animator::new(),
            reveal: RevealObserver::default(),
            connection: ConnectionStatus::default(),
        };

        let active = highlight_active_nav(&mut controller.page.document, path);
        debug!(active, "navigation highlighted");
        controller.bind_anchor_scrolling();
        let widget_count = initialize_widgets(&controller.page.document, widgets);
        debug!(widget_count, "widgets initialized");
        controller.dispatch(kind);
        controller
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.page.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.page.document
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn collaborator_name(&self) -> Option<&str> {
        self.collaborator.as_ref().map(|collaborator| collaborator.name())
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    pub fn dispatch(&mut self, kind: PageKind) {
        match kind {
            PageKind::Home => {
                self.setup_home();
                self.activate_collaborator(kind);
            }
            PageKind::Faq => {
                self.setup_faq();
                self.activate_collaborator(kind);
            }
            PageKind::Chat | PageKind::Status => self.activate_collaborator(kind),
            PageKind::Admin | PageKind::Unknown => debug!(%kind, "no page setup"),
        }
    }

    fn activate_collaborator(&mut self, kind: PageKind) {
        match self.collaborators.construct(kind, &mut self.page) {
            Some(collaborator) => {
                info!(%kind, name = collaborator.name(), "collaborator activated");
                self.collaborator = Some(collaborator);
            }
            None => debug!(%kind, "no collaborator registered"),
        }
    }

    fn bind_anchor_scrolling(&mut self) {
        for anchor in self.page.document.query_selector_all(ANCHOR_SELECTOR) {
            if let Some(href) = self.page.document.get(anchor).and_then(|el| el.attr("href")) {
                self.listeners.push((anchor, Listener::AnchorScroll(href)));
            }
        }
    }

    fn setup_home(&mut self) {
        self.animate_stats_on_scroll();
        for card in self.page.document.query_selector_all(FEATURE_CARD_SELECTOR) {
            self.listeners.push((card, Listener::CardHover));
        }
    }

    fn setup_faq(&mut self) {
        if let Some(input) = self.page.document.get_element_by_id(SEARCH_INPUT_ID) {
            self.listeners.push((input, Listener::FaqSearch));
        }
        for button in self.page.document.query_selector_all(BUTTON_SELECTOR) {
            if let Some(target) = self.page.document.get(button).and_then(|el| el.attr(TARGET_ATTR)) {
                self.listeners.push((button, Listener::AccordionScroll(target)));
            }
        }
    }

    pub fn animate_stats_on_scroll(&mut self) {
        if let Some(section) = self.page.document.query_selector(STATS_SECTION_SELECTOR) {
            self.reveal.observe(section);
        }
    }

    pub fn animate_numbers(&mut self) -> usize {
        let started = self.animator.animate_numbers(&self.page.document);
        if started > 0 && !self.page.timers.is_scheduled(&Task::AnimationFrame) {
            self.page.timers.schedule(TICK_INTERVAL, Task::AnimationFrame);
        }
        started
    }

    pub fn filter_items(&mut self, search_term: &str) -> usize {
        faq::filter_items(&mut self.page.document, search_term)
    }

    pub fn handle_event(&mut self, event: Event) {
        let handled = match &event {
            Event::Click(node) => self.on_click(*node),
            Event::Input { target, value } => self.on_input(*target, value),
            Event::MouseEnter(node) => self.on_hover(*node, CARD_HOVER_TRANSFORM),
            Event::MouseLeave(node) => self.on_hover(*node, CARD_REST_TRANSFORM),
            Event::Intersection { target, visible } => self.on_intersection(*target, *visible),
        };
        if !handled {
            if let Some(collaborator) = self.collaborator.as_mut() {
                collaborator.handle_event(&mut self.page, &event);
            }
        }
    }

    fn listeners_for(&self, node: NodeId) -> Vec<Listener> {
        self.listeners
            .iter()
            .filter(|(bound, _)| *bound == node)
            .map(|(_, listener)| listener.clone())
            .collect()
    }

    fn on_click(&mut self, node: NodeId) -> bool {
        if notify::dismiss_from(&mut self.page, node) {
            return true;
        }
        let mut handled = false;
        for listener in self.listeners_for(node) {
            match listener {
                Listener::AnchorScroll(href) => {
                    if let Some(target) = self.page.document.query_selector(&href) {
                        self.page.document.scroll_into_view(target, ScrollBlock::Start);
                    }
                    handled = true;
                }
                Listener::AccordionScroll(selector) => {
                    if let Some(target) = self.page.document.query_selector(&selector) {
                        self.page.timers.schedule(
                            ACCORDION_SCROLL_DELAY,
                            Task::ScrollIntoView {
                                target,
                                block: ScrollBlock::Nearest,
                            },
                        );
                    }
                    handled = true;
                }
                Listener::FaqSearch | Listener::CardHover => {}
            }
        }
        handled
    }

    fn on_input(&mut self, node: NodeId, value: &str) -> bool {
        if !self.listeners_for(node).contains(&Listener::FaqSearch) {
            return false;
        }
        let visible = self.filter_items(&value.to_lowercase());
        debug!(visible, "faq filtered");
        true
    }

    fn on_hover(&mut self, node: NodeId, transform: &str) -> bool {
        if !self.listeners_for(node).contains(&Listener::CardHover) {
            return false;
        }
        self.page.document.set_style(node, "transform", transform);
        true
    }

    fn on_intersection(&mut self, target: NodeId, visible: bool) -> bool {
        if !self.reveal.on_intersection(target, visible) {
            return false;
        }
        let started = self.animate_numbers();
        debug!(started, "stats section revealed");
        true
    }

    pub fn advance(&mut self, elapsed: std::time::Duration) {
        let until = self.page.timers.now() + elapsed;
        while let Some(task) = self.page.timers.pop_due(until) {
            self.run_task(task);
        }
        self.page.timers.settle(until);
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::RemoveNotification(banner) => {
                notify::dismiss(&mut self.page, banner);
            }
            Task::ScrollIntoView { target, block } => {
                self.page.document.scroll_into_view(target, block);
            }
            Task::AnimationFrame => {
                if self.animator.tick(&mut self.page.document) {
                    self.page.timers.schedule(TICK_INTERVAL, Task::AnimationFrame);
                }
            }
        }
    }

    pub async fn load_stats(&mut self) -> Option<StatsSnapshot> {
        stats::load_stats(&self.transport, &mut self.page.document).await
    }

    pub fn update_display(&mut self, snapshot: &StatsSnapshot) -> usize {
        stats::update_display(&mut self.page.document, snapshot)
    }

    pub async fn request(&mut self, url: &str, options: RequestOptions) -> Result<Value, AppError> {
        api::request(&self.transport, &mut self.page, url, options).await
    }

    pub fn notify(&mut self, message: &str, severity: Severity) -> NodeId {
        notify::notify(&mut self.page, message, severity)
    }

    pub fn with_loading_state(&mut self, element: NodeId) -> Option<LoadingGuard> {
        notify::with_loading_state(&mut self.page.document, element)
    }

    pub fn connect(&mut self) {
        self.set_connection(ConnectionStatus::Online);
    }

    pub fn disconnect(&mut self) {
        self.set_connection(ConnectionStatus::Offline);
    }

    fn set_connection(&mut self, status: ConnectionStatus) {
        self.connection = status;
        update_connection_status(&mut self.page.document, status);
    }
}

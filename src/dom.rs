//! Arena-backed document tree. A node is on the page only while its parent
//! chain reaches the body; detaching a node hides its whole subtree.

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::Chars;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Html(String),
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    content: Content,
    style: BTreeMap<String, String>,
    disabled: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            if !self.classes.iter().any(|existing| existing == class) {
                self.classes.push(class.to_string());
            }
        }
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.content = Content::Text(text.to_string());
        self
    }

    pub fn with_html(mut self, html: &str) -> Self {
        self.content = Content::Html(html.to_string());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|existing| existing == class)
    }

    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "class" => Some(self.class_name()),
            _ => self.attrs.get(name).cloned(),
        }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: NodeId,
    pub block: ScrollBlock,
}

#[derive(Debug, Clone)]
pub struct SavedContent {
    content: Content,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    body: NodeId,
    scrolls: Vec<ScrollRequest>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new("body")],
            body: NodeId(0),
            scrolls: Vec::new(),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0)
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node.0)
    }

    pub fn append(&mut self, parent: NodeId, mut element: Element) -> NodeId {
        let node = NodeId(self.nodes.len());
        element.parent = Some(parent);
        element.children.clear();
        self.nodes.push(element);
        if let Some(parent) = self.get_mut(parent) {
            parent.children.push(node);
        }
        node
    }

    pub fn reattach(&mut self, parent: NodeId, node: NodeId) -> bool {
        let detached = self.get(node).is_some_and(|element| element.parent.is_none());
        if node == self.body || !detached || self.get(parent).is_none() {
            return false;
        }
        if let Some(element) = self.get_mut(node) {
            element.parent = Some(parent);
        }
        if let Some(parent) = self.get_mut(parent) {
            parent.children.push(node);
        }
        true
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.body {
                return true;
            }
            current = self.get(id).and_then(Element::parent);
        }
        false
    }

    pub fn remove(&mut self, node: NodeId) -> bool {
        if node == self.body || !self.is_attached(node) {
            return false;
        }
        let parent = self.get_mut(node).and_then(|element| element.parent.take());
        if let Some(parent) = parent.and_then(|parent| self.get_mut(parent)) {
            parent.children.retain(|child| *child != node);
        }
        true
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|node| self.nodes[node.0].id.as_deref() == Some(id))
    }

    /// All attached elements matching `selector`, in document order.
    /// An unparsable selector matches nothing.
    pub fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        let Some(selector) = Selector::parse(selector) else {
            debug!("ignoring invalid selector {selector:?}");
            return Vec::new();
        };
        self.descendants(self.body)
            .into_iter()
            .filter(|node| selector.matches(self, *node))
            .collect()
    }

    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.query_selector_all(selector).into_iter().next()
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut ordered = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let Some(element) = self.get(node) else {
                continue;
            };
            ordered.push(node);
            stack.extend(element.children.iter().rev().copied());
        }
        ordered
    }

    pub fn text_content(&self, node: NodeId) -> String {
        let mut text = String::new();
        for id in self.descendants(node) {
            match &self.nodes[id.0].content {
                Content::Text(value) => text.push_str(value),
                Content::Html(value) => text.push_str(&strip_tags(value)),
            }
        }
        text
    }

    pub fn set_own_text(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.get_mut(node) {
            element.content = Content::Text(text.to_string());
        }
    }

    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        self.replace_content(node, Content::Text(text.to_string()));
    }

    pub fn set_inner_html(&mut self, node: NodeId, html: &str) {
        self.replace_content(node, Content::Html(html.to_string()));
    }

    pub fn replace_content(&mut self, node: NodeId, content: Content) -> Option<SavedContent> {
        let element = self.get_mut(node)?;
        let saved = SavedContent {
            content: std::mem::replace(&mut element.content, content),
            children: std::mem::take(&mut element.children),
        };
        for child in &saved.children {
            if let Some(child) = self.get_mut(*child) {
                child.parent = None;
            }
        }
        Some(saved)
    }

    pub fn restore_content(&mut self, node: NodeId, saved: SavedContent) {
        let current = match self.get_mut(node) {
            Some(element) => {
                element.content = saved.content;
                std::mem::replace(&mut element.children, saved.children.clone())
            }
            None => return,
        };
        for child in current {
            if let Some(child) = self.get_mut(child) {
                child.parent = None;
            }
        }
        for child in saved.children {
            if let Some(child) = self.get_mut(child) {
                child.parent = Some(node);
            }
        }
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.get_mut(node) {
            if !element.has_class(class) {
                element.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.get_mut(node) {
            element.classes.retain(|existing| existing != class);
        }
    }

    pub fn set_class_name(&mut self, node: NodeId, class_name: &str) {
        if let Some(element) = self.get_mut(node) {
            element.classes = class_name.split_whitespace().map(str::to_string).collect();
        }
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.get_mut(node) {
            element.style.insert(property.to_string(), value.to_string());
        }
    }

    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if let Some(element) = self.get_mut(node) {
            element.disabled = disabled;
        }
    }

    pub fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            let element = self.get(id)?;
            if element.has_class(class) {
                return Some(id);
            }
            current = element.parent;
        }
        None
    }

    pub fn scroll_into_view(&mut self, target: NodeId, block: ScrollBlock) {
        if self.is_attached(target) {
            self.scrolls.push(ScrollRequest { target, block });
        }
    }

    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scrolls
    }
}

fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrMatch {
    Exists(String),
    Equals(String, String),
    Prefix(String, String),
}

impl AttrMatch {
    fn parse(inner: &str) -> Option<Self> {
        let inner = inner.trim();
        let parsed = if let Some((name, value)) = inner.split_once("^=") {
            AttrMatch::Prefix(name.trim().to_string(), unquote(value))
        } else if let Some((name, value)) = inner.split_once('=') {
            AttrMatch::Equals(name.trim().to_string(), unquote(value))
        } else {
            AttrMatch::Exists(inner.to_string())
        };
        let name = match &parsed {
            AttrMatch::Exists(name) | AttrMatch::Equals(name, _) | AttrMatch::Prefix(name, _) => name,
        };
        if name.is_empty() || !name.chars().all(is_ident_char) {
            return None;
        }
        Some(parsed)
    }

    fn matches(&self, element: &Element) -> bool {
        match self {
            AttrMatch::Exists(name) => element.attr(name).is_some(),
            AttrMatch::Equals(name, value) => element.attr(name).as_deref() == Some(value.as_str()),
            AttrMatch::Prefix(name, value) => element
                .attr(name)
                .is_some_and(|actual| actual.starts_with(value.as_str())),
        }
    }
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote)) {
            return inner.to_string();
        }
    }
    value.to_string()
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

fn take_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&ch) = chars.peek() {
        if !is_ident_char(ch) {
            break;
        }
        ident.push(ch);
        chars.next();
    }
    ident
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

impl Compound {
    fn parse(token: &str) -> Option<Self> {
        let mut compound = Compound::default();
        let mut chars = token.chars().peekable();
        if chars.peek() == Some(&'*') {
            chars.next();
        } else {
            let tag = take_ident(&mut chars);
            if !tag.is_empty() {
                compound.tag = Some(tag.to_ascii_lowercase());
            }
        }
        while let Some(ch) = chars.next() {
            match ch {
                '#' => {
                    let ident = take_ident(&mut chars);
                    if ident.is_empty() {
                        return None;
                    }
                    compound.id = Some(ident);
                }
                '.' => {
                    let ident = take_ident(&mut chars);
                    if ident.is_empty() {
                        return None;
                    }
                    compound.classes.push(ident);
                }
                '[' => {
                    let mut inner = String::new();
                    let mut quote = None;
                    let mut closed = false;
                    for ch in chars.by_ref() {
                        match (quote, ch) {
                            (Some(q), c) if c == q => quote = None,
                            (None, '"' | '\'') => quote = Some(ch),
                            (None, ']') => {
                                closed = true;
                                break;
                            }
                            _ => {}
                        }
                        inner.push(ch);
                    }
                    if !closed {
                        return None;
                    }
                    compound.attrs.push(AttrMatch::parse(&inner)?);
                }
                _ => return None,
            }
        }
        Some(compound)
    }

    fn matches(&self, element: &Element) -> bool {
        self.tag.as_deref().is_none_or(|tag| element.tag == tag)
            && self
                .id
                .as_deref()
                .is_none_or(|id| element.id.as_deref() == Some(id))
            && self.classes.iter().all(|class| element.has_class(class))
            && self.attrs.iter().all(|attr| attr.matches(element))
    }
}

/// The subset of CSS selectors the page markup relies on: type, `#id`,
/// `.class`, attribute presence, `=` and `^=`, compounds of those, and the
/// descendant combinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<Compound>,
}

impl Selector {
    pub fn parse(input: &str) -> Option<Self> {
        let parts = split_compounds(input)?
            .iter()
            .map(|token| Compound::parse(token))
            .collect::<Option<Vec<_>>>()?;
        if parts.is_empty() {
            return None;
        }
        Some(Self { parts })
    }

    pub fn matches(&self, document: &Document, node: NodeId) -> bool {
        let Some((last, ancestors)) = self.parts.split_last() else {
            return false;
        };
        let Some(element) = document.get(node) else {
            return false;
        };
        if !last.matches(element) {
            return false;
        }
        let mut current = element.parent;
        for compound in ancestors.iter().rev() {
            loop {
                let Some(id) = current else {
                    return false;
                };
                let Some(ancestor) = document.get(id) else {
                    return false;
                };
                current = ancestor.parent;
                if compound.matches(ancestor) {
                    break;
                }
            }
        }
        true
    }
}

fn split_compounds(input: &str) -> Option<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for ch in input.trim().chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') if depth > 0 => {
                quote = Some(ch);
                current.push(ch);
            }
            (None, '[') => {
                depth += 1;
                current.push(ch);
            }
            (None, ']') => {
                depth = depth.checked_sub(1)?;
                current.push(ch);
            }
            (None, c) if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            (None, c) => current.push(c),
        }
    }
    if depth != 0 || quote.is_some() {
        return None;
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Some(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navbar() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let nav = doc.append(body, Element::new("ul").with_class("navbar-nav"));
        let item = doc.append(nav, Element::new("li").with_class("nav-item"));
        let link = doc.append(
            item,
            Element::new("a").with_class("nav-link").with_attr("href", "/chat"),
        );
        let stray = doc.append(
            body,
            Element::new("a").with_class("nav-link").with_attr("href", "/faq"),
        );
        (doc, link, stray)
    }

    #[test]
    fn descendant_selector_requires_ancestor() {
        let (doc, link, stray) = navbar();
        assert_eq!(doc.query_selector_all(".navbar-nav .nav-link"), vec![link]);
        assert_eq!(doc.query_selector_all(".nav-link"), vec![link, stray]);
    }

    #[test]
    fn attribute_selectors() {
        let mut doc = Document::new();
        let body = doc.body();
        let tooltip = doc.append(
            body,
            Element::new("span").with_attr("data-bs-toggle", "tooltip"),
        );
        let popover = doc.append(
            body,
            Element::new("span").with_attr("data-bs-toggle", "popover"),
        );
        let anchor = doc.append(body, Element::new("a").with_attr("href", "#recursos"));

        assert_eq!(doc.query_selector_all(r#"[data-bs-toggle="tooltip"]"#), vec![tooltip]);
        assert_eq!(doc.query_selector_all("[data-bs-toggle='popover']"), vec![popover]);
        assert_eq!(doc.query_selector_all("[data-bs-toggle]"), vec![tooltip, popover]);
        assert_eq!(doc.query_selector_all(r##"a[href^="#"]"##), vec![anchor]);
    }

    #[test]
    fn invalid_selectors_match_nothing() {
        let (doc, _, _) = navbar();
        assert!(doc.query_selector_all("#").is_empty());
        assert!(doc.query_selector_all("[href").is_empty());
        assert!(doc.query_selector_all("a > b").is_empty());
        assert!(doc.query_selector_all("").is_empty());
    }

    #[test]
    fn removed_subtree_leaves_queries() {
        let (mut doc, link, stray) = navbar();
        let nav = doc.query_selector(".navbar-nav").unwrap();
        assert!(doc.remove(nav));
        assert!(!doc.is_attached(link));
        assert_eq!(doc.query_selector_all(".nav-link"), vec![stray]);
        assert!(!doc.remove(nav));
    }

    #[test]
    fn text_content_spans_subtree_and_strips_markup() {
        let mut doc = Document::new();
        let body = doc.body();
        let item = doc.append(body, Element::new("div").with_class("accordion-item"));
        doc.append(item, Element::new("button").with_text("Como abrir "));
        doc.append(item, Element::new("div").with_html("um <b>chamado</b>?"));
        assert_eq!(doc.text_content(item), "Como abrir um chamado?");
    }

    #[test]
    fn replace_and_restore_content_roundtrip() {
        let mut doc = Document::new();
        let body = doc.body();
        let button = doc.append(body, Element::new("button").with_text("Enviar "));
        let icon = doc.append(button, Element::new("i").with_class("fas"));

        let saved = doc
            .replace_content(button, Content::Html("<span></span>".into()))
            .unwrap();
        assert!(!doc.is_attached(icon));
        assert_eq!(doc.get(button).unwrap().children().len(), 0);

        doc.restore_content(button, saved);
        assert!(doc.is_attached(icon));
        assert_eq!(doc.get(button).unwrap().content(), &Content::Text("Enviar ".into()));
    }
}

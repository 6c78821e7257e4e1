use crate::models::PageKind;
use crate::page::Event;
use crate::state::Page;
use std::collections::HashMap;

/// A component that takes over a page once constructed, e.g. the chat or
/// status view.
pub trait Collaborator {
    fn name(&self) -> &str;

    fn handle_event(&mut self, _page: &mut Page, _event: &Event) {}
}

pub type Constructor = Box<dyn Fn(&mut Page) -> Box<dyn Collaborator>>;

#[derive(Default)]
pub struct CollaboratorRegistry {
    constructors: HashMap<PageKind, Constructor>,
}

impl CollaboratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(mut self, kind: PageKind, constructor: F) -> Self
    where
        F: Fn(&mut Page) -> Box<dyn Collaborator> + 'static,
    {
        self.constructors.insert(kind, Box::new(constructor));
        self
    }

    pub fn contains(&self, kind: PageKind) -> bool {
        self.constructors.contains_key(&kind)
    }

    pub fn construct(&self, kind: PageKind, page: &mut Page) -> Option<Box<dyn Collaborator>> {
        self.constructors.get(&kind).map(|constructor| constructor(page))
    }
}

impl std::fmt::Debug for CollaboratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollaboratorRegistry")
            .field("kinds", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

use crate::dom::{Document, NodeId};
use crate::timers::{TimerId, Timers};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Page {
    pub document: Document,
    pub timers: Timers,
    pub(crate) banner_timers: HashMap<NodeId, TimerId>,
    pub(crate) spare_banners: Vec<NodeId>,
}

impl Page {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }
}

pub mod animation;
pub mod api;
pub mod collaborators;
pub mod config;
pub mod connection;
pub mod dom;
pub mod errors;
pub mod faq;
pub mod http;
pub mod models;
pub mod notify;
pub mod page;
pub mod state;
pub mod stats;
pub mod timers;
pub mod ui;
pub mod widgets;

pub use config::Config;
pub use page::{classify_page, highlight_active_nav, Event, PageController};
pub use state::Page;
pub use ui::render_page;

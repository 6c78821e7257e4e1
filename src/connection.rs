use crate::dom::Document;
use tracing::info;

pub const STATUS_INDICATOR_ID: &str = "status-indicator";
pub const CONNECTION_LABEL_ID: &str = "connection-status";

/// Connection state shown in the navbar. Simulated: nothing checks a real
/// transport behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    Online,
    #[default]
    Offline,
}

impl ConnectionStatus {
    pub fn is_online(self) -> bool {
        self == ConnectionStatus::Online
    }

    fn indicator_html(self) -> &'static str {
        match self {
            ConnectionStatus::Online => r#"<i class="fas fa-circle me-1"></i>Online"#,
            ConnectionStatus::Offline => r#"<i class="fas fa-circle me-1"></i>Offline"#,
        }
    }

    fn indicator_class(self) -> &'static str {
        match self {
            ConnectionStatus::Online => "badge bg-success me-2",
            ConnectionStatus::Offline => "badge bg-danger me-2",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Online => "Conectado",
            ConnectionStatus::Offline => "Desconectado",
        }
    }
}

pub fn update_connection_status(document: &mut Document, status: ConnectionStatus) {
    if let Some(indicator) = document.get_element_by_id(STATUS_INDICATOR_ID) {
        document.set_inner_html(indicator, status.indicator_html());
        document.set_class_name(indicator, status.indicator_class());
    }
    if let Some(label) = document.get_element_by_id(CONNECTION_LABEL_ID) {
        document.set_text_content(label, status.label());
    }
    info!(online = status.is_online(), "connection status updated");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    #[test]
    fn indicator_and_label_follow_status() {
        let mut doc = Document::new();
        let body = doc.body();
        let badge = doc.append(body, Element::new("span").with_id(STATUS_INDICATOR_ID));
        let label = doc.append(body, Element::new("span").with_id(CONNECTION_LABEL_ID));

        update_connection_status(&mut doc, ConnectionStatus::Online);
        assert_eq!(doc.text_content(badge), "Online");
        assert!(doc.get(badge).unwrap().has_class("bg-success"));
        assert_eq!(doc.text_content(label), "Conectado");

        update_connection_status(&mut doc, ConnectionStatus::Offline);
        assert_eq!(doc.text_content(badge), "Offline");
        assert!(doc.get(badge).unwrap().has_class("bg-danger"));
        assert!(!doc.get(badge).unwrap().has_class("bg-success"));
        assert_eq!(doc.text_content(label), "Desconectado");
    }

    #[test]
    fn missing_elements_are_ignored() {
        let mut doc = Document::new();
        update_connection_status(&mut doc, ConnectionStatus::Online);
    }
}

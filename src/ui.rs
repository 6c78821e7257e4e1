//! Standard FiapNet page layout, built as a [`Document`].

use crate::connection::{CONNECTION_LABEL_ID, STATUS_INDICATOR_ID};
use crate::dom::{Document, Element, NodeId};
use crate::models::PageKind;
use crate::page::classify_page;
use crate::stats::DISPLAY_FIELDS;

const NAV_LINKS: [(&str, &str); 5] = [
    ("/", "Início"),
    ("/chat", "Chat"),
    ("/status", "Status"),
    ("/faq", "FAQ"),
    ("/admin", "Admin"),
];

const FEATURES: [(&str, &str); 3] = [
    ("Atendimento 24h", "Assistente virtual disponível a qualquer hora."),
    ("Chamados", "Abra e acompanhe chamados pelo chat."),
    ("Status da rede", "Veja a disponibilidade dos serviços em tempo real."),
];

const HOME_COUNTERS: [(&str, &str); 4] = [
    ("1200+", "Clientes atendidos"),
    ("98%", "Satisfação"),
    ("24/7", "Disponibilidade"),
    ("Sempre", "Suporte humano"),
];

const FAQ_ENTRIES: [(&str, &str); 4] = [
    ("Como abro um chamado?", "Pelo chat, descrevendo o problema; o número do chamado é enviado em seguida."),
    ("Qual o horário de atendimento?", "O assistente responde 24 horas; a equipe técnica atende em horário comercial."),
    ("Como acompanho meu chamado?", "Informe o número do chamado no chat ou consulte a página de status."),
    ("Onde vejo a cobrança da fatura?", "Na área do cliente, em Financeiro, com o histórico de pagamentos."),
];

const STATS_LABELS: [&str; 3] = ["Chamados ativos", "Clientes cadastrados", "Total de chamados"];

pub fn render_page(path: &str) -> Document {
    let mut doc = Document::new();
    let body = doc.body();
    render_navbar(&mut doc, body);

    let main = doc.append(body, Element::new("main").with_class("container"));
    match classify_page(path) {
        PageKind::Home | PageKind::Unknown => render_home(&mut doc, main),
        PageKind::Chat => render_chat(&mut doc, main),
        PageKind::Status => render_status(&mut doc, main),
        PageKind::Faq => render_faq(&mut doc, main),
        PageKind::Admin => render_live_stats(&mut doc, main),
    }
    doc
}

fn render_navbar(doc: &mut Document, body: NodeId) {
    let nav = doc.append(body, Element::new("nav").with_class("navbar navbar-expand-lg navbar-dark"));
    doc.append(nav, Element::new("a").with_class("navbar-brand").with_attr("href", "/").with_text("FiapNet"));
    let list = doc.append(nav, Element::new("ul").with_class("navbar-nav"));
    for (href, label) in NAV_LINKS {
        let item = doc.append(list, Element::new("li").with_class("nav-item"));
        doc.append(
            item,
            Element::new("a").with_class("nav-link").with_attr("href", href).with_text(label),
        );
    }
    doc.append(
        nav,
        Element::new("span")
            .with_id(STATUS_INDICATOR_ID)
            .with_class("badge bg-danger me-2")
            .with_html(r#"<i class="fas fa-circle me-1"></i>Offline"#),
    );
    doc.append(
        nav,
        Element::new("small").with_id(CONNECTION_LABEL_ID).with_text("Desconectado"),
    );
}

fn render_home(doc: &mut Document, main: NodeId) {
    let hero = doc.append(main, Element::new("section").with_class("hero"));
    doc.append(hero, Element::new("h1").with_text("Bem-vindo ao FiapNet"));
    doc.append(
        hero,
        Element::new("a")
            .with_class("btn btn-primary")
            .with_attr("href", "#recursos")
            .with_text("Conheça os recursos"),
    );

    let features = doc.append(main, Element::new("section").with_id("recursos"));
    for (title, description) in FEATURES {
        let card = doc.append(features, Element::new("div").with_class("card"));
        doc.append(
            card,
            Element::new("h5")
                .with_class("card-title")
                .with_attr("data-bs-toggle", "tooltip")
                .with_attr("title", description)
                .with_text(title),
        );
        doc.append(card, Element::new("p").with_class("card-text").with_text(description));
    }

    let stats = doc.append(main, Element::new("section").with_class("bg-light py-5"));
    for (value, label) in HOME_COUNTERS {
        let item = doc.append(stats, Element::new("div").with_class("stat-item"));
        doc.append(item, Element::new("h3").with_text(value));
        doc.append(item, Element::new("p").with_text(label));
    }

    render_live_stats(doc, main);
}

fn render_live_stats(doc: &mut Document, main: NodeId) {
    let panel = doc.append(main, Element::new("div").with_class("row stats-live"));
    for ((id, _), label) in DISPLAY_FIELDS.iter().zip(STATS_LABELS) {
        let column = doc.append(panel, Element::new("div").with_class("col"));
        doc.append(column, Element::new("span").with_id(id).with_text("0"));
        doc.append(column, Element::new("small").with_text(label));
    }
}

fn render_chat(doc: &mut Document, main: NodeId) {
    let chat = doc.append(main, Element::new("div").with_id("chat-container"));
    doc.append(chat, Element::new("div").with_id("chat-messages"));
    doc.append(
        chat,
        Element::new("input")
            .with_id("message-input")
            .with_attr("placeholder", "Digite sua mensagem"),
    );
    doc.append(
        chat,
        Element::new("button")
            .with_id("send-button")
            .with_class("btn btn-primary")
            .with_attr("data-bs-toggle", "tooltip")
            .with_attr("title", "Enviar mensagem")
            .with_text("Enviar"),
    );
}

fn render_status(doc: &mut Document, main: NodeId) {
    let services = doc.append(main, Element::new("div").with_id("services-status"));
    for service in ["Internet", "Telefonia", "TV"] {
        doc.append(
            services,
            Element::new("span")
                .with_class("badge bg-secondary")
                .with_attr("data-bs-toggle", "popover")
                .with_attr("data-bs-content", &format!("Status de {service}"))
                .with_text(service),
        );
    }
    render_live_stats(doc, main);
}

fn render_faq(doc: &mut Document, main: NodeId) {
    doc.append(
        main,
        Element::new("input")
            .with_id("faq-search")
            .with_class("form-control")
            .with_attr("data-bs-toggle", "tooltip")
            .with_attr("title", "Busque por palavra-chave"),
    );
    let accordion = doc.append(main, Element::new("div").with_id("faqAccordion").with_class("accordion"));
    for (index, (question, answer)) in FAQ_ENTRIES.iter().enumerate() {
        let panel_id = format!("faq-{}", index + 1);
        let item = doc.append(accordion, Element::new("div").with_class("accordion-item"));
        let header = doc.append(item, Element::new("h2").with_class("accordion-header"));
        doc.append(
            header,
            Element::new("button")
                .with_class("accordion-button collapsed")
                .with_attr("data-bs-toggle", "collapse")
                .with_attr("data-bs-target", &format!("#{panel_id}"))
                .with_text(question),
        );
        let panel = doc.append(
            item,
            Element::new("div").with_id(&panel_id).with_class("accordion-collapse collapse"),
        );
        doc.append(panel, Element::new("div").with_class("accordion-body").with_text(answer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_page_carries_navbar_and_connection_badge() {
        for path in ["/", "/chat", "/status", "/faq", "/admin"] {
            let doc = render_page(path);
            assert_eq!(doc.query_selector_all(".navbar-nav .nav-link").len(), NAV_LINKS.len());
            assert!(doc.get_element_by_id(STATUS_INDICATOR_ID).is_some());
            assert!(doc.get_element_by_id(CONNECTION_LABEL_ID).is_some());
        }
    }

    #[test]
    fn home_has_stats_section_and_counters() {
        let doc = render_page("/");
        assert!(doc.query_selector(".bg-light").is_some());
        assert_eq!(doc.query_selector_all(".stat-item h3").len(), HOME_COUNTERS.len());
        for (id, _) in DISPLAY_FIELDS {
            assert!(doc.get_element_by_id(id).is_some());
        }
    }

    #[test]
    fn faq_buttons_point_at_existing_panels() {
        let doc = render_page("/faq");
        let buttons = doc.query_selector_all(".accordion-button");
        assert_eq!(buttons.len(), FAQ_ENTRIES.len());
        for button in buttons {
            let target = doc.get(button).unwrap().attr("data-bs-target").unwrap();
            assert!(doc.query_selector(&target).is_some());
        }
    }
}

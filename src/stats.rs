//! Counters shown on the page, refreshed from `GET /stats`.

use crate::dom::Document;
use crate::errors::AppError;
use crate::http::{RequestOptions, Transport};
use crate::models::StatsSnapshot;
use tracing::{debug, error};

pub const STATS_PATH: &str = "/stats";

pub const DISPLAY_FIELDS: [(&str, &str); 3] = [
    ("chamados-ativos", "chamados_ativos"),
    ("clientes-cadastrados", "clientes_cadastrados"),
    ("total-chamados", "total_chamados"),
];

pub async fn fetch_stats<T: Transport>(transport: &T) -> Result<StatsSnapshot, AppError> {
    let response = transport.send(STATS_PATH, &RequestOptions::get()).await?;
    if !response.status.is_success() {
        return Err(AppError::status(response.status, "stats endpoint did not succeed"));
    }
    Ok(serde_json::from_slice(&response.body)?)
}

/// Fetches once and shows the result. Failures are logged and otherwise
/// ignored, so whatever the page showed before stays in place.
pub async fn load_stats<T: Transport>(transport: &T, document: &mut Document) -> Option<StatsSnapshot> {
    match fetch_stats(transport).await {
        Ok(snapshot) => {
            update_display(document, &snapshot);
            Some(snapshot)
        }
        Err(err) => {
            error!("failed to load stats: {err}");
            None
        }
    }
}

pub fn update_display(document: &mut Document, snapshot: &StatsSnapshot) -> usize {
    let mut updated = 0;
    for (element_id, key) in DISPLAY_FIELDS {
        let Some(node) = document.get_element_by_id(element_id) else {
            continue;
        };
        let Some(value) = snapshot.display_value(key) else {
            debug!("stats snapshot has no displayable {key}");
            continue;
        };
        document.set_text_content(node, &value);
        updated += 1;
    }
    updated
}

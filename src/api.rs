use crate::errors::AppError;
use crate::http::{RequestOptions, Transport};
use crate::models::Severity;
use crate::notify::notify;
use crate::state::Page;
use serde_json::Value;
use tracing::error;

pub const GENERIC_REQUEST_ERROR: &str = "Erro na requisição";
pub const COMMUNICATION_ERROR: &str = "Erro na comunicação com o servidor";

/// JSON call with a JSON `Content-Type` default under the caller's options.
/// Any failure is logged, announced with a danger banner, and returned.
pub async fn request<T: Transport>(
    transport: &T,
    page: &mut Page,
    url: &str,
    options: RequestOptions,
) -> Result<Value, AppError> {
    match send_json(transport, url, options.with_json_defaults()).await {
        Ok(body) => Ok(body),
        Err(err) => {
            error!(%url, "api error: {err}");
            notify(page, COMMUNICATION_ERROR, Severity::Danger);
            Err(err)
        }
    }
}

async fn send_json<T: Transport>(
    transport: &T,
    url: &str,
    options: RequestOptions,
) -> Result<Value, AppError> {
    let response = transport.send(url, &options).await?;
    if !response.status.is_success() {
        let message = serde_json::from_slice::<Value>(&response.body)
            .ok()
            .and_then(|body| body.get("message")?.as_str().map(str::to_string))
            .unwrap_or_else(|| GENERIC_REQUEST_ERROR.to_string());
        return Err(AppError::status(response.status, message));
    }
    Ok(serde_json::from_slice(&response.body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::StubTransport;
    use crate::http::JSON_CONTENT_TYPE;
    use crate::notify::active_notifications;
    use reqwest::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn success_returns_body_without_banner() {
        let transport = StubTransport::json(StatusCode::OK, r#"{"id": "42"}"#);
        let mut page = Page::default();
        let body = request(&transport, &mut page, "/chamados/42", RequestOptions::get())
            .await
            .unwrap();
        assert_eq!(body, json!({"id": "42"}));
        assert!(active_notifications(&page.document).is_empty());

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].1.header_value("content-type"), Some(JSON_CONTENT_TYPE));
    }

    #[tokio::test]
    async fn error_status_uses_server_message_and_notifies() {
        let transport = StubTransport::json(StatusCode::NOT_FOUND, r#"{"message": "Chamado não encontrado"}"#);
        let mut page = Page::default();
        let err = request(&transport, &mut page, "/chamados/x", RequestOptions::get())
            .await
            .unwrap_err();
        match err {
            AppError::Status { status, message } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(message, "Chamado não encontrado");
            }
            other => panic!("unexpected error: {other}"),
        }
        let banners = active_notifications(&page.document);
        assert_eq!(banners.len(), 1);
        assert!(page.document.get(banners[0]).unwrap().has_class("alert-danger"));
        assert_eq!(page.document.text_content(banners[0]), COMMUNICATION_ERROR);
    }

    #[tokio::test]
    async fn error_status_without_message_falls_back() {
        let transport = StubTransport::json(StatusCode::INTERNAL_SERVER_ERROR, "oops");
        let mut page = Page::default();
        let err = request(&transport, &mut page, "/x", RequestOptions::get())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Status { message, .. } if message == GENERIC_REQUEST_ERROR));
    }

    #[tokio::test]
    async fn transport_failure_notifies_and_propagates() {
        let transport = StubTransport::unreachable();
        let mut page = Page::default();
        let err = request(&transport, &mut page, "/x", RequestOptions::get())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
        assert_eq!(active_notifications(&page.document).len(), 1);
    }
}

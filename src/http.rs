use crate::errors::AppError;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::future::Future;

pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Lays these options over a JSON `Content-Type` default. Headers given
    /// here win over the default, matched case-insensitively.
    pub fn with_json_defaults(mut self) -> Self {
        if self.header_value("content-type").is_none() {
            self.headers
                .insert(0, ("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()));
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// The page's network capability. Only transport-level failures are errors;
/// any HTTP status comes back as a response.
pub trait Transport {
    fn send(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> impl Future<Output = Result<HttpResponse, AppError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let base_url = base_url.trim_end_matches('/');
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::config(format!("base url must be http(s): {base_url}")));
        }
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.to_string(),
        })
    }

    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            format!("{}/{url}", self.base_url)
        }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse, AppError> {
        let mut request = self.client.request(options.method.clone(), self.resolve(url));
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_content_type_overrides_default() {
        let options = RequestOptions::get()
            .header("content-type", "text/plain")
            .with_json_defaults();
        assert_eq!(options.headers.len(), 1);
        assert_eq!(options.header_value("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn default_content_type_is_json() {
        let options = RequestOptions::post(serde_json::json!({"a": 1}))
            .header("X-Trace", "1")
            .with_json_defaults();
        assert_eq!(options.header_value("content-type"), Some(JSON_CONTENT_TYPE));
        assert_eq!(options.header_value("x-trace"), Some("1"));
        assert_eq!(options.method, Method::POST);
    }

    #[test]
    fn resolves_relative_urls_against_base() {
        let transport = ReqwestTransport::new("http://localhost:5000/").unwrap();
        assert_eq!(transport.resolve("/stats"), "http://localhost:5000/stats");
        assert_eq!(transport.resolve("chamados"), "http://localhost:5000/chamados");
        assert_eq!(transport.resolve("https://example.org/x"), "https://example.org/x");
    }

    #[test]
    fn rejects_non_http_base_url() {
        assert!(matches!(
            ReqwestTransport::new("localhost:5000"),
            Err(AppError::Config(_))
        ));
    }
}

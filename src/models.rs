use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Home,
    Chat,
    Status,
    Faq,
    Admin,
    Unknown,
}

impl PageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PageKind::Home => "home",
            PageKind::Chat => "chat",
            PageKind::Status => "status",
            PageKind::Faq => "faq",
            PageKind::Admin => "admin",
            PageKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

/// One response of `GET /stats`. Counter names are the server's wire names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsSnapshot {
    counters: Map<String, Value>,
}

impl StatsSnapshot {
    pub fn from_counts(chamados_ativos: u64, clientes_cadastrados: u64, total_chamados: u64) -> Self {
        Self::default()
            .with("chamados_ativos", chamados_ativos)
            .with("clientes_cadastrados", clientes_cadastrados)
            .with("total_chamados", total_chamados)
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.counters.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.counters.get(key)
    }

    pub fn display_value(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::Number(number) => Some(number_text(number)),
            Value::String(text) => Some(text.clone()),
            Value::Bool(flag) => Some(flag.to_string()),
            Value::Null => Some(String::new()),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

// Whole floats print like integers, as a browser renders `50.0`.
fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() && value.fract() == 0.0 && value.abs() < 1e21 => {
            format!("{value:.0}")
        }
        _ => number.to_string(),
    }
}

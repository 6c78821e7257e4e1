use crate::errors::AppError;
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_PAGE: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub page_path: String,
    /// Re-poll period for stats; `None` fetches once.
    pub stats_interval: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let base_url = lookup("FIAPNET_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let page_path = lookup("FIAPNET_PAGE").unwrap_or_else(|| DEFAULT_PAGE.to_string());
        if !page_path.starts_with('/') {
            return Err(AppError::config(format!("FIAPNET_PAGE must start with '/': {page_path}")));
        }

        let stats_interval = match lookup("FIAPNET_STATS_INTERVAL_SECS") {
            None => None,
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|err| {
                    AppError::config(format!("FIAPNET_STATS_INTERVAL_SECS={raw:?}: {err}"))
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
        };

        Ok(Self {
            base_url,
            page_path,
            stats_interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_path, "/");
        assert_eq!(config.stats_interval, None);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("FIAPNET_BASE_URL", "http://fiapnet.local"),
            ("FIAPNET_PAGE", "/faq"),
            ("FIAPNET_STATS_INTERVAL_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://fiapnet.local");
        assert_eq!(config.page_path, "/faq");
        assert_eq!(config.stats_interval, Some(Duration::from_secs(30)));
    }

    #[test]
    fn zero_interval_means_single_fetch() {
        let config = Config::from_lookup(lookup(&[("FIAPNET_STATS_INTERVAL_SECS", "0")])).unwrap();
        assert_eq!(config.stats_interval, None);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_lookup(lookup(&[("FIAPNET_STATS_INTERVAL_SECS", "soon")])).is_err());
        assert!(Config::from_lookup(lookup(&[("FIAPNET_PAGE", "faq")])).is_err());
    }
}

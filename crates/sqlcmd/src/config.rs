use serde::Deserialize;
use std::time::Duration;

/// Client-side execution settings.
///
/// Controls what the SQL log records. Loading this from files or the
/// environment is left to the application; the type derives `Deserialize`
/// for that purpose.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Log each statement before it is sent (default `true`).
    pub log_sql: bool,
    /// Include bound parameter values in the SQL log (default `false`).
    pub log_params: bool,
    /// Truncate logged SQL to this many bytes. `None` logs it in full.
    pub max_sql_length: Option<usize>,
    /// Statements slower than this are logged as warnings.
    pub slow_query_threshold: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_sql: true,
            log_params: false,
            max_sql_length: Some(200),
            slow_query_threshold: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_sql(mut self, enabled: bool) -> Self {
        self.log_sql = enabled;
        self
    }

    /// Include parameter values in the SQL log.
    ///
    /// Values may contain user data, keep this off in production.
    pub fn log_params(mut self, enabled: bool) -> Self {
        self.log_params = enabled;
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Log full statements.
    pub fn no_truncation(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ClientConfig::default();
        assert!(cfg.log_sql);
        assert!(!cfg.log_params);
        assert_eq!(cfg.max_sql_length, Some(200));
        assert_eq!(cfg.slow_query_threshold, None);
    }

    #[test]
    fn partial_deserialize_keeps_defaults() {
        let cfg: ClientConfig = serde_json::from_str(r#"{"log_params": true}"#).unwrap();
        assert!(cfg.log_params);
        assert!(cfg.log_sql);
        assert_eq!(cfg.max_sql_length, Some(200));
    }

    #[test]
    fn builder() {
        let cfg = ClientConfig::new()
            .log_sql(false)
            .no_truncation()
            .with_slow_query_threshold(Duration::from_millis(500));
        assert!(!cfg.log_sql);
        assert_eq!(cfg.max_sql_length, None);
        assert_eq!(cfg.slow_query_threshold, Some(Duration::from_millis(500)));
    }
}

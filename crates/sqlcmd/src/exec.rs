//! Statement execution and result reshaping.

use crate::client::Connection;
use crate::command::Statement;
use crate::config::ClientConfig;
use crate::error::{CmdError, CmdResult};
use crate::param::Params;
use crate::row::{QueryResult, Row};
use serde_json::Value;
use std::time::Instant;

/// Column name MySQL reports for `SELECT count(*)`.
pub const COUNT_COLUMN: &str = "count(*)";

/// Statement kind, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl QueryType {
    /// Detect the kind from the leading keyword.
    pub fn from_sql(sql: &str) -> Self {
        let keyword = sql
            .trim_start()
            .split(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or_default();
        if keyword.eq_ignore_ascii_case("SELECT") {
            QueryType::Select
        } else if keyword.eq_ignore_ascii_case("INSERT") {
            QueryType::Insert
        } else if keyword.eq_ignore_ascii_case("UPDATE") {
            QueryType::Update
        } else if keyword.eq_ignore_ascii_case("DELETE") {
            QueryType::Delete
        } else {
            QueryType::Other
        }
    }
}

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
fn display_sql(config: &ClientConfig, sql: &str) -> String {
    match config.max_sql_length {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}

/// Send one statement through `conn`.
///
/// An empty parameter map is passed to the connection as `None`.
pub(crate) async fn exec_sql<C: Connection + ?Sized>(
    conn: &C,
    config: &ClientConfig,
    sql: &str,
    params: Option<&Params>,
) -> CmdResult<QueryResult> {
    let params = params.filter(|p| !p.is_empty());

    #[cfg(feature = "tracing")]
    if config.log_sql {
        let shown = display_sql(config, sql);
        let param_count = params.map_or(0, Params::len);
        let query_type = QueryType::from_sql(sql);
        if config.log_params {
            let values = params.map(|p| Value::Object(p.as_map().clone()).to_string());
            tracing::debug!(
                target: "sqlcmd.sql",
                query_type = ?query_type,
                param_count,
                sql = %shown,
                params = values.as_deref().unwrap_or("{}"),
            );
        } else {
            tracing::debug!(
                target: "sqlcmd.sql",
                query_type = ?query_type,
                param_count,
                sql = %shown,
            );
        }
    }

    let start = Instant::now();
    let result = conn.query(sql, params).await;
    let elapsed = start.elapsed();

    if let Some(threshold) = config.slow_query_threshold {
        if elapsed > threshold {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                target: "sqlcmd.sql",
                elapsed_ms = elapsed.as_millis() as u64,
                threshold_ms = threshold.as_millis() as u64,
                sql = %display_sql(config, sql),
                "slow query",
            );
        }
    }

    #[cfg(feature = "tracing")]
    if let Err(err) = &result {
        tracing::debug!(target: "sqlcmd.sql", error = %err, "statement failed");
    }

    result
}

pub(crate) async fn exec_statement<C: Connection + ?Sized>(
    conn: &C,
    config: &ClientConfig,
    stmt: &Statement,
) -> CmdResult<QueryResult> {
    exec_sql(conn, config, &stmt.sql, Some(&stmt.params)).await
}

/// Pull the number out of a `count(*)` result.
///
/// Drivers report the column as a number or, for BIGINT, a numeric string.
pub fn count_from_rows(rows: &[Row]) -> CmdResult<i64> {
    let row = rows
        .first()
        .ok_or_else(|| CmdError::UnexpectedResult("count query returned no rows".to_string()))?;
    let value = row.get(COUNT_COLUMN).ok_or_else(|| {
        CmdError::UnexpectedResult(format!("count row has no `{COUNT_COLUMN}` column"))
    })?;
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| CmdError::UnexpectedResult(format!("count out of range: {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| CmdError::UnexpectedResult(format!("count is not numeric: {s:?}"))),
        other => Err(CmdError::UnexpectedResult(format!(
            "count is not numeric: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_query_type() {
        assert_eq!(QueryType::from_sql("SELECT * FROM t"), QueryType::Select);
        assert_eq!(QueryType::from_sql("  insert INTO t SET x"), QueryType::Insert);
        assert_eq!(QueryType::from_sql("UPDATE t SET x"), QueryType::Update);
        assert_eq!(QueryType::from_sql("DELETE FROM t"), QueryType::Delete);
        assert_eq!(QueryType::from_sql("SHOW TABLES"), QueryType::Other);
    }

    #[test]
    fn truncation_respects_char_boundary() {
        let sql = "SELECT 'é'";
        // byte 9 falls inside the two-byte `é`
        assert_eq!(truncate_sql_bytes(sql, 9), "SELECT '");
        assert_eq!(truncate_sql_bytes(sql, 100), sql);
    }

    #[test]
    fn display_adds_ellipsis() {
        let cfg = ClientConfig::new().max_sql_length(6);
        assert_eq!(display_sql(&cfg, "SELECT 1"), "SELECT...");
        assert_eq!(display_sql(&cfg.no_truncation(), "SELECT 1"), "SELECT 1");
    }

    #[test]
    fn count_accepts_number_and_string() {
        let rows = vec![Row::new().with(COUNT_COLUMN, 42)];
        assert_eq!(count_from_rows(&rows).unwrap(), 42);
        let rows = vec![Row::new().with(COUNT_COLUMN, "7")];
        assert_eq!(count_from_rows(&rows).unwrap(), 7);
    }

    #[test]
    fn count_errors() {
        assert!(matches!(
            count_from_rows(&[]),
            Err(CmdError::UnexpectedResult(_))
        ));
        let rows = vec![Row::new().with("n", 1)];
        assert!(count_from_rows(&rows).is_err());
        let rows = vec![Row::new().with(COUNT_COLUMN, "many")];
        assert!(count_from_rows(&rows).is_err());
    }
}

//! Trait shared by all command builders.

use crate::error::CmdResult;
use crate::param::Params;

/// Rendered SQL plus its bound parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statement {
    pub sql: String,
    pub params: Params,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Params) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Base trait for command builders.
///
/// Rendering is side-effect free; `exec` on the concrete command validates,
/// renders once and sends the statement.
pub trait SqlCommand {
    /// Render SQL and parameters with the command's connection escaper.
    fn to_statement(&self) -> Statement;

    /// Check the command's preconditions. Runs before anything is sent.
    fn validate(&self) -> CmdResult<()> {
        Ok(())
    }

    /// Debug helper to get the SQL string.
    fn to_sql(&self) -> String {
        self.to_statement().sql
    }
}

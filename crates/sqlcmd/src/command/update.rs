//! UPDATE command.

use super::condition::{ConditionSlot, impl_where_methods};
use super::insert::{RECORD_PARAM, RecordSlot};
use super::traits::{SqlCommand, Statement};
use crate::client::{Client, Connection};
use crate::error::{CmdError, CmdResult};
use crate::exec::exec_statement;
use crate::expr::compile;
use crate::field::Fields;
use crate::param::Params;
use crate::row::{IntoRecord, ModifyResult};

/// `UPDATE <table> SET :__record__0 WHERE <cond>`
///
/// Refuses to run without a record or without a condition.
#[derive(Debug)]
pub struct UpdateCommand<'a, C> {
    client: &'a Client<C>,
    table: String,
    record: RecordSlot,
    where_cond: ConditionSlot,
}

impl<'a, C: Connection> UpdateCommand<'a, C> {
    pub(crate) fn new(client: &'a Client<C>, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            record: RecordSlot::default(),
            where_cond: ConditionSlot::default(),
        }
    }

    /// Columns to change.
    ///
    /// Every serialized key is written. A `None` field becomes `col = NULL`,
    /// so partial-update structs should mark optional fields
    /// `#[serde(skip_serializing_if = "Option::is_none")]`.
    pub fn set(mut self, record: impl IntoRecord) -> Self {
        self.record.set(record);
        self
    }

    impl_where_methods!(Fields, Fields);

    pub async fn exec(self) -> CmdResult<ModifyResult> {
        self.validate()?;
        let stmt = self.to_statement();
        exec_statement(self.client.connection(), self.client.config(), &stmt)
            .await?
            .into_modified()
    }
}

impl<C: Connection> SqlCommand for UpdateCommand<'_, C> {
    fn to_statement(&self) -> Statement {
        let esc = self.client.connection();
        let mut params = Params::new();
        let token = params.bind(RECORD_PARAM, self.record.to_value());
        let mut sql = format!("UPDATE {} SET {token}", esc.escape_identifier(&self.table));
        if let Some(cond) = self.where_cond.get() {
            sql.push_str(" WHERE ");
            sql.push_str(&compile(cond, &mut params, esc));
        }
        Statement::new(sql, params)
    }

    fn validate(&self) -> CmdResult<()> {
        if let Some(err) = self.record.build_error() {
            return Err(CmdError::Serialization(err.to_string()));
        }
        if self.record.non_empty().is_none() {
            return Err(CmdError::nothing_to_update());
        }
        if !self.where_cond.is_set() {
            return Err(CmdError::update_without_condition());
        }
        Ok(())
    }
}

//! DELETE command.

use super::condition::{ConditionSlot, impl_where_methods};
use super::traits::{SqlCommand, Statement};
use crate::client::{Client, Connection};
use crate::error::{CmdError, CmdResult};
use crate::exec::exec_statement;
use crate::expr::compile;
use crate::field::Fields;
use crate::param::Params;
use crate::row::ModifyResult;

/// `DELETE FROM <table> WHERE <cond>`; refuses to run without a condition.
#[derive(Debug)]
pub struct DeleteCommand<'a, C> {
    client: &'a Client<C>,
    table: String,
    where_cond: ConditionSlot,
}

impl<'a, C: Connection> DeleteCommand<'a, C> {
    pub(crate) fn new(client: &'a Client<C>, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            where_cond: ConditionSlot::default(),
        }
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

impl<C: Connection> SqlCommand for DeleteCommand<'_, C> {
    fn to_statement(&self) -> Statement {
        let esc = self.client.connection();
        let mut params = Params::new();
        let mut sql = format!("DELETE FROM {}", esc.escape_identifier(&self.table));
        if let Some(cond) = self.where_cond.get() {
            sql.push_str(" WHERE ");
            sql.push_str(&compile(cond, &mut params, esc));
        }
        Statement::new(sql, params)
    }

    fn validate(&self) -> CmdResult<()> {
        if self.where_cond.is_set() {
            Ok(())
        } else {
            Err(CmdError::delete_without_condition())
        }
    }
}

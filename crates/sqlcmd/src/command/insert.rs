//! INSERT command.

use super::traits::{SqlCommand, Statement};
use crate::client::{Client, Connection};
use crate::error::{CmdError, CmdResult};
use crate::exec::exec_statement;
use crate::param::Params;
use crate::row::{IntoRecord, ModifyResult, Record};
use serde_json::Value;

/// Placeholder base name for bound records.
pub(crate) const RECORD_PARAM: &str = "record";

/// One payload of a mutation command.
///
/// Holds the converted record, or the conversion failure until `validate`
/// reports it. Setting the slot again replaces both.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordSlot {
    record: Option<Record>,
    build_error: Option<String>,
}

impl RecordSlot {
    pub(crate) fn set(&mut self, record: impl IntoRecord) {
        match record.into_record() {
            Ok(map) => {
                self.record = Some(map);
                self.build_error = None;
            }
            Err(e) => {
                self.record = None;
                self.build_error = Some(match e {
                    CmdError::Serialization(m) => m,
                    other => other.to_string(),
                });
            }
        }
    }

    pub(crate) fn build_error(&self) -> Option<&str> {
        self.build_error.as_deref()
    }

    /// The record, unless it is missing or has no columns.
    pub(crate) fn non_empty(&self) -> Option<&Record> {
        self.record.as_ref().filter(|r| !r.is_empty())
    }

    pub(crate) fn to_value(&self) -> Value {
        Value::Object(self.record.clone().unwrap_or_default())
    }
}

/// `INSERT INTO <table> SET :__record__0 [ON DUPLICATE KEY UPDATE :__record__1]`
///
/// The record is bound as one parameter; the connection expands an object
/// value into a `` `col` = value, ... `` list.
#[derive(Debug)]
pub struct InsertCommand<'a, C> {
    client: &'a Client<C>,
    table: String,
    record: RecordSlot,
    on_duplicate: RecordSlot,
}

impl<'a, C: Connection> InsertCommand<'a, C> {
    pub(crate) fn new(client: &'a Client<C>, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            record: RecordSlot::default(),
            on_duplicate: RecordSlot::default(),
        }
    }

    /// Set the row to insert.
    ///
    /// `None` fields of a serialized struct become `NULL` columns; mark them
    /// `#[serde(skip_serializing_if = "Option::is_none")]` to leave them out.
    pub fn values(mut self, record: impl IntoRecord) -> Self {
        self.record.set(record);
        self
    }

    /// Columns to update when the row already exists.
    pub fn or_update(mut self, record: impl IntoRecord) -> Self {
        self.on_duplicate.set(record);
        self
    }

    pub async fn exec(self) -> CmdResult<ModifyResult> {
        self.validate()?;
        let stmt = self.to_statement();
        exec_statement(self.client.connection(), self.client.config(), &stmt)
            .await?
            .into_modified()
    }
}

impl<C: Connection> SqlCommand for InsertCommand<'_, C> {
    fn to_statement(&self) -> Statement {
        let esc = self.client.connection();
        let mut params = Params::new();
        let token = params.bind(RECORD_PARAM, self.record.to_value());
        let mut sql = format!(
            "INSERT INTO {} SET {token}",
            esc.escape_identifier(&self.table)
        );
        if let Some(update) = self.on_duplicate.non_empty() {
            let token = params.bind(RECORD_PARAM, Value::Object(update.clone()));
            sql.push_str(" ON DUPLICATE KEY UPDATE ");
            sql.push_str(&token);
        }
        Statement::new(sql, params)
    }

    fn validate(&self) -> CmdResult<()> {
        if let Some(err) = self.record.build_error().or(self.on_duplicate.build_error()) {
            return Err(CmdError::Serialization(err.to_string()));
        }
        match self.record.non_empty() {
            Some(_) => Ok(()),
            None => Err(CmdError::no_data_to_insert()),
        }
    }
}

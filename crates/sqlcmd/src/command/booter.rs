use super::delete::DeleteCommand;
use super::insert::InsertCommand;
use super::join::JoinBooter;
use super::select::QueryCommand;
use super::update::UpdateCommand;
use crate::client::{Client, Connection};
use crate::ident::split_table_alias;
use crate::row::IntoRecord;

/// Table-scoped command factory, obtained from [`Client::table`].
#[derive(Debug)]
pub struct TableBooter<'a, C> {
    client: &'a Client<C>,
    table: String,
}

impl<C> Clone for TableBooter<'_, C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client,
            table: self.table.clone(),
        }
    }
}

impl<'a, C: Connection> TableBooter<'a, C> {
    pub(crate) fn new(client: &'a Client<C>, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// SELECT with the given projection (see [`QueryCommand::select`]).
    pub fn select<I, S>(&self, fields: I) -> QueryCommand<'a, C>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryCommand::new(self.client, &self.table).select(fields)
    }

    /// `SELECT count(*)`.
    pub fn count(&self) -> QueryCommand<'a, C> {
        QueryCommand::new(self.client, &self.table).count()
    }

    /// INSERT `record`; see [`IntoRecord`] for how `None` fields are written.
    pub fn insert(&self, record: impl IntoRecord) -> InsertCommand<'a, C> {
        InsertCommand::new(self.client, &self.table).values(record)
    }

    /// UPDATE with the columns of `record`. A `None` field sets the column
    /// to `NULL`; skip it during serialization to leave the column as is.
    pub fn update(&self, record: impl IntoRecord) -> UpdateCommand<'a, C> {
        UpdateCommand::new(self.client, &self.table).set(record)
    }

    pub fn delete(&self) -> DeleteCommand<'a, C> {
        DeleteCommand::new(self.client, &self.table)
    }

    /// Start a multi-table query with this table under `alias`.
    pub fn alias(&self, alias: &str) -> JoinBooter<'a, C> {
        JoinBooter::new(self.client, vec![(alias.to_string(), self.table.clone())], vec![])
    }

    /// `this INNER JOIN target`; `target` is `"table"` or `"table as alias"`.
    ///
    /// This table is addressed by its own name.
    pub fn join(&self, target: &str) -> JoinBooter<'a, C> {
        let (table, alias) = split_table_alias(target);
        JoinBooter::new(
            self.client,
            vec![(self.table.clone(), self.table.clone()), (alias, table)],
            vec![],
        )
    }

    /// `this LEFT JOIN target`.
    pub fn left_join(&self, target: &str) -> JoinBooter<'a, C> {
        let (table, alias) = split_table_alias(target);
        JoinBooter::new(
            self.client,
            vec![(self.table.clone(), self.table.clone())],
            vec![(alias, table)],
        )
    }
}

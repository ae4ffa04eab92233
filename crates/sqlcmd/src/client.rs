//! Connection traits and the [`Client`] facade.
//!
//! The wire driver lives outside this crate. It plugs in by implementing
//! [`Connection`] (and, for pools, [`ConnectionSource`] with a
//! [`DedicatedConnection`] type). Everything above that seam renders SQL
//! and reshapes results without knowing which driver is underneath.

use crate::command::{DeleteCommand, InsertCommand, QueryCommand, TableBooter, UpdateCommand};
use crate::config::ClientConfig;
use crate::error::CmdResult;
use crate::escape::Escape;
use crate::exec::exec_sql;
use crate::param::Params;
use crate::row::QueryResult;
use std::future::Future;
use std::sync::Arc;

/// Something that can run a statement.
///
/// `params` is `None` when the statement binds nothing. The escaping methods
/// inherited from [`Escape`] default to MySQL rules.
pub trait Connection: Escape + Send + Sync {
    /// Execute a statement with `:name` placeholders.
    fn query(
        &self,
        sql: &str,
        params: Option<&Params>,
    ) -> impl Future<Output = CmdResult<QueryResult>> + Send;
}

/// A pool able to hand out dedicated connections for transactions.
pub trait ConnectionSource: Connection {
    type Conn: DedicatedConnection + 'static;

    /// Whether [`ConnectionSource::acquire`] can succeed at all.
    ///
    /// A single shared connection wrapped as a source returns `false`, which
    /// makes `run_transaction` fail before doing anything.
    fn supports_acquire(&self) -> bool {
        true
    }

    /// Take a connection out of the pool.
    fn acquire(&self) -> impl Future<Output = CmdResult<Self::Conn>> + Send;
}

/// A connection checked out of a pool.
pub trait DedicatedConnection: Connection {
    fn begin_transaction(&self) -> impl Future<Output = CmdResult<()>> + Send;

    fn commit(&self) -> impl Future<Output = CmdResult<()>> + Send;

    fn rollback(&self) -> impl Future<Output = CmdResult<()>> + Send;

    /// Hand the connection back to its pool.
    fn release(&self) -> CmdResult<()>;
}

impl<T: Connection> Connection for &T {
    fn query(
        &self,
        sql: &str,
        params: Option<&Params>,
    ) -> impl Future<Output = CmdResult<QueryResult>> + Send {
        (**self).query(sql, params)
    }
}

impl<T: Connection> Connection for Arc<T> {
    fn query(
        &self,
        sql: &str,
        params: Option<&Params>,
    ) -> impl Future<Output = CmdResult<QueryResult>> + Send {
        (**self).query(sql, params)
    }
}

impl<T: ConnectionSource> ConnectionSource for &T {
    type Conn = T::Conn;

    fn supports_acquire(&self) -> bool {
        (**self).supports_acquire()
    }

    fn acquire(&self) -> impl Future<Output = CmdResult<Self::Conn>> + Send {
        (**self).acquire()
    }
}

impl<T: ConnectionSource> ConnectionSource for Arc<T> {
    type Conn = T::Conn;

    fn supports_acquire(&self) -> bool {
        (**self).supports_acquire()
    }

    fn acquire(&self) -> impl Future<Output = CmdResult<Self::Conn>> + Send {
        (**self).acquire()
    }
}

impl<T: DedicatedConnection> DedicatedConnection for Arc<T> {
    fn begin_transaction(&self) -> impl Future<Output = CmdResult<()>> + Send {
        (**self).begin_transaction()
    }

    fn commit(&self) -> impl Future<Output = CmdResult<()>> + Send {
        (**self).commit()
    }

    fn rollback(&self) -> impl Future<Output = CmdResult<()>> + Send {
        (**self).rollback()
    }

    fn release(&self) -> CmdResult<()> {
        (**self).release()
    }
}

/// Entry point: a connection plus execution settings.
///
/// ```ignore
/// let client = Client::new(pool);
/// let names = client
///     .table("user")
///     .select(["user_name"])
///     .filter(|e| e.field("user_height").gte(166))
///     .exec()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Client<C> {
    conn: C,
    config: ClientConfig,
}

impl<C: Connection> Client<C> {
    pub fn new(conn: C) -> Self {
        Self::with_config(conn, ClientConfig::default())
    }

    pub fn with_config(conn: C, config: ClientConfig) -> Self {
        Self { conn, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn into_inner(self) -> C {
        self.conn
    }

    /// Command booter for `table`.
    pub fn table(&self, name: &str) -> TableBooter<'_, C> {
        TableBooter::new(self, name)
    }

    /// `SELECT * FROM table`, ready for conditions.
    pub fn from(&self, table: &str) -> QueryCommand<'_, C> {
        QueryCommand::new(self, table)
    }

    /// INSERT without a record yet; supply one with `values`.
    pub fn insert(&self, table: &str) -> InsertCommand<'_, C> {
        InsertCommand::new(self, table)
    }

    /// UPDATE without a record yet; supply one with `set`.
    pub fn update(&self, table: &str) -> UpdateCommand<'_, C> {
        UpdateCommand::new(self, table)
    }

    pub fn delete(&self, table: &str) -> DeleteCommand<'_, C> {
        DeleteCommand::new(self, table)
    }

    /// Run hand-written SQL with optional named parameters.
    pub async fn exec(&self, sql: &str, params: Option<&Params>) -> CmdResult<QueryResult> {
        exec_sql(&self.conn, &self.config, sql, params).await
    }
}

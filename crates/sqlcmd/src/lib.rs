//! # sqlcmd
//!
//! Composable MySQL command builders on top of any async driver.
//!
//! ## Features
//!
//! - **Condition algebra**: `and` / `or` / `not` trees over field comparisons,
//!   rendered fully parenthesized with named placeholders
//! - **Escaping**: backtick identifiers, `alias.field` qualifiers, aliased and
//!   aggregate selection expressions
//! - **Commands**: SELECT (single table or joins), INSERT with
//!   `ON DUPLICATE KEY UPDATE`, UPDATE, DELETE
//! - **Safe defaults**: UPDATE and DELETE refuse to run without a condition
//! - **Transactions**: `run_transaction` on a pooled connection with
//!   best-effort rollback and guaranteed release
//! - **Driver agnostic**: implement [`Connection`] (and [`ConnectionSource`]
//!   for pools) for your driver
//!
//! ## Example
//!
//! ```ignore
//! use sqlcmd::{Client, QueryOutput};
//! use serde_json::json;
//!
//! let client = Client::new(pool);
//!
//! // SELECT `user_name` FROM `user` WHERE ( ( ( `user_company` = :__user_company__0 )
//! //     OR ( `user_company` = :__user_company__1 ) ) AND ( `user_height` >= :__user_height__0 ) )
//! let rows = client
//!     .table("user")
//!     .select(["user_name"])
//!     .filter(|e| e.field("user_company").eq("doge"))
//!     .or(|e| e.field("user_company").eq("cate"))
//!     .and(|e| e.field("user_height").gte(166))
//!     .exec()
//!     .await?;
//!
//! // SELECT count(*) ... yields a bare number
//! let n = client.table("user").count().fetch_count().await?;
//!
//! client
//!     .table("user")
//!     .insert(json!({"user_id": "Enoch", "user_height": 180}))
//!     .or_update(json!({"user_height": 180}))
//!     .exec()
//!     .await?;
//! ```

pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod escape;
pub mod exec;
pub mod expr;
pub mod field;
pub mod ident;
pub mod param;
pub mod row;
pub mod transaction;

pub use client::{Client, Connection, ConnectionSource, DedicatedConnection};
pub use command::{
    DeleteCommand, InsertCommand, JoinBooter, JoinQueryCommand, Limit, OrderBy, QueryCommand,
    SortDir, SqlCommand, Statement, TableBooter, UpdateCommand,
};
pub use config::ClientConfig;
pub use error::{CmdError, CmdResult};
pub use escape::{Escape, MysqlEscape, format_named};
pub use exec::QueryType;
pub use expr::{CompareOp, Cond, ConditionExpr, FieldCompare, IntoCondition, Operand};
pub use field::{FieldRef, Fields, MultiFields, TableFields};
pub use ident::{AggFn, SelectedField, escape_field_expr, escape_sql_field};
pub use param::Params;
pub use row::{
    FromRow, IntoRecord, ModifyResult, QueryFirst, QueryOutput, QueryResult, Record, Row,
};

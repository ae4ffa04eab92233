//! Single-table SELECT command.

use super::condition::{ConditionSlot, impl_where_methods};
use super::traits::{SqlCommand, Statement};
use super::{
    Limit, OrderBy, is_count_projection, projection_aliases, render_group_by, render_order_by,
    render_projection,
};
use crate::client::{Client, Connection};
use crate::error::{CmdError, CmdResult};
use crate::escape::Escape;
use crate::exec::{count_from_rows, exec_statement};
use crate::expr::{ConditionExpr, IntoCondition, compile};
use crate::field::Fields;
use crate::param::Params;
use crate::row::QueryOutput;

/// Clauses shared by single- and multi-table queries.
#[derive(Debug, Clone, Default)]
pub(crate) struct QueryParts {
    pub(crate) selection: Vec<String>,
    pub(crate) group_by: Vec<String>,
    pub(crate) having: ConditionSlot,
    pub(crate) order_by: Vec<OrderBy>,
    pub(crate) limit: Option<Limit>,
}

impl QueryParts {
    pub(crate) fn is_count(&self) -> bool {
        is_count_projection(&self.selection)
    }

    pub(crate) fn aliases(&self) -> Vec<String> {
        projection_aliases(&self.selection)
    }

    /// Render the full SELECT. ON, WHERE and HAVING share one parameter map.
    pub(crate) fn render<E: Escape + ?Sized>(
        &self,
        from: &str,
        on: Option<&ConditionExpr>,
        filter: Option<&ConditionExpr>,
        esc: &E,
    ) -> Statement {
        let mut params = Params::new();
        let mut sql = format!("SELECT {} FROM {from}", render_projection(&self.selection, esc));

        if let Some(on) = on {
            sql.push_str(" ON ");
            sql.push_str(&compile(on, &mut params, esc));
        }
        if let Some(cond) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(&compile(cond, &mut params, esc));
        }
        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&render_group_by(&self.group_by, esc));
        }
        if let Some(cond) = self.having.get() {
            sql.push_str(" HAVING ");
            sql.push_str(&compile(cond, &mut params, esc));
        }
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&render_order_by(&self.order_by, esc));
        }
        if let Some(limit) = self.limit {
            sql.push(' ');
            sql.push_str(&limit.to_string());
        }

        Statement::new(sql, params)
    }
}

/// Execute a rendered SELECT and reshape `count(*)` results.
pub(crate) async fn run_query<C: Connection>(
    client: &Client<C>,
    stmt: &Statement,
    is_count: bool,
) -> CmdResult<QueryOutput> {
    let rows = exec_statement(client.connection(), client.config(), stmt)
        .await?
        .into_rows()?;
    if is_count {
        Ok(QueryOutput::Count(count_from_rows(&rows)?))
    } else {
        Ok(QueryOutput::Rows(rows))
    }
}

/// Generate the clause setters and typed fetch helpers for a query command
/// holding `self.parts: QueryParts` and an inherent `exec`.
macro_rules! impl_query_methods {
    () => {
        /// Set the projection. Entries are plain fields, `field as alias`,
        /// `agg([distinct] field) as alias`, `*` or `count(*)`.
        pub fn select<I, S>(mut self, fields: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.parts.selection = fields.into_iter().map(Into::into).collect();
            self
        }

        /// Select `count(*)`; `exec` then yields `QueryOutput::Count`.
        pub fn count(mut self) -> Self {
            self.parts.selection = vec!["count(*)".to_string()];
            self
        }

        /// Set GROUP BY fields.
        pub fn group_by<I, S>(mut self, fields: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.parts.group_by = fields.into_iter().map(Into::into).collect();
            self
        }

        /// Set the HAVING condition from a prebuilt expression.
        pub fn having_expr(mut self, cond: impl $crate::expr::IntoCondition) -> Self {
            self.parts
                .having
                .replace($crate::expr::IntoCondition::into_condition(cond));
            self
        }

        pub fn clear_having(mut self) -> Self {
            self.parts.having.clear();
            self
        }

        /// Set ORDER BY to one entry (`"field"`, `"field desc"` or an
        /// `OrderBy`), replacing any previous ordering.
        pub fn order_by(mut self, item: impl Into<$crate::command::OrderBy>) -> Self {
            self.parts.order_by = vec![item.into()];
            self
        }

        /// Set ORDER BY to the given entries, replacing any previous ordering.
        pub fn order_by_all<I, O>(mut self, items: I) -> Self
        where
            I: IntoIterator<Item = O>,
            O: Into<$crate::command::OrderBy>,
        {
            self.parts.order_by = items.into_iter().map(Into::into).collect();
            self
        }

        /// Set LIMIT.
        pub fn limit(mut self, count: u64) -> Self {
            self.parts.limit = Some($crate::command::Limit::Count(count));
            self
        }

        /// Set `LIMIT offset, count`.
        pub fn limit_offset(mut self, offset: u64, count: u64) -> Self {
            self.parts.limit = Some($crate::command::Limit::OffsetCount { offset, count });
            self
        }

        /// Aliases declared by the current projection.
        pub fn aliases(&self) -> Vec<String> {
            self.parts.aliases()
        }

        /// Execute and keep the first row (or the count). `None` when no row
        /// matched.
        pub async fn exec_take_first(
            self,
        ) -> $crate::error::CmdResult<Option<$crate::row::QueryFirst>> {
            Ok(self.exec().await?.take_first())
        }

        /// Execute and map every row to `T`.
        pub async fn fetch_all<T: $crate::row::FromRow>(
            self,
        ) -> $crate::error::CmdResult<Vec<T>> {
            match self.exec().await? {
                $crate::row::QueryOutput::Rows(rows) => rows.iter().map(T::from_row).collect(),
                $crate::row::QueryOutput::Count(_) => {
                    Err($crate::command::select::count_not_rows())
                }
            }
        }

        /// Execute and map the first row to `T`, if any.
        pub async fn fetch_first<T: $crate::row::FromRow>(
            self,
        ) -> $crate::error::CmdResult<Option<T>> {
            match self.exec_take_first().await? {
                Some($crate::row::QueryFirst::Row(row)) => T::from_row(&row).map(Some),
                Some($crate::row::QueryFirst::Count(_)) => {
                    Err($crate::command::select::count_not_rows())
                }
                None => Ok(None),
            }
        }

        /// Execute as `SELECT count(*)`, whatever the projection was.
        pub async fn fetch_count(self) -> $crate::error::CmdResult<i64> {
            match self.count().exec().await? {
                $crate::row::QueryOutput::Count(n) => Ok(n),
                $crate::row::QueryOutput::Rows(_) => Err(
                    $crate::error::CmdError::UnexpectedResult("count query returned rows".to_string()),
                ),
            }
        }
    };
}

pub(crate) use impl_query_methods;

/// SELECT over one table.
///
/// ```ignore
/// let rows = client
///     .table("user")
///     .select(["user_name"])
///     .filter(|e| e.field("user_company").eq("doge"))
///     .or(|e| e.field("user_company").eq("cate"))
///     .and(|e| e.field("user_height").gte(166))
///     .exec()
///     .await?;
/// ```
#[derive(Debug)]
pub struct QueryCommand<'a, C> {
    client: &'a Client<C>,
    table: String,
    parts: QueryParts,
    where_cond: ConditionSlot,
}

impl<'a, C: Connection> QueryCommand<'a, C> {
    pub(crate) fn new(client: &'a Client<C>, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            parts: QueryParts::default(),
            where_cond: ConditionSlot::default(),
        }
    }

    impl_where_methods!(Fields, Fields);
    impl_query_methods!();

    /// Set the HAVING condition. Result aliases are addressed as plain
    /// fields (`e.field("total")`).
    pub fn having<F, R>(mut self, f: F) -> Self
    where
        F: FnOnce(&Fields) -> R,
        R: IntoCondition,
    {
        self.parts.having.replace(f(&Fields).into_condition());
        self
    }

    /// Execute: rows, or the bare count for a `count(*)` projection.
    pub async fn exec(self) -> CmdResult<QueryOutput> {
        self.validate()?;
        let stmt = self.to_statement();
        run_query(self.client, &stmt, self.parts.is_count()).await
    }
}

pub(crate) fn count_not_rows() -> CmdError {
    CmdError::UnexpectedResult("a count(*) projection yields a number, not rows".to_string())
}

impl<C: Connection> SqlCommand for QueryCommand<'_, C> {
    fn to_statement(&self) -> Statement {
        let esc = self.client.connection();
        self.parts.render(
            &esc.escape_identifier(&self.table),
            None,
            self.where_cond.get(),
            esc,
        )
    }
}

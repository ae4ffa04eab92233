//! Multi-table (joined) queries.
//!
//! ```ignore
//! let rows = client
//!     .table("user")
//!     .alias("u")
//!     .join("company as c")
//!     .on(|e| e.field("u.user_company").eq(e.field("c.company_id")))
//!     .select(["u.user_name", "c.company_name as company"])
//!     .filter(|e| e.field("u.user_height").gte(166))
//!     .exec()
//!     .await?;
//! ```
//!
//! The inner-joined tables render first, then the left-joined ones. A single
//! `ON` clause follows the whole chain; repeated `on` calls are ANDed.

use super::condition::{ConditionSlot, impl_where_methods};
use super::select::{QueryParts, impl_query_methods, run_query};
use super::traits::{SqlCommand, Statement};
use crate::client::{Client, Connection};
use crate::error::CmdResult;
use crate::escape::Escape;
use crate::expr::IntoCondition;
use crate::field::MultiFields;
use crate::ident::split_table_alias;
use crate::row::QueryOutput;

/// Ordered `(alias, table)` pairs. Re-adding an alias replaces its table in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TableSet {
    entries: Vec<(String, String)>,
}

impl TableSet {
    pub(crate) fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut set = Self::default();
        for (alias, table) in pairs {
            set.upsert(alias, table);
        }
        set
    }

    pub(crate) fn upsert(&mut self, alias: String, table: String) {
        match self.entries.iter_mut().find(|(a, _)| *a == alias) {
            Some(entry) => entry.1 = table,
            None => self.entries.push((alias, table)),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn aliases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(a, _)| a.as_str())
    }

    fn render<E: Escape + ?Sized>(&self, sep: &str, esc: &E) -> String {
        self.entries
            .iter()
            .map(|(alias, table)| {
                format!(
                    "{} AS {}",
                    esc.escape_identifier(table),
                    esc.escape_identifier(alias)
                )
            })
            .collect::<Vec<_>>()
            .join(sep)
    }
}

/// Join topology shared by the booter and the query it produces.
#[derive(Debug, Clone, Default)]
pub(crate) struct JoinTopology {
    pub(crate) inner: TableSet,
    pub(crate) left: TableSet,
    pub(crate) on: ConditionSlot,
}

impl JoinTopology {
    /// `t1 AS a1 INNER JOIN t2 AS a2 LEFT JOIN t3 AS a3 ...`
    pub(crate) fn render_tables<E: Escape + ?Sized>(&self, esc: &E) -> String {
        let mut sql = self.inner.render(" INNER JOIN ", esc);
        if !self.left.is_empty() {
            if !sql.is_empty() {
                sql.push_str(" LEFT JOIN ");
            }
            sql.push_str(&self.left.render(" LEFT JOIN ", esc));
        }
        sql
    }
}

/// Builder for the table topology of a multi-table query.
#[derive(Debug)]
pub struct JoinBooter<'a, C> {
    client: &'a Client<C>,
    topology: JoinTopology,
}

impl<'a, C: Connection> JoinBooter<'a, C> {
    pub(crate) fn new(
        client: &'a Client<C>,
        inner: Vec<(String, String)>,
        left: Vec<(String, String)>,
    ) -> Self {
        Self {
            client,
            topology: JoinTopology {
                inner: TableSet::from_pairs(inner),
                left: TableSet::from_pairs(left),
                on: ConditionSlot::default(),
            },
        }
    }

    /// INNER JOIN `"table"` or `"table as alias"`.
    pub fn join(mut self, target: &str) -> Self {
        let (table, alias) = split_table_alias(target);
        self.topology.inner.upsert(alias, table);
        self
    }

    /// LEFT JOIN `"table"` or `"table as alias"`.
    pub fn left_join(mut self, target: &str) -> Self {
        let (table, alias) = split_table_alias(target);
        self.topology.left.upsert(alias, table);
        self
    }

    /// AND a condition onto the join's ON clause.
    pub fn on<F, R>(mut self, f: F) -> Self
    where
        F: FnOnce(&MultiFields) -> R,
        R: IntoCondition,
    {
        self.topology.on.and(f(&MultiFields::new()).into_condition());
        self
    }

    pub fn on_expr(mut self, cond: impl IntoCondition) -> Self {
        self.topology.on.and(cond.into_condition());
        self
    }

    /// Table aliases in join order, inner joins first.
    pub fn aliases(&self) -> Vec<String> {
        self.topology
            .inner
            .aliases()
            .chain(self.topology.left.aliases())
            .map(str::to_string)
            .collect()
    }

    /// Finish the topology with a projection.
    pub fn select<I, S>(self, fields: I) -> JoinQueryCommand<'a, C>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        JoinQueryCommand::new(self.client, self.topology).select(fields)
    }

    /// Finish the topology with `SELECT count(*)`.
    pub fn count(self) -> JoinQueryCommand<'a, C> {
        JoinQueryCommand::new(self.client, self.topology).count()
    }
}

/// SELECT over a join.
#[derive(Debug)]
pub struct JoinQueryCommand<'a, C> {
    client: &'a Client<C>,
    topology: JoinTopology,
    parts: QueryParts,
    where_cond: ConditionSlot,
}

impl<'a, C: Connection> JoinQueryCommand<'a, C> {
    fn new(client: &'a Client<C>, topology: JoinTopology) -> Self {
        Self {
            client,
            topology,
            parts: QueryParts::default(),
            where_cond: ConditionSlot::default(),
        }
    }

    impl_where_methods!(MultiFields, MultiFields::new());
    impl_query_methods!();

    /// Set the HAVING condition.
    ///
    /// The accessor knows the projection's result aliases: `e.alias("cnt")`
    /// (or `e.field("cnt")`) addresses `count(u.user_id) as cnt`.
    pub fn having<F, R>(mut self, f: F) -> Self
    where
        F: FnOnce(&MultiFields) -> R,
        R: IntoCondition,
    {
        let fields = MultiFields::with_aliases(self.parts.aliases());
        self.parts.having.replace(f(&fields).into_condition());
        self
    }

    /// Execute: rows, or the bare count for a `count(*)` projection.
    pub async fn exec(self) -> CmdResult<QueryOutput> {
        self.validate()?;
        let stmt = self.to_statement();
        run_query(self.client, &stmt, self.parts.is_count()).await
    }
}

impl<C: Connection> SqlCommand for JoinQueryCommand<'_, C> {
    fn to_statement(&self) -> Statement {
        let esc = self.client.connection();
        self.parts.render(
            &self.topology.render_tables(esc),
            self.topology.on.get(),
            self.where_cond.get(),
            esc,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::MysqlEscape;

    fn pair(a: &str, t: &str) -> (String, String) {
        (a.to_string(), t.to_string())
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut set = TableSet::from_pairs(vec![pair("u", "user"), pair("c", "company")]);
        set.upsert("u".into(), "admin".into());
        assert_eq!(
            set.render(" INNER JOIN ", &MysqlEscape),
            "`admin` AS `u` INNER JOIN `company` AS `c`"
        );
    }

    #[test]
    fn left_joins_follow_inner_joins() {
        let topology = JoinTopology {
            inner: TableSet::from_pairs(vec![pair("u", "user"), pair("c", "company")]),
            left: TableSet::from_pairs(vec![pair("p", "phone"), pair("a", "address")]),
            on: ConditionSlot::default(),
        };
        assert_eq!(
            topology.render_tables(&MysqlEscape),
            "`user` AS `u` INNER JOIN `company` AS `c` LEFT JOIN `phone` AS `p` LEFT JOIN `address` AS `a`"
        );
    }
}

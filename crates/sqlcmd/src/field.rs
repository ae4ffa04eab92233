//! Field accessors handed to condition closures.
//!
//! Single-table commands pass a [`Fields`] to their closures, multi-table
//! commands pass a [`MultiFields`]. Both only construct [`FieldRef`]s: any
//! name is accepted and a misspelled column surfaces as a database error.

use crate::expr::{CompareOp, Cond, ConditionExpr, FieldCompare, Operand};
use serde::Serialize;
use serde_json::Value;

/// Reference to a column, optionally qualified by a table alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub field: String,
}

impl FieldRef {
    /// Unqualified column reference.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            table: None,
            field: field.into(),
        }
    }

    /// `table.field` reference.
    pub fn qualified(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            field: field.into(),
        }
    }

    fn compare(&self, op: CompareOp, value: Operand) -> Cond {
        Cond::new(ConditionExpr::Compare(FieldCompare {
            table: self.table.clone(),
            field: self.field.clone(),
            op,
            value,
        }))
    }

    /// `field = value` (`IS NULL` for a null value).
    pub fn eq(&self, value: impl Into<Operand>) -> Cond {
        self.compare(CompareOp::Eq, value.into())
    }

    /// `field != value` (`IS NOT NULL` for a null value).
    pub fn ne(&self, value: impl Into<Operand>) -> Cond {
        self.compare(CompareOp::Ne, value.into())
    }

    pub fn gt(&self, value: impl Into<Operand>) -> Cond {
        self.compare(CompareOp::Gt, value.into())
    }

    pub fn gte(&self, value: impl Into<Operand>) -> Cond {
        self.compare(CompareOp::Gte, value.into())
    }

    pub fn lt(&self, value: impl Into<Operand>) -> Cond {
        self.compare(CompareOp::Lt, value.into())
    }

    pub fn lte(&self, value: impl Into<Operand>) -> Cond {
        self.compare(CompareOp::Lte, value.into())
    }

    /// `field IN (values)`; the list is bound as a single parameter.
    pub fn in_list<I, V>(&self, values: I) -> Cond
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let list = values.into_iter().map(Into::into).collect();
        self.compare(CompareOp::In, Operand::List(list))
    }
}

/// Field accessor for single-table commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fields;

impl Fields {
    pub fn field(&self, name: &str) -> FieldRef {
        FieldRef::new(name)
    }
}

/// Field accessor for multi-table commands.
///
/// In a HAVING closure it also carries the result aliases declared by the
/// projection (`... as alias`). The list is informational: [`is_alias`] and
/// [`aliases`] report it, while [`field`] and [`alias`] turn any undotted
/// name into a bare reference whether it is listed or not.
///
/// [`is_alias`]: MultiFields::is_alias
/// [`aliases`]: MultiFields::aliases
/// [`field`]: MultiFields::field
/// [`alias`]: MultiFields::alias
#[derive(Debug, Clone, Default)]
pub struct MultiFields {
    aliases: Vec<String>,
}

impl MultiFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accessor aware of the given result aliases.
    pub fn with_aliases(aliases: Vec<String>) -> Self {
        Self { aliases }
    }

    /// Columns of the table joined under `alias`.
    pub fn table<'a>(&self, alias: &'a str) -> TableFields<'a> {
        TableFields { alias }
    }

    /// `"alias.field"` resolves to a qualified reference, an undotted name to
    /// a bare one.
    pub fn field(&self, path: &str) -> FieldRef {
        match path.split_once('.') {
            Some((table, field)) => FieldRef::qualified(table, field),
            None => FieldRef::new(path),
        }
    }

    /// Reference to a result alias of the projection.
    pub fn alias(&self, name: &str) -> FieldRef {
        FieldRef::new(name)
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.iter().any(|a| a == name)
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }
}

/// Columns of one aliased table.
#[derive(Debug, Clone, Copy)]
pub struct TableFields<'a> {
    alias: &'a str,
}

impl TableFields<'_> {
    pub fn field(&self, name: &str) -> FieldRef {
        FieldRef::qualified(self.alias, name)
    }

    pub fn alias(&self) -> &str {
        self.alias
    }
}

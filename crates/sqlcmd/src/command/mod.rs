//! Command builders.
//!
//! Commands are created by a [`TableBooter`] (or the [`Client`](crate::Client)
//! shortcuts), configured with consuming `self -> Self` calls and consumed by
//! `exec()`. Every render starts a fresh [`Params`](crate::Params) map, so a
//! command's placeholders never leak into another statement.
//!
//! Query clause order:
//!
//! ```text
//! SELECT <fields> FROM <tables> [ON ..] [WHERE ..] [GROUP BY ..] [HAVING ..]
//!     [ORDER BY ..] [LIMIT n | LIMIT offset, n]
//! ```

mod booter;
pub(crate) mod condition;
mod delete;
mod insert;
mod join;
mod select;
mod traits;
mod update;


pub use booter::TableBooter;
pub use delete::DeleteCommand;
pub use insert::InsertCommand;
pub use join::{JoinBooter, JoinQueryCommand};
pub use select::QueryCommand;
pub use traits::{SqlCommand, Statement};
pub use update::UpdateCommand;

use crate::escape::Escape;
use crate::exec::COUNT_COLUMN;
use crate::ident::{SelectedField, escape_field_expr, escape_sql_field};
use std::fmt;

/// Sort direction of an ORDER BY entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One ORDER BY entry.
///
/// Built from strings like `"user_height"`, `"u.user_height desc"` or
/// `"total asc"`: a trailing `asc` / `desc` (any case) is the direction, the
/// rest is the field expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub dir: Option<SortDir>,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: Some(SortDir::Asc),
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: Some(SortDir::Desc),
        }
    }

    /// Parse `"field [asc|desc]"`.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if let Some((field, last)) = s.rsplit_once(char::is_whitespace) {
            let dir = if last.eq_ignore_ascii_case("asc") {
                Some(SortDir::Asc)
            } else if last.eq_ignore_ascii_case("desc") {
                Some(SortDir::Desc)
            } else {
                None
            };
            if dir.is_some() {
                return Self {
                    field: field.trim_end().to_string(),
                    dir,
                };
            }
        }
        Self {
            field: s.to_string(),
            dir: None,
        }
    }

    pub(crate) fn to_sql<E: Escape + ?Sized>(&self, esc: &E) -> String {
        let field = escape_field_expr(&self.field, esc);
        match self.dir {
            Some(dir) => format!("{field} {}", dir.as_sql()),
            None => field,
        }
    }
}

impl From<&str> for OrderBy {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for OrderBy {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

/// LIMIT clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(u64),
    OffsetCount { offset: u64, count: u64 },
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "LIMIT {n}"),
            Self::OffsetCount { offset, count } => write!(f, "LIMIT {offset}, {count}"),
        }
    }
}

/// Whether a projection selects exactly `count(*)`.
pub(crate) fn is_count_projection(fields: &[String]) -> bool {
    matches!(fields, [only] if only.trim().eq_ignore_ascii_case(COUNT_COLUMN))
}

/// Render a SELECT list. Empty means `*`; `*` and `count(*)` pass through
/// the field-expression escaper unchanged.
pub(crate) fn render_projection<E: Escape + ?Sized>(fields: &[String], esc: &E) -> String {
    if fields.is_empty() {
        return "*".to_string();
    }
    fields
        .iter()
        .map(|f| escape_field_expr(f, esc))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn render_group_by<E: Escape + ?Sized>(fields: &[String], esc: &E) -> String {
    fields
        .iter()
        .map(|f| escape_sql_field(f.trim(), esc))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn render_order_by<E: Escape + ?Sized>(items: &[OrderBy], esc: &E) -> String {
    items
        .iter()
        .map(|o| o.to_sql(esc))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result aliases declared by a projection (`... as alias`).
pub(crate) fn projection_aliases(fields: &[String]) -> Vec<String> {
    fields
        .iter()
        .filter_map(|f| SelectedField::parse(f).alias().map(str::to_string))
        .collect()
}

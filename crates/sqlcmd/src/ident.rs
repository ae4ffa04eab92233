//! Field and selection-expression escaping.
//!
//! Selection entries are strings such as `user_name`, `u.user_name`,
//! `u.user_name as name`, `count(distinct u.user_id) as cnt`, `*` or
//! `count(*)`. [`SelectedField::parse`] recognizes exactly two patterns:
//!
//! - `agg(field) as alias` / `agg(distinct field) as alias`, with
//!   `agg` one of `avg`, `sum`, `count`, `max`, `min`
//! - `expr as alias`
//!
//! Keywords and function names match case-insensitively. Anything else is a
//! plain identifier and is escaped as a whole; it is never rejected here, a
//! bad name surfaces as a database error. Names containing spaces are not
//! supported.

use crate::escape::Escape;
use std::fmt;
use std::sync::OnceLock;

/// Aggregate functions recognized in selection expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggFn {
    Avg,
    Sum,
    Count,
    Max,
    Min,
}

impl AggFn {
    /// Parse an aggregate function name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "avg" => Some(Self::Avg),
            "sum" => Some(Self::Sum),
            "count" => Some(Self::Count),
            "max" => Some(Self::Max),
            "min" => Some(Self::Min),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Avg => "avg",
            Self::Sum => "sum",
            Self::Count => "count",
            Self::Max => "max",
            Self::Min => "min",
        }
    }
}

impl fmt::Display for AggFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a SELECT list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectedField {
    /// `*`
    Star,
    /// `count(*)`
    CountStar,
    /// A plain (optionally `alias.`-qualified) identifier.
    Field(String),
    /// `expr AS alias`
    Aliased { expr: String, alias: String },
    /// `agg([DISTINCT] field) AS alias`
    Aggregate {
        func: AggFn,
        distinct: bool,
        field: String,
        alias: String,
    },
}

fn agg_with_alias_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(
            r"^(?i:(avg|sum|count|max|min))\((?i:(distinct)\s+)?(\S+)\)\s+(?i:as)\s+(\S+)$",
        )
        .expect("invalid built-in aggregate regex")
    })
}

fn with_alias_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"^(\S+)\s+(?i:as)\s+(\S+)$").expect("invalid built-in alias regex")
    })
}

impl SelectedField {
    /// Classify a selection string.
    pub fn parse(input: &str) -> Self {
        let s = input.trim();
        if s == "*" {
            return Self::Star;
        }
        if s.eq_ignore_ascii_case("count(*)") {
            return Self::CountStar;
        }
        if let Some(caps) = agg_with_alias_re().captures(s) {
            if let Some(func) = AggFn::parse(&caps[1]) {
                return Self::Aggregate {
                    func,
                    distinct: caps.get(2).is_some(),
                    field: caps[3].to_string(),
                    alias: caps[4].to_string(),
                };
            }
        }
        if let Some(caps) = with_alias_re().captures(s) {
            return Self::Aliased {
                expr: caps[1].to_string(),
                alias: caps[2].to_string(),
            };
        }
        Self::Field(s.to_string())
    }

    /// The result column alias, if the entry declares one.
    pub fn alias(&self) -> Option<&str> {
        match self {
            Self::Aliased { alias, .. } | Self::Aggregate { alias, .. } => Some(alias),
            _ => None,
        }
    }

    /// Render the entry with escaped identifiers.
    pub fn to_sql<E: Escape + ?Sized>(&self, esc: &E) -> String {
        match self {
            Self::Star => "*".to_string(),
            Self::CountStar => "count(*)".to_string(),
            Self::Field(f) => escape_sql_field(f, esc),
            Self::Aliased { expr, alias } => {
                format!("{} AS {}", escape_sql_field(expr, esc), esc.escape_identifier(alias))
            }
            Self::Aggregate {
                func,
                distinct,
                field,
                alias,
            } => format!(
                "{}({}{}) AS {}",
                func,
                if *distinct { "DISTINCT " } else { "" },
                escape_sql_field(field, esc),
                esc.escape_identifier(alias)
            ),
        }
    }
}

/// Escape an identifier that may carry an `alias.` qualifier.
///
/// The qualifier and the field are escaped independently; a `*` field is kept
/// as the wildcard.
pub fn escape_sql_field<E: Escape + ?Sized>(f: &str, esc: &E) -> String {
    if f == "*" {
        return f.to_string();
    }
    match f.split_once('.') {
        Some((alias, field)) => {
            let field = if field == "*" {
                field.to_string()
            } else {
                esc.escape_identifier(field)
            };
            format!("{}.{}", esc.escape_identifier(alias), field)
        }
        None => esc.escape_identifier(f),
    }
}

/// Escape a selection / ordering expression string.
pub fn escape_field_expr<E: Escape + ?Sized>(f: &str, esc: &E) -> String {
    SelectedField::parse(f).to_sql(esc)
}

/// Split a join target `"table as alias"` into its parts. A bare `"table"`
/// is its own alias.
pub(crate) fn split_table_alias(target: &str) -> (String, String) {
    let target = target.trim();
    match with_alias_re().captures(target) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => (target.to_string(), target.to_string()),
    }
}

/// Join an optional table qualifier and a field name into `table.field`.
pub(crate) fn qualified(table: Option<&str>, field: &str) -> String {
    match table {
        Some(t) => format!("{t}.{field}"),
        None => field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::MysqlEscape;

    fn esc(f: &str) -> String {
        escape_field_expr(f, &MysqlEscape)
    }

    #[test]
    fn plain_and_dotted_fields() {
        assert_eq!(esc("user_name"), "`user_name`");
        assert_eq!(esc("u.user_name"), "`u`.`user_name`");
        assert_eq!(esc("u.*"), "`u`.*");
        assert_eq!(esc("*"), "*");
    }

    #[test]
    fn alias_pattern() {
        assert_eq!(esc("u.user_name as name"), "`u`.`user_name` AS `name`");
        assert_eq!(esc("user_name AS n"), "`user_name` AS `n`");
    }

    #[test]
    fn aggregate_pattern() {
        assert_eq!(esc("sum(user_height) as total"), "sum(`user_height`) AS `total`");
        assert_eq!(
            esc("count(distinct u.user_id) as cnt"),
            "count(DISTINCT `u`.`user_id`) AS `cnt`"
        );
        assert_eq!(esc("MAX(h) AS m"), "max(`h`) AS `m`");
        assert_eq!(esc("count(*) as c"), "count(*) AS `c`");
    }

    #[test]
    fn sentinels() {
        assert_eq!(SelectedField::parse("*"), SelectedField::Star);
        assert_eq!(SelectedField::parse("count(*)"), SelectedField::CountStar);
        assert_eq!(esc("count(*)"), "count(*)");
    }

    #[test]
    fn unknown_function_falls_back_to_alias_form() {
        // `median` is not a recognized aggregate, the left side is a plain identifier.
        assert_eq!(esc("median(h) as m"), "`median(h)` AS `m`");
    }

    #[test]
    fn malformed_is_plain_identifier() {
        assert_eq!(esc("a b c"), "`a b c`");
        assert_eq!(esc("we`ird"), "`we``ird`");
    }

    #[test]
    fn join_target_split() {
        assert_eq!(
            split_table_alias("company as c"),
            ("company".to_string(), "c".to_string())
        );
        assert_eq!(
            split_table_alias("company"),
            ("company".to_string(), "company".to_string())
        );
    }

    #[test]
    fn alias_extraction() {
        assert_eq!(SelectedField::parse("sum(h) as total").alias(), Some("total"));
        assert_eq!(SelectedField::parse("u.name as n").alias(), Some("n"));
        assert_eq!(SelectedField::parse("u.name").alias(), None);
    }
}

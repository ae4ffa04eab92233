//! Condition expression algebra for WHERE / HAVING / ON clauses.
//!
//! A [`ConditionExpr`] is an immutable tree of AND / OR / NOT nodes over
//! [`FieldCompare`] leaves. [`Cond`] is the fluent wrapper returned by the
//! field accessors, and [`compile`] renders a tree into SQL while binding
//! values into a [`Params`] map.
//!
//! Rendering is fully parenthesized: every node, leaves included, renders as
//! `( ... )`, so `and(A, B)` is always `( A AND B )` regardless of what `A`
//! and `B` contain.
//!
//! ```ignore
//! use sqlcmd::expr::compile;
//! use sqlcmd::{Fields, MysqlEscape, Params};
//!
//! let e = Fields;
//! let cond = e.field("user_company").eq("doge").or(e.field("user_company").eq("cate"));
//! let mut params = Params::new();
//! let sql = compile(cond.expr(), &mut params, &MysqlEscape);
//! // ( ( `user_company` = :__user_company__0 ) OR ( `user_company` = :__user_company__1 ) )
//! ```

use crate::escape::Escape;
use crate::field::FieldRef;
use crate::ident::{escape_sql_field, qualified};
use crate::param::Params;
use serde::Serialize;
use serde_json::Value;

/// Comparison operator of a [`FieldCompare`] leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl CompareOp {
    /// The SQL operator text.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::In => "IN",
        }
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Operand {
    /// A literal, bound as one parameter.
    Value(Value),
    /// Another column: rendered as an escaped identifier, nothing is bound.
    Field(FieldRef),
    /// The value list of an `IN` comparison, bound as one array parameter.
    List(Vec<Value>),
}

macro_rules! impl_operand_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_operand_from!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String, &str,
);

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Operand::Value(v.map_or(Value::Null, Into::into))
    }
}

impl From<FieldRef> for Operand {
    fn from(r: FieldRef) -> Self {
        Operand::Field(r)
    }
}

impl From<&FieldRef> for Operand {
    fn from(r: &FieldRef) -> Self {
        Operand::Field(r.clone())
    }
}

/// Leaf comparing a column to a literal, another column, or a list.
///
/// `op == In` always carries [`Operand::List`]; the constructors on
/// [`FieldRef`] uphold this.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCompare {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub field: String,
    pub op: CompareOp,
    pub value: Operand,
}

/// Condition tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionExpr {
    /// All children must hold.
    And { exprs: Vec<ConditionExpr> },
    /// At least one child must hold.
    Or { exprs: Vec<ConditionExpr> },
    /// Negation of a single child.
    Not { expr: Box<ConditionExpr> },
    /// Column comparison.
    #[serde(rename = "field_compare")]
    Compare(FieldCompare),
}

impl ConditionExpr {
    /// `(a) AND (b)`, inputs are not flattened.
    pub fn and(a: ConditionExpr, b: ConditionExpr) -> Self {
        Self::And { exprs: vec![a, b] }
    }

    /// `(a) OR (b)`, inputs are not flattened.
    pub fn or(a: ConditionExpr, b: ConditionExpr) -> Self {
        Self::Or { exprs: vec![a, b] }
    }

    /// `NOT (a)`.
    pub fn not(a: ConditionExpr) -> Self {
        Self::Not { expr: Box::new(a) }
    }

    /// Render this tree; see [`compile`].
    pub fn to_sql<E: Escape + ?Sized>(&self, params: &mut Params, esc: &E) -> String {
        compile(self, params, esc)
    }
}

/// Fluent condition builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Cond(ConditionExpr);

impl Cond {
    pub fn new(expr: ConditionExpr) -> Self {
        Self(expr)
    }

    pub fn and(self, other: Cond) -> Cond {
        Cond(ConditionExpr::and(self.0, other.0))
    }

    pub fn or(self, other: Cond) -> Cond {
        Cond(ConditionExpr::or(self.0, other.0))
    }

    pub fn not(self) -> Cond {
        Cond(ConditionExpr::not(self.0))
    }

    /// Borrow the built tree.
    pub fn expr(&self) -> &ConditionExpr {
        &self.0
    }

    /// Finish building.
    pub fn build(self) -> ConditionExpr {
        self.0
    }

    /// Serialize the tree as JSON (`{"type":"and","exprs":[...]}`).
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

impl From<ConditionExpr> for Cond {
    fn from(expr: ConditionExpr) -> Self {
        Cond(expr)
    }
}

/// Anything a condition provider may produce.
///
/// `None` means "no condition": the command keeps whatever condition it had.
pub trait IntoCondition {
    fn into_condition(self) -> Option<ConditionExpr>;
}

impl IntoCondition for Cond {
    fn into_condition(self) -> Option<ConditionExpr> {
        Some(self.0)
    }
}

impl IntoCondition for ConditionExpr {
    fn into_condition(self) -> Option<ConditionExpr> {
        Some(self)
    }
}

impl IntoCondition for Option<Cond> {
    fn into_condition(self) -> Option<ConditionExpr> {
        self.map(Cond::build)
    }
}

impl IntoCondition for Option<ConditionExpr> {
    fn into_condition(self) -> Option<ConditionExpr> {
        self
    }
}

/// Render `expr` to SQL, binding values into `params`.
pub fn compile<E: Escape + ?Sized>(expr: &ConditionExpr, params: &mut Params, esc: &E) -> String {
    match expr {
        ConditionExpr::And { exprs } => join_group(exprs, " AND ", "1 = 1", params, esc),
        ConditionExpr::Or { exprs } => join_group(exprs, " OR ", "1 = 0", params, esc),
        ConditionExpr::Not { expr } => format!("( NOT {} )", compile(expr, params, esc)),
        ConditionExpr::Compare(cmp) => format!("( {} )", compile_compare(cmp, params, esc)),
    }
}

fn join_group<E: Escape + ?Sized>(
    exprs: &[ConditionExpr],
    sep: &str,
    empty: &str,
    params: &mut Params,
    esc: &E,
) -> String {
    if exprs.is_empty() {
        return format!("( {empty} )");
    }
    let parts: Vec<String> = exprs.iter().map(|e| compile(e, params, esc)).collect();
    format!("( {} )", parts.join(sep))
}

fn compile_compare<E: Escape + ?Sized>(cmp: &FieldCompare, params: &mut Params, esc: &E) -> String {
    let column = escape_sql_field(&qualified(cmp.table.as_deref(), &cmp.field), esc);
    match (&cmp.op, &cmp.value) {
        (CompareOp::Eq, Operand::Value(Value::Null)) => format!("{column} IS NULL"),
        (CompareOp::Ne, Operand::Value(Value::Null)) => format!("{column} IS NOT NULL"),
        (op, Operand::Field(other)) => {
            let rhs = escape_sql_field(&qualified(other.table.as_deref(), &other.field), esc);
            match op {
                CompareOp::In => format!("{column} IN ({rhs})"),
                _ => format!("{column} {} {rhs}", op.as_sql()),
            }
        }
        (CompareOp::In, value) => {
            let token = params.bind(&cmp.field, operand_value(value));
            format!("{column} IN ({token})")
        }
        (op, value) => {
            let token = params.bind(&cmp.field, operand_value(value));
            format!("{column} {} {token}", op.as_sql())
        }
    }
}

fn operand_value(value: &Operand) -> Value {
    match value {
        Operand::Value(v) => v.clone(),
        Operand::List(items) => Value::Array(items.clone()),
        Operand::Field(_) => Value::Null,
    }
}

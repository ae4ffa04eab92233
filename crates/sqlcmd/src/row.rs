//! Result containers and row mapping traits

use crate::error::{CmdError, CmdResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A column → value mapping for INSERT / UPDATE payloads.
pub type Record = Map<String, Value>;

/// One result row, columns in server order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    values: Map<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Get a column value by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Decode a column value into `T`.
    pub fn try_get<T: DeserializeOwned>(&self, column: &str) -> CmdResult<T> {
        let value = self
            .values
            .get(column)
            .ok_or_else(|| CmdError::decode(column, "column not found"))?;
        serde_json::from_value(value.clone()).map_err(|e| CmdError::decode(column, e.to_string()))
    }

    /// Set a column value, returning the row for chaining.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }
}

impl From<Map<String, Value>> for Row {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

/// Server report for INSERT / UPDATE / DELETE statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModifyResult {
    pub field_count: u64,
    pub affected_rows: u64,
    pub insert_id: u64,
    pub server_status: u64,
    pub warning_count: u64,
    pub message: String,
    pub changed_rows: u64,
}

/// What a connection returns for one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Rows(Vec<Row>),
    Modified(ModifyResult),
}

impl QueryResult {
    /// Row list, or an error for a modification report.
    pub fn into_rows(self) -> CmdResult<Vec<Row>> {
        match self {
            Self::Rows(rows) => Ok(rows),
            Self::Modified(_) => Err(CmdError::UnexpectedResult(
                "expected rows, got a modification report".to_string(),
            )),
        }
    }

    /// Modification report, or an error for a row list.
    pub fn into_modified(self) -> CmdResult<ModifyResult> {
        match self {
            Self::Modified(res) => Ok(res),
            Self::Rows(_) => Err(CmdError::UnexpectedResult(
                "expected a modification report, got rows".to_string(),
            )),
        }
    }
}

/// Result of a SELECT command.
///
/// A `count(*)` projection yields the bare number instead of a row list.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Rows(Vec<Row>),
    Count(i64),
}

impl QueryOutput {
    pub fn rows(self) -> Option<Vec<Row>> {
        match self {
            Self::Rows(rows) => Some(rows),
            Self::Count(_) => None,
        }
    }

    pub fn count(&self) -> Option<i64> {
        match self {
            Self::Count(n) => Some(*n),
            Self::Rows(_) => None,
        }
    }

    /// First row, or the count unchanged. `None` for an empty row list.
    pub fn take_first(self) -> Option<QueryFirst> {
        match self {
            Self::Rows(rows) => rows.into_iter().next().map(QueryFirst::Row),
            Self::Count(n) => Some(QueryFirst::Count(n)),
        }
    }
}

/// Result of `exec_take_first`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFirst {
    Row(Row),
    Count(i64),
}

impl QueryFirst {
    pub fn row(self) -> Option<Row> {
        match self {
            Self::Row(row) => Some(row),
            Self::Count(_) => None,
        }
    }

    pub fn count(&self) -> Option<i64> {
        match self {
            Self::Count(n) => Some(*n),
            Self::Row(_) => None,
        }
    }
}

/// Trait for types that can be created from a result row.
///
/// Implemented for every `DeserializeOwned` type: columns map to fields by
/// name.
pub trait FromRow: Sized {
    /// Create an instance from a result row.
    fn from_row(row: &Row) -> CmdResult<Self>;
}

impl<T: DeserializeOwned> FromRow for T {
    fn from_row(row: &Row) -> CmdResult<Self> {
        serde_json::from_value(Value::Object(row.values.clone()))
            .map_err(|e| CmdError::decode("<row>", e.to_string()))
    }
}

/// Types usable as an INSERT / UPDATE payload.
///
/// Anything that serializes to a JSON object qualifies. Every serialized key
/// becomes a column, so an `Option` field set to `None` writes `NULL`. Mark
/// such fields `#[serde(skip_serializing_if = "Option::is_none")]` to leave
/// the column untouched instead.
pub trait IntoRecord {
    fn into_record(self) -> CmdResult<Record>;
}

impl<T: Serialize> IntoRecord for T {
    fn into_record(self) -> CmdResult<Record> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Record::new()),
            other => Err(CmdError::Serialization(format!(
                "record must serialize to an object, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        user_id: String,
        user_height: i32,
    }

    #[test]
    fn row_maps_to_struct() {
        let row = Row::new().with("user_id", "Enoch").with("user_height", 180);
        let user = User::from_row(&row).unwrap();
        assert_eq!(
            user,
            User {
                user_id: "Enoch".into(),
                user_height: 180
            }
        );
    }

    #[test]
    fn try_get_reports_column() {
        let row = Row::new().with("user_height", "tall");
        let err = row.try_get::<i32>("user_height").unwrap_err();
        assert!(matches!(err, CmdError::Decode { ref column, .. } if column == "user_height"));
        let err = row.try_get::<i32>("missing").unwrap_err();
        assert!(err.to_string().contains("column not found"));
    }

    #[test]
    fn take_first_on_empty_is_none() {
        assert_eq!(QueryOutput::Rows(vec![]).take_first(), None);
        assert_eq!(
            QueryOutput::Count(3).take_first(),
            Some(QueryFirst::Count(3))
        );
    }

    #[test]
    fn modify_result_camel_case() {
        let res: ModifyResult =
            serde_json::from_value(json!({"affectedRows": 1, "insertId": 7})).unwrap();
        assert_eq!(res.affected_rows, 1);
        assert_eq!(res.insert_id, 7);
        assert_eq!(res.changed_rows, 0);
    }

    #[test]
    fn record_from_json_and_struct() {
        #[derive(Serialize)]
        struct NewUser<'a> {
            user_id: &'a str,
        }
        let rec = NewUser { user_id: "Enoch" }.into_record().unwrap();
        assert_eq!(rec.get("user_id"), Some(&json!("Enoch")));
        assert!(json!(42).into_record().is_err());
        assert!(json!({}).into_record().unwrap().is_empty());
    }

    #[test]
    fn none_fields_are_null_unless_skipped() {
        #[derive(Serialize)]
        struct Patch {
            user_height: Option<i32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            user_company: Option<String>,
        }
        let rec = Patch {
            user_height: None,
            user_company: None,
        }
        .into_record()
        .unwrap();
        assert_eq!(rec.get("user_height"), Some(&Value::Null));
        assert!(!rec.contains_key("user_company"));
    }
}

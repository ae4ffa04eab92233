//! Named parameter binding.
//!
//! Placeholders are named `__<field>__<n>`, where `n` counts the names already
//! bound in the same map that start with `__<field>`. The count only grows, so
//! a field referenced twice in one statement (WHERE and HAVING, or a range
//! pair) still gets two distinct names.

use serde_json::{Map, Value};

const NAME_PREFIX: &str = "__";
const NAME_SUFFIX: &str = "__";

/// Parameter map for one rendered statement, in bind order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params {
    values: Map<String, Value>,
}

impl Params {
    /// Create a new empty parameter map.
    pub fn new() -> Self {
        Self { values: Map::new() }
    }

    /// Bind `value` under a fresh name derived from `field` and return the
    /// placeholder token (`:__field__n`) to splice into SQL.
    pub fn bind(&mut self, field: &str, value: Value) -> String {
        let name = self.next_name(field);
        let token = format!(":{name}");
        self.values.insert(name, value);
        token
    }

    fn next_name(&self, field: &str) -> String {
        let prefix = format!("{NAME_PREFIX}{field}");
        let used = self.values.keys().filter(|k| k.starts_with(&prefix)).count();
        format!("{prefix}{NAME_SUFFIX}{used}")
    }

    /// Look up a bound value by placeholder name (without the leading `:`).
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs in bind order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Consume into the underlying map.
    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_bind_is_zero() {
        let mut params = Params::new();
        assert_eq!(params.bind("user_id", json!(1)), ":__user_id__0");
        assert_eq!(params.get("__user_id__0"), Some(&json!(1)));
    }

    #[test]
    fn repeated_field_gets_new_index() {
        let mut params = Params::new();
        let a = params.bind("age", json!(18));
        let b = params.bind("age", json!(65));
        assert_eq!(a, ":__age__0");
        assert_eq!(b, ":__age__1");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn prefix_sharing_fields_stay_unique() {
        let mut params = Params::new();
        params.bind("user_name", json!("a"));
        // `__user` also matches `__user_name__0`, so the index jumps but stays unique.
        let token = params.bind("user", json!("b"));
        assert_eq!(token, ":__user__1");
        let again = params.bind("user", json!("c"));
        assert_eq!(again, ":__user__2");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn bind_order_is_kept() {
        let mut params = Params::new();
        params.bind("b", json!(1));
        params.bind("a", json!(2));
        let names: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["__b__0", "__a__0"]);
    }
}

use baijiayun_core::{Error, Result};
use serde_json::Value;

/// An insertion-ordered request parameter set.
///
/// Field values are scalars ([`serde_json::Value`] strings and numbers);
/// collections cannot be signed and are rejected at canonicalization time.
/// Inserting under an existing key replaces the value in place, keeping the
/// original position.
///
/// ```
/// use baijiayun_openapi::Params;
///
/// let mut params = Params::new();
/// params.insert("partner_id", "7201963");
/// params.insert("room_id", 17110288405286_i64);
/// params.insert_opt("session_id", None::<i64>);
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, Value)>,
}

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any existing value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Insert a field only when the value is present.
    ///
    /// Absent optional fields never enter the set, so they neither sign nor
    /// transmit.
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<impl Into<Value>>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style [`insert_opt`](Self::insert_opt).
    pub fn with_opt(mut self, key: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        self.insert_opt(key, value);
        self
    }

    /// Get a field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Get a field as `&str`, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Get a field as `i64`, accepting both numbers and decimal strings.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Check whether a field is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render the fields that participate in the signature as `key=value`
    /// terms, in insertion order.
    ///
    /// `Null` values, booleans and empty strings are excluded; a non-scalar
    /// value is an encoding error.
    pub fn canonical_pairs(&self) -> Result<Vec<String>> {
        let mut terms = Vec::with_capacity(self.entries.len());
        for (key, value) in self.iter() {
            let Some(text) = canonical_text(key, value)? else {
                continue;
            };
            if text.is_empty() {
                continue;
            }
            terms.push(format!("{key}={text}"));
        }
        Ok(terms)
    }

    /// Render every non-null scalar field for the form-encoded request body.
    ///
    /// Unlike [`canonical_pairs`](Self::canonical_pairs), empty strings are
    /// included: they are transmitted, just not signed.
    pub fn form_pairs(&self) -> Result<Vec<(String, String)>> {
        let mut pairs = Vec::with_capacity(self.entries.len());
        for (key, value) in self.iter() {
            let Some(text) = canonical_text(key, value)? else {
                continue;
            };
            pairs.push((key.to_string(), text));
        }
        Ok(pairs)
    }
}

/// Canonical text form of a scalar field value.
///
/// - strings render as-is
/// - numbers render as decimal ASCII, no separators
/// - `Null` and booleans do not participate
/// - arrays and objects cannot be canonicalized
fn canonical_text(key: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null | Value::Bool(_) => Ok(None),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(Error::encoding(
            "request field value is not a scalar",
        )
        .with_context(format!("field: {key}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baijiayun_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_insert_preserves_order_and_replaces_in_place() {
        let mut params = Params::new();
        params.insert("b", 2);
        params.insert("a", 1);
        params.insert("b", 20);

        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(params.get_i64("b"), Some(20));
    }

    #[test]
    fn test_insert_opt_skips_none() {
        let mut params = Params::new();
        params.insert_opt("present", Some("x"));
        params.insert_opt("absent", None::<&str>);

        assert!(params.contains_key("present"));
        assert!(!params.contains_key("absent"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_canonical_pairs_excludes_null_bool_and_empty() {
        let params = Params::new()
            .with("title", "Algebra 101")
            .with("max_users", 0)
            .with("note", "")
            .with("flag", true)
            .with("missing", Value::Null);

        assert_eq!(
            params.canonical_pairs().unwrap(),
            vec!["title=Algebra 101".to_string(), "max_users=0".to_string()]
        );
    }

    #[test]
    fn test_form_pairs_keeps_empty_strings() {
        let params = Params::new().with("note", "").with("page", 1);

        assert_eq!(
            params.form_pairs().unwrap(),
            vec![
                ("note".to_string(), String::new()),
                ("page".to_string(), "1".to_string())
            ]
        );
    }

    #[test]
    fn test_non_scalar_value_is_encoding_error() {
        let params = Params::new().with("ids", json!([1, 2, 3]));

        let err = params.canonical_pairs().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn test_get_i64_accepts_strings() {
        let params = Params::new()
            .with("a", 5)
            .with("b", "17")
            .with("c", "not a number");

        assert_eq!(params.get_i64("a"), Some(5));
        assert_eq!(params.get_i64("b"), Some(17));
        assert_eq!(params.get_i64("c"), None);
    }

    #[test]
    fn test_remove() {
        let mut params = Params::new().with("sign", "abc").with("foo", "bar");

        assert_eq!(params.remove("sign"), Some(json!("abc")));
        assert!(!params.contains_key("sign"));
        assert_eq!(params.remove("sign"), None);
    }
}

use std::collections::HashMap;
use std::fmt::Write;

/// Dynamic value resolved from the render context or produced by a filter.
///
/// Context data of any shape reaches the renderer as a `Value` tree via the
/// serde bridge in [`crate::serializer`]. Filters receive and return `Value`s,
/// so a chain may freely move between strings, numbers, lists and maps before
/// the final result is coerced to text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Str(String),
    I64(i64),
    F64(f64),
    /// Ordered list of values (e.g. arrays, tuples)
    List(Vec<Value>),
    /// Key-value map (e.g. structs, JSON objects)
    Map(HashMap<String, Value>),
}

impl Value {
    /// Truthiness used by `{% if %}`: null, false, empty string and zero are
    /// false; lists and maps are always true, even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null | Value::Bool(false) => false,
            Value::Str(s) => !s.is_empty(),
            Value::I64(n) => *n != 0,
            Value::F64(n) => *n != 0.0,
            _ => true,
        }
    }

    /// Index into a map value. Returns `None` for non-maps and missing keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(m) => m.get(key),
            _ => None,
        }
    }

    /// Append the textual form of this value to the output buffer.
    ///
    /// `Null` and maps contribute nothing; numbers use standard decimal
    /// display (`3.5` stays `3.5`, `3.0` renders as `3`); lists render their
    /// items joined with `,`.
    pub(crate) fn write_text(&self, out: &mut String) {
        match self {
            Value::Null | Value::Map(_) => {}
            Value::Bool(b) => {
                let _ = write!(out, "{}", b);
            }
            Value::Str(s) => out.push_str(s),
            Value::I64(n) => {
                let _ = write!(out, "{}", n);
            }
            Value::F64(n) => {
                let _ = write!(out, "{}", n);
            }
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_text(out);
                }
            }
        }
    }

    /// Textual form of this value, as it would appear in rendered output.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text_scalars() {
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::Bool(true).to_text(), "true");
        assert_eq!(Value::Str("hi".to_string()).to_text(), "hi");
        assert_eq!(Value::I64(42).to_text(), "42");
        assert_eq!(Value::F64(3.5).to_text(), "3.5");
        assert_eq!(Value::F64(3.0).to_text(), "3");
    }

    #[test]
    fn test_to_text_list_joins_with_comma() {
        let v = Value::from(vec!["a", "b", "c"]);
        assert_eq!(v.to_text(), "a,b,c");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(!Value::I64(0).is_truthy());
        assert!(Value::Str("x".to_string()).is_truthy());
        assert!(Value::List(vec![]).is_truthy());
    }
}

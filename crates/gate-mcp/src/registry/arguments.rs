//! Bound tool arguments

use serde_json::{Map, Value, json};

use crate::{Error, Result};

/// Arguments of one invocation.
///
/// Keeps the caller's positional and keyword values as given (for the audit
/// record) alongside the values bound to parameter names (for the handler).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments {
    positional: Vec<Value>,
    keyword: Map<String, Value>,
    bound: Map<String, Value>,
}

impl ToolArguments {
    pub(crate) fn new(positional: Vec<Value>, keyword: Map<String, Value>, bound: Map<String, Value>) -> Self {
        Self {
            positional,
            keyword,
            bound,
        }
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keyword(&self) -> &Map<String, Value> {
        &self.keyword
    }

    /// Bound value of a parameter, if supplied
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bound.get(name)
    }

    pub fn i64(&self, name: &str) -> Result<i64> {
        self.require(name)?
            .as_i64()
            .ok_or_else(|| Error::invalid_arguments(format!("argument '{name}' is not an integer")))
    }

    pub fn f64(&self, name: &str) -> Result<f64> {
        self.require(name)?
            .as_f64()
            .ok_or_else(|| Error::invalid_arguments(format!("argument '{name}' is not a number")))
    }

    pub fn str(&self, name: &str) -> Result<&str> {
        self.require(name)?
            .as_str()
            .ok_or_else(|| Error::invalid_arguments(format!("argument '{name}' is not a string")))
    }

    /// `{"args": [...], "kwargs": {...}}` as written to the session
    pub fn audit_record(&self) -> Value {
        json!({
            "args": self.positional,
            "kwargs": self.keyword,
        })
    }

    fn require(&self, name: &str) -> Result<&Value> {
        self.get(name)
            .ok_or_else(|| Error::invalid_arguments(format!("missing argument '{name}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ToolArguments {
        let mut keyword = Map::new();
        keyword.insert("b".into(), json!(3));
        let mut bound = keyword.clone();
        bound.insert("a".into(), json!(2));
        ToolArguments::new(vec![json!(2)], keyword, bound)
    }

    #[test]
    fn audit_record_keeps_call_shape() {
        assert_eq!(
            args().audit_record(),
            json!({"args": [2], "kwargs": {"b": 3}})
        );
    }

    #[test]
    fn typed_accessors() {
        let args = args();
        assert_eq!(args.i64("a").unwrap(), 2);
        assert_eq!(args.f64("b").unwrap(), 3.0);
        assert!(args.str("a").is_err());
        assert!(matches!(
            args.i64("missing"),
            Err(Error::InvalidArguments { .. })
        ));
    }
}

//! Tool descriptor types

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::arguments::ToolArguments;
use crate::audit::InvocationContext;
use crate::{Error, Result};

/// Something that can run a tool invocation.
///
/// Handlers receive arguments already bound to their declared parameters.
/// The [`InvocationContext`] carries the active session, if any; plain tool
/// handlers ignore it and leave auditing to the registry's wrapper.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, ctx: &InvocationContext, args: &ToolArguments) -> Result<Value>;
}

/// Adapter for synchronous closures
struct FnHandler<F>(F);

#[async_trait]
impl<F> ToolHandler for FnHandler<F>
where
    F: Fn(&ToolArguments) -> Result<Value> + Send + Sync,
{
    async fn call(&self, _ctx: &InvocationContext, args: &ToolArguments) -> Result<Value> {
        (self.0)(args)
    }
}

/// Wrap a synchronous closure as a [`ToolHandler`]
pub fn sync_handler<F>(f: F) -> Arc<dyn ToolHandler>
where
    F: Fn(&ToolArguments) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(FnHandler(f))
}

/// JSON type a parameter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Whole numbers only; `2.0` is accepted, `2.5` is not
    Integer,
    Number,
    String,
    Boolean,
    Array,
    Object,
}

impl ParamKind {
    /// JSON Schema `type` keyword
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Check `value` against this kind, normalising integral floats to integers
    pub(crate) fn coerce(self, value: Value) -> Option<Value> {
        match (self, value) {
            (Self::Integer, Value::Number(n)) => {
                if n.is_i64() {
                    Some(Value::Number(n))
                } else if n.is_u64() {
                    // Above i64::MAX
                    None
                } else {
                    let f = n.as_f64()?;
                    // i64::MAX as f64 rounds up to 2^63, which is out of range
                    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                        Some(json!(f as i64))
                    } else {
                        None
                    }
                }
            }
            (Self::Number, v @ Value::Number(_))
            | (Self::String, v @ Value::String(_))
            | (Self::Boolean, v @ Value::Bool(_))
            | (Self::Array, v @ Value::Array(_))
            | (Self::Object, v @ Value::Object(_)) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared parameter of a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub description: String,
    pub required: bool,
}

impl ParamSpec {
    pub fn required(name: impl Into<String>, kind: ParamKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, kind: ParamKind, description: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }
}

/// A registered tool: name, human description, declared parameters and handler
#[derive(Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub params: Vec<ParamSpec>,
    pub handler: Arc<dyn ToolHandler>,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
            handler,
        }
    }

    /// Append a parameter. Declaration order is the positional binding order.
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// Bind a raw argument value to the declared parameters.
    ///
    /// An object binds by name, an array binds positionally, and `null`
    /// means no arguments.
    pub fn bind(&self, raw: Value) -> Result<ToolArguments> {
        match raw {
            Value::Null => self.bind_parts(Vec::new(), Map::new()),
            Value::Object(keyword) => self.bind_parts(Vec::new(), keyword),
            Value::Array(positional) => self.bind_parts(positional, Map::new()),
            other => Err(Error::invalid_arguments(format!(
                "arguments for '{}' must be an object or an array, got {}",
                self.name,
                json_type(&other)
            ))),
        }
    }

    /// Bind positional and keyword arguments together.
    ///
    /// Fails on surplus positionals, unknown names, a name given twice,
    /// missing required parameters and values of the wrong type. An explicit
    /// `null` for an optional parameter counts as absent.
    pub fn bind_parts(&self, positional: Vec<Value>, keyword: Map<String, Value>) -> Result<ToolArguments> {
        if positional.len() > self.params.len() {
            return Err(Error::invalid_arguments(format!(
                "'{}' takes {} positional argument(s) but {} were given",
                self.name,
                self.params.len(),
                positional.len()
            )));
        }

        let mut supplied: Map<String, Value> = Map::new();
        for (spec, value) in self.params.iter().zip(positional.iter()) {
            supplied.insert(spec.name.clone(), value.clone());
        }
        for (name, value) in &keyword {
            if !self.params.iter().any(|p| &p.name == name) {
                return Err(Error::invalid_arguments(format!(
                    "'{}' got an unexpected argument '{}'",
                    self.name, name
                )));
            }
            if supplied.contains_key(name) {
                return Err(Error::invalid_arguments(format!(
                    "'{}' got multiple values for argument '{}'",
                    self.name, name
                )));
            }
            supplied.insert(name.clone(), value.clone());
        }

        let mut bound = Map::new();
        for spec in &self.params {
            match supplied.remove(&spec.name) {
                Some(Value::Null) | None if !spec.required => {}
                None => {
                    return Err(Error::invalid_arguments(format!(
                        "'{}' is missing required argument '{}'",
                        self.name, spec.name
                    )));
                }
                Some(value) => {
                    let found = json_type(&value);
                    let value = spec.kind.coerce(value).ok_or_else(|| {
                        Error::invalid_arguments(format!(
                            "argument '{}' of '{}' must be {}, got {}",
                            spec.name, self.name, spec.kind, found
                        ))
                    })?;
                    bound.insert(spec.name.clone(), value);
                }
            }
        }

        Ok(ToolArguments::new(positional, keyword, bound))
    }

    /// JSON Schema for the declared parameters
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| {
                (
                    p.name.clone(),
                    json!({ "type": p.kind.as_str(), "description": p.description }),
                )
            })
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema(),
        }
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Discovery listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(n) if !n.is_i64() => "integer out of range",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn add() -> ToolDescriptor {
        ToolDescriptor::new(
            "add",
            "Add two integers",
            sync_handler(|args| Ok(json!(args.i64("a")? + args.i64("b")?))),
        )
        .param(ParamSpec::required("a", ParamKind::Integer, "first"))
        .param(ParamSpec::required("b", ParamKind::Integer, "second"))
    }

    #[test]
    fn binds_keywords() {
        let args = add().bind(json!({"a": 2, "b": 3})).unwrap();
        assert_eq!(args.i64("a").unwrap(), 2);
        assert_eq!(args.i64("b").unwrap(), 3);
        assert!(args.positional().is_empty());
    }

    #[test]
    fn binds_positionals_in_declaration_order() {
        let args = add().bind(json!([7, 1])).unwrap();
        assert_eq!(args.i64("a").unwrap(), 7);
        assert_eq!(args.i64("b").unwrap(), 1);
        assert_eq!(args.positional(), &[json!(7), json!(1)]);
    }

    #[test]
    fn binds_mixed_parts() {
        let mut kw = Map::new();
        kw.insert("b".into(), json!(4));
        let args = add().bind_parts(vec![json!(1)], kw).unwrap();
        assert_eq!(args.i64("a").unwrap(), 1);
        assert_eq!(args.i64("b").unwrap(), 4);
    }

    #[rstest]
    #[case::missing(json!({"a": 1}), "missing required argument 'b'")]
    #[case::unexpected(json!({"a": 1, "b": 2, "c": 3}), "unexpected argument 'c'")]
    #[case::mistyped(json!({"a": "1", "b": 2}), "must be integer, got string")]
    #[case::fractional(json!({"a": 1.5, "b": 2}), "must be integer, got number")]
    #[case::above_i64(json!({"a": u64::MAX, "b": 2}), "argument 'a' of 'add' must be integer")]
    #[case::float_two_pow_63(json!({"a": 9223372036854775808.0, "b": 0}), "argument 'a' of 'add' must be integer")]
    #[case::surplus(json!([1, 2, 3]), "takes 2 positional argument(s) but 3 were given")]
    #[case::scalar(json!(5), "must be an object or an array")]
    fn rejects_bad_arguments(#[case] raw: Value, #[case] expected: &str) {
        let err = add().bind(raw).unwrap_err();
        assert!(matches!(err, Error::InvalidArguments { .. }));
        assert!(err.to_string().contains(expected), "{err}");
    }

    #[test]
    fn rejects_duplicate_binding() {
        let mut kw = Map::new();
        kw.insert("a".into(), json!(4));
        let err = add().bind_parts(vec![json!(1)], kw).unwrap_err();
        assert!(err.to_string().contains("multiple values for argument 'a'"));
    }

    #[test]
    fn integral_float_becomes_integer() {
        let args = add().bind(json!({"a": 2.0, "b": 3})).unwrap();
        assert_eq!(args.get("a"), Some(&json!(2)));
    }

    #[test]
    fn null_optional_is_absent() {
        let tool = ToolDescriptor::new("opt", "", sync_handler(|_| Ok(Value::Null)))
            .param(ParamSpec::optional("limit", ParamKind::Integer, "max rows"));
        let args = tool.bind(json!({"limit": null})).unwrap();
        assert!(args.get("limit").is_none());
        assert!(tool.bind(Value::Null).unwrap().get("limit").is_none());
    }

    #[test]
    fn number_accepts_integers() {
        let tool = ToolDescriptor::new("n", "", sync_handler(|_| Ok(Value::Null)))
            .param(ParamSpec::required("x", ParamKind::Number, "any number"));
        assert_eq!(tool.bind(json!([3])).unwrap().f64("x").unwrap(), 3.0);
    }

    #[test]
    fn schema_lists_params() {
        let def = add().definition();
        assert_eq!(def.name, "add");
        assert_eq!(
            def.input_schema,
            json!({
                "type": "object",
                "properties": {
                    "a": {"type": "integer", "description": "first"},
                    "b": {"type": "integer", "description": "second"},
                },
                "required": ["a", "b"],
            })
        );
        let wire = serde_json::to_value(&def).unwrap();
        assert!(wire.get("inputSchema").is_some());
    }
}

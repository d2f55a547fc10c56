//! Attribute and operation values.

use std::fmt;

/// A value read from, or passed to, a managed object.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Long(i64),
    Int(i32),
    Text(String),
    Bool(bool),
    Float(f32),
    Double(f64),
    Composite(CompositeValue),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// View this value as something with named fields, if it is one.
    pub fn as_structured(&self) -> Option<&dyn Structured> {
        match self {
            Value::Composite(composite) => Some(composite),
            _ => None,
        }
    }

    /// Textual form, or `None` for `Null`.
    pub fn into_text(self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Text(text) => Some(text),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Long(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Text(v) => f.write_str(v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Composite(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<CompositeValue> for Value {
    fn from(v: CompositeValue) -> Self {
        Value::Composite(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// A value with named sub-fields that path resolution can descend into.
pub trait Structured {
    /// Look up one field by exact name.
    fn field(&self, name: &str) -> Option<&Value>;

    /// Field names in declaration order.
    fn field_names(&self) -> Vec<&str>;
}

/// A named record of fields, possibly nested.
///
/// ```
/// use collector_bridge::management::{CompositeValue, Structured, Value};
///
/// let usage = CompositeValue::new("MemoryUsage")
///     .with("used", 1024i64)
///     .with("max", 4096i64);
///
/// assert_eq!(usage.field("used"), Some(&Value::Long(1024)));
/// assert_eq!(usage.to_string(), "MemoryUsage{used=1024, max=4096}");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeValue {
    type_name: String,
    fields: Vec<(String, Value)>,
}

impl CompositeValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Add or replace a field.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl Structured for CompositeValue {
    fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl fmt::Display for CompositeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.type_name)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str("}")
    }
}

/// The primitive kinds an operation parameter may be declared with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Long,
    Int,
    Text,
    Bool,
    Float,
    Double,
}

impl ParamKind {
    /// Convert one textual argument into a value of this kind.
    ///
    /// Numbers use Rust's standard parsers with surrounding whitespace
    /// removed; no locale handling. Booleans are `true` when the token is
    /// `true` in any case and `false` otherwise.
    pub fn coerce(self, token: &str) -> Option<Value> {
        let trimmed = token.trim();
        match self {
            ParamKind::Long => trimmed.parse().ok().map(Value::Long),
            ParamKind::Int => trimmed.parse().ok().map(Value::Int),
            ParamKind::Text => Some(Value::Text(token.to_string())),
            ParamKind::Bool => Some(Value::Bool(trimmed.eq_ignore_ascii_case("true"))),
            ParamKind::Float => trimmed.parse().ok().map(Value::Float),
            ParamKind::Double => trimmed.parse().ok().map(Value::Double),
        }
    }

    /// Whether `value` is an instance of this kind.
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ParamKind::Long, Value::Long(_))
                | (ParamKind::Int, Value::Int(_))
                | (ParamKind::Text, Value::Text(_))
                | (ParamKind::Bool, Value::Bool(_))
                | (ParamKind::Float, Value::Float(_))
                | (ParamKind::Double, Value::Double(_))
        )
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Long => "long",
            ParamKind::Int => "int",
            ParamKind::Text => "string",
            ParamKind::Bool => "boolean",
            ParamKind::Float => "float",
            ParamKind::Double => "double",
        };
        f.write_str(name)
    }
}

//! Script value type
//!
//! `ScriptValue` is the loosely typed value a rule script sees. It mirrors the
//! handful of shapes the host boundary actually carries: absent values,
//! primitives, strings and flat lists.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

// Whole floats in [I64_MIN_F, I64_MAX_F) convert to i64 without saturating
const I64_MIN_F: f64 = i64::MIN as f64;
const I64_MAX_F: f64 = -(i64::MIN as f64);

/// Value type enumeration for type queries and assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// No value was produced
    Undefined,
    /// Explicit empty value
    Null,
    /// Boolean
    Bool,
    /// 64-bit integer
    Int,
    /// 64-bit float
    Float,
    /// String (Arc<str>)
    String,
    /// Ordered list
    List,
    /// Callable
    Function,
}

impl fmt::Display for ValueType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            ValueType::Undefined => "undefined",
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::List => "list",
            ValueType::Function => "function",
        };
        f.write_str(name)
    }
}

/// Script value - unified representation of everything crossing the host boundary
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ScriptValue {
    /// Result of a call that returned nothing
    #[default]
    Undefined,

    /// Explicit empty value
    Null,

    /// Boolean (stored directly)
    Bool(bool),

    /// Integer (stored directly)
    Int(i64),

    /// Float (stored directly)
    Float(f64),

    /// String (shared, Arc<str>)
    String(Arc<str>),

    /// List of values
    List(Vec<ScriptValue>),

    /// Script callback handed to the host
    Function(ScriptFunction),
}

type Callback = dyn Fn(&[ScriptValue]) -> ScriptValue;

/// A callable value. Equality is identity.
#[derive(Clone)]
pub struct ScriptFunction {
    name: Arc<str>,
    body: Rc<Callback>,
}

impl ScriptFunction {
    /// Wrap a closure. `name` is only used for display.
    pub fn new<F>(
        name: &str,
        body: F,
    ) -> Self
    where
        F: Fn(&[ScriptValue]) -> ScriptValue + 'static,
    {
        Self {
            name: Arc::from(name),
            body: Rc::new(body),
        }
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the callback
    pub fn call(
        &self,
        args: &[ScriptValue],
    ) -> ScriptValue {
        (self.body)(args)
    }
}

impl PartialEq for ScriptFunction {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for ScriptFunction {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ScriptFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ScriptValue {
    /// Get the value type
    pub fn value_type(&self) -> ValueType {
        match self {
            ScriptValue::Undefined => ValueType::Undefined,
            ScriptValue::Null => ValueType::Null,
            ScriptValue::Bool(_) => ValueType::Bool,
            ScriptValue::Int(_) => ValueType::Int,
            ScriptValue::Float(_) => ValueType::Float,
            ScriptValue::String(_) => ValueType::String,
            ScriptValue::List(_) => ValueType::List,
            ScriptValue::Function(_) => ValueType::Function,
        }
    }

    /// `undefined` or `null`
    pub fn is_nullish(&self) -> bool {
        matches!(self, ScriptValue::Undefined | ScriptValue::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, ScriptValue::Bool(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, ScriptValue::Int(_))
    }

    /// Tag check; an `Int` is not a float
    pub fn is_float(&self) -> bool {
        matches!(self, ScriptValue::Float(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, ScriptValue::String(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, ScriptValue::Function(_))
    }

    /// Borrow the string contents
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the callable
    pub fn as_function(&self) -> Option<&ScriptFunction> {
        match self {
            ScriptValue::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Convert to bool
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            ScriptValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert to i64
    pub fn to_int(&self) -> Option<i64> {
        match self {
            ScriptValue::Int(i) => Some(*i),
            ScriptValue::Float(f) if f.fract() == 0.0 && (I64_MIN_F..I64_MAX_F).contains(f) => {
                Some(*f as i64)
            }
            _ => None,
        }
    }

    /// Convert to f64
    pub fn to_float(&self) -> Option<f64> {
        match self {
            ScriptValue::Float(f) => Some(*f),
            ScriptValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl fmt::Display for ScriptValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ScriptValue::Undefined => write!(f, "undefined"),
            ScriptValue::Null => write!(f, "null"),
            ScriptValue::Bool(b) => write!(f, "{}", b),
            ScriptValue::Int(i) => write!(f, "{}", i),
            ScriptValue::Float(fl) => write!(f, "{}", fl),
            ScriptValue::String(s) => write!(f, "{}", s),
            ScriptValue::List(items) => {
                write!(
                    f,
                    "[{}]",
                    items
                        .iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            ScriptValue::Function(func) => write!(f, "[function {}]", func.name()),
        }
    }
}

impl From<()> for ScriptValue {
    fn from(_: ()) -> Self {
        ScriptValue::Undefined
    }
}

impl From<bool> for ScriptValue {
    fn from(b: bool) -> Self {
        ScriptValue::Bool(b)
    }
}

impl From<i64> for ScriptValue {
    fn from(i: i64) -> Self {
        ScriptValue::Int(i)
    }
}

impl From<f64> for ScriptValue {
    fn from(f: f64) -> Self {
        ScriptValue::Float(f)
    }
}

impl From<&str> for ScriptValue {
    fn from(s: &str) -> Self {
        ScriptValue::String(Arc::from(s))
    }
}

impl From<String> for ScriptValue {
    fn from(s: String) -> Self {
        ScriptValue::String(Arc::from(s))
    }
}

impl From<ScriptFunction> for ScriptValue {
    fn from(func: ScriptFunction) -> Self {
        ScriptValue::Function(func)
    }
}

impl<T: Into<ScriptValue>> From<Vec<T>> for ScriptValue {
    fn from(items: Vec<T>) -> Self {
        ScriptValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ScriptValue>> From<Option<T>> for ScriptValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ScriptValue::Null)
    }
}

//! Defines the [`Value`] enum, representing any valid renderable data.

mod cow;
mod from;
mod host;
#[cfg(feature = "serde")]
mod json;

use std::fmt;
use std::mem;

pub use std::collections::BTreeMap as Map;
pub use std::vec::Vec as List;

pub(crate) use crate::value::cow::ValueCow;
pub use crate::value::host::{Collection, Enumerate, ValueFn};
#[cfg(feature = "serde")]
pub use crate::value::json::to_value;

/// Data to be rendered represented as a recursive enum.
#[derive(Clone)]
pub enum Value {
    /// The null value.
    None,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(List<Value>),
    Map(Map<String, Value>),
    /// A computed value, called with no arguments when it is looked up.
    Fn(ValueFn),
    /// A host collection that enumerates its own members.
    Collection(Collection),
}

impl Value {
    /// Constructs a computed value from a closure.
    ///
    /// The closure is called every time the value is looked up while
    /// rendering. An error it returns aborts the render.
    ///
    /// # Examples
    ///
    /// ```
    /// use stash::{value, Engine, Value};
    ///
    /// let mut data = value! { first: "John", last: "Smith" };
    /// if let Value::Map(map) = &mut data {
    ///     map.insert("name".into(), Value::from_fn(|| Ok(Value::from("John Smith"))));
    /// }
    ///
    /// let engine = Engine::new();
    /// let result = engine.compile("{{name}}").render_from(&data).to_string()?;
    /// assert_eq!(result, "John Smith");
    /// # Ok::<(), stash::Error>(())
    /// ```
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> crate::Result<Value> + Send + Sync + 'static,
    {
        Self::Fn(ValueFn::new(f))
    }

    /// Constructs a collection from a closure returning a fresh iterator.
    ///
    /// The iterator is consumed until exhausted every time the collection is
    /// iterated by a `{{foreach}}` directive.
    pub fn from_iter_fn<F, I>(f: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = Value>,
        I::IntoIter: 'static,
    {
        Self::Collection(Collection::from_iter_fn(f))
    }

    /// Constructs a collection from a type that enumerates its own members.
    pub fn from_enumerate<E>(e: E) -> Self
    where
        E: Enumerate + 'static,
    {
        Self::Collection(Collection::from_enumerate(e))
    }

    /// Returns a human readable name for the kind of value.
    pub(crate) fn human(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Fn(_) => "function",
            Value::Collection(_) => "collection",
        }
    }

    /// Whether this value selects the true branch of a condition.
    ///
    /// Unlike most hosts, empty lists and maps are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Float(f) => *f != 0.0 && !f.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::List(list) => !list.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Fn(_) | Value::Collection(_) => true,
        }
    }

    /// Whether this is a list or map with no members.
    pub(crate) fn is_empty_container(&self) -> bool {
        match self {
            Value::List(list) => list.is_empty(),
            Value::Map(map) => map.is_empty(),
            _ => false,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::None
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(s), Self::Bool(o)) => s == o,
            (Self::Integer(s), Self::Integer(o)) => s == o,
            (Self::Float(s), Self::Float(o)) => s == o,
            (Self::String(s), Self::String(o)) => s == o,
            (Self::List(s), Self::List(o)) => s == o,
            (Self::Map(s), Self::Map(o)) => s == o,
            (Self::Fn(s), Self::Fn(o)) => s.ptr_eq(o),
            (Self::Collection(s), Self::Collection(o)) => s.ptr_eq(o),
            _ => mem::discriminant(self) == mem::discriminant(other),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
            Self::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::List(list) => f.debug_tuple("List").field(list).finish(),
            Self::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Self::Fn(func) => f.debug_tuple("Fn").field(func).finish(),
            Self::Collection(c) => f.debug_tuple("Collection").field(c).finish(),
        }
    }
}

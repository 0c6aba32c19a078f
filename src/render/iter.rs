use crate::value::{Collection, Map};
use crate::{Result, Value};

/// The members of a value being iterated by a `{{foreach}}` directive.
///
/// The kind of collection is decided once up front instead of on every
/// member.
#[derive(Debug)]
pub(crate) enum Members<'a> {
    /// Each element of the list.
    List(&'a [Value]),
    /// Each value of the map, in key order.
    Map(&'a Map<String, Value>),
    /// Whatever the host collection enumerates.
    Custom(&'a Collection),
    /// Any other value is iterated as a single member: itself.
    Scalar(&'a Value),
}

impl<'a> Members<'a> {
    pub fn new(value: &'a Value) -> Self {
        match value {
            Value::List(list) => Self::List(list),
            Value::Map(map) => Self::Map(map),
            Value::Collection(collection) => Self::Custom(collection),
            value => Self::Scalar(value),
        }
    }

    /// Calls `f` with every member in order, stopping at the first error.
    pub fn for_each<F>(self, mut f: F) -> Result<()>
    where
        F: FnMut(&Value) -> Result<()>,
    {
        match self {
            Self::List(list) => list.iter().try_for_each(f),
            Self::Map(map) => map.values().try_for_each(f),
            Self::Custom(collection) => collection.for_each(&mut |member| f(&member)),
            Self::Scalar(value) => f(value),
        }
    }
}

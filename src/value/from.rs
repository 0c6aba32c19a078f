//! Conversions from host types into [`Value`].

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::value::{Collection, Enumerate, ValueFn};
use crate::Value;

macro_rules! impl_from {
    ($($ty:ty => $convert:expr,)+) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    ($convert)(v)
                }
            }
        )+
    };
}

impl_from! {
    () => |()| Value::None,
    bool => Value::Bool,
    u8 => |i: u8| Value::Integer(i.into()),
    u16 => |i: u16| Value::Integer(i.into()),
    u32 => |i: u32| Value::Integer(i.into()),
    i8 => |i: i8| Value::Integer(i.into()),
    i16 => |i: i16| Value::Integer(i.into()),
    i32 => |i: i32| Value::Integer(i.into()),
    i64 => Value::Integer,
    f32 => |f: f32| Value::Float(f.into()),
    f64 => Value::Float,
    String => Value::String,
    ValueFn => Value::Fn,
    Collection => Value::Collection,
    Arc<dyn Enumerate> => |e: Arc<dyn Enumerate>| Value::Collection(Collection::from(e)),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(s: Cow<'_, str>) -> Self {
        Self::String(s.into_owned())
    }
}

/// `None` is the null value, `Some` converts its contents.
impl<V> From<Option<V>> for Value
where
    V: Into<Value>,
{
    fn from(opt: Option<V>) -> Self {
        opt.map_or(Self::None, Into::into)
    }
}

fn list<V>(items: impl IntoIterator<Item = V>) -> Value
where
    V: Into<Value>,
{
    Value::List(items.into_iter().map(Into::into).collect())
}

fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Value
where
    K: Into<String>,
    V: Into<Value>,
{
    Value::Map(
        entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect(),
    )
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(items: Vec<V>) -> Self {
        list(items)
    }
}

impl<V: Into<Value>, const N: usize> From<[V; N]> for Value {
    fn from(items: [V; N]) -> Self {
        list(items)
    }
}

impl<V: Into<Value>> FromIterator<V> for Value {
    fn from_iter<I: IntoIterator<Item = V>>(items: I) -> Self {
        list(items)
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(entries: BTreeMap<K, V>) -> Self {
        map(entries)
    }
}

impl<K: Into<String>, V: Into<Value>> From<HashMap<K, V>> for Value {
    fn from(entries: HashMap<K, V>) -> Self {
        map(entries)
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Value {
    fn from(entries: [(K, V); N]) -> Self {
        map(entries)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
        map(entries)
    }
}

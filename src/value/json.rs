//! Converts serializable host data into a [`Value`] by way of
//! [`serde_json::Value`].

use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};
use serde_json::Value as Json;

use crate::{Error, Result, Value};

/// Convert a `T` to a `Value`.
///
/// Integers that do not fit an `i64` become floats. Map keys must serialize
/// as strings or integers.
///
/// # Examples
///
/// ```
/// #[derive(serde::Serialize)]
/// struct User { name: &'static str }
///
/// let value = stash::to_value(User { name: "John" })?;
/// assert_eq!(value, stash::value! { name: "John" });
/// # Ok::<(), stash::Error>(())
/// ```
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub fn to_value<T>(value: T) -> Result<Value>
where
    T: Serialize,
{
    serde_json::to_value(value)
        .map(Value::from)
        .map_err(Error::custom)
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::None,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Float).unwrap_or_default(),
            },
            Json::String(s) => Value::String(s),
            Json::Array(list) => Value::List(list.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::None => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(list) => serializer.collect_seq(list),
            Value::Map(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k, v)?;
                }
                m.end()
            }
            // Host values are serialized as what they evaluate to.
            Value::Fn(f) => f
                .call()
                .map_err(S::Error::custom)?
                .serialize(serializer),
            Value::Collection(c) => c
                .to_list()
                .map_err(S::Error::custom)?
                .serialize(serializer),
        }
    }
}

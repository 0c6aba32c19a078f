/// Constructs a [`Value`][crate::Value] map from a literal.
///
/// Keys are identifiers. Values are `None`, nested `{ .. }` maps, `[ .. ]`
/// lists, or any expression that implements `Into<Value>`. Wrap an expression
/// in parentheses if it starts with a brace or bracket.
///
/// # Examples
///
/// ```
/// use stash::Value;
///
/// let data = stash::value! {
///     user: {
///         name: "John Smith",
///         age: 35,
///         tags: ["admin", None],
///     },
///     visits: (Value::from_fn(|| Ok(Value::from(3)))),
/// };
/// # let _ = data;
/// ```
#[macro_export]
macro_rules! value {
    ($($entries:tt)*) => {
        $crate::__value_map!(@entries [] $($entries)*)
    };
}

/// Munches `key: value` entries, collecting `(key, expr)` pairs until the
/// input is empty.
#[macro_export]
#[doc(hidden)]
macro_rules! __value_map {
    (@entries [$(($key:ident, $value:expr))*]) => {{
        #[allow(unused_mut)]
        let mut map = $crate::Map::new();
        $(map.insert(::std::string::String::from(::std::stringify!($key)), $value);)*
        $crate::Value::Map(map)
    }};

    (@entries [$($done:tt)*] $key:ident : None $(, $($rest:tt)*)?) => {
        $crate::__value_map!(@entries [$($done)* ($key, $crate::Value::None)] $($($rest)*)?)
    };

    (@entries [$($done:tt)*] $key:ident : { $($map:tt)* } $(, $($rest:tt)*)?) => {
        $crate::__value_map!(
            @entries [$($done)* ($key, $crate::__value_map!(@entries [] $($map)*))] $($($rest)*)?
        )
    };

    (@entries [$($done:tt)*] $key:ident : [ $($list:tt)* ] $(, $($rest:tt)*)?) => {
        $crate::__value_map!(
            @entries [$($done)* ($key, $crate::__value_list!(@items [] $($list)*))] $($($rest)*)?
        )
    };

    (@entries [$($done:tt)*] $key:ident : $value:expr $(, $($rest:tt)*)?) => {
        $crate::__value_map!(
            @entries [$($done)* ($key, $crate::Value::from($value))] $($($rest)*)?
        )
    };
}

/// Munches comma separated list items, collecting an expression for each.
#[macro_export]
#[doc(hidden)]
macro_rules! __value_list {
    (@items [$($done:expr),*]) => {
        $crate::Value::List(::std::vec![$($done),*])
    };

    (@items [$($done:expr),*] None $(, $($rest:tt)*)?) => {
        $crate::__value_list!(@items [$($done,)* $crate::Value::None] $($($rest)*)?)
    };

    (@items [$($done:expr),*] { $($map:tt)* } $(, $($rest:tt)*)?) => {
        $crate::__value_list!(
            @items [$($done,)* $crate::__value_map!(@entries [] $($map)*)] $($($rest)*)?
        )
    };

    (@items [$($done:expr),*] [ $($list:tt)* ] $(, $($rest:tt)*)?) => {
        $crate::__value_list!(
            @items [$($done,)* $crate::__value_list!(@items [] $($list)*)] $($($rest)*)?
        )
    };

    (@items [$($done:expr),*] $value:expr $(, $($rest:tt)*)?) => {
        $crate::__value_list!(@items [$($done,)* $crate::Value::from($value)] $($($rest)*)?)
    };
}

//! Values backed by host code: computed values and custom collections.

use std::fmt;
use std::sync::Arc;

use crate::{Result, Value};

type ComputeFn = dyn Fn() -> Result<Value> + Send + Sync;

type IterFn = dyn Fn() -> Box<dyn Iterator<Item = Value>> + Send + Sync;

/// A computed value, see [`Value::from_fn`].
#[derive(Clone)]
pub struct ValueFn(Arc<ComputeFn>);

impl ValueFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Result<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Computes the value.
    pub fn call(&self) -> Result<Value> {
        (self.0)()
    }

    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ValueFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<function>")
    }
}

/// A type that enumerates its own members.
///
/// Implement this for host collections that know how to walk themselves, for
/// example a lazily loaded result set.
///
/// # Examples
///
/// ```
/// use stash::{Enumerate, Engine, Result, Value};
///
/// struct Letters(&'static str);
///
/// impl Enumerate for Letters {
///     fn for_each(&self, f: &mut dyn FnMut(Value) -> Result<()>) -> Result<()> {
///         for c in self.0.chars() {
///             f(stash::value! { char: (c.to_string()) })?;
///         }
///         Ok(())
///     }
/// }
///
/// let data = stash::value! { letters: (Value::from_enumerate(Letters("OK"))) };
/// let result = Engine::new()
///     .compile("{{foreach letters}}{{char}}{{end}}")
///     .render_from(&data)
///     .to_string()?;
/// assert_eq!(result, "OK");
/// # Ok::<(), stash::Error>(())
/// ```
pub trait Enumerate: Send + Sync {
    /// Calls `f` with every member in order, stopping at the first error.
    fn for_each(&self, f: &mut dyn FnMut(Value) -> Result<()>) -> Result<()>;
}

/// A host collection, see [`Value::from_enumerate`] and
/// [`Value::from_iter_fn`].
#[derive(Clone)]
pub struct Collection(Inner);

#[derive(Clone)]
enum Inner {
    Enumerate(Arc<dyn Enumerate>),
    Iter(Arc<IterFn>),
}

impl Collection {
    pub fn from_enumerate<E>(e: E) -> Self
    where
        E: Enumerate + 'static,
    {
        Self(Inner::Enumerate(Arc::new(e)))
    }

    pub fn from_iter_fn<F, I>(f: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = Value>,
        I::IntoIter: 'static,
    {
        let f: Arc<IterFn> = Arc::new(move || -> Box<dyn Iterator<Item = Value>> {
            Box::new(f().into_iter())
        });
        Self(Inner::Iter(f))
    }

    /// Calls `f` with every member of the collection in order.
    pub fn for_each(&self, f: &mut dyn FnMut(Value) -> Result<()>) -> Result<()> {
        match &self.0 {
            Inner::Enumerate(e) => e.for_each(f),
            Inner::Iter(iter_fn) => {
                for member in iter_fn() {
                    f(member)?;
                }
                Ok(())
            }
        }
    }

    /// Collects every member of the collection.
    pub fn to_list(&self) -> Result<Vec<Value>> {
        let mut members = Vec::new();
        self.for_each(&mut |member| {
            members.push(member);
            Ok(())
        })?;
        Ok(members)
    }

    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Inner::Enumerate(s), Inner::Enumerate(o)) => Arc::ptr_eq(s, o),
            (Inner::Iter(s), Inner::Iter(o)) => Arc::ptr_eq(s, o),
            _ => false,
        }
    }
}

impl From<Arc<dyn Enumerate>> for Collection {
    fn from(e: Arc<dyn Enumerate>) -> Self {
        Self(Inner::Enumerate(e))
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Inner::Enumerate(_) => f.write_str("<enumerate>"),
            Inner::Iter(_) => f.write_str("<iterator>"),
        }
    }
}

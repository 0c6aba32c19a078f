use crate::value::ValueCow;
use crate::Value;

/// The position in the data that names are resolved against.
///
/// A context is the current value, its dotted path from the root and the
/// root itself. Rendering starts with a context at the root of the data.
/// Iterations and drilled paths derive new contexts, they never change a
/// shared one.
///
/// Construct one directly to render a template as if it appeared deeper in
/// the hierarchy, so that `../` names climb out of the given path.
///
/// # Examples
///
/// ```
/// use stash::{value, Context, Engine};
///
/// let data = value! { user: { name: "John Smith" }, greeting: "Hello" };
/// let user = match &data {
///     stash::Value::Map(map) => &map["user"],
///     _ => unreachable!(),
/// };
///
/// let result = Engine::new()
///     .compile("{{../greeting}} {{name}}")
///     .render_from(&data)
///     .with_context(Context::new(user, "user", &data))
///     .to_string()?;
/// assert_eq!(result, "Hello John Smith");
/// # Ok::<(), stash::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Context<'a> {
    pub(crate) current: ValueCow<'a>,
    pub(crate) path: String,
    pub(crate) root: &'a Value,
}

impl<'a> Context<'a> {
    /// Construct a new context for `current` found at `path` under `root`.
    ///
    /// The path is dot separated with the empty string denoting the root.
    pub fn new(current: &'a Value, path: impl Into<String>, root: &'a Value) -> Self {
        Self {
            current: ValueCow::Borrowed(current),
            path: path.into(),
            root,
        }
    }

    /// A context positioned at the root of the data.
    pub fn at_root(root: &'a Value) -> Self {
        Self::new(root, "", root)
    }

    pub(crate) fn with_current(current: ValueCow<'a>, path: String, root: &'a Value) -> Self {
        Self {
            current,
            path,
            root,
        }
    }

    /// The value names are resolved against.
    pub fn current(&self) -> &Value {
        &self.current
    }

    /// The dotted path from the root to the current value.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The root of the data.
    pub fn root_value(&self) -> &'a Value {
        self.root
    }
}

/// Appends a segment to a dotted path.
pub(crate) fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_owned()
    } else {
        format!("{}.{}", path, segment)
    }
}

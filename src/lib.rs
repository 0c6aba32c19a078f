//! A logic-lite template engine.
//!
//! # Features
//!
//! ### Syntax
//!
//! - Placeholders: `{{ user.name }}`, HTML escaped
//! - Raw placeholders: `{{{ user.bio }}}`, not escaped
//! - Conditionals: `{{if user.enabled}} ... {{else}} ... {{end}}`
//! - Iteration: `{{foreach users}} ... {{end foreach}}`
//! - Ancestors: `{{../../title}}` climbs out of the current value
//! - Recursion: `{{ snippet /r }}` renders the value itself as a template
//!
//! ### Engine
//!
//! - Global templates and data, available as a fallback from anywhere in the
//!   data
//! - Computed values and custom collections supplied by the host
//! - Render to a [`String`] or any [`std::io::Write`] implementor
//! - Render using any [`serde`] serializable values
//! - Malformed templates never fail, the offending text is left in the
//!   output and a warning is logged with the [`log`] crate
//!
//! # Getting started
//!
//! Your entry point is the [`Engine`] struct. The engine stores the global
//! templates and data and caches recursively rendered fragments. Generally,
//! you only need to construct one engine during the lifetime of a program.
//!
//! ```
//! let engine = stash::Engine::new();
//! ```
//!
//! Next, [`.compile`][Engine::compile] is used to compile a template. This
//! never fails.
//!
//! ```
//! # let engine = stash::Engine::new();
//! let template = engine.compile("Hello {{user.name}}!");
//! ```
//!
//! Finally, the template is rendered by calling
//! [`.render`][Template::render] and then `.to_string()`.
//!
//! ```
//! # let engine = stash::Engine::new();
//! # let template = engine.compile("Hello {{user.name}}!");
//! let result = template
//!     .render(stash::value! { user: { name: "John Smith" } })
//!     .to_string()?;
//! assert_eq!(result, "Hello John Smith!");
//! # Ok::<(), stash::Error>(())
//! ```
//!
//! # Examples
//!
//! ### Render using structured data
//!
//! ```
//! #[derive(serde::Serialize)]
//! struct Context { user: User }
//!
//! #[derive(serde::Serialize)]
//! struct User { name: String }
//!
//! let ctx = Context { user: User { name: "John Smith".into() } };
//!
//! let result = stash::Engine::new()
//!     .compile("Hello {{user.name}}")
//!     .render(&ctx)
//!     .to_string()?;
//!
//! assert_eq!(result, "Hello John Smith");
//! # Ok::<(), stash::Error>(())
//! ```
//!
//! ### Iterate and climb
//!
//! Inside a `{{foreach}}` names are resolved against each member. Each `../`
//! climbs one level out: the first to the collection, the second to the value
//! that holds it.
//!
//! ```
//! let data = stash::value! {
//!     sep: "/",
//!     parts: [{ name: "usr" }, { name: "bin" }],
//! };
//!
//! let result = stash::Engine::new()
//!     .compile("{{foreach parts}}{{../../sep}}{{name}}{{end foreach}}")
//!     .render(data)
//!     .to_string()?;
//!
//! assert_eq!(result, "/usr/bin");
//! # Ok::<(), stash::Error>(())
//! ```
//!
//! ### Global templates and data
//!
//! ```
//! let mut engine = stash::Engine::new();
//! engine.register_global_template("fullName", "{{first}} {{last}}");
//! engine.register_global_data("company", "ACME");
//!
//! let result = engine
//!     .compile("{{user.fullName}} works at {{company}}")
//!     .render(stash::value! { user: { first: "John", last: "Smith" } })
//!     .to_string()?;
//!
//! assert_eq!(result, "John Smith works at ACME");
//! # Ok::<(), stash::Error>(())
//! ```
//!
//! ### Render a template to an `impl io::Write`
//!
//! ```
//! use std::io;
//!
//! let stdout = io::BufWriter::new(io::stdout());
//!
//! stash::Engine::new()
//!     .compile("Hello {{user.name}}")
//!     .render(stash::value! { user: { name: "John Smith" } })
//!     .to_writer(stdout)?;
//! # Ok::<(), stash::Error>(())
//! ```

mod compile;
mod error;
mod fmt;
mod macros;
mod render;
#[cfg(feature = "serde")]
mod serial;
mod types;
mod value;

use std::collections::BTreeMap;

pub use crate::error::{Error, Result};
pub use crate::fmt::escape_html;
pub use crate::render::{Context, Renderer};
pub use crate::types::block::{Block, Condition, Iteration, Placeholder, Text};
pub use crate::types::span::Span;
#[cfg(feature = "serde")]
pub use crate::value::to_value;
pub use crate::value::{Collection, Enumerate, List, Map, Value, ValueFn};

use crate::render::FragmentCache;
use crate::types::block::Program;

/// The default maximum render depth, see [`Engine::set_max_depth`].
const DEFAULT_MAX_DEPTH: usize = 64;

/// Compile a template into its top level blocks.
///
/// This is the raw block tree. Use [`Engine::compile`] to get a template
/// that can be rendered.
///
/// # Examples
///
/// ```
/// use stash::Block;
///
/// let blocks = stash::compile("{{if ok}}yes{{end}}");
/// assert!(matches!(&blocks[..], [Block::Condition(_)]));
/// ```
pub fn compile(source: &str) -> Vec<Block> {
    compile::blocks(source)
}

/// The compilation and rendering engine.
///
/// The engine holds the global templates and data that names fall back to,
/// and a cache of the fragments compiled while rendering recursive
/// directives. Registering requires `&mut self` so nothing can be registered
/// while a template of this engine is being rendered.
pub struct Engine {
    templates: BTreeMap<String, Program>,
    data: Map<String, Value>,
    cache: FragmentCache,
    max_depth: usize,
}

/// A compiled template.
pub struct Template<'engine> {
    engine: &'engine Engine,
    program: Program,
}

impl Default for Engine {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Construct a new engine.
    #[inline]
    pub fn new() -> Self {
        Self {
            templates: BTreeMap::new(),
            data: Map::new(),
            cache: FragmentCache::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the default maximum render depth.
    ///
    /// Every nested condition or iteration body, recursive fragment and
    /// global template evaluation counts as one level. Rendering deeper fails
    /// with an error for which [`Error::is_max_depth`] is true.
    ///
    /// Defaults to 64.
    #[inline]
    pub fn set_max_depth(&mut self, depth: usize) {
        self.max_depth = depth;
    }

    /// Register a global template.
    ///
    /// The template is compiled immediately. Any property that is absent
    /// from the data evaluates to this template, rendered against the value
    /// the property was looked up on. A template registered earlier under the
    /// same name is replaced.
    pub fn register_global_template(&mut self, name: impl Into<String>, source: &str) {
        let name = name.into();
        log::debug!("registering global template `{}`", name);
        self.templates.insert(name, compile::template(source));
    }

    /// Register a global value.
    ///
    /// Names that cannot be resolved against the render data are resolved
    /// against the global values instead. A value registered earlier under
    /// the same name is replaced.
    pub fn register_global_data(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        log::debug!("registering global data `{}`", name);
        self.data.insert(name, value.into());
    }

    /// Register a global template saved with [`Template::to_json`].
    ///
    /// This behaves like [`.register_global_template`][Engine::register_global_template]
    /// without compiling the source again.
    #[cfg(feature = "serde")]
    pub fn register_global_json(&mut self, name: impl Into<String>, json: &str) -> Result<()> {
        let program = serial::from_json(json)?;
        let name = name.into();
        log::debug!("registering saved global template `{}`", name);
        self.templates.insert(name, program);
        Ok(())
    }

    /// Save all global templates as JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut engine = stash::Engine::new();
    /// engine.register_global_template("greeting", "Hello {{name}}!");
    /// let json = engine.global_templates_to_json()?;
    ///
    /// let mut restored = stash::Engine::new();
    /// restored.load_global_templates(&json)?;
    /// let result = restored
    ///     .compile("{{user.greeting}}")
    ///     .render(stash::value! { user: { name: "World" } })
    ///     .to_string()?;
    /// assert_eq!(result, "Hello World!");
    /// # Ok::<(), stash::Error>(())
    /// ```
    #[cfg(feature = "serde")]
    pub fn global_templates_to_json(&self) -> Result<String> {
        serial::globals_to_json(&self.templates)
    }

    /// Register every global template saved with
    /// [`.global_templates_to_json`][Engine::global_templates_to_json].
    ///
    /// Templates already registered under the same names are replaced, others
    /// are kept. Nothing is registered if the document fails to load.
    #[cfg(feature = "serde")]
    pub fn load_global_templates(&mut self, json: &str) -> Result<()> {
        let templates = serial::globals_from_json(json)?;
        log::debug!("loading {} saved global templates", templates.len());
        self.templates.extend(templates);
        Ok(())
    }

    /// Compile a template.
    ///
    /// Compiling never fails. Directives that are malformed or out of place
    /// are logged and kept in the output as literal text.
    #[inline]
    pub fn compile(&self, source: &str) -> Template<'_> {
        Template {
            engine: self,
            program: compile::template(source),
        }
    }

    /// Load a template saved with [`Template::to_json`].
    #[cfg(feature = "serde")]
    pub fn load_json(&self, json: &str) -> Result<Template<'_>> {
        Ok(Template {
            engine: self,
            program: serial::from_json(json)?,
        })
    }

    /// The number of fragments compiled while rendering recursive
    /// directives.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("templates", &self.templates.keys())
            .field("data", &self.data)
            .field("cache", &self.cache.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl<'engine> Template<'engine> {
    /// Render the template using the provided serializable data.
    ///
    /// Returns a [`Renderer`] to configure and run the render.
    #[cfg(feature = "serde")]
    #[inline]
    pub fn render<S>(&self, data: S) -> Renderer<'_>
    where
        S: ::serde::Serialize,
    {
        Renderer::with_serde(self.engine, &self.program, data)
    }

    /// Render the template using the provided value.
    ///
    /// Returns a [`Renderer`] to configure and run the render.
    #[inline]
    pub fn render_from<'render>(&'render self, data: &'render Value) -> Renderer<'render> {
        Renderer::with_value(self.engine, &self.program, data)
    }

    /// Returns the compiled blocks.
    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.program.blocks
    }

    /// Returns the original template source.
    #[inline]
    pub fn source(&self) -> &str {
        &self.program.source
    }

    /// Save the compiled template as JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// let engine = stash::Engine::new();
    /// let json = engine.compile("Hello {{name}}!").to_json()?;
    ///
    /// let template = engine.load_json(&json)?;
    /// let result = template.render(stash::value! { name: "World" }).to_string()?;
    /// assert_eq!(result, "Hello World!");
    /// # Ok::<(), stash::Error>(())
    /// ```
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        serial::to_json(&self.program)
    }
}

impl std::fmt::Debug for Template<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("source", &self.program.source)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
        assert_send_sync::<Template<'static>>();
    }
}

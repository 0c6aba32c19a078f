#![allow(clippy::wrong_self_convention)]

mod cache;
mod context;
mod core;
mod iter;
mod resolve;

use std::io;

use crate::fmt::{Formatter, Writer};
pub(crate) use crate::render::cache::FragmentCache;
pub use crate::render::context::Context;
use crate::render::core::RendererImpl;
use crate::types::block::Program;
use crate::value::ValueCow;
use crate::{Engine, Error, Result, Value};

/// A renderer that interprets a compiled [`Template`][crate::Template].
///
/// This struct is created by one of the following functions:
/// - [`Template::render`][crate::Template::render]
/// - [`Template::render_from`][crate::Template::render_from]
#[must_use = "must call `.to_string()` or `.to_writer(..)` on the renderer"]
pub struct Renderer<'render> {
    engine: &'render Engine,
    program: &'render Program,
    data: Data<'render>,
    context: Option<Context<'render>>,
    ignore_undefined: bool,
    max_depth: Option<usize>,
}

enum Data<'render> {
    Owned(Result<Value>),
    Borrowed(&'render Value),
}

impl<'render> Renderer<'render> {
    fn new(engine: &'render Engine, program: &'render Program, data: Data<'render>) -> Self {
        Self {
            engine,
            program,
            data,
            context: None,
            ignore_undefined: false,
            max_depth: None,
        }
    }

    #[cfg(feature = "serde")]
    pub(crate) fn with_serde<S>(engine: &'render Engine, program: &'render Program, data: S) -> Self
    where
        S: ::serde::Serialize,
    {
        Self::new(engine, program, Data::Owned(crate::to_value(data)))
    }

    pub(crate) fn with_value(
        engine: &'render Engine,
        program: &'render Program,
        data: &'render Value,
    ) -> Self {
        Self::new(engine, program, Data::Borrowed(data))
    }

    /// Leave placeholders that resolve to nothing in the output as they were
    /// written, instead of removing them.
    ///
    /// This allows rendering a template in stages, each stage filling in the
    /// names it knows about.
    ///
    /// # Examples
    ///
    /// ```
    /// let engine = stash::Engine::new();
    /// let result = engine
    ///     .compile("{{greeting}}, {{{name}}}!")
    ///     .render_from(&stash::value! { greeting: "Hello" })
    ///     .ignore_undefined(true)
    ///     .to_string()?;
    /// assert_eq!(result, "Hello, {{{name}}}!");
    /// # Ok::<(), stash::Error>(())
    /// ```
    pub fn ignore_undefined(mut self, yes: bool) -> Self {
        self.ignore_undefined = yes;
        self
    }

    /// Start rendering from the given context instead of the root of the
    /// data.
    ///
    /// See [`Context`] for an example.
    pub fn with_context(mut self, ctx: Context<'render>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Set the maximum render depth.
    ///
    /// This is the maximum number of nested condition and iteration bodies,
    /// recursive fragments and global templates evaluated while rendering.
    ///
    /// Defaults to the engine setting.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Render the template to a string.
    pub fn to_string(self) -> Result<String> {
        let mut s = String::with_capacity(self.program.source.len());
        let mut f = Formatter::with_string(&mut s);
        self.render(&mut f)?;
        Ok(s)
    }

    /// Render the template to the given writer.
    pub fn to_writer<W>(self, w: W) -> Result<()>
    where
        W: io::Write,
    {
        let mut w = Writer::new(w);
        let mut f = Formatter::with_writer(&mut w);
        self.render(&mut f)
            .map_err(|err| w.take_err().map(Error::from).unwrap_or(err))
    }

    fn render(self, f: &mut Formatter<'_>) -> Result<()> {
        let renderer = RendererImpl {
            engine: self.engine,
            max_depth: self.max_depth.unwrap_or(self.engine.max_depth),
        };
        let data = match self.data {
            Data::Owned(result) => ValueCow::Owned(result?),
            Data::Borrowed(value) => ValueCow::Borrowed(value),
        };
        match &self.context {
            Some(ctx) => renderer.render(f, self.program, ctx, self.ignore_undefined),
            None => {
                let ctx = Context::at_root(&data);
                renderer.render(f, self.program, &ctx, self.ignore_undefined)
            }
        }
    }
}

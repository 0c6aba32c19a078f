use std::fmt::Write;

use crate::fmt::{escape_html, to_text, Formatter};
use crate::render::context::join;
use crate::render::iter::Members;
use crate::render::Context;
use crate::types::block::{Block, Condition, Iteration, Placeholder, Program};
use crate::value::ValueCow;
use crate::{Engine, Error, Result, Value};

/// Evaluates compiled blocks against a context.
///
/// Every nested body, recursive fragment and global template evaluation
/// goes one level deeper. Exceeding `max_depth` levels is an error.
#[cfg_attr(test, derive(Debug))]
pub(crate) struct RendererImpl<'render> {
    pub(crate) engine: &'render Engine,
    pub(crate) max_depth: usize,
}

impl<'render> RendererImpl<'render> {
    pub(crate) fn render(
        &self,
        f: &mut Formatter<'_>,
        program: &Program,
        ctx: &Context<'_>,
        ignore_undefined: bool,
    ) -> Result<()> {
        self.render_blocks(
            f,
            &program.source,
            &program.blocks,
            ctx,
            ignore_undefined,
            0,
        )
    }

    pub(crate) fn render_blocks(
        &self,
        f: &mut Formatter<'_>,
        source: &str,
        blocks: &[Block],
        ctx: &Context<'_>,
        ignore_undefined: bool,
        depth: usize,
    ) -> Result<()> {
        for block in blocks {
            match block {
                Block::Text(text) => f.write_str(&text.text)?,

                Block::Placeholder(placeholder) => self
                    .render_placeholder(f, placeholder, ctx, ignore_undefined, depth)
                    .map_err(|err| err.enrich(source, placeholder.span))?,

                Block::Condition(cond) => self
                    .render_condition(f, source, cond, ctx, ignore_undefined, depth)
                    .map_err(|err| err.enrich(source, cond.span))?,

                Block::Iterator(iteration) => self
                    .render_iteration(f, source, iteration, ctx, ignore_undefined, depth)
                    .map_err(|err| err.enrich(source, iteration.span))?,
            }
        }
        Ok(())
    }

    fn render_placeholder(
        &self,
        f: &mut Formatter<'_>,
        placeholder: &Placeholder,
        ctx: &Context<'_>,
        ignore_undefined: bool,
        depth: usize,
    ) -> Result<()> {
        let value = match self.resolve(&placeholder.name, ctx, depth)? {
            Some(value) => value,
            None if ignore_undefined => {
                f.write_str(&placeholder.to_source())?;
                return Ok(());
            }
            None => return Ok(()),
        };
        if let Value::None = *value {
            return Ok(());
        }

        // Escape before recursing so the output of the fragment is not
        // escaped a second time.
        let text = to_text(&value);
        let text = if placeholder.escape {
            escape_html(&text)
        } else {
            text.as_str().into()
        };

        if placeholder.recursive && text.contains("{{") {
            let depth = self.descend(depth)?;
            let program = self.engine.cache.get_or_compile(&text);
            return self.render_blocks(
                f,
                &program.source,
                &program.blocks,
                ctx,
                ignore_undefined,
                depth,
            );
        }

        f.write_str(&text)?;
        Ok(())
    }

    fn render_condition(
        &self,
        f: &mut Formatter<'_>,
        source: &str,
        cond: &Condition,
        ctx: &Context<'_>,
        ignore_undefined: bool,
        depth: usize,
    ) -> Result<()> {
        let truthy = match self.resolve(&cond.name, ctx, depth)? {
            Some(value) => match &*value {
                Value::String(s) if cond.recursive && s.starts_with("{{") && s.ends_with("}}") => {
                    !self.render_fragment(s, ctx, depth)?.is_empty()
                }
                value => value.is_truthy(),
            },
            None => false,
        };

        let branch = if truthy {
            &cond.then_branch
        } else {
            &cond.else_branch
        };
        if branch.is_empty() {
            return Ok(());
        }
        let depth = self.descend(depth)?;
        self.render_blocks(f, source, branch, ctx, ignore_undefined, depth)
    }

    fn render_iteration(
        &self,
        f: &mut Formatter<'_>,
        source: &str,
        iteration: &Iteration,
        ctx: &Context<'_>,
        ignore_undefined: bool,
        depth: usize,
    ) -> Result<()> {
        let collection = match self.resolve(&iteration.name, ctx, depth)? {
            Some(value) if value.is_truthy() => value,
            _ => return Ok(()),
        };
        if iteration.body.is_empty() {
            return Ok(());
        }

        let depth = self.descend(depth)?;
        let path = format!("{}.[item]", join(&ctx.path, &iteration.name));
        Members::new(&collection).for_each(|member| {
            let item = Context::with_current(ValueCow::Borrowed(member), path.clone(), ctx.root);
            self.render_blocks(f, source, &iteration.body, &item, ignore_undefined, depth)
        })
    }

    /// Renders a value as a template to a string, with undefined names
    /// rendered as empty.
    fn render_fragment(&self, text: &str, ctx: &Context<'_>, depth: usize) -> Result<String> {
        let depth = self.descend(depth)?;
        let program = self.engine.cache.get_or_compile(text);
        let mut s = String::new();
        let mut f = Formatter::with_string(&mut s);
        self.render_blocks(
            &mut f,
            &program.source,
            &program.blocks,
            ctx,
            false,
            depth,
        )?;
        Ok(s)
    }

    /// Returns the depth one level below `depth`.
    pub(crate) fn descend(&self, depth: usize) -> Result<usize> {
        if depth >= self.max_depth {
            return Err(Error::max_depth(self.max_depth));
        }
        Ok(depth + 1)
    }
}

//! Resolves names like `user.name` or `../../title` to values.
//!
//! Resolution happens in the following order:
//! - Leading `../` groups climb that many segments up the current path. The
//!   ancestor is looked up again from the root and the rest of the name is
//!   resolved against it.
//! - Every segment but the last is drilled into, each one evaluated as a
//!   property of the previous.
//! - The last segment is evaluated as a property of the drilled value.
//! - If any segment is undefined the whole name is resolved again against
//!   the global data, unless the name climbed or this already is the global
//!   data.
//!
//! Evaluating a property calls computed values, falls back to a global
//! template of the same name if the property is absent, and turns empty
//! lists and maps into `None`.

use crate::fmt::Formatter;
use crate::render::context::join;
use crate::render::core::RendererImpl;
use crate::render::Context;
use crate::types::block::Program;
use crate::value::ValueCow;
use crate::{Result, Value};

const CLIMB: &str = "../";

/// Where the resolution of a name started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// The render data, may fall back to the global data.
    Local,
    /// An ancestor reached with `../`.
    Climbed,
    /// The global data.
    Global,
}

impl<'render> RendererImpl<'render> {
    /// Resolves a name against the given context.
    ///
    /// Returns `None` if the name is undefined and `Some(Value::None)` if it
    /// is defined but null or an empty list or map.
    pub(crate) fn resolve<'a>(
        &'a self,
        name: &str,
        ctx: &'a Context<'_>,
        depth: usize,
    ) -> Result<Option<ValueCow<'a>>> {
        self.resolve_from(
            name,
            ctx.current.borrow(),
            &ctx.path,
            ctx.root,
            Scope::Local,
            depth,
        )
    }

    fn resolve_from<'a>(
        &'a self,
        name: &str,
        current: ValueCow<'a>,
        path: &str,
        root: &'a Value,
        scope: Scope,
        depth: usize,
    ) -> Result<Option<ValueCow<'a>>> {
        let (levels, rest) = split_climb(name);
        if levels == 0 {
            return self.drill(name, current, path.to_owned(), root, scope, depth);
        }

        // The root has the path "" which still counts as one segment.
        let segments: Vec<&str> = path.split('.').collect();
        let keep = segments.len().checked_sub(levels).unwrap_or_else(|| {
            log::warn!(
                "`{}` climbs above the root from `{}`, stopping at the root",
                name,
                path
            );
            0
        });

        if keep == 0 {
            return self.drill(
                rest,
                ValueCow::Borrowed(root),
                String::new(),
                root,
                Scope::Climbed,
                depth,
            );
        }

        let ancestor_path = segments[..keep].join(".");
        let ancestor = self.resolve_from(
            &ancestor_path,
            ValueCow::Borrowed(root),
            "",
            root,
            Scope::Local,
            depth,
        )?;
        match ancestor {
            Some(ancestor) => {
                self.drill(rest, ancestor, ancestor_path, root, Scope::Climbed, depth)
            }
            None => Ok(None),
        }
    }

    /// Evaluates each segment of `name` in turn starting at `current`.
    fn drill<'a>(
        &'a self,
        name: &str,
        current: ValueCow<'a>,
        path: String,
        root: &'a Value,
        scope: Scope,
        depth: usize,
    ) -> Result<Option<ValueCow<'a>>> {
        let (init, last) = match name.rsplit_once('.') {
            Some((init, last)) => (Some(init), last),
            None => (None, name),
        };

        let mut owner = current;
        let mut path = path;
        for segment in init.into_iter().flat_map(|init| init.split('.')) {
            match self.property(&owner, &path, root, segment, depth)? {
                Some(value) => {
                    path = join(&path, segment);
                    owner = value;
                }
                None => return self.fall_back(name, root, scope, depth),
            }
        }

        match self.property(&owner, &path, root, last, depth)? {
            Some(value) => Ok(Some(value)),
            None => self.fall_back(name, root, scope, depth),
        }
    }

    fn fall_back<'a>(
        &'a self,
        name: &str,
        root: &'a Value,
        scope: Scope,
        depth: usize,
    ) -> Result<Option<ValueCow<'a>>> {
        match scope {
            Scope::Local => self.global(name, root, depth),
            Scope::Climbed | Scope::Global => Ok(None),
        }
    }

    /// Resolves a name against the global data. Global templates were
    /// already tried for the first segment while resolving it locally.
    fn global<'a>(
        &'a self,
        name: &str,
        root: &'a Value,
        depth: usize,
    ) -> Result<Option<ValueCow<'a>>> {
        let (first, rest) = match name.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        let value = match self.engine.data.get(first) {
            Some(value) => settle(ValueCow::Borrowed(value))?,
            None => return Ok(None),
        };
        match rest {
            Some(rest) => self.drill(rest, value, first.to_owned(), root, Scope::Global, depth),
            None => Ok(Some(value)),
        }
    }

    /// Evaluates a single property of `owner`, found at `path`.
    fn property<'a>(
        &'a self,
        owner: &ValueCow<'a>,
        path: &str,
        root: &'a Value,
        name: &str,
        depth: usize,
    ) -> Result<Option<ValueCow<'a>>> {
        if let Value::None = **owner {
            return Ok(None);
        }

        let value = match child(owner, name) {
            Some(value) => value,
            None => match self.engine.templates.get(name) {
                Some(program) => {
                    let ctx = Context::with_current(owner.borrow(), path.to_owned(), root);
                    ValueCow::Owned(Value::String(self.render_global(program, &ctx, depth)?))
                }
                None => return Ok(None),
            },
        };
        settle(value).map(Some)
    }

    /// Renders a global template as the value of a property.
    fn render_global(&self, program: &Program, ctx: &Context<'_>, depth: usize) -> Result<String> {
        let depth = self.descend(depth)?;
        let mut s = String::new();
        let mut f = Formatter::with_string(&mut s);
        self.render_blocks(&mut f, &program.source, &program.blocks, ctx, false, depth)?;
        Ok(s)
    }
}

/// Calls a computed value and turns an empty list or map into `None`.
fn settle(value: ValueCow<'_>) -> Result<ValueCow<'_>> {
    let value = match value {
        ValueCow::Borrowed(Value::Fn(f)) => ValueCow::Owned(f.call()?),
        ValueCow::Owned(Value::Fn(f)) => ValueCow::Owned(f.call()?),
        value => value,
    };
    if value.is_empty_container() {
        return Ok(ValueCow::Owned(Value::None));
    }
    Ok(value)
}

/// Looks up a member of a map, or an index of a list.
fn child<'a>(owner: &ValueCow<'a>, name: &str) -> Option<ValueCow<'a>> {
    match owner {
        &ValueCow::Borrowed(value) => lookup(value, name).map(ValueCow::Borrowed),
        ValueCow::Owned(value) => lookup(value, name).cloned().map(ValueCow::Owned),
    }
}

fn lookup<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    match value {
        Value::Map(map) => map.get(name),
        Value::List(list) => name.parse::<usize>().ok().and_then(|i| list.get(i)),
        _ => None,
    }
}

/// Counts the leading `../` groups of a name and strips them.
fn split_climb(name: &str) -> (usize, &str) {
    let mut levels = 0;
    let mut rest = name;
    while let Some(r) = rest.strip_prefix(CLIMB) {
        levels += 1;
        rest = r;
    }
    (levels, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{value, Engine};

    fn resolve(engine: &Engine, name: &str, ctx: &Context<'_>) -> Option<Value> {
        let renderer = RendererImpl {
            engine,
            max_depth: 64,
        };
        renderer
            .resolve(name, ctx, 0)
            .unwrap()
            .map(|value| Value::clone(&value))
    }

    #[test]
    fn split_climb_counts_leading_groups() {
        assert_eq!(split_climb("name"), (0, "name"));
        assert_eq!(split_climb("../name"), (1, "name"));
        assert_eq!(split_climb("../../a.b"), (2, "a.b"));
        assert_eq!(split_climb("a/../b"), (0, "a/../b"));
    }

    #[test]
    fn resolve_flat_and_deep() {
        let engine = Engine::new();
        let data = value! { a: { b: { c: "X" } }, n: 1 };
        let ctx = Context::at_root(&data);
        assert_eq!(resolve(&engine, "n", &ctx), Some(Value::from(1)));
        assert_eq!(resolve(&engine, "a.b.c", &ctx), Some(Value::from("X")));
        assert_eq!(resolve(&engine, "a.x.c", &ctx), None);
        assert_eq!(resolve(&engine, "missing", &ctx), None);
    }

    #[test]
    fn resolve_list_index() {
        let engine = Engine::new();
        let data = value! { items: ["a", "b"] };
        let ctx = Context::at_root(&data);
        assert_eq!(resolve(&engine, "items.1", &ctx), Some(Value::from("b")));
        assert_eq!(resolve(&engine, "items.2", &ctx), None);
        assert_eq!(resolve(&engine, "items.first", &ctx), None);
    }

    #[test]
    fn resolve_null_is_defined() {
        let engine = Engine::new();
        let data = value! { a: None };
        let ctx = Context::at_root(&data);
        assert_eq!(resolve(&engine, "a", &ctx), Some(Value::None));
        assert_eq!(resolve(&engine, "a.b", &ctx), None);
    }

    #[test]
    fn resolve_empty_containers_are_none() {
        let engine = Engine::new();
        let data = value! { list: [], map: {} };
        let ctx = Context::at_root(&data);
        assert_eq!(resolve(&engine, "list", &ctx), Some(Value::None));
        assert_eq!(resolve(&engine, "map", &ctx), Some(Value::None));
    }

    #[test]
    fn resolve_climb() {
        let engine = Engine::new();
        let data = value! { title: "T", a: { title: "A", b: { title: "B" } } };
        let b = resolve(&engine, "a.b", &Context::at_root(&data)).unwrap();
        let ctx = Context::new(&b, "a.b", &data);
        assert_eq!(resolve(&engine, "title", &ctx), Some(Value::from("B")));
        assert_eq!(resolve(&engine, "../title", &ctx), Some(Value::from("A")));
        assert_eq!(resolve(&engine, "../../title", &ctx), Some(Value::from("T")));
        assert_eq!(resolve(&engine, "../b.title", &ctx), Some(Value::from("B")));
    }

    #[test]
    fn resolve_climb_above_root_is_clamped() {
        let engine = Engine::new();
        let data = value! { title: "T", a: { title: "A" } };
        let a = resolve(&engine, "a", &Context::at_root(&data)).unwrap();
        let ctx = Context::new(&a, "a", &data);
        assert_eq!(
            resolve(&engine, "../../../title", &ctx),
            Some(Value::from("T"))
        );
    }

    #[test]
    fn resolve_global_data_fallback() {
        let mut engine = Engine::new();
        engine.register_global_data("site", value! { name: "Example" });
        engine.register_global_data("title", "Global");
        let data = value! { title: "Local", a: {} };
        let ctx = Context::at_root(&data);
        assert_eq!(resolve(&engine, "title", &ctx), Some(Value::from("Local")));
        assert_eq!(
            resolve(&engine, "site.name", &ctx),
            Some(Value::from("Example"))
        );
    }

    #[test]
    fn resolve_global_data_is_settled() {
        let mut engine = Engine::new();
        engine.register_global_data("now", Value::from_fn(|| Ok(value! { year: 2024 })));
        engine.register_global_data("empty", Value::List(Vec::new()));
        let data = value! {};
        let ctx = Context::at_root(&data);
        assert_eq!(resolve(&engine, "now.year", &ctx), Some(Value::from(2024)));
        assert_eq!(resolve(&engine, "now.month", &ctx), None);
        assert_eq!(resolve(&engine, "empty", &ctx), Some(Value::None));
    }

    #[test]
    fn resolve_climbed_name_never_falls_back() {
        let mut engine = Engine::new();
        engine.register_global_data("title", "Global");
        let data = value! { a: { b: "x" } };
        let ctx = Context::new(&Value::None, "a", &data);
        assert_eq!(resolve(&engine, "../title", &ctx), None);
    }

    #[test]
    fn resolve_computed_property() {
        let engine = Engine::new();
        let mut data = value! {};
        if let Value::Map(map) = &mut data {
            map.insert(
                "user".into(),
                Value::from_fn(|| Ok(value! { name: "computed" })),
            );
        }
        let ctx = Context::at_root(&data);
        assert_eq!(
            resolve(&engine, "user.name", &ctx),
            Some(Value::from("computed"))
        );
    }

    #[test]
    fn resolve_computed_property_error() {
        let engine = Engine::new();
        let mut data = value! {};
        if let Value::Map(map) = &mut data {
            map.insert("broken".into(), Value::from_fn(|| Err("boom".into())));
        }
        let renderer = RendererImpl {
            engine: &engine,
            max_depth: 64,
        };
        let ctx = Context::at_root(&data);
        let err = renderer.resolve("broken", &ctx, 0).unwrap_err();
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn resolve_global_template_as_property() {
        let mut engine = Engine::new();
        engine.register_global_template("full", "{{first}} {{last}}");
        let data = value! { user: { first: "John", last: "Smith" } };
        let ctx = Context::at_root(&data);
        assert_eq!(
            resolve(&engine, "user.full", &ctx),
            Some(Value::from("John Smith"))
        );
    }
}

use std::collections::HashMap;

pub mod context;
#[cfg(test)]
mod tests;

/// Abstraction for a template engine.
pub trait Engine<'a> {
    fn name() -> &'static str;
    fn new() -> Self;
    fn add_template(&mut self, name: &'static str, source: &'a str);
    fn render<S>(&self, name: &'static str, ctx: &S) -> String
    where
        S: serde::Serialize;
}

////////////////////////////////////////////////////////////////////////////////
/// handlebars
////////////////////////////////////////////////////////////////////////////////

pub type Handlebars<'engine> = handlebars::Handlebars<'engine>;

impl<'engine> Engine<'engine> for Handlebars<'engine> {
    #[inline]
    fn name() -> &'static str {
        "handlebars"
    }

    #[inline]
    fn new() -> Self {
        let mut hbs = handlebars::Handlebars::new();
        // handlebars escapes HTML by default, the stash template uses raw
        // placeholders so turn escaping off here too.
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    #[inline]
    fn add_template(&mut self, name: &'static str, source: &'engine str) {
        self.register_template_string(name, source).unwrap();
    }

    #[inline]
    fn render<S>(&self, name: &'static str, ctx: &S) -> String
    where
        S: serde::Serialize,
    {
        self.render(name, ctx).unwrap()
    }
}

////////////////////////////////////////////////////////////////////////////////
/// stash
////////////////////////////////////////////////////////////////////////////////

/// Compiled stash templates borrow their engine, so the engine is leaked for
/// the duration of the benchmark.
pub struct Stash {
    engine: &'static stash::Engine,
    templates: HashMap<&'static str, stash::Template<'static>>,
}

impl Stash {
    /// Construct with global templates registered up front.
    pub fn with_globals(globals: &[(&str, &str)]) -> Self {
        let mut engine = stash::Engine::new();
        for (name, source) in globals {
            engine.register_global_template(*name, source);
        }
        Self {
            engine: Box::leak(Box::new(engine)),
            templates: HashMap::new(),
        }
    }

    pub fn engine(&self) -> &stash::Engine {
        self.engine
    }
}

impl<'a> Engine<'a> for Stash {
    #[inline]
    fn name() -> &'static str {
        "stash"
    }

    #[inline]
    fn new() -> Self {
        Self::with_globals(&[])
    }

    #[inline]
    fn add_template(&mut self, name: &'static str, source: &'a str) {
        self.templates.insert(name, self.engine.compile(source));
    }

    #[inline]
    fn render<S>(&self, name: &'static str, ctx: &S) -> String
    where
        S: serde::Serialize,
    {
        self.templates[name].render(ctx).to_string().unwrap()
    }
}

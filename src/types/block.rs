//! The compiled representation of a template: a tree of [`Block`]s.
//!
//! The nesting of the tree mirrors the balanced `{{if}} ... {{end}}` and
//! `{{foreach}} ... {{end}}` pairs of the source, read left to right.

use crate::types::span::Span;

/// A node in a compiled template.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Block {
    /// Literal text, emitted as is.
    Text(Text),
    /// A `{{name}}` or `{{{name}}}` directive.
    Placeholder(Placeholder),
    /// An `{{if name}} ... {{else}} ... {{end}}` directive.
    Condition(Condition),
    /// A `{{foreach name}} ... {{end}}` directive.
    Iterator(Iteration),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Text {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placeholder {
    pub name: String,
    /// Whether the resolved value is rendered again as a template (`/r`).
    pub recursive: bool,
    /// Whether the resolved value is HTML escaped, i.e. `{{` and not `{{{`.
    pub escape: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Condition {
    pub name: String,
    /// Whether the resolved value is rendered as a template before testing.
    pub recursive: bool,
    pub then_branch: Vec<Block>,
    pub else_branch: Vec<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Iteration {
    pub name: String,
    pub body: Vec<Block>,
    pub span: Span,
}

/// A compiled template along with the source it was compiled from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    pub source: String,
    pub blocks: Vec<Block>,
}

impl Block {
    /// The region of the template source this block was compiled from.
    pub fn span(&self) -> Span {
        match self {
            Block::Text(text) => text.span,
            Block::Placeholder(placeholder) => placeholder.span,
            Block::Condition(cond) => cond.span,
            Block::Iterator(iteration) => iteration.span,
        }
    }
}

impl Placeholder {
    /// Reconstructs the directive as it would appear in a template.
    ///
    /// The recursion flag is not part of the reconstruction.
    pub fn to_source(&self) -> String {
        if self.escape {
            format!("{{{{{}}}}}", self.name)
        } else {
            format!("{{{{{{{}}}}}}}", self.name)
        }
    }
}

impl Condition {
    pub(crate) fn new(name: String, recursive: bool, span: Span) -> Self {
        Self {
            name,
            recursive,
            then_branch: Vec::new(),
            else_branch: Vec::new(),
            span,
        }
    }
}

impl Iteration {
    pub(crate) fn new(name: String, span: Span) -> Self {
        Self {
            name,
            body: Vec::new(),
            span,
        }
    }
}

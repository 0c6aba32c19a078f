use crate::compile::lex::{Lexer, Tag, Token};
use crate::types::block::{Block, Condition, Iteration, Placeholder, Text};
use crate::types::span::Span;

/// The flag that marks a placeholder or condition as recursive.
const RECURSIVE: &str = "/r";

/// The maximum number of `if` and `foreach` directives that can be open at
/// once. Deeper directives are kept as text so that the block tree stays
/// shallow enough to drop, clone and serialize.
pub const MAX_NESTING: usize = 32;

/// A parser that constructs a tree of blocks from a token stream.
///
/// The parser is implemented as a simple hand written parser with no
/// recursion. Open `if` and `foreach` directives are kept on a stack and
/// every new block is appended to the innermost open one.
///
/// Parsing never fails: a directive that doesn't fit the current structure is
/// logged and emitted back into the output as literal text.
pub struct Parser<'source> {
    /// A lexer that tokenizes the template source.
    tokens: Lexer<'source>,
}

/// Stores the state of a directive that has been opened but not ended.
enum State {
    /// A partial `if` directive.
    If {
        cond: Condition,
        /// Whether an `else` has been seen, i.e. which branch to fill.
        has_else: bool,
    },

    /// A partial `foreach` directive.
    Foreach { iteration: Iteration },
}

/// A parsed directive.
enum Directive<'source> {
    If(&'source str, bool),
    Foreach(&'source str),
    Else,
    End(Option<&'source str>),
    Placeholder(&'source str, bool),
}

impl<'source> Parser<'source> {
    /// Construct a new parser.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: Lexer::new(source),
        }
    }

    fn source(&self) -> &'source str {
        self.tokens.source
    }

    /// Parses a template into its top level blocks.
    pub fn parse_template(mut self) -> Vec<Block> {
        let mut blocks: Vec<State> = Vec::new();
        let mut top: Vec<Block> = Vec::new();
        // The number of directives opened past the nesting limit. Their
        // `else` and `end` tags are kept as text too.
        let mut overflow = 0;

        while let Some(token) = self.tokens.next() {
            let tag = match token {
                // Simply raw template, emit a single block for it.
                Token::Raw(span) => {
                    let text = self.text(span);
                    push(&mut blocks, &mut top, text);
                    continue;
                }
                Token::Tag(tag) => tag,
            };

            match Directive::from_tag(&tag) {
                Some(Directive::If(..) | Directive::Foreach(..))
                    if blocks.len() >= MAX_NESTING =>
                {
                    if overflow == 0 {
                        log::warn!(
                            "directives nested deeper than {} are kept as text, starting at `{}`",
                            MAX_NESTING,
                            self.raw(tag.span)
                        );
                    }
                    overflow += 1;
                    let text = self.text(tag.span);
                    push(&mut blocks, &mut top, text);
                }

                Some(directive @ (Directive::Else | Directive::End(_))) if overflow > 0 => {
                    if let Directive::End(_) = directive {
                        overflow -= 1;
                    }
                    let text = self.text(tag.span);
                    push(&mut blocks, &mut top, text);
                }

                // The start of a condition. For example:
                //
                //   {{if cond}} or {{if cond /r}}
                //
                // The block stays on the stack until its `end` is found.
                Some(Directive::If(name, recursive)) => {
                    let cond = Condition::new(name.to_owned(), recursive, tag.span);
                    blocks.push(State::If {
                        cond,
                        has_else: false,
                    });
                }

                // The start of an iteration. For example:
                //
                //   {{foreach items}}
                Some(Directive::Foreach(name)) => {
                    let iteration = Iteration::new(name.to_owned(), tag.span);
                    blocks.push(State::Foreach { iteration });
                }

                // The `else` of a condition. The innermost open block must be
                // a condition, everything after this goes to its false branch.
                Some(Directive::Else) => match blocks.last_mut() {
                    Some(State::If { has_else, .. }) => *has_else = true,
                    _ => {
                        log::warn!("unexpected `{}` encountered", self.raw(tag.span));
                        let text = self.text(tag.span);
                        push(&mut blocks, &mut top, text);
                    }
                },

                // The end of a block, optionally qualified with the kind of
                // block it is supposed to end.
                Some(Directive::End(qualifier)) => {
                    let expected = match (blocks.last(), qualifier) {
                        (Some(_), None) => true,
                        (Some(State::If { .. }), Some("if")) => true,
                        (Some(State::Foreach { .. }), Some("foreach")) => true,
                        _ => false,
                    };
                    match blocks.pop() {
                        Some(state) if expected => {
                            let block = state.into_block();
                            push(&mut blocks, &mut top, block);
                        }
                        state => {
                            blocks.extend(state);
                            log::warn!("unexpected `{}` encountered", self.raw(tag.span));
                            let text = self.text(tag.span);
                            push(&mut blocks, &mut top, text);
                        }
                    }
                }

                Some(Directive::Placeholder(name, recursive)) => {
                    let block = Block::Placeholder(Placeholder {
                        name: name.to_owned(),
                        recursive,
                        escape: tag.braces == 2,
                        span: tag.span,
                    });
                    push(&mut blocks, &mut top, block);
                }

                // An `if` or `foreach` without a name, there is nothing
                // sensible to do with it.
                None => {
                    log::warn!("bad directive dropped: {}", self.raw(tag.span));
                }
            }
        }

        if !blocks.is_empty() {
            let open: Vec<_> = blocks.iter().map(|s| self.raw(s.span())).collect();
            log::warn!("missing `{{{{end}}}}` for {}", open.join(", "));
            // Close whatever is still open so that the blocks compiled so far
            // end up in the tree.
            while let Some(state) = blocks.pop() {
                let block = state.into_block();
                push(&mut blocks, &mut top, block);
            }
        }

        top
    }

    fn raw(&self, span: Span) -> &'source str {
        &self.source()[span]
    }

    fn text(&self, span: Span) -> Block {
        Block::Text(Text {
            text: self.raw(span).to_owned(),
            span,
        })
    }
}

/// Appends a block to the innermost open block or the top level.
fn push(blocks: &mut [State], top: &mut Vec<Block>, block: Block) {
    match blocks.last_mut() {
        Some(State::If {
            cond,
            has_else: false,
        }) => cond.then_branch.push(block),
        Some(State::If {
            cond,
            has_else: true,
        }) => cond.else_branch.push(block),
        Some(State::Foreach { iteration }) => iteration.body.push(block),
        None => top.push(block),
    }
}

impl State {
    fn span(&self) -> Span {
        match self {
            State::If { cond, .. } => cond.span,
            State::Foreach { iteration } => iteration.span,
        }
    }

    fn into_block(self) -> Block {
        match self {
            State::If { cond, .. } => Block::Condition(cond),
            State::Foreach { iteration } => Block::Iterator(iteration),
        }
    }
}

impl<'source> Directive<'source> {
    fn from_tag(tag: &Tag<'source>) -> Option<Self> {
        let named = |name: &'source str| (!name.is_empty()).then_some(name);
        let directive = match tag.first {
            "if" => Self::If(named(tag.second)?, tag.third == RECURSIVE),
            "foreach" => Self::Foreach(named(tag.second)?),
            "else" => Self::Else,
            "end" => Self::End(named(tag.second)),
            name => Self::Placeholder(name, tag.second == RECURSIVE),
        };
        Some(directive)
    }
}

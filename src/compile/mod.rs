//! Compile the template into a tree of blocks that can be evaluated by the
//! renderer.
//!
//! This process has two stages:
//! - The lexer chunks the template source into raw text and tags.
//! - The parser interprets the tags as directives and nests the blocks.
//!
//! Neither stage fails. Malformed directives are logged and kept in the
//! output as literal text.

mod lex;
mod parse;

use crate::types::block::{Block, Program};

/// Compile a template into a program.
pub fn template(source: &str) -> Program {
    Program {
        source: source.to_owned(),
        blocks: blocks(source),
    }
}

/// Compile a template into its top level blocks.
pub fn blocks(source: &str) -> Vec<Block> {
    parse::Parser::new(source).parse_template()
}

//! Saves and loads compiled templates as JSON.
//!
//! A single template has the form `{"version": 1, "source": "..", "blocks":
//! [..]}` where each block is tagged with its kind, e.g. `{"Text": {..}}`.
//! The global templates of an engine are saved together as `{"version": 1,
//! "templates": {"name": {"source": "..", "blocks": [..]}}}`.
//!
//! Loading checks the version before anything else so that a document from a
//! different version is rejected with a clear message. Every span must lie
//! within the source it was saved with.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::block::{Block, Program};
use crate::types::span::Span;
use crate::{Error, Result};

/// The version of the document format written by this crate.
const VERSION: u32 = 1;

#[derive(Serialize)]
struct Document<'a> {
    version: u32,
    source: &'a str,
    blocks: &'a [Block],
}

#[derive(Serialize)]
struct GlobalsDocument<'a> {
    version: u32,
    templates: &'a BTreeMap<String, Program>,
}

#[derive(Deserialize)]
struct Header {
    version: u32,
}

#[derive(Deserialize)]
struct OwnedGlobals {
    templates: BTreeMap<String, Program>,
}

pub(crate) fn to_json(program: &Program) -> Result<String> {
    let doc = Document {
        version: VERSION,
        source: &program.source,
        blocks: &program.blocks,
    };
    serde_json::to_string(&doc).map_err(Error::custom)
}

pub(crate) fn from_json(json: &str) -> Result<Program> {
    check_version(json)?;
    let program: Program = serde_json::from_str(json)?;
    if let Some(span) = bad_span(&program) {
        return Err(Error::deserialize(format!(
            "span {}..{} does not fit the source",
            span.m, span.n
        )));
    }
    Ok(program)
}

pub(crate) fn globals_to_json(templates: &BTreeMap<String, Program>) -> Result<String> {
    let doc = GlobalsDocument {
        version: VERSION,
        templates,
    };
    serde_json::to_string(&doc).map_err(Error::custom)
}

pub(crate) fn globals_from_json(json: &str) -> Result<BTreeMap<String, Program>> {
    check_version(json)?;
    let OwnedGlobals { templates } = serde_json::from_str(json)?;
    for (name, program) in &templates {
        if let Some(span) = bad_span(program) {
            return Err(Error::deserialize(format!(
                "global template `{}`: span {}..{} does not fit the source",
                name, span.m, span.n
            )));
        }
    }
    Ok(templates)
}

fn check_version(json: &str) -> Result<()> {
    let Header { version } = serde_json::from_str(json)?;
    if version != VERSION {
        return Err(Error::deserialize(format!(
            "unsupported version {}, expected {}",
            version, VERSION
        )));
    }
    Ok(())
}

/// Finds a span in the tree that does not select a region of the source.
fn bad_span(program: &Program) -> Option<Span> {
    let mut pending: Vec<&Block> = program.blocks.iter().collect();
    while let Some(block) = pending.pop() {
        let span = block.span();
        if program.source.get(span.m..span.n).is_none() {
            return Some(span);
        }
        match block {
            Block::Condition(cond) => {
                pending.extend(cond.then_branch.iter().chain(&cond.else_branch));
            }
            Block::Iterator(iteration) => pending.extend(&iteration.body),
            Block::Text(_) | Block::Placeholder(_) => {}
        }
    }
    None
}

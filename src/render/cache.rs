use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::compile;
use crate::types::block::Program;

/// Programs compiled from values rendered as templates, keyed by the exact
/// text that was compiled.
///
/// Entries are added the first time a text is seen and never evicted.
#[derive(Default)]
pub(crate) struct FragmentCache {
    programs: RwLock<HashMap<String, Arc<Program>>>,
}

impl FragmentCache {
    /// Returns the compiled program for `text`, compiling it on a miss.
    pub fn get_or_compile(&self, text: &str) -> Arc<Program> {
        let programs = self.programs.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(program) = programs.get(text) {
            return Arc::clone(program);
        }
        drop(programs);

        log::debug!("compiling recursive fragment {:?}", text);
        let program = Arc::new(compile::template(text));
        let mut programs = self.programs.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(programs.entry(text.to_owned()).or_insert(program))
    }

    pub fn len(&self) -> usize {
        self.programs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

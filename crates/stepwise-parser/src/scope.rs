//! Lexical scopes for name resolution

use std::collections::HashMap;
use stepwise_core::VarId;

/// Stack of lexical scopes, innermost last
#[derive(Debug, Default)]
pub(crate) struct Scopes {
    frames: Vec<HashMap<String, VarId>>,
}

impl Scopes {
    pub(crate) fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    pub(crate) fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }

    /// Bind a name in the innermost scope, shadowing outer bindings
    pub(crate) fn declare(&mut self, name: &str, var: VarId) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), var);
        }
    }

    pub(crate) fn resolve(&self, name: &str) -> Option<VarId> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name).copied())
    }
}

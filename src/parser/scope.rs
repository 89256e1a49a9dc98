use std::collections::HashMap;

use crate::parser::types::ObjectId;

/// Lexical scopes, innermost last. The first entry is the file scope and is
/// never popped.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<HashMap<String, ObjectId>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn open(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn close(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn is_file_scope(&self) -> bool {
        self.scopes.len() == 1
    }

    /// Binds `name` in the innermost scope. Returns false when the scope
    /// already had a binding for it; the old binding is kept.
    pub fn insert(&mut self, name: &str, object: ObjectId) -> bool {
        let Some(innermost) = self.scopes.last_mut() else {
            return false;
        };
        if innermost.contains_key(name) {
            return false;
        }
        innermost.insert(name.to_string(), object);
        true
    }

    pub fn lookup_local(&self, name: &str) -> Option<ObjectId> {
        self.scopes.last().and_then(|scope| scope.get(name).copied())
    }

    pub fn lookup(&self, name: &str) -> Option<ObjectId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

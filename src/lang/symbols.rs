//! Variable storage for a single run

use std::collections::HashMap;

use crate::lang::error::RuntimeError;
use crate::lang::value::Value;

/// Case-insensitive name → value map. Assigning declares.
#[derive(Debug, Default)]
pub struct SymbolTable {
    variables: HashMap<String, Value>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(name: &str) -> String {
        name.to_lowercase()
    }

    pub fn assign(&mut self, name: &str, value: Value) {
        self.variables.insert(Self::key(name), value);
    }

    pub fn get(&self, name: &str) -> Result<&Value, RuntimeError> {
        self.variables
            .get(&Self::key(name))
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Bindings sorted by name, for dumps
    pub fn entries(&self) -> Vec<(&str, &Value)> {
        let mut entries: Vec<_> = self
            .variables
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

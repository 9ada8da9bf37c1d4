//! Program counter, label table and pending jump

use std::collections::HashMap;

use crate::lang::ast::{Program, Stmt};
use crate::lang::error::RuntimeError;

/// Control-flow state threaded through the run loop
#[derive(Debug, Default)]
pub struct RuntimeEnvironment {
    /// Index of the statement being executed
    pub program_counter: usize,
    labels: HashMap<String, usize>,
    pending_jump: Option<String>,
}

impl RuntimeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the index of every label. Label names ignore case; a name
    /// declared twice is an error.
    pub fn scan_labels(&mut self, program: &Program) -> Result<(), RuntimeError> {
        self.labels.clear();
        for (idx, stmt) in program.statements.iter().enumerate() {
            if let Stmt::Label(name) = stmt {
                let key = name.to_lowercase();
                if self.labels.contains_key(&key) {
                    return Err(RuntimeError::DuplicateLabel(name.clone()));
                }
                self.labels.insert(key, idx);
            }
        }
        log::trace!("label table: {:?}", self.labels);
        Ok(())
    }

    pub fn label_index(&self, name: &str) -> Option<usize> {
        self.labels.get(&name.to_lowercase()).copied()
    }

    /// Ask for a jump once the current statement finishes. Unknown labels
    /// fail here, before anything moves.
    pub fn request_jump(&mut self, label: &str) -> Result<(), RuntimeError> {
        if self.label_index(label).is_none() {
            return Err(RuntimeError::UnknownLabel(label.to_string()));
        }
        self.pending_jump = Some(label.to_string());
        Ok(())
    }

    /// Continue at `index`, dropping any pending jump
    pub fn resume_at(&mut self, index: usize) {
        self.pending_jump = None;
        self.program_counter = index;
    }

    pub fn has_pending_jump(&self) -> bool {
        self.pending_jump.is_some()
    }

    /// Move to the next statement: the pending jump target if any,
    /// otherwise the following index.
    pub fn advance(&mut self) -> Result<(), RuntimeError> {
        match self.pending_jump.take() {
            Some(label) => {
                let target = self
                    .label_index(&label)
                    .ok_or_else(|| RuntimeError::UnknownLabel(label.clone()))?;
                log::trace!("jump to [{}] at statement {}", label, target + 1);
                self.program_counter = target;
            }
            None => self.program_counter += 1,
        }
        Ok(())
    }
}

//! Label table: label names bound to instruction indices.

use std::collections::HashMap;

use crate::common::error::ParseError;

/// One label declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEntry {
    /// Label name.
    pub name: String,
    /// Index of the instruction the label binds to. Equal to the program
    /// length for a label declared after the last instruction.
    pub index: usize,
    /// 1-based line of the declaration.
    pub line: usize,
}

/// Label names mapped to instruction indices, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    entries: Vec<LabelEntry>,
    by_name: HashMap<String, usize>,
}

impl LabelTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to instruction `index`.
    ///
    /// # Errors
    ///
    /// [`ParseError::DuplicateLabel`] if `name` is already declared.
    pub fn declare(&mut self, name: &str, index: usize, line: usize) -> Result<(), ParseError> {
        if let Some(&pos) = self.by_name.get(name) {
            return Err(ParseError::DuplicateLabel {
                line,
                label: name.to_string(),
                first: self.entries[pos].line,
            });
        }
        let _ = self.by_name.insert(name.to_string(), self.entries.len());
        self.entries.push(LabelEntry {
            name: name.to_string(),
            index,
            line,
        });
        Ok(())
    }

    /// Instruction index bound to `name`.
    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).map(|&pos| self.entries[pos].index)
    }

    /// First-declared label bound to instruction `index`.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.index == index)
            .map(|e| e.name.as_str())
    }

    /// Declarations in source order.
    pub fn iter(&self) -> impl Iterator<Item = &LabelEntry> {
        self.entries.iter()
    }

    /// Number of declared labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no labels are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Code sink for generated provider source.
//!
//! The generator never formats files directly. It talks to a [`CodeSink`], which
//! owns indentation and import bookkeeping. [`CodeWriter`] is the in-memory sink:
//!
//! 1. Two-space indentation, applied per block level
//! 2. No trailing whitespace on any line
//! 3. Imports grouped by source module, sources and symbols sorted
//!
//! Identical call sequences always render byte-identical text.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use crate::error::Result;

const INDENT: &str = "  ";

/// A symbol imported from a module
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Import {
    pub symbol: String,
    pub from: String,
}

impl Import {
    pub fn new(symbol: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            from: from.into(),
        }
    }
}

/// An emitted value expression plus the imports it depends on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    pub code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<Import>,
}

impl Expression {
    /// Raw expression code
    pub fn raw(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            imports: Vec::new(),
        }
    }

    /// Quoted string literal
    pub fn string(value: &str) -> Self {
        Self::raw(string_literal(value))
    }

    /// The `undefined` literal
    pub fn undefined() -> Self {
        Self::raw("undefined")
    }

    /// Attach an import the expression needs
    pub fn with_import(mut self, import: Import) -> Self {
        self.imports.push(import);
        self
    }
}

/// Double-quoted, escaped string literal
pub fn string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

/// Destination for generated source text
pub trait CodeSink {
    /// Write one line at the current indentation
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Write `header` and indent subsequent lines
    fn open_block(&mut self, header: &str) -> Result<()>;

    /// Dedent and write `footer`
    fn close_block(&mut self, footer: &str) -> Result<()>;

    /// Write an empty line
    fn blank_line(&mut self) -> Result<()>;

    /// Record an import for the generated file
    fn add_import(&mut self, import: &Import);

    /// Write an expression's code after `prefix`/before `suffix`, recording its imports
    fn write_expression(&mut self, prefix: &str, expression: &Expression, suffix: &str) -> Result<()> {
        for import in &expression.imports {
            self.add_import(import);
        }
        self.write_line(&format!("{prefix}{}{suffix}", expression.code))
    }
}

/// In-memory code sink
#[derive(Debug, Default)]
pub struct CodeWriter {
    body: String,
    level: usize,
    imports: BTreeMap<String, BTreeSet<String>>,
}

impl CodeWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Current block depth
    pub fn level(&self) -> usize {
        self.level
    }

    /// Render imports followed by the body
    pub fn finish(self) -> String {
        let mut out = String::new();
        for (from, symbols) in &self.imports {
            let list = symbols.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
            out.push_str(&format!("import {{ {list} }} from {};\n", string_literal(from)));
        }
        if !self.imports.is_empty() && !self.body.is_empty() {
            out.push('\n');
        }
        out.push_str(&self.body);
        out
    }

    fn push_line(&mut self, line: &str) -> Result<()> {
        // Multi-line templates are indented line by line
        for part in line.split('\n') {
            let trimmed = part.trim_end();
            if trimmed.is_empty() {
                self.body.push('\n');
                continue;
            }
            for _ in 0..self.level {
                self.body.push_str(INDENT);
            }
            writeln!(self.body, "{trimmed}")?;
        }
        Ok(())
    }
}

impl CodeSink for CodeWriter {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.push_line(line)
    }

    fn open_block(&mut self, header: &str) -> Result<()> {
        self.push_line(header)?;
        self.level += 1;
        Ok(())
    }

    fn close_block(&mut self, footer: &str) -> Result<()> {
        self.level = self.level.saturating_sub(1);
        self.push_line(footer)
    }

    fn blank_line(&mut self) -> Result<()> {
        self.body.push('\n');
        Ok(())
    }

    fn add_import(&mut self, import: &Import) {
        self.imports
            .entry(import.from.clone())
            .or_default()
            .insert(import.symbol.clone());
    }
}

use std::fmt::Display;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::tokens::TokenValue;

/// One symbol table row. Only `name` is known at lexing time; later phases
/// fill in the declared type and value.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInfo {
    pub name: String,
    pub declared_type: Option<String>,
    pub value: Option<TokenValue>,
}

impl Display for SymbolInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(declared_type) = &self.declared_type {
            write!(f, ": {}", declared_type)?;
        }
        if let Some(value) = &self.value {
            write!(f, " = {}", value)?;
        }
        Ok(())
    }
}

/// Append-only identifier registry. Every occurrence gets its own row.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: Vec<SymbolInfo>,
}

impl SymbolTable {
    pub fn get(&self, index: usize) -> Option<&SymbolInfo> {
        self.entries.get(index)
    }

    /// Index of the first row named `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolInfo> {
        self.entries.iter()
    }
}

/// Append-only registry of integer constants.
#[derive(Debug, Clone, Default)]
pub struct ConstantTable {
    entries: Vec<i64>,
}

impl ConstantTable {
    pub fn get(&self, index: usize) -> Option<i64> {
        self.entries.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.entries.iter().copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub symbols: SymbolTable,
    pub constants: ConstantTable,
}

impl Table {
    pub fn new() -> Self {
        Table {
            symbols: SymbolTable {
                entries: Vec::with_capacity(100),
            },
            constants: ConstantTable {
                entries: Vec::with_capacity(100),
            },
        }
    }

    /// Appends a symbol row for `name` and returns its index.
    pub fn add_identifier(&mut self, name: &str) -> usize {
        self.symbols.entries.push(SymbolInfo {
            name: String::from(name),
            declared_type: None,
            value: None,
        });

        self.symbols.entries.len() - 1
    }

    /// Parses `literal` as an integer, appends it and returns its index.
    ///
    /// The error carries no source location; callers that know one can
    /// rebuild it with [`Error::new`].
    pub fn add_constant(&mut self, literal: &str) -> Result<usize, Error> {
        let value = literal.parse::<i64>().map_err(|_| {
            Error::new(
                ErrorImpl::ConstantParseError {
                    literal: String::from(literal),
                },
                Position::default(),
            )
        })?;
        self.constants.entries.push(value);

        Ok(self.constants.entries.len() - 1)
    }
}

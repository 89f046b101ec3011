use std::collections::HashMap;

use crate::codegen::Address;

/// Leading character that makes a name program-wide.
pub const GLOBAL_SIGIL: char = '$';

pub fn is_global(name: &str) -> bool {
    name.starts_with(GLOBAL_SIGIL)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Local,
    Global,
    Procedure,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub address: Address,
    pub kind: SymbolKind,
}

/// One scope. A name is bound once and keeps its address for the lifetime
/// of the table; iteration follows binding order.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.symbols[i])
    }

    pub fn address(&self, name: &str) -> Option<Address> {
        self.get(name).map(|s| s.address)
    }

    pub fn procedure(&self, name: &str) -> Option<Address> {
        self.get(name)
            .filter(|s| s.kind == SymbolKind::Procedure)
            .map(|s| s.address)
    }

    /// Bind a new name. Returns `false`, leaving the table untouched, if the
    /// name is already bound.
    pub fn declare(&mut self, name: &str, address: Address, kind: SymbolKind) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_string(), self.symbols.len());
        self.symbols.push(Symbol {
            name: name.to_string(),
            address,
            kind,
        });
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_once() {
        let mut table = SymbolTable::new();
        assert!(table.declare("x", 0x1000, SymbolKind::Local));
        assert!(!table.declare("x", 0x2000, SymbolKind::Local));
        assert_eq!(table.address("x"), Some(0x1000));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn procedures_are_looked_up_by_kind() {
        let mut table = SymbolTable::new();
        table.declare("$v", 0x1000, SymbolKind::Global);
        table.declare("main", 0x1002, SymbolKind::Procedure);
        assert_eq!(table.procedure("main"), Some(0x1002));
        assert_eq!(table.procedure("$v"), None);
    }

    #[test]
    fn iteration_follows_binding_order() {
        let mut table = SymbolTable::new();
        for (i, name) in ["c", "a", "b"].iter().enumerate() {
            table.declare(name, i as Address, SymbolKind::Local);
        }
        let names: Vec<_> = table.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}

use super::{Address, Builtin, Function};
use crate::lang::token::Word;
use std::collections::HashMap;
use std::rc::Rc;

/// Handle to an entry in a [`Symbols`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Var,
    Undef,
    Number,
    Str,
    Builtin,
    Function,
    Procedure,
    Keyword,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Kind::*;
        let s = match self {
            Var => "var",
            Undef => "undef",
            Number => "number",
            Str => "string",
            Builtin => "builtin",
            Function => "func",
            Procedure => "proc",
            Keyword => "keyword",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    name: Rc<str>,
    pub(crate) kind: Kind,
    pub(crate) val: f64,
    pub(crate) builtin: Option<Builtin>,
    pub(crate) defn: Option<Address>,
    text: Option<Rc<str>>,
}

impl Symbol {
    fn new(name: Rc<str>, kind: Kind, val: f64) -> Symbol {
        Symbol {
            name,
            kind,
            val,
            builtin: None,
            defn: None,
            text: None,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn kind(&self) -> Kind {
        self.kind
    }
    pub fn val(&self) -> f64 {
        self.val
    }
    pub fn defn(&self) -> Option<Address> {
        self.defn
    }
    pub fn text(&self) -> Option<&Rc<str>> {
        self.text.as_ref()
    }
    pub fn is_assignable(&self) -> bool {
        matches!(self.kind, Kind::Var | Kind::Undef)
    }
}

/// ## Symbol table
///
/// Entries live for the whole session. Installing a name again shadows
/// the earlier entry; literals are installed anonymously.
#[derive(Debug, Clone)]
pub struct Symbols {
    entries: Vec<Symbol>,
    names: HashMap<Rc<str>, SymbolId>,
}

impl Default for Symbols {
    fn default() -> Self {
        let mut symbols = Symbols::empty();
        for word in Word::ALL.iter() {
            symbols.install(&word.to_string(), Kind::Keyword, 0.0);
        }
        for (name, val) in Function::CONSTANTS.iter() {
            symbols.install(name, Kind::Var, *val);
        }
        for (name, f) in Function::BUILTINS.iter() {
            let id = symbols.install(name, Kind::Builtin, 0.0);
            symbols.get_mut(id).builtin = Some(*f);
        }
        symbols
    }
}

impl Symbols {
    pub fn empty() -> Symbols {
        Symbols {
            entries: vec![],
            names: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.names.get(name).copied()
    }

    pub fn install(&mut self, name: &str, kind: Kind, val: f64) -> SymbolId {
        let name: Rc<str> = name.into();
        let id = self.push(Symbol::new(name.clone(), kind, val));
        self.names.insert(name, id);
        id
    }

    /// Existing entry for `name`, or a fresh undefined one.
    pub fn resolve(&mut self, name: &str) -> SymbolId {
        match self.lookup(name) {
            Some(id) => id,
            None => self.install(name, Kind::Undef, 0.0),
        }
    }

    pub fn install_number(&mut self, val: f64) -> SymbolId {
        self.push(Symbol::new("".into(), Kind::Number, val))
    }

    pub fn install_string(&mut self, text: Rc<str>) -> SymbolId {
        let mut symbol = Symbol::new("".into(), Kind::Str, 0.0);
        symbol.text = Some(text);
        self.push(symbol)
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.entries[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.entries[id.0]
    }

    /// Value of a named variable; `None` unless it has been assigned.
    pub fn value_of(&self, name: &str) -> Option<f64> {
        let symbol = self.get(self.lookup(name)?);
        match symbol.kind {
            Kind::Var => Some(symbol.val),
            _ => None,
        }
    }

    fn push(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.entries.len());
        self.entries.push(symbol);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Symbols::default();
        let pi = s.lookup("PI").unwrap();
        assert_eq!(s.get(pi).kind(), Kind::Var);
        let sqrt = s.lookup("sqrt").unwrap();
        assert_eq!(s.get(sqrt).kind(), Kind::Builtin);
        let w = s.lookup("while").unwrap();
        assert_eq!(s.get(w).kind(), Kind::Keyword);
        assert_eq!(s.lookup("x"), None);
    }

    #[test]
    fn test_most_recent_install_wins() {
        let mut s = Symbols::empty();
        let a = s.install("x", Kind::Var, 1.0);
        let b = s.install("x", Kind::Var, 2.0);
        assert_ne!(a, b);
        assert_eq!(s.lookup("x"), Some(b));
        assert_eq!(s.value_of("x"), Some(2.0));
    }

    #[test]
    fn test_literals_are_anonymous() {
        let mut s = Symbols::empty();
        let n = s.install_number(3.0);
        let t = s.install_string("hi".into());
        assert_eq!(s.len(), 2);
        assert_eq!(s.lookup(""), None);
        assert_eq!(s.get(n).val(), 3.0);
        assert_eq!(s.get(t).text().map(|t| t.as_ref()), Some("hi"));
    }
}

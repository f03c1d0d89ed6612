use std::{
    collections::HashSet,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

/// A named symbol, such as an atom or a module name.
///
/// Two symbols are equal when their names are equal. Constructing a `Symbol` does not register it
/// anywhere, that is the job of a [`SymbolTable`].
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Make a symbol with this name
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The name of this symbol
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(src: &str) -> Self {
        Self::new(src)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Symbol {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A table of symbols which exist.
///
/// `atom` and `module` conversions intern into the table. `safe_atom` and `safe_module` only
/// look names up, so that untrusted input cannot grow the table. Callers who need a bounded set
/// of results should pass `allowed` instead, which bypasses the table entirely.
pub trait SymbolTable: Send + Sync {
    /// Return the symbol with this name, creating it if needed
    fn intern(&self, name: &str) -> Symbol;

    /// Return the symbol with this name only if it already exists
    fn lookup(&self, name: &str) -> Option<Symbol>;
}

impl fmt::Debug for dyn SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("SymbolTable")
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_INTERNER: Arc<Interner> = Arc::new(Interner::default());
}

/// An in-memory symbol table
#[derive(Debug, Default)]
pub struct Interner {
    symbols: RwLock<HashSet<Arc<str>>>,
}

impl Interner {
    /// The process-wide table, used when a conversion is not given a table of its own
    pub fn global() -> Arc<Interner> {
        GLOBAL_INTERNER.clone()
    }

    /// Make a table which already contains these names
    pub fn with_symbols<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Self {
        let symbols = names
            .into_iter()
            .map(|name| Arc::from(name.as_ref()))
            .collect();
        Self {
            symbols: RwLock::new(symbols),
        }
    }

    /// Number of symbols in the table
    pub fn len(&self) -> usize {
        self.symbols
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if the table has no symbols
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SymbolTable for Interner {
    fn intern(&self, name: &str) -> Symbol {
        if let Some(existing) = self.lookup(name) {
            return existing;
        }
        let mut symbols = self
            .symbols
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // Another thread may have inserted it between the read and the write
        if let Some(existing) = symbols.get(name) {
            return Symbol(existing.clone());
        }
        let interned: Arc<str> = Arc::from(name);
        symbols.insert(interned.clone());
        Symbol(interned)
    }

    fn lookup(&self, name: &str) -> Option<Symbol> {
        self.symbols
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|existing| Symbol(existing.clone()))
    }
}

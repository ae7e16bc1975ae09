use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::pin::Pin;

// Reserved heads the evaluator dispatches on. When adding a symbol here,
// make sure it is also in RESERVED, or pointer equality breaks.
pub static QUOTE: Symbol = Symbol { name: "quote" };
pub static SYNTAX_QUOTE: Symbol = Symbol {
    name: "syntax-quote",
};
pub static UNQUOTE: Symbol = Symbol { name: "unquote" };
pub static SPLICING_UNQUOTE: Symbol = Symbol {
    name: "splicing-unquote",
};
pub static DEF: Symbol = Symbol { name: "def" };
pub static SET: Symbol = Symbol { name: "set!" };
pub static LET: Symbol = Symbol { name: "let" };
pub static LAMBDA: Symbol = Symbol { name: "lambda" };
pub static DEFN: Symbol = Symbol { name: "defn" };
pub static DEFMACRO: Symbol = Symbol { name: "defmacro" };
pub static COND: Symbol = Symbol { name: "cond" };
pub static AND: Symbol = Symbol { name: "and" };
pub static OR: Symbol = Symbol { name: "or" };
pub static LOOP: Symbol = Symbol { name: "loop" };
pub static ERROR: Symbol = Symbol { name: "error" };
pub static TRY: Symbol = Symbol { name: "try" };
pub static CATCH: Symbol = Symbol { name: "catch" };
pub static SWALLOW: Symbol = Symbol { name: "swallow" };
pub static ERRORS: Symbol = Symbol { name: "errors" };
pub static DOC: Symbol = Symbol { name: "doc" };
pub static EXAMPLES: Symbol = Symbol { name: "examples" };
pub static TRUE: Symbol = Symbol { name: "t" };
pub static DOT: Symbol = Symbol { name: "." };

static RESERVED: [&Symbol; 23] = [
    &QUOTE,
    &SYNTAX_QUOTE,
    &UNQUOTE,
    &SPLICING_UNQUOTE,
    &DEF,
    &SET,
    &LET,
    &LAMBDA,
    &DEFN,
    &DEFMACRO,
    &COND,
    &AND,
    &OR,
    &LOOP,
    &ERROR,
    &TRY,
    &CATCH,
    &SWALLOW,
    &ERRORS,
    &DOC,
    &EXAMPLES,
    &TRUE,
    &DOT,
];

thread_local! {
    static INTERNED: RefCell<Vec<Pin<Box<String>>>> = RefCell::new(vec![]);
}

fn interned_name<T: AsRef<str> + ToString>(name: T) -> &'static str {
    INTERNED.with(|names| {
        let found = names
            .borrow()
            .iter()
            .map(|entry| -> &str { (**entry).as_ref() })
            .find(|&entry| entry == name.as_ref())
            .map(|s| -> &'static str {
                // The string data is pinned and never removed from INTERNED,
                // so the reference stays valid for the life of the thread.
                unsafe { std::mem::transmute(s) }
            });
        if let Some(s) = found {
            return s;
        }

        names.borrow_mut().push(Box::pin(name.to_string()));

        // Recurse; the name is interned now.
        interned_name(name)
    })
}

/// An interned symbol name. Symbols with equal names share the same string
/// allocation, so equality and hashing are pointer operations.
#[derive(Debug, Copy, Clone)]
pub struct Symbol {
    name: &'static str,
}

impl Symbol {
    pub fn new<T: AsRef<str> + ToString>(name: T) -> Self {
        for sym in RESERVED.iter() {
            if sym.name == name.as_ref() {
                return **sym;
            }
        }
        Symbol {
            name: interned_name(name),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(s)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl PartialEq<Symbol> for Symbol {
    fn eq(&self, other: &Symbol) -> bool {
        self.name as *const _ == other.name as *const _
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let id = self.name as *const _ as *const u8 as usize;
        id.hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Symbol) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Symbol) -> std::cmp::Ordering {
        self.name.cmp(other.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_makes_symbols_pointer_equal() {
        let a = Symbol::new("flurble");
        let b = Symbol::new(String::from("flurble"));
        assert_eq!(a, b);
        assert_eq!(a.name() as *const _, b.name() as *const _);
    }

    #[test]
    fn reserved_heads_resolve_to_statics() {
        assert_eq!(Symbol::new("cond"), COND);
        assert_eq!(Symbol::new("syntax-quote"), SYNTAX_QUOTE);
        assert_ne!(Symbol::new("cond"), Symbol::new("condor"));
    }
}

use crate::expression::{Expression, Lambda, Ref};
use crate::symbol::Symbol;
use std::cell::{self, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

#[derive(Clone)]
pub struct EnvRef(Rc<RefCell<Environment>>);

pub type EnvTmpRef<'a> = cell::Ref<'a, Environment>;
pub type EnvMutRef<'a> = cell::RefMut<'a, Environment>;

impl From<Environment> for EnvRef {
    fn from(env: Environment) -> Self {
        EnvRef(Rc::new(RefCell::new(env)))
    }
}

impl EnvRef {
    pub fn borrow(&self) -> EnvTmpRef {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> EnvMutRef {
        self.0.borrow_mut()
    }

    pub fn downgrade(&self) -> EnvWeak {
        EnvWeak(Rc::downgrade(&self.0))
    }

    pub fn as_ptr(&self) -> *const Environment {
        self.0.as_ptr()
    }

    /// A fresh empty frame whose parent is this one.
    pub fn new_child(&self) -> EnvRef {
        Environment::new(Some(self.clone())).into()
    }
}

#[derive(Clone, Default)]
pub struct EnvWeak(Weak<RefCell<Environment>>);

impl EnvWeak {
    pub fn upgrade(&self) -> Option<EnvRef> {
        self.0.upgrade().map(EnvRef)
    }
}

impl std::fmt::Debug for EnvRef {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "<env {:p}>", self.as_ptr())
    }
}

impl std::fmt::Debug for EnvWeak {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "<weak env>")
    }
}

#[derive(Debug)]
enum Entry {
    Value(Expression),
    Closure(Lambda<EnvWeak>),
}

/// One frame in the scope chain: a name table plus an optional parent.
/// Lookup walks parent-ward; the global frame has no parent.
#[derive(Debug)]
pub struct Environment {
    map: HashMap<Symbol, Entry>,
    parent: Option<EnvRef>,
}

impl Environment {
    pub fn new(parent: Option<EnvRef>) -> Environment {
        Environment {
            map: Default::default(),
            parent,
        }
    }

    pub fn parent(&self) -> Option<&EnvRef> {
        self.parent.as_ref()
    }

    pub fn lookup(&self, key: &Symbol) -> Option<Expression> {
        match self.map.get(key) {
            None => self.parent.as_ref().and_then(|p| p.borrow().lookup(key)),
            Some(Entry::Value(expr)) => Some(expr.clone()),
            Some(Entry::Closure(lambda)) => Some(Expression::Lambda(Ref::new(lambda.upgrade()))),
        }
    }

    /// Introduce or overwrite a binding in this frame (`def`).
    pub fn define(&mut self, key: Symbol, expr: Expression) {
        let entry = self.wrap_entry(expr);
        self.map.insert(key, entry);
    }

    /// Update the nearest existing binding (`set!`); None when unbound.
    pub fn set(&mut self, key: &Symbol, expr: Expression) -> Option<()> {
        if self.map.contains_key(key) {
            let entry = self.wrap_entry(expr);
            self.map.insert(*key, entry);
            Some(())
        } else {
            self.parent
                .as_mut()
                .and_then(|p| p.borrow_mut().set(key, expr))
        }
    }

    // A lambda stored in the very environment it closed over would keep that
    // environment alive forever through the Rc cycle; hold those with a weak
    // back edge instead and rebuild the strong handle at lookup.
    fn wrap_entry(&self, expr: Expression) -> Entry {
        match expr {
            Expression::Lambda(lambda) if lambda.env.as_ptr() == self as *const _ => {
                Entry::Closure(lambda.downgrade())
            }
            expr => Entry::Value(expr),
        }
    }

    /// All names visible through the chain, nearest frame first.
    pub fn all_keys(&self) -> Vec<Symbol> {
        let mut keys: Vec<_> = self.map.keys().cloned().collect();
        if let Some(parent) = &self.parent {
            keys.extend(parent.borrow().all_keys());
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_parents() {
        let global: EnvRef = Environment::new(None).into();
        global
            .borrow_mut()
            .define(Symbol::new("x"), Expression::int(1));
        let child = global.new_child();
        assert_eq!(
            child.borrow().lookup(&Symbol::new("x")),
            Some(Expression::int(1))
        );
        assert_eq!(child.borrow().lookup(&Symbol::new("y")), None);
    }

    #[test]
    fn define_shadows_in_nearest_frame() {
        let global: EnvRef = Environment::new(None).into();
        global
            .borrow_mut()
            .define(Symbol::new("x"), Expression::int(1));
        let child = global.new_child();
        child
            .borrow_mut()
            .define(Symbol::new("x"), Expression::int(2));
        assert_eq!(
            child.borrow().lookup(&Symbol::new("x")),
            Some(Expression::int(2))
        );
        assert_eq!(
            global.borrow().lookup(&Symbol::new("x")),
            Some(Expression::int(1))
        );
    }

    #[test]
    fn set_updates_the_nearest_existing_binding() {
        let global: EnvRef = Environment::new(None).into();
        global
            .borrow_mut()
            .define(Symbol::new("x"), Expression::int(1));
        let child = global.new_child();
        assert!(child
            .borrow_mut()
            .set(&Symbol::new("x"), Expression::int(5))
            .is_some());
        assert_eq!(
            global.borrow().lookup(&Symbol::new("x")),
            Some(Expression::int(5))
        );
        assert!(child
            .borrow_mut()
            .set(&Symbol::new("zilch"), Expression::Nil)
            .is_none());
    }
}

use crate::environment::{EnvRef, EnvWeak};
use crate::errors::*;
use crate::symbol::Symbol;
use std::cell::Cell;
use std::rc::Rc;

pub type Ref<T> = Rc<T>;

/// One cons cell. Values are immutable once built; sharing is by `Ref`.
#[derive(Debug, Clone)]
pub struct Pair {
    pub car: Expression,
    pub cdr: Expression,
}

thread_local! {
    static LAMBDA_COUNTER: Cell<u64> = Cell::new(0);
}

fn next_lambda_id() -> u64 {
    LAMBDA_COUNTER.with(|c| {
        let id = c.get();
        c.set(id + 1);
        id
    })
}

/// A user-defined function or macro. Generic over the environment handle so
/// that an environment can hold a closure over itself weakly (see
/// `environment::Entry`); `id` survives the strong/weak round trip and is
/// what identity equality compares.
#[derive(Debug, Clone)]
pub struct Lambda<E = EnvRef> {
    pub id: u64,
    pub name: Option<Symbol>,
    pub params: Vec<Symbol>,
    pub rest: Option<Symbol>,
    pub body: Expression,
    pub doc: Expression,
    pub is_macro: bool,
    pub env: E,
}

impl Lambda<EnvRef> {
    pub fn new(
        name: Option<Symbol>,
        params: Vec<Symbol>,
        rest: Option<Symbol>,
        body: Expression,
        env: EnvRef,
    ) -> Self {
        Lambda {
            id: next_lambda_id(),
            name,
            params,
            rest,
            body,
            doc: Expression::Nil,
            is_macro: false,
            env,
        }
    }

    pub fn downgrade(&self) -> Lambda<EnvWeak> {
        Lambda {
            id: self.id,
            name: self.name,
            params: self.params.clone(),
            rest: self.rest,
            body: self.body.clone(),
            doc: self.doc.clone(),
            is_macro: self.is_macro,
            env: self.env.downgrade(),
        }
    }

    /// The `(lambda ...)` form this function would have been written as.
    pub fn source_form(&self) -> Expression {
        let mut tail = match self.rest {
            Some(rest) => Expression::Atom(rest),
            None => Expression::Nil,
        };
        if self.params.is_empty() && self.rest.is_some() {
            tail = Expression::cons(Expression::Nil, tail);
        } else {
            for param in self.params.iter().rev() {
                tail = Expression::cons(Expression::Atom(*param), tail);
            }
        }
        Expression::cons(
            Expression::Atom(crate::symbol::LAMBDA),
            Expression::cons(tail, self.body.clone()),
        )
    }
}

impl Lambda<EnvWeak> {
    pub fn upgrade(&self) -> Lambda<EnvRef> {
        Lambda {
            id: self.id,
            name: self.name,
            params: self.params.clone(),
            rest: self.rest,
            body: self.body.clone(),
            doc: self.doc.clone(),
            is_macro: self.is_macro,
            // The weak edge only exists while the owning environment is
            // alive, and lookups go through that environment.
            env: self
                .env
                .upgrade()
                .expect("closure environment dropped while still reachable"),
        }
    }
}

pub type NativeFn = fn(&[Expression], &EnvRef) -> Result<Expression>;

/// A named primitive with its metadata; the registry in `builtins` owns one
/// static instance per operation.
pub struct Builtin {
    pub name: &'static str,
    pub doc: &'static str,
    pub args: &'static str,
    pub fixed_arity: usize,
    pub variadic: bool,
    pub examples: &'static [&'static str],
    pub func: NativeFn,
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "<builtin: {}>", self.name)
    }
}

#[derive(Debug, Clone)]
pub enum Expression {
    Nil,
    Atom(Symbol),
    Number(crate::number::Int),
    Pair(Ref<Pair>),
    Builtin(&'static Builtin),
    Lambda(Ref<Lambda>),
}

impl Expression {
    pub fn atom(name: &str) -> Self {
        Expression::Atom(Symbol::new(name))
    }

    pub fn int(i: i64) -> Self {
        Expression::Number(i.into())
    }

    pub fn truth() -> Self {
        Expression::Atom(crate::symbol::TRUE)
    }

    /// The truth predicate: Nil is the only falsy value.
    pub fn is_true(&self) -> bool {
        !matches!(self, Expression::Nil)
    }

    pub fn from_bool(b: bool) -> Self {
        if b {
            Expression::truth()
        } else {
            Expression::Nil
        }
    }

    pub fn cons(car: Expression, cdr: Expression) -> Self {
        Expression::Pair(Ref::new(Pair { car, cdr }))
    }

    /// Build a proper list.
    pub fn from_vec(items: Vec<Expression>) -> Self {
        Self::from_vec_with_tail(items, Expression::Nil)
    }

    /// Build a possibly-dotted list ending in `tail`.
    pub fn from_vec_with_tail(items: Vec<Expression>, tail: Expression) -> Self {
        let mut list = tail;
        for item in items.into_iter().rev() {
            list = Expression::cons(item, list);
        }
        list
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Expression::Nil)
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Expression::Atom(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Expression::Number(_))
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, Expression::Pair(_))
    }

    pub fn is_named(&self, sym: Symbol) -> bool {
        matches!(self, Expression::Atom(s) if *s == sym)
    }

    pub fn try_as_atom(&self) -> Result<Symbol> {
        match self {
            Expression::Atom(s) => Ok(*s),
            other => Err(ErrorKind::TypeError(format!("expected atom, got '{}'", other)).into()),
        }
    }

    pub fn try_as_number(&self) -> Result<&crate::number::Int> {
        match self {
            Expression::Number(n) => Ok(n),
            other => Err(ErrorKind::TypeError(format!("expected number, got '{}'", other)).into()),
        }
    }

    pub fn car(&self) -> Result<&Expression> {
        match self {
            Expression::Pair(p) => Ok(&p.car),
            other => Err(ErrorKind::TypeError(format!("'{}' is not a list", other)).into()),
        }
    }

    pub fn cdr(&self) -> Result<&Expression> {
        match self {
            Expression::Pair(p) => Ok(&p.cdr),
            other => Err(ErrorKind::TypeError(format!("'{}' is not a list", other)).into()),
        }
    }

    pub fn decons(&self) -> Result<(&Expression, &Expression)> {
        match self {
            Expression::Pair(p) => Ok((&p.car, &p.cdr)),
            other => Err(ErrorKind::TypeError(format!("'{}' is not a list", other)).into()),
        }
    }

    /// Iterate the elements of a proper list; yields an error item if the
    /// chain ends in anything but Nil.
    pub fn iter_list(&self) -> ListIter {
        ListIter { cursor: Some(self) }
    }

    /// Collect a proper list into a vector.
    pub fn try_to_vec(&self) -> Result<Vec<Expression>> {
        self.iter_list().map(|x| x.map(Clone::clone)).collect()
    }

    pub fn list_len(&self) -> Result<usize> {
        let mut count = 0;
        for item in self.iter_list() {
            item?;
            count += 1;
        }
        Ok(count)
    }

    /// Rebuild a proper list by applying `f` to each element.
    pub fn map_list<F>(&self, mut f: F) -> Result<Expression>
    where
        F: FnMut(&Expression) -> Result<Expression>,
    {
        let mut items = vec![];
        for item in self.iter_list() {
            items.push(f(item?)?);
        }
        Ok(Expression::from_vec(items))
    }

    /// Recursive structural equality. Builtins compare by name, lambdas by
    /// identity, everything else by shape and content.
    pub fn equal(&self, other: &Expression) -> bool {
        use Expression::*;
        match (self, other) {
            (Nil, Nil) => true,
            (Atom(a), Atom(b)) => a == b,
            (Number(a), Number(b)) => a == b,
            (Pair(a), Pair(b)) => a.car.equal(&b.car) && a.cdr.equal(&b.cdr),
            (Builtin(a), Builtin(b)) => a.name == b.name,
            (Lambda(a), Lambda(b)) => a.id == b.id,
            _ => false,
        }
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Expression) -> bool {
        self.equal(other)
    }
}

pub struct ListIter<'a> {
    cursor: Option<&'a Expression>,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = Result<&'a Expression>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.cursor? {
            Expression::Nil => {
                self.cursor = None;
                None
            }
            Expression::Pair(p) => {
                self.cursor = Some(&p.cdr);
                Some(Ok(&p.car))
            }
            other => {
                let err =
                    ErrorKind::TypeError(format!("improper list ends in '{}'", other)).into();
                self.cursor = None;
                Some(Err(err))
            }
        }
    }
}

fn write_pair(pair: &Pair, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "({}", pair.car)?;
    let mut cursor = &pair.cdr;
    loop {
        match cursor {
            Expression::Nil => break,
            Expression::Pair(p) => {
                write!(f, " {}", p.car)?;
                cursor = &p.cdr;
            }
            tail => {
                write!(f, " . {}", tail)?;
                break;
            }
        }
    }
    write!(f, ")")
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Expression::Nil => write!(f, "()"),
            Expression::Atom(s) => write!(f, "{}", s),
            Expression::Number(n) => write!(f, "{}", n),
            Expression::Pair(p) => write_pair(p, f),
            Expression::Builtin(b) => write!(f, "<builtin: {}>", b.name),
            Expression::Lambda(l) => write!(f, "{}", l.source_form()),
        }
    }
}

/// Print a list without its outer parentheses (`printl`, `screen-write`).
pub fn unwrap_list(expr: &Expression) -> String {
    let s = expr.to_string();
    if s.starts_with('(') && s.ends_with(')') {
        s[1..s.len() - 1].to_string()
    } else {
        s
    }
}

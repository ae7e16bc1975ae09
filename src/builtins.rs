use crate::docs;
use crate::environment::{EnvRef, Environment};
use crate::errors::*;
use crate::expression::{unwrap_list, Builtin, Expression};
use crate::interpreter;
use crate::macros;
use crate::number::{self, Int};
use crate::screen;
use crate::shell;
use crate::symbol::Symbol;
use lazy_static::lazy_static;
use num_traits::{One, ToPrimitive, Zero};
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::cell::Cell;
use std::io::Write;

/// Atoms installed in every fresh global frame; mostly punctuation that the
/// reader cannot spell.
const GLOBAL_ATOMS: &[(&str, &str)] = &[
    ("SPACE", " "),
    ("NEWLINE", "\n"),
    ("TAB", "\t"),
    ("BANG", "!"),
    ("QMARK", "?"),
    ("PERIOD", "."),
    ("COMMA", ","),
    ("COLON", ":"),
    ("HASH", "#"),
    ("ATSIGN", "@"),
    ("CHECK", "✓"),
];

const BOOTSTRAP: &str = include_str!("../lisp/stdlib.lisp");

/// A fresh global frame with the builtin registry and global atoms, but
/// without the standard library.
pub fn core_env() -> EnvRef {
    let env: EnvRef = Environment::new(None).into();
    {
        let mut frame = env.borrow_mut();
        for builtin in REGISTRY.iter() {
            frame.define(Symbol::new(builtin.name), Expression::Builtin(builtin));
        }
        for (name, text) in GLOBAL_ATOMS {
            frame.define(Symbol::new(*name), Expression::atom(text));
        }
        // The canonical truthy constant evaluates to itself.
        frame.define(crate::symbol::TRUE, Expression::truth());
    }
    env
}

/// A fresh interpreter environment: builtins plus the bootstrapped standard
/// library. Each call makes an independent interpreter.
pub fn default_env() -> EnvRef {
    let env = core_env();
    interpreter::load_and_evaluate(BOOTSTRAP, &env)
        .expect("standard library bootstrap must evaluate cleanly");
    env
}

thread_local! {
    static GENSYM_COUNTER: Cell<u64> = Cell::new(0);
}

fn next_gensym(suffix: &str) -> String {
    GENSYM_COUNTER.with(|c| {
        let n = c.get();
        c.set(n + 1);
        format!("<gensym{}-{}>", suffix, n)
    })
}

fn want_list<'a>(arg: &'a Expression) -> Result<&'a Expression> {
    if arg.is_pair() || arg.is_nil() {
        Ok(arg)
    } else {
        Err(ErrorKind::TypeError(format!("'{}' is not a list", arg)).into())
    }
}

fn compare_numbers(args: &[Expression], pred: fn(&Int, &Int) -> bool) -> Result<Expression> {
    let mut prev = args[0].try_as_number()?;
    for arg in &args[1..] {
        let next = arg.try_as_number()?;
        if !pred(prev, next) {
            return Ok(Expression::Nil);
        }
        prev = next;
    }
    Ok(Expression::truth())
}

fn sort_key(value: &Expression) -> Result<SortKey> {
    match value {
        Expression::Number(n) => Ok(SortKey::Num(n.clone())),
        Expression::Atom(s) => Ok(SortKey::Name(s.name())),
        other => Err(ErrorKind::TypeError(format!("'{}' is not a sortable type", other)).into()),
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Num(Int),
    Name(&'static str),
}

fn sort_pairs(mut keyed: Vec<(SortKey, Expression)>) -> Result<Expression> {
    for window in keyed.windows(2) {
        match (&window[0].0, &window[1].0) {
            (SortKey::Num(_), SortKey::Num(_)) | (SortKey::Name(_), SortKey::Name(_)) => {}
            _ => {
                return Err(ErrorKind::TypeError(format!(
                    "{} is not same type as {}",
                    window[1].1, window[0].1
                ))
                .into())
            }
        }
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(Expression::from_vec(
        keyed.into_iter().map(|(_, v)| v).collect(),
    ))
}

fn split_number(text: &str) -> Result<Expression> {
    let mut digits = vec![];
    let mut chars = text.chars().peekable();
    if let Some(&'-') = chars.peek() {
        chars.next();
        match chars.next() {
            Some(d) => digits.push(number::parse(&format!("-{}", d))?),
            None => return Err(ErrorKind::SyntaxError("unexpected end of input".into()).into()),
        }
    }
    for ch in chars {
        digits.push(number::parse(&ch.to_string())?);
    }
    Ok(Expression::from_vec(
        digits.into_iter().map(Expression::Number).collect(),
    ))
}

lazy_static! {
    /// Every primitive operation, with the metadata the help system renders.
    /// The evaluator checks `fixed_arity`/`variadic` before invoking `func`,
    /// so handlers may index their argument slice freely up to the fixed
    /// count.
    pub static ref REGISTRY: Vec<Builtin> = vec![
        Builtin {
            name: "+",
            doc: "Add 0 or more numbers",
            args: "(() . xs)",
            fixed_arity: 0,
            variadic: true,
            examples: &["(+ 1 2 3)", "(+)"],
            func: |args, _| {
                let mut sum = Int::zero();
                for arg in args {
                    sum += arg.try_as_number()?;
                }
                Ok(Expression::Number(sum))
            },
        },
        Builtin {
            name: "-",
            doc: "Subtract 0 or more numbers from the first argument",
            args: "(x . xs)",
            fixed_arity: 1,
            variadic: true,
            examples: &["(- 1 1)", "(- 5 2 1)", "(- 99)"],
            func: |args, _| {
                let first = args[0].try_as_number()?;
                if args.len() == 1 {
                    return Ok(Expression::Number(-first));
                }
                let mut difference = first.clone();
                for arg in &args[1..] {
                    difference -= arg.try_as_number()?;
                }
                Ok(Expression::Number(difference))
            },
        },
        Builtin {
            name: "*",
            doc: "Multiply 0 or more numbers",
            args: "(() . xs)",
            fixed_arity: 0,
            variadic: true,
            examples: &["(* 1 2 3)", "(*)"],
            func: |args, _| {
                let mut product = Int::one();
                for arg in args {
                    product *= arg.try_as_number()?;
                }
                Ok(Expression::Number(product))
            },
        },
        Builtin {
            name: "/",
            doc: "Divide the first argument by the rest",
            args: "(numerator denominator1 . more)",
            fixed_arity: 2,
            variadic: true,
            examples: &["(/ 1 2)", "(/ 12 2 3)"],
            func: |args, _| {
                let mut quotient = args[0].try_as_number()?.clone();
                for arg in &args[1..] {
                    let divisor = arg.try_as_number()?;
                    if divisor.is_zero() {
                        return Err(ErrorKind::DomainError("division by zero".into()).into());
                    }
                    quotient /= divisor;
                }
                Ok(Expression::Number(quotient))
            },
        },
        Builtin {
            name: "rem",
            doc: "Return remainder when second arg divides first",
            args: "(x y)",
            fixed_arity: 2,
            variadic: false,
            examples: &["(rem 5 2)", "(rem 4 2)"],
            func: |args, _| {
                let dividend = args[0].try_as_number()?;
                let divisor = args[1].try_as_number()?;
                if divisor.is_zero() {
                    return Err(ErrorKind::DomainError("division by zero".into()).into());
                }
                Ok(Expression::Number(dividend % divisor))
            },
        },
        Builtin {
            name: "=",
            doc: "Return t if the arguments are equal, () otherwise",
            args: "(x . xs)",
            fixed_arity: 1,
            variadic: true,
            examples: &["(= 1 1)", "(= 1 2)", "(= 'a 'a 'a)"],
            func: |args, _| {
                for arg in &args[1..] {
                    if !args[0].equal(arg) {
                        return Ok(Expression::Nil);
                    }
                }
                Ok(Expression::truth())
            },
        },
        Builtin {
            name: "<",
            doc: "Return t if the arguments are in strictly increasing order, () otherwise",
            args: "(x . xs)",
            fixed_arity: 1,
            variadic: true,
            examples: &["(< 1 2)", "(< 1 1)", "(< 1)"],
            func: |args, _| compare_numbers(args, |a, b| a < b),
        },
        Builtin {
            name: "<=",
            doc: "Return t if the arguments are in increasing or equal order, () otherwise",
            args: "(x . xs)",
            fixed_arity: 1,
            variadic: true,
            examples: &["(<= 1 2)", "(<= 1 1)", "(<= 1)"],
            func: |args, _| compare_numbers(args, |a, b| a <= b),
        },
        Builtin {
            name: ">",
            doc: "Return t if the arguments are in strictly decreasing order, () otherwise",
            args: "(x . xs)",
            fixed_arity: 1,
            variadic: true,
            examples: &["(> 2 1)", "(> 1 1)"],
            func: |args, _| compare_numbers(args, |a, b| a > b),
        },
        Builtin {
            name: ">=",
            doc: "Return t if the arguments are in decreasing or equal order, () otherwise",
            args: "(x . xs)",
            fixed_arity: 1,
            variadic: true,
            examples: &["(>= 2 1)", "(>= 1 1)"],
            func: |args, _| compare_numbers(args, |a, b| a >= b),
        },
        Builtin {
            name: "isqrt",
            doc: "Integer square root",
            args: "(x)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(isqrt 4)", "(isqrt 5)"],
            func: |args, _| {
                let n = args[0].try_as_number()?;
                number::isqrt(n).map(Expression::Number)
            },
        },
        Builtin {
            name: "car",
            doc: "Return the first element of a list",
            args: "(x)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(car '(one two))", "(car ())"],
            func: |args, _| match want_list(&args[0])? {
                Expression::Nil => Ok(Expression::Nil),
                list => Ok(list.car()?.clone()),
            },
        },
        Builtin {
            name: "cdr",
            doc: "Return a list with the first element removed",
            args: "(x)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(cdr '(one two))", "(cdr ())"],
            func: |args, _| match want_list(&args[0])? {
                Expression::Nil => Ok(Expression::Nil),
                list => Ok(list.cdr()?.clone()),
            },
        },
        Builtin {
            name: "cons",
            doc: "Add an element to the front of a (possibly empty) list",
            args: "(x xs)",
            fixed_arity: 2,
            variadic: false,
            examples: &["(cons 1 '(one two))", "(cons 1 ())", "(cons 1 2)"],
            func: |args, _| Ok(Expression::cons(args[0].clone(), args[1].clone())),
        },
        Builtin {
            name: "list",
            doc: "Return a list of the given arguments",
            args: "(() . xs)",
            fixed_arity: 0,
            variadic: true,
            examples: &["(list 1 2 3)", "(list)"],
            func: |args, _| Ok(Expression::from_vec(args.to_vec())),
        },
        Builtin {
            name: "list?",
            doc: "Return t if the argument is a list, () otherwise",
            args: "(x)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(list? '(1 2 3))", "(list? 1)"],
            func: |args, _| Ok(Expression::from_bool(args[0].is_pair() || args[0].is_nil())),
        },
        Builtin {
            name: "len",
            doc: "Return the length of a list",
            args: "(x)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(len '(a b c))", "(len ())"],
            func: |args, _| {
                let count = want_list(&args[0])?.list_len()?;
                Ok(Expression::Number(count.into()))
            },
        },
        Builtin {
            name: "sort",
            doc: "Sort a list",
            args: "(xs)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(sort '(3 2 1))", "(sort '(c b a))", "(sort ())"],
            func: |args, _| {
                let items = want_list(&args[0])?.try_to_vec()?;
                let keyed = items
                    .into_iter()
                    .map(|item| sort_key(&item).map(|key| (key, item)))
                    .collect::<Result<Vec<_>>>()?;
                sort_pairs(keyed)
            },
        },
        Builtin {
            name: "sort-by",
            doc: "Sort a list by a function",
            args: "(f xs)",
            fixed_arity: 2,
            variadic: false,
            examples: &["(sort-by car '((3) (2) (1)))", "(sort-by second '((a 2) (b 1)))"],
            func: |args, env| {
                let items = want_list(&args[1])?.try_to_vec()?;
                let keyed = items
                    .into_iter()
                    .map(|item| {
                        let key = interpreter::call(&args[0], vec![item.clone()], env)?;
                        sort_key(&key).map(|key| (key, item))
                    })
                    .collect::<Result<Vec<_>>>()?;
                sort_pairs(keyed)
            },
        },
        Builtin {
            name: "shuffle",
            doc: "Return a shuffled list",
            args: "(xs)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(len (shuffle (range 10)))"],
            func: |args, _| {
                let mut items = want_list(&args[0])?.try_to_vec()?;
                items.shuffle(&mut thread_rng());
                Ok(Expression::from_vec(items))
            },
        },
        Builtin {
            name: "apply",
            doc: "Apply a function to a list of arguments",
            args: "(f . args-and-list)",
            fixed_arity: 2,
            variadic: true,
            examples: &["(apply + '(1 2 3))", "(apply cons 1 '(()))"],
            func: |args, env| {
                let spread = args.last().map(want_list).transpose()?;
                let mut argv: Vec<Expression> = args[1..args.len() - 1].to_vec();
                if let Some(list) = spread {
                    for item in list.iter_list() {
                        argv.push(item?.clone());
                    }
                }
                interpreter::call(&args[0], argv, env)
            },
        },
        Builtin {
            name: "atom?",
            doc: "Return t if the argument is an atom, () otherwise",
            args: "(x)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(atom? 'one)", "(atom? 1)"],
            func: |args, _| Ok(Expression::from_bool(args[0].is_atom())),
        },
        Builtin {
            name: "number?",
            doc: "Return t if the argument is a number, () otherwise",
            args: "(x)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(number? 1)", "(number? 't)"],
            func: |args, _| Ok(Expression::from_bool(args[0].is_number())),
        },
        Builtin {
            name: "not",
            doc: "Return t if the argument is nil, () otherwise",
            args: "(x)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(not ())", "(not t)", "(not '(1 2 3))"],
            func: |args, _| Ok(Expression::from_bool(!args[0].is_true())),
        },
        Builtin {
            name: "fuse",
            doc: "Fuse a list of numbers or atoms into a single atom or number",
            args: "(x)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(fuse '(a b c))", "(fuse '(1 2 3))"],
            func: |args, _| {
                if args[0].is_nil() {
                    return Ok(Expression::Nil);
                }
                let mut text = String::new();
                for item in want_list(&args[0])?.iter_list() {
                    text.push_str(&item?.to_string());
                }
                let starts_numeric = text.chars().next().map_or(false, |c| c.is_ascii_digit());
                if starts_numeric {
                    if let Ok(n) = number::parse(&text) {
                        return Ok(Expression::Number(n));
                    }
                }
                Ok(Expression::atom(&text))
            },
        },
        Builtin {
            name: "split",
            doc: "Split an atom or number into single-character atoms or single-digit numbers",
            args: "(x)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(split 123)", "(split 'abc)"],
            func: |args, _| match &args[0] {
                Expression::Atom(s) => Ok(Expression::from_vec(
                    s.name()
                        .chars()
                        .map(|ch| Expression::atom(&ch.to_string()))
                        .collect(),
                )),
                Expression::Number(n) => split_number(&n.to_string()),
                other => Err(ErrorKind::TypeError(format!(
                    "split expects an atom or a number, got '{}'",
                    other
                ))
                .into()),
            },
        },
        Builtin {
            name: "upcase",
            doc: "Return the uppercase version of the given atom",
            args: "(x)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(upcase 'abc)"],
            func: |args, _| {
                let s = args[0].try_as_atom()?;
                Ok(Expression::atom(&s.name().to_uppercase()))
            },
        },
        Builtin {
            name: "downcase",
            doc: "Return a new atom with all characters in lower case",
            args: "(x)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(downcase 'ABC)"],
            func: |args, _| {
                let s = args[0].try_as_atom()?;
                Ok(Expression::atom(&s.name().to_lowercase()))
            },
        },
        Builtin {
            name: "gensym",
            doc: "Return a new, unique atom",
            args: "(() . prefix)",
            fixed_arity: 0,
            variadic: true,
            examples: &["(atom? (gensym))"],
            func: |args, _| {
                let suffix = match args {
                    [] => String::new(),
                    [prefix] => format!("-{}", prefix.try_as_atom()?),
                    _ => {
                        return Err(ErrorKind::ArityError(
                            "gensym expects 0 or 1 arguments".into(),
                        )
                        .into())
                    }
                };
                Ok(Expression::atom(&next_gensym(&suffix)))
            },
        },
        Builtin {
            name: "doc",
            doc: "Return the doclist for a function",
            args: "(f)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(doc doc)"],
            func: |args, _| match &args[0] {
                Expression::Lambda(lambda) => Ok(lambda.doc.clone()),
                Expression::Builtin(builtin) => Ok(Expression::from_vec(
                    builtin
                        .doc
                        .split_whitespace()
                        .map(Expression::atom)
                        .collect(),
                )),
                other => {
                    Err(ErrorKind::TypeError(format!("'{}' is not a function", other)).into())
                }
            },
        },
        Builtin {
            name: "body",
            doc: "Return the body of a lambda function",
            args: "(f)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(body (lambda (x) (+ x 1)))"],
            func: |args, _| match &args[0] {
                Expression::Lambda(lambda) => Ok(lambda.body.clone()),
                other => Err(ErrorKind::TypeError(format!(
                    "expected lambda function, got '{}'",
                    other
                ))
                .into()),
            },
        },
        Builtin {
            name: "source",
            doc: "Show source for a function",
            args: "(f)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(source (lambda (x) x))"],
            func: |args, _| match &args[0] {
                Expression::Lambda(lambda) => Ok(lambda.source_form()),
                Expression::Builtin(builtin) => Err(ErrorKind::TypeError(format!(
                    "cannot get source of builtin function <builtin: {}>",
                    builtin.name
                ))
                .into()),
                other => {
                    Err(ErrorKind::TypeError(format!("'{}' is not a function", other)).into())
                }
            },
        },
        Builtin {
            name: "forms",
            doc: "Return available operators, as a list",
            args: "()",
            fixed_arity: 0,
            variadic: false,
            examples: &["(number? (len (forms)))"],
            func: |_, env| {
                Ok(Expression::from_vec(
                    docs::form_names(env)
                        .into_iter()
                        .map(Expression::Atom)
                        .collect(),
                ))
            },
        },
        Builtin {
            name: "macroexpand-1",
            doc: "Expand a macro invocation one step",
            args: "(x)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(macroexpand-1 '(+ x 1))"],
            func: |args, env| macros::macroexpand_1(&args[0], env),
        },
        Builtin {
            name: "version",
            doc: "Return the version of the interpreter",
            args: "()",
            fixed_arity: 0,
            variadic: false,
            examples: &["(version)"],
            func: |_, _| {
                let parts = env!("CARGO_PKG_VERSION")
                    .split('.')
                    .filter_map(|part| number::parse(part).ok())
                    .map(Expression::Number)
                    .collect();
                Ok(Expression::from_vec(parts))
            },
        },
        Builtin {
            name: "help",
            doc: "Print a summary of available operators",
            args: "()",
            fixed_arity: 0,
            variadic: false,
            examples: &[],
            func: |_, env| {
                println!("{}", docs::short_doc(env));
                Ok(Expression::Nil)
            },
        },
        Builtin {
            name: "print",
            doc: "Print the arguments",
            args: "(() . xs)",
            fixed_arity: 0,
            variadic: true,
            examples: &[],
            func: |args, _| {
                let texts: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                print!("{}", texts.join(" "));
                std::io::stdout().flush()?;
                Ok(Expression::Nil)
            },
        },
        Builtin {
            name: "println",
            doc: "Print the arguments and a newline",
            args: "(() . xs)",
            fixed_arity: 0,
            variadic: true,
            examples: &[],
            func: |args, _| {
                let texts: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                println!("{}", texts.join(" "));
                Ok(Expression::Nil)
            },
        },
        Builtin {
            name: "printl",
            doc: "Print a list argument, without parentheses",
            args: "(x)",
            fixed_arity: 1,
            variadic: false,
            examples: &[],
            func: |args, _| {
                let list = want_list(&args[0])?;
                println!("{}", unwrap_list(list));
                Ok(Expression::Nil)
            },
        },
        Builtin {
            name: "readlist",
            doc: "Read a list from stdin",
            args: "()",
            fixed_arity: 0,
            variadic: false,
            examples: &[],
            func: |_, _| {
                let mut line = String::new();
                std::io::stdin().read_line(&mut line)?;
                let tokens = crate::lexer::tokenize(&line)?;
                let exprs = crate::parser::parse_all(&tokens)?;
                Ok(Expression::from_vec(exprs))
            },
        },
        Builtin {
            name: "load",
            doc: "Load and execute a file",
            args: "(filename)",
            fixed_arity: 1,
            variadic: false,
            examples: &[],
            func: |args, env| {
                let name = args[0].try_as_atom()?;
                let text = std::fs::read_to_string(name.name()).map_err(|e| {
                    Error::new(ErrorKind::GenericError(format!(
                        "cannot load file '{}': {}",
                        name, e
                    )))
                })?;
                interpreter::load_and_evaluate(&text, env)?;
                Ok(Expression::Nil)
            },
        },
        Builtin {
            name: "eval",
            doc: "Evaluate an expression",
            args: "(x)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(eval '(+ 1 2))"],
            func: |args, env| interpreter::eval(&args[0], env.clone()),
        },
        Builtin {
            name: "sleep",
            doc: "Sleep for the given number of milliseconds",
            args: "(ms)",
            fixed_arity: 1,
            variadic: false,
            examples: &[],
            func: |args, _| {
                let ms = args[0]
                    .try_as_number()?
                    .to_u64()
                    .ok_or_else(|| {
                        Error::new(ErrorKind::DomainError(
                            "sleep duration out of range".into(),
                        ))
                    })?;
                std::thread::sleep(std::time::Duration::from_millis(ms));
                Ok(Expression::Nil)
            },
        },
        Builtin {
            name: "randint",
            doc: "Return a random integer between 0 and the argument minus 1",
            args: "(x)",
            fixed_arity: 1,
            variadic: false,
            examples: &["(< (randint 10) 10)"],
            func: |args, _| {
                let n = args[0].try_as_number()?;
                if *n <= Int::zero() {
                    return Err(ErrorKind::DomainError(
                        "randint expects a positive argument".into(),
                    )
                    .into());
                }
                Ok(Expression::Number(number::rand_below(n)))
            },
        },
        Builtin {
            name: "exit",
            doc: "Exit the program",
            args: "()",
            fixed_arity: 0,
            variadic: false,
            examples: &[],
            func: |_, _| std::process::exit(0),
        },
        Builtin {
            name: "test",
            doc: "Establish a testing block (return last expression)",
            args: "(() . exprs)",
            fixed_arity: 0,
            variadic: true,
            examples: &[],
            func: |args, _| {
                let (first, rest) = match args.split_first() {
                    None => return Ok(Expression::Nil),
                    Some(parts) => parts,
                };
                print!("TEST {} ", first);
                for _ in rest {
                    print!(".");
                }
                println!("✓");
                Ok(args[args.len() - 1].clone())
            },
        },
        Builtin {
            name: "screen-start",
            doc: "Start screen for text UIs",
            args: "()",
            fixed_arity: 0,
            variadic: false,
            examples: &[],
            func: |_, _| screen::start().map(|_| Expression::Nil),
        },
        Builtin {
            name: "screen-end",
            doc: "Stop screen for text UIs, return to console mode",
            args: "()",
            fixed_arity: 0,
            variadic: false,
            examples: &[],
            func: |_, _| screen::end().map(|_| Expression::Nil),
        },
        Builtin {
            name: "screen-clear",
            doc: "Clear the screen",
            args: "()",
            fixed_arity: 0,
            variadic: false,
            examples: &[],
            func: |_, _| screen::clear().map(|_| Expression::Nil),
        },
        Builtin {
            name: "screen-size",
            doc: "Return the screen size (width height)",
            args: "()",
            fixed_arity: 0,
            variadic: false,
            examples: &[],
            func: |_, _| {
                let (width, height) = screen::size()?;
                Ok(Expression::from_vec(vec![
                    Expression::Number(width.into()),
                    Expression::Number(height.into()),
                ]))
            },
        },
        Builtin {
            name: "screen-get-key",
            doc: "Return a keystroke as an atom",
            args: "()",
            fixed_arity: 0,
            variadic: false,
            examples: &[],
            func: |_, _| {
                let key = screen::get_key()?;
                Ok(Expression::atom(&key))
            },
        },
        Builtin {
            name: "screen-write",
            doc: "Write a list to the screen at the given position",
            args: "(x y list)",
            fixed_arity: 3,
            variadic: false,
            examples: &[],
            func: |args, _| {
                let x = args[0].try_as_number()?.to_u16().ok_or_else(|| {
                    Error::new(ErrorKind::DomainError("x position out of range".into()))
                })?;
                let y = args[1].try_as_number()?.to_u16().ok_or_else(|| {
                    Error::new(ErrorKind::DomainError("y position out of range".into()))
                })?;
                let text = unwrap_list(want_list(&args[2])?);
                screen::draw_text(x, y, &text)?;
                Ok(Expression::Nil)
            },
        },
        Builtin {
            name: "shell",
            doc: "Run a shell subprocess, and return stdout, stderr, and exit code",
            args: "(cmd)",
            fixed_arity: 1,
            variadic: false,
            examples: &[],
            func: |args, _| shell::run(&args[0]),
        },
    ];
}

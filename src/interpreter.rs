use crate::environment::EnvRef;
use crate::errors::*;
use crate::expression::{Builtin, Expression, Lambda, Ref};
use crate::lexer;
use crate::macros;
use crate::parser;
use crate::special_forms;
use log::trace;
use std::borrow::Cow;

/// What one evaluation step produced: either a finished value, or the
/// expression/environment pair the trampoline should continue with. Tail
/// positions always come back as `Tail`, so a chain of tail calls consumes
/// no host stack.
pub enum Flow {
    Value(Expression),
    Tail(Expression, EnvRef),
}

pub fn eval(expr: &Expression, mut env: EnvRef) -> Result<Expression> {
    use Expression::*;

    // Cow is not for copy-on-write here; it lets the loop variable hold
    // either the caller's expression or an owned tail expression.
    let mut expr = Cow::Borrowed(expr);

    loop {
        trace!("eval {}", expr);
        match &*expr {
            Nil | Number(_) | Builtin(_) | Lambda(_) => return Ok(expr.into_owned()),
            Atom(s) => {
                return env
                    .borrow()
                    .lookup(s)
                    .ok_or_else(|| ErrorKind::Unbound(*s).into());
            }
            Pair(_) => {
                let flow = match special_forms::special_head(&expr) {
                    Some(sym) => special_forms::apply_special(sym, expr.cdr()?, &env)?,
                    None => combination(&expr, &env)
                        .map_err(|e| e.with_context((*expr).clone()))?,
                };
                match flow {
                    Flow::Value(value) => return Ok(value),
                    Flow::Tail(tail, tail_env) => {
                        expr = Cow::Owned(tail);
                        env = tail_env;
                    }
                }
            }
        }
    }
}

// A non-special combination: evaluate the head, then either expand a macro,
// call a builtin, or enter a lambda body in tail position.
fn combination(expr: &Expression, env: &EnvRef) -> Result<Flow> {
    let (head, args) = expr.decons()?;
    let callee = eval(head, env.clone())?;
    match callee {
        Expression::Lambda(lambda) if lambda.is_macro => {
            let expanded = macros::expand_once(&lambda, args)?;
            Ok(Flow::Tail(expanded, env.clone()))
        }
        Expression::Builtin(builtin) => {
            let argv = eval_args(args, env)?;
            check_builtin_arity(builtin, argv.len())?;
            (builtin.func)(&argv, env).map(Flow::Value)
        }
        Expression::Lambda(lambda) => {
            let argv = eval_args(args, env)?;
            let call_env = bind_call_env(&lambda, argv)?;
            eval_body(&lambda.body, &call_env)
        }
        other => Err(ErrorKind::TypeError(format!("'{}' is not a function", other)).into()),
    }
}

/// Evaluate an argument list left to right.
pub fn eval_args(args: &Expression, env: &EnvRef) -> Result<Vec<Expression>> {
    let mut argv = vec![];
    for arg in args.iter_list() {
        argv.push(eval(arg?, env.clone())?);
    }
    Ok(argv)
}

/// Evaluate all but the last form of a body for effect; the last form is
/// continued in tail position. An empty body yields Nil.
pub fn eval_body(body: &Expression, env: &EnvRef) -> Result<Flow> {
    let mut forms = body.try_to_vec()?;
    match forms.pop() {
        None => Ok(Flow::Value(Expression::Nil)),
        Some(last) => {
            for form in &forms {
                eval(form, env.clone())?;
            }
            Ok(Flow::Tail(last, env.clone()))
        }
    }
}

/// Bind arguments in a fresh child of the lambda's captured environment:
/// fixed parameters positionally, surplus bundled under the rest name, and
/// the self-name (if any) bound to the lambda itself.
pub fn bind_call_env(lambda: &Ref<Lambda>, mut argv: Vec<Expression>) -> Result<EnvRef> {
    let fixed = lambda.params.len();
    if lambda.rest.is_some() {
        if argv.len() < fixed {
            return Err(ErrorKind::ArityError(format!(
                "function expects at least {} argument(s), got {}",
                fixed,
                argv.len()
            ))
            .into());
        }
    } else if argv.len() != fixed {
        return Err(ErrorKind::ArityError(format!(
            "function expects {} argument(s), got {}",
            fixed,
            argv.len()
        ))
        .into());
    }

    let call_env = lambda.env.new_child();
    {
        let mut frame = call_env.borrow_mut();
        let rest_args = argv.split_off(fixed);
        for (param, value) in lambda.params.iter().zip(argv) {
            frame.define(*param, value);
        }
        if let Some(rest) = lambda.rest {
            frame.define(rest, Expression::from_vec(rest_args));
        }
        if let Some(name) = lambda.name {
            frame.define(name, Expression::Lambda(lambda.clone()));
        }
    }
    Ok(call_env)
}

pub fn check_builtin_arity(builtin: &Builtin, argc: usize) -> Result<()> {
    if builtin.variadic {
        if argc < builtin.fixed_arity {
            return Err(ErrorKind::ArityError(format!(
                "{} expects at least {} argument(s), got {}",
                builtin.name, builtin.fixed_arity, argc
            ))
            .into());
        }
    } else if argc != builtin.fixed_arity {
        return Err(ErrorKind::ArityError(format!(
            "{} expects {} argument(s), got {}",
            builtin.name, builtin.fixed_arity, argc
        ))
        .into());
    }
    Ok(())
}

/// Apply an already-evaluated callable to a vector of already-evaluated
/// arguments. Used by `apply`, `sort-by` and the doc example runner; this
/// entry re-enters the trampoline, so it is not itself tail-recursive.
pub fn call(callee: &Expression, argv: Vec<Expression>, env: &EnvRef) -> Result<Expression> {
    match callee {
        Expression::Builtin(builtin) => {
            check_builtin_arity(builtin, argv.len())?;
            (builtin.func)(&argv, env)
        }
        Expression::Lambda(lambda) => {
            let call_env = bind_call_env(lambda, argv)?;
            match eval_body(&lambda.body, &call_env)? {
                Flow::Value(value) => Ok(value),
                Flow::Tail(tail, tail_env) => eval(&tail, tail_env),
            }
        }
        other => Err(ErrorKind::TypeError(format!("'{}' is not a function", other)).into()),
    }
}

/// The single core entry: lex, parse and evaluate a source text against an
/// environment, returning the value of the last top-level expression.
pub fn load_and_evaluate(src: &str, env: &EnvRef) -> Result<Expression> {
    let tokens = lexer::tokenize(src)?;
    let exprs = parser::parse_all(&tokens)?;
    let mut result = Expression::Nil;
    for expr in &exprs {
        result = eval(expr, env.clone())?;
    }
    Ok(result)
}

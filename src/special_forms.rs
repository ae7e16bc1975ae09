use crate::environment::EnvRef;
use crate::errors::*;
use crate::expression::{Expression, Lambda, Ref};
use crate::interpreter::{eval, eval_body, Flow};
use crate::symbol::{self, Symbol};

pub fn is_special(sym: Symbol) -> bool {
    sym == symbol::QUOTE
        || sym == symbol::SYNTAX_QUOTE
        || sym == symbol::UNQUOTE
        || sym == symbol::SPLICING_UNQUOTE
        || sym == symbol::DEF
        || sym == symbol::SET
        || sym == symbol::LET
        || sym == symbol::LAMBDA
        || sym == symbol::DEFN
        || sym == symbol::DEFMACRO
        || sym == symbol::COND
        || sym == symbol::AND
        || sym == symbol::OR
        || sym == symbol::LOOP
        || sym == symbol::ERROR
        || sym == symbol::TRY
        || sym == symbol::SWALLOW
        || sym == symbol::ERRORS
}

/// The head atom of a combination, when it names a special form.
pub fn special_head(expr: &Expression) -> Option<Symbol> {
    match expr.car() {
        Ok(Expression::Atom(s)) if is_special(*s) => Some(*s),
        _ => None,
    }
}

/// Dispatch a special form on its unevaluated argument list.
pub fn apply_special(sym: Symbol, args: &Expression, env: &EnvRef) -> Result<Flow> {
    match sym {
        s if s == symbol::QUOTE => quote_form(args),
        s if s == symbol::SYNTAX_QUOTE => syntax_quote_form(args, env),
        s if s == symbol::UNQUOTE || s == symbol::SPLICING_UNQUOTE => Err(ErrorKind::SyntaxError(
            format!("{} outside syntax-quote", sym),
        )
        .into()),
        s if s == symbol::DEF => def_form(args, env),
        s if s == symbol::SET => set_form(args, env),
        s if s == symbol::LET => let_form(args, env),
        s if s == symbol::LAMBDA => lambda_form(args, env),
        s if s == symbol::DEFN => defn_form(args, env, false),
        s if s == symbol::DEFMACRO => defn_form(args, env, true),
        s if s == symbol::COND => cond_form(args, env),
        s if s == symbol::AND => and_form(args, env),
        s if s == symbol::OR => or_form(args, env),
        s if s == symbol::LOOP => loop_form(args, env),
        s if s == symbol::ERROR => error_form(args, env),
        s if s == symbol::TRY => try_form(args, env),
        s if s == symbol::SWALLOW => swallow_form(args, env),
        s if s == symbol::ERRORS => errors_form(args, env),
        _ => unreachable!("not a special form: {}", sym),
    }
}

// Exactly one argument, unevaluated.
fn single_arg(name: &str, args: &Expression) -> Result<Expression> {
    let (first, tail) = args.decons().map_err(|_| {
        Error::new(ErrorKind::ArityError(format!("{} expects 1 argument", name)))
    })?;
    if !tail.is_nil() {
        return Err(ErrorKind::ArityError(format!("{} expects 1 argument", name)).into());
    }
    Ok(first.clone())
}

fn quote_form(args: &Expression) -> Result<Flow> {
    single_arg("quote", args).map(Flow::Value)
}

fn syntax_quote_form(args: &Expression, env: &EnvRef) -> Result<Flow> {
    let template = single_arg("syntax-quote", args)?;
    quasiquote(&template, 1, env).map(Flow::Value)
}

// Depth accounting: each syntax-quote adds a level, each unquote removes
// one. Only level-1 unquotes evaluate; deeper ones are kept literally with
// their payload processed one level down.
fn quasiquote(expr: &Expression, depth: u32, env: &EnvRef) -> Result<Expression> {
    let pair = match expr {
        Expression::Pair(p) => p,
        _ => return Ok(expr.clone()),
    };

    if pair.car.is_named(symbol::UNQUOTE) {
        let payload = single_arg("unquote", &pair.cdr)?;
        if depth == 1 {
            return eval(&payload, env.clone());
        }
        return Ok(Expression::from_vec(vec![
            Expression::Atom(symbol::UNQUOTE),
            quasiquote(&payload, depth - 1, env)?,
        ]));
    }
    if pair.car.is_named(symbol::SYNTAX_QUOTE) {
        let payload = single_arg("syntax-quote", &pair.cdr)?;
        return Ok(Expression::from_vec(vec![
            Expression::Atom(symbol::SYNTAX_QUOTE),
            quasiquote(&payload, depth + 1, env)?,
        ]));
    }
    if pair.car.is_named(symbol::SPLICING_UNQUOTE) {
        return Err(
            ErrorKind::SyntaxError("splicing-unquote outside of a list".to_string()).into(),
        );
    }

    let mut items = vec![];
    let mut cursor = expr;
    loop {
        match cursor {
            Expression::Nil => return Ok(Expression::from_vec(items)),
            Expression::Pair(p) => {
                let element = &p.car;
                let spliced = match element {
                    Expression::Pair(inner) if inner.car.is_named(symbol::SPLICING_UNQUOTE) => {
                        let payload = single_arg("splicing-unquote", &inner.cdr)?;
                        if depth == 1 {
                            let value = eval(&payload, env.clone())?;
                            for item in value.iter_list() {
                                items.push(item.map_err(|_| {
                                    Error::new(ErrorKind::TypeError(format!(
                                        "splicing-unquote of a non-list: {}",
                                        value
                                    )))
                                })?
                                .clone());
                            }
                            true
                        } else {
                            items.push(Expression::from_vec(vec![
                                Expression::Atom(symbol::SPLICING_UNQUOTE),
                                quasiquote(&payload, depth - 1, env)?,
                            ]));
                            true
                        }
                    }
                    _ => false,
                };
                if !spliced {
                    items.push(quasiquote(element, depth, env)?);
                }
                cursor = &p.cdr;
            }
            tail => {
                let tail = quasiquote(tail, depth, env)?;
                return Ok(Expression::from_vec_with_tail(items, tail));
            }
        }
    }
}

fn def_form(args: &Expression, env: &EnvRef) -> Result<Flow> {
    let (name, rest) = args.decons()?;
    let name = name.try_as_atom()?;
    let value_expr = single_arg("def", rest)?;
    let value = eval(&value_expr, env.clone())?;
    env.borrow_mut().define(name, value.clone());
    Ok(Flow::Value(value))
}

fn set_form(args: &Expression, env: &EnvRef) -> Result<Flow> {
    let (name, rest) = args.decons()?;
    let name = name.try_as_atom()?;
    let value_expr = single_arg("set!", rest)?;
    let value = eval(&value_expr, env.clone())?;
    env.borrow_mut()
        .set(&name, value.clone())
        .ok_or(ErrorKind::Unbound(name))?;
    Ok(Flow::Value(value))
}

fn let_form(args: &Expression, env: &EnvRef) -> Result<Flow> {
    let (bindings, body) = args.decons()?;
    let local = env.new_child();
    for binding in bindings.iter_list() {
        let binding = binding?;
        let (name, rest) = binding.decons().map_err(|_| {
            Error::new(ErrorKind::TypeError(format!(
                "let binding must be a (name value) pair, got '{}'",
                binding
            )))
        })?;
        let name = name.try_as_atom()?;
        let value_expr = single_arg("let binding", rest)?;
        // Sequential: later bindings see earlier ones.
        let value = eval(&value_expr, local.clone())?;
        local.borrow_mut().define(name, value);
    }
    eval_body(body, &local)
}

// A parameter list is a possibly-dotted list of distinct atoms; the dotted
// tail is the rest parameter. `(() . xs)` declares no fixed parameters.
fn parse_params(expr: &Expression) -> Result<(Vec<Symbol>, Option<Symbol>)> {
    let mut params = vec![];
    let mut rest = None;
    let mut cursor = expr;
    loop {
        match cursor {
            Expression::Nil => break,
            Expression::Pair(p) => {
                match &p.car {
                    Expression::Atom(s) => params.push(*s),
                    Expression::Nil if params.is_empty() => {}
                    other => {
                        return Err(ErrorKind::TypeError(format!(
                            "parameter must be an atom, got '{}'",
                            other
                        ))
                        .into())
                    }
                }
                cursor = &p.cdr;
            }
            Expression::Atom(s) => {
                rest = Some(*s);
                break;
            }
            other => {
                return Err(ErrorKind::TypeError(format!(
                    "malformed parameter list tail '{}'",
                    other
                ))
                .into())
            }
        }
    }
    for (i, param) in params.iter().enumerate() {
        if params[..i].contains(param) || rest == Some(*param) {
            return Err(
                ErrorKind::TypeError(format!("duplicate parameter name '{}'", param)).into(),
            );
        }
    }
    Ok((params, rest))
}

fn make_lambda(
    name: Option<Symbol>,
    params_expr: &Expression,
    body: &Expression,
    env: &EnvRef,
) -> Result<Lambda> {
    let (params, rest) = parse_params(params_expr)?;
    // The body must be a proper list even when it is never fully evaluated.
    body.list_len()?;
    Ok(Lambda::new(name, params, rest, body.clone(), env.clone()))
}

fn lambda_form(args: &Expression, env: &EnvRef) -> Result<Flow> {
    let (first, rest) = args.decons()?;
    let lambda = match first {
        // (lambda name (params...) body...)
        Expression::Atom(name) => {
            let (params, body) = rest.decons()?;
            make_lambda(Some(*name), params, body, env)?
        }
        _ => make_lambda(None, first, rest, env)?,
    };
    Ok(Flow::Value(Expression::Lambda(Ref::new(lambda))))
}

// (defn name (params...) body...) and (defmacro ...) desugar to a def of a
// lambda; an optional leading (doc ...) form becomes the doclist.
fn defn_form(args: &Expression, env: &EnvRef, is_macro: bool) -> Result<Flow> {
    let (name, rest) = args.decons()?;
    let name = name.try_as_atom()?;
    let (params, body) = rest.decons()?;

    let mut doc = Expression::Nil;
    let mut body = body.clone();
    let stripped = match body.decons() {
        Ok((Expression::Pair(p), tail)) if p.car.is_named(symbol::DOC) => {
            Some((p.cdr.clone(), tail.clone()))
        }
        _ => None,
    };
    if let Some((doclist, remainder)) = stripped {
        doc = doclist;
        body = remainder;
    }

    let mut lambda = make_lambda(None, params, &body, env)?;
    lambda.doc = doc;
    lambda.is_macro = is_macro;
    env.borrow_mut()
        .define(name, Expression::Lambda(Ref::new(lambda)));
    Ok(Flow::Value(Expression::Nil))
}

fn cond_form(args: &Expression, env: &EnvRef) -> Result<Flow> {
    for clause in args.iter_list() {
        let clause = clause?;
        let (test, consequents) = clause.decons().map_err(|_| {
            Error::new(ErrorKind::TypeError(format!(
                "cond clause must be a list, got '{}'",
                clause
            )))
        })?;
        let value = eval(test, env.clone())?;
        if value.is_true() {
            return if consequents.is_nil() {
                Ok(Flow::Value(value))
            } else {
                eval_body(consequents, env)
            };
        }
    }
    Ok(Flow::Value(Expression::Nil))
}

fn and_form(args: &Expression, env: &EnvRef) -> Result<Flow> {
    let mut value = Expression::truth();
    for arg in args.iter_list() {
        value = eval(arg?, env.clone())?;
        if !value.is_true() {
            return Ok(Flow::Value(value));
        }
    }
    Ok(Flow::Value(value))
}

fn or_form(args: &Expression, env: &EnvRef) -> Result<Flow> {
    for arg in args.iter_list() {
        let value = eval(arg?, env.clone())?;
        if value.is_true() {
            return Ok(Flow::Value(value));
        }
    }
    Ok(Flow::Value(Expression::Nil))
}

// Each pass evaluates the body, then hands the loop form itself back to the
// trampoline as the tail continuation. Iteration therefore consumes no host
// stack, and the loop ends only when an error propagates out of the body.
fn loop_form(args: &Expression, env: &EnvRef) -> Result<Flow> {
    for form in args.iter_list() {
        eval(form?, env.clone())?;
    }
    Ok(Flow::Tail(
        Expression::cons(Expression::Atom(symbol::LOOP), args.clone()),
        env.clone(),
    ))
}

fn error_form(args: &Expression, env: &EnvRef) -> Result<Flow> {
    let message_expr = single_arg("error", args)?;
    let message = eval(&message_expr, env.clone())?;
    Err(ErrorKind::UserError(message).into())
}

fn catch_clause(form: &Expression) -> Option<(Symbol, Expression)> {
    let pair = match form {
        Expression::Pair(p) if p.car.is_named(symbol::CATCH) => p,
        _ => return None,
    };
    let (binding, handler) = pair.cdr.decons().ok()?;
    let name = binding.try_as_atom().ok()?;
    Some((name, handler.clone()))
}

fn try_form(args: &Expression, env: &EnvRef) -> Result<Flow> {
    let mut forms = args.try_to_vec()?;
    let catch = match forms.last().and_then(catch_clause) {
        Some(clause) => {
            forms.pop();
            Some(clause)
        }
        None => None,
    };

    let (err_name, handler) = match catch {
        // Without a catch clause, try is transparent.
        None => return eval_body(args, env),
        Some(clause) => clause,
    };

    let mut value = Expression::Nil;
    for form in &forms {
        match eval(form, env.clone()) {
            Ok(v) => value = v,
            Err(err) => {
                let handler_env = env.new_child();
                handler_env.borrow_mut().define(err_name, err.as_list());
                return eval_body(&handler, &handler_env);
            }
        }
    }
    Ok(Flow::Value(value))
}

fn swallow_form(args: &Expression, env: &EnvRef) -> Result<Flow> {
    for form in args.iter_list() {
        if eval(form?, env.clone()).is_err() {
            return Ok(Flow::Value(Expression::truth()));
        }
    }
    Ok(Flow::Value(Expression::Nil))
}

// (errors pattern-list body...): the body must raise an error whose printed
// message contains every pattern atom; used by test suites written in the
// source language.
fn errors_form(args: &Expression, env: &EnvRef) -> Result<Flow> {
    let full_form = Expression::cons(Expression::Atom(symbol::ERRORS), args.clone());
    let (pattern_expr, body) = args.decons()?;
    let patterns = eval(pattern_expr, env.clone())?;

    let mut outcome: Option<Error> = None;
    for form in body.iter_list() {
        if let Err(err) = eval(form?, env.clone()) {
            outcome = Some(err);
            break;
        }
    }

    let err = match outcome {
        Some(err) => err,
        None => {
            return Err(Error::new(ErrorKind::CatchMismatch(format!(
                "error not found in {}",
                args
            )))
            .with_context(full_form))
        }
    };

    let text = format!("{}", err);
    for pattern in patterns.iter_list() {
        let pattern = pattern?;
        let needle = format!("{}", pattern);
        if !text.contains(&needle) {
            return Err(Error::new(ErrorKind::CatchMismatch(format!(
                "expected '{}' in error '{}'",
                needle, text
            )))
            .with_context(full_form));
        }
    }
    Ok(Flow::Value(Expression::Nil))
}

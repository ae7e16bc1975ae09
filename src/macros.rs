use crate::environment::EnvRef;
use crate::errors::*;
use crate::expression::{Expression, Lambda, Ref};
use crate::interpreter::{bind_call_env, eval};
use log::debug;

/// Expand one macro invocation: bind the unevaluated arguments with the same
/// rule as a function call, then evaluate the macro body. The result is the
/// replacement form, which the evaluator feeds back into its trampoline (so
/// repeated expansion of a still-macro head happens there).
pub fn expand_once(lambda: &Ref<Lambda>, args: &Expression) -> Result<Expression> {
    let argv = args.try_to_vec()?;
    let call_env = bind_call_env(lambda, argv)?;
    let mut result = Expression::Nil;
    for form in lambda.body.iter_list() {
        result = eval(form?, call_env.clone())?;
    }
    debug!("macro expansion produced {}", result);
    Ok(result)
}

/// The `macroexpand-1` surface: when the head of the form names a macro,
/// expand one step; any other value comes back unchanged. Only the outermost
/// position is examined.
pub fn macroexpand_1(form: &Expression, env: &EnvRef) -> Result<Expression> {
    let (head, args) = match form.decons() {
        Ok(parts) => parts,
        Err(_) => return Ok(form.clone()),
    };
    if let Expression::Atom(name) = head {
        let binding = env.borrow().lookup(name);
        if let Some(Expression::Lambda(lambda)) = binding {
            if lambda.is_macro {
                return expand_once(&lambda, args);
            }
        }
    }
    Ok(form.clone())
}

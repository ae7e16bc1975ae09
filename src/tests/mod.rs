mod builtins;
mod errors;
mod eval;
mod quasiquote;

use crate::builtins::default_env;
use crate::environment::EnvRef;
use crate::errors::Result;
use crate::expression::Expression;
use crate::interpreter::load_and_evaluate;

fn run_in_env(src: &str, env: &EnvRef) -> Result<Expression> {
    load_and_evaluate(src, env)
}

fn run(src: &str) -> Result<Expression> {
    run_in_env(src, &default_env())
}

/// Evaluate and print the last value; most tests compare against the
/// printed form.
fn printed(src: &str) -> String {
    run(src).unwrap().to_string()
}

fn error_text(src: &str) -> String {
    run(src).unwrap_err().to_string()
}

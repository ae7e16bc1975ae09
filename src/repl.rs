use crate::completer::EnvHelper;
use crate::environment::EnvRef;
use crate::errors::Error;
use crate::interpreter;
use crate::lexer;
use rustyline::error::ReadlineError;
use rustyline::Editor;

fn report(err: &Error) {
    if err.has_context() {
        eprintln!("{}", err);
    } else {
        eprintln!("ERROR: {}", err);
    }
}

/// The interactive loop: lines accumulate until the token stream balances,
/// then every top-level expression is evaluated and the last value printed.
/// Uncaught errors are printed and the prompt returns.
pub fn repl(env: EnvRef) {
    let mut rl = Editor::<EnvHelper>::new();
    rl.set_helper(Some(EnvHelper::new(env.downgrade())));

    let mut pending = String::new();
    loop {
        let prompt = if pending.is_empty() { "> " } else { ".. " };
        match rl.readline(prompt) {
            Ok(line) => {
                pending.push_str(&line);
                pending.push('\n');
                let tokens = match lexer::tokenize(&pending) {
                    Ok(tokens) => tokens,
                    Err(err) => {
                        report(&err);
                        pending.clear();
                        continue;
                    }
                };
                if tokens.is_empty() {
                    pending.clear();
                    continue;
                }
                if !lexer::is_balanced(&tokens) {
                    continue;
                }
                rl.add_history_entry(pending.trim());
                let input = std::mem::take(&mut pending);
                match interpreter::load_and_evaluate(&input, &env) {
                    Ok(value) => println!("{}", value),
                    Err(err) => report(&err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                pending.clear();
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", err);
                break;
            }
        }
    }
}

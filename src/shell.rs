//! Subprocess runner for the `shell` builtin.

use crate::errors::Result;
use crate::expression::{unwrap_list, Expression};
use std::process::Command;

// Lists are rendered without their parentheses so that
// (shell '(ls -l)) does the obvious thing.
fn command_text(cmd: &Expression) -> String {
    match cmd {
        Expression::Pair(_) => unwrap_list(cmd),
        other => other.to_string(),
    }
}

/// Run the value as a shell command; the result is the three-element list
/// `(stdout stderr exit-code)` with the streams as atoms.
pub fn run(cmd: &Expression) -> Result<Expression> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(command_text(cmd))
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let code = output.status.code().unwrap_or(-1);
    Ok(Expression::from_vec(vec![
        Expression::atom(stdout.trim_end_matches('\n')),
        Expression::atom(stderr.trim_end_matches('\n')),
        Expression::int(code.into()),
    ]))
}

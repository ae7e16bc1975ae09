//! The help system: a short tabular listing of every installed form, a long
//! Markdown rendering with evaluated examples, and the `forms` list.

use crate::builtins::REGISTRY;
use crate::environment::EnvRef;
use crate::errors::Result;
use crate::expression::Expression;
use crate::interpreter;
use crate::symbol::{self, Symbol};

/// One special form as the help system describes it; the evaluator itself
/// dispatches on the symbol, this table only feeds `help` and `forms`.
pub struct FormRec {
    pub name: &'static str,
    pub arity: usize,
    pub variadic: bool,
    pub doc: &'static str,
    pub args: &'static str,
    pub examples: &'static [&'static str],
}

pub static SPECIAL_FORMS: &[FormRec] = &[
    FormRec {
        name: "and",
        arity: 0,
        variadic: true,
        doc: "Boolean and",
        args: "(() . xs)",
        examples: &["(and)", "(and t t ())"],
    },
    FormRec {
        name: "cond",
        arity: 0,
        variadic: true,
        doc: "Fundamental branching construct",
        args: "(() . clauses)",
        examples: &["(cond)", "(cond (() 1) (t 2))"],
    },
    FormRec {
        name: "def",
        arity: 2,
        variadic: false,
        doc: "Bind a name to a value",
        args: "(name value)",
        examples: &["(def a 1)"],
    },
    FormRec {
        name: "defmacro",
        arity: 2,
        variadic: true,
        doc: "Create and name a macro",
        args: "(name args . body)",
        examples: &[],
    },
    FormRec {
        name: "defn",
        arity: 2,
        variadic: true,
        doc: "Create and name a function",
        args: "(name args . body)",
        examples: &[],
    },
    FormRec {
        name: "error",
        arity: 1,
        variadic: false,
        doc: "Raise an error",
        args: "(msg-list)",
        examples: &[],
    },
    FormRec {
        name: "errors",
        arity: 1,
        variadic: true,
        doc: "Error checking (for tests)",
        args: "(message-pattern-list . exprs)",
        examples: &["(errors '(is not a function) (1))"],
    },
    FormRec {
        name: "lambda",
        arity: 1,
        variadic: true,
        doc: "Create a function",
        args: "(args . body) or (name args . body)",
        examples: &["((lambda () t))", "((lambda (x) (+ 5 x)) 5)"],
    },
    FormRec {
        name: "let",
        arity: 1,
        variadic: true,
        doc: "Create a local scope with bindings",
        args: "(bindings . body)",
        examples: &["(let ((a 1) (b 2)) (+ a b))"],
    },
    FormRec {
        name: "loop",
        arity: 1,
        variadic: true,
        doc: "Loop forever",
        args: "(() . body)",
        examples: &[],
    },
    FormRec {
        name: "or",
        arity: 0,
        variadic: true,
        doc: "Boolean or",
        args: "(() . xs)",
        examples: &["(or)", "(or () 3)"],
    },
    FormRec {
        name: "quote",
        arity: 1,
        variadic: false,
        doc: "Quote an expression",
        args: "(x)",
        examples: &["(quote foo)", "'(1 2 3)"],
    },
    FormRec {
        name: "set!",
        arity: 2,
        variadic: false,
        doc: "Update a value in an existing binding",
        args: "(name value)",
        examples: &[],
    },
    FormRec {
        name: "swallow",
        arity: 0,
        variadic: true,
        doc: "Swallow errors thrown in body, return t if any occur",
        args: "(() . body)",
        examples: &["(swallow (error '(boom)))", "(swallow 1 2 3)"],
    },
    FormRec {
        name: "syntax-quote",
        arity: 1,
        variadic: false,
        doc: "Syntax-quote an expression",
        args: "(x)",
        examples: &["`(1 ~(+ 1 1) ~@(list 3 4))"],
    },
    FormRec {
        name: "try",
        arity: 0,
        variadic: true,
        doc: "Try to evaluate body, catch errors and handle them",
        args: "(() . body)",
        examples: &["(try (error '(boom)) (catch e (len e)))"],
    },
];

struct DocRow {
    name: String,
    kind: char,
    type_name: &'static str,
    arity: usize,
    variadic: bool,
    doc: String,
    args: String,
    examples: Vec<String>,
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// Columns are "Name Type Arity Description", matching the REPL's help
// banner widths.
fn column_line(name: &str, kind: &str, arity: &str, desc: &str) -> String {
    format!("{:>14} {:>2} {:>5}  {}", name, kind, arity, desc)
}

fn lambda_desc(doc: &Expression) -> String {
    match doc.car() {
        Ok(first) => {
            let text = first.to_string();
            text.trim_start_matches('(')
                .trim_end_matches(')')
                .to_string()
        }
        Err(_) => "UNDOCUMENTED".to_string(),
    }
}

fn lambda_examples(doc: &Expression) -> Vec<String> {
    for clause in doc.iter_list().flatten() {
        if let Ok((head, rest)) = clause.decons() {
            if head.is_named(symbol::EXAMPLES) {
                return rest
                    .iter_list()
                    .flatten()
                    .map(|e| e.to_string())
                    .collect();
            }
        }
    }
    vec![]
}

fn format_lambda_args(params: &[Symbol], rest: Option<Symbol>) -> String {
    let fixed: Vec<&str> = params.iter().map(|p| p.name()).collect();
    match rest {
        None => format!("({})", fixed.join(" ")),
        Some(rest) if fixed.is_empty() => format!("(() . {})", rest),
        Some(rest) => format!("({} . {})", fixed.join(" "), rest),
    }
}

fn collect_rows(env: &EnvRef) -> Vec<DocRow> {
    let mut rows = vec![];
    for form in SPECIAL_FORMS {
        rows.push(DocRow {
            name: form.name.to_string(),
            kind: 'S',
            type_name: "special form",
            arity: form.arity,
            variadic: form.variadic,
            doc: form.doc.to_string(),
            args: form.args.to_string(),
            examples: form.examples.iter().map(|e| e.to_string()).collect(),
        });
    }
    for builtin in REGISTRY.iter() {
        rows.push(DocRow {
            name: builtin.name.to_string(),
            kind: 'N',
            type_name: "native function",
            arity: builtin.fixed_arity,
            variadic: builtin.variadic,
            doc: builtin.doc.to_string(),
            args: builtin.args.to_string(),
            examples: builtin.examples.iter().map(|e| e.to_string()).collect(),
        });
    }

    // User-defined functions appear once they carry a doclist.
    let mut keys = env.borrow().all_keys();
    keys.sort();
    keys.dedup();
    for key in keys {
        let value = env.borrow().lookup(&key);
        if let Some(Expression::Lambda(lambda)) = value {
            if lambda.doc.is_nil() {
                continue;
            }
            rows.push(DocRow {
                name: key.name().to_string(),
                kind: if lambda.is_macro { 'M' } else { 'F' },
                type_name: if lambda.is_macro { "macro" } else { "function" },
                arity: lambda.params.len(),
                variadic: lambda.rest.is_some(),
                doc: lambda_desc(&lambda.doc),
                args: format_lambda_args(&lambda.params, lambda.rest),
                examples: lambda_examples(&lambda.doc),
            });
        }
    }
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

/// All installed form names, sorted; the `forms` builtin.
pub fn form_names(env: &EnvRef) -> Vec<Symbol> {
    collect_rows(env)
        .into_iter()
        .map(|row| Symbol::new(row.name))
        .collect()
}

/// The short tabular listing printed by `help`.
pub fn short_doc(env: &EnvRef) -> String {
    let mut lines = vec![
        format!("{} - a Lisp interpreter.\n", env!("CARGO_PKG_NAME")),
        column_line("", "Type", "", ""),
        column_line("", "---", "", ""),
        "                S - special form".to_string(),
        "                M - macro".to_string(),
        "                N - native function".to_string(),
        "                F - Lisp function\n".to_string(),
        column_line("Name", "Type", "Arity", "Description"),
        column_line("----", "---", "----", "-----------"),
    ];
    for row in collect_rows(env) {
        let arity = format!("{}{}", row.arity, if row.variadic { "+" } else { " " });
        lines.push(column_line(
            &row.name,
            &row.kind.to_string(),
            &arity,
            &capitalize(&row.doc),
        ));
    }
    lines.join("\n")
}

fn run_example(src: &str, env: &EnvRef) -> String {
    match interpreter::load_and_evaluate(src, env) {
        Ok(value) => format!("> {}\n;;=>\n{}\n", src, value),
        Err(err) => format!("> {}\n;;=>\nERROR: {}\n", src, err),
    }
}

/// The long Markdown API document, with examples evaluated live against the
/// given environment.
pub fn long_doc(env: &EnvRef) -> Result<String> {
    let rows = collect_rows(env);
    let mut out = vec![format!(
        "# API Index\n{} forms available:",
        rows.len()
    )];
    for row in &rows {
        let name = match row.kind {
            'S' => format!("**`{}`**", row.name),
            'M' => format!("*`{}`*", row.name),
            _ => format!("`{}`", row.name),
        };
        out.push(format!("[{}](#user-content-{})", name, row.name));
    }
    out.push("\n# Operators\n".to_string());
    for row in &rows {
        let mut section = format!(
            "## <a id=\"{}\"></a>`{}`\n\n{}\n\nType: {}\n\nArity: {}{}\n\nArgs: `{}`\n",
            row.name,
            row.name,
            capitalize(&row.doc),
            row.type_name,
            row.arity,
            if row.variadic { "+" } else { " " },
            row.args,
        );
        if !row.examples.is_empty() {
            let rendered: Vec<String> = row
                .examples
                .iter()
                .map(|e| run_example(e, env))
                .collect();
            section += &format!("\n### Examples\n\n```\n{}```\n", rendered.join(""));
        }
        section += "\n-----------------------------------------------------\n";
        out.push(section);
    }
    Ok(out.join("\n"))
}

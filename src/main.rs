use sprig::{default_env, docs, load_and_evaluate, repl::repl};

const USAGE: &str = "\
usage: sprig [file | option]

With no arguments, start an interactive REPL. With a file argument, evaluate
the file and exit.

options:
  -h, --help       print this message and exit
  -v, --version    print the interpreter version and exit
  -d, --doc        print the long-form API documentation as Markdown";

fn run_file(path: &str) {
    let env = default_env();
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("cannot read '{}': {}", path, err);
            std::process::exit(1);
        }
    };
    if let Err(err) = load_and_evaluate(&text, &env) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => repl(default_env()),
        Some("-h") | Some("--help") => println!("{}", USAGE),
        Some("-v") | Some("--version") => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        }
        Some("-d") | Some("--doc") => {
            let env = default_env();
            match docs::long_doc(&env) {
                Ok(doc) => println!("{}", doc),
                Err(err) => {
                    eprintln!("ERROR: {}", err);
                    std::process::exit(1);
                }
            }
        }
        Some(path) => run_file(path),
    }
}

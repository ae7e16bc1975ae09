use crate::expression::Expression;
use crate::symbol::Symbol;
use rustyline::error::ReadlineError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum ErrorKind {
    SyntaxError(String),
    UnexpectedToken { found: String, position: usize },
    UnexpectedEof,
    Unbound(Symbol),
    TypeError(String),
    ArityError(String),
    DomainError(String),
    UserError(Expression),
    CatchMismatch(String),
    GenericError(String),
    IoError(std::io::Error),
    ReadlineError(ReadlineError),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ErrorKind::*;
        match self {
            SyntaxError(msg) => write!(f, "{}", msg),
            UnexpectedToken { found, position } => {
                write!(f, "unexpected '{}' at position {}", found, position)
            }
            UnexpectedEof => write!(f, "unexpected end of input"),
            Unbound(sym) => write!(f, "unbound atom '{}'", sym),
            TypeError(msg) => write!(f, "{}", msg),
            ArityError(msg) => write!(f, "{}", msg),
            DomainError(msg) => write!(f, "{}", msg),
            UserError(msg) => write!(f, "{}", msg),
            CatchMismatch(msg) => write!(f, "{}", msg),
            GenericError(msg) => write!(f, "{}", msg),
            IoError(e) => write!(f, "io error: {}", e),
            ReadlineError(e) => write!(f, "readline error: {}", e),
        }
    }
}

/// An error plus the source forms it passed through on the way out. Each
/// function or builtin application pushes the printed form of its call site,
/// giving the `ERROR in '(outer)': ERROR in '(inner)': ...` chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    context: Vec<Expression>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Error {
            kind,
            context: vec![],
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn with_context(mut self, expr: Expression) -> Self {
        self.context.push(expr);
        self
    }

    pub fn has_context(&self) -> bool {
        !self.context.is_empty()
    }

    /// The origin message as a proper list: the payload of a user `error`,
    /// or the message text split into one atom per word.
    pub fn message_list(&self) -> Expression {
        match &self.kind {
            ErrorKind::UserError(msg) => msg.clone(),
            kind => Expression::from_vec(
                format!("{}", kind)
                    .split_whitespace()
                    .map(|word| Expression::Atom(Symbol::new(word)))
                    .collect(),
            ),
        }
    }

    /// The whole error as a proper list, for `catch` bindings: context
    /// frames outermost first, then the origin message list.
    pub fn as_list(&self) -> Expression {
        let mut items: Vec<Expression> = self.context.iter().rev().cloned().collect();
        items.push(self.message_list());
        Expression::from_vec(items)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for frame in self.context.iter().rev() {
            write!(f, "ERROR in '{}': ", frame)?;
        }
        write!(f, "{}", self.kind)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl From<std::io::Error> for Error {
    fn from(ioe: std::io::Error) -> Self {
        Error::new(ErrorKind::IoError(ioe))
    }
}

impl From<ReadlineError> for Error {
    fn from(rle: ReadlineError) -> Self {
        Error::new(ErrorKind::ReadlineError(rle))
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::new(ErrorKind::GenericError(msg))
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        msg.to_string().into()
    }
}

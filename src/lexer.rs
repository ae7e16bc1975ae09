use crate::errors::*;
use crate::number::{self, Int};
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LeftParen,
    RightParen,
    Number(Int),
    Atom(String),
    Quote,
    SyntaxQuote,
    Unquote,
    SpliceUnquote,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Number(n) => write!(f, "{}", n),
            Token::Atom(s) => write!(f, "{}", s),
            Token::Quote => write!(f, "'"),
            Token::SyntaxQuote => write!(f, "`"),
            Token::Unquote => write!(f, "~"),
            Token::SpliceUnquote => write!(f, "~@"),
        }
    }
}

/// A token plus its byte span in the input, for error reporting and for the
/// REPL completer.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub start: usize,
    pub end: usize,
}

fn is_space(ch: char) -> bool {
    " \t\r\n".contains(ch)
}

fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

// The dot is included so that dotted pairs and rest-parameter lists read;
// the parser gives a lone `.` its tail meaning.
fn is_atom_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || "+*/-_!=<>?[]{}&$^.".contains(ch)
}

struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
    tokens: Vec<SpannedToken>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.char_indices().peekable(),
            len: input.len(),
            tokens: vec![],
        }
    }

    fn emit(&mut self, token: Token, start: usize, end: usize) {
        self.tokens.push(SpannedToken { token, start, end });
    }

    fn pos(&mut self) -> usize {
        self.chars.peek().map(|(i, _)| *i).unwrap_or(self.len)
    }

    fn skip_comment(&mut self) {
        while let Some((_, ch)) = self.chars.next() {
            if ch == '\n' {
                break;
            }
        }
    }

    fn read_atom(&mut self, mut buf: String) -> (usize, String) {
        while let Some(&(_, ch)) = self.chars.peek() {
            if !is_atom_char(ch) {
                break;
            }
            buf.push(ch);
            self.chars.next();
        }
        (self.pos(), buf)
    }

    // A `-` or `+` only begins a number when digits follow; otherwise it is
    // the first character of an atom.
    fn read_number_or_atom(&mut self, start: usize, first: char) -> Result<()> {
        let mut buf = String::new();
        buf.push(first);
        let digits_follow = match self.chars.peek() {
            Some(&(_, ch)) => is_digit(ch) || is_digit(first),
            None => is_digit(first),
        };
        if !digits_follow {
            let (end, name) = self.read_atom(buf);
            self.emit(Token::Atom(name), start, end);
            return Ok(());
        }
        while let Some(&(_, ch)) = self.chars.peek() {
            if !is_digit(ch) {
                break;
            }
            buf.push(ch);
            self.chars.next();
        }
        let end = self.pos();
        let num = number::parse(&buf)?;
        self.emit(Token::Number(num), start, end);
        Ok(())
    }

    fn run(mut self) -> Result<Vec<SpannedToken>> {
        while let Some((start, ch)) = self.chars.next() {
            match ch {
                _ if is_space(ch) => {}
                ';' => self.skip_comment(),
                '(' => self.emit(Token::LeftParen, start, start + 1),
                ')' => self.emit(Token::RightParen, start, start + 1),
                '\'' => self.emit(Token::Quote, start, start + 1),
                '`' => self.emit(Token::SyntaxQuote, start, start + 1),
                '~' => {
                    if let Some(&(_, '@')) = self.chars.peek() {
                        self.chars.next();
                        self.emit(Token::SpliceUnquote, start, start + 2);
                    } else {
                        self.emit(Token::Unquote, start, start + 1);
                    }
                }
                _ if is_digit(ch) || ch == '-' || ch == '+' => {
                    self.read_number_or_atom(start, ch)?
                }
                _ if is_atom_char(ch) => {
                    let (end, name) = self.read_atom(ch.to_string());
                    self.emit(Token::Atom(name), start, end);
                }
                _ => {
                    return Err(ErrorKind::SyntaxError(format!(
                        "unexpected character '{}' in input at position {}",
                        ch, start
                    ))
                    .into())
                }
            }
        }
        Ok(self.tokens)
    }
}

pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>> {
    Lexer::new(input).run()
}

/// True when every `(` has a matching `)`; the REPL keeps reading lines
/// until this holds.
pub fn is_balanced(tokens: &[SpannedToken]) -> bool {
    let mut level = 0i64;
    for spanned in tokens {
        match spanned.token {
            Token::LeftParen => level += 1,
            Token::RightParen => level -= 1,
            _ => {}
        }
    }
    level == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|st| st.token)
            .collect()
    }

    #[test]
    fn lexes_parens_atoms_and_numbers() {
        assert_eq!(
            kinds("(+ 1 -23)"),
            vec![
                Token::LeftParen,
                Token::Atom("+".into()),
                Token::Number(1.into()),
                Token::Number((-23).into()),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn sign_without_digits_is_an_atom() {
        assert_eq!(kinds("-"), vec![Token::Atom("-".into())]);
        assert_eq!(kinds("->"), vec![Token::Atom("->".into())]);
        assert_eq!(kinds("+foo"), vec![Token::Atom("+foo".into())]);
    }

    #[test]
    fn lexes_reader_macros() {
        assert_eq!(
            kinds("'x `y ~z ~@w"),
            vec![
                Token::Quote,
                Token::Atom("x".into()),
                Token::SyntaxQuote,
                Token::Atom("y".into()),
                Token::Unquote,
                Token::Atom("z".into()),
                Token::SpliceUnquote,
                Token::Atom("w".into()),
            ]
        );
    }

    #[test]
    fn comments_run_to_end_of_line() {
        assert_eq!(
            kinds("1 ; two three\n4"),
            vec![Token::Number(1.into()), Token::Number(4.into())]
        );
        assert_eq!(kinds("; nothing here"), vec![]);
    }

    #[test]
    fn rejects_characters_outside_the_alphabet() {
        assert!(tokenize("(foo \"bar\")").is_err());
        assert!(tokenize("a # b").is_err());
    }

    #[test]
    fn balance_predicate() {
        assert!(is_balanced(&tokenize("(a (b c))").unwrap()));
        assert!(!is_balanced(&tokenize("(a (b c)").unwrap()));
        assert!(is_balanced(&tokenize("").unwrap()));
    }

    #[test]
    fn spans_cover_the_source_text() {
        let tokens = tokenize("(abc 12)").unwrap();
        assert_eq!((tokens[1].start, tokens[1].end), (1, 4));
        assert_eq!((tokens[2].start, tokens[2].end), (5, 7));
    }
}

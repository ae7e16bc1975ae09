use crate::errors::*;
use crate::expression::Expression;
use crate::lexer::{SpannedToken, Token};
use crate::symbol::{self, Symbol};
use std::iter::Peekable;
use std::slice::Iter;

type Tokens<'a> = Peekable<Iter<'a, SpannedToken>>;

/// Parse a full token stream into its top-level expressions.
pub fn parse_all(tokens: &[SpannedToken]) -> Result<Vec<Expression>> {
    let mut iter = tokens.iter().peekable();
    let mut exprs = vec![];
    while iter.peek().is_some() {
        exprs.push(parse_expr(&mut iter)?);
    }
    Ok(exprs)
}

// Reader macros wrap the next complete expression, not just the next token,
// so 'x, '(a b) and ''x all nest as expected.
fn wrap(head: Symbol, inner: Expression) -> Expression {
    Expression::from_vec(vec![Expression::Atom(head), inner])
}

fn parse_expr(iter: &mut Tokens) -> Result<Expression> {
    let spanned = iter.next().ok_or(ErrorKind::UnexpectedEof)?;
    match &spanned.token {
        Token::Number(n) => Ok(Expression::Number(n.clone())),
        Token::Atom(name) => Ok(Expression::Atom(Symbol::new(name))),
        Token::Quote => Ok(wrap(symbol::QUOTE, parse_expr(iter)?)),
        Token::SyntaxQuote => Ok(wrap(symbol::SYNTAX_QUOTE, parse_expr(iter)?)),
        Token::Unquote => Ok(wrap(symbol::UNQUOTE, parse_expr(iter)?)),
        Token::SpliceUnquote => Ok(wrap(symbol::SPLICING_UNQUOTE, parse_expr(iter)?)),
        Token::LeftParen => parse_list(iter),
        Token::RightParen => Err(ErrorKind::UnexpectedToken {
            found: ")".to_string(),
            position: spanned.start,
        }
        .into()),
    }
}

fn parse_list(iter: &mut Tokens) -> Result<Expression> {
    let mut items = vec![];
    loop {
        let next = match iter.peek() {
            Some(spanned) => *spanned,
            None => return Err(ErrorKind::UnexpectedEof.into()),
        };
        match &next.token {
            Token::RightParen => {
                iter.next();
                return Ok(Expression::from_vec(items));
            }
            // A lone `.` makes the single following expression the tail.
            Token::Atom(name) if name == "." => {
                let position = next.start;
                iter.next();
                if items.is_empty() {
                    return Err(ErrorKind::UnexpectedToken {
                        found: ".".to_string(),
                        position,
                    }
                    .into());
                }
                let tail = parse_expr(iter)?;
                return match iter.next() {
                    Some(spanned) if spanned.token == Token::RightParen => {
                        Ok(Expression::from_vec_with_tail(items, tail))
                    }
                    Some(spanned) => Err(ErrorKind::UnexpectedToken {
                        found: spanned.token.to_string(),
                        position: spanned.start,
                    }
                    .into()),
                    None => Err(ErrorKind::UnexpectedEof.into()),
                };
            }
            _ => items.push(parse_expr(iter)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_one(src: &str) -> Expression {
        let tokens = tokenize(src).unwrap();
        let mut exprs = parse_all(&tokens).unwrap();
        assert_eq!(exprs.len(), 1, "expected one expression from {:?}", src);
        exprs.pop().unwrap()
    }

    #[test]
    fn empty_parens_are_nil() {
        assert_eq!(parse_one("()"), Expression::Nil);
        assert_eq!(parse_one("(())").to_string(), "(())");
    }

    #[test]
    fn reader_macros_wrap_the_next_form() {
        assert_eq!(parse_one("'x").to_string(), "(quote x)");
        assert_eq!(parse_one("'(1 2)").to_string(), "(quote (1 2))");
        assert_eq!(parse_one("''x").to_string(), "(quote (quote x))");
        assert_eq!(
            parse_one("`(1 ~x ~@(f 2))").to_string(),
            "(syntax-quote (1 (unquote x) (splicing-unquote (f 2))))"
        );
    }

    #[test]
    fn dotted_tails() {
        assert_eq!(parse_one("(a . b)").to_string(), "(a . b)");
        assert_eq!(parse_one("(x . xs)").car().unwrap().to_string(), "x");
        assert_eq!(parse_one("(a b . c)").to_string(), "(a b . c)");
        assert_eq!(parse_one("(() . xs)").to_string(), "(() . xs)");
    }

    #[test]
    fn round_trips_through_printing() {
        for src in &["(a (b c) 42)", "(1 . 2)", "(quote (1 2 3))", "(-5 +6)"] {
            let expr = parse_one(src);
            assert_eq!(parse_one(&expr.to_string()), expr);
        }
    }

    #[test]
    fn reports_malformed_input() {
        let unterminated = tokenize("(a (b)").unwrap();
        assert!(parse_all(&unterminated).is_err());
        let stray = tokenize(")").unwrap();
        assert!(parse_all(&stray).is_err());
        let bad_dot = tokenize("(a . b c)").unwrap();
        assert!(parse_all(&bad_dot).is_err());
        let leading_dot = tokenize("(. b)").unwrap();
        assert!(parse_all(&leading_dot).is_err());
    }

    #[test]
    fn parses_a_sequence_of_top_level_forms() {
        let tokens = tokenize("(def a 1) a").unwrap();
        let exprs = parse_all(&tokens).unwrap();
        assert_eq!(exprs.len(), 2);
        assert_eq!(exprs[1].to_string(), "a");
    }
}

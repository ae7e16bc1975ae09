use crate::environment::EnvWeak;
use crate::lexer::{self, Token};
use rustyline::{
    completion::Completer, highlight::Highlighter, hint::Hinter, Context, Helper,
};

/// Tab completion over the names visible in the live environment chain.
pub struct EnvHelper(EnvWeak);

impl EnvHelper {
    pub fn new(env: EnvWeak) -> Self {
        EnvHelper(env)
    }
}

impl Helper for EnvHelper {}

impl Hinter for EnvHelper {
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context) -> Option<String> {
        None
    }
}

impl Highlighter for EnvHelper {}

impl Completer for EnvHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let env = match self.0.upgrade() {
            Some(env) => env,
            None => return Ok((0, vec![])),
        };
        let tokens = match lexer::tokenize(line) {
            Ok(tokens) => tokens,
            Err(_) => return Ok((0, vec![])),
        };
        let token = match tokens
            .iter()
            .find(|spanned| spanned.start <= pos && spanned.end == pos)
        {
            Some(token) => token,
            None => return Ok((0, vec![])),
        };
        let prefix = match &token.token {
            Token::Atom(name) => &name[..pos - token.start],
            _ => return Ok((0, vec![])),
        };
        let candidates = env
            .borrow()
            .all_keys()
            .into_iter()
            .filter(|key| key.name().starts_with(prefix))
            .map(|key| key.name().to_string())
            .collect();
        Ok((token.start, candidates))
    }
}

use cursor::{Cursor, Line, SourceRange};
use errors::{At, StaticError};

pub mod token;
pub use token::{Token, TokenData, TokenType};
use TokenData::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorType {
    #[error("Unexpected character.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] Error: {error}")]
pub struct ScanError {
    pub error: ScanErrorType,
    pub line: Line,
}

impl From<ScanError> for StaticError {
    fn from(e: ScanError) -> Self {
        StaticError::new(e.line, At::Nowhere, e.error)
    }
}

/// Turns source text into tokens in a single forward pass.
///
/// Lexical errors don't stop the scan: the offending character (or the
/// unterminated string) is skipped and recorded, and scanning resumes.
pub struct Scanner<'a> {
    start: Cursor<'a>,
    current: Cursor<'a>,
    tokens: Vec<Token<'a>>,
    errors: Vec<ScanError>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            start: Cursor::new(source),
            current: Cursor::new(source),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// The returned tokens always end with exactly one `Eof`.
    pub fn scan_tokens(mut self) -> (Vec<Token<'a>>, Vec<ScanError>) {
        while !self.current.is_at_end() {
            self.start = self.current.clone();
            self.scan_token();
        }

        self.start = self.current.clone();
        self.add_token(Eof);

        log::debug!("Scanned {} tokens, {} errors", self.tokens.len(), self.errors.len());
        (self.tokens, self.errors)
    }

    fn scan_token(&mut self) {
        let Some(c) = self.current.next() else {
            return;
        };

        match c {
            '(' => self.add_token(LeftParen),
            ')' => self.add_token(RightParen),
            '{' => self.add_token(LeftBrace),
            '}' => self.add_token(RightBrace),
            ',' => self.add_token(Comma),
            '.' => self.add_token(Dot),
            '-' => self.add_token(Minus),
            '+' => self.add_token(Plus),
            ';' => self.add_token(Semicolon),
            '*' => self.add_token(Star),

            '!' => self.add_token_if_followed_by('=', BangEqual, Bang),
            '=' => self.add_token_if_followed_by('=', EqualEqual, Equal),
            '<' => self.add_token_if_followed_by('=', LessEqual, Less),
            '>' => self.add_token_if_followed_by('=', GreaterEqual, Greater),

            '/' => {
                if self.current.next_if_eq('/') {
                    self.current.advance_while(|c| c != '\n');
                } else if self.current.next_if_eq('*') {
                    self.block_comment();
                } else {
                    self.add_token(Slash)
                }
            }

            ' ' | '\r' | '\t' | '\n' => (),

            '"' => self.string(),
            d if d.is_ascii_digit() => self.number(),
            c if is_alpha(c) => self.identifier(),

            c => self.error(ScanErrorType::UnexpectedCharacter(c)),
        }
    }

    fn add_token(&mut self, data: TokenData<'a>) {
        let token =
            Token::new(data, SourceRange::new(self.start.clone(), self.current.clone()));
        log::trace!("Scanned token {:?} '{}'", token.data, token.lexeme());
        self.tokens.push(token);
    }

    fn add_token_if_followed_by(
        &mut self,
        expected: char,
        matched: TokenData<'a>,
        otherwise: TokenData<'a>,
    ) {
        let data = if self.current.next_if_eq(expected) { matched } else { otherwise };
        self.add_token(data)
    }

    fn error(&mut self, error: ScanErrorType) {
        log::debug!("Scan error on line {}: {:?}", self.current.line(), error);
        self.errors.push(ScanError { error, line: self.current.line() });
    }

    // Not nested. Running into the end of input is not an error, the rest of
    // the source is simply swallowed.
    fn block_comment(&mut self) {
        while !self.current.is_at_end() {
            if self.current.peek() == Some('*') && self.current.peek_next() == Some('/') {
                self.current.next();
                self.current.next();
                return;
            }
            self.current.next();
        }
    }

    fn string(&mut self) {
        self.current.advance_while(|c| c != '"');

        if !self.current.next_if_eq('"') {
            self.error(ScanErrorType::UnterminatedString);
            return;
        }

        let lexeme = self.start.slice_until(&self.current);
        self.add_token(Str(&lexeme[1..lexeme.len() - 1]));
    }

    fn number(&mut self) {
        self.current.advance_while(|c| c.is_ascii_digit());

        if self.current.peek() == Some('.')
            && self.current.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.current.next();
            self.current.advance_while(|c| c.is_ascii_digit());
        }

        match self.start.slice_until(&self.current).parse() {
            Ok(n) => self.add_token(Number(n)),
            Err(_) => unreachable!("digits with an optional fraction always parse as f64"),
        }
    }

    fn identifier(&mut self) {
        self.current.advance_while(|c| is_alpha(c) || c.is_ascii_digit());

        let text = self.start.slice_until(&self.current);
        self.add_token(TokenData::keyword(text).unwrap_or(Identifier));
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

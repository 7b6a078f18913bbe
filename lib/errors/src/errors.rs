//! Diagnostics shared by the static phases (scanning and parsing).

use std::{fmt::Display, ops::Deref};

use cursor::Line;
use itertools::Itertools;

/// Where on its line a static error was detected.
#[derive(Clone, Debug, PartialEq)]
pub enum At {
    /// Lexical errors don't point at a token.
    Nowhere,
    End,
    Lexeme(String),
}

impl Display for At {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            At::Nowhere => Ok(()),
            At::End => write!(f, " at end"),
            At::Lexeme(lexeme) => write!(f, " at '{lexeme}'"),
        }
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}] Error{at}: {message}")]
pub struct StaticError {
    pub line: Line,
    pub at: At,
    pub message: String,
}

impl StaticError {
    pub fn new(line: Line, at: At, message: impl ToString) -> Self {
        Self { line, at, message: message.to_string() }
    }
}

/// Every lexical and syntax error of one run, in the order they were found.
#[derive(thiserror::Error, Clone, Debug, Default, PartialEq)]
pub struct StaticErrors(pub Vec<StaticError>);

impl FromIterator<StaticError> for StaticErrors {
    fn from_iter<I: IntoIterator<Item = StaticError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Deref for StaticErrors {
    type Target = Vec<StaticError>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for StaticErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn report_format() {
        assert_eq!(
            StaticError::new(Line(3), At::Nowhere, "Unexpected character.").to_string(),
            "[line 3] Error: Unexpected character."
        );
        assert_eq!(
            StaticError::new(Line(1), At::End, "Expect expression.").to_string(),
            "[line 1] Error at end: Expect expression."
        );
        assert_eq!(
            StaticError::new(Line(2), At::Lexeme("=".into()), "Invalid assignment target.")
                .to_string(),
            "[line 2] Error at '=': Invalid assignment target."
        );
    }

    #[test]
    fn errors_are_listed_one_per_line() {
        let errors: StaticErrors = [
            StaticError::new(Line(1), At::Nowhere, "Unexpected character."),
            StaticError::new(Line(4), At::Lexeme("print".into()), "Expect expression."),
        ]
        .into_iter()
        .collect();

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.to_string(),
            "[line 1] Error: Unexpected character.\n[line 4] Error at 'print': Expect expression."
        );
    }
}

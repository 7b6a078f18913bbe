mod expr;
mod stmt;

use cursor::Line;
use errors::{At, StaticError};
pub use expr::{Expr, LiteralValue};
use scanner::{Token, TokenData, TokenType};
pub use stmt::Stmt;

use TokenType::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParserErrorType {
    #[error("Expect expression.")]
    ExpectedExpression,
    #[error("Expect ')' after expression.")]
    ExpectedRightParen,
    #[error("Expect ';' after {0}.")]
    ExpectedSemicolonAfter(&'static str),
    #[error("Expect variable name.")]
    ExpectedVariableName,
    #[error("Expect '}}' after block.")]
    ExpectedRightBrace,
    #[error("Invalid assignment target.")]
    InvalidAssignmentTarget,
    #[error("Too much nesting.")]
    TooMuchNesting,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] Error{at}: {error}")]
pub struct ParserError {
    pub error: ParserErrorType,
    pub line: Line,
    pub at: At,
}

impl ParserError {
    fn new(error: ParserErrorType, token: &Token) -> Self {
        let at = match token.data {
            TokenData::Eof => At::End,
            _ => At::Lexeme(token.lexeme().to_string()),
        };
        Self { error, line: token.line(), at }
    }
}

impl From<ParserError> for StaticError {
    fn from(e: ParserError) -> Self {
        StaticError::new(e.line, e.at, e.error)
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;

/// Deepest nesting of groupings, unary operators, assignments and blocks the
/// parser accepts before reporting an error instead of recursing further.
const MAX_NESTING: usize = 64;

/// Recursive descent parser with one token of lookahead.
///
/// A syntax error abandons the current declaration only: the parser records
/// it, skips ahead to the next statement boundary and carries on, so a single
/// run reports as many errors as possible.
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    current: usize,
    depth: usize,
    errors: Vec<ParserError>,
}

impl<'a> Parser<'a> {
    /// `tokens` must end with an `Eof` token, as produced by the scanner.
    ///
    /// # Panics
    ///
    /// Panics if `tokens` is empty or its last token is not `Eof`.
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        assert!(
            matches!(tokens.last(), Some(t) if t.data == TokenData::Eof),
            "token sequence must end with Eof"
        );
        Self { tokens, current: 0, depth: 0, errors: Vec::new() }
    }

    /// Returns every statement that parsed, in source order, together with all
    /// syntax errors. Statements that failed to parse are left out.
    pub fn parse(mut self) -> (Vec<Stmt<'a>>, Vec<ParserError>) {
        let mut stmts = Vec::new();
        while !self.is_at_end() {
            stmts.extend(self.declaration());
        }

        log::debug!("Parsed {} statements, {} errors", stmts.len(), self.errors.len());
        (stmts, self.errors)
    }

    fn declaration(&mut self) -> Option<Stmt<'a>> {
        let result =
            if self.consume(Var).is_some() { self.var_declaration() } else { self.statement() };

        match result {
            Ok(stmt) => {
                log::trace!("Parsed statement: {:?}", stmt);
                Some(stmt)
            }
            Err(e) => {
                log::debug!("Hit error: {}, syncing...", e);
                self.errors.push(e);
                self.synchronize();
                None
            }
        }
    }

    fn var_declaration(&mut self) -> Result<Stmt<'a>> {
        let name = self.consume_or_error(Identifier, ParserErrorType::ExpectedVariableName)?;

        let initializer = match self.consume(Equal) {
            Some(_) => Some(self.expression()?),
            None => None,
        };

        self.consume_or_error(
            Semicolon,
            ParserErrorType::ExpectedSemicolonAfter("variable declaration"),
        )?;

        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> Result<Stmt<'a>> {
        if self.consume(Print).is_some() {
            return self.print_statement();
        }

        if self.consume(LeftBrace).is_some() {
            return self.nested(Self::block);
        }

        self.expression_statement()
    }

    fn block(&mut self) -> Result<Stmt<'a>> {
        let mut stmts = Vec::new();

        while !self.check(RightBrace) && !self.is_at_end() {
            stmts.extend(self.declaration());
        }

        self.consume_or_error(RightBrace, ParserErrorType::ExpectedRightBrace)?;
        Ok(Stmt::Block(stmts))
    }

    fn print_statement(&mut self) -> Result<Stmt<'a>> {
        let value = self.expression()?;
        self.consume_or_error(Semicolon, ParserErrorType::ExpectedSemicolonAfter("expression"))?;
        Ok(Stmt::Print(value))
    }

    fn expression_statement(&mut self) -> Result<Stmt<'a>> {
        let value = self.expression()?;
        self.consume_or_error(Semicolon, ParserErrorType::ExpectedSemicolonAfter("expression"))?;
        Ok(Stmt::Expression(value))
    }

    fn expression(&mut self) -> Result<Expr<'a>> {
        self.nested(Self::assignment)
    }

    fn assignment(&mut self) -> Result<Expr<'a>> {
        let expr = self.equality()?;

        let Some(equals) = self.consume(Equal) else {
            return Ok(expr);
        };
        let value = Box::new(self.nested(Self::assignment)?);

        match expr {
            Expr::Variable(name) => Ok(Expr::Assign { name, value }),
            // Reported, but the parser is not confused, so no need to synchronize.
            expr => {
                let e = ParserError::new(ParserErrorType::InvalidAssignmentTarget, &equals);
                log::debug!("Hit error: {}", e);
                self.errors.push(e);
                Ok(expr)
            }
        }
    }

    fn equality(&mut self) -> Result<Expr<'a>> {
        self.binary(&[BangEqual, EqualEqual], Self::comparison)
    }

    fn comparison(&mut self) -> Result<Expr<'a>> {
        self.binary(&[Greater, GreaterEqual, Less, LessEqual], Self::addition)
    }

    fn addition(&mut self) -> Result<Expr<'a>> {
        self.binary(&[Minus, Plus], Self::multiplication)
    }

    fn multiplication(&mut self) -> Result<Expr<'a>> {
        self.binary(&[Slash, Star], Self::unary)
    }

    /// One left-associative precedence level: `operand (operator operand)*`.
    fn binary(
        &mut self,
        operators: &[TokenType],
        operand: fn(&mut Self) -> Result<Expr<'a>>,
    ) -> Result<Expr<'a>> {
        let mut expr = operand(self)?;

        while let Some(operator) = self.consume_any(operators) {
            let right = Box::new(operand(self)?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr<'a>> {
        if let Some(operator) = self.consume_any(&[Bang, Minus]) {
            let right = Box::new(self.nested(Self::unary)?);
            return Ok(Expr::Unary { operator, right });
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<Expr<'a>> {
        let token = self.peek().clone();
        let expr = match token.data {
            TokenData::False => Expr::Literal(LiteralValue::Boolean(false)),
            TokenData::True => Expr::Literal(LiteralValue::Boolean(true)),
            TokenData::Nil => Expr::Literal(LiteralValue::Nil),
            TokenData::Number(n) => Expr::Literal(LiteralValue::Number(n)),
            TokenData::Str(s) => Expr::Literal(LiteralValue::Str(s)),
            TokenData::Identifier => Expr::Variable(token.clone()),
            TokenData::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume_or_error(RightParen, ParserErrorType::ExpectedRightParen)?;
                return Ok(Expr::Grouping(Box::new(expr)));
            }
            _ => {
                return Err(ParserError::new(ParserErrorType::ExpectedExpression, &token))
            }
        };

        self.advance();
        Ok(expr)
    }

    /// Discards tokens until we're probably at the start of the next statement.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().data == TokenData::Semicolon {
                return;
            }

            match self.peek().token_type() {
                Class | Fun | Var | For | If | While | Print | Return => return,
                _ => {}
            }

            log::trace!("Syncing, skipping '{}'", self.peek());
            self.advance();
        }
    }
}

// Helpers
impl<'a> Parser<'a> {
    fn peek(&self) -> &Token<'a> {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token<'a> {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().data == TokenData::Eof
    }

    fn check(&self, token_type: TokenType) -> bool {
        !self.is_at_end() && self.peek().token_type() == token_type
    }

    /// Never moves past `Eof`.
    fn advance(&mut self) -> Token<'a> {
        if !self.is_at_end() {
            self.current += 1;
            self.previous().clone()
        } else {
            self.peek().clone()
        }
    }

    /// Runs `parse` one nesting level deeper.
    fn nested<T>(&mut self, parse: fn(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING {
            return Err(ParserError::new(ParserErrorType::TooMuchNesting, self.peek()));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn consume(&mut self, token_type: TokenType) -> Option<Token<'a>> {
        self.check(token_type).then(|| self.advance())
    }

    fn consume_any(&mut self, token_types: &[TokenType]) -> Option<Token<'a>> {
        token_types.iter().find_map(|t| self.consume(*t))
    }

    fn consume_or_error(
        &mut self,
        token_type: TokenType,
        error_type: ParserErrorType,
    ) -> Result<Token<'a>> {
        self.consume(token_type).ok_or_else(|| ParserError::new(error_type, self.peek()))
    }
}

use std::io::Write;

use cursor::Line;
use errors::{StaticError, StaticErrors};
use parser::{Expr, LiteralValue, Parser, Stmt};
use scanner::{Scanner, Token, TokenType};

mod value;
pub use value::Value;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuntimeErrorType {
    #[error("Operands must be two numbers or two strings")]
    InvalidAdditionOperands,
    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers,
    #[error("Operand must be a number")]
    OperandMustBeNumber,
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{error}\n[line {line}]")]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub line: Line,
    /// Lexeme of the token the error is reported at.
    pub at: String,
}

impl RuntimeError {
    fn new(error: RuntimeErrorType, token: &Token) -> Self {
        Self { error, line: token.line(), at: token.lexeme().to_string() }
    }
}

/// Outcome of a failed run. A driver maps each variant to its own exit code.
#[derive(thiserror::Error, Debug)]
pub enum InterpretError {
    /// Lexical and syntax errors. Nothing was executed.
    #[error("{0}")]
    CompileError(StaticErrors),
    /// Execution stopped here. Output printed before the error stays printed.
    #[error("{0}")]
    RuntimeError(#[from] RuntimeError),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InterpretError>;

/// Tree-walking interpreter. `print` statements write to `output`.
#[derive(Debug)]
pub struct Interpreter<W> {
    output: W,
}

impl<W: Write> Interpreter<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Scans, parses and, if both phases were free of errors, executes `source`.
    pub fn run_source(&mut self, source: &str) -> Result<()> {
        let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
        let (stmts, parser_errors) = Parser::new(tokens).parse();

        let errors: StaticErrors = scan_errors
            .into_iter()
            .map(StaticError::from)
            .chain(parser_errors.into_iter().map(StaticError::from))
            .collect();

        if !errors.is_empty() {
            return Err(InterpretError::CompileError(errors));
        }

        self.interpret(&stmts)
    }

    /// Executes statements in order, stopping at the first runtime error.
    pub fn interpret(&mut self, stmts: &[Stmt]) -> Result<()> {
        for stmt in stmts {
            self.execute(stmt)?;
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<()> {
        log::trace!("Executing {:?}", stmt);
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.output, "{}", value)?;
            }
            // There is no variable storage: the initializer runs for its
            // effects and the value is dropped.
            Stmt::Var { name, initializer } => {
                if let Some(init) = initializer {
                    let value = self.evaluate(init)?;
                    log::debug!("Discarding value {:?} of '{}'", value, name.lexeme());
                }
            }
            Stmt::Block(stmts) => self.interpret(stmts)?,
        }
        Ok(())
    }

    pub fn evaluate(&self, expr: &Expr) -> std::result::Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(LiteralValue::Number(n)) => Ok((*n).into()),
            Expr::Literal(LiteralValue::Str(s)) => Ok((*s).into()),
            Expr::Literal(LiteralValue::Boolean(b)) => Ok((*b).into()),
            Expr::Literal(LiteralValue::Nil) => Ok(Value::Nil),

            Expr::Grouping(expr) => self.evaluate(expr),

            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;
                match (operator.token_type(), right) {
                    (TokenType::Minus, Value::Number(n)) => Ok((-n).into()),
                    (TokenType::Minus, _) => {
                        Err(RuntimeError::new(RuntimeErrorType::OperandMustBeNumber, operator))
                    }
                    (TokenType::Bang, v) => Ok((!v.is_truthy()).into()),
                    (t, _) => unreachable!("{:?} is not a unary operator", t),
                }
            }

            Expr::Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                binary(operator, left, right)
            }

            Expr::Variable(name) => Err(undefined_variable(name)),

            Expr::Assign { name, value } => {
                self.evaluate(value)?;
                Err(undefined_variable(name))
            }
        }
    }
}

fn binary(operator: &Token, left: Value, right: Value) -> std::result::Result<Value, RuntimeError> {
    use TokenType::*;
    use Value::Number as N;

    match (operator.token_type(), left, right) {
        (Plus, N(l), N(r)) => Ok((l + r).into()),
        (Plus, Value::Str(l), Value::Str(r)) => Ok((l + &r).into()),
        (Plus, _, _) => {
            Err(RuntimeError::new(RuntimeErrorType::InvalidAdditionOperands, operator))
        }

        (Minus, N(l), N(r)) => Ok((l - r).into()),
        (Slash, N(l), N(r)) => Ok((l / r).into()),
        (Star, N(l), N(r)) => Ok((l * r).into()),

        (Greater, N(l), N(r)) => Ok((l > r).into()),
        (GreaterEqual, N(l), N(r)) => Ok((l >= r).into()),
        (Less, N(l), N(r)) => Ok((l < r).into()),
        (LessEqual, N(l), N(r)) => Ok((l <= r).into()),

        (Minus | Slash | Star | Greater | GreaterEqual | Less | LessEqual, _, _) => {
            Err(RuntimeError::new(RuntimeErrorType::OperandsMustBeNumbers, operator))
        }

        (EqualEqual, l, r) => Ok((l == r).into()),
        (BangEqual, l, r) => Ok((l != r).into()),

        (t, _, _) => unreachable!("{:?} is not a binary operator", t),
    }
}

fn undefined_variable(name: &Token) -> RuntimeError {
    RuntimeError::new(RuntimeErrorType::UndefinedVariable(name.lexeme().to_string()), name)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[ctor::ctor]
    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Runs `source` and returns everything it printed plus the outcome.
    fn run(source: &str) -> (String, Result<()>) {
        let mut interpreter = Interpreter::new(Vec::new());
        let result = interpreter.run_source(source);
        (String::from_utf8(interpreter.into_output()).unwrap(), result)
    }

    fn output(source: &str) -> String {
        let (output, result) = run(source);
        if let Err(e) = result {
            panic!("{source:?} failed: {e}");
        }
        output
    }

    /// Evaluates a single expression and returns its display text.
    fn eval(expr: &str) -> String {
        output(&format!("print {expr};")).trim_end_matches('\n').to_string()
    }

    fn runtime_error(source: &str) -> RuntimeError {
        match run(source).1 {
            Err(InterpretError::RuntimeError(e)) => e,
            other => panic!("expected runtime error, got {:?}", other),
        }
    }

    #[test]
    fn precedence() {
        assert_eq!(eval("1 + 2 * 3"), "7");
        assert_eq!(eval("(1 + 2) * 3"), "9");
        assert_eq!(eval("10 - 4 - 3"), "3");
        assert_eq!(eval("12 / 3 / 2"), "2");
        assert_eq!(eval("2 * 3 < 7 == true"), "true");
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval("3.5"), "3.5");
        assert_eq!(eval("3.0"), "3");
        assert_eq!(eval("1 / 4"), "0.25");
        assert_eq!(eval("7 / 2"), "3.5");
        assert_eq!(eval("1 / 0"), "Infinity");
        assert_eq!(eval("0.1 + 0.2"), "0.30000000000000004");
    }

    #[test]
    fn unary() {
        assert_eq!(eval("-(-5)"), "5");
        assert_eq!(eval("!!true"), "true");
        assert_eq!(eval("-3"), "-3");
    }

    #[test]
    fn truthiness() {
        assert_eq!(eval("!0"), "false");
        assert_eq!(eval("!\"\""), "false");
        assert_eq!(eval("!nil"), "true");
        assert_eq!(eval("!false"), "true");
        assert_eq!(eval("!\"abc\""), "false");
    }

    #[test]
    fn equality() {
        assert_eq!(eval("nil == nil"), "true");
        assert_eq!(eval("nil == false"), "false");
        assert_eq!(eval("1 == \"1\""), "false");
        assert_eq!(eval("1 == 1.0"), "true");
        assert_eq!(eval("\"a\" == \"a\""), "true");
        assert_eq!(eval("\"a\" != \"b\""), "true");
        assert_eq!(eval("true != true"), "false");
    }

    #[test]
    fn comparison() {
        assert_eq!(eval("1 < 2"), "true");
        assert_eq!(eval("2 <= 2"), "true");
        assert_eq!(eval("1 > 2"), "false");
        assert_eq!(eval("2 >= 3"), "false");
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(eval("\"1\" + \"2\""), "12");
        assert_eq!(eval("\"\" + \"\""), "");
    }

    #[test]
    fn type_errors() {
        let e = runtime_error("print 1 + \"a\";");
        assert_eq!(e.error, RuntimeErrorType::InvalidAdditionOperands);
        assert_eq!(e.to_string(), "Operands must be two numbers or two strings\n[line 1]");

        let e = runtime_error("\n\nprint true - 1;");
        assert_eq!(e.error, RuntimeErrorType::OperandsMustBeNumbers);
        assert_eq!((e.line, e.at.as_str()), (Line(3), "-"));

        assert_eq!(runtime_error("\"a\" < \"b\";").error, RuntimeErrorType::OperandsMustBeNumbers);
        assert_eq!(runtime_error("-\"a\";").error, RuntimeErrorType::OperandMustBeNumber);
        assert_eq!(runtime_error("-nil;").to_string(), "Operand must be a number\n[line 1]");
    }

    #[test]
    fn left_operand_is_evaluated_first() {
        // Both operands are invalid, the error comes from the left one.
        let e = runtime_error("(1 - nil) * (2 + \"x\");");
        assert_eq!(e.error, RuntimeErrorType::OperandsMustBeNumbers);
        assert_eq!(e.at, "-");
    }

    #[test]
    fn runtime_error_stops_execution_but_keeps_output() {
        let (output, result) = run("print 1;\nprint -true;\nprint 3;");
        assert_eq!(output, "1\n");
        assert!(matches!(result, Err(InterpretError::RuntimeError(e)) if e.line == Line(2)));
    }

    #[test]
    fn static_errors_prevent_execution() {
        let (output, result) = run("print 1;\nprint @;\nprint (2;");
        assert_eq!(output, "");
        match result {
            Err(InterpretError::CompileError(errors)) => assert_eq!(
                errors.to_string(),
                "[line 2] Error: Unexpected character.\n\
                 [line 2] Error at ';': Expect expression.\n\
                 [line 3] Error at ';': Expect ')' after expression."
            ),
            other => panic!("expected compile error, got {:?}", other),
        }
    }

    #[test]
    fn statements_run_in_order() {
        assert_eq!(
            output("print 1; 2 + 2; print \"two\"; { print 3; { print nil; } }"),
            "1\ntwo\n3\nnil\n"
        );
        assert_eq!(output(""), "");
    }

    #[test]
    fn var_runs_initializer_but_stores_nothing() {
        assert_eq!(output("var a; var b = 1 + 2;"), "");
        assert_eq!(runtime_error("var a = -\"x\";").error, RuntimeErrorType::OperandMustBeNumber);

        let e = runtime_error("var a = 1;\nprint a;");
        assert_eq!(e.error, RuntimeErrorType::UndefinedVariable("a".to_string()));
        assert_eq!(e.to_string(), "Undefined variable 'a'.\n[line 2]");
    }

    #[test]
    fn assignment_evaluates_value_before_failing() {
        assert_eq!(runtime_error("a = 1;").error, RuntimeErrorType::UndefinedVariable("a".into()));
        assert_eq!(runtime_error("a = -nil;").error, RuntimeErrorType::OperandMustBeNumber);
    }

    #[test]
    fn evaluate_single_expression() {
        let (tokens, _) = Scanner::new("(1 + 2) * -3;").scan_tokens();
        let (stmts, errors) = Parser::new(tokens).parse();
        assert!(errors.is_empty());

        let [Stmt::Expression(expr)] = stmts.as_slice() else {
            panic!("expected one expression statement, got {:?}", stmts)
        };
        let interpreter = Interpreter::new(std::io::sink());
        assert_eq!(interpreter.evaluate(expr), Ok(Value::Number(-9.0)));
    }
}

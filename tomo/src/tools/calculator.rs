//! Restricted arithmetic expression evaluator.
//!
//! A small tokenizer and recursive-descent parser over the grammar
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := number | '-' factor | '(' expr ')'
//! ```
//!
//! Standard precedence, left associativity. Anything outside the grammar
//! is an [`EvalError`]; there is no interpreter behind this, so arbitrary
//! code can never execute.

use crate::error::{EvalError, EvalResult};

/// A lexical token in an arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
        }
    }
}

/// Split an expression into tokens.
///
/// Whitespace separates tokens and is otherwise ignored. A run of digits
/// and dots is one numeric literal; `f64` parsing rejects malformed runs
/// like `1.2.3`.
fn tokenize(input: &str) -> EvalResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| EvalError::InvalidNumber(literal))?;
                tokens.push(Token::Number(value));
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            other => return Err(EvalError::InvalidCharacter(other)),
        }
    }

    Ok(tokens)
}

/// Recursive-descent parser that evaluates as it goes.
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    const fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// expr := term (('+' | '-') term)*
    fn expr(&mut self) -> EvalResult<f64> {
        let mut value = self.term()?;

        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Token::Minus => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => break,
            }
        }

        Ok(value)
    }

    /// term := factor (('*' | '/') factor)*
    fn term(&mut self) -> EvalResult<f64> {
        let mut value = self.factor()?;

        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Token::Slash => {
                    self.pos += 1;
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => break,
            }
        }

        Ok(value)
    }

    /// factor := number | '-' factor | '(' expr ')'
    fn factor(&mut self) -> EvalResult<f64> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(*n),
            Some(Token::Minus) => Ok(-self.factor()?),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(EvalError::UnclosedParen),
                }
            }
            Some(token) => Err(EvalError::UnexpectedToken(token.to_string())),
            None => Err(EvalError::UnexpectedEnd),
        }
    }
}

/// Evaluate a restricted arithmetic expression.
///
/// # Errors
///
/// Returns [`EvalError`] on characters outside the grammar, malformed
/// numbers, unbalanced parentheses, trailing input, or division by zero.
///
/// # Example
///
/// ```rust,ignore
/// use tomo::tools::calculator;
///
/// assert_eq!(calculator::evaluate("15 * 7 + 23").unwrap(), 128.0);
/// assert!(calculator::evaluate("import os").is_err());
/// ```
pub fn evaluate(expression: &str) -> EvalResult<f64> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(EvalError::EmptyExpression);
    }

    let mut parser = Parser::new(&tokens);
    let value = parser.expr()?;

    if let Some(rest) = parser.peek() {
        return Err(EvalError::TrailingInput(rest.to_string()));
    }

    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(evaluate("2+2").unwrap(), 4.0);
        assert_eq!(evaluate("10 - 4").unwrap(), 6.0);
        assert_eq!(evaluate("6 * 7").unwrap(), 42.0);
        assert_eq!(evaluate("9 / 2").unwrap(), 4.5);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(evaluate("15 * 7 + 23").unwrap(), 128.0);
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("20 - 6 / 2").unwrap(), 17.0);
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(evaluate("8 - 3 - 2").unwrap(), 3.0);
        assert_eq!(evaluate("100 / 5 / 2").unwrap(), 10.0);
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(evaluate("((1 + 2) * (3 + 4))").unwrap(), 21.0);
        assert_eq!(evaluate("2 * (3 + (4 - 1))").unwrap(), 12.0);
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(evaluate("-5").unwrap(), -5.0);
        assert_eq!(evaluate("-(2 + 3)").unwrap(), -5.0);
        assert_eq!(evaluate("4 * -2").unwrap(), -8.0);
        assert_eq!(evaluate("--3").unwrap(), 3.0);
    }

    #[test]
    fn test_decimals() {
        assert_eq!(evaluate("1.5 + 2.5").unwrap(), 4.0);
        assert_eq!(evaluate("0.5 + 0.25").unwrap(), 0.75);
        assert_eq!(evaluate(".5 * 4").unwrap(), 2.0);
    }

    #[test]
    fn test_rejects_letters() {
        assert_eq!(
            evaluate("2 + x").unwrap_err(),
            EvalError::InvalidCharacter('x')
        );
        assert!(matches!(
            evaluate("import os").unwrap_err(),
            EvalError::InvalidCharacter('i')
        ));
        assert!(matches!(
            evaluate("__builtins__"),
            Err(EvalError::InvalidCharacter('_'))
        ));
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(
            evaluate("1.2.3").unwrap_err(),
            EvalError::InvalidNumber("1.2.3".into())
        );
        assert_eq!(evaluate("(2 + 3").unwrap_err(), EvalError::UnclosedParen);
        assert_eq!(
            evaluate("2 + 3)").unwrap_err(),
            EvalError::TrailingInput(")".into())
        );
        assert_eq!(evaluate("2 +").unwrap_err(), EvalError::UnexpectedEnd);
        assert_eq!(
            evaluate("* 2").unwrap_err(),
            EvalError::UnexpectedToken("*".into())
        );
        assert_eq!(evaluate("").unwrap_err(), EvalError::EmptyExpression);
        assert_eq!(evaluate("   ").unwrap_err(), EvalError::EmptyExpression);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("1 / 0").unwrap_err(), EvalError::DivisionByZero);
        assert_eq!(
            evaluate("5 / (3 - 3)").unwrap_err(),
            EvalError::DivisionByZero
        );
    }

    #[test]
    fn test_integer_display() {
        // Whole results format without a trailing decimal.
        assert_eq!(format!("{}", evaluate("2+2").unwrap()), "4");
        assert_eq!(format!("{}", evaluate("9/2").unwrap()), "4.5");
    }
}

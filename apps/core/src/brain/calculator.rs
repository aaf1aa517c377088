//! Arithmetic evaluation for "calculate"/"solve" requests.
//!
//! Only the four basic operators over decimal literals are supported. The
//! candidate expression is pulled out of the message, checked against a
//! character whitelist, tokenized, and evaluated with standard precedence.
//! Nothing is ever handed to a general-purpose evaluator.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

pub const PARSE_FAILURE_REPLY: &str =
    "I couldn't parse the calculation. Try a simple expression like 'Calculate 12 + 7'.";

static EXPRESSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9.]+(?:\s*[-+*/]\s*[0-9.]+)+").expect("Invalid regex: arithmetic expression")
});

static WHITELIST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9.\s+\-*/]+$").expect("Invalid regex: arithmetic whitelist")
});

/// Why an expression could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("no arithmetic expression found")]
    NoExpression,
    #[error("expression contains disallowed characters")]
    Disallowed,
    #[error("invalid number literal: {0}")]
    BadNumber(String),
    #[error("unexpected token at position {0}")]
    UnexpectedToken(usize),
    #[error("division by zero")]
    DivisionByZero,
    #[error("result is not a finite number")]
    NotFinite,
}

/// Evaluated value. Integer-only expressions without division stay integral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => write_float(f, *x),
        }
    }
}

/// Shortest round-trip form with a trailing ".0" on integral values ("5.0").
/// Exponents carry a sign and at least two digits ("1e+16", "1e-05").
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    let repr = format!("{:?}", x);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => f.write_str(&repr),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(Number),
    Op(Op),
}

fn tokenize(expr: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' | '-' | '*' | '/' => {
                chars.next();
                tokens.push(Token::Op(match c {
                    '+' => Op::Add,
                    '-' => Op::Sub,
                    '*' => Op::Mul,
                    _ => Op::Div,
                }));
            }
            '0'..='9' | '.' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Num(parse_number(&expr[start..end])?));
            }
            _ => return Err(CalcError::Disallowed),
        }
    }

    Ok(tokens)
}

fn parse_number(literal: &str) -> Result<Number, CalcError> {
    if !literal.contains('.') {
        if let Ok(i) = literal.parse::<i64>() {
            return Ok(Number::Int(i));
        }
    }
    // "1." and ".5" are valid literals, a lone "." or "1.2.3" is not
    match literal.parse::<f64>() {
        Ok(f) if literal != "." => Ok(Number::Float(f)),
        _ => Err(CalcError::BadNumber(literal.to_string())),
    }
}

fn apply(op: Op, lhs: Number, rhs: Number) -> Result<Number, CalcError> {
    if let (Number::Int(a), Number::Int(b)) = (lhs, rhs) {
        let exact = match op {
            Op::Add => a.checked_add(b),
            Op::Sub => a.checked_sub(b),
            Op::Mul => a.checked_mul(b),
            Op::Div => None,
        };
        if let Some(value) = exact {
            return Ok(Number::Int(value));
        }
    }

    let (a, b) = (lhs.as_f64(), rhs.as_f64());
    let value = match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
        Op::Div => {
            if b == 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            a / b
        }
    };

    if value.is_finite() {
        Ok(Number::Float(value))
    } else {
        Err(CalcError::NotFinite)
    }
}

/// Recursive-descent evaluator over `expr := term (('+'|'-') term)*`,
/// `term := number (('*'|'/') number)*`.
struct Evaluator {
    tokens: Vec<Token>,
    pos: usize,
}

impl Evaluator {
    fn next_number(&mut self) -> Result<Number, CalcError> {
        match self.tokens.get(self.pos) {
            Some(Token::Num(n)) => {
                self.pos += 1;
                Ok(*n)
            }
            _ => Err(CalcError::UnexpectedToken(self.pos)),
        }
    }

    fn peek_op(&self, allowed: &[Op]) -> Option<Op> {
        match self.tokens.get(self.pos) {
            Some(Token::Op(op)) if allowed.contains(op) => Some(*op),
            _ => None,
        }
    }

    fn term(&mut self) -> Result<Number, CalcError> {
        let mut value = self.next_number()?;
        while let Some(op) = self.peek_op(&[Op::Mul, Op::Div]) {
            self.pos += 1;
            let rhs = self.next_number()?;
            value = apply(op, value, rhs)?;
        }
        Ok(value)
    }

    fn expr(&mut self) -> Result<Number, CalcError> {
        let mut value = self.term()?;
        while let Some(op) = self.peek_op(&[Op::Add, Op::Sub]) {
            self.pos += 1;
            let rhs = self.term()?;
            value = apply(op, value, rhs)?;
        }
        if self.pos != self.tokens.len() {
            return Err(CalcError::UnexpectedToken(self.pos));
        }
        Ok(value)
    }
}

/// Evaluate a bare arithmetic expression such as `12 + 7 * 2`.
pub fn evaluate(expr: &str) -> Result<Number, CalcError> {
    if !WHITELIST_PATTERN.is_match(expr) {
        return Err(CalcError::Disallowed);
    }
    let tokens = tokenize(expr)?;
    Evaluator { tokens, pos: 0 }.expr()
}

/// First candidate expression inside free text.
pub fn extract_expression(text: &str) -> Option<&str> {
    EXPRESSION_PATTERN.find(text).map(|m| m.as_str())
}

pub fn solve(text: &str) -> Result<Number, CalcError> {
    let expr = extract_expression(text).ok_or(CalcError::NoExpression)?;
    evaluate(expr)
}

/// Reply for a calculation request. Never fails.
pub fn calculate_answer(text: &str) -> String {
    match solve(text) {
        Ok(value) => format!("The answer is: {}", value),
        Err(e) => {
            debug!("Calculation rejected: {}", e);
            PARSE_FAILURE_REPLY.to_string()
        }
    }
}

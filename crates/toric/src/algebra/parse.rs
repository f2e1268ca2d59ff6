//! Recursive-descent parser for polynomial expressions.
//!
//! Grammar (whitespace is insignificant):
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary ('*' unary)*
//! unary  := ('-' | '+') unary | power
//! power  := atom (('^' | '**') integer)?
//! atom   := integer | identifier | '(' expr ')'
//! ```
//! Exponents are non-negative integers; identifiers are `[A-Za-z_][A-Za-z0-9_]*`.
//! Integer literals have no size limit. A product or power whose exponent
//! leaves `u32` is reported at the offending operator.

use std::str::FromStr;

use dashu::integer::IBig;
use thiserror::Error;

use super::poly::Poly;
use super::symbol::Symbol;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("parse error at byte {offset}: {message}")]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl FromStr for Poly {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { src: s, pos: 0 };
        let p = parser.expr()?;
        parser.skip_ws();
        if parser.pos != s.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(p)
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    /// Consume the longest prefix whose chars satisfy `pred`.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let src: &'a str = self.src;
        let start = self.pos;
        let len = self
            .rest()
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map(|(i, _)| i)
            .unwrap_or(self.rest().len());
        self.pos += len;
        &src[start..self.pos]
    }

    fn expr(&mut self) -> Result<Poly, ParseError> {
        let mut acc = self.term()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some('+') => {
                    self.pos += 1;
                    acc += self.term()?;
                }
                Some('-') => {
                    self.pos += 1;
                    acc = acc - self.term()?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn term(&mut self) -> Result<Poly, ParseError> {
        let mut acc = self.unary()?;
        loop {
            self.skip_ws();
            if self.peek() == Some('*') {
                let at = self.pos;
                self.pos += 1;
                let rhs = self.unary()?;
                acc = acc.try_mul(&rhs).map_err(|e| ParseError {
                    offset: at,
                    message: e.to_string(),
                })?;
            } else {
                return Ok(acc);
            }
        }
    }

    fn unary(&mut self) -> Result<Poly, ParseError> {
        self.skip_ws();
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some('+') => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Poly, ParseError> {
        let base = self.atom()?;
        self.skip_ws();
        let op = self.pos;
        if self.rest().starts_with("**") {
            self.pos += 2;
        } else if self.peek() == Some('^') {
            self.pos += 1;
        } else {
            return Ok(base);
        }
        self.skip_ws();
        let at = self.pos;
        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(ParseError {
                offset: at,
                message: "expected a non-negative integer exponent".into(),
            });
        }
        let e: u32 = digits.parse().map_err(|_| ParseError {
            offset: at,
            message: format!("exponent {digits} out of range"),
        })?;
        base.try_pow(e).map_err(|err| ParseError {
            offset: op,
            message: err.to_string(),
        })
    }

    fn atom(&mut self) -> Result<Poly, ParseError> {
        self.skip_ws();
        let at = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_digit() => {
                let digits = self.take_while(|c| c.is_ascii_digit());
                let value = IBig::from_str_radix(digits, 10).map_err(|_| ParseError {
                    offset: at,
                    message: format!("invalid integer {digits}"),
                })?;
                Ok(Poly::constant(value))
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
                Ok(Poly::symbol(Symbol::new(name)))
            }
            Some('(') => {
                self.pos += 1;
                let inner = self.expr()?;
                self.skip_ws();
                if self.peek() != Some(')') {
                    return Err(self.error("expected ')'"));
                }
                self.pos += 1;
                Ok(inner)
            }
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
            None => Err(self.error("unexpected end of input")),
        }
    }
}

//! Amount expressions.
//!
//! An amount field is either a plain decimal literal (`15.0`, `-250`) or a
//! sum of literals (`20.0 + 15.50`, `12 - 2.5`). Nothing else is accepted:
//! there are no parentheses, no other operators and no identifiers.
//! Evaluation is exact, using [`rust_decimal::Decimal`].

use rust_decimal::Decimal;
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};
use thiserror::Error;

/// Errors arising from amount-expression evaluation.
///
/// Offsets are byte offsets into the original expression text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedCharacter { found: char, offset: usize },
    #[error("expected a number at offset {offset}")]
    ExpectedNumber { offset: usize },
    #[error("invalid number '{literal}' at offset {offset}")]
    InvalidLiteral { literal: String, offset: usize },
    #[error("amount overflows the supported decimal range")]
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
}

/// Evaluate an amount expression.
///
/// # Examples
///
/// ```
/// use household_ledger::core::amount::evaluate;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(evaluate("2.5 + 2.5").unwrap(), dec!(5.0));
/// assert_eq!(evaluate("-250.0").unwrap(), dec!(-250));
/// assert!(evaluate("2 * 3").is_err());
/// ```
pub fn evaluate(expression: &str) -> Result<Decimal, AmountError> {
    let mut scanner = Scanner {
        source: expression,
        chars: expression.char_indices().peekable(),
    };

    scanner.skip_whitespace();
    if scanner.chars.peek().is_none() {
        return Err(AmountError::Empty);
    }

    let mut total = scanner.signed_term()?;
    loop {
        scanner.skip_whitespace();
        let Some(&(offset, c)) = scanner.chars.peek() else {
            break;
        };
        let op = match c {
            '+' => Op::Add,
            '-' => Op::Sub,
            found => return Err(AmountError::UnexpectedCharacter { found, offset }),
        };
        scanner.chars.next();
        let term = scanner.signed_term()?;
        total = match op {
            Op::Add => total.checked_add(term),
            Op::Sub => total.checked_sub(term),
        }
        .ok_or(AmountError::Overflow)?;
    }

    Ok(total)
}

struct Scanner<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Scanner<'a> {
    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    /// A literal with at most one leading sign.
    fn signed_term(&mut self) -> Result<Decimal, AmountError> {
        self.skip_whitespace();
        let negative = match self.chars.peek() {
            Some(&(_, '-')) => {
                self.chars.next();
                true
            }
            Some(&(_, '+')) => {
                self.chars.next();
                false
            }
            _ => false,
        };
        self.skip_whitespace();
        let value = self.literal()?;
        Ok(if negative { -value } else { value })
    }

    fn literal(&mut self) -> Result<Decimal, AmountError> {
        let start = match self.chars.peek() {
            Some(&(offset, c)) if c.is_ascii_digit() || c == '.' => offset,
            Some(&(offset, _)) => return Err(AmountError::ExpectedNumber { offset }),
            None => {
                return Err(AmountError::ExpectedNumber {
                    offset: self.source.len(),
                })
            }
        };

        let mut end = start;
        while let Some((offset, c)) = self
            .chars
            .next_if(|(_, c)| c.is_ascii_digit() || *c == '.')
        {
            end = offset + c.len_utf8();
        }

        let literal = &self.source[start..end];
        if !literal.chars().any(|c| c.is_ascii_digit()) {
            return Err(AmountError::InvalidLiteral {
                literal: literal.to_string(),
                offset: start,
            });
        }
        let digits = match (literal.starts_with('.'), literal.ends_with('.')) {
            (true, _) => format!("0{literal}"),
            (false, true) => literal[..literal.len() - 1].to_string(),
            (false, false) => literal.to_string(),
        };
        Decimal::from_str(&digits).map_err(|_| AmountError::InvalidLiteral {
            literal: literal.to_string(),
            offset: start,
        })
    }
}

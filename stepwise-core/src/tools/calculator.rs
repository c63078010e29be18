//! # Calculator
//!
//! Strict two-operand arithmetic over f64.
//!
//! ## Design
//! - A character whitelist rejects anything that is not digits, whitespace,
//!   or `+ - * / ( ) .` before the grammar runs
//! - The grammar is a single regex: `<number> <op> <number>`, signed decimals
//! - No general expression evaluation: parentheses pass the whitelist but
//!   fail the grammar, so nothing resembling code is ever evaluated

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Why an expression could not be evaluated
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A character outside the whitelist
    InvalidCharacter(char),
    /// Whitelisted characters, but not `<number> <op> <number>`
    UnsupportedFormat(String),
    /// Right operand of `/` was zero
    DivisionByZero,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCharacter(ch) => {
                write!(f, "invalid character in expression: '{}'", ch)
            }
            Self::UnsupportedFormat(expr) => {
                write!(f, "unsupported calculation format: {}", expr)
            }
            Self::DivisionByZero => write!(f, "division by zero is not allowed"),
        }
    }
}

impl std::error::Error for EvalError {}

fn expression_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*([-+*/])\s*(-?\d+(?:\.\d+)?)\s*$")
            .expect("expression pattern is valid")
    })
}

/// Evaluate a symbolic two-operand expression.
///
/// Examples of accepted input: `"12 * 7"`, `"45+30"`, `"100 / 5"`, `"-2.5 * 4"`.
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    for ch in expression.chars() {
        let allowed = ch.is_ascii_digit()
            || ch.is_whitespace()
            || matches!(ch, '+' | '-' | '*' | '/' | '(' | ')' | '.');
        if !allowed {
            return Err(EvalError::InvalidCharacter(ch));
        }
    }

    let caps = expression_pattern()
        .captures(expression)
        .ok_or_else(|| EvalError::UnsupportedFormat(expression.trim().to_string()))?;

    let lhs: f64 = caps[1]
        .parse()
        .map_err(|_| EvalError::UnsupportedFormat(expression.trim().to_string()))?;
    let rhs: f64 = caps[3]
        .parse()
        .map_err(|_| EvalError::UnsupportedFormat(expression.trim().to_string()))?;

    match &caps[2] {
        "+" => Ok(lhs + rhs),
        "-" => Ok(lhs - rhs),
        "*" => Ok(lhs * rhs),
        "/" => {
            if rhs == 0.0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(lhs / rhs)
            }
        }
        _ => Err(EvalError::UnsupportedFormat(expression.trim().to_string())),
    }
}

/// Render a result the way the answer strings expect.
///
/// Integral values keep one decimal place ("30.0", not "30"); everything
/// else uses the shortest round-trip form.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        assert_eq!(evaluate("12 * 7").unwrap(), 84.0);
        assert_eq!(evaluate("45 + 30").unwrap(), 75.0);
        assert_eq!(evaluate("100 / 5").unwrap(), 20.0);
        assert_eq!(evaluate("20 - 7").unwrap(), 13.0);
    }

    #[test]
    fn test_spacing_and_decimals() {
        assert_eq!(evaluate("5*6").unwrap(), 30.0);
        assert_eq!(evaluate("  5 *   6  ").unwrap(), 30.0);
        assert_eq!(evaluate("2.5 * 4").unwrap(), 10.0);
        assert_eq!(evaluate("10 / 4").unwrap(), 2.5);
    }

    #[test]
    fn test_negative_operands() {
        assert_eq!(evaluate("-5 + 3").unwrap(), -2.0);
        assert_eq!(evaluate("6 * -2").unwrap(), -12.0);
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(evaluate("5 + x").unwrap_err(), EvalError::InvalidCharacter('x'));
        assert_eq!(
            evaluate("import os").unwrap_err(),
            EvalError::InvalidCharacter('i')
        );
    }

    #[test]
    fn test_unsupported_format() {
        // Single numbers, chained operators, and grouping are all outside
        // the two-operand grammar
        assert!(matches!(
            evaluate("42").unwrap_err(),
            EvalError::UnsupportedFormat(_)
        ));
        assert!(matches!(
            evaluate("1 + 2 + 3").unwrap_err(),
            EvalError::UnsupportedFormat(_)
        ));
        assert!(matches!(
            evaluate("(25*4)/2").unwrap_err(),
            EvalError::UnsupportedFormat(_)
        ));
        assert!(matches!(
            evaluate("5+").unwrap_err(),
            EvalError::UnsupportedFormat(_)
        ));
        assert!(matches!(
            evaluate("").unwrap_err(),
            EvalError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("10 / 0").unwrap_err(), EvalError::DivisionByZero);
        assert_eq!(evaluate("5 / 0.0").unwrap_err(), EvalError::DivisionByZero);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(30.0), "30.0");
        assert_eq!(format_number(-3.0), "-3.0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(20.0), "20.0");
    }

    #[test]
    fn test_error_display() {
        assert!(EvalError::InvalidCharacter('x')
            .to_string()
            .contains("'x'"));
        assert!(EvalError::UnsupportedFormat("1+2+3".to_string())
            .to_string()
            .contains("1+2+3"));
        assert!(EvalError::DivisionByZero.to_string().contains("zero"));
    }
}

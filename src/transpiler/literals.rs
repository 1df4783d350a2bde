//! Literal formatting.

use crate::ast::{Literal, Number};

/// Single-quote a string, doubling embedded quotes.
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

pub fn literal(value: &Literal) -> String {
    match value {
        Literal::Bool(true) => "TRUE".to_string(),
        Literal::Bool(false) => "FALSE".to_string(),
        Literal::Int(n) => n.to_string(),
        Literal::Float(f) => f.to_string(),
        Literal::String(s) => quote_string(s),
    }
}

pub fn number(value: &Number) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_doubling() {
        assert_eq!(quote_string("O'Brien"), "'O''Brien'");
        assert_eq!(quote_string("'; DROP TABLE x; --"), "'''; DROP TABLE x; --'");
        assert_eq!(quote_string(""), "''");
    }

    #[test]
    fn test_literals() {
        assert_eq!(literal(&Literal::Bool(true)), "TRUE");
        assert_eq!(literal(&Literal::Bool(false)), "FALSE");
        assert_eq!(literal(&Literal::Int(-3)), "-3");
        assert_eq!(literal(&Literal::Float(19.99)), "19.99");
        assert_eq!(literal(&"books".into()), "'books'");
        assert_eq!(number(&Number::Int(100)), "100");
    }
}

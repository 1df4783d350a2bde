use serde::{Deserialize, Serialize};

/// A numeric literal. Integers stay integers through a JSON round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn is_finite(&self) -> bool {
        match self {
            Number::Int(_) => true,
            Number::Float(f) => f.is_finite(),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Int(n) => *n == 0,
            Number::Float(f) => *f == 0.0,
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::Float(n) => write!(f, "{}", n),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Int(n)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::Int(n as i64)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::Float(n)
    }
}

/// A scalar literal value. JSON primitives map onto the variants directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Literal {
    pub fn is_string(&self) -> bool {
        matches!(self, Literal::String(_))
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Int(n as i64)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Int(n)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Float(n)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<Number> for Literal {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Literal::Int(i),
            Number::Float(f) => Literal::Float(f),
        }
    }
}

/// Right-hand side of a simple condition: a scalar, or a list for IN / NOT IN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    List(Vec<Literal>),
    Scalar(Literal),
}

impl From<Literal> for ConditionValue {
    fn from(value: Literal) -> Self {
        ConditionValue::Scalar(value)
    }
}

impl From<Vec<Literal>> for ConditionValue {
    fn from(values: Vec<Literal>) -> Self {
        ConditionValue::List(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_survive_json() {
        let lit: Literal = serde_json::from_str("42").unwrap();
        assert_eq!(lit, Literal::Int(42));
        let lit: Literal = serde_json::from_str("42.5").unwrap();
        assert_eq!(lit, Literal::Float(42.5));
        let lit: Literal = serde_json::from_str("true").unwrap();
        assert_eq!(lit, Literal::Bool(true));
        let lit: Literal = serde_json::from_str("\"it's\"").unwrap();
        assert_eq!(lit, Literal::String("it's".into()));
    }

    #[test]
    fn test_condition_value_shapes() {
        let v: ConditionValue = serde_json::from_str("[\"a\", \"b\"]").unwrap();
        assert_eq!(
            v,
            ConditionValue::List(vec![Literal::from("a"), Literal::from("b")])
        );
        let v: ConditionValue = serde_json::from_str("3").unwrap();
        assert_eq!(v, ConditionValue::Scalar(Literal::Int(3)));
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Number::Int(100).to_string(), "100");
        assert_eq!(Number::Float(0.25).to_string(), "0.25");
        assert!(!Number::Float(f64::NAN).is_finite());
        assert!(Number::Float(0.0).is_zero());
    }
}

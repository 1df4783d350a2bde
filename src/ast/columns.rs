use serde::{Deserialize, Serialize};

use crate::ast::{Column, Direction, Number, NullsOrder};

/// A column reference, optionally scoped to a FROM/JOIN alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualifiedColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_alias: Option<String>,
    pub column: Column,
}

impl QualifiedColumn {
    pub fn new(column: Column) -> Self {
        Self {
            table_alias: None,
            column,
        }
    }

    /// `alias.column`
    pub fn qualified(alias: impl Into<String>, column: Column) -> Self {
        Self {
            table_alias: Some(alias.into()),
            column,
        }
    }
}

impl From<Column> for QualifiedColumn {
    fn from(column: Column) -> Self {
        Self::new(column)
    }
}

impl std::fmt::Display for QualifiedColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.table_alias {
            Some(alias) => write!(f, "{}.{}", alias, self.column),
            None => write!(f, "{}", self.column),
        }
    }
}

/// One arithmetic operand slot: a column or a number.
///
/// Operand slots never hold another arithmetic expression; that is what keeps
/// the arithmetic grammar at a fixed depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum Operand {
    Column(QualifiedColumn),
    Number { value: Number },
}

impl Operand {
    pub fn column(column: Column) -> Self {
        Operand::Column(QualifiedColumn::new(column))
    }

    pub fn qualified(alias: impl Into<String>, column: Column) -> Self {
        Operand::Column(QualifiedColumn::qualified(alias, column))
    }

    pub fn number(value: impl Into<Number>) -> Self {
        Operand::Number {
            value: value.into(),
        }
    }
}

impl From<Column> for Operand {
    fn from(column: Column) -> Self {
        Operand::column(column)
    }
}

/// What an ORDER BY item sorts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum SortKey {
    Column(QualifiedColumn),
    /// An alias defined in the select list (e.g. `avg_price`).
    Alias { name: String },
}

impl From<Column> for SortKey {
    fn from(column: Column) -> Self {
        SortKey::Column(QualifiedColumn::new(column))
    }
}

impl From<QualifiedColumn> for SortKey {
    fn from(column: QualifiedColumn) -> Self {
        SortKey::Column(column)
    }
}

/// A single ORDER BY entry. Direction defaults to DESC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderByItem {
    pub column: SortKey,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls: Option<NullsOrder>,
}

impl OrderByItem {
    pub fn new(column: impl Into<SortKey>, direction: Direction) -> Self {
        Self {
            column: column.into(),
            direction,
            nulls: None,
        }
    }

    pub fn asc(column: impl Into<SortKey>) -> Self {
        Self::new(column, Direction::Asc)
    }

    pub fn desc(column: impl Into<SortKey>) -> Self {
        Self::new(column, Direction::Desc)
    }

    /// Sort by a select-list alias.
    pub fn alias(name: impl Into<String>, direction: Direction) -> Self {
        Self::new(SortKey::Alias { name: name.into() }, direction)
    }

    pub fn nulls(mut self, nulls: NullsOrder) -> Self {
        self.nulls = Some(nulls);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_json_shape() {
        let op = Operand::qualified("my", Column::RegularPrice);
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "column", "table_alias": "my", "column": "regular_price"})
        );
        let op = Operand::number(100);
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "number", "value": 100}));
    }

    #[test]
    fn test_order_item_defaults_to_desc() {
        let item: OrderByItem =
            serde_json::from_str(r#"{"column": {"kind": "column", "column": "price"}}"#).unwrap();
        assert_eq!(item.direction, Direction::Desc);
        assert_eq!(item.nulls, None);
    }

    #[test]
    fn test_qualified_display() {
        assert_eq!(
            QualifiedColumn::qualified("comp", Column::Id).to_string(),
            "comp.id"
        );
        assert_eq!(QualifiedColumn::new(Column::Brand).to_string(), "brand");
    }
}

//! WHERE / ON predicates.
//!
//! WHERE comes in two depths: [`WhereL1`] for the top-level query, which may
//! carry scalar subqueries, and [`WhereL0`] for everything nested inside one.
//! `WhereL0` has no subquery slot and rejects unknown fields, so a subquery can
//! never contain another subquery.

use serde::{Deserialize, Serialize};

use crate::ast::{
    AggregateExpr, Column, ComparisonOp, ConditionValue, Literal, LogicOp, QualifiedColumn, Table,
};
use crate::error::ValidationError;
use crate::validator::Validate;

/// `column OP value`; list value for IN / NOT IN, no value for IS [NOT] NULL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimpleCondition {
    pub column: QualifiedColumn,
    pub operator: ComparisonOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ConditionValue>,
}

impl SimpleCondition {
    pub fn new(
        column: impl Into<QualifiedColumn>,
        operator: ComparisonOp,
        value: impl Into<Literal>,
    ) -> Result<Self, ValidationError> {
        let cond = Self {
            column: column.into(),
            operator,
            value: Some(ConditionValue::Scalar(value.into())),
        };
        cond.validate()?;
        Ok(cond)
    }

    pub fn eq(
        column: impl Into<QualifiedColumn>,
        value: impl Into<Literal>,
    ) -> Result<Self, ValidationError> {
        Self::new(column, ComparisonOp::Eq, value)
    }

    pub fn in_list<L: Into<Literal>>(
        column: impl Into<QualifiedColumn>,
        values: impl IntoIterator<Item = L>,
    ) -> Result<Self, ValidationError> {
        Self::list(column, ComparisonOp::In, values)
    }

    pub fn not_in<L: Into<Literal>>(
        column: impl Into<QualifiedColumn>,
        values: impl IntoIterator<Item = L>,
    ) -> Result<Self, ValidationError> {
        Self::list(column, ComparisonOp::NotIn, values)
    }

    fn list<L: Into<Literal>>(
        column: impl Into<QualifiedColumn>,
        operator: ComparisonOp,
        values: impl IntoIterator<Item = L>,
    ) -> Result<Self, ValidationError> {
        let cond = Self {
            column: column.into(),
            operator,
            value: Some(ConditionValue::List(
                values.into_iter().map(Into::into).collect(),
            )),
        };
        cond.validate()?;
        Ok(cond)
    }

    pub fn is_null(column: impl Into<QualifiedColumn>) -> Self {
        Self {
            column: column.into(),
            operator: ComparisonOp::IsNull,
            value: None,
        }
    }

    pub fn is_not_null(column: impl Into<QualifiedColumn>) -> Self {
        Self {
            column: column.into(),
            operator: ComparisonOp::IsNotNull,
            value: None,
        }
    }
}

/// `left OP right` between two columns (JOIN ON, cross-table predicates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnComparison {
    pub left: QualifiedColumn,
    pub operator: ComparisonOp,
    pub right: QualifiedColumn,
}

impl ColumnComparison {
    pub fn new(
        left: impl Into<QualifiedColumn>,
        operator: ComparisonOp,
        right: impl Into<QualifiedColumn>,
    ) -> Result<Self, ValidationError> {
        let cond = Self {
            left: left.into(),
            operator,
            right: right.into(),
        };
        cond.validate()?;
        Ok(cond)
    }
}

/// `column BETWEEN low AND high`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BetweenCondition {
    pub column: QualifiedColumn,
    pub low: Literal,
    pub high: Literal,
}

impl BetweenCondition {
    pub fn new(
        column: impl Into<QualifiedColumn>,
        low: impl Into<Literal>,
        high: impl Into<Literal>,
    ) -> Result<Self, ValidationError> {
        let cond = Self {
            column: column.into(),
            low: low.into(),
            high: high.into(),
        };
        cond.validate()?;
        Ok(cond)
    }
}

/// A single predicate, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    Simple(SimpleCondition),
    ColumnComparison(ColumnComparison),
    Between(BetweenCondition),
}

impl From<SimpleCondition> for Condition {
    fn from(c: SimpleCondition) -> Self {
        Condition::Simple(c)
    }
}

impl From<ColumnComparison> for Condition {
    fn from(c: ColumnComparison) -> Self {
        Condition::ColumnComparison(c)
    }
}

impl From<BetweenCondition> for Condition {
    fn from(c: BetweenCondition) -> Self {
        Condition::Between(c)
    }
}

/// Conditions combined with one logic operator. No mixed logic inside a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionGroup {
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub logic: LogicOp,
}

impl ConditionGroup {
    pub fn new(conditions: Vec<Condition>, logic: LogicOp) -> Result<Self, ValidationError> {
        let group = Self { conditions, logic };
        group.validate()?;
        Ok(group)
    }

    pub fn all(conditions: Vec<Condition>) -> Result<Self, ValidationError> {
        Self::new(conditions, LogicOp::And)
    }

    pub fn any(conditions: Vec<Condition>) -> Result<Self, ValidationError> {
        Self::new(conditions, LogicOp::Or)
    }

    /// Group holding exactly one condition.
    pub fn single(condition: impl Into<Condition>) -> Self {
        Self {
            conditions: vec![condition.into()],
            logic: LogicOp::And,
        }
    }
}

/// WHERE without subqueries; used inside subqueries and derived tables.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WhereL0 {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<ConditionGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub between: Vec<BetweenCondition>,
    #[serde(default)]
    pub group_logic: LogicOp,
}

impl WhereL0 {
    pub fn new(
        groups: Vec<ConditionGroup>,
        between: Vec<BetweenCondition>,
        group_logic: LogicOp,
    ) -> Result<Self, ValidationError> {
        let clause = Self {
            groups,
            between,
            group_logic,
        };
        clause.validate()?;
        Ok(clause)
    }

    /// All given groups ANDed together.
    pub fn and(groups: Vec<ConditionGroup>) -> Result<Self, ValidationError> {
        Self::new(groups, Vec::new(), LogicOp::And)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.between.is_empty()
    }
}

/// Top-level WHERE: everything in [`WhereL0`] plus scalar subquery conditions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WhereL1 {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<ConditionGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub between: Vec<BetweenCondition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subqueries: Vec<SubqueryCondition>,
    #[serde(default)]
    pub group_logic: LogicOp,
}

impl WhereL1 {
    pub fn new(
        groups: Vec<ConditionGroup>,
        between: Vec<BetweenCondition>,
        subqueries: Vec<SubqueryCondition>,
        group_logic: LogicOp,
    ) -> Result<Self, ValidationError> {
        let clause = Self {
            groups,
            between,
            subqueries,
            group_logic,
        };
        clause.validate()?;
        Ok(clause)
    }

    /// All given groups ANDed together.
    pub fn and(groups: Vec<ConditionGroup>) -> Result<Self, ValidationError> {
        Self::new(groups, Vec::new(), Vec::new(), LogicOp::And)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.between.is_empty() && self.subqueries.is_empty()
    }
}

impl From<WhereL0> for WhereL1 {
    fn from(w: WhereL0) -> Self {
        Self {
            groups: w.groups,
            between: w.between,
            subqueries: Vec::new(),
            group_logic: w.group_logic,
        }
    }
}

/// `column OP (SELECT agg FROM table ...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubqueryCondition {
    pub column: QualifiedColumn,
    pub operator: ComparisonOp,
    pub subquery: ScalarSubquery,
}

impl SubqueryCondition {
    pub fn new(
        column: impl Into<QualifiedColumn>,
        operator: ComparisonOp,
        subquery: ScalarSubquery,
    ) -> Result<Self, ValidationError> {
        let cond = Self {
            column: column.into(),
            operator,
            subquery,
        };
        cond.validate()?;
        Ok(cond)
    }
}

/// `SELECT agg FROM table [WHERE ...] [GROUP BY ...]`, one level deep only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScalarSubquery {
    pub table: Table,
    /// Alias for correlating against the enclosing query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_alias: Option<String>,
    pub aggregate: AggregateExpr,
    #[serde(
        rename = "where",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub where_clause: Option<WhereL0>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<Column>,
}

impl ScalarSubquery {
    pub fn new(table: Table, aggregate: AggregateExpr) -> Self {
        Self {
            table,
            table_alias: None,
            aggregate,
            where_clause: None,
            group_by: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.table_alias = Some(alias.into());
        self
    }

    pub fn filter(mut self, where_clause: WhereL0) -> Self {
        self.where_clause = Some(where_clause);
        self
    }

    pub fn group_by(mut self, columns: Vec<Column>) -> Self {
        self.group_by = columns;
        self
    }
}

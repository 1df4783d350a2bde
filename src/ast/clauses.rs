use serde::{Deserialize, Serialize};

use crate::ast::{
    AggregateFunc, Column, ComparisonOp, ConditionGroup, JoinType, Literal, LogicOp, OrderByItem,
    QualifiedColumn, SelectExpr, Table, WhereL0,
};
use crate::error::ValidationError;
use crate::validator::Validate;

/// FROM source: exactly one of `table` / `derived`, plus joins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FromClause {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_alias: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<JoinSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived: Option<DerivedTable>,
}

impl FromClause {
    pub fn table(table: Table) -> Self {
        Self {
            table: Some(table),
            table_alias: None,
            joins: Vec::new(),
            derived: None,
        }
    }

    pub fn aliased(table: Table, alias: impl Into<String>) -> Self {
        Self {
            table: Some(table),
            table_alias: Some(alias.into()),
            joins: Vec::new(),
            derived: None,
        }
    }

    pub fn derived(derived: DerivedTable) -> Self {
        Self {
            table: None,
            table_alias: None,
            joins: Vec::new(),
            derived: Some(derived),
        }
    }

    pub fn join(mut self, join: JoinSpec) -> Self {
        self.joins.push(join);
        self
    }
}

impl From<Table> for FromClause {
    fn from(table: Table) -> Self {
        Self::table(table)
    }
}

/// `JOIN_TYPE JOIN table [AS alias] ON ...`; multiple groups are ANDed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinSpec {
    pub join_type: JoinType,
    pub table: Table,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_alias: Option<String>,
    pub on_conditions: Vec<ConditionGroup>,
}

impl JoinSpec {
    pub fn new(
        join_type: JoinType,
        table: Table,
        table_alias: Option<String>,
        on_conditions: Vec<ConditionGroup>,
    ) -> Result<Self, ValidationError> {
        let join = Self {
            join_type,
            table,
            table_alias,
            on_conditions,
        };
        join.validate()?;
        Ok(join)
    }

    pub fn inner(
        table: Table,
        alias: impl Into<String>,
        on_conditions: Vec<ConditionGroup>,
    ) -> Result<Self, ValidationError> {
        Self::new(JoinType::Inner, table, Some(alias.into()), on_conditions)
    }

    pub fn left(
        table: Table,
        alias: impl Into<String>,
        on_conditions: Vec<ConditionGroup>,
    ) -> Result<Self, ValidationError> {
        Self::new(JoinType::Left, table, Some(alias.into()), on_conditions)
    }
}

/// Single-level subquery in FROM. Has no derived slot of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DerivedTable {
    pub select: Vec<SelectExpr>,
    pub from_table: Table,
    pub alias: String,
    #[serde(
        rename = "where",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub where_clause: Option<WhereL0>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<Column>,
}

impl DerivedTable {
    pub fn new(
        select: Vec<SelectExpr>,
        from_table: Table,
        alias: impl Into<String>,
        where_clause: Option<WhereL0>,
        group_by: Vec<Column>,
    ) -> Result<Self, ValidationError> {
        let derived = Self {
            select,
            from_table,
            alias: alias.into(),
            where_clause,
            group_by,
        };
        derived.validate()?;
        Ok(derived)
    }
}

/// `GROUP BY c1, c2`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupByClause {
    pub columns: Vec<Column>,
}

impl GroupByClause {
    pub fn new(columns: Vec<Column>) -> Result<Self, ValidationError> {
        let clause = Self { columns };
        clause.validate()?;
        Ok(clause)
    }
}

/// `FUNC(column|*) OP value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HavingCondition {
    pub function: AggregateFunc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<QualifiedColumn>,
    pub operator: ComparisonOp,
    pub value: Literal,
}

impl HavingCondition {
    pub fn new(
        function: AggregateFunc,
        column: Option<QualifiedColumn>,
        operator: ComparisonOp,
        value: impl Into<Literal>,
    ) -> Result<Self, ValidationError> {
        let cond = Self {
            function,
            column,
            operator,
            value: value.into(),
        };
        cond.validate()?;
        Ok(cond)
    }

    /// `COUNT(*) OP value`
    pub fn count_star(operator: ComparisonOp, value: impl Into<Literal>) -> Result<Self, ValidationError> {
        Self::new(AggregateFunc::Count, None, operator, value)
    }
}

/// HAVING conditions joined by one logic operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HavingClause {
    pub conditions: Vec<HavingCondition>,
    #[serde(default)]
    pub logic: LogicOp,
}

impl HavingClause {
    pub fn new(conditions: Vec<HavingCondition>, logic: LogicOp) -> Result<Self, ValidationError> {
        let clause = Self { conditions, logic };
        clause.validate()?;
        Ok(clause)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderByClause {
    pub items: Vec<OrderByItem>,
}

impl OrderByClause {
    pub fn new(items: Vec<OrderByItem>) -> Result<Self, ValidationError> {
        let clause = Self { items };
        clause.validate()?;
        Ok(clause)
    }
}

/// `LIMIT n [OFFSET m]`; OFFSET is omitted when zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitClause {
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

impl LimitClause {
    pub fn new(limit: u64) -> Self {
        Self { limit, offset: 0 }
    }

    pub fn with_offset(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }
}

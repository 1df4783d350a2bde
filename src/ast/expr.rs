//! Select-list expressions.
//!
//! Two arithmetic shapes exist: a flat [`BinaryArithmetic`] and a two-level
//! [`CompoundArithmetic`]. Their operand slots are [`Operand`]s, so nothing
//! deeper can be expressed.

use serde::{Deserialize, Serialize};

use crate::ast::{
    AggregateFunc, ArithmeticOp, Column, Literal, Operand, OrderByItem, QualifiedColumn,
    SimpleCondition, WindowFunc,
};
use crate::error::ValidationError;
use crate::validator::Validate;

/// One item of a SELECT list, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectExpr {
    Column(ColumnExpr),
    BinaryArithmetic(BinaryArithmetic),
    CompoundArithmetic(CompoundArithmetic),
    Aggregate(AggregateExpr),
    Window(WindowExpr),
    Case(CaseExpr),
}

impl SelectExpr {
    /// Bare column.
    pub fn column(column: Column) -> Self {
        SelectExpr::Column(ColumnExpr::new(column))
    }

    /// Output name of this item, if it has one.
    pub fn alias(&self) -> Option<&str> {
        match self {
            SelectExpr::Column(c) => c.alias.as_deref(),
            SelectExpr::BinaryArithmetic(b) => Some(b.alias.as_str()),
            SelectExpr::CompoundArithmetic(c) => Some(c.alias.as_str()),
            SelectExpr::Aggregate(a) => Some(a.alias.as_str()),
            SelectExpr::Window(w) => Some(w.alias.as_str()),
            SelectExpr::Case(c) => Some(c.alias.as_str()),
        }
    }

    /// Name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            SelectExpr::Column(_) => "ColumnExpr",
            SelectExpr::BinaryArithmetic(_) => "BinaryArithmetic",
            SelectExpr::CompoundArithmetic(_) => "CompoundArithmetic",
            SelectExpr::Aggregate(_) => "AggregateExpr",
            SelectExpr::Window(_) => "WindowExpr",
            SelectExpr::Case(_) => "CaseExpr",
        }
    }
}

impl From<ColumnExpr> for SelectExpr {
    fn from(e: ColumnExpr) -> Self {
        SelectExpr::Column(e)
    }
}

impl From<BinaryArithmetic> for SelectExpr {
    fn from(e: BinaryArithmetic) -> Self {
        SelectExpr::BinaryArithmetic(e)
    }
}

impl From<CompoundArithmetic> for SelectExpr {
    fn from(e: CompoundArithmetic) -> Self {
        SelectExpr::CompoundArithmetic(e)
    }
}

impl From<AggregateExpr> for SelectExpr {
    fn from(e: AggregateExpr) -> Self {
        SelectExpr::Aggregate(e)
    }
}

impl From<WindowExpr> for SelectExpr {
    fn from(e: WindowExpr) -> Self {
        SelectExpr::Window(e)
    }
}

impl From<CaseExpr> for SelectExpr {
    fn from(e: CaseExpr) -> Self {
        SelectExpr::Case(e)
    }
}

/// `[alias.]column [AS alias]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnExpr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_alias: Option<String>,
    pub column: Column,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl ColumnExpr {
    pub fn new(column: Column) -> Self {
        Self {
            table_alias: None,
            column,
            alias: None,
        }
    }

    pub fn qualified(table_alias: impl Into<String>, column: Column) -> Self {
        Self {
            table_alias: Some(table_alias.into()),
            column,
            alias: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn qualified_column(&self) -> QualifiedColumn {
        QualifiedColumn {
            table_alias: self.table_alias.clone(),
            column: self.column,
        }
    }
}

/// `(left OP right) AS alias`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BinaryArithmetic {
    pub left: Operand,
    pub op: ArithmeticOp,
    pub right: Operand,
    pub alias: String,
}

impl BinaryArithmetic {
    pub fn new(
        left: impl Into<Operand>,
        op: ArithmeticOp,
        right: impl Into<Operand>,
        alias: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let expr = Self {
            left: left.into(),
            op,
            right: right.into(),
            alias: alias.into(),
        };
        expr.validate()?;
        Ok(expr)
    }
}

/// `((inner_left INNER_OP inner_right) OUTER_OP outer) AS alias`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompoundArithmetic {
    pub inner_left: Operand,
    pub inner_op: ArithmeticOp,
    pub inner_right: Operand,
    pub outer_op: ArithmeticOp,
    pub outer: Operand,
    pub alias: String,
}

impl CompoundArithmetic {
    pub fn new(
        inner: (Operand, ArithmeticOp, Operand),
        outer_op: ArithmeticOp,
        outer: impl Into<Operand>,
        alias: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let (inner_left, inner_op, inner_right) = inner;
        let expr = Self {
            inner_left,
            inner_op,
            inner_right,
            outer_op,
            outer: outer.into(),
            alias: alias.into(),
        };
        expr.validate()?;
        Ok(expr)
    }
}

/// Unaliased `left OP right`, used as an aggregate argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArithmeticInput {
    pub left: Operand,
    pub op: ArithmeticOp,
    pub right: Operand,
}

/// What an aggregate consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregateInput {
    Column(QualifiedColumn),
    Arithmetic(ArithmeticInput),
}

impl From<Column> for AggregateInput {
    fn from(column: Column) -> Self {
        AggregateInput::Column(QualifiedColumn::new(column))
    }
}

impl From<QualifiedColumn> for AggregateInput {
    fn from(column: QualifiedColumn) -> Self {
        AggregateInput::Column(column)
    }
}

impl From<ArithmeticInput> for AggregateInput {
    fn from(input: ArithmeticInput) -> Self {
        AggregateInput::Arithmetic(input)
    }
}

/// `FUNC([DISTINCT] arg) AS alias`. No input means `COUNT(*)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregateExpr {
    pub function: AggregateFunc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<AggregateInput>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub distinct: bool,
    /// Fraction in [0, 1] for PERCENTILE_CONT / PERCENTILE_DISC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,
    pub alias: String,
}

impl AggregateExpr {
    pub fn new(
        function: AggregateFunc,
        input: Option<AggregateInput>,
        alias: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let expr = Self {
            function,
            input,
            distinct: false,
            percentile: None,
            alias: alias.into(),
        };
        expr.validate()?;
        Ok(expr)
    }

    /// `COUNT(*) AS alias`
    pub fn count_star(alias: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(AggregateFunc::Count, None, alias)
    }

    /// `FUNC(column) AS alias`
    pub fn of(
        function: AggregateFunc,
        input: impl Into<AggregateInput>,
        alias: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::new(function, Some(input.into()), alias)
    }

    /// `FUNC(DISTINCT column) AS alias`
    pub fn distinct(
        function: AggregateFunc,
        input: impl Into<AggregateInput>,
        alias: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let expr = Self {
            function,
            input: Some(input.into()),
            distinct: true,
            percentile: None,
            alias: alias.into(),
        };
        expr.validate()?;
        Ok(expr)
    }

    /// `PERCENTILE_CONT(p) WITHIN GROUP (ORDER BY column) AS alias`
    pub fn percentile(
        function: AggregateFunc,
        input: impl Into<AggregateInput>,
        fraction: f64,
        alias: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let expr = Self {
            function,
            input: Some(input.into()),
            distinct: false,
            percentile: Some(fraction),
            alias: alias.into(),
        };
        expr.validate()?;
        Ok(expr)
    }
}

/// `FUNC(arg) OVER (PARTITION BY ... ORDER BY ...) AS alias`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowExpr {
    pub function: WindowFunc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<QualifiedColumn>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partition_by: Vec<QualifiedColumn>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderByItem>,
    /// LAG/LEAD row offset; 1 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// LAG/LEAD value used past the partition edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Literal>,
    pub alias: String,
}

impl WindowExpr {
    pub fn builder(function: WindowFunc, alias: impl Into<String>) -> WindowExprBuilder {
        WindowExprBuilder {
            expr: WindowExpr {
                function,
                column: None,
                partition_by: Vec::new(),
                order_by: Vec::new(),
                offset: None,
                default: None,
                alias: alias.into(),
            },
        }
    }
}

/// Builder for [`WindowExpr`]; validation runs in `build`.
#[derive(Debug)]
pub struct WindowExprBuilder {
    expr: WindowExpr,
}

impl WindowExprBuilder {
    pub fn column(mut self, column: impl Into<QualifiedColumn>) -> Self {
        self.expr.column = Some(column.into());
        self
    }

    pub fn partition_by(mut self, column: impl Into<QualifiedColumn>) -> Self {
        self.expr.partition_by.push(column.into());
        self
    }

    pub fn order_by(mut self, item: OrderByItem) -> Self {
        self.expr.order_by.push(item);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.expr.offset = Some(offset);
        self
    }

    pub fn default_value(mut self, value: impl Into<Literal>) -> Self {
        self.expr.default = Some(value.into());
        self
    }

    pub fn build(self) -> Result<WindowExpr, ValidationError> {
        self.expr.validate()?;
        Ok(self.expr)
    }
}

/// THEN / ELSE result of a CASE branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum CaseResult {
    Column(QualifiedColumn),
    Literal { value: Literal },
}

impl CaseResult {
    pub fn literal(value: impl Into<Literal>) -> Self {
        CaseResult::Literal {
            value: value.into(),
        }
    }
}

impl From<Column> for CaseResult {
    fn from(column: Column) -> Self {
        CaseResult::Column(QualifiedColumn::new(column))
    }
}

/// `WHEN condition THEN result`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseWhen {
    pub condition: SimpleCondition,
    pub result: CaseResult,
}

impl CaseWhen {
    pub fn new(condition: SimpleCondition, result: CaseResult) -> Self {
        Self { condition, result }
    }
}

/// `CASE WHEN ... THEN ... [ELSE ...] END AS alias`. Missing ELSE renders `ELSE NULL`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseExpr {
    pub branches: Vec<CaseWhen>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub else_result: Option<CaseResult>,
    pub alias: String,
}

impl CaseExpr {
    pub fn new(
        branches: Vec<CaseWhen>,
        else_result: Option<CaseResult>,
        alias: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let expr = Self {
            branches,
            else_result,
            alias: alias.into(),
        };
        expr.validate()?;
        Ok(expr)
    }
}

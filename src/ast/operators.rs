use serde::{Deserialize, Serialize};

/// Arithmetic operators for computed select expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithmeticOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
}

impl ArithmeticOp {
    pub const ALL: &'static [ArithmeticOp] = &[
        ArithmeticOp::Add,
        ArithmeticOp::Sub,
        ArithmeticOp::Mul,
        ArithmeticOp::Div,
    ];

    pub fn sql_symbol(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
        }
    }
}

impl std::fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sql_symbol())
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    /// Equal (=)
    #[serde(rename = "=")]
    Eq,
    /// Not equal (!=)
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "LIKE")]
    Like,
    /// Case-insensitive pattern match (Postgres)
    #[serde(rename = "ILIKE")]
    ILike,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "NOT IN")]
    NotIn,
    #[serde(rename = "IS NULL")]
    IsNull,
    #[serde(rename = "IS NOT NULL")]
    IsNotNull,
}

impl ComparisonOp {
    pub const ALL: &'static [ComparisonOp] = &[
        ComparisonOp::Eq,
        ComparisonOp::Ne,
        ComparisonOp::Gt,
        ComparisonOp::Lt,
        ComparisonOp::Gte,
        ComparisonOp::Lte,
        ComparisonOp::Like,
        ComparisonOp::ILike,
        ComparisonOp::In,
        ComparisonOp::NotIn,
        ComparisonOp::IsNull,
        ComparisonOp::IsNotNull,
    ];

    pub fn sql_symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Gte => ">=",
            ComparisonOp::Lte => "<=",
            ComparisonOp::Like => "LIKE",
            ComparisonOp::ILike => "ILIKE",
            ComparisonOp::In => "IN",
            ComparisonOp::NotIn => "NOT IN",
            ComparisonOp::IsNull => "IS NULL",
            ComparisonOp::IsNotNull => "IS NOT NULL",
        }
    }

    /// IN / NOT IN take a list operand.
    pub fn takes_list(&self) -> bool {
        matches!(self, ComparisonOp::In | ComparisonOp::NotIn)
    }

    /// IS NULL / IS NOT NULL take no operand.
    pub fn takes_no_value(&self) -> bool {
        matches!(self, ComparisonOp::IsNull | ComparisonOp::IsNotNull)
    }

    /// Plain ordering/equality operators (valid between two columns or against an aggregate).
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            ComparisonOp::Eq
                | ComparisonOp::Ne
                | ComparisonOp::Gt
                | ComparisonOp::Lt
                | ComparisonOp::Gte
                | ComparisonOp::Lte
        )
    }
}

impl std::fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sql_symbol())
    }
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    /// COUNT(DISTINCT col)
    CountDistinct,
    Stddev,
    StddevPop,
    Variance,
    VarPop,
    /// PERCENTILE_CONT(p) WITHIN GROUP (ORDER BY col)
    PercentileCont,
    /// PERCENTILE_DISC(p) WITHIN GROUP (ORDER BY col)
    PercentileDisc,
    /// PERCENTILE_CONT(0.5)
    Median,
}

impl AggregateFunc {
    pub const ALL: &'static [AggregateFunc] = &[
        AggregateFunc::Count,
        AggregateFunc::Sum,
        AggregateFunc::Avg,
        AggregateFunc::Min,
        AggregateFunc::Max,
        AggregateFunc::CountDistinct,
        AggregateFunc::Stddev,
        AggregateFunc::StddevPop,
        AggregateFunc::Variance,
        AggregateFunc::VarPop,
        AggregateFunc::PercentileCont,
        AggregateFunc::PercentileDisc,
        AggregateFunc::Median,
    ];

    /// Name of the IR symbol (matches the serde tag).
    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunc::Count => "COUNT",
            AggregateFunc::Sum => "SUM",
            AggregateFunc::Avg => "AVG",
            AggregateFunc::Min => "MIN",
            AggregateFunc::Max => "MAX",
            AggregateFunc::CountDistinct => "COUNT_DISTINCT",
            AggregateFunc::Stddev => "STDDEV",
            AggregateFunc::StddevPop => "STDDEV_POP",
            AggregateFunc::Variance => "VARIANCE",
            AggregateFunc::VarPop => "VAR_POP",
            AggregateFunc::PercentileCont => "PERCENTILE_CONT",
            AggregateFunc::PercentileDisc => "PERCENTILE_DISC",
            AggregateFunc::Median => "MEDIAN",
        }
    }

    /// SQL function name as emitted.
    pub fn sql_name(&self) -> &'static str {
        match self {
            AggregateFunc::CountDistinct => "COUNT",
            AggregateFunc::Median => "PERCENTILE_CONT",
            other => other.name(),
        }
    }

    /// Ordered-set aggregates rendered with WITHIN GROUP.
    pub fn is_percentile(&self) -> bool {
        matches!(
            self,
            AggregateFunc::PercentileCont | AggregateFunc::PercentileDisc | AggregateFunc::Median
        )
    }

    /// Whether the caller must supply the percentile fraction.
    pub fn requires_fraction(&self) -> bool {
        matches!(
            self,
            AggregateFunc::PercentileCont | AggregateFunc::PercentileDisc
        )
    }
}

impl std::fmt::Display for AggregateFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Window functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WindowFunc {
    Rank,
    DenseRank,
    RowNumber,
    Lag,
    Lead,
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

impl WindowFunc {
    pub const ALL: &'static [WindowFunc] = &[
        WindowFunc::Rank,
        WindowFunc::DenseRank,
        WindowFunc::RowNumber,
        WindowFunc::Lag,
        WindowFunc::Lead,
        WindowFunc::Sum,
        WindowFunc::Avg,
        WindowFunc::Min,
        WindowFunc::Max,
        WindowFunc::Count,
    ];

    pub fn sql_name(&self) -> &'static str {
        match self {
            WindowFunc::Rank => "RANK",
            WindowFunc::DenseRank => "DENSE_RANK",
            WindowFunc::RowNumber => "ROW_NUMBER",
            WindowFunc::Lag => "LAG",
            WindowFunc::Lead => "LEAD",
            WindowFunc::Sum => "SUM",
            WindowFunc::Avg => "AVG",
            WindowFunc::Min => "MIN",
            WindowFunc::Max => "MAX",
            WindowFunc::Count => "COUNT",
        }
    }

    /// RANK, DENSE_RANK and ROW_NUMBER take no argument.
    pub fn is_ranking(&self) -> bool {
        matches!(
            self,
            WindowFunc::Rank | WindowFunc::DenseRank | WindowFunc::RowNumber
        )
    }

    /// LAG and LEAD accept offset/default.
    pub fn is_offset(&self) -> bool {
        matches!(self, WindowFunc::Lag | WindowFunc::Lead)
    }
}

impl std::fmt::Display for WindowFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    Inner,
    Left,
}

impl JoinType {
    pub const ALL: &'static [JoinType] = &[JoinType::Inner, JoinType::Left];

    pub fn sql_keyword(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
        }
    }
}

/// Logical operator between conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicOp {
    #[default]
    And,
    Or,
}

impl LogicOp {
    pub const ALL: &'static [LogicOp] = &[LogicOp::And, LogicOp::Or];

    pub fn sql_keyword(&self) -> &'static str {
        match self {
            LogicOp::And => "AND",
            LogicOp::Or => "OR",
        }
    }

    /// Separator used to join rendered conditions.
    pub fn joiner(&self) -> &'static str {
        match self {
            LogicOp::And => " AND ",
            LogicOp::Or => " OR ",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

impl Direction {
    pub const ALL: &'static [Direction] = &[Direction::Asc, Direction::Desc];

    pub fn sql_keyword(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// NULLS FIRST / NULLS LAST placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NullsOrder {
    First,
    Last,
}

impl NullsOrder {
    pub const ALL: &'static [NullsOrder] = &[NullsOrder::First, NullsOrder::Last];

    pub fn sql_keyword(&self) -> &'static str {
        match self {
            NullsOrder::First => "NULLS FIRST",
            NullsOrder::Last => "NULLS LAST",
        }
    }
}

pub mod catalog;
pub mod clauses;
pub mod columns;
pub mod conditions;
pub mod expr;
pub mod operators;
pub mod query;
pub mod values;

pub use self::catalog::{Column, Table};
pub use self::clauses::{
    DerivedTable, FromClause, GroupByClause, HavingClause, HavingCondition, JoinSpec, LimitClause,
    OrderByClause,
};
pub use self::columns::{Operand, OrderByItem, QualifiedColumn, SortKey};
pub use self::conditions::{
    BetweenCondition, ColumnComparison, Condition, ConditionGroup, ScalarSubquery,
    SimpleCondition, SubqueryCondition, WhereL0, WhereL1,
};
pub use self::expr::{
    AggregateExpr, AggregateInput, ArithmeticInput, BinaryArithmetic, CaseExpr, CaseResult,
    CaseWhen, ColumnExpr, CompoundArithmetic, SelectExpr, WindowExpr, WindowExprBuilder,
};
pub use self::operators::{
    AggregateFunc, ArithmeticOp, ComparisonOp, Direction, JoinType, LogicOp, NullsOrder,
    WindowFunc,
};
pub use self::query::{Query, QueryBuilder};
pub use self::values::{ConditionValue, Literal, Number};

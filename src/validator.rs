//! Construction-time invariants for every IR entity.
//!
//! Constructors call [`Validate::validate`] before handing back a value, and
//! [`Query::from_json`](crate::ast::Query::from_json) runs it after decoding, so
//! any `Query` obtained through the public constructors already satisfies the
//! rules below. The translator still guards against struct literals that
//! bypassed them.

use crate::ast::*;
use crate::config::TranslatorConfig;
use crate::error::{QirError, ValidationError};
use crate::scope;

/// SQL reserved words that may not be used as caller-supplied aliases.
pub const RESERVED_WORDS: &[&str] = &[
    "all", "and", "as", "asc", "between", "by", "case", "check", "constraint", "create",
    "default", "delete", "desc", "distinct", "drop", "else", "end", "false", "first",
    "foreign", "from", "group", "having", "ilike", "in", "index", "inner", "insert",
    "is", "join", "key", "last", "left", "like", "limit", "not", "null", "nulls",
    "offset", "on", "or", "order", "outer", "over", "partition", "primary",
    "references", "right", "select", "table", "then", "true", "union", "update", "user",
    "when", "where", "window", "with",
];

/// Postgres truncates identifiers beyond this length.
const MAX_IDENTIFIER_LEN: usize = 63;

/// Checks an entity's field-combination invariants.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Whether `name` can be emitted unquoted as an alias.
pub fn is_valid_identifier(name: &str) -> bool {
    let starts_ok = name
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    starts_ok
        && name.len() <= MAX_IDENTIFIER_LEN
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RESERVED_WORDS.contains(&name.to_ascii_lowercase().as_str())
}

/// Resolve every table qualifier in `query` against the FROM/JOIN aliases.
pub fn check_aliases(query: &Query) -> Result<(), ValidationError> {
    match scope::check_query(query, &TranslatorConfig::default()) {
        Ok(()) => Ok(()),
        Err(QirError::Validation(err)) => Err(err),
        Err(QirError::UnresolvedAlias { alias, reference }) => {
            Err(ValidationError::UnresolvedAlias { alias, reference })
        }
        Err(other) => Err(ValidationError::Malformed(other.to_string())),
    }
}

fn identifier(entity: &'static str, value: &str) -> Result<(), ValidationError> {
    if is_valid_identifier(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidIdentifier {
            entity,
            value: value.to_string(),
        })
    }
}

fn optional_identifier(entity: &'static str, value: Option<&String>) -> Result<(), ValidationError> {
    match value {
        Some(v) => identifier(entity, v),
        None => Ok(()),
    }
}

fn literal(entity: &'static str, field: &'static str, value: &Literal) -> Result<(), ValidationError> {
    match value {
        Literal::Float(f) if !f.is_finite() => Err(ValidationError::out_of_range(
            entity,
            field,
            format!("{} is not a finite number", f),
        )),
        Literal::String(s) if s.contains('\0') => Err(ValidationError::out_of_range(
            entity,
            field,
            "string literal contains a NUL byte",
        )),
        _ => Ok(()),
    }
}

fn operand(entity: &'static str, field: &'static str, value: &Operand) -> Result<(), ValidationError> {
    match value {
        Operand::Column(column) => column.validate(),
        Operand::Number { value } if !value.is_finite() => Err(ValidationError::out_of_range(
            entity,
            field,
            format!("{} is not a finite number", value),
        )),
        Operand::Number { .. } => Ok(()),
    }
}

fn division(
    entity: &'static str,
    field: &'static str,
    op: ArithmeticOp,
    divisor: &Operand,
) -> Result<(), ValidationError> {
    match divisor {
        Operand::Number { value } if op == ArithmeticOp::Div && value.is_zero() => Err(
            ValidationError::out_of_range(entity, field, "division by a zero literal"),
        ),
        _ => Ok(()),
    }
}

fn operator_mismatch(entity: &'static str, operator: ComparisonOp, reason: &'static str) -> ValidationError {
    ValidationError::OperatorMismatch {
        entity,
        operator: operator.sql_symbol().to_string(),
        reason,
    }
}

fn function_mismatch(entity: &'static str, function: impl ToString, reason: &'static str) -> ValidationError {
    ValidationError::FunctionMismatch {
        entity,
        function: function.to_string(),
        reason,
    }
}

impl Validate for QualifiedColumn {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_identifier("QualifiedColumn", self.table_alias.as_ref())
    }
}

impl Validate for OrderByItem {
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.column {
            SortKey::Column(column) => column.validate(),
            SortKey::Alias { name } => identifier("OrderByItem", name),
        }
    }
}

impl Validate for SelectExpr {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            SelectExpr::Column(e) => e.validate(),
            SelectExpr::BinaryArithmetic(e) => e.validate(),
            SelectExpr::CompoundArithmetic(e) => e.validate(),
            SelectExpr::Aggregate(e) => e.validate(),
            SelectExpr::Window(e) => e.validate(),
            SelectExpr::Case(e) => e.validate(),
        }
    }
}

impl Validate for ColumnExpr {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_identifier("ColumnExpr", self.table_alias.as_ref())?;
        optional_identifier("ColumnExpr", self.alias.as_ref())
    }
}

impl Validate for BinaryArithmetic {
    fn validate(&self) -> Result<(), ValidationError> {
        const ENTITY: &str = "BinaryArithmetic";
        operand(ENTITY, "left", &self.left)?;
        operand(ENTITY, "right", &self.right)?;
        division(ENTITY, "right", self.op, &self.right)?;
        identifier(ENTITY, &self.alias)
    }
}

impl Validate for CompoundArithmetic {
    fn validate(&self) -> Result<(), ValidationError> {
        const ENTITY: &str = "CompoundArithmetic";
        operand(ENTITY, "inner_left", &self.inner_left)?;
        operand(ENTITY, "inner_right", &self.inner_right)?;
        operand(ENTITY, "outer", &self.outer)?;
        division(ENTITY, "inner_right", self.inner_op, &self.inner_right)?;
        division(ENTITY, "outer", self.outer_op, &self.outer)?;
        identifier(ENTITY, &self.alias)
    }
}

impl Validate for ArithmeticInput {
    fn validate(&self) -> Result<(), ValidationError> {
        const ENTITY: &str = "ArithmeticInput";
        operand(ENTITY, "left", &self.left)?;
        operand(ENTITY, "right", &self.right)?;
        division(ENTITY, "right", self.op, &self.right)
    }
}

impl Validate for AggregateInput {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            AggregateInput::Column(column) => column.validate(),
            AggregateInput::Arithmetic(input) => input.validate(),
        }
    }
}

impl Validate for AggregateExpr {
    fn validate(&self) -> Result<(), ValidationError> {
        const ENTITY: &str = "AggregateExpr";
        identifier(ENTITY, &self.alias)?;

        match &self.input {
            Some(input) => input.validate()?,
            None if self.function != AggregateFunc::Count => {
                return Err(ValidationError::missing(ENTITY, "input"));
            }
            None if self.distinct => {
                return Err(function_mismatch(ENTITY, self.function, "with DISTINCT requires an input"));
            }
            None => {}
        }

        if self.function.is_percentile() && self.distinct {
            return Err(function_mismatch(ENTITY, self.function, "does not accept DISTINCT"));
        }

        match (self.function.requires_fraction(), self.percentile) {
            (true, None) => Err(ValidationError::missing(ENTITY, "percentile")),
            (true, Some(p)) if !(0.0..=1.0).contains(&p) => Err(ValidationError::out_of_range(
                ENTITY,
                "percentile",
                format!("{} is not within [0, 1]", p),
            )),
            (false, Some(_)) => Err(function_mismatch(ENTITY, self.function, "does not take a percentile")),
            _ => Ok(()),
        }
    }
}

impl Validate for WindowExpr {
    fn validate(&self) -> Result<(), ValidationError> {
        const ENTITY: &str = "WindowExpr";
        identifier(ENTITY, &self.alias)?;

        if self.function.is_ranking() {
            if self.column.is_some() {
                return Err(function_mismatch(ENTITY, self.function, "takes no argument"));
            }
        } else if self.function != WindowFunc::Count && self.column.is_none() {
            return Err(ValidationError::missing(ENTITY, "column"));
        }
        if let Some(column) = &self.column {
            column.validate()?;
        }

        if !self.function.is_offset() {
            if self.offset.is_some() {
                return Err(function_mismatch(ENTITY, self.function, "does not take an offset"));
            }
            if self.default.is_some() {
                return Err(function_mismatch(ENTITY, self.function, "does not take a default"));
            }
        }
        if let Some(default) = &self.default {
            literal(ENTITY, "default", default)?;
        }

        for column in &self.partition_by {
            column.validate()?;
        }
        for item in &self.order_by {
            if let SortKey::Alias { .. } = item.column {
                return Err(function_mismatch(
                    ENTITY,
                    self.function,
                    "window ORDER BY must reference columns",
                ));
            }
            item.validate()?;
        }
        Ok(())
    }
}

impl Validate for CaseResult {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            CaseResult::Column(column) => column.validate(),
            CaseResult::Literal { value } => literal("CaseResult", "value", value),
        }
    }
}

impl Validate for CaseExpr {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.branches.is_empty() {
            return Err(ValidationError::empty("CaseExpr", "branches"));
        }
        for branch in &self.branches {
            branch.condition.validate()?;
            branch.result.validate()?;
        }
        if let Some(result) = &self.else_result {
            result.validate()?;
        }
        identifier("CaseExpr", &self.alias)
    }
}

impl Validate for SimpleCondition {
    fn validate(&self) -> Result<(), ValidationError> {
        const ENTITY: &str = "SimpleCondition";
        self.column.validate()?;
        let op = self.operator;

        if op.takes_no_value() {
            return match self.value {
                Some(_) => Err(operator_mismatch(ENTITY, op, "takes no value")),
                None => Ok(()),
            };
        }

        match &self.value {
            None => Err(ValidationError::missing(ENTITY, "value")),
            Some(ConditionValue::List(values)) => {
                if !op.takes_list() {
                    return Err(operator_mismatch(ENTITY, op, "requires a scalar value"));
                }
                if values.is_empty() {
                    return Err(ValidationError::empty(ENTITY, "value"));
                }
                values.iter().try_for_each(|v| literal(ENTITY, "value", v))
            }
            Some(ConditionValue::Scalar(value)) => {
                if op.takes_list() {
                    return Err(operator_mismatch(ENTITY, op, "requires a list value"));
                }
                if matches!(op, ComparisonOp::Like | ComparisonOp::ILike) && !value.is_string() {
                    return Err(operator_mismatch(ENTITY, op, "requires a string pattern"));
                }
                literal(ENTITY, "value", value)
            }
        }
    }
}

impl Validate for ColumnComparison {
    fn validate(&self) -> Result<(), ValidationError> {
        self.left.validate()?;
        self.right.validate()?;
        if !self.operator.is_ordering() {
            return Err(operator_mismatch(
                "ColumnComparison",
                self.operator,
                "cannot compare two columns",
            ));
        }
        Ok(())
    }
}

impl Validate for BetweenCondition {
    fn validate(&self) -> Result<(), ValidationError> {
        self.column.validate()?;
        literal("BetweenCondition", "low", &self.low)?;
        literal("BetweenCondition", "high", &self.high)
    }
}

impl Validate for Condition {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Condition::Simple(c) => c.validate(),
            Condition::ColumnComparison(c) => c.validate(),
            Condition::Between(c) => c.validate(),
        }
    }
}

impl Validate for ConditionGroup {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.conditions.is_empty() {
            return Err(ValidationError::empty("ConditionGroup", "conditions"));
        }
        self.conditions.iter().try_for_each(Validate::validate)
    }
}

impl Validate for WhereL0 {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::empty("WhereL0", "groups"));
        }
        self.groups.iter().try_for_each(Validate::validate)?;
        self.between.iter().try_for_each(Validate::validate)
    }
}

impl Validate for WhereL1 {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::empty("WhereL1", "groups"));
        }
        self.groups.iter().try_for_each(Validate::validate)?;
        self.between.iter().try_for_each(Validate::validate)?;
        self.subqueries.iter().try_for_each(Validate::validate)
    }
}

impl Validate for SubqueryCondition {
    fn validate(&self) -> Result<(), ValidationError> {
        const ENTITY: &str = "SubqueryCondition";
        self.column.validate()?;
        let op = self.operator;
        if !(op.is_ordering() || op.takes_list()) {
            return Err(operator_mismatch(ENTITY, op, "cannot compare against a subquery"));
        }
        if !self.subquery.group_by.is_empty() && !op.takes_list() {
            return Err(operator_mismatch(
                ENTITY,
                op,
                "cannot compare against a grouped subquery; use IN or NOT IN",
            ));
        }
        self.subquery.validate()
    }
}

impl Validate for ScalarSubquery {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_identifier("ScalarSubquery", self.table_alias.as_ref())?;
        self.aggregate.validate()?;
        if let Some(where_clause) = &self.where_clause {
            where_clause.validate()?;
        }
        Ok(())
    }
}

impl Validate for FromClause {
    fn validate(&self) -> Result<(), ValidationError> {
        const ENTITY: &str = "FromClause";
        match (&self.table, &self.derived) {
            (Some(_), Some(_)) => return Err(ValidationError::exclusive(ENTITY, "table", "derived")),
            (None, None) => return Err(ValidationError::missing(ENTITY, "table")),
            (None, Some(derived)) => {
                if self.table_alias.is_some() {
                    return Err(ValidationError::exclusive(ENTITY, "table_alias", "derived"));
                }
                derived.validate()?;
            }
            (Some(_), None) => optional_identifier(ENTITY, self.table_alias.as_ref())?,
        }
        self.joins.iter().try_for_each(Validate::validate)
    }
}

impl Validate for JoinSpec {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.on_conditions.is_empty() {
            return Err(ValidationError::empty("JoinSpec", "on_conditions"));
        }
        optional_identifier("JoinSpec", self.table_alias.as_ref())?;
        self.on_conditions.iter().try_for_each(Validate::validate)
    }
}

impl Validate for DerivedTable {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.select.is_empty() {
            return Err(ValidationError::empty("DerivedTable", "select"));
        }
        identifier("DerivedTable", &self.alias)?;
        self.select.iter().try_for_each(Validate::validate)?;
        if let Some(where_clause) = &self.where_clause {
            where_clause.validate()?;
        }
        Ok(())
    }
}

impl Validate for GroupByClause {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.columns.is_empty() {
            return Err(ValidationError::empty("GroupByClause", "columns"));
        }
        Ok(())
    }
}

impl Validate for HavingCondition {
    fn validate(&self) -> Result<(), ValidationError> {
        const ENTITY: &str = "HavingCondition";
        if self.function.is_percentile() {
            return Err(function_mismatch(ENTITY, self.function, "is not supported in HAVING"));
        }
        match &self.column {
            Some(column) => column.validate()?,
            None if self.function != AggregateFunc::Count => {
                return Err(ValidationError::missing(ENTITY, "column"));
            }
            None => {}
        }
        if !self.operator.is_ordering() {
            return Err(operator_mismatch(ENTITY, self.operator, "is not supported in HAVING"));
        }
        literal(ENTITY, "value", &self.value)
    }
}

impl Validate for HavingClause {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.conditions.is_empty() {
            return Err(ValidationError::empty("HavingClause", "conditions"));
        }
        self.conditions.iter().try_for_each(Validate::validate)
    }
}

impl Validate for OrderByClause {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.items.is_empty() {
            return Err(ValidationError::empty("OrderByClause", "items"));
        }
        self.items.iter().try_for_each(Validate::validate)
    }
}

impl Validate for LimitClause {
    fn validate(&self) -> Result<(), ValidationError> {
        // u64 fields already exclude negatives
        Ok(())
    }
}

impl Validate for Query {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.select.is_empty() {
            return Err(ValidationError::empty("Query", "select"));
        }
        self.select.iter().try_for_each(Validate::validate)?;
        self.from.validate()?;
        if let Some(where_clause) = &self.where_clause {
            where_clause.validate()?;
        }
        if let Some(group_by) = &self.group_by {
            group_by.validate()?;
        }
        if let Some(having) = &self.having {
            having.validate()?;
        }
        if let Some(limit) = &self.limit {
            limit.validate()?;
        }
        if let Some(order_by) = &self.order_by {
            order_by.validate()?;
            for item in &order_by.items {
                if let SortKey::Alias { name } = &item.column {
                    if !self.select_aliases().any(|a| a == name.as_str()) {
                        return Err(ValidationError::UnknownSelectAlias(name.clone()));
                    }
                }
            }
        }
        Ok(())
    }
}

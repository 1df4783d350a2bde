//! Select-list expression rendering.

use crate::ast::*;
use crate::error::{QirError, QirResult};
use crate::transpiler::conditions::simple_condition;
use crate::transpiler::literals::{literal, number};
use crate::scope::AliasScope;
use crate::transpiler::window::render_window;

/// Render one select-list item, alias included.
pub fn select_item(expr: &SelectExpr, scope: &AliasScope) -> QirResult<String> {
    match expr {
        SelectExpr::Column(c) => column_expr(c, scope),
        SelectExpr::BinaryArithmetic(b) => Ok(format!(
            "{} AS {}",
            arithmetic(&b.left, b.op, &b.right, scope)?,
            b.alias
        )),
        SelectExpr::CompoundArithmetic(c) => compound(c, scope),
        SelectExpr::Aggregate(a) => Ok(format!("{} AS {}", aggregate_call(a, scope)?, a.alias)),
        SelectExpr::Window(w) => render_window(w, scope),
        SelectExpr::Case(c) => case(c, scope),
    }
}

fn column_expr(expr: &ColumnExpr, scope: &AliasScope) -> QirResult<String> {
    let column = scope.resolve(&expr.qualified_column())?;
    Ok(match &expr.alias {
        Some(alias) => format!("{} AS {}", column, alias),
        None => column,
    })
}

pub fn operand(op: &Operand, scope: &AliasScope) -> QirResult<String> {
    match op {
        Operand::Column(c) => scope.resolve(c),
        Operand::Number { value } => Ok(number(value)),
    }
}

/// `(left OP right)`
pub fn arithmetic(
    left: &Operand,
    op: ArithmeticOp,
    right: &Operand,
    scope: &AliasScope,
) -> QirResult<String> {
    Ok(format!(
        "({} {} {})",
        operand(left, scope)?,
        op.sql_symbol(),
        operand(right, scope)?
    ))
}

fn compound(expr: &CompoundArithmetic, scope: &AliasScope) -> QirResult<String> {
    let inner = arithmetic(&expr.inner_left, expr.inner_op, &expr.inner_right, scope)?;
    Ok(format!(
        "({} {} {}) AS {}",
        inner,
        expr.outer_op.sql_symbol(),
        operand(&expr.outer, scope)?,
        expr.alias
    ))
}

/// The aggregate call without its alias; also used for scalar subqueries.
pub fn aggregate_call(agg: &AggregateExpr, scope: &AliasScope) -> QirResult<String> {
    let arg = match &agg.input {
        Some(AggregateInput::Column(c)) => scope.resolve(c)?,
        Some(AggregateInput::Arithmetic(a)) => arithmetic(&a.left, a.op, &a.right, scope)?,
        None if agg.function == AggregateFunc::Count && !agg.distinct => "*".to_string(),
        None => {
            return Err(QirError::ill_formed(
                "AggregateExpr",
                format!("{} has no input", agg.function),
            ));
        }
    };

    let sql = match agg.function {
        AggregateFunc::PercentileCont | AggregateFunc::PercentileDisc => {
            let fraction = agg.percentile.ok_or_else(|| {
                QirError::ill_formed("AggregateExpr", format!("{} has no percentile", agg.function))
            })?;
            format!(
                "{}({}) WITHIN GROUP (ORDER BY {})",
                agg.function.sql_name(),
                fraction,
                arg
            )
        }
        AggregateFunc::Median => format!("PERCENTILE_CONT(0.5) WITHIN GROUP (ORDER BY {})", arg),
        AggregateFunc::CountDistinct => format!("COUNT(DISTINCT {})", arg),
        func if agg.distinct => format!("{}(DISTINCT {})", func.sql_name(), arg),
        func => format!("{}({})", func.sql_name(), arg),
    };
    Ok(sql)
}

fn case_result(result: &CaseResult, scope: &AliasScope) -> QirResult<String> {
    match result {
        CaseResult::Column(c) => scope.resolve(c),
        CaseResult::Literal { value } => Ok(literal(value)),
    }
}

fn case(expr: &CaseExpr, scope: &AliasScope) -> QirResult<String> {
    if expr.branches.is_empty() {
        return Err(QirError::ill_formed("CaseExpr", "no WHEN branches"));
    }
    let mut sql = String::from("CASE");
    for branch in &expr.branches {
        sql.push_str(" WHEN ");
        sql.push_str(&simple_condition(&branch.condition, scope)?);
        sql.push_str(" THEN ");
        sql.push_str(&case_result(&branch.result, scope)?);
    }
    sql.push_str(" ELSE ");
    match &expr.else_result {
        Some(result) => sql.push_str(&case_result(result, scope)?),
        None => sql.push_str("NULL"),
    }
    sql.push_str(" END AS ");
    sql.push_str(&expr.alias);
    Ok(sql)
}

/// `key DIR [NULLS FIRST|LAST]`
pub fn order_item(item: &OrderByItem, scope: &AliasScope) -> QirResult<String> {
    let key = match &item.column {
        SortKey::Column(c) => scope.resolve(c)?,
        SortKey::Alias { name } => name.clone(),
    };
    Ok(match item.nulls {
        Some(nulls) => format!("{} {} {}", key, item.direction.sql_keyword(), nulls.sql_keyword()),
        None => format!("{} {}", key, item.direction.sql_keyword()),
    })
}

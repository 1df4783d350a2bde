//! WHERE / ON / subquery rendering.

use crate::ast::*;
use crate::error::{QirError, QirResult};
use crate::transpiler::expr::aggregate_call;
use crate::transpiler::literals::literal;
use crate::scope::AliasScope;
use crate::transpiler::table_ref;

pub fn simple_condition(cond: &SimpleCondition, scope: &AliasScope) -> QirResult<String> {
    let column = scope.resolve(&cond.column)?;
    let op = cond.operator;

    if op.takes_no_value() {
        if cond.value.is_some() {
            return Err(QirError::ill_formed("SimpleCondition", format!("{} with a value", op)));
        }
        return Ok(format!("{} {}", column, op.sql_symbol()));
    }

    match (&cond.value, op.takes_list()) {
        (Some(ConditionValue::List(values)), true) if !values.is_empty() => {
            let values: Vec<String> = values.iter().map(literal).collect();
            Ok(format!("{} {} ({})", column, op.sql_symbol(), values.join(", ")))
        }
        (Some(ConditionValue::Scalar(value)), false) => {
            Ok(format!("{} {} {}", column, op.sql_symbol(), literal(value)))
        }
        _ => Err(QirError::ill_formed(
            "SimpleCondition",
            format!("value does not fit operator {}", op),
        )),
    }
}

pub fn condition(cond: &Condition, scope: &AliasScope) -> QirResult<String> {
    match cond {
        Condition::Simple(c) => simple_condition(c, scope),
        Condition::ColumnComparison(c) => Ok(format!(
            "{} {} {}",
            scope.resolve(&c.left)?,
            c.operator.sql_symbol(),
            scope.resolve(&c.right)?
        )),
        Condition::Between(b) => between(b, scope),
    }
}

fn between(cond: &BetweenCondition, scope: &AliasScope) -> QirResult<String> {
    Ok(format!(
        "{} BETWEEN {} AND {}",
        scope.resolve(&cond.column)?,
        literal(&cond.low),
        literal(&cond.high)
    ))
}

/// Conditions joined by the group's logic, without surrounding parens.
fn group_body(group: &ConditionGroup, scope: &AliasScope) -> QirResult<String> {
    if group.conditions.is_empty() {
        return Err(QirError::ill_formed("ConditionGroup", "no conditions"));
    }
    let parts = group
        .conditions
        .iter()
        .map(|c| condition(c, scope))
        .collect::<QirResult<Vec<_>>>()?;
    Ok(parts.join(group.logic.joiner()))
}

/// A group in WHERE position: parenthesized only with more than one condition.
pub fn group(group: &ConditionGroup, scope: &AliasScope) -> QirResult<String> {
    let body = group_body(group, scope)?;
    if group.conditions.len() > 1 {
        Ok(format!("({})", body))
    } else {
        Ok(body)
    }
}

/// JOIN ... ON clause: one group bare, several groups each parenthesized and ANDed.
pub fn join_on(groups: &[ConditionGroup], scope: &AliasScope) -> QirResult<String> {
    match groups {
        [] => Err(QirError::ill_formed("JoinSpec", "no ON conditions")),
        [single] => group_body(single, scope),
        many => {
            let parts = many
                .iter()
                .map(|g| group_body(g, scope).map(|body| format!("({})", body)))
                .collect::<QirResult<Vec<_>>>()?;
            Ok(parts.join(" AND "))
        }
    }
}

fn join_parts(parts: Vec<String>, logic: LogicOp, entity: &'static str) -> QirResult<String> {
    if parts.is_empty() {
        return Err(QirError::ill_formed(entity, "no conditions"));
    }
    Ok(parts.join(logic.joiner()))
}

pub fn where_l0(clause: &WhereL0, scope: &AliasScope) -> QirResult<String> {
    let mut parts = Vec::with_capacity(clause.groups.len() + clause.between.len());
    for g in &clause.groups {
        parts.push(group(g, scope)?);
    }
    for b in &clause.between {
        parts.push(between(b, scope)?);
    }
    join_parts(parts, clause.group_logic, "WhereL0")
}

pub fn where_l1(clause: &WhereL1, scope: &AliasScope) -> QirResult<String> {
    let mut parts = Vec::with_capacity(
        clause.groups.len() + clause.between.len() + clause.subqueries.len(),
    );
    for g in &clause.groups {
        parts.push(group(g, scope)?);
    }
    for b in &clause.between {
        parts.push(between(b, scope)?);
    }
    for s in &clause.subqueries {
        parts.push(format!(
            "{} {} {}",
            scope.resolve(&s.column)?,
            s.operator.sql_symbol(),
            scalar_subquery(&s.subquery, scope)?
        ));
    }
    join_parts(parts, clause.group_logic, "WhereL1")
}

/// `(SELECT AGG FROM table [AS alias] [WHERE ...] [GROUP BY ...])`
pub fn scalar_subquery(sub: &ScalarSubquery, outer: &AliasScope) -> QirResult<String> {
    let mut scope = outer.child();
    scope.introduce(sub.table, sub.table_alias.as_deref())?;

    let mut sql = format!(
        "(SELECT {} FROM {}",
        aggregate_call(&sub.aggregate, &scope)?,
        table_ref(sub.table, sub.table_alias.as_deref())
    );
    if let Some(where_clause) = &sub.where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(&where_l0(where_clause, &scope)?);
    }
    if !sub.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&column_list(&sub.group_by));
    }
    sql.push(')');
    Ok(sql)
}

pub fn column_list(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

//! SELECT statement assembly.

use tracing::trace;

use crate::ast::*;
use crate::config::TranslatorConfig;
use crate::error::{QirError, QirResult};
use crate::transpiler::conditions::{column_list, join_on, where_l0, where_l1};
use crate::transpiler::expr::{order_item, select_item};
use crate::transpiler::literals::literal;
use crate::scope::AliasScope;
use crate::transpiler::table_ref;

/// Continuation indent for select items, aligned under the first one.
const SELECT_ITEM_SEPARATOR: &str = ",\n       ";

/// Render all clauses in fixed order, one per line (JOINs on their own lines).
pub fn build_select(query: &Query, config: &TranslatorConfig) -> QirResult<String> {
    let mut scope = AliasScope::root(config);
    // FROM first so select items can resolve the aliases it introduces.
    let from = from_clause(&query.from, &mut scope)?;

    let mut clauses = Vec::with_capacity(7);
    clauses.push(select_list(&query.select, &scope)?);
    clauses.push(from);

    if let Some(where_clause) = &query.where_clause {
        clauses.push(format!("WHERE {}", where_l1(where_clause, &scope)?));
        trace!(clause = "WHERE", "rendered");
    }
    if let Some(group_by) = &query.group_by {
        if group_by.columns.is_empty() {
            return Err(QirError::ill_formed("GroupByClause", "no columns"));
        }
        clauses.push(format!("GROUP BY {}", column_list(&group_by.columns)));
        trace!(clause = "GROUP BY", "rendered");
    }
    if let Some(having) = &query.having {
        clauses.push(format!("HAVING {}", having_clause(having, &scope)?));
        trace!(clause = "HAVING", "rendered");
    }
    if let Some(order_by) = &query.order_by {
        if order_by.items.is_empty() {
            return Err(QirError::ill_formed("OrderByClause", "no items"));
        }
        let items = order_by
            .items
            .iter()
            .map(|item| order_item(item, &scope))
            .collect::<QirResult<Vec<_>>>()?;
        clauses.push(format!("ORDER BY {}", items.join(", ")));
        trace!(clause = "ORDER BY", "rendered");
    }
    if let Some(limit) = &query.limit {
        clauses.push(limit_clause(limit));
    }

    Ok(clauses.join("\n"))
}

fn select_list(select: &[SelectExpr], scope: &AliasScope) -> QirResult<String> {
    if select.is_empty() {
        return Err(QirError::ill_formed("Query", "empty select list"));
    }
    let items = select
        .iter()
        .map(|e| select_item(e, scope))
        .collect::<QirResult<Vec<_>>>()?;
    trace!(clause = "SELECT", items = items.len(), "rendered");
    Ok(format!("SELECT {}", items.join(SELECT_ITEM_SEPARATOR)))
}

fn from_clause(from: &FromClause, scope: &mut AliasScope) -> QirResult<String> {
    let source = match (&from.table, &from.derived) {
        (Some(table), None) => {
            scope.introduce(*table, from.table_alias.as_deref())?;
            table_ref(*table, from.table_alias.as_deref())
        }
        (None, Some(derived)) => {
            let sql = derived_table(derived, scope.config())?;
            scope.introduce_alias(&derived.alias)?;
            sql
        }
        (Some(_), Some(_)) => {
            return Err(QirError::ill_formed("FromClause", "both table and derived are set"));
        }
        (None, None) => {
            return Err(QirError::ill_formed("FromClause", "neither table nor derived is set"));
        }
    };

    let mut lines = Vec::with_capacity(1 + from.joins.len());
    lines.push(format!("FROM {}", source));
    for join in &from.joins {
        // The joined alias is visible inside its own ON clause.
        scope.introduce(join.table, join.table_alias.as_deref())?;
        lines.push(format!(
            "{} JOIN {} ON {}",
            join.join_type.sql_keyword(),
            table_ref(join.table, join.table_alias.as_deref()),
            join_on(&join.on_conditions, scope)?
        ));
    }
    trace!(clause = "FROM", joins = from.joins.len(), "rendered");
    Ok(lines.join("\n"))
}

/// `(SELECT ... FROM table [WHERE ...] [GROUP BY ...]) AS alias`
fn derived_table(derived: &DerivedTable, config: &TranslatorConfig) -> QirResult<String> {
    if derived.select.is_empty() {
        return Err(QirError::ill_formed("DerivedTable", "empty select list"));
    }
    // Derived tables cannot see the outer query.
    let mut scope = AliasScope::root(config);
    scope.introduce(derived.from_table, None)?;

    let items = derived
        .select
        .iter()
        .map(|e| select_item(e, &scope))
        .collect::<QirResult<Vec<_>>>()?;
    let mut sql = format!("(SELECT {} FROM {}", items.join(", "), derived.from_table);
    if let Some(where_clause) = &derived.where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(&where_l0(where_clause, &scope)?);
    }
    if !derived.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&column_list(&derived.group_by));
    }
    sql.push_str(") AS ");
    sql.push_str(&derived.alias);
    Ok(sql)
}

fn having_condition(cond: &HavingCondition, scope: &AliasScope) -> QirResult<String> {
    let arg = match &cond.column {
        Some(c) => scope.resolve(c)?,
        None if cond.function == AggregateFunc::Count => "*".to_string(),
        None => {
            return Err(QirError::ill_formed(
                "HavingCondition",
                format!("{} has no column", cond.function),
            ));
        }
    };
    let call = match cond.function {
        AggregateFunc::CountDistinct if cond.column.is_some() => format!("COUNT(DISTINCT {})", arg),
        f if f.is_percentile() || f == AggregateFunc::CountDistinct => {
            return Err(QirError::ill_formed(
                "HavingCondition",
                format!("{} is not supported in HAVING", f),
            ));
        }
        f => format!("{}({})", f.sql_name(), arg),
    };
    Ok(format!("{} {} {}", call, cond.operator.sql_symbol(), literal(&cond.value)))
}

fn having_clause(having: &HavingClause, scope: &AliasScope) -> QirResult<String> {
    if having.conditions.is_empty() {
        return Err(QirError::ill_formed("HavingClause", "no conditions"));
    }
    let parts = having
        .conditions
        .iter()
        .map(|c| having_condition(c, scope))
        .collect::<QirResult<Vec<_>>>()?;
    Ok(parts.join(having.logic.joiner()))
}

fn limit_clause(limit: &LimitClause) -> String {
    if limit.offset > 0 {
        format!("LIMIT {} OFFSET {}", limit.limit, limit.offset)
    } else {
        format!("LIMIT {}", limit.limit)
    }
}

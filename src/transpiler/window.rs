//! Window function rendering.

use crate::ast::*;
use crate::error::{QirError, QirResult};
use crate::transpiler::expr::order_item;
use crate::transpiler::literals::literal;
use crate::scope::AliasScope;

/// `FUNC(args) OVER (PARTITION BY ... ORDER BY ...) AS alias`
pub fn render_window(expr: &WindowExpr, scope: &AliasScope) -> QirResult<String> {
    Ok(format!(
        "{}({}) {} AS {}",
        expr.function.sql_name(),
        window_args(expr, scope)?,
        over_clause(expr, scope)?,
        expr.alias
    ))
}

fn window_args(expr: &WindowExpr, scope: &AliasScope) -> QirResult<String> {
    let func = expr.function;
    if func.is_ranking() {
        if expr.column.is_some() {
            return Err(QirError::ill_formed("WindowExpr", format!("{} takes no argument", func)));
        }
        return Ok(String::new());
    }

    let column = match &expr.column {
        Some(c) => scope.resolve(c)?,
        None if func == WindowFunc::Count => return Ok("*".to_string()),
        None => {
            return Err(QirError::ill_formed("WindowExpr", format!("{} has no column", func)));
        }
    };

    if !func.is_offset() {
        return Ok(column);
    }

    // Positional: column, offset, default. Offset is written out when a default follows it.
    let mut args = vec![column];
    match (expr.offset, &expr.default) {
        (offset, Some(default)) => {
            args.push(offset.unwrap_or(1).to_string());
            args.push(literal(default));
        }
        (Some(offset), None) if offset != 1 => args.push(offset.to_string()),
        _ => {}
    }
    Ok(args.join(", "))
}

fn over_clause(expr: &WindowExpr, scope: &AliasScope) -> QirResult<String> {
    let mut parts = Vec::with_capacity(2);

    if !expr.partition_by.is_empty() {
        let cols = expr
            .partition_by
            .iter()
            .map(|c| scope.resolve(c))
            .collect::<QirResult<Vec<_>>>()?;
        parts.push(format!("PARTITION BY {}", cols.join(", ")));
    }

    if !expr.order_by.is_empty() {
        let items = expr
            .order_by
            .iter()
            .map(|item| match item.column {
                SortKey::Alias { .. } => Err(QirError::ill_formed(
                    "WindowExpr",
                    "window ORDER BY must reference columns",
                )),
                SortKey::Column(_) => order_item(item, scope),
            })
            .collect::<QirResult<Vec<_>>>()?;
        parts.push(format!("ORDER BY {}", items.join(", ")));
    }

    Ok(format!("OVER ({})", parts.join(" ")))
}

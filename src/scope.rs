//! Table names and aliases visible to column references.
//!
//! Unquoted identifiers fold to lower case in Postgres, so names here compare
//! ASCII case-insensitively. [`check_query`] walks a whole query without
//! rendering it; the translator uses the same scope while emitting SQL.

use tracing::debug;

use crate::ast::*;
use crate::config::TranslatorConfig;
use crate::error::{QirError, QirResult, ValidationError};

#[derive(Debug, Clone)]
struct ScopeEntry {
    name: String,
    /// false when the entry is a bare table name
    aliased: bool,
}

/// The set of qualifiers introduced by FROM / JOIN, chained to the enclosing
/// query's scope for correlated subqueries.
#[derive(Debug)]
pub struct AliasScope<'a> {
    entries: Vec<ScopeEntry>,
    parent: Option<&'a AliasScope<'a>>,
    config: &'a TranslatorConfig,
}

impl<'a> AliasScope<'a> {
    pub fn root(config: &'a TranslatorConfig) -> Self {
        Self {
            entries: Vec::new(),
            parent: None,
            config,
        }
    }

    /// Scope for a subquery: its own entries first, then everything in `self`.
    pub fn child(&self) -> AliasScope<'_> {
        AliasScope {
            entries: Vec::new(),
            parent: Some(self),
            config: self.config,
        }
    }

    pub fn config(&self) -> &'a TranslatorConfig {
        self.config
    }

    /// Bring a table into scope under its alias, or under its own name.
    pub fn introduce(&mut self, table: Table, alias: Option<&str>) -> QirResult<()> {
        match alias {
            Some(alias) => self.push(alias, true),
            None => self.push(table.as_str(), false),
        }
    }

    /// Bring a derived table's alias into scope.
    pub fn introduce_alias(&mut self, alias: &str) -> QirResult<()> {
        self.push(alias, true)
    }

    fn push(&mut self, name: &str, aliased: bool) -> QirResult<()> {
        if self.entries.iter().any(|e| e.name.eq_ignore_ascii_case(name)) {
            return Err(ValidationError::DuplicateAlias(name.to_string()).into());
        }
        self.entries.push(ScopeEntry {
            name: name.to_string(),
            aliased,
        });
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        let allow_bare = self.config.allow_table_name_qualifiers;
        self.entries
            .iter()
            .any(|e| e.name.eq_ignore_ascii_case(name) && (e.aliased || allow_bare))
            || self.parent.is_some_and(|p| p.contains(name))
    }

    /// Render a column reference, checking its qualifier when alias checks are on.
    pub fn resolve(&self, column: &QualifiedColumn) -> QirResult<String> {
        match &column.table_alias {
            None => Ok(column.column.as_str().to_string()),
            Some(alias) => {
                if self.config.check_aliases && !self.contains(alias) {
                    debug!(alias = %alias, reference = %column, "unresolved table alias");
                    return Err(QirError::unresolved(alias.as_str(), column.to_string()));
                }
                Ok(column.to_string())
            }
        }
    }
}

/// Resolve every table qualifier in `query` and reject duplicate aliases.
///
/// Scoping matches translation: FROM and each JOIN are introduced in order
/// (a JOIN's ON sees its own alias), derived tables see only their own
/// table, and scalar subqueries see their table first, then the query.
pub fn check_query(query: &Query, config: &TranslatorConfig) -> QirResult<()> {
    let mut scope = AliasScope::root(config);
    let from = &query.from;
    if let Some(table) = from.table {
        scope.introduce(table, from.table_alias.as_deref())?;
    }
    if let Some(derived) = &from.derived {
        check_derived(derived, config)?;
        scope.introduce_alias(&derived.alias)?;
    }
    for join in &from.joins {
        scope.introduce(join.table, join.table_alias.as_deref())?;
        join.on_conditions.iter().try_for_each(|g| scope.check_group(g))?;
    }

    query.select.iter().try_for_each(|e| scope.check_select(e))?;
    if let Some(where_clause) = &query.where_clause {
        where_clause.groups.iter().try_for_each(|g| scope.check_group(g))?;
        for between in &where_clause.between {
            scope.resolve(&between.column)?;
        }
        for sub in &where_clause.subqueries {
            scope.resolve(&sub.column)?;
            scope.check_subquery(&sub.subquery)?;
        }
    }
    if let Some(having) = &query.having {
        for column in having.conditions.iter().filter_map(|c| c.column.as_ref()) {
            scope.resolve(column)?;
        }
    }
    if let Some(order_by) = &query.order_by {
        order_by.items.iter().try_for_each(|item| scope.check_sort_key(item))?;
    }
    Ok(())
}

fn check_derived(derived: &DerivedTable, config: &TranslatorConfig) -> QirResult<()> {
    let mut scope = AliasScope::root(config);
    scope.introduce(derived.from_table, None)?;
    derived.select.iter().try_for_each(|e| scope.check_select(e))?;
    if let Some(where_clause) = &derived.where_clause {
        scope.check_where_l0(where_clause)?;
    }
    Ok(())
}

impl AliasScope<'_> {
    fn check_operand(&self, operand: &Operand) -> QirResult<()> {
        match operand {
            Operand::Column(c) => self.resolve(c).map(drop),
            Operand::Number { .. } => Ok(()),
        }
    }

    fn check_case_result(&self, result: &CaseResult) -> QirResult<()> {
        match result {
            CaseResult::Column(c) => self.resolve(c).map(drop),
            CaseResult::Literal { .. } => Ok(()),
        }
    }

    fn check_sort_key(&self, item: &OrderByItem) -> QirResult<()> {
        match &item.column {
            SortKey::Column(c) => self.resolve(c).map(drop),
            SortKey::Alias { .. } => Ok(()),
        }
    }

    fn check_aggregate(&self, agg: &AggregateExpr) -> QirResult<()> {
        match &agg.input {
            Some(AggregateInput::Column(c)) => self.resolve(c).map(drop),
            Some(AggregateInput::Arithmetic(a)) => {
                self.check_operand(&a.left)?;
                self.check_operand(&a.right)
            }
            None => Ok(()),
        }
    }

    fn check_select(&self, expr: &SelectExpr) -> QirResult<()> {
        match expr {
            SelectExpr::Column(c) => self.resolve(&c.qualified_column()).map(drop),
            SelectExpr::BinaryArithmetic(b) => {
                self.check_operand(&b.left)?;
                self.check_operand(&b.right)
            }
            SelectExpr::CompoundArithmetic(c) => {
                self.check_operand(&c.inner_left)?;
                self.check_operand(&c.inner_right)?;
                self.check_operand(&c.outer)
            }
            SelectExpr::Aggregate(a) => self.check_aggregate(a),
            SelectExpr::Window(w) => {
                if let Some(column) = &w.column {
                    self.resolve(column)?;
                }
                for column in &w.partition_by {
                    self.resolve(column)?;
                }
                w.order_by.iter().try_for_each(|item| self.check_sort_key(item))
            }
            SelectExpr::Case(c) => {
                for branch in &c.branches {
                    self.resolve(&branch.condition.column)?;
                    self.check_case_result(&branch.result)?;
                }
                match &c.else_result {
                    Some(result) => self.check_case_result(result),
                    None => Ok(()),
                }
            }
        }
    }

    fn check_group(&self, group: &ConditionGroup) -> QirResult<()> {
        for cond in &group.conditions {
            match cond {
                Condition::Simple(c) => self.resolve(&c.column)?,
                Condition::Between(b) => self.resolve(&b.column)?,
                Condition::ColumnComparison(c) => {
                    self.resolve(&c.left)?;
                    self.resolve(&c.right)?
                }
            };
        }
        Ok(())
    }

    fn check_where_l0(&self, clause: &WhereL0) -> QirResult<()> {
        clause.groups.iter().try_for_each(|g| self.check_group(g))?;
        for between in &clause.between {
            self.resolve(&between.column)?;
        }
        Ok(())
    }

    fn check_subquery(&self, sub: &ScalarSubquery) -> QirResult<()> {
        let mut scope = self.child();
        scope.introduce(sub.table, sub.table_alias.as_deref())?;
        scope.check_aggregate(&sub.aggregate)?;
        if let Some(where_clause) = &sub.where_clause {
            scope.check_where_l0(where_clause)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_alias() {
        let config = TranslatorConfig::default();
        let mut scope = AliasScope::root(&config);
        scope.introduce(Table::ProductOffers, Some("my")).unwrap();

        let col = QualifiedColumn::qualified("my", Column::Price);
        assert_eq!(scope.resolve(&col).unwrap(), "my.price");

        let col = QualifiedColumn::qualified("comp", Column::Price);
        assert!(matches!(
            scope.resolve(&col).unwrap_err(),
            QirError::UnresolvedAlias { .. }
        ));
    }

    #[test]
    fn test_table_name_qualifier() {
        let config = TranslatorConfig::default();
        let mut scope = AliasScope::root(&config);
        scope.introduce(Table::PriceHistory, None).unwrap();
        let col = QualifiedColumn::qualified("price_history", Column::Price);
        assert_eq!(scope.resolve(&col).unwrap(), "price_history.price");

        let strict = TranslatorConfig::builder().allow_table_name_qualifiers(false).build();
        let mut scope = AliasScope::root(&strict);
        scope.introduce(Table::PriceHistory, None).unwrap();
        assert!(scope.resolve(&col).is_err());
    }

    #[test]
    fn test_duplicate_alias() {
        let config = TranslatorConfig::default();
        let mut scope = AliasScope::root(&config);
        scope.introduce(Table::ProductOffers, None).unwrap();
        let err = scope.introduce(Table::ProductOffers, None).unwrap_err();
        assert!(matches!(
            err,
            QirError::Validation(ValidationError::DuplicateAlias(name)) if name == "product_offers"
        ));
    }

    #[test]
    fn test_child_sees_parent() {
        let config = TranslatorConfig::default();
        let mut outer = AliasScope::root(&config);
        outer.introduce(Table::ProductOffers, Some("o")).unwrap();
        let mut inner = outer.child();
        inner.introduce(Table::ProductOffers, Some("i")).unwrap();
        assert!(inner.contains("o"));
        assert!(inner.contains("i"));
        assert!(!outer.contains("i"));
    }

    #[test]
    fn test_unchecked_passes_through() {
        let config = TranslatorConfig::builder().check_aliases(false).build();
        let scope = AliasScope::root(&config);
        let col = QualifiedColumn::qualified("anything", Column::Id);
        assert_eq!(scope.resolve(&col).unwrap(), "anything.id");
    }

    #[test]
    fn test_duplicate_alias_ignores_case() {
        let config = TranslatorConfig::default();
        let mut scope = AliasScope::root(&config);
        scope.introduce(Table::ProductOffers, Some("My")).unwrap();
        let err = scope.introduce(Table::ProductOffers, Some("my")).unwrap_err();
        assert!(matches!(
            err,
            QirError::Validation(ValidationError::DuplicateAlias(name)) if name == "my"
        ));
    }

    #[test]
    fn test_resolve_ignores_case() {
        let config = TranslatorConfig::default();
        let mut scope = AliasScope::root(&config);
        scope.introduce(Table::ProductOffers, Some("my")).unwrap();
        let col = QualifiedColumn::qualified("MY", Column::Price);
        assert_eq!(scope.resolve(&col).unwrap(), "MY.price");

        let mut bare = AliasScope::root(&config);
        bare.introduce(Table::PriceHistory, None).unwrap();
        assert!(bare.contains("Price_History"));
    }

    fn self_join(left: &str, right: &str) -> Query {
        let on = ConditionGroup::single(
            ColumnComparison::new(
                QualifiedColumn::qualified(left, Column::Id),
                ComparisonOp::Eq,
                QualifiedColumn::qualified(right, Column::Id),
            )
            .unwrap(),
        );
        Query {
            select: vec![SelectExpr::column(Column::Title)],
            from: FromClause::aliased(Table::ProductOffers, left)
                .join(JoinSpec::inner(Table::ProductOffers, right, vec![on]).unwrap()),
            where_clause: None,
            group_by: None,
            having: None,
            order_by: None,
            limit: None,
        }
    }

    #[test]
    fn test_check_query_rejects_case_folded_self_join() {
        let config = TranslatorConfig::default();
        assert!(check_query(&self_join("my", "comp"), &config).is_ok());
        let err = check_query(&self_join("My", "my"), &config).unwrap_err();
        assert!(matches!(err, QirError::Validation(ValidationError::DuplicateAlias(_))));
    }

    #[test]
    fn test_check_query_walks_subqueries_and_derived() {
        let config = TranslatorConfig::default();
        let sub = ScalarSubquery::new(
            Table::ProductOffers,
            AggregateExpr::of(AggregateFunc::Avg, QualifiedColumn::qualified("peer", Column::Price), "a")
                .unwrap(),
        )
        .alias("peer")
        .filter(
            WhereL0::and(vec![ConditionGroup::single(
                SimpleCondition::eq(QualifiedColumn::qualified("ghost", Column::Category), "x").unwrap(),
            )])
            .unwrap(),
        );
        let mut query = self_join("my", "comp");
        query.where_clause = Some(WhereL1 {
            subqueries: vec![SubqueryCondition::new(
                QualifiedColumn::qualified("my", Column::Price),
                ComparisonOp::Lt,
                sub,
            )
            .unwrap()],
            ..WhereL1::default()
        });
        let err = check_query(&query, &config).unwrap_err();
        assert!(matches!(err, QirError::UnresolvedAlias { alias, .. } if alias == "ghost"));

        // A derived table cannot see the outer query's aliases.
        let derived = DerivedTable {
            select: vec![ColumnExpr::qualified("d", Column::Category).into()],
            from_table: Table::ProductOffers,
            alias: "d".into(),
            where_clause: None,
            group_by: Vec::new(),
        };
        let query = Query {
            select: vec![ColumnExpr::qualified("d", Column::Category).into()],
            from: FromClause::derived(derived),
            where_clause: None,
            group_by: None,
            having: None,
            order_by: None,
            limit: None,
        };
        assert!(matches!(
            check_query(&query, &config).unwrap_err(),
            QirError::UnresolvedAlias { alias, .. } if alias == "d"
        ));
    }
}

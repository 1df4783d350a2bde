//! Windows, CASE, aggregates, subqueries, derived tables and configuration.

use pretty_assertions::assert_eq;

use crate::ast::*;
use crate::config::TranslatorConfig;
use crate::error::{QirError, ValidationError};
use crate::transpiler::{Translator, translate};

/// Render a single select item against `product_offers`.
fn render_item(expr: impl Into<SelectExpr>) -> String {
    let query = Query::new(vec![expr.into()], Table::ProductOffers).unwrap();
    let sql = translate(&query).unwrap();
    sql.strip_prefix("SELECT ")
        .and_then(|s| s.strip_suffix("\nFROM product_offers"))
        .unwrap()
        .to_string()
}

fn where_only(cond: SubqueryCondition) -> WhereL1 {
    WhereL1::new(vec![], vec![], vec![cond], LogicOp::And).unwrap()
}

#[test]
fn test_rank_window() {
    let rank = WindowExpr::builder(WindowFunc::Rank, "price_rank")
        .partition_by(Column::Category)
        .order_by(OrderByItem::asc(Column::Price))
        .build()
        .unwrap();
    assert_eq!(
        render_item(rank),
        "RANK() OVER (PARTITION BY category ORDER BY price ASC) AS price_rank"
    );
}

#[test]
fn test_lag_arguments() {
    let lag = || {
        WindowExpr::builder(WindowFunc::Lag, "prev_price")
            .column(Column::Price)
            .partition_by(Column::OfferId)
            .order_by(OrderByItem::asc(Column::ObservedAt))
    };
    let over = "OVER (PARTITION BY offer_id ORDER BY observed_at ASC) AS prev_price";

    assert_eq!(render_item(lag().build().unwrap()), format!("LAG(price) {}", over));
    assert_eq!(render_item(lag().offset(1).build().unwrap()), format!("LAG(price) {}", over));
    assert_eq!(render_item(lag().offset(2).build().unwrap()), format!("LAG(price, 2) {}", over));
    assert_eq!(
        render_item(lag().default_value(0).build().unwrap()),
        format!("LAG(price, 1, 0) {}", over)
    );
    assert_eq!(
        render_item(lag().offset(3).default_value(0).build().unwrap()),
        format!("LAG(price, 3, 0) {}", over)
    );
}

#[test]
fn test_lead_and_empty_over() {
    let lead = WindowExpr::builder(WindowFunc::Lead, "next_price")
        .column(Column::Price)
        .order_by(OrderByItem::desc(Column::ObservedAt).nulls(NullsOrder::Last))
        .build()
        .unwrap();
    assert_eq!(
        render_item(lead),
        "LEAD(price) OVER (ORDER BY observed_at DESC NULLS LAST) AS next_price"
    );

    let total = WindowExpr::builder(WindowFunc::Sum, "total")
        .column(Column::Price)
        .build()
        .unwrap();
    assert_eq!(render_item(total), "SUM(price) OVER () AS total");

    let n = WindowExpr::builder(WindowFunc::Count, "n")
        .partition_by(Column::Category)
        .build()
        .unwrap();
    assert_eq!(render_item(n), "COUNT(*) OVER (PARTITION BY category) AS n");
}

#[test]
fn test_case_expression() {
    let branches = vec![
        CaseWhen::new(
            SimpleCondition::new(Column::Price, ComparisonOp::Lt, 10).unwrap(),
            CaseResult::literal("cheap"),
        ),
        CaseWhen::new(
            SimpleCondition::new(Column::Price, ComparisonOp::Lt, 100).unwrap(),
            CaseResult::literal("mid"),
        ),
    ];
    let with_else =
        CaseExpr::new(branches.clone(), Some(CaseResult::literal("premium")), "bucket").unwrap();
    assert_eq!(
        render_item(with_else),
        "CASE WHEN price < 10 THEN 'cheap' WHEN price < 100 THEN 'mid' ELSE 'premium' END AS bucket"
    );

    let without_else = CaseExpr::new(branches, None, "bucket").unwrap();
    assert_eq!(
        render_item(without_else),
        "CASE WHEN price < 10 THEN 'cheap' WHEN price < 100 THEN 'mid' ELSE NULL END AS bucket"
    );

    let column_result = CaseExpr::new(
        vec![CaseWhen::new(
            SimpleCondition::is_not_null(Column::MarkdownPrice),
            Column::MarkdownPrice.into(),
        )],
        Some(Column::RegularPrice.into()),
        "effective_price",
    )
    .unwrap();
    assert_eq!(
        render_item(column_result),
        "CASE WHEN markdown_price IS NOT NULL THEN markdown_price ELSE regular_price END AS effective_price"
    );
}

#[test]
fn test_distinct_aggregates() {
    assert_eq!(
        render_item(AggregateExpr::distinct(AggregateFunc::Count, Column::Brand, "brands").unwrap()),
        "COUNT(DISTINCT brand) AS brands"
    );
    assert_eq!(
        render_item(AggregateExpr::of(AggregateFunc::CountDistinct, Column::Brand, "brands").unwrap()),
        "COUNT(DISTINCT brand) AS brands"
    );
    assert_eq!(
        render_item(AggregateExpr::distinct(AggregateFunc::Sum, Column::Price, "s").unwrap()),
        "SUM(DISTINCT price) AS s"
    );
}

#[test]
fn test_aggregate_over_arithmetic() {
    let input = ArithmeticInput {
        left: Column::RegularPrice.into(),
        op: ArithmeticOp::Sub,
        right: Column::MarkdownPrice.into(),
    };
    assert_eq!(
        render_item(AggregateExpr::of(AggregateFunc::Sum, input, "total_discount").unwrap()),
        "SUM((regular_price - markdown_price)) AS total_discount"
    );
}

#[test]
fn test_percentiles() {
    assert_eq!(
        render_item(
            AggregateExpr::percentile(AggregateFunc::PercentileCont, Column::Price, 0.9, "p90").unwrap()
        ),
        "PERCENTILE_CONT(0.9) WITHIN GROUP (ORDER BY price) AS p90"
    );
    assert_eq!(
        render_item(
            AggregateExpr::percentile(AggregateFunc::PercentileDisc, Column::Price, 0.25, "q1").unwrap()
        ),
        "PERCENTILE_DISC(0.25) WITHIN GROUP (ORDER BY price) AS q1"
    );
    assert_eq!(
        render_item(AggregateExpr::of(AggregateFunc::Median, Column::Price, "median_price").unwrap()),
        "PERCENTILE_CONT(0.5) WITHIN GROUP (ORDER BY price) AS median_price"
    );
}

#[test]
fn test_scalar_subquery() {
    let books = WhereL0::and(vec![ConditionGroup::single(
        SimpleCondition::eq(Column::Category, "books").unwrap(),
    )])
    .unwrap();
    let sub = ScalarSubquery::new(
        Table::ProductOffers,
        AggregateExpr::of(AggregateFunc::Avg, Column::Price, "avg_price").unwrap(),
    )
    .filter(books);
    let query = Query::builder(Table::ProductOffers)
        .select(SelectExpr::column(Column::Title))
        .filter(where_only(SubqueryCondition::new(Column::Price, ComparisonOp::Gt, sub).unwrap()))
        .build()
        .unwrap();
    assert_eq!(
        translate(&query).unwrap(),
        "SELECT title\nFROM product_offers\nWHERE price > (SELECT AVG(price) FROM product_offers WHERE category = 'books')"
    );
}

#[test]
fn test_correlated_subquery() {
    let same_category = WhereL0::and(vec![ConditionGroup::single(
        ColumnComparison::new(
            QualifiedColumn::qualified("i", Column::Category),
            ComparisonOp::Eq,
            QualifiedColumn::qualified("o", Column::Category),
        )
        .unwrap(),
    )])
    .unwrap();
    let sub = ScalarSubquery::new(
        Table::ProductOffers,
        AggregateExpr::of(
            AggregateFunc::Avg,
            QualifiedColumn::qualified("i", Column::Price),
            "category_avg",
        )
        .unwrap(),
    )
    .alias("i")
    .filter(same_category);
    let cond = SubqueryCondition::new(
        QualifiedColumn::qualified("o", Column::Price),
        ComparisonOp::Lt,
        sub,
    )
    .unwrap();
    let query = Query::builder(FromClause::aliased(Table::ProductOffers, "o"))
        .select(ColumnExpr::qualified("o", Column::Title))
        .filter(where_only(cond))
        .build()
        .unwrap();
    assert_eq!(
        translate(&query).unwrap(),
        "SELECT o.title\nFROM product_offers AS o\nWHERE o.price < (SELECT AVG(i.price) FROM product_offers AS i WHERE i.category = o.category)"
    );
}

#[test]
fn test_subquery_alias_not_visible_outside() {
    let sub = ScalarSubquery::new(
        Table::ProductOffers,
        AggregateExpr::of(AggregateFunc::Max, Column::Price, "m").unwrap(),
    )
    .alias("i");
    let err = Query::builder(FromClause::aliased(Table::ProductOffers, "o"))
        .select(ColumnExpr::qualified("i", Column::Title))
        .filter(where_only(SubqueryCondition::new(Column::Price, ComparisonOp::Eq, sub).unwrap()))
        .build()
        .unwrap_err();
    assert!(matches!(err, ValidationError::UnresolvedAlias { alias, .. } if alias == "i"));
}

#[test]
fn test_grouped_subquery_in() {
    let sub = ScalarSubquery::new(
        Table::ProductOffers,
        AggregateExpr::of(AggregateFunc::Max, Column::Price, "max_price").unwrap(),
    )
    .group_by(vec![Column::Category]);
    let query = Query::builder(Table::ProductOffers)
        .select(SelectExpr::column(Column::Title))
        .filter(where_only(SubqueryCondition::new(Column::Price, ComparisonOp::In, sub).unwrap()))
        .build()
        .unwrap();
    assert_eq!(
        translate(&query).unwrap(),
        "SELECT title\nFROM product_offers\nWHERE price IN (SELECT MAX(price) FROM product_offers GROUP BY category)"
    );
}

#[test]
fn test_derived_table() {
    let in_stock = WhereL0::and(vec![ConditionGroup::single(
        SimpleCondition::eq(Column::InStock, true).unwrap(),
    )])
    .unwrap();
    let derived = DerivedTable::new(
        vec![
            SelectExpr::column(Column::Category),
            AggregateExpr::of(AggregateFunc::Avg, Column::Price, "avg_price").unwrap().into(),
        ],
        Table::ProductOffers,
        "cat_avg",
        Some(in_stock),
        vec![Column::Category],
    )
    .unwrap();
    let query = Query::builder(FromClause::derived(derived))
        .select(ColumnExpr::qualified("cat_avg", Column::Category))
        .order_by(OrderByClause::new(vec![OrderByItem::asc(QualifiedColumn::qualified("cat_avg", Column::Category))]).unwrap())
        .build()
        .unwrap();
    assert_eq!(
        translate(&query).unwrap(),
        "SELECT cat_avg.category\nFROM (SELECT category, AVG(price) AS avg_price FROM product_offers WHERE in_stock = TRUE GROUP BY category) AS cat_avg\nORDER BY cat_avg.category ASC"
    );
}

#[test]
fn test_having_variants() {
    let having = HavingClause::new(
        vec![
            HavingCondition::new(
                AggregateFunc::CountDistinct,
                Some(Column::Seller.into()),
                ComparisonOp::Gte,
                3,
            )
            .unwrap(),
            HavingCondition::new(AggregateFunc::Avg, Some(Column::Price.into()), ComparisonOp::Lt, 49.5)
                .unwrap(),
        ],
        LogicOp::Or,
    )
    .unwrap();
    let query = Query::builder(Table::ProductOffers)
        .select(SelectExpr::column(Column::Brand))
        .group_by(GroupByClause::new(vec![Column::Brand]).unwrap())
        .having(having)
        .build()
        .unwrap();
    assert_eq!(
        translate(&query).unwrap(),
        "SELECT brand\nFROM product_offers\nGROUP BY brand\nHAVING COUNT(DISTINCT seller) >= 3 OR AVG(price) < 49.5"
    );
}

#[test]
fn test_matched_price_comparison() {
    super::init_tracing();
    let from = FromClause::aliased(Table::ProductMatches, "m")
        .join(
            JoinSpec::inner(
                Table::ProductOffers,
                "my",
                vec![ConditionGroup::single(
                    ColumnComparison::new(
                        QualifiedColumn::qualified("m", Column::MyOfferId),
                        ComparisonOp::Eq,
                        QualifiedColumn::qualified("my", Column::Id),
                    )
                    .unwrap(),
                )],
            )
            .unwrap(),
        )
        .join(
            JoinSpec::inner(
                Table::ProductOffers,
                "comp",
                vec![ConditionGroup::single(
                    ColumnComparison::new(
                        QualifiedColumn::qualified("m", Column::CompOfferId),
                        ComparisonOp::Eq,
                        QualifiedColumn::qualified("comp", Column::Id),
                    )
                    .unwrap(),
                )],
            )
            .unwrap(),
        );
    let gap = BinaryArithmetic::new(
        Operand::qualified("my", Column::Price),
        ArithmeticOp::Sub,
        Operand::qualified("comp", Column::Price),
        "price_gap",
    )
    .unwrap();
    let query = Query::builder(from)
        .select(ColumnExpr::qualified("my", Column::Title))
        .select(gap)
        .filter(
            WhereL1::and(vec![ConditionGroup::single(
                SimpleCondition::new(
                    QualifiedColumn::qualified("m", Column::MatchScore),
                    ComparisonOp::Gte,
                    0.8,
                )
                .unwrap(),
            )])
            .unwrap(),
        )
        .order_by(OrderByClause::new(vec![OrderByItem::alias("price_gap", Direction::Desc)]).unwrap())
        .limit(LimitClause::new(20))
        .build()
        .unwrap();

    let expected = "\
SELECT my.title,
       (my.price - comp.price) AS price_gap
FROM product_matches AS m
INNER JOIN product_offers AS my ON m.my_offer_id = my.id
INNER JOIN product_offers AS comp ON m.comp_offer_id = comp.id
WHERE m.match_score >= 0.8
ORDER BY price_gap DESC
LIMIT 20";
    assert_eq!(translate(&query).unwrap(), expected);
}

#[test]
fn test_table_name_qualifier() {
    let query = Query::builder(Table::PriceHistory)
        .select(ColumnExpr::qualified("price_history", Column::Price))
        .build()
        .unwrap();
    assert_eq!(
        translate(&query).unwrap(),
        "SELECT price_history.price\nFROM price_history"
    );

    let strict = Translator::new(
        TranslatorConfig::builder()
            .allow_table_name_qualifiers(false)
            .build(),
    );
    assert!(matches!(
        strict.translate(&query).unwrap_err(),
        QirError::UnresolvedAlias { .. }
    ));
}

#[test]
fn test_unaliased_self_join_is_duplicate() {
    let join = JoinSpec::new(
        JoinType::Inner,
        Table::ProductOffers,
        None,
        vec![ConditionGroup::single(
            ColumnComparison::new(Column::Id, ComparisonOp::Eq, Column::Id).unwrap(),
        )],
    )
    .unwrap();
    let err = Query::builder(FromClause::table(Table::ProductOffers).join(join))
        .select(SelectExpr::column(Column::Id))
        .build()
        .unwrap_err();
    assert_eq!(err, ValidationError::DuplicateAlias("product_offers".into()));
}

#[test]
fn test_alias_checks_can_be_disabled() {
    let query = Query {
        select: vec![ColumnExpr::qualified("x", Column::Price).into()],
        from: Table::ProductOffers.into(),
        where_clause: None,
        group_by: None,
        having: None,
        order_by: None,
        limit: None,
    };
    let lenient = Translator::new(TranslatorConfig::builder().check_aliases(false).log_sql(true).build());
    assert_eq!(
        lenient.translate(&query).unwrap(),
        "SELECT x.price\nFROM product_offers"
    );
    assert!(translate(&query).is_err());
}

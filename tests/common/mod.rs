#![allow(dead_code)]

use qir::prelude::*;

/// A query that touches every select-expression kind, every condition kind,
/// a join, a correlated subquery and every optional clause.
pub fn full_query() -> Query {
    let join = JoinSpec::inner(
        Table::ProductMatches,
        "m",
        vec![ConditionGroup::single(
            ColumnComparison::new(
                QualifiedColumn::qualified("m", Column::MyOfferId),
                ComparisonOp::Eq,
                QualifiedColumn::qualified("my", Column::Id),
            )
            .expect("Failed to build join condition"),
        )],
    )
    .expect("Failed to build join");

    let discount = CompoundArithmetic::new(
        (
            Operand::qualified("my", Column::RegularPrice),
            ArithmeticOp::Sub,
            Operand::qualified("my", Column::MarkdownPrice),
        ),
        ArithmeticOp::Div,
        Operand::qualified("my", Column::RegularPrice),
        "discount_pct",
    )
    .expect("Failed to build compound arithmetic");

    let bucket = CaseExpr::new(
        vec![CaseWhen::new(
            SimpleCondition::new(QualifiedColumn::qualified("my", Column::Price), ComparisonOp::Lt, 10)
                .expect("Failed to build case condition"),
            CaseResult::literal("cheap"),
        )],
        Some(CaseResult::literal("regular")),
        "bucket",
    )
    .expect("Failed to build case");

    let prev = WindowExpr::builder(WindowFunc::Lag, "prev_price")
        .column(QualifiedColumn::qualified("my", Column::Price))
        .partition_by(QualifiedColumn::qualified("my", Column::Category))
        .order_by(OrderByItem::asc(QualifiedColumn::qualified("my", Column::ScrapedAt)))
        .offset(2)
        .default_value(0.0)
        .build()
        .expect("Failed to build window");

    let correlated = ScalarSubquery::new(
        Table::ProductOffers,
        AggregateExpr::of(
            AggregateFunc::Avg,
            QualifiedColumn::qualified("peer", Column::Price),
            "peer_avg",
        )
        .expect("Failed to build subquery aggregate"),
    )
    .alias("peer")
    .filter(
        WhereL0::and(vec![ConditionGroup::single(
            ColumnComparison::new(
                QualifiedColumn::qualified("peer", Column::Category),
                ComparisonOp::Eq,
                QualifiedColumn::qualified("my", Column::Category),
            )
            .expect("Failed to build correlation"),
        )])
        .expect("Failed to build subquery where"),
    );

    let filter = WhereL1::new(
        vec![
            ConditionGroup::single(
                SimpleCondition::in_list(
                    QualifiedColumn::qualified("my", Column::Category),
                    ["electronics", "books"],
                )
                .expect("Failed to build IN"),
            ),
            ConditionGroup::any(vec![
                SimpleCondition::is_null(QualifiedColumn::qualified("my", Column::MarkdownPrice)).into(),
                SimpleCondition::eq(QualifiedColumn::qualified("my", Column::InStock), true)
                    .expect("Failed to build eq")
                    .into(),
            ])
            .expect("Failed to build OR group"),
        ],
        vec![
            BetweenCondition::new(QualifiedColumn::qualified("m", Column::MatchScore), 0.5, 1.0)
                .expect("Failed to build between"),
        ],
        vec![
            SubqueryCondition::new(
                QualifiedColumn::qualified("my", Column::Price),
                ComparisonOp::Lt,
                correlated,
            )
            .expect("Failed to build subquery condition"),
        ],
        LogicOp::And,
    )
    .expect("Failed to build where");

    Query::builder(FromClause::aliased(Table::ProductOffers, "my").join(join))
        .select(ColumnExpr::qualified("my", Column::Category))
        .select(discount)
        .select(
            AggregateExpr::distinct(
                AggregateFunc::Count,
                QualifiedColumn::qualified("my", Column::Seller),
                "sellers",
            )
            .expect("Failed to build distinct count"),
        )
        .select(
            AggregateExpr::percentile(
                AggregateFunc::PercentileCont,
                QualifiedColumn::qualified("my", Column::Price),
                0.9,
                "p90",
            )
            .expect("Failed to build percentile"),
        )
        .select(bucket)
        .select(prev)
        .filter(filter)
        .group_by(
            GroupByClause::new(vec![Column::Category, Column::Price, Column::ScrapedAt])
                .expect("Failed to build group by"),
        )
        .having(
            HavingClause::new(
                vec![HavingCondition::count_star(ComparisonOp::Gte, 2).expect("Failed to build having")],
                LogicOp::And,
            )
            .expect("Failed to build having clause"),
        )
        .order_by(
            OrderByClause::new(vec![
                OrderByItem::alias("p90", Direction::Desc).nulls(NullsOrder::Last),
                OrderByItem::asc(QualifiedColumn::qualified("my", Column::Category)),
            ])
            .expect("Failed to build order by"),
        )
        .limit(LimitClause::with_offset(50, 100))
        .build()
        .expect("Failed to build full query")
}

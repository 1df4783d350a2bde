use serde::{Deserialize, Serialize};

use crate::ast::{
    FromClause, GroupByClause, HavingClause, LimitClause, OrderByClause, SelectExpr, WhereL1,
};
use crate::error::{QirResult, ValidationError};
use crate::validator::{self, Validate};

/// The root of the IR: one SELECT statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Query {
    pub select: Vec<SelectExpr>,
    pub from: FromClause,
    #[serde(
        rename = "where",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub where_clause: Option<WhereL1>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<GroupByClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub having: Option<HavingClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderByClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<LimitClause>,
}

impl Query {
    /// `SELECT ... FROM ...` with no optional clauses.
    pub fn new(select: Vec<SelectExpr>, from: impl Into<FromClause>) -> Result<Self, ValidationError> {
        Self::builder(from).select_all(select).build()
    }

    pub fn builder(from: impl Into<FromClause>) -> QueryBuilder {
        QueryBuilder {
            query: Query {
                select: Vec::new(),
                from: from.into(),
                where_clause: None,
                group_by: None,
                having: None,
                order_by: None,
                limit: None,
            },
        }
    }

    /// Decode and validate a query from JSON.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let query: Query = serde_json::from_str(json)?;
        query.validate()?;
        validator::check_aliases(&query)?;
        Ok(query)
    }

    pub fn to_json(&self) -> QirResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> QirResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Aliases declared in the select list, in order.
    pub fn select_aliases(&self) -> impl Iterator<Item = &str> {
        self.select.iter().filter_map(|e| e.alias())
    }
}

/// Builder for [`Query`]. `build` runs structural validation and alias resolution.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn select(mut self, expr: impl Into<SelectExpr>) -> Self {
        self.query.select.push(expr.into());
        self
    }

    pub fn select_all(mut self, exprs: impl IntoIterator<Item = SelectExpr>) -> Self {
        self.query.select.extend(exprs);
        self
    }

    pub fn filter(mut self, where_clause: impl Into<WhereL1>) -> Self {
        self.query.where_clause = Some(where_clause.into());
        self
    }

    pub fn group_by(mut self, group_by: GroupByClause) -> Self {
        self.query.group_by = Some(group_by);
        self
    }

    pub fn having(mut self, having: HavingClause) -> Self {
        self.query.having = Some(having);
        self
    }

    pub fn order_by(mut self, order_by: OrderByClause) -> Self {
        self.query.order_by = Some(order_by);
        self
    }

    pub fn limit(mut self, limit: LimitClause) -> Self {
        self.query.limit = Some(limit);
        self
    }

    pub fn build(self) -> Result<Query, ValidationError> {
        self.query.validate()?;
        validator::check_aliases(&self.query)?;
        Ok(self.query)
    }
}

//! # qir: typed query IR for SELECT statements
//!
//! > **Structured input in, canonical SQL out.**
//!
//! `qir` defines a closed, fixed-depth intermediate representation for a
//! subset of SQL `SELECT` and a deterministic translator from that IR to SQL
//! text. The IR is what an external generator (typically an LLM in
//! structured-output mode) produces; every shape it can emit is described by
//! [`schema::query_schema`], and none of them is recursive.
//!
//! ## Quick Example
//!
//! ```
//! use qir::prelude::*;
//!
//! let query = Query::builder(Table::ProductOffers)
//!     .select(SelectExpr::column(Column::Category))
//!     .select(AggregateExpr::of(AggregateFunc::Avg, Column::RegularPrice, "avg_price")?)
//!     .group_by(GroupByClause::new(vec![Column::Category])?)
//!     .build()?;
//!
//! assert_eq!(
//!     qir::translate(&query)?,
//!     "SELECT category,\n       AVG(regular_price) AS avg_price\nFROM product_offers\nGROUP BY category"
//! );
//! # Ok::<(), qir::QirError>(())
//! ```
//!
//! ## Layers
//!
//! | Module         | Role                                              |
//! |----------------|---------------------------------------------------|
//! | [`ast`]        | IR entities, serde-tagged for JSON exchange       |
//! | [`validator`]  | construction-time invariants                      |
//! | [`transpiler`] | IR to SQL, one rule per node kind                 |
//! | [`schema`]     | JSON Schema for generators, `$ref` inlining       |
//! | [`config`]     | translator switches, loaded from TOML             |

pub mod ast;
pub mod config;
pub mod error;
pub mod schema;
pub mod scope;
pub mod transpiler;
pub mod validator;

pub use error::{QirError, QirResult, SchemaError, ValidationError};

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::TranslatorConfig;
    pub use crate::error::*;
    pub use crate::transpiler::{ToSql, Translator};
    pub use crate::validator::Validate;
}

/// Translate a query with the default configuration.
pub fn translate(query: &ast::Query) -> QirResult<String> {
    transpiler::translate(query)
}

/// Decode a query from JSON and run every construction check on it.
///
/// # Example
///
/// ```
/// let query = qir::parse_query(
///     r#"{"select": [{"type": "column", "column": "title"}], "from": {"table": "product_offers"}}"#,
/// )
/// .unwrap();
/// assert_eq!(qir::translate(&query).unwrap(), "SELECT title\nFROM product_offers");
/// ```
pub fn parse_query(json: &str) -> QirResult<ast::Query> {
    Ok(ast::Query::from_json(json)?)
}

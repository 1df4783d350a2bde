//! IR to SQL translation.
//!
//! Rendering is a single tree walk: one function per node kind, chosen by an
//! exhaustive `match` on the variant. The output is deterministic; the same
//! `Query` always yields byte-identical SQL.

pub mod conditions;
pub mod expr;
pub mod literals;
pub mod select;
pub mod window;

#[cfg(test)]
mod tests;

use tracing::debug;

use crate::ast::{Query, Table};
use crate::config::TranslatorConfig;
use crate::error::QirResult;
use crate::scope;

pub use self::literals::quote_string;
pub use crate::scope::AliasScope;

/// Trait for converting IR nodes to SQL.
pub trait ToSql {
    /// Render with the default configuration.
    fn to_sql(&self) -> QirResult<String> {
        self.to_sql_with(&TranslatorConfig::default())
    }

    fn to_sql_with(&self, config: &TranslatorConfig) -> QirResult<String>;
}

impl ToSql for Query {
    fn to_sql_with(&self, config: &TranslatorConfig) -> QirResult<String> {
        Translator::new(config.clone()).translate(self)
    }
}

/// Renders [`Query`] values to SQL under a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    config: TranslatorConfig,
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub fn translate(&self, query: &Query) -> QirResult<String> {
        let sql = select::build_select(query, &self.config)?;
        debug!(
            select_items = query.select.len(),
            joins = query.from.joins.len(),
            bytes = sql.len(),
            "translated query"
        );
        if self.config.log_sql {
            debug!(sql = %sql, "rendered SQL");
        }
        Ok(sql)
    }

    /// Resolve every alias reference without rendering.
    pub fn check(&self, query: &Query) -> QirResult<()> {
        scope::check_query(query, &self.config)
    }
}

/// Translate with the default configuration.
pub fn translate(query: &Query) -> QirResult<String> {
    Translator::default().translate(query)
}

/// `table [AS alias]`
pub(crate) fn table_ref(table: Table, alias: Option<&str>) -> String {
    match alias {
        Some(alias) => format!("{} AS {}", table, alias),
        None => table.to_string(),
    }
}

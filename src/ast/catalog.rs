//! The closed table/column catalog.
//!
//! Identifiers in rendered SQL come from here or from validated aliases, never
//! from free text. The sets are fixed at build time.

use serde::{Deserialize, Serialize};

/// Known tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    /// One row per scraped offer (own catalogue and competitors).
    ProductOffers,
    /// Cross-reference linking comparable offers (matched execution).
    ProductMatches,
    /// Historical price observations per offer.
    PriceHistory,
}

impl Table {
    pub const ALL: &'static [Table] = &[
        Table::ProductOffers,
        Table::ProductMatches,
        Table::PriceHistory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::ProductOffers => "product_offers",
            Table::ProductMatches => "product_matches",
            Table::PriceHistory => "price_history",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known columns across all tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    OfferId,
    ProductId,
    MyOfferId,
    CompOfferId,
    MatchScore,
    Title,
    Brand,
    Category,
    Subcategory,
    Seller,
    Source,
    Currency,
    RegularPrice,
    MarkdownPrice,
    Price,
    InStock,
    Rating,
    ReviewCount,
    Url,
    ScrapedAt,
    ObservedAt,
}

impl Column {
    pub const ALL: &'static [Column] = &[
        Column::Id,
        Column::OfferId,
        Column::ProductId,
        Column::MyOfferId,
        Column::CompOfferId,
        Column::MatchScore,
        Column::Title,
        Column::Brand,
        Column::Category,
        Column::Subcategory,
        Column::Seller,
        Column::Source,
        Column::Currency,
        Column::RegularPrice,
        Column::MarkdownPrice,
        Column::Price,
        Column::InStock,
        Column::Rating,
        Column::ReviewCount,
        Column::Url,
        Column::ScrapedAt,
        Column::ObservedAt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::OfferId => "offer_id",
            Column::ProductId => "product_id",
            Column::MyOfferId => "my_offer_id",
            Column::CompOfferId => "comp_offer_id",
            Column::MatchScore => "match_score",
            Column::Title => "title",
            Column::Brand => "brand",
            Column::Category => "category",
            Column::Subcategory => "subcategory",
            Column::Seller => "seller",
            Column::Source => "source",
            Column::Currency => "currency",
            Column::RegularPrice => "regular_price",
            Column::MarkdownPrice => "markdown_price",
            Column::Price => "price",
            Column::InStock => "in_stock",
            Column::Rating => "rating",
            Column::ReviewCount => "review_count",
            Column::Url => "url",
            Column::ScrapedAt => "scraped_at",
            Column::ObservedAt => "observed_at",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

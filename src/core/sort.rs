//! Sort comparator for product records

use crate::core::field::ProductField;
use crate::core::product::Product;
use icu_collator::options::{CollatorOptions, Strength};
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// Field and direction to order results by
///
/// Only `id`, `name`, `price` and `stock` are sortable. Any other field
/// compares every pair as equal, which leaves the input order untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: ProductField,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortKey {
    pub fn new(field: impl Into<ProductField>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    pub fn asc(field: impl Into<ProductField>) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    pub fn desc(field: impl Into<ProductField>) -> Self {
        Self::new(field, SortOrder::Desc)
    }

    /// Whether this key actually reorders anything
    pub fn is_sortable(&self) -> bool {
        matches!(
            self.field,
            ProductField::Id | ProductField::Name | ProductField::Price | ProductField::Stock
        )
    }

    /// Parse `field`, `field:asc` or `field:desc`
    pub fn parse(expr: &str) -> Self {
        match expr.split_once(':') {
            Some((field, order)) => {
                Self::new(field.trim(), order.trim().parse().unwrap_or_default())
            }
            None => Self::asc(expr.trim()),
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        Self::asc(ProductField::Id)
    }
}

/// Compare two records by one key
pub fn compare(a: &Product, b: &Product, key: &SortKey) -> Ordering {
    let ascending = match key.field {
        ProductField::Id => a.id.cmp(&b.id),
        ProductField::Name => compare_names(&a.name, &b.name),
        ProductField::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
        ProductField::Stock => a.stock.cmp(&b.stock),
        _ => Ordering::Equal,
    };

    match key.order {
        SortOrder::Asc => ascending,
        SortOrder::Desc => ascending.reverse(),
    }
}

/// Locale-aware, case-insensitive name order (root collation, secondary strength)
pub fn compare_names(a: &str, b: &str) -> Ordering {
    static NAME_COLLATOR: OnceLock<Option<CollatorBorrowed<'static>>> = OnceLock::new();
    let collator = NAME_COLLATOR.get_or_init(|| {
        let mut options = CollatorOptions::default();
        options.strength = Some(Strength::Secondary);
        Collator::try_new(CollatorPreferences::default(), options)
            .inspect_err(|e| tracing::warn!(error = %e, "name collator unavailable"))
            .ok()
    });

    match collator {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

/// Stable sort of a collection by one key
pub fn sort_products(mut products: Vec<Product>, key: &SortKey) -> Vec<Product> {
    if key.is_sortable() {
        products.sort_by(|a, b| compare(a, b, key));
    }
    products
}

//! Field names and value coercions shared by filtering and sorting

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named product field as it appears in filters, sort keys and JSON bodies
///
/// Unrecognised names are kept as [`ProductField::Other`] so that a query
/// naming a field the catalog does not know still parses; the evaluator and
/// the comparator decide how such a field degrades.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductField {
    Id,
    Name,
    Category,
    Price,
    Stock,
    Description,
    ImageUrl,
    Other(String),
}

impl ProductField {
    /// Wire name of the field (camelCase, as the REST collection spells it)
    pub fn as_str(&self) -> &str {
        match self {
            ProductField::Id => "id",
            ProductField::Name => "name",
            ProductField::Category => "category",
            ProductField::Price => "price",
            ProductField::Stock => "stock",
            ProductField::Description => "description",
            ProductField::ImageUrl => "imageUrl",
            ProductField::Other(name) => name,
        }
    }

    /// Whether the field holds a number on every record
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ProductField::Id | ProductField::Price | ProductField::Stock
        )
    }
}

impl From<&str> for ProductField {
    fn from(name: &str) -> Self {
        match name {
            "id" => ProductField::Id,
            "name" => ProductField::Name,
            "category" => ProductField::Category,
            "price" => ProductField::Price,
            "stock" => ProductField::Stock,
            "description" => ProductField::Description,
            "imageUrl" => ProductField::ImageUrl,
            other => ProductField::Other(other.to_string()),
        }
    }
}

impl From<String> for ProductField {
    fn from(name: String) -> Self {
        ProductField::from(name.as_str())
    }
}

impl From<ProductField> for String {
    fn from(field: ProductField) -> Self {
        field.as_str().to_string()
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value a record exposes for one field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Null,
}

impl FieldValue {
    /// Numeric view of the value; NaN when it has none
    pub fn as_number(&self) -> f64 {
        match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => parse_number(s),
            FieldValue::Null => f64::NAN,
        }
    }

    /// Textual view of the value; `Null` renders as the empty string
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Null => String::new(),
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

/// A literal on the right-hand side of a filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(f64),
    Text(String),
}

impl FilterValue {
    pub fn as_number(&self) -> f64 {
        match self {
            FilterValue::Number(n) => *n,
            FilterValue::Text(s) => parse_number(s),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            FilterValue::Number(n) => n.to_string(),
            FilterValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        FilterValue::Number(n)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Number(n as f64)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        FilterValue::Number(f64::from(n))
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Parse trimmed decimal text; blank, malformed or non-finite input is NaN
///
/// `inf`, `infinity` and `nan` spellings are not numbers here.
fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(f64::NAN)
}

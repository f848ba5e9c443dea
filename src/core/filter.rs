//! Filter predicates over product records
//!
//! A [`Filter`] is one `field / operator / value` condition. Evaluation never
//! fails: comparisons that cannot be made numerically are simply false, and an
//! operator the engine does not know lets every record through.

use crate::core::field::{FieldValue, FilterValue, ProductField};
use crate::core::product::Product;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a filter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Lt,
    Gte,
    Lte,
    Like,
    StartsWith,
    EndsWith,
    /// Anything else; matches every record
    Unknown(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
            Operator::Like => "like",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
            Operator::Unknown(name) => name,
        }
    }
}

impl From<&str> for Operator {
    fn from(name: &str) -> Self {
        match name {
            "eq" => Operator::Eq,
            "neq" => Operator::Neq,
            "gt" => Operator::Gt,
            "lt" => Operator::Lt,
            "gte" => Operator::Gte,
            "lte" => Operator::Lte,
            "like" => Operator::Like,
            "startsWith" => Operator::StartsWith,
            "endsWith" => Operator::EndsWith,
            other => Operator::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        Operator::from(name.as_str())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field/operator/value condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: ProductField,
    pub operator: Operator,
    pub value: FilterValue,
}

impl Filter {
    pub fn new(
        field: impl Into<ProductField>,
        operator: impl Into<Operator>,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    pub fn equals(field: impl Into<ProductField>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    pub fn greater_than(field: impl Into<ProductField>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, Operator::Gt, value)
    }

    pub fn less_than(field: impl Into<ProductField>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, Operator::Lt, value)
    }

    pub fn like(field: impl Into<ProductField>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, Operator::Like, value)
    }

    /// Whether `product` satisfies this condition
    pub fn evaluate(&self, product: &Product) -> bool {
        evaluate(product, self)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

/// Evaluate one filter against one record
pub fn evaluate(product: &Product, filter: &Filter) -> bool {
    let actual = product.field_value(&filter.field);
    let expected = &filter.value;

    match &filter.operator {
        Operator::Eq => loosely_equal(&actual, expected),
        Operator::Neq => !loosely_equal(&actual, expected),
        Operator::Gt => compare_numbers(&actual, expected, |a, b| a > b),
        Operator::Lt => compare_numbers(&actual, expected, |a, b| a < b),
        Operator::Gte => compare_numbers(&actual, expected, |a, b| a >= b),
        Operator::Lte => compare_numbers(&actual, expected, |a, b| a <= b),
        Operator::Like => folded(&actual.to_text()).contains(&folded(&expected.to_text())),
        Operator::StartsWith => folded(&actual.to_text()).starts_with(&folded(&expected.to_text())),
        Operator::EndsWith => folded(&actual.to_text()).ends_with(&folded(&expected.to_text())),
        Operator::Unknown(name) => {
            tracing::trace!(operator = %name, "unknown filter operator, letting record through");
            true
        }
    }
}

/// Numeric equality when both sides are numbers, text equality otherwise
///
/// A missing value equals nothing, not even empty text.
fn loosely_equal(actual: &FieldValue, expected: &FilterValue) -> bool {
    if actual.is_null() {
        return false;
    }
    let (a, b) = (actual.as_number(), expected.as_number());
    if a.is_finite() && b.is_finite() {
        a == b
    } else {
        actual.to_text() == expected.to_text()
    }
}

fn compare_numbers(
    actual: &FieldValue,
    expected: &FilterValue,
    op: impl Fn(f64, f64) -> bool,
) -> bool {
    let (a, b) = (actual.as_number(), expected.as_number());
    if a.is_nan() || b.is_nan() {
        return false;
    }
    op(a, b)
}

fn folded(s: &str) -> String {
    s.to_lowercase()
}

/// Ordered, AND-combined filters as assembled by a filter bar
///
/// At most one filter is kept per `(field, operator)` pair: adding a second
/// one replaces the first in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter, replacing any existing one on the same field and operator
    ///
    /// Numeric text aimed at a numeric field is stored as a number.
    pub fn upsert(&mut self, filter: Filter) -> &mut Self {
        let filter = normalize(filter);
        match self
            .filters
            .iter_mut()
            .find(|f| f.field == filter.field && f.operator == filter.operator)
        {
            Some(existing) => *existing = filter,
            None => self.filters.push(filter),
        }
        self
    }

    /// Builder form of [`FilterSet::upsert`]
    pub fn with(mut self, filter: Filter) -> Self {
        self.upsert(filter);
        self
    }

    /// Set the name search term; blank terms leave the set unchanged
    pub fn with_search(mut self, term: &str) -> Self {
        let term = term.trim();
        if !term.is_empty() {
            self.upsert(Filter::like(ProductField::Name, term));
        }
        self
    }

    /// Remove the filter at `index`, if any
    pub fn remove(&mut self, index: usize) -> Option<Filter> {
        (index < self.filters.len()).then(|| self.filters.remove(index))
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter()
    }

    pub fn as_slice(&self) -> &[Filter] {
        &self.filters
    }

    pub fn into_vec(self) -> Vec<Filter> {
        self.filters
    }
}

impl From<FilterSet> for Vec<Filter> {
    fn from(set: FilterSet) -> Self {
        set.filters
    }
}

impl FromIterator<Filter> for FilterSet {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        let mut set = FilterSet::new();
        for filter in iter {
            set.upsert(filter);
        }
        set
    }
}

fn normalize(mut filter: Filter) -> Filter {
    if !filter.field.is_numeric() {
        return filter;
    }
    if let FilterValue::Text(text) = &filter.value {
        let n = filter.value.as_number();
        if n.is_finite() {
            tracing::trace!(
                field = %filter.field,
                value = %text,
                "storing numeric filter value as number"
            );
            filter.value = FilterValue::Number(n);
        }
    }
    filter
}

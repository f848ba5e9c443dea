//! Deterministic offline product set
//!
//! Used in place of the remote collection when it cannot be read. The data is
//! the same on every call so offline sessions and tests see identical records;
//! filtering, sorting and pagination happen afterwards exactly as for live data.

use crate::core::product::{MAX_PRODUCT_ID, Product};

/// Record count when none is configured
pub const DEFAULT_FALLBACK_RECORDS: usize = 25;

/// Categories assigned round-robin by record index
pub const FALLBACK_CATEGORIES: [&str; 5] =
    ["Elektronik", "Bilgisayar", "Aksesuar", "Giyim", "Ev Eşyası"];

const BASE_PRICE: f64 = 1000.0;
const PRICE_STEP: f64 = 500.0;
const BASE_STOCK: i64 = 5;
const IMAGE_POOL: usize = 30;

/// Synthesizes the fixed offline record set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackGenerator {
    count: usize,
}

impl FallbackGenerator {
    /// Generator for `count` records, capped at the largest valid product id
    pub fn new(count: usize) -> Self {
        Self {
            count: count.min(MAX_PRODUCT_ID as usize),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Produce the record set; identical on every call
    pub fn generate(&self) -> Vec<Product> {
        (0..self.count).map(record).collect()
    }
}

impl Default for FallbackGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_RECORDS)
    }
}

fn record(index: usize) -> Product {
    let number = index + 1;
    Product {
        id: number as u32,
        name: format!("Örnek Ürün {}", number),
        category: FALLBACK_CATEGORIES[index % FALLBACK_CATEGORIES.len()].to_string(),
        price: BASE_PRICE + PRICE_STEP * index as f64,
        stock: BASE_STOCK + index as i64,
        description: Some(format!(
            "Bu bir örnek ürün açıklamasıdır (#{}). Sunucuya ulaşılamadığında çevrimdışı modda gösterilir.",
            number
        )),
        image_url: format!(
            "https://picsum.photos/id/{}/200/300",
            (index % IMAGE_POOL) + 1
        ),
    }
}

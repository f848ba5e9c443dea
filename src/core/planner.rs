//! Query planner: AND-composition of filters and free-text search

use crate::core::filter::{Filter, evaluate};
use crate::core::product::Product;

/// Keep the records that satisfy every filter, in their original order
pub fn plan(products: &[Product], filters: &[Filter]) -> Vec<Product> {
    if filters.is_empty() {
        return products.to_vec();
    }

    products
        .iter()
        .filter(|p| filters.iter().all(|f| evaluate(p, f)))
        .cloned()
        .collect()
}

/// Case-insensitive match of `term` against name, category, description, id
/// and price
pub fn matches_search(product: &Product, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    product.name.to_lowercase().contains(&needle)
        || product.category.to_lowercase().contains(&needle)
        || product
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
        || product.id.to_string().contains(&needle)
        || product.price.to_string().contains(&needle)
}

/// Order-preserving free-text search; a blank term keeps everything
pub fn search(products: Vec<Product>, term: &str) -> Vec<Product> {
    if term.trim().is_empty() {
        return products;
    }
    products
        .into_iter()
        .filter(|p| matches_search(p, term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u32, name: &str, category: &str, price: f64, stock: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            category: category.to_string(),
            price,
            stock,
            description: None,
            image_url: String::new(),
        }
    }

    fn fixture() -> Vec<Product> {
        vec![
            product(1, "Laptop", "Bilgisayar", 25000.0, 3),
            product(2, "Kulaklık", "Elektronik", 1200.0, 0),
            product(3, "Telefon", "Elektronik", 18000.0, 12),
            product(4, "Mont", "Giyim", 2200.0, 8),
        ]
    }

    fn ids(products: &[Product]) -> Vec<u32> {
        products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_no_filters_is_identity() {
        let data = fixture();
        assert_eq!(plan(&data, &[]), data);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let filters = vec![
            Filter::equals("category", "Elektronik"),
            Filter::greater_than("stock", 0),
        ];
        assert_eq!(ids(&plan(&fixture(), &filters)), vec![3]);
    }

    #[test]
    fn test_plan_preserves_relative_order() {
        let filters = vec![Filter::less_than("price", 20000)];
        assert_eq!(ids(&plan(&fixture(), &filters)), vec![2, 3, 4]);
    }

    #[test]
    fn test_plan_does_not_touch_input() {
        let data = fixture();
        let _ = plan(&data, &[Filter::greater_than("price", 1_000_000)]);
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_search_across_fields() {
        let mut data = fixture();
        data[3].description = Some("Kışlık, su geçirmez".to_string());

        assert_eq!(ids(&search(data.clone(), "elektronik")), vec![2, 3]);
        assert_eq!(ids(&search(data.clone(), "SU GEÇ")), vec![4]);
        assert_eq!(ids(&search(data.clone(), "1200")), vec![2]);
        assert_eq!(ids(&search(data.clone(), "  ")), vec![1, 2, 3, 4]);
        assert!(search(data, "yok-boyle-bir-sey").is_empty());
    }
}

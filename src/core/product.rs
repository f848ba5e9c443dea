//! Product records and the inputs that create or change them

use crate::core::field::{FieldValue, ProductField};
use crate::core::sort::SortKey;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Largest id a caller may assign
pub const MAX_PRODUCT_ID: u32 = 999_999;

/// One product entity in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: String,
}

impl Product {
    /// Read a field by name
    ///
    /// Unknown fields and an absent description read as [`FieldValue::Null`].
    pub fn field_value(&self, field: &ProductField) -> FieldValue {
        match field {
            ProductField::Id => FieldValue::Number(f64::from(self.id)),
            ProductField::Name => FieldValue::Text(self.name.clone()),
            ProductField::Category => FieldValue::Text(self.category.clone()),
            ProductField::Price => FieldValue::Number(self.price),
            ProductField::Stock => FieldValue::Number(self.stock as f64),
            ProductField::Description => self
                .description
                .clone()
                .map(FieldValue::Text)
                .unwrap_or(FieldValue::Null),
            ProductField::ImageUrl => FieldValue::Text(self.image_url.clone()),
            ProductField::Other(_) => FieldValue::Null,
        }
    }

    /// Out-of-stock products have zero stock left
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Merge a partial update into a copy of this record
    pub fn apply(&self, patch: &ProductPatch) -> Product {
        Product {
            id: self.id,
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            category: patch
                .category
                .clone()
                .unwrap_or_else(|| self.category.clone()),
            price: patch.price.unwrap_or(self.price),
            stock: patch.stock.unwrap_or(self.stock),
            description: patch
                .description
                .clone()
                .or_else(|| self.description.clone()),
            image_url: patch
                .image_url
                .clone()
                .unwrap_or_else(|| self.image_url.clone()),
        }
    }
}

/// Input for creating a product
///
/// The id is optional; when absent the repository assigns one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 999_999, message = "id must be between 1 and 999999"))]
    pub id: Option<u32>,

    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,

    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,

    #[validate(range(min = 0, message = "stock must not be negative"))]
    pub stock: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub image_url: String,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        stock: i64,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            stock,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Materialize the record under the given id
    pub fn into_product(self, id: u32) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
            stock: self.stock,
            description: self.description,
            image_url: self.image_url,
        }
    }
}

/// Partial update of a product; unset fields keep their value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "category must not be empty"))]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "stock must not be negative"))]
    pub stock: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A returned record paired with its per-page render tag
///
/// The tag only disambiguates identical records across pages rendered side by
/// side. It is not part of the record and must not reach a mutation call.
#[derive(Debug, Clone, Copy)]
pub struct TaggedProduct<'a> {
    pub product: &'a Product,
    tag_index: usize,
    page: usize,
    sort: &'a SortKey,
}

impl<'a> TaggedProduct<'a> {
    pub(crate) fn new(product: &'a Product, page: usize, index: usize, sort: &'a SortKey) -> Self {
        Self {
            product,
            tag_index: index,
            page,
            sort,
        }
    }

    /// `"{id}-p{page}-{index}-{sortField}-{sortOrder}"`
    pub fn page_tag(&self) -> String {
        format!(
            "{}-p{}-{}-{}-{}",
            self.product.id, self.page, self.tag_index, self.sort.field, self.sort.order
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: 3,
            name: "Kablosuz Mouse".to_string(),
            category: "Aksesuar".to_string(),
            price: 249.9,
            stock: 0,
            description: None,
            image_url: "https://picsum.photos/id/3/200/300".to_string(),
        }
    }

    #[test]
    fn test_field_value_access() {
        let p = sample();
        assert_eq!(p.field_value(&ProductField::Id), FieldValue::Number(3.0));
        assert_eq!(p.field_value(&ProductField::Price), FieldValue::Number(249.9));
        assert_eq!(
            p.field_value(&ProductField::Category),
            FieldValue::Text("Aksesuar".to_string())
        );
        assert!(p.field_value(&ProductField::Description).is_null());
        assert!(p.field_value(&ProductField::from("createdAt")).is_null());
        assert!(!p.is_in_stock());
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("description").is_none());

        let parsed: Product = serde_json::from_value(serde_json::json!({
            "id": 9, "name": "Kalem", "category": "Ofis", "price": 10, "stock": 4
        }))
        .unwrap();
        assert_eq!(parsed.image_url, "");
        assert_eq!(parsed.price, 10.0);
    }

    #[test]
    fn test_new_product_validation() {
        assert!(NewProduct::new("Klavye", "Bilgisayar", 500.0, 3).validate().is_ok());
        assert!(NewProduct::new("", "Bilgisayar", 500.0, 3).validate().is_err());
        assert!(NewProduct::new("Klavye", "", 500.0, 3).validate().is_err());
        assert!(NewProduct::new("Klavye", "Bilgisayar", -1.0, 3).validate().is_err());
        assert!(NewProduct::new("Klavye", "Bilgisayar", 1.0, -3).validate().is_err());
    }

    #[test]
    fn test_new_product_id_bounds() {
        let base = NewProduct::new("Klavye", "Bilgisayar", 500.0, 3);
        assert!(base.clone().with_id(1).validate().is_ok());
        assert!(base.clone().with_id(MAX_PRODUCT_ID).validate().is_ok());
        assert!(base.clone().with_id(0).validate().is_err());
        assert!(base.with_id(MAX_PRODUCT_ID + 1).validate().is_err());
    }

    #[test]
    fn test_apply_patch() {
        let patch = ProductPatch {
            price: Some(199.0),
            stock: Some(12),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
        let updated = sample().apply(&patch);
        assert_eq!(updated.id, 3);
        assert_eq!(updated.name, "Kablosuz Mouse");
        assert_eq!(updated.price, 199.0);
        assert_eq!(updated.stock, 12);
    }

    #[test]
    fn test_patch_rejects_blank_name() {
        let patch = ProductPatch {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}

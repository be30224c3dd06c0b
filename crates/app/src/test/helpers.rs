//! Test Helpers

use crate::domain::products::{data::NewProduct, records::ProductUuid};

/// A catalog product with sensible defaults; tests override what they assert on.
pub(crate) fn new_product(name: &str, price: u64) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        name: name.to_string(),
        description: format!("{name} description"),
        price,
        original_price: None,
        category: "Tops".to_string(),
        subcategory: "Shirts".to_string(),
        image: "/images/product.jpg".to_string(),
        images: vec!["/images/product.jpg".to_string()],
        sizes: vec!["M".to_string()],
        colors: vec!["Red".to_string()],
        in_stock: true,
        featured: false,
        rating: 4.5,
        review_count: 12,
    }
}

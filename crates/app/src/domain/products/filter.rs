//! Catalog filtering.
//!
//! Filters are pure: the same products and filter always produce the same
//! result, in the same order as the input.

use crate::domain::products::records::ProductRecord;

/// Category name that means "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Catalog listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact category match. `None`, empty, or [`ALL_CATEGORIES`] matches everything.
    pub category: Option<String>,

    /// Case-insensitive substring of the name or description, used as given.
    pub search: Option<String>,

    /// Only featured products when `true`.
    pub featured_only: bool,
}

impl ProductFilter {
    #[must_use]
    pub fn matches(&self, product: &ProductRecord) -> bool {
        self.matches_category(product)
            && self.matches_search(product)
            && (!self.featured_only || product.featured)
    }

    fn matches_category(&self, product: &ProductRecord) -> bool {
        match self.category.as_deref().map(str::trim) {
            None | Some("" | ALL_CATEGORIES) => true,
            Some(category) => product.category == category,
        }
    }

    fn matches_search(&self, product: &ProductRecord) -> bool {
        let term = match self.search.as_deref() {
            None | Some("") => return true,
            Some(term) => term.to_lowercase(),
        };

        product.name.to_lowercase().contains(&term)
            || product.description.to_lowercase().contains(&term)
    }
}

/// Keep the products matching `filter`, preserving order.
#[must_use]
pub fn filter_products(products: Vec<ProductRecord>, filter: &ProductFilter) -> Vec<ProductRecord> {
    products
        .into_iter()
        .filter(|product| filter.matches(product))
        .collect()
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use crate::domain::products::records::ProductUuid;

    use super::*;

    fn product(name: &str, description: &str, category: &str, featured: bool) -> ProductRecord {
        ProductRecord {
            uuid: ProductUuid::new(),
            name: name.to_string(),
            description: description.to_string(),
            price: 10_00,
            original_price: None,
            category: category.to_string(),
            subcategory: String::new(),
            image: String::new(),
            images: vec![],
            sizes: vec!["S".to_string(), "M".to_string()],
            colors: vec!["Red".to_string()],
            in_stock: true,
            featured,
            rating: 4.5,
            review_count: 10,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn catalog() -> Vec<ProductRecord> {
        vec![
            product("Summer Maxi Dress", "Flowing and light", "Dresses", true),
            product("White Blouse", "Crisp cotton", "Tops", true),
            product("Skinny Jeans", "Stretch denim", "Bottoms", false),
            product("Wrap Dress", "Soft jersey", "Dresses", false),
        ]
    }

    fn names(products: &[ProductRecord]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn default_filter_keeps_everything_in_order() {
        let filtered = filter_products(catalog(), &ProductFilter::default());

        assert_eq!(
            names(&filtered),
            ["Summer Maxi Dress", "White Blouse", "Skinny Jeans", "Wrap Dress"]
        );
    }

    #[test]
    fn all_category_is_no_filter() {
        let filter = ProductFilter {
            category: Some(ALL_CATEGORIES.to_string()),
            ..ProductFilter::default()
        };

        assert_eq!(filter_products(catalog(), &filter).len(), 4);
    }

    #[test]
    fn category_is_exact_match() {
        let filter = ProductFilter {
            category: Some("Dresses".to_string()),
            ..ProductFilter::default()
        };

        assert_eq!(
            names(&filter_products(catalog(), &filter)),
            ["Summer Maxi Dress", "Wrap Dress"]
        );

        let filter = ProductFilter {
            category: Some("dresses".to_string()),
            ..ProductFilter::default()
        };

        assert!(filter_products(catalog(), &filter).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_description() {
        let by_name = ProductFilter {
            search: Some("DRESS".to_string()),
            ..ProductFilter::default()
        };

        assert_eq!(
            names(&filter_products(catalog(), &by_name)),
            ["Summer Maxi Dress", "Wrap Dress"]
        );

        let by_description = ProductFilter {
            search: Some("denim".to_string()),
            ..ProductFilter::default()
        };

        assert_eq!(
            names(&filter_products(catalog(), &by_description)),
            ["Skinny Jeans"]
        );
    }

    #[test]
    fn empty_search_matches_everything() {
        let filter = ProductFilter {
            search: Some(String::new()),
            ..ProductFilter::default()
        };

        assert_eq!(filter_products(catalog(), &filter).len(), 4);
    }

    #[test]
    fn whitespace_search_is_not_trimmed() {
        let products = vec![
            product("Scarf", "Silk", "Accessories", false),
            product("Wrap Dress", "Jersey", "Dresses", false),
        ];

        let filter = ProductFilter {
            search: Some(" ".to_string()),
            ..ProductFilter::default()
        };

        assert_eq!(names(&filter_products(products, &filter)), ["Wrap Dress"]);
    }

    #[test]
    fn category_search_and_featured_combine() {
        let filter = ProductFilter {
            category: Some("Dresses".to_string()),
            search: Some("dress".to_string()),
            featured_only: true,
        };

        assert_eq!(
            names(&filter_products(catalog(), &filter)),
            ["Summer Maxi Dress"]
        );
    }
}

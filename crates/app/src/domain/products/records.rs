//! Product Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,

    /// Current price in minor units (pence/cents).
    pub price: u64,

    /// Pre-discount price, shown struck through when present.
    pub original_price: Option<u64>,

    pub category: String,
    pub subcategory: String,

    /// Primary image reference.
    pub image: String,

    /// All image references, primary first.
    pub images: Vec<String>,

    /// Available sizes, in display order.
    pub sizes: Vec<String>,

    /// Available colors, in display order.
    pub colors: Vec<String>,

    pub in_stock: bool,
    pub featured: bool,

    /// Average rating, 0 to 5.
    pub rating: f64,

    pub review_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

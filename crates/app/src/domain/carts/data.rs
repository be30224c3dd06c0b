//! Cart Data

use crate::domain::products::records::ProductUuid;

/// New Cart Item Data
///
/// Only the product reference is taken from the caller; the snapshot stored
/// on the item is resolved from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub product: ProductUuid,
    pub size: String,
    pub color: String,
    pub quantity: u32,
}

//! Cart Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        carts::errors::CartsServiceError,
        products::records::{ProductRecord, ProductUuid},
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
///
/// The cart is stored as a single document per user. Every mutation below is
/// applied in memory and the whole item list is written back afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,

    /// Line items in insertion order.
    pub items: Vec<CartItemRecord>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartRecord {
    /// Sum of unit price times quantity across all items, in minor units.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .fold(0_u64, |acc, item| acc.saturating_add(item.line_total()))
    }

    /// Sum of quantities across all items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .fold(0_u64, |acc, item| acc.saturating_add(u64::from(item.quantity)))
    }

    /// Adds `quantity` units of a product variant.
    ///
    /// Items are merged on product, size and color: a matching item has its
    /// quantity increased and keeps its original snapshot and unit price.
    /// Returns the UUID of the item that now holds the units.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::InvalidQuantity`] when `quantity` is zero.
    pub fn add_item(
        &mut self,
        product: ProductSnapshot,
        size: String,
        color: String,
        quantity: u32,
    ) -> Result<CartItemUuid, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.matches(product.uuid, &size, &color))
        {
            existing.quantity = existing.quantity.saturating_add(quantity);

            return Ok(existing.uuid);
        }

        let item = CartItemRecord {
            uuid: CartItemUuid::new(),
            price: product.price,
            product,
            size,
            color,
            quantity,
        };

        let uuid = item.uuid;

        self.items.push(item);

        Ok(uuid)
    }

    /// Overwrites an item's quantity, removing the item when `quantity <= 0`.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::ItemNotFound`] when no item has the given
    /// UUID, or [`CartsServiceError::InvalidQuantity`] when `quantity` does not
    /// fit a line item.
    pub fn update_quantity(
        &mut self,
        item: CartItemUuid,
        quantity: i64,
    ) -> Result<(), CartsServiceError> {
        let position = self
            .items
            .iter()
            .position(|existing| existing.uuid == item)
            .ok_or(CartsServiceError::ItemNotFound)?;

        if quantity <= 0 {
            self.items.remove(position);

            return Ok(());
        }

        let quantity = u32::try_from(quantity).map_err(|_err| CartsServiceError::InvalidQuantity)?;

        if let Some(existing) = self.items.get_mut(position) {
            existing.quantity = quantity;
        }

        Ok(())
    }

    /// Removes an item, returning whether anything was removed.
    pub fn remove_item(&mut self, item: CartItemUuid) -> bool {
        let before = self.items.len();

        self.items.retain(|existing| existing.uuid != item);

        self.items.len() != before
    }

    /// Empties the cart, keeping the cart itself.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// Cart Item Record, stored inside the cart document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,

    /// Product details as they were when the item was first added.
    pub product: ProductSnapshot,

    pub size: String,
    pub color: String,

    /// Always at least 1 while the item is present.
    pub quantity: u32,

    /// Unit price in minor units, captured at add time.
    pub price: u64,
}

impl CartItemRecord {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }

    fn matches(&self, product: ProductUuid, size: &str, color: &str) -> bool {
        self.product.uuid == product && self.size == size && self.color == color
    }
}

/// Denormalised copy of the product fields a cart needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub image: String,
    pub category: String,
}

impl From<&ProductRecord> for ProductSnapshot {
    fn from(product: &ProductRecord) -> Self {
        Self {
            uuid: product.uuid,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            category: product.category.clone(),
        }
    }
}

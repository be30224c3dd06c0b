//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bella_app::domain::carts::records::{CartItemRecord, CartRecord, ProductSnapshot};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// The items in the cart, oldest first
    pub items: Vec<CartItemResponse>,

    /// Sum of unit price times quantity, in pence/cents
    pub total: u64,

    /// Sum of item quantities
    pub item_count: u64,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<CartRecord> for CartResponse {
    fn from(cart: CartRecord) -> Self {
        let total = cart.total();
        let item_count = cart.item_count();

        CartResponse {
            uuid: cart.uuid.into(),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            total,
            item_count,
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    /// The product as it was when first added
    pub product: ProductSnapshotResponse,

    pub size: String,
    pub color: String,
    pub quantity: u32,

    /// Unit price in pence/cents, fixed when the item was added
    pub price: u64,

    /// Unit price times quantity
    pub line_total: u64,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(item: CartItemRecord) -> Self {
        let line_total = item.line_total();

        Self {
            uuid: item.uuid.into(),
            product: item.product.into(),
            size: item.size,
            color: item.color,
            quantity: item.quantity,
            price: item.price,
            line_total,
        }
    }
}

/// Product Snapshot Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductSnapshotResponse {
    pub uuid: Uuid,
    pub name: String,
    pub price: u64,
    pub image: String,
    pub category: String,
}

impl From<ProductSnapshot> for ProductSnapshotResponse {
    fn from(snapshot: ProductSnapshot) -> Self {
        Self {
            uuid: snapshot.uuid.into(),
            name: snapshot.name,
            price: snapshot.price,
            image: snapshot.image,
            category: snapshot.category,
        }
    }
}

/// Get Cart Handler
///
/// Returns the caller's cart, creating an empty one on first access.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_or_401()?.user.uuid;

    let cart = state
        .app
        .carts
        .get_or_create_cart(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

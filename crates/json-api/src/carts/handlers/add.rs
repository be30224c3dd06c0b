//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bella_app::domain::carts::data::NewCartItem;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
    /// The catalog product to add. Only the identifier is read; name, price
    /// and image are taken from the catalog.
    pub product: ProductReference,

    pub size: String,
    pub color: String,

    /// Units to add, defaults to 1
    pub quantity: Option<u32>,
}

/// Product Reference
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductReference {
    pub uuid: Uuid,
}

impl From<AddCartItemRequest> for NewCartItem {
    fn from(request: AddCartItemRequest) -> Self {
        NewCartItem {
            product: request.product.uuid.into(),
            size: request.size,
            color: request.color,
            quantity: request.quantity.unwrap_or(1),
        }
    }
}

/// Add Cart Item Handler
///
/// Adds units of a product variant to the caller's cart. An existing item
/// with the same product, size and color has its quantity increased.
#[endpoint(
    tags("cart"),
    summary = "Add Item to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_or_401()?.user.uuid;

    let cart = state
        .app
        .carts
        .add_item(user, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

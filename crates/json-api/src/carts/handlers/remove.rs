//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Remove Cart Item Handler
///
/// Removing an item that is not in the cart returns the cart unchanged.
#[endpoint(
    tags("cart"),
    summary = "Remove Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_or_401()?.user.uuid;

    let cart = state
        .app
        .carts
        .remove_item(user, item.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bella_app::domain::carts::{
        CartsServiceError, MockCartsService, records::CartItemUuid,
    };

    use crate::test_helpers::{TEST_USER_UUID, carts_service, make_cart, make_cart_item};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart/remove/{item}").delete(handler))
    }

    #[tokio::test]
    async fn test_remove_absent_item_returns_cart_unchanged() -> TestResult {
        let mut carts = MockCartsService::new();
        let item = CartItemUuid::new();
        let cart = make_cart(vec![make_cart_item(4_00, 1)]);

        carts
            .expect_remove_item()
            .once()
            .withf(move |user, i| *user == TEST_USER_UUID && *i == item)
            .return_once(move |_, _| Ok(cart));

        let response: CartResponse =
            TestClient::delete(format!("http://example.com/cart/remove/{item}"))
                .send(&make_service(carts))
                .await
                .take_json()
                .await?;

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.total, 4_00);

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_missing_cart_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();
        let item = CartItemUuid::new();

        carts
            .expect_remove_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/cart/remove/{item}"))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_malformed_item_uuid_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_remove_item().never();

        let res = TestClient::delete("http://example.com/cart/remove/123")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}

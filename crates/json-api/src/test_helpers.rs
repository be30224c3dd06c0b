//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use bella_app::{
    auth::{
        Authenticated, IssuedSession, MockAuthService, SessionRecord, SessionTokenVersion,
        SessionUuid,
    },
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            records::{CartItemRecord, CartItemUuid, CartRecord, CartUuid, ProductSnapshot},
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        users::records::{UserRecord, UserUuid},
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_SESSION_UUID: SessionUuid = SessionUuid::from_uuid(Uuid::nil());

pub(crate) fn test_user() -> UserRecord {
    UserRecord {
        uuid: TEST_USER_UUID,
        email: "shopper@example.com".to_string(),
        name: "Shopper".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn authenticated() -> Authenticated {
    Authenticated {
        user: test_user(),
        session: TEST_SESSION_UUID,
    }
}

/// Stands in for the auth middleware.
#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_authenticated(authenticated());
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn make_issued_session() -> IssuedSession {
    IssuedSession {
        token: "bs_v1_token".to_string(),
        session: SessionRecord {
            uuid: TEST_SESSION_UUID,
            user_uuid: TEST_USER_UUID,
            version: SessionTokenVersion::V1,
            created_at: Timestamp::UNIX_EPOCH,
            expires_at: Timestamp::UNIX_EPOCH,
            last_used_at: None,
            revoked_at: None,
        },
        user: test_user(),
    }
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Elegant Summer Maxi Dress".to_string(),
        description: "A flowing maxi dress.".to_string(),
        price: 89_99,
        original_price: Some(129_99),
        category: "Dresses".to_string(),
        subcategory: "Maxi".to_string(),
        image: "/images/maxi.jpg".to_string(),
        images: vec!["/images/maxi.jpg".to_string()],
        sizes: vec!["S".to_string(), "M".to_string()],
        colors: vec!["Navy".to_string()],
        in_stock: true,
        featured: true,
        rating: 4.8,
        review_count: 124,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart_item(price: u64, quantity: u32) -> CartItemRecord {
    CartItemRecord {
        uuid: CartItemUuid::new(),
        product: ProductSnapshot {
            uuid: ProductUuid::new(),
            name: "Classic Tee".to_string(),
            price,
            image: "/images/tee.jpg".to_string(),
            category: "Tops".to_string(),
        },
        size: "M".to_string(),
        color: "Red".to_string(),
        quantity,
        price,
    }
}

pub(crate) fn make_cart(items: Vec<CartItemRecord>) -> CartRecord {
    CartRecord {
        uuid: CartUuid::new(),
        user_uuid: TEST_USER_UUID,
        items,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_create_product().never();

    products
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_or_create_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_item_quantity().never();
    carts.expect_remove_item().never();
    carts.expect_clear_cart().never();

    carts
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_register().never();
    auth.expect_login().never();
    auth.expect_authenticate_bearer().never();
    auth.expect_revoke_session().never();

    auth
}

fn state(
    products: MockProductsService,
    carts: MockCartsService,
    auth: MockAuthService,
) -> Arc<State> {
    State::from_app_context(AppContext {
        products: Arc::new(products),
        carts: Arc::new(carts),
        auth: Arc::new(auth),
    })
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state(strict_products_mock(), strict_carts_mock(), auth)
}

/// Catalog routes are public, so no caller is injected.
pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(products, strict_carts_mock(), strict_auth_mock())))
            .push(route),
    )
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(strict_products_mock(), carts, strict_auth_mock())))
            .hoop(inject_user)
            .push(route),
    )
}

/// Auth routes as an anonymous caller (register, login).
pub(crate) fn auth_service(auth: MockAuthService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_auth(auth)))
            .push(route),
    )
}

/// Auth routes as the signed-in test user (logout, me).
pub(crate) fn signed_in_auth_service(auth: MockAuthService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_auth(auth)))
            .hoop(inject_user)
            .push(route),
    )
}

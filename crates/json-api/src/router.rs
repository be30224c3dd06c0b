//! App Router

use salvo::{
    Router,
    cors::{Cors, CorsHandler},
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};

use crate::{auth, carts, products};

/// CORS for the storefront client. Installed on the service so preflight
/// requests are answered before routing.
pub(crate) fn cors(origin: &str) -> CorsHandler {
    Cors::new()
        .allow_origin(origin)
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(vec![AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
        .into_handler()
}

/// Everything under `/api`. Catalog and sign-in routes are public; the cart
/// and the session routes sit behind the bearer token middleware.
pub(crate) fn api_router() -> Router {
    Router::with_path("api")
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(
            Router::with_path("auth")
                .push(Router::with_path("register").post(auth::register::handler))
                .push(Router::with_path("login").post(auth::login::handler))
                .push(
                    Router::new()
                        .hoop(auth::middleware::handler)
                        .push(Router::with_path("logout").post(auth::logout::handler))
                        .push(Router::with_path("me").get(auth::me::handler)),
                ),
        )
        .push(
            Router::with_path("cart")
                .hoop(auth::middleware::handler)
                .get(carts::get::handler)
                .push(Router::with_path("add").post(carts::add::handler))
                .push(Router::with_path("update/{item}").put(carts::update::handler))
                .push(Router::with_path("remove/{item}").delete(carts::remove::handler))
                .push(Router::with_path("clear").delete(carts::clear::handler)),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        http::header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
            ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, AUTHORIZATION, ORIGIN,
        },
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use bella_app::auth::{AuthServiceError, MockAuthService};

    use crate::test_helpers::{authenticated, state_with_auth};

    use super::*;

    const STOREFRONT_ORIGIN: &str = "http://localhost:5173";

    fn make_service(auth: MockAuthService) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(state_with_auth(auth)))
                .push(api_router()),
        )
        .hoop(cors(STOREFRONT_ORIGIN))
    }

    #[tokio::test]
    async fn test_preflight_allows_storefront_origin_with_credentials() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let res = TestClient::options("http://example.com/api/cart/add")
            .add_header(ORIGIN, STOREFRONT_ORIGIN, true)
            .add_header(ACCESS_CONTROL_REQUEST_METHOD, "POST", true)
            .add_header(ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type", true)
            .send(&make_service(auth))
            .await;

        let header = |name| {
            res.headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_ascii_lowercase()
        };

        assert!(
            res.status_code.is_some_and(|code| code.is_success()),
            "expected successful preflight, got {:?}",
            res.status_code
        );
        assert_eq!(header(ACCESS_CONTROL_ALLOW_ORIGIN), STOREFRONT_ORIGIN);
        assert_eq!(header(ACCESS_CONTROL_ALLOW_CREDENTIALS), "true");
        assert!(header(ACCESS_CONTROL_ALLOW_METHODS).contains("post"));
        assert!(header(ACCESS_CONTROL_ALLOW_HEADERS).contains("authorization"));

        Ok(())
    }

    #[tokio::test]
    async fn test_other_origins_get_no_cors_grant() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com/api/cart")
            .add_header(ORIGIN, "http://evil.example", true)
            .send(&make_service(auth))
            .await;

        assert!(res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_cart_routes_without_bearer_return_401() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let service = make_service(auth);

        for res in [
            TestClient::get("http://example.com/api/cart").send(&service).await,
            TestClient::post("http://example.com/api/cart/add").send(&service).await,
            TestClient::delete("http://example.com/api/cart/clear").send(&service).await,
        ] {
            assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_cart_route_with_invalid_bearer_returns_403() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .return_once(|_| Err(AuthServiceError::InvalidToken));

        let res = TestClient::get("http://example.com/api/cart")
            .add_header(AUTHORIZATION, "Bearer bs_v1_revoked", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_me_requires_bearer() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .withf(|token| token == "bs_v1_token")
            .return_once(|_| Ok(authenticated()));

        let service = make_service(auth);

        let anonymous = TestClient::get("http://example.com/api/auth/me")
            .send(&service)
            .await;

        let mut signed_in = TestClient::get("http://example.com/api/auth/me")
            .add_header(AUTHORIZATION, "Bearer bs_v1_token", true)
            .send(&service)
            .await;

        assert_eq!(anonymous.status_code, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(signed_in.status_code, Some(StatusCode::OK));
        assert!(signed_in.take_string().await?.contains("shopper@example.com"));

        Ok(())
    }
}

//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Span, debug};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            records::{CartItemUuid, CartRecord, ProductSnapshot},
            repository::PgCartsRepository,
        },
        products::repository::PgProductsRepository,
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts: PgCartsRepository,
    products: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts: PgCartsRepository::new(),
            products: PgProductsRepository::new(),
        }
    }

    /// Lock the user's cart for the rest of the transaction.
    async fn locked_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        self.carts
            .lock_cart(tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(
        name = "carts.service.get_or_create_cart",
        skip(self),
        fields(user_uuid = %user, cart_uuid = tracing::field::Empty),
        err
    )]
    async fn get_or_create_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.carts.ensure_cart(&mut tx, user).await?;

        let cart = self
            .carts
            .get_cart(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        tx.commit().await?;

        Span::current().record("cart_uuid", tracing::field::display(cart.uuid));

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            user_uuid = %user,
            product_uuid = %item.product,
            quantity = item.quantity,
            item_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let product = match self.products.get_product(&mut tx, item.product).await {
            Ok(product) => product,
            Err(sqlx::Error::RowNotFound) => return Err(CartsServiceError::ProductNotFound),
            Err(error) => return Err(error.into()),
        };

        self.carts.ensure_cart(&mut tx, user).await?;

        let mut cart = self.locked_cart(&mut tx, user).await?;

        let item_uuid = cart.add_item(
            ProductSnapshot::from(&product),
            item.size,
            item.color,
            item.quantity,
        )?;

        Span::current().record("item_uuid", tracing::field::display(item_uuid));

        let saved = self.carts.save_items(&mut tx, &cart).await?;

        tx.commit().await?;

        debug!(cart_uuid = %saved.uuid, item_count = saved.item_count(), "added cart item");

        Ok(saved)
    }

    #[tracing::instrument(
        name = "carts.service.update_item_quantity",
        skip(self),
        fields(user_uuid = %user, item_uuid = %item),
        err
    )]
    async fn update_item_quantity(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: i64,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self.locked_cart(&mut tx, user).await?;

        cart.update_quantity(item, quantity)?;

        let saved = self.carts.save_items(&mut tx, &cart).await?;

        tx.commit().await?;

        Ok(saved)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(user_uuid = %user, item_uuid = %item, removed = tracing::field::Empty),
        err
    )]
    async fn remove_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self.locked_cart(&mut tx, user).await?;

        let removed = cart.remove_item(item);

        Span::current().record("removed", removed);

        if !removed {
            tx.commit().await?;

            return Ok(cart);
        }

        let saved = self.carts.save_items(&mut tx, &cart).await?;

        tx.commit().await?;

        Ok(saved)
    }

    #[tracing::instrument(
        name = "carts.service.clear_cart",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn clear_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self.locked_cart(&mut tx, user).await?;

        cart.clear();

        let saved = self.carts.save_items(&mut tx, &cart).await?;

        tx.commit().await?;

        Ok(saved)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart, creating an empty one on first access.
    async fn get_or_create_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;

    /// Add units of a catalog product to the user's cart, merging with an
    /// existing item of the same product, size and color.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Set an item's quantity; zero or below removes the item.
    async fn update_item_quantity(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: i64,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove an item. Removing an item that is not in the cart is a no-op.
    async fn remove_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove every item from the user's cart.
    async fn clear_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use testresult::TestResult;

    use crate::{
        domain::products::{ProductsService, records::ProductRecord},
        test::{TestContext, helpers::new_product},
    };

    use super::*;

    async fn create_product(ctx: &TestContext, name: &str, price: u64) -> ProductRecord {
        ctx.products
            .create_product(new_product(name, price))
            .await
            .expect("create_product should succeed")
    }

    fn variant(product: &ProductRecord, size: &str, color: &str, quantity: u32) -> NewCartItem {
        NewCartItem {
            product: product.uuid,
            size: size.to_string(),
            color: color.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn get_or_create_cart_creates_empty_cart_once() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com").await;

        let first = ctx.carts.get_or_create_cart(user).await?;
        let second = ctx.carts.get_or_create_cart(user).await?;

        assert_eq!(first.uuid, second.uuid);
        assert_eq!(first.user_uuid, user);
        assert!(first.items.is_empty());
        assert_eq!(first.total(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn get_or_create_cart_for_unknown_user_returns_invalid_reference() {
        let ctx = TestContext::new().await;

        let result = ctx.carts.get_or_create_cart(UserUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_item_creates_cart_and_snapshots_product() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com").await;
        let product = create_product(&ctx, "Linen Shirt", 10_00).await;

        let cart = ctx
            .carts
            .add_item(user, variant(&product, "M", "Red", 1))
            .await?;

        let item = cart.items.first().expect("cart should have one item");

        assert_eq!(cart.items.len(), 1);
        assert_eq!(item.product.uuid, product.uuid);
        assert_eq!(item.product.name, "Linen Shirt");
        assert_eq!(item.price, 10_00);
        assert_eq!(cart.total(), 10_00);

        Ok(())
    }

    #[tokio::test]
    async fn add_update_to_zero_walkthrough_persists_each_step() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com").await;
        let p1 = create_product(&ctx, "P1", 10_00).await;

        ctx.carts.add_item(user, variant(&p1, "M", "Red", 1)).await?;

        let cart = ctx.carts.add_item(user, variant(&p1, "M", "Red", 2)).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), 30_00);

        let item = cart.items.first().map(|i| i.uuid).expect("merged item");

        let cart = ctx.carts.update_item_quantity(user, item, 0).await?;

        assert!(cart.items.is_empty());
        assert_eq!(cart.total(), 0);

        let reloaded = ctx.carts.get_or_create_cart(user).await?;

        assert_eq!(reloaded.uuid, cart.uuid);
        assert!(reloaded.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn add_item_unknown_product_returns_product_not_found() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com").await;

        let result = ctx
            .carts
            .add_item(
                user,
                NewCartItem {
                    product: crate::domain::products::records::ProductUuid::new(),
                    size: "M".to_string(),
                    color: "Red".to_string(),
                    quantity: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_item_zero_quantity_returns_invalid_quantity() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com").await;
        let product = create_product(&ctx, "Linen Shirt", 10_00).await;

        let result = ctx
            .carts
            .add_item(user, variant(&product, "M", "Red", 0))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_item_quantity_overwrites_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com").await;
        let product = create_product(&ctx, "Linen Shirt", 10_00).await;

        let cart = ctx
            .carts
            .add_item(user, variant(&product, "M", "Red", 1))
            .await?;

        let item = cart.items.first().map(|i| i.uuid).expect("added item");

        let cart = ctx.carts.update_item_quantity(user, item, 4).await?;

        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.total(), 40_00);

        Ok(())
    }

    #[tokio::test]
    async fn update_item_quantity_without_cart_returns_not_found() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com").await;

        let result = ctx
            .carts
            .update_item_quantity(user, CartItemUuid::new(), 1)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_item_quantity_unknown_item_returns_item_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com").await;

        ctx.carts.get_or_create_cart(user).await?;

        let result = ctx
            .carts
            .update_item_quantity(user, CartItemUuid::new(), 1)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn remove_absent_item_leaves_cart_unchanged() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com").await;
        let product = create_product(&ctx, "Linen Shirt", 10_00).await;

        let before = ctx
            .carts
            .add_item(user, variant(&product, "M", "Red", 2))
            .await?;

        let after = ctx.carts.remove_item(user, CartItemUuid::new()).await?;

        assert_eq!(after, before);

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_without_cart_returns_not_found() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com").await;

        let result = ctx.carts.remove_item(user, CartItemUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn remove_item_deletes_item() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com").await;
        let shirt = create_product(&ctx, "Linen Shirt", 10_00).await;
        let hat = create_product(&ctx, "Bucket Hat", 5_00).await;

        ctx.carts.add_item(user, variant(&shirt, "M", "Red", 1)).await?;

        let cart = ctx
            .carts
            .add_item(user, variant(&hat, "One Size", "Black", 1))
            .await?;

        let shirt_item = cart.items.first().map(|i| i.uuid).expect("shirt item");

        let cart = ctx.carts.remove_item(user, shirt_item).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total(), 5_00);

        Ok(())
    }

    #[tokio::test]
    async fn clear_cart_keeps_cart_and_empties_items() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com").await;
        let product = create_product(&ctx, "Linen Shirt", 10_00).await;

        let before = ctx
            .carts
            .add_item(user, variant(&product, "M", "Red", 3))
            .await?;

        let cart = ctx.carts.clear_cart(user).await?;

        assert_eq!(cart.uuid, before.uuid);
        assert!(cart.items.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn clear_cart_without_cart_returns_not_found() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com").await;

        let result = ctx.carts.clear_cart(user).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn concurrent_adds_are_not_lost() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ada@example.com").await;
        let product = create_product(&ctx, "Linen Shirt", 10_00).await;

        ctx.carts.get_or_create_cart(user).await?;

        let carts = Arc::new(ctx.carts.clone());

        let mut handles = Vec::new();

        for _ in 0..8 {
            let carts = Arc::clone(&carts);
            let item = variant(&product, "M", "Red", 1);

            handles.push(tokio::spawn(async move { carts.add_item(user, item).await }));
        }

        for handle in handles {
            handle.await??;
        }

        let cart = ctx.carts.get_or_create_cart(user).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.item_count(), 8);

        Ok(())
    }
}

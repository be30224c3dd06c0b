//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{amount_to_i64, try_get_amount, try_get_optional_amount},
    domain::products::{
        data::NewProduct,
        records::{ProductRecord, ProductUuid},
    },
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        let price = amount_to_i64(product.price, "price")?;

        let original_price = product
            .original_price
            .map(|amount| amount_to_i64(amount, "original_price"))
            .transpose()?;

        let review_count = i32::try_from(product.review_count)
            .map_err(|e| sqlx::Error::Encode(format!("review_count: {e}").into()))?;

        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.name)
            .bind(product.description)
            .bind(price)
            .bind(original_price)
            .bind(product.category)
            .bind(product.subcategory)
            .bind(product.image)
            .bind(product.images)
            .bind(product.sizes)
            .bind(product.colors)
            .bind(product.in_stock)
            .bind(product.featured)
            .bind(product.rating)
            .bind(review_count)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let review_count: i32 = row.try_get("review_count")?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: try_get_amount(row, "price")?,
            original_price: try_get_optional_amount(row, "original_price")?,
            category: row.try_get("category")?,
            subcategory: row.try_get("subcategory")?,
            image: row.try_get("image")?,
            images: row.try_get("images")?,
            sizes: row.try_get("sizes")?,
            colors: row.try_get("colors")?,
            in_stock: row.try_get("in_stock")?,
            featured: row.try_get("featured")?,
            rating: row.try_get("rating")?,
            review_count: u32::try_from(review_count).map_err(|e| sqlx::Error::ColumnDecode {
                index: "review_count".to_string(),
                source: Box::new(e),
            })?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

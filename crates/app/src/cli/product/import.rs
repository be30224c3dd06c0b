use std::path::PathBuf;

use bella_app::{
    database::{self, Db},
    domain::products::{
        PgProductsService, ProductsService, ProductsServiceError, data::NewProduct,
        records::ProductUuid,
    },
};
use clap::Args;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ImportProductsArgs {
    /// JSON file holding an array of products
    #[arg(long)]
    file: PathBuf,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

/// One catalog entry as it appears in the import file. Prices are decimal
/// major units (`89.99`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductImport {
    #[serde(default)]
    uuid: Option<Uuid>,
    name: String,
    #[serde(default)]
    description: String,
    price: f64,
    #[serde(default)]
    original_price: Option<f64>,
    category: String,
    #[serde(default)]
    subcategory: String,
    image: String,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    sizes: Vec<String>,
    #[serde(default)]
    colors: Vec<String>,
    #[serde(default = "default_in_stock")]
    in_stock: bool,
    #[serde(default)]
    featured: bool,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    review_count: u32,
}

fn default_in_stock() -> bool {
    true
}

/// Largest price accepted from an import file, in major units.
const MAX_IMPORT_PRICE: f64 = 1_000_000_000.0;

fn to_minor_units(field: &str, amount: f64) -> Result<u64, String> {
    if !amount.is_finite() || !(0.0..=MAX_IMPORT_PRICE).contains(&amount) {
        return Err(format!("{field} must be between 0 and {MAX_IMPORT_PRICE}"));
    }

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "range checked above"
    )]
    let minor = (amount * 100.0).round() as u64;

    Ok(minor)
}

impl TryFrom<ProductImport> for NewProduct {
    type Error = String;

    fn try_from(product: ProductImport) -> Result<Self, Self::Error> {
        let price = to_minor_units("price", product.price)?;

        let original_price = product
            .original_price
            .map(|amount| to_minor_units("originalPrice", amount))
            .transpose()?;

        let images = if product.images.is_empty() {
            vec![product.image.clone()]
        } else {
            product.images
        };

        Ok(NewProduct {
            uuid: product
                .uuid
                .map_or_else(ProductUuid::new, ProductUuid::from_uuid),
            name: product.name,
            description: product.description,
            price,
            original_price,
            category: product.category,
            subcategory: product.subcategory,
            image: product.image,
            images,
            sizes: product.sizes,
            colors: product.colors,
            in_stock: product.in_stock,
            featured: product.featured,
            rating: product.rating,
            review_count: product.review_count,
        })
    }
}

fn parse_products(json: &str) -> Result<Vec<NewProduct>, String> {
    let products: Vec<ProductImport> =
        serde_json::from_str(json).map_err(|error| format!("invalid product file: {error}"))?;

    products
        .into_iter()
        .enumerate()
        .map(|(index, product)| {
            NewProduct::try_from(product).map_err(|error| format!("product {index}: {error}"))
        })
        .collect()
}

pub(crate) async fn run(args: ImportProductsArgs) -> Result<(), String> {
    let json = std::fs::read_to_string(&args.file)
        .map_err(|error| format!("failed to read {}: {error}", args.file.display()))?;

    let products = parse_products(&json)?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgProductsService::new(Db::new(pool));

    let mut imported = 0_usize;
    let mut skipped = 0_usize;

    for product in products {
        let name = product.name.clone();

        match service.create_product(product).await {
            Ok(record) => {
                imported += 1;
                println!("imported {} {}", record.uuid, record.name);
            }
            Err(ProductsServiceError::AlreadyExists) => {
                skipped += 1;
                println!("skipped {name}: already exists");
            }
            Err(error) => return Err(format!("failed to import {name}: {error}")),
        }
    }

    println!("imported: {imported}, skipped: {skipped}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_catalog_entry_into_minor_units() -> TestResult {
        let products = parse_products(
            r#"[{
                "name": "Elegant Summer Maxi Dress",
                "price": 89.99,
                "originalPrice": 129.99,
                "category": "Dresses",
                "subcategory": "Maxi",
                "image": "/images/maxi.jpg",
                "description": "A flowing maxi dress.",
                "sizes": ["XS", "S", "M"],
                "colors": ["Navy", "Coral"],
                "inStock": true,
                "featured": true,
                "rating": 4.8,
                "reviewCount": 124
            }]"#,
        )?;

        let product = products.first().ok_or("expected one product")?;

        assert_eq!(product.price, 89_99);
        assert_eq!(product.original_price, Some(129_99));
        assert_eq!(product.images, ["/images/maxi.jpg"]);
        assert_eq!(product.review_count, 124);
        assert!(product.featured);

        Ok(())
    }

    #[test]
    fn negative_price_is_rejected_with_position() {
        let result = parse_products(
            r#"[{"name": "Broken", "price": -1.0, "category": "Tops", "image": "/x.jpg"}]"#,
        );

        assert!(
            result.as_ref().is_err_and(|error| error.starts_with("product 0")),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(parse_products("{not json").is_err());
    }
}

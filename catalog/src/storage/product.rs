use crate::error::CatalogResult;
use crate::model::{Category, Product, ProductId};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Data access for the products table.
#[async_trait]
pub trait ProductStorage: Send + Sync {
    /// Creates the products table if it does not exist yet.
    async fn init_db(&self) -> CatalogResult<()>;

    /// Inserts `product` as a new row and stores the generated id on it.
    /// Any id already present on the instance is ignored.
    async fn create(&self, product: &mut Product) -> CatalogResult<ProductId>;

    /// Writes every mutable field of the row identified by `product.id`.
    async fn update(&self, product: &Product) -> CatalogResult<()>;

    async fn delete(&self, product: &Product) -> CatalogResult<()>;

    async fn find(&self, id: ProductId) -> CatalogResult<Option<Product>>;

    /// All products, ordered by id.
    async fn all(&self) -> CatalogResult<Vec<Product>>;

    async fn find_by_name(&self, name: &str) -> CatalogResult<Vec<Product>>;

    async fn find_by_price(&self, price: Decimal) -> CatalogResult<Vec<Product>>;

    async fn find_by_availability(&self, available: bool) -> CatalogResult<Vec<Product>>;

    async fn find_by_category(&self, category: Category) -> CatalogResult<Vec<Product>>;

    /// Removes every product, returning how many rows were deleted.
    async fn delete_all(&self) -> CatalogResult<u64>;
}

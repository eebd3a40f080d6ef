use crate::error::{CatalogError, CatalogResult};
use crate::model::sea_orm_storage_model::product;
use crate::model::{Category, Product, ProductId, normalize_price};
use crate::storage::product::ProductStorage;
use async_trait::async_trait;
use metrics::histogram;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    EntityTrait, NotSet, QueryFilter, QueryOrder, Schema, Set,
};
use std::time::Instant;
use tracing::{debug, info, warn};

fn record_timing(op: &'static str, started: Instant) {
    let h = histogram!("catalog_storage_seconds", "op" => op);
    h.record(started.elapsed().as_secs_f64());
}

fn into_products(rows: Vec<product::Model>) -> CatalogResult<Vec<Product>> {
    rows.into_iter().map(Product::try_from).collect()
}

/// Every mutable column of `product`, leaving the primary key untouched.
fn active_model(product: &Product) -> product::ActiveModel {
    product::ActiveModel {
        id: NotSet,
        name: Set(product.name.clone()),
        description: Set(product.description.clone()),
        price: Set(normalize_price(product.price)),
        available: Set(product.available),
        category: Set(product.category.to_string()),
    }
}

#[derive(Clone)]
pub struct ProdProductStorage {
    pub db: DatabaseConnection,
}

impl ProdProductStorage {
    pub async fn new(database_url: &str) -> CatalogResult<Self> {
        let db = Database::connect(database_url).await?;
        Ok(Self { db })
    }

    pub async fn with_options(options: ConnectOptions) -> CatalogResult<Self> {
        let db = Database::connect(options).await?;
        Ok(Self { db })
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_where<F>(&self, op: &'static str, filter: F) -> CatalogResult<Vec<Product>>
    where
        F: sea_orm::sea_query::IntoCondition + Send,
    {
        let t0 = Instant::now();
        let rows = product::Entity::find().filter(filter).all(&self.db).await?;
        record_timing(op, t0);
        debug!("{} returned {} products", op, rows.len());
        into_products(rows)
    }
}

#[async_trait]
impl ProductStorage for ProdProductStorage {
    async fn init_db(&self) -> CatalogResult<()> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);
        let mut table = schema.create_table_from_entity(product::Entity);
        table.if_not_exists();
        self.db.execute(backend.build(&table)).await?;
        info!("Products table ready ({:?})", backend);
        Ok(())
    }

    async fn create(&self, product: &mut Product) -> CatalogResult<ProductId> {
        product.validate()?;
        let t0 = Instant::now();
        let row = active_model(product).insert(&self.db).await?;
        record_timing("create", t0);

        product.id = Some(row.id);
        product.price = normalize_price(product.price);
        info!("Created {}", product);
        Ok(row.id)
    }

    async fn update(&self, product: &Product) -> CatalogResult<()> {
        let id = product
            .id
            .ok_or_else(|| CatalogError::Validation("update called with empty id".to_string()))?;
        product.validate()?;

        let t0 = Instant::now();
        let result = product::Entity::update_many()
            .set(active_model(product))
            .filter(product::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        record_timing("update", t0);

        if result.rows_affected == 0 {
            warn!("Update of missing product {}", id);
            return Err(CatalogError::NotFound(id));
        }
        info!("Updated {}", product);
        Ok(())
    }

    async fn delete(&self, product: &Product) -> CatalogResult<()> {
        let id = product
            .id
            .ok_or_else(|| CatalogError::Validation("delete called with empty id".to_string()))?;

        let t0 = Instant::now();
        let result = product::Entity::delete_by_id(id).exec(&self.db).await?;
        record_timing("delete", t0);

        if result.rows_affected == 0 {
            warn!("Delete of missing product {}", id);
            return Err(CatalogError::NotFound(id));
        }
        info!("Deleted {}", product);
        Ok(())
    }

    async fn find(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        let t0 = Instant::now();
        let row = product::Entity::find_by_id(id).one(&self.db).await?;
        record_timing("find", t0);
        debug!("Looked up product {}: found={}", id, row.is_some());
        row.map(Product::try_from).transpose()
    }

    async fn all(&self) -> CatalogResult<Vec<Product>> {
        let t0 = Instant::now();
        let rows = product::Entity::find()
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?;
        record_timing("all", t0);
        into_products(rows)
    }

    async fn find_by_name(&self, name: &str) -> CatalogResult<Vec<Product>> {
        self.find_where("find_by_name", product::Column::Name.eq(name))
            .await
    }

    async fn find_by_price(&self, price: Decimal) -> CatalogResult<Vec<Product>> {
        self.find_where(
            "find_by_price",
            product::Column::Price.eq(normalize_price(price)),
        )
        .await
    }

    async fn find_by_availability(&self, available: bool) -> CatalogResult<Vec<Product>> {
        self.find_where(
            "find_by_availability",
            product::Column::Available.eq(available),
        )
        .await
    }

    async fn find_by_category(&self, category: Category) -> CatalogResult<Vec<Product>> {
        self.find_where(
            "find_by_category",
            product::Column::Category.eq(category.to_string()),
        )
        .await
    }

    async fn delete_all(&self) -> CatalogResult<u64> {
        let t0 = Instant::now();
        let result = product::Entity::delete_many().exec(&self.db).await?;
        record_timing("delete_all", t0);
        debug!("Removed {} products", result.rows_affected);
        Ok(result.rows_affected)
    }
}

use clap::{ArgAction, Args as ClapArgs, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Value, json};
use std::fs;

use crate::error::{CatalogError, CatalogResult};
use crate::model::{Category, Product, ProductId, normalize_price};
use crate::storage::ProductStorage;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create the products table if it is missing
    InitDb,
    /// Add a product
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long, action = ArgAction::Set, default_value_t = true)]
        available: bool,
        #[arg(long, default_value_t = Category::Unknown)]
        category: Category,
    },
    /// Show one product
    Get { id: ProductId },
    /// List products, optionally filtered
    List(ProductFilter),
    /// Change fields of an existing product
    Update {
        id: ProductId,
        #[command(flatten)]
        changes: ProductChanges,
    },
    /// Remove a product
    Delete { id: ProductId },
    /// Create every product in a JSON array file
    Import { path: String },
}

/// Exact-match filters for `list`. The storage finder for the first given
/// field does the lookup; the others narrow its result.
#[derive(ClapArgs, Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub category: Option<Category>,
    #[arg(long)]
    pub available: Option<bool>,
    #[arg(long)]
    pub price: Option<Decimal>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.available.is_none() && self.price.is_none()
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.name.as_ref().is_none_or(|name| &product.name == name)
            && self.category.is_none_or(|category| product.category == category)
            && self.available.is_none_or(|available| product.available == available)
            && self
                .price
                .is_none_or(|price| normalize_price(product.price) == normalize_price(price))
    }

    async fn lookup(&self, storage: &dyn ProductStorage) -> CatalogResult<Vec<Product>> {
        let mut products = if let Some(name) = &self.name {
            storage.find_by_name(name).await?
        } else if let Some(category) = self.category {
            storage.find_by_category(category).await?
        } else if let Some(available) = self.available {
            storage.find_by_availability(available).await?
        } else if let Some(price) = self.price {
            storage.find_by_price(price).await?
        } else {
            storage.all().await?
        };
        products.retain(|product| self.matches(product));
        Ok(products)
    }
}

#[derive(ClapArgs, Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub price: Option<Decimal>,
    #[arg(long)]
    pub available: Option<bool>,
    #[arg(long)]
    pub category: Option<Category>,
}

impl ProductChanges {
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = normalize_price(price);
        }
        if let Some(available) = self.available {
            product.available = available;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
    }
}

fn render<T: Serialize + ?Sized>(value: &T) -> CatalogResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

async fn load(storage: &dyn ProductStorage, id: ProductId) -> CatalogResult<Product> {
    storage.find(id).await?.ok_or(CatalogError::NotFound(id))
}

/// Parses an import file: a JSON array of product objects. Every entry is
/// validated before anything is written.
pub fn parse_import(contents: &str) -> CatalogResult<Vec<Product>> {
    let data: Value = serde_json::from_str(contents)
        .map_err(|e| CatalogError::Validation(format!("import file is not valid JSON: {}", e)))?;
    let entries = data
        .as_array()
        .ok_or_else(|| CatalogError::Validation("import file must contain a JSON array".to_string()))?;
    entries
        .iter()
        .map(|entry| {
            let product = Product::from_json(entry)?;
            product.validate()?;
            Ok(product)
        })
        .collect()
}

pub async fn run_command(storage: &dyn ProductStorage, command: Command) -> CatalogResult<String> {
    tracing::debug!("Running command {:?}", command);
    match command {
        Command::InitDb => {
            storage.init_db().await?;
            render(&json!({ "status": "ok" }))
        }
        Command::Create {
            name,
            description,
            price,
            available,
            category,
        } => {
            let mut product = Product::new(name, description, normalize_price(price), available, category);
            storage.create(&mut product).await?;
            render(&product)
        }
        Command::Get { id } => {
            let product = load(storage, id).await?;
            render(&product)
        }
        Command::List(filter) => {
            let products = filter.lookup(storage).await?;
            render(&products)
        }
        Command::Update { id, changes } => {
            let mut product = load(storage, id).await?;
            changes.apply(&mut product);
            storage.update(&product).await?;
            render(&product)
        }
        Command::Delete { id } => {
            let product = load(storage, id).await?;
            storage.delete(&product).await?;
            render(&json!({ "deleted": id }))
        }
        Command::Import { path } => {
            let contents = fs::read_to_string(&path)
                .map_err(|e| CatalogError::Validation(format!("cannot read {}: {}", path, e)))?;
            let mut products = parse_import(&contents)?;
            let mut created = Vec::with_capacity(products.len());
            for product in products.iter_mut() {
                created.push(storage.create(product).await?);
            }
            tracing::info!("Imported {} products from {}", created.len(), path);
            render(&json!({ "created": created }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hat() -> Product {
        Product::new("Hat", "Straw", Decimal::new(1000, 2), true, Category::Cloths)
    }

    #[test]
    fn test_filter_matches() {
        let filter = ProductFilter {
            name: Some("Hat".to_string()),
            available: Some(true),
            ..Default::default()
        };
        assert!(filter.matches(&hat()));

        let filter = ProductFilter {
            category: Some(Category::Food),
            ..Default::default()
        };
        assert!(!filter.matches(&hat()));

        let filter = ProductFilter {
            price: Some(Decimal::new(10, 0)),
            ..Default::default()
        };
        assert!(filter.matches(&hat()));
        assert!(ProductFilter::default().is_empty());
        assert!(ProductFilter::default().matches(&hat()));
    }

    #[test]
    fn test_changes_apply() {
        let mut product = hat();
        ProductChanges {
            description: Some("Panama".to_string()),
            available: Some(false),
            ..Default::default()
        }
        .apply(&mut product);
        assert_eq!(product.name, "Hat");
        assert_eq!(product.description, "Panama");
        assert!(!product.available);
    }

    #[test]
    fn test_parse_import() {
        let products = parse_import(
            r#"[{"name": "Pots", "price": "25.00", "category": "HOUSEWARES"},
                {"name": "Chevy", "price": 3000, "available": false, "category": "automotive"}]"#,
        )
        .unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].category, Category::Housewares);
        assert_eq!(products[1].category, Category::Automotive);
        assert!(!products[1].available);

        assert!(parse_import(r#"{"name": "Pots"}"#).is_err());
        assert!(parse_import(r#"[{"name": "Pots"}]"#).is_err());
        assert!(parse_import(r#"[{"name": "Pots", "price": 1}, {"name": "", "price": 2}]"#).is_err());
        assert!(parse_import("not json").is_err());
    }
}

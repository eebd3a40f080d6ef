use sea_orm::entity::prelude::*;
use std::str::FromStr;

use crate::error::CatalogError;
use crate::model::{Category, Product, normalize_price};

// Products
pub mod product {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "products")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(column_type = "String(StringLen::N(100))")]
        pub name: String,
        #[sea_orm(column_type = "String(StringLen::N(250))")]
        pub description: String,
        #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
        pub price: Decimal,
        pub available: bool,
        #[sea_orm(column_type = "String(StringLen::N(32))")]
        pub category: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl TryFrom<product::Model> for Product {
    type Error = CatalogError;

    fn try_from(row: product::Model) -> Result<Self, Self::Error> {
        let category = Category::from_str(&row.category).map_err(|_| {
            CatalogError::Validation(format!(
                "product {} has unknown category '{}'",
                row.id, row.category
            ))
        })?;
        Ok(Product {
            id: Some(row.id),
            name: row.name,
            description: row.description,
            price: normalize_price(row.price),
            available: row.available,
            category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: &str) -> product::Model {
        product::Model {
            id: 4,
            name: "Wrench".to_string(),
            description: "Adjustable".to_string(),
            price: Decimal::new(75, 1),
            available: false,
            category: category.to_string(),
        }
    }

    #[test]
    fn test_row_to_product() {
        let product = Product::try_from(row("TOOLS")).unwrap();
        assert_eq!(product.id, Some(4));
        assert_eq!(product.name, "Wrench");
        assert_eq!(product.price.to_string(), "7.50");
        assert!(!product.available);
        assert_eq!(product.category, Category::Tools);
    }

    #[test]
    fn test_row_with_unknown_category() {
        assert!(matches!(
            Product::try_from(row("JEWELRY")),
            Err(CatalogError::Validation(_))
        ));
    }
}

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display as EnumDisplay, EnumIter, EnumString};

use crate::error::{CatalogError, CatalogResult};

pub mod sea_orm_storage_model;

pub type ProductId = i32;

/// Prices are numeric(10, 2) in the table.
pub const PRICE_SCALE: u32 = 2;

pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 250;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumDisplay,
    EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Category {
    #[default]
    Unknown,
    Cloths,
    Food,
    Housewares,
    Automotive,
    Tools,
}

/// Rounds a price to the stored scale, so values compare equal no matter
/// which decimal representation the database returned.
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut price = price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    price.rescale(PRICE_SCALE);
    price
}

fn serialize_price<S: Serializer>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&normalize_price(*price))
}

fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    <Decimal as Deserialize>::deserialize(deserializer).map(normalize_price)
}

/// Serializes with the price as a two-place decimal string, e.g. `"12.50"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    #[serde(serialize_with = "serialize_price", deserialize_with = "deserialize_price")]
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            available,
            category,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Checks the constraints the products table enforces.
    pub fn validate(&self) -> CatalogResult<()> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::Validation("name must not be empty".to_string()));
        }
        if self.name.chars().count() > NAME_MAX_LEN {
            return Err(CatalogError::Validation(format!(
                "name is longer than {} characters",
                NAME_MAX_LEN
            )));
        }
        if self.description.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(CatalogError::Validation(format!(
                "description is longer than {} characters",
                DESCRIPTION_MAX_LEN
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> CatalogResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Builds an unsaved product from a JSON object, rejecting fields of the
    /// wrong type. `id` is ignored; `available` and `category` default to
    /// `true` and `UNKNOWN`.
    pub fn from_json(data: &Value) -> CatalogResult<Self> {
        let object = data.as_object().ok_or_else(|| {
            CatalogError::Validation("Invalid product: expected a JSON object".to_string())
        })?;

        let name = match object.get("name") {
            Some(Value::String(name)) => name.clone(),
            Some(_) => return Err(invalid_type("string", "name")),
            None => return Err(missing("name")),
        };

        let description = match object.get("description") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(description)) => description.clone(),
            Some(_) => return Err(invalid_type("string", "description")),
        };

        let price = match object.get("price") {
            Some(Value::String(price)) => Decimal::from_str(price.trim())
                .map_err(|e| CatalogError::Validation(format!("Invalid product: bad price '{}': {}", price, e)))?,
            Some(Value::Number(price)) => Decimal::from_str(&price.to_string())
                .map_err(|e| CatalogError::Validation(format!("Invalid product: bad price {}: {}", price, e)))?,
            Some(_) => return Err(invalid_type("decimal", "price")),
            None => return Err(missing("price")),
        };

        let available = match object.get("available") {
            None | Some(Value::Null) => true,
            Some(Value::Bool(available)) => *available,
            Some(_) => return Err(invalid_type("boolean", "available")),
        };

        let category = match object.get("category") {
            None | Some(Value::Null) => Category::Unknown,
            Some(Value::String(category)) => Category::from_str(category).map_err(|_| {
                CatalogError::Validation(format!("Invalid product: unknown category '{}'", category))
            })?,
            Some(_) => return Err(invalid_type("string", "category")),
        };

        Ok(Self::new(name, description, normalize_price(price), available, category))
    }
}

fn invalid_type(expected: &str, field: &str) -> CatalogError {
    CatalogError::Validation(format!("Invalid type for {} [{}]", expected, field))
}

fn missing(field: &str) -> CatalogError {
    CatalogError::Validation(format!("Invalid product: missing {}", field))
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{}]>", self.name, id),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    fn fedora() -> Product {
        Product::new("Fedora", "A red hat", Decimal::new(1250, 2), true, Category::Cloths)
    }

    #[test]
    fn test_new_product_is_unsaved() {
        let product = fedora();
        assert_eq!(product.to_string(), "<Product Fedora id=[None]>");
        assert_eq!(product.id, None);
        assert!(!product.is_persisted());
        assert_eq!(product.name, "Fedora");
        assert_eq!(product.description, "A red hat");
        assert!(product.available);
        assert_eq!(product.price, Decimal::new(125, 1));
        assert_eq!(product.category, Category::Cloths);
    }

    #[test]
    fn test_display_with_id() {
        let mut product = fedora();
        product.id = Some(7);
        assert_eq!(product.to_string(), "<Product Fedora id=[7]>");
    }

    #[test]
    fn test_category_names() {
        assert_eq!(Category::Cloths.to_string(), "CLOTHS");
        assert_eq!(Category::from_str("housewares").unwrap(), Category::Housewares);
        assert_eq!(Category::from_str("TOOLS").unwrap(), Category::Tools);
        assert!(Category::from_str("JEWELRY").is_err());
        for category in Category::iter() {
            assert_eq!(Category::from_str(&category.to_string()).unwrap(), category);
        }
    }

    #[test]
    fn test_to_json() {
        let mut product = fedora();
        product.id = Some(3);
        let data = product.to_json().unwrap();
        assert_eq!(data["id"], json!(3));
        assert_eq!(data["name"], json!("Fedora"));
        assert_eq!(data["price"], json!("12.50"));
        assert_eq!(data["available"], json!(true));
        assert_eq!(data["category"], json!("CLOTHS"));
    }

    #[test]
    fn test_serde_uses_stored_price_scale() {
        let rendered = serde_json::to_value(fedora()).unwrap();
        assert_eq!(rendered["price"], json!("12.50"));
        assert_eq!(rendered["id"], json!(null));

        let parsed: Product = serde_json::from_value(rendered).unwrap();
        assert_eq!(parsed.price.to_string(), "12.50");
        assert_eq!(parsed, fedora());
    }

    #[test]
    fn test_from_json() {
        let product = Product::from_json(&json!({
            "id": 99,
            "name": "Hammer",
            "description": "Claw hammer",
            "price": "19.99",
            "available": false,
            "category": "TOOLS",
        }))
        .unwrap();
        assert_eq!(product.id, None);
        assert_eq!(product.name, "Hammer");
        assert_eq!(product.price, Decimal::new(1999, 2));
        assert!(!product.available);
        assert_eq!(product.category, Category::Tools);
    }

    #[test]
    fn test_from_json_defaults_and_numeric_price() {
        let product = Product::from_json(&json!({ "name": "Apple", "price": 0.5 })).unwrap();
        assert_eq!(product.description, "");
        assert_eq!(product.price, Decimal::new(50, 2));
        assert!(product.available);
        assert_eq!(product.category, Category::Unknown);
    }

    #[test]
    fn test_from_json_rejects_bad_data() {
        let cases = [
            json!("not an object"),
            json!({ "price": "1.00" }),
            json!({ "name": 5, "price": "1.00" }),
            json!({ "name": "Pots" }),
            json!({ "name": "Pots", "price": "cheap" }),
            json!({ "name": "Pots", "price": "1.00", "available": "yes" }),
            json!({ "name": "Pots", "price": "1.00", "category": "JEWELRY" }),
            json!({ "name": "Pots", "price": "1.00", "category": 3 }),
        ];
        for case in cases {
            let result = Product::from_json(&case);
            assert!(
                matches!(result, Err(CatalogError::Validation(_))),
                "expected validation error for {}",
                case
            );
        }
    }

    #[test]
    fn test_validate() {
        assert!(fedora().validate().is_ok());

        let mut unnamed = fedora();
        unnamed.name = "  ".to_string();
        assert!(matches!(unnamed.validate(), Err(CatalogError::Validation(_))));

        let mut wordy = fedora();
        wordy.description = "x".repeat(DESCRIPTION_MAX_LEN + 1);
        assert!(matches!(wordy.validate(), Err(CatalogError::Validation(_))));

        let mut long_named = fedora();
        long_named.name = "x".repeat(NAME_MAX_LEN);
        assert!(long_named.validate().is_ok());
        long_named.name = "x".repeat(NAME_MAX_LEN + 1);
        assert!(matches!(long_named.validate(), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_normalize_price() {
        assert_eq!(normalize_price(Decimal::new(125, 1)).to_string(), "12.50");
        assert_eq!(normalize_price(Decimal::new(12345, 3)).to_string(), "12.35");
    }
}

/// Test data factories for the catalog integration tests.
///
/// Products get a random name from a small pool (so name lookups find
/// duplicates), a random category, price and availability.
use catalog::model::{Category, Product};
use common::test_helpers::generate_unique_id;
use rand::Rng;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use strum::IntoEnumIterator;

const NAMES: [&str; 11] = [
    "Hat", "Pants", "Shirt", "Apple", "Banana", "Pots", "Towels", "Ford", "Chevy", "Hammer",
    "Wrench",
];

pub struct ProductFactory;

impl ProductFactory {
    pub fn build() -> Product {
        let mut rng = rand::thread_rng();
        let name = NAMES.choose(&mut rng).copied().unwrap_or("Hat");
        let categories: Vec<Category> = Category::iter().collect();
        let category = categories
            .choose(&mut rng)
            .copied()
            .unwrap_or_default();
        let price = Decimal::new(rng.gen_range(50..=200_000), 2);
        let available = rng.gen_bool(0.5);
        Product::new(name, generate_unique_id(name), price, available, category)
    }

    pub fn build_batch(count: usize) -> Vec<Product> {
        (0..count).map(|_| Self::build()).collect()
    }
}

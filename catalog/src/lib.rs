pub mod commands;
pub mod error;
pub mod executable_utils;
pub mod model;
pub mod storage;

pub use error::{CatalogError, CatalogResult};
pub use model::{Category, Product, ProductId};
pub use storage::{ProdProductStorage, ProductStorage};

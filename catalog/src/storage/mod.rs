// Re-export all storage-related modules
pub mod product;
pub mod prod_product;

// Re-export storage traits and implementations
pub use product::*;
pub use prod_product::*;

//! Cache types for store API responses.

use super::types::{Product, ProductList, Region};

/// Cache key for catalog data.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(String),
    Products { limit: u64, offset: u64 },
    Regions,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(ProductList),
    Regions(Vec<Region>),
}

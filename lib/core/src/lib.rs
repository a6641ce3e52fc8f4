//! # Lookalike Core
//!
//! Core library for the Lookalike product catalog.
//!
//! This crate provides the catalog data structures:
//!
//! - [`Product`] - A catalog record with name, category, image URL, price and tags
//! - [`Catalog`] - Insertion-ordered in-memory product store
//! - [`CatalogQuery`] - Filter/skip/limit queries over a catalog
//! - [`FilterCondition`] - Composable product filters
//!
//! ## Example
//!
//! ```rust
//! use lookalike_core::{Catalog, CatalogConfig, CatalogQuery, FilterCondition, NewProduct};
//!
//! let catalog = Catalog::new(CatalogConfig::default());
//! catalog.insert(
//!     NewProduct::new("Red Apples", "fruits", "/red-apples-fresh.jpg")
//!         .with_price(5.0)
//!         .with_tags(["apple", "red"]),
//! ).unwrap();
//!
//! let fruits = catalog.find(
//!     &CatalogQuery::new()
//!         .with_filter(FilterCondition::category("fruits"))
//!         .limit(10),
//! );
//! assert_eq!(fruits.len(), 1);
//! ```

pub mod catalog;
pub mod error;
pub mod filter;
pub mod product;

pub use catalog::{Catalog, CatalogConfig, CatalogQuery};
pub use error::{Error, Result};
pub use filter::{Filter, FilterCondition, ProductFilter};
pub use product::{NewProduct, Product, ProductId};

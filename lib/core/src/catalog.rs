use crate::{Error, Filter, FilterCondition, NewProduct, Product, ProductFilter, Result};
use ahash::AHashMap;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use tracing::debug;

/// Configuration for a catalog
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub name: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            name: "products".to_string(),
        }
    }
}

/// A filter/skip/limit query over a catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub filter: Option<FilterCondition>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Option<FilterCondition>) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Default)]
struct CatalogInner {
    /// Products in insertion order
    products: Vec<Product>,
    /// id -> position in `products`
    index: AHashMap<String, usize>,
}

impl CatalogInner {
    fn reindex(&mut self) {
        self.index = self
            .products
            .iter()
            .enumerate()
            .map(|(pos, p)| (p.id.to_string(), pos))
            .collect();
    }

    fn push(&mut self, product: Product) {
        let id = product.id.to_string();
        self.index.insert(id, self.products.len());
        self.products.push(product);
    }
}

/// An insertion-ordered, in-memory product store
pub struct Catalog {
    config: CatalogConfig,
    inner: RwLock<CatalogInner>,
}

impl Catalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(CatalogInner::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn count(&self) -> usize {
        self.inner.read().products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Insert a new product, assigning id and timestamps
    pub fn insert(&self, new_product: NewProduct) -> Result<Product> {
        let product = new_product.into_product(Utc::now());
        product.validate()?;
        self.inner.write().push(product.clone());
        Ok(product)
    }

    /// Insert several products; nothing is inserted if any of them is invalid
    pub fn insert_many(&self, new_products: Vec<NewProduct>) -> Result<Vec<Product>> {
        let now = Utc::now();
        let products: Vec<Product> = new_products
            .into_iter()
            .map(|p| p.into_product(now))
            .collect();

        for product in &products {
            product.validate()?;
        }

        let mut inner = self.inner.write();
        inner.products.reserve(products.len());
        for product in &products {
            inner.push(product.clone());
        }
        debug!(catalog = %self.config.name, inserted = products.len(), "inserted products");
        Ok(products)
    }

    /// Insert or replace a product keeping its position
    pub fn upsert(&self, product: Product) -> Result<()> {
        product.validate()?;

        let id = product.id.to_string();
        let mut inner = self.inner.write();
        match inner.index.get(&id).copied() {
            Some(pos) => inner.products[pos] = product,
            None => inner.push(product),
        }
        Ok(())
    }

    /// Get a product by ID
    pub fn get(&self, id: &str) -> Option<Product> {
        let inner = self.inner.read();
        inner.index.get(id).map(|&pos| inner.products[pos].clone())
    }

    /// Get a product by ID or fail with [`Error::ProductNotFound`]
    pub fn require(&self, id: &str) -> Result<Product> {
        self.get(id).ok_or_else(|| Error::ProductNotFound(id.to_string()))
    }

    /// Delete a product by ID
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut inner = self.inner.write();
        match inner.index.get(id).copied() {
            Some(pos) => {
                inner.products.remove(pos);
                inner.reindex();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every product, returning how many were removed
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.write();
        let removed = inner.products.len();
        inner.products.clear();
        inner.index.clear();
        removed
    }

    /// Run a filter/skip/limit query in insertion order
    pub fn find(&self, query: &CatalogQuery) -> Vec<Product> {
        let filter = query.filter.clone().map(ProductFilter::new);
        let limit = query.limit.unwrap_or(usize::MAX);

        self.inner
            .read()
            .products
            .iter()
            .filter(|p| filter.as_ref().map(|f| f.matches(p)).unwrap_or(true))
            .skip(query.skip)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Get all products
    pub fn iter(&self) -> Vec<Product> {
        self.inner.read().products.clone()
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<String> {
        let inner = self.inner.read();
        let set: BTreeSet<&str> = inner.products.iter().map(|p| p.category.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Distinct tags, sorted
    pub fn tags(&self) -> Vec<String> {
        let inner = self.inner.read();
        let set: BTreeSet<&str> = inner
            .products
            .iter()
            .flat_map(|p| p.tags.iter().map(String::as_str))
            .collect();
        set.into_iter().map(str::to_string).collect()
    }
}

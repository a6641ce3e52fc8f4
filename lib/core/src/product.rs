use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::{Error, Result};

/// Identifier of a catalog product
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Uuid(Uuid),
    String(String),
}

impl ProductId {
    /// Generate a fresh random identifier
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        ProductId::Uuid(Uuid::new_v4())
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductId::Uuid(u) => write!(f, "{}", u),
            ProductId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        match Uuid::parse_str(&s) {
            Ok(u) => ProductId::Uuid(u),
            Err(_) => ProductId::String(s),
        }
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        ProductId::from(s.to_string())
    }
}

impl From<Uuid> for ProductId {
    fn from(u: Uuid) -> Self {
        ProductId::Uuid(u)
    }
}

/// A product record as stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: ProductId,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Image URL; the only input used to derive visual features
    pub image_url: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for a product, before it gets an id and timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewProduct {
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            description: String::new(),
            image_url: image_url.into(),
            price: 0.0,
            tags: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Assign a fresh id and stamp both timestamps with `now`
    #[must_use]
    pub fn into_product(self, now: DateTime<Utc>) -> Product {
        Product {
            id: ProductId::generate(),
            name: self.name,
            category: self.category,
            description: self.description,
            image_url: self.image_url,
            price: self.price,
            tags: self.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Loosely typed view of a raw catalog document
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDocument {
    #[serde(alias = "_id")]
    id: Option<ProductId>,
    name: Option<String>,
    category: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    price: Option<f64>,
    tags: Option<Vec<String>>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

fn required(field: &str, value: Option<String>, id: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(Error::invalid_candidate(id, format!("field '{}' is blank", field))),
        None => Err(Error::invalid_candidate(id, format!("missing field '{}'", field))),
    }
}

impl Product {
    /// Build a product from a raw JSON document.
    ///
    /// Missing or blank `name`, `category` or `imageUrl` is rejected with
    /// [`Error::InvalidCandidate`]; everything else falls back to defaults.
    pub fn from_document(doc: &serde_json::Value) -> Result<Self> {
        if !doc.is_object() {
            return Err(Error::invalid_candidate("<unknown>", "document is not an object"));
        }

        let raw: ProductDocument = serde_json::from_value(doc.clone())
            .map_err(|e| Error::invalid_candidate("<unknown>", e.to_string()))?;

        let id = raw.id.unwrap_or_else(ProductId::generate);
        let id_str = id.to_string();
        let name = required("name", raw.name, &id_str)?;
        let category = required("category", raw.category, &id_str)?;
        let image_url = required("imageUrl", raw.image_url, &id_str)?;

        let now = Utc::now();
        let created_at = raw.created_at.unwrap_or(now);

        Ok(Self {
            id,
            name,
            category,
            description: raw.description.unwrap_or_default(),
            image_url,
            price: raw.price.unwrap_or(0.0),
            tags: raw.tags.unwrap_or_default(),
            created_at,
            updated_at: raw.updated_at.unwrap_or(created_at),
        })
    }

    /// Check the fields the similarity engine depends on
    pub fn validate(&self) -> Result<()> {
        let id = self.id.to_string();
        if self.category.trim().is_empty() {
            return Err(Error::invalid_candidate(id, "field 'category' is blank"));
        }
        if self.image_url.trim().is_empty() {
            return Err(Error::invalid_candidate(id, "field 'imageUrl' is blank"));
        }
        Ok(())
    }

    /// Case-sensitive tag membership
    #[inline]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

// Product filters used by catalog queries
use crate::Product;

pub trait Filter {
    fn matches(&self, product: &Product) -> bool;
}

/// Filter built from a single (possibly compound) condition
#[derive(Debug, Clone)]
pub struct ProductFilter {
    condition: FilterCondition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    /// Exact, case-sensitive category match
    Category(String),
    /// Inclusive price range
    PriceBetween { min: f64, max: f64 },
    /// Product carries at least one of the tags
    AnyTag(Vec<String>),
    /// Case-insensitive substring of the product name
    NameContains(String),
    And(Vec<FilterCondition>),
    Or(Vec<FilterCondition>),
    Not(Box<FilterCondition>),
}

impl FilterCondition {
    /// Category filter where `"all"` (exact, case-sensitive) or an empty
    /// string means no filter
    pub fn category(category: &str) -> Option<Self> {
        if category.is_empty() || category == "all" {
            None
        } else {
            Some(FilterCondition::Category(category.to_string()))
        }
    }
}

impl ProductFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    fn matches_condition(condition: &FilterCondition, product: &Product) -> bool {
        match condition {
            FilterCondition::Category(category) => product.category == *category,
            FilterCondition::PriceBetween { min, max } => {
                product.price >= *min && product.price <= *max
            }
            FilterCondition::AnyTag(tags) => {
                tags.is_empty() || tags.iter().any(|t| product.has_tag(t))
            }
            FilterCondition::NameContains(needle) => {
                product.name.to_lowercase().contains(&needle.to_lowercase())
            }
            FilterCondition::And(conditions) => {
                conditions.iter().all(|c| Self::matches_condition(c, product))
            }
            FilterCondition::Or(conditions) => {
                conditions.iter().any(|c| Self::matches_condition(c, product))
            }
            FilterCondition::Not(condition) => {
                !Self::matches_condition(condition, product)
            }
        }
    }
}

impl Filter for ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        Self::matches_condition(&self.condition, product)
    }
}

impl From<FilterCondition> for ProductFilter {
    fn from(condition: FilterCondition) -> Self {
        ProductFilter::new(condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewProduct;
    use chrono::Utc;

    fn product(name: &str, category: &str, price: f64, tags: &[&str]) -> Product {
        NewProduct::new(name, category, format!("/{}.jpg", name))
            .with_price(price)
            .with_tags(tags.iter().copied())
            .into_product(Utc::now())
    }

    #[test]
    fn test_category_filter() {
        let f = ProductFilter::new(FilterCondition::Category("fruits".to_string()));
        assert!(f.matches(&product("Bananas", "fruits", 3.0, &[])));
        assert!(!f.matches(&product("Bananas", "Fruits", 3.0, &[])));
    }

    #[test]
    fn test_category_all_is_no_filter() {
        assert_eq!(FilterCondition::category("all"), None);
        assert_eq!(FilterCondition::category(""), None);
        assert_eq!(
            FilterCondition::category("All"),
            Some(FilterCondition::Category("All".to_string()))
        );
        assert_eq!(
            FilterCondition::category("books"),
            Some(FilterCondition::Category("books".to_string()))
        );
    }

    #[test]
    fn test_price_between_inclusive() {
        let f = ProductFilter::new(FilterCondition::PriceBetween { min: 5.0, max: 10.0 });
        assert!(f.matches(&product("a", "x", 5.0, &[])));
        assert!(f.matches(&product("b", "x", 10.0, &[])));
        assert!(!f.matches(&product("c", "x", 10.5, &[])));
    }

    #[test]
    fn test_any_tag_and_compound() {
        let cond = FilterCondition::And(vec![
            FilterCondition::AnyTag(vec!["pet".to_string(), "red".to_string()]),
            FilterCondition::Not(Box::new(FilterCondition::NameContains("cat".to_string()))),
        ]);
        let f = ProductFilter::from(cond);

        assert!(f.matches(&product("Hamster", "animals", 30.0, &["pet"])));
        assert!(!f.matches(&product("Persian Cat", "animals", 800.0, &["pet"])));
        assert!(!f.matches(&product("Bananas", "fruits", 3.0, &["yellow"])));
    }

    #[test]
    fn test_or_filter() {
        let f = ProductFilter::new(FilterCondition::Or(vec![
            FilterCondition::Category("toys".to_string()),
            FilterCondition::Category("books".to_string()),
        ]));
        assert!(f.matches(&product("Lego", "toys", 50.0, &[])));
        assert!(!f.matches(&product("Sofa", "furniture", 500.0, &[])));
    }
}

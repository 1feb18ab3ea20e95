//! Catalog query builder.
//!
//! Turns up to four optional, loosely-typed search filters into one
//! AND-combined predicate over items. Building never fails: malformed numbers
//! and empty strings are treated as "no constraint".

use super::item::Item;

/// Conjunction of optional catalog filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    name: Option<String>,
    category: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
}

impl CatalogQuery {
    /// Query with no filters: the whole catalog.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a query from raw request parameters with tolerant parsing.
    pub fn from_raw(
        name: Option<&str>,
        category: Option<&str>,
        min_price: Option<&str>,
        max_price: Option<&str>,
    ) -> Self {
        Self {
            name: non_empty(name),
            category: non_empty(category),
            min_price: parse_price(min_price),
            max_price: parse_price(max_price),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = non_empty(Some(name));
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = non_empty(Some(category));
        self
    }

    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min.filter(|p| p.is_finite());
        self.max_price = max.filter(|p| p.is_finite());
        self
    }

    /// Case-insensitive name fragment
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Exact category; an unknown category matches nothing
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Inclusive lower price bound
    pub fn min_price(&self) -> Option<f64> {
        self.min_price
    }

    /// Inclusive upper price bound
    pub fn max_price(&self) -> Option<f64> {
        self.max_price
    }

    /// Evaluate the predicate against an item in memory.
    pub fn matches(&self, item: &Item) -> bool {
        let name_ok = self.name.as_deref().map_or(true, |fragment| {
            item.name
                .to_lowercase()
                .contains(&fragment.to_lowercase())
        });
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| item.category.as_str() == c);
        let min_ok = self.min_price.map_or(true, |min| item.price >= min);
        let max_ok = self.max_price.map_or(true, |max| item.price <= max);

        name_ok && category_ok && min_ok && max_ok
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_price(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|p| p.is_finite())
}

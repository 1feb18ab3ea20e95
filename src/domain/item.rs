//! Catalog item entity and its field rules.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Fixed set of catalog categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Chocolate,
    Candy,
    Gummy,
    Lollipop,
    HardCandy,
    Caramel,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Chocolate,
        Category::Candy,
        Category::Gummy,
        Category::Lollipop,
        Category::HardCandy,
        Category::Caramel,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Chocolate => "chocolate",
            Category::Candy => "candy",
            Category::Gummy => "gummy",
            Category::Lollipop => "lollipop",
            Category::HardCandy => "hard-candy",
            Category::Caramel => "caramel",
            Category::Other => "other",
        }
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Invalid category '{}'", s)))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog item. `quantity` is owned by the stock ledger and is never negative.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    #[schema(example = "Ladoo")]
    pub name: String,
    pub category: Category,
    #[schema(example = 15.0)]
    pub price: f64,
    #[schema(example = 5)]
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Account that created the item (provenance only)
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create an item
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub quantity: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl NewItem {
    /// Apply the item field rules, trimming the name.
    pub fn validated(mut self) -> AppResult<Self> {
        self.name = validate_name(&self.name)?;
        validate_price(self.price)?;
        validate_quantity(self.quantity)?;
        Ok(self)
    }
}

/// Partial update of an item's descriptive fields and absolute quantity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl ItemChanges {
    /// Apply the item field rules to the supplied fields only.
    pub fn validated(mut self) -> AppResult<Self> {
        if let Some(name) = self.name.as_deref() {
            self.name = Some(validate_name(name)?);
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
        }
        Ok(self)
    }
}

fn validate_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Item name is required"));
    }
    Ok(trimmed.to_string())
}

fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::validation("Price must be a non-negative number"));
    }
    Ok(())
}

fn validate_quantity(quantity: i32) -> AppResult<()> {
    if quantity < 0 {
        return Err(AppError::validation("Quantity must be a non-negative integer"));
    }
    Ok(())
}

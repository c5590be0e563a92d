use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// Broken stock rule. Surfaces to clients as a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StockError {
    #[error("Quantity must be positive")]
    NegativeQuantity,

    #[error("Insufficient stock")]
    Insufficient,

    #[error("Stock quantity out of range")]
    OutOfRange,
}

/// Write timestamps shared by every catalog entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuditFields {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuditFields {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touched(self, now: DateTime<Utc>) -> Self {
        Self {
            created_at: self.created_at,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: f64,
    pub stock_quantity: Option<i32>,
    pub category: Option<String>,
    pub available: bool,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl Product {
    pub fn is_out_of_stock(&self) -> bool {
        self.stock_quantity.is_none_or(|stock| stock <= 0)
    }

    pub fn is_available_for_sale(&self) -> bool {
        self.available && !self.is_out_of_stock()
    }

    pub fn increase_stock(&mut self, quantity: i32) -> Result<(), StockError> {
        if quantity < 0 {
            return Err(StockError::NegativeQuantity);
        }
        let current = self.stock_quantity.unwrap_or(0);
        let next = current
            .checked_add(quantity)
            .ok_or(StockError::OutOfRange)?;
        self.stock_quantity = Some(next);
        Ok(())
    }

    pub fn reduce_stock(&mut self, quantity: i32) -> Result<(), StockError> {
        if quantity < 0 {
            return Err(StockError::NegativeQuantity);
        }
        let current = self.stock_quantity.unwrap_or(0);
        if current < quantity {
            return Err(StockError::Insufficient);
        }
        self.stock_quantity = Some(current - quantity);
        Ok(())
    }

    /// Receives stock for `delta > 0`, withdraws it for `delta < 0`.
    pub fn apply_stock_delta(&mut self, delta: i32) -> Result<(), StockError> {
        if delta >= 0 {
            self.increase_stock(delta)
        } else {
            let quantity = delta.checked_neg().ok_or(StockError::OutOfRange)?;
            self.reduce_stock(quantity)
        }
    }
}

/// A product that has not been assigned an identity yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: f64,
    pub stock_quantity: Option<i32>,
    pub category: Option<String>,
    pub available: bool,
}

impl NewProduct {
    pub fn into_product(self, id: i64, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            sku: self.sku,
            price: self.price,
            stock_quantity: self.stock_quantity,
            category: self.category,
            available: self.available,
            audit: AuditFields::new(now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub audit: AuditFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

impl NewCategory {
    pub fn into_category(self, id: i64, now: DateTime<Utc>) -> Category {
        Category {
            id,
            name: self.name,
            code: self.code,
            description: self.description,
            audit: AuditFields::new(now),
        }
    }
}

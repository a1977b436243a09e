//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub description: Option<String>,
    /// Copies currently available to lend; mutated only by the lending engine
    pub stock: i32,
    pub published_year: Option<i32>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, max = 20, message = "ISBN is required"))]
    pub isbn: String,
    #[validate(custom(function = validate_price, message = "Price must be greater than 0"))]
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: i32,
    pub published_year: Option<i32>,
    #[validate(length(max = 50))]
    pub category: Option<String>,
}

/// Update book request; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub author: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub isbn: Option<String>,
    #[schema(value_type = f64)]
    pub price: Option<Decimal>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    pub published_year: Option<i32>,
    #[validate(length(max = 50))]
    pub category: Option<String>,
}

/// Search filters for listing books
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(ValidationError::new("price_not_positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn request() -> CreateBook {
        CreateBook {
            title: "The Trial".to_string(),
            author: "Franz Kafka".to_string(),
            isbn: "978-0-8052-0999-0".to_string(),
            price: Decimal::new(1250, 2),
            description: None,
            stock: 3,
            published_year: Some(1925),
            category: Some("Fiction".to_string()),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn negative_stock_is_rejected() {
        let mut req = request();
        req.stock = -1;
        assert!(req.validate().is_err());
    }

    #[test]
    fn zero_price_is_rejected() {
        let mut req = request();
        req.price = Decimal::ZERO;
        assert!(req.validate().is_err());
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut req = request();
        req.title = String::new();
        assert!(req.validate().is_err());
    }
}

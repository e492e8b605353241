//! Food Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::ReviewEntry;
use crate::rating::compute_average;

/// Food item on the menu
///
/// `rating` is derived from `reviews` and is `None` until the first review
/// arrives. Use [`FoodItem::with_review`] to append, which recomputes the
/// aggregate in the same step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Image URI
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Oldest first
    #[serde(default)]
    pub reviews: Vec<ReviewEntry>,
    pub created_at: DateTime<Utc>,
}

impl FoodItem {
    /// Build a new, unreviewed item from a create payload
    pub fn new(id: impl Into<String>, data: FoodCreate) -> Self {
        Self {
            id: id.into(),
            name: data.name.trim().to_string(),
            price: data.price,
            image: data.image,
            rating: None,
            reviews: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Append a review and recompute the aggregate from the full sequence
    pub fn with_review(mut self, review: ReviewEntry) -> Self {
        self.reviews.push(review);
        self.rating = compute_average(&self.reviews);
        self
    }

    /// Reviews in display order (newest first)
    pub fn reviews_newest_first(&self) -> impl Iterator<Item = &ReviewEntry> {
        self.reviews.iter().rev()
    }

    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }

    /// Whether the item carries a real aggregate (ratings are never 0)
    pub fn is_rated(&self) -> bool {
        matches!(self.rating, Some(r) if r > 0.0)
    }

    /// `"4.5"` for rated items, `"New"` otherwise
    pub fn rating_label(&self) -> String {
        match self.rating {
            Some(r) if r > 0.0 => format!("{:.1}", r),
            _ => "New".to_string(),
        }
    }
}

/// Create food payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FoodCreate {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "non_negative"))]
    pub price: Decimal,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub image: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn non_negative(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}

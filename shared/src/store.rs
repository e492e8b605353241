//! Menu store capability
//!
//! Backend-agnostic contract between the menu core and its persistence.
//! menu-server provides in-memory and SurrealDB implementations, menu-client
//! provides an HTTP one.

use async_trait::async_trait;
use thiserror::Error;

use crate::error::{AppError, ErrorCode};
use crate::models::{FoodCreate, FoodItem, ReviewEntry};
use crate::subscription::SubscriptionToken;

/// Errors at the store boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Food {0} not found")]
    NotFound(String),

    /// Transport or auth failure talking to the backend
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The conditional update kept losing against concurrent writers
    #[error("Concurrent update conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store call timed out")]
    Timeout,
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::food_not_found(id),
            StoreError::Unavailable(msg) => AppError::store_unavailable(msg),
            StoreError::Conflict(msg) => AppError::with_message(ErrorCode::ReviewConflict, msg),
            StoreError::Validation(msg) => AppError::validation(msg),
            StoreError::Timeout => AppError::new(ErrorCode::TimeoutError),
        }
    }
}

impl From<AppError> for StoreError {
    fn from(err: AppError) -> Self {
        match err.code {
            ErrorCode::FoodNotFound | ErrorCode::NotFound => {
                let id = err
                    .details
                    .as_ref()
                    .and_then(|d| d.get("food_id"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or(err.message);
                StoreError::NotFound(id)
            }
            ErrorCode::ReviewConflict => StoreError::Conflict(err.message),
            ErrorCode::TimeoutError => StoreError::Timeout,
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidRequest
            | ErrorCode::EmptyComment
            | ErrorCode::RatingOutOfRange => StoreError::Validation(err.message),
            _ => StoreError::Unavailable(err.message),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Change pushed to store subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum MenuChange {
    FoodAdded(FoodItem),
    /// `food` is the persisted state after the append
    ReviewAppended { food: FoodItem, review: ReviewEntry },
}

impl MenuChange {
    pub fn food(&self) -> &FoodItem {
        match self {
            Self::FoodAdded(food) => food,
            Self::ReviewAppended { food, .. } => food,
        }
    }
}

/// Menu store contract
///
/// Every call is an async suspension point; callers must not assume ordering
/// between two calls in flight at the same time.
#[async_trait]
pub trait MenuStore: Send + Sync {
    /// All items, newest created first
    async fn list_food_items(&self) -> StoreResult<Vec<FoodItem>>;

    async fn get_food_item(&self, id: &str) -> StoreResult<FoodItem>;

    /// Append a review and persist the recomputed aggregate as one atomic step
    ///
    /// The append is applied to the latest persisted state, never to a
    /// snapshot the caller captured earlier.
    async fn append_review(&self, food_id: &str, review: ReviewEntry) -> StoreResult<FoodItem>;

    async fn add_food_item(&self, data: FoodCreate) -> StoreResult<FoodItem>;

    /// Push notifications. `None` means the store cannot push and callers
    /// should re-fetch instead.
    fn subscribe(
        &self,
        handler: Box<dyn Fn(&MenuChange) + Send + Sync>,
    ) -> Option<SubscriptionToken> {
        let _ = handler;
        None
    }

    /// No further callbacks for `token` once this returns
    fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let _ = token;
        false
    }
}

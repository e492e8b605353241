//! Shared types for the menu service
//!
//! Data model, rating aggregation, sort contract, error codes and the
//! store/session capabilities used by both menu-server and menu-client.

pub mod client;
pub mod error;
pub mod models;
pub mod rating;
pub mod session;
pub mod sort;
pub mod store;
pub mod subscription;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{FoodCreate, FoodItem, ReviewEntry, User};
pub use session::{AuthError, AuthState, SessionProvider};
pub use sort::{SortType, sort_foods};
pub use store::{MenuChange, MenuStore, StoreError, StoreResult};
pub use subscription::{SubscriptionToken, Subscribers};

//! `MenuStore` over the menu-server REST API

use std::sync::Arc;

use async_trait::async_trait;
use shared::client::ReviewCreate;
use shared::models::{FoodCreate, FoodItem, ReviewEntry};
use shared::store::{MenuStore, StoreResult};

use crate::http::HttpClient;

/// Remote menu store. Has no push channel, so views re-fetch after writes.
#[derive(Debug, Clone)]
pub struct HttpMenuStore {
    http: Arc<HttpClient>,
}

impl HttpMenuStore {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl MenuStore for HttpMenuStore {
    async fn list_food_items(&self) -> StoreResult<Vec<FoodItem>> {
        Ok(self.http.get(&["api", "foods"]).await?)
    }

    async fn get_food_item(&self, id: &str) -> StoreResult<FoodItem> {
        Ok(self.http.get(&["api", "foods", id]).await?)
    }

    /// The server stamps its own id and timestamp; only rating and comment
    /// travel.
    async fn append_review(&self, food_id: &str, review: ReviewEntry) -> StoreResult<FoodItem> {
        let body = ReviewCreate {
            rating: review.rating,
            comment: review.comment,
        };
        Ok(self
            .http
            .post(&["api", "foods", food_id, "reviews"], &body)
            .await?)
    }

    async fn add_food_item(&self, data: FoodCreate) -> StoreResult<FoodItem> {
        Ok(self.http.post(&["api", "foods"], &data).await?)
    }
}

//! SurrealDB menu store
//!
//! One `food` record per item, keyed by the item id. Each record carries a
//! `version` counter; review appends are conditional updates on that counter
//! and are retried against the latest record when another writer got there
//! first. Review pushes are gated on that counter so a subscriber never sees
//! an item go back to an older version.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{FoodCreate, FoodItem, ReviewEntry};
use shared::store::{MenuChange, MenuStore, StoreError, StoreResult};
use shared::subscription::{Subscribers, SubscriptionToken};
use surrealdb::engine::any::{self, Any};
use surrealdb::{RecordId, Surreal};
use validator::Validate;

const FOOD_TABLE: &str = "food";
const NAMESPACE: &str = "menu";
const DATABASE: &str = "menu";

/// Attempts per append before giving up with `Conflict`
pub const MAX_APPEND_ATTEMPTS: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FoodRecord {
    #[serde(default, skip_serializing)]
    id: Option<RecordId>,
    key: String,
    name: String,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(default)]
    image: String,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    reviews: Vec<ReviewEntry>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    version: i64,
}

impl FoodRecord {
    fn from_item(item: &FoodItem) -> Self {
        Self {
            id: None,
            key: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            image: item.image.clone(),
            rating: item.rating,
            reviews: item.reviews.clone(),
            created_at: item.created_at,
            version: 0,
        }
    }

    fn into_item(self) -> FoodItem {
        FoodItem {
            id: self.key,
            name: self.name,
            price: self.price,
            image: self.image,
            rating: self.rating,
            reviews: self.reviews,
            created_at: self.created_at,
        }
    }
}

fn db_error(err: surrealdb::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

/// Transaction conflicts from the embedded engines are worth retrying
fn is_retryable(err: &surrealdb::Error) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("conflict") || msg.contains("can be retried")
}

pub struct SurrealMenuStore {
    db: Surreal<Any>,
    changes: Subscribers<MenuChange>,
    /// Highest version pushed per item
    pushed: DashMap<String, i64>,
}

impl SurrealMenuStore {
    /// Connect to `uri` (`mem://`, `rocksdb://<path>`, `ws://host`, ...)
    pub async fn connect(uri: &str) -> StoreResult<Self> {
        let db = any::connect(uri).await.map_err(db_error)?;
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(db_error)?;
        tracing::info!("SurrealDB connection established");
        Ok(Self {
            db,
            changes: Subscribers::new(),
            pushed: DashMap::new(),
        })
    }

    /// Push a review change unless a newer version already went out
    fn notify_review(&self, version: i64, food: FoodItem, review: ReviewEntry) {
        let mut last = self.pushed.entry(food.id.clone()).or_insert(0);
        if version <= *last {
            tracing::debug!(food_id = %food.id, version, "Skipping stale review push");
            return;
        }
        *last = version;
        self.changes.notify(&MenuChange::ReviewAppended { food, review });
    }

    async fn fetch(&self, key: &str) -> StoreResult<Option<FoodRecord>> {
        let mut response = self
            .db
            .query("SELECT * FROM type::thing($table, $key)")
            .bind(("table", FOOD_TABLE))
            .bind(("key", key.to_string()))
            .await
            .map_err(db_error)?;
        let records: Vec<FoodRecord> = response.take(0).map_err(db_error)?;
        Ok(records.into_iter().next())
    }

    /// Write `next` only if the stored version is still `expected`
    ///
    /// `Ok(None)` means another writer won and the caller should re-read.
    async fn conditional_update(
        &self,
        next: &FoodItem,
        expected: i64,
    ) -> Result<Option<FoodRecord>, surrealdb::Error> {
        let mut response = self
            .db
            .query(
                "UPDATE type::thing($table, $key) \
                 SET reviews = $reviews, rating = $rating, version = $next \
                 WHERE version = $expected \
                 RETURN AFTER",
            )
            .bind(("table", FOOD_TABLE))
            .bind(("key", next.id.clone()))
            .bind(("reviews", next.reviews.clone()))
            .bind(("rating", next.rating))
            .bind(("next", expected + 1))
            .bind(("expected", expected))
            .await?;
        let updated: Vec<FoodRecord> = response.take(0)?;
        Ok(updated.into_iter().next())
    }
}

#[async_trait]
impl MenuStore for SurrealMenuStore {
    async fn list_food_items(&self) -> StoreResult<Vec<FoodItem>> {
        let mut response = self
            .db
            .query("SELECT * FROM type::table($table)")
            .bind(("table", FOOD_TABLE))
            .await
            .map_err(db_error)?;
        let records: Vec<FoodRecord> = response.take(0).map_err(db_error)?;

        let mut foods: Vec<FoodItem> = records.into_iter().map(FoodRecord::into_item).collect();
        foods.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(foods)
    }

    async fn get_food_item(&self, id: &str) -> StoreResult<FoodItem> {
        self.fetch(id)
            .await?
            .map(FoodRecord::into_item)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn append_review(&self, food_id: &str, review: ReviewEntry) -> StoreResult<FoodItem> {
        for attempt in 1..=MAX_APPEND_ATTEMPTS {
            let current = self
                .fetch(food_id)
                .await?
                .ok_or_else(|| StoreError::NotFound(food_id.to_string()))?;
            let expected = current.version;
            let next = current.into_item().with_review(review.clone());

            match self.conditional_update(&next, expected).await {
                Ok(Some(record)) => {
                    let version = record.version;
                    let food = record.into_item();
                    tracing::debug!(food_id = %food_id, version, attempt, "Review appended");
                    self.notify_review(version, food.clone(), review);
                    return Ok(food);
                }
                Ok(None) => {
                    tracing::debug!(food_id = %food_id, attempt, "Lost append race, retrying");
                }
                Err(e) if is_retryable(&e) => {
                    tracing::debug!(food_id = %food_id, attempt, error = %e, "Transaction conflict, retrying");
                }
                Err(e) => return Err(db_error(e)),
            }
            tokio::task::yield_now().await;
        }

        tracing::warn!(food_id = %food_id, "Review append gave up after {MAX_APPEND_ATTEMPTS} attempts");
        Err(StoreError::Conflict(format!(
            "food {food_id} was updated concurrently {MAX_APPEND_ATTEMPTS} times"
        )))
    }

    async fn add_food_item(&self, data: FoodCreate) -> StoreResult<FoodItem> {
        data.validate()
            .map_err(|e| StoreError::Validation(e.to_string()))?;

        let food = FoodItem::new(uuid::Uuid::new_v4().simple().to_string(), data);
        self.db
            .query("CREATE type::thing($table, $key) CONTENT $record")
            .bind(("table", FOOD_TABLE))
            .bind(("key", food.id.clone()))
            .bind(("record", FoodRecord::from_item(&food)))
            .await
            .map_err(db_error)?
            .check()
            .map_err(db_error)?;

        tracing::debug!(food_id = %food.id, name = %food.name, "Food added");
        self.changes.notify(&MenuChange::FoodAdded(food.clone()));
        Ok(food)
    }

    fn subscribe(
        &self,
        handler: Box<dyn Fn(&MenuChange) + Send + Sync>,
    ) -> Option<SubscriptionToken> {
        Some(self.changes.subscribe(handler))
    }

    fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        self.changes.unsubscribe(token)
    }
}

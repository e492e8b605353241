//! In-memory menu store

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::{FoodCreate, FoodItem, ReviewEntry};
use shared::store::{MenuChange, MenuStore, StoreError, StoreResult};
use shared::subscription::{Subscribers, SubscriptionToken};
use validator::Validate;

/// Menu store backed by a `DashMap`
///
/// `append_review` recomputes, writes back and notifies while holding the
/// entry's shard lock, so concurrent appends to one item are serialized.
/// Change handlers must not call back into the store.
#[derive(Debug, Default)]
pub struct MemoryMenuStore {
    foods: DashMap<String, FoodItem>,
    changes: Subscribers<MenuChange>,
}

impl MemoryMenuStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with `items`, ids kept as given
    pub fn with_items(items: impl IntoIterator<Item = FoodItem>) -> Self {
        let store = Self::new();
        for item in items {
            store.foods.insert(item.id.clone(), item);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}

#[async_trait]
impl MenuStore for MemoryMenuStore {
    async fn list_food_items(&self) -> StoreResult<Vec<FoodItem>> {
        let mut foods: Vec<FoodItem> = self.foods.iter().map(|e| e.value().clone()).collect();
        foods.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(foods)
    }

    async fn get_food_item(&self, id: &str) -> StoreResult<FoodItem> {
        self.foods
            .get(id)
            .map(|e| e.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn append_review(&self, food_id: &str, review: ReviewEntry) -> StoreResult<FoodItem> {
        let mut entry = self
            .foods
            .get_mut(food_id)
            .ok_or_else(|| StoreError::NotFound(food_id.to_string()))?;
        let updated = entry.value().clone().with_review(review.clone());
        *entry = updated.clone();

        tracing::debug!(food_id = %food_id, reviews = updated.review_count(), "Review appended");
        // still under the entry lock: pushes for one item go out in write order
        self.changes.notify(&MenuChange::ReviewAppended {
            food: updated.clone(),
            review,
        });
        drop(entry);
        Ok(updated)
    }

    async fn add_food_item(&self, data: FoodCreate) -> StoreResult<FoodItem> {
        data.validate()
            .map_err(|e| StoreError::Validation(e.to_string()))?;

        let food = FoodItem::new(uuid::Uuid::new_v4().to_string(), data);
        self.foods.insert(food.id.clone(), food.clone());

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

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn create(name: &str, price: i64) -> FoodCreate {
        FoodCreate {
            name: name.to_string(),
            price: Decimal::new(price, 0),
            image: String::new(),
        }
    }

    #[tokio::test]
    async fn test_append_round_trip() {
        let store = MemoryMenuStore::new();
        let food = store.add_food_item(create("Ramen", 12)).await.unwrap();

        store
            .append_review(&food.id, ReviewEntry::new(5, "great"))
            .await
            .unwrap();
        let updated = store
            .append_review(&food.id, ReviewEntry::new(4, "good"))
            .await
            .unwrap();
        assert_eq!(updated.rating, Some(4.5));

        let fetched = store.get_food_item(&food.id).await.unwrap();
        assert_eq!(fetched, updated);
        assert_eq!(fetched.reviews[0].comment, "great");
        assert_eq!(fetched.reviews[1].comment, "good");
    }

    #[tokio::test]
    async fn test_append_to_unknown_item() {
        let store = MemoryMenuStore::new();
        let err = store
            .append_review("missing", ReviewEntry::new(5, "hi"))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound("missing".into()));
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_payload() {
        let store = MemoryMenuStore::new();
        let err = store.add_food_item(create("  ", 5)).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = MemoryMenuStore::new();
        let first = store.add_food_item(create("First", 1)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.add_food_item(create("Second", 2)).await.unwrap();

        let ids: Vec<String> = store
            .list_food_items()
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_kept() {
        let store = Arc::new(MemoryMenuStore::new());
        let food = store.add_food_item(create("Ramen", 12)).await.unwrap();

        let tasks: Vec<_> = (0..50)
            .map(|i| {
                let store = store.clone();
                let id = food.id.clone();
                tokio::spawn(async move {
                    let rating = if i % 2 == 0 { 5 } else { 4 };
                    store
                        .append_review(&id, ReviewEntry::new(rating, format!("review {i}")))
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let food = store.get_food_item(&food.id).await.unwrap();
        assert_eq!(food.review_count(), 50);
        assert_eq!(food.rating, Some(4.5));
    }

    #[tokio::test]
    async fn test_changes_are_pushed() {
        let store = MemoryMenuStore::new();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let token = store
            .subscribe(Box::new(move |change: &MenuChange| {
                sink.lock().push(change.food().review_count());
            }))
            .unwrap();

        let food = store.add_food_item(create("Ramen", 12)).await.unwrap();
        store
            .append_review(&food.id, ReviewEntry::new(3, "ok"))
            .await
            .unwrap();
        assert!(store.unsubscribe(token));
        store
            .append_review(&food.id, ReviewEntry::new(3, "ok again"))
            .await
            .unwrap();

        assert_eq!(*seen.lock(), vec![0, 1]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_pushes_follow_write_order_with_slow_subscriber() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let food = FoodItem::new("f1", create("Ramen", 12));
        let store = Arc::new(MemoryMenuStore::with_items(vec![food]));

        // first handler stalls on its first call only
        let stalled = Arc::new(AtomicBool::new(false));
        let flag = stalled.clone();
        store.subscribe(Box::new(move |_: &MenuChange| {
            if !flag.swap(true, Ordering::SeqCst) {
                std::thread::sleep(std::time::Duration::from_millis(300));
            }
        }));
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(Box::new(move |change: &MenuChange| {
            sink.lock().push(change.food().review_count());
        }));

        let first = {
            let store = store.clone();
            tokio::spawn(async move { store.append_review("f1", ReviewEntry::new(5, "first")).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let second = {
            let store = store.clone();
            tokio::spawn(async move { store.append_review("f1", ReviewEntry::new(1, "second")).await })
        };
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        assert_eq!(*seen.lock(), vec![1, 2]);
        assert_eq!(store.get_food_item("f1").await.unwrap().rating, Some(3.0));
    }
}

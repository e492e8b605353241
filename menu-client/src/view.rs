//! Menu view: food collection, sort key and single selection

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::models::FoodItem;
use shared::sort::{SortType, sort_foods};
use shared::store::{MenuChange, MenuStore, StoreResult};
use shared::subscription::SubscriptionToken;
use tokio::sync::mpsc;

use crate::modal::{ReviewModal, SubmitError};

pub const EMPTY_MENU_MESSAGE: &str = "No dishes on the menu yet. Check back soon!";

/// One grid card
#[derive(Debug, Clone, PartialEq)]
pub struct FoodCard {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    /// One decimal, or "New" when unrated
    pub rating_label: String,
    pub rated: bool,
    pub review_count: usize,
    pub selected: bool,
}

impl FoodCard {
    fn new(food: &FoodItem, selected: bool) -> Self {
        Self {
            id: food.id.clone(),
            name: food.name.clone(),
            price: food.price,
            image: food.image.clone(),
            rating_label: food.rating_label(),
            rated: food.is_rated(),
            review_count: food.review_count(),
            selected,
        }
    }

    pub fn price_label(&self) -> String {
        format!("${}", self.price)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuRender {
    /// Zero items is a valid state with its own message
    Empty { message: &'static str },
    Grid(Vec<FoodCard>),
}

pub struct MenuView {
    store: Arc<dyn MenuStore>,
    foods: Vec<FoodItem>,
    sort: Option<SortType>,
    selected: Option<ReviewModal>,
    changes: Option<(SubscriptionToken, mpsc::UnboundedReceiver<MenuChange>)>,
    error: Option<String>,
}

impl MenuView {
    pub fn new(store: Arc<dyn MenuStore>) -> Self {
        Self {
            store,
            foods: Vec::new(),
            sort: None,
            selected: None,
            changes: None,
            error: None,
        }
    }

    /// Subscribe to store pushes when available, then load
    pub async fn mount(&mut self) -> StoreResult<()> {
        if self.changes.is_none() {
            let (tx, rx) = mpsc::unbounded_channel();
            let token = self.store.subscribe(Box::new(move |change: &MenuChange| {
                // receiver gone means the view was dropped
                let _ = tx.send(change.clone());
            }));
            if let Some(token) = token {
                self.changes = Some((token, rx));
            }
        }
        self.load().await
    }

    pub fn unmount(&mut self) {
        if let Some((token, _)) = self.changes.take() {
            self.store.unsubscribe(token);
        }
        self.selected = None;
    }

    /// Fetch the collection. On failure the previous collection stays.
    pub async fn load(&mut self) -> StoreResult<()> {
        match self.store.list_food_items().await {
            Ok(foods) => {
                self.foods = foods;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading foods");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn is_live(&self) -> bool {
        self.changes.is_some()
    }

    /// Items in store order (newest first)
    pub fn foods(&self) -> &[FoodItem] {
        &self.foods
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn sort(&self) -> Option<SortType> {
        self.sort
    }

    pub fn set_sort(&mut self, sort: Option<SortType>) {
        self.sort = sort;
    }

    /// Items in display order; the stored collection is never reordered
    pub fn visible(&self) -> Vec<FoodItem> {
        match self.sort {
            Some(sort) => sort_foods(&self.foods, sort),
            None => self.foods.clone(),
        }
    }

    pub fn render(&self) -> MenuRender {
        if self.foods.is_empty() {
            return MenuRender::Empty {
                message: EMPTY_MENU_MESSAGE,
            };
        }
        let selected_id = self.selected.as_ref().map(|m| m.food().id.as_str());
        MenuRender::Grid(
            self.visible()
                .iter()
                .map(|f| FoodCard::new(f, Some(f.id.as_str()) == selected_id))
                .collect(),
        )
    }

    /// Open the review modal for `id`, replacing any open one
    pub fn select(&mut self, id: &str) -> Option<&mut ReviewModal> {
        let food = self.foods.iter().find(|f| f.id == id)?.clone();
        self.selected = Some(ReviewModal::new(food));
        self.selected.as_mut()
    }

    pub fn selected(&self) -> Option<&ReviewModal> {
        self.selected.as_ref()
    }

    pub fn selected_mut(&mut self) -> Option<&mut ReviewModal> {
        self.selected.as_mut()
    }

    /// Submit the open modal; closes it on success
    ///
    /// Returns `None` when nothing is selected.
    pub async fn submit_selected(&mut self) -> Option<Result<FoodItem, SubmitError>> {
        let modal = self.selected.as_mut()?;
        let result = modal.submit(self.store.as_ref()).await;
        if result.is_ok() {
            self.close_modal().await;
        }
        Some(result)
    }

    /// Clear the selection and bring the collection up to date
    pub async fn close_modal(&mut self) {
        self.selected = None;
        if self.is_live() {
            self.drain_changes();
        } else {
            // error is recorded on the view
            let _ = self.load().await;
        }
    }

    /// Fold in every change pushed since the last call
    pub fn drain_changes(&mut self) -> usize {
        let mut pending = Vec::new();
        if let Some((_, rx)) = self.changes.as_mut() {
            while let Ok(change) = rx.try_recv() {
                pending.push(change);
            }
        }
        let count = pending.len();
        for change in pending {
            self.apply_change(change);
        }
        count
    }

    /// Fold one pushed change into the collection
    ///
    /// Reviews are append-only, so a pushed item with no more reviews than
    /// the held copy is stale and ignored.
    pub fn apply_change(&mut self, change: MenuChange) {
        let food = match change {
            MenuChange::FoodAdded(food) => food,
            MenuChange::ReviewAppended { food, .. } => food,
        };
        match self.foods.iter_mut().find(|f| f.id == food.id) {
            Some(existing) if food.reviews.len() > existing.reviews.len() => *existing = food,
            Some(existing) => {
                tracing::debug!(
                    food_id = %existing.id,
                    held = existing.reviews.len(),
                    pushed = food.reviews.len(),
                    "Ignoring stale change"
                );
            }
            None => self.foods.insert(0, food),
        }
    }
}

impl Drop for MenuView {
    fn drop(&mut self) {
        if let Some((token, _)) = self.changes.take() {
            self.store.unsubscribe(token);
        }
    }
}

//! Review submission
//!
//! `Idle -> Composing -> Submitting -> {Success, Failed}`
//!
//! The modal writes only through the [`MenuStore`]. It never touches the
//! menu view's collection; the view re-reads after the modal closes.

use std::time::Duration;

use shared::models::{FoodItem, ReviewEntry};
use shared::rating::{DEFAULT_RATING, MAX_RATING, MIN_RATING};
use shared::store::{MenuStore, StoreError};
use thiserror::Error;

pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

pub const NO_REVIEWS_MESSAGE: &str = "No reviews yet. Be the first!";

/// One row of the modal's review list
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewLine {
    pub rating: u8,
    pub comment: String,
    /// `YYYY-MM-DD` of the review's timestamp
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("Please write a comment before submitting")]
    EmptyComment,

    #[error("Review submission timed out")]
    TimedOut,

    #[error("{0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Composing,
    Submitting,
    Success,
    Failed(SubmitError),
}

#[derive(Debug, Clone)]
pub struct ReviewModal {
    food: FoodItem,
    rating: u8,
    comment: String,
    state: SubmissionState,
    timeout: Duration,
}

impl ReviewModal {
    pub fn new(food: FoodItem) -> Self {
        Self {
            food,
            rating: DEFAULT_RATING,
            comment: String::new(),
            state: SubmissionState::Idle,
            timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn food(&self) -> &FoodItem {
        &self.food
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// `"Reviews (N)"`
    pub fn reviews_heading(&self) -> String {
        format!("Reviews ({})", self.food.review_count())
    }

    /// Existing reviews, newest first
    pub fn review_lines(&self) -> Vec<ReviewLine> {
        self.food
            .reviews_newest_first()
            .map(|r| ReviewLine {
                rating: r.rating,
                comment: r.comment.clone(),
                date: r.created_at.format("%Y-%m-%d").to_string(),
            })
            .collect()
    }

    /// Shown in place of the list when the item has no reviews
    pub fn empty_reviews_message(&self) -> Option<&'static str> {
        if self.food.reviews.is_empty() {
            Some(NO_REVIEWS_MESSAGE)
        } else {
            None
        }
    }

    /// Click on star `star`. Values outside 1..=5 are ignored.
    pub fn set_rating(&mut self, star: u8) -> bool {
        if !(MIN_RATING..=MAX_RATING).contains(&star) || self.is_submitting() {
            return false;
        }
        self.rating = star;
        self.edit();
        true
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        if self.is_submitting() {
            return;
        }
        self.comment = comment.into();
        self.edit();
    }

    fn edit(&mut self) {
        // editing after a failure clears the error but keeps the input
        if matches!(self.state, SubmissionState::Idle | SubmissionState::Failed(_)) {
            self.state = SubmissionState::Composing;
        }
    }

    /// Filled state of the five stars
    pub fn stars(&self) -> [bool; 5] {
        std::array::from_fn(|i| (i as u8) < self.rating)
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// Submit button enabled
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && !self.comment.trim().is_empty()
    }

    /// Inline error, present only in `Failed`
    pub fn error_message(&self) -> Option<String> {
        match &self.state {
            SubmissionState::Failed(e) => Some(format!("Error submitting review: {}", e)),
            _ => None,
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            "Submitting..."
        } else {
            "Submit Review"
        }
    }

    /// Send the review. A blank comment returns [`SubmitError::EmptyComment`]
    /// without calling the store or changing state.
    pub async fn submit(&mut self, store: &dyn MenuStore) -> Result<FoodItem, SubmitError> {
        if self.comment.trim().is_empty() {
            return Err(SubmitError::EmptyComment);
        }

        self.state = SubmissionState::Submitting;
        let review = ReviewEntry::new(self.rating, self.comment.trim());

        let result = match tokio::time::timeout(
            self.timeout,
            store.append_review(&self.food.id, review),
        )
        .await
        {
            Ok(Ok(food)) => Ok(food),
            Ok(Err(e)) => Err(SubmitError::Store(e)),
            Err(_) => Err(SubmitError::TimedOut),
        };

        match &result {
            Ok(food) => {
                tracing::debug!(food_id = %food.id, reviews = food.review_count(), "Review submitted");
                self.food = food.clone();
                self.state = SubmissionState::Success;
            }
            Err(e) => {
                tracing::warn!(food_id = %self.food.id, error = %e, "Review submission failed");
                self.state = SubmissionState::Failed(e.clone());
            }
        }
        result
    }
}

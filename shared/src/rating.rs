//! Rating aggregation and review input rules
//!
//! The aggregate is always recomputed from the complete review sequence.
//! Ratings are summed as integers, so repeated appends never accumulate
//! floating-point drift.

use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::ReviewEntry;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
/// Star value preselected when the review form opens
pub const DEFAULT_RATING: u8 = 5;
/// Longest accepted review comment, in characters
pub const MAX_COMMENT_LEN: usize = 2000;

/// Arithmetic mean of all ratings, `None` for an empty sequence
///
/// Out-of-range ratings are not rejected here; the submission path validates
/// input with [`validate_review`] before anything reaches a store.
pub fn compute_average(reviews: &[ReviewEntry]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: u64 = reviews.iter().map(|r| u64::from(r.rating)).sum();
    Some(sum as f64 / reviews.len() as f64)
}

pub fn validate_rating(rating: u8) -> AppResult<u8> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(
            AppError::new(ErrorCode::RatingOutOfRange).with_detail("rating", u64::from(rating)),
        )
    }
}

/// Rejects empty, whitespace-only and overlong comments
pub fn validate_comment(comment: &str) -> AppResult<()> {
    let comment = comment.trim();
    if comment.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyComment));
    }
    if comment.chars().count() > MAX_COMMENT_LEN {
        return Err(AppError::validation(format!(
            "Review comment must be at most {MAX_COMMENT_LEN} characters"
        ))
        .with_detail("max_len", MAX_COMMENT_LEN as u64));
    }
    Ok(())
}

/// Both checks a review must pass before any store call
pub fn validate_review(rating: u8, comment: &str) -> AppResult<()> {
    validate_comment(comment)?;
    validate_rating(rating)?;
    Ok(())
}

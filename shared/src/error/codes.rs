//! Unified error codes for the menu service
//!
//! Error codes are shared by menu-server, menu-client and any frontend.
//! They are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 6xxx: Food / review errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Too many requests from the same client
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (wrong password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,
    /// No account registered for this email
    UserNotFound = 1010,
    /// Email is already registered
    EmailAlreadyInUse = 1011,
    /// Password does not satisfy the policy
    WeakPassword = 1012,
    /// Email address is malformed
    InvalidEmail = 1013,
    /// Email/password sign-in is switched off
    OperationNotAllowed = 1014,

    // ==================== 6xxx: Food / Review ====================
    /// Food item not found
    FoodNotFound = 6001,
    /// Review comment is empty
    EmptyComment = 6101,
    /// Review rating outside 1..=5
    RatingOutOfRange = 6102,
    /// Concurrent writers kept winning the conditional update
    ReviewConflict = 6103,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Menu store or session backend unreachable
    StoreUnavailable = 9004,
    /// Operation timed out
    TimeoutError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Incorrect password.",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "This user account has been disabled.",
            ErrorCode::UserNotFound => "No user found with this email.",
            ErrorCode::EmailAlreadyInUse => "Email is already registered.",
            ErrorCode::WeakPassword => "Password should be at least 6 characters.",
            ErrorCode::InvalidEmail => "Invalid email address.",
            ErrorCode::OperationNotAllowed => "Email/Password sign-in is not enabled.",

            // Food / Review
            ErrorCode::FoodNotFound => "Food item not found",
            ErrorCode::EmptyComment => "Review comment must not be empty",
            ErrorCode::RatingOutOfRange => "Rating must be between 1 and 5",
            ErrorCode::ReviewConflict => "Review could not be saved due to concurrent updates",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StoreUnavailable => "Menu store is unavailable",
            ErrorCode::TimeoutError => "Operation timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),
            1010 => Ok(ErrorCode::UserNotFound),
            1011 => Ok(ErrorCode::EmailAlreadyInUse),
            1012 => Ok(ErrorCode::WeakPassword),
            1013 => Ok(ErrorCode::InvalidEmail),
            1014 => Ok(ErrorCode::OperationNotAllowed),

            // Food / Review
            6001 => Ok(ErrorCode::FoodNotFound),
            6101 => Ok(ErrorCode::EmptyComment),
            6102 => Ok(ErrorCode::RatingOutOfRange),
            6103 => Ok(ErrorCode::ReviewConflict),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9004 => Ok(ErrorCode::StoreUnavailable),
            9005 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

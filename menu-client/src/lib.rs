//! Menu Client
//!
//! HTTP implementations of the shared store and session capabilities plus
//! the presentation state that drives a menu front end:
//!
//! - [`HttpMenuStore`] / [`HttpSessionProvider`] - reqwest against menu-server
//! - [`ReviewModal`] - review submission state machine
//! - [`MenuView`] - food grid, sort and selection
//! - [`LoginForm`] / [`App`] - sign-in and screen switching

pub mod app;
pub mod error;
pub mod http;
pub mod login;
pub mod modal;
pub mod session;
pub mod store;
pub mod view;

pub use app::{App, Screen};
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use login::LoginForm;
pub use modal::{
    DEFAULT_SUBMIT_TIMEOUT, NO_REVIEWS_MESSAGE, ReviewLine, ReviewModal, SubmissionState,
    SubmitError,
};
pub use session::HttpSessionProvider;
pub use store::HttpMenuStore;
pub use view::{EMPTY_MENU_MESSAGE, FoodCard, MenuRender, MenuView};

use std::sync::Arc;

/// Store and session sharing one HTTP client (and so one bearer token)
pub fn connect(base_url: &str) -> ClientResult<(Arc<HttpMenuStore>, Arc<HttpSessionProvider>)> {
    let http = Arc::new(HttpClient::new(base_url)?);
    Ok((
        Arc::new(HttpMenuStore::new(http.clone())),
        Arc::new(HttpSessionProvider::new(http)),
    ))
}

//! Screen orchestration
//!
//! `Loading -> Login | Menu`, driven by auth-state changes from the
//! [`SessionProvider`]. The menu view exists only while a user is signed in.

use std::sync::Arc;

use shared::models::User;
use shared::session::{AuthError, AuthState, SessionProvider};
use shared::store::MenuStore;
use shared::subscription::SubscriptionToken;
use tokio::sync::mpsc;

use crate::login::LoginForm;
use crate::view::MenuView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Login,
    Menu,
}

pub struct App {
    session: Arc<dyn SessionProvider>,
    store: Arc<dyn MenuStore>,
    screen: Screen,
    user: Option<User>,
    login: LoginForm,
    menu: Option<MenuView>,
    auth_token: SubscriptionToken,
    auth_events: mpsc::UnboundedReceiver<AuthState>,
}

impl App {
    pub fn new(session: Arc<dyn SessionProvider>, store: Arc<dyn MenuStore>) -> Self {
        let (tx, auth_events) = mpsc::unbounded_channel();
        let auth_token = session.on_auth_state_change(Box::new(move |state: &AuthState| {
            let _ = tx.send(state.clone());
        }));

        Self {
            session,
            store,
            screen: Screen::Loading,
            user: None,
            login: LoginForm::new(),
            menu: None,
            auth_token,
            auth_events,
        }
    }

    /// Resolve the initial session and leave `Loading`
    pub async fn start(&mut self) {
        let state = match self.session.current_user().await {
            Ok(user) => AuthState::from(user),
            Err(e) => {
                tracing::warn!(error = %e, "Could not restore session");
                self.login.set_error(e.user_message());
                AuthState::SignedOut
            }
        };
        self.apply_auth_state(state).await;
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Header text for the signed-in user
    pub fn user_label(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.email.as_str())
    }

    pub fn login(&self) -> &LoginForm {
        &self.login
    }

    pub fn login_mut(&mut self) -> &mut LoginForm {
        &mut self.login
    }

    pub fn menu(&self) -> Option<&MenuView> {
        self.menu.as_ref()
    }

    pub fn menu_mut(&mut self) -> Option<&mut MenuView> {
        self.menu.as_mut()
    }

    /// Submit the login form, then follow the resulting auth change
    pub async fn submit_login(&mut self) -> Result<User, AuthError> {
        let result = self.login.submit(self.session.as_ref()).await;
        self.process_auth_events().await;
        result
    }

    pub async fn sign_out(&mut self) -> Result<(), AuthError> {
        self.session.sign_out().await?;
        self.process_auth_events().await;
        Ok(())
    }

    /// Apply every auth change received since the last call
    pub async fn process_auth_events(&mut self) -> usize {
        let mut count = 0;
        while let Ok(state) = self.auth_events.try_recv() {
            self.apply_auth_state(state).await;
            count += 1;
        }
        count
    }

    pub async fn apply_auth_state(&mut self, state: AuthState) {
        match state {
            AuthState::SignedIn(user) => {
                tracing::info!(user_id = %user.id, "Signed in");
                self.user = Some(user);
                if self.menu.is_none() {
                    let mut menu = MenuView::new(self.store.clone());
                    // load failures are shown on the menu itself
                    let _ = menu.mount().await;
                    self.menu = Some(menu);
                }
                self.screen = Screen::Menu;
            }
            AuthState::SignedOut => {
                if let Some(mut menu) = self.menu.take() {
                    menu.unmount();
                }
                self.user = None;
                self.screen = Screen::Login;
            }
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.session.unsubscribe(self.auth_token);
    }
}

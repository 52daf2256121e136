//! Session controller - token lifecycle and the access gate
//!
//! State machine: `Uninitialized -> Validating -> {Authenticated, Anonymous}`,
//! plus `Authenticated -> Anonymous` on logout. Nothing re-enters
//! `Validating` except a fresh process start.

use std::sync::{Arc, Mutex, RwLock};

use shared::client::{LoginRequest, LoginResponse};

use crate::api::AuthApi;
use crate::error::ClientResult;
use crate::storage::TokenStore;

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Process started, startup validation not yet begun.
    Uninitialized,
    /// A stored token is being checked against the identity endpoint.
    Validating,
    Authenticated,
    Anonymous,
}

/// Login credentials as entered by the user.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// What a protected view may do right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Startup validation still running: render a neutral loading state.
    Loading,
    /// Session is valid: render the protected content.
    Allow,
    /// No session: redirect to login, carrying the originally requested
    /// destination for post-login navigation.
    RedirectToLogin { from: String },
}

struct Inner {
    state: SessionState,
    token: Option<String>,
    initialized: bool,
}

type LogoutHook = Box<dyn Fn() + Send + Sync>;

/// Owns initialization-on-load, login, logout and the derived access
/// gate. The auth gateway is injected; the token store is the only
/// persistence it touches.
pub struct SessionController {
    auth: Arc<dyn AuthApi>,
    tokens: TokenStore,
    token_expires_mins: u32,
    inner: RwLock<Inner>,
    logout_hooks: Mutex<Vec<LogoutHook>>,
}

impl SessionController {
    pub fn new(auth: Arc<dyn AuthApi>, tokens: TokenStore, token_expires_mins: u32) -> Self {
        Self {
            auth,
            tokens,
            token_expires_mins,
            inner: RwLock::new(Inner {
                state: SessionState::Uninitialized,
                token: None,
                initialized: false,
            }),
            logout_hooks: Mutex::new(Vec::new()),
        }
    }

    /// Register a hook invoked on logout. The catalog engine subscribes
    /// here to reset its persisted pagination/search without the
    /// controller depending on it.
    pub fn on_logout(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.logout_hooks.lock().unwrap().push(Box::new(hook));
    }

    /// Startup validation. Called exactly once per process; repeated
    /// calls are a no-op.
    ///
    /// An empty token store goes straight to `Anonymous`. A stored
    /// token is checked against the identity endpoint; any failure
    /// (network or rejection) clears the store.
    pub async fn initialize(&self) {
        let stored = {
            let mut inner = self.inner.write().unwrap();
            if inner.state != SessionState::Uninitialized {
                tracing::debug!("Session already initialized, ignoring");
                return;
            }
            match self.tokens.get() {
                None => {
                    inner.state = SessionState::Anonymous;
                    inner.initialized = true;
                    return;
                }
                Some(token) => {
                    inner.state = SessionState::Validating;
                    token
                }
            }
        };

        match self.auth.me(&stored).await {
            Ok(me) => {
                tracing::debug!(user_id = me.id, "Stored session validated");
                let mut inner = self.inner.write().unwrap();
                inner.state = SessionState::Authenticated;
                inner.token = Some(stored);
                inner.initialized = true;
            }
            Err(e) => {
                tracing::debug!("Stored session rejected: {}", e);
                if let Err(e) = self.tokens.clear() {
                    tracing::warn!("Failed to clear token store: {}", e);
                }
                let mut inner = self.inner.write().unwrap();
                inner.state = SessionState::Anonymous;
                inner.initialized = true;
            }
        }
    }

    /// Authenticate and store the access token, durably when `remember`
    /// is set. On failure the collaborator's message propagates
    /// unchanged and session state is untouched.
    pub async fn login(
        &self,
        credentials: &Credentials,
        remember: bool,
    ) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            expires_in_mins: self.token_expires_mins,
        };

        let response = self.auth.login(&request).await?;

        if let Err(e) = self.tokens.set(&response.access_token, remember) {
            tracing::warn!("Failed to persist token: {}", e);
        }

        let mut inner = self.inner.write().unwrap();
        inner.state = SessionState::Authenticated;
        inner.token = Some(response.access_token.clone());
        drop(inner);

        tracing::debug!(username = %credentials.username, "Logged in");
        Ok(response)
    }

    /// Clear the token, reset subscribed components, go `Anonymous`.
    pub fn logout(&self) {
        if let Err(e) = self.tokens.clear() {
            tracing::warn!("Failed to clear token store: {}", e);
        }

        for hook in self.logout_hooks.lock().unwrap().iter() {
            hook();
        }

        let mut inner = self.inner.write().unwrap();
        inner.state = SessionState::Anonymous;
        inner.token = None;
        drop(inner);

        tracing::debug!("Logged out");
    }

    /// Gate for protected views. `requested` is the destination the
    /// user asked for; it travels with the redirect so login can return
    /// there.
    pub fn access(&self, requested: &str) -> Access {
        let inner = self.inner.read().unwrap();
        if !inner.initialized {
            return Access::Loading;
        }
        if inner.token.is_none() {
            return Access::RedirectToLogin {
                from: requested.to_string(),
            };
        }
        Access::Allow
    }

    pub fn state(&self) -> SessionState {
        self.inner.read().unwrap().state
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().unwrap().token.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.read().unwrap().initialized
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().unwrap().state == SessionState::Authenticated
    }
}
